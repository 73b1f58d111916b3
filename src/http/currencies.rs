//! Currency catalog endpoint, used by the settings and order forms.

use axum::Json;
use serde::Serialize;

use crate::domain::currency::{get_supported_currencies, CurrencyDescriptor, DEFAULT_CURRENCY, DEFAULT_LOCALE};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyCatalogResponse {
    pub default_currency: &'static str,
    pub default_locale: &'static str,
    pub currencies: &'static [CurrencyDescriptor],
}

pub async fn list_currencies() -> Json<CurrencyCatalogResponse> {
    Json(CurrencyCatalogResponse {
        default_currency: DEFAULT_CURRENCY,
        default_locale: DEFAULT_LOCALE,
        currencies: get_supported_currencies(),
    })
}
