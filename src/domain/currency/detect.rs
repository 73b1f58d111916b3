//! Detects the currency a WooCommerce record is denominated in.

use serde_json::Value;
use tracing::warn;

use super::catalog::DEFAULT_CURRENCY;
use crate::domain::value_objects::CurrencyCode;

const ORDER_CURRENCY_META_KEY: &str = "_order_currency";

type Candidate = fn(&Value) -> Option<&Value>;

/// Places a record may carry its currency, most specific first.
const CANDIDATES: &[Candidate] = &[currency, currency_code, order_currency, order_currency_meta];

fn currency(record: &Value) -> Option<&Value> { record.get("currency") }
fn currency_code(record: &Value) -> Option<&Value> { record.get("currency_code") }
fn order_currency(record: &Value) -> Option<&Value> { record.get("order_currency") }

fn order_currency_meta(record: &Value) -> Option<&Value> {
    record
        .get("meta_data")?
        .as_array()?
        .iter()
        .find(|m| m.get("key").and_then(Value::as_str) == Some(ORDER_CURRENCY_META_KEY))?
        .get("value")
}

/// Returns the first supported currency found in `record`, or [`DEFAULT_CURRENCY`].
pub fn detect_currency_from_woocommerce(record: &Value) -> &'static str {
    CANDIDATES
        .iter()
        .filter_map(|candidate| candidate(record)?.as_str())
        .find_map(|raw| CurrencyCode::parse(raw).ok())
        .map(|code| code.as_str())
        .unwrap_or_else(|| {
            warn!(fallback = DEFAULT_CURRENCY, "No supported currency in WooCommerce record");
            DEFAULT_CURRENCY
        })
}
