//! Multi-currency display: catalog lookups, formatting and detection.

pub mod catalog;
pub mod detect;
pub mod format;
pub mod locale;

pub use catalog::{CurrencyDescriptor, CATALOG, DEFAULT_CURRENCY, DEFAULT_LOCALE};
pub use detect::detect_currency_from_woocommerce;
pub use format::{
    convert_currency, format_amount, format_currency, format_price_range, format_woocommerce_price,
    FormatOptions,
};

/// Descriptor for `code`, the default currency's when `code` is absent or unknown.
pub fn get_currency_info(code: Option<&str>) -> &'static CurrencyDescriptor {
    code.and_then(catalog::find).unwrap_or_else(catalog::default_descriptor)
}

pub fn get_currency_symbol(code: Option<&str>) -> &'static str {
    get_currency_info(code).symbol
}

pub fn is_valid_currency(code: &str) -> bool {
    catalog::find(code).is_some()
}

pub fn get_supported_currencies() -> &'static [CurrencyDescriptor] {
    &CATALOG
}

pub fn get_tax_rate(code: Option<&str>) -> f64 {
    get_currency_info(code).tax_rate
}

pub fn get_default_shipping(code: Option<&str>) -> f64 {
    get_currency_info(code).default_shipping
}
