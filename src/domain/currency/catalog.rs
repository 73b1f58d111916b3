//! Compiled-in currency catalog.

use serde::Serialize;

/// Code used whenever a currency is missing, unknown or undetectable.
pub const DEFAULT_CURRENCY: &str = "MXN";

/// Locale used when nothing more specific is known.
pub const DEFAULT_LOCALE: &str = "es-MX";

/// One supported currency.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyDescriptor {
    pub code: &'static str,
    /// Symbol used by the dashboard's own labels and the plain fallback.
    pub symbol: &'static str,
    /// Unambiguous symbol shown when formatting under a locale whose home currency differs.
    pub intl_symbol: &'static str,
    pub display_name: &'static str,
    pub label: &'static str,
    pub locale: &'static str,
    pub fraction_digits: usize,
    /// Default tax rate charged in this currency's market, as a fraction.
    pub tax_rate: f64,
    /// Default shipping cost, in this currency.
    pub default_shipping: f64,
}

pub static CATALOG: [CurrencyDescriptor; 7] = [
    CurrencyDescriptor {
        code: "MXN",
        symbol: "$",
        intl_symbol: "MX$",
        display_name: "Peso Mexicano",
        label: "Peso Mexicano (MXN)",
        locale: "es-MX",
        fraction_digits: 2,
        tax_rate: 0.16,
        default_shipping: 99.00,
    },
    CurrencyDescriptor {
        code: "USD",
        symbol: "$",
        intl_symbol: "US$",
        display_name: "Dólar Estadounidense",
        label: "Dólar Estadounidense (USD)",
        locale: "en-US",
        fraction_digits: 2,
        tax_rate: 0.08,
        default_shipping: 9.99,
    },
    CurrencyDescriptor {
        code: "EUR",
        symbol: "€",
        intl_symbol: "€",
        display_name: "Euro",
        label: "Euro (EUR)",
        locale: "es-ES",
        fraction_digits: 2,
        tax_rate: 0.21,
        default_shipping: 5.95,
    },
    CurrencyDescriptor {
        code: "GBP",
        symbol: "£",
        intl_symbol: "£",
        display_name: "Libra Esterlina",
        label: "Libra Esterlina (GBP)",
        locale: "en-GB",
        fraction_digits: 2,
        tax_rate: 0.20,
        default_shipping: 4.99,
    },
    CurrencyDescriptor {
        code: "CAD",
        symbol: "C$",
        intl_symbol: "CA$",
        display_name: "Dólar Canadiense",
        label: "Dólar Canadiense (CAD)",
        locale: "en-CA",
        fraction_digits: 2,
        tax_rate: 0.13,
        default_shipping: 12.99,
    },
    CurrencyDescriptor {
        code: "COP",
        symbol: "$",
        intl_symbol: "COP",
        display_name: "Peso Colombiano",
        label: "Peso Colombiano (COP)",
        locale: "es-CO",
        fraction_digits: 0,
        tax_rate: 0.19,
        default_shipping: 15000.0,
    },
    CurrencyDescriptor {
        code: "ARS",
        symbol: "$",
        intl_symbol: "ARS",
        display_name: "Peso Argentino",
        label: "Peso Argentino (ARS)",
        locale: "es-AR",
        fraction_digits: 2,
        tax_rate: 0.21,
        default_shipping: 2500.0,
    },
];

/// Exact, case-sensitive lookup.
pub fn find(code: &str) -> Option<&'static CurrencyDescriptor> {
    CATALOG.iter().find(|c| c.code == code)
}

/// The descriptor for [`DEFAULT_CURRENCY`].
pub fn default_descriptor() -> &'static CurrencyDescriptor {
    // The default code is the first catalog entry; the test below pins that.
    &CATALOG[0]
}
