//! Display formatting for monetary amounts.
//!
//! Formatting is total: every input yields a non-empty string. Unknown currencies fall back to
//! [`DEFAULT_CURRENCY`] and unknown locales fall back to a plain `symbol + fixed digits` rendering;
//! both are reported through `tracing` only.

use tracing::warn;

use super::catalog::{self, CurrencyDescriptor, DEFAULT_CURRENCY};
use super::locale;
use crate::domain::value_objects::RawAmount;

#[derive(Clone, Debug, PartialEq)]
pub struct FormatOptions {
    pub show_symbol: bool,
    /// Overrides the currency's own locale.
    pub locale: Option<String>,
    /// Used when no currency code is given at all.
    pub fallback_currency: Option<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { show_symbol: true, locale: None, fallback_currency: None }
    }
}

impl FormatOptions {
    pub fn without_symbol() -> Self {
        Self { show_symbol: false, ..Self::default() }
    }
}

/// Everything a formatting strategy needs, resolved up front.
struct FormatRequest<'a> {
    value: f64,
    currency: &'static CurrencyDescriptor,
    locale: &'a str,
    show_symbol: bool,
}

type Strategy = fn(&FormatRequest<'_>) -> Option<String>;

/// Tried in order; [`manual`] runs when all of them miss.
const STRATEGIES: &[Strategy] = &[locale_aware];

fn locale_aware(req: &FormatRequest<'_>) -> Option<String> {
    let conventions = locale::conventions(req.locale)?;
    if req.show_symbol {
        conventions.format_money(req.value, req.currency.fraction_digits, conventions.symbol_for(req.currency))
    } else {
        conventions.format_number(req.value, req.currency.fraction_digits)
    }
}

fn manual(req: &FormatRequest<'_>) -> String {
    let number = if req.value.is_finite() {
        let digits = locale::fixed_digits(req.value.abs(), req.currency.fraction_digits);
        if req.value < 0.0 { format!("-{digits}") } else { digits }
    } else if req.value.is_sign_negative() {
        "-Infinity".to_string()
    } else {
        "Infinity".to_string()
    };
    if req.show_symbol { format!("{}{}", req.currency.symbol, number) } else { number }
}

/// Resolves `code`, then `fallback`, then the default; unknown codes are warned about.
fn resolve_currency(code: Option<&str>, fallback: Option<&str>) -> &'static CurrencyDescriptor {
    let requested = code
        .filter(|c| !c.is_empty())
        .or(fallback.filter(|c| !c.is_empty()))
        .unwrap_or(DEFAULT_CURRENCY);
    catalog::find(requested).unwrap_or_else(|| {
        warn!(currency = requested, fallback = DEFAULT_CURRENCY, "Unsupported currency, using default");
        catalog::default_descriptor()
    })
}

/// Formats `amount` in `currency` (default currency when `None`).
pub fn format_currency<'a>(
    amount: impl Into<RawAmount<'a>>,
    currency: Option<&str>,
    options: &FormatOptions,
) -> String {
    let amount: RawAmount<'a> = amount.into();
    let descriptor = resolve_currency(currency, options.fallback_currency.as_deref());
    let req = FormatRequest {
        value: amount.value(),
        currency: descriptor,
        locale: options.locale.as_deref().unwrap_or(descriptor.locale),
        show_symbol: options.show_symbol,
    };

    STRATEGIES.iter().find_map(|s| s(&req)).unwrap_or_else(|| {
        warn!(currency = descriptor.code, locale = req.locale, "Locale formatting unavailable, using plain format");
        manual(&req)
    })
}

/// Grouped number without a currency symbol.
pub fn format_amount<'a>(amount: impl Into<RawAmount<'a>>, currency: Option<&str>) -> String {
    let options = FormatOptions {
        fallback_currency: Some(DEFAULT_CURRENCY.to_string()),
        ..FormatOptions::without_symbol()
    };
    format_currency(amount, currency, &options)
}

/// `"<min> - <max>"`, or a single value when the bounds match or `max` is empty.
pub fn format_price_range<'a, 'b>(
    min: impl Into<RawAmount<'a>>,
    max: impl Into<RawAmount<'b>>,
    currency: Option<&str>,
) -> String {
    let (min, max) = (min.into(), max.into());
    let options = FormatOptions::default();
    let low = format_currency(min, currency, &options);
    if max.is_absent() || min.value() == max.value() {
        return low;
    }
    format!("{low} - {}", format_currency(max, currency, &options))
}

/// Formats an amount in whatever currency the WooCommerce record carries.
pub fn format_woocommerce_price<'a>(
    amount: impl Into<RawAmount<'a>>,
    record: Option<&serde_json::Value>,
    show_symbol: bool,
) -> String {
    let currency = record.map_or(DEFAULT_CURRENCY, super::detect::detect_currency_from_woocommerce);
    let options = FormatOptions {
        show_symbol,
        fallback_currency: Some(DEFAULT_CURRENCY.to_string()),
        ..FormatOptions::default()
    };
    format_currency(amount, Some(currency), &options)
}

/// Exchange rates are not wired up yet; the amount is returned unchanged.
pub fn convert_currency(amount: f64, from: &str, to: &str) -> f64 {
    if from != to {
        warn!(from, to, "Currency conversion not implemented, returning original amount");
    }
    amount
}
