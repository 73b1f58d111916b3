//! Value Objects for currency display

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

use crate::domain::currency::catalog::{self, CurrencyDescriptor};

/// A raw amount as it arrives from forms or backend payloads.
///
/// Absent or unparseable input is worth zero; it is never an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawAmount<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
}

impl<'a> RawAmount<'a> {
    /// The parsed value, `NaN` for unparseable input.
    fn parsed(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => parse_float(s),
            Self::Missing => f64::NAN,
        }
    }

    /// The numeric value, with absent and unparseable input treated as zero.
    pub fn value(&self) -> f64 {
        let v = self.parsed();
        if v.is_nan() { 0.0 } else { v }
    }

    /// True for input a form would consider empty: missing, `""`, numeric zero or NaN.
    /// A non-empty string such as `"0"` is present.
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(n) => *n == 0.0 || n.is_nan(),
        }
    }
}

/// Leading-prefix float parsing: `"12.5kg"` is 12.5, `"abc"` is NaN.
fn parse_float(input: &str) -> f64 {
    static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
    });
    NUMERIC_PREFIX
        .find(input.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

impl From<f64> for RawAmount<'_> { fn from(v: f64) -> Self { Self::Number(v) } }
impl From<f32> for RawAmount<'_> { fn from(v: f32) -> Self { Self::Number(v.into()) } }
impl From<i32> for RawAmount<'_> { fn from(v: i32) -> Self { Self::Number(v.into()) } }
impl From<u32> for RawAmount<'_> { fn from(v: u32) -> Self { Self::Number(v.into()) } }
impl From<i64> for RawAmount<'_> { fn from(v: i64) -> Self { Self::Number(v as f64) } }
impl From<u64> for RawAmount<'_> { fn from(v: u64) -> Self { Self::Number(v as f64) } }
impl<'a> From<&'a str> for RawAmount<'a> { fn from(v: &'a str) -> Self { Self::Text(v) } }
impl<'a> From<&'a String> for RawAmount<'a> { fn from(v: &'a String) -> Self { Self::Text(v) } }

impl<'a, T: Into<RawAmount<'a>>> From<Option<T>> for RawAmount<'a> {
    fn from(v: Option<T>) -> Self { v.map_or(Self::Missing, Into::into) }
}

/// WooCommerce reports prices as strings and totals as numbers, sometimes both.
impl<'a> From<&'a serde_json::Value> for RawAmount<'a> {
    fn from(v: &'a serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Missing,
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::Text(s),
            _ => Self::Number(f64::NAN),
        }
    }
}

/// A currency code known to the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CurrencyCode(&'static str);

impl CurrencyCode {
    /// Accepts any casing of a catalog code (`"usd"` becomes `USD`).
    pub fn parse(value: &str) -> Result<Self, CurrencyError> {
        if value.is_empty() { return Err(CurrencyError::Empty); }
        catalog::find(&value.to_uppercase())
            .map(|d| Self(d.code))
            .ok_or_else(|| CurrencyError::Unsupported(value.to_string()))
    }
    pub fn as_str(&self) -> &'static str { self.0 }
    pub fn descriptor(&self) -> &'static CurrencyDescriptor {
        catalog::find(self.0).unwrap_or_else(catalog::default_descriptor)
    }
}

impl Default for CurrencyCode {
    fn default() -> Self { Self(catalog::DEFAULT_CURRENCY) }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    #[error("currency code empty")]
    Empty,
    #[error("unsupported currency: {0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(RawAmount::from("12.5kg").value(), 12.5);
        assert_eq!(RawAmount::from("  -3e2").value(), -300.0);
        assert_eq!(RawAmount::from(".5").value(), 0.5);
        assert_eq!(RawAmount::from("abc").value(), 0.0);
        assert_eq!(RawAmount::from("").value(), 0.0);
        assert!(RawAmount::from("Infinity").value().is_infinite());
    }

    #[test]
    fn test_missing_is_zero() {
        assert_eq!(RawAmount::from(None::<f64>).value(), 0.0);
        assert_eq!(RawAmount::from(f64::NAN).value(), 0.0);
        assert_eq!(RawAmount::from(&serde_json::Value::Null).value(), 0.0);
        assert_eq!(RawAmount::from(&serde_json::json!("19.99")).value(), 19.99);
        assert_eq!(RawAmount::from(&serde_json::json!(true)).value(), 0.0);
    }

    #[test]
    fn test_absent() {
        assert!(RawAmount::Missing.is_absent());
        assert!(RawAmount::from("").is_absent());
        assert!(RawAmount::from(0).is_absent());
        assert!(!RawAmount::from("0").is_absent());
        assert!(!RawAmount::from(20).is_absent());
    }

    #[test]
    fn test_currency_code() {
        assert_eq!(CurrencyCode::parse("usd").unwrap().as_str(), "USD");
        assert_eq!(CurrencyCode::parse(""), Err(CurrencyError::Empty));
        assert!(matches!(CurrencyCode::parse("ZZZ"), Err(CurrencyError::Unsupported(_))));
        assert_eq!(CurrencyCode::default().to_string(), "MXN");
    }
}
