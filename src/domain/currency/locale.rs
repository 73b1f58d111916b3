//! Number formatting conventions for the locales the dashboard renders in.

use super::catalog::CurrencyDescriptor;

/// No-break space, used between symbol and digits where a locale asks for one.
const NBSP: &str = "\u{a0}";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocaleConventions {
    pub tag: &'static str,
    /// Currency whose bare local symbol this locale shows (`$` for CAD under en-CA).
    pub home_currency: &'static str,
    pub home_symbol: &'static str,
    pub group_separator: &'static str,
    pub decimal_separator: &'static str,
    pub symbol_after: bool,
    pub symbol_spacing: &'static str,
    /// Integers need at least `3 + min_grouping_digits` digits before they are grouped.
    pub min_grouping_digits: usize,
}

static LOCALES: [LocaleConventions; 7] = [
    LocaleConventions { tag: "es-MX", home_currency: "MXN", home_symbol: "$", group_separator: ",", decimal_separator: ".", symbol_after: false, symbol_spacing: "", min_grouping_digits: 1 },
    LocaleConventions { tag: "en-US", home_currency: "USD", home_symbol: "$", group_separator: ",", decimal_separator: ".", symbol_after: false, symbol_spacing: "", min_grouping_digits: 1 },
    LocaleConventions { tag: "en-GB", home_currency: "GBP", home_symbol: "£", group_separator: ",", decimal_separator: ".", symbol_after: false, symbol_spacing: "", min_grouping_digits: 1 },
    LocaleConventions { tag: "en-CA", home_currency: "CAD", home_symbol: "$", group_separator: ",", decimal_separator: ".", symbol_after: false, symbol_spacing: "", min_grouping_digits: 1 },
    LocaleConventions { tag: "es-ES", home_currency: "EUR", home_symbol: "€", group_separator: ".", decimal_separator: ",", symbol_after: true, symbol_spacing: NBSP, min_grouping_digits: 2 },
    LocaleConventions { tag: "es-CO", home_currency: "COP", home_symbol: "$", group_separator: ".", decimal_separator: ",", symbol_after: false, symbol_spacing: NBSP, min_grouping_digits: 1 },
    LocaleConventions { tag: "es-AR", home_currency: "ARS", home_symbol: "$", group_separator: ".", decimal_separator: ",", symbol_after: false, symbol_spacing: NBSP, min_grouping_digits: 1 },
];

/// Looks up a locale tag, ignoring ASCII case and accepting `_` for `-`.
pub fn conventions(tag: &str) -> Option<&'static LocaleConventions> {
    let normalized = tag.trim().replace('_', "-");
    LOCALES.iter().find(|l| l.tag.eq_ignore_ascii_case(&normalized))
}

impl LocaleConventions {
    /// Renders a finite number with `fraction_digits` decimals, grouped per locale.
    /// Returns `None` for NaN or infinities.
    pub fn format_number(&self, value: f64, fraction_digits: usize) -> Option<String> {
        if !value.is_finite() {
            return None;
        }
        let fixed = fixed_digits(value.abs(), fraction_digits);
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let mut out = String::with_capacity(fixed.len() + 4);
        if value.is_sign_negative() && !is_zero_digits(&fixed) {
            out.push('-');
        }
        out.push_str(&self.group(int_part));
        if let Some(frac) = frac_part {
            out.push_str(self.decimal_separator);
            out.push_str(frac);
        }
        Some(out)
    }

    /// The symbol `currency` is displayed with under this locale.
    pub fn symbol_for(&self, currency: &CurrencyDescriptor) -> &'static str {
        if currency.code == self.home_currency { self.home_symbol } else { currency.intl_symbol }
    }

    /// Renders a finite number as a currency string with the given symbol.
    pub fn format_money(&self, value: f64, fraction_digits: usize, symbol: &str) -> Option<String> {
        let number = self.format_number(value, fraction_digits)?;
        let (sign, digits) = match number.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", number.as_str()),
        };
        Some(if self.symbol_after {
            format!("{sign}{digits}{}{symbol}", self.symbol_spacing)
        } else {
            format!("{sign}{symbol}{}{digits}", self.symbol_spacing)
        })
    }

    fn group(&self, digits: &str) -> String {
        if digits.len() < 3 + self.min_grouping_digits {
            return digits.to_string();
        }
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        let lead = digits.len() % 3;
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - lead) % 3 == 0 {
                grouped.push_str(self.group_separator);
            }
            grouped.push(ch);
        }
        grouped
    }
}

/// `magnitude` with `digits` decimals, rounding exact ties away from zero.
///
/// `format!` rounds ties to even, so `0.125` would become `0.12`. Values that only look like ties
/// (`1.115` is stored as `1.11499...`) round by their stored value.
pub(crate) fn fixed_digits(magnitude: f64, digits: usize) -> String {
    if !is_exact_tie(magnitude, digits) {
        return format!("{:.*}", digits, magnitude);
    }
    // A tie has exactly `digits + 1` decimals, the last being 5.
    let mut tie = format!("{:.*}", digits + 1, magnitude).into_bytes();
    tie.pop();
    if tie.last() == Some(&b'.') {
        tie.pop();
    }
    let mut carry = true;
    for b in tie.iter_mut().rev() {
        match *b {
            b'.' => continue,
            b'9' => *b = b'0',
            _ => {
                *b += 1;
                carry = false;
                break;
            }
        }
    }
    let rounded = String::from_utf8_lossy(&tie).into_owned();
    if carry { format!("1{rounded}") } else { rounded }
}

/// True when `magnitude` sits exactly halfway between two multiples of `10^-digits`, that is
/// when `magnitude * 2 * 10^digits` is an odd integer.
fn is_exact_tie(magnitude: f64, digits: usize) -> bool {
    if !magnitude.is_finite() || magnitude == 0.0 {
        return false;
    }
    let bits = magnitude.abs().to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let mut mantissa = bits & ((1u64 << 52) - 1);
    let mut exponent = if biased == 0 {
        -1074
    } else {
        mantissa |= 1 << 52;
        biased - 1075
    };
    let shift = mantissa.trailing_zeros();
    mantissa >>= shift;
    exponent += i64::from(shift);
    // magnitude = odd * 2^exponent, and odd * 5^digits stays odd.
    exponent + 1 + digits as i64 == 0
}

fn is_zero_digits(s: &str) -> bool {
    s.chars().all(|c| c == '0' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_en_us() {
        let l = conventions("en-US").unwrap();
        assert_eq!(l.format_number(1234567.891, 2).unwrap(), "1,234,567.89");
        assert_eq!(l.format_number(999.0, 2).unwrap(), "999.00");
        assert_eq!(l.format_number(1000.0, 0).unwrap(), "1,000");
    }

    #[test]
    fn test_es_es_skips_four_digit_grouping() {
        let l = conventions("es-ES").unwrap();
        assert_eq!(l.format_number(1234.5, 2).unwrap(), "1234,50");
        assert_eq!(l.format_number(12345.5, 2).unwrap(), "12.345,50");
    }

    #[test]
    fn test_money_placement() {
        assert_eq!(conventions("es-MX").unwrap().format_money(-1500.0, 2, "$").unwrap(), "-$1,500.00");
        assert_eq!(conventions("es-ES").unwrap().format_money(12345.0, 2, "€").unwrap(), "12.345,00\u{a0}€");
        assert_eq!(conventions("es-CO").unwrap().format_money(15000.0, 0, "$").unwrap(), "$\u{a0}15.000");
    }

    #[test]
    fn test_symbol_depends_on_home_currency() {
        let cad = crate::domain::currency::catalog::find("CAD").unwrap();
        let usd = crate::domain::currency::catalog::find("USD").unwrap();
        assert_eq!(conventions("en-CA").unwrap().symbol_for(cad), "$");
        assert_eq!(conventions("en-US").unwrap().symbol_for(cad), "CA$");
        assert_eq!(conventions("es-ES").unwrap().symbol_for(usd), "US$");
        assert_eq!(conventions("en-US").unwrap().symbol_for(usd), "$");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        let l = conventions("en-US").unwrap();
        assert_eq!(l.format_number(-0.001, 2).unwrap(), "0.00");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(fixed_digits(0.125, 2), "0.13");
        assert_eq!(fixed_digits(15000.5, 0), "15001");
        assert_eq!(fixed_digits(99.5, 0), "100");
        assert_eq!(fixed_digits(9.995, 2), "9.99");
        assert_eq!(fixed_digits(1.115, 2), "1.11");
        assert_eq!(fixed_digits(2.675, 2), "2.67");
        assert_eq!(fixed_digits(0.5, 0), "1");
        assert_eq!(fixed_digits(0.0, 2), "0.00");
        let l = conventions("es-CO").unwrap();
        assert_eq!(l.format_money(1999.5, 0, "$").unwrap(), "$\u{a0}2.000");
        assert_eq!(conventions("en-US").unwrap().format_money(-0.125, 2, "$").unwrap(), "-$0.13");
    }

    #[test]
    fn test_unknown_locale_and_non_finite() {
        assert!(conventions("xx-YY").is_none());
        assert_eq!(conventions("en_us").map(|l| l.tag), Some("en-US"));
        assert!(conventions("en-US").unwrap().format_number(f64::INFINITY, 2).is_none());
    }
}
