//! Exact monetary amounts stored as whole cents.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::Error;

/// An amount of money as a whole number of cents.
///
/// Sums and comparisons are done on the integer so totals never drift.
/// In JSON the amount is rendered as a number with at most two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

/// The largest amount a single transaction may have: 999,999,999.99.
///
/// Summing over nine million such amounts still fits in an `i64`.
pub const MAX_AMOUNT: Money = Money(99_999_999_999);

impl Money {
    /// Zero cents.
    pub const ZERO: Money = Money(0);

    /// Create an amount from a number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount as a number of cents.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Parse a positive amount with at most two decimal places, e.g. "12", "12.5" or "12.50".
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if `text` is not a plain decimal number,
    /// has more than two decimal places, is not greater than zero or is more than [MAX_AMOUNT].
    pub fn parse_positive(text: &str) -> Result<Self, Error> {
        let text = text.trim();
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (text, ""),
        };

        let is_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
            return Err(Error::validation("Amount must be a number"));
        }

        if fraction.len() > 2 {
            return Err(Error::validation(
                "Amount cannot have more than 2 decimal places",
            ));
        }

        let too_large = || Error::validation(format!("Amount cannot exceed {MAX_AMOUNT}"));

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| too_large())?
        };
        let fraction: i64 = format!("{fraction:0<2}")
            .parse()
            .map_err(|_| Error::validation("Amount must be a number"))?;

        let cents = whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction))
            .ok_or_else(too_large)?;

        if cents <= 0 {
            return Err(Error::validation("Amount must be greater than 0"));
        }

        if cents > MAX_AMOUNT.0 {
            return Err(too_large());
        }

        Ok(Self(cents))
    }

    /// The amount as a floating point number of whole currency units, for display only.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();

        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |total, amount| total + amount)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse_positive(s)
    }
}

/// An amount exactly as the client sent it: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// e.g. `12.5`
    Number(serde_json::Number),
    /// e.g. `"12.50"`
    Text(String),
}

impl RawAmount {
    /// Validate the amount, see [Money::parse_positive].
    pub fn to_money(&self) -> Result<Money, Error> {
        match self {
            RawAmount::Number(number) => Money::parse_positive(&number.to_string()),
            RawAmount::Text(text) => Money::parse_positive(text),
        }
    }
}

/// A signed amount in basis points of a percent, i.e. hundredths of a percent.
///
/// Serialized as a number with at most two decimals, e.g. 3333 → `33.33`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Percentage(i64);

impl Percentage {
    /// The share of `part` in `total`, rounded half up to two decimal places.
    ///
    /// Returns zero when `total` is zero.
    pub fn of(part: Money, total: Money) -> Self {
        if total.cents() == 0 {
            return Percentage(0);
        }

        let numerator = i128::from(part.cents()) * 10_000;
        let denominator = i128::from(total.cents());
        let rounded = (2 * numerator + denominator) / (2 * denominator);

        Percentage(rounded as i64)
    }

    /// The percentage in hundredths of a percent.
    pub fn hundredths(&self) -> i64 {
        self.0
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

#[cfg(test)]
mod money_tests {
    use serde_json::json;

    use crate::Error;

    use super::{MAX_AMOUNT, Money, RawAmount};

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(Money::parse_positive("12"), Ok(Money::from_cents(1200)));
        assert_eq!(Money::parse_positive("12.5"), Ok(Money::from_cents(1250)));
        assert_eq!(Money::parse_positive("12.05"), Ok(Money::from_cents(1205)));
        assert_eq!(Money::parse_positive(".5"), Ok(Money::from_cents(50)));
        assert_eq!(Money::parse_positive(" 0.01 "), Ok(Money::from_cents(1)));
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        let want = Err(Error::validation("Amount must be greater than 0"));

        assert_eq!(Money::parse_positive("0"), want);
        assert_eq!(Money::parse_positive("0.00"), want);
        assert_eq!(
            Money::parse_positive("-5"),
            Err(Error::validation("Amount must be a number"))
        );
    }

    #[test]
    fn rejects_too_many_decimal_places() {
        assert_eq!(
            Money::parse_positive("1.005"),
            Err(Error::validation(
                "Amount cannot have more than 2 decimal places"
            ))
        );
    }

    #[test]
    fn rejects_non_numeric_text() {
        for text in ["", ".", "abc", "1e3", "1.2.3", "1,000"] {
            assert!(
                Money::parse_positive(text).is_err(),
                "want error for {text:?}"
            );
        }
    }

    #[test]
    fn rejects_amounts_above_the_maximum() {
        let want = Err(Error::validation("Amount cannot exceed 999999999.99"));

        assert_eq!(Money::parse_positive("999999999.99"), Ok(MAX_AMOUNT));
        assert_eq!(Money::parse_positive("1000000000"), want);
        assert_eq!(Money::parse_positive("92233720368547758.07"), want);
        assert_eq!(Money::parse_positive("999999999999999999999"), want);
    }

    #[test]
    fn raw_amount_accepts_numbers_and_strings() {
        let number: RawAmount = serde_json::from_value(json!(100.1)).unwrap();
        let text: RawAmount = serde_json::from_value(json!("100.10")).unwrap();
        let integer: RawAmount = serde_json::from_value(json!(50)).unwrap();

        assert_eq!(number.to_money(), Ok(Money::from_cents(10010)));
        assert_eq!(text.to_money(), Ok(Money::from_cents(10010)));
        assert_eq!(integer.to_money(), Ok(Money::from_cents(5000)));
    }

    #[test]
    fn sums_exactly() {
        let total: Money = std::iter::repeat_n(Money::from_cents(10), 3).sum();

        assert_eq!(total, Money::from_cents(30));
        assert_eq!(total.to_string(), "0.30");
    }

    #[test]
    fn displays_negative_amounts() {
        assert_eq!(Money::from_cents(-15000).to_string(), "-150.00");
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(
            serde_json::to_value(Money::from_cents(15000)).unwrap(),
            json!(150.0)
        );
    }
}
