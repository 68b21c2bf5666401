//! Amount type for whole-dollar donation values.
//!
//! Salesforce reports opportunity amounts as JSON numbers, but seed data and hand-edited exports
//! may carry them as strings. This module coerces either one into a `Decimal` and truncates it to
//! whole dollars.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Represents a dollar amount with no cents.
///
/// # Examples
///
/// Fractional dollars are truncated, not rounded:
/// ```
/// # use giving_levels::model::Amount;
/// # use rust_decimal::Decimal;
/// # use std::str::FromStr;
/// let amount = Amount::new(Decimal::from_str("99.99").unwrap());
/// assert_eq!(amount.value(), Decimal::from(99));
/// assert_eq!(amount.to_string(), "$99");
/// ```
///
/// Thousands separators when displayed:
/// ```
/// # use giving_levels::model::Amount;
/// assert_eq!(Amount::from_dollars(12500).to_string(), "$12,500");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount {
        value: Decimal::ZERO,
    };

    /// Creates a new `Amount`, dropping anything after the decimal point.
    pub fn new(value: Decimal) -> Self {
        Self {
            value: value.trunc(),
        }
    }

    pub fn from_dollars(dollars: i64) -> Self {
        Self {
            value: Decimal::from(dollars),
        }
    }

    /// Returns the underlying Decimal value. It never has a fractional part.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }

    /// Coerces a raw field value to a number. Returns `None` for anything that is not numeric,
    /// which includes `null`, booleans and strings that do not parse as a decimal number.
    /// Thousands separators and currency symbols are not numeric.
    pub fn coerce(value: &Value) -> Option<Decimal> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Decimal::from(i)),
                None => n.as_f64().and_then(Decimal::from_f64),
            },
            Value::String(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
            _ => None,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.value.abs().to_f64().unwrap_or_default();
        write!(f, "{sign}${}", format_num::format_num!(",.0f", num))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount {
            value: self.value + rhs.value,
        }
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.value += rhs.value;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_truncates() {
        assert_eq!(
            Amount::new(Decimal::from_str("10.9").unwrap()).value(),
            Decimal::from(10)
        );
        assert_eq!(
            Amount::new(Decimal::from_str("0.5").unwrap()).value(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(Amount::coerce(&json!(25)), Some(Decimal::from(25)));
        assert_eq!(
            Amount::coerce(&json!(25.75)),
            Some(Decimal::from_str("25.75").unwrap())
        );
    }

    #[test]
    fn test_coerce_string() {
        assert_eq!(Amount::coerce(&json!("1")), Some(Decimal::from(1)));
        assert_eq!(
            Amount::coerce(&json!(" 1500.50 ")),
            Some(Decimal::from_str("1500.50").unwrap())
        );
        assert_eq!(Amount::coerce(&json!("1e3")), Some(Decimal::from(1000)));
    }

    #[test]
    fn test_coerce_not_numeric() {
        assert_eq!(Amount::coerce(&json!(null)), None);
        assert_eq!(Amount::coerce(&json!(true)), None);
        assert_eq!(Amount::coerce(&json!("ten dollars")), None);
        assert_eq!(Amount::coerce(&json!("$1,000")), None);
        assert_eq!(Amount::coerce(&json!("")), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::ZERO.to_string(), "$0");
        assert_eq!(Amount::from_dollars(49).to_string(), "$49");
        assert_eq!(Amount::from_dollars(1500).to_string(), "$1,500");
        assert_eq!(Amount::from_dollars(-2500).to_string(), "-$2,500");
    }

    #[test]
    fn test_sum() {
        let total: Amount = [500, 500, 250]
            .into_iter()
            .map(Amount::from_dollars)
            .sum();
        assert_eq!(total, Amount::from_dollars(1250));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&Amount::from_dollars(1000)).unwrap();
        assert_eq!(json, "\"$1,000\"");
    }
}
