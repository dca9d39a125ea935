use std::{fmt, ops::Deref, str::FromStr};

use masking::{Strategy, StrongSecret, WithType};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Raised when a card number fails the checksum.
#[derive(Debug, Deserialize, Serialize, Error)]
#[error("not a valid card number")]
pub struct CardNumberValidationError;

/// Luhn mod-10 checksum over digit characters.
///
/// Any non-digit character fails the check; callers strip display grouping
/// (spaces) before validating.
pub fn valid_luhn(number: &str) -> bool {
    if number.is_empty() {
        return false;
    }

    let mut sum: u32 = 0;
    let mut double = false;
    for character in number.chars().rev() {
        let Some(digit) = character.to_digit(10) else {
            return false;
        };
        let digit = if double {
            let doubled = digit * 2;
            if doubled > 9 {
                doubled - 9
            } else {
                doubled
            }
        } else {
            digit
        };
        sum += digit;
        double = !double;
    }
    sum % 10 == 0
}

/// Card number holding only digits, masked when formatted.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CardNumber(StrongSecret<String, CardNumberStrategy>);

impl FromStr for CardNumber {
    type Err = CardNumberValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.split_whitespace().collect();
        if valid_luhn(&digits) {
            Ok(Self(StrongSecret::new(digits)))
        } else {
            Err(CardNumberValidationError)
        }
    }
}

impl TryFrom<String> for CardNumber {
    type Error = CardNumberValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl Deref for CardNumber {
    type Target = StrongSecret<String, CardNumberStrategy>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CardNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Masking strategy keeping the first six digits visible.
pub enum CardNumberStrategy {}

impl<T> Strategy<T> for CardNumberStrategy
where
    T: AsRef<str>,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val_str: &str = val.as_ref();

        if val_str.len() < 15 || val_str.len() > 19 {
            return WithType::fmt(val, f);
        }

        match val_str.get(..6) {
            Some(bin) => write!(f, "{}{}", bin, "*".repeat(val_str.len() - 6)),
            None => WithType::fmt(val, f),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn luhn_accepts_known_good_number() {
        assert!(valid_luhn("4111111111111111"));
    }

    #[test]
    fn luhn_rejects_off_by_one() {
        assert!(!valid_luhn("4111111111111112"));
    }

    #[test]
    fn luhn_rejects_non_digit_input() {
        assert!(!valid_luhn("4111a11111111111"));
        assert!(!valid_luhn(""));
    }

    #[test]
    fn card_number_strips_grouping_spaces() {
        let number = CardNumber::from_str("4111 1111 1111 1111").unwrap();
        assert_eq!("CardNumber(411111**********)", format!("{number:?}"));
        assert_eq!("411111**********", format!("{}", *number));
    }

    #[test]
    fn invalid_card_number_is_rejected() {
        let err = CardNumber::from_str("4111 1111").unwrap_err();
        assert_eq!("not a valid card number", err.to_string());
    }

    #[test]
    fn serializes_the_full_number() {
        let number = CardNumber::from_str("4111111111111111").unwrap();
        assert_eq!(
            r#""4111111111111111""#,
            serde_json::to_string(&number).unwrap()
        );
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<CardNumber>(r#""1234 5678""#).is_err());
        let number = serde_json::from_str::<CardNumber>(r#""4111 1111 1111 1111""#).unwrap();
        assert_eq!("411111**********", format!("{}", *number));
    }
}
