//! Fixed-width unsigned big-integer amounts.
//!
//! `U128`, `U256`, and `U512` share identical semantics; only the bit width
//! differs. They are codecs, not calculators: construction from decimal
//! strings or native integers, canonical decimal rendering, and the chain's
//! JSON numeric-string convention. Contract arithmetic happens on the node.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseUintError;

macro_rules! impl_wide_uint {
    ($name:ident, $inner:ty, $bits:expr) => {
        #[doc = concat!("An unsigned ", stringify!($bits), "-bit integer amount.")]
        ///
        /// Parses from canonical unsigned decimal; parsing fails with
        /// [`ParseUintError::InvalidCharacter`] on any non-digit input and
        /// with [`ParseUintError::Overflow`] when the magnitude exceeds the
        /// width — never by truncating or wrapping.
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name($inner);

        impl $name {
            /// The zero value.
            pub const ZERO: Self = Self(<$inner>::zero());

            /// The largest representable value.
            pub const MAX: Self = Self(<$inner>::MAX);

            /// Parse from an unsigned decimal string.
            pub fn from_dec_str(s: &str) -> Result<Self, ParseUintError> {
                if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ParseUintError::InvalidCharacter(s.to_string()));
                }
                // All characters are digits, so the only remaining failure
                // is a magnitude exceeding the width.
                <$inner>::from_dec_str(s)
                    .map(Self)
                    .map_err(|_| ParseUintError::Overflow)
            }

            /// Is this zero?
            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(<$inner>::from(value))
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(<$inner>::from(value))
            }
        }

        impl FromStr for $name {
            type Err = ParseUintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_dec_str(s)
            }
        }

        impl Display for $name {
            /// Canonical unsigned decimal: no leading zeros, `"0"` for zero.
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s: String = serde::Deserialize::deserialize(d)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_wide_uint!(U128, primitive_types::U128, 128);
impl_wide_uint!(U256, primitive_types::U256, 256);
impl_wide_uint!(U512, primitive_types::U512, 512);

#[cfg(test)]
mod tests {
    use super::*;

    const U128_MAX: &str = "340282366920938463463374607431768211455";
    const U256_MAX: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639935";

    #[test]
    fn test_from_u32_matches_native_rendering() {
        for n in [0u32, 1, 42, 1_000_000, u32::MAX] {
            assert_eq!(U128::from(n).to_string(), n.to_string());
            assert_eq!(U256::from(n).to_string(), n.to_string());
            assert_eq!(U512::from(n).to_string(), n.to_string());
        }
    }

    #[test]
    fn test_from_u64_zero_extended() {
        assert_eq!(U128::from(u64::MAX).to_string(), u64::MAX.to_string());
        assert_eq!(U512::from(u64::MAX).to_string(), u64::MAX.to_string());
    }

    #[test]
    fn test_decimal_round_trip() {
        for s in ["0", "1", "2500000000", U128_MAX] {
            assert_eq!(U128::from_dec_str(s).unwrap().to_string(), s);
        }
        assert_eq!(U256::from_dec_str(U256_MAX).unwrap().to_string(), U256_MAX);
    }

    #[test]
    fn test_non_digit_input_rejected() {
        for s in ["", " 1", "1 ", "12x4", "-1", "+1", "0x10", "1.5"] {
            assert_eq!(
                U128::from_dec_str(s),
                Err(ParseUintError::InvalidCharacter(s.to_string())),
                "input: {s:?}"
            );
        }
    }

    #[test]
    fn test_overflow_fails_never_truncates() {
        // U128::MAX + 1
        assert_eq!(
            U128::from_dec_str("340282366920938463463374607431768211456"),
            Err(ParseUintError::Overflow)
        );
        // The same value fits wider widths.
        assert!(U256::from_dec_str("340282366920938463463374607431768211456").is_ok());

        // U256::MAX + 1
        let u256_overflow =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert_eq!(U256::from_dec_str(u256_overflow), Err(ParseUintError::Overflow));
        assert!(U512::from_dec_str(u256_overflow).is_ok());
    }

    #[test]
    fn test_leading_zeros_parse_to_canonical_form() {
        assert_eq!(U128::from_dec_str("007").unwrap().to_string(), "7");
        assert_eq!(U128::from_dec_str("000").unwrap().to_string(), "0");
    }

    #[test]
    fn test_serde_numeric_string_convention() {
        let value = U512::from_dec_str("2500000000").unwrap();
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"2500000000\"");
        let back: U512 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_max_constants() {
        assert_eq!(U128::MAX.to_string(), U128_MAX);
        assert_eq!(U256::MAX.to_string(), U256_MAX);
    }
}
