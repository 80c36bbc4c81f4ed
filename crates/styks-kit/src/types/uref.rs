//! URefs and their access rights.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{InvalidAccessRights, ParseURefError};

const UREF_PREFIX: &str = "uref-";

const READ_BIT: u8 = 0b001;
const WRITE_BIT: u8 = 0b010;
const ADD_BIT: u8 = 0b100;

/// The capability set attached to a [`URef`].
///
/// A closed 3-bit set over {READ, WRITE, ADD}: exactly eight valid values,
/// one named constant per subset. Constructing from a raw bit pattern
/// outside `0..=7` fails with [`InvalidAccessRights`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessRights(u8);

impl AccessRights {
    /// No permissions.
    pub const NONE: Self = Self(0);
    /// Read permission.
    pub const READ: Self = Self(READ_BIT);
    /// Write permission.
    pub const WRITE: Self = Self(WRITE_BIT);
    /// Add permission.
    pub const ADD: Self = Self(ADD_BIT);
    /// Read and write permissions.
    pub const READ_WRITE: Self = Self(READ_BIT | WRITE_BIT);
    /// Read and add permissions.
    pub const READ_ADD: Self = Self(READ_BIT | ADD_BIT);
    /// Add and write permissions.
    pub const ADD_WRITE: Self = Self(ADD_BIT | WRITE_BIT);
    /// Read, add, and write permissions.
    pub const READ_ADD_WRITE: Self = Self(READ_BIT | ADD_BIT | WRITE_BIT);

    /// Build from individual capability flags.
    ///
    /// A bijection onto the eight valid subsets: every combination of flags
    /// yields a distinct value, and every valid value is reachable.
    pub const fn from_bits(read: bool, write: bool, add: bool) -> Self {
        let mut bits = 0;
        if read {
            bits |= READ_BIT;
        }
        if write {
            bits |= WRITE_BIT;
        }
        if add {
            bits |= ADD_BIT;
        }
        Self(bits)
    }

    /// The raw bit pattern.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Can the holder read through the URef?
    pub const fn is_readable(&self) -> bool {
        self.0 & READ_BIT != 0
    }

    /// Can the holder write through the URef?
    pub const fn is_writeable(&self) -> bool {
        self.0 & WRITE_BIT != 0
    }

    /// Can the holder add (commutative update) through the URef?
    pub const fn is_addable(&self) -> bool {
        self.0 & ADD_BIT != 0
    }

    /// Does the URef carry no permissions at all?
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for AccessRights {
    type Error = InvalidAccessRights;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        if bits > 7 {
            return Err(InvalidAccessRights(bits));
        }
        Ok(Self(bits))
    }
}

impl Display for AccessRights {
    /// The three-digit octal form used as the formatted-string suffix,
    /// e.g. `007` for READ_ADD_WRITE.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03o}", self.0)
    }
}

impl Debug for AccessRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            AccessRights::NONE => "NONE",
            AccessRights::READ => "READ",
            AccessRights::WRITE => "WRITE",
            AccessRights::ADD => "ADD",
            AccessRights::READ_WRITE => "READ_WRITE",
            AccessRights::READ_ADD => "READ_ADD",
            AccessRights::ADD_WRITE => "ADD_WRITE",
            AccessRights::READ_ADD_WRITE => "READ_ADD_WRITE",
            _ => unreachable!("invalid access rights cannot be constructed"),
        };
        write!(f, "AccessRights::{}", name)
    }
}

/// A capability-scoped reference to a storage location on chain.
///
/// 32 address bytes plus [`AccessRights`]. The formatted string encodes
/// both: `uref-<64 hex chars>-<3-digit octal rights>`; parsing a canonical
/// string and re-rendering it is byte-identical.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct URef {
    addr: [u8; 32],
    access_rights: AccessRights,
}

impl URef {
    /// The address length in bytes.
    pub const ADDR_LENGTH: usize = 32;

    /// Create from raw address bytes and access rights.
    pub fn new(addr: [u8; 32], access_rights: AccessRights) -> Self {
        Self {
            addr,
            access_rights,
        }
    }

    /// Create from an address byte slice of exactly 32 bytes.
    pub fn from_raw(bytes: &[u8], access_rights: AccessRights) -> Result<Self, ParseURefError> {
        if bytes.len() != Self::ADDR_LENGTH {
            return Err(ParseURefError::InvalidLength {
                expected: Self::ADDR_LENGTH,
                actual: bytes.len(),
            });
        }
        let mut addr = [0u8; 32];
        addr.copy_from_slice(bytes);
        Ok(Self {
            addr,
            access_rights,
        })
    }

    /// Parse from the formatted `uref-<hex>-<rights>` string.
    pub fn from_formatted_str(s: &str) -> Result<Self, ParseURefError> {
        let rest = s
            .strip_prefix(UREF_PREFIX)
            .ok_or_else(|| ParseURefError::InvalidPrefix(s.to_string()))?;

        let (hex_part, rights_part) = rest
            .rsplit_once('-')
            .ok_or(ParseURefError::MissingAccessRights)?;

        let bytes =
            hex::decode(hex_part).map_err(|e| ParseURefError::InvalidHex(e.to_string()))?;

        // Exactly three octal digits; a longer suffix or stray characters
        // must not alias a valid pattern.
        if rights_part.len() != 3 {
            return Err(ParseURefError::MissingAccessRights);
        }
        let bits = u8::from_str_radix(rights_part, 8)
            .map_err(|_| ParseURefError::MissingAccessRights)?;
        let access_rights = AccessRights::try_from(bits)?;

        Self::from_raw(&bytes, access_rights)
    }

    /// Render the canonical formatted string.
    pub fn to_formatted_string(&self) -> String {
        format!(
            "{}{}-{}",
            UREF_PREFIX,
            hex::encode(self.addr),
            self.access_rights
        )
    }

    /// The raw address bytes.
    pub const fn addr(&self) -> &[u8; 32] {
        &self.addr
    }

    /// The access rights attached to this URef.
    pub const fn access_rights(&self) -> AccessRights {
        self.access_rights
    }
}

impl FromStr for URef {
    type Err = ParseURefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_formatted_str(s)
    }
}

impl Display for URef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_formatted_string())
    }
}

impl Debug for URef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "URef({}, {:?})",
            hex::encode(self.addr),
            self.access_rights
        )
    }
}

impl Serialize for URef {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_formatted_string())
    }
}

impl<'de> Deserialize<'de> for URef {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_RIGHTS: [AccessRights; 8] = [
        AccessRights::NONE,
        AccessRights::READ,
        AccessRights::WRITE,
        AccessRights::ADD,
        AccessRights::READ_WRITE,
        AccessRights::READ_ADD,
        AccessRights::ADD_WRITE,
        AccessRights::READ_ADD_WRITE,
    ];

    #[test]
    fn test_from_bits_is_bijection() {
        let mut seen = Vec::new();
        for read in [false, true] {
            for write in [false, true] {
                for add in [false, true] {
                    let rights = AccessRights::from_bits(read, write, add);
                    assert_eq!(rights.is_readable(), read);
                    assert_eq!(rights.is_writeable(), write);
                    assert_eq!(rights.is_addable(), add);
                    assert!(!seen.contains(&rights.bits()));
                    seen.push(rights.bits());
                }
            }
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_invalid_bit_patterns_rejected() {
        for bits in 8..=255u8 {
            assert_eq!(AccessRights::try_from(bits), Err(InvalidAccessRights(bits)));
        }
        for bits in 0..=7u8 {
            assert_eq!(AccessRights::try_from(bits).unwrap().bits(), bits);
        }
    }

    #[test]
    fn test_predicates() {
        assert!(AccessRights::NONE.is_none());
        assert!(!AccessRights::NONE.is_readable());
        assert!(AccessRights::READ_ADD_WRITE.is_readable());
        assert!(AccessRights::READ_ADD_WRITE.is_writeable());
        assert!(AccessRights::READ_ADD_WRITE.is_addable());
        assert!(AccessRights::READ_ADD.is_addable());
        assert!(!AccessRights::READ_ADD.is_writeable());
    }

    #[test]
    fn test_rights_suffix_rendering() {
        assert_eq!(AccessRights::NONE.to_string(), "000");
        assert_eq!(AccessRights::READ.to_string(), "001");
        assert_eq!(AccessRights::WRITE.to_string(), "002");
        assert_eq!(AccessRights::READ_WRITE.to_string(), "003");
        assert_eq!(AccessRights::ADD.to_string(), "004");
        assert_eq!(AccessRights::READ_ADD_WRITE.to_string(), "007");
    }

    #[test]
    fn test_uref_formatted_round_trip_for_every_rights_value() {
        let addr = [0xabu8; 32];
        for rights in ALL_RIGHTS {
            let uref = URef::new(addr, rights);
            let formatted = uref.to_formatted_string();
            let parsed = URef::from_formatted_str(&formatted).unwrap();
            assert_eq!(parsed, uref);
            assert_eq!(parsed.to_formatted_string(), formatted);
        }
    }

    #[test]
    fn test_uref_canonical_form() {
        let s = "uref-abababababababababababababababababababababababababababababababab-005";
        let uref = URef::from_formatted_str(s).unwrap();
        assert_eq!(uref.to_formatted_string(), s);
        assert_eq!(uref.access_rights(), AccessRights::READ_ADD);
    }

    #[test]
    fn test_uref_malformed_strings_rejected() {
        // Wrong prefix
        assert!(matches!(
            URef::from_formatted_str("href-ab-001"),
            Err(ParseURefError::InvalidPrefix(_))
        ));
        // No rights suffix
        assert!(matches!(
            URef::from_formatted_str(
                "uref-abababababababababababababababababababababababababababababababab"
            ),
            Err(ParseURefError::MissingAccessRights)
        ));
        // Rights out of range
        assert!(matches!(
            URef::from_formatted_str(
                "uref-abababababababababababababababababababababababababababababababab-010"
            ),
            Err(ParseURefError::InvalidAccessRights(InvalidAccessRights(8)))
        ));
        // Bad hex
        assert!(matches!(
            URef::from_formatted_str("uref-zz-001"),
            Err(ParseURefError::InvalidHex(_))
        ));
        // Short address
        assert!(matches!(
            URef::from_formatted_str("uref-abab-001"),
            Err(ParseURefError::InvalidLength {
                expected: 32,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_from_raw_length_checked() {
        assert!(URef::from_raw(&[0u8; 32], AccessRights::READ).is_ok());
        assert!(matches!(
            URef::from_raw(&[0u8; 31], AccessRights::READ),
            Err(ParseURefError::InvalidLength {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn test_serde_as_formatted_string() {
        let uref = URef::new([1u8; 32], AccessRights::READ_WRITE);
        let json = serde_json::to_string(&uref).unwrap();
        let back: URef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uref);
    }
}
