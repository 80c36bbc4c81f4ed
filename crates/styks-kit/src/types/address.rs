//! Account and contract addresses.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseAddressError;
use crate::types::{Digest, PublicKey};

const ACCOUNT_HASH_PREFIX: &str = "account-hash-";
const CONTRACT_HASH_PREFIX: &str = "hash-";

/// The blake2b-256 hash identifying an account.
///
/// Formatted as `account-hash-<64 hex chars>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountHash([u8; 32]);

impl AccountHash {
    /// Create from raw 32 bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a raw byte slice of exactly 32 bytes.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, ParseAddressError> {
        if bytes.len() != 32 {
            return Err(ParseAddressError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Get the raw 32 bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the `account-hash-<hex>` form.
    pub fn to_formatted_string(&self) -> String {
        format!("{}{}", ACCOUNT_HASH_PREFIX, hex::encode(self.0))
    }
}

impl From<&PublicKey> for AccountHash {
    fn from(key: &PublicKey) -> Self {
        Self(*key.to_account_hash().as_bytes())
    }
}

impl Display for AccountHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_formatted_string())
    }
}

impl Debug for AccountHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountHash({})", hex::encode(self.0))
    }
}

/// An account or contract locator.
///
/// The formatted string carries the variant as a discriminant prefix:
/// `account-hash-<64 hex>` for accounts, `hash-<64 hex>` for contracts.
/// `to_formatted_string` reproduces canonical input byte-identically.
///
/// `Address` is a plain value type: `Clone` but deliberately not `Copy`.
/// Request-building APIs take it by value, so accidental reuse of a
/// moved-out address is a compile error and deliberate reuse is an explicit
/// `.clone()`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Address {
    /// An account, identified by its account hash.
    Account(AccountHash),
    /// A contract, identified by its package hash.
    Contract(Digest),
}

impl Address {
    /// Parse from a formatted string, dispatching on the prefix.
    pub fn from_formatted_str(s: &str) -> Result<Self, ParseAddressError> {
        if let Some(hex_part) = s.strip_prefix(ACCOUNT_HASH_PREFIX) {
            let bytes = decode_hex(hex_part)?;
            Ok(Address::Account(AccountHash::from_raw(&bytes)?))
        } else if let Some(hex_part) = s.strip_prefix(CONTRACT_HASH_PREFIX) {
            let bytes = decode_hex(hex_part)?;
            let digest = Digest::from_raw(&bytes).map_err(|_| ParseAddressError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
            Ok(Address::Contract(digest))
        } else {
            Err(ParseAddressError::InvalidPrefix(s.to_string()))
        }
    }

    /// Render the canonical formatted string.
    pub fn to_formatted_string(&self) -> String {
        match self {
            Address::Account(hash) => hash.to_formatted_string(),
            Address::Contract(digest) => format!("{}{}", CONTRACT_HASH_PREFIX, digest),
        }
    }

    /// Address of the account owning the given public key.
    pub fn from_public_key(key: &PublicKey) -> Self {
        Address::Account(AccountHash::from(key))
    }

    /// Is this an account address?
    pub fn is_account(&self) -> bool {
        matches!(self, Address::Account(_))
    }

    /// Is this a contract address?
    pub fn is_contract(&self) -> bool {
        matches!(self, Address::Contract(_))
    }

    /// Get the underlying 32 hash bytes, whichever variant this is.
    pub fn as_hash_bytes(&self) -> &[u8; 32] {
        match self {
            Address::Account(hash) => hash.as_bytes(),
            Address::Contract(digest) => digest.as_bytes(),
        }
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, ParseAddressError> {
    hex::decode(s).map_err(|e| ParseAddressError::InvalidHex(e.to_string()))
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_formatted_str(s)
    }
}

impl TryFrom<&str> for Address {
    type Error = ParseAddressError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_formatted_string())
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Account(hash) => write!(f, "Address::Account({})", hex::encode(hash.0)),
            Address::Contract(digest) => write!(f, "Address::Contract({})", digest),
        }
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_formatted_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
