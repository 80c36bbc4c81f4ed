//! Role-based access control types shared by the Styks contracts.
//!
//! Standard role-hierarchy semantics, enforced node-side: every role has
//! exactly one admin role; only holders of the admin role may grant or
//! revoke; an account may always renounce its own role. The client only
//! transports role identifiers and passes the contract's verdicts through.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseDigestError;
use crate::types::Address;

/// A 32-byte role identifier.
///
/// The named constants are the identifiers the deployed contracts use; the
/// two contracts deliberately do not overlap beyond the shared admin role.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Role([u8; 32]);

impl Role {
    /// The default admin role, admin of every other role until changed.
    pub const ADMIN: Self = Self([0; 32]);
    /// May update the price-feed configuration.
    pub const CONFIG_MANAGER: Self = Self([1; 32]);
    /// May push prices into the feed.
    pub const PRICE_SUPPLIER: Self = Self([2; 32]);
    /// May update the blocky-supplier configuration.
    pub const SUPPLIER_CONFIG_MANAGER: Self = Self([3; 32]);
    /// May pause the blocky supplier and revoke cached signers.
    pub const GUARDIAN: Self = Self([4; 32]);

    /// Create from raw 32 bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a raw byte slice of exactly 32 bytes.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, ParseDigestError> {
        if bytes.len() != 32 {
            return Err(ParseDigestError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// The raw 32 bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for Role {
    type Err = ParseDigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| ParseDigestError::InvalidHex(e.to_string()))?;
        Self::from_raw(&bytes)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Role::ADMIN => Some("ADMIN"),
            Role::CONFIG_MANAGER => Some("CONFIG_MANAGER"),
            Role::PRICE_SUPPLIER => Some("PRICE_SUPPLIER"),
            Role::SUPPLIER_CONFIG_MANAGER => Some("SUPPLIER_CONFIG_MANAGER"),
            Role::GUARDIAN => Some("GUARDIAN"),
            _ => None,
        };
        match name {
            Some(name) => write!(f, "Role::{}", name),
            None => write!(f, "Role({})", self),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Events
// ============================================================================

/// Emitted when `role` is granted to `address` by `sender`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleGranted {
    pub role: Role,
    pub address: Address,
    pub sender: Address,
}

/// Emitted when `role` is revoked from `address` by `sender`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleRevoked {
    pub role: Role,
    pub address: Address,
    pub sender: Address,
}

/// Emitted when the admin role of `role` changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleAdminChanged {
    pub role: Role,
    pub previous_admin_role: Role,
    pub new_admin_role: Role,
}
