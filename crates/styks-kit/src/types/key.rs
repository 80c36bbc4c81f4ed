//! Cryptographic key and signature types.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use ed25519_dalek::VerifyingKey;
use k256::elliptic_curve::sec1::FromEncodedPoint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseKeyError;
use crate::types::Digest;

/// Key algorithm identifier.
///
/// The numeric value is the tag byte that prefixes every key and signature
/// on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyAlgorithm {
    /// Ed25519 key (most common).
    Ed25519 = 1,
    /// Secp256k1 key (for Ethereum compatibility).
    Secp256k1 = 2,
}

impl KeyAlgorithm {
    /// Get the lowercase name of this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAlgorithm::Ed25519 => "ed25519",
            KeyAlgorithm::Secp256k1 => "secp256k1",
        }
    }

    /// Get the expected key length in bytes (without the tag byte).
    pub fn key_len(&self) -> usize {
        match self {
            KeyAlgorithm::Ed25519 => 32,
            KeyAlgorithm::Secp256k1 => 33, // Compressed
        }
    }

    /// Get the expected signature length in bytes (without the tag byte).
    pub fn signature_len(&self) -> usize {
        match self {
            KeyAlgorithm::Ed25519 => 64,
            KeyAlgorithm::Secp256k1 => 65,
        }
    }
}

impl TryFrom<u8> for KeyAlgorithm {
    type Error = ParseKeyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(KeyAlgorithm::Ed25519),
            2 => Ok(KeyAlgorithm::Secp256k1),
            _ => Err(ParseKeyError::UnknownAlgorithm(value)),
        }
    }
}

/// Ed25519 or Secp256k1 public key.
///
/// The canonical text form is lowercase hex of the tag byte followed by the
/// key bytes, e.g. `01aa..` for Ed25519 (66 chars) or `02bb..` for
/// Secp256k1 (68 chars). Parsing validates that the bytes are a real curve
/// point, so a `PublicKey` value is always well-formed.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    algorithm: KeyAlgorithm,
    data: Vec<u8>,
}

impl PublicKey {
    /// Create an Ed25519 public key from raw 32 bytes.
    pub fn ed25519_from_bytes(bytes: [u8; 32]) -> Result<Self, ParseKeyError> {
        VerifyingKey::from_bytes(&bytes).map_err(|_| ParseKeyError::InvalidCurvePoint)?;
        Ok(Self {
            algorithm: KeyAlgorithm::Ed25519,
            data: bytes.to_vec(),
        })
    }

    /// Parse from tagged raw bytes (tag byte followed by the key bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        let (&tag, data) = bytes.split_first().ok_or(ParseKeyError::MissingTag)?;
        let algorithm = KeyAlgorithm::try_from(tag)?;

        if data.len() != algorithm.key_len() {
            return Err(ParseKeyError::InvalidLength {
                expected: algorithm.key_len(),
                actual: data.len(),
            });
        }

        // Validate that the key is actually on the curve
        match algorithm {
            KeyAlgorithm::Ed25519 => {
                let bytes: [u8; 32] = data
                    .try_into()
                    .map_err(|_| ParseKeyError::InvalidCurvePoint)?;
                VerifyingKey::from_bytes(&bytes).map_err(|_| ParseKeyError::InvalidCurvePoint)?;
            }
            KeyAlgorithm::Secp256k1 => {
                // The key is 33 bytes (compressed SEC1 format)
                let encoded = k256::EncodedPoint::from_bytes(data)
                    .map_err(|_| ParseKeyError::InvalidCurvePoint)?;
                let point = k256::AffinePoint::from_encoded_point(&encoded);
                if point.is_none().into() {
                    return Err(ParseKeyError::InvalidCurvePoint);
                }
            }
        }

        Ok(Self {
            algorithm,
            data: data.to_vec(),
        })
    }

    /// Parse from the canonical tagged hex form.
    pub fn from_hex(s: &str) -> Result<Self, ParseKeyError> {
        let bytes = hex::decode(s).map_err(|e| ParseKeyError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Get the key algorithm.
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// Get the raw key bytes (without the tag byte).
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the tagged bytes (tag byte followed by the key bytes).
    pub fn to_tagged_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.data.len());
        out.push(self.algorithm as u8);
        out.extend_from_slice(&self.data);
        out
    }

    /// Derive the account hash for this key.
    ///
    /// blake2b-256 over `algorithm-name ++ 0x00 ++ key-bytes`, the chain's
    /// account-hash derivation rule.
    pub fn to_account_hash(&self) -> Digest {
        let name = self.algorithm.as_str().as_bytes();
        let mut preimage = Vec::with_capacity(name.len() + 1 + self.data.len());
        preimage.extend_from_slice(name);
        preimage.push(0);
        preimage.extend_from_slice(&self.data);
        Digest::hash(&preimage)
    }
}

impl FromStr for PublicKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<&str> for PublicKey {
    type Error = ParseKeyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{}", self.algorithm as u8, hex::encode(&self.data))
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Cryptographic signature, tagged with the algorithm of the signing key.
///
/// Same tagged-hex codec as [`PublicKey`]. The client never verifies
/// signatures; that is the node's job on submission.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    algorithm: KeyAlgorithm,
    data: Vec<u8>,
}

impl Signature {
    /// Create an Ed25519 signature from raw 64 bytes.
    pub fn ed25519_from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            algorithm: KeyAlgorithm::Ed25519,
            data: bytes.to_vec(),
        }
    }

    /// Parse from tagged raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        let (&tag, data) = bytes.split_first().ok_or(ParseKeyError::MissingTag)?;
        let algorithm = KeyAlgorithm::try_from(tag)?;

        if data.len() != algorithm.signature_len() {
            return Err(ParseKeyError::InvalidLength {
                expected: algorithm.signature_len(),
                actual: data.len(),
            });
        }

        Ok(Self {
            algorithm,
            data: data.to_vec(),
        })
    }

    /// Parse from the canonical tagged hex form.
    pub fn from_hex(s: &str) -> Result<Self, ParseKeyError> {
        let bytes = hex::decode(s).map_err(|e| ParseKeyError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Get the key algorithm.
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// Get the raw signature bytes (without the tag byte).
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl FromStr for Signature {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{}", self.algorithm as u8, hex::encode(&self.data))
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A valid Ed25519 point: the standard base point y-coordinate.
    const ED25519_HEX: &str = "015866666666666666666666666666666666666666666666666666666666666666";
    // The secp256k1 generator point, compressed.
    const SECP256K1_HEX: &str =
        "020279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    #[test]
    fn test_ed25519_hex_round_trip() {
        let key = PublicKey::from_hex(ED25519_HEX).unwrap();
        assert_eq!(key.algorithm(), KeyAlgorithm::Ed25519);
        assert_eq!(key.to_string(), ED25519_HEX);
        assert_eq!(PublicKey::from_hex(&key.to_string()).unwrap(), key);
    }

    #[test]
    fn test_secp256k1_hex_round_trip() {
        let key = PublicKey::from_hex(SECP256K1_HEX).unwrap();
        assert_eq!(key.algorithm(), KeyAlgorithm::Secp256k1);
        assert_eq!(key.to_string(), SECP256K1_HEX);
    }

    #[test]
    fn test_uppercase_input_renders_lowercase() {
        let key = PublicKey::from_hex(&ED25519_HEX.to_uppercase()).unwrap();
        assert_eq!(key.to_string(), ED25519_HEX);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let mut bytes = hex::decode(ED25519_HEX).unwrap();
        bytes[0] = 9;
        assert_eq!(
            PublicKey::from_bytes(&bytes),
            Err(ParseKeyError::UnknownAlgorithm(9))
        );
    }

    #[test]
    fn test_wrong_length_rejected() {
        let bytes = hex::decode(ED25519_HEX).unwrap();
        assert_eq!(
            PublicKey::from_bytes(&bytes[..32]),
            Err(ParseKeyError::InvalidLength {
                expected: 32,
                actual: 31
            })
        );
        assert_eq!(PublicKey::from_bytes(&[]), Err(ParseKeyError::MissingTag));
    }

    #[test]
    fn test_invalid_curve_point_rejected() {
        // 0x05 is not a valid SEC1 leading byte for a 33-byte encoding.
        let mut bytes = vec![2u8, 0x05];
        bytes.extend_from_slice(&[0u8; 32]);
        assert_eq!(
            PublicKey::from_bytes(&bytes),
            Err(ParseKeyError::InvalidCurvePoint)
        );
    }

    #[test]
    fn test_account_hash_is_deterministic() {
        let key = PublicKey::from_hex(ED25519_HEX).unwrap();
        assert_eq!(key.to_account_hash(), key.to_account_hash());

        // Different algorithms with the same raw bytes hash differently
        // because the algorithm name is part of the preimage.
        let other = PublicKey::from_hex(SECP256K1_HEX).unwrap();
        assert_ne!(key.to_account_hash(), other.to_account_hash());
    }

    #[test]
    fn test_tagged_bytes_round_trip() {
        let key = PublicKey::from_hex(ED25519_HEX).unwrap();
        let tagged = key.to_tagged_bytes();
        assert_eq!(PublicKey::from_bytes(&tagged).unwrap(), key);
    }

    #[test]
    fn test_signature_round_trip() {
        let sig = Signature::ed25519_from_bytes([7u8; 64]);
        let s = sig.to_string();
        assert_eq!(s.len(), 130);
        assert!(s.starts_with("01"));
        assert_eq!(Signature::from_hex(&s).unwrap(), sig);
    }

    #[test]
    fn test_signature_wrong_length_rejected() {
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&[0u8; 63]);
        assert_eq!(
            Signature::from_bytes(&bytes),
            Err(ParseKeyError::InvalidLength {
                expected: 64,
                actual: 63
            })
        );
    }

    #[test]
    fn test_serde_as_hex_string() {
        let key = PublicKey::from_hex(ED25519_HEX).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", ED25519_HEX));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
