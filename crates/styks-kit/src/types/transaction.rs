//! Deploy and transaction envelopes.
//!
//! An envelope is the node's JSON submission payload plus an ordered list of
//! approvals. Signature-adding operations consume the envelope and return
//! the extended one, so a stale pre-signature instance cannot be used again
//! (the borrow checker rejects it). Nothing here verifies signatures; the
//! node does that on submission.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseDigestError;
use crate::types::{Digest, PublicKey, Signature};

/// The identifier returned by the node for a submitted deploy or
/// transaction. Used to poll the outcome.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionHash([u8; 32]);

impl TransactionHash {
    /// Create from raw 32 bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a raw byte slice of exactly 32 bytes.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, ParseDigestError> {
        Digest::from_raw(bytes).map(|d| Self(*d.as_bytes()))
    }

    /// Parse from a hex string of exactly 64 characters.
    pub fn from_hex(s: &str) -> Result<Self, ParseDigestError> {
        Digest::from_hex(s).map(|d| Self(*d.as_bytes()))
    }

    /// Get the raw 32 bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Reinterpret this hash as a [`Digest`].
    ///
    /// A pure function of the hash's bytes.
    pub const fn digest(&self) -> Digest {
        Digest::from_bytes(self.0)
    }

    /// Render the node's JSON form.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "Version1": self.to_string() })
    }
}

impl FromStr for TransactionHash {
    type Err = ParseDigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<Digest> for TransactionHash {
    fn from(digest: Digest) -> Self {
        Self(*digest.as_bytes())
    }
}

impl Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Debug for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionHash({})", self)
    }
}

impl Serialize for TransactionHash {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TransactionHash {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A (signer, signature) pair attached to an envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub signer: PublicKey,
    pub signature: Signature,
}

/// A legacy deploy envelope.
///
/// Same signing discipline as [`Transaction`]; kept for nodes and wallets
/// that still speak the deploy format.
#[derive(Clone, Debug, PartialEq)]
pub struct Deploy {
    payload: serde_json::Value,
    approvals: Vec<Approval>,
}

impl Deploy {
    /// Wrap a node-format deploy payload with no approvals yet.
    pub fn new(payload: serde_json::Value) -> Self {
        Self {
            payload,
            approvals: Vec::new(),
        }
    }

    /// Append an approval, consuming this envelope and returning the
    /// extended one. The signature is not verified here.
    #[must_use = "add_signature consumes the envelope and returns the signed one"]
    pub fn add_signature(mut self, signer: PublicKey, signature: Signature) -> Self {
        self.approvals.push(Approval { signer, signature });
        self
    }

    /// The approvals accumulated so far, in signing order.
    pub fn approvals(&self) -> &[Approval] {
        &self.approvals
    }

    /// Does the envelope carry at least one signature?
    pub fn is_signed(&self) -> bool {
        !self.approvals.is_empty()
    }

    /// The deploy hash recorded in the payload, if present.
    pub fn hash(&self) -> Option<TransactionHash> {
        hash_field(&self.payload)
    }

    /// Render the node's submission form: the payload with the accumulated
    /// approvals attached.
    pub fn to_json(&self) -> serde_json::Value {
        attach_approvals(&self.payload, &self.approvals)
    }
}

/// A transaction envelope pending submission.
///
/// Built by the domain clients, signed zero or more times, submitted once.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    payload: serde_json::Value,
    approvals: Vec<Approval>,
}

impl Transaction {
    /// Wrap a node-format transaction payload with no approvals yet.
    pub fn new(payload: serde_json::Value) -> Self {
        Self {
            payload,
            approvals: Vec::new(),
        }
    }

    /// Append an approval, consuming this envelope and returning the
    /// extended one. The signature is not verified here.
    #[must_use = "add_signature consumes the envelope and returns the signed one"]
    pub fn add_signature(mut self, signer: PublicKey, signature: Signature) -> Self {
        self.approvals.push(Approval { signer, signature });
        self
    }

    /// The approvals accumulated so far, in signing order.
    pub fn approvals(&self) -> &[Approval] {
        &self.approvals
    }

    /// Does the envelope carry at least one signature?
    pub fn is_signed(&self) -> bool {
        !self.approvals.is_empty()
    }

    /// The transaction hash recorded in the payload, if present.
    pub fn hash(&self) -> Option<TransactionHash> {
        hash_field(&self.payload)
    }

    /// The payload as built by the client, without approvals.
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Render the node's submission form: the payload with the accumulated
    /// approvals attached.
    pub fn to_json(&self) -> serde_json::Value {
        attach_approvals(&self.payload, &self.approvals)
    }
}

fn hash_field(payload: &serde_json::Value) -> Option<TransactionHash> {
    payload
        .get("hash")
        .and_then(|h| h.as_str())
        .and_then(|h| h.parse().ok())
}

fn attach_approvals(payload: &serde_json::Value, approvals: &[Approval]) -> serde_json::Value {
    let mut out = payload.clone();
    if let Some(object) = out.as_object_mut() {
        object.insert(
            "approvals".to_string(),
            serde_json::to_value(approvals).expect("approvals serialize infallibly"),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HASH_HEX: &str = "1212121212121212121212121212121212121212121212121212121212121212";
    const KEY_HEX: &str = "015866666666666666666666666666666666666666666666666666666666666666";

    fn test_key() -> PublicKey {
        KEY_HEX.parse().unwrap()
    }

    fn test_signature(fill: u8) -> Signature {
        Signature::ed25519_from_bytes([fill; 64])
    }

    #[test]
    fn test_transaction_hash_round_trip() {
        let hash = TransactionHash::from_hex(HASH_HEX).unwrap();
        assert_eq!(hash.to_string(), HASH_HEX);
        assert_eq!(HASH_HEX.parse::<TransactionHash>().unwrap(), hash);
    }

    #[test]
    fn test_transaction_hash_digest_is_pure() {
        let hash = TransactionHash::from_hex(HASH_HEX).unwrap();
        assert_eq!(hash.digest(), hash.digest());
        assert_eq!(hash.digest().as_bytes(), hash.as_bytes());
        assert_eq!(hash.digest().to_string(), HASH_HEX);
    }

    #[test]
    fn test_transaction_hash_json_form() {
        let hash = TransactionHash::from_hex(HASH_HEX).unwrap();
        assert_eq!(hash.to_json(), json!({ "Version1": HASH_HEX }));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(matches!(
            TransactionHash::from_hex(&HASH_HEX[..62]),
            Err(ParseDigestError::InvalidLength {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn test_signing_twice_accumulates_both_signatures() {
        let tx = Transaction::new(json!({ "hash": HASH_HEX, "chain_name": "casper-test" }));
        assert!(!tx.is_signed());

        // Each add_signature consumes the previous envelope; the moved-out
        // value is unusable afterwards (compile-time enforced).
        let tx = tx.add_signature(test_key(), test_signature(1));
        let tx = tx.add_signature(test_key(), test_signature(2));

        assert!(tx.is_signed());
        assert_eq!(tx.approvals().len(), 2);
        assert_eq!(tx.approvals()[0].signature, test_signature(1));
        assert_eq!(tx.approvals()[1].signature, test_signature(2));
    }

    #[test]
    fn test_submission_form_includes_approvals() {
        let deploy = Deploy::new(json!({ "hash": HASH_HEX }))
            .add_signature(test_key(), test_signature(3));

        let json = deploy.to_json();
        assert_eq!(json["hash"], HASH_HEX);
        let approvals = json["approvals"].as_array().unwrap();
        assert_eq!(approvals.len(), 1);
        assert_eq!(approvals[0]["signer"], KEY_HEX);
    }

    #[test]
    fn test_hash_field_extraction() {
        let tx = Transaction::new(json!({ "hash": HASH_HEX }));
        assert_eq!(tx.hash(), Some(TransactionHash::from_hex(HASH_HEX).unwrap()));

        let tx = Transaction::new(json!({ "chain_name": "casper-test" }));
        assert_eq!(tx.hash(), None);
    }
}
