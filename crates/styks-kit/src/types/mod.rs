//! Core chain primitives.
//!
//! Value types with no shared mutable state, each carrying its exact wire
//! codec: lowercase hex for hashes, keys, and byte blobs; discriminant
//! prefixes for formatted addresses and URefs; decimal strings for the
//! wide integers. Parsing is strict — wrong lengths and malformed input
//! fail with the specific error kind, never by truncation.

mod address;
mod bytes;
mod digest;
mod key;
mod numeric;
mod transaction;
mod uref;

pub use address::{AccountHash, Address};
pub use bytes::Bytes;
pub use digest::Digest;
pub use key::{KeyAlgorithm, PublicKey, Signature};
pub use numeric::{U128, U256, U512};
pub use transaction::{Approval, Deploy, Transaction, TransactionHash};
pub use uref::{AccessRights, URef};
