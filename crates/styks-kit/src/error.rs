//! Error types for styks-kit.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) — Main error type, returned by most operations
//!   - [`RpcError`] — RPC-specific errors (network, value not found, contract revert)
//!   - [`SignerError`] — Wallet signing flow failures
//!   - [`ParseUintError`] — Invalid decimal big-integer string
//!   - [`ParseDigestError`] — Invalid digest hex
//!   - [`ParseKeyError`] — Invalid public key / signature encoding
//!   - [`ParseAddressError`] — Invalid formatted address string
//!   - [`ParseURefError`] — Invalid formatted URef string
//!   - [`InvalidAccessRights`] — Access-rights bit pattern outside the valid set
//!   - [`ConfigError`] — Price-feed configuration rejected client-side
//!
//! # Error Handling Examples
//!
//! ## Distinguishing "not configured" from a failed query
//!
//! ```rust,no_run
//! use styks_kit::*;
//!
//! # async fn example(feed: StyksPriceFeedClient) -> Result<(), Error> {
//! match feed.get_config().await {
//!     Ok(config) => println!("window: {}", config.twap_window),
//!     Err(Error::NotConfigured) => println!("feed not configured yet"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Checking retryable errors
//!
//! Reads are idempotent and safe to retry. Writes are not: a submitted
//! envelope may have been accepted even if the response was lost, so confirm
//! the outcome via the returned [`TransactionHash`](crate::TransactionHash)
//! before resubmitting.
//!
//! ```rust,no_run
//! use styks_kit::RpcError;
//!
//! fn should_retry_read(err: &RpcError) -> bool {
//!     err.is_retryable()
//! }
//! ```

use thiserror::Error;

/// Error parsing a fixed-width unsigned integer from a decimal string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseUintError {
    #[error("Invalid character in decimal string: '{0}'")]
    InvalidCharacter(String),

    #[error("Decimal string exceeds the integer width")]
    Overflow,
}

/// Error parsing a digest from hex or raw bytes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseDigestError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid digest length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Error parsing a public key or signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Missing algorithm tag byte")]
    MissingTag,

    #[error("Unknown key algorithm tag: {0}")]
    UnknownAlgorithm(u8),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid curve point: key bytes do not represent a valid point on the curve")]
    InvalidCurvePoint,
}

/// Error parsing a formatted address string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("Invalid address prefix: expected 'account-hash-' or 'hash-', got '{0}'")]
    InvalidPrefix(String),

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid address length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Error parsing a formatted URef string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseURefError {
    #[error("Invalid URef prefix: expected 'uref-', got '{0}'")]
    InvalidPrefix(String),

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid URef address length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Missing access-rights suffix")]
    MissingAccessRights,

    #[error(transparent)]
    InvalidAccessRights(#[from] InvalidAccessRights),
}

/// An access-rights bit pattern outside the valid `0..=7` domain.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Invalid access rights bits: {0} (valid patterns are 0..=7)")]
pub struct InvalidAccessRights(pub u8);

/// A price-feed configuration rejected by client-side validation.
///
/// The node enforces the same rules; failing early avoids paying for a
/// deploy that is certain to revert.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Heartbeat interval must be greater than zero")]
    HeartbeatIntervalZero,

    #[error("Heartbeat tolerance must be less than half of the interval")]
    HeartbeatToleranceTooLarge,

    #[error("TWAP window cannot be zero")]
    TwapWindowZero,

    #[error("TWAP tolerance must be less than the window")]
    TwapToleranceTooLarge,

    #[error("Price feed id must not be an empty string")]
    EmptyPriceFeedId,

    #[error("Price feed id '{0}' is not unique")]
    DuplicatePriceFeedId(String),
}

/// Error during the wallet signing flow.
///
/// Each step of the flow fails with its own variant so callers can present
/// the right UX: a refused connection, a missing active key, and a
/// user-cancelled prompt are different situations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("Wallet unavailable: {0}")]
    Unavailable(String),

    #[error("No active public key in the wallet")]
    NoActiveKey,

    #[error("Signing cancelled by the user")]
    Cancelled,

    #[error("Signing rejected: {0}")]
    Rejected(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

// ============================================================================
// RPC Errors
// ============================================================================

/// RPC-specific errors.
#[derive(Debug, Error)]
pub enum RpcError {
    // ─── Network/Transport ───
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        retryable: bool,
    },

    #[error("Operation cancelled before completion; outcome of any side effect is unknown")]
    Cancelled,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // ─── Generic RPC Error ───
    #[error("RPC error: {message} (code: {code})")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },

    // ─── State Queries ───
    #[error("Value not found under key: {0}")]
    ValueNotFound(String),

    // ─── Execution ───
    #[error("Contract execution failed: {message}")]
    ContractExecution { code: Option<u32>, message: String },
}

impl RpcError {
    /// Check if this error is retryable.
    ///
    /// Only meaningful for reads. The client performs no retries itself, and
    /// blindly resubmitting a write is a double-spend-shaped hazard: confirm
    /// the prior attempt via its transaction hash first.
    pub fn is_retryable(&self) -> bool {
        match self {
            RpcError::Http(e) => e.is_timeout() || e.is_connect(),
            RpcError::Network { retryable, .. } => *retryable,
            RpcError::Rpc { code, .. } => {
                // Server-side errors
                *code == -32000 || *code == -32603
            }
            _ => false,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>, status_code: Option<u16>, retryable: bool) -> Self {
        RpcError::Network {
            message: message.into(),
            status_code,
            retryable,
        }
    }

    /// Returns true if this error indicates a state-query miss.
    pub fn is_value_not_found(&self) -> bool {
        matches!(self, RpcError::ValueNotFound(_))
    }

    /// The user-error code of a contract revert, if this is one.
    pub fn revert_code(&self) -> Option<u32> {
        match self {
            RpcError::ContractExecution { code, .. } => *code,
            _ => None,
        }
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// Main error type for styks-kit operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Configuration ───
    #[error("No signer configured. Call .signer() on OdraClientBuilder.")]
    NoSigner,

    #[error("Envelope carries no signatures; sign it before submission")]
    MissingSignature,

    #[error("Contract has no configuration set")]
    NotConfigured,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    // ─── Parsing ───
    #[error(transparent)]
    ParseUint(#[from] ParseUintError),

    #[error(transparent)]
    ParseDigest(#[from] ParseDigestError),

    #[error(transparent)]
    ParseKey(#[from] ParseKeyError),

    #[error(transparent)]
    ParseAddress(#[from] ParseAddressError),

    #[error(transparent)]
    ParseURef(#[from] ParseURefError),

    #[error(transparent)]
    AccessRights(#[from] InvalidAccessRights),

    // ─── RPC ───
    #[error(transparent)]
    Rpc(#[from] RpcError),

    // ─── Signing ───
    #[error("Signing failed: {0}")]
    Signer(#[from] SignerError),

    // ─── Serialization ───
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
