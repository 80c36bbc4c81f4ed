//! A clean, ergonomic Rust client for the Styks price-feed contracts on
//! Casper-style networks.
//!
//! **styks-kit** models the chain's client-side domain: addressing
//! primitives and their exact wire codecs, wallet-driven signing, and a
//! two-endpoint node client with typed contract clients on top.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use styks_kit::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), styks_kit::Error> {
//!     // Configure once
//!     let client = OdraClient::builder("http://node:7777/rpc", "http://spec:7778/rpc")
//!         .chain_name("casper-test")
//!         .signer(InMemoryWallet::generate())
//!         .build();
//!
//!     let feed = StyksPriceFeedClient::new(
//!         client,
//!         "hash-0101010101010101010101010101010101010101010101010101010101010101".parse()?,
//!     );
//!
//!     match feed.get_config_or_none().await? {
//!         Some(config) => println!("feeds: {:?}", config.price_feed_ids),
//!         None => println!("not configured yet"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Design Principles
//!
//! 1. **Two endpoints, one rule**: reads go to the speculative node and are
//!    safe to retry; writes go to the primary node and are submitted exactly
//!    once — the client never retries anything itself
//! 2. **Exact wire formats**: every primitive re-renders its canonical text
//!    form byte-identically (`fromStr(toString(x)) == x`)
//! 3. **Move-checked envelopes**: signing consumes the envelope and returns
//!    the signed one, so stale instances are compile errors
//! 4. **Distinct failures**: a refused wallet connection, a missing active
//!    key, a cancelled prompt, and an absent configuration are all different
//!    errors (or an absent value), never one generic failure
//!
//! # Core Types
//!
//! - [`Digest`] - 32-byte blake2b-256 hash, hex codec
//! - [`PublicKey`], [`Signature`] - algorithm-tagged keys
//! - [`Address`] - account or contract locator with formatted strings
//! - [`URef`], [`AccessRights`] - capability-scoped storage references
//! - [`U128`], [`U256`], [`U512`] - fixed-width amounts, decimal codec
//! - [`Deploy`], [`Transaction`], [`TransactionHash`] - signed envelopes
//!
//! # String Parsing
//!
//! All primitives parse from their canonical chain encodings:
//!
//! ```
//! use styks_kit::{AccessRights, Address, U512, URef};
//!
//! let amount: U512 = "2500000000".parse().unwrap();
//! let contract: Address =
//!     "hash-0101010101010101010101010101010101010101010101010101010101010101"
//!         .parse()
//!         .unwrap();
//! let uref: URef =
//!     "uref-0202020202020202020202020202020202020202020202020202020202020202-007"
//!         .parse()
//!         .unwrap();
//! assert!(uref.access_rights().is_writeable());
//! ```

pub mod client;
pub mod contracts;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{
    ConfigError, Error, InvalidAccessRights, ParseAddressError, ParseDigestError, ParseKeyError,
    ParseURefError, ParseUintError, RpcError, SignerError,
};
pub use types::*;

// Re-export client types
pub use client::{
    CallBuilder, DEFAULT_PAYMENT, DEFAULT_TTL, DeploySend, InMemoryWallet, NamedValueQuery,
    OdraClient, OdraClientBuilder, RpcClient, RuntimeArgs, TransactionSend, Verbosity, ViewCall,
    Wallet, WalletFuture, WalletSigner,
};

// Re-export contract clients
pub use contracts::{
    BlockySupplierConfig, Price, PriceFeedConfig, PriceFeedId, Role, RoleAdminChanged, RoleGranted,
    RoleRevoked, StyksBlockySupplierClient, StyksPriceFeedClient,
};
