//! Client module for talking to a pair of node endpoints.
//!
//! - [`OdraClient`] — The main client; speculative endpoint for reads,
//!   primary endpoint for writes
//! - [`OdraClientBuilder`] — Fluent builder for configuring the client
//! - [`RpcClient`] — Low-level JSON-RPC client (single attempt, no retries)
//!
//! # Wallets
//!
//! Write operations are signed through a [`WalletSigner`] — an external
//! signing capability such as a browser-extension wallet. [`Wallet`] drives
//! the connect / resolve-key / sign flow; [`InMemoryWallet`] is a
//! single-key implementation for tests and headless tools.
//!
//! # Builders
//!
//! Reads and writes are fluent builders that implement `IntoFuture`, so
//! they can be `.await`ed directly:
//!
//! - [`NamedValueQuery`] — named-key lookup, absent key resolves to `None`
//! - [`ViewCall`] — read-only entry-point execution on the speculative node
//! - [`CallBuilder`] / [`TransactionSend`] — build, sign, and submit a
//!   state-changing call exactly once

mod node;
mod rpc;
mod wallet;

pub use node::{
    CallBuilder, DEFAULT_PAYMENT, DEFAULT_TTL, DeploySend, NamedValueQuery, OdraClient,
    OdraClientBuilder, RuntimeArgs, TransactionSend, Verbosity, ViewCall,
};
pub use rpc::RpcClient;
pub use wallet::{InMemoryWallet, Wallet, WalletFuture, WalletSigner};
