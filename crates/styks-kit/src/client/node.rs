//! The main Odra node client.
//!
//! [`OdraClient`] is the single entry point for talking to a pair of node
//! endpoints: every read goes to the **speculative** node (no chain-state
//! mutation, safe for callers to retry), every write goes to the **primary**
//! node and is submitted exactly once. Resubmitting a signed envelope is a
//! double-spend-shaped hazard, so retries of writes are left to callers who
//! have confirmed the prior attempt via its [`TransactionHash`].
//!
//! Construction never touches the network; failures surface on individual
//! calls.
//!
//! # Example
//!
//! ```rust,no_run
//! use styks_kit::*;
//!
//! # async fn example() -> Result<(), styks_kit::Error> {
//! let client = OdraClient::builder("http://node:7777/rpc", "http://spec-node:7778/rpc")
//!     .chain_name("casper-test")
//!     .signer(InMemoryWallet::generate())
//!     .build();
//!
//! let contract: Address = "hash-0101010101010101010101010101010101010101010101010101010101010101".parse()?;
//! let value = client.named_value(contract, "last_heartbeat").await?;
//! # Ok(())
//! # }
//! ```

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures::future::AbortRegistration;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{Error, RpcError};
use crate::types::{Address, Bytes, Deploy, Digest, PublicKey, Transaction, TransactionHash, U512};

use super::rpc::{RpcClient, parse_user_error_code};
use super::wallet::{Wallet, WalletSigner};

/// Default payment attached to calls when no gas has been set:
/// 2 500 000 000 motes (2.5 CSPR).
pub const DEFAULT_PAYMENT: u64 = 2_500_000_000;

/// Default time-to-live for submitted transactions.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// How much detail the client logs about requests and responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Log nothing beyond errors.
    #[default]
    Low,
    /// Log submitted payloads.
    Medium,
    /// Log payloads and decoded responses.
    High,
}

// ============================================================================
// RuntimeArgs
// ============================================================================

/// Named arguments for a contract call, in insertion order.
///
/// Values are the JSON renderings of the chain primitives (hex strings,
/// decimal strings, formatted strings), produced via their serde impls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeArgs(Vec<(String, serde_json::Value)>);

impl RuntimeArgs {
    /// No arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named argument.
    pub fn with(mut self, name: &str, value: impl serde::Serialize) -> Self {
        let value = serde_json::to_value(value).expect("argument types serialize infallibly");
        self.0.push((name.to_string(), value));
        self
    }

    /// The arguments as `[name, value]` pairs.
    pub fn to_json(&self) -> serde_json::Value {
        json!(self.0)
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Are there no arguments?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// OdraClient
// ============================================================================

/// Client for a pair of node endpoints plus transaction defaults.
///
/// Cheap to clone; clones share the HTTP connections and the gas setting.
/// Gas is read-mostly: builders snapshot it when created, so mutating it
/// concurrently with in-flight call construction is a race the caller must
/// avoid (don't change gas mid-batch).
#[derive(Clone)]
pub struct OdraClient {
    primary: Arc<RpcClient>,
    speculative: Arc<RpcClient>,
    chain_name: String,
    gas: Arc<AtomicU64>,
    ttl: Option<Duration>,
    verbosity: Verbosity,
    wallet: Option<Wallet>,
}

impl OdraClient {
    /// Start building a client for the given primary (write) and
    /// speculative (read) endpoints.
    pub fn builder(
        node_url: impl Into<String>,
        speculative_node_url: impl Into<String>,
    ) -> OdraClientBuilder {
        OdraClientBuilder {
            node_url: node_url.into(),
            speculative_node_url: speculative_node_url.into(),
            chain_name: None,
            gas: None,
            ttl: None,
            verbosity: Verbosity::default(),
            wallet: None,
        }
    }

    /// The primary (write) endpoint URL.
    pub fn node_url(&self) -> &str {
        self.primary.url()
    }

    /// The speculative (read) endpoint URL.
    pub fn speculative_node_url(&self) -> &str {
        self.speculative.url()
    }

    /// The chain name stamped into built transactions.
    pub fn chain_name(&self) -> &str {
        &self.chain_name
    }

    /// The gas currently applied to subsequently built calls, in motes.
    pub fn gas(&self) -> u64 {
        self.gas.load(Ordering::Relaxed)
    }

    /// Set the gas applied to subsequently built calls, in motes.
    ///
    /// Calls already being constructed keep the value they snapshotted.
    pub fn set_gas(&self, gas: u64) {
        self.gas.store(gas, Ordering::Relaxed);
    }

    /// The TTL applied to built transactions.
    pub fn ttl(&self) -> Duration {
        self.ttl.unwrap_or(DEFAULT_TTL)
    }

    /// The configured verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// The configured wallet, if any.
    pub fn wallet(&self) -> Option<&Wallet> {
        self.wallet.as_ref()
    }

    // ========================================================================
    // Reads (speculative endpoint)
    // ========================================================================

    /// Query a value from a named key of an account or contract.
    ///
    /// Resolves to `Ok(None)` when the key holds no value — an absent key
    /// is an answer, not an error.
    pub fn named_value(&self, address: Address, name: &str) -> NamedValueQuery {
        NamedValueQuery {
            rpc: self.speculative.clone(),
            address,
            name: name.to_string(),
            abort: None,
        }
    }

    /// Execute a read-only entry point against the speculative node and
    /// return the raw result bytes.
    pub fn view(&self, contract: Address, entry_point: &str) -> ViewCall {
        ViewCall {
            client: self.clone(),
            contract,
            entry_point: entry_point.to_string(),
            args: RuntimeArgs::new(),
            abort: None,
        }
    }

    // ========================================================================
    // Writes (primary endpoint)
    // ========================================================================

    /// Build a state-changing entry-point call.
    ///
    /// The returned builder snapshots the current gas setting; `.send()`
    /// signs the built transaction with the configured wallet and submits
    /// it once to the primary node.
    pub fn call(&self, contract: Address, entry_point: &str) -> CallBuilder {
        CallBuilder {
            client: self.clone(),
            contract,
            entry_point: entry_point.to_string(),
            args: RuntimeArgs::new(),
            gas: self.gas(),
            ttl: self.ttl(),
        }
    }

    /// Submit an already-signed transaction envelope to the primary node.
    ///
    /// Fails with [`Error::MissingSignature`] before any network traffic if
    /// the envelope carries no approvals. Submitted exactly once.
    pub fn send_transaction(&self, transaction: Transaction) -> TransactionSend {
        TransactionSend {
            client: self.clone(),
            kind: SendKind::Presigned(transaction),
            abort: None,
        }
    }

    /// Submit an already-signed legacy deploy envelope to the primary node.
    ///
    /// Same contract as [`send_transaction`](Self::send_transaction):
    /// refused locally without a signature, submitted exactly once.
    pub fn send_deploy(&self, deploy: Deploy) -> DeploySend {
        DeploySend {
            client: self.clone(),
            deploy,
            abort: None,
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Build the unsigned payload for an entry-point call and stamp its hash.
    fn build_payload(
        &self,
        contract: &Address,
        entry_point: &str,
        args: &RuntimeArgs,
        gas: u64,
        ttl: Duration,
        initiator: Option<&PublicKey>,
    ) -> serde_json::Value {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_millis() as u64;

        let mut payload = json!({
            "chain_name": self.chain_name,
            "timestamp": timestamp,
            "ttl_millis": ttl.as_millis() as u64,
            "payment": U512::from(gas),
            "target": contract.to_formatted_string(),
            "entry_point": entry_point,
            "args": args.to_json(),
        });
        if let Some(key) = initiator {
            payload["initiator"] = json!(key);
        }

        // The transaction hash covers the canonical payload bytes.
        let canonical = serde_json::to_vec(&payload).expect("payload serializes infallibly");
        let hash = Digest::hash(&canonical);
        payload["hash"] = json!(hash);
        payload
    }

    async fn put_transaction(
        &self,
        transaction: &Transaction,
        abort: Option<AbortRegistration>,
    ) -> Result<TransactionHash, Error> {
        if !transaction.is_signed() {
            return Err(Error::MissingSignature);
        }

        if self.verbosity >= Verbosity::Medium {
            debug!(target: "styks_kit::node", payload = %transaction.to_json(), "submitting transaction");
        }

        let params = json!({ "transaction": transaction.to_json() });
        let result: PutTransactionResult = match abort {
            Some(abort) => {
                self.primary
                    .call_abortable("account_put_transaction", params, abort)
                    .await?
            }
            None => self.primary.call("account_put_transaction", params).await?,
        };
        Ok(result.transaction_hash.into_hash())
    }

    async fn speculative_exec(
        &self,
        payload: serde_json::Value,
        abort: Option<AbortRegistration>,
    ) -> Result<Bytes, Error> {
        let params = json!({ "transaction": payload });
        let result: SpeculativeExecResult = match abort {
            Some(abort) => {
                self.speculative
                    .call_abortable("speculative_exec_txn", params, abort)
                    .await?
            }
            None => {
                self.speculative
                    .call("speculative_exec_txn", params)
                    .await?
            }
        };
        let bytes = decode_execution_result(&result.execution_result)?;
        if self.verbosity >= Verbosity::High {
            debug!(target: "styks_kit::node", result = %bytes, "speculative execution result");
        }
        Ok(bytes)
    }
}

impl std::fmt::Debug for OdraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OdraClient")
            .field("node_url", &self.node_url())
            .field("speculative_node_url", &self.speculative_node_url())
            .field("chain_name", &self.chain_name)
            .field("gas", &self.gas())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// OdraClientBuilder
// ============================================================================

/// Fluent builder for [`OdraClient`]. Created via [`OdraClient::builder`].
pub struct OdraClientBuilder {
    node_url: String,
    speculative_node_url: String,
    chain_name: Option<String>,
    gas: Option<u64>,
    ttl: Option<Duration>,
    verbosity: Verbosity,
    wallet: Option<Wallet>,
}

impl OdraClientBuilder {
    /// Set the chain name (defaults to `"casper"`).
    pub fn chain_name(mut self, chain_name: impl Into<String>) -> Self {
        self.chain_name = Some(chain_name.into());
        self
    }

    /// Set the initial gas in motes (defaults to [`DEFAULT_PAYMENT`]).
    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    /// Set the transaction TTL (defaults to [`DEFAULT_TTL`] when unset).
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the logging verbosity.
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Configure a wallet signer for write operations.
    pub fn signer(mut self, signer: impl WalletSigner + 'static) -> Self {
        self.wallet = Some(Wallet::new(signer));
        self
    }

    /// Configure an already-wrapped wallet.
    pub fn wallet(mut self, wallet: Wallet) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Build the client. Never talks to the network.
    pub fn build(self) -> OdraClient {
        OdraClient {
            primary: Arc::new(RpcClient::new(self.node_url)),
            speculative: Arc::new(RpcClient::new(self.speculative_node_url)),
            chain_name: self.chain_name.unwrap_or_else(|| "casper".to_string()),
            gas: Arc::new(AtomicU64::new(self.gas.unwrap_or(DEFAULT_PAYMENT))),
            ttl: self.ttl,
            verbosity: self.verbosity,
            wallet: self.wallet,
        }
    }
}

// ============================================================================
// NamedValueQuery
// ============================================================================

/// Query builder for a named-key lookup. `.await` to run.
pub struct NamedValueQuery {
    rpc: Arc<RpcClient>,
    address: Address,
    name: String,
    abort: Option<AbortRegistration>,
}

impl NamedValueQuery {
    /// Fail with [`RpcError::Cancelled`] when the registration fires.
    pub fn abort_on(mut self, abort: AbortRegistration) -> Self {
        self.abort = Some(abort);
        self
    }
}

impl IntoFuture for NamedValueQuery {
    type Output = Result<Option<Bytes>, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let params = json!({
                "key": self.address.to_formatted_string(),
                "path": [self.name],
            });
            let result: Result<QueryGlobalStateResult, RpcError> = match self.abort {
                Some(abort) => {
                    self.rpc
                        .call_abortable("query_global_state", params, abort)
                        .await
                }
                None => self.rpc.call("query_global_state", params).await,
            };
            match result {
                Ok(response) => Ok(Some(decode_stored_value(&response.stored_value)?)),
                Err(e) if e.is_value_not_found() => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }
}

// ============================================================================
// ViewCall
// ============================================================================

/// Builder for a read-only entry-point call against the speculative node.
pub struct ViewCall {
    client: OdraClient,
    contract: Address,
    entry_point: String,
    args: RuntimeArgs,
    abort: Option<AbortRegistration>,
}

impl ViewCall {
    /// Append a named argument.
    pub fn arg(mut self, name: &str, value: impl serde::Serialize) -> Self {
        self.args = self.args.with(name, value);
        self
    }

    /// Fail with [`RpcError::Cancelled`] when the registration fires.
    pub fn abort_on(mut self, abort: AbortRegistration) -> Self {
        self.abort = Some(abort);
        self
    }
}

impl IntoFuture for ViewCall {
    type Output = Result<Bytes, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            // Views execute speculatively and pay nothing, so the payload
            // carries no initiator and is never signed.
            let payload = self.client.build_payload(
                &self.contract,
                &self.entry_point,
                &self.args,
                self.client.gas(),
                self.client.ttl(),
                None,
            );
            self.client.speculative_exec(payload, self.abort).await
        })
    }
}

// ============================================================================
// CallBuilder / TransactionSend
// ============================================================================

/// Builder for a state-changing entry-point call.
///
/// Snapshots the client's gas and TTL at creation; both can be overridden
/// per call.
pub struct CallBuilder {
    client: OdraClient,
    contract: Address,
    entry_point: String,
    args: RuntimeArgs,
    gas: u64,
    ttl: Duration,
}

impl CallBuilder {
    /// Append a named argument.
    pub fn arg(mut self, name: &str, value: impl serde::Serialize) -> Self {
        self.args = self.args.with(name, value);
        self
    }

    /// Override the gas for this call only, in motes.
    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    /// Override the TTL for this call only.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sign with the configured wallet and submit once.
    pub fn send(self) -> TransactionSend {
        let client = self.client.clone();
        TransactionSend {
            client,
            kind: SendKind::Call(self),
            abort: None,
        }
    }
}

/// The submission future for a write. `.await` to run.
///
/// Resolves to the [`TransactionHash`] the node assigned. A failed or
/// cancelled send does **not** mean the node never saw the envelope;
/// confirm via the hash before retrying.
pub struct TransactionSend {
    client: OdraClient,
    kind: SendKind,
    abort: Option<AbortRegistration>,
}

/// What a [`TransactionSend`] submits: a call still to be built and signed,
/// or an envelope the caller signed themselves.
enum SendKind {
    Presigned(Transaction),
    Call(CallBuilder),
}

impl TransactionSend {
    /// Fail with [`RpcError::Cancelled`] when the registration fires.
    ///
    /// A cancelled write is "outcome unknown", not "rolled back".
    pub fn abort_on(mut self, abort: AbortRegistration) -> Self {
        self.abort = Some(abort);
        self
    }
}

impl IntoFuture for TransactionSend {
    type Output = Result<TransactionHash, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let client = self.client;
            let transaction = match self.kind {
                SendKind::Call(call) => {
                    let wallet = client.wallet().ok_or(Error::NoSigner)?.clone();
                    let key = wallet.active_key().await.map_err(Error::Signer)?;
                    let payload = client.build_payload(
                        &call.contract,
                        &call.entry_point,
                        &call.args,
                        call.gas,
                        call.ttl,
                        Some(&key),
                    );
                    wallet
                        .sign_transaction(Transaction::new(payload), Some(key))
                        .await
                        .map_err(Error::Signer)?
                }
                SendKind::Presigned(tx) => tx,
            };
            client.put_transaction(&transaction, self.abort).await
        })
    }
}

/// The submission future for a legacy deploy. `.await` to run.
pub struct DeploySend {
    client: OdraClient,
    deploy: Deploy,
    abort: Option<AbortRegistration>,
}

impl DeploySend {
    /// Fail with [`RpcError::Cancelled`] when the registration fires.
    ///
    /// A cancelled write is "outcome unknown", not "rolled back".
    pub fn abort_on(mut self, abort: AbortRegistration) -> Self {
        self.abort = Some(abort);
        self
    }
}

impl IntoFuture for DeploySend {
    type Output = Result<TransactionHash, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            if !self.deploy.is_signed() {
                return Err(Error::MissingSignature);
            }

            if self.client.verbosity >= Verbosity::Medium {
                debug!(target: "styks_kit::node", payload = %self.deploy.to_json(), "submitting deploy");
            }

            let params = json!({ "deploy": self.deploy.to_json() });
            let result: PutDeployResult = match self.abort {
                Some(abort) => {
                    self.client
                        .primary
                        .call_abortable("account_put_deploy", params, abort)
                        .await?
                }
                None => {
                    self.client
                        .primary
                        .call("account_put_deploy", params)
                        .await?
                }
            };
            Ok(result.deploy_hash)
        })
    }
}

// ============================================================================
// Response decoding
// ============================================================================

#[derive(Deserialize)]
struct PutTransactionResult {
    transaction_hash: VersionedHash,
}

/// The node renders transaction hashes either bare or version-wrapped.
#[derive(Deserialize)]
#[serde(untagged)]
enum VersionedHash {
    Versioned {
        #[serde(rename = "Version1")]
        version1: TransactionHash,
    },
    Plain(TransactionHash),
}

impl VersionedHash {
    fn into_hash(self) -> TransactionHash {
        match self {
            VersionedHash::Versioned { version1 } => version1,
            VersionedHash::Plain(hash) => hash,
        }
    }
}

#[derive(Deserialize)]
struct PutDeployResult {
    deploy_hash: TransactionHash,
}

#[derive(Deserialize)]
struct QueryGlobalStateResult {
    stored_value: serde_json::Value,
}

#[derive(Deserialize)]
struct SpeculativeExecResult {
    execution_result: serde_json::Value,
}

/// Pull the raw bytes out of a stored CLValue.
fn decode_stored_value(stored_value: &serde_json::Value) -> Result<Bytes, RpcError> {
    let hex_bytes = stored_value
        .get("CLValue")
        .and_then(|v| v.get("bytes"))
        .and_then(|b| b.as_str())
        .ok_or_else(|| {
            RpcError::InvalidResponse(format!("unexpected stored value: {stored_value}"))
        })?;
    Bytes::from_hex(hex_bytes)
        .map_err(|e| RpcError::InvalidResponse(format!("stored value bytes: {e}")))
}

/// Pull the return bytes out of a speculative execution result, passing
/// contract reverts through unmodified.
fn decode_execution_result(result: &serde_json::Value) -> Result<Bytes, RpcError> {
    if let Some(success) = result.get("Success") {
        let ret = success.get("ret").and_then(|r| r.as_str()).unwrap_or("");
        return Bytes::from_hex(ret)
            .map_err(|e| RpcError::InvalidResponse(format!("execution result bytes: {e}")));
    }
    if let Some(failure) = result.get("Failure") {
        let message = failure
            .get("error_message")
            .and_then(|m| m.as_str())
            .unwrap_or("execution failed")
            .to_string();
        return Err(RpcError::ContractExecution {
            code: parse_user_error_code(&message),
            message,
        });
    }
    Err(RpcError::InvalidResponse(format!(
        "unexpected execution result: {result}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::wallet::InMemoryWallet;
    use futures::future::AbortHandle;

    fn contract_address() -> Address {
        "hash-0101010101010101010101010101010101010101010101010101010101010101"
            .parse()
            .unwrap()
    }

    fn offline_client() -> OdraClient {
        OdraClient::builder("http://127.0.0.1:1/rpc", "http://127.0.0.1:1/rpc")
            .chain_name("casper-test")
            .signer(InMemoryWallet::from_secret_bytes([5u8; 32]))
            .build()
    }

    #[test]
    fn test_builder_defaults() {
        let client = OdraClient::builder("http://a/rpc", "http://b/rpc").build();
        assert_eq!(client.node_url(), "http://a/rpc");
        assert_eq!(client.speculative_node_url(), "http://b/rpc");
        assert_eq!(client.chain_name(), "casper");
        assert_eq!(client.gas(), DEFAULT_PAYMENT);
        assert_eq!(client.ttl(), DEFAULT_TTL);
        assert_eq!(client.verbosity(), Verbosity::Low);
        assert!(client.wallet().is_none());
    }

    #[test]
    fn test_set_gas_applies_to_later_calls() {
        let client = offline_client();
        let before = client.call(contract_address(), "set_config");
        client.set_gas(4_000_000_000);
        let after = client.call(contract_address(), "set_config");

        // Builders snapshot gas at creation.
        assert_eq!(before.gas, DEFAULT_PAYMENT);
        assert_eq!(after.gas, 4_000_000_000);
        assert_eq!(client.gas(), 4_000_000_000);
    }

    #[test]
    fn test_gas_shared_across_clones() {
        let client = offline_client();
        let clone = client.clone();
        clone.set_gas(1);
        assert_eq!(client.gas(), 1);
    }

    #[test]
    fn test_build_payload_structure() {
        let client = offline_client();
        let args = RuntimeArgs::new().with("role", Bytes::from([1u8; 32]));
        let payload = client.build_payload(
            &contract_address(),
            "grant_role",
            &args,
            DEFAULT_PAYMENT,
            DEFAULT_TTL,
            None,
        );

        assert_eq!(payload["chain_name"], "casper-test");
        assert_eq!(payload["entry_point"], "grant_role");
        assert_eq!(payload["payment"], "2500000000");
        assert_eq!(payload["ttl_millis"], 1_800_000);
        assert_eq!(
            payload["target"],
            "hash-0101010101010101010101010101010101010101010101010101010101010101"
        );
        assert_eq!(payload["args"][0][0], "role");
        // Hash stamped over the canonical payload
        assert!(payload["hash"].as_str().unwrap().len() == 64);
    }

    #[test]
    fn test_runtime_args_preserve_insertion_order() {
        let args = RuntimeArgs::new()
            .with("b", 2u32)
            .with("a", 1u32)
            .with("amount", U512::from(7u32));
        let json = args.to_json();
        assert_eq!(json[0][0], "b");
        assert_eq!(json[1][0], "a");
        assert_eq!(json[2], json!(["amount", "7"]));
    }

    #[tokio::test]
    async fn test_unsigned_submission_fails_before_network() {
        // Envelope with no approvals: the client must refuse it locally.
        let client = offline_client();
        let tx = Transaction::new(json!({ "hash": "12".repeat(32) }));
        let err = client.send_transaction(tx).await.unwrap_err();
        assert!(matches!(err, Error::MissingSignature));
    }

    #[tokio::test]
    async fn test_send_without_signer_fails() {
        let client = OdraClient::builder("http://127.0.0.1:1/rpc", "http://127.0.0.1:1/rpc").build();
        let err = client
            .call(contract_address(), "set_config")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoSigner));
    }

    #[tokio::test]
    async fn test_aborted_named_value_query_is_cancelled() {
        let client = offline_client();
        let (handle, registration) = AbortHandle::new_pair();
        handle.abort();

        let err = client
            .named_value(contract_address(), "last_heartbeat")
            .abort_on(registration)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Rpc(RpcError::Cancelled)));
    }

    #[test]
    fn test_decode_stored_value() {
        let stored = json!({ "CLValue": { "bytes": "0a0b", "cl_type": "Any" } });
        assert_eq!(
            decode_stored_value(&stored).unwrap(),
            Bytes::from(vec![0x0a, 0x0b])
        );

        let err = decode_stored_value(&json!({ "Account": {} })).unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }

    #[test]
    fn test_decode_execution_result_success() {
        let result = json!({ "Success": { "ret": "7b7d", "cost": "123" } });
        assert_eq!(
            decode_execution_result(&result).unwrap(),
            Bytes::from(vec![0x7b, 0x7d])
        );

        // No return payload decodes as empty bytes.
        let result = json!({ "Success": { "cost": "123" } });
        assert!(decode_execution_result(&result).unwrap().is_empty());
    }

    #[test]
    fn test_decode_execution_result_revert_passes_through() {
        let result = json!({ "Failure": { "error_message": "User error: 45000", "cost": "9" } });
        let err = decode_execution_result(&result).unwrap_err();
        assert_eq!(err.revert_code(), Some(45000));
    }
}
