//! Wallet signing.
//!
//! A [`WalletSigner`] is an external signing capability — typically a
//! browser-extension wallet bridged in by the host application. The trait
//! mirrors that surface: connection management, an active key, and a
//! signing prompt that the user may cancel.
//!
//! [`Wallet`] drives the flow the Styks clients need: ensure a connection,
//! resolve the signing key, sign the canonical payload hash, attach the
//! approval. Each step fails with its own [`SignerError`] variant because
//! callers present different UX for a refused connection, a wallet with no
//! active key, and a user-dismissed prompt.
//!
//! # Example
//!
//! ```rust,no_run
//! use styks_kit::{InMemoryWallet, Wallet};
//!
//! # async fn example() -> Result<(), styks_kit::Error> {
//! let wallet = Wallet::new(InMemoryWallet::generate());
//! let signature = wallet.sign_message(b"ping", None).await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ed25519_dalek::{Signer as _, SigningKey};
use rand::rngs::OsRng;

use crate::error::SignerError;
use crate::types::{Deploy, PublicKey, Signature, Transaction, TransactionHash};

/// Boxed future returned by [`WalletSigner`] methods.
pub type WalletFuture<T> = Pin<Box<dyn Future<Output = Result<T, SignerError>> + Send>>;

// ============================================================================
// WalletSigner Trait
// ============================================================================

/// An external signing capability.
///
/// All methods are asynchronous and fallible: a wallet may be missing,
/// locked, or the user may dismiss its prompt. Implementations map those
/// situations onto the [`SignerError`] variants — `Unavailable` for a
/// refused or impossible connection, `NoActiveKey` when no account is
/// selected, `Cancelled` for a dismissed prompt, and `Rejected` when the
/// wallet refuses to sign.
pub trait WalletSigner: Send + Sync {
    /// Request a connection to the wallet.
    fn connect(&self) -> WalletFuture<()>;

    /// Disconnect from the wallet. Returns whether a connection was closed.
    fn disconnect(&self) -> WalletFuture<bool>;

    /// Is the wallet currently connected?
    fn is_connected(&self) -> WalletFuture<bool>;

    /// The public key of the currently active account.
    fn get_active_public_key(&self) -> WalletFuture<PublicKey>;

    /// Sign a message with the given key.
    fn sign(&self, message: Vec<u8>, public_key: PublicKey) -> WalletFuture<Signature>;

    /// Ask the wallet to switch accounts. Returns whether it switched.
    fn switch_account(&self) -> WalletFuture<bool>;
}

impl WalletSigner for Arc<dyn WalletSigner> {
    fn connect(&self) -> WalletFuture<()> {
        (**self).connect()
    }

    fn disconnect(&self) -> WalletFuture<bool> {
        (**self).disconnect()
    }

    fn is_connected(&self) -> WalletFuture<bool> {
        (**self).is_connected()
    }

    fn get_active_public_key(&self) -> WalletFuture<PublicKey> {
        (**self).get_active_public_key()
    }

    fn sign(&self, message: Vec<u8>, public_key: PublicKey) -> WalletFuture<Signature> {
        (**self).sign(message, public_key)
    }

    fn switch_account(&self) -> WalletFuture<bool> {
        (**self).switch_account()
    }
}

// ============================================================================
// Wallet
// ============================================================================

/// Drives the signing flow over any [`WalletSigner`].
#[derive(Clone)]
pub struct Wallet {
    signer: Arc<dyn WalletSigner>,
}

impl Wallet {
    /// Wrap a signer implementation.
    pub fn new(signer: impl WalletSigner + 'static) -> Self {
        Self {
            signer: Arc::new(signer),
        }
    }

    /// Wrap an already-shared signer.
    pub fn from_arc(signer: Arc<dyn WalletSigner>) -> Self {
        Self { signer }
    }

    /// The underlying signer.
    pub fn signer(&self) -> &Arc<dyn WalletSigner> {
        &self.signer
    }

    /// Ensure the wallet is connected, connecting if necessary.
    async fn ensure_connected(&self) -> Result<(), SignerError> {
        if self.signer.is_connected().await? {
            return Ok(());
        }
        self.signer.connect().await
    }

    /// Use the supplied key, or resolve the wallet's active key.
    async fn resolve_key(&self, key: Option<PublicKey>) -> Result<PublicKey, SignerError> {
        match key {
            Some(key) => Ok(key),
            None => self.signer.get_active_public_key().await,
        }
    }

    /// Connect if necessary and return the wallet's active public key.
    pub async fn active_key(&self) -> Result<PublicKey, SignerError> {
        self.ensure_connected().await?;
        self.signer.get_active_public_key().await
    }

    /// Sign an arbitrary message: connect, resolve the key, prompt.
    pub async fn sign_message(
        &self,
        message: &[u8],
        public_key: Option<PublicKey>,
    ) -> Result<Signature, SignerError> {
        self.ensure_connected().await?;
        let key = self.resolve_key(public_key).await?;
        self.signer.sign(message.to_vec(), key).await
    }

    /// Sign a transaction hash.
    pub async fn sign_transaction_hash(
        &self,
        hash: &TransactionHash,
        public_key: Option<PublicKey>,
    ) -> Result<Signature, SignerError> {
        self.sign_message(hash.as_bytes(), public_key).await
    }

    /// Sign a transaction envelope and attach the approval.
    ///
    /// Consumes the envelope; the returned one carries the new signature.
    pub async fn sign_transaction(
        &self,
        transaction: Transaction,
        public_key: Option<PublicKey>,
    ) -> Result<Transaction, SignerError> {
        let hash = transaction.hash().ok_or_else(|| {
            SignerError::SigningFailed("transaction payload carries no hash".to_string())
        })?;
        self.ensure_connected().await?;
        let key = self.resolve_key(public_key).await?;
        let signature = self.signer.sign(hash.as_bytes().to_vec(), key.clone()).await?;
        Ok(transaction.add_signature(key, signature))
    }

    /// Sign a deploy envelope and attach the approval.
    pub async fn sign_deploy(
        &self,
        deploy: Deploy,
        public_key: Option<PublicKey>,
    ) -> Result<Deploy, SignerError> {
        let hash = deploy.hash().ok_or_else(|| {
            SignerError::SigningFailed("deploy payload carries no hash".to_string())
        })?;
        self.ensure_connected().await?;
        let key = self.resolve_key(public_key).await?;
        let signature = self.signer.sign(hash.as_bytes().to_vec(), key.clone()).await?;
        Ok(deploy.add_signature(key, signature))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet").finish_non_exhaustive()
    }
}

// ============================================================================
// InMemoryWallet
// ============================================================================

/// A wallet holding a single Ed25519 key in memory.
///
/// Never prompts and never cancels; useful for tests and headless tools.
/// Refuses to sign for any key other than its own.
pub struct InMemoryWallet {
    signing_key: SigningKey,
    public_key: PublicKey,
    connected: AtomicBool,
}

impl InMemoryWallet {
    /// Generate a new random key pair.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Create from a raw 32-byte Ed25519 seed.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(&bytes))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let public_key =
            PublicKey::ed25519_from_bytes(signing_key.verifying_key().to_bytes())
                .expect("verifying key bytes are a valid curve point");
        Self {
            signing_key,
            public_key,
            connected: AtomicBool::new(false),
        }
    }

    /// The wallet's public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl WalletSigner for InMemoryWallet {
    fn connect(&self) -> WalletFuture<()> {
        self.connected.store(true, Ordering::Relaxed);
        Box::pin(async { Ok(()) })
    }

    fn disconnect(&self) -> WalletFuture<bool> {
        let was_connected = self.connected.swap(false, Ordering::Relaxed);
        Box::pin(async move { Ok(was_connected) })
    }

    fn is_connected(&self) -> WalletFuture<bool> {
        let connected = self.connected.load(Ordering::Relaxed);
        Box::pin(async move { Ok(connected) })
    }

    fn get_active_public_key(&self) -> WalletFuture<PublicKey> {
        let key = self.public_key.clone();
        Box::pin(async move { Ok(key) })
    }

    fn sign(&self, message: Vec<u8>, public_key: PublicKey) -> WalletFuture<Signature> {
        if public_key != self.public_key {
            return Box::pin(async move {
                Err(SignerError::Rejected(format!(
                    "key {public_key} is not held by this wallet"
                )))
            });
        }
        let signature = self.signing_key.sign(&message);
        let signature = Signature::ed25519_from_bytes(signature.to_bytes());
        Box::pin(async move { Ok(signature) })
    }

    fn switch_account(&self) -> WalletFuture<bool> {
        // Single-key wallet; there is nothing to switch to.
        Box::pin(async { Ok(false) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HASH_HEX: &str = "1212121212121212121212121212121212121212121212121212121212121212";

    fn wallet() -> (Wallet, PublicKey) {
        let inner = InMemoryWallet::from_secret_bytes([42u8; 32]);
        let key = inner.public_key().clone();
        (Wallet::new(inner), key)
    }

    #[tokio::test]
    async fn test_sign_message_resolves_active_key() {
        let (wallet, _) = wallet();
        let signature = wallet.sign_message(b"ping", None).await.unwrap();
        assert_eq!(signature.as_bytes().len(), 64);
    }

    #[tokio::test]
    async fn test_sign_message_is_deterministic_per_key() {
        let (wallet, key) = wallet();
        let a = wallet.sign_message(b"ping", Some(key.clone())).await.unwrap();
        let b = wallet.sign_message(b"ping", Some(key)).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_sign_with_foreign_key_is_rejected() {
        let (wallet, _) = wallet();
        let other = InMemoryWallet::from_secret_bytes([7u8; 32])
            .public_key()
            .clone();
        let err = wallet.sign_message(b"ping", Some(other)).await.unwrap_err();
        assert!(matches!(err, SignerError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_sign_transaction_attaches_approval() {
        let (wallet, key) = wallet();
        let tx = Transaction::new(json!({ "hash": HASH_HEX }));
        let tx = wallet.sign_transaction(tx, None).await.unwrap();
        assert!(tx.is_signed());
        assert_eq!(tx.approvals().len(), 1);
        assert_eq!(tx.approvals()[0].signer, key);
    }

    #[tokio::test]
    async fn test_sign_transaction_without_hash_fails() {
        let (wallet, _) = wallet();
        let tx = Transaction::new(json!({ "chain_name": "casper-test" }));
        let err = wallet.sign_transaction(tx, None).await.unwrap_err();
        assert!(matches!(err, SignerError::SigningFailed(_)));
    }

    #[tokio::test]
    async fn test_sign_deploy_twice_accumulates_approvals() {
        let (wallet, _) = wallet();
        let other = InMemoryWallet::from_secret_bytes([9u8; 32]);
        let other_wallet = Wallet::new(other);

        let deploy = Deploy::new(json!({ "hash": HASH_HEX }));
        let deploy = wallet.sign_deploy(deploy, None).await.unwrap();
        let deploy = other_wallet.sign_deploy(deploy, None).await.unwrap();
        assert_eq!(deploy.approvals().len(), 2);
        assert_ne!(
            deploy.approvals()[0].signer,
            deploy.approvals()[1].signer
        );
    }

    #[tokio::test]
    async fn test_connection_lifecycle() {
        let inner = InMemoryWallet::from_secret_bytes([1u8; 32]);
        assert!(!inner.is_connected().await.unwrap());
        inner.connect().await.unwrap();
        assert!(inner.is_connected().await.unwrap());
        assert!(inner.disconnect().await.unwrap());
        assert!(!inner.is_connected().await.unwrap());
        // Disconnecting again reports no open connection.
        assert!(!inner.disconnect().await.unwrap());
    }
}
