//! Client for the StyksBlockySupplier contract.
//!
//! The supplier bridges an attestation service to the price feed: prices
//! arrive as a signed payload produced inside an attested enclave, and the
//! contract verifies the signature against its configured key before
//! forwarding the prices. The client only transports the payload; all
//! verification is node-side.

use serde::{Deserialize, Serialize};

use crate::client::OdraClient;
use crate::error::Error;
use crate::types::{Address, Bytes, TransactionHash};

use super::access_control::Role;
use super::price_feed::PriceFeedId;
use super::{role_ops, view_or_none};

/// Revert code the contract raises when no configuration is stored.
const CONFIG_NOT_SET: u32 = 46000;

/// Configuration of the StyksBlockySupplier contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockySupplierConfig {
    /// The expected hash of the attested guest program.
    pub wasm_hash: String,
    /// The signing key the attestation service proves possession of.
    pub public_key: Bytes,
    /// Mapping from CoinGecko identifiers to feed ids.
    pub coingecko_feed_ids: Vec<(String, PriceFeedId)>,
    /// Address of the StyksPriceFeed contract to forward prices to.
    pub price_feed_address: Address,
    /// Tolerance in seconds for report timestamp validation.
    pub timestamp_tolerance: u64,
}

impl BlockySupplierConfig {
    /// The feed id mapped to a CoinGecko identifier, if any.
    pub fn price_feed_id(&self, coingecko_id: &str) -> Option<PriceFeedId> {
        self.coingecko_feed_ids
            .iter()
            .find(|(id, _)| id == coingecko_id)
            .map(|(_, feed_id)| feed_id.clone())
    }
}

/// Typed client for a deployed StyksBlockySupplier contract.
#[derive(Clone, Debug)]
pub struct StyksBlockySupplierClient {
    client: OdraClient,
    address: Address,
}

impl StyksBlockySupplierClient {
    /// Wrap a node client and the contract's address.
    pub fn new(client: OdraClient, address: Address) -> Self {
        Self { client, address }
    }

    /// The contract address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The underlying node client.
    pub fn client(&self) -> &OdraClient {
        &self.client
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Store a new configuration.
    ///
    /// The caller must hold [`Role::SUPPLIER_CONFIG_MANAGER`].
    pub async fn set_config(&self, config: BlockySupplierConfig) -> Result<TransactionHash, Error> {
        self.client
            .call(self.address.clone(), "set_config")
            .arg("config", &config)
            .send()
            .await
    }

    /// The stored configuration.
    ///
    /// Fails with [`Error::NotConfigured`] when none has been set.
    pub async fn get_config(&self) -> Result<BlockySupplierConfig, Error> {
        self.get_config_or_none().await?.ok_or(Error::NotConfigured)
    }

    /// The stored configuration, or `None` when none has been set.
    pub async fn get_config_or_none(&self) -> Result<Option<BlockySupplierConfig>, Error> {
        let view = self.client.view(self.address.clone(), "get_config_or_none");
        view_or_none(view, CONFIG_NOT_SET).await
    }

    // ========================================================================
    // Price reporting
    // ========================================================================

    /// Submit a signed price payload from the attestation service.
    ///
    /// `signature` and `data` are the attestation's signature and payload
    /// bytes, passed through opaquely; the contract verifies the signature,
    /// the guest hash, and the report timestamp, and reverts on any
    /// mismatch.
    pub async fn report_signed_prices(
        &self,
        signature: Bytes,
        data: Bytes,
    ) -> Result<TransactionHash, Error> {
        self.client
            .call(self.address.clone(), "report_signed_prices")
            .arg("signature", &signature)
            .arg("data", &data)
            .send()
            .await
    }

    // ========================================================================
    // Access control
    // ========================================================================

    /// Does `address` hold `role`?
    pub async fn has_role(&self, role: &Role, address: &Address) -> Result<bool, Error> {
        role_ops::has_role(&self.client, &self.address, role, address).await
    }

    /// Grant `role` to `address`. Caller must hold the role's admin role.
    pub async fn grant_role(
        &self,
        role: &Role,
        address: &Address,
    ) -> Result<TransactionHash, Error> {
        role_ops::grant_role(&self.client, &self.address, role, address).await
    }

    /// Revoke `role` from `address`. Caller must hold the role's admin role.
    pub async fn revoke_role(
        &self,
        role: &Role,
        address: &Address,
    ) -> Result<TransactionHash, Error> {
        role_ops::revoke_role(&self.client, &self.address, role, address).await
    }

    /// The admin role of `role`.
    pub async fn get_role_admin(&self, role: &Role) -> Result<Role, Error> {
        role_ops::get_role_admin(&self.client, &self.address, role).await
    }

    /// Renounce a role held by `address` (callable only for oneself).
    pub async fn renounce_role(
        &self,
        role: &Role,
        address: &Address,
    ) -> Result<TransactionHash, Error> {
        role_ops::renounce_role(&self.client, &self.address, role, address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BlockySupplierConfig {
        BlockySupplierConfig {
            wasm_hash: "8c2e...".to_string(),
            public_key: Bytes::from(vec![4u8; 65]),
            coingecko_feed_ids: vec![("casper-network".to_string(), "CSPRUSD".to_string())],
            price_feed_address:
                "hash-0404040404040404040404040404040404040404040404040404040404040404"
                    .parse()
                    .unwrap(),
            timestamp_tolerance: 60,
        }
    }

    #[test]
    fn test_price_feed_id_lookup() {
        let config = config();
        assert_eq!(
            config.price_feed_id("casper-network"),
            Some("CSPRUSD".to_string())
        );
        assert_eq!(config.price_feed_id("bitcoin"), None);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = config();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timestamp_tolerance"], 60);
        assert_eq!(
            json["price_feed_address"],
            "hash-0404040404040404040404040404040404040404040404040404040404040404"
        );
        assert_eq!(json["coingecko_feed_ids"][0][1], "CSPRUSD");
        let back: BlockySupplierConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
