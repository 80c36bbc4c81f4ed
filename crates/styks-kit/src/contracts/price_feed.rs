//! Client for the StyksPriceFeed contract.

use serde::{Deserialize, Serialize};

use crate::client::OdraClient;
use crate::error::{ConfigError, Error};
use crate::types::{Address, TransactionHash};

use super::access_control::Role;
use super::{decode_json, role_ops, view_or_none};

/// Revert code the contract raises when no configuration is stored.
const CONFIG_NOT_SET: u32 = 45000;

/// A price feed identifier, e.g. `"CSPRUSD"`.
pub type PriceFeedId = String;

/// A reported price in the feed's fixed-point convention.
pub type Price = u64;

/// Configuration of the StyksPriceFeed contract.
///
/// Heartbeat parameters gate *when* a price may be reported; TWAP
/// parameters gate how reported prices are smoothed and how many missed
/// heartbeats the average tolerates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFeedConfig {
    /// Seconds between expected feed updates.
    pub heartbeat_interval: u64,
    /// Maximum distance in seconds from a heartbeat at which an update is
    /// still accepted.
    pub heartbeat_tolerance: u64,
    /// Number of heartbeats in the time-weighted average window.
    pub twap_window: u32,
    /// Maximum number of missed values the average tolerates.
    pub twap_tolerance: u32,
    /// The feed identifiers this contract serves.
    pub price_feed_ids: Vec<PriceFeedId>,
}

impl PriceFeedConfig {
    /// Validate the configuration client-side.
    ///
    /// The contract enforces the same rules; failing here avoids paying for
    /// a submission that is certain to revert.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat_interval == 0 {
            return Err(ConfigError::HeartbeatIntervalZero);
        }
        // Tolerance windows of two consecutive heartbeats must not overlap.
        if self.heartbeat_tolerance >= self.heartbeat_interval / 2 {
            return Err(ConfigError::HeartbeatToleranceTooLarge);
        }

        if self.twap_window == 0 {
            return Err(ConfigError::TwapWindowZero);
        }
        if self.twap_tolerance >= self.twap_window {
            return Err(ConfigError::TwapToleranceTooLarge);
        }

        let mut seen: Vec<&str> = Vec::new();
        for id in &self.price_feed_ids {
            if id.is_empty() {
                return Err(ConfigError::EmptyPriceFeedId);
            }
            if seen.contains(&id.as_str()) {
                return Err(ConfigError::DuplicatePriceFeedId(id.clone()));
            }
            seen.push(id);
        }

        Ok(())
    }

    /// The feed identifiers in the order the contract expects reports.
    pub fn sorted_price_feed_ids(&self) -> Vec<PriceFeedId> {
        let mut ids = self.price_feed_ids.clone();
        ids.sort();
        ids
    }
}

/// Typed client for a deployed StyksPriceFeed contract.
///
/// Reads go to the speculative node; writes are signed with the client's
/// wallet and submitted once to the primary node.
#[derive(Clone, Debug)]
pub struct StyksPriceFeedClient {
    client: OdraClient,
    address: Address,
}

impl StyksPriceFeedClient {
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

    /// Validate and store a new configuration.
    ///
    /// The caller must hold [`Role::CONFIG_MANAGER`].
    pub async fn set_config(&self, config: PriceFeedConfig) -> Result<TransactionHash, Error> {
        config.validate()?;
        self.client
            .call(self.address.clone(), "set_config")
            .arg("config", &config)
            .send()
            .await
    }

    /// The stored configuration.
    ///
    /// Fails with [`Error::NotConfigured`] when none has been set — callers
    /// that expect that state should use [`get_config_or_none`](Self::get_config_or_none).
    pub async fn get_config(&self) -> Result<PriceFeedConfig, Error> {
        self.get_config_or_none().await?.ok_or(Error::NotConfigured)
    }

    /// The stored configuration, or `None` when none has been set.
    ///
    /// "Not configured" is an answer here, never an error; query failures
    /// still propagate.
    pub async fn get_config_or_none(&self) -> Result<Option<PriceFeedConfig>, Error> {
        let view = self.client.view(self.address.clone(), "get_config");
        view_or_none(view, CONFIG_NOT_SET).await
    }

    // ========================================================================
    // Feed operations
    // ========================================================================

    /// Report one price per configured feed id.
    ///
    /// The caller must hold [`Role::PRICE_SUPPLIER`], the current time must
    /// be inside a heartbeat window, and the ids must match the configured
    /// set exactly; the contract reverts otherwise and the revert surfaces
    /// unmodified.
    pub async fn add_to_feed(
        &self,
        input: Vec<(PriceFeedId, Price)>,
    ) -> Result<TransactionHash, Error> {
        self.client
            .call(self.address.clone(), "add_to_feed")
            .arg("input", &input)
            .send()
            .await
    }

    /// The stored TWAP window for a feed, `None` entries marking missed
    /// heartbeats.
    pub async fn get_current_twap_store(
        &self,
        id: &str,
    ) -> Result<Vec<Option<Price>>, Error> {
        let bytes = self
            .client
            .view(self.address.clone(), "get_current_twap_store")
            .arg("id", id)
            .await?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        decode_json(&bytes)
    }

    /// The current time-weighted average price for a feed, or `None` while
    /// the window holds too few values.
    pub async fn get_twap_price(&self, id: &str) -> Result<Option<Price>, Error> {
        let bytes = self
            .client
            .view(self.address.clone(), "get_twap_price")
            .arg("id", id)
            .await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        decode_json(&bytes)
    }

    /// The last recorded heartbeat time in seconds, or `None` before the
    /// first accepted report.
    pub async fn get_last_heartbeat(&self) -> Result<Option<u64>, Error> {
        let bytes = self
            .client
            .view(self.address.clone(), "get_last_heartbeat")
            .await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        decode_json(&bytes)
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

    fn valid_config() -> PriceFeedConfig {
        PriceFeedConfig {
            heartbeat_interval: 100,
            heartbeat_tolerance: 10,
            twap_window: 3,
            twap_tolerance: 1,
            price_feed_ids: vec!["CSPRUSD".to_string()],
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(valid_config().validate(), Ok(()));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = valid_config();
        config.heartbeat_interval = 0;
        assert_eq!(config.validate(), Err(ConfigError::HeartbeatIntervalZero));
    }

    #[test]
    fn test_tolerance_must_be_under_half_interval() {
        let mut config = valid_config();
        config.heartbeat_tolerance = 50;
        assert_eq!(
            config.validate(),
            Err(ConfigError::HeartbeatToleranceTooLarge)
        );
        config.heartbeat_tolerance = 49;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_zero_twap_window_rejected() {
        let mut config = valid_config();
        config.twap_window = 0;
        config.twap_tolerance = 0;
        assert_eq!(config.validate(), Err(ConfigError::TwapWindowZero));
    }

    #[test]
    fn test_twap_tolerance_must_be_under_window() {
        let mut config = valid_config();
        config.twap_tolerance = 3;
        assert_eq!(config.validate(), Err(ConfigError::TwapToleranceTooLarge));
    }

    #[test]
    fn test_feed_ids_must_be_nonempty_and_unique() {
        let mut config = valid_config();
        config.price_feed_ids = vec!["".to_string()];
        assert_eq!(config.validate(), Err(ConfigError::EmptyPriceFeedId));

        config.price_feed_ids = vec!["CSPRUSD".to_string(), "CSPRUSD".to_string()];
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicatePriceFeedId("CSPRUSD".to_string()))
        );
    }

    #[test]
    fn test_sorted_price_feed_ids() {
        let mut config = valid_config();
        config.price_feed_ids = vec!["ETHUSD".to_string(), "BTCUSD".to_string()];
        assert_eq!(
            config.sorted_price_feed_ids(),
            vec!["BTCUSD".to_string(), "ETHUSD".to_string()]
        );
        // The stored order is untouched.
        assert_eq!(config.price_feed_ids[0], "ETHUSD");
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = valid_config();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["heartbeat_interval"], 100);
        assert_eq!(json["price_feed_ids"][0], "CSPRUSD");
        let back: PriceFeedConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
