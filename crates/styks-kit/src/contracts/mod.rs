//! Typed clients for the Styks contracts.
//!
//! Each client wraps an [`OdraClient`](crate::OdraClient) and a contract
//! [`Address`](crate::Address). Contract state travels as JSON-encoded
//! bytes and is decoded into the typed records defined here; node-side
//! verdicts (reverts, tolerance checks) pass through unmodified.

mod access_control;
mod blocky_supplier;
mod price_feed;

pub use access_control::{Role, RoleAdminChanged, RoleGranted, RoleRevoked};
pub use blocky_supplier::{BlockySupplierConfig, StyksBlockySupplierClient};
pub use price_feed::{Price, PriceFeedConfig, PriceFeedId, StyksPriceFeedClient};

use serde::de::DeserializeOwned;

use crate::client::ViewCall;
use crate::error::Error;
use crate::types::Bytes;

/// Decode a JSON-encoded contract value.
fn decode_json<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, Error> {
    serde_json::from_slice(bytes).map_err(Error::Json)
}

/// Run a view that may legitimately find nothing.
async fn view_or_none<T: DeserializeOwned>(
    view: ViewCall,
    not_set_code: u32,
) -> Result<Option<T>, Error> {
    absent_as_none(view.await, not_set_code)
}

/// Turn "nothing stored" outcomes into `Ok(None)`.
///
/// An empty result, a missing stored value, or a revert with the
/// contract's "config not set" code all mean the value is absent — an
/// answer, not an error. Every other failure propagates.
fn absent_as_none<T: DeserializeOwned>(
    result: Result<Bytes, Error>,
    not_set_code: u32,
) -> Result<Option<T>, Error> {
    match result {
        Ok(bytes) if bytes.is_empty() => Ok(None),
        Ok(bytes) => Ok(Some(decode_json(&bytes)?)),
        Err(Error::Rpc(e)) if e.revert_code() == Some(not_set_code) || e.is_value_not_found() => {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Role operations shared by both contracts, mirroring the access-control
/// module they both embed.
mod role_ops {
    use crate::client::OdraClient;
    use crate::error::Error;
    use crate::types::{Address, TransactionHash};

    use super::access_control::Role;
    use super::decode_json;

    pub(super) async fn has_role(
        client: &OdraClient,
        contract: &Address,
        role: &Role,
        address: &Address,
    ) -> Result<bool, Error> {
        let bytes = client
            .view(contract.clone(), "has_role")
            .arg("role", role)
            .arg("address", address)
            .await?;
        decode_json(&bytes)
    }

    pub(super) async fn grant_role(
        client: &OdraClient,
        contract: &Address,
        role: &Role,
        address: &Address,
    ) -> Result<TransactionHash, Error> {
        client
            .call(contract.clone(), "grant_role")
            .arg("role", role)
            .arg("address", address)
            .send()
            .await
    }

    pub(super) async fn revoke_role(
        client: &OdraClient,
        contract: &Address,
        role: &Role,
        address: &Address,
    ) -> Result<TransactionHash, Error> {
        client
            .call(contract.clone(), "revoke_role")
            .arg("role", role)
            .arg("address", address)
            .send()
            .await
    }

    pub(super) async fn get_role_admin(
        client: &OdraClient,
        contract: &Address,
        role: &Role,
    ) -> Result<Role, Error> {
        let bytes = client
            .view(contract.clone(), "get_role_admin")
            .arg("role", role)
            .await?;
        decode_json(&bytes)
    }

    pub(super) async fn renounce_role(
        client: &OdraClient,
        contract: &Address,
        role: &Role,
        address: &Address,
    ) -> Result<TransactionHash, Error> {
        client
            .call(contract.clone(), "renounce_role")
            .arg("role", role)
            .arg("address", address)
            .send()
            .await
    }
}
