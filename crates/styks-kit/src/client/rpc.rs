//! Low-level JSON-RPC client.
//!
//! One instance per endpoint; the node client holds two (primary for
//! writes, speculative for reads). There is deliberately no retry loop
//! anywhere in this module: reads are cheap for callers to retry, and
//! retrying a write without confirming the prior attempt is a
//! double-spend-shaped hazard. [`RpcError::is_retryable`] exists to help
//! callers make that call themselves.

use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{AbortRegistration, Abortable};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, trace};

use crate::error::RpcError;

/// JSON-RPC request structure.
#[derive(Serialize)]
struct JsonRpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

/// JSON-RPC response structure.
#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Low-level JSON-RPC client for a single node endpoint.
pub struct RpcClient {
    url: String,
    client: reqwest::Client,
    request_id: AtomicU64,
}

impl RpcClient {
    /// Create a new RPC client with the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            request_id: AtomicU64::new(0),
        }
    }

    /// Get the RPC URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make a single RPC call. No retries.
    pub async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        let request_id = self.request_id.fetch_add(1, Ordering::Relaxed);

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: request_id,
            method,
            params: &params,
        };

        debug!(target: "styks_kit::rpc", %method, id = request_id, url = %self.url, "rpc call");
        self.try_call(&request).await
    }

    /// Make a single RPC call that fails with [`RpcError::Cancelled`] when
    /// the given abort registration fires.
    ///
    /// Cancellation does not guarantee the node never received the request:
    /// a cancelled write means "outcome unknown", not "rolled back".
    pub async fn call_abortable<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
        abort: AbortRegistration,
    ) -> Result<R, RpcError> {
        match Abortable::new(self.call(method, params), abort).await {
            Ok(result) => result,
            Err(futures::future::Aborted) => Err(RpcError::Cancelled),
        }
    }

    /// Single attempt to make an RPC call.
    async fn try_call<R: DeserializeOwned>(
        &self,
        request: &JsonRpcRequest<'_, impl Serialize>,
    ) -> Result<R, RpcError> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        trace!(target: "styks_kit::rpc", status = status.as_u16(), body = %body, "rpc response");

        if !status.is_success() {
            let retryable = is_retryable_status(status.as_u16());
            return Err(RpcError::network(
                format!("HTTP {}: {}", status, body),
                Some(status.as_u16()),
                retryable,
            ));
        }

        let rpc_response: JsonRpcResponse<R> =
            serde_json::from_str(&body).map_err(RpcError::Json)?;

        if let Some(error) = rpc_response.error {
            return Err(parse_rpc_error(&error));
        }

        rpc_response
            .result
            .ok_or_else(|| RpcError::InvalidResponse("Missing result in response".to_string()))
    }
}

/// Parse an RPC error into a specific error type.
fn parse_rpc_error(error: &JsonRpcError) -> RpcError {
    // State-query misses: the node reports them as a query failure whose
    // message names the missing key.
    if error.message.contains("ValueNotFound") {
        let key = error
            .data
            .as_ref()
            .and_then(|d| d.as_str())
            .unwrap_or(&error.message);
        return RpcError::ValueNotFound(key.to_string());
    }

    // Contract reverts carry the odra user-error code in the message,
    // e.g. "User error: 45000". Pass the code through unmodified.
    if let Some(code) = parse_user_error_code(&error.message) {
        return RpcError::ContractExecution {
            code: Some(code),
            message: error.message.clone(),
        };
    }

    RpcError::Rpc {
        code: error.code,
        message: error.message.clone(),
        data: error.data.clone(),
    }
}

/// Extract the numeric code from a "User error: NNNNN" revert message.
pub(crate) fn parse_user_error_code(message: &str) -> Option<u32> {
    let rest = message.split("User error:").nth(1)?;
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Whether an HTTP status is worth a caller-side retry.
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::AbortHandle;

    #[test]
    fn test_parse_user_error_code() {
        assert_eq!(parse_user_error_code("User error: 45000"), Some(45000));
        assert_eq!(
            parse_user_error_code("ApiError::User(45007) [131079]"),
            None
        );
        assert_eq!(
            parse_user_error_code("Mismatched versions: User error: 46001 raised"),
            Some(46001)
        );
        assert_eq!(parse_user_error_code("out of gas"), None);
    }

    #[test]
    fn test_parse_rpc_error_value_not_found() {
        let err = parse_rpc_error(&JsonRpcError {
            code: -32003,
            message: "state query failed: ValueNotFound".to_string(),
            data: Some(serde_json::json!("uref-0101-007")),
        });
        assert!(matches!(err, RpcError::ValueNotFound(ref k) if k == "uref-0101-007"));
    }

    #[test]
    fn test_parse_rpc_error_contract_revert() {
        let err = parse_rpc_error(&JsonRpcError {
            code: -32008,
            message: "execution failed: User error: 45000".to_string(),
            data: None,
        });
        assert_eq!(err.revert_code(), Some(45000));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_parse_rpc_error_fallback() {
        let err = parse_rpc_error(&JsonRpcError {
            code: -32600,
            message: "invalid request".to_string(),
            data: None,
        });
        assert!(matches!(err, RpcError::Rpc { code: -32600, .. }));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(429));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(400));
    }

    #[tokio::test]
    async fn test_aborted_call_fails_with_cancelled() {
        let client = RpcClient::new("http://127.0.0.1:1/rpc");
        let (handle, registration) = AbortHandle::new_pair();
        handle.abort();

        let result: Result<serde_json::Value, RpcError> = client
            .call_abortable("info_get_status", serde_json::json!({}), registration)
            .await;
        assert!(matches!(result, Err(RpcError::Cancelled)));
    }
}
