//! Low-level JSON-RPC client for Solana.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::RpcError;
use crate::types::{AccountInfo, AccountRequest, Commitment, FetchedAccount, RpcResponse};

/// Cluster configuration presets.
pub struct NetworkConfig {
    /// The RPC URL for this cluster.
    pub rpc_url: &'static str,
    /// The cluster identifier (e.g., "mainnet-beta", "devnet").
    pub network_id: &'static str,
}

/// Mainnet-beta configuration.
pub const MAINNET: NetworkConfig = NetworkConfig {
    rpc_url: "https://api.mainnet-beta.solana.com",
    network_id: "mainnet-beta",
};

/// Devnet configuration.
pub const DEVNET: NetworkConfig = NetworkConfig {
    rpc_url: "https://api.devnet.solana.com",
    network_id: "devnet",
};

/// Testnet configuration.
pub const TESTNET: NetworkConfig = NetworkConfig {
    rpc_url: "https://api.testnet.solana.com",
    network_id: "testnet",
};

/// Local test validator configuration.
pub const LOCALNET: NetworkConfig = NetworkConfig {
    rpc_url: "http://127.0.0.1:8899",
    network_id: "localnet",
};

/// Retry configuration for RPC calls.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Initial delay in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

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

// Server error codes from the Solana JSON-RPC service.
const NODE_UNHEALTHY: i64 = -32005;
const MIN_CONTEXT_SLOT_NOT_REACHED: i64 = -32016;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

/// Low-level JSON-RPC client for Solana.
pub struct RpcClient {
    url: String,
    client: reqwest::Client,
    retry_config: RetryConfig,
    request_id: AtomicU64,
}

impl RpcClient {
    /// Create a new RPC client with the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_retry_config(url, RetryConfig::default())
    }

    /// Create a new RPC client with custom retry configuration.
    pub fn with_retry_config(url: impl Into<String>, retry_config: RetryConfig) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            retry_config,
            request_id: AtomicU64::new(0),
        }
    }

    /// Get the RPC URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make a raw RPC call with retries.
    pub async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        let total_attempts = self.retry_config.max_retries + 1;

        for attempt in 0..total_attempts {
            let request_id = self.request_id.fetch_add(1, Ordering::Relaxed);

            let request = JsonRpcRequest {
                jsonrpc: "2.0",
                id: request_id,
                method,
                params: &params,
            };

            match self.try_call::<R>(&request).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < total_attempts - 1 => {
                    let delay = std::cmp::min(
                        self.retry_config.initial_delay_ms * 2u64.pow(attempt),
                        self.retry_config.max_delay_ms,
                    );
                    warn!(method, attempt, delay_ms = delay, error = %e, "Retrying RPC call");
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(RpcError::Timeout(total_attempts))
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
            return Err(parse_rpc_error(error));
        }

        rpc_response
            .result
            .ok_or_else(|| RpcError::InvalidResponse("Missing result in response".to_string()))
    }

    // ========================================================================
    // High-level RPC methods
    // ========================================================================

    /// Fetch a single account.
    ///
    /// Returns `Ok(None)` when no account exists at the address.
    pub async fn get_account_info(
        &self,
        request: &AccountRequest,
    ) -> Result<Option<FetchedAccount>, RpcError> {
        request.validate()?;
        debug!(
            address = %request.address,
            encoding = request.encoding.as_str(),
            commitment = ?request.commitment,
            "Fetching account"
        );

        let response: RpcResponse<Option<AccountInfo>> =
            self.call("getAccountInfo", request.to_rpc_params()).await?;

        Ok(response
            .value
            .map(|info| FetchedAccount::new(request, response.context.slot, info)))
    }

    /// Lamports an account of `data_len` bytes must hold to be rent exempt.
    pub async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: u64,
        commitment: Option<Commitment>,
    ) -> Result<u64, RpcError> {
        let params = match commitment {
            Some(c) => serde_json::json!([data_len, { "commitment": c.as_str() }]),
            None => serde_json::json!([data_len]),
        };
        self.call("getMinimumBalanceForRentExemption", params).await
    }
}

impl Clone for RpcClient {
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            client: self.client.clone(),
            retry_config: self.retry_config.clone(),
            request_id: AtomicU64::new(0),
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("url", &self.url)
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if an HTTP status code is retryable.
fn is_retryable_status(status: u16) -> bool {
    // 408 Request Timeout, 429 Too Many Requests, 5xx Server Errors
    status == 408 || status == 429 || (500..600).contains(&status)
}

/// Map a JSON-RPC error object onto a specific error type.
fn parse_rpc_error(error: JsonRpcError) -> RpcError {
    let data = error.data.as_ref();
    match error.code {
        MIN_CONTEXT_SLOT_NOT_REACHED => RpcError::MinContextSlotNotReached {
            context_slot: data
                .and_then(|d| d.get("contextSlot"))
                .and_then(|s| s.as_u64()),
        },
        NODE_UNHEALTHY => RpcError::NodeUnhealthy {
            slots_behind: data
                .and_then(|d| d.get("numSlotsBehind"))
                .and_then(|s| s.as_u64()),
            message: error.message,
        },
        INVALID_PARAMS => RpcError::InvalidParams(error.message),
        INTERNAL_ERROR => RpcError::InternalError(error.message),
        code => RpcError::Rpc {
            code,
            message: error.message,
            data: error.data,
        },
    }
}
