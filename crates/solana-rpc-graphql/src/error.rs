//! Error types for solana-rpc-graphql.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) — Main error type, returned by client construction
//!   - [`RpcError`] — Transport and protocol faults reported by the fetch boundary
//!   - [`ParseAddressError`] — Invalid base58 address
//!   - [`SchemaBuildError`] — Faults while assembling the GraphQL schema
//!
//! A missing account is not an error anywhere in this crate: the fetch
//! boundary reports it as `Ok(None)` and the query layer resolves it to `null`.
//!
//! # Checking Retryable Errors
//!
//! ```rust
//! use solana_rpc_graphql::RpcError;
//!
//! fn should_retry(err: &RpcError) -> bool {
//!     err.is_retryable()
//! }
//! ```

use thiserror::Error;

/// Error parsing a base58 account address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),

    #[error("Invalid address length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
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

    #[error("Timeout after {0} retries")]
    Timeout(u32),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // ─── Request Validation ───
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ─── Generic RPC Error ───
    #[error("RPC error: {message} (code: {code})")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },

    // ─── Node Errors ───
    #[error("Minimum context slot has not been reached (node is at slot {context_slot:?})")]
    MinContextSlotNotReached { context_slot: Option<u64> },

    #[error("Node is unhealthy: {message}")]
    NodeUnhealthy {
        message: String,
        slots_behind: Option<u64>,
    },

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl RpcError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            RpcError::Http(e) => e.is_timeout() || e.is_connect(),
            RpcError::Timeout(_) => true,
            RpcError::Network { retryable, .. } => *retryable,
            RpcError::MinContextSlotNotReached { .. } => true,
            RpcError::NodeUnhealthy { .. } => true,
            RpcError::InternalError(_) => true,
            RpcError::Rpc { code, .. } => *code == -32603,
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
}

// ============================================================================
// Schema Errors
// ============================================================================

/// Faults raised while building the GraphQL schema.
///
/// These are programming errors in the type definitions. They surface from
/// [`RpcGraphQLBuilder::build`](crate::RpcGraphQLBuilder::build), before any
/// query is served.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaBuildError {
    #[error("Type '{0}' is defined more than once")]
    DuplicateType(String),

    #[error("Builder for '{requested}' produced a type named '{produced}'")]
    NameMismatch { requested: String, produced: String },

    #[error("Type '{0}' references itself during construction; defer its fields with a thunk")]
    CyclicConstruction(String),

    #[error("Field '{field}' on '{owner}' references unknown type '{name}'")]
    UnknownType {
        owner: String,
        field: String,
        name: String,
    },

    #[error("Field '{field}' on object '{owner}' has no resolver")]
    MissingResolver { owner: String, field: String },

    #[error("Query engine rejected the schema: {0}")]
    Engine(String),
}

// ============================================================================
// Main Error Type
// ============================================================================

/// Main error type for solana-rpc-graphql operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Configuration ───
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ─── Parsing ───
    #[error(transparent)]
    ParseAddress(#[from] ParseAddressError),

    // ─── Schema ───
    #[error(transparent)]
    Schema(#[from] SchemaBuildError),

    // ─── RPC ───
    #[error(transparent)]
    Rpc(#[from] RpcError),
}
