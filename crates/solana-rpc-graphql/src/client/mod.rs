//! Client module for reading account state from a Solana RPC node.
//!
//! - [`RpcClient`] — Low-level JSON-RPC client with retry logic
//! - [`AccountFetcher`] — The fetch boundary the GraphQL layer resolves through

mod fetch;
mod rpc;

pub use fetch::{AccountFetcher, FetchFuture};
pub use rpc::{DEVNET, LOCALNET, MAINNET, NetworkConfig, RetryConfig, RpcClient, TESTNET};
