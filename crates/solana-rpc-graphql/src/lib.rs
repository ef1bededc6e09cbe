//! A GraphQL query layer over the Solana JSON-RPC API.
//!
//! **solana-rpc-graphql** serves account state through a typed query
//! interface. A query names the fields it wants, including an account's
//! `owner`, which is itself an account and can be followed to any depth.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use solana_rpc_graphql::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), solana_rpc_graphql::Error> {
//!     let rpc = RpcGraphQL::mainnet().build()?;
//!
//!     let response = rpc
//!         .query(
//!             r#"{
//!                 account(address: "AyGCwnwxQMCqaU4ixReHt8h5W4dwmxU7eM3BEQBdWVca") {
//!                     lamports
//!                     ... on TokenAccount {
//!                         data { parsed { info { mint tokenAmount { uiAmountString } } } }
//!                     }
//!                     owner { executable }
//!                 }
//!             }"#,
//!             serde_json::Value::Null,
//!         )
//!         .await;
//!     println!("{:?}", response.data);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Account Types
//!
//! Every account implements the `Account` interface (`encoding`,
//! `executable`, `lamports`, `rentEpoch`, `owner`). The concrete type is
//! chosen per account from its encoding and, for `jsonParsed` data, the
//! parsing program:
//!
//! - `AccountBase58`, `AccountBase64`, `AccountBase64Zstd` — Raw data as a string
//! - `MintAccount`, `TokenAccount` — SPL token program
//! - `NonceAccount`, `StakeAccount`, `VoteAccount`, `LookupTableAccount`
//!
//! Parsed data the layer does not recognize is served as `AccountBase64`.
//!
//! # Custom Fetchers
//!
//! Account reads go through the [`AccountFetcher`] trait. [`RpcClient`] is
//! used by default; supply another implementation with
//! [`RpcGraphQLBuilder::fetcher`].

pub mod client;
pub mod error;
pub mod graphql;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{Error, ParseAddressError, RpcError, SchemaBuildError};
pub use types::*;

// Re-export client types
pub use client::{AccountFetcher, FetchFuture, NetworkConfig, RetryConfig, RpcClient};

// Re-export GraphQL types
pub use graphql::{AccountVariant, RpcGraphQL, RpcGraphQLBuilder, classify};
