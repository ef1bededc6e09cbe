//! The GraphQL layer.
//!
//! - [`registry`] — Memoized type construction
//! - [`picks`] — Field shape shorthand
//! - [`inputs`] — Arguments of account-valued fields
//! - [`account`] — The `Account` interface and its concrete types
//! - [`discriminator`] — Concrete type selection for fetched accounts
//! - [`resolvers`] — Field resolvers
//! - [`schema`] — Assembly and the [`RpcGraphQL`] facade

pub mod account;
pub mod discriminator;
pub mod inputs;
pub mod picks;
pub mod registry;
pub mod resolvers;
pub mod schema;

pub use discriminator::{AccountVariant, classify};
pub use registry::{TypeNode, TypeRegistry};
pub use resolvers::{FetchContext, ResolvedAccount};
pub use schema::{RpcGraphQL, RpcGraphQLBuilder, SchemaOptions, build_schema};
