//! Schema assembly and the query facade.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use async_graphql::dynamic::{
    Enum, EnumItem, Field, InputObject, InputValue, Interface, InterfaceField, Object, Scalar,
    Schema, Type,
};
use async_graphql::{Request, Response, Variables};
use tracing::info;

use super::account::{account_interface, account_types};
use super::inputs::account_arguments;
use super::picks::{ScalarKind, scalar};
use super::registry::{FieldDef, FieldSet, FieldType, InputValueDef, TypeKind, TypeNode, TypeRegistry};
use super::resolvers::{self, FetchContext};
use crate::client::{AccountFetcher, DEVNET, LOCALNET, MAINNET, RetryConfig, RpcClient, TESTNET};
use crate::error::{Error, SchemaBuildError};
use crate::types::Commitment;

/// Name of the root query type.
pub const QUERY: &str = "Query";

/// Engine limits applied to every query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchemaOptions {
    pub max_depth: Option<usize>,
    pub max_complexity: Option<usize>,
}

/// The root `Query` type.
pub fn query_type(registry: &TypeRegistry) -> Result<Rc<TypeNode>, SchemaBuildError> {
    registry.get_or_create(QUERY, |registry| {
        let account = account_interface(registry)?;
        let address = FieldType::named(&scalar(registry, ScalarKind::String)?).non_null();
        let mut args = vec![InputValueDef::new("address", address)];
        args.extend(account_arguments(registry)?);
        Ok(TypeNode::object(
            QUERY,
            FieldSet::ready(vec![
                FieldDef::new("account", FieldType::named(&account))
                    .description("Fetch an account by its base58 address")
                    .arguments(args)
                    .resolver(resolvers::root_account()),
            ]),
        ))
    })
}

/// Register the root query and every account type, then hand the result to
/// the query engine.
///
/// Each registered node becomes exactly one engine type. Built-in scalars are
/// provided by the engine and skipped.
pub fn build_schema(
    registry: &TypeRegistry,
    options: SchemaOptions,
    context: FetchContext,
) -> Result<Schema, SchemaBuildError> {
    query_type(registry)?;
    account_types(registry)?;
    let nodes = registry.force_all()?;

    let mut builder = Schema::build(QUERY, None, None);
    let mut registered = 0;
    for node in &nodes {
        if let Some(ty) = translate(node, registry)? {
            builder = builder.register(ty);
            registered += 1;
        }
    }
    if let Some(depth) = options.max_depth {
        builder = builder.limit_depth(depth);
    }
    if let Some(complexity) = options.max_complexity {
        builder = builder.limit_complexity(complexity);
    }

    let schema = builder
        .data(context)
        .finish()
        .map_err(|e| SchemaBuildError::Engine(e.to_string()))?;
    info!(types = registered, "Assembled account schema");
    Ok(schema)
}

fn translate(node: &TypeNode, registry: &TypeRegistry) -> Result<Option<Type>, SchemaBuildError> {
    let ty: Type = match node.kind() {
        TypeKind::Scalar { builtin: true, .. } => return Ok(None),
        TypeKind::Scalar { validator, .. } => {
            let mut custom = Scalar::new(node.name());
            if let Some(description) = node.description() {
                custom = custom.description(description);
            }
            if let Some(validator) = *validator {
                custom = custom.validator(validator);
            }
            custom.into()
        }
        TypeKind::Enum { values } => {
            let mut enumeration = Enum::new(node.name());
            if let Some(description) = node.description() {
                enumeration = enumeration.description(description);
            }
            values
                .iter()
                .fold(enumeration, |e, value| e.item(EnumItem::new(value.as_str())))
                .into()
        }
        TypeKind::InputObject { fields } => {
            let mut input = InputObject::new(node.name());
            if let Some(description) = node.description() {
                input = input.description(description);
            }
            fields
                .iter()
                .fold(input, |input, field| input.field(input_value(field)))
                .into()
        }
        TypeKind::Object { interfaces, .. } => {
            let mut object = Object::new(node.name());
            if let Some(description) = node.description() {
                object = object.description(description);
            }
            for interface in interfaces {
                object = object.implement(interface.as_str());
            }
            for field in node.fields(registry)? {
                object = object.field(object_field(node, field)?);
            }
            object.into()
        }
        TypeKind::Interface { .. } => {
            let mut interface = Interface::new(node.name());
            if let Some(description) = node.description() {
                interface = interface.description(description);
            }
            for field in node.fields(registry)? {
                let mut f = InterfaceField::new(field.name.as_str(), field.ty.to_type_ref());
                if let Some(description) = &field.description {
                    f = f.description(description.as_str());
                }
                for arg in &field.args {
                    f = f.argument(input_value(arg));
                }
                interface = interface.field(f);
            }
            interface.into()
        }
    };
    Ok(Some(ty))
}

fn object_field(owner: &TypeNode, field: &FieldDef) -> Result<Field, SchemaBuildError> {
    let resolve = field
        .resolver
        .clone()
        .ok_or_else(|| SchemaBuildError::MissingResolver {
            owner: owner.name().to_string(),
            field: field.name.clone(),
        })?;
    let mut f = Field::new(field.name.as_str(), field.ty.to_type_ref(), move |ctx| {
        resolve(ctx)
    });
    if let Some(description) = &field.description {
        f = f.description(description.as_str());
    }
    for arg in &field.args {
        f = f.argument(input_value(arg));
    }
    Ok(f)
}

fn input_value(def: &InputValueDef) -> InputValue {
    InputValue::new(def.name.as_str(), def.ty.to_type_ref())
}

// ============================================================================
// RpcGraphQL
// ============================================================================

/// A GraphQL endpoint over Solana account state.
///
/// Holds a finished schema; cheap to clone and safe to share between tasks.
///
/// # Example
///
/// ```rust,no_run
/// use solana_rpc_graphql::*;
///
/// # async fn example() -> Result<(), solana_rpc_graphql::Error> {
/// let rpc = RpcGraphQL::devnet().commitment(Commitment::Confirmed).build()?;
///
/// let response = rpc
///     .query(
///         r#"query ($address: String!) {
///             account(address: $address) {
///                 lamports
///                 owner { executable }
///             }
///         }"#,
///         serde_json::json!({ "address": "AyGCwnwxQMCqaU4ixReHt8h5W4dwmxU7eM3BEQBdWVca" }),
///     )
///     .await;
/// println!("{:?}", response.data);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RpcGraphQL {
    schema: Schema,
}

impl RpcGraphQL {
    /// Create a builder for mainnet-beta.
    pub fn mainnet() -> RpcGraphQLBuilder {
        RpcGraphQLBuilder::new(MAINNET.rpc_url)
    }

    /// Create a builder for devnet.
    pub fn devnet() -> RpcGraphQLBuilder {
        RpcGraphQLBuilder::new(DEVNET.rpc_url)
    }

    /// Create a builder for testnet.
    pub fn testnet() -> RpcGraphQLBuilder {
        RpcGraphQLBuilder::new(TESTNET.rpc_url)
    }

    /// Create a builder for a local test validator.
    pub fn localnet() -> RpcGraphQLBuilder {
        RpcGraphQLBuilder::new(LOCALNET.rpc_url)
    }

    /// Create a builder with a custom RPC URL.
    pub fn builder(rpc_url: impl Into<String>) -> RpcGraphQLBuilder {
        RpcGraphQLBuilder::new(rpc_url)
    }

    /// Create a configured endpoint from environment variables.
    ///
    /// Reads:
    /// - `SOLANA_NETWORK` (optional): `"mainnet"`, `"devnet"`, `"testnet"`,
    ///   `"localnet"`, or a custom RPC URL. Defaults to `"devnet"`.
    /// - `SOLANA_COMMITMENT` (optional): `"processed"`, `"confirmed"` or
    ///   `"finalized"`, used when a query does not set one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unknown `SOLANA_COMMITMENT`.
    pub fn from_env() -> Result<RpcGraphQL, Error> {
        let network = std::env::var("SOLANA_NETWORK").ok();
        let commitment = std::env::var("SOLANA_COMMITMENT").ok();

        let mut builder = match network.as_deref() {
            Some("mainnet") | Some("mainnet-beta") => RpcGraphQL::mainnet(),
            Some("devnet") | None => RpcGraphQL::devnet(),
            Some("testnet") => RpcGraphQL::testnet(),
            Some("localnet") => RpcGraphQL::localnet(),
            Some(url) => RpcGraphQL::builder(url),
        };

        if let Some(name) = commitment {
            let commitment = Commitment::from_name(&name).ok_or_else(|| {
                Error::Config(format!("SOLANA_COMMITMENT has unknown value '{name}'"))
            })?;
            builder = builder.commitment(commitment);
        }

        builder.build()
    }

    /// Execute a query. Errors are reported inside the response.
    pub async fn query(&self, source: impl Into<String>, variables: serde_json::Value) -> Response {
        let request = Request::new(source).variables(Variables::from_json(variables));
        self.schema.execute(request).await
    }

    /// The underlying engine schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The schema in GraphQL SDL.
    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }
}

impl fmt::Debug for RpcGraphQL {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcGraphQL").finish_non_exhaustive()
    }
}

/// Builder for [`RpcGraphQL`].
pub struct RpcGraphQLBuilder {
    rpc_url: String,
    retry_config: RetryConfig,
    fetcher: Option<Arc<dyn AccountFetcher>>,
    commitment: Option<Commitment>,
    options: SchemaOptions,
}

impl RpcGraphQLBuilder {
    fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            retry_config: RetryConfig::default(),
            fetcher: None,
            commitment: None,
            options: SchemaOptions::default(),
        }
    }

    /// Set the retry configuration of the HTTP client.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Commitment for fetches whose query does not set one.
    ///
    /// Without it the node's default applies.
    pub fn commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = Some(commitment);
        self
    }

    /// Reject queries nested deeper than `depth`.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }

    /// Reject queries whose complexity exceeds `complexity`.
    pub fn max_complexity(mut self, complexity: usize) -> Self {
        self.options.max_complexity = Some(complexity);
        self
    }

    /// Read accounts through `fetcher` instead of the HTTP client.
    pub fn fetcher(mut self, fetcher: impl AccountFetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Build the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no fetcher is set and the RPC URL is
    /// empty, or [`Error::Schema`] if the schema cannot be assembled.
    pub fn build(self) -> Result<RpcGraphQL, Error> {
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None if self.rpc_url.trim().is_empty() => {
                return Err(Error::Config("RPC URL must not be empty".into()));
            }
            None => Arc::new(RpcClient::with_retry_config(
                self.rpc_url,
                self.retry_config,
            )),
        };
        let context = FetchContext {
            fetcher,
            default_commitment: self.commitment,
        };
        let registry = TypeRegistry::new();
        let schema = build_schema(&registry, self.options, context)?;
        Ok(RpcGraphQL { schema })
    }
}

impl fmt::Debug for RpcGraphQLBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcGraphQLBuilder")
            .field("rpc_url", &self.rpc_url)
            .field("retry_config", &self.retry_config)
            .field("custom_fetcher", &self.fetcher.is_some())
            .field("commitment", &self.commitment)
            .field("options", &self.options)
            .finish()
    }
}
