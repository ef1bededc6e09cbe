//! Field resolvers.
//!
//! Account-valued fields resolve to a [`ResolvedAccount`], tagged with the
//! concrete object type chosen by the discriminator. Parsed data fields
//! resolve to the node's JSON, which nested fields then read property by
//! property through [`property`].

use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use tracing::debug;

use super::discriminator::classify;
use super::inputs::AccountArgs;
use super::picks::{ScalarKind, is_integer_literal};
use crate::client::AccountFetcher;
use crate::types::{
    AccountData, AccountEncoding, AccountRequest, Address, Commitment, FetchedAccount,
};

/// A field resolver, shareable with the query engine.
pub type Resolver =
    Arc<dyn for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static>;

/// Wrap a closure as a [`Resolver`].
pub fn resolver<F>(f: F) -> Resolver
where
    F: for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}

// ============================================================================
// Execution context
// ============================================================================

/// Schema-wide data available to every resolver.
#[derive(Clone)]
pub struct FetchContext {
    pub fetcher: Arc<dyn AccountFetcher>,
    /// Commitment used when neither the field nor an ancestor sets one.
    pub default_commitment: Option<Commitment>,
}

/// Parent value of every field on an account type.
#[derive(Clone, Debug)]
pub struct ResolvedAccount {
    /// The request this account was fetched with.
    pub request: AccountRequest,
    pub account: FetchedAccount,
}

/// Fetch one account and tag it with its concrete type.
///
/// A missing account resolves to `null`. Fetch failures become an error on
/// this field only.
pub async fn resolve_account<'a>(
    context: &FetchContext,
    request: AccountRequest,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    let Some(account) = context.fetcher.fetch_account(&request).await? else {
        debug!(address = %request.address, "Account not found");
        return Ok(None);
    };
    let variant = classify(&account);
    Ok(Some(
        FieldValue::owned_any(ResolvedAccount { request, account }).with_type(variant.type_name()),
    ))
}

// ============================================================================
// Account resolvers
// ============================================================================

/// `Query.account(address, ...)`.
pub fn root_account() -> Resolver {
    resolver(|ctx| {
        FieldFuture::new(async move {
            let context = ctx.data::<FetchContext>()?;
            let address: Address = ctx.args.try_get("address")?.string()?.parse()?;
            let request = AccountArgs::from_args(&ctx.args)?.into_request(
                address,
                None,
                context.default_commitment,
            );
            resolve_account(context, request).await
        })
    })
}

/// `Account.owner(...)`: the account at the parent's owner address.
///
/// Commitment and minimum context slot carry over from the parent's request
/// unless given here.
pub fn owner() -> Resolver {
    resolver(|ctx| {
        FieldFuture::new(async move {
            let context = ctx.data::<FetchContext>()?;
            let parent = ctx.parent_value.try_downcast_ref::<ResolvedAccount>()?;
            let request = AccountArgs::from_args(&ctx.args)?.into_request(
                parent.account.owner,
                Some(&parent.request),
                context.default_commitment,
            );
            resolve_account(context, request).await
        })
    })
}

/// A scalar read straight off the fetched account.
pub fn account_property(read: fn(&FetchedAccount) -> Value) -> Resolver {
    resolver(move |ctx| {
        FieldFuture::new(async move {
            let parent = ctx.parent_value.try_downcast_ref::<ResolvedAccount>()?;
            Ok(Some(FieldValue::value(read(&parent.account))))
        })
    })
}

/// `data` on the raw-encoded account types.
///
/// Accounts whose parsed data was not recognized are refetched as base64 at
/// or after the slot they were first read at.
pub fn raw_data() -> Resolver {
    resolver(|ctx| {
        FieldFuture::new(async move {
            let parent = ctx.parent_value.try_downcast_ref::<ResolvedAccount>()?;
            let encoded = match &parent.account.data {
                AccountData::Binary(encoded, _) => encoded.clone(),
                AccountData::Parsed(parsed) => {
                    debug!(
                        address = %parent.account.address,
                        program = %parsed.program,
                        "Refetching unrecognized account data as base64"
                    );
                    let context = ctx.data::<FetchContext>()?;
                    let request = AccountRequest {
                        encoding: AccountEncoding::Base64,
                        data_slice: None,
                        min_context_slot: Some(parent.account.context_slot),
                        ..parent.request.clone()
                    };
                    match context.fetcher.fetch_account(&request).await? {
                        Some(FetchedAccount {
                            data: AccountData::Binary(encoded, _),
                            ..
                        }) => encoded,
                        _ => return Ok(None),
                    }
                }
            };
            Ok(Some(FieldValue::value(encoded)))
        })
    })
}

/// `data` on the parsed account types: `{ parsed, program, space }`.
pub fn parsed_data() -> Resolver {
    resolver(|ctx| {
        FieldFuture::new(async move {
            let parent = ctx.parent_value.try_downcast_ref::<ResolvedAccount>()?;
            Ok(parent.account.parsed_data().map(|data| {
                FieldValue::owned_any(serde_json::json!({
                    "parsed": data.parsed,
                    "program": data.program,
                    "space": data.space,
                }))
            }))
        })
    })
}

// ============================================================================
// Property resolvers
// ============================================================================

/// How a JSON property becomes a field value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transcode {
    Scalar(ScalarKind),
    List(Box<Transcode>),
    /// Passed through as the parent of the nested object's fields.
    Object,
}

impl Transcode {
    /// `None` for null, and for values that do not fit the declared shape.
    pub fn apply<'a>(&self, value: &serde_json::Value) -> Option<FieldValue<'a>> {
        match self {
            Transcode::Scalar(kind) => scalar_value(*kind, value).map(FieldValue::value),
            Transcode::List(inner) => value.as_array().map(|items| {
                FieldValue::list(
                    items
                        .iter()
                        .map(|item| inner.apply(item).unwrap_or(FieldValue::NULL)),
                )
            }),
            Transcode::Object => value
                .is_object()
                .then(|| FieldValue::owned_any(value.clone())),
        }
    }
}

/// Default resolver for a property of a JSON parent.
pub fn property(name: &'static str, transcode: Transcode) -> Resolver {
    let transcode = Arc::new(transcode);
    resolver(move |ctx| {
        let transcode = transcode.clone();
        FieldFuture::new(async move {
            let parent = ctx.parent_value.try_downcast_ref::<serde_json::Value>()?;
            Ok(parent.get(name).and_then(|value| transcode.apply(value)))
        })
    })
}

/// Convert a JSON scalar to the output value of `kind`.
///
/// The node reports some 64-bit quantities as decimal strings; integer kinds
/// accept those.
pub fn scalar_value(kind: ScalarKind, value: &serde_json::Value) -> Option<Value> {
    use serde_json::{Number, Value as Json};

    match (kind, value) {
        (_, Json::Null) => None,
        (ScalarKind::String, Json::String(s)) => Some(Value::String(s.clone())),
        (ScalarKind::String, Json::Number(n)) => Some(Value::String(n.to_string())),
        (ScalarKind::String, Json::Bool(b)) => Some(Value::String(b.to_string())),
        (ScalarKind::Boolean, Json::Bool(b)) => Some(Value::Boolean(*b)),
        (ScalarKind::Int, Json::Number(n)) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(|n| Value::Number(n.into())),
        (ScalarKind::Int, Json::String(s)) => s.parse::<i32>().ok().map(|n| Value::Number(n.into())),
        (ScalarKind::Float, Json::Number(n)) => {
            n.as_f64().and_then(Number::from_f64).map(Value::Number)
        }
        (ScalarKind::Float, Json::String(s)) => s
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        (ScalarKind::BigInt, Json::Number(n)) if n.is_u64() || n.is_i64() => {
            Some(Value::Number(n.clone()))
        }
        (ScalarKind::BigInt, Json::String(s)) => bigint_from_str(s),
        _ => None,
    }
}

/// A `BigInt` output value.
pub fn bigint_value(n: u64) -> Value {
    Value::Number(n.into())
}

fn bigint_from_str(s: &str) -> Option<Value> {
    if let Ok(n) = s.parse::<u64>() {
        Some(Value::Number(n.into()))
    } else if let Ok(n) = s.parse::<i64>() {
        Some(Value::Number(n.into()))
    } else if is_integer_literal(s) {
        Some(Value::String(s.to_string()))
    } else {
        None
    }
}
