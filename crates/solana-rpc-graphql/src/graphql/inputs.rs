//! Arguments accepted by account-valued fields.
//!
//! `Query.account` and `Account.owner` take the same optional modifiers:
//! `commitment`, `dataSlice`, `encoding` and `minContextSlot`.

use std::rc::Rc;

use async_graphql::Value;
use async_graphql::dynamic::{ObjectAccessor, ValueAccessor};

use super::picks::{ScalarKind, scalar};
use super::registry::{FieldType, InputValueDef, TypeNode, TypeRegistry};
use crate::error::SchemaBuildError;
use crate::types::{AccountEncoding, AccountRequest, Address, Commitment, DataSlice};

pub const COMMITMENT: &str = "Commitment";
pub const ACCOUNT_ENCODING: &str = "AccountEncoding";
pub const DATA_SLICE: &str = "DataSlice";

// ============================================================================
// Type definitions
// ============================================================================

pub fn commitment_type(registry: &TypeRegistry) -> Result<Rc<TypeNode>, SchemaBuildError> {
    registry.get_or_create(COMMITMENT, |_| {
        Ok(
            TypeNode::enumeration(COMMITMENT, Commitment::ALL.iter().map(|c| c.as_str()))
                .with_description("Commitment level at which account state is read"),
        )
    })
}

pub fn encoding_type(registry: &TypeRegistry) -> Result<Rc<TypeNode>, SchemaBuildError> {
    registry.get_or_create(ACCOUNT_ENCODING, |_| {
        Ok(TypeNode::enumeration(
            ACCOUNT_ENCODING,
            AccountEncoding::ALL.iter().map(|e| e.graphql_name()),
        )
        .with_description("Encoding of an account's data"))
    })
}

pub fn data_slice_type(registry: &TypeRegistry) -> Result<Rc<TypeNode>, SchemaBuildError> {
    registry.get_or_create(DATA_SLICE, |registry| {
        let int = FieldType::named(&scalar(registry, ScalarKind::Int)?).non_null();
        Ok(TypeNode::input_object(
            DATA_SLICE,
            vec![
                InputValueDef::new("offset", int.clone()),
                InputValueDef::new("length", int),
            ],
        )
        .with_description("Window of an account's data to return. Not valid with jsonParsed."))
    })
}

/// The optional modifiers, in declaration order.
pub fn account_arguments(registry: &TypeRegistry) -> Result<Vec<InputValueDef>, SchemaBuildError> {
    Ok(vec![
        InputValueDef::new("commitment", FieldType::named(&commitment_type(registry)?)),
        InputValueDef::new("dataSlice", FieldType::named(&data_slice_type(registry)?)),
        InputValueDef::new("encoding", FieldType::named(&encoding_type(registry)?)),
        InputValueDef::new(
            "minContextSlot",
            FieldType::named(&scalar(registry, ScalarKind::BigInt)?),
        ),
    ])
}

// ============================================================================
// Decoding
// ============================================================================

/// Modifiers given on one account-valued field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccountArgs {
    pub commitment: Option<Commitment>,
    pub encoding: Option<AccountEncoding>,
    pub data_slice: Option<DataSlice>,
    pub min_context_slot: Option<u64>,
}

impl AccountArgs {
    /// Read modifiers from field arguments. Explicit `null` counts as omitted.
    pub fn from_args(args: &ObjectAccessor<'_>) -> async_graphql::Result<Self> {
        let commitment = match present(args, "commitment") {
            Some(value) => {
                let name = value.enum_name()?;
                Some(Commitment::from_name(name).ok_or_else(|| {
                    async_graphql::Error::new(format!("Unknown commitment: {name}"))
                })?)
            }
            None => None,
        };
        let encoding = match present(args, "encoding") {
            Some(value) => {
                let name = value.enum_name()?;
                Some(AccountEncoding::from_graphql_name(name).ok_or_else(|| {
                    async_graphql::Error::new(format!("Unknown encoding: {name}"))
                })?)
            }
            None => None,
        };
        let data_slice = match present(args, "dataSlice") {
            Some(value) => {
                let slice = value.object()?;
                Some(DataSlice::new(
                    non_negative(slice.try_get("offset")?.i64()?, "dataSlice.offset")?,
                    non_negative(slice.try_get("length")?.i64()?, "dataSlice.length")?,
                ))
            }
            None => None,
        };
        let min_context_slot = match present(args, "minContextSlot") {
            Some(value) => Some(slot(value.as_value()).ok_or_else(|| {
                async_graphql::Error::new("minContextSlot must be an unsigned 64-bit integer")
            })?),
            None => None,
        };
        Ok(Self {
            commitment,
            encoding,
            data_slice,
            min_context_slot,
        })
    }

    /// Build the request for `address`.
    ///
    /// Commitment and minimum context slot fall back to `inherited` (the
    /// enclosing account's request), then commitment to `default_commitment`.
    /// Encoding is never inherited: it defaults to `jsonParsed`, or `base64`
    /// when a data slice is given.
    pub fn into_request(
        self,
        address: Address,
        inherited: Option<&AccountRequest>,
        default_commitment: Option<Commitment>,
    ) -> AccountRequest {
        let encoding = self.encoding.unwrap_or(if self.data_slice.is_some() {
            AccountEncoding::Base64
        } else {
            AccountEncoding::JsonParsed
        });
        AccountRequest {
            address,
            commitment: self
                .commitment
                .or_else(|| inherited.and_then(|r| r.commitment))
                .or(default_commitment),
            encoding,
            data_slice: self.data_slice,
            min_context_slot: self
                .min_context_slot
                .or_else(|| inherited.and_then(|r| r.min_context_slot)),
        }
    }
}

fn present<'a>(args: &'a ObjectAccessor<'_>, name: &str) -> Option<ValueAccessor<'a>> {
    args.get(name).filter(|value| !value.is_null())
}

fn non_negative(value: i64, name: &str) -> async_graphql::Result<usize> {
    usize::try_from(value)
        .map_err(|_| async_graphql::Error::new(format!("{name} must not be negative")))
}

fn slot(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
