//! The `Account` interface and its concrete types.
//!
//! Every account type carries the interface fields (`encoding`, `executable`,
//! `lamports`, `rentEpoch`, `owner`) plus a `data` field. Raw-encoded types
//! expose `data` as the encoded string; parsed types expose
//! `data { parsed { info type } program space }` with a per-program `info`.

use std::rc::Rc;

use async_graphql::Value;

use super::discriminator::AccountVariant;
use super::inputs::account_arguments;
use super::picks::{
    ScalarKind, Shape, bigint, boolean, float, list, number, object, object_node, scalar, string,
    type_ref,
};
use super::registry::{FieldDef, FieldSet, FieldType, TypeNode, TypeRegistry};
use super::resolvers::{self, account_property, bigint_value};
use crate::error::SchemaBuildError;

pub const ACCOUNT: &str = "Account";
pub const TOKEN_AMOUNT: &str = "TokenAmount";

type InfoFields = Vec<(&'static str, Shape)>;

/// The `Account` interface.
pub fn account_interface(registry: &TypeRegistry) -> Result<Rc<TypeNode>, SchemaBuildError> {
    registry.get_or_create(ACCOUNT, |_| {
        Ok(TypeNode::interface(ACCOUNT, FieldSet::deferred(account_fields))
            .with_description("A Solana account"))
    })
}

/// Register every concrete account type.
pub fn account_types(registry: &TypeRegistry) -> Result<Vec<Rc<TypeNode>>, SchemaBuildError> {
    AccountVariant::ALL
        .iter()
        .map(|variant| variant_type(registry, *variant))
        .collect()
}

/// The object type for one variant.
pub fn variant_type(
    registry: &TypeRegistry,
    variant: AccountVariant,
) -> Result<Rc<TypeNode>, SchemaBuildError> {
    registry.get_or_create(variant.type_name(), |registry| {
        let interface = account_interface(registry)?;
        let fields = FieldSet::deferred(move |registry| {
            let mut fields = account_fields(registry)?;
            fields.push(data_field(registry, variant)?);
            Ok(fields)
        });
        Ok(TypeNode::object(variant.type_name(), fields)
            .implements(&interface)
            .with_description(description(variant)))
    })
}

/// Shared amount shape of token balances.
pub fn token_amount_type(registry: &TypeRegistry) -> Result<Rc<TypeNode>, SchemaBuildError> {
    registry.get_or_create(TOKEN_AMOUNT, |registry| {
        object_node(
            registry,
            TOKEN_AMOUNT,
            vec![
                ("amount", string()),
                ("decimals", number()),
                ("uiAmount", float()),
                ("uiAmountString", string()),
            ],
        )
    })
}

fn description(variant: AccountVariant) -> &'static str {
    match variant {
        AccountVariant::Base58 => "A Solana account with base58 encoded data",
        AccountVariant::Base64 => "A Solana account with base64 encoded data",
        AccountVariant::Base64Zstd => {
            "A Solana account with base64 encoded data compressed with zstd"
        }
        AccountVariant::Mint => "An SPL mint",
        AccountVariant::TokenAccount => "An SPL token account",
        AccountVariant::Nonce => "A nonce account",
        AccountVariant::Stake => "A stake account",
        AccountVariant::Vote => "A vote account",
        AccountVariant::LookupTable => "An address lookup table account",
    }
}

/// Fields common to the interface and every account type.
fn account_fields(registry: &TypeRegistry) -> Result<Vec<FieldDef>, SchemaBuildError> {
    let string = FieldType::named(&scalar(registry, ScalarKind::String)?);
    let boolean = FieldType::named(&scalar(registry, ScalarKind::Boolean)?);
    let bigint = FieldType::named(&scalar(registry, ScalarKind::BigInt)?);
    let account = FieldType::named(&account_interface(registry)?);

    Ok(vec![
        FieldDef::new("encoding", string)
            .resolver(account_property(|a| Value::String(a.encoding.as_str().to_string()))),
        FieldDef::new("executable", boolean)
            .resolver(account_property(|a| Value::Boolean(a.executable))),
        FieldDef::new("lamports", bigint.clone())
            .resolver(account_property(|a| bigint_value(a.lamports))),
        FieldDef::new("rentEpoch", bigint)
            .resolver(account_property(|a| bigint_value(a.rent_epoch))),
        FieldDef::new("owner", account)
            .description("The program that owns this account")
            .arguments(account_arguments(registry)?)
            .resolver(resolvers::owner()),
    ])
}

fn data_field(
    registry: &TypeRegistry,
    variant: AccountVariant,
) -> Result<FieldDef, SchemaBuildError> {
    let Some((prefix, info)) = parsed_info(registry, variant)? else {
        let string = FieldType::named(&scalar(registry, ScalarKind::String)?);
        return Ok(FieldDef::new("data", string).resolver(resolvers::raw_data()));
    };
    let shape = parsed_data(registry, prefix, info)?;
    Ok(FieldDef::new("data", shape.field_type(registry)?).resolver(resolvers::parsed_data()))
}

/// `{prefix}Data { parsed: {prefix}DataParsed { info, type }, program, space }`
fn parsed_data(
    registry: &TypeRegistry,
    prefix: &str,
    info: InfoFields,
) -> Result<Shape, SchemaBuildError> {
    let info = object(registry, format!("{prefix}DataParsedInfo"), info)?;
    let parsed = object(
        registry,
        format!("{prefix}DataParsed"),
        vec![("info", info), ("type", string())],
    )?;
    object(
        registry,
        format!("{prefix}Data"),
        vec![("parsed", parsed), ("program", string()), ("space", bigint())],
    )
}

/// Type-name prefix and `info` fields of a parsed variant; `None` for raw ones.
fn parsed_info(
    registry: &TypeRegistry,
    variant: AccountVariant,
) -> Result<Option<(&'static str, InfoFields)>, SchemaBuildError> {
    let info = match variant {
        AccountVariant::Base58 | AccountVariant::Base64 | AccountVariant::Base64Zstd => {
            return Ok(None);
        }
        AccountVariant::Mint => (
            "Mint",
            vec![
                ("decimals", number()),
                ("freezeAuthority", string()),
                ("isInitialized", boolean()),
                ("mintAuthority", string()),
                ("supply", string()),
            ],
        ),
        AccountVariant::TokenAccount => (
            "TokenAccount",
            vec![
                ("isNative", boolean()),
                ("mint", string()),
                ("owner", string()),
                ("state", string()),
                ("tokenAmount", type_ref(&token_amount_type(registry)?)),
            ],
        ),
        AccountVariant::Nonce => (
            "Nonce",
            vec![
                ("authority", string()),
                ("blockhash", string()),
                (
                    "feeCalculator",
                    object(
                        registry,
                        "NonceFeeCalculator",
                        vec![("lamportsPerSignature", string())],
                    )?,
                ),
            ],
        ),
        AccountVariant::Stake => ("Stake", stake_info(registry)?),
        AccountVariant::Vote => ("Vote", vote_info(registry)?),
        AccountVariant::LookupTable => (
            "LookupTable",
            vec![
                ("addresses", list(string())),
                ("authority", string()),
                ("deactivationSlot", bigint()),
                ("lastExtendedSlot", bigint()),
                ("lastExtendedSlotStartIndex", number()),
            ],
        ),
    };
    Ok(Some(info))
}

fn stake_info(registry: &TypeRegistry) -> Result<InfoFields, SchemaBuildError> {
    let authorized = object(
        registry,
        "StakeMetaAuthorized",
        vec![("staker", string()), ("withdrawer", string())],
    )?;
    let lockup = object(
        registry,
        "StakeMetaLockup",
        vec![
            ("custodian", string()),
            ("epoch", bigint()),
            ("unixTimestamp", bigint()),
        ],
    )?;
    let meta = object(
        registry,
        "StakeMeta",
        vec![
            ("authorized", authorized),
            ("lockup", lockup),
            ("rentExemptReserve", string()),
        ],
    )?;
    let delegation = object(
        registry,
        "StakeStakeDelegation",
        vec![
            ("activationEpoch", bigint()),
            ("deactivationEpoch", bigint()),
            ("stake", string()),
            ("voter", string()),
            ("warmupCooldownRate", float()),
        ],
    )?;
    let stake = object(
        registry,
        "StakeStake",
        vec![("creditsObserved", bigint()), ("delegation", delegation)],
    )?;
    Ok(vec![("meta", meta), ("stake", stake)])
}

fn vote_info(registry: &TypeRegistry) -> Result<InfoFields, SchemaBuildError> {
    let authorized_voter = object(
        registry,
        "VoteAuthorizedVoter",
        vec![("authorizedVoter", string()), ("epoch", bigint())],
    )?;
    let epoch_credits = object(
        registry,
        "VoteEpochCredits",
        vec![
            ("credits", string()),
            ("epoch", bigint()),
            ("previousCredits", string()),
        ],
    )?;
    let last_timestamp = object(
        registry,
        "VoteLastTimestamp",
        vec![("slot", bigint()), ("timestamp", bigint())],
    )?;
    let vote = object(
        registry,
        "VoteVote",
        vec![("confirmationCount", number()), ("slot", bigint())],
    )?;
    Ok(vec![
        ("authorizedVoters", list(authorized_voter)),
        ("authorizedWithdrawer", string()),
        ("commission", number()),
        ("epochCredits", list(epoch_credits)),
        ("lastTimestamp", last_timestamp),
        ("nodePubkey", string()),
        ("priorVoters", list(string())),
        ("rootSlot", bigint()),
        ("votes", list(vote)),
    ])
}
