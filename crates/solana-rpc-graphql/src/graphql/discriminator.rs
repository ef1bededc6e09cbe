//! Choose the concrete account type for a fetched account.

use std::fmt;

use tracing::trace;

use crate::types::{AccountData, AccountEncoding, FetchedAccount};

/// The concrete object types implementing `Account`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccountVariant {
    Base58,
    Base64,
    Base64Zstd,
    Mint,
    TokenAccount,
    Nonce,
    Stake,
    Vote,
    LookupTable,
}

impl AccountVariant {
    pub const ALL: [AccountVariant; 9] = [
        AccountVariant::Base58,
        AccountVariant::Base64,
        AccountVariant::Base64Zstd,
        AccountVariant::Mint,
        AccountVariant::TokenAccount,
        AccountVariant::Nonce,
        AccountVariant::Stake,
        AccountVariant::Vote,
        AccountVariant::LookupTable,
    ];

    /// Used when no rule matches.
    pub const FALLBACK: AccountVariant = AccountVariant::Base64;

    /// GraphQL object type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            AccountVariant::Base58 => "AccountBase58",
            AccountVariant::Base64 => "AccountBase64",
            AccountVariant::Base64Zstd => "AccountBase64Zstd",
            AccountVariant::Mint => "MintAccount",
            AccountVariant::TokenAccount => "TokenAccount",
            AccountVariant::Nonce => "NonceAccount",
            AccountVariant::Stake => "StakeAccount",
            AccountVariant::Vote => "VoteAccount",
            AccountVariant::LookupTable => "LookupTableAccount",
        }
    }

    /// Whether `data` is exposed as an encoded string.
    pub fn is_raw(&self) -> bool {
        matches!(
            self,
            AccountVariant::Base58 | AccountVariant::Base64 | AccountVariant::Base64Zstd
        )
    }
}

impl fmt::Display for AccountVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Pick the variant for `account`.
///
/// Raw encodings map one-to-one. Parsed data is matched on the parser's
/// program and type tag, first match wins; anything unrecognized falls back
/// to [`AccountVariant::FALLBACK`].
pub fn classify(account: &FetchedAccount) -> AccountVariant {
    let variant = match account.encoding {
        AccountEncoding::Base58 => AccountVariant::Base58,
        AccountEncoding::Base64 => AccountVariant::Base64,
        AccountEncoding::Base64Zstd => AccountVariant::Base64Zstd,
        AccountEncoding::JsonParsed => match &account.data {
            AccountData::Parsed(data) => {
                // Mint and token accounts share a program, so the type tag
                // is checked jointly.
                match (data.parsed_type(), data.program.as_str()) {
                    (Some("mint"), "spl-token") => AccountVariant::Mint,
                    (Some("account"), "spl-token") => AccountVariant::TokenAccount,
                    (_, "nonce") => AccountVariant::Nonce,
                    (_, "stake") => AccountVariant::Stake,
                    (Some("vote"), "vote") => AccountVariant::Vote,
                    (Some("lookupTable"), "address-lookup-table") => AccountVariant::LookupTable,
                    _ => AccountVariant::FALLBACK,
                }
            }
            // The node had no parser for the owning program.
            AccountData::Binary(..) => AccountVariant::FALLBACK,
        },
    };
    trace!(address = %account.address, %variant, "Classified account");
    variant
}
