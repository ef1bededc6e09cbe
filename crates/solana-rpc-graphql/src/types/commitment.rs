//! Request modifiers for account queries.

use serde::{Deserialize, Serialize};

/// Commitment level for queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// Most recent block seen by the node. May be skipped by the cluster.
    Processed,
    /// Voted on by a supermajority of the cluster.
    Confirmed,
    /// Rooted by a supermajority of the cluster.
    #[default]
    Finalized,
}

impl Commitment {
    /// All commitment levels, weakest first.
    pub const ALL: [Commitment; 3] = [
        Commitment::Processed,
        Commitment::Confirmed,
        Commitment::Finalized,
    ];

    /// Get the string representation for RPC.
    ///
    /// The GraphQL enum uses the same names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }

    /// Look up a commitment level by its RPC name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

/// Wire encoding requested for an account's data payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountEncoding {
    #[serde(rename = "base58")]
    Base58,
    #[serde(rename = "base64")]
    Base64,
    #[serde(rename = "base64+zstd")]
    Base64Zstd,
    /// Program-specific structured data; falls back to base64 when the node
    /// has no parser for the owning program.
    #[default]
    #[serde(rename = "jsonParsed")]
    JsonParsed,
}

impl AccountEncoding {
    pub const ALL: [AccountEncoding; 4] = [
        AccountEncoding::Base58,
        AccountEncoding::Base64,
        AccountEncoding::Base64Zstd,
        AccountEncoding::JsonParsed,
    ];

    /// Get the string representation for RPC.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountEncoding::Base58 => "base58",
            AccountEncoding::Base64 => "base64",
            AccountEncoding::Base64Zstd => "base64+zstd",
            AccountEncoding::JsonParsed => "jsonParsed",
        }
    }

    /// Name of the matching GraphQL enum value.
    ///
    /// `base64+zstd` is not a valid GraphQL name, hence the separate mapping.
    pub fn graphql_name(&self) -> &'static str {
        match self {
            AccountEncoding::Base58 => "base58",
            AccountEncoding::Base64 => "base64",
            AccountEncoding::Base64Zstd => "base64Zstd",
            AccountEncoding::JsonParsed => "jsonParsed",
        }
    }

    /// Look up an encoding by its GraphQL enum value name.
    pub fn from_graphql_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.graphql_name() == name)
    }

    /// Whether this is one of the raw byte encodings.
    pub fn is_binary(&self) -> bool {
        !matches!(self, AccountEncoding::JsonParsed)
    }
}

/// A byte window into an account's data. Only valid with binary encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataSlice {
    pub offset: usize,
    pub length: usize,
}

impl DataSlice {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }
}
