//! Account request and response types.

use serde::{Deserialize, Serialize};

use super::{AccountEncoding, Address, Commitment, DataSlice};
use crate::error::RpcError;

// ============================================================================
// AccountRequest
// ============================================================================

/// A single account lookup: an address plus the modifiers sent with it.
///
/// # Example
///
/// ```rust
/// use solana_rpc_graphql::{AccountEncoding, AccountRequest, Commitment};
///
/// let request = AccountRequest::new("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA".parse()?)
///     .commitment(Commitment::Confirmed)
///     .encoding(AccountEncoding::Base64);
/// assert!(request.validate().is_ok());
/// # Ok::<(), solana_rpc_graphql::ParseAddressError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountRequest {
    pub address: Address,
    pub commitment: Option<Commitment>,
    pub encoding: AccountEncoding,
    pub data_slice: Option<DataSlice>,
    pub min_context_slot: Option<u64>,
}

impl AccountRequest {
    /// A request with no modifiers. Data is requested as `jsonParsed`.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            commitment: None,
            encoding: AccountEncoding::default(),
            data_slice: None,
            min_context_slot: None,
        }
    }

    /// Read state at a specific commitment level.
    pub fn commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = Some(commitment);
        self
    }

    /// Request data in a specific encoding.
    pub fn encoding(mut self, encoding: AccountEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Only return a window of the account's data.
    pub fn data_slice(mut self, data_slice: DataSlice) -> Self {
        self.data_slice = Some(data_slice);
        self
    }

    /// Require the node to have reached at least this slot.
    pub fn min_context_slot(mut self, slot: u64) -> Self {
        self.min_context_slot = Some(slot);
        self
    }

    /// Reject modifier combinations the node would refuse.
    pub fn validate(&self) -> Result<(), RpcError> {
        if self.data_slice.is_some() && !self.encoding.is_binary() {
            return Err(RpcError::InvalidRequest(
                "dataSlice cannot be combined with jsonParsed encoding".to_string(),
            ));
        }
        Ok(())
    }

    /// Convert to positional params for `getAccountInfo`.
    pub fn to_rpc_params(&self) -> serde_json::Value {
        let mut config = serde_json::Map::new();
        config.insert("encoding".to_string(), self.encoding.as_str().into());
        if let Some(commitment) = self.commitment {
            config.insert("commitment".to_string(), commitment.as_str().into());
        }
        if let Some(slice) = self.data_slice {
            config.insert(
                "dataSlice".to_string(),
                serde_json::json!({ "offset": slice.offset, "length": slice.length }),
            );
        }
        if let Some(slot) = self.min_context_slot {
            config.insert("minContextSlot".to_string(), slot.into());
        }
        serde_json::json!([self.address.to_string(), config])
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Response envelope for RPC methods that report the slot they were served at.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse<T> {
    pub context: RpcContext,
    pub value: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcContext {
    pub slot: u64,
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Account state as returned by `getAccountInfo`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub lamports: u64,
    pub owner: Address,
    pub data: AccountData,
    pub executable: bool,
    pub rent_epoch: u64,
    #[serde(default)]
    pub space: Option<u64>,
}

/// An account's data payload.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AccountData {
    /// `["<encoded bytes>", "<encoding>"]`
    Binary(String, AccountEncoding),
    /// Structured output of the node's parser for the owning program.
    Parsed(ParsedAccountData),
}

/// `jsonParsed` account data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ParsedAccountData {
    /// Name of the program whose parser produced this data, e.g. `spl-token`.
    pub program: String,
    /// `{ "type": ..., "info": ... }`
    pub parsed: serde_json::Value,
    pub space: u64,
}

impl ParsedAccountData {
    /// The parser's account type tag, e.g. `mint` or `account`.
    pub fn parsed_type(&self) -> Option<&str> {
        self.parsed.get("type").and_then(|t| t.as_str())
    }
}

// ============================================================================
// FetchedAccount
// ============================================================================

/// The result of looking up one [`AccountRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedAccount {
    /// The address that was looked up.
    pub address: Address,
    /// The encoding that was requested.
    pub encoding: AccountEncoding,
    /// Slot at which the node served the request.
    pub context_slot: u64,
    pub lamports: u64,
    pub owner: Address,
    pub executable: bool,
    pub rent_epoch: u64,
    pub data: AccountData,
}

impl FetchedAccount {
    /// Combine a request with the node's answer to it.
    pub fn new(request: &AccountRequest, context_slot: u64, info: AccountInfo) -> Self {
        Self {
            address: request.address,
            encoding: request.encoding,
            context_slot,
            lamports: info.lamports,
            owner: info.owner,
            executable: info.executable,
            rent_epoch: info.rent_epoch,
            data: info.data,
        }
    }

    /// Parsed data, if the node returned any.
    pub fn parsed_data(&self) -> Option<&ParsedAccountData> {
        match &self.data {
            AccountData::Parsed(parsed) => Some(parsed),
            AccountData::Binary(..) => None,
        }
    }
}
