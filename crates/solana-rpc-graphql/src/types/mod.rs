//! Core types for Solana account queries.
//!
//! This module provides hand-rolled types based on Solana RPC responses,
//! designed for ergonomic use in client applications.

mod account;
mod address;
mod commitment;

pub use account::{
    AccountData, AccountInfo, AccountRequest, FetchedAccount, ParsedAccountData, RpcContext,
    RpcResponse,
};
pub use address::{ADDRESS_LEN, Address};
pub use commitment::{AccountEncoding, Commitment, DataSlice};
