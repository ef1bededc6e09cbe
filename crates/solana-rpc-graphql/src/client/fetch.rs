//! The account fetch boundary.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::RpcError;
use crate::types::{AccountRequest, FetchedAccount};

use super::rpc::RpcClient;

/// Future returned by [`AccountFetcher::fetch_account`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<FetchedAccount>, RpcError>> + Send + 'a>>;

/// Source of account state for the query layer.
///
/// Implementations must honor every modifier on the request exactly as given.
/// A missing account is `Ok(None)`, never an error.
///
/// [`RpcClient`] is the production implementation. Tests and embedders may
/// supply their own, e.g. an in-memory fixture store.
pub trait AccountFetcher: Send + Sync {
    /// Look up one account.
    fn fetch_account<'a>(&'a self, request: &'a AccountRequest) -> FetchFuture<'a>;
}

impl AccountFetcher for RpcClient {
    fn fetch_account<'a>(&'a self, request: &'a AccountRequest) -> FetchFuture<'a> {
        Box::pin(self.get_account_info(request))
    }
}

/// Implement `AccountFetcher` for `Arc<dyn AccountFetcher>` for convenience.
impl AccountFetcher for Arc<dyn AccountFetcher> {
    fn fetch_account<'a>(&'a self, request: &'a AccountRequest) -> FetchFuture<'a> {
        (**self).fetch_account(request)
    }
}
