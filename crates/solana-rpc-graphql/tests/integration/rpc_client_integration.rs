//! The HTTP fetcher against a mock JSON-RPC node.

use serde_json::json;
use solana_rpc_graphql::*;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fixtures::*;

fn no_retries() -> RetryConfig {
    RetryConfig {
        max_retries: 0,
        initial_delay_ms: 1,
        max_delay_ms: 1,
    }
}

fn client(server: &MockServer) -> RpcClient {
    init_tracing();
    RpcClient::with_retry_config(server.uri(), no_retries())
}

fn rpc_result(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 0,
        "result": result,
    }))
}

fn rpc_error(code: i64, message: &str, data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 0,
        "error": { "code": code, "message": message, "data": data },
    }))
}

fn token_account_response() -> serde_json::Value {
    json!({
        "context": { "apiVersion": "2.0.15", "slot": SLOT },
        "value": {
            "data": {
                "parsed": token_account_parsed(),
                "program": "spl-token",
                "space": 165
            },
            "executable": false,
            "lamports": 2039280,
            "owner": TOKEN_PROGRAM,
            "rentEpoch": 18446744073709551615u64,
            "space": 165
        }
    })
}

#[tokio::test]
async fn test_get_account_info_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "getAccountInfo",
            "params": [TOKEN_ACCOUNT, { "encoding": "jsonParsed", "commitment": "confirmed" }]
        })))
        .respond_with(rpc_result(token_account_response()))
        .expect(1)
        .mount(&server)
        .await;

    let request = AccountRequest::new(TOKEN_ACCOUNT.parse().unwrap())
        .commitment(Commitment::Confirmed);
    let account = client(&server)
        .get_account_info(&request)
        .await
        .unwrap()
        .expect("account exists");

    assert_eq!(account.context_slot, SLOT);
    assert_eq!(account.lamports, 2039280);
    assert_eq!(account.owner.to_string(), TOKEN_PROGRAM);
    assert_eq!(account.rent_epoch, u64::MAX);
    assert_eq!(account.encoding, AccountEncoding::JsonParsed);

    let parsed = account.parsed_data().expect("parsed data");
    assert_eq!(parsed.program, "spl-token");
    assert_eq!(parsed.parsed_type(), Some("account"));
    assert_eq!(classify(&account), AccountVariant::TokenAccount);
}

#[tokio::test]
async fn test_get_account_info_binary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "params": [address(1).to_string(), {
                "encoding": "base64",
                "dataSlice": { "offset": 2, "length": 4 },
                "minContextSlot": 100
            }]
        })))
        .respond_with(rpc_result(json!({
            "context": { "slot": 101 },
            "value": {
                "data": ["dGVzdA==", "base64"],
                "executable": true,
                "lamports": 1,
                "owner": address(2).to_string(),
                "rentEpoch": 0
            }
        })))
        .mount(&server)
        .await;

    let request = AccountRequest::new(address(1))
        .encoding(AccountEncoding::Base64)
        .data_slice(DataSlice::new(2, 4))
        .min_context_slot(100);
    let account = client(&server)
        .get_account_info(&request)
        .await
        .unwrap()
        .expect("account exists");

    assert_eq!(
        account.data,
        AccountData::Binary("dGVzdA==".to_string(), AccountEncoding::Base64)
    );
    assert!(account.executable);
    assert_eq!(account.owner, address(2));
    assert_eq!(classify(&account), AccountVariant::Base64);
}

#[tokio::test]
async fn test_get_account_info_missing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!({ "context": { "slot": 5 }, "value": null })))
        .mount(&server)
        .await;

    let account = client(&server)
        .get_account_info(&AccountRequest::new(address(9)))
        .await
        .unwrap();
    assert!(account.is_none());
}

#[tokio::test]
async fn test_invalid_request_never_reaches_node() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!(null)))
        .expect(0)
        .mount(&server)
        .await;

    let request = AccountRequest::new(address(1)).data_slice(DataSlice::new(0, 1));
    let err = client(&server).get_account_info(&request).await.unwrap_err();
    assert!(matches!(err, RpcError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_get_minimum_balance_for_rent_exemption() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "getMinimumBalanceForRentExemption",
            "params": [165, { "commitment": "finalized" }]
        })))
        .respond_with(rpc_result(json!(2039280)))
        .mount(&server)
        .await;

    let lamports = client(&server)
        .get_minimum_balance_for_rent_exemption(165, Some(Commitment::Finalized))
        .await
        .unwrap();
    assert_eq!(lamports, 2039280);
}

#[tokio::test]
async fn test_min_context_slot_not_reached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_error(
            -32016,
            "Minimum context slot has not been reached",
            json!({ "contextSlot": 90 }),
        ))
        .mount(&server)
        .await;

    let request = AccountRequest::new(address(1)).min_context_slot(100);
    let err = client(&server).get_account_info(&request).await.unwrap_err();
    assert!(matches!(
        err,
        RpcError::MinContextSlotNotReached {
            context_slot: Some(90)
        }
    ));
}

#[tokio::test]
async fn test_invalid_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_error(-32602, "Invalid param: WrongSize", json!(null)))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_account_info(&AccountRequest::new(address(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::InvalidParams(ref m) if m.contains("WrongSize")));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_account_info(&AccountRequest::new(address(1)))
        .await
        .unwrap_err();
    match err {
        RpcError::Network {
            status_code,
            retryable,
            ..
        } => {
            assert_eq!(status_code, Some(400));
            assert!(!retryable);
        }
        other => panic!("Expected Network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_retries_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!(890880)))
        .mount(&server)
        .await;

    let client = RpcClient::with_retry_config(
        server.uri(),
        RetryConfig {
            max_retries: 2,
            initial_delay_ms: 1,
            max_delay_ms: 1,
        },
    );
    let lamports = client
        .get_minimum_balance_for_rent_exemption(0, None)
        .await
        .unwrap();
    assert_eq!(lamports, 890880);
}

#[tokio::test]
async fn test_graphql_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "getAccountInfo" })))
        .respond_with(rpc_result(token_account_response()))
        .mount(&server)
        .await;

    let rpc = RpcGraphQL::builder(server.uri())
        .retry_config(no_retries())
        .build()
        .unwrap();
    let data = execute(
        &rpc,
        r#"query ($address: String!) {
            account(address: $address) {
                __typename
                lamports
                ... on TokenAccount { data { parsed { info { mint } } } }
            }
        }"#,
        json!({ "address": TOKEN_ACCOUNT }),
    )
    .await;

    assert_eq!(data["account"]["__typename"], "TokenAccount");
    assert_eq!(data["account"]["lamports"], 2039280);
    assert_eq!(
        data["account"]["data"]["parsed"]["info"]["mint"],
        "So11111111111111111111111111111111111111112"
    );
}
