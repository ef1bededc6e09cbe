//! Partial results: failures stay local to the field that raised them.

use serde_json::json;
use solana_rpc_graphql::*;

use crate::fixtures::*;

fn error_paths(response: &async_graphql::Response) -> Vec<serde_json::Value> {
    response
        .errors
        .iter()
        .map(|err| serde_json::to_value(&err.path).unwrap())
        .collect()
}

#[tokio::test]
async fn test_failing_sibling_does_not_affect_others() {
    let fixtures = Fixtures::new()
        .with(address(1), Fixture::raw(address(0), b"ok").lamports(42))
        .failing(address(2));
    let rpc = fixtures.graphql();

    let response = rpc
        .query(
            r#"query ($good: String!, $bad: String!) {
                good: account(address: $good) { lamports }
                bad: account(address: $bad) { lamports }
            }"#,
            json!({
                "good": address(1).to_string(),
                "bad": address(2).to_string(),
            }),
        )
        .await;

    let data = serde_json::to_value(&response.data).unwrap();
    assert_eq!(data, json!({ "good": { "lamports": 42 }, "bad": null }));
    assert_eq!(response.errors.len(), 1);
    assert_eq!(error_paths(&response), [json!(["bad"])]);
    assert!(response.errors[0].message.contains("fixture node failure"));
}

#[tokio::test]
async fn test_failing_owner_keeps_parent() {
    let fixtures = Fixtures::new()
        .with(address(1), Fixture::raw(address(2), b"leaf").lamports(7))
        .failing(address(2));
    let rpc = fixtures.graphql();

    let response = rpc
        .query(
            r#"query ($address: String!) {
                account(address: $address) { lamports owner { lamports } }
            }"#,
            json!({ "address": address(1).to_string() }),
        )
        .await;

    let data = serde_json::to_value(&response.data).unwrap();
    assert_eq!(data, json!({ "account": { "lamports": 7, "owner": null } }));
    assert_eq!(error_paths(&response), [json!(["account", "owner"])]);
}

#[tokio::test]
async fn test_invalid_address() {
    let fixtures = Fixtures::new();
    let rpc = fixtures.graphql();

    let response = rpc
        .query(
            r#"{ account(address: "not-an-address") { lamports } }"#,
            json!({}),
        )
        .await;

    let data = serde_json::to_value(&response.data).unwrap();
    assert_eq!(data, json!({ "account": null }));
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("Invalid base58"));
    assert_eq!(fixtures.fetches(), 0);
}

#[tokio::test]
async fn test_missing_account_is_not_an_error() {
    let rpc = Fixtures::new().graphql();

    let data = execute(
        &rpc,
        r#"query ($address: String!) { account(address: $address) { lamports } }"#,
        json!({ "address": address(3).to_string() }),
    )
    .await;

    assert_eq!(data, json!({ "account": null }));
}

#[tokio::test]
async fn test_data_slice_with_json_parsed_is_rejected() {
    let fixtures = Fixtures::new().with(address(1), Fixture::raw(address(0), b"abc"));
    let rpc = fixtures.graphql();

    let response = rpc
        .query(
            r#"query ($address: String!) {
                account(
                    address: $address
                    encoding: jsonParsed
                    dataSlice: { offset: 0, length: 1 }
                ) { lamports }
            }"#,
            json!({ "address": address(1).to_string() }),
        )
        .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("dataSlice"));
    assert_eq!(error_paths(&response), [json!(["account"])]);
}

#[tokio::test]
async fn test_negative_data_slice_is_rejected() {
    let fixtures = Fixtures::new().with(address(1), Fixture::raw(address(0), b"abc"));
    let rpc = fixtures.graphql();

    let response = rpc
        .query(
            r#"query ($address: String!) {
                account(address: $address, dataSlice: { offset: -1, length: 1 }) { lamports }
            }"#,
            json!({ "address": address(1).to_string() }),
        )
        .await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(fixtures.fetches(), 0);
}

#[tokio::test]
async fn test_unknown_field_fails_validation() {
    let fixtures = Fixtures::new();
    let rpc = fixtures.graphql();

    let response = rpc
        .query(
            r#"query ($address: String!) { account(address: $address) { balance } }"#,
            json!({ "address": address(1).to_string() }),
        )
        .await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(fixtures.fetches(), 0);
}
