//! Parsed account types resolved through the full schema.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use solana_rpc_graphql::*;

use crate::fixtures::*;

fn token_program() -> Address {
    TOKEN_PROGRAM.parse().unwrap()
}

// =============================================================================
// SPL token
// =============================================================================

#[tokio::test]
async fn test_token_account() {
    let address: Address = TOKEN_ACCOUNT.parse().unwrap();
    let fixtures = Fixtures::new().with(
        address,
        Fixture::parsed(token_program(), "spl-token", token_account_parsed(), 165),
    );
    let rpc = fixtures.graphql();

    let data = execute(
        &rpc,
        r#"query ($address: String!) {
            account(address: $address) {
                __typename
                encoding
                ... on TokenAccount {
                    data {
                        parsed {
                            info {
                                isNative
                                mint
                                owner
                                state
                                tokenAmount { amount decimals uiAmount uiAmountString }
                            }
                            type
                        }
                        program
                        space
                    }
                }
            }
        }"#,
        json!({ "address": TOKEN_ACCOUNT }),
    )
    .await;

    assert_eq!(
        data,
        json!({
            "account": {
                "__typename": "TokenAccount",
                "encoding": "jsonParsed",
                "data": {
                    "parsed": {
                        "info": {
                            "isNative": false,
                            "mint": "So11111111111111111111111111111111111111112",
                            "owner": "6UsGbaMgchgj4wiwKKuE1v5URHdcDfEiMSM25QpesKir",
                            "state": "initialized",
                            "tokenAmount": {
                                "amount": "500000000",
                                "decimals": 9,
                                "uiAmount": 0.5,
                                "uiAmountString": "0.5"
                            }
                        },
                        "type": "account"
                    },
                    "program": "spl-token",
                    "space": 165
                }
            }
        })
    );
    assert_eq!(fixtures.fetches(), 1);
}

#[tokio::test]
async fn test_mint_account() {
    let fixtures = Fixtures::new().with(
        address(1),
        Fixture::parsed(token_program(), "spl-token", mint_parsed(), 82),
    );
    let rpc = fixtures.graphql();

    let data = execute(
        &rpc,
        r#"query ($address: String!) {
            account(address: $address) {
                ... on MintAccount {
                    data {
                        parsed {
                            info { decimals freezeAuthority isInitialized mintAuthority supply }
                            type
                        }
                        program
                        space
                    }
                }
            }
        }"#,
        json!({ "address": address(1).to_string() }),
    )
    .await;

    let account = &data["account"]["data"];
    assert_eq!(account["parsed"]["type"], "mint");
    assert_eq!(account["program"], "spl-token");
    assert_eq!(account["space"], 82);
    assert_eq!(
        account["parsed"]["info"],
        json!({
            "decimals": 9,
            "freezeAuthority": null,
            "isInitialized": true,
            "mintAuthority": "3p8DUrgGZyc3yCAEPTL4VbWTwdQdGTbRa5XLB9sMDqrr",
            "supply": "999999999997029128"
        })
    );
}

// =============================================================================
// Native programs
// =============================================================================

#[tokio::test]
async fn test_nonce_account() {
    let fixtures = Fixtures::new().with(
        address(2),
        Fixture::parsed(address(0), "nonce", nonce_parsed(), 80),
    );
    let rpc = fixtures.graphql();

    let data = execute(
        &rpc,
        r#"query ($address: String!) {
            account(address: $address) {
                __typename
                ... on NonceAccount {
                    data {
                        parsed {
                            info { authority blockhash feeCalculator { lamportsPerSignature } }
                            type
                        }
                    }
                }
            }
        }"#,
        json!({ "address": address(2).to_string() }),
    )
    .await;

    assert_eq!(data["account"]["__typename"], "NonceAccount");
    assert_eq!(data["account"]["data"]["parsed"]["type"], "initialized");
    assert_eq!(
        data["account"]["data"]["parsed"]["info"],
        nonce_parsed()["info"]
    );
}

#[tokio::test]
async fn test_stake_account() {
    let fixtures = Fixtures::new().with(
        address(3),
        Fixture::parsed(address(0), "stake", stake_parsed(), 200),
    );
    let rpc = fixtures.graphql();

    let data = execute(
        &rpc,
        r#"query ($address: String!) {
            account(address: $address) {
                ... on StakeAccount {
                    data {
                        parsed {
                            info {
                                meta {
                                    authorized { staker withdrawer }
                                    lockup { custodian epoch unixTimestamp }
                                    rentExemptReserve
                                }
                                stake {
                                    creditsObserved
                                    delegation {
                                        activationEpoch
                                        deactivationEpoch
                                        stake
                                        voter
                                        warmupCooldownRate
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }"#,
        json!({ "address": address(3).to_string() }),
    )
    .await;

    let info = &data["account"]["data"]["parsed"]["info"];
    assert_eq!(
        info["meta"]["authorized"]["staker"],
        "3HRNKNXafhr3wE9NSXRpNVdFYt6EJygdVQq4mL8dZGyn"
    );
    assert_eq!(info["meta"]["lockup"]["epoch"], 0);
    assert_eq!(info["meta"]["rentExemptReserve"], "2282880");
    assert_eq!(info["stake"]["creditsObserved"], 169965713);

    let delegation = &info["stake"]["delegation"];
    // Epochs arrive as decimal strings and are served as integers.
    assert_eq!(delegation["activationEpoch"], 386);
    assert_eq!(delegation["deactivationEpoch"], u64::MAX);
    assert_eq!(delegation["stake"], "8007935");
    assert_eq!(delegation["warmupCooldownRate"], 0.25);
}

#[tokio::test]
async fn test_vote_account() {
    let fixtures = Fixtures::new().with(
        address(4),
        Fixture::parsed(address(0), "vote", vote_parsed(), 3762),
    );
    let rpc = fixtures.graphql();

    let data = execute(
        &rpc,
        r#"query ($address: String!) {
            account(address: $address) {
                ... on VoteAccount {
                    data {
                        parsed {
                            info {
                                authorizedVoters { authorizedVoter epoch }
                                authorizedWithdrawer
                                commission
                                epochCredits { credits epoch previousCredits }
                                lastTimestamp { slot timestamp }
                                nodePubkey
                                priorVoters
                                rootSlot
                                votes { confirmationCount slot }
                            }
                            type
                        }
                    }
                }
            }
        }"#,
        json!({ "address": address(4).to_string() }),
    )
    .await;

    let parsed = &data["account"]["data"]["parsed"];
    assert_eq!(parsed["type"], "vote");
    assert_eq!(parsed["info"], vote_parsed()["info"]);
}

#[tokio::test]
async fn test_lookup_table_account() {
    let fixtures = Fixtures::new().with(
        address(5),
        Fixture::parsed(address(0), "address-lookup-table", lookup_table_parsed(), 120),
    );
    let rpc = fixtures.graphql();

    let data = execute(
        &rpc,
        r#"query ($address: String!) {
            account(address: $address) {
                __typename
                ... on LookupTableAccount {
                    data {
                        parsed {
                            info {
                                addresses
                                authority
                                deactivationSlot
                                lastExtendedSlot
                                lastExtendedSlotStartIndex
                            }
                        }
                    }
                }
            }
        }"#,
        json!({ "address": address(5).to_string() }),
    )
    .await;

    assert_eq!(data["account"]["__typename"], "LookupTableAccount");
    let info = &data["account"]["data"]["parsed"]["info"];
    assert_eq!(
        info["addresses"],
        json!(["11111111111111111111111111111111", TOKEN_PROGRAM])
    );
    assert_eq!(info["deactivationSlot"], u64::MAX);
    assert_eq!(info["lastExtendedSlot"], 204699277);
    assert_eq!(info["lastExtendedSlotStartIndex"], 0);
}

// =============================================================================
// Fallback
// =============================================================================

#[tokio::test]
async fn test_unrecognized_program_falls_back_to_base64() {
    let bytes = b"upgradeable program state";
    let fixture = Fixture {
        parsed: Some((
            "bpf-upgradeable-loader".to_string(),
            json!({ "type": "program", "info": { "programData": "x" } }),
        )),
        ..Fixture::raw(address(0), bytes)
    };
    let fixtures = Fixtures::new().with(address(6), fixture);
    let rpc = fixtures.graphql();

    let data = execute(
        &rpc,
        r#"query ($address: String!) {
            account(address: $address) {
                __typename
                encoding
                ... on AccountBase64 { data }
            }
        }"#,
        json!({ "address": address(6).to_string() }),
    )
    .await;

    assert_eq!(data["account"]["__typename"], "AccountBase64");
    assert_eq!(data["account"]["encoding"], "jsonParsed");
    assert_eq!(data["account"]["data"], STANDARD.encode(bytes));

    // The opaque data is read once more as base64, no older than the first read.
    let requests = fixtures.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].address, address(6));
    assert_eq!(requests[1].encoding, AccountEncoding::Base64);
    assert_eq!(requests[1].min_context_slot, Some(SLOT));
}

#[tokio::test]
async fn test_json_parsed_without_parser_uses_payload_as_is() {
    let bytes = b"opaque";
    let fixtures = Fixtures::new().with(address(7), Fixture::raw(address(0), bytes));
    let rpc = fixtures.graphql();

    let data = execute(
        &rpc,
        r#"query ($address: String!) {
            account(address: $address) {
                __typename
                ... on AccountBase64 { data }
            }
        }"#,
        json!({ "address": address(7).to_string() }),
    )
    .await;

    assert_eq!(data["account"]["__typename"], "AccountBase64");
    assert_eq!(data["account"]["data"], STANDARD.encode(bytes));
    assert_eq!(fixtures.fetches(), 1);
}

#[tokio::test]
async fn test_interface_fields_on_every_type() {
    let fixtures = Fixtures::new().with(
        address(8),
        Fixture::parsed(token_program(), "spl-token", mint_parsed(), 82).lamports(1_461_600),
    );
    let rpc = fixtures.graphql();

    let data = execute(
        &rpc,
        r#"query ($address: String!) {
            account(address: $address) { encoding executable lamports rentEpoch }
        }"#,
        json!({ "address": address(8).to_string() }),
    )
    .await;

    assert_eq!(
        data,
        json!({
            "account": {
                "encoding": "jsonParsed",
                "executable": false,
                "lamports": 1_461_600,
                "rentEpoch": u64::MAX
            }
        })
    );
}
