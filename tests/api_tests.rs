//! Integration tests for the API services across backend revisions.
//!
//! Every test runs against a local mock server; no Fennel account is needed.
//!
//! Run with: cargo test --test api_tests

mod common;

use chrono::{TimeZone, Utc};
use prost::Message;
use prost_types::Timestamp;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_bytes, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fennel_invest::client::RequestBody;
use fennel_invest::prelude::*;
use fennel_invest::wire;

use common::logged_in_client;

fn protobuf(message: impl Message) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/x-protobuf")
        .set_body_bytes(message.encode_to_vec())
}

fn graphql(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

/// The `Check` query doubles as the token probe on the multi-account revision.
async fn mount_graphql_accounts(server: &MockServer, accounts: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/graphql/"))
        .and(body_string_contains("query Check"))
        .respond_with(graphql(json!({ "user": { "id": "u-1", "accounts": accounts } })))
        .mount(server)
        .await;
}

async fn mount_market_hours(server: &MockServer, open: bool) {
    Mock::given(method("POST"))
        .and(path("/graphql/"))
        .and(body_string_contains("query MarketHours"))
        .respond_with(graphql(json!({ "securityMarketInfo": { "isOpen": open } })))
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, hits: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/graphql/"))
        .and(body_string_contains("query Search"))
        .respond_with(graphql(json!({ "searchSearch": { "searchSecurities": hits } })))
        .mount(server)
        .await;
}

async fn mount_protobuf_probe(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/accounts/info"))
        .respond_with(protobuf(wire::AccountsResponse::default()))
        .mount(server)
        .await;
}

fn ts(year: i32, month: u32, day: u32) -> Timestamp {
    Timestamp {
        seconds: Utc
            .with_ymd_and_hms(year, month, day, 0, 0, 0)
            .unwrap()
            .timestamp(),
        nanos: 0,
    }
}

fn apple_buy(dry_run: bool) -> OrderRequest {
    OrderRequestBuilder::new()
        .account_id("acc-1")
        .symbol("AAPL")
        .side(OrderSide::Buy)
        .shares(dec!(2))
        .dry_run(dry_run)
        .build()
        .unwrap()
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_graphql_accounts_filtered_and_oldest_first() {
    let server = MockServer::start().await;
    mount_graphql_accounts(
        &server,
        json!([
            { "id": "acc-3", "name": "Third", "created": "2024-03-01T00:00:00Z", "isPrimary": false, "status": "APPROVED" },
            { "id": "acc-1", "name": "First", "created": "2024-01-01T00:00:00Z", "isPrimary": true, "status": "APPROVED" },
            { "id": "acc-2", "name": "Second", "created": "2024-02-01T00:00:00Z", "isPrimary": false, "status": "PENDING" }
        ]),
    )
    .await;

    let client = logged_in_client(&server, Revision::GraphQl).await;
    let accounts = client.accounts().list().await.unwrap();

    let ids: Vec<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["acc-1", "acc-3"]);
    assert!(accounts[0].is_primary);
}

#[tokio::test]
async fn test_protobuf_accounts_filtered_and_oldest_first() {
    let server = MockServer::start().await;
    let account = |id: &str, created: Timestamp, status: wire::AccountStatus| wire::Account {
        id: id.to_string(),
        name: id.to_uppercase(),
        created: Some(created),
        status: status as i32,
        is_primary: false,
    };

    Mock::given(method("GET"))
        .and(path("/accounts/info"))
        .respond_with(protobuf(wire::AccountsResponse {
            accounts: vec![
                account("c", ts(2023, 6, 1), wire::AccountStatus::Approved),
                account("a", ts(2021, 6, 1), wire::AccountStatus::Approved),
                account("b", ts(2022, 6, 1), wire::AccountStatus::Pending),
            ],
        }))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::Protobuf).await;
    let accounts = client.accounts().list().await.unwrap();

    let ids: Vec<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[tokio::test]
async fn test_single_account_revision_has_no_account_listing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql/"))
        .and(body_string_contains("query GetPortfolioSummary"))
        .respond_with(graphql(json!({ "portfolio": { "totalEquityValue": 10 } })))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::GraphQlSingleAccount).await;
    let err = client.accounts().list().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Unsupported {
            operation: "getAccounts",
            revision: Revision::GraphQlSingleAccount
        }
    ));
}

// =============================================================================
// Portfolio
// =============================================================================

#[tokio::test]
async fn test_graphql_portfolio_summary() {
    let server = MockServer::start().await;
    mount_graphql_accounts(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/graphql/"))
        .and(body_string_contains("query GetPortfolioSummary"))
        .and(body_string_contains("acc-1"))
        .respond_with(graphql(json!({
            "account": {
                "id": "acc-1",
                "portfolio": {
                    "cash": {
                        "balance": {
                            "canTrade": 120.5,
                            "canWithdraw": 100,
                            "reservedBalance": 0,
                            "settledBalance": 100,
                            "tradeBalance": 120.5,
                            "tradeDecrease": 0,
                            "tradeIncrease": 20.5
                        },
                        "currency": "USD"
                    },
                    "totalEquityValue": 1520.75
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::GraphQl).await;
    let summary = client
        .portfolio()
        .summary(&AccountId::new("acc-1"))
        .await
        .unwrap();

    assert_eq!(summary.total_equity_value, dec!(1520.75));
    assert_eq!(summary.cash.currency, "USD");
    assert_eq!(summary.cash.can_trade, dec!(120.5));
    assert_eq!(summary.cash.trade_increase, dec!(20.5));
}

#[tokio::test]
async fn test_single_account_summary_ignores_account_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql/"))
        .and(body_string_contains("query GetPortfolioSummary"))
        .respond_with(graphql(json!({
            "portfolio": {
                "cash": { "balance": { "canTrade": 5 }, "currency": "USD" },
                "totalEquityValue": 50
            }
        })))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::GraphQlSingleAccount).await;
    let summary = client
        .portfolio()
        .summary(&AccountId::new("ignored"))
        .await
        .unwrap();
    assert_eq!(summary.total_equity_value, dec!(50));
    assert_eq!(summary.cash.can_trade, dec!(5));

    for request in server.received_requests().await.unwrap() {
        assert!(!String::from_utf8_lossy(&request.body).contains("ignored"));
    }
}

#[tokio::test]
async fn test_graphql_holdings() {
    let server = MockServer::start().await;
    mount_graphql_accounts(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/graphql/"))
        .and(body_string_contains("query MinimumPortfolioData"))
        .respond_with(graphql(json!({
            "account": {
                "id": "acc-1",
                "portfolio": {
                    "totalEquityValue": 400,
                    "bulbs": [{
                        "isin": "US78462F1030",
                        "investment": { "marketValue": 400, "ownedShares": 0.8 },
                        "security": {
                            "currentStockPrice": 500,
                            "ticker": "SPY",
                            "securityName": "SPDR S&P 500 ETF",
                            "securityType": "etf"
                        }
                    }]
                }
            }
        })))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::GraphQl).await;
    let holdings = client
        .portfolio()
        .holdings(&AccountId::new("acc-1"))
        .await
        .unwrap();

    assert_eq!(holdings.len(), 1);
    let spy = &holdings[0];
    assert_eq!(spy.symbol.as_str(), "SPY");
    assert_eq!(spy.isin.as_ref().unwrap().as_str(), "US78462F1030");
    assert_eq!(spy.shares, dec!(0.8));
    assert_eq!(spy.price, Some(dec!(500)));
}

#[tokio::test]
async fn test_protobuf_holdings() {
    let server = MockServer::start().await;
    mount_protobuf_probe(&server).await;

    let request = wire::AccountIdRequest {
        account_id: "acc-1".to_string(),
    };
    Mock::given(method("POST"))
        .and(path("/portfolio/positions"))
        .and(body_bytes(request.encode_to_vec()))
        .respond_with(protobuf(wire::PositionsResponse {
            positions: vec![wire::Position {
                symbol: "MSFT".to_string(),
                shares: 3.0,
                market_value: 1200.0,
                cost_basis: Some(900.0),
                price: Some(400.0),
            }],
        }))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::Protobuf).await;
    let holdings = client
        .portfolio()
        .holdings(&AccountId::new("acc-1"))
        .await
        .unwrap();

    assert_eq!(holdings[0].symbol.as_str(), "MSFT");
    assert_eq!(holdings[0].shares, dec!(3));
    assert_eq!(holdings[0].cost_basis, Some(dec!(900)));
}

#[tokio::test]
async fn test_remote_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    mount_protobuf_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/portfolio/summary"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::Protobuf).await;
    let err = client
        .portfolio()
        .summary(&AccountId::new("acc-1"))
        .await
        .unwrap_err();

    assert!(err.is_server_error());
    match err {
        Error::RemoteCallFailed {
            operation,
            status,
            body,
        } => {
            assert_eq!(operation, "getPortfolioSummary");
            assert_eq!(status, 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// =============================================================================
// Market data
// =============================================================================

#[tokio::test]
async fn test_graphql_quote_resolves_through_search() {
    let server = MockServer::start().await;
    mount_graphql_accounts(&server, json!([])).await;
    mount_search(
        &server,
        json!([
            { "isin": "US0378331005", "security": { "ticker": "AAPL", "currentStockPrice": 190.25 } },
            { "isin": "XX0000000000", "security": { "ticker": "AAPLX", "currentStockPrice": 1 } }
        ]),
    )
    .await;

    let client = logged_in_client(&server, Revision::GraphQl).await;
    let quote = client
        .market_data()
        .quote(&Symbol::new("aapl"))
        .await
        .unwrap();

    assert_eq!(quote.symbol.as_str(), "AAPL");
    assert_eq!(quote.price, dec!(190.25));
    assert_eq!(quote.isin.unwrap().as_str(), "US0378331005");
}

#[tokio::test]
async fn test_graphql_market_hours() {
    let server = MockServer::start().await;
    mount_graphql_accounts(&server, json!([])).await;
    mount_market_hours(&server, true).await;

    let client = logged_in_client(&server, Revision::GraphQl).await;
    assert!(client.market_data().is_market_open().await.unwrap());
}

#[tokio::test]
async fn test_protobuf_nbbo() {
    let server = MockServer::start().await;
    mount_protobuf_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/markets/price/nbbo"))
        .and(body_bytes(
            wire::NbboRequest {
                symbol: "SPY".to_string(),
            }
            .encode_to_vec(),
        ))
        .respond_with(protobuf(wire::NbboResponse {
            symbol: "SPY".to_string(),
            bid: 500.0,
            bid_size: 100.0,
            ask: 500.5,
            ask_size: 200.0,
            timestamp: Some(ts(2024, 5, 1)),
        }))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::Protobuf).await;
    let nbbo = client.market_data().nbbo(&Symbol::new("spy")).await.unwrap();

    assert_eq!(nbbo.bid, dec!(500));
    assert_eq!(nbbo.ask, dec!(500.5));
    assert_eq!(nbbo.mid(), dec!(500.25));
    assert!(nbbo.timestamp.is_some());
}

#[tokio::test]
async fn test_protobuf_quote_uses_latest_prices() {
    let server = MockServer::start().await;
    mount_protobuf_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/markets/prices/latest"))
        .respond_with(protobuf(wire::MultiPriceResponse {
            prices: vec![wire::PriceResponse {
                symbol: "TSLA".to_string(),
                price: 250.5,
                timestamp: None,
            }],
        }))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::Protobuf).await;
    let quote = client.market_data().quote(&Symbol::new("TSLA")).await.unwrap();
    assert_eq!(quote.price, dec!(250.5));
    assert!(quote.isin.is_none());
}

#[tokio::test]
async fn test_operation_missing_from_revision_is_unsupported() {
    let server = MockServer::start().await;
    mount_graphql_accounts(&server, json!([])).await;

    let client = logged_in_client(&server, Revision::GraphQl).await;
    let err = client
        .market_data()
        .nbbo(&Symbol::new("SPY"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unsupported { operation: "getNbboPrice", .. }));
    assert_eq!(
        err.to_string(),
        "getNbboPrice is not supported by the graphql backend"
    );

    let client = logged_in_client(&server, Revision::Protobuf).await;
    mount_protobuf_probe(&server).await;
    let err = client.market_data().is_market_open().await.unwrap_err();
    assert!(matches!(err, Error::Unsupported { .. }));
}

#[tokio::test]
async fn test_search_rejects_empty_query_before_network() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server, Revision::GraphQl).await;

    let err = client.market_data().search("  ", 5).await.unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_invalid_order_rejected_without_requests() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server, Revision::GraphQl).await;

    let mut order = apple_buy(false);
    order.shares = dec!(0);

    let err = client.orders().place(&order).await.unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_graphql_dry_run_returns_payload_without_sending() {
    let server = MockServer::start().await;
    mount_graphql_accounts(&server, json!([])).await;
    mount_market_hours(&server, true).await;
    mount_search(
        &server,
        json!([{ "isin": "US0378331005", "security": { "ticker": "AAPL", "currentStockPrice": 190 } }]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/graphql/"))
        .and(body_string_contains("mutation CreateOrder"))
        .respond_with(graphql(json!({ "createOrder": "order-1" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::GraphQl).await;
    let outcome = client.orders().place(&apple_buy(true)).await.unwrap();

    let PlaceOrderOutcome::DryRun(request) = outcome else {
        panic!("expected a dry run");
    };
    assert_eq!(request.operation, "placeOrder");
    let RequestBody::Json(body) = request.body else {
        panic!("expected a json payload");
    };
    let details = &body["variables"]["order_details"];
    assert_eq!(details["isin"], "US0378331005");
    assert_eq!(details["quantity"], 2.0);
    assert_eq!(details["side"], "buy");
    assert_eq!(body["variables"]["accountId"], "acc-1");
}

#[tokio::test]
async fn test_graphql_order_submitted() {
    let server = MockServer::start().await;
    mount_graphql_accounts(&server, json!([])).await;
    mount_market_hours(&server, true).await;
    mount_search(
        &server,
        json!([{ "isin": "US0378331005", "security": { "ticker": "AAPL", "currentStockPrice": 190 } }]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/graphql/"))
        .and(body_string_contains("mutation CreateOrder"))
        .and(body_string_contains("US0378331005"))
        .respond_with(graphql(json!({ "createOrder": "order-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::GraphQl).await;
    let outcome = client.orders().place(&apple_buy(false)).await.unwrap();

    let PlaceOrderOutcome::Submitted(response) = outcome else {
        panic!("expected a submitted order");
    };
    assert_eq!(response.order_id, Some(OrderId::new("order-1")));
}

#[tokio::test]
async fn test_graphql_unknown_ticker() {
    let server = MockServer::start().await;
    mount_graphql_accounts(&server, json!([])).await;
    mount_market_hours(&server, true).await;
    mount_search(
        &server,
        json!([{ "isin": "XX0000000000", "security": { "ticker": "AAPLX", "currentStockPrice": 1 } }]),
    )
    .await;

    let client = logged_in_client(&server, Revision::GraphQl).await;
    let err = client.orders().place(&apple_buy(false)).await.unwrap_err();
    assert!(matches!(err, Error::SecurityNotFound(ref s) if s == "AAPL"));
}

#[tokio::test]
async fn test_graphql_order_refused_when_market_closed() {
    let server = MockServer::start().await;
    mount_graphql_accounts(&server, json!([])).await;
    mount_market_hours(&server, false).await;
    Mock::given(method("POST"))
        .and(path("/graphql/"))
        .and(body_string_contains("query Search"))
        .respond_with(graphql(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::GraphQl).await;
    let err = client.orders().place(&apple_buy(false)).await.unwrap_err();
    assert!(matches!(err, Error::MarketClosed));
}

#[tokio::test]
async fn test_protobuf_dry_run_encodes_create_order() {
    let server = MockServer::start().await;
    mount_protobuf_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/order/create"))
        .respond_with(protobuf(wire::OrderResponse::default()))
        .expect(0)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::Protobuf).await;
    let outcome = client.orders().place(&apple_buy(true)).await.unwrap();

    let PlaceOrderOutcome::DryRun(request) = outcome else {
        panic!("expected a dry run");
    };
    let RequestBody::Protobuf(bytes) = request.body else {
        panic!("expected a protobuf payload");
    };
    let decoded = wire::CreateOrderRequest::decode(bytes.as_slice()).unwrap();
    assert_eq!(decoded.account_id, "acc-1");
    assert_eq!(decoded.symbol, "AAPL");
    assert_eq!(decoded.shares, 2.0);
}

#[tokio::test]
async fn test_protobuf_cancel_order() {
    let server = MockServer::start().await;
    mount_protobuf_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/order/cancel"))
        .and(body_bytes(
            wire::CancelOrderRequest {
                order_id: "o-9".to_string(),
            }
            .encode_to_vec(),
        ))
        .respond_with(protobuf(wire::OrderResponse {
            id: "o-9".to_string(),
            status: wire::OrderStatus::Cancelled as i32,
            message: None,
        }))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::Protobuf).await;
    let response = client.orders().cancel(&OrderId::new("o-9")).await.unwrap();

    assert_eq!(response.status, OrderStatus::Cancelled);
    assert!(response.status.is_terminal());
    assert_eq!(response.order_id, Some(OrderId::new("o-9")));
}

#[tokio::test]
async fn test_protobuf_list_orders_since() {
    let server = MockServer::start().await;
    mount_protobuf_probe(&server).await;

    let since = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    Mock::given(method("POST"))
        .and(path("/orders/list"))
        .and(body_bytes(
            wire::ListOrdersRequest {
                account_id: "acc-1".to_string(),
                since_date: Some(ts(2024, 5, 1)),
            }
            .encode_to_vec(),
        ))
        .respond_with(protobuf(wire::ListOrdersResponse {
            orders: vec![wire::Order {
                id: "o-1".to_string(),
                account_id: "acc-1".to_string(),
                symbol: "AAPL".to_string(),
                side: wire::Side::Buy as i32,
                order_type: wire::OrderType::Market as i32,
                shares: 2.0,
                filled_shares: 2.0,
                average_fill_price: Some(189.5),
                status: wire::OrderStatus::Filled as i32,
                created_at: Some(ts(2024, 5, 2)),
                ..Default::default()
            }],
        }))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, Revision::Protobuf).await;
    let orders = client
        .orders()
        .list(&AccountId::new("acc-1"), since)
        .await
        .unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Filled);
    assert_eq!(orders[0].side, Some(OrderSide::Buy));
    assert_eq!(orders[0].average_fill_price, Some(dec!(189.5)));
}
