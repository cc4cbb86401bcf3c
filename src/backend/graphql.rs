//! GraphQL revisions of the backend.
//!
//! Every call is a POST of `{operationName, variables, query}` to one URL.
//! The single-account shape differs only in that queries are not scoped by
//! an account id and there is no account listing.

use std::collections::HashSet;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{decimal_to_f64, unsupported, Backend};
use crate::client::{ApiRequest, ClientInner};
use crate::models::account::tradable_accounts;
use crate::models::{
    Account, AccountId, CashBalance, Holding, Isin, OrderId, OrderRequest, OrderResponse,
    OrderStatus, PlaceOrderOutcome, PortfolioSummary, Quote, SecurityMatch, Symbol,
};
use crate::{Error, Result, Revision};

const SEARCH_COUNT: u32 = 5;

mod documents {
    pub const ACCOUNTS: &str = r#"
        query Check {
            user {
                id
                accounts {
                    name
                    id
                    created
                    isPrimary
                    status
                }
            }
        }
    "#;

    pub const PORTFOLIO_SUMMARY: &str = r#"
        query GetPortfolioSummary($accountId: String!) {
            account(accountId: $accountId) {
                id
                portfolio {
                    cash {
                        balance {
                            canTrade
                            canWithdraw
                            reservedBalance
                            settledBalance
                            tradeBalance
                            tradeDecrease
                            tradeIncrease
                        }
                        currency
                    }
                    totalEquityValue
                }
            }
        }
    "#;

    pub const PORTFOLIO_SUMMARY_SINGLE: &str = r#"
        query GetPortfolioSummary {
            portfolio {
                cash {
                    balance {
                        canTrade
                        canWithdraw
                        reservedBalance
                        settledBalance
                        tradeBalance
                        tradeDecrease
                        tradeIncrease
                    }
                    currency
                }
                totalEquityValue
            }
        }
    "#;

    pub const HOLDINGS: &str = r#"
        query MinimumPortfolioData($accountId: String!) {
            account(accountId: $accountId) {
                id
                portfolio {
                    totalEquityValue
                    bulbs {
                        isin
                        investment {
                            marketValue
                            ownedShares
                        }
                        security {
                            currentStockPrice
                            ticker
                            securityName
                            securityType
                        }
                    }
                }
            }
        }
    "#;

    pub const HOLDINGS_SINGLE: &str = r#"
        query MinimumPortfolioData {
            portfolio {
                totalEquityValue
                bulbs {
                    isin
                    investment {
                        marketValue
                        ownedShares
                    }
                    security {
                        currentStockPrice
                        ticker
                        securityName
                        securityType
                    }
                }
            }
        }
    "#;

    pub const MARKET_HOURS: &str = r#"
        query MarketHours {
            securityMarketInfo {
                isOpen
            }
        }
    "#;

    pub const SEARCH: &str = r#"
        query Search($query: String!, $count: Int) {
            searchSearch {
                searchSecurities(query: $query, count: $count) {
                    isin
                    security {
                        currentStockPrice
                        ticker
                    }
                }
            }
        }
    "#;

    pub const CREATE_ORDER: &str = r#"
        mutation CreateOrder(
            $order_details: OrderDetailsInput__!
            $accountId: String!
        ) {
            createOrder(
                accountId: $accountId
                order: $order_details
            )
        }
    "#;

    pub const CREATE_ORDER_SINGLE: &str = r#"
        mutation CreateOrder($order_details: OrderDetailsInput__!) {
            createOrder(order: $order_details)
        }
    "#;
}

/// The GraphQL envelope: `{operationName: null, variables, query}`.
pub(crate) fn payload(query: &str, variables: Value) -> Value {
    json!({
        "operationName": null,
        "variables": variables,
        "query": query,
    })
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

fn parse<T: DeserializeOwned>(operation: &'static str, body: &[u8]) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_slice(body)?;
    if !envelope.errors.is_empty() {
        let message = envelope
            .errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::UnexpectedResponse { operation, message });
    }
    envelope.data.ok_or_else(|| Error::UnexpectedResponse {
        operation,
        message: "response has no data".to_string(),
    })
}

/// Fails if a GraphQL body carries `errors` or no `data`.
pub(crate) fn check_envelope(operation: &'static str, body: &[u8]) -> Result<()> {
    parse::<Value>(operation, body).map(|_| ())
}

#[derive(Deserialize)]
struct UserData {
    user: User,
}

#[derive(Deserialize)]
struct User {
    #[serde(default)]
    accounts: Vec<Account>,
}

#[derive(Deserialize)]
struct AccountData<T> {
    account: Option<T>,
}

#[derive(Deserialize)]
struct WithPortfolio<T> {
    portfolio: Option<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryPortfolio {
    #[serde(default)]
    total_equity_value: Option<Decimal>,
    cash: Option<Cash>,
}

#[derive(Deserialize)]
struct Cash {
    #[serde(default)]
    currency: Option<String>,
    balance: Option<Balance>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Balance {
    can_trade: Option<Decimal>,
    can_withdraw: Option<Decimal>,
    reserved_balance: Option<Decimal>,
    settled_balance: Option<Decimal>,
    trade_balance: Option<Decimal>,
    trade_decrease: Option<Decimal>,
    trade_increase: Option<Decimal>,
}

#[derive(Deserialize)]
struct HoldingsPortfolio {
    #[serde(default)]
    bulbs: Vec<Bulb>,
}

#[derive(Deserialize)]
struct Bulb {
    isin: Option<String>,
    investment: Option<Investment>,
    security: Option<Security>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Investment {
    market_value: Option<Decimal>,
    owned_shares: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Security {
    current_stock_price: Option<Decimal>,
    ticker: Option<String>,
    #[serde(default)]
    security_name: Option<String>,
    #[serde(default)]
    security_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketData {
    security_market_info: MarketInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketInfo {
    is_open: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchData {
    search_search: SearchResults,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResults {
    #[serde(default)]
    search_securities: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    isin: Option<String>,
    security: Option<Security>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderData {
    create_order: Value,
}

/// GraphQL backend, in its multi-account or single-account shape.
#[derive(Debug, Clone)]
pub(crate) struct GraphQlBackend {
    url: String,
    single_account: bool,
}

impl GraphQlBackend {
    pub(crate) fn multi_account(url: &str) -> Self {
        Self {
            url: url.to_string(),
            single_account: false,
        }
    }

    pub(crate) fn single_account(url: &str) -> Self {
        Self {
            url: url.to_string(),
            single_account: true,
        }
    }

    fn request(&self, operation: &'static str, query: &str, variables: Value) -> ApiRequest {
        ApiRequest::json(operation, &self.url, payload(query, variables))
    }

    fn accounts_request(&self) -> ApiRequest {
        self.request("getAccounts", documents::ACCOUNTS, json!({}))
    }

    fn summary_request(&self, account_id: Option<&AccountId>) -> ApiRequest {
        match account_id {
            Some(id) if !self.single_account => self.request(
                "getPortfolioSummary",
                documents::PORTFOLIO_SUMMARY,
                json!({ "accountId": id }),
            ),
            _ => self.request(
                "getPortfolioSummary",
                documents::PORTFOLIO_SUMMARY_SINGLE,
                json!({}),
            ),
        }
    }

    fn search_request(&self, query: &str, count: u32) -> ApiRequest {
        self.request(
            "searchSecurities",
            documents::SEARCH,
            json!({ "query": query, "count": count }),
        )
    }

    /// Build the `createOrder` mutation for a resolved instrument.
    fn create_order_request(&self, order: &OrderRequest, isin: &Isin) -> Result<ApiRequest> {
        let mut details = json!({
            "quantity": decimal_to_f64(order.shares, "shares")?,
            "symbol": order.symbol,
            "isin": isin,
            "side": order.side,
            "priceRule": order.order_type,
            "timeInForce": order.time_in_force,
            "routingOption": order.route,
        });
        if let Some(price) = order.limit_price {
            details["limitPrice"] = json!(decimal_to_f64(price, "limit price")?);
        }

        Ok(if self.single_account {
            self.request(
                "placeOrder",
                documents::CREATE_ORDER_SINGLE,
                json!({ "order_details": details }),
            )
        } else {
            self.request(
                "placeOrder",
                documents::CREATE_ORDER,
                json!({ "order_details": details, "accountId": order.account_id }),
            )
        })
    }

    /// Look up the ISIN for a ticker. Exactly one instrument must match.
    async fn resolve_isin(&self, api: &ClientInner, symbol: &Symbol) -> Result<SecurityMatch> {
        let matches: Vec<SecurityMatch> = self
            .search(api, symbol.as_str(), SEARCH_COUNT)
            .await?
            .into_iter()
            .filter(|m| &m.ticker == symbol)
            .collect();
        let distinct: HashSet<&Isin> = matches.iter().map(|m| &m.isin).collect();

        match distinct.len() {
            0 => Err(Error::SecurityNotFound(symbol.to_string())),
            1 => Ok(matches[0].clone()),
            n => Err(Error::InvalidParameter(format!(
                "ticker {symbol} is ambiguous: {n} instruments match"
            ))),
        }
    }
}

fn summary_from(portfolio: SummaryPortfolio) -> PortfolioSummary {
    let (currency, balance) = match portfolio.cash {
        Some(cash) => (cash.currency.unwrap_or_default(), cash.balance.unwrap_or_default()),
        None => (String::new(), Balance::default()),
    };
    PortfolioSummary {
        total_equity_value: portfolio.total_equity_value.unwrap_or_default(),
        cash: CashBalance {
            currency,
            can_trade: balance.can_trade.unwrap_or_default(),
            can_withdraw: balance.can_withdraw.unwrap_or_default(),
            reserved_balance: balance.reserved_balance.unwrap_or_default(),
            settled_balance: balance.settled_balance.unwrap_or_default(),
            trade_balance: balance.trade_balance.unwrap_or_default(),
            trade_decrease: balance.trade_decrease.unwrap_or_default(),
            trade_increase: balance.trade_increase.unwrap_or_default(),
        },
    }
}

fn holding_from(bulb: Bulb) -> Option<Holding> {
    let security = bulb.security?;
    let investment = bulb.investment;
    Some(Holding {
        symbol: Symbol::new(security.ticker?),
        isin: bulb.isin.map(Isin::new),
        name: security.security_name,
        security_type: security.security_type,
        shares: investment
            .as_ref()
            .and_then(|i| i.owned_shares)
            .unwrap_or_default(),
        market_value: investment
            .as_ref()
            .and_then(|i| i.market_value)
            .unwrap_or_default(),
        price: security.current_stock_price,
        cost_basis: None,
    })
}

fn order_response_from(value: Value) -> OrderResponse {
    let order_id = match &value {
        Value::String(id) => Some(OrderId::new(id.as_str())),
        Value::Object(map) => map.get("id").and_then(Value::as_str).map(OrderId::new),
        _ => None,
    };
    let message = match value {
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    };
    OrderResponse {
        order_id,
        status: OrderStatus::Pending,
        message,
    }
}

#[async_trait]
impl Backend for GraphQlBackend {
    fn revision(&self) -> Revision {
        if self.single_account {
            Revision::GraphQlSingleAccount
        } else {
            Revision::GraphQl
        }
    }

    fn probe_request(&self) -> ApiRequest {
        if self.single_account {
            self.summary_request(None)
        } else {
            self.accounts_request()
        }
    }

    async fn accounts(&self, api: &ClientInner) -> Result<Vec<Account>> {
        if self.single_account {
            return unsupported("getAccounts", self.revision());
        }
        let body = api.call(&self.accounts_request()).await?;
        let data: UserData = parse("getAccounts", &body)?;
        Ok(tradable_accounts(data.user.accounts))
    }

    async fn portfolio_summary(
        &self,
        api: &ClientInner,
        account_id: &AccountId,
    ) -> Result<PortfolioSummary> {
        const OP: &str = "getPortfolioSummary";
        let body = api.call(&self.summary_request(Some(account_id))).await?;

        let portfolio = if self.single_account {
            parse::<WithPortfolio<SummaryPortfolio>>(OP, &body)?.portfolio
        } else {
            parse::<AccountData<WithPortfolio<SummaryPortfolio>>>(OP, &body)?
                .account
                .and_then(|a| a.portfolio)
        };
        let portfolio = portfolio.ok_or_else(|| Error::UnexpectedResponse {
            operation: OP,
            message: "no portfolio in response".to_string(),
        })?;
        Ok(summary_from(portfolio))
    }

    async fn holdings(&self, api: &ClientInner, account_id: &AccountId) -> Result<Vec<Holding>> {
        const OP: &str = "getHoldings";
        let request = if self.single_account {
            self.request(OP, documents::HOLDINGS_SINGLE, json!({}))
        } else {
            self.request(OP, documents::HOLDINGS, json!({ "accountId": account_id }))
        };
        let body = api.call(&request).await?;

        let portfolio = if self.single_account {
            parse::<WithPortfolio<HoldingsPortfolio>>(OP, &body)?.portfolio
        } else {
            parse::<AccountData<WithPortfolio<HoldingsPortfolio>>>(OP, &body)?
                .account
                .and_then(|a| a.portfolio)
        };
        Ok(portfolio
            .map(|p| p.bulbs.into_iter().filter_map(holding_from).collect())
            .unwrap_or_default())
    }

    async fn quote(&self, api: &ClientInner, symbol: &Symbol) -> Result<Quote> {
        let security = self.resolve_isin(api, symbol).await?;
        let price = security.price.ok_or_else(|| Error::UnexpectedResponse {
            operation: "getQuote",
            message: format!("no price for {symbol}"),
        })?;
        Ok(Quote {
            symbol: security.ticker,
            price,
            isin: Some(security.isin),
            timestamp: None,
        })
    }

    async fn is_market_open(&self, api: &ClientInner) -> Result<bool> {
        let request = self.request("isMarketOpen", documents::MARKET_HOURS, json!({}));
        let body = api.call(&request).await?;
        let data: MarketData = parse("isMarketOpen", &body)?;
        Ok(data.security_market_info.is_open)
    }

    async fn search(
        &self,
        api: &ClientInner,
        query: &str,
        count: u32,
    ) -> Result<Vec<SecurityMatch>> {
        let body = api.call(&self.search_request(query, count)).await?;
        let data: SearchData = parse("searchSecurities", &body)?;
        Ok(data
            .search_search
            .search_securities
            .into_iter()
            .filter_map(|hit| {
                let security = hit.security?;
                Some(SecurityMatch {
                    isin: Isin::new(hit.isin?),
                    ticker: Symbol::new(security.ticker?),
                    price: security.current_stock_price,
                })
            })
            .collect())
    }

    async fn place_order(
        &self,
        api: &ClientInner,
        order: &OrderRequest,
    ) -> Result<PlaceOrderOutcome> {
        order.validate()?;
        if !self.is_market_open(api).await? {
            return Err(Error::MarketClosed);
        }
        let security = self.resolve_isin(api, &order.symbol).await?;
        let request = self.create_order_request(order, &security.isin)?;

        if order.dry_run {
            debug!(symbol = %order.symbol, "dry run; order not sent");
            return Ok(PlaceOrderOutcome::DryRun(request));
        }

        let body = api.call(&request).await?;
        let data: CreateOrderData = parse("placeOrder", &body)?;
        Ok(PlaceOrderOutcome::Submitted(order_response_from(
            data.create_order,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RequestBody;
    use crate::models::{OrderRequestBuilder, OrderSide, OrderType, Route};
    use rust_decimal_macros::dec;

    #[test]
    fn test_payload_envelope() {
        let body = payload("query X { a }", json!({ "k": 1 }));
        assert!(body["operationName"].is_null());
        assert_eq!(body["variables"]["k"], 1);
        assert_eq!(body["query"], "query X { a }");
    }

    #[test]
    fn test_parse_surfaces_graphql_errors() {
        let body = br#"{"data":null,"errors":[{"message":"bad"},{"message":"worse"}]}"#;
        let err = parse::<MarketData>("isMarketOpen", body).unwrap_err();
        match err {
            Error::UnexpectedResponse { operation, message } => {
                assert_eq!(operation, "isMarketOpen");
                assert_eq!(message, "bad; worse");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_check_envelope() {
        assert!(check_envelope("getAccounts", br#"{"data":{"user":{}}}"#).is_ok());
        assert!(matches!(
            check_envelope("getAccounts", br#"{"data":null,"errors":[{"message":"unauthorized"}]}"#),
            Err(Error::UnexpectedResponse { .. })
        ));
        assert!(check_envelope("getAccounts", br#"{"data":null}"#).is_err());
    }

    #[test]
    fn test_probe_depends_on_shape() {
        let multi = GraphQlBackend::multi_account("https://x/graphql/");
        assert_eq!(multi.probe_request().operation, "getAccounts");

        let single = GraphQlBackend::single_account("https://x/graphql/");
        assert_eq!(single.probe_request().operation, "getPortfolioSummary");
    }

    #[test]
    fn test_create_order_variables() {
        let backend = GraphQlBackend::multi_account("https://x/graphql/");
        let order = OrderRequestBuilder::new()
            .account_id("acc-1")
            .symbol("AAPL")
            .side(OrderSide::Sell)
            .shares(dec!(3))
            .order_type(OrderType::Limit)
            .limit_price(dec!(190.5))
            .route(Route::ExchangeAtsSdp)
            .build()
            .unwrap();

        let request = backend
            .create_order_request(&order, &Isin::new("US0378331005"))
            .unwrap();
        let RequestBody::Json(body) = request.body else {
            panic!("expected json body");
        };
        let details = &body["variables"]["order_details"];
        assert_eq!(body["variables"]["accountId"], "acc-1");
        assert_eq!(details["quantity"], 3.0);
        assert_eq!(details["isin"], "US0378331005");
        assert_eq!(details["side"], "sell");
        assert_eq!(details["priceRule"], "limit");
        assert_eq!(details["limitPrice"], 190.5);
        assert_eq!(details["timeInForce"], "day");
        assert_eq!(details["routingOption"], "exchange_ats_sdp");
    }

    #[test]
    fn test_holding_from_bulb_without_ticker_is_skipped() {
        let bulb: Bulb = serde_json::from_value(json!({
            "isin": "X",
            "investment": { "marketValue": 10, "ownedShares": 1 },
            "security": { "currentStockPrice": 10, "ticker": null }
        }))
        .unwrap();
        assert!(holding_from(bulb).is_none());
    }

    #[test]
    fn test_order_response_from_scalar() {
        let response = order_response_from(json!("order-9"));
        assert_eq!(response.order_id.unwrap().as_str(), "order-9");
        assert_eq!(response.status, OrderStatus::Pending);
    }
}
