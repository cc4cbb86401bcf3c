//! Order placement example.
//!
//! Builds a small limit order and submits it as a dry run, printing the
//! payload that would have been sent. Set `FENNEL_LIVE=1` to submit it.
//!
//! Run with: cargo run --example place_order

use rust_decimal_macros::dec;

use fennel_invest::models::{OrderRequestBuilder, OrderSide, OrderType, PlaceOrderOutcome};
use fennel_invest::{ClientConfig, FennelClient, Revision, Symbol};

#[tokio::main]
async fn main() -> fennel_invest::Result<()> {
    tracing_subscriber::fmt::init();

    let live = std::env::var("FENNEL_LIVE").is_ok_and(|v| v == "1");

    let client = FennelClient::new(ClientConfig::default().with_revision(Revision::GraphQl))?;
    if !client.load_session().await {
        eprintln!("No saved session; run the login example first");
        return Ok(());
    }

    let account = client
        .accounts()
        .list()
        .await?
        .into_iter()
        .next()
        .expect("at least one approved account");

    let symbol = Symbol::new("AAPL");
    let quote = client.market_data().quote(&symbol).await?;
    println!("{} last price: ${}", quote.symbol, quote.price);

    let order = OrderRequestBuilder::new()
        .account_id(account.id.clone())
        .symbol(symbol)
        .side(OrderSide::Buy)
        .shares(dec!(1))
        .order_type(OrderType::Limit)
        .limit_price((quote.price * dec!(0.9)).round_dp(2))
        .dry_run(!live)
        .build()?;

    match client.orders().place(&order).await? {
        PlaceOrderOutcome::DryRun(request) => {
            println!("Dry run, nothing sent. Payload:");
            println!("{:#?}", request.body);
        }
        PlaceOrderOutcome::Submitted(response) => {
            println!("Order placed: {:?} ({:?})", response.order_id, response.status);
        }
    }

    Ok(())
}
