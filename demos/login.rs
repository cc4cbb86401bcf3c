//! Login example.
//!
//! Reuses saved credentials when possible, otherwise emails a one-time code
//! and reads it from stdin. Then lists accounts and their balances.
//!
//! Run with: FENNEL_EMAIL=me@example.com cargo run --example login

use fennel_invest::auth::OtpSource;
use fennel_invest::{ClientConfig, FennelClient, Revision};

#[tokio::main]
async fn main() -> fennel_invest::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let email = std::env::var("FENNEL_EMAIL").expect("FENNEL_EMAIL environment variable required");

    let config = ClientConfig::default().with_revision(Revision::GraphQl);
    let client = FennelClient::new(config)?;

    if client.load_session().await {
        println!("Restored saved session");
    } else {
        println!("Sending a one-time code to {email}...");
        client.login(&email, OtpSource::console()).await?;
        println!("Successfully authenticated!");
    }

    let accounts = client.accounts().list().await?;
    println!("\nFound {} account(s):", accounts.len());

    for account in &accounts {
        println!("  - {} ({})", account.name, account.id);

        let summary = client.portfolio().summary(&account.id).await?;
        println!("    Total equity: ${}", summary.total_equity_value);
        println!("    Buying power: ${}", summary.cash.can_trade);

        for holding in client.portfolio().holdings(&account.id).await? {
            println!(
                "    {:<6} {:>10} shares  ${}",
                holding.symbol, holding.shares, holding.market_value
            );
        }
    }

    println!("\nDone!");
    Ok(())
}
