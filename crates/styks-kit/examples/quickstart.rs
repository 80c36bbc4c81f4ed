//! Quickstart - Essential Styks operations
//!
//! Covers: client setup, config queries, reporting prices, role management
//!
//! Run: cargo run --example quickstart
//!
//! Point the URLs at a running node pair before expecting live results.

use styks_kit::*;

const PRICE_FEED: &str = "hash-0101010101010101010101010101010101010101010101010101010101010101";

// ============================================================================
// 1. Read feed state (read-only, speculative node)
// ============================================================================

async fn read_example(client: &OdraClient) -> Result<(), Error> {
    println!("=== Read Example ===\n");

    let feed = StyksPriceFeedClient::new(client.clone(), PRICE_FEED.parse()?);

    // "Not configured" is an answer, not an error
    match feed.get_config_or_none().await? {
        Some(config) => {
            println!("Feeds: {:?}", config.price_feed_ids);
            println!("Heartbeat every {}s", config.heartbeat_interval);
        }
        None => println!("Feed is not configured yet"),
    }

    if let Some(price) = feed.get_twap_price("CSPRUSD").await? {
        println!("CSPRUSD TWAP: {price}");
    }

    if let Some(last) = feed.get_last_heartbeat().await? {
        println!("Last heartbeat at {last}s");
    }

    Ok(())
}

// ============================================================================
// 2. Configure and report (signed writes, primary node)
// ============================================================================

async fn write_example(client: &OdraClient) -> Result<(), Error> {
    println!("\n=== Write Example ===\n");

    let feed = StyksPriceFeedClient::new(client.clone(), PRICE_FEED.parse()?);

    let config = PriceFeedConfig {
        heartbeat_interval: 100,
        heartbeat_tolerance: 10,
        twap_window: 3,
        twap_tolerance: 1,
        price_feed_ids: vec!["CSPRUSD".to_string()],
    };
    let hash = feed.set_config(config).await?;
    println!("set_config submitted: {hash}");

    // Submissions are never retried internally; poll the hash to confirm
    // before considering a resubmit.
    let hash = feed.add_to_feed(vec![("CSPRUSD".to_string(), 1234)]).await?;
    println!("add_to_feed submitted: {hash}");

    Ok(())
}

// ============================================================================
// 3. Role management
// ============================================================================

async fn roles_example(client: &OdraClient) -> Result<(), Error> {
    println!("\n=== Roles Example ===\n");

    let feed = StyksPriceFeedClient::new(client.clone(), PRICE_FEED.parse()?);
    let supplier: Address =
        "account-hash-0202020202020202020202020202020202020202020202020202020202020202".parse()?;

    if !feed.has_role(&Role::PRICE_SUPPLIER, &supplier).await? {
        let hash = feed.grant_role(&Role::PRICE_SUPPLIER, &supplier).await?;
        println!("grant_role submitted: {hash}");
    }

    let admin = feed.get_role_admin(&Role::PRICE_SUPPLIER).await?;
    println!("PRICE_SUPPLIER is administered by {admin:?}");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let client = OdraClient::builder("http://localhost:7777/rpc", "http://localhost:7778/rpc")
        .chain_name("casper-test")
        .signer(InMemoryWallet::generate())
        .build();

    read_example(&client).await?;
    write_example(&client).await?;
    roles_example(&client).await?;

    Ok(())
}
