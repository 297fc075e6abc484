//! End-to-end demo: mint two tickets, transfer one, print owner statistics.
//!
//! Uses the filesystem store and the mock payment gateway, so it runs
//! without any external services. Run with: `cargo run --bin demo`

use anyhow::Result;
use nft_ticket_registry::{
    AccountId, Config, FsStore, MockPaymentGateway, SystemClock, TicketCategory, TicketMetadata,
    TicketRegistry,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let registry = TicketRegistry::new(
        Arc::new(FsStore::new(config.store.path.clone())),
        MockPaymentGateway::shared(),
        Arc::new(SystemClock),
    );

    let alice = AccountId::from("GDEMOALICE");
    let bob = AccountId::from("GDEMOBOB");

    let jazz = registry
        .mint(
            &alice,
            TicketMetadata {
                event_name: "Jazz Night".to_string(),
                event_date: "2025-12-01".to_string(),
                location: "Hall A".to_string(),
                category: TicketCategory::Concert,
                ticket_number: "TKT-000001".to_string(),
                image_url: None,
                description: Some("Front row".to_string()),
            },
        )
        .await?;
    println!("minted {} (asset code {})", jazz.id, jazz.asset_code);

    let derby = registry
        .mint(
            &alice,
            TicketMetadata {
                event_name: "City Derby".to_string(),
                event_date: "2025-12-14".to_string(),
                location: "Stadium North".to_string(),
                category: TicketCategory::Sports,
                ticket_number: "TKT-000002".to_string(),
                image_url: None,
                description: None,
            },
        )
        .await?;
    println!("minted {} (asset code {})", derby.id, derby.asset_code);

    registry.transfer(&jazz.id, &alice, &bob).await?;
    println!("transferred {} to {bob}", jazz.id);

    for owner in [&alice, &bob] {
        let stats = registry.stats(owner);
        println!("{owner}: {} ticket(s)", stats.total);
        for (category, count) in stats.by_category.iter() {
            println!("  {category}: {count}");
        }
        for ticket in &stats.recent_tickets {
            println!("  recent: {} @ {}", ticket.metadata.event_name, ticket.minted_at);
        }
    }

    Ok(())
}
