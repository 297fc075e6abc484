//! Integration tests for the ticket registry.
//!
//! Exercises the full mint / enumerate / transfer / stats surface against the
//! in-memory store and scripted payment gateway, including the failure paths
//! that must leave the persisted collection untouched.
//!
//! Run with: `cargo test --test registry_test`

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use chrono::Duration;
use nft_ticket_registry::environment::Clock;
use nft_ticket_registry::{
    AccountId, NOMINAL_AMOUNT, RECENT_LIMIT, RegistryError, TICKETS_KEY, TicketCategory, TicketId,
    TicketMetadata, TicketRegistry,
};
use nft_ticket_registry_testing::mocks::{
    InMemoryStore, SteppingClock, StubPaymentGateway, test_clock,
};
use std::sync::Arc;

fn metadata(event_name: &str, category: TicketCategory, ticket_number: &str) -> TicketMetadata {
    TicketMetadata {
        event_name: event_name.to_string(),
        event_date: "2025-12-01".to_string(),
        location: "Hall A".to_string(),
        category,
        ticket_number: ticket_number.to_string(),
        image_url: None,
        description: None,
    }
}

fn jazz_metadata() -> TicketMetadata {
    metadata("Jazz Night", TicketCategory::Concert, "TKT-000001")
}

fn registry_with(
    store: &Arc<InMemoryStore>,
    gateway: &Arc<StubPaymentGateway>,
) -> TicketRegistry {
    TicketRegistry::new(store.clone(), gateway.clone(), Arc::new(test_clock()))
}

fn assert_asset_code(code: &str, prefix: &str) {
    assert!(code.starts_with(prefix), "asset code {code} missing {prefix}");
    assert!(code.len() <= 12);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

#[tokio::test]
async fn mint_jazz_night_for_g1() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::succeeding_with("H1"));
    let registry = registry_with(&store, &gateway);
    let g1 = AccountId::from("G1");

    let ticket = registry.mint(&g1, jazz_metadata()).await.unwrap();

    assert_eq!(ticket.id, TicketId::from("H1"));
    assert_eq!(ticket.owner, g1);
    assert_eq!(ticket.issuer, g1);
    assert_eq!(ticket.minted_at, test_clock().now());
    assert_asset_code(ticket.asset_code.as_str(), "JAZZNIGH");
    assert_eq!(ticket.asset_code.as_str().len(), 12);

    // Exactly one nominal self-payment with the ticket-number memo.
    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].from, g1);
    assert_eq!(requests[0].to, g1);
    assert_eq!(requests[0].amount, NOMINAL_AMOUNT);
    assert_eq!(requests[0].memo, "NFT:TKT-000001");

    // Mint followed by lookup returns a ticket equal to the minted one.
    assert_eq!(registry.ticket_by_id(&ticket.id), Some(ticket));
}

#[tokio::test]
async fn mint_rejected_leaves_store_untouched() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::rejecting("declined"));
    let registry = registry_with(&store, &gateway);

    let err = registry
        .mint(&AccountId::from("G1"), jazz_metadata())
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::MintFailed));
    assert_eq!(err.to_string(), "Mint failed");
    assert!(store.document(TICKETS_KEY).is_none());
}

#[tokio::test]
async fn mint_gateway_fault_surfaces_its_message() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::unavailable("gateway offline"));
    let registry = registry_with(&store, &gateway);

    let err = registry
        .mint(&AccountId::from("G1"), jazz_metadata())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("gateway offline"));
    assert!(store.document(TICKETS_KEY).is_none());
}

#[tokio::test]
async fn mint_rejects_empty_inputs_before_calling_gateway() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::new());
    let registry = registry_with(&store, &gateway);

    let err = registry
        .mint(&AccountId::from(""), jazz_metadata())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "owner must not be empty");

    let mut blank_event = jazz_metadata();
    blank_event.event_name = String::new();
    let err = registry
        .mint(&AccountId::from("G1"), blank_event)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "event name must not be empty");

    assert!(gateway.requests().is_empty());
    assert!(store.document(TICKETS_KEY).is_none());
}

#[tokio::test]
async fn mint_without_gateway_hash_synthesizes_ticket_id() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::new());
    let registry = registry_with(&store, &gateway);

    let ticket = registry
        .mint(&AccountId::from("G1"), jazz_metadata())
        .await
        .unwrap();

    assert!(ticket.id.as_str().starts_with("TKT-"));
    assert_eq!(registry.ticket_by_id(&ticket.id), Some(ticket));
}

#[tokio::test]
async fn mint_write_failure_is_reported_and_nothing_persists() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::succeeding_with("H1"));
    let registry = registry_with(&store, &gateway);
    store.set_fail_writes(true);

    let err = registry
        .mint(&AccountId::from("G1"), jazz_metadata())
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Storage(_)));
    assert!(store.document(TICKETS_KEY).is_none());
}

#[tokio::test]
async fn mint_with_unreadable_store_fails_and_keeps_existing_tickets() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::succeeding_with("H9"));
    let registry = registry_with(&store, &gateway);
    let g1 = AccountId::from("G1");

    registry.mint(&g1, jazz_metadata()).await.unwrap();
    registry
        .mint(&g1, metadata("Rock Fest", TicketCategory::Festival, "TKT-000002"))
        .await
        .unwrap();
    let before = store.document(TICKETS_KEY).unwrap();

    // Reads fail, writes would still succeed: minting over the unreadable
    // snapshot must fail instead of replacing the document with a
    // one-ticket collection.
    store.set_fail_reads(true);
    let err = registry
        .mint(&g1, metadata("City Derby", TicketCategory::Sports, "TKT-000003"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Storage(_)));

    store.set_fail_reads(false);
    assert_eq!(store.document(TICKETS_KEY).unwrap(), before);
    assert_eq!(registry.my_tickets(&g1).len(), 2);
}

#[tokio::test]
async fn transfer_with_unreadable_store_fails_without_gateway_call() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::succeeding_with("H1"));
    let registry = registry_with(&store, &gateway);
    let g1 = AccountId::from("G1");

    let ticket = registry.mint(&g1, jazz_metadata()).await.unwrap();
    let before = store.document(TICKETS_KEY).unwrap();

    store.set_fail_reads(true);
    let err = registry
        .transfer(&ticket.id, &g1, &AccountId::from("G2"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Storage(_)));
    // The mint payment is the only gateway traffic.
    assert_eq!(gateway.requests().len(), 1);

    store.set_fail_reads(false);
    assert_eq!(store.document(TICKETS_KEY).unwrap(), before);
    assert_eq!(registry.ticket_by_id(&ticket.id).unwrap().owner, g1);
}

#[tokio::test]
async fn unreadable_store_reads_as_empty_for_pure_queries() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::succeeding_with("H1"));
    let registry = registry_with(&store, &gateway);
    let g1 = AccountId::from("G1");

    let ticket = registry.mint(&g1, jazz_metadata()).await.unwrap();
    store.set_fail_reads(true);

    assert!(registry.my_tickets(&g1).is_empty());
    assert!(registry.ticket_by_id(&ticket.id).is_none());
    assert_eq!(registry.stats(&g1).total, 0);
}

#[tokio::test]
async fn my_tickets_filters_by_owner_and_matches_stats_total() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::new());
    let registry = registry_with(&store, &gateway);
    let g1 = AccountId::from("G1");
    let g2 = AccountId::from("G2");

    registry.mint(&g1, jazz_metadata()).await.unwrap();
    registry
        .mint(&g1, metadata("Rock Fest", TicketCategory::Festival, "TKT-000002"))
        .await
        .unwrap();
    registry
        .mint(&g2, metadata("City Derby", TicketCategory::Sports, "TKT-000003"))
        .await
        .unwrap();

    let g1_tickets = registry.my_tickets(&g1);
    assert_eq!(g1_tickets.len(), 2);
    assert!(g1_tickets.iter().all(|t| t.owner == g1));
    assert_eq!(g1_tickets.len(), registry.stats(&g1).total);
    assert_eq!(registry.my_tickets(&g2).len(), 1);
}

#[tokio::test]
async fn transfer_nonexistent_ticket_fails_without_gateway_call() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::new());
    let registry = registry_with(&store, &gateway);

    let err = registry
        .transfer(&TicketId::from("missing"), &AccountId::from("G1"), &AccountId::from("G2"))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::TicketNotFound));
    assert_eq!(err.to_string(), "Ticket not found");
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn transfer_by_non_owner_fails_and_owner_is_unchanged() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::succeeding_with("H1"));
    let registry = registry_with(&store, &gateway);
    let g1 = AccountId::from("G1");

    let ticket = registry.mint(&g1, jazz_metadata()).await.unwrap();

    let err = registry
        .transfer(&ticket.id, &AccountId::from("G9"), &AccountId::from("G2"))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::NotTicketOwner));
    assert_eq!(err.to_string(), "Not ticket owner");
    assert_eq!(registry.ticket_by_id(&ticket.id).unwrap().owner, g1);
    // The mint payment is the only gateway traffic.
    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test]
async fn transfer_moves_ownership_exactly_once() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::succeeding_with("H1"));
    let registry = registry_with(&store, &gateway);
    let g1 = AccountId::from("G1");
    let g2 = AccountId::from("G2");

    let ticket = registry.mint(&g1, jazz_metadata()).await.unwrap();
    registry.transfer(&ticket.id, &g1, &g2).await.unwrap();

    assert!(registry.my_tickets(&g1).is_empty());
    let g2_tickets = registry.my_tickets(&g2);
    assert_eq!(g2_tickets.len(), 1);
    assert_eq!(g2_tickets[0].id, ticket.id);
    // Issuer records the minter forever; only owner moves.
    assert_eq!(g2_tickets[0].issuer, g1);

    let requests = gateway.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].from, g1);
    assert_eq!(requests[1].to, g2);
    assert_eq!(requests[1].amount, NOMINAL_AMOUNT);
    assert_eq!(requests[1].memo, "TRANSFER:H1");
}

#[tokio::test]
async fn transfer_rejected_by_gateway_keeps_owner() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::new());
    gateway.enqueue(Ok(nft_ticket_registry::PaymentReceipt {
        hash: Some("H1".to_string()),
    }));
    gateway.enqueue(Err(nft_ticket_registry::PaymentError::Rejected {
        reason: "insufficient balance".to_string(),
    }));
    let registry = registry_with(&store, &gateway);
    let g1 = AccountId::from("G1");

    let ticket = registry.mint(&g1, jazz_metadata()).await.unwrap();
    let err = registry
        .transfer(&ticket.id, &g1, &AccountId::from("G2"))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::TransferFailed));
    assert_eq!(err.to_string(), "Transfer failed");
    assert_eq!(registry.ticket_by_id(&ticket.id).unwrap().owner, g1);
}

#[tokio::test]
async fn corrupt_collection_reads_as_empty_everywhere() {
    let store = Arc::new(InMemoryStore::new());
    store.put_document(TICKETS_KEY, "{not json");
    let gateway = Arc::new(StubPaymentGateway::new());
    let registry = registry_with(&store, &gateway);
    let g1 = AccountId::from("G1");

    assert!(registry.my_tickets(&g1).is_empty());
    assert!(registry.ticket_by_id(&TicketId::from("H1")).is_none());
    assert_eq!(registry.stats(&g1).total, 0);
}

#[tokio::test]
async fn mint_over_corrupt_collection_starts_a_fresh_one() {
    let store = Arc::new(InMemoryStore::new());
    store.put_document(TICKETS_KEY, "{not json");
    let gateway = Arc::new(StubPaymentGateway::succeeding_with("H1"));
    let registry = registry_with(&store, &gateway);
    let g1 = AccountId::from("G1");

    let ticket = registry.mint(&g1, jazz_metadata()).await.unwrap();

    assert_eq!(registry.my_tickets(&g1), vec![ticket]);
}

#[tokio::test]
async fn stats_counts_categories_per_owner() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::new());
    let registry = registry_with(&store, &gateway);
    let g1 = AccountId::from("G1");
    let g2 = AccountId::from("G2");

    registry.mint(&g1, jazz_metadata()).await.unwrap();
    registry
        .mint(&g1, metadata("Blues Evening", TicketCategory::Concert, "TKT-000002"))
        .await
        .unwrap();
    registry
        .mint(&g2, metadata("City Derby", TicketCategory::Sports, "TKT-000003"))
        .await
        .unwrap();

    let stats = registry.stats(&g1);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_category.count(TicketCategory::Concert), 2);
    assert_eq!(stats.by_category.count(TicketCategory::Sports), 0);
    let sum: usize = stats.by_category.iter().map(|(_, count)| count).sum();
    assert_eq!(sum, stats.total);
}

#[tokio::test]
async fn recent_tickets_are_newest_first_and_capped() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(StubPaymentGateway::new());
    let clock = SteppingClock::new(test_clock().now(), Duration::minutes(1));
    let registry = TicketRegistry::new(store.clone(), gateway.clone(), Arc::new(clock));
    let g1 = AccountId::from("G1");

    for n in 1..=7 {
        registry
            .mint(
                &g1,
                metadata("Jazz Night", TicketCategory::Concert, &format!("TKT-{n:06}")),
            )
            .await
            .unwrap();
    }

    let stats = registry.stats(&g1);
    assert_eq!(stats.total, 7);
    assert_eq!(stats.recent_tickets.len(), RECENT_LIMIT);
    assert_eq!(stats.recent_tickets[0].metadata.ticket_number, "TKT-000007");
    assert!(
        stats
            .recent_tickets
            .windows(2)
            .all(|pair| pair[0].minted_at >= pair[1].minted_at)
    );
}
