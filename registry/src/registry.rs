//! The Ticket Registry service.
//!
//! Owns record creation (asset-code and ticket-ID generation), the
//! read-modify-write cycle against the durable store, ownership-transfer
//! validation, and statistics aggregation. Constructed with injected store,
//! payment gateway, and clock handles so tests substitute fakes and multiple
//! instances coexist without hidden shared state.
//!
//! Mutating operations (`mint`, `transfer`) run under one in-process mutex,
//! so only a single read-modify-write cycle is ever in flight per registry
//! instance. The underlying single-document store offers no isolation of its
//! own; callers sharing a store across processes still race.

use crate::environment::Clock;
use crate::error::{RegistryError, Result};
use crate::payment::{
    MEMO_MAX_BYTES, NOMINAL_AMOUNT, PaymentError, PaymentGateway, PaymentRequest,
};
use crate::stats::OwnerStats;
use crate::store::{DurableStore, TICKETS_KEY};
use crate::types::{AccountId, AssetCode, NftTicket, TicketId, TicketMetadata};
use std::sync::Arc;
use tokio::sync::Mutex;

/// How many times a colliding asset code is regenerated before the last
/// candidate is accepted anyway (uniqueness stays probabilistic).
const ASSET_CODE_RETRY_CAP: usize = 4;

/// The ticket registry service.
///
/// All operations are total from the caller's viewpoint: they return a
/// value or a typed error, they never panic. Reads of a missing or
/// unparsable collection degrade to the empty collection.
pub struct TicketRegistry {
    store: Arc<dyn DurableStore>,
    gateway: Arc<dyn PaymentGateway>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl TicketRegistry {
    /// Create a registry over the given store, payment gateway, and clock.
    #[must_use]
    pub fn new(
        store: Arc<dyn DurableStore>,
        gateway: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            gateway,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Mint a new ticket for `owner`.
    ///
    /// Anchors the mint with a nominal self-payment through the gateway,
    /// then appends the new record to the persisted collection. Exactly one
    /// store write on success, zero writes on any failure path. No retries;
    /// retry policy is a caller concern.
    ///
    /// # Errors
    ///
    /// [`RegistryError::EmptyField`] on missing inputs,
    /// [`RegistryError::MintFailed`] when the gateway declines, and
    /// [`RegistryError::Payment`] / [`RegistryError::Storage`] /
    /// [`RegistryError::Serialization`] on infrastructure faults.
    pub async fn mint(&self, owner: &AccountId, metadata: TicketMetadata) -> Result<NftTicket> {
        validate_non_empty("owner", owner.as_str())?;
        validate_non_empty("event name", &metadata.event_name)?;
        validate_non_empty("event date", &metadata.event_date)?;
        validate_non_empty("location", &metadata.location)?;
        validate_non_empty("ticket number", &metadata.ticket_number)?;

        let _guard = self.write_lock.lock().await;

        let mut tickets = self.load_collection_strict()?;
        let asset_code = unique_asset_code(&metadata.event_name, &tickets, &mut rand::thread_rng());
        let memo = bounded_memo("NFT:", &metadata.ticket_number);

        let receipt = self
            .gateway
            .send_payment(PaymentRequest {
                from: owner.clone(),
                to: owner.clone(),
                amount: NOMINAL_AMOUNT.to_string(),
                memo,
            })
            .await
            .map_err(|e| gateway_failure(e, RegistryError::MintFailed))?;

        let minted_at = self.clock.now();
        let id = receipt
            .hash
            .map_or_else(|| TicketId::synthesize(minted_at, &mut rand::thread_rng()), TicketId::new);

        let ticket = NftTicket {
            id,
            asset_code,
            issuer: owner.clone(),
            metadata,
            minted_at,
            owner: owner.clone(),
        };

        tickets.push(ticket.clone());
        self.persist(&tickets)?;

        tracing::info!(
            ticket_id = %ticket.id,
            owner = %ticket.owner,
            asset_code = %ticket.asset_code,
            "Ticket minted"
        );
        Ok(ticket)
    }

    /// All tickets currently owned by `owner`, in store insertion order.
    ///
    /// An absent, unparsable, or unreadable collection reads as empty;
    /// this never fails.
    #[must_use]
    pub fn my_tickets(&self, owner: &AccountId) -> Vec<NftTicket> {
        self.load_collection()
            .into_iter()
            .filter(|t| t.owner == *owner)
            .collect()
    }

    /// The ticket with the given id, if present.
    #[must_use]
    pub fn ticket_by_id(&self, id: &TicketId) -> Option<NftTicket> {
        self.load_collection().into_iter().find(|t| t.id == *id)
    }

    /// Transfer ticket ownership from `from` to `to`.
    ///
    /// The ticket must exist and `from` must be its current owner; only then
    /// is the gateway invoked. On gateway success the store is re-read and
    /// the record relocated by id before the write-back, defending against
    /// external mutation between the check and the write. Failure paths
    /// mutate nothing.
    ///
    /// # Errors
    ///
    /// [`RegistryError::TicketNotFound`], [`RegistryError::NotTicketOwner`],
    /// [`RegistryError::TransferFailed`] when the gateway declines, plus the
    /// infrastructure variants of [`RegistryError`].
    pub async fn transfer(
        &self,
        ticket_id: &TicketId,
        from: &AccountId,
        to: &AccountId,
    ) -> Result<()> {
        validate_non_empty("ticket id", ticket_id.as_str())?;
        validate_non_empty("from", from.as_str())?;
        validate_non_empty("to", to.as_str())?;

        let _guard = self.write_lock.lock().await;

        let tickets = self.load_collection_strict()?;
        let ticket = tickets
            .iter()
            .find(|t| t.id == *ticket_id)
            .ok_or(RegistryError::TicketNotFound)?;
        if ticket.owner != *from {
            return Err(RegistryError::NotTicketOwner);
        }

        self.gateway
            .send_payment(PaymentRequest {
                from: from.clone(),
                to: to.clone(),
                amount: NOMINAL_AMOUNT.to_string(),
                memo: bounded_memo("TRANSFER:", ticket_id.as_str()),
            })
            .await
            .map_err(|e| gateway_failure(e, RegistryError::TransferFailed))?;

        // Re-read before the write-back; the collection may have changed
        // while the gateway call was in flight (external writers only, our
        // own mutations are serialized by the lock).
        let mut tickets = self.load_collection_strict()?;
        match tickets.iter_mut().find(|t| t.id == *ticket_id) {
            Some(ticket) => {
                ticket.owner = to.clone();
                self.persist(&tickets)?;
                tracing::info!(ticket_id = %ticket_id, from = %from, to = %to, "Ticket transferred");
            }
            None => {
                tracing::warn!(
                    ticket_id = %ticket_id,
                    "ticket disappeared between ownership check and write-back"
                );
            }
        }
        Ok(())
    }

    /// Aggregate statistics for `owner`: total, per-category counts, and the
    /// most recently minted tickets. Pure read, recomputed on every call.
    #[must_use]
    pub fn stats(&self, owner: &AccountId) -> OwnerStats {
        OwnerStats::aggregate(self.my_tickets(owner))
    }

    /// Load the persisted collection for the pure read operations,
    /// degrading to empty on absence, parse failure, or an unreadable
    /// store. Failures are logged, never surfaced.
    fn load_collection(&self) -> Vec<NftTicket> {
        match self.load_collection_strict() {
            Ok(tickets) => tickets,
            Err(e) => {
                tracing::warn!(error = %e, "ticket store unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Load the persisted collection for the mutating operations.
    ///
    /// Absence and parse failures still degrade to empty (a corrupt
    /// document is superseded by the next write), but a store *read*
    /// failure propagates: mutating over a snapshot we could not read
    /// would replace the whole document and erase every existing ticket.
    fn load_collection_strict(&self) -> Result<Vec<NftTicket>> {
        let Some(document) = self.store.read(TICKETS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&document) {
            Ok(tickets) => Ok(tickets),
            Err(e) => {
                tracing::warn!(error = %e, "ticket collection unparsable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Replace the persisted collection whole.
    fn persist(&self, tickets: &[NftTicket]) -> Result<()> {
        let document = serde_json::to_string(tickets)
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;
        self.store.write(TICKETS_KEY, &document)?;
        Ok(())
    }
}

/// Map a gateway error to the operation's failure: a decline becomes the
/// operation's fixed reason, a transport fault carries its own message.
fn gateway_failure(error: PaymentError, declined: RegistryError) -> RegistryError {
    match error {
        PaymentError::Rejected { .. } => declined,
        e @ PaymentError::Unavailable { .. } => RegistryError::Payment(e.to_string()),
    }
}

fn validate_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(RegistryError::EmptyField { field });
    }
    Ok(())
}

/// Compose `prefix + body` truncated to the gateway's memo byte bound,
/// popping whole characters so the result stays valid UTF-8.
fn bounded_memo(prefix: &str, body: &str) -> String {
    let mut memo = format!("{prefix}{body}");
    while memo.len() > MEMO_MAX_BYTES {
        memo.pop();
    }
    memo
}

/// Derive an asset code, regenerating on collision against the existing
/// collection up to [`ASSET_CODE_RETRY_CAP`] times. The last candidate is
/// accepted on exhaustion: uniqueness stays a probabilistic guarantee.
fn unique_asset_code<R: rand::Rng + ?Sized>(
    event_name: &str,
    existing: &[NftTicket],
    rng: &mut R,
) -> AssetCode {
    let mut code = AssetCode::derive(event_name, rng);
    for _ in 0..ASSET_CODE_RETRY_CAP {
        if !existing.iter().any(|t| t.asset_code == code) {
            break;
        }
        code = AssetCode::derive(event_name, rng);
    }
    code
}
