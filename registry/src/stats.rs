//! Read-time statistics aggregation.
//!
//! Pure single-pass aggregation over one owner's tickets. Recomputed on
//! every call, never cached.

use crate::types::{NftTicket, TicketCategory};
use serde::Serialize;
use serde::ser::SerializeMap;

/// How many tickets `recent_tickets` holds at most.
pub const RECENT_LIMIT: usize = 5;

/// Per-category ticket counts, ordered by first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryBreakdown(Vec<(TicketCategory, usize)>);

impl CategoryBreakdown {
    /// Count one ticket for `category`.
    fn record(&mut self, category: TicketCategory) {
        match self.0.iter_mut().find(|(c, _)| *c == category) {
            Some((_, count)) => *count += 1,
            None => self.0.push((category, 1)),
        }
    }

    /// The count for `category`, zero if unseen.
    #[must_use]
    pub fn count(&self, category: TicketCategory) -> usize {
        self.0
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0, |(_, count)| *count)
    }

    /// Iterate categories in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (TicketCategory, usize)> + '_ {
        self.0.iter().copied()
    }

    /// Number of distinct categories seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no category has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Serializes as a JSON object keyed by category label, preserving
// first-seen order.
impl Serialize for CategoryBreakdown {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, count) in &self.0 {
            map.serialize_entry(category.label(), count)?;
        }
        map.end()
    }
}

/// Aggregate statistics for one owner's tickets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerStats {
    /// Total number of tickets held.
    pub total: usize,
    /// Ticket counts per category, first-seen order.
    pub by_category: CategoryBreakdown,
    /// Up to [`RECENT_LIMIT`] most recently minted tickets, newest first.
    pub recent_tickets: Vec<NftTicket>,
}

impl OwnerStats {
    /// Aggregate statistics over one owner's tickets.
    ///
    /// `tickets` must already be filtered to a single owner; the aggregation
    /// itself is owner-agnostic. Recency ties keep their original relative
    /// order (stable sort on `minted_at` descending).
    #[must_use]
    pub fn aggregate(tickets: Vec<NftTicket>) -> Self {
        let mut by_category = CategoryBreakdown::default();
        for ticket in &tickets {
            by_category.record(ticket.metadata.category);
        }

        let total = tickets.len();
        let mut recent_tickets = tickets;
        recent_tickets.sort_by(|a, b| b.minted_at.cmp(&a.minted_at));
        recent_tickets.truncate(RECENT_LIMIT);

        Self {
            total,
            by_category,
            recent_tickets,
        }
    }
}
