//! Domain types for the NFT Ticket Registry.
//!
//! Value objects for wallet accounts, ticket identifiers, asset codes, and the
//! ticket record itself. The serialized shape of [`NftTicket`] is the interop
//! contract for the persisted collection: camelCase field names, RFC 3339
//! timestamps, category as its plain label string.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque wallet account identifier ("the public key").
///
/// Produced by the wallet-connection handshake upstream; the registry never
/// inspects its structure, only compares it for equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap an account identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Globally unique ticket identifier.
///
/// Preferably the payment gateway's transaction reference; when the gateway
/// returns no reference, [`TicketId::synthesize`] builds one from the current
/// time plus random entropy.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Wrap a ticket identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Synthesize a fresh identifier from a timestamp and random entropy.
    ///
    /// Format: `TKT-{unix-millis}-{7 base-36 chars}`.
    pub fn synthesize<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> Self {
        let suffix = base36(rng, 7).to_lowercase();
        Self(format!("TKT-{}-{}", now.timestamp_millis(), suffix))
    }

    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TicketId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Asset code
// ============================================================================

/// Short derived label attached to a minted ticket.
///
/// At most 12 characters from `[A-Z0-9]`: up to 8 alphanumerics extracted
/// from the event name (non-alphanumerics stripped, uppercased) followed by
/// 4 characters of random base-36 entropy, truncated to 12.
///
/// Uniqueness is probabilistic, not guaranteed: the random suffix makes
/// collisions negligible, and the registry additionally regenerates on
/// collision against the live collection with a bounded retry cap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetCode(String);

/// Maximum asset code length.
pub const ASSET_CODE_MAX_LEN: usize = 12;

/// Maximum length of the event-name prefix.
const ASSET_CODE_PREFIX_LEN: usize = 8;

/// Length of the random base-36 suffix.
const ASSET_CODE_SUFFIX_LEN: usize = 4;

impl AssetCode {
    /// Derive an asset code from an event name.
    pub fn derive<R: Rng + ?Sized>(event_name: &str, rng: &mut R) -> Self {
        let prefix: String = event_name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .take(ASSET_CODE_PREFIX_LEN)
            .collect();
        let mut code = prefix + &base36(rng, ASSET_CODE_SUFFIX_LEN);
        code.truncate(ASSET_CODE_MAX_LEN);
        Self(code)
    }

    /// View the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sample `len` uppercase base-36 characters.
fn base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    (0..len)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect()
}

// ============================================================================
// Category
// ============================================================================

/// Closed ticket category enumeration.
///
/// Unknown labels degrade to [`TicketCategory::Other`] rather than erroring,
/// so records written by older or foreign producers still load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketCategory {
    /// Sporting events.
    Sports,
    /// Concerts and live music.
    Concert,
    /// Conferences and talks.
    Conference,
    /// Festivals.
    Festival,
    /// Exhibitions and fairs.
    Exhibition,
    /// Workshops and classes.
    Workshop,
    /// Anything else, including unrecognized labels.
    Other,
}

impl TicketCategory {
    /// The canonical label for this category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sports => "Sports",
            Self::Concert => "Concert",
            Self::Conference => "Conference",
            Self::Festival => "Festival",
            Self::Exhibition => "Exhibition",
            Self::Workshop => "Workshop",
            Self::Other => "Other",
        }
    }
}

impl From<String> for TicketCategory {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Sports" => Self::Sports,
            "Concert" => Self::Concert,
            "Conference" => Self::Conference,
            "Festival" => Self::Festival,
            "Exhibition" => Self::Exhibition,
            "Workshop" => Self::Workshop,
            _ => Self::Other,
        }
    }
}

impl From<TicketCategory> for String {
    fn from(category: TicketCategory) -> Self {
        category.label().to_string()
    }
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Ticket record
// ============================================================================

/// User-supplied ticket metadata, frozen once minted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMetadata {
    /// Event name (non-empty; also the asset code source).
    pub event_name: String,
    /// Calendar date of the event, ISO text.
    pub event_date: String,
    /// Venue or location (non-empty).
    pub location: String,
    /// Ticket category.
    pub category: TicketCategory,
    /// Human-readable ticket number; not guaranteed globally unique.
    pub ticket_number: String,
    /// Optional image URL, carried for interop, never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A minted NFT ticket record.
///
/// Only `owner` ever mutates, and only through a successful transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftTicket {
    /// Globally unique identifier, unique across the whole store.
    pub id: TicketId,
    /// Derived short asset code.
    pub asset_code: AssetCode,
    /// Account that performed the mint (equal to `owner` at mint time).
    pub issuer: AccountId,
    /// Frozen user-supplied metadata.
    pub metadata: TicketMetadata,
    /// Creation timestamp, set once.
    pub minted_at: DateTime<Utc>,
    /// Current holder; changed exclusively by a successful transfer.
    pub owner: AccountId,
}
