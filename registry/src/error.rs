//! Error types for registry operations.

use crate::store::StoreError;
use thiserror::Error;

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Failure modes of the ticket registry.
///
/// Every registry operation is total: failures come back as values of this
/// type, never as panics. The `Display` strings of the fixed variants are
/// the reason strings the presentation layer shows verbatim.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No ticket exists for the requested identifier.
    #[error("Ticket not found")]
    TicketNotFound,

    /// The transfer source is not the ticket's current owner.
    #[error("Not ticket owner")]
    NotTicketOwner,

    /// The payment gateway rejected the mint payment.
    #[error("Mint failed")]
    MintFailed,

    /// The payment gateway rejected the transfer payment.
    #[error("Transfer failed")]
    TransferFailed,

    /// A required input field was empty.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The payment gateway could not be reached or faulted mid-call.
    #[error("{0}")]
    Payment(String),

    /// The durable store failed during a write-back.
    #[error("{0}")]
    Storage(#[from] StoreError),

    /// The collection could not be serialized for persistence.
    #[error("{0}")]
    Serialization(String),
}
