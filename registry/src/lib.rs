//! NFT Ticket Registry - mint, enumerate, transfer, and summarize event
//! admission tickets for wallet-identified users.
//!
//! The registry is the only component with data-integrity logic: unique ticket
//! identifiers, ownership checks on transfer, and derived statistics.
//! Presentation concerns (rendering, QR images, wallet handshakes) live
//! outside and call in through [`TicketRegistry`]; the on-ledger anchoring
//! lives behind [`PaymentGateway`].
//!
//! # Architecture
//!
//! ```text
//! Presentation Layer
//!        │
//!        ▼
//! ┌────────────────┐    send_payment    ┌──────────────────┐
//! │ TicketRegistry │ ─────────────────▶ │  PaymentGateway  │
//! │  mint/transfer │                    │  (on-ledger)     │
//! │  reads/stats   │                    └──────────────────┘
//! └────────────────┘
//!        │ read / write (whole collection)
//!        ▼
//! ┌────────────────┐
//! │  DurableStore  │  one JSON document under "nft_tickets"
//! └────────────────┘
//! ```
//!
//! Mint flow: validate → derive asset code → nominal self-payment through the
//! gateway → append record → single store write. Transfer flow: existence and
//! ownership checks → gateway payment → re-read, relocate, write back. Every
//! operation returns a typed result; nothing here panics on caller input.
//!
//! # Concurrency
//!
//! Registry mutations are serialized through one in-process mutex per
//! instance, closing the read-modify-write race of a naive single-document
//! store. The store itself stays unversioned: writers in other processes are
//! outside this guarantee.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod environment;
pub mod error;
pub mod payment;
pub mod registry;
pub mod stats;
pub mod store;
pub mod types;

pub use config::Config;
pub use environment::{Clock, SystemClock};
pub use error::RegistryError;
pub use payment::{
    GatewayResult, MEMO_MAX_BYTES, MockPaymentGateway, NOMINAL_AMOUNT, PaymentError,
    PaymentGateway, PaymentReceipt, PaymentRequest,
};
pub use registry::TicketRegistry;
pub use stats::{CategoryBreakdown, OwnerStats, RECENT_LIMIT};
pub use store::{DurableStore, FsStore, StoreError, TICKETS_KEY};
pub use types::{
    ASSET_CODE_MAX_LEN, AccountId, AssetCode, NftTicket, TicketCategory, TicketId, TicketMetadata,
};
