//! Payment gateway abstraction.
//!
//! The registry anchors mints and transfers with a minimal on-ledger payment
//! through an external collaborator. The call is treated as at-most-once and
//! possibly failing; the registry never retries, and a timed-out call must be
//! treated by callers as "unknown outcome", not a definite failure.

use crate::types::AccountId;
use rand::Rng;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Fixed nominal payment amount anchoring a mint or transfer.
pub const NOMINAL_AMOUNT: &str = "0.0000001";

/// Maximum memo size the gateway accepts, in bytes.
pub const MEMO_MAX_BYTES: usize = 28;

/// Payment gateway result.
pub type GatewayResult<T> = Result<T, PaymentError>;

/// Payment gateway error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The gateway processed the request and declined it.
    #[error("payment rejected: {reason}")]
    Rejected {
        /// Decline reason reported by the gateway.
        reason: String,
    },

    /// The gateway could not be reached or faulted mid-call.
    #[error("payment gateway unavailable: {message}")]
    Unavailable {
        /// Transport-level error message.
        message: String,
    },
}

/// A minimal-value payment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Source account.
    pub from: AccountId,
    /// Destination account (equal to `from` for a mint's self-transfer).
    pub to: AccountId,
    /// Payment amount; always [`NOMINAL_AMOUNT`] for registry traffic.
    pub amount: String,
    /// Short opaque memo, at most [`MEMO_MAX_BYTES`] bytes.
    pub memo: String,
}

/// Successful payment outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentReceipt {
    /// On-ledger transaction reference, when the gateway provides one.
    pub hash: Option<String>,
}

/// Payment gateway trait.
///
/// Abstraction over the on-ledger payment collaborator. Object-safe so
/// registries can share one `Arc<dyn PaymentGateway>`.
pub trait PaymentGateway: Send + Sync {
    /// Send a minimal-value payment.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Rejected`] when the gateway declines and
    /// [`PaymentError::Unavailable`] on transport failure.
    fn send_payment(
        &self,
        request: PaymentRequest,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>>;
}

/// Mock payment gateway (always succeeds for development).
///
/// Simulates a short network delay and returns a fabricated transaction
/// hash. In production, replace with a real ledger integration.
#[derive(Clone, Debug, Default)]
pub struct MockPaymentGateway;

impl MockPaymentGateway {
    /// Creates a new mock payment gateway.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates an Arc-wrapped instance for sharing.
    #[must_use]
    pub fn shared() -> Arc<dyn PaymentGateway> {
        Arc::new(Self::new())
    }
}

impl PaymentGateway for MockPaymentGateway {
    fn send_payment(
        &self,
        request: PaymentRequest,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>> {
        Box::pin(async move {
            // Simulate network delay
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

            let suffix: String = {
                let mut rng = rand::thread_rng();
                (0..16)
                    .map(|_| char::from(b"0123456789abcdefghijklmnopqrstuvwxyz"[rng.gen_range(0..36)]))
                    .collect()
            };
            let hash = format!("mock_txn_{suffix}");

            tracing::info!(
                from = %request.from,
                to = %request.to,
                memo = %request.memo,
                hash = %hash,
                "Mock payment processed successfully"
            );

            Ok(PaymentReceipt { hash: Some(hash) })
        })
    }
}
