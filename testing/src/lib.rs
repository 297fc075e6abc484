//! # NFT Ticket Registry Testing
//!
//! Test doubles for the ticket registry's injected environment:
//!
//! - [`mocks::FixedClock`] / [`mocks::SteppingClock`]: deterministic time
//! - [`mocks::InMemoryStore`]: in-memory durable store with failure hooks
//! - [`mocks::StubPaymentGateway`]: scripted payment outcomes, captured requests
//!
//! ## Example
//!
//! ```ignore
//! use nft_ticket_registry::{AccountId, TicketRegistry};
//! use nft_ticket_registry_testing::mocks::{test_clock, InMemoryStore, StubPaymentGateway};
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn test_mint_flow() {
//!     let gateway = Arc::new(StubPaymentGateway::succeeding_with("H1"));
//!     let registry = TicketRegistry::new(
//!         Arc::new(InMemoryStore::new()),
//!         gateway.clone(),
//!         Arc::new(test_clock()),
//!     );
//!     let ticket = registry.mint(&AccountId::from("G1"), metadata()).await.unwrap();
//!     assert_eq!(ticket.id.as_str(), "H1");
//! }
//! ```

use chrono::{DateTime, Duration, Utc};
use nft_ticket_registry::environment::Clock;
use nft_ticket_registry::payment::{GatewayResult, PaymentGateway, PaymentReceipt, PaymentRequest};
use nft_ticket_registry::store::{DurableStore, StoreError, StoreResult};

/// Mock implementations of the registry's environment traits.
pub mod mocks {
    use super::{
        Clock, DateTime, Duration, DurableStore, GatewayResult, PaymentGateway, PaymentReceipt,
        PaymentRequest, StoreError, StoreResult, Utc,
    };
    use std::collections::{HashMap, VecDeque};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, PoisonError, RwLock};

    /// Fixed clock for deterministic tests.
    ///
    /// Always returns the same time, making tests reproducible.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every `now()` call.
    ///
    /// Gives successive mints strictly increasing `minted_at` values without
    /// sleeping.
    #[derive(Debug)]
    pub struct SteppingClock {
        current: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Create a clock starting at `start`, advancing `step` per call.
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                current: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            let now = *current;
            *current = now + self.step;
            now
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC).
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// In-memory durable store.
    ///
    /// Documents live in a `HashMap`; `set_fail_reads` / `set_fail_writes`
    /// make subsequent reads or writes fail, for exercising the registry's
    /// unavailable-store and no-partial-write paths.
    #[derive(Debug, Default)]
    pub struct InMemoryStore {
        documents: RwLock<HashMap<String, String>>,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl InMemoryStore {
        /// Create an empty store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// The raw document under `key`, for assertions.
        #[must_use]
        pub fn document(&self, key: &str) -> Option<String> {
            self.documents
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()
        }

        /// Preseed the document under `key` (e.g. with corrupt JSON).
        pub fn put_document(&self, key: &str, document: impl Into<String>) {
            self.documents
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), document.into());
        }

        /// Toggle read failures.
        pub fn set_fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        /// Toggle write failures.
        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }
    }

    impl DurableStore for InMemoryStore {
        fn read(&self, key: &str) -> StoreResult<Option<String>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("reads disabled by test".to_string()));
            }
            Ok(self.document(key))
        }

        fn write(&self, key: &str, document: &str) -> StoreResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("writes disabled by test".to_string()));
            }
            self.put_document(key, document);
            Ok(())
        }
    }

    /// Scriptable payment gateway.
    ///
    /// Pops one scripted outcome per call, falling back to a fixed outcome
    /// once the script is exhausted, and records every request. The default
    /// fallback succeeds without a transaction hash, which drives the
    /// registry's synthesized-id path.
    #[derive(Debug)]
    pub struct StubPaymentGateway {
        script: Mutex<VecDeque<GatewayResult<PaymentReceipt>>>,
        fallback: GatewayResult<PaymentReceipt>,
        requests: Mutex<Vec<PaymentRequest>>,
    }

    impl Default for StubPaymentGateway {
        fn default() -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                fallback: Ok(PaymentReceipt { hash: None }),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl StubPaymentGateway {
        /// Gateway that succeeds with no transaction hash.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Gateway whose every call succeeds with the given hash.
        #[must_use]
        pub fn succeeding_with(hash: &str) -> Self {
            Self {
                fallback: Ok(PaymentReceipt {
                    hash: Some(hash.to_string()),
                }),
                ..Self::default()
            }
        }

        /// Gateway whose every call is rejected with the given reason.
        #[must_use]
        pub fn rejecting(reason: &str) -> Self {
            Self {
                fallback: Err(nft_ticket_registry::payment::PaymentError::Rejected {
                    reason: reason.to_string(),
                }),
                ..Self::default()
            }
        }

        /// Gateway whose every call fails at the transport level.
        #[must_use]
        pub fn unavailable(message: &str) -> Self {
            Self {
                fallback: Err(nft_ticket_registry::payment::PaymentError::Unavailable {
                    message: message.to_string(),
                }),
                ..Self::default()
            }
        }

        /// Append one scripted outcome, consumed before the fallback.
        pub fn enqueue(&self, outcome: GatewayResult<PaymentReceipt>) {
            self.script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(outcome);
        }

        /// Every request the gateway has seen, in call order.
        #[must_use]
        pub fn requests(&self) -> Vec<PaymentRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl PaymentGateway for StubPaymentGateway {
        fn send_payment(
            &self,
            request: PaymentRequest,
        ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request);
            let outcome = self
                .script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone());
            Box::pin(async move { outcome })
        }
    }
}
