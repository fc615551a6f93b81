//! Checkout state machine.
//!
//! ```text
//! Idle ─submit─▶ Validating ─ok─▶ Submitting ─2xx─▶ Succeeded
//!                    │                 │
//!                    └─invalid─▶ Idle  └─error/timeout─▶ Failed ─▶ Idle
//! ```
//!
//! Only the Order Service call suspends. While a submission is validating or
//! in flight, further submits return [`SubmitOutcome::InProgress`] without
//! touching the cart. A failure leaves cart and form as they were so the
//! shopper can retry. Dropping a submit future part way through counts as a
//! failure: the machine still passes through `Failed` back to `Idle`.

mod client;
mod form;
mod order;

pub use client::{
    HttpOrderService, NETWORK_ERROR_MESSAGE, ORDER_FAILED_MESSAGE, OrderService, OrderServiceError,
};
pub use form::{CheckoutErrors, CheckoutField, CheckoutForm, ValidatedForm};
pub use order::{CardBrand, OrderConfirmation, OrderPayload, SanitizedPayment, ShippingDetails};

use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::instrument;

use crate::pricing::PricingRules;
use crate::store::CartStore;

/// Default bound on the Order Service call.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

/// Shown when a submission was abandoned before it settled.
pub const INTERRUPTED_MESSAGE: &str = "Checkout was interrupted. Please try again.";

/// Checkout machine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPhase {
    Idle,
    Validating,
    Submitting,
    Succeeded { order_id: String },
    Failed { message: String },
}

impl CheckoutPhase {
    /// Whether a submission is underway.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Validating | Self::Submitting)
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Order placed; the cart has been cleared.
    Succeeded { order_id: String },
    /// Form rejected locally; nothing was sent.
    Invalid(CheckoutErrors),
    /// Service or network failure; retryable.
    Failed { message: String },
    /// Another submit is already underway; this one was ignored.
    InProgress,
}

/// Drives one shopper's checkout against an [`OrderService`].
pub struct CheckoutOrchestrator<S> {
    cart: CartStore,
    service: S,
    pricing: PricingRules,
    timeout: Duration,
    phase: Mutex<CheckoutPhase>,
    history: Mutex<Vec<CheckoutPhase>>,
}

impl<S> fmt::Debug for CheckoutOrchestrator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutOrchestrator")
            .field("phase", &self.phase())
            .field("timeout", &self.timeout)
            .field("pricing", &self.pricing)
            .finish_non_exhaustive()
    }
}

impl<S> CheckoutOrchestrator<S> {
    /// Orchestrator over `cart` with default pricing and timeout.
    pub fn new(cart: CartStore, service: S) -> Self {
        Self {
            cart,
            service,
            pricing: PricingRules::default(),
            timeout: DEFAULT_SUBMIT_TIMEOUT,
            phase: Mutex::new(CheckoutPhase::Idle),
            history: Mutex::new(vec![CheckoutPhase::Idle]),
        }
    }

    #[must_use]
    pub fn with_pricing(mut self, pricing: PricingRules) -> Self {
        self.pricing = pricing;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Current state.
    #[must_use]
    pub fn phase(&self) -> CheckoutPhase {
        self.phase
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every state entered so far, oldest first, starting with `Idle`.
    #[must_use]
    pub fn history(&self) -> Vec<CheckoutPhase> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn transition(&self, next: CheckoutPhase) {
        {
            let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
            tracing::debug!(from = %phase, to = %next, "Checkout transition");
            *phase = next.clone();
        }
        self.record(next);
    }

    fn record(&self, phase: CheckoutPhase) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(phase);
    }
}

impl<S: OrderService> CheckoutOrchestrator<S> {
    /// Validate `form`, submit the order, and settle the cart.
    #[instrument(skip_all, fields(lines = tracing::field::Empty))]
    pub async fn submit(&self, form: &CheckoutForm) -> SubmitOutcome {
        {
            let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
            if phase.is_busy() {
                tracing::debug!(phase = %phase, "Submit ignored, checkout already in progress");
                return SubmitOutcome::InProgress;
            }
            *phase = CheckoutPhase::Validating;
        }
        self.record(CheckoutPhase::Validating);
        let guard = SettleGuard::new(self);

        let items = self.cart.items();
        tracing::Span::current().record("lines", items.len());

        let validated = match form.validate(&items) {
            Ok(validated) => validated,
            Err(errors) => {
                tracing::info!(fields = errors.len(), "Checkout form rejected");
                guard.disarm();
                self.transition(CheckoutPhase::Idle);
                return SubmitOutcome::Invalid(errors);
            }
        };

        let payload = OrderPayload {
            totals: self.pricing.compute_totals(&items),
            items,
            shipping: validated.shipping,
            payment: validated.payment,
        };
        self.transition(CheckoutPhase::Submitting);

        let result = tokio::time::timeout(self.timeout, self.service.submit_order(&payload))
            .await
            .unwrap_or_else(|_| Err(OrderServiceError::Timeout(self.timeout)));

        guard.disarm();
        match result {
            Ok(confirmation) => {
                tracing::info!(
                    order_id = %confirmation.order_id,
                    total = %payload.totals.total,
                    "Order placed"
                );
                self.cart.clear_cart();
                self.transition(CheckoutPhase::Succeeded {
                    order_id: confirmation.order_id.clone(),
                });
                SubmitOutcome::Succeeded {
                    order_id: confirmation.order_id,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Order submission failed");
                let message = e.user_message();
                self.transition(CheckoutPhase::Failed {
                    message: message.clone(),
                });
                self.transition(CheckoutPhase::Idle);
                SubmitOutcome::Failed { message }
            }
        }
    }
}

/// Moves an unsettled submission to `Failed` then `Idle` when dropped.
struct SettleGuard<'a, S> {
    checkout: &'a CheckoutOrchestrator<S>,
    armed: bool,
}

impl<'a, S> SettleGuard<'a, S> {
    const fn new(checkout: &'a CheckoutOrchestrator<S>) -> Self {
        Self {
            checkout,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<S> Drop for SettleGuard<'_, S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!(phase = %self.checkout.phase(), "Checkout submission dropped before settling");
        self.checkout.transition(CheckoutPhase::Failed {
            message: INTERRUPTED_MESSAGE.to_string(),
        });
        self.checkout.transition(CheckoutPhase::Idle);
    }
}
