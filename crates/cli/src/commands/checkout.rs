//! Checkout command.
//!
//! ```bash
//! satwa checkout --first-name Asha --last-name Rao --email asha@example.com \
//!     --address "12 MG Road" --city Bengaluru --state KA --zip 560001 \
//!     --card-number "4111 1111 1111 1111" --expiry 08/27 --cvv 123
//! ```

use std::fmt::Write as _;

use clap::Args;
use satwa_storefront::checkout::{
    CheckoutForm, CheckoutOrchestrator, HttpOrderService, OrderService, SubmitOutcome,
};
use secrecy::SecretString;

use super::{CommandError, Session};

/// Shipping and payment details for `satwa checkout`.
///
/// No `Debug`: the card number and CVV arrive here in the clear.
#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub state: String,
    #[arg(long)]
    pub zip: String,
    /// Card number; spaces are allowed
    #[arg(long)]
    pub card_number: String,
    /// MM/YY
    #[arg(long)]
    pub expiry: String,
    #[arg(long)]
    pub cvv: String,
    /// Name on the card (defaults to the shipping name)
    #[arg(long, default_value = "")]
    pub card_name: String,
}

impl CheckoutArgs {
    fn into_form(self) -> CheckoutForm {
        CheckoutForm {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            address: self.address,
            city: self.city,
            state: self.state,
            zip: self.zip,
            card_number: SecretString::from(self.card_number),
            expiry_date: self.expiry,
            cvv: SecretString::from(self.cvv),
            card_name: self.card_name,
        }
    }
}

/// Place the current cart as an order with the configured Order Service.
///
/// # Errors
///
/// See [`checkout_with`].
pub async fn checkout(session: &Session, args: CheckoutArgs) -> Result<String, CommandError> {
    let order_service = &session.config.order_service;
    let service = HttpOrderService::new(&order_service.base_url, order_service.token.as_ref())?;
    tracing::debug!(url = %service.orders_url(), "Submitting order");
    checkout_with(session, args, service).await
}

/// Place the current cart as an order with `service`.
///
/// # Errors
///
/// Returns `CommandError::InvalidForm` with every failing field, or
/// `CommandError::CheckoutFailed` with the service or network message. The
/// cart is left untouched in both cases.
pub async fn checkout_with<S: OrderService>(
    session: &Session,
    args: CheckoutArgs,
    service: S,
) -> Result<String, CommandError> {
    let cart = session.cart();
    let totals = session.config.pricing.compute_totals(&cart.items());
    let orchestrator = CheckoutOrchestrator::new(cart, service)
        .with_pricing(session.config.pricing)
        .with_timeout(session.config.order_service.timeout);

    match orchestrator.submit(&args.into_form()).await {
        SubmitOutcome::Succeeded { order_id } => {
            let mut out = String::new();
            let _ = writeln!(out, "Order placed successfully!");
            let _ = writeln!(out, "Order ID: {order_id}");
            let _ = write!(out, "Total charged: {}", totals.total.display());
            Ok(out)
        }
        SubmitOutcome::Invalid(errors) => Err(CommandError::InvalidForm(errors)),
        SubmitOutcome::Failed { message } => Err(CommandError::CheckoutFailed(message)),
        SubmitOutcome::InProgress => Err(CommandError::CheckoutFailed(
            "A checkout is already in progress".to_string(),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use satwa_core::ProductId;
    use satwa_storefront::checkout::{
        CheckoutField, OrderConfirmation, OrderPayload, OrderServiceError,
    };

    use super::*;
    use crate::commands::tests::session;

    struct Accepting;

    impl OrderService for Accepting {
        async fn submit_order(
            &self,
            _payload: &OrderPayload,
        ) -> Result<OrderConfirmation, OrderServiceError> {
            Ok(OrderConfirmation {
                order_id: "ord-42".to_string(),
                status: None,
            })
        }
    }

    struct Declining;

    impl OrderService for Declining {
        async fn submit_order(
            &self,
            _payload: &OrderPayload,
        ) -> Result<OrderConfirmation, OrderServiceError> {
            Err(OrderServiceError::Service {
                status: 402,
                message: "Card declined".to_string(),
            })
        }
    }

    fn args() -> CheckoutArgs {
        CheckoutArgs {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "KA".to_string(),
            zip: "560001".to_string(),
            card_number: "4111 1111 1111 1111".to_string(),
            expiry: "08/27".to_string(),
            cvv: "123".to_string(),
            card_name: String::new(),
        }
    }

    #[tokio::test]
    async fn test_checkout_success_clears_cart() {
        let session = session();
        let necklace = session.product(ProductId::new(1)).unwrap().clone();
        session.cart().add_item(&necklace, 1);

        let out = checkout_with(&session, args(), Accepting).await.unwrap();

        assert!(out.contains("Order ID: ord-42"));
        assert!(out.contains("Total charged: $323.99"));
        assert!(session.cart().items().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_failure_keeps_cart() {
        let session = session();
        let necklace = session.product(ProductId::new(1)).unwrap().clone();
        session.cart().add_item(&necklace, 1);

        let err = checkout_with(&session, args(), Declining).await.unwrap_err();

        assert!(matches!(&err, CommandError::CheckoutFailed(m) if m == "Card declined"));
        assert_eq!(session.cart().cart_count(), 1);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_invalid() {
        let session = session();
        let err = checkout_with(&session, args(), Accepting).await.unwrap_err();
        let CommandError::InvalidForm(errors) = err else {
            panic!("expected form errors, got {err:?}");
        };
        assert!(errors.contains(CheckoutField::Items));
    }
}
