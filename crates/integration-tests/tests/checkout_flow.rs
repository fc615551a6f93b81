//! Checkout orchestrator driving the HTTP Order Service client end to end.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::post};
use reqwest::header::AUTHORIZATION;
use rust_decimal_macros::dec;
use satwa_integration_tests::{TestResult, TestServer, closed_port, seed_product};
use satwa_storefront::checkout::{
    CheckoutForm, CheckoutOrchestrator, CheckoutPhase, HttpOrderService, NETWORK_ERROR_MESSAGE,
    ORDER_FAILED_MESSAGE, SubmitOutcome,
};
use satwa_storefront::persistence::{CART_NAMESPACE, PersistenceAdapter};
use satwa_storefront::routes::orders::OrderRecord;
use satwa_storefront::store::CartStore;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;

fn form() -> CheckoutForm {
    CheckoutForm {
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        email: "asha@example.com".to_string(),
        address: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "KA".to_string(),
        zip: "560001".to_string(),
        card_number: SecretString::from("5500 0000 0000 0004"),
        expiry_date: "11/28".to_string(),
        cvv: SecretString::from("321"),
        card_name: String::new(),
    }
}

fn filled_cart(persistence: PersistenceAdapter) -> TestResult<CartStore> {
    let cart = CartStore::load(persistence);
    cart.add_item(&seed_product(1)?, 1);
    cart.add_item(&seed_product(9)?, 2);
    Ok(cart)
}

fn orchestrator(
    base: &Url,
    cart: CartStore,
) -> TestResult<CheckoutOrchestrator<HttpOrderService>> {
    Ok(CheckoutOrchestrator::new(cart, HttpOrderService::new(base, None)?))
}

#[tokio::test]
async fn test_successful_checkout_places_order_and_clears_cart() -> TestResult {
    let server = TestServer::start().await?;
    let persistence = PersistenceAdapter::in_memory();
    let cart = filled_cart(persistence.clone())?;
    let checkout = orchestrator(&server.api_base()?, cart.clone())?;

    let outcome = checkout.submit(&form()).await;
    let SubmitOutcome::Succeeded { order_id } = outcome else {
        panic!("expected success, got {outcome:?}");
    };

    assert!(cart.items().is_empty());
    let snapshot: Vec<Value> = persistence.load(CART_NAMESPACE).unwrap();
    assert!(snapshot.is_empty());
    assert_eq!(
        checkout.history(),
        vec![
            CheckoutPhase::Idle,
            CheckoutPhase::Validating,
            CheckoutPhase::Submitting,
            CheckoutPhase::Succeeded {
                order_id: order_id.clone()
            },
        ]
    );

    // 299.99 + 2 × 129.99 = 559.97; free shipping; 8% tax = 44.80
    let order: OrderRecord = reqwest::get(server.url(&format!("/api/orders/{order_id}")))
        .await?
        .json()
        .await?;
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.totals.subtotal.amount(), dec!(559.97));
    assert_eq!(order.totals.shipping.amount(), dec!(0));
    assert_eq!(order.totals.tax.amount(), dec!(44.80));
    assert_eq!(order.totals.total.amount(), dec!(604.77));
    Ok(())
}

#[tokio::test]
async fn test_invalid_form_never_reaches_the_service() -> TestResult {
    let port = closed_port().await?;
    let base = Url::parse(&format!("http://{port}/api/"))?;
    let cart = filled_cart(PersistenceAdapter::in_memory())?;
    let checkout = orchestrator(&base, cart.clone())?;

    let mut bad = form();
    bad.expiry_date = "13/28".to_string();
    let outcome = checkout.submit(&bad).await;

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation errors, got {outcome:?}");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(checkout.phase(), CheckoutPhase::Idle);
    assert_eq!(cart.items().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_rejected_order_surfaces_service_message() -> TestResult {
    let service = TestServer::serve(Router::new().route(
        "/api/orders",
        post(|| async {
            (
                StatusCode::PAYMENT_REQUIRED,
                Json(json!({ "message": "Card declined" })),
            )
        }),
    ))
    .await?;
    let cart = filled_cart(PersistenceAdapter::in_memory())?;
    let checkout = orchestrator(&service.api_base()?, cart.clone())?;

    let outcome = checkout.submit(&form()).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Failed {
            message: "Card declined".to_string()
        }
    );
    assert_eq!(cart.items().len(), 2);
    assert_eq!(checkout.phase(), CheckoutPhase::Idle);
    Ok(())
}

#[tokio::test]
async fn test_rejection_without_message_uses_generic_text() -> TestResult {
    let service = TestServer::serve(Router::new().route(
        "/api/orders",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await?;
    let checkout = orchestrator(
        &service.api_base()?,
        filled_cart(PersistenceAdapter::in_memory())?,
    )?;

    let outcome = checkout.submit(&form()).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Failed {
            message: ORDER_FAILED_MESSAGE.to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() -> TestResult {
    let port = closed_port().await?;
    let base = Url::parse(&format!("http://{port}/api/"))?;
    let cart = filled_cart(PersistenceAdapter::in_memory())?;
    let checkout = orchestrator(&base, cart.clone())?;

    let outcome = checkout.submit(&form()).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Failed {
            message: NETWORK_ERROR_MESSAGE.to_string()
        }
    );
    assert_eq!(cart.items().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_slow_service_times_out() -> TestResult {
    let service = TestServer::serve(Router::new().route(
        "/api/orders",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::CREATED
        }),
    ))
    .await?;
    let cart = filled_cart(PersistenceAdapter::in_memory())?;
    let checkout =
        orchestrator(&service.api_base()?, cart.clone())?.with_timeout(Duration::from_millis(200));

    let outcome = checkout.submit(&form()).await;
    assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
    assert_eq!(cart.items().len(), 2);
    assert_eq!(checkout.phase(), CheckoutPhase::Idle);
    Ok(())
}

#[tokio::test]
async fn test_token_is_sent_as_bearer() -> TestResult {
    let service = TestServer::serve(Router::new().route(
        "/api/orders",
        post(|headers: axum::http::HeaderMap| async move {
            match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
                Some("Bearer s3cr3t-order-token") => (
                    StatusCode::CREATED,
                    Json(json!({ "orderId": "ord-42", "status": "pending" })),
                ),
                _ => (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "message": "Unauthorized" })),
                ),
            }
        }),
    ))
    .await?;
    let token = SecretString::from("s3cr3t-order-token");
    let client = HttpOrderService::new(&service.api_base()?, Some(&token))?;
    let checkout =
        CheckoutOrchestrator::new(filled_cart(PersistenceAdapter::in_memory())?, client);

    let outcome = checkout.submit(&form()).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Succeeded {
            order_id: "ord-42".to_string()
        }
    );
    Ok(())
}
