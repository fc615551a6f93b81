//! Order, contact and newsletter endpoints over HTTP.

use reqwest::{Client, StatusCode};
use rust_decimal_macros::dec;
use satwa_integration_tests::{TestResult, TestServer};
use satwa_storefront::routes::orders::OrderRecord;
use serde_json::{Value, json};

async fn post(server: &TestServer, path: &str, body: &Value) -> TestResult<(StatusCode, Value)> {
    let response = Client::new().post(server.url(path)).json(body).send().await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

#[tokio::test]
async fn test_order_is_priced_and_stored() -> TestResult {
    let server = TestServer::start().await?;
    let (status, body) = post(
        &server,
        "/api/orders",
        &json!({
            "items": [{
                "productId": 11,
                "name": "Hoop Earrings",
                "price": 20,
                "image": "",
                "quantity": 3
            }]
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);
    let order: OrderRecord = serde_json::from_value(body)?;
    assert_eq!(order.status, "pending");
    assert_eq!(order.totals.subtotal.amount(), dec!(60));
    assert_eq!(order.totals.shipping.amount(), dec!(10));
    assert_eq!(order.totals.tax.amount(), dec!(4.80));
    assert_eq!(order.totals.total.amount(), dec!(74.80));

    let stored: OrderRecord = reqwest::get(server.url(&format!("/api/orders/{}", order.order_id)))
        .await?
        .json()
        .await?;
    assert_eq!(stored, order);
    Ok(())
}

#[tokio::test]
async fn test_bad_orders_are_400() -> TestResult {
    let server = TestServer::start().await?;

    let (status, body) = post(&server, "/api/orders", &json!({ "items": [] })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order must contain at least one item");

    let (status, _) = post(
        &server,
        "/api/orders",
        &json!({ "items": [{ "productId": 1, "name": "x", "price": 1, "image": "", "quantity": 0 }] }),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&server, "/api/orders", &json!({ "items": "nope" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_unknown_order_lookup() -> TestResult {
    let server = TestServer::start().await?;
    let missing = reqwest::get(server.url(
        "/api/orders/00000000-0000-4000-8000-000000000000",
    ))
    .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let malformed = reqwest::get(server.url("/api/orders/not-a-uuid")).await?;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_contact_form() -> TestResult {
    let server = TestServer::start().await?;

    let (status, body) = post(
        &server,
        "/api/contact",
        &json!({
            "name": "Asha",
            "email": "asha@example.com",
            "subject": "Sizing",
            "message": "Do you resize rings?"
        }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Message sent successfully");

    let (status, body) = post(
        &server,
        "/api/contact",
        &json!({ "name": "Asha", "email": "not-an-email", "message": "hi" }),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please enter a valid email address.");
    Ok(())
}

#[tokio::test]
async fn test_newsletter_subscription() -> TestResult {
    let server = TestServer::start().await?;

    let (status, body) = post(&server, "/api/newsletter", &json!({ "email": "asha@example.com" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully subscribed to newsletter");

    let (status, _) = post(&server, "/api/newsletter", &json!({ "email": "" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
