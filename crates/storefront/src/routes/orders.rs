//! Mock Order Service handlers.
//!
//! Orders are validated, priced from their lines with the configured
//! [`PricingRules`](crate::pricing::PricingRules), and kept in memory for the
//! life of the process.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use satwa_core::CartLineItem;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::checkout::{SanitizedPayment, ShippingDetails};
use crate::error::{AppError, Result};
use crate::pricing::TotalsBreakdown;
use crate::state::AppState;

/// Incoming order. Only `items` is required by the mock.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<CartLineItem>,
    #[serde(default)]
    pub shipping: Option<ShippingDetails>,
    #[serde(default)]
    pub payment: Option<SanitizedPayment>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<CartLineItem>,
    pub totals: TotalsBreakdown,
}

/// Place an order.
///
/// POST /api/orders
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderRecord>)> {
    let Json(request) = payload?;

    if request.items.is_empty() {
        return Err(AppError::BadRequest(
            "Order must contain at least one item".to_string(),
        ));
    }
    if let Some(line) = request
        .items
        .iter()
        .find(|l| l.quantity == 0 || l.price.is_negative())
    {
        return Err(AppError::BadRequest(format!(
            "Invalid line for product {}",
            line.product_id
        )));
    }

    let totals = state
        .config()
        .pricing
        .checked_totals(&request.items)
        .ok_or_else(|| AppError::BadRequest("Order total is out of range".to_string()))?;

    let order = OrderRecord {
        order_id: Uuid::new_v4(),
        status: "pending".to_string(),
        created_at: Utc::now(),
        totals,
        items: request.items,
    };

    tracing::info!(
        order_id = %order.order_id,
        lines = order.items.len(),
        total = %order.totals.total,
        card = ?request.payment.as_ref().map(|p| p.brand),
        has_shipping = request.shipping.is_some(),
        "Order received"
    );

    state.insert_order(order.clone());
    Ok((StatusCode::CREATED, Json(order)))
}

/// Look up an order.
///
/// GET /api/orders/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<OrderRecord>> {
    let order_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest(format!("Invalid order id: {id}")))?;
    state
        .order(order_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}
