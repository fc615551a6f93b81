//! Order Service wire types.

use satwa_core::CartLineItem;
use serde::{Deserialize, Serialize};

use crate::pricing::TotalsBreakdown;

/// Where to ship, as entered on the form (trimmed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Card network, from the leading digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Unknown,
}

impl CardBrand {
    /// Detect the brand from a digits-only card number.
    #[must_use]
    pub fn detect(digits: &str) -> Self {
        let prefix2 = digits.get(..2).and_then(|p| p.parse::<u8>().ok());
        match (digits.as_bytes().first(), prefix2) {
            (Some(b'4'), _) => Self::Visa,
            (_, Some(51..=55)) => Self::Mastercard,
            (_, Some(34 | 37)) => Self::Amex,
            _ => Self::Unknown,
        }
    }
}

/// Card data that is safe to send and log. Never contains the full number or CVV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedPayment {
    pub brand: CardBrand,
    pub last4: String,
    pub expiry_date: String,
    pub cardholder_name: String,
}

/// Body of `POST {base}/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub items: Vec<CartLineItem>,
    pub shipping: ShippingDetails,
    pub payment: SanitizedPayment,
    pub totals: TotalsBreakdown,
}

/// Successful Order Service answer. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
