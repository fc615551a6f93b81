//! Order Service client.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use super::order::{OrderConfirmation, OrderPayload};

/// Shown when the service gives no usable message.
pub const ORDER_FAILED_MESSAGE: &str = "Order failed. Please try again.";

/// Shown for transport and decoding failures.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum OrderServiceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-2xx status.
    #[error("Order service error: {status} - {message}")]
    Service { status: u16, message: String },

    /// No answer within the checkout timeout.
    #[error("Order service did not respond within {0:?}")]
    Timeout(Duration),

    /// 2xx answer that is not an order confirmation.
    #[error("Invalid order confirmation: {0}")]
    Decode(String),

    /// Base URL or token cannot be used to build requests.
    #[error("Invalid order service configuration: {0}")]
    Config(String),
}

impl OrderServiceError {
    /// Message suitable for showing to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Service { message, .. } => message.clone(),
            Self::Timeout(_) => {
                "The order service did not respond in time. Please try again.".to_string()
            }
            Self::Http(_) | Self::Decode(_) | Self::Config(_) => NETWORK_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Something that accepts orders.
pub trait OrderService: Send + Sync {
    /// Place an order.
    fn submit_order(
        &self,
        payload: &OrderPayload,
    ) -> impl Future<Output = Result<OrderConfirmation, OrderServiceError>> + Send;
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// JSON-over-HTTP Order Service at `{base}/orders`.
#[derive(Debug, Clone)]
pub struct HttpOrderService {
    client: reqwest::Client,
    orders_url: Url,
}

impl HttpOrderService {
    /// Create a client for the service rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns error if the URL cannot be joined, the token is not a valid
    /// header value, or the HTTP client fails to build.
    pub fn new(base: &Url, token: Option<&SecretString>) -> Result<Self, OrderServiceError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let orders_url = base
            .join("orders")
            .map_err(|e| OrderServiceError::Config(format!("Invalid base URL: {e}")))?;

        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| OrderServiceError::Config(format!("Invalid token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, orders_url })
    }

    /// Endpoint orders are posted to.
    #[must_use]
    pub const fn orders_url(&self) -> &Url {
        &self.orders_url
    }
}

impl OrderService for HttpOrderService {
    async fn submit_order(
        &self,
        payload: &OrderPayload,
    ) -> Result<OrderConfirmation, OrderServiceError> {
        let response = self
            .client
            .post(self.orders_url.clone())
            .json(payload)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| ORDER_FAILED_MESSAGE.to_string());
            tracing::warn!(status = status.as_u16(), %message, "Order rejected");
            return Err(OrderServiceError::Service {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<OrderConfirmation>()
            .await
            .map_err(|e| OrderServiceError::Decode(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_url_with_and_without_trailing_slash() {
        let with = Url::parse("http://127.0.0.1:5000/api/").unwrap();
        let without = Url::parse("http://127.0.0.1:5000/api").unwrap();
        for base in [with, without] {
            let service = HttpOrderService::new(&base, None).unwrap();
            assert_eq!(
                service.orders_url().as_str(),
                "http://127.0.0.1:5000/api/orders"
            );
        }
    }

    #[test]
    fn test_rejects_token_with_newline() {
        let base = Url::parse("http://127.0.0.1:5000/api/").unwrap();
        let token = SecretString::from("abc\ndef");
        assert!(matches!(
            HttpOrderService::new(&base, Some(&token)),
            Err(OrderServiceError::Config(_))
        ));
    }

    #[test]
    fn test_user_messages() {
        let service = OrderServiceError::Service {
            status: 402,
            message: "Card declined".to_string(),
        };
        assert_eq!(service.user_message(), "Card declined");
        assert_eq!(
            OrderServiceError::Decode("bad".to_string()).user_message(),
            NETWORK_ERROR_MESSAGE
        );
        assert!(
            OrderServiceError::Timeout(Duration::from_secs(15))
                .user_message()
                .contains("in time")
        );
    }
}
