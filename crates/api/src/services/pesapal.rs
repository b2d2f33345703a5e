//! Pesapal v3 API client.
//!
//! Every call needs a bearer token from `RequestToken`; tokens live five
//! minutes and are reused until shortly before that. Orders must name a
//! registered notification (IPN) URL, registered once per URL per process.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::PesapalConfig;
use crate::error::ApiError;
use crate::middleware::metrics::record_pesapal_call;

/// Reuse window for an access token.
const TOKEN_TTL: Duration = Duration::from_secs(240);

#[derive(Debug, Error)]
pub enum PesapalError {
    #[error("Pesapal is not enabled")]
    NotEnabled,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Pesapal API error: {0}")]
    Api(String),
}

impl From<PesapalError> for ApiError {
    fn from(err: PesapalError) -> Self {
        match err {
            PesapalError::NotEnabled => {
                ApiError::ServiceUnavailable("Online payments are not available".to_string())
            }
            PesapalError::Http(e) => {
                warn!(error = %e, "Pesapal unreachable");
                ApiError::ServiceUnavailable("Payment provider unreachable".to_string())
            }
            PesapalError::Api(message) => {
                warn!(error = %message, "Pesapal rejected request");
                ApiError::ServiceUnavailable(format!("Payment provider error: {}", message))
            }
        }
    }
}

/// Body of `SubmitOrderRequest`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub id: String,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub callback_url: String,
    pub redirect_mode: &'static str,
    pub notification_id: String,
    pub billing_address: BillingAddress,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillingAddress {
    pub email_address: String,
    pub phone_number: String,
    pub country_code: &'static str,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    pub order_tracking_id: String,
    pub merchant_reference: String,
    pub redirect_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct IpnResponse {
    ipn_id: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawOrderResponse {
    order_tracking_id: Option<String>,
    merchant_reference: Option<String>,
    redirect_url: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Pesapal answers HTTP 200 with an `error` member on failures. Status
/// payloads carry an `error` object of nulls when all is well.
fn upstream_error(error: &Option<Value>) -> Option<String> {
    match error {
        Some(Value::Object(map)) => ["message", "code", "error_type"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str).filter(|t| !t.is_empty()))
            .map(str::to_string),
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

pub struct PesapalService {
    client: Client,
    config: PesapalConfig,
    token: Mutex<Option<CachedToken>>,
    /// Notification URL -> ipn_id
    ipn_ids: Mutex<HashMap<String, String>>,
}

impl std::fmt::Debug for PesapalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PesapalService")
            .field("api_base", &self.config.api_base())
            .finish()
    }
}

impl PesapalService {
    pub fn new(config: PesapalConfig) -> Result<Self, PesapalError> {
        if !config.enabled {
            return Err(PesapalError::NotEnabled);
        }
        if config.consumer_key.is_empty() || config.consumer_secret.is_empty() {
            warn!("Pesapal credentials not configured");
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            config,
            token: Mutex::new(None),
            ipn_ids: Mutex::new(HashMap::new()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base(), path)
    }

    /// Send, require a 2xx and decode the body.
    async fn call<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, PesapalError> {
        let result: Result<T, PesapalError> = async {
            let response = request.header("Accept", "application/json").send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(PesapalError::Api(format!("{} returned {}: {}", operation, status, body)));
            }
            Ok(response.json::<T>().await?)
        }
        .await;

        record_pesapal_call(operation, if result.is_ok() { "ok" } else { "failed" });
        result
    }

    async fn access_token(&self) -> Result<String, PesapalError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.token.clone());
            }
        }

        let body = serde_json::json!({
            "consumer_key": self.config.consumer_key,
            "consumer_secret": self.config.consumer_secret,
        });
        let response: TokenResponse = self
            .call(
                "request_token",
                self.client.post(self.url("/api/Auth/RequestToken")).json(&body),
            )
            .await?;

        if let Some(message) = upstream_error(&response.error) {
            return Err(PesapalError::Api(message));
        }
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PesapalError::Api("No access token in response".to_string()))?;

        *cached = Some(CachedToken {
            token: token.clone(),
            expires_at: Instant::now() + TOKEN_TTL,
        });
        debug!("Pesapal access token refreshed");
        Ok(token)
    }

    /// The ipn_id for `ipn_url`, registering it on first use.
    pub async fn ipn_id(&self, ipn_url: &str) -> Result<String, PesapalError> {
        let mut ids = self.ipn_ids.lock().await;
        if let Some(id) = ids.get(ipn_url) {
            return Ok(id.clone());
        }

        let token = self.access_token().await?;
        let body = serde_json::json!({ "url": ipn_url, "ipn_notification_type": "GET" });
        let response: IpnResponse = self
            .call(
                "register_ipn",
                self.client
                    .post(self.url("/api/URLSetup/RegisterIPN"))
                    .bearer_auth(&token)
                    .json(&body),
            )
            .await?;

        if let Some(message) = upstream_error(&response.error) {
            return Err(PesapalError::Api(message));
        }
        let id = response
            .ipn_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PesapalError::Api("No ipn_id in response".to_string()))?;

        info!(ipn_url = %ipn_url, ipn_id = %id, "Pesapal IPN registered");
        ids.insert(ipn_url.to_string(), id.clone());
        Ok(id)
    }

    pub async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse, PesapalError> {
        let token = self.access_token().await?;
        let response: RawOrderResponse = self
            .call(
                "submit_order",
                self.client
                    .post(self.url("/api/Transactions/SubmitOrderRequest"))
                    .bearer_auth(&token)
                    .json(order),
            )
            .await?;

        if let Some(message) = upstream_error(&response.error) {
            return Err(PesapalError::Api(message));
        }
        match (
            response.order_tracking_id,
            response.merchant_reference,
            response.redirect_url,
        ) {
            (Some(order_tracking_id), Some(merchant_reference), Some(redirect_url)) => {
                Ok(OrderResponse {
                    order_tracking_id,
                    merchant_reference,
                    redirect_url,
                })
            }
            _ => Err(PesapalError::Api("Incomplete order response".to_string())),
        }
    }

    /// Raw `GetTransactionStatus` payload.
    pub async fn transaction_status(&self, order_tracking_id: &str) -> Result<Value, PesapalError> {
        let token = self.access_token().await?;
        let status: Value = self
            .call(
                "transaction_status",
                self.client
                    .get(self.url("/api/Transactions/GetTransactionStatus"))
                    .query(&[("orderTrackingId", order_tracking_id)])
                    .bearer_auth(&token),
            )
            .await?;

        let error = status.get("error").cloned();
        if let Some(message) = upstream_error(&error) {
            return Err(PesapalError::Api(message));
        }
        Ok(status)
    }
}
