//! Pesapal hosted checkout (public).

use axum::{
    extract::{Query, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use domain::models::payment::{
    InitializePaymentRequest, InitializePaymentResponse, PaymentNotificationQuery,
    PaymentStatusQuery, PaymentStatusResponse,
};
use domain::models::SuccessResponse;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidJson;
use crate::middleware::rate_limit_middleware;
use crate::services::pesapal::{BillingAddress, OrderRequest};
use crate::services::{PesapalError, PesapalService};

const MISSING_TRACKING_ID: &str = "Order tracking ID is required";

/// Mounted at `/api/payments/pesapal`. Only order creation is rate-limited.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/initialize", post(initialize_payment))
        .route_layer(middleware::from_fn_with_state(state, rate_limit_middleware))
        .route("/status", get(payment_status))
        .route("/ipn", get(payment_notification))
}

fn pesapal(state: &AppState) -> Result<&PesapalService, ApiError> {
    state
        .pesapal
        .as_deref()
        .ok_or_else(|| ApiError::from(PesapalError::NotEnabled))
}

fn tracking_id(raw: Option<&str>) -> Result<&str, ApiError> {
    raw.map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation(MISSING_TRACKING_ID.to_string()))
}

fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// POST /api/payments/pesapal/initialize
///
/// Submits the order and returns the checkout URL to redirect the payer to.
pub async fn initialize_payment(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<InitializePaymentRequest>,
) -> Result<Json<InitializePaymentResponse>, ApiError> {
    request.validate_amount().map_err(ApiError::Validation)?;
    let pesapal = pesapal(&state)?;

    let server = &state.config.server;
    let ipn_url = format!(
        "{}/api/payments/pesapal/ipn",
        server.app_url.trim_end_matches('/')
    );
    let callback_url = request.callback_url.clone().unwrap_or_else(|| {
        format!(
            "{}/membership?payment=success",
            server.frontend_url.trim_end_matches('/')
        )
    });

    let notification_id = pesapal.ipn_id(&ipn_url).await?;
    let order = OrderRequest {
        id: request.reference.trim().to_string(),
        currency: request.currency_code(),
        amount: request.amount,
        description: request.description.trim().to_string(),
        callback_url,
        redirect_mode: "PARENT_WINDOW",
        notification_id,
        billing_address: BillingAddress {
            email_address: request.email.trim().to_string(),
            phone_number: trimmed(request.phone.as_deref()),
            country_code: "KE",
            first_name: trimmed(request.first_name.as_deref()),
            last_name: trimmed(request.last_name.as_deref()),
        },
    };

    let response = pesapal.submit_order(&order).await?;
    info!(
        merchant_reference = %response.merchant_reference,
        order_tracking_id = %response.order_tracking_id,
        "Pesapal order submitted"
    );

    Ok(Json(InitializePaymentResponse {
        success: true,
        redirect_url: response.redirect_url,
        order_tracking_id: response.order_tracking_id,
        merchant_reference: response.merchant_reference,
    }))
}

/// GET /api/payments/pesapal/status?orderTrackingId=...
pub async fn payment_status(
    State(state): State<AppState>,
    Query(query): Query<PaymentStatusQuery>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    let order_tracking_id = tracking_id(query.order_tracking_id.as_deref())?;
    let status = pesapal(&state)?
        .transaction_status(order_tracking_id)
        .await?;
    Ok(Json(PaymentStatusResponse {
        success: true,
        status,
    }))
}

/// GET /api/payments/pesapal/ipn
///
/// Pesapal calls this when a transaction changes. The current status is
/// fetched and logged.
pub async fn payment_notification(
    State(state): State<AppState>,
    Query(query): Query<PaymentNotificationQuery>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let order_tracking_id = tracking_id(query.order_tracking_id.as_deref())?;
    let status = pesapal(&state)?
        .transaction_status(order_tracking_id)
        .await?;

    info!(
        order_tracking_id = %order_tracking_id,
        merchant_reference = query.merchant_reference.as_deref().unwrap_or(""),
        notification_type = query.notification_type.as_deref().unwrap_or(""),
        payment_status = status
            .get("payment_status_description")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown"),
        "Pesapal notification received"
    );
    Ok(Json(SuccessResponse::with_message("IPN received")))
}
