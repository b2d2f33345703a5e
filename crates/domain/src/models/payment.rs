//! Online checkout through Pesapal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Largest amount a NUMERIC(12,2) column holds: 9,999,999,999.99.
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// Not negative, no larger than [`max_amount`] and at most two decimal places.
pub fn check_amount(amount: Decimal, label: &str) -> Result<(), String> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(format!("{} must be at least 0", label));
    }
    if amount > max_amount() {
        return Err(format!("{} must be at most {}", label, max_amount()));
    }
    if amount.normalize().scale() > 2 {
        return Err(format!("{} must have at most 2 decimal places", label));
    }
    Ok(())
}

/// Starts a hosted checkout for a membership fee or donation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InitializePaymentRequest {
    pub amount: Decimal,

    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Description must be 1-100 characters"))]
    pub description: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 40, message = "Phone must be at most 40 characters"))]
    pub phone: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    /// Merchant reference, unique per order.
    #[validate(length(min = 1, max = 50, message = "Reference must be 1-50 characters"))]
    pub reference: String,

    #[validate(url(message = "Callback URL must be a valid URL"))]
    pub callback_url: Option<String>,
}

impl InitializePaymentRequest {
    pub fn validate_amount(&self) -> Result<(), String> {
        check_amount(self.amount, "Amount")?;
        if self.amount.is_zero() {
            return Err("Amount must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Upper-cased currency, KES when none was sent.
    pub fn currency_code(&self) -> String {
        self.currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
    }
}

pub const DEFAULT_CURRENCY: &str = "KES";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializePaymentResponse {
    pub success: bool,
    pub redirect_url: String,
    pub order_tracking_id: String,
    pub merchant_reference: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentStatusQuery {
    #[serde(rename = "orderTrackingId")]
    pub order_tracking_id: Option<String>,
}

/// Transaction status as Pesapal reports it.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatusResponse {
    pub success: bool,
    pub status: Value,
}

/// Query Pesapal appends to the registered notification URL.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentNotificationQuery {
    #[serde(rename = "OrderTrackingId")]
    pub order_tracking_id: Option<String>,

    #[serde(rename = "OrderMerchantReference")]
    pub merchant_reference: Option<String>,

    #[serde(rename = "OrderNotificationType")]
    pub notification_type: Option<String>,
}
