//! Membership applications and their review workflow.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::payment::check_amount;

/// Review status of an application.
///
/// Workflow: pending -> approved | rejected | completed, approved -> completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Pending => "pending",
            MembershipStatus::Approved => "approved",
            MembershipStatus::Rejected => "rejected",
            MembershipStatus::Completed => "completed",
        }
    }

    pub fn can_transition_to(&self, next: MembershipStatus) -> bool {
        use MembershipStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Pending, Completed) | (Approved, Completed)
        )
    }
}

impl FromStr for MembershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(MembershipStatus::Pending),
            "approved" => Ok(MembershipStatus::Approved),
            "rejected" => Ok(MembershipStatus::Rejected),
            "completed" => Ok(MembershipStatus::Completed),
            _ => Err(format!("Unknown membership status: {}", s)),
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored membership application.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipApplication {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub id_number: String,
    pub email: String,
    pub county: String,
    pub sub_county: Option<String>,
    pub ward: Option<String>,
    pub diaspora_country: Option<String>,
    pub mpesa_code: Option<String>,
    pub payment_reference: Option<String>,
    pub payment_gateway: String,
    pub amount_paid: Decimal,
    pub membership_tier: String,
    pub status: MembershipStatus,
    pub notes: Option<String>,
    pub email_sent: bool,
    pub email_sent_at: Option<DateTime<Utc>>,
    pub church_name: Option<String>,
    pub title: Option<String>,
    pub title_other: Option<String>,
    pub referral_name: Option<String>,
    pub referral_apeck_number: Option<String>,
    pub referral_phone: Option<String>,
    pub signature: Option<String>,
    pub declaration_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub corporate: CorporateDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Organization and officer details for corporate membership tiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct CorporateDetails {
    #[validate(length(max = 255))]
    pub organization_name: Option<String>,
    #[validate(length(max = 255))]
    pub organization_registration_number: Option<String>,
    #[validate(length(max = 255))]
    pub organization_kra_pin: Option<String>,
    #[validate(length(max = 255))]
    pub headquarters_location: Option<String>,
    #[validate(email(message = "Invalid organization email"))]
    pub organization_email: Option<String>,
    #[validate(length(max = 255))]
    pub organization_phone: Option<String>,

    #[validate(length(max = 255))]
    pub chairperson_name: Option<String>,
    #[validate(length(max = 255))]
    pub chairperson_id_number: Option<String>,
    #[validate(length(max = 255))]
    pub chairperson_kra_pin: Option<String>,
    #[validate(length(max = 255))]
    pub chairperson_phone: Option<String>,
    #[validate(email(message = "Invalid chairperson email"))]
    pub chairperson_email: Option<String>,

    #[validate(length(max = 255))]
    pub secretary_name: Option<String>,
    #[validate(length(max = 255))]
    pub secretary_id_number: Option<String>,
    #[validate(length(max = 255))]
    pub secretary_kra_pin: Option<String>,
    #[validate(length(max = 255))]
    pub secretary_phone: Option<String>,
    #[validate(email(message = "Invalid secretary email"))]
    pub secretary_email: Option<String>,

    #[validate(length(max = 255))]
    pub treasurer_name: Option<String>,
    #[validate(length(max = 255))]
    pub treasurer_id_number: Option<String>,
    #[validate(length(max = 255))]
    pub treasurer_kra_pin: Option<String>,
    #[validate(length(max = 255))]
    pub treasurer_phone: Option<String>,
    #[validate(email(message = "Invalid treasurer email"))]
    pub treasurer_email: Option<String>,
}

/// Public membership form submission.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMembershipApplicationRequest {
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, max = 50, message = "Phone is required"))]
    pub phone: String,

    #[validate(length(min = 1, max = 50, message = "ID number is required"))]
    pub id_number: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "County is required"))]
    pub county: String,

    #[validate(length(max = 100))]
    pub sub_county: Option<String>,
    #[validate(length(max = 100))]
    pub ward: Option<String>,
    #[validate(length(max = 100))]
    pub diaspora_country: Option<String>,

    #[validate(length(max = 100))]
    pub mpesa_code: Option<String>,
    #[validate(length(max = 255))]
    pub payment_reference: Option<String>,
    #[validate(length(max = 50))]
    pub payment_gateway: Option<String>,
    pub amount_paid: Option<Decimal>,

    #[validate(length(min = 1, max = 100, message = "Membership tier is required"))]
    pub membership_tier: String,

    #[validate(length(max = 255))]
    pub church_name: Option<String>,
    #[validate(length(max = 100))]
    pub title: Option<String>,
    #[validate(length(max = 100))]
    pub title_other: Option<String>,
    #[validate(length(max = 255))]
    pub referral_name: Option<String>,
    #[validate(length(max = 100))]
    pub referral_apeck_number: Option<String>,
    #[validate(length(max = 50))]
    pub referral_phone: Option<String>,
    #[validate(length(max = 255))]
    pub signature: Option<String>,
    #[validate(custom(function = "shared::validation::validate_iso_date"))]
    pub declaration_date: Option<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub corporate: CorporateDetails,
}

/// Treats empty strings from form posts as absent.
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl CreateMembershipApplicationRequest {
    /// Checks the amount separately from the derive rules. The column is
    /// NUMERIC(12,2), so anything it cannot hold is refused here.
    pub fn validate_amount(&self) -> Result<(), String> {
        match self.amount_paid {
            Some(amount) => check_amount(amount, "Amount paid"),
            None => Ok(()),
        }
    }

    /// References that identify an earlier submission of the same payment.
    pub fn duplicate_candidates(&self) -> Vec<String> {
        [non_empty(&self.payment_reference), non_empty(&self.mpesa_code)]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Resolves defaults and produces the row to insert.
    ///
    /// Payment reference: gateway reference, else M-Pesa code, else a
    /// generated `MPESA-<millis>`. Gateway: given, else `paystack` when a
    /// gateway reference exists, else `mpesa`.
    pub fn into_new_application(self, now: DateTime<Utc>) -> NewMembershipApplication {
        let payment_reference = non_empty(&self.payment_reference);
        let mpesa_code = non_empty(&self.mpesa_code);

        let payment_gateway = non_empty(&self.payment_gateway).unwrap_or_else(|| {
            if payment_reference.is_some() {
                "paystack".to_string()
            } else {
                "mpesa".to_string()
            }
        });
        let resolved_reference = payment_reference
            .clone()
            .or_else(|| mpesa_code.clone())
            .unwrap_or_else(|| format!("MPESA-{}", now.timestamp_millis()));

        NewMembershipApplication {
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            id_number: self.id_number.trim().to_string(),
            email: self.email.trim().to_string(),
            county: self.county.trim().to_string(),
            sub_county: non_empty(&self.sub_county),
            ward: non_empty(&self.ward),
            diaspora_country: non_empty(&self.diaspora_country),
            mpesa_code,
            payment_reference: resolved_reference,
            payment_gateway,
            amount_paid: self.amount_paid.unwrap_or(Decimal::ZERO),
            membership_tier: self.membership_tier.trim().to_string(),
            church_name: non_empty(&self.church_name),
            title: non_empty(&self.title),
            title_other: non_empty(&self.title_other),
            referral_name: non_empty(&self.referral_name),
            referral_apeck_number: non_empty(&self.referral_apeck_number),
            referral_phone: non_empty(&self.referral_phone),
            signature: non_empty(&self.signature),
            declaration_date: non_empty(&self.declaration_date)
                .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
            corporate: self.corporate,
        }
    }
}

/// Insert payload for a membership application, defaults already applied.
#[derive(Debug, Clone)]
pub struct NewMembershipApplication {
    pub full_name: String,
    pub phone: String,
    pub id_number: String,
    pub email: String,
    pub county: String,
    pub sub_county: Option<String>,
    pub ward: Option<String>,
    pub diaspora_country: Option<String>,
    pub mpesa_code: Option<String>,
    pub payment_reference: String,
    pub payment_gateway: String,
    pub amount_paid: Decimal,
    pub membership_tier: String,
    pub church_name: Option<String>,
    pub title: Option<String>,
    pub title_other: Option<String>,
    pub referral_name: Option<String>,
    pub referral_apeck_number: Option<String>,
    pub referral_phone: Option<String>,
    pub signature: Option<String>,
    pub declaration_date: Option<NaiveDate>,
    pub corporate: CorporateDetails,
}

/// Admin status change.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMembershipStatusRequest {
    pub status: MembershipStatus,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListApplicationsQuery {
    pub status: Option<String>,
}

impl ListApplicationsQuery {
    /// Unknown status values are ignored rather than rejected.
    pub fn status_filter(&self) -> Option<MembershipStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub application: MembershipApplication,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationListResponse {
    pub success: bool,
    pub applications: Vec<MembershipApplication>,
}

/// Formats an amount the way receipts show it, e.g. `KES 1,500` or `KES 2,000.5`.
/// Trailing fraction zeros are dropped.
pub fn format_kes(amount: Decimal) -> String {
    let normalized = amount.round_dp(2).normalize();
    let text = normalized.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if normalized.is_sign_negative() && !normalized.is_zero() {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(f) => format!("KES {}{}.{}", sign, grouped, f),
        None => format!("KES {}{}", sign, grouped),
    }
}
