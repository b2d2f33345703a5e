//! Membership application entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::membership_application::CorporateDetails;
use domain::models::{MembershipApplication, MembershipStatus};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Every column of membership_applications, in row order.
pub const MEMBERSHIP_COLUMNS: &str = "
    id, full_name, phone, id_number, email, county, sub_county, ward, diaspora_country,
    mpesa_code, payment_reference, payment_gateway, amount_paid, membership_tier,
    status, notes, email_sent, email_sent_at, church_name, title, title_other,
    referral_name, referral_apeck_number, referral_phone, signature, declaration_date,
    organization_name, organization_registration_number, organization_kra_pin,
    headquarters_location, organization_email, organization_phone, chairperson_name,
    chairperson_id_number, chairperson_kra_pin, chairperson_phone, chairperson_email,
    secretary_name, secretary_id_number, secretary_kra_pin, secretary_phone,
    secretary_email, treasurer_name, treasurer_id_number, treasurer_kra_pin,
    treasurer_phone, treasurer_email, created_at, updated_at
";

/// Database row mapping for the membership_applications table.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipApplicationEntity {
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
    pub status: String,
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
    pub organization_name: Option<String>,
    pub organization_registration_number: Option<String>,
    pub organization_kra_pin: Option<String>,
    pub headquarters_location: Option<String>,
    pub organization_email: Option<String>,
    pub organization_phone: Option<String>,
    pub chairperson_name: Option<String>,
    pub chairperson_id_number: Option<String>,
    pub chairperson_kra_pin: Option<String>,
    pub chairperson_phone: Option<String>,
    pub chairperson_email: Option<String>,
    pub secretary_name: Option<String>,
    pub secretary_id_number: Option<String>,
    pub secretary_kra_pin: Option<String>,
    pub secretary_phone: Option<String>,
    pub secretary_email: Option<String>,
    pub treasurer_name: Option<String>,
    pub treasurer_id_number: Option<String>,
    pub treasurer_kra_pin: Option<String>,
    pub treasurer_phone: Option<String>,
    pub treasurer_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MembershipApplicationEntity> for MembershipApplication {
    fn from(entity: MembershipApplicationEntity) -> Self {
        Self {
            id: entity.id,
            full_name: entity.full_name,
            phone: entity.phone,
            id_number: entity.id_number,
            email: entity.email,
            county: entity.county,
            sub_county: entity.sub_county,
            ward: entity.ward,
            diaspora_country: entity.diaspora_country,
            mpesa_code: entity.mpesa_code,
            payment_reference: entity.payment_reference,
            payment_gateway: entity.payment_gateway,
            amount_paid: entity.amount_paid,
            membership_tier: entity.membership_tier,
            status: MembershipStatus::from_str(&entity.status).unwrap_or(MembershipStatus::Pending),
            notes: entity.notes,
            email_sent: entity.email_sent,
            email_sent_at: entity.email_sent_at,
            church_name: entity.church_name,
            title: entity.title,
            title_other: entity.title_other,
            referral_name: entity.referral_name,
            referral_apeck_number: entity.referral_apeck_number,
            referral_phone: entity.referral_phone,
            signature: entity.signature,
            declaration_date: entity.declaration_date,
            corporate: CorporateDetails {
                organization_name: entity.organization_name,
                organization_registration_number: entity.organization_registration_number,
                organization_kra_pin: entity.organization_kra_pin,
                headquarters_location: entity.headquarters_location,
                organization_email: entity.organization_email,
                organization_phone: entity.organization_phone,
                chairperson_name: entity.chairperson_name,
                chairperson_id_number: entity.chairperson_id_number,
                chairperson_kra_pin: entity.chairperson_kra_pin,
                chairperson_phone: entity.chairperson_phone,
                chairperson_email: entity.chairperson_email,
                secretary_name: entity.secretary_name,
                secretary_id_number: entity.secretary_id_number,
                secretary_kra_pin: entity.secretary_kra_pin,
                secretary_phone: entity.secretary_phone,
                secretary_email: entity.secretary_email,
                treasurer_name: entity.treasurer_name,
                treasurer_id_number: entity.treasurer_id_number,
                treasurer_kra_pin: entity.treasurer_kra_pin,
                treasurer_phone: entity.treasurer_phone,
                treasurer_email: entity.treasurer_email,
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
