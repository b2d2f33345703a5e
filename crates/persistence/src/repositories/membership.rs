//! Membership application repository.

use chrono::{DateTime, Utc};
use domain::models::membership_application::NewMembershipApplication;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{MembershipApplicationEntity, MEMBERSHIP_COLUMNS};
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// First application whose payment reference matches any of `references`.
    pub async fn find_by_payment_references(
        &self,
        references: &[String],
    ) -> Result<Option<MembershipApplicationEntity>, sqlx::Error> {
        if references.is_empty() {
            return Ok(None);
        }
        let timer = QueryTimer::new("find_membership_by_payment_reference");
        let result = sqlx::query_as::<_, MembershipApplicationEntity>(&format!(
            r#"
            SELECT {} FROM membership_applications
            WHERE payment_reference = ANY($1)
            ORDER BY created_at
            LIMIT 1
            "#,
            MEMBERSHIP_COLUMNS
        ))
        .bind(references)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Insert a new pending application.
    pub async fn create(
        &self,
        app: &NewMembershipApplication,
    ) -> Result<MembershipApplicationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_membership_application");
        let result = sqlx::query_as::<_, MembershipApplicationEntity>(&format!(
            r#"
            INSERT INTO membership_applications (
                full_name, phone, id_number, email, county, sub_county, ward,
                diaspora_country, mpesa_code, payment_reference, payment_gateway,
                amount_paid, membership_tier, church_name, title, title_other,
                referral_name, referral_apeck_number, referral_phone, signature,
                declaration_date, organization_name,
                organization_registration_number, organization_kra_pin,
                headquarters_location, organization_email, organization_phone,
                chairperson_name, chairperson_id_number, chairperson_kra_pin,
                chairperson_phone, chairperson_email, secretary_name,
                secretary_id_number, secretary_kra_pin, secretary_phone,
                secretary_email, treasurer_name, treasurer_id_number,
                treasurer_kra_pin, treasurer_phone, treasurer_email
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28,
                $29, $30, $31, $32, $33, $34, $35, $36, $37, $38, $39, $40, $41, $42
            )
            RETURNING {}
            "#,
            MEMBERSHIP_COLUMNS
        ))
        .bind(&app.full_name)
        .bind(&app.phone)
        .bind(&app.id_number)
        .bind(&app.email)
        .bind(&app.county)
        .bind(&app.sub_county)
        .bind(&app.ward)
        .bind(&app.diaspora_country)
        .bind(&app.mpesa_code)
        .bind(&app.payment_reference)
        .bind(&app.payment_gateway)
        .bind(&app.amount_paid)
        .bind(&app.membership_tier)
        .bind(&app.church_name)
        .bind(&app.title)
        .bind(&app.title_other)
        .bind(&app.referral_name)
        .bind(&app.referral_apeck_number)
        .bind(&app.referral_phone)
        .bind(&app.signature)
        .bind(&app.declaration_date)
        .bind(&app.corporate.organization_name)
        .bind(&app.corporate.organization_registration_number)
        .bind(&app.corporate.organization_kra_pin)
        .bind(&app.corporate.headquarters_location)
        .bind(&app.corporate.organization_email)
        .bind(&app.corporate.organization_phone)
        .bind(&app.corporate.chairperson_name)
        .bind(&app.corporate.chairperson_id_number)
        .bind(&app.corporate.chairperson_kra_pin)
        .bind(&app.corporate.chairperson_phone)
        .bind(&app.corporate.chairperson_email)
        .bind(&app.corporate.secretary_name)
        .bind(&app.corporate.secretary_id_number)
        .bind(&app.corporate.secretary_kra_pin)
        .bind(&app.corporate.secretary_phone)
        .bind(&app.corporate.secretary_email)
        .bind(&app.corporate.treasurer_name)
        .bind(&app.corporate.treasurer_id_number)
        .bind(&app.corporate.treasurer_kra_pin)
        .bind(&app.corporate.treasurer_phone)
        .bind(&app.corporate.treasurer_email)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Applications newest first, optionally filtered by status.
    pub async fn list(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<MembershipApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_membership_applications");
        let result = sqlx::query_as::<_, MembershipApplicationEntity>(&format!(
            r#"
            SELECT {} FROM membership_applications
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
            MEMBERSHIP_COLUMNS
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<MembershipApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_membership_application");
        let result = sqlx::query_as::<_, MembershipApplicationEntity>(&format!(
            "SELECT {} FROM membership_applications WHERE id = $1",
            MEMBERSHIP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Set the review status. Notes are kept when `notes` is `None`.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: &str,
        notes: Option<&str>,
    ) -> Result<Option<MembershipApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_membership_status");
        let result = sqlx::query_as::<_, MembershipApplicationEntity>(&format!(
            r#"
            UPDATE membership_applications
            SET status = $2, notes = COALESCE($3, notes)
            WHERE id = $1
            RETURNING {}
            "#,
            MEMBERSHIP_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Record that both notification emails went out.
    pub async fn mark_email_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("mark_membership_email_sent");
        let result = sqlx::query(
            "UPDATE membership_applications SET email_sent = true, email_sent_at = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(sent_at)
        .execute(&self.pool)
        .await
        .map(|_| ());
        timer.finish(result)
    }
}
