//! Templated notification emails.
//!
//! Message builders are pure; the `notify_*` functions resolve recipients and send.

use chrono::Utc;
use domain::models::contact::ContactMessageRequest;
use domain::models::membership_application::format_kes;
use domain::models::password_reset::RESET_CODE_TTL_MINUTES;
use domain::models::{MembershipApplication, RecipientType};
use persistence::repositories::{EmailRecipientRepository, MembershipRepository};
use sqlx::PgPool;
use tracing::{info, warn};

use super::email::{escape_html, EmailMessage, EmailService};

const BRAND_COLOR: &str = "#8B2332";

/// Active recipients of `recipient_type`, or `fallback` when the list is empty.
pub async fn resolve_recipients(
    pool: &PgPool,
    recipient_type: RecipientType,
    fallback: &str,
) -> Vec<String> {
    let emails = match EmailRecipientRepository::new(pool.clone())
        .active_emails(recipient_type.as_str())
        .await
    {
        Ok(emails) => emails,
        Err(e) => {
            warn!(error = %e, recipient_type = %recipient_type, "Failed to load email recipients");
            Vec::new()
        }
    };

    if emails.is_empty() && !fallback.is_empty() {
        vec![fallback.to_string()]
    } else {
        emails
    }
}

/// Sends the admin alert and the applicant confirmation. Marks the
/// application as emailed only when both were delivered.
pub async fn notify_membership_submission(
    pool: PgPool,
    email: &EmailService,
    application: &MembershipApplication,
) -> bool {
    let recipients = resolve_recipients(
        &pool,
        RecipientType::Membership,
        &email.config().membership_email,
    )
    .await;

    let admin_sent = email
        .send_logged("membership_admin", &membership_admin_message(application, recipients))
        .await;
    let applicant_sent = email
        .send_logged("membership_applicant", &applicant_confirmation_message(application))
        .await;

    if !(admin_sent && applicant_sent) {
        warn!(
            application_id = %application.id,
            admin_sent,
            applicant_sent,
            "Membership notification emails incomplete"
        );
        return false;
    }

    if let Err(e) = MembershipRepository::new(pool)
        .mark_email_sent(application.id, Utc::now())
        .await
    {
        warn!(application_id = %application.id, error = %e, "Failed to record email delivery");
        return false;
    }

    info!(application_id = %application.id, "Membership notification emails sent");
    true
}

/// Forwards a contact form message to the general recipients.
pub async fn notify_contact_message(
    pool: &PgPool,
    email: &EmailService,
    request: &ContactMessageRequest,
) -> bool {
    let recipients =
        resolve_recipients(pool, RecipientType::General, &email.config().contact_email).await;
    email
        .send_logged("contact", &contact_message(request, recipients))
        .await
}

/// Labelled application fields in display order. Empty optional fields are skipped.
fn application_sections(app: &MembershipApplication) -> Vec<(&'static str, Vec<(&'static str, String)>)> {
    fn push(rows: &mut Vec<(&'static str, String)>, label: &'static str, value: &Option<String>) {
        if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            rows.push((label, v.to_string()));
        }
    }

    fn official(
        rows: &mut Vec<(&'static str, String)>,
        label: &'static str,
        name: &Option<String>,
        phone: &Option<String>,
        email: &Option<String>,
    ) {
        let Some(name) = name.as_deref().filter(|n| !n.trim().is_empty()) else {
            return;
        };
        let mut line = name.to_string();
        if let Some(phone) = phone.as_deref().filter(|p| !p.is_empty()) {
            line.push_str(&format!(", Phone: {}", phone));
        }
        if let Some(email) = email.as_deref().filter(|e| !e.is_empty()) {
            line.push_str(&format!(", Email: {}", email));
        }
        rows.push((label, line));
    }

    let corp = &app.corporate;

    let mut applicant = vec![
        ("Full Name", app.full_name.clone()),
        ("Email", app.email.clone()),
        ("Phone", app.phone.clone()),
        ("ID Number", app.id_number.clone()),
        ("County", app.county.clone()),
    ];
    push(&mut applicant, "Sub-County", &app.sub_county);
    push(&mut applicant, "Ward", &app.ward);
    push(&mut applicant, "Diaspora / Country", &app.diaspora_country);
    push(&mut applicant, "M-Pesa Code", &app.mpesa_code);

    let mut organization = Vec::new();
    push(&mut organization, "Organization Name", &corp.organization_name);
    push(&mut organization, "Registration Certificate No.", &corp.organization_registration_number);
    push(&mut organization, "KRA PIN", &corp.organization_kra_pin);
    push(&mut organization, "Headquarters", &corp.headquarters_location);
    push(&mut organization, "Organization Email", &corp.organization_email);
    push(&mut organization, "Organization Phone", &corp.organization_phone);

    let mut church = Vec::new();
    push(&mut church, "Church/Ministry Name", &app.church_name);
    if let Some(title) = app.title.as_deref().filter(|t| !t.is_empty()) {
        let title = match app.title_other.as_deref().filter(|t| !t.is_empty()) {
            Some(other) => format!("{} - {}", title, other),
            None => title.to_string(),
        };
        church.push(("Title", title));
    }

    let mut referral = Vec::new();
    push(&mut referral, "Referral Name", &app.referral_name);
    push(&mut referral, "Referral APECK Number", &app.referral_apeck_number);
    push(&mut referral, "Referral Phone", &app.referral_phone);

    let mut officials = Vec::new();
    official(&mut officials, "Chairperson", &corp.chairperson_name, &corp.chairperson_phone, &corp.chairperson_email);
    official(&mut officials, "Secretary", &corp.secretary_name, &corp.secretary_phone, &corp.secretary_email);
    official(&mut officials, "Treasurer", &corp.treasurer_name, &corp.treasurer_phone, &corp.treasurer_email);

    let mut declaration = Vec::new();
    push(&mut declaration, "Signature", &app.signature);
    if let Some(date) = app.declaration_date {
        declaration.push(("Declaration Date", date.to_string()));
    }

    vec![
        ("Applicant Information", applicant),
        ("Organization Details", organization),
        ("Ministry/Church Details", church),
        ("Referral Details", referral),
        ("Officials", officials),
        ("Declaration", declaration),
    ]
    .into_iter()
    .filter(|(_, rows)| !rows.is_empty())
    .collect()
}

fn html_page(heading: &str, content: &str, footer: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
  <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background-color: {color}; color: white; padding: 20px; text-align: center;">
      <h1 style="margin: 0;">{heading}</h1>
    </div>
    <div style="background-color: #f9f9f9; padding: 20px; margin-top: 20px;">
{content}
      <div style="margin-top: 20px; padding-top: 20px; border-top: 1px solid #ddd; font-size: 12px; color: #666;">
        <p>{footer}</p>
      </div>
    </div>
  </div>
</body>
</html>"#,
        color = BRAND_COLOR,
        heading = heading,
        content = content,
        footer = footer,
    )
}

fn payment_rows(app: &MembershipApplication) -> Vec<(&'static str, String)> {
    vec![
        (
            "Payment Reference",
            app.payment_reference.clone().unwrap_or_else(|| "N/A".to_string()),
        ),
        ("Membership Tier", app.membership_tier.clone()),
        ("Amount Paid", format_kes(app.amount_paid)),
    ]
}

pub fn membership_admin_message(app: &MembershipApplication, to: Vec<String>) -> EmailMessage {
    const FOOTER: &str = "This is an automated notification from the APECK membership system.";
    let intro = "A new membership application has been submitted with payment confirmation.";
    let payment = payment_rows(app);
    let sections = application_sections(app);

    let mut text = format!("New Membership Application\n\n{}\n\n", intro);
    for (label, value) in &payment {
        text.push_str(&format!("{}: {}\n", label, value));
    }
    for (title, rows) in &sections {
        text.push_str(&format!("\n{}:\n", title));
        for (label, value) in rows {
            text.push_str(&format!("- {}: {}\n", label, value));
        }
    }
    text.push_str(&format!("\n{}\n", FOOTER));

    let mut content = format!("      <p>{}</p>\n", intro);
    for (label, value) in &payment {
        content.push_str(&format!(
            "      <p><strong>{}:</strong> {}</p>\n",
            label,
            escape_html(value)
        ));
    }
    for (title, rows) in &sections {
        content.push_str(&format!(
            "      <h3 style=\"color: {};\">{}</h3>\n      <ul>\n",
            BRAND_COLOR, title
        ));
        for (label, value) in rows {
            content.push_str(&format!(
                "        <li><strong>{}:</strong> {}</li>\n",
                label,
                escape_html(value)
            ));
        }
        content.push_str("      </ul>\n");
    }

    EmailMessage::new(
        to,
        format!("New APECK Membership Application - {}", app.full_name),
        text,
    )
    .with_html(html_page("New Membership Application", &content, FOOTER))
}

pub fn applicant_confirmation_message(app: &MembershipApplication) -> EmailMessage {
    const FOOTER: &str =
        "This is an automated confirmation email. Please do not reply to this message.";
    let thanks = "Thank you for submitting your membership application to APECK. \
        We have received your application and payment confirmation.";
    let follow_up = "Our team will review your application and get back to you shortly. \
        If you have any questions, please don't hesitate to contact us.";
    let payment = payment_rows(app);

    let mut text = format!(
        "Thank You for Your Application!\n\nDear {},\n\n{}\n\n",
        app.full_name, thanks
    );
    for (label, value) in &payment {
        text.push_str(&format!("{}: {}\n", label, value));
    }
    text.push_str(&format!("\n{}\n\nBlessings,\nThe APECK Team\n\n{}\n", follow_up, FOOTER));

    let mut content = format!(
        "      <p>Dear {},</p>\n      <p>{}</p>\n",
        escape_html(&app.full_name),
        thanks
    );
    for (label, value) in &payment {
        content.push_str(&format!(
            "      <p><strong>{}:</strong> {}</p>\n",
            label,
            escape_html(value)
        ));
    }
    content.push_str(&format!(
        "      <p>{}</p>\n      <p>Blessings,<br>The APECK Team</p>\n",
        follow_up
    ));

    EmailMessage::new(
        vec![app.email.clone()],
        "APECK Membership Application Received",
        text,
    )
    .with_html(html_page("Thank You for Your Application!", &content, FOOTER))
}

pub fn contact_message(request: &ContactMessageRequest, to: Vec<String>) -> EmailMessage {
    const FOOTER: &str = "Sent from the contact form on the APECK website.";
    let phone = request.phone.as_deref().filter(|p| !p.trim().is_empty());

    let mut text = format!(
        "New Contact Message\n\nName: {}\nEmail: {}\n",
        request.name, request.email
    );
    if let Some(phone) = phone {
        text.push_str(&format!("Phone: {}\n", phone));
    }
    text.push_str(&format!(
        "Subject: {}\n\n{}\n\n{}\n",
        request.subject, request.message, FOOTER
    ));

    let mut content = format!(
        "      <p><strong>Name:</strong> {}</p>\n      <p><strong>Email:</strong> {}</p>\n",
        escape_html(&request.name),
        escape_html(&request.email)
    );
    if let Some(phone) = phone {
        content.push_str(&format!("      <p><strong>Phone:</strong> {}</p>\n", escape_html(phone)));
    }
    content.push_str(&format!(
        "      <p><strong>Subject:</strong> {}</p>\n      <p style=\"white-space: pre-wrap;\">{}</p>\n",
        escape_html(&request.subject),
        escape_html(&request.message)
    ));

    EmailMessage::new(to, format!("APECK Contact: {}", request.subject), text)
        .with_html(html_page("New Contact Message", &content, FOOTER))
        .with_reply_to(request.email.clone())
}

pub fn invite_message(
    first_name: &str,
    email: &str,
    temporary_password: &str,
    frontend_url: &str,
) -> EmailMessage {
    let website = frontend_url.trim_end_matches('/');
    let admin_url = format!("{}/admin", website);
    let closing = "For security, please sign in and change your password from the \
        \"My Profile\" page as soon as possible.";

    let text = format!(
        "Welcome to the APECK Admin Portal\n\nHello {name},\n\n\
         You have been invited to manage content on the APECK website. \
         Use the credentials below to sign in:\n\n\
         Website: {website}\nAdmin Portal: {admin}\nEmail: {email}\nTemporary Password: {password}\n\n\
         {closing}\n\nRegards,\nAPECK Team\n",
        name = first_name,
        website = website,
        admin = admin_url,
        email = email,
        password = temporary_password,
        closing = closing,
    );

    let content = format!(
        r#"      <p>Hello {name},</p>
      <p>You have been invited to manage content on the APECK website. Use the credentials below to sign in:</p>
      <ul>
        <li><strong>Website:</strong> <a href="{website}">{website}</a></li>
        <li><strong>Admin Portal:</strong> <a href="{admin}">{admin}</a></li>
        <li><strong>Email:</strong> {email}</li>
        <li><strong>Temporary Password:</strong> {password}</li>
      </ul>
      <p>{closing}</p>
      <p>Regards,<br>APECK Team</p>
"#,
        name = escape_html(first_name),
        website = escape_html(website),
        admin = escape_html(&admin_url),
        email = escape_html(email),
        password = escape_html(temporary_password),
        closing = closing,
    );

    EmailMessage::new(vec![email.to_string()], "APECK Admin Portal Invitation", text).with_html(
        html_page("Welcome to the APECK Admin Portal", &content, "APECK Content Management System"),
    )
}

pub fn password_reset_message(first_name: &str, email: &str, code: &str) -> EmailMessage {
    let text = format!(
        "Hello {name},\n\n\
         We received a request to reset your APECK Admin password. \
         Use the code below to complete the process:\n\n{code}\n\n\
         This code expires in {minutes} minutes. If you didn't request this, you can ignore this email.\n",
        name = first_name,
        code = code,
        minutes = RESET_CODE_TTL_MINUTES,
    );

    let content = format!(
        r#"      <p>Hello {name},</p>
      <p>We received a request to reset your APECK Admin password. Use the code below to complete the process:</p>
      <p style="font-size: 24px; font-weight: bold; letter-spacing: 4px;">{code}</p>
      <p>This code expires in {minutes} minutes. If you didn't request this, you can ignore this email.</p>
"#,
        name = escape_html(first_name),
        code = code,
        minutes = RESET_CODE_TTL_MINUTES,
    );

    EmailMessage::new(vec![email.to_string()], "Reset your APECK Admin password", text)
        .with_html(html_page("Password Reset", &content, "APECK Content Management System"))
}

pub fn test_message(to: &str, subject: &str, sender: &str) -> EmailMessage {
    const FOOTER: &str = "This is an automated test email from the APECK Content Management System.";
    let sent_at = Utc::now().to_rfc3339();

    let text = format!(
        "Email Test Successful!\n\n\
         Your email configuration is working. This message was delivered by the APECK CMS.\n\n\
         Test Details:\n- Sent at: {sent_at}\n- From: {sender}\n- To: {to}\n\n{footer}\n",
        sent_at = sent_at,
        sender = sender,
        to = to,
        footer = FOOTER,
    );

    let content = format!(
        r#"      <p>Your email configuration is working. This message was delivered by the APECK CMS.</p>
      <p><strong>Test Details:</strong></p>
      <ul>
        <li>Sent at: {sent_at}</li>
        <li>From: {sender}</li>
        <li>To: {to}</li>
      </ul>
"#,
        sent_at = sent_at,
        sender = escape_html(sender),
        to = escape_html(to),
    );

    EmailMessage::new(vec![to.to_string()], subject, text)
        .with_html(html_page("Email Test Successful!", &content, FOOTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domain::models::membership_application::CorporateDetails;
    use domain::models::MembershipStatus;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn application() -> MembershipApplication {
        MembershipApplication {
            id: Uuid::new_v4(),
            full_name: "Grace <Wanjiru>".to_string(),
            phone: "+254700000001".to_string(),
            id_number: "12345678".to_string(),
            email: "grace@example.org".to_string(),
            county: "Nairobi".to_string(),
            sub_county: Some("Westlands".to_string()),
            ward: None,
            diaspora_country: None,
            mpesa_code: Some("QWE123RTY".to_string()),
            payment_reference: Some("QWE123RTY".to_string()),
            payment_gateway: "mpesa".to_string(),
            amount_paid: Decimal::new(150000, 2),
            membership_tier: "individual".to_string(),
            status: MembershipStatus::Pending,
            notes: None,
            email_sent: false,
            email_sent_at: None,
            church_name: Some("Grace Chapel".to_string()),
            title: Some("Other".to_string()),
            title_other: Some("Evangelist".to_string()),
            referral_name: None,
            referral_apeck_number: None,
            referral_phone: None,
            signature: Some("G. Wanjiru".to_string()),
            declaration_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            corporate: CorporateDetails {
                chairperson_name: Some("Peter Otieno".to_string()),
                chairperson_phone: Some("+254711111111".to_string()),
                ..CorporateDetails::default()
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_membership_admin_message() {
        let msg = membership_admin_message(&application(), vec!["membership@apeck.org".to_string()]);
        assert_eq!(msg.subject, "New APECK Membership Application - Grace <Wanjiru>");
        assert!(msg.text.contains("Amount Paid: KES 1,500"));
        assert!(msg.text.contains("- Sub-County: Westlands"));
        assert!(!msg.text.contains("Ward"));
        assert!(!msg.text.contains("Referral Details"));
        assert!(msg.text.contains("- Title: Other - Evangelist"));
        assert!(msg.text.contains("- Chairperson: Peter Otieno, Phone: +254711111111"));
        assert!(msg.text.contains("- Declaration Date: 2024-05-01"));

        let html = msg.html.unwrap();
        assert!(html.contains("Grace &lt;Wanjiru&gt;"));
        assert!(!html.contains("<Wanjiru>"));
    }

    #[test]
    fn test_applicant_confirmation_message() {
        let msg = applicant_confirmation_message(&application());
        assert_eq!(msg.to, vec!["grace@example.org".to_string()]);
        assert_eq!(msg.subject, "APECK Membership Application Received");
        assert!(msg.text.contains("Payment Reference: QWE123RTY"));
        assert!(msg.text.contains("Blessings,"));
    }

    #[test]
    fn test_contact_message_replies_to_sender() {
        let request = ContactMessageRequest {
            name: "Jane".to_string(),
            email: "jane@example.org".to_string(),
            phone: None,
            subject: "Volunteering".to_string(),
            message: "How can I volunteer <today>?".to_string(),
        };
        let msg = contact_message(&request, vec!["info@apeck.org".to_string()]);
        assert_eq!(msg.reply_to.as_deref(), Some("jane@example.org"));
        assert!(!msg.text.contains("Phone:"));
        assert!(msg.html.unwrap().contains("&lt;today&gt;"));
    }

    #[test]
    fn test_invite_message_links_admin_portal() {
        let msg = invite_message("Ann", "ann@apeck.org", "Temp1234abcd", "https://apeck.org/");
        assert_eq!(msg.subject, "APECK Admin Portal Invitation");
        assert!(msg.text.contains("Admin Portal: https://apeck.org/admin"));
        assert!(msg.text.contains("Temporary Password: Temp1234abcd"));
    }

    #[test]
    fn test_password_reset_message() {
        let msg = password_reset_message("Ann", "ann@apeck.org", "042917");
        assert_eq!(msg.subject, "Reset your APECK Admin password");
        assert!(msg.text.contains("042917"));
        assert!(msg.text.contains("15 minutes"));
    }

    #[test]
    fn test_test_message() {
        let msg = test_message("ops@apeck.org", "APECK Email Configuration Test", "noreply@apeck.org");
        assert_eq!(msg.to, vec!["ops@apeck.org".to_string()]);
        assert!(msg.text.contains("Email Test Successful!"));
    }
}
