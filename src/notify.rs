use std::env;

use askama::Template;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub band_address: String,
}

impl MailConfig {
    pub fn from_env() -> Self {
        Self {
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(587),
            username: env::var("SMTP_USER").unwrap_or_default(),
            password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_address: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Diamond Band <no-reply@diamondband.com>".to_string()),
            band_address: env::var("BAND_EMAIL")
                .unwrap_or_else(|_| "info@diamondband.com".to_string()),
        }
    }

    pub fn disabled() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            band_address: String::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        !self.smtp_host.trim().is_empty() && !self.from_address.trim().is_empty()
    }
}

#[derive(Debug, Error)]
enum MailError {
    #[error("address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("template: {0}")]
    Template(#[from] askama::Error),
}

/// Booking fields the notification emails need.
#[derive(Debug, Clone)]
pub struct BookingEmail {
    pub reference: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub event_title: String,
    pub event_type_label: String,
    pub event_date: String,
    pub event_start_time: String,
    pub event_end_time: String,
    pub event_location: String,
    pub expected_guests: i64,
    pub service_requested: String,
}

#[derive(Template)]
#[template(path = "emails/booking_client.txt")]
struct ClientEmailTemplate<'a> {
    booking: &'a BookingEmail,
}

#[derive(Template)]
#[template(path = "emails/booking_band.txt")]
struct BandEmailTemplate<'a> {
    booking: &'a BookingEmail,
}

/// Sends the client confirmation and the band notification. Best effort:
/// every failure path logs a warning and the caller proceeds either way.
pub async fn send_booking_emails(config: &MailConfig, booking: &BookingEmail) {
    if !config.enabled() {
        return;
    }

    let mailer = match transport(config) {
        Ok(mailer) => mailer,
        Err(err) => {
            log::warn!("SMTP transport setup failed: {err}");
            return;
        }
    };

    if let Err(err) = send_client_confirmation(&mailer, config, booking).await {
        log::warn!("Client confirmation email failed: {err}");
    }
    if let Err(err) = send_band_notification(&mailer, config, booking).await {
        log::warn!("Band notification email failed: {err}");
    }
}

fn transport(config: &MailConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
    let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        .port(config.smtp_port);
    if !config.username.is_empty() {
        builder = builder.credentials(Credentials::new(
            config.username.clone(),
            config.password.clone(),
        ));
    }
    Ok(builder.build())
}

async fn send_client_confirmation(
    mailer: &AsyncSmtpTransport<Tokio1Executor>,
    config: &MailConfig,
    booking: &BookingEmail,
) -> Result<(), MailError> {
    let from: Mailbox = config.from_address.parse()?;
    let to: Mailbox = booking.client_email.parse()?;
    let body = ClientEmailTemplate { booking }.render()?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(format!("We received your booking inquiry ({})", booking.reference))
        .body(body)?;

    mailer.send(message).await?;
    Ok(())
}

async fn send_band_notification(
    mailer: &AsyncSmtpTransport<Tokio1Executor>,
    config: &MailConfig,
    booking: &BookingEmail,
) -> Result<(), MailError> {
    let from: Mailbox = config.from_address.parse()?;
    let to: Mailbox = config.band_address.parse()?;
    let body = BandEmailTemplate { booking }.render()?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(format!(
            "New booking inquiry {}: {}",
            booking.reference, booking.event_title
        ))
        .body(body)?;

    mailer.send(message).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_booking() -> BookingEmail {
        BookingEmail {
            reference: "DB-1A2B3C4D".into(),
            client_name: "Test Client".into(),
            client_email: "client@example.com".into(),
            client_phone: "+1234567890".into(),
            event_title: "Harvest Gala".into(),
            event_type_label: "Corporate Event".into(),
            event_date: "2026-10-03".into(),
            event_start_time: "19:00".into(),
            event_end_time: "23:00".into(),
            event_location: "Grand Hall".into(),
            expected_guests: 250,
            service_requested: "Full live set".into(),
        }
    }

    #[test]
    fn disabled_without_smtp_host() {
        assert!(!MailConfig::disabled().enabled());
    }

    #[test]
    fn email_templates_render() {
        let booking = sample_booking();
        let client = ClientEmailTemplate { booking: &booking }.render().unwrap();
        assert!(client.contains("DB-1A2B3C4D"));
        assert!(client.contains("Test Client"));

        let band = BandEmailTemplate { booking: &booking }.render().unwrap();
        assert!(band.contains("Harvest Gala"));
        assert!(band.contains("client@example.com"));
    }
}
