//! Email service for farmer order notifications.
//!
//! Uses SMTP via lettre for delivery with an askama plaintext template.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Plain text template for the new-order notification.
#[derive(Template)]
#[template(path = "email/order_notification.txt")]
struct OrderNotificationText<'a> {
    farmer_name: &'a str,
    quantity: u32,
    product_name: &'a str,
    consumer_email: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for farmer notifications.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay address is invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Notify a farmer that one of their products has been ordered.
    ///
    /// One email per cart line; `consumer_email` is the delivery contact.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or the template fails to
    /// render.
    pub async fn send_order_notification(
        &self,
        to: &str,
        farmer_name: &str,
        quantity: u32,
        product_name: &str,
        consumer_email: &str,
    ) -> Result<(), EmailError> {
        let body = OrderNotificationText {
            farmer_name,
            quantity,
            product_name,
            consumer_email,
        }
        .render()?;

        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject("Kërkesë: Porosi e re!")
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, product = %product_name, "Order notification sent");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_notification_renders() {
        let body = OrderNotificationText {
            farmer_name: "Agim",
            quantity: 3,
            product_name: "Djathë i bardhë",
            consumer_email: "blerësi@example.com",
        }
        .render()
        .unwrap();

        assert!(body.contains("Agim"));
        assert!(body.contains("3 Djathë i bardhë"));
        assert!(body.contains("blerësi@example.com"));
    }
}
