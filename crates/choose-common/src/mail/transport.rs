//! Mail transports: SMTP through `lettre`, or the log for development

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use crate::config::MailConfig;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Failed to build email message: {0}")]
    MessageBuild(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Mail configuration error: {0}")]
    Config(String),
}

/// A rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

/// Delivers one message. Retrying is the caller's business.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Writes messages to the log instead of sending them
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        info!(
            to = ?mail.to,
            subject = %mail.subject,
            body = %mail.html_body,
            "Mail delivery skipped (log transport)"
        );
        Ok(())
    }
}

/// SMTP transport
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, MailError> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| MailError::Config("SMTP_HOST not set".to_string()))?;
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| MailError::Config(format!("invalid MAIL_FROM: {e}")))?;

        let builder = if config.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| MailError::Config(format!("SMTP starttls error: {e}")))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };
        let mut builder = builder.port(config.smtp_port);

        if let (Some(user), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(&mail.subject)
            .header(ContentType::TEXT_HTML);

        for recipient in &mail.to {
            let mailbox: Mailbox = recipient
                .parse()
                .map_err(|e| MailError::MessageBuild(format!("invalid recipient {recipient}: {e}")))?;
            builder = builder.to(mailbox);
        }

        builder
            .body(mail.html_body.clone())
            .map_err(|e| MailError::MessageBuild(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = self.build_message(mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::SendFailed(e.to_string()))?;
        info!(to = ?mail.to, subject = %mail.subject, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail() -> OutgoingMail {
        OutgoingMail {
            to: vec!["a@x.com".to_string()],
            subject: "Activate your ChooseOne account".to_string(),
            html_body: "<p>hi</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        assert!(LogMailer.send(&mail()).await.is_ok());
    }

    #[test]
    fn test_smtp_requires_host() {
        let result = SmtpMailer::from_config(&MailConfig::default());
        assert!(matches!(result, Err(MailError::Config(_))));
    }

    #[tokio::test]
    async fn test_smtp_builds_message() {
        let config = MailConfig {
            smtp_host: Some("localhost".to_string()),
            smtp_starttls: false,
            ..MailConfig::default()
        };
        let mailer = SmtpMailer::from_config(&config).unwrap();

        assert!(mailer.build_message(&mail()).is_ok());

        let mut bad = mail();
        bad.to = vec!["not an address".to_string()];
        assert!(matches!(
            mailer.build_message(&bad),
            Err(MailError::MessageBuild(_))
        ));
    }
}
