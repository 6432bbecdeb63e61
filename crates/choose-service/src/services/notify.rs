//! Email notifications
//!
//! `MailNotifier` renders one of the account templates and hands the message
//! to a spawned task that retries delivery with exponential backoff. The
//! caller never waits for delivery and never sees its failures.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use choose_common::{MailConfig, Mailer, OutgoingMail};
use choose_core::traits::{Notification, Notifier};
use tracing::{error, info, warn};

/// Template sent after registration; context: `url`, `email`
pub const ACTIVATE_USER_TEMPLATE: &str = "activate_user";
/// Template sent on a password reset request; context: `url`, `email`
pub const PASSWORD_FORGET_TEMPLATE: &str = "password_forget";

pub const ACTIVATE_USER_SUBJECT: &str = "Activate your ChooseOne account";
pub const PASSWORD_FORGET_SUBJECT: &str = "ChooseOne Password Restoring";

const ACTIVATE_USER_HTML: &str = r#"<html>
<body>
<p>Hello {{ email }},</p>
<p>Thanks for signing up for ChooseOne. Confirm your account by following the link below:</p>
<p><a href="{{ url }}">{{ url }}</a></p>
<p>If you did not create an account, you can ignore this message.</p>
</body>
</html>"#;

const PASSWORD_FORGET_HTML: &str = r#"<html>
<body>
<p>Hello {{ email }},</p>
<p>A password reset was requested for your ChooseOne account. Choose a new password here:</p>
<p><a href="{{ url }}">{{ url }}</a></p>
<p>If you did not ask for this, your password stays unchanged.</p>
</body>
</html>"#;

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render a named template, substituting HTML-escaped `{{ key }}` placeholders
pub fn render_template(template: &str, context: &BTreeMap<String, String>) -> Option<String> {
    let source = match template {
        ACTIVATE_USER_TEMPLATE => ACTIVATE_USER_HTML,
        PASSWORD_FORGET_TEMPLATE => PASSWORD_FORGET_HTML,
        _ => return None,
    };

    let body = context.iter().fold(source.to_string(), |body, (key, value)| {
        body.replace(&format!("{{{{ {key} }}}}"), &escape_html(value))
    });
    Some(body)
}

/// Retry configuration with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(30),
            max_delay: Duration::from_secs(3600),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn from_mail_config(config: &MailConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_secs(config.retry_delay_secs),
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-indexed)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay_secs = (self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent))
            .min(self.max_delay.as_secs_f64());
        Duration::try_from_secs_f64(delay_secs).unwrap_or(self.max_delay)
    }

    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

/// Notifier delivering through a [`Mailer`] on a background task
#[derive(Clone)]
pub struct MailNotifier {
    mailer: Arc<dyn Mailer>,
    retry: RetryConfig,
}

impl MailNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, retry: RetryConfig) -> Self {
        Self { mailer, retry }
    }
}

impl Notifier for MailNotifier {
    fn notify(&self, notification: Notification) {
        let Some(html_body) = render_template(&notification.template, &notification.context)
        else {
            error!(template = %notification.template, "Unknown mail template");
            return;
        };

        let mail = OutgoingMail {
            to: notification.recipients,
            subject: notification.subject,
            html_body,
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            error!(subject = %mail.subject, "No async runtime to deliver mail on");
            return;
        };
        runtime.spawn(deliver(Arc::clone(&self.mailer), mail, self.retry.clone()));
    }
}

async fn deliver(mailer: Arc<dyn Mailer>, mail: OutgoingMail, retry: RetryConfig) {
    let mut attempt = 0;
    loop {
        match mailer.send(&mail).await {
            Ok(()) => {
                info!(to = ?mail.to, subject = %mail.subject, "Email notification sent");
                return;
            }
            Err(e) if retry.should_retry(attempt) => {
                let delay = retry.delay_for_attempt(attempt);
                warn!(attempt = attempt + 1, ?delay, error = %e, "Mail delivery failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!(
                    attempts = attempt + 1,
                    to = ?mail.to,
                    error = %e,
                    "Mail delivery failed, giving up"
                );
                return;
            }
        }
    }
}
