//! Outbound notification port

use std::collections::BTreeMap;

/// A templated message for one or more recipients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub template: String,
    pub recipients: Vec<String>,
    pub context: BTreeMap<String, String>,
}

impl Notification {
    pub fn new(subject: impl Into<String>, template: impl Into<String>, recipient: String) -> Self {
        Self {
            subject: subject.into(),
            template: template.into(),
            recipients: vec![recipient],
            context: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }
}

/// Fire-and-forget delivery.
///
/// Implementations hand the notification off and return immediately; delivery
/// failures are retried and logged, never reported back to the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
