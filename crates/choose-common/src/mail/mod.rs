//! Outgoing mail transports

mod transport;

pub use transport::{LogMailer, MailError, Mailer, OutgoingMail, SmtpMailer};
