//! Outbound mail for verification links.
//!
//! `Mailer` is the seam the verification service depends on; `EmailService`
//! is the SMTP implementation built on lettre.

mod service;
mod types;

pub use service::{EmailService, Mailer};
pub use types::{DeliveryReceipt, EmailMessage, SmtpConfig};
