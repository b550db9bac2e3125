#[derive(Debug, Clone)]
pub struct SmtpConfig {
  pub host: String,
  pub port: u16,
  pub username: String,
  pub password: String,
  pub from_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
  pub to: String,
  pub subject: String,
  pub body: String,
}

impl EmailMessage {
  pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
    EmailMessage {
      to: to.into(),
      subject: subject.into(),
      body: body.into(),
    }
  }
}

/// Submission acknowledgment from the relay. It does not mean the mail reached the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
  pub response: String,
}
