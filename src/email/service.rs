use crate::email::types::{DeliveryReceipt, EmailMessage, SmtpConfig};
use anyhow::Result;
use async_trait::async_trait;
use lettre::{
  message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
  Message, Tokio1Executor,
};

#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt>;
}

pub struct EmailService {
  smtp_config: SmtpConfig,
  transporter: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailService {
  pub fn new(smtp_config: SmtpConfig) -> Result<Self> {
    let creds = Credentials::new(smtp_config.username.clone(), smtp_config.password.clone());

    let transporter = if smtp_config.host == "localhost" || smtp_config.host == "mailhog" {
      AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp_config.host)
        .credentials(creds)
        .port(smtp_config.port)
        .build()
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp_config.host)?
        .credentials(creds)
        .port(smtp_config.port)
        .build()
    };

    Ok(EmailService {
      smtp_config,
      transporter,
    })
  }

  fn build_message(&self, message: &EmailMessage) -> Result<Message> {
    let email = Message::builder()
      .from(self.smtp_config.from_email.parse()?)
      .to(message.to.parse()?)
      .subject(&message.subject)
      .header(ContentType::TEXT_PLAIN)
      .body(message.body.clone())?;

    Ok(email)
  }
}

#[async_trait]
impl Mailer for EmailService {
  async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt> {
    let email = self.build_message(message)?;
    let response = self.transporter.send(email).await?;

    let text = response.message().collect::<Vec<_>>().join(" ");
    Ok(DeliveryReceipt {
      response: format!("{} {}", response.code(), text).trim_end().to_string(),
    })
  }
}
