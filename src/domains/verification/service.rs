use async_trait::async_trait;
use chrono::Utc;
use std::error::Error;
use url::Url;
use validator::Validate;

use super::{
  model::{SendVerificationRequest, VerificationOutcome},
  repository::UserRepository,
};
use crate::{
  email::{DeliveryReceipt, EmailMessage, Mailer},
  impl_service_error_conversions,
};

pub const VERIFICATION_SUBJECT: &str = "Verify your moderation role";

#[derive(Debug)]
pub enum VerificationServiceError {
  Validation(String),
  Store(String),
  Mail(String),
}

impl Error for VerificationServiceError {}

impl std::fmt::Display for VerificationServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      VerificationServiceError::Validation(msg) => write!(f, "Validation Error: {}", msg),
      VerificationServiceError::Store(msg) => write!(f, "Store Error: {}", msg),
      VerificationServiceError::Mail(msg) => write!(f, "Mail Error: {}", msg),
    }
  }
}

impl_service_error_conversions!(VerificationServiceError, Store);

#[async_trait]
pub trait VerificationService: Send + Sync {
  async fn request_verification(&self, req: SendVerificationRequest) -> Result<DeliveryReceipt, VerificationServiceError>;
  async fn confirm_verification(&self, username: &str) -> Result<VerificationOutcome, VerificationServiceError>;
  async fn is_verified(&self, username: &str) -> Result<bool, VerificationServiceError>;
}

pub struct VerificationServiceImpl<U, M> {
  user_repository: U,
  mailer: M,
  public_base_url: Url,
}

impl<U, M> VerificationServiceImpl<U, M>
where
  U: UserRepository,
  M: Mailer,
{
  pub fn new(user_repository: U, mailer: M, public_base_url: Url) -> Self {
    Self {
      user_repository,
      mailer,
      public_base_url,
    }
  }
}

/// `{base}/verify?user=<username>`, keeping any path prefix on `base`.
pub fn build_verification_link(base: &Url, username: &str) -> String {
  let mut url = base.clone();
  if let Ok(mut segments) = url.path_segments_mut() {
    segments.pop_if_empty().push("verify");
  }
  url.set_fragment(None);
  url.query_pairs_mut().clear().append_pair("user", username);
  url.to_string()
}

pub fn build_verification_email(to: &str, username: &str, link: &str) -> EmailMessage {
  let body = format!("Hi {}, click to verify your account:\n\n{}", username, link);
  EmailMessage::new(to, VERIFICATION_SUBJECT, body)
}

#[async_trait]
impl<U, M> VerificationService for VerificationServiceImpl<U, M>
where
  U: UserRepository,
  M: Mailer,
{
  async fn request_verification(&self, req: SendVerificationRequest) -> Result<DeliveryReceipt, VerificationServiceError> {
    req
      .validate()
      .map_err(|e| VerificationServiceError::Validation(format!("Validation failed: {}", e)))?;

    let existing = self.user_repository.find_by_username(&req.username).await?;
    if existing.is_none() {
      let user = self.user_repository.create(&req.username, &req.email).await?;
      tracing::info!(user_id = user.id, username = %user.username, "Created unverified user");
    }

    let link = build_verification_link(&self.public_base_url, &req.username);
    let message = build_verification_email(&req.email, &req.username, &link);

    let receipt = self
      .mailer
      .send(&message)
      .await
      .map_err(|e| VerificationServiceError::Mail(format!("Failed to send verification email: {}", e)))?;

    tracing::info!(username = %req.username, response = %receipt.response, "Verification email sent");
    Ok(receipt)
  }

  async fn confirm_verification(&self, username: &str) -> Result<VerificationOutcome, VerificationServiceError> {
    let Some(mut user) = self.user_repository.find_by_username(username).await? else {
      tracing::info!(username = %username, "Verification requested for unknown user");
      return Ok(VerificationOutcome::NotFound);
    };

    user.mark_verified(Utc::now());
    self.user_repository.save(&user).await?;

    tracing::info!(user_id = user.id, username = %username, "User verified");
    Ok(VerificationOutcome::Verified(user))
  }

  async fn is_verified(&self, username: &str) -> Result<bool, VerificationServiceError> {
    let user = self.user_repository.find_by_username(username).await?;
    Ok(user.map(|u| u.verified).unwrap_or(false))
  }
}
