use std::sync::Arc;

use sqlx::PgPool;
use url::Url;

use crate::{
  domains::verification::{
    model::{SendVerificationRequest, VerificationOutcome},
    repository::SqlxUserRepository,
    service::{VerificationService, VerificationServiceError, VerificationServiceImpl},
  },
  email::{DeliveryReceipt, EmailService},
  views::ViewRenderer,
};

pub trait AppState: Clone + Send + Sync + 'static {
  fn request_verification(
    &self,
    req: SendVerificationRequest,
  ) -> impl std::future::Future<Output = Result<DeliveryReceipt, VerificationServiceError>> + Send;
  fn confirm_verification(
    &self,
    username: &str,
  ) -> impl std::future::Future<Output = Result<VerificationOutcome, VerificationServiceError>> + Send;
  fn is_verified(
    &self,
    username: &str,
  ) -> impl std::future::Future<Output = Result<bool, VerificationServiceError>> + Send;
  fn render_verified(&self, username: &str) -> Result<String, minijinja::Error>;
}

#[derive(Clone)]
pub struct SharedAppState {
  pub verification_service: Arc<dyn VerificationService>,
  pub views: Arc<ViewRenderer>,
}

impl SharedAppState {
  pub fn new(pool: PgPool, email_service: EmailService, public_base_url: Url) -> Result<Self, minijinja::Error> {
    let user_repository = SqlxUserRepository::new(pool);
    let verification_service = VerificationServiceImpl::new(user_repository, email_service, public_base_url);

    Self::from_service(Arc::new(verification_service))
  }

  pub fn from_service(verification_service: Arc<dyn VerificationService>) -> Result<Self, minijinja::Error> {
    Ok(Self {
      verification_service,
      views: Arc::new(ViewRenderer::new()?),
    })
  }
}

impl AppState for SharedAppState {
  async fn request_verification(&self, req: SendVerificationRequest) -> Result<DeliveryReceipt, VerificationServiceError> {
    self.verification_service.request_verification(req).await
  }

  async fn confirm_verification(&self, username: &str) -> Result<VerificationOutcome, VerificationServiceError> {
    self.verification_service.confirm_verification(username).await
  }

  async fn is_verified(&self, username: &str) -> Result<bool, VerificationServiceError> {
    self.verification_service.is_verified(username).await
  }

  fn render_verified(&self, username: &str) -> Result<String, minijinja::Error> {
    self.views.render_verified(username)
  }
}
