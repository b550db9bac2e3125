use std::sync::{
  atomic::{AtomicBool, AtomicI32, Ordering},
  Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
  body::{Body, Bytes},
  http::{Request, StatusCode},
  Router,
};
use serde::Serialize;
use tower::ServiceExt;
use url::Url;

use crate::{
  app::create_app,
  domains::verification::{
    model::User,
    repository::UserRepository,
    service::{VerificationService, VerificationServiceImpl},
  },
  email::{DeliveryReceipt, EmailMessage, Mailer},
  state::SharedAppState,
};

mockall::mock! {
  pub UserRepo {}

  #[async_trait]
  impl UserRepository for UserRepo {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;
    async fn create(&self, username: &str, email: &str) -> Result<User, sqlx::Error>;
    async fn save(&self, user: &User) -> Result<(), sqlx::Error>;
  }
}

mockall::mock! {
  pub Mailer {}

  #[async_trait]
  impl Mailer for Mailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<DeliveryReceipt>;
  }
}

pub fn sample_user(id: i32, username: &str, email: &str) -> User {
  User {
    id,
    username: username.to_string(),
    email: email.to_string(),
    verified: false,
    verified_at: None,
    created_at: None,
  }
}

pub fn base_url() -> Url {
  Url::parse("http://localhost:3000").expect("valid url")
}

/// Vec-backed store that behaves like the Postgres one: oldest match wins, no uniqueness.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
  users: Arc<Mutex<Vec<User>>>,
  next_id: Arc<AtomicI32>,
}

impl InMemoryUserRepository {
  pub fn all(&self) -> Vec<User> {
    self.users.lock().expect("users lock").clone()
  }

  pub fn insert(&self, username: &str, email: &str) -> User {
    let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let user = sample_user(id, username, email);
    self.users.lock().expect("users lock").push(user.clone());
    user
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
    let users = self.users.lock().expect("users lock");
    Ok(users.iter().find(|u| u.username == username).cloned())
  }

  async fn create(&self, username: &str, email: &str) -> Result<User, sqlx::Error> {
    Ok(self.insert(username, email))
  }

  async fn save(&self, user: &User) -> Result<(), sqlx::Error> {
    let mut users = self.users.lock().expect("users lock");
    let stored = users.iter_mut().find(|u| u.id == user.id).ok_or(sqlx::Error::RowNotFound)?;
    *stored = user.clone();
    Ok(())
  }
}

/// Records every submitted message instead of talking to a relay.
#[derive(Clone, Default)]
pub struct RecordingMailer {
  sent: Arc<Mutex<Vec<EmailMessage>>>,
  failing: Arc<AtomicBool>,
}

impl RecordingMailer {
  pub fn sent(&self) -> Vec<EmailMessage> {
    self.sent.lock().expect("sent lock").clone()
  }

  pub fn fail_next_sends(&self) {
    self.failing.store(true, Ordering::SeqCst);
  }
}

#[async_trait]
impl Mailer for RecordingMailer {
  async fn send(&self, message: &EmailMessage) -> anyhow::Result<DeliveryReceipt> {
    if self.failing.load(Ordering::SeqCst) {
      anyhow::bail!("relay unavailable");
    }
    self.sent.lock().expect("sent lock").push(message.clone());
    Ok(DeliveryReceipt {
      response: "250 OK".to_string(),
    })
  }
}

pub fn app_with_service(service: Arc<dyn VerificationService>) -> Router {
  let state = SharedAppState::from_service(service).expect("build app state");
  create_app(state)
}

pub fn app_with_fakes() -> (Router, InMemoryUserRepository, RecordingMailer) {
  let users = InMemoryUserRepository::default();
  let mailer = RecordingMailer::default();
  let service = VerificationServiceImpl::new(users.clone(), mailer.clone(), base_url());
  (app_with_service(Arc::new(service)), users, mailer)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Bytes) {
  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let body = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("read response body");
  (status, body)
}

pub async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> (StatusCode, Bytes) {
  post_raw(app, uri, serde_json::to_string(body).expect("serialize request body")).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method("POST")
    .uri(uri)
    .header("content-type", "application/json")
    .body(body.into())
    .expect("build request");
  send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method("GET")
    .uri(uri)
    .body(Body::empty())
    .expect("build request");
  send(app, request).await
}
