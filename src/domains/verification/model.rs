use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
  pub id: i32,
  pub username: String,
  pub email: String,
  pub verified: bool,
  pub verified_at: Option<DateTime<Utc>>,
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendVerificationRequest {
  #[validate(email(message = "email must be a valid email address"))]
  pub email: String,
  #[validate(length(min = 1, max = 64, message = "username must be between 1 and 64 characters"))]
  pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyQuery {
  pub user: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IsVerifiedResponse {
  pub verified: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
  Verified(User),
  NotFound,
}

impl User {
  pub fn mark_verified(&mut self, at: DateTime<Utc>) {
    self.verified = true;
    self.verified_at = Some(at);
  }

  pub async fn create<'e, E>(executor: E, username: &str, email: &str) -> Result<User, sqlx::Error>
  where
    E: PgExecutor<'e>,
  {
    sqlx::query_as::<_, User>(
      r#"
        INSERT INTO users (username, email, verified)
        VALUES ($1, $2, FALSE)
        RETURNING id, username, email, verified, verified_at, created_at
      "#,
    )
    .bind(username)
    .bind(email)
    .fetch_one(executor)
    .await
  }

  pub async fn find_by_username<'e, E>(executor: E, username: &str) -> Result<Option<User>, sqlx::Error>
  where
    E: PgExecutor<'e>,
  {
    sqlx::query_as::<_, User>(
      r#"
        SELECT id, username, email, verified, verified_at, created_at
        FROM users
        WHERE username = $1
        ORDER BY id
        LIMIT 1
      "#,
    )
    .bind(username)
    .fetch_optional(executor)
    .await
  }

  pub async fn save<'e, E>(&self, executor: E) -> Result<(), sqlx::Error>
  where
    E: PgExecutor<'e>,
  {
    let result = sqlx::query(
      r#"
        UPDATE users
        SET email = $2, verified = $3, verified_at = $4
        WHERE id = $1
      "#,
    )
    .bind(self.id)
    .bind(&self.email)
    .bind(self.verified)
    .bind(self.verified_at)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
      return Err(sqlx::Error::RowNotFound);
    }

    Ok(())
  }
}
