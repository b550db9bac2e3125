use async_trait::async_trait;
use sqlx::PgPool;

use super::model::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
  async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;
  async fn create(&self, username: &str, email: &str) -> Result<User, sqlx::Error>;
  async fn save(&self, user: &User) -> Result<(), sqlx::Error>;
}

pub struct SqlxUserRepository {
  pub pool: PgPool,
}

impl SqlxUserRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
  async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
    User::find_by_username(&self.pool, username).await
  }

  async fn create(&self, username: &str, email: &str) -> Result<User, sqlx::Error> {
    User::create(&self.pool, username, email).await
  }

  async fn save(&self, user: &User) -> Result<(), sqlx::Error> {
    user.save(&self.pool).await
  }
}
