use std::env;

use anyhow::{anyhow, Context, Result};
use url::Url;

use crate::email::SmtpConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
  pub url: String,
  pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub port: u16,
  pub public_base_url: Url,
  pub database: DatabaseConfig,
  pub smtp: SmtpConfig,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    let port = parse_var("PORT", DEFAULT_PORT)?;

    let public_base_url = var("PUBLIC_BASE_URL").unwrap_or_else(|| format!("http://localhost:{}", port));
    let public_base_url = parse_base_url(&public_base_url)?;

    let database = DatabaseConfig {
      url: var("DATABASE_URL").context("DATABASE_URL environment variable must be set")?,
      max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
    };

    let username = var_with_fallback("SMTP_USERNAME", "EMAIL_USER")
      .ok_or_else(|| anyhow!("SMTP_USERNAME (or EMAIL_USER) environment variable must be set"))?;
    let password = var_with_fallback("SMTP_PASSWORD", "EMAIL_PASS")
      .ok_or_else(|| anyhow!("SMTP_PASSWORD (or EMAIL_PASS) environment variable must be set"))?;

    let smtp = SmtpConfig {
      host: var("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
      port: parse_var("SMTP_PORT", DEFAULT_SMTP_PORT)?,
      from_email: var("SMTP_FROM_EMAIL").unwrap_or_else(|| username.clone()),
      username,
      password,
    };

    Ok(Self {
      port,
      public_base_url,
      database,
      smtp,
    })
  }
}

/// Accepts only absolute http(s) URLs; a trailing path is kept and `/verify` is appended to it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
  let url = Url::parse(raw).with_context(|| format!("PUBLIC_BASE_URL is not a valid URL: {}", raw))?;
  match url.scheme() {
    "http" | "https" => Ok(url),
    other => Err(anyhow!("PUBLIC_BASE_URL must use http or https, got {}", other)),
  }
}

/// Unset and blank variables are both treated as missing; `.env` files often ship `KEY=`.
fn var(key: &str) -> Option<String> {
  env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn var_with_fallback(primary: &str, fallback: &str) -> Option<String> {
  var(primary).or_else(|| var(fallback))
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  match var(key) {
    Some(raw) => raw
      .trim()
      .parse()
      .with_context(|| format!("{} is not a valid value: {}", key, raw)),
    None => Ok(default),
  }
}
