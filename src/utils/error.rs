use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};

use crate::domains::verification::service::VerificationServiceError;

pub const SERVER_ERROR_MESSAGE: &str = "Server error";
pub const MAIL_ERROR_MESSAGE: &str = "Failed to send verification email";

/// Plain-text error response. Internal details are logged, never returned.
#[derive(Debug)]
pub struct AppError {
  pub status_code: StatusCode,
  pub message: String,
}

impl AppError {
  pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status_code,
      message: message.into(),
    }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, message)
  }

  pub fn internal_server_error(message: impl Into<String>) -> Self {
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    (self.status_code, self.message).into_response()
  }
}

impl From<AppError> for StatusCode {
  fn from(err: AppError) -> Self {
    err.status_code
  }
}

impl From<minijinja::Error> for AppError {
  fn from(error: minijinja::Error) -> Self {
    tracing::error!("Template error: {:?}", error);
    AppError::internal_server_error(SERVER_ERROR_MESSAGE)
  }
}

impl From<VerificationServiceError> for AppError {
  fn from(error: VerificationServiceError) -> Self {
    match error {
      VerificationServiceError::Validation(msg) => AppError::bad_request(msg),
      VerificationServiceError::Store(msg) => {
        tracing::error!("{}", msg);
        AppError::internal_server_error(SERVER_ERROR_MESSAGE)
      }
      VerificationServiceError::Mail(msg) => {
        tracing::error!("{}", msg);
        AppError::internal_server_error(MAIL_ERROR_MESSAGE)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_validation_maps_to_bad_request() {
    let err: AppError = VerificationServiceError::Validation("username is required".to_string()).into();
    assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "username is required");
  }

  #[test]
  fn test_store_error_hides_details() {
    let err: AppError = VerificationServiceError::Store("Database error: connection refused".to_string()).into();
    assert_eq!(err.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.message, SERVER_ERROR_MESSAGE);
  }

  #[test]
  fn test_mail_error_message() {
    let err: AppError = VerificationServiceError::Mail("relay refused".to_string()).into();
    assert_eq!(err.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.message, MAIL_ERROR_MESSAGE);
  }
}
