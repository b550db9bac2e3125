use axum::{
  extract::{
    rejection::{JsonRejection, QueryRejection},
    Json, Path, Query, State,
  },
  http::StatusCode,
  response::{Html, IntoResponse, Json as JsonResponse, Response},
  routing::{get, post},
  Router,
};

use super::model::{IsVerifiedResponse, SendVerificationRequest, VerificationOutcome, VerifyQuery};
use crate::{
  state::{AppState, SharedAppState},
  utils::error::SERVER_ERROR_MESSAGE,
  AppError,
};

pub const SEND_SUCCESS_MESSAGE: &str = "Verification email sent";
pub const NOT_FOUND_MESSAGE: &str = "User not found";

pub fn verification_routes() -> Router<SharedAppState> {
  Router::new()
    .route("/send-verification", post(send_verification_handler))
    .route("/verify", get(verify_handler))
    .route("/is-verified/{username}", get(is_verified_handler))
}

pub async fn send_verification_handler(
  State(state): State<SharedAppState>,
  payload: Result<Json<SendVerificationRequest>, JsonRejection>,
) -> Result<&'static str, AppError> {
  let Json(payload) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;

  state.request_verification(payload).await?;
  Ok(SEND_SUCCESS_MESSAGE)
}

pub async fn verify_handler(
  State(state): State<SharedAppState>,
  query: Result<Query<VerifyQuery>, QueryRejection>,
) -> Result<Response, AppError> {
  let Query(query) = query.map_err(|e| AppError::bad_request(e.body_text()))?;
  if query.user.is_empty() {
    return Err(AppError::bad_request("The `user` query parameter must not be empty"));
  }

  match state.confirm_verification(&query.user).await? {
    VerificationOutcome::Verified(_) => Ok(Html(state.render_verified(&query.user)?).into_response()),
    VerificationOutcome::NotFound => Ok(NOT_FOUND_MESSAGE.into_response()),
  }
}

pub async fn is_verified_handler(
  State(state): State<SharedAppState>,
  Path(username): Path<String>,
) -> (StatusCode, JsonResponse<IsVerifiedResponse>) {
  match state.is_verified(&username).await {
    Ok(verified) => (StatusCode::OK, JsonResponse(IsVerifiedResponse { verified, error: None })),
    Err(e) => {
      tracing::error!("Failed to check verification status for {}: {}", username, e);
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        JsonResponse(IsVerifiedResponse {
          verified: false,
          error: Some(SERVER_ERROR_MESSAGE.to_string()),
        }),
      )
    }
  }
}
