//! HTTP 에러 응답.
//!
//! 인증 실패는 원인과 무관하게 일반화된 메시지만 내보냅니다.
//!
//! ```json
//! { "detail": "Could not validate credentials", "code": "UNAUTHENTICATED" }
//! ```

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use keygate_core::AuthError;
use serde::{Deserialize, Serialize};

/// 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 사람이 읽을 수 있는 메시지
    pub detail: String,
    /// 에러 코드 (예: "INVALID_CREDENTIALS", "UNAUTHENTICATED")
    pub code: String,
}

/// API 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Not authenticated")]
    MissingToken,
    #[error("Could not validate credentials")]
    InvalidAuthHeader,
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::MissingToken | ApiError::InvalidAuthHeader => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Auth(e) => e.code(),
            ApiError::MissingToken => "MISSING_TOKEN",
            ApiError::InvalidAuthHeader => "INVALID_AUTH_HEADER",
            ApiError::Internal => "INTERNAL_ERROR",
        }
    }

    fn wants_bearer_challenge(&self) -> bool {
        match self {
            ApiError::Auth(e) => e.requires_reauthentication(),
            ApiError::MissingToken | ApiError::InvalidAuthHeader => true,
            ApiError::Internal => false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            detail: self.to_string(),
            code: self.code().to_string(),
        });

        let mut response = (self.status(), body).into_response();
        if self.wants_bearer_challenge() {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
