//! Axum용 Bearer 토큰 인증 추출기.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use keygate_core::AuthenticatedSession;

use crate::error::ApiError;
use crate::state::AppState;

/// 인증된 현재 사용자 추출기.
///
/// 토큰 서명/만료, 사용자 존재, 계정 활성 상태를 순서대로 확인합니다.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedSession);

/// `Authorization` 헤더에서 Bearer 토큰 추출.
///
/// 스킴 이름은 대소문자를 구분하지 않습니다.
/// 토큰 없이 `Bearer`만 온 경우는 헤더가 없는 것과 같이 취급합니다
/// (HTTP 계층이 값 끝의 공백을 제거하므로 `"Bearer "`와 `"Bearer"`는 구분되지 않음).
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(ApiError::MissingToken)?
        .to_str()
        .map_err(|_| ApiError::InvalidAuthHeader)?
        .trim();

    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ApiError::InvalidAuthHeader);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::MissingToken);
    }

    Ok(token)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let state = AppState::from_ref(state);

        let session = state.auth.resolve_current_user(token)?;
        Ok(CurrentUser(session))
    }
}
