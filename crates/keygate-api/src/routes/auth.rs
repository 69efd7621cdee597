//! 로그인 endpoint.
//!
//! OAuth2 password grant 형식의 폼(`username`, `password`)을 받아 Bearer 토큰을 발급합니다.

use axum::{extract::State, Form, Json};
use keygate_core::{BearerToken, Credentials};
use serde::Deserialize;
use tracing::error;

use crate::error::ApiError;
use crate::state::AppState;

/// 로그인 폼.
///
/// `grant_type`과 `scope`는 OAuth2 클라이언트 호환을 위해 받기만 하고 사용하지 않습니다.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub grant_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("grant_type", &self.grant_type)
            .field("scope", &self.scope)
            .finish()
    }
}

/// 비밀번호 로그인.
///
/// POST /token
///
/// Argon2 검증은 blocking 스레드 풀에서 실행하며,
/// 동시 실행 수는 [`AppState::login_permits`]로 제한합니다.
/// 슬롯이 없으면 빈 슬롯이 생길 때까지 대기합니다.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<BearerToken>, ApiError> {
    let permit = state
        .login_permits
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| {
            error!(error = %e, "Login semaphore closed");
            ApiError::Internal
        })?;

    let auth = state.auth.clone();
    let credentials = Credentials::new(form.username, form.password);

    // 요청이 취소되어도 검증이 끝날 때까지 슬롯을 유지
    let token = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        auth.login(&credentials)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Login task failed");
        ApiError::Internal
    })??;

    Ok(Json(token))
}
