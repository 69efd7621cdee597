//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `POST /token` - 비밀번호 로그인, 액세스 토큰 발급
//! - `GET /users/me` - 현재 사용자 프로필
//! - `GET /users/me/items` - 현재 사용자 소유 항목
//! - `GET /health` - 헬스 체크 (liveness)

pub mod auth;
pub mod health;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub use auth::{login, LoginForm};
pub use health::{health_check, HealthResponse};
pub use users::{read_own_items, read_users_me, OwnedItem};

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/token", post(login))
        .route("/users/me", get(read_users_me))
        .route("/users/me/items", get(read_own_items))
        .route("/health", get(health_check))
}
