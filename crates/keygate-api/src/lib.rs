//! 로그인 및 Bearer 토큰 HTTP 엔드포인트.
//!
//! `keygate-core`의 [`AuthService`](keygate_core::AuthService)를 Axum 라우터로 노출합니다.
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: `Authorization: Bearer` 헤더 추출기
//! - [`error`]: HTTP 에러 응답

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use auth::CurrentUser;
pub use error::{ApiError, ErrorResponse};
pub use routes::create_api_router;
pub use state::AppState;
