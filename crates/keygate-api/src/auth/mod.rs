//! 요청 인증.
//!
//! `Authorization: Bearer <token>` 헤더에서 토큰을 꺼내
//! [`AuthService::resolve_current_user`](keygate_core::AuthService::resolve_current_user)로 확인합니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(CurrentUser(session): CurrentUser) -> impl IntoResponse {
//!     format!("Hello, {}!", session.user().username())
//! }
//! ```

mod middleware;

pub use middleware::{bearer_token, CurrentUser};
