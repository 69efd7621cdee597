//! 인증 에러 타입.
//!
//! [`AuthService`](crate::AuthService) 경계에서 모든 내부 에러는 아래 네 가지로 수렴합니다.
//! 서명 검증 진단, 저장소 에러 메시지 등 내부 상세는 이 경계를 넘지 않습니다.

use thiserror::Error;

/// 인증 결과 에러.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// 사용자 없음 또는 비밀번호 불일치 (구분하지 않음)
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// 토큰 누락/손상/만료/서명 불일치, 또는 토큰 주체가 더 이상 존재하지 않음
    #[error("Could not validate credentials")]
    Unauthenticated,

    /// 유효한 토큰이지만 비활성 계정
    #[error("Inactive user")]
    ForbiddenInactive,

    /// 저장소 또는 서명 장애
    #[error("Authentication service unavailable")]
    Unavailable,
}

/// 인증 작업을 위한 Result 타입.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// 대응하는 HTTP 상태 코드.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials | AuthError::Unauthenticated => 401,
            AuthError::ForbiddenInactive => 403,
            AuthError::Unavailable => 500,
        }
    }

    /// 에러 코드 문자열.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::ForbiddenInactive => "INACTIVE_USER",
            AuthError::Unavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// 재인증이 필요한 에러인지 확인합니다.
    ///
    /// HTTP 계층은 이 경우 `WWW-Authenticate: Bearer` 헤더를 붙입니다.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::Unauthenticated
        )
    }
}
