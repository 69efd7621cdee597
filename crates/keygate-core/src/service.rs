//! 로그인 및 세션 확인.
//!
//! [`AuthService`]는 사용자 저장소, 비밀번호 검증, 토큰 발급/검증을 조합합니다.
//! 각 호출은 독립적이며 공유 상태를 쓰지 않으므로 동시에 실행할 수 있습니다.
//!
//! # 세션 확인 순서
//!
//! 1. 토큰 서명 및 만료
//! 2. 토큰 주체의 존재 여부
//! 3. 계정 활성 상태
//!
//! 비활성 계정 응답은 반드시 서명과 만료가 확인된 이후에만 나갑니다.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, error, info, warn};

use crate::config::{AuthConfig, ConfigError};
use crate::error::{AuthError, AuthResult};
use crate::password::{dummy_verify, verify_password};
use crate::token::{check_lifetime, BearerToken, TokenCodec, TokenError};
use crate::user::{UserProfile, UserRecord, UserStore};

/// 로그인 자격증명.
///
/// 요청마다 생성되고 검증 직후 폐기됩니다.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// 토큰 검증을 통과한 인증 세션.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    user: UserRecord,
}

impl AuthenticatedSession {
    /// 현재 사용자 레코드.
    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    /// 외부 노출용 프로필.
    pub fn profile(&self) -> UserProfile {
        self.user.profile()
    }
}

/// 인증 서비스.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    codec: TokenCodec,
    token_lifetime: Duration,
}

impl AuthService {
    /// 서비스 생성.
    ///
    /// # Arguments
    ///
    /// * `store` - 사용자 저장소
    /// * `codec` - 토큰 발급/검증기
    /// * `token_lifetime` - 발급 토큰 수명 (프로세스 전역 정책, 1초 이상 24시간 이하)
    ///
    /// 수명이 범위를 벗어나면 모든 로그인이 실패하게 되므로 생성 시점에 거부합니다.
    pub fn new(
        store: Arc<dyn UserStore>,
        codec: TokenCodec,
        token_lifetime: Duration,
    ) -> Result<Self, TokenError> {
        check_lifetime(token_lifetime)?;
        Ok(Self {
            store,
            codec,
            token_lifetime,
        })
    }

    /// 인증 설정으로 서비스 생성.
    ///
    /// 설정값을 먼저 검증합니다.
    pub fn from_config(config: &AuthConfig, store: Arc<dyn UserStore>) -> Result<Self, ConfigError> {
        config.validate()?;
        let lifetime = config.access_token_lifetime()?;
        Self::new(store, TokenCodec::new(config), lifetime)
            .map_err(|_| ConfigError::InvalidLifetime(config.access_token_expire_minutes))
    }

    /// 토큰 발급/검증기.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// 발급 토큰 수명.
    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// 비밀번호 로그인.
    ///
    /// 사용자가 없는 경우와 비밀번호가 틀린 경우를 같은 에러로 보고합니다.
    /// Argon2 검증은 CPU 집약적이므로 비동기 런타임에서는 blocking 스레드에서 호출해야 합니다.
    pub fn login(&self, credentials: &Credentials) -> AuthResult<BearerToken> {
        let user = match self.lookup(&credentials.username)? {
            Some(user) => user,
            None => {
                // 응답 시간으로 사용자 존재 여부가 드러나지 않도록 동일 비용 검증
                dummy_verify(&credentials.password);
                info!(username = %credentials.username, "Login rejected: unknown user");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(&credentials.password, user.hashed_password()) {
            info!(username = %credentials.username, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .codec
            .issue(user.username(), self.token_lifetime)
            .map_err(|e| {
                error!(error = %e, "Failed to issue access token");
                AuthError::Unavailable
            })?;

        info!(
            username = %user.username(),
            expires_in_secs = self.token_lifetime.num_seconds(),
            "Access token issued"
        );
        Ok(token)
    }

    /// Bearer 토큰으로 현재 사용자 확인.
    pub fn resolve_current_user(&self, token: &str) -> AuthResult<AuthenticatedSession> {
        let claims = self.codec.decode(token).map_err(|e| {
            match e {
                TokenError::Expired => debug!("Token rejected: expired"),
                _ => debug!("Token rejected: invalid"),
            }
            AuthError::Unauthenticated
        })?;

        let subject = claims.subject();
        if subject.is_empty() {
            debug!("Token rejected: empty subject");
            return Err(AuthError::Unauthenticated);
        }

        let user = self.lookup(subject)?.ok_or_else(|| {
            info!(username = %subject, "Token subject no longer exists");
            AuthError::Unauthenticated
        })?;

        if user.is_disabled() {
            info!(username = %subject, "Token rejected: inactive user");
            return Err(AuthError::ForbiddenInactive);
        }

        Ok(AuthenticatedSession { user })
    }

    fn lookup(&self, username: &str) -> AuthResult<Option<UserRecord>> {
        self.store.find_by_username(username).map_err(|e| {
            warn!(error = %e, "User store lookup failed");
            AuthError::Unavailable
        })
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("codec", &self.codec)
            .field("token_lifetime", &self.token_lifetime)
            .finish_non_exhaustive()
    }
}
