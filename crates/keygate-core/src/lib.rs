//! # Keygate Core
//!
//! 비밀번호 로그인, Bearer 토큰 발급 및 세션 확인을 위한 인증 코어.
//!
//! 이 크레이트는 HTTP 계층이나 특정 저장소에 의존하지 않습니다:
//! - 비밀번호 해싱/검증 (Argon2id)
//! - 사용자 저장소 추상화 ([`UserStore`])
//! - 서명된 만료 토큰 발급/검증 ([`TokenCodec`])
//! - 로그인 및 현재 사용자 확인 ([`AuthService`])
//! - 설정 관리
//! - 로깅 인프라
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! let config = AppConfig::load_default()?;
//! let store = Arc::new(InMemoryUserStore::from_seeds(&config.users));
//! let service = AuthService::from_config(&config.auth, store)?;
//!
//! let token = service.login(&Credentials::new("johndoe", "secret"))?;
//! let session = service.resolve_current_user(&token.access_token)?;
//! assert_eq!(session.user().username(), "johndoe");
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod password;
pub mod service;
pub mod token;
pub mod user;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, AuthConfig, ConfigError, SigningAlgorithm};
pub use error::{AuthError, AuthResult};
pub use logging::{init_logging, init_logging_from_env, LogConfig, LogFormat};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};
pub use service::{AuthService, AuthenticatedSession, Credentials};
pub use token::{BearerToken, TokenClaims, TokenCodec, TokenError};
pub use user::{InMemoryUserStore, SeedUser, StoreError, UserProfile, UserRecord, UserStore};
