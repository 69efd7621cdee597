//! 설정 관리.
//!
//! 기본값, TOML 파일, 환경 변수 순으로 설정을 병합합니다.
//! 환경 변수는 `KEYGATE__` 접두사와 `__` 구분자를 사용합니다
//! (예: `KEYGATE__AUTH__SECRET_KEY`).

use std::path::Path;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::token::{MAX_TOKEN_LIFETIME_SECS, MIN_TOKEN_LIFETIME_SECS};
use crate::user::SeedUser;

/// 기본 액세스 토큰 수명 (분).
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

/// HMAC 서명 키 최소 길이 (바이트).
pub const MIN_SECRET_KEY_LEN: usize = 32;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 설정 에러.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("설정 로드 실패: {0}")]
    Load(#[from] config::ConfigError),

    #[error("서명 키가 너무 짧습니다: 최소 {min}바이트, 현재 {0}바이트", min = MIN_SECRET_KEY_LEN)]
    SecretTooShort(usize),

    #[error("토큰 수명이 허용 범위를 벗어났습니다: {0}분")]
    InvalidLifetime(i64),
}

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 초기 사용자 목록
    #[serde(default)]
    pub users: Vec<SeedUser>,
    /// 데모 사용자(johndoe, alice) 등록 여부
    #[serde(default)]
    pub demo_users: bool,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 동시에 실행할 로그인 검증 수 (Argon2 메모리 사용량 제한)
    pub max_concurrent_logins: usize,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

/// 토큰 서명 알고리즘.
///
/// 대칭키(HMAC) 계열만 지원합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SigningAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

impl From<SigningAlgorithm> for Algorithm {
    fn from(alg: SigningAlgorithm) -> Self {
        match alg {
            SigningAlgorithm::HS256 => Algorithm::HS256,
            SigningAlgorithm::HS384 => Algorithm::HS384,
            SigningAlgorithm::HS512 => Algorithm::HS512,
        }
    }
}

/// 인증 설정.
///
/// 프로세스 시작 시 한 번 로드되며 이후 읽기 전용입니다.
/// 같은 토큰을 검증하는 모든 인스턴스는 동일한 키와 알고리즘을 가져야 합니다.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// 서명 키
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret_key: SecretString,
    /// 서명 알고리즘
    #[serde(default)]
    pub algorithm: SigningAlgorithm,
    /// 액세스 토큰 수명 (분)
    #[serde(default = "default_expire_minutes")]
    pub access_token_expire_minutes: i64,
}

fn default_expire_minutes() -> i64 {
    DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl AuthConfig {
    /// 기본 알고리즘(HS256)과 기본 수명(30분)으로 설정 생성.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: SecretString::from(secret_key.into()),
            algorithm: SigningAlgorithm::default(),
            access_token_expire_minutes: DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
        }
    }

    /// 서명 알고리즘 설정.
    pub fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// 토큰 수명 설정 (분).
    pub fn with_expire_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expire_minutes = minutes;
        self
    }

    /// 액세스 토큰 수명.
    ///
    /// 허용 범위(1초 이상 24시간 이하)를 벗어나면 에러입니다.
    pub fn access_token_lifetime(&self) -> Result<Duration, ConfigError> {
        Duration::try_minutes(self.access_token_expire_minutes)
            .filter(|lifetime| {
                (MIN_TOKEN_LIFETIME_SECS..=MAX_TOKEN_LIFETIME_SECS)
                    .contains(&lifetime.num_seconds())
            })
            .ok_or(ConfigError::InvalidLifetime(self.access_token_expire_minutes))
    }

    /// 설정값 검증.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret_len = self.secret_key.expose_secret().len();
        if secret_len < MIN_SECRET_KEY_LEN {
            return Err(ConfigError::SecretTooShort(secret_len));
        }

        self.access_token_lifetime()?;

        Ok(())
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::build(Some(path.as_ref()))
    }

    /// 기본값과 환경 변수만으로 설정을 로드합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(None)
    }

    /// 기본 경로에 파일이 있으면 사용하고, 없으면 환경 변수만 사용합니다.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Self::from_env()
        }
    }

    fn build(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.max_concurrent_logins", 8)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("auth.algorithm", "HS256")?
            .set_default(
                "auth.access_token_expire_minutes",
                DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
            )?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix("KEYGATE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.auth.validate()?;
        Ok(config)
    }
}
