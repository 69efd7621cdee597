//! Bearer 토큰 검사.
//!
//! 설정된 서명 키와 알고리즘으로 토큰을 검증하고 주체와 만료 시각을 보여줍니다.
//! 검증에 실패한 토큰의 내용은 출력하지 않습니다.

use std::fmt;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use keygate_core::{AppConfig, TokenCodec, TokenError};
use tracing::info;

/// 토큰 검사 설정.
#[derive(Debug)]
pub struct InspectTokenConfig {
    /// 검사할 토큰 문자열
    pub token: String,
    /// 설정 파일 경로 (없으면 기본 경로 또는 환경 변수)
    pub config_path: Option<String>,
}

/// 검증된 토큰 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReport {
    pub subject: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub remaining: Duration,
}

impl fmt::Display for TokenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format_time = |t: Option<DateTime<Utc>>| {
            t.map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "-".to_string())
        };

        writeln!(f, "subject:    {}", self.subject)?;
        writeln!(f, "issued at:  {}", format_time(self.issued_at))?;
        writeln!(f, "expires at: {}", format_time(self.expires_at))?;
        write!(f, "remaining:  {}s", self.remaining.num_seconds())
    }
}

/// 주어진 시각 기준으로 토큰을 검사합니다.
pub fn inspect(codec: &TokenCodec, token: &str, now: DateTime<Utc>) -> Result<TokenReport> {
    let claims = codec.decode_at(token.trim(), now).map_err(|e| match e {
        TokenError::Expired => anyhow::anyhow!("token has expired"),
        _ => anyhow::anyhow!("token is invalid for the configured secret and algorithm"),
    })?;

    let expires_at = claims.expires_at();
    let remaining = expires_at
        .map(|exp| exp - now)
        .unwrap_or_else(Duration::zero);

    Ok(TokenReport {
        subject: claims.subject().to_string(),
        issued_at: claims.issued_at(),
        expires_at,
        remaining,
    })
}

/// 설정을 로드한 뒤 현재 시각 기준으로 토큰을 검사합니다.
pub fn run(config: InspectTokenConfig) -> Result<TokenReport> {
    let app_config = match &config.config_path {
        Some(path) => {
            AppConfig::load(path).with_context(|| format!("failed to load config from {}", path))?
        }
        None => AppConfig::load_default().context("failed to load config")?,
    };

    let codec = TokenCodec::new(&app_config.auth);
    info!(algorithm = ?app_config.auth.algorithm, "Inspecting token");

    inspect(&codec, &config.token, Utc::now())
}
