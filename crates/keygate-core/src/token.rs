//! JWT 액세스 토큰 발급 및 검증.
//!
//! 토큰은 자체 완결적이며 서버 측 세션 테이블이 없습니다.
//! 검증은 서명 확인과 만료 확인만으로 끝나며 I/O가 없습니다.
//! 서버 측 폐기 수단은 없으므로 유출된 토큰은 만료 시점까지 유효합니다.

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::config::AuthConfig;

/// 토큰 수명 하한 (초).
pub const MIN_TOKEN_LIFETIME_SECS: i64 = 1;

/// 토큰 수명 상한 (초, 24시간).
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// 토큰 타입 (항상 "Bearer").
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// JWT 액세스 토큰 페이로드.
///
/// [`TokenCodec::issue`]만 생성하며, 외부에서는 디코딩 결과로만 얻습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject - 사용자 이름
    sub: String,
    /// Issued At (Unix timestamp)
    iat: i64,
    /// Expiration (Unix timestamp)
    exp: i64,
}

impl TokenClaims {
    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// 주어진 시각에 만료되었는지 확인 (`exp <= now`).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

/// 토큰 수명이 허용 범위 안인지 확인하고 초 단위 값을 반환합니다.
pub fn check_lifetime(lifetime: Duration) -> Result<i64, TokenError> {
    let lifetime_secs = lifetime.num_seconds();
    if !(MIN_TOKEN_LIFETIME_SECS..=MAX_TOKEN_LIFETIME_SECS).contains(&lifetime_secs) {
        return Err(TokenError::InvalidLifetime(lifetime_secs));
    }
    Ok(lifetime_secs)
}

/// 발급된 Bearer 토큰.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken {
    /// 서명된 JWT 문자열
    pub access_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
}

/// 토큰 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("토큰 수명이 허용 범위를 벗어났습니다: {0}초")]
    InvalidLifetime(i64),
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("유효하지 않은 토큰")]
    Invalid,
}

/// 토큰 발급/검증기.
///
/// 프로세스 전역 서명 키와 고정 알고리즘을 보관합니다.
/// 생성 이후 읽기 전용이므로 여러 스레드에서 공유할 수 있습니다.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// 인증 설정으로 생성.
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.secret_key.expose_secret().as_bytes();
        let algorithm = Algorithm::from(config.algorithm);

        // 만료는 주입된 시계로 직접 확인
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock: Arc::new(SystemClock),
        }
    }

    /// 시간 소스 교체.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 액세스 토큰 발급.
    ///
    /// # Arguments
    ///
    /// * `subject` - 토큰 주체 (사용자 이름)
    /// * `lifetime` - 토큰 수명 (1초 이상 24시간 이하)
    pub fn issue(&self, subject: &str, lifetime: Duration) -> Result<BearerToken, TokenError> {
        self.issue_at(subject, lifetime, self.clock.now())
    }

    /// 지정한 시각을 발급 시각으로 토큰 발급.
    ///
    /// 발급 시각은 초 단위로 내림하여 `iat`에 그대로 기록하고, `exp = iat + lifetime`입니다.
    pub fn issue_at(
        &self,
        subject: &str,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<BearerToken, TokenError> {
        let lifetime_secs = check_lifetime(lifetime)?;
        let now = now.trunc_subsecs(0);

        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(lifetime_secs)).timestamp(),
        };

        let access_token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?;

        Ok(BearerToken {
            access_token,
            token_type: BEARER_TOKEN_TYPE.to_string(),
        })
    }

    /// 토큰 디코딩 및 검증.
    ///
    /// 서명, 알고리즘, 구조, 만료를 모두 확인합니다.
    /// `exp`가 현재 시각 이하이면 만료로 처리하며 유예 시간은 없습니다.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.decode_at(token, self.clock.now())
    }

    /// 지정한 시각 기준으로 토큰 디코딩 및 검증.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::Invalid)?;

        if data.claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::SigningAlgorithm;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn codec_with_clock() -> (TokenCodec, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = TokenCodec::new(&AuthConfig::new(TEST_SECRET)).with_clock(clock.clone());
        (codec, clock)
    }

    #[test]
    fn test_issue_and_decode() {
        let codec = TokenCodec::new(&AuthConfig::new(TEST_SECRET));

        let token = codec.issue("johndoe", Duration::minutes(30)).unwrap();
        assert!(!token.access_token.is_empty());
        assert_eq!(token.token_type, "Bearer");

        let claims = codec.decode(&token.access_token).unwrap();
        assert_eq!(claims.subject(), "johndoe");
    }

    #[test]
    fn test_expiry_is_issue_time_plus_lifetime() {
        let (codec, clock) = codec_with_clock();
        let issued = clock.now();

        let token = codec.issue("johndoe", Duration::minutes(30)).unwrap();
        let claims = codec.decode(&token.access_token).unwrap();

        assert_eq!(
            claims.expires_at().unwrap().timestamp(),
            (issued + Duration::minutes(30)).timestamp()
        );
        assert_eq!(claims.issued_at().unwrap().timestamp(), issued.timestamp());
    }

    #[test]
    fn test_subsecond_issue_instant_keeps_full_lifetime() {
        let start = DateTime::from_timestamp(1_700_000_000, 900_000_000).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let codec = TokenCodec::new(&AuthConfig::new(TEST_SECRET)).with_clock(clock.clone());

        let token = codec.issue("johndoe", Duration::seconds(1)).unwrap();
        let claims = codec.decode(&token.access_token).unwrap();

        // 발급 시각은 초 단위로 기록되고 만료는 정확히 그 시각 + 수명
        let issued = claims.issued_at().unwrap();
        assert_eq!(issued, DateTime::from_timestamp(1_700_000_000, 0).unwrap());
        assert_eq!(claims.expires_at(), Some(issued + Duration::seconds(1)));

        clock.set(issued + Duration::milliseconds(999));
        assert!(codec.decode(&token.access_token).is_ok());

        clock.set(issued + Duration::seconds(1));
        assert!(matches!(
            codec.decode(&token.access_token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_lifetime_check() {
        assert_eq!(check_lifetime(Duration::seconds(1)).unwrap(), 1);
        assert_eq!(check_lifetime(Duration::hours(24)).unwrap(), 86_400);
        assert!(matches!(
            check_lifetime(Duration::zero()),
            Err(TokenError::InvalidLifetime(0))
        ));
        assert!(check_lifetime(Duration::hours(24) + Duration::seconds(1)).is_err());
    }

    #[test]
    fn test_expiry_boundary() {
        let (codec, clock) = codec_with_clock();
        let token = codec.issue("johndoe", Duration::seconds(60)).unwrap();

        clock.advance(Duration::seconds(59));
        assert!(codec.decode(&token.access_token).is_ok());

        clock.advance(Duration::seconds(1));
        assert!(matches!(
            codec.decode(&token.access_token),
            Err(TokenError::Expired)
        ));

        clock.advance(Duration::hours(1));
        assert!(matches!(
            codec.decode(&token.access_token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_explicit_time_variants() {
        let codec = TokenCodec::new(&AuthConfig::new(TEST_SECRET));
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let token = codec
            .issue_at("johndoe", Duration::minutes(30), issued)
            .unwrap();

        let claims = codec
            .decode_at(&token.access_token, issued + Duration::minutes(29))
            .unwrap();
        assert_eq!(claims.issued_at(), Some(issued));
        assert_eq!(claims.expires_at(), Some(issued + Duration::minutes(30)));

        assert!(matches!(
            codec.decode_at(&token.access_token, issued + Duration::minutes(30)),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_non_positive_or_unbounded_lifetime_rejected() {
        let codec = TokenCodec::new(&AuthConfig::new(TEST_SECRET));

        assert!(matches!(
            codec.issue("johndoe", Duration::zero()),
            Err(TokenError::InvalidLifetime(0))
        ));
        assert!(matches!(
            codec.issue("johndoe", Duration::seconds(-10)),
            Err(TokenError::InvalidLifetime(-10))
        ));
        assert!(matches!(
            codec.issue("johndoe", Duration::milliseconds(500)),
            Err(TokenError::InvalidLifetime(0))
        ));
        assert!(codec.issue("johndoe", Duration::hours(24)).is_ok());
        assert!(codec.issue("johndoe", Duration::hours(25)).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let codec = TokenCodec::new(&AuthConfig::new(TEST_SECRET));

        assert!(matches!(
            codec.decode("invalid.token.here"),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(codec.decode(""), Err(TokenError::Invalid)));
        assert!(matches!(codec.decode("no-dots"), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_wrong_secret() {
        let codec = TokenCodec::new(&AuthConfig::new(TEST_SECRET));
        let other = TokenCodec::new(&AuthConfig::new(
            "wrong-secret-key-for-testing-minimum-32-chars",
        ));

        let token = codec.issue("johndoe", Duration::minutes(30)).unwrap();
        assert!(matches!(
            other.decode(&token.access_token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let hs256 = TokenCodec::new(&AuthConfig::new(TEST_SECRET));
        let hs512 = TokenCodec::new(
            &AuthConfig::new(TEST_SECRET).with_algorithm(SigningAlgorithm::HS512),
        );

        let token = hs512.issue("johndoe", Duration::minutes(30)).unwrap();
        assert!(hs512.decode(&token.access_token).is_ok());
        assert!(matches!(
            hs256.decode(&token.access_token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let codec = TokenCodec::new(&AuthConfig::new(TEST_SECRET));
        let token = codec.issue("johndoe", Duration::minutes(30)).unwrap();

        let sig_start = token.access_token.rfind('.').unwrap() + 1;
        let mut bytes = token.access_token.into_bytes();
        bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(matches!(codec.decode(&tampered), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = TokenCodec::new(&AuthConfig::new(TEST_SECRET));
        let admin = codec.issue("admin", Duration::minutes(30)).unwrap();
        let user = codec.issue("johndoe", Duration::minutes(30)).unwrap();

        // johndoe의 서명에 admin 페이로드를 붙임
        let admin_parts: Vec<&str> = admin.access_token.split('.').collect();
        let user_parts: Vec<&str> = user.access_token.split('.').collect();
        let forged = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

        assert!(matches!(codec.decode(&forged), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let codec = TokenCodec::new(&AuthConfig::new(TEST_SECRET));
        let token = codec.issue("johndoe", Duration::minutes(30)).unwrap();

        // alg=none 헤더로 교체하고 서명 제거
        let payload = token.access_token.split('.').nth(1).unwrap();
        let none_header = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
        let unsigned = format!("{}.{}.", none_header, payload);

        assert!(matches!(codec.decode(&unsigned), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_bearer_token_json_shape() {
        let codec = TokenCodec::new(&AuthConfig::new(TEST_SECRET));
        let token = codec.issue("johndoe", Duration::minutes(30)).unwrap();

        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["access_token"], token.access_token);
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_debug_does_not_leak_keys() {
        let codec = TokenCodec::new(&AuthConfig::new(TEST_SECRET));
        let debug = format!("{:?}", codec);
        assert!(!debug.contains(TEST_SECRET));
        assert!(debug.contains("HS256"));
    }
}
