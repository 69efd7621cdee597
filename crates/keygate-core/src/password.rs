//! 비밀번호 해싱 및 검증.
//!
//! Argon2id 기반 단방향 해싱. 해시 문자열은 PHC 형식이며 솔트를 포함합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use tracing::warn;

/// 존재하지 않는 사용자 로그인 시 비교 대상으로 쓰는 해시.
///
/// 사용자 유무에 따라 응답 시간이 달라지지 않도록 실제 검증과 같은 비용을 치릅니다.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("keygate-dummy-password").ok());

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

/// 비밀번호 해싱.
///
/// 호출마다 새 솔트를 생성하므로 같은 비밀번호라도 결과가 매번 다릅니다.
///
/// # Returns
///
/// PHC 형식의 해시 문자열 (`$argon2id$v=19$m=19456,t=2,p=1$...`)
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 해시에 기록된 파라미터와 솔트로 다시 계산한 뒤 상수 시간으로 비교합니다.
/// 해시 형식이 잘못된 경우 `false`를 반환합니다.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(error = %PasswordError::InvalidHashFormat, "Stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// 더미 해시에 대해 검증을 수행하고 결과를 버립니다.
pub fn dummy_verify(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// 비밀번호 강도 검증.
///
/// # 요구사항
///
/// - 최소 8자 이상
/// - 최소 1개의 숫자 포함
/// - 최소 1개의 영문자 포함
pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("비밀번호는 최소 8자 이상이어야 합니다");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("비밀번호에 최소 1개의 숫자가 포함되어야 합니다");
    }

    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err("비밀번호에 최소 1개의 영문자가 포함되어야 합니다");
    }

    Ok(())
}
