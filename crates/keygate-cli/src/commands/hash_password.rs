//! 비밀번호 해시 생성.
//!
//! 설정 파일의 `[[users]]` 항목에 넣을 PHC 해시 문자열을 만듭니다.

use std::io::BufRead;

use anyhow::{bail, Context, Result};
use keygate_core::{hash_password, validate_password_strength, verify_password};
use tracing::debug;

/// 해시 생성 설정.
#[derive(Default)]
pub struct HashPasswordConfig {
    /// 인자로 받은 비밀번호 (없으면 표준 입력에서 읽음)
    pub password: Option<String>,
    /// 강도 검사 생략
    pub skip_strength_check: bool,
}

impl std::fmt::Debug for HashPasswordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashPasswordConfig")
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("skip_strength_check", &self.skip_strength_check)
            .finish()
    }
}

/// 입력에서 비밀번호 한 줄을 읽습니다.
///
/// 줄바꿈 문자(`\n`, `\r\n`)만 제거하고 나머지 공백은 그대로 둡니다.
pub fn read_password<R: BufRead>(mut reader: R) -> Result<String> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    if read == 0 {
        bail!("no password provided on stdin");
    }

    let password = line.trim_end_matches(['\n', '\r']).to_string();
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}

/// 비밀번호를 해싱하여 PHC 문자열을 반환합니다.
pub fn run<R: BufRead>(config: HashPasswordConfig, stdin: R) -> Result<String> {
    let password = match config.password {
        Some(password) => password,
        None => read_password(stdin)?,
    };

    if config.skip_strength_check {
        debug!("Password strength check skipped");
    } else if let Err(reason) = validate_password_strength(&password) {
        bail!("weak password: {}", reason);
    }

    let hash = hash_password(&password).context("failed to hash password")?;

    // 생성 직후 자체 검증
    if !verify_password(&password, &hash) {
        bail!("generated hash failed verification");
    }

    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_hash_from_argument() {
        let hash = run(
            HashPasswordConfig {
                password: Some("Passw0rd!".to_string()),
                skip_strength_check: false,
            },
            Cursor::new(""),
        )
        .unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Passw0rd!", &hash));
    }

    #[test]
    fn test_hash_from_stdin() {
        let hash = run(HashPasswordConfig::default(), Cursor::new("stdinPass1\r\n")).unwrap();
        assert!(verify_password("stdinPass1", &hash));
    }

    #[test]
    fn test_weak_password_rejected() {
        let err = run(
            HashPasswordConfig {
                password: Some("secret".to_string()),
                skip_strength_check: false,
            },
            Cursor::new(""),
        )
        .unwrap_err();
        assert!(err.to_string().contains("weak password"));
    }

    #[test]
    fn test_skip_strength_check() {
        let hash = run(
            HashPasswordConfig {
                password: Some("secret".to_string()),
                skip_strength_check: true,
            },
            Cursor::new(""),
        )
        .unwrap();
        assert!(verify_password("secret", &hash));
    }

    #[test]
    fn test_read_password_keeps_inner_spaces() {
        assert_eq!(
            read_password(Cursor::new(" pass word 1 \n")).unwrap(),
            " pass word 1 "
        );
    }

    #[test]
    fn test_read_password_empty_input() {
        assert!(read_password(Cursor::new("")).is_err());
        assert!(read_password(Cursor::new("\n")).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = HashPasswordConfig {
            password: Some("Passw0rd!".to_string()),
            skip_strength_check: false,
        };
        assert!(!format!("{:?}", config).contains("Passw0rd!"));
    }
}
