//! Keygate 운영 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 사용자 테이블에 넣을 비밀번호 해시 생성
//! - 설정된 서명 키로 Bearer 토큰 검사

pub mod commands;
