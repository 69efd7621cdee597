//! 모든 핸들러에서 공유되는 애플리케이션 상태.

use std::sync::Arc;
use std::time::Instant;

use keygate_core::AuthService;
use tokio::sync::Semaphore;

/// 동시에 실행할 수 있는 로그인 검증 수 기본값.
///
/// Argon2 검증 한 번이 약 19 MiB를 사용합니다.
pub const DEFAULT_MAX_CONCURRENT_LOGINS: usize = 8;

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
/// 요청 처리 중 쓰기가 없으므로 잠금 없이 공유합니다.
#[derive(Clone)]
pub struct AppState {
    /// 인증 서비스
    pub auth: Arc<AuthService>,

    /// 로그인 검증 동시 실행 제한
    pub login_permits: Arc<Semaphore>,

    /// 서버 시작 시각 (업타임 계산용)
    pub started_at: Instant,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth: Arc::new(auth),
            login_permits: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT_LOGINS)),
            started_at: Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 로그인 검증 동시 실행 수 설정 (최소 1).
    pub fn with_login_concurrency(mut self, limit: usize) -> Self {
        self.login_permits = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    /// 현재 남아 있는 로그인 검증 슬롯 수.
    pub fn available_login_permits(&self) -> usize {
        self.login_permits.available_permits()
    }

    /// 서버 업타임 (초).
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
