//! Keygate API 서버.
//!
//! 설정을 로드하고, 사용자 저장소와 인증 서비스를 구성한 뒤 Axum 서버를 시작합니다.
//!
//! # 환경변수
//!
//! - `KEYGATE_CONFIG`: 설정 파일 경로 (기본값: `config/default.toml`, 없으면 환경변수만 사용)
//! - `KEYGATE__AUTH__SECRET_KEY`: 토큰 서명 키 (32바이트 이상, 필수)
//! - `KEYGATE__SERVER__PORT` 등: 설정 파일 값 오버라이드

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use keygate_api::{create_api_router, AppState};
use keygate_core::{
    init_logging, AppConfig, AuthService, InMemoryUserStore, LogConfig, UserStore,
};

/// 전체 라우터 생성.
fn create_router(state: AppState) -> Router {
    create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
}

/// 설정 파일 경로를 결정하여 로드.
fn load_config() -> anyhow::Result<AppConfig> {
    let config = match std::env::var("KEYGATE_CONFIG") {
        Ok(path) => AppConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        Err(_) => AppConfig::load_default().context("failed to load config")?,
    };
    Ok(config)
}

/// 설정에 따라 사용자 저장소 구성.
fn build_user_store(config: &AppConfig) -> anyhow::Result<Arc<dyn UserStore>> {
    let store = if config.demo_users {
        warn!("Demo users enabled (johndoe, alice); do not use in production");
        let store = InMemoryUserStore::with_demo_users().context("failed to seed demo users")?;
        for seed in &config.users {
            store.insert(seed.into());
        }
        store
    } else {
        InMemoryUserStore::from_seeds(&config.users)
    };

    if store.is_empty() {
        warn!("User store is empty; every login will be rejected");
    }
    info!(users = store.len(), "User store initialized");

    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = load_config()?;

    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    info!("Starting Keygate API server...");

    let store = build_user_store(&config)?;
    let auth = AuthService::from_config(&config.auth, store)?;
    info!(
        algorithm = ?config.auth.algorithm,
        token_lifetime_mins = config.auth.access_token_expire_minutes,
        "Auth service initialized"
    );

    let state = AppState::new(auth).with_login_concurrency(config.server.max_concurrent_logins);
    info!(
        max_concurrent_logins = state.available_login_permits(),
        "Login concurrency limit set"
    );
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    info!(%addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
