//! 사용자 레코드 및 저장소.
//!
//! 인증 코어는 [`UserStore`] trait에만 의존하며, 구체적인 저장 기술은 알지 못합니다.
//! 해시된 비밀번호는 크레이트 밖으로 노출되지 않습니다.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::password::{hash_password, PasswordError};

/// 저장소 에러.
///
/// 저장소 자체의 장애를 나타내며, "사용자 없음"과는 구분됩니다.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("사용자 저장소를 사용할 수 없습니다: {0}")]
    Unavailable(String),

    #[error("초기 사용자 생성 실패: {0}")]
    Seed(#[from] PasswordError),
}

/// 사용자 레코드.
///
/// 조회 시점의 불변 스냅샷입니다. 직렬화할 수 없으며
/// 외부 응답에는 [`UserProfile`]을 사용합니다.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    username: String,
    full_name: Option<String>,
    email: Option<String>,
    hashed_password: String,
    disabled: bool,
}

impl UserRecord {
    /// 활성 상태의 사용자 레코드 생성.
    ///
    /// # Arguments
    ///
    /// * `username` - 사용자 이름 (고유 키)
    /// * `hashed_password` - PHC 형식 비밀번호 해시
    pub fn new(username: impl Into<String>, hashed_password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            full_name: None,
            email: None,
            hashed_password: hashed_password.into(),
            disabled: false,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub(crate) fn hashed_password(&self) -> &str {
        &self.hashed_password
    }

    /// 외부 노출용 프로필.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            disabled: self.disabled,
        }
    }
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("hashed_password", &"[REDACTED]")
            .field("disabled", &self.disabled)
            .finish()
    }
}

/// 사용자 공개 프로필.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub disabled: bool,
}

/// 설정 파일에서 읽는 초기 사용자.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// `keygate hash-password`로 생성한 PHC 해시
    pub hashed_password: String,
    #[serde(default)]
    pub disabled: bool,
}

impl From<&SeedUser> for UserRecord {
    fn from(seed: &SeedUser) -> Self {
        Self {
            username: seed.username.clone(),
            full_name: seed.full_name.clone(),
            email: seed.email.clone(),
            hashed_password: seed.hashed_password.clone(),
            disabled: seed.disabled,
        }
    }
}

/// 사용자 조회 인터페이스.
///
/// 구현체는 메모리 테이블일 수도, 외부 데이터베이스일 수도 있습니다.
/// 조회 결과는 호출 시점의 스냅샷이며, 구현체는 그 사이 데이터를 변경할 수 있습니다.
pub trait UserStore: Send + Sync {
    /// 사용자 이름으로 조회.
    ///
    /// 사용자가 없으면 `Ok(None)`, 저장소 장애는 `Err`.
    fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;
}

impl<S: UserStore + ?Sized> UserStore for Arc<S> {
    fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        (**self).find_by_username(username)
    }
}

/// 메모리 기반 사용자 저장소.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 설정의 초기 사용자 목록으로 저장소 생성.
    pub fn from_seeds(seeds: &[SeedUser]) -> Self {
        let store = Self::new();
        for seed in seeds {
            store.insert(UserRecord::from(seed));
        }
        store
    }

    /// 데모 사용자가 등록된 저장소 생성.
    ///
    /// - `johndoe` / `secret` (활성)
    /// - `alice` / `secret2` (비활성)
    pub fn with_demo_users() -> Result<Self, StoreError> {
        let store = Self::new();
        store.insert(
            UserRecord::new("johndoe", hash_password("secret")?)
                .with_full_name("John Doe")
                .with_email("johndoe@example.com"),
        );
        store.insert(
            UserRecord::new("alice", hash_password("secret2")?)
                .with_full_name("Alice Wonderson")
                .with_email("alice@example.com")
                .with_disabled(true),
        );
        Ok(store)
    }

    /// 사용자 추가. 같은 이름이 있으면 교체하고 이전 레코드를 반환합니다.
    pub fn insert(&self, user: UserRecord) -> Option<UserRecord> {
        debug!(username = %user.username, "Registering user");
        self.write().insert(user.username.clone(), user)
    }

    /// 사용자 삭제.
    pub fn remove(&self, username: &str) -> Option<UserRecord> {
        self.write().remove(username)
    }

    /// 계정 활성 상태 변경. 사용자가 없으면 `false`.
    pub fn set_disabled(&self, username: &str, disabled: bool) -> bool {
        match self.write().get_mut(username) {
            Some(user) => {
                user.disabled = disabled;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, UserRecord>> {
        self.users.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, UserRecord>> {
        self.users.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.read().get(username).cloned())
    }
}
