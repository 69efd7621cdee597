//! 현재 사용자 endpoint.

use axum::Json;
use keygate_core::UserProfile;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;

/// 사용자 소유 항목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedItem {
    pub item_id: String,
    pub owner: String,
}

/// 현재 사용자 프로필.
///
/// GET /users/me
pub async fn read_users_me(CurrentUser(session): CurrentUser) -> Json<UserProfile> {
    Json(session.profile())
}

/// 현재 사용자 소유 항목.
///
/// GET /users/me/items
pub async fn read_own_items(CurrentUser(session): CurrentUser) -> Json<Vec<OwnedItem>> {
    Json(vec![OwnedItem {
        item_id: "Foo".to_string(),
        owner: session.user().username().to_string(),
    }])
}
