use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::RoleName;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub name: String,
    pub avatar: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub profile_type: RoleName,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Loaded separately; absent from listings that exclude it
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watchlist: Option<Vec<WatchlistEntry>>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    #[serde(skip_serializing)]
    pub profile_id: Uuid,
    #[serde(rename = "movie")]
    pub movie_id: Uuid,
    pub added_at: DateTime<Utc>,
}
