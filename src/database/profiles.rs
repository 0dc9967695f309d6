use std::collections::HashMap;

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Profile, WatchlistEntry};
use crate::filter::{Collection, Column, ColumnKind, SortDirection};
use crate::types::RoleName;

pub static PROFILES: Collection = Collection {
    table: "profiles",
    columns: &[
        Column::new("id", "id", ColumnKind::Uuid),
        Column::new("user", "user_id", ColumnKind::Uuid),
        Column::new("owner", "owner_id", ColumnKind::Uuid),
        Column::new("name", "name", ColumnKind::Text),
        Column::new("avatar", "avatar", ColumnKind::Text),
        Column::new("type", "profile_type", ColumnKind::Text),
        Column::new("email", "email", ColumnKind::Text),
        Column::new("createdAt", "created_at", ColumnKind::Timestamp),
        Column::new("updatedAt", "updated_at", ColumnKind::Timestamp),
    ],
    search_fields: &["name", "email"],
    default_sort: &[("createdAt", SortDirection::Asc)],
};

const SELECT_PROFILE: &str = "SELECT id, user_id, owner_id, name, avatar, profile_type, email, \
     created_at, updated_at FROM profiles";

const RETURNING_PROFILE: &str =
    "RETURNING id, user_id, owner_id, name, avatar, profile_type, email, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewProfile<'a> {
    pub user_id: Uuid,
    pub owner_id: Uuid,
    pub name: &'a str,
    pub avatar: &'a str,
    pub profile_type: RoleName,
    pub email: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<String>,
    pub profile_type: Option<RoleName>,
}

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Profile>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let profile = sqlx::query_as::<_, Profile>(&format!("{} WHERE id = $1", SELECT_PROFILE))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(profile)
}

pub async fn list_by_owner<'e, E>(executor: E, owner_id: Uuid) -> Result<Vec<Profile>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let profiles = sqlx::query_as::<_, Profile>(&format!(
        "{} WHERE owner_id = $1 ORDER BY created_at, id",
        SELECT_PROFILE
    ))
    .bind(owner_id)
    .fetch_all(executor)
    .await?;
    Ok(profiles)
}

pub async fn list_by_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Profile>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let profiles = sqlx::query_as::<_, Profile>(&format!(
        "{} WHERE user_id = $1 ORDER BY created_at, id",
        SELECT_PROFILE
    ))
    .bind(user_id)
    .fetch_all(executor)
    .await?;
    Ok(profiles)
}

pub async fn email_taken<'e, E>(executor: E, email: &str, except: Option<Uuid>) -> Result<bool, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM profiles WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(email)
    .bind(except)
    .fetch_one(executor)
    .await?;
    Ok(taken)
}

pub async fn insert<'e, E>(executor: E, new_profile: NewProfile<'_>) -> Result<Profile, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO profiles (id, user_id, owner_id, name, avatar, profile_type, email) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) {}",
        RETURNING_PROFILE
    );

    let profile = sqlx::query_as::<_, Profile>(&sql)
        .bind(Uuid::new_v4())
        .bind(new_profile.user_id)
        .bind(new_profile.owner_id)
        .bind(new_profile.name)
        .bind(new_profile.avatar)
        .bind(new_profile.profile_type.as_str())
        .bind(new_profile.email)
        .fetch_one(executor)
        .await?;
    Ok(profile)
}

pub async fn update<'e, E>(executor: E, id: Uuid, changes: &ProfileChanges) -> Result<Option<Profile>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "UPDATE profiles SET \
             name = COALESCE($2, name), \
             avatar = COALESCE($3, avatar), \
             email = COALESCE($4, email), \
             profile_type = COALESCE($5, profile_type), \
             updated_at = now() \
         WHERE id = $1 {}",
        RETURNING_PROFILE
    );

    let profile = sqlx::query_as::<_, Profile>(&sql)
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.avatar.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.profile_type.map(|t| t.as_str()))
        .fetch_optional(executor)
        .await?;
    Ok(profile)
}

pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn watchlist_for<'e, E>(executor: E, profile_id: Uuid) -> Result<Vec<WatchlistEntry>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let entries = sqlx::query_as::<_, WatchlistEntry>(
        "SELECT profile_id, movie_id, added_at FROM watchlist_entries \
         WHERE profile_id = $1 ORDER BY added_at, movie_id",
    )
    .bind(profile_id)
    .fetch_all(executor)
    .await?;
    Ok(entries)
}

/// Load the watchlists of several profiles in one query, keyed by profile id
pub async fn watchlists_for<'e, E>(
    executor: E,
    profile_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<WatchlistEntry>>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let entries = sqlx::query_as::<_, WatchlistEntry>(
        "SELECT profile_id, movie_id, added_at FROM watchlist_entries \
         WHERE profile_id = ANY($1) ORDER BY added_at, movie_id",
    )
    .bind(profile_ids)
    .fetch_all(executor)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<WatchlistEntry>> = HashMap::new();
    for entry in entries {
        grouped.entry(entry.profile_id).or_default().push(entry);
    }
    Ok(grouped)
}

/// `None` when the movie is already on the watchlist
pub async fn add_to_watchlist<'e, E>(
    executor: E,
    profile_id: Uuid,
    movie_id: Uuid,
) -> Result<Option<WatchlistEntry>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let entry = sqlx::query_as::<_, WatchlistEntry>(
        "INSERT INTO watchlist_entries (profile_id, movie_id) VALUES ($1, $2) \
         ON CONFLICT (profile_id, movie_id) DO NOTHING \
         RETURNING profile_id, movie_id, added_at",
    )
    .bind(profile_id)
    .bind(movie_id)
    .fetch_optional(executor)
    .await?;
    Ok(entry)
}

pub async fn remove_from_watchlist<'e, E>(executor: E, profile_id: Uuid, movie_id: Uuid) -> Result<bool, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM watchlist_entries WHERE profile_id = $1 AND movie_id = $2")
        .bind(profile_id)
        .bind(movie_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Attach each profile's watchlist in place
pub async fn attach_watchlists<'e, E>(executor: E, profiles: &mut [Profile]) -> Result<(), DatabaseError>
where
    E: PgExecutor<'e>,
{
    let ids: Vec<Uuid> = profiles.iter().map(|p| p.id).collect();
    let mut grouped = watchlists_for(executor, &ids).await?;
    for profile in profiles.iter_mut() {
        profile.watchlist = Some(grouped.remove(&profile.id).unwrap_or_default());
    }
    Ok(())
}
