use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::api::parse_id;
use crate::api::validate::{normalize_email, Validator};
use crate::app::AppState;
use crate::auth::password::hash_password;
use crate::auth::policy::{authorize, Action, Resource};
use crate::config::AppConfig;
use crate::database::models::{Profile, WatchlistEntry};
use crate::database::profiles::{self, ProfileChanges, PROFILES};
use crate::database::users::{self, UserChanges};
use crate::database::{movies, roles, DatabaseError, ListPage, QueryBuilder};
use crate::error::ApiError;
use crate::filter::{Filter, FilterOptions, FilterValue};
use crate::middleware::AuthUser;
use crate::types::RoleName;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Role name; also becomes the profile type
    pub role: Option<String>,
}

impl UpdateProfileRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut validator = Validator::new();
        if let Some(name) = &self.name {
            validator.required(Some(name.as_str()), "name");
        }
        if self.email.is_some() {
            validator.email(self.email.as_deref());
        }
        if self.username.is_some() {
            validator.username(self.username.as_deref());
        }
        if self.password.is_some() {
            validator.password(self.password.as_deref());
        }
        validator.finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWatchlistRequest {
    pub movie_id: Option<String>,
}

/// Profile reads and writes on behalf of an authenticated caller
pub struct ProfileService {
    pool: PgPool,
    config: Arc<AppConfig>,
}

impl ProfileService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
            config: state.config.clone(),
        }
    }

    /// Filtered listing of the profiles the caller owns
    pub async fn list_owned(&self, caller: &AuthUser, params: &HashMap<String, String>) -> Result<ListPage, ApiError> {
        authorize(caller, Resource::Account, Action::ListProfiles).into_result()?;

        let mut filter = Filter::from_query(&PROFILES, params, FilterOptions::from(&self.config.filter))?;
        filter.scope("owner", FilterValue::Uuid(caller.id))?;

        Ok(QueryBuilder::new(filter).list(&self.pool).await?)
    }

    /// Owners see every profile of their account, everyone else their own
    pub async fn mine(&self, caller: &AuthUser) -> Result<Vec<Profile>, ApiError> {
        let mut found = if caller.role.is_account_owner() {
            profiles::list_by_owner(&self.pool, caller.id).await?
        } else {
            profiles::list_by_user(&self.pool, caller.id).await?
        };
        profiles::attach_watchlists(&self.pool, &mut found).await?;
        Ok(found)
    }

    pub async fn get(&self, caller: &AuthUser, raw_id: &str) -> Result<Profile, ApiError> {
        let mut profile = self.load(caller, raw_id, Action::ReadProfile).await?;
        profile.watchlist = Some(profiles::watchlist_for(&self.pool, profile.id).await?);
        Ok(profile)
    }

    pub async fn update(&self, caller: &AuthUser, raw_id: &str, req: UpdateProfileRequest) -> Result<Profile, ApiError> {
        let profile = self.load(caller, raw_id, Action::UpdateProfile).await?;
        req.validate()?;

        let role = match req.role.as_deref().map(str::trim) {
            None => None,
            Some(requested) => {
                authorize(caller, Resource::Profile(&profile), Action::ChangeProfileRole).into_result()?;
                let name: RoleName = requested
                    .parse()
                    .map_err(|_| ApiError::bad_request(format!("Invalid role: {}", requested)))?;
                if name.is_account_owner() {
                    return Err(ApiError::bad_request("A profile cannot be promoted to account_owner"));
                }
                let role = roles::find_by_name(&self.pool, name)
                    .await?
                    .ok_or_else(|| ApiError::bad_request(format!("Invalid role: {}", requested)))?;
                Some(role)
            }
        };

        let email = req.email.as_deref().map(normalize_email);
        let username = req.username.as_deref().map(|u| u.trim().to_string());

        if let Some(email) = &email {
            if users::email_taken(&self.pool, email, Some(profile.user_id)).await?
                || profiles::email_taken(&self.pool, email, Some(profile.id)).await?
            {
                return Err(ApiError::conflict("Email already registered by another user"));
            }
        }
        if let Some(username) = &username {
            if users::username_taken(&self.pool, username, Some(profile.user_id)).await? {
                return Err(ApiError::conflict("Username already taken by another user"));
            }
        }

        let password_hash = req.password.as_deref().map(hash_password).transpose()?;

        let profile_changes = ProfileChanges {
            name: req.name.as_deref().map(|n| n.trim().to_string()),
            avatar: req.avatar,
            email: email.clone(),
            profile_type: role.as_ref().map(|r| r.name),
        };
        let user_changes = UserChanges {
            username,
            email,
            password_hash,
            role_id: role.as_ref().map(|r| r.id),
        };

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        let mut updated = profiles::update(&mut *tx, profile.id, &profile_changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Profile not found"))?;
        if !user_changes.is_empty() {
            users::update(&mut *tx, profile.user_id, &user_changes)
                .await?
                .ok_or_else(|| ApiError::not_found("Related user not found"))?;
        }
        tx.commit().await.map_err(DatabaseError::from)?;

        updated.watchlist = Some(profiles::watchlist_for(&self.pool, updated.id).await?);
        Ok(updated)
    }

    /// Removes the profile and its paired user; the owner profile is kept
    pub async fn delete(&self, caller: &AuthUser, raw_id: &str) -> Result<(), ApiError> {
        let profile = self.load(caller, raw_id, Action::DeleteProfile).await?;
        if profile.profile_type.is_account_owner() {
            return Err(ApiError::bad_request("The main profile cannot be deleted"));
        }

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        profiles::delete(&mut *tx, profile.id).await?;
        users::delete(&mut *tx, profile.user_id).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!("Profile {} and user {} deleted by {}", profile.id, profile.user_id, caller.id);
        Ok(())
    }

    pub async fn watchlist(&self, caller: &AuthUser, raw_id: &str) -> Result<Vec<WatchlistEntry>, ApiError> {
        let profile = self.load(caller, raw_id, Action::ManageWatchlist).await?;
        Ok(profiles::watchlist_for(&self.pool, profile.id).await?)
    }

    pub async fn add_to_watchlist(
        &self,
        caller: &AuthUser,
        raw_id: &str,
        req: AddToWatchlistRequest,
    ) -> Result<Profile, ApiError> {
        let mut profile = self.load(caller, raw_id, Action::ManageWatchlist).await?;

        let raw_movie = req
            .movie_id
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ApiError::bad_request("movieId is required"))?;
        let movie_id = parse_id(raw_movie, "Movie")?;
        if movies::find_by_id(&self.pool, movie_id).await?.is_none() {
            return Err(ApiError::not_found("Movie not found"));
        }

        if profiles::add_to_watchlist(&self.pool, profile.id, movie_id).await?.is_none() {
            return Err(ApiError::conflict("Movie already in watchlist"));
        }

        profile.watchlist = Some(profiles::watchlist_for(&self.pool, profile.id).await?);
        Ok(profile)
    }

    pub async fn remove_from_watchlist(&self, caller: &AuthUser, raw_id: &str, raw_movie: &str) -> Result<(), ApiError> {
        let profile = self.load(caller, raw_id, Action::ManageWatchlist).await?;
        let movie_id = parse_id(raw_movie, "Movie")?;

        if !profiles::remove_from_watchlist(&self.pool, profile.id, movie_id).await? {
            return Err(ApiError::not_found("Movie not in watchlist"));
        }
        Ok(())
    }

    /// Existence and permission check without the request body
    pub async fn ensure_access(&self, caller: &AuthUser, raw_id: &str, action: Action) -> Result<(), ApiError> {
        self.load(caller, raw_id, action).await.map(|_| ())
    }

    /// 404 for unknown profiles, then the permission check for `action`
    async fn load(&self, caller: &AuthUser, raw_id: &str, action: Action) -> Result<Profile, ApiError> {
        let id: Uuid = parse_id(raw_id, "Profile")?;
        let profile = profiles::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Profile not found"))?;

        authorize(caller, Resource::Profile(&profile), action).into_result()?;
        Ok(profile)
    }
}
