use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::api::validate::{normalize_email, Validator};
use crate::app::AppState;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::policy::{authorize, Action, Resource};
use crate::auth::issue_token;
use crate::config::AppConfig;
use crate::database::models::{Profile, User};
use crate::database::profiles::{self, NewProfile};
use crate::database::users::{self, NewUser};
use crate::database::{roles, DatabaseError};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::types::RoleName;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Requested role name; profile type mirrors it
    #[serde(rename = "type")]
    pub profile_type: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserData {
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserProfileData {
    pub user: User,
    pub profile: Profile,
}

/// A freshly issued token plus the payload to send with it
#[derive(Debug)]
pub struct Authenticated<T> {
    pub token: String,
    pub data: T,
}

/// Registration, login and additional-profile creation
pub struct AccountService {
    pool: PgPool,
    config: Arc<AppConfig>,
}

impl AccountService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
            config: state.config.clone(),
        }
    }

    /// Create an account owner together with its primary profile
    pub async fn register(&self, req: RegisterRequest) -> Result<Authenticated<UserData>, ApiError> {
        Validator::new()
            .username(req.username.as_deref())
            .email(req.email.as_deref())
            .password(req.password.as_deref())
            .finish()?;

        let username = req.username.as_deref().unwrap_or_default().trim().to_string();
        let email = normalize_email(req.email.as_deref().unwrap_or_default());
        let password = req.password.unwrap_or_default();

        let owner_role = roles::find_by_name(&self.pool, RoleName::AccountOwner)
            .await?
            .ok_or_else(|| ApiError::configuration("Role configuration error"))?;

        self.ensure_available(&email, &username).await?;

        let password_hash = hash_password(&password)?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        let user = users::insert(
            &mut *tx,
            NewUser {
                username: &username,
                email: &email,
                password_hash: &password_hash,
                role_id: owner_role.id,
            },
        )
        .await?;
        profiles::insert(
            &mut *tx,
            NewProfile {
                user_id: user.id,
                owner_id: user.id,
                name: &username,
                avatar: "",
                profile_type: RoleName::AccountOwner,
                email: &email,
            },
        )
        .await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!("Registered account owner {} ({})", user.username, user.id);
        let token = issue_token(&self.config.security, user.id, user.role)?;
        Ok(Authenticated {
            token,
            data: UserData { user },
        })
    }

    /// Create a sub-profile and its paired user under the caller's account
    pub async fn create_profile(
        &self,
        caller: &AuthUser,
        req: CreateProfileRequest,
    ) -> Result<Authenticated<UserProfileData>, ApiError> {
        authorize(caller, Resource::Account, Action::CreateProfile).into_result()?;

        let mut validator = Validator::new();
        validator
            .username(req.username.as_deref())
            .email(req.email.as_deref())
            .password(req.password.as_deref())
            .required(req.profile_type.as_deref(), "type");
        if req.profile_type.as_deref().map(str::trim) == Some(RoleName::AccountOwner.as_str()) {
            validator.check(false, "type", "type must be standard_profile or child_profile");
        }
        validator.finish()?;

        let requested = req.profile_type.as_deref().unwrap_or_default().trim();
        let role_name: RoleName = requested.parse().map_err(|_| {
            warn!("Profile creation requested unknown role {}", requested);
            ApiError::configuration("Role configuration error")
        })?;
        let role = roles::find_by_name(&self.pool, role_name)
            .await?
            .ok_or_else(|| ApiError::configuration("Role configuration error"))?;

        let username = req.username.as_deref().unwrap_or_default().trim().to_string();
        let email = normalize_email(req.email.as_deref().unwrap_or_default());
        let password = req.password.unwrap_or_default();
        let name = req
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&username)
            .to_string();
        let avatar = req.avatar.unwrap_or_default();

        self.ensure_available(&email, &username).await?;

        let password_hash = hash_password(&password)?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        let user = users::insert(
            &mut *tx,
            NewUser {
                username: &username,
                email: &email,
                password_hash: &password_hash,
                role_id: role.id,
            },
        )
        .await?;
        let mut profile = profiles::insert(
            &mut *tx,
            NewProfile {
                user_id: user.id,
                owner_id: caller.id,
                name: &name,
                avatar: &avatar,
                profile_type: role_name,
                email: &email,
            },
        )
        .await?;
        tx.commit().await.map_err(DatabaseError::from)?;
        profile.watchlist = Some(vec![]);

        info!("Account owner {} created {} profile {}", caller.id, role_name, profile.id);
        let token = issue_token(&self.config.security, user.id, user.role)?;
        Ok(Authenticated {
            token,
            data: UserProfileData { user, profile },
        })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<Authenticated<UserData>, ApiError> {
        let email = req.email.as_deref().map(normalize_email).unwrap_or_default();
        let password = req.password.unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::bad_request("Please provide email and password"));
        }

        let user = users::find_by_email(&self.pool, &email).await?;
        let user = match user {
            Some(user) if verify_password(&password, &user.password_hash)? => user,
            _ => {
                warn!("Failed login for {}", email);
                return Err(ApiError::unauthorized("Incorrect email or password"));
            }
        };

        if !user.is_active {
            return Err(ApiError::forbidden("Account is deactivated"));
        }

        users::touch_last_login(&self.pool, user.id).await?;
        let user = users::find_by_id(&self.pool, user.id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Incorrect email or password"))?;

        let token = issue_token(&self.config.security, user.id, user.role)?;
        Ok(Authenticated {
            token,
            data: UserData { user },
        })
    }

    /// Conflict when the email or username already belongs to someone
    async fn ensure_available(&self, email: &str, username: &str) -> Result<(), ApiError> {
        if users::email_taken(&self.pool, email, None).await?
            || profiles::email_taken(&self.pool, email, None).await?
        {
            return Err(ApiError::conflict("Email already registered"));
        }
        if users::username_taken(&self.pool, username, None).await? {
            return Err(ApiError::conflict("Username already taken"));
        }
        Ok(())
    }
}
