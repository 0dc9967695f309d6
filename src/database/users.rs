use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::User;

const USER_COLUMNS: &str = "u.id, u.username, u.email, u.password_hash, u.role_id, r.name AS role, \
     u.is_active, u.is_verified, u.last_login, u.verification_token, u.password_reset_token, \
     u.password_reset_expires, u.created_at, u.updated_at";

fn select_user(condition: &str) -> String {
    format!(
        "SELECT {} FROM users u JOIN roles r ON r.id = u.role_id WHERE {}",
        USER_COLUMNS, condition
    )
}

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role_id: Uuid,
}

/// Columns left as `None` keep their current value
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role_id: Option<Uuid>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password_hash.is_none() && self.role_id.is_none()
    }
}

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<User>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let user = sqlx::query_as::<_, User>(&select_user("u.id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let user = sqlx::query_as::<_, User>(&select_user("u.email = $1"))
        .bind(email)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

/// True when another user (not `except`) already holds the email
pub async fn email_taken<'e, E>(executor: E, email: &str, except: Option<Uuid>) -> Result<bool, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(email)
    .bind(except)
    .fetch_one(executor)
    .await?;
    Ok(taken)
}

pub async fn username_taken<'e, E>(executor: E, username: &str, except: Option<Uuid>) -> Result<bool, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(username)
    .bind(except)
    .fetch_one(executor)
    .await?;
    Ok(taken)
}

pub async fn insert<'e, E>(executor: E, new_user: NewUser<'_>) -> Result<User, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "WITH u AS ( \
             INSERT INTO users (id, username, email, password_hash, role_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING * \
         ) \
         SELECT {} FROM u JOIN roles r ON r.id = u.role_id",
        USER_COLUMNS
    );

    let user = sqlx::query_as::<_, User>(&sql)
        .bind(Uuid::new_v4())
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.role_id)
        .fetch_one(executor)
        .await?;
    Ok(user)
}

pub async fn touch_last_login<'e, E>(executor: E, id: Uuid) -> Result<(), DatabaseError>
where
    E: PgExecutor<'e>,
{
    sqlx::query("UPDATE users SET last_login = now() WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Apply partial changes; `None` when the user does not exist
pub async fn update<'e, E>(executor: E, id: Uuid, changes: &UserChanges) -> Result<Option<User>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "WITH u AS ( \
             UPDATE users SET \
                 username = COALESCE($2, username), \
                 email = COALESCE($3, email), \
                 password_hash = COALESCE($4, password_hash), \
                 role_id = COALESCE($5, role_id), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING * \
         ) \
         SELECT {} FROM u JOIN roles r ON r.id = u.role_id",
        USER_COLUMNS
    );

    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .bind(changes.username.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.role_id)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

pub async fn set_active<'e, E>(executor: E, email: &str, active: bool) -> Result<Option<User>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "WITH u AS ( \
             UPDATE users SET is_active = $2, updated_at = now() \
             WHERE email = $1 \
             RETURNING * \
         ) \
         SELECT {} FROM u JOIN roles r ON r.id = u.role_id",
        USER_COLUMNS
    );

    let user = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .bind(active)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

/// Returns whether a row was removed
pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
