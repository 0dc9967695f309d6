use serde::Deserialize;
use sqlx::{PgExecutor, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Role;
use crate::types::RoleName;

const REGISTRY_YAML: &str = include_str!("roles.yaml");

/// A role as declared in the embedded registry file
#[derive(Debug, Clone, Deserialize)]
pub struct RoleDefinition {
    pub name: RoleName,
    pub description: String,
    pub permissions: Vec<String>,
}

pub fn definitions() -> Result<Vec<RoleDefinition>, serde_yaml::Error> {
    serde_yaml::from_str(REGISTRY_YAML)
}

const SELECT_ROLE: &str =
    "SELECT id, name, description, permissions, created_at, updated_at FROM roles";

/// Insert or refresh every registry role, keyed by name
pub async fn seed_roles(pool: &PgPool, definitions: &[RoleDefinition]) -> Result<Vec<Role>, DatabaseError> {
    let mut tx = pool.begin().await?;
    let mut seeded = Vec::with_capacity(definitions.len());
    for def in definitions {
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (id, name, description, permissions) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (name) DO UPDATE \
             SET description = EXCLUDED.description, \
                 permissions = EXCLUDED.permissions, \
                 updated_at = now() \
             RETURNING id, name, description, permissions, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(def.name.as_str())
        .bind(&def.description)
        .bind(&def.permissions)
        .fetch_one(&mut *tx)
        .await?;

        info!("Role {} created/updated", role.name);
        seeded.push(role);
    }
    tx.commit().await?;

    Ok(seeded)
}

pub async fn find_by_name<'e, E>(executor: E, name: RoleName) -> Result<Option<Role>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let role = sqlx::query_as::<_, Role>(&format!("{} WHERE name = $1", SELECT_ROLE))
        .bind(name.as_str())
        .fetch_optional(executor)
        .await?;
    Ok(role)
}

pub async fn list(pool: &PgPool) -> Result<Vec<Role>, DatabaseError> {
    let roles = sqlx::query_as::<_, Role>(&format!("{} ORDER BY name", SELECT_ROLE))
        .fetch_all(pool)
        .await?;
    Ok(roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_declares_every_role_once() {
        let defs = definitions().unwrap();
        assert_eq!(defs.len(), RoleName::ALL.len());
        for name in RoleName::ALL {
            assert_eq!(defs.iter().filter(|d| d.name == name).count(), 1);
        }
    }

    #[test]
    fn every_role_can_manage_its_watchlist() {
        for def in definitions().unwrap() {
            assert!(def.permissions.iter().any(|p| p == "manage_watchlist"));
        }
    }

    #[test]
    fn only_the_owner_manages_profiles() {
        let defs = definitions().unwrap();
        let managers: Vec<RoleName> = defs
            .iter()
            .filter(|d| d.permissions.iter().any(|p| p == "manage_profiles"))
            .map(|d| d.name)
            .collect();
        assert_eq!(managers, vec![RoleName::AccountOwner]);
    }
}
