//! Every permission decision in the API goes through [`authorize`].

use crate::database::models::Profile;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateProfile,
    ListProfiles,
    ReadProfile,
    UpdateProfile,
    ChangeProfileRole,
    DeleteProfile,
    ManageWatchlist,
    MutateCatalog,
}

#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Account,
    Catalog,
    Profile(&'a Profile),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(ApiError::forbidden(reason)),
        }
    }
}

pub fn authorize(caller: &AuthUser, resource: Resource<'_>, action: Action) -> Decision {
    let is_owner = caller.role.is_account_owner();

    match (resource, action) {
        (Resource::Catalog, _) => {
            if is_owner {
                Decision::Allow
            } else {
                Decision::Deny("Only account owners can manage the catalog")
            }
        }
        (Resource::Account, Action::CreateProfile) | (Resource::Account, Action::ListProfiles) => {
            if is_owner {
                Decision::Allow
            } else {
                Decision::Deny("Only account owners can manage profiles")
            }
        }
        (Resource::Account, _) => Decision::Deny("Action not permitted on the account"),
        (Resource::Profile(profile), Action::ChangeProfileRole) => {
            if !is_owner {
                Decision::Deny("Only account owners can change profile roles")
            } else if profile.profile_type.is_account_owner() {
                Decision::Deny("The account owner profile role cannot be changed")
            } else {
                Decision::Allow
            }
        }
        // Linked user or any holder of account_owner, not only the profile's
        // own owner. Listings stay scoped by owner in the profile service.
        (Resource::Profile(profile), _) => {
            if profile.user_id == caller.id || is_owner {
                Decision::Allow
            } else {
                Decision::Deny("You do not have permission to access this profile")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoleName;
    use chrono::Utc;
    use uuid::Uuid;

    fn caller(role: RoleName) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            username: "caller".into(),
            role,
        }
    }

    fn profile(user_id: Uuid, profile_type: RoleName) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            user_id,
            owner_id: Uuid::new_v4(),
            name: "Kids".into(),
            avatar: String::new(),
            profile_type,
            email: "kids@example.com".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            watchlist: None,
        }
    }

    #[test]
    fn catalog_mutation_requires_owner() {
        assert!(authorize(&caller(RoleName::AccountOwner), Resource::Catalog, Action::MutateCatalog).is_allowed());
        for role in [RoleName::StandardProfile, RoleName::ChildProfile] {
            assert!(!authorize(&caller(role), Resource::Catalog, Action::MutateCatalog).is_allowed());
        }
    }

    #[test]
    fn profile_creation_and_listing_require_owner() {
        let standard = caller(RoleName::StandardProfile);
        assert!(!authorize(&standard, Resource::Account, Action::CreateProfile).is_allowed());
        assert!(!authorize(&standard, Resource::Account, Action::ListProfiles).is_allowed());

        let owner = caller(RoleName::AccountOwner);
        assert!(authorize(&owner, Resource::Account, Action::CreateProfile).is_allowed());
        assert!(authorize(&owner, Resource::Account, Action::ListProfiles).is_allowed());
    }

    #[test]
    fn linked_user_can_access_own_profile() {
        let me = caller(RoleName::ChildProfile);
        let mine = profile(me.id, RoleName::ChildProfile);
        let theirs = profile(Uuid::new_v4(), RoleName::ChildProfile);

        for action in [Action::ReadProfile, Action::UpdateProfile, Action::DeleteProfile, Action::ManageWatchlist] {
            assert!(authorize(&me, Resource::Profile(&mine), action).is_allowed());
            assert!(!authorize(&me, Resource::Profile(&theirs), action).is_allowed());
        }
    }

    #[test]
    fn owner_can_access_any_profile() {
        let owner = caller(RoleName::AccountOwner);
        let other = profile(Uuid::new_v4(), RoleName::StandardProfile);
        assert!(authorize(&owner, Resource::Profile(&other), Action::ReadProfile).is_allowed());
        assert!(authorize(&owner, Resource::Profile(&other), Action::DeleteProfile).is_allowed());
    }

    #[test]
    fn role_changes_are_owner_only_and_spare_the_owner_profile() {
        let owner = caller(RoleName::AccountOwner);
        let standard = profile(Uuid::new_v4(), RoleName::StandardProfile);
        let owner_profile = profile(owner.id, RoleName::AccountOwner);

        assert!(authorize(&owner, Resource::Profile(&standard), Action::ChangeProfileRole).is_allowed());
        assert!(!authorize(&owner, Resource::Profile(&owner_profile), Action::ChangeProfileRole).is_allowed());

        let me = caller(RoleName::StandardProfile);
        let mine = profile(me.id, RoleName::StandardProfile);
        assert!(!authorize(&me, Resource::Profile(&mine), Action::ChangeProfileRole).is_allowed());
    }

    #[test]
    fn deny_becomes_forbidden() {
        let err = Decision::Deny("nope").into_result().unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(ref m) if m == "nope"));
    }
}
