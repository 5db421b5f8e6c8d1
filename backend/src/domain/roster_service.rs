//! Roster service: account listing, lookup and profile or role edits.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::access::{Action, require};
use crate::domain::identity_service::map_user_persistence_error;
use crate::domain::ports::{RosterCommand, RosterQuery, UserRepository};
use crate::domain::{Error, Principal, User, UserId, UserPatch};

/// Roster service implementing [`RosterQuery`] and [`RosterCommand`].
#[derive(Clone)]
pub struct RosterService<U> {
    users: Arc<U>,
}

impl<U> RosterService<U> {
    /// Create a service over the user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

pub(crate) fn user_not_found(id: UserId) -> Error {
    Error::not_found("user not found").with_details(serde_json::json!({ "userId": id.get() }))
}

impl<U> RosterService<U>
where
    U: UserRepository,
{
    async fn fetch(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl<U> RosterQuery for RosterService<U>
where
    U: UserRepository,
{
    async fn list_users(
        &self,
        principal: Option<&Principal>,
        request: PageRequest,
    ) -> Result<Page<User>, Error> {
        require(principal, Action::ListUsers)?;
        self.users
            .list(request)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn get_user(&self, principal: Option<&Principal>, id: UserId) -> Result<User, Error> {
        require(principal, Action::ViewUser(id))?;
        self.fetch(id).await
    }
}

#[async_trait]
impl<U> RosterCommand for RosterService<U>
where
    U: UserRepository,
{
    async fn update_user(
        &self,
        principal: Option<&Principal>,
        id: UserId,
        patch: UserPatch,
    ) -> Result<User, Error> {
        require(principal, Action::UpdateProfile(id))?;
        if patch.role().is_some() {
            require(principal, Action::ChangeRole(id))?;
        }
        if patch.is_empty() {
            return self.fetch(id).await;
        }
        let updated = self
            .users
            .update(id, &patch)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| user_not_found(id))?;
        if let Some(role) = patch.role() {
            info!(user_id = %id, %role, "role changed");
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::test_fixtures::{admin, member, sample_user, user_id};
    use crate::domain::{ErrorCode, FullName, Role};
    use rstest::rstest;

    fn make_service(repo: MockUserRepository) -> RosterService<MockUserRepository> {
        RosterService::new(Arc::new(repo))
    }

    #[rstest]
    #[tokio::test]
    async fn listing_requires_admin() {
        let mut repo = MockUserRepository::new();
        repo.expect_list().never();

        let error = make_service(repo)
            .list_users(Some(&member(7)), PageRequest::default())
            .await
            .expect_err("forbidden");

        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(7, true)]
    #[case(8, false)]
    #[tokio::test]
    async fn members_see_only_themselves(#[case] target: i64, #[case] allowed: bool) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id.get(), Role::User))));

        let result = make_service(repo)
            .get_user(Some(&member(7)), user_id(target))
            .await;

        assert_eq!(result.is_ok(), allowed);
    }

    #[rstest]
    #[tokio::test]
    async fn member_renames_themself() {
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .withf(|id, patch| {
                *id == user_id(7)
                    && patch.role().is_none()
                    && patch
                        .full_name()
                        .is_some_and(|name| name.as_ref() == "Renamed")
            })
            .times(1)
            .return_once(|id, patch| Ok(Some(sample_user(id.get(), Role::User).apply(patch))));

        let patch = UserPatch::new(Some(FullName::new("Renamed").expect("name")), None);
        let user = make_service(repo)
            .update_user(Some(&member(7)), user_id(7), patch)
            .await
            .expect("renamed");

        assert_eq!(user.full_name().as_ref(), "Renamed");
    }

    #[rstest]
    #[case(7)]
    #[case(8)]
    #[tokio::test]
    async fn members_can_never_change_roles(#[case] target: i64) {
        let mut repo = MockUserRepository::new();
        repo.expect_update().never();

        let patch = UserPatch::new(None, Some(Role::Admin));
        let error = make_service(repo)
            .update_user(Some(&member(7)), user_id(target), patch)
            .await
            .expect_err("forbidden");

        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn admin_promotes_another_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .times(1)
            .return_once(|id, patch| Ok(Some(sample_user(id.get(), Role::User).apply(patch))));

        let user = make_service(repo)
            .update_user(Some(&admin(1)), user_id(7), UserPatch::new(None, Some(Role::Admin)))
            .await
            .expect("promoted");

        assert_eq!(user.role(), Role::Admin);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_patch_returns_current_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_update().never();
        repo.expect_find_by_id()
            .times(1)
            .return_once(|id| Ok(Some(sample_user(id.get(), Role::User))));

        let user = make_service(repo)
            .update_user(Some(&member(7)), user_id(7), UserPatch::default())
            .await
            .expect("unchanged");

        assert_eq!(user, sample_user(7, Role::User));
    }

    #[rstest]
    #[tokio::test]
    async fn updating_missing_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_update().return_once(|_, _| Ok(None));

        let patch = UserPatch::new(Some(FullName::new("Ghost").expect("name")), None);
        let error = make_service(repo)
            .update_user(Some(&admin(1)), user_id(99), patch)
            .await
            .expect_err("missing");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
