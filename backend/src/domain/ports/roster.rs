//! Driving ports for the user roster.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, Principal, User, UserId, UserPatch};

/// Read side of the roster.
#[async_trait]
pub trait RosterQuery: Send + Sync {
    /// One page of accounts. Admin only.
    async fn list_users(
        &self,
        principal: Option<&Principal>,
        request: PageRequest,
    ) -> Result<Page<User>, Error>;

    /// A single account. Self or admin.
    async fn get_user(&self, principal: Option<&Principal>, id: UserId) -> Result<User, Error>;
}

/// Write side of the roster.
#[async_trait]
pub trait RosterCommand: Send + Sync {
    /// Update name and/or role.
    ///
    /// Name changes are self-or-admin; role changes are admin only, even for
    /// the caller's own account.
    async fn update_user(
        &self,
        principal: Option<&Principal>,
        id: UserId,
        patch: UserPatch,
    ) -> Result<User, Error>;
}
