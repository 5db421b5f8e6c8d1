//! Access control gate.
//!
//! Every catalogue, roster and ledger operation is described as an [`Action`]
//! and passed to [`authorize`] together with the caller's [`Principal`]
//! before any store is touched. The decision table lives only here.
//!
//! Rules, evaluated in order:
//! 1. No principal: deny as unauthenticated.
//! 2. Admin-only action and caller is not an admin: deny as forbidden.
//! 3. Self-or-admin action on another user and caller is not an admin: deny
//!    as forbidden.
//! 4. Otherwise allow.

use tracing::debug;

use super::{Error, Principal, ProgramId, UserId};

/// How sensitive an action is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensitivity {
    /// Any signed-in caller.
    Authenticated,
    /// Callers with the admin role only.
    AdminOnly,
    /// The targeted user themself, or an admin.
    SelfOrAdmin(UserId),
}

/// Operation a caller wants to perform, with its target where relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Browse the catalogue.
    ListPrograms,
    /// Read one program.
    ViewProgram(ProgramId),
    /// Add a program.
    CreateProgram,
    /// Change program fields.
    UpdateProgram(ProgramId),
    /// Remove a program and its memberships.
    DeleteProgram(ProgramId),
    /// Page through the roster.
    ListUsers,
    /// Read one user.
    ViewUser(UserId),
    /// Rename a user.
    UpdateProfile(UserId),
    /// Grant or revoke the admin role.
    ChangeRole(UserId),
    /// Add a membership.
    Enroll { program: ProgramId, user: UserId },
    /// Remove a membership.
    Unenroll { program: ProgramId, user: UserId },
    /// Page through a program's members.
    ListEnrollees(ProgramId),
    /// List the programs a user belongs to.
    ListProgramsOfUser(UserId),
}

impl Action {
    /// Sensitivity tag consulted by [`authorize`].
    pub fn sensitivity(&self) -> Sensitivity {
        match *self {
            Self::ListPrograms | Self::ViewProgram(_) => Sensitivity::Authenticated,
            Self::CreateProgram
            | Self::UpdateProgram(_)
            | Self::DeleteProgram(_)
            | Self::ListUsers
            | Self::ChangeRole(_)
            | Self::ListEnrollees(_) => Sensitivity::AdminOnly,
            Self::ViewUser(target)
            | Self::UpdateProfile(target)
            | Self::Enroll { user: target, .. }
            | Self::Unenroll { user: target, .. }
            | Self::ListProgramsOfUser(target) => Sensitivity::SelfOrAdmin(target),
        }
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No usable credential.
    Unauthenticated,
    /// Signed in but not permitted.
    Forbidden,
}

/// Outcome of [`authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Proceed.
    Allow,
    /// Refuse, with the reason.
    Deny(DenyReason),
}

impl Decision {
    /// Convert into a domain result so services can use `?`.
    pub fn into_result(self) -> Result<(), Error> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(DenyReason::Unauthenticated) => {
                Err(Error::unauthorized("authentication required"))
            }
            Self::Deny(DenyReason::Forbidden) => {
                Err(Error::forbidden("you do not have permission to perform this action"))
            }
        }
    }
}

/// Evaluate the decision table for `action`.
///
/// # Examples
/// ```
/// use catalog_backend::domain::{
///     authorize, Action, Decision, DenyReason, Principal, Role, UserId,
/// };
///
/// let caller = Principal::new(UserId::new(7).expect("id"), Role::User);
/// assert_eq!(
///     authorize(Some(&caller), &Action::ListUsers),
///     Decision::Deny(DenyReason::Forbidden),
/// );
/// assert_eq!(authorize(Some(&caller), &Action::ViewUser(caller.user_id)), Decision::Allow);
/// ```
pub fn authorize(principal: Option<&Principal>, action: &Action) -> Decision {
    let Some(principal) = principal else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };
    let allowed = match action.sensitivity() {
        Sensitivity::Authenticated => true,
        Sensitivity::AdminOnly => principal.is_admin(),
        Sensitivity::SelfOrAdmin(target) => principal.is_admin() || principal.user_id == target,
    };
    if allowed {
        Decision::Allow
    } else {
        debug!(caller = %principal.user_id, ?action, "access denied");
        Decision::Deny(DenyReason::Forbidden)
    }
}

/// Shorthand for `authorize(principal, &action).into_result()`.
pub fn require(principal: Option<&Principal>, action: Action) -> Result<(), Error> {
    authorize(principal, &action).into_result()
}
