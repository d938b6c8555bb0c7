//! Role policy for moderation writes.
//!
//! Every permission decision in the workspace is derived from the two tables
//! in this module: the submission route per (role, action type) and the
//! minimum role per action type.

use warden_core::{AppError, AppResult, StaffRole};

use crate::ActionType;

/// How a staff member may get an action recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionRoute {
    /// The action is written to the audit log immediately.
    Direct,
    /// The action must be filed as a ban request and reviewed.
    Review,
    /// The action has no pathway for this role.
    Denied,
}

/// Resolves the submission route for a role and action type.
///
/// | Role | Warn   | Kick   | Ban    |
/// |------|--------|--------|--------|
/// | 1    | direct | denied | review |
/// | 2    | direct | direct | review |
/// | 3    | direct | direct | direct |
#[must_use]
pub fn submission_route(role: StaffRole, action_type: ActionType) -> SubmissionRoute {
    match (role, action_type) {
        (_, ActionType::Warn) => SubmissionRoute::Direct,
        (StaffRole::Helper, ActionType::Kick) => SubmissionRoute::Denied,
        (StaffRole::Moderator | StaffRole::Senior, ActionType::Kick) => SubmissionRoute::Direct,
        (StaffRole::Helper | StaffRole::Moderator, ActionType::Ban) => SubmissionRoute::Review,
        (StaffRole::Senior, ActionType::Ban) => SubmissionRoute::Direct,
    }
}

/// Returns whether the role may write the action to the audit log directly.
#[must_use]
pub fn can_submit_directly(role: StaffRole, action_type: ActionType) -> bool {
    submission_route(role, action_type) == SubmissionRoute::Direct
}

/// Returns whether the role must file the action as a ban request.
#[must_use]
pub fn requires_review(role: StaffRole, action_type: ActionType) -> bool {
    submission_route(role, action_type) == SubmissionRoute::Review
}

/// Minimum role that may issue or edit an action of this type.
#[must_use]
pub fn minimum_role(action_type: ActionType) -> StaffRole {
    match action_type {
        ActionType::Warn => StaffRole::Helper,
        ActionType::Kick => StaffRole::Moderator,
        ActionType::Ban => StaffRole::Senior,
    }
}

/// Returns whether the role may correct audit entries of this type.
#[must_use]
pub fn can_edit(role: StaffRole, action_type: ActionType) -> bool {
    role >= minimum_role(action_type)
}

/// Returns whether the role reviews ban requests and deletes audit entries.
#[must_use]
pub fn is_reviewer(role: StaffRole) -> bool {
    role == StaffRole::Senior
}

/// Returns whether the role files ban requests instead of banning directly.
#[must_use]
pub fn can_file_ban_request(role: StaffRole) -> bool {
    requires_review(role, ActionType::Ban)
}

/// Fails with `Forbidden` unless the action may be written directly.
pub fn ensure_direct_submission(role: StaffRole, action_type: ActionType) -> AppResult<()> {
    match submission_route(role, action_type) {
        SubmissionRoute::Direct => Ok(()),
        SubmissionRoute::Review => Err(AppError::Forbidden(format!(
            "role {role} cannot {action_type} directly; file a ban request for review"
        ))),
        SubmissionRoute::Denied => Err(AppError::Forbidden(format!(
            "role {role} is not allowed to {action_type}"
        ))),
    }
}

/// Fails with `Forbidden` unless the role may edit both the current and the
/// requested action type of an entry.
pub fn ensure_can_edit(role: StaffRole, current: ActionType, requested: ActionType) -> AppResult<()> {
    for action_type in [current, requested] {
        if !can_edit(role, action_type) {
            return Err(AppError::Forbidden(format!(
                "role {role} cannot edit {action_type} entries; role {} is required",
                minimum_role(action_type)
            )));
        }
    }

    Ok(())
}

/// Fails with `Forbidden` unless the role is a reviewer.
pub fn ensure_reviewer(role: StaffRole, operation: &str) -> AppResult<()> {
    if is_reviewer(role) {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "role {role} cannot {operation}; role {} is required",
        StaffRole::Senior
    )))
}
