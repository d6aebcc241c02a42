use smartsplit_domain::{ExpenseId, ExpenseValidationError, GroupBuildError, MemberId};
use thiserror::Error;

use crate::snapshot::SNAPSHOT_VERSION;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GroupEditError {
    #[error("Member name must not be empty")]
    EmptyMemberName,
    #[error("A member named '{0}' already exists in the group")]
    DuplicateMemberName(String),
    #[error("Member '{0}' is not part of the group")]
    UnknownMember(MemberId),
    #[error("Expense '{0}' is not part of the group")]
    UnknownExpense(ExpenseId),
    #[error(transparent)]
    Validation(#[from] ExpenseValidationError),
    #[error(transparent)]
    Build(#[from] GroupBuildError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Group '{group}' has no members sequence")]
    MissingMembers { group: String },
    #[error("Group '{group}' has no expenses sequence")]
    MissingExpenses { group: String },
    #[error(transparent)]
    Build(#[from] GroupBuildError),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported snapshot version '{found}', expected '{}'", SNAPSHOT_VERSION)]
    UnsupportedVersion { found: String },
    #[error("Snapshot has no groups sequence")]
    MissingGroups,
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store lock poisoned")]
    Poisoned,
    #[error("Store serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
