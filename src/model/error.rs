//! Error types for model mutations

use thiserror::Error;

use super::ObjectKey;

/// Errors that can occur when mutating a model
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Key does not address a live object
    #[error("no object with key {key}")]
    UnknownKey { key: ObjectKey },

    /// Identifier already used by another object
    #[error("duplicate identifier '{id}'")]
    DuplicateId { id: String },

    /// Identifier must not be empty
    #[error("identifier must not be empty")]
    EmptyId,

    /// Object is not of the kind the operation needs
    #[error("object '{id}' is not {expected}")]
    WrongKind { id: String, expected: &'static str },

    /// Folder cannot hold the object
    #[error("folder '{folder}' cannot hold {what}")]
    FolderMismatch { folder: String, what: String },

    /// Diagram components belong to different views
    #[error("'{source_id}' and '{target_id}' are not on the same view")]
    ViewMismatch { source_id: String, target_id: String },

    /// Reparenting would create a containment cycle
    #[error("cannot move '{id}' into its own subtree")]
    Cycle { id: String },

    /// Top-level folders are fixed
    #[error("top-level folder '{id}' cannot be removed or moved")]
    TopLevelFolder { id: String },
}

impl ModelError {
    pub fn unknown(key: ObjectKey) -> Self {
        Self::UnknownKey { key }
    }

    pub fn wrong_kind(id: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongKind {
            id: id.into(),
            expected,
        }
    }

    pub fn folder_mismatch(folder: impl Into<String>, what: impl Into<String>) -> Self {
        Self::FolderMismatch {
            folder: folder.into(),
            what: what.into(),
        }
    }
}
