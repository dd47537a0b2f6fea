//! Error types for the consent gate.
//!
//! Storage failures are the only class the browser can actually throw at us.
//! They are never retried and never hidden: the gate returns them and the
//! JS boundary rethrows them into the host page.

use thiserror::Error;

/// Consent gate error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsentError {
    /// No persistent store could be obtained (disabled, sandboxed frame, ...).
    #[error("Consent store unavailable: {0}")]
    StorageUnavailable(String),

    /// Reading the consent record failed.
    #[error("Failed to read consent record '{key}': {reason}")]
    StorageRead { key: String, reason: String },

    /// Writing the consent record failed (quota, private mode, ...).
    #[error("Failed to write consent record '{key}': {reason}")]
    StorageWrite { key: String, reason: String },

    /// Creating or attaching banner nodes failed.
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// Configuration rejected by [`crate::GateConfig::validate`].
    #[error("Invalid consent gate config: {0}")]
    InvalidConfig(String),

    /// `initialize()` was called twice on the same gate.
    #[error("Consent gate already initialized")]
    AlreadyInitialized,
}

impl ConsentError {
    /// Check if this error came from the persistent store.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            ConsentError::StorageUnavailable(_)
                | ConsentError::StorageRead { .. }
                | ConsentError::StorageWrite { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ConsentError>;
