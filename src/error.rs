//! Error types for the binding engine and template repository.
//!
//! Validation errors (`InvalidAsset`, `UnknownKey`, `EmptySelection`,
//! `InvalidVolume`, `NotFound`, `InvalidName`) are raised before any state is touched.
//! `Persistence` and `Playback` wrap failures of the outside world.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{KeyId, SoundRef};

/// Errors returned by `BindingStore`, `TemplateRepository` and `Session` operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Sound reference is empty or does not resolve to an existing asset.
    #[error("Sound file not found or unreadable: {0}")]
    InvalidAsset(SoundRef),

    /// Key is not part of the active keyboard.
    #[error("Key {0} is not on this keyboard")]
    UnknownKey(KeyId),

    /// A selection-based bulk operation was requested with nothing selected.
    #[error("No keys selected")]
    EmptySelection,

    /// Volume outside the closed range 0.0..=1.0 (or NaN).
    #[error("Volume must be between 0.0 and 1.0, got {0}")]
    InvalidVolume(f32),

    /// Template name unknown to the repository.
    #[error("Template '{0}' not found")]
    NotFound(String),

    /// Template name rejected at the boundary.
    #[error("Invalid template name '{name}': {reason}")]
    InvalidName {
        /// The rejected input
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Reading or writing a template record failed.
    #[error("Failed to {action} template record {}: {source}", .path.display())]
    Persistence {
        /// What was being attempted ("write", "read", ...)
        action: &'static str,
        /// Record path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: anyhow::Error,
    },

    /// The playback backend reported a failure.
    #[error("Playback failed for {sound}: {source}")]
    Playback {
        /// Asset that was being played
        sound: SoundRef,
        /// Backend error
        #[source]
        source: anyhow::Error,
    },
}

impl EngineError {
    /// Creates a persistence error for the given action and path.
    pub fn persistence(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Persistence {
            action,
            path: path.into(),
            source: source.into(),
        }
    }

    /// True for errors detected by input validation (no side effects happened).
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAsset(_)
                | Self::UnknownKey(_)
                | Self::EmptySelection
                | Self::InvalidVolume(_)
                | Self::NotFound(_)
                | Self::InvalidName { .. }
        )
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
