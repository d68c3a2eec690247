//! Sound asset references and playback volume.

use crate::constants::DEFAULT_VOLUME;
use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Reference to an audio asset (a filesystem path).
///
/// Never embeds audio data. Whether the asset exists is checked by an
/// [`AssetResolver`](crate::assets::AssetResolver) when the reference is bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundRef(String);

impl SoundRef {
    /// Creates a reference; surrounding whitespace is dropped.
    pub fn new(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        let trimmed = reference.trim();
        if trimmed.len() == reference.len() {
            Self(reference)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// The reference as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The reference as a filesystem path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// True if the reference is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// File name component, for compact display.
    pub fn file_name(&self) -> &str {
        self.as_path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for SoundRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SoundRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SoundRef {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Playback volume in the closed range 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Volume(f32);

impl Volume {
    /// Silence.
    pub const MIN: Self = Self(0.0);
    /// Full volume.
    pub const MAX: Self = Self(1.0);

    /// Validates and wraps a volume level.
    ///
    /// Out-of-range values and NaN are rejected, not clamped.
    pub fn new(value: f32) -> EngineResult<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(EngineError::InvalidVolume(value))
        }
    }

    /// The raw level.
    pub const fn get(self) -> f32 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(DEFAULT_VOLUME)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}
