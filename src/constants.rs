//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and on-disk naming conventions.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "KeyAura";

/// The binary name of the application (used in command examples, lowercase).
pub const APP_BINARY_NAME: &str = "keyaura";

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "KeyAura";

/// File extension of persisted template records (without the dot).
pub const TEMPLATE_EXTENSION: &str = "json";

/// Layout tag used when a record or the config does not name one.
pub const DEFAULT_LAYOUT_TAG: &str = "100%";

/// Layout tags offered by the keyboard layout selector.
pub const KNOWN_LAYOUT_TAGS: [&str; 3] = ["67%", "75%", "100%"];

/// Initial playback volume.
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Longest accepted template name, in characters.
pub const MAX_TEMPLATE_NAME_LEN: usize = 100;
