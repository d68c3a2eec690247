//! Data models for keys, sounds, bindings, and templates.
//!
//! This module contains the value types shared by the engine components.
//! Models are independent of storage, playback, and the user interface.

pub mod binding;
pub mod key;
pub mod sound;
pub mod template;

// Re-export all model types
pub use binding::{BindingMap, SelectionSet};
pub use key::{KeyId, KeyWidth, UnknownKey};
pub use sound::{SoundRef, Volume};
pub use template::{Template, TemplateName, TemplateSummary};
