//! KeyAura Library
//!
//! Binds sound files to the keys of a virtual keyboard, selects keys for
//! bulk edits, plays the bound sound when a key is pressed, and saves or
//! restores whole binding sets as named templates.

// Module declarations
pub mod assets;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod keyboard;
pub mod logging;
pub mod models;
pub mod playback;
pub mod services;
pub mod session;
pub mod store;
pub mod templates;

pub use error::{EngineError, EngineResult};
pub use session::Session;
