//! Keyboard definition and its on-screen representation.

pub mod registry;
pub mod view;

pub use registry::{KeyInfo, KeyRegistry};
pub use view::{KeySlot, KeyboardView};
