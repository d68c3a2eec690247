//! Playback service boundary.
//!
//! The engine never decodes audio itself. It drives a [`PlaybackService`]
//! with the fixed sequence stop → load → set_volume → play, so at most one
//! sound is audible at a time. Backends:
//!
//! - [`NullPlayback`]: logs requests only (default build, tests, headless use)
//! - `RodioPlayback`: real output through rodio (`audio` feature)

use crate::models::{SoundRef, Volume};
use anyhow::Result;

mod null;
#[cfg(feature = "audio")]
mod rodio_backend;

pub use null::NullPlayback;
#[cfg(feature = "audio")]
pub use rodio_backend::RodioPlayback;

/// Abstraction over audio output.
///
/// Calls are fire-and-forget: `play` returns once playback has started and
/// completion is never reported back.
pub trait PlaybackService {
    /// Stops whatever is currently playing. Stopping when idle is not an error.
    fn stop(&mut self) -> Result<()>;

    /// Loads an asset, replacing any previously loaded one.
    fn load(&mut self, sound: &SoundRef) -> Result<()>;

    /// Sets the output volume, including for a sound already playing.
    fn set_volume(&mut self, volume: Volume) -> Result<()>;

    /// Starts the loaded asset.
    fn play(&mut self) -> Result<()>;
}

/// Opens the best backend this build supports.
///
/// With the `audio` feature the default output device is tried first; if it
/// cannot be opened the log-only backend is used instead.
pub fn default_backend() -> Box<dyn PlaybackService> {
    #[cfg(feature = "audio")]
    {
        match RodioPlayback::open_default() {
            Ok(backend) => return Box::new(backend),
            Err(e) => {
                tracing::warn!("Audio output unavailable, sounds will not be heard: {e:#}");
            }
        }
    }

    Box::new(NullPlayback::default())
}
