//! Log-only playback backend.

use super::PlaybackService;
use crate::models::{SoundRef, Volume};
use anyhow::{bail, Result};
use tracing::debug;

/// Playback backend that records state and logs instead of producing sound.
#[derive(Debug, Default)]
pub struct NullPlayback {
    loaded: Option<SoundRef>,
    volume: Volume,
    playing: bool,
}

impl NullPlayback {
    /// Currently loaded asset.
    pub fn loaded(&self) -> Option<&SoundRef> {
        self.loaded.as_ref()
    }

    /// True between `play` and the next `stop`/`load`.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Last volume set.
    pub fn volume(&self) -> Volume {
        self.volume
    }
}

impl PlaybackService for NullPlayback {
    fn stop(&mut self) -> Result<()> {
        if self.playing {
            debug!("stop");
        }
        self.playing = false;
        Ok(())
    }

    fn load(&mut self, sound: &SoundRef) -> Result<()> {
        debug!("load {sound}");
        self.playing = false;
        self.loaded = Some(sound.clone());
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) -> Result<()> {
        self.volume = volume;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let Some(sound) = &self.loaded else {
            bail!("nothing loaded");
        };
        debug!("play {sound} at {}", self.volume);
        self.playing = true;
        Ok(())
    }
}
