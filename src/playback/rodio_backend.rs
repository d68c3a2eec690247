//! Audio output through rodio.

use super::PlaybackService;
use crate::models::{SoundRef, Volume};
use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;

/// Plays one sound at a time on the default output device.
pub struct RodioPlayback {
    // Output stops when the stream is dropped.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    volume: Volume,
}

impl RodioPlayback {
    /// Opens the system's default output device.
    pub fn open_default() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("Failed to open default audio output")?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            volume: Volume::default(),
        })
    }
}

impl PlaybackService for RodioPlayback {
    fn stop(&mut self) -> Result<()> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        Ok(())
    }

    fn load(&mut self, sound: &SoundRef) -> Result<()> {
        self.stop()?;

        let file = File::open(sound.as_path())
            .with_context(|| format!("Failed to open sound file: {sound}"))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("Failed to decode sound file: {sound}"))?;

        let sink = Sink::try_new(&self.handle).context("Failed to create audio sink")?;
        sink.pause();
        sink.set_volume(self.volume.get());
        sink.append(source);
        self.sink = Some(sink);
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) -> Result<()> {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume.get());
        }
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let sink = self.sink.as_ref().context("No sound loaded")?;
        sink.play();
        Ok(())
    }
}
