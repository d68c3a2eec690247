//! Shared test fixtures for engine and CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use keyaura::assets::AssetResolver;
use keyaura::keyboard::KeyRegistry;
use keyaura::models::{SoundRef, Volume};
use keyaura::playback::PlaybackService;
use keyaura::store::BindingStore;
use keyaura::templates::TemplateRepository;
use keyaura::Session;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;
use std::sync::Arc;
use tempfile::TempDir;

/// One call received by [`RecordingPlayback`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCall {
    Stop,
    Load(SoundRef),
    SetVolume(f32),
    Play,
}

/// Shared log of playback calls.
pub type CallLog = Rc<RefCell<Vec<PlaybackCall>>>;

/// Playback fake that records every call and can be told to fail `load`.
#[derive(Debug, Default)]
pub struct RecordingPlayback {
    pub calls: CallLog,
    pub fail_load: Rc<RefCell<bool>>,
}

impl PlaybackService for RecordingPlayback {
    fn stop(&mut self) -> anyhow::Result<()> {
        self.calls.borrow_mut().push(PlaybackCall::Stop);
        Ok(())
    }

    fn load(&mut self, sound: &SoundRef) -> anyhow::Result<()> {
        if *self.fail_load.borrow() {
            anyhow::bail!("decoder rejected {sound}");
        }
        self.calls.borrow_mut().push(PlaybackCall::Load(sound.clone()));
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) -> anyhow::Result<()> {
        self.calls
            .borrow_mut()
            .push(PlaybackCall::SetVolume(volume.get()));
        Ok(())
    }

    fn play(&mut self) -> anyhow::Result<()> {
        self.calls.borrow_mut().push(PlaybackCall::Play);
        Ok(())
    }
}

/// Asset resolver backed by a fixed set of known references.
#[derive(Debug, Clone, Default)]
pub struct AssetSet(pub BTreeSet<String>);

impl AssetSet {
    pub fn of(sounds: &[&str]) -> Self {
        Self(sounds.iter().map(|s| (*s).to_string()).collect())
    }
}

impl AssetResolver for AssetSet {
    fn exists(&self, sound: &SoundRef) -> bool {
        self.0.contains(sound.as_str())
    }
}

/// Sounds every fixture session can bind.
pub const KNOWN_SOUNDS: [&str; 3] = ["x.mp3", "y.mp3", "z.mp3"];

/// Handles to the fakes inside a fixture session.
pub struct Harness {
    pub session: Session,
    pub calls: CallLog,
    pub fail_load: Rc<RefCell<bool>>,
    pub dir: TempDir,
}

impl Harness {
    /// Session over `registry` with a fresh template directory.
    pub fn with_registry(registry: KeyRegistry) -> Self {
        let dir = TempDir::new().unwrap();
        let (templates, _) = TemplateRepository::open(dir.path().join("templates")).unwrap();
        let store = BindingStore::new(Arc::new(registry), Box::new(AssetSet::of(&KNOWN_SOUNDS)));

        let playback = RecordingPlayback::default();
        let calls = Rc::clone(&playback.calls);
        let fail_load = Rc::clone(&playback.fail_load);

        Self {
            session: Session::new(store, templates, Box::new(playback)),
            calls,
            fail_load,
            dir,
        }
    }

    /// Session over the three-key keyboard {A, S, D}.
    pub fn small() -> Self {
        use keyaura::models::KeyId;
        Self::with_registry(KeyRegistry::from_keys([KeyId::A, KeyId::S, KeyId::D]))
    }

    /// Template directory of this harness.
    pub fn template_dir(&self) -> PathBuf {
        self.dir.path().join("templates")
    }

    /// Recorded calls so far.
    pub fn calls(&self) -> Vec<PlaybackCall> {
        self.calls.borrow().clone()
    }
}

/// Writes a small placeholder sound file and returns its path as text.
pub fn write_sound(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, b"RIFF\0\0\0\0WAVE").unwrap();
    path.to_string_lossy().into_owned()
}

/// Path to the keyaura binary
pub fn keyaura_bin() -> &'static str {
    env!("CARGO_BIN_EXE_keyaura")
}

/// Command with config and template directory isolated under `root`.
pub fn isolated_command(root: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(keyaura_bin());
    cmd.arg("--config")
        .arg(root.join("config.toml"))
        .arg("--template-dir")
        .arg(root.join("templates"))
        .args(args)
        .env_remove("RUST_LOG");
    cmd
}
