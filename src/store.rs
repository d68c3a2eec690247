//! Live key bindings, the multi-key selection, and bulk edits over them.
//!
//! Every operation validates first and mutates second, so a failed call
//! leaves the store exactly as it was.

use crate::assets::AssetResolver;
use crate::error::{EngineError, EngineResult};
use crate::keyboard::KeyRegistry;
use crate::models::{BindingMap, KeyId, SelectionSet, SoundRef, Volume};
use crate::playback::PlaybackService;
use std::sync::Arc;
use tracing::{debug, warn};

/// Keys whose selection state changed, for repainting key caps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionChange {
    /// Keys that became selected
    pub selected: Vec<KeyId>,
    /// Keys that stopped being selected
    pub deselected: Vec<KeyId>,
}

impl SelectionChange {
    /// True if nothing changed (e.g. the key was not on this keyboard).
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.deselected.is_empty()
    }
}

/// What `trigger` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Sound is globally disabled; nothing was sent to playback.
    Muted,
    /// The key has no sound bound.
    Unbound,
    /// The bound sound was started.
    Played(SoundRef),
}

/// Result of replacing the bindings wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreOutcome {
    /// Keys deselected by the restore
    pub deselected: Vec<KeyId>,
    /// Keys present in the incoming map but not on this keyboard
    pub dropped: Vec<KeyId>,
}

/// Owner of the live binding map, selection set, volume and mute flag.
pub struct BindingStore {
    registry: Arc<KeyRegistry>,
    resolver: Box<dyn AssetResolver>,
    bindings: BindingMap,
    selection: SelectionSet,
    volume: Volume,
    enabled: bool,
}

impl BindingStore {
    /// Creates an empty store: nothing bound, nothing selected, sound enabled.
    pub fn new(registry: Arc<KeyRegistry>, resolver: Box<dyn AssetResolver>) -> Self {
        Self {
            registry,
            resolver,
            bindings: BindingMap::new(),
            selection: SelectionSet::default(),
            volume: Volume::default(),
            enabled: true,
        }
    }

    /// Sets the initial volume.
    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volume = volume;
        self
    }

    /// Sets the initial enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The keyboard this store binds keys of.
    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    /// Read-only view of the live bindings.
    pub fn bindings(&self) -> &BindingMap {
        &self.bindings
    }

    /// Read-only view of the selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Current volume.
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// False when sound is globally muted.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selects a key.
    ///
    /// Without `additive` the selection is replaced by `{id}` (every
    /// previously selected key is reported as deselected). With `additive`
    /// membership of `id` is toggled. Keys not on this keyboard are ignored.
    pub fn select_key(&mut self, id: KeyId, additive: bool) -> SelectionChange {
        if !self.registry.is_valid(id) {
            debug!("ignoring selection of {id}: not on this keyboard");
            return SelectionChange::default();
        }

        let mut change = SelectionChange::default();
        if additive {
            if self.selection.remove(id) {
                change.deselected.push(id);
            } else {
                self.selection.insert(id);
                change.selected.push(id);
            }
        } else {
            change.deselected = self.selection.take();
            self.selection.insert(id);
            change.selected.push(id);
        }

        debug!("{}", self.selection.describe());
        change
    }

    /// Empties the selection. Returns the keys that were selected.
    pub fn clear_selection(&mut self) -> Vec<KeyId> {
        self.selection.take()
    }

    // ------------------------------------------------------------------
    // Bindings
    // ------------------------------------------------------------------

    /// Binds `id` to `sound`, returning the sound it replaced.
    pub fn bind(&mut self, id: KeyId, sound: SoundRef) -> EngineResult<Option<SoundRef>> {
        self.ensure_key(id)?;
        self.ensure_asset(&sound)?;
        debug!("bind {id} -> {sound}");
        Ok(self.bindings.insert(id, sound))
    }

    /// Removes the binding of `id`, if any. Idempotent.
    pub fn unbind(&mut self, id: KeyId) -> Option<SoundRef> {
        let removed = self.bindings.remove(id);
        if removed.is_some() {
            debug!("unbind {id}");
        }
        removed
    }

    /// Binds every selected key to `sound`. All or nothing.
    ///
    /// Returns the number of keys bound.
    pub fn apply_to_selected(&mut self, sound: SoundRef) -> EngineResult<usize> {
        if self.selection.is_empty() {
            return Err(EngineError::EmptySelection);
        }
        self.ensure_asset(&sound)?;

        for key in self.selection.iter() {
            self.bindings.insert(key, sound.clone());
        }
        debug!("applied {sound} to {} selected keys", self.selection.len());
        Ok(self.selection.len())
    }

    /// Binds every key on the keyboard to `sound`, ignoring the selection.
    ///
    /// Returns the number of keys bound.
    pub fn apply_to_all(&mut self, sound: SoundRef) -> EngineResult<usize> {
        self.ensure_asset(&sound)?;

        for key in self.registry.all_keys() {
            self.bindings.insert(*key, sound.clone());
        }
        debug!("applied {sound} to all {} keys", self.registry.len());
        Ok(self.registry.len())
    }

    /// Unbinds every selected key.
    ///
    /// Returns the number of bindings actually removed.
    pub fn clear_selected_bindings(&mut self) -> EngineResult<usize> {
        if self.selection.is_empty() {
            return Err(EngineError::EmptySelection);
        }

        let removed = self
            .selection
            .iter()
            .filter(|key| self.bindings.remove(*key).is_some())
            .count();
        debug!("cleared {removed} bindings from selected keys");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    /// Plays the sound bound to `id`.
    ///
    /// Muted or unbound keys are silent, not errors. A playback failure is
    /// returned but never changes bindings or selection.
    pub fn trigger(
        &self,
        id: KeyId,
        playback: &mut dyn PlaybackService,
    ) -> EngineResult<TriggerOutcome> {
        if !self.enabled {
            return Ok(TriggerOutcome::Muted);
        }
        let Some(sound) = self.bindings.get(id) else {
            return Ok(TriggerOutcome::Unbound);
        };

        play_sound(playback, sound, self.volume)?;
        Ok(TriggerOutcome::Played(sound.clone()))
    }

    /// Plays an arbitrary asset at the current volume, ignoring the mute flag.
    pub fn preview(
        &self,
        sound: &SoundRef,
        playback: &mut dyn PlaybackService,
    ) -> EngineResult<()> {
        self.ensure_asset(sound)?;
        play_sound(playback, sound, self.volume)
    }

    /// Sets the volume and forwards it to any sound already playing.
    ///
    /// Out-of-range values fail with `InvalidVolume` and leave the volume unchanged.
    pub fn set_volume(&mut self, value: f32, playback: &mut dyn PlaybackService) -> EngineResult<()> {
        let volume = Volume::new(value)?;
        self.volume = volume;
        if let Err(e) = playback.set_volume(volume) {
            warn!("Failed to update playback volume: {e:#}");
        }
        Ok(())
    }

    /// Enables or mutes sound. Does not stop a sound already playing.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    // ------------------------------------------------------------------
    // Snapshot / restore
    // ------------------------------------------------------------------

    /// Independent copy of the live bindings.
    pub fn snapshot(&self) -> BindingMap {
        self.bindings.clone()
    }

    /// Replaces the live bindings wholesale and clears the selection.
    ///
    /// Entries for keys not on this keyboard are dropped.
    pub fn restore(&mut self, mut bindings: BindingMap) -> RestoreOutcome {
        let dropped: Vec<KeyId> = bindings
            .keys()
            .filter(|key| !self.registry.is_valid(*key))
            .collect();
        if !dropped.is_empty() {
            debug!("dropping {} bindings for keys not on this keyboard", dropped.len());
            bindings.retain(|key| self.registry.is_valid(key));
        }

        self.bindings = bindings;
        RestoreOutcome {
            deselected: self.selection.take(),
            dropped,
        }
    }

    fn ensure_key(&self, id: KeyId) -> EngineResult<()> {
        if self.registry.is_valid(id) {
            Ok(())
        } else {
            Err(EngineError::UnknownKey(id))
        }
    }

    fn ensure_asset(&self, sound: &SoundRef) -> EngineResult<()> {
        if !sound.is_empty() && self.resolver.exists(sound) {
            Ok(())
        } else {
            Err(EngineError::InvalidAsset(sound.clone()))
        }
    }
}

/// Runs the stop → load → set_volume → play sequence.
fn play_sound(
    playback: &mut dyn PlaybackService,
    sound: &SoundRef,
    volume: Volume,
) -> EngineResult<()> {
    let result = playback
        .stop()
        .and_then(|()| playback.load(sound))
        .and_then(|()| playback.set_volume(volume))
        .and_then(|()| playback.play());

    result.map_err(|source| {
        warn!("Could not play {sound}: {source:#}");
        EngineError::Playback {
            sound: sound.clone(),
            source,
        }
    })
}
