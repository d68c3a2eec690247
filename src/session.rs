//! The running application context.
//!
//! A [`Session`] owns everything one user interaction needs: the binding
//! store, the template repository, the playback backend, the layout tag and
//! the name of the last loaded template. UI front ends hold a `Session` and
//! route every event through it.

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::assets::FsAssetResolver;
use crate::config::Config;
use crate::constants::DEFAULT_LAYOUT_TAG;
use crate::error::EngineResult;
use crate::keyboard::KeyRegistry;
use crate::models::{KeyId, SoundRef, Template, TemplateName};
use crate::playback::{self, PlaybackService};
use crate::store::{BindingStore, RestoreOutcome, SelectionChange, TriggerOutcome};
use crate::templates::{ScanReport, TemplateRepository};

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// Selection update caused by the press
    pub change: SelectionChange,
    /// Playback result of the press
    pub outcome: TriggerOutcome,
}

/// Engine state for one user.
pub struct Session {
    store: BindingStore,
    templates: TemplateRepository,
    playback: Box<dyn PlaybackService>,
    layout_tag: String,
    current_template: Option<TemplateName>,
}

impl Session {
    /// Assembles a session from its parts.
    pub fn new(
        store: BindingStore,
        templates: TemplateRepository,
        playback: Box<dyn PlaybackService>,
    ) -> Self {
        Self {
            store,
            templates,
            playback,
            layout_tag: DEFAULT_LAYOUT_TAG.to_string(),
            current_template: None,
        }
    }

    /// Builds the application session from configuration.
    ///
    /// Uses the standard keyboard, the filesystem asset resolver and the best
    /// available playback backend. `template_dir` overrides the configured
    /// template directory.
    pub fn from_config(
        config: &Config,
        template_dir: Option<PathBuf>,
    ) -> anyhow::Result<(Self, ScanReport)> {
        let template_dir = match template_dir {
            Some(dir) => dir,
            None => config.template_dir()?,
        };
        let (templates, report) = TemplateRepository::open(&template_dir).context(format!(
            "Failed to open template directory: {}",
            template_dir.display()
        ))?;

        let store = BindingStore::new(
            Arc::new(KeyRegistry::standard()),
            Box::new(FsAssetResolver),
        )
        .with_volume(config.volume()?)
        .with_enabled(config.playback.enabled);

        let mut session = Self::new(store, templates, playback::default_backend());
        session.set_layout_tag(&config.keyboard.layout);
        Ok((session, report))
    }

    /// Read-only access to the binding store.
    pub fn store(&self) -> &BindingStore {
        &self.store
    }

    /// Mutable access to the binding store for edits that need no playback.
    pub fn store_mut(&mut self) -> &mut BindingStore {
        &mut self.store
    }

    /// Read-only access to the template catalog.
    pub fn templates(&self) -> &TemplateRepository {
        &self.templates
    }

    /// Layout tag recorded with saved templates.
    pub fn layout_tag(&self) -> &str {
        &self.layout_tag
    }

    /// Sets the layout tag. Blank tags fall back to the default.
    pub fn set_layout_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        self.layout_tag = if tag.is_empty() {
            DEFAULT_LAYOUT_TAG.to_string()
        } else {
            tag.to_string()
        };
        debug!("layout set to {}", self.layout_tag);
    }

    /// Name of the last loaded or saved template.
    pub fn current_template(&self) -> Option<&TemplateName> {
        self.current_template.as_ref()
    }

    // ------------------------------------------------------------------
    // Keys and sound
    // ------------------------------------------------------------------

    /// A click on a key: updates the selection, then plays the key's sound.
    ///
    /// The selection update stands even if playback fails.
    pub fn press_key(&mut self, id: KeyId, additive: bool) -> EngineResult<KeyPress> {
        let change = self.store.select_key(id, additive);
        let outcome = self.store.trigger(id, self.playback.as_mut())?;
        Ok(KeyPress { change, outcome })
    }

    /// Plays the sound bound to `id` without touching the selection.
    pub fn trigger(&mut self, id: KeyId) -> EngineResult<TriggerOutcome> {
        self.store.trigger(id, self.playback.as_mut())
    }

    /// Plays an asset before binding it. Ignores the mute flag.
    pub fn preview(&mut self, sound: &SoundRef) -> EngineResult<()> {
        self.store.preview(sound, self.playback.as_mut())
    }

    /// Sets the volume (0.0 - 1.0).
    pub fn set_volume(&mut self, value: f32) -> EngineResult<()> {
        self.store.set_volume(value, self.playback.as_mut())
    }

    // ------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------

    /// Saves the live bindings under `name` with the current layout tag.
    pub fn save_template(&mut self, name: &str) -> EngineResult<Template> {
        let name = TemplateName::new(name)?;
        let template = self
            .templates
            .save(name, self.store.snapshot(), &self.layout_tag)?;
        self.current_template = Some(template.name.clone());
        Ok(template)
    }

    /// Replaces the live bindings with a stored template.
    ///
    /// The selection is cleared and the template's layout tag becomes the
    /// session's.
    pub fn load_template(&mut self, name: &str) -> EngineResult<RestoreOutcome> {
        let bindings = self.templates.load(name)?;
        let (template_name, layout_tag) = match self.templates.get(name) {
            Some(template) => (template.name.clone(), template.layout_tag.clone()),
            None => (TemplateName::new(name)?, DEFAULT_LAYOUT_TAG.to_string()),
        };

        let outcome = self.store.restore(bindings);
        self.set_layout_tag(&layout_tag);
        info!("Template '{template_name}' loaded");
        self.current_template = Some(template_name);
        Ok(outcome)
    }

    /// Deletes a stored template. The live bindings are not affected.
    pub fn delete_template(&mut self, name: &str) -> EngineResult<Template> {
        let deleted = self.templates.delete(name)?;
        if self.current_template.as_ref() == Some(&deleted.name) {
            self.current_template = None;
        }
        Ok(deleted)
    }

    /// Re-reads the template directory.
    pub fn reload_templates(&mut self) -> EngineResult<ScanReport> {
        let report = self.templates.reload()?;
        if let Some(current) = &self.current_template {
            if !self.templates.contains(current.as_str()) {
                self.current_template = None;
            }
        }
        Ok(report)
    }
}
