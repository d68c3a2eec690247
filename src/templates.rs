//! Template repository: the catalog of saved templates and its records.
//!
//! The in-memory catalog is the source of truth for which templates exist.
//! It is changed only after the matching storage operation succeeded, so
//! catalog and directory never disagree about a successful save.

use anyhow::anyhow;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{BindingMap, Template, TemplateName, TemplateSummary};
use crate::services::templates::{self as records, SkippedRecord};

/// Summary of a directory scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Templates now in the catalog
    pub loaded: usize,
    /// Records that could not be loaded
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    template: Template,
    /// Every record carrying this name; the last one supplied `template`.
    paths: Vec<PathBuf>,
}

impl CatalogEntry {
    fn backed_by(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| same_record(p, path))
    }
}

/// Owns the template catalog and the directory its records live in.
#[derive(Debug)]
pub struct TemplateRepository {
    dir: PathBuf,
    catalog: Vec<CatalogEntry>,
}

impl TemplateRepository {
    /// Creates a repository over `dir` with an empty catalog. Touches nothing on disk.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            catalog: Vec::new(),
        }
    }

    /// Creates the directory if needed and loads every record in it.
    pub fn open(dir: impl Into<PathBuf>) -> EngineResult<(Self, ScanReport)> {
        let mut repository = Self::new(dir);
        fs::create_dir_all(&repository.dir)
            .map_err(|e| EngineError::persistence("create", &repository.dir, e))?;
        let report = repository.reload()?;
        Ok((repository, report))
    }

    /// Directory holding the records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// True if there are no templates.
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// True if a template named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Read-only access to a stored template.
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.position(name).map(|index| &self.catalog[index].template)
    }

    /// Record file the template's content was read from or written to.
    pub fn record_path(&self, name: &str) -> Option<&Path> {
        self.position(name)
            .and_then(|index| self.catalog[index].paths.last())
            .map(PathBuf::as_path)
    }

    /// Saves `bindings` under `name`, overwriting any template of that name.
    ///
    /// The record is written first; the catalog is only updated once the
    /// write succeeded. A different template whose record already occupies
    /// `<name>.json` is moved to its own file beforehand.
    pub fn save(
        &mut self,
        name: TemplateName,
        bindings: BindingMap,
        layout_tag: &str,
    ) -> EngineResult<Template> {
        let template = Template {
            name,
            bindings,
            layout_tag: layout_tag.to_string(),
            created_at: Utc::now(),
        };
        let path = records::record_path(&self.dir, &template.name);

        self.release_record(&template.name, &path)?;
        records::write_template(&template, &path)
            .map_err(|e| EngineError::persistence("write", &path, e))?;

        let entry = CatalogEntry {
            template: template.clone(),
            paths: vec![path.clone()],
        };
        match self.position(template.name.as_str()) {
            Some(index) => {
                let previous = std::mem::replace(&mut self.catalog[index], entry);
                // Records loaded from other file names are superseded by the new one
                for old in previous.paths.iter().filter(|p| !same_record(p, &path)) {
                    remove_best_effort(old);
                }
                info!("Template '{}' overwritten", template.name);
            }
            None => {
                self.catalog.push(entry);
                info!("Template '{}' saved", template.name);
            }
        }

        Ok(template)
    }

    /// Copy of the bindings stored under `name`.
    pub fn load(&self, name: &str) -> EngineResult<BindingMap> {
        self.get(name)
            .map(|template| template.bindings.clone())
            .ok_or_else(|| EngineError::NotFound(name.trim().to_string()))
    }

    /// Deletes a template and every record carrying its name.
    ///
    /// Removing the records is best-effort: once the name is known the
    /// template is gone from the catalog even if a file could not be removed.
    pub fn delete(&mut self, name: &str) -> EngineResult<Template> {
        let index = self
            .position(name)
            .ok_or_else(|| EngineError::NotFound(name.trim().to_string()))?;

        let entry = self.catalog.remove(index);
        for path in &entry.paths {
            remove_best_effort(path);
        }
        info!("Template '{}' deleted", entry.template.name);
        Ok(entry.template)
    }

    /// Templates in catalog order (discovery order, then save order).
    pub fn list(&self) -> Vec<TemplateSummary> {
        self.catalog
            .iter()
            .map(|entry| entry.template.summary())
            .collect()
    }

    /// Re-scans the directory and replaces the whole catalog.
    ///
    /// Corrupt records are skipped and reported. If the directory itself
    /// cannot be read the current catalog is kept.
    pub fn reload(&mut self) -> EngineResult<ScanReport> {
        let outcome = records::scan_dir(&self.dir)
            .map_err(|e| EngineError::persistence("read", &self.dir, e))?;

        let mut catalog: Vec<CatalogEntry> = Vec::with_capacity(outcome.templates.len());
        for (path, template) in outcome.templates {
            if let Some(existing) = catalog
                .iter_mut()
                .find(|e| e.template.name == template.name)
            {
                warn!(
                    "Template '{}' is defined by {} records; using {}",
                    template.name,
                    existing.paths.len() + 1,
                    path.display()
                );
                existing.template = template;
                existing.paths.push(path);
            } else {
                catalog.push(CatalogEntry {
                    template,
                    paths: vec![path],
                });
            }
        }

        self.catalog = catalog;
        info!(
            "Loaded {} templates from {} ({} skipped)",
            self.catalog.len(),
            self.dir.display(),
            outcome.skipped.len()
        );

        Ok(ScanReport {
            loaded: self.catalog.len(),
            skipped: outcome.skipped,
        })
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = TemplateName::new(name).ok()?;
        self.catalog
            .iter()
            .position(|entry| entry.template.name == name)
    }

    /// Moves a template other than `name` whose record sits at `path` to its own file.
    ///
    /// Fails without touching anything if that file is itself in use.
    fn release_record(&mut self, name: &TemplateName, path: &Path) -> EngineResult<()> {
        let Some(index) = self
            .catalog
            .iter()
            .position(|entry| entry.template.name != *name && entry.backed_by(path))
        else {
            return Ok(());
        };

        let other = &self.catalog[index].template;
        let own_path = records::record_path(&self.dir, &other.name);
        let taken = same_record(&own_path, path)
            || self
                .catalog
                .iter()
                .enumerate()
                .any(|(i, entry)| i != index && entry.backed_by(&own_path));
        if taken {
            return Err(EngineError::persistence(
                "write",
                path,
                anyhow!("record file is in use by template '{}'", other.name),
            ));
        }

        records::write_template(other, &own_path)
            .map_err(|e| EngineError::persistence("write", &own_path, e))?;

        let entry = &mut self.catalog[index];
        entry
            .paths
            .retain(|p| !same_record(p, path) && !same_record(p, &own_path));
        entry.paths.push(own_path);
        info!(
            "Moved template '{}' from {} to its own record",
            entry.template.name,
            path.display()
        );
        Ok(())
    }
}

/// True if both paths name the same record. File names are compared without
/// case on platforms whose filesystems usually fold case.
fn same_record(a: &Path, b: &Path) -> bool {
    if !cfg!(any(windows, target_os = "macos")) {
        return a == b;
    }
    match (
        a.file_name().and_then(|n| n.to_str()),
        b.file_name().and_then(|n| n.to_str()),
    ) {
        (Some(x), Some(y)) => a.parent() == b.parent() && x.to_lowercase() == y.to_lowercase(),
        _ => a == b,
    }
}

fn remove_best_effort(path: &Path) {
    match records::remove_record(path) {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Record {} was already gone", path.display());
        }
        Err(e) => warn!("Failed to remove {}: {e}", path.display()),
    }
}
