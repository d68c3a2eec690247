//! Template record file I/O service.
//!
//! This module centralizes all template file operations: the on-disk record
//! shape, atomic writes, tolerant reads, and directory scans.
//!
//! # Record format
//!
//! ```json
//! {
//!   "name": "Drums",
//!   "bindings": { "A": "/sounds/kick.wav", "Space": "/sounds/snare.wav" },
//!   "layout": "100%",
//!   "created": "2025-01-01T12:00:00Z"
//! }
//! ```
//!
//! Older records use `key_sounds` instead of `bindings` and a local
//! `YYYY-MM-DD HH:MM:SS` creation time; both are read transparently.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::warn;

use crate::constants::{DEFAULT_LAYOUT_TAG, TEMPLATE_EXTENSION};
use crate::models::{BindingMap, KeyId, SoundRef, Template, TemplateName};

/// Legacy creation time format (local time).
const LEGACY_CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Persisted shape of a template.
#[derive(Debug, Serialize, Deserialize)]
struct TemplateRecord {
    name: String,
    #[serde(alias = "key_sounds")]
    bindings: BTreeMap<String, Option<String>>,
    #[serde(default = "default_layout")]
    layout: String,
    #[serde(
        default,
        deserialize_with = "deserialize_created",
        skip_serializing_if = "Option::is_none"
    )]
    created: Option<DateTime<Utc>>,
}

fn default_layout() -> String {
    DEFAULT_LAYOUT_TAG.to_string()
}

/// Accepts RFC 3339 or the legacy local format; anything else reads as absent.
fn deserialize_created<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_created))
}

fn parse_created(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, LEGACY_CREATED_FORMAT).ok()?;
    Some(
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map_or_else(|| Utc.from_utc_datetime(&naive), |dt| dt.with_timezone(&Utc)),
    )
}

impl From<&Template> for TemplateRecord {
    fn from(template: &Template) -> Self {
        Self {
            name: template.name.to_string(),
            bindings: template
                .bindings
                .iter()
                .map(|(key, sound)| (key.to_string(), Some(sound.to_string())))
                .collect(),
            layout: template.layout_tag.clone(),
            created: Some(template.created_at),
        }
    }
}

impl TemplateRecord {
    /// Validates the record and converts it into a template.
    ///
    /// `fallback_created` is used when the record carries no usable timestamp.
    fn into_template(self, fallback_created: DateTime<Utc>) -> Result<Template> {
        let name = TemplateName::new(&self.name)?;

        let mut bindings = BindingMap::new();
        for (key, sound) in self.bindings {
            let key: KeyId = key.parse()?;
            match sound.map(SoundRef::new) {
                Some(sound) if !sound.is_empty() => {
                    bindings.insert(key, sound);
                }
                _ => {}
            }
        }

        let layout_tag = if self.layout.trim().is_empty() {
            default_layout()
        } else {
            self.layout
        };

        Ok(Template {
            name,
            bindings,
            layout_tag,
            created_at: self.created.unwrap_or(fallback_created),
        })
    }
}

/// A record that could not be loaded during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Record file
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: String,
}

/// Result of scanning a template directory.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Loaded templates with the file each came from, in discovery order
    pub templates: Vec<(PathBuf, Template)>,
    /// Records that failed to load
    pub skipped: Vec<SkippedRecord>,
}

/// Path of the record file for `name` inside `dir`.
pub fn record_path(dir: &Path, name: &TemplateName) -> PathBuf {
    dir.join(format!("{}.{TEMPLATE_EXTENSION}", name.as_str()))
}

/// Saves a template record.
///
/// This performs an atomic write using a temp file + rename pattern so a
/// record is never left half-written.
pub fn write_template(template: &Template, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create template directory: {}", parent.display())
        })?;
    }

    let content = serde_json::to_string_pretty(&TemplateRecord::from(template))
        .context("Failed to serialize template")?;

    let temp_path = path.with_extension(format!("{TEMPLATE_EXTENSION}.tmp"));
    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e)
            .with_context(|| format!("Failed to move temp file into place: {}", path.display()));
    }

    Ok(())
}

/// Loads a template record.
///
/// A record without a usable creation time gets the file's modification time.
pub fn read_template(path: &Path) -> Result<Template> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let record: TemplateRecord = serde_json::from_str(&content)
        .with_context(|| format!("Invalid template record {}", path.display()))?;

    let fallback_created = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_or_else(|_| DateTime::<Utc>::from(UNIX_EPOCH), DateTime::<Utc>::from);

    record
        .into_template(fallback_created)
        .with_context(|| format!("Invalid template record {}", path.display()))
}

/// Removes a record file.
pub fn remove_record(path: &Path) -> std::io::Result<()> {
    fs::remove_file(path)
}

/// Scans `dir` for `*.json` records.
///
/// A missing directory yields an empty outcome. Records that fail to load are
/// reported in `skipped` and logged; they never abort the scan.
pub fn scan_dir(dir: &Path) -> Result<ScanOutcome> {
    let mut outcome = ScanOutcome::default();

    if !dir.exists() {
        return Ok(outcome);
    }

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read template directory: {}", dir.display()))?;

    for entry in entries {
        scan_entry(&mut outcome, dir, entry);
    }

    Ok(outcome)
}

/// Loads one directory entry into `outcome`, recording any failure as skipped.
fn scan_entry(outcome: &mut ScanOutcome, dir: &Path, entry: std::io::Result<fs::DirEntry>) {
    let path = match entry {
        Ok(entry) => entry.path(),
        Err(e) => {
            warn!("Skipping unreadable entry in {}: {e}", dir.display());
            outcome.skipped.push(SkippedRecord {
                path: dir.to_path_buf(),
                reason: format!("Failed to read directory entry: {e}"),
            });
            return;
        }
    };

    if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some(TEMPLATE_EXTENSION) {
        return;
    }

    match read_template(&path) {
        Ok(template) => outcome.templates.push((path, template)),
        Err(e) => {
            warn!("Skipping template {}: {e:#}", path.display());
            outcome.skipped.push(SkippedRecord {
                path,
                reason: format!("{e:#}"),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(name: &str) -> Template {
        Template {
            name: TemplateName::new(name).unwrap(),
            bindings: [
                (KeyId::A, SoundRef::new("/s/kick.wav")),
                (KeyId::Space, SoundRef::new("/s/snare.wav")),
            ]
            .into_iter()
            .collect(),
            layout_tag: "75%".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_write_then_read() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let template = sample("Drums");
        let path = record_path(temp_dir.path(), &template.name);
        assert_eq!(path.file_name().unwrap(), "Drums.json");

        write_template(&template, &path)?;
        assert_eq!(read_template(&path)?, template);
        // No temp file left behind
        assert!(!path.with_extension("json.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_written_shape() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let template = sample("Drums");
        let path = record_path(temp_dir.path(), &template.name);
        write_template(&template, &path)?;

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(value["name"], "Drums");
        assert_eq!(value["bindings"]["A"], "/s/kick.wav");
        assert_eq!(value["bindings"]["Space"], "/s/snare.wav");
        assert_eq!(value["layout"], "75%");
        assert_eq!(value["created"], "2025-01-01T12:00:00Z");
        Ok(())
    }

    #[test]
    fn test_read_legacy_record() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("old.json");
        fs::write(
            &path,
            r#"{
  "name": "Old Kit",
  "key_sounds": { "Q": "q.mp3", "Shift": null },
  "created": "2024-03-05 10:20:30"
}"#,
        )?;

        let template = read_template(&path)?;
        assert_eq!(template.name.as_str(), "Old Kit");
        assert_eq!(template.layout_tag, "100%");
        assert_eq!(template.bindings.len(), 1);
        assert_eq!(template.bindings.get(KeyId::Q), Some(&SoundRef::new("q.mp3")));
        let expected = Local
            .with_ymd_and_hms(2024, 3, 5, 10, 20, 30)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(template.created_at, expected);
        Ok(())
    }

    #[test]
    fn test_missing_created_uses_mtime() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("t.json");
        fs::write(&path, r#"{"name": "T", "bindings": {}}"#)?;
        let template = read_template(&path)?;
        assert!(template.created_at > DateTime::<Utc>::from(UNIX_EPOCH));
        Ok(())
    }

    #[test]
    fn test_invalid_records() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cases = [
            ("garbage.json", "{ not json"),
            ("noname.json", r#"{"bindings": {}}"#),
            ("badname.json", r#"{"name": "", "bindings": {}}"#),
            ("badkey.json", r#"{"name": "K", "bindings": {"F13": "x.wav"}}"#),
        ];
        for (file, content) in cases {
            let path = temp_dir.path().join(file);
            fs::write(&path, content)?;
            assert!(read_template(&path).is_err(), "{file} should be rejected");
        }
        Ok(())
    }

    #[test]
    fn test_scan_skips_bad_records() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let good = sample("Good");
        write_template(&good, &record_path(temp_dir.path(), &good.name))?;
        fs::write(temp_dir.path().join("bad.json"), "{ nope")?;
        fs::write(temp_dir.path().join("notes.txt"), "ignored")?;

        let outcome = scan_dir(temp_dir.path())?;
        assert_eq!(outcome.templates.len(), 1);
        assert_eq!(outcome.templates[0].1, good);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].path.ends_with("bad.json"));
        Ok(())
    }

    #[test]
    fn test_scan_reports_unreadable_entry() {
        let temp_dir = TempDir::new().unwrap();
        let mut outcome = ScanOutcome::default();

        scan_entry(
            &mut outcome,
            temp_dir.path(),
            Err(std::io::Error::other("stale handle")),
        );

        assert!(outcome.templates.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, temp_dir.path());
        assert!(outcome.skipped[0].reason.contains("stale handle"));
    }

    #[test]
    fn test_scan_missing_dir() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let outcome = scan_dir(&temp_dir.path().join("absent"))?;
        assert!(outcome.templates.is_empty());
        assert!(outcome.skipped.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_created_formats() {
        assert!(parse_created("2025-01-01T00:00:00+02:00").is_some());
        assert!(parse_created("2025-01-01 00:00:00").is_some());
        assert!(parse_created("Unknown").is_none());
    }
}
