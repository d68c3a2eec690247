//! Shared types for CLI command handlers.

use crate::config::Config;
use crate::error::EngineError;
use crate::session::Session;
use crate::templates::{ScanReport, TemplateRepository};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Process exit codes used by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Bad input, unknown template, empty selection, ...
    ValidationError = 1,
    /// Filesystem, persistence or playback failure
    IoError = 2,
}

impl ExitCode {
    /// Numeric process exit code.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error class of a failed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorKind {
    /// The request itself was wrong
    Validation,
    /// The environment failed the request
    Io,
}

/// Error returned by command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Error class, decides the exit code
    pub kind: CliErrorKind,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Validation failure (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Validation,
            message: message.into(),
        }
    }

    /// I/O failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Io,
            message: message.into(),
        }
    }

    /// Exit code for this error.
    pub const fn exit_code(&self) -> ExitCode {
        match self.kind {
            CliErrorKind::Validation => ExitCode::ValidationError,
            CliErrorKind::Io => ExitCode::IoError,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        if err.is_validation() {
            Self::validation(err.to_string())
        } else {
            Self::io(err.to_string())
        }
    }
}

/// Result type for command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Alternative config file
    pub config: Option<PathBuf>,
    /// Template directory for this invocation only
    pub template_dir: Option<PathBuf>,
}

impl GlobalOptions {
    /// Config file in effect.
    pub fn config_path(&self) -> CliResult<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_file_path()
                .map_err(|e| CliError::io(format!("Failed to locate configuration: {e:#}"))),
        }
    }

    /// Loads the configuration (defaults if the file is missing).
    pub fn load_config(&self) -> CliResult<Config> {
        let path = self.config_path()?;
        Config::load_from(&path)
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
    }

    /// Template directory in effect.
    pub fn template_dir(&self, config: &Config) -> CliResult<PathBuf> {
        match &self.template_dir {
            Some(dir) => Ok(dir.clone()),
            None => config
                .template_dir()
                .map_err(|e| CliError::io(format!("Failed to locate template directory: {e:#}"))),
        }
    }

    /// Opens the template repository, reporting skipped records on stderr.
    pub fn open_repository(&self) -> CliResult<TemplateRepository> {
        let config = self.load_config()?;
        let dir = self.template_dir(&config)?;
        let (repository, report) = TemplateRepository::open(dir)?;
        report_skipped(&report);
        Ok(repository)
    }

    /// Builds a full session from configuration.
    pub fn open_session(&self) -> CliResult<Session> {
        let config = self.load_config()?;
        let dir = self.template_dir(&config)?;
        let (session, report) = Session::from_config(&config, Some(dir))
            .map_err(|e| CliError::io(format!("{e:#}")))?;
        report_skipped(&report);
        Ok(session)
    }
}

/// Prints one line per record that could not be loaded.
pub fn report_skipped(report: &ScanReport) {
    for skipped in &report.skipped {
        eprintln!(
            "Warning: skipped template record {}: {}",
            skipped.path.display(),
            skipped.reason
        );
    }
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}
