//! CLI command handlers for KeyAura.
//!
//! Each subcommand is a clap `Args` struct with an `execute` method. The
//! interactive shell is the default command.

pub mod common;
pub mod config;
pub mod keys;
pub mod shell;
pub mod template;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode, GlobalOptions};
pub use config::ConfigArgs;
pub use keys::KeysArgs;
pub use shell::{Shell, ShellArgs, ShellCommand};
pub use template::TemplateArgs;
