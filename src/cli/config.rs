//! Configuration management CLI commands.

use crate::cli::common::{print_json, CliError, CliResult, GlobalOptions};
use crate::config::Config;
use crate::constants::{APP_NAME, KNOWN_LAYOUT_TAGS};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
    /// Print the config file location
    Path,
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Startup volume (0.0 - 1.0)
    #[arg(long, value_name = "VOLUME")]
    volume: Option<f32>,

    /// Layout tag recorded with saved templates (67%, 75%, 100%)
    #[arg(long, value_name = "TAG")]
    layout: Option<String>,

    /// Template directory to store in the config file
    #[arg(long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Whether key presses play sounds
    #[arg(long, value_name = "BOOL")]
    enabled: Option<bool>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput {
    config_file: String,
    paths: PathsOutput,
    playback: PlaybackOutput,
    keyboard: KeyboardOutput,
}

#[derive(Serialize, Debug)]
struct PathsOutput {
    template_dir: String,
}

#[derive(Serialize, Debug)]
struct PlaybackOutput {
    volume: f32,
    enabled: bool,
}

#[derive(Serialize, Debug)]
struct KeyboardOutput {
    layout: String,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self, options: &GlobalOptions) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(options),
            ConfigCommand::Set(args) => args.execute(options),
            ConfigCommand::Path => {
                println!("{}", options.config_path()?.display());
                Ok(())
            }
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self, options: &GlobalOptions) -> CliResult<()> {
        let config = options.load_config()?;
        let output = ConfigOutput {
            config_file: options.config_path()?.display().to_string(),
            paths: PathsOutput {
                template_dir: options.template_dir(&config)?.display().to_string(),
            },
            playback: PlaybackOutput {
                volume: config.playback.volume,
                enabled: config.playback.enabled,
            },
            keyboard: KeyboardOutput {
                layout: config.keyboard.layout.clone(),
            },
        };

        if self.json {
            print_json(&output)
        } else {
            output_human_readable(&output);
            Ok(())
        }
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self, options: &GlobalOptions) -> CliResult<()> {
        if self.volume.is_none()
            && self.layout.is_none()
            && self.templates.is_none()
            && self.enabled.is_none()
        {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --volume, --layout, --templates, or --enabled",
            ));
        }

        let mut config = options.load_config().unwrap_or_else(|_| Config::default());

        if let Some(volume) = self.volume {
            if !(0.0..=1.0).contains(&volume) {
                return Err(CliError::validation(format!(
                    "Volume must be between 0.0 and 1.0, got {volume}"
                )));
            }
            config.playback.volume = volume;
        }

        if let Some(layout) = &self.layout {
            let layout = layout.trim();
            if layout.is_empty() {
                return Err(CliError::validation("Layout tag cannot be empty"));
            }
            if !KNOWN_LAYOUT_TAGS.contains(&layout) {
                eprintln!(
                    "Note: '{layout}' is not one of the preset layouts ({})",
                    KNOWN_LAYOUT_TAGS.join(", ")
                );
            }
            config.keyboard.layout = layout.to_string();
        }

        if let Some(dir) = &self.templates {
            std::fs::create_dir_all(dir).map_err(|e| {
                CliError::io(format!(
                    "Failed to create template directory {}: {e}",
                    dir.display()
                ))
            })?;
            config.paths.template_dir = Some(dir.clone());
        }

        if let Some(enabled) = self.enabled {
            config.playback.enabled = enabled;
        }

        let path = options.config_path()?;
        config
            .save_to(&path)
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");
        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(output: &ConfigOutput) {
    println!("{APP_NAME} Configuration");
    println!("=====================");
    println!();
    println!("Config file: {}", output.config_file);
    println!();
    println!("Paths:");
    println!("  Template Directory: {}", output.paths.template_dir);
    println!();
    println!("Playback:");
    println!("  Volume: {:.0}%", output.playback.volume * 100.0);
    println!(
        "  Sound: {}",
        if output.playback.enabled { "on" } else { "off" }
    );
    println!();
    println!("Keyboard:");
    println!("  Layout: {}", output.keyboard.layout);
    println!();
}
