//! Template management commands.

use crate::assets::FsAssetResolver;
use crate::cli::common::{print_json, CliError, CliResult, GlobalOptions};
use crate::keyboard::KeyRegistry;
use crate::models::{BindingMap, KeyId, SoundRef, TemplateName, TemplateSummary};
use crate::store::BindingStore;
use chrono::{DateTime, Local, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::sync::Arc;

/// Manage saved binding templates
#[derive(Debug, Clone, Args)]
pub struct TemplateArgs {
    /// Template subcommand
    #[command(subcommand)]
    pub command: TemplateCommand,
}

/// Template subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum TemplateCommand {
    /// List saved templates
    List(ListArgs),
    /// Show the bindings of a template
    Show(ShowArgs),
    /// Save a template from key bindings given on the command line
    Save(SaveArgs),
    /// Delete a template
    Delete(DeleteArgs),
}

/// List saved templates
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Show one template
#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// Template name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Save a template
#[derive(Debug, Clone, Args)]
pub struct SaveArgs {
    /// Template name
    #[arg(short, long, value_name = "NAME")]
    pub name: String,

    /// Layout tag (defaults to the configured layout)
    #[arg(short, long, value_name = "TAG")]
    pub layout: Option<String>,

    /// Key binding, repeatable (e.g. --bind A=sounds/click.wav)
    #[arg(short, long, value_name = "KEY=PATH", value_parser = parse_binding)]
    pub bind: Vec<(KeyId, SoundRef)>,

    /// Sound bound to every key before --bind entries are applied
    #[arg(long, value_name = "PATH")]
    pub all: Option<String>,
}

/// Delete a template
#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    /// Template name
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Template list response
#[derive(Debug, Clone, Serialize)]
pub struct TemplateListResponse {
    /// Templates in catalog order
    pub templates: Vec<TemplateSummary>,
    /// Total number of templates
    pub count: usize,
    /// Directory the templates were read from
    pub directory: String,
}

/// Full template for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct TemplateDetail {
    /// Template name
    pub name: String,
    /// Layout tag
    pub layout: String,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Key bindings
    pub bindings: BindingMap,
}

impl TemplateArgs {
    /// Execute the template command
    pub fn execute(&self, options: &GlobalOptions) -> CliResult<()> {
        match &self.command {
            TemplateCommand::List(args) => args.execute(options),
            TemplateCommand::Show(args) => args.execute(options),
            TemplateCommand::Save(args) => args.execute(options),
            TemplateCommand::Delete(args) => args.execute(options),
        }
    }
}

impl ListArgs {
    /// Execute the list command
    pub fn execute(&self, options: &GlobalOptions) -> CliResult<()> {
        let repository = options.open_repository()?;
        let templates = repository.list();
        let response = TemplateListResponse {
            count: templates.len(),
            templates,
            directory: repository.dir().display().to_string(),
        };

        if self.json {
            return print_json(&response);
        }

        if response.count == 0 {
            println!("No templates found.");
        } else {
            println!("Saved templates ({}):\n", response.count);
            for template in &response.templates {
                println!(
                    "  {} [{}] {} keys, created {}",
                    template.name,
                    template.layout_tag,
                    template.binding_count,
                    format_created(template.created_at)
                );
            }
            println!();
        }
        println!("Template directory: {}", response.directory);
        Ok(())
    }
}

impl ShowArgs {
    /// Execute the show command
    pub fn execute(&self, options: &GlobalOptions) -> CliResult<()> {
        let repository = options.open_repository()?;
        let template = repository
            .get(&self.name)
            .ok_or_else(|| CliError::validation(format!("Template '{}' not found", self.name)))?;

        if self.json {
            return print_json(&TemplateDetail {
                name: template.name.to_string(),
                layout: template.layout_tag.clone(),
                created: template.created_at,
                bindings: template.bindings.clone(),
            });
        }

        println!("Template: {}", template.name);
        println!("Layout:   {}", template.layout_tag);
        println!("Created:  {}", format_created(template.created_at));
        if template.bindings.is_empty() {
            println!("\nNo keys bound.");
        } else {
            println!("\nBindings ({}):", template.bindings.len());
            for (key, sound) in &template.bindings {
                println!("  {key:<6} {sound}");
            }
        }
        Ok(())
    }
}

impl SaveArgs {
    /// Execute the save command
    pub fn execute(&self, options: &GlobalOptions) -> CliResult<()> {
        let name = TemplateName::new(&self.name)?;
        let config = options.load_config()?;

        let mut store = BindingStore::new(
            Arc::new(KeyRegistry::standard()),
            Box::new(FsAssetResolver),
        );
        if let Some(all) = &self.all {
            store.apply_to_all(SoundRef::new(all.as_str()))?;
        }
        for (key, sound) in &self.bind {
            store.bind(*key, sound.clone())?;
        }

        let layout = self
            .layout
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .unwrap_or(&config.keyboard.layout);

        let mut repository = options.open_repository()?;
        let replacing = repository.contains(name.as_str());
        let template = repository.save(name, store.snapshot(), layout)?;

        println!(
            "{} template '{}' ({} keys, layout {})",
            if replacing { "Updated" } else { "Saved" },
            template.name,
            template.bindings.len(),
            template.layout_tag
        );
        Ok(())
    }
}

impl DeleteArgs {
    /// Execute the delete command
    pub fn execute(&self, options: &GlobalOptions) -> CliResult<()> {
        let mut repository = options.open_repository()?;
        let deleted = repository.delete(&self.name)?;
        println!("Deleted template '{}'", deleted.name);
        Ok(())
    }
}

/// Parses a `KEY=PATH` binding argument.
fn parse_binding(value: &str) -> Result<(KeyId, SoundRef), String> {
    let (key, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=PATH, got '{value}'"))?;
    let key: KeyId = key.parse().map_err(|e| format!("{e}"))?;
    let sound = SoundRef::new(path);
    if sound.is_empty() {
        return Err(format!("missing sound path for key {key}"));
    }
    Ok((key, sound))
}

/// Local time in the `%Y-%m-%d %H:%M:%S` format used by the template browser.
fn format_created(created: DateTime<Utc>) -> String {
    created
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
