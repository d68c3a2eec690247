//! KeyAura - sound bindings for a virtual keyboard
//!
//! Binds sound files to keys, plays them on key presses, and manages
//! named templates of bindings.

use clap::{Parser, Subcommand};
use keyaura::cli::{
    CliResult, ConfigArgs, ExitCode, GlobalOptions, KeysArgs, ShellArgs, TemplateArgs,
};
use keyaura::logging::init_logging;
use std::path::PathBuf;

/// KeyAura - sound bindings for a virtual keyboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Template directory to use instead of the configured one
    #[arg(long, global = true, value_name = "DIR")]
    template_dir: Option<PathBuf>,

    /// Alternative config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive shell (default)
    Shell(ShellArgs),
    /// List the keys of the virtual keyboard
    Keys(KeysArgs),
    /// Manage saved templates
    Template(TemplateArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

fn run(cli: &Cli) -> CliResult<()> {
    let options = GlobalOptions {
        config: cli.config.clone(),
        template_dir: cli.template_dir.clone(),
    };

    match &cli.command {
        None => ShellArgs::default().execute(&options),
        Some(Command::Shell(args)) => args.execute(&options),
        Some(Command::Keys(args)) => args.execute(),
        Some(Command::Template(args)) => args.execute(&options),
        Some(Command::Config(args)) => args.execute(&options),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(&cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };
    std::process::exit(code.code());
}
