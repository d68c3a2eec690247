//! Interactive shell: one line of input is one UI event.
//!
//! Every command is routed through a [`Session`], the same way a graphical
//! front end would route clicks and menu actions.

use crate::cli::common::{report_skipped, CliError, CliResult, GlobalOptions};
use crate::constants::{APP_BINARY_NAME, APP_NAME, KNOWN_LAYOUT_TAGS};
use crate::error::EngineError;
use crate::keyboard::KeyboardView;
use crate::models::{KeyId, SoundRef};
use crate::session::Session;
use crate::store::TriggerOutcome;
use clap::Args;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Start the interactive shell (default command)
#[derive(Debug, Clone, Args, Default)]
pub struct ShellArgs {}

impl ShellArgs {
    /// Execute the shell command
    pub fn execute(&self, options: &GlobalOptions) -> CliResult<()> {
        let session = options.open_session()?;
        let mut shell = Shell::new(session);

        let stdin = io::stdin();
        let stdout = io::stdout();
        shell
            .run(stdin.lock(), stdout.lock())
            .map_err(|e| CliError::io(format!("Terminal I/O failed: {e}")))
    }
}

/// Commands understood by the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    /// List the keyboard rows
    Keys,
    /// Draw the keyboard and status
    Show,
    /// Click a key (`additive` = with Ctrl held)
    Press {
        /// Key clicked
        key: KeyId,
        /// Ctrl-click
        additive: bool,
    },
    /// Replace the selection with one key, silently
    Select(KeyId),
    /// Toggle one key in the selection, silently
    Toggle(KeyId),
    /// Empty the selection
    Deselect,
    /// Bind one key
    Bind(KeyId, SoundRef),
    /// Unbind one key
    Unbind(KeyId),
    /// Bind every selected key
    Apply(SoundRef),
    /// Bind every key
    ApplyAll(SoundRef),
    /// Unbind every selected key
    ClearSelected,
    /// Play a sound file without binding it
    Preview(SoundRef),
    /// Set the volume
    Volume(f32),
    /// Turn key sounds off
    Mute,
    /// Turn key sounds on
    Unmute,
    /// Set the layout tag
    Layout(String),
    /// Save the bindings as a template
    Save(String),
    /// Load a template
    Load(String),
    /// Delete a template
    Delete(String),
    /// List templates
    Templates,
    /// Re-read the template directory
    Reload,
    /// Print the command list
    Help,
    /// Leave the shell
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "keys" => Self::Keys,
            "show" | "status" => Self::Show,
            "press" => Self::Press {
                key: parse_key(rest)?,
                additive: false,
            },
            "ctrl" => Self::Press {
                key: parse_key(rest)?,
                additive: true,
            },
            "select" => Self::Select(parse_key(rest)?),
            "toggle" => Self::Toggle(parse_key(rest)?),
            "deselect" => Self::Deselect,
            "bind" => {
                let (key, path) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: bind KEY PATH".to_string())?;
                Self::Bind(parse_key(key)?, parse_sound(path)?)
            }
            "unbind" => Self::Unbind(parse_key(rest)?),
            "apply" => Self::Apply(parse_sound(rest)?),
            "apply-all" => Self::ApplyAll(parse_sound(rest)?),
            "clear-selected" => Self::ClearSelected,
            "preview" => Self::Preview(parse_sound(rest)?),
            "volume" => Self::Volume(parse_volume(rest)?),
            "mute" => Self::Mute,
            "unmute" => Self::Unmute,
            "layout" => Self::Layout(required(rest, "layout TAG")?),
            "save" => Self::Save(required(rest, "save NAME")?),
            "load" => Self::Load(required(rest, "load NAME")?),
            "delete" => Self::Delete(required(rest, "delete NAME")?),
            "templates" => Self::Templates,
            "reload" => Self::Reload,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "" => return Err("empty command".to_string()),
            other => return Err(format!("unknown command '{other}' (try 'help')")),
        };
        Ok(command)
    }
}

fn parse_key(text: &str) -> Result<KeyId, String> {
    if text.is_empty() {
        return Err("missing key".to_string());
    }
    text.parse().map_err(|e| format!("{e}"))
}

fn parse_sound(text: &str) -> Result<SoundRef, String> {
    let sound = SoundRef::new(text);
    if sound.is_empty() {
        Err("missing sound path".to_string())
    } else {
        Ok(sound)
    }
}

/// Accepts `0.5` or `50%`.
fn parse_volume(text: &str) -> Result<f32, String> {
    let invalid = || format!("invalid volume '{text}'");
    match text.strip_suffix('%') {
        Some(percent) => percent
            .trim()
            .parse::<f32>()
            .map(|value| value / 100.0)
            .map_err(|_| invalid()),
        None => text.parse::<f32>().map_err(|_| invalid()),
    }
}

fn required(text: &str, usage: &str) -> Result<String, String> {
    if text.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(text.to_string())
    }
}

/// Whether the read loop continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Stop reading
    Quit,
}

/// Line-oriented front end over a [`Session`].
pub struct Shell {
    session: Session,
    view: KeyboardView,
}

impl Shell {
    /// Wraps a session. The keyboard view is built once, here.
    pub fn new(session: Session) -> Self {
        let view = KeyboardView::new(session.store().registry());
        Self { session, view }
    }

    /// The wrapped session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        writeln!(
            output,
            "{APP_NAME} v{} - type 'help' for commands",
            env!("CARGO_PKG_VERSION")
        )?;
        self.execute(&ShellCommand::Show, &mut output)?;
        write!(output, "{APP_BINARY_NAME}> ")?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                match line.parse::<ShellCommand>() {
                    Ok(command) => {
                        if self.execute(&command, &mut output)? == Flow::Quit {
                            return Ok(());
                        }
                    }
                    Err(message) => writeln!(output, "Error: {message}")?,
                }
            }
            write!(output, "{APP_BINARY_NAME}> ")?;
            output.flush()?;
        }

        writeln!(output)?;
        Ok(())
    }

    /// Runs one command. Engine errors are printed, never propagated.
    pub fn execute<W: Write>(&mut self, command: &ShellCommand, output: &mut W) -> io::Result<Flow> {
        match self.dispatch(command, output) {
            Ok(flow) => Ok(flow),
            Err(ShellError::Engine(e)) => {
                writeln!(output, "Error: {e}")?;
                Ok(Flow::Continue)
            }
            Err(ShellError::Io(e)) => Err(e),
        }
    }

    fn dispatch<W: Write>(&mut self, command: &ShellCommand, out: &mut W) -> ShellResult<Flow> {
        match command {
            ShellCommand::Keys => {
                for (index, row) in self.session.store().registry().rows().iter().enumerate() {
                    let labels: Vec<&str> = row.iter().map(|key| key.as_str()).collect();
                    writeln!(out, "Row {}: {}", index + 1, labels.join(" "))?;
                }
            }
            ShellCommand::Show => self.show(out)?,
            ShellCommand::Press { key, additive } => {
                let press = match self.view.find(*key) {
                    Some(slot) => slot.press(&mut self.session, *additive)?,
                    None => {
                        writeln!(out, "Key {key} is not on this keyboard")?;
                        return Ok(Flow::Continue);
                    }
                };
                match press.outcome {
                    TriggerOutcome::Played(sound) => writeln!(out, "Playing {}", sound.file_name())?,
                    TriggerOutcome::Unbound => writeln!(out, "{key}: no sound bound")?,
                    TriggerOutcome::Muted => writeln!(out, "{key}: sound is off")?,
                }
                writeln!(out, "{}", self.session.store().selection().describe())?;
            }
            ShellCommand::Select(key) | ShellCommand::Toggle(key) => {
                let additive = matches!(command, ShellCommand::Toggle(_));
                let change = self.session.store_mut().select_key(*key, additive);
                if change.is_empty() {
                    writeln!(out, "Key {key} is not on this keyboard")?;
                }
                writeln!(out, "{}", self.session.store().selection().describe())?;
            }
            ShellCommand::Deselect => {
                self.session.store_mut().clear_selection();
                writeln!(out, "{}", self.session.store().selection().describe())?;
            }
            ShellCommand::Bind(key, sound) => {
                self.session.store_mut().bind(*key, sound.clone())?;
                writeln!(out, "Bound {} to {key}", sound.file_name())?;
            }
            ShellCommand::Unbind(key) => match self.session.store_mut().unbind(*key) {
                Some(_) => writeln!(out, "Cleared sound from {key}")?,
                None => writeln!(out, "{key} had no sound")?,
            },
            ShellCommand::Apply(sound) => {
                let count = self.session.store_mut().apply_to_selected(sound.clone())?;
                writeln!(out, "Applied {} to {count} keys", sound.file_name())?;
            }
            ShellCommand::ApplyAll(sound) => {
                let count = self.session.store_mut().apply_to_all(sound.clone())?;
                writeln!(out, "Applied {} to all {count} keys", sound.file_name())?;
            }
            ShellCommand::ClearSelected => {
                let count = self.session.store_mut().clear_selected_bindings()?;
                writeln!(out, "Cleared sounds from {count} keys")?;
            }
            ShellCommand::Preview(sound) => {
                self.session.preview(sound)?;
                writeln!(out, "Previewing {}", sound.file_name())?;
            }
            ShellCommand::Volume(value) => {
                self.session.set_volume(*value)?;
                writeln!(out, "Volume: {}", self.session.store().volume())?;
            }
            ShellCommand::Mute | ShellCommand::Unmute => {
                let enabled = matches!(command, ShellCommand::Unmute);
                self.session.store_mut().set_enabled(enabled);
                writeln!(out, "Sound {}", if enabled { "on" } else { "off" })?;
            }
            ShellCommand::Layout(tag) => {
                self.session.set_layout_tag(tag);
                if !KNOWN_LAYOUT_TAGS.contains(&self.session.layout_tag()) {
                    writeln!(
                        out,
                        "Note: not a preset layout ({})",
                        KNOWN_LAYOUT_TAGS.join(", ")
                    )?;
                }
                writeln!(out, "Layout: {}", self.session.layout_tag())?;
            }
            ShellCommand::Save(name) => {
                let template = self.session.save_template(name)?;
                writeln!(
                    out,
                    "Template '{}' saved ({} keys)",
                    template.name,
                    template.bindings.len()
                )?;
            }
            ShellCommand::Load(name) => {
                let outcome = self.session.load_template(name)?;
                if !outcome.dropped.is_empty() {
                    let labels: Vec<&str> = outcome.dropped.iter().map(|k| k.as_str()).collect();
                    writeln!(out, "Ignored keys not on this keyboard: {}", labels.join(", "))?;
                }
                writeln!(
                    out,
                    "Template '{}' loaded ({} keys, layout {})",
                    name.trim(),
                    self.session.store().bindings().len(),
                    self.session.layout_tag()
                )?;
            }
            ShellCommand::Delete(name) => {
                let deleted = self.session.delete_template(name)?;
                writeln!(out, "Template '{}' deleted", deleted.name)?;
            }
            ShellCommand::Templates => self.list_templates(out)?,
            ShellCommand::Reload => {
                let report = self.session.reload_templates()?;
                report_skipped(&report);
                writeln!(
                    out,
                    "Loaded {} templates ({} skipped)",
                    report.loaded,
                    report.skipped.len()
                )?;
            }
            ShellCommand::Help => out.write_all(HELP.as_bytes())?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn show<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let store = self.session.store();
        write!(out, "{}", self.view.render(store))?;
        writeln!(
            out,
            "Volume: {}  Sound: {}  Layout: {}  Template: {}",
            store.volume(),
            if store.is_enabled() { "on" } else { "off" },
            self.session.layout_tag(),
            self.session
                .current_template()
                .map_or("(none)", |name| name.as_str())
        )
    }

    fn list_templates<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let templates = self.session.templates().list();
        if templates.is_empty() {
            return writeln!(out, "No templates saved");
        }
        for template in templates {
            let marker = if self.session.current_template().map(|n| n.as_str())
                == Some(template.name.as_str())
            {
                "*"
            } else {
                " "
            };
            writeln!(
                out,
                "{marker} {} [{}] {} keys, {}",
                template.name,
                template.layout_tag,
                template.binding_count,
                template.created_at.format("%Y-%m-%d %H:%M:%S")
            )?;
        }
        Ok(())
    }
}

enum ShellError {
    Engine(EngineError),
    Io(io::Error),
}

impl From<EngineError> for ShellError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

impl From<io::Error> for ShellError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

type ShellResult<T> = Result<T, ShellError>;

const HELP: &str = "\
Keys and selection:
  keys                 list keyboard rows
  show                 draw keyboard (* selected, + bound) and status
  press KEY            click a key: select it and play its sound
  ctrl KEY             ctrl-click: toggle KEY in the selection and play
  select KEY           select only KEY
  toggle KEY           toggle KEY in the selection
  deselect             clear the selection
Sounds:
  bind KEY PATH        bind a sound file to one key
  unbind KEY           remove the sound from one key
  apply PATH           bind a sound to every selected key
  apply-all PATH       bind a sound to every key
  clear-selected       remove sounds from selected keys
  preview PATH         play a sound file
  volume V             set volume (0.0-1.0 or 0-100%)
  mute | unmute        turn key sounds off or on
  layout TAG           set layout (67%, 75%, 100%)
Templates:
  save NAME            save bindings as a template
  load NAME            replace bindings with a template
  delete NAME          delete a template
  templates            list templates (* = current)
  reload               re-read the template directory
  help                 this text
  quit                 leave
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::KeyRegistry;
    use crate::playback::NullPlayback;
    use crate::store::BindingStore;
    use crate::templates::TemplateRepository;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn shell(dir: &TempDir) -> Shell {
        let resolver = |sound: &SoundRef| sound.as_str().ends_with(".wav");
        let store = BindingStore::new(Arc::new(KeyRegistry::standard()), Box::new(resolver));
        let (templates, _) = TemplateRepository::open(dir.path()).unwrap();
        Shell::new(Session::new(
            store,
            templates,
            Box::new(NullPlayback::default()),
        ))
    }

    fn run(shell: &mut Shell, script: &str) -> String {
        let mut output = Vec::new();
        shell.run(script.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "press a".parse::<ShellCommand>().unwrap(),
            ShellCommand::Press {
                key: KeyId::A,
                additive: false
            }
        );
        assert_eq!(
            "CTRL shift".parse::<ShellCommand>().unwrap(),
            ShellCommand::Press {
                key: KeyId::Shift,
                additive: true
            }
        );
        assert_eq!(
            "bind Space sounds/big boom.wav".parse::<ShellCommand>().unwrap(),
            ShellCommand::Bind(KeyId::Space, SoundRef::new("sounds/big boom.wav"))
        );
        assert_eq!(
            "save  Lo-fi kit ".parse::<ShellCommand>().unwrap(),
            ShellCommand::Save("Lo-fi kit".to_string())
        );
        assert_eq!(
            "volume 50%".parse::<ShellCommand>().unwrap(),
            ShellCommand::Volume(0.5)
        );
        assert_eq!("exit".parse::<ShellCommand>().unwrap(), ShellCommand::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!("press".parse::<ShellCommand>().is_err());
        assert!("press Tab".parse::<ShellCommand>().is_err());
        assert!("bind A".parse::<ShellCommand>().is_err());
        assert!("apply".parse::<ShellCommand>().is_err());
        assert!("volume loud".parse::<ShellCommand>().is_err());
        assert!("dance".parse::<ShellCommand>().is_err());
    }

    #[test]
    fn test_selection_and_bulk_apply() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell(&dir);
        let output = run(
            &mut shell,
            "select a\ntoggle d\napply click.wav\nquit\npress s\n",
        );

        assert!(output.contains("Selected keys: A, D"));
        assert!(output.contains("Applied click.wav to 2 keys"));
        let bindings = shell.session().store().bindings();
        assert_eq!(bindings.len(), 2);
        assert!(bindings.contains(KeyId::D));
        // Nothing after quit runs
        assert!(!shell.session().store().selection().contains(KeyId::S));
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell(&dir);
        let output = run(
            &mut shell,
            "apply click.wav\nbind A missing.mp3\nvolume 2\nnonsense\nbind A ok.wav\n",
        );

        assert!(output.contains("Error: No keys selected"));
        assert!(output.contains("Error: Sound file not found or unreadable: missing.mp3"));
        assert!(output.contains("Error: Volume must be between 0.0 and 1.0"));
        assert!(output.contains("Error: unknown command 'nonsense'"));
        assert!(output.contains("Bound ok.wav to A"));
    }

    #[test]
    fn test_template_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell(&dir);
        let output = run(
            &mut shell,
            "apply-all hit.wav\nlayout 75%\nsave Drums\nselect q\nclear-selected\nload Drums\ntemplates\n",
        );

        assert!(output.contains("Template 'Drums' saved (30 keys)"));
        assert!(output.contains("Template 'Drums' loaded (30 keys, layout 75%)"));
        assert!(output.contains("* Drums [75%] 30 keys"));
        assert!(dir.path().join("Drums.json").exists());
        assert!(shell.session().store().selection().is_empty());
    }

    #[test]
    fn test_press_reports_playback() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell(&dir);
        let output = run(
            &mut shell,
            "bind A a.wav\npress a\nmute\npress a\npress s\n",
        );

        assert!(output.contains("Playing a.wav"));
        assert!(output.contains("A: sound is off"));
        assert!(output.contains("S: sound is off"));
    }
}
