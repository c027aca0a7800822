//! Command handlers.
//!
//! Each handler takes the multiplexer and picker it should drive, so the
//! flows can be exercised without tmux or fzf. [`run`] wires in the real
//! ones.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use muxly_core::{Config, Error, Target, STARTER_CONFIG};
use muxly_entries::EntryResolver;
use muxly_session::{
    load_layout, Activation, Confirm, Fzf, KillOutcome, KillRequest, Multiplexer, Picker,
    Selection, SessionManager, Tmux,
};
use tracing::{debug, info};

use crate::cli::{Cli, Command, ConfigCommand};
use crate::prompt::StdinConfirm;

/// Editor used when nothing else is configured.
pub const FALLBACK_EDITOR: &str = "vi";

/// How an opening command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The client is on this session now
    Opened(Activation),
    /// The picker was dismissed; nothing changed
    Cancelled,
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = config_path(cli.config.as_deref())?;
    let flag_depth = cli.flag_depth();

    match cli.command {
        Some(Command::Config { command }) => match command {
            ConfigCommand::Init { force } => config_init(&config_path, force),
            ConfigCommand::Edit { editor } => config_edit(&config_path, editor.as_deref()),
            ConfigCommand::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
        },
        Some(Command::Switch { name }) => {
            let config = load_config(&config_path)?;
            let tmux = tmux()?;
            report_launch(switch(&config, &tmux, &Fzf::new(), name.as_deref())?);
            Ok(())
        }
        Some(Command::Kill {
            session,
            replacement,
        }) => {
            let config = load_config(&config_path)?;
            let tmux = tmux()?;
            let mut request = match session {
                Some(name) => KillRequest::session(name),
                None => KillRequest::current(),
            };
            if let Some(name) = replacement {
                request = request.with_replacement(name);
            }
            let outcome = kill(&config, &tmux, &Fzf::new(), &StdinConfirm, request)?;
            report_kill(&outcome);
            Ok(())
        }
        None => {
            let config = load_config(&config_path)?;
            let tmux = tmux()?;
            let outcome = launch(
                &config,
                &tmux,
                &Fzf::new(),
                cli.name.as_deref(),
                flag_depth,
            )
            .await?;
            report_launch(outcome);
            Ok(())
        }
    }
}

/// The `--config` flag, else the default location.
pub fn config_path(flag: Option<&Path>) -> Result<PathBuf> {
    match flag {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::default_path()
            .context("could not determine the configuration directory; pass --config"),
    }
}

/// Load and validate the configuration, pointing at `config init` on failure.
pub fn load_config(path: &Path) -> Result<Config> {
    Config::from_file(path).with_context(|| {
        format!(
            "failed to load configuration from {} (run `muxly config init` to create one)",
            path.display()
        )
    })
}

fn tmux() -> Result<Tmux> {
    let tmux = Tmux::from_env();
    if !tmux.is_available() {
        bail!("tmux was not found on PATH");
    }
    Ok(tmux)
}

/// Resolve entries, pick one (unless `name` is given) and open it.
pub async fn launch<M: Multiplexer>(
    config: &Config,
    mux: M,
    picker: &dyn Picker,
    name: Option<&str>,
    flag_depth: usize,
) -> Result<LaunchOutcome> {
    let sessions = mux.snapshot();
    let entries = EntryResolver::new(config)
        .resolve(flag_depth, &sessions)
        .await;

    let label = match name {
        Some(name) => name.to_string(),
        None => {
            if entries.is_empty() {
                bail!("nothing to open: no directories found and no other sessions running");
            }
            match picker.pick(&entries.picker_labels())? {
                Selection::Chosen(label) => label,
                Selection::Cancelled => return Ok(LaunchOutcome::Cancelled),
            }
        }
    };

    let target = entries
        .lookup(&label)
        .ok_or_else(|| Error::NoSuchEntry(label.clone()))?;
    debug!("{:?} resolves to {}", label, target);

    let layout = match target {
        Target::Path(entry) => load_layout(&entry.path),
        Target::ExistingSession(_) => None,
    };
    let activation = SessionManager::new(mux, config).launch(&label, target, layout)?;
    Ok(LaunchOutcome::Opened(activation))
}

/// Move to another running session, picking one unless `name` is given.
///
/// A name may carry the session label prefix.
pub fn switch<M: Multiplexer>(
    config: &Config,
    mux: M,
    picker: &dyn Picker,
    name: Option<&str>,
) -> Result<LaunchOutcome> {
    let prefix = &config.settings.tmux_session_prefix;
    let session = match name {
        Some(name) => name
            .strip_prefix(prefix.as_str())
            .unwrap_or(name)
            .to_string(),
        None => {
            let others = mux.snapshot().others();
            if others.is_empty() {
                bail!("no other tmux sessions to switch to");
            }
            match picker.pick(&others)? {
                Selection::Chosen(session) => session,
                Selection::Cancelled => return Ok(LaunchOutcome::Cancelled),
            }
        }
    };

    SessionManager::new(mux, config).switch(&session)?;
    Ok(LaunchOutcome::Opened(Activation {
        session,
        created: false,
    }))
}

/// Run the kill flow.
pub fn kill<M: Multiplexer>(
    config: &Config,
    mux: M,
    picker: &dyn Picker,
    confirm: &dyn Confirm,
    request: KillRequest,
) -> Result<KillOutcome> {
    Ok(SessionManager::new(mux, config).kill(request, picker, confirm)?)
}

/// Write the starter configuration, refusing to overwrite unless `force`.
pub fn config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, STARTER_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!("Wrote starter configuration to {}", path.display());
    println!("Created {}", path.display());
    Ok(())
}

/// Editor command: the argument, then `settings.editor`, then `$EDITOR`,
/// then vi. Blank values are skipped.
pub fn choose_editor(
    flag: Option<&str>,
    configured: Option<&str>,
    env_editor: Option<&str>,
) -> String {
    [flag, configured, env_editor]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|e| !e.is_empty())
        .unwrap_or(FALLBACK_EDITOR)
        .to_string()
}

/// Open the configuration file in an editor.
pub fn config_edit(path: &Path, editor: Option<&str>) -> Result<()> {
    // A broken file is exactly what one edits, so a load failure is no error
    let configured = match Config::from_file(path) {
        Ok(config) => config.settings.editor,
        Err(e) => {
            debug!("Not reading editor from configuration: {}", e);
            None
        }
    };
    let env_editor = std::env::var("EDITOR").ok();
    let editor = choose_editor(editor, configured.as_deref(), env_editor.as_deref());

    // Editors such as `code -w` carry their own arguments
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(FALLBACK_EDITOR);

    info!("Opening {} with {}", path.display(), editor);
    let status = process::Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("failed to run editor {editor:?}"))?;
    if !status.success() {
        bail!("editor {editor:?} exited with {status}");
    }
    Ok(())
}

fn report_launch(outcome: LaunchOutcome) {
    match outcome {
        LaunchOutcome::Opened(activation) if activation.created => {
            info!("Created session {:?}", activation.session);
        }
        LaunchOutcome::Opened(activation) => {
            info!("Switched to session {:?}", activation.session);
        }
        LaunchOutcome::Cancelled => debug!("Nothing selected"),
    }
}

fn report_kill(outcome: &KillOutcome) {
    match outcome {
        KillOutcome::Killed(name) => println!("Killed session {name}"),
        KillOutcome::Replaced {
            killed,
            replacement,
        } => println!("Killed session {killed}, now on {replacement}"),
        KillOutcome::FellBack { killed, fallback } => {
            println!("Killed session {killed}, now on {fallback}")
        }
        KillOutcome::ServerKilled => println!("Killed the tmux server"),
        KillOutcome::Aborted => println!("Nothing killed"),
    }
}
