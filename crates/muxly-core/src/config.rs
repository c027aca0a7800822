//! Configuration types for muxly.
//!
//! The configuration is loaded once per invocation, validated, and then
//! handed out by reference. Nothing in the workspace mutates it afterwards.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Directory names that are never scanned, whatever the configuration says.
pub const BUILTIN_IGNORE_NAMES: &[&str] = &[".git", ".hg", ".svn", "node_modules", "__pycache__"];

/// Name of the template used when the configuration defines none.
pub const BUILTIN_TEMPLATE_NAME: &str = "Default";

/// Full configuration loaded from YAML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories enumerated for candidate sessions
    pub scan_dirs: Vec<ScanRoot>,
    /// Directories offered as-is, without enumeration
    pub entry_dirs: Vec<EntryPath>,
    /// Bare names (pruned anywhere) or paths (dropped at that location)
    pub ignore_dirs: Vec<String>,
    /// Window templates; one is the primary
    pub templates: Vec<SessionTemplate>,
    /// Behaviour settings
    pub settings: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_dirs: Vec::new(),
            entry_dirs: Vec::new(),
            ignore_dirs: Vec::new(),
            templates: vec![SessionTemplate::builtin()],
            settings: Settings::default(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document is a config with every default.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Default config location: `$XDG_CONFIG_HOME/muxly/config.yaml`, else
    /// the platform config dir.
    pub fn default_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::config_dir)?;
        Some(base.join("muxly").join("config.yaml"))
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.scan_dirs.is_empty() && self.entry_dirs.is_empty() {
            return Err(Error::Config(
                "no directories configured for scanning (scan_dirs or entry_dirs required)"
                    .to_string(),
            ));
        }

        if self.templates.is_empty() {
            return Err(Error::Config(
                "at least one template is required (remove `templates:` to use the built-in)"
                    .to_string(),
            ));
        }

        let mut names = HashSet::new();
        for template in &self.templates {
            template.validate()?;
            if !names.insert(template.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate template name {:?}",
                    template.name
                )));
            }
        }

        let defaults = self.templates.iter().filter(|t| t.default).count();
        if defaults > 1 {
            return Err(Error::Config(
                "more than one template is marked default".to_string(),
            ));
        }
        if defaults == 0 && self.templates.len() > 1 {
            return Err(Error::Config(
                "one template must be marked `default: true` when several are configured"
                    .to_string(),
            ));
        }

        let mut aliases: HashMap<&str, &str> = HashMap::new();
        for scan in &self.scan_dirs {
            if scan.depth == Some(0) {
                return Err(Error::Config(format!(
                    "scan_dir {:?} has depth 0, which lists nothing; use 1 or more, or remove `depth`",
                    scan.path
                )));
            }
            if let Some(alias) = scan.alias() {
                if let Some(existing) = aliases.insert(alias, &scan.path) {
                    return Err(Error::Config(format!(
                        "duplicate alias {:?} used by both {:?} and {:?}",
                        alias, existing, scan.path
                    )));
                }
            }
            if let Some(template) = &scan.template {
                if !names.contains(template.as_str()) {
                    return Err(Error::Config(format!(
                        "scan_dir {:?} references unknown template {:?}",
                        scan.path, template
                    )));
                }
            }
        }

        for entry in &self.entry_dirs {
            if let Some(template) = &entry.template {
                if !names.contains(template.as_str()) {
                    return Err(Error::Config(format!(
                        "entry_dir {:?} references unknown template {:?}",
                        entry.path, template
                    )));
                }
            }
        }

        Ok(())
    }

    /// The primary template: the one marked default, or the only one.
    pub fn primary_template(&self) -> Result<&SessionTemplate> {
        self.templates
            .iter()
            .find(|t| t.default)
            .or_else(|| match self.templates.as_slice() {
                [only] => Some(only),
                _ => None,
            })
            .ok_or_else(|| Error::Config("no default template configured".to_string()))
    }

    /// Look up a template by name.
    pub fn find_template(&self, name: &str) -> Option<&SessionTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Template for an entry: its explicit reference, else the primary.
    pub fn template_for(&self, reference: Option<&str>) -> Result<&SessionTemplate> {
        match reference {
            Some(name) => self
                .find_template(name)
                .ok_or_else(|| Error::Config(format!("unknown template {name:?}"))),
            None => self.primary_template(),
        }
    }
}

/// A directory enumerated for candidate sessions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScanRoot {
    /// Path expression (absolute, `~`-relative or `$VAR`-bearing)
    pub path: String,
    /// Depth override for this root
    #[serde(default)]
    pub depth: Option<usize>,
    /// Prefix used to disambiguate colliding names from this root
    #[serde(default)]
    pub alias: Option<String>,
    /// Template applied to sessions created from this root
    #[serde(default)]
    pub template: Option<String>,
}

impl ScanRoot {
    /// Create a scan root with no overrides.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            depth: None,
            alias: None,
            template: None,
        }
    }

    /// Effective traversal depth.
    ///
    /// Priority: runtime flag, then this root's depth, then the global
    /// default, then 1. Zero counts as unset at every level, so the result
    /// is never 0.
    pub fn effective_depth(&self, flag: usize, default: usize) -> usize {
        if flag > 0 {
            flag
        } else if let Some(depth) = self.depth.filter(|d| *d > 0) {
            depth
        } else if default > 0 {
            default
        } else {
            1
        }
    }

    /// Non-empty alias, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref().filter(|a| !a.is_empty())
    }
}

/// A directory offered directly, without enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "EntryPathRepr")]
pub struct EntryPath {
    /// Path expression
    pub path: String,
    /// Template applied to sessions created here
    pub template: Option<String>,
}

impl EntryPath {
    /// Create an entry path with no template.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            template: None,
        }
    }
}

/// Entry dirs may be written as bare strings or as mappings.
#[derive(Deserialize)]
#[serde(untagged)]
enum EntryPathRepr {
    Bare(String),
    Full {
        path: String,
        #[serde(default)]
        template: Option<String>,
    },
}

impl From<EntryPathRepr> for EntryPath {
    fn from(repr: EntryPathRepr) -> Self {
        match repr {
            EntryPathRepr::Bare(path) => EntryPath::new(path),
            EntryPathRepr::Full { path, template } => EntryPath { path, template },
        }
    }
}

/// One window in a template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Window {
    /// Window name
    pub name: String,
    /// Command started in the window
    #[serde(default)]
    pub cmd: Option<String>,
}

impl Window {
    /// A window running the default shell.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cmd: None,
        }
    }

    /// A window running a command.
    pub fn with_command(name: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cmd: Some(cmd.into()),
        }
    }

    /// The command, if one is set and non-blank.
    pub fn command(&self) -> Option<&str> {
        self.cmd.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Named, reusable window layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionTemplate {
    /// Template name (also the fallback session name for the primary)
    pub name: String,
    /// Fixed working directory for sessions created from this template
    #[serde(default)]
    pub path: Option<String>,
    /// Whether this is the primary template
    #[serde(default)]
    pub default: bool,
    /// Ordered windows; at least one
    #[serde(default)]
    pub windows: Vec<Window>,
}

impl SessionTemplate {
    /// The template used when none are configured.
    pub fn builtin() -> Self {
        Self {
            name: BUILTIN_TEMPLATE_NAME.to_string(),
            path: Some("~".to_string()),
            default: true,
            windows: vec![Window::new("main")],
        }
    }

    /// Check name and windows.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("all templates must have a name".to_string()));
        }
        if self.windows.is_empty() {
            return Err(Error::Config(format!(
                "template {:?} must have at least one window",
                self.name
            )));
        }
        if self.windows.iter().any(|w| w.name.trim().is_empty()) {
            return Err(Error::Config(format!(
                "template {:?} has a window without a name",
                self.name
            )));
        }
        Ok(())
    }

    /// Working directory expression for the fallback session.
    pub fn path_or_home(&self) -> &str {
        self.path.as_deref().filter(|p| !p.is_empty()).unwrap_or("~")
    }
}

/// Behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window index sessions are switched to (`base-index`); negative means none
    pub tmux_base: i32,
    /// Scan depth when neither the flag nor the scan root set one
    pub default_depth: usize,
    /// Label prefix for live sessions in the picker
    pub tmux_session_prefix: String,
    /// Kill the server instead of falling back when the last session dies
    pub always_kill_on_last_session: bool,
    /// Editor for `muxly config edit`
    pub editor: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tmux_base: 1,
            default_depth: 1,
            tmux_session_prefix: "[TMUX] ".to_string(),
            always_kill_on_last_session: false,
            editor: None,
        }
    }
}

/// Commented configuration written by `muxly config init`.
pub const STARTER_CONFIG: &str = r#"# muxly configuration

# Directories whose subdirectories become session candidates.
#   depth:    how many levels below the root to list (default: settings.default_depth)
#   alias:    prefix shown only when two candidates share a name
#   template: template used for sessions created from this root
scan_dirs:
  - path: ~/Dev

# Directories offered as they are, without listing their children.
entry_dirs:
  - "~"

# Bare names are skipped at any depth; paths are skipped at that exact location.
# .git, .hg, .svn, node_modules and __pycache__ are always skipped.
ignore_dirs: []

# Window layouts. The template marked `default: true` is used when an entry
# names no template, and for the fallback session when the last one is killed.
templates:
  - name: Default
    default: true
    path: "~"
    windows:
      - name: edit
        cmd: nvim
      - name: term

settings:
  tmux_base: 1
  default_depth: 1
  tmux_session_prefix: "[TMUX] "
  always_kill_on_last_session: false
"#;
