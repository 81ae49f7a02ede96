//! Configuration system
//!
//! TOML configuration with every section optional; anything left out
//! falls back to the built-in defaults.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::layout::{sanitize_dialog_ratio, DEFAULT_DIALOG_RATIO};
use crate::window::{default_float_rules, WindowCriteria};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Color scheme
    pub colors: ColorConfig,

    /// Status bar configuration
    pub bar: BarConfig,

    /// Programs launched by `spawn`
    pub programs: ProgramConfig,

    /// Key bindings
    pub bindings: Vec<BindingConfig>,

    /// Windows matching any of these start floating
    pub rules: Vec<WindowCriteria>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            colors: ColorConfig::default(),
            bar: BarConfig::default(),
            programs: ProgramConfig::default(),
            bindings: default_bindings(),
            rules: default_float_rules(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(PathBuf::from).or_else(Self::find_config_file);

        match config_path {
            Some(path) if path.exists() => {
                info!("Loading configuration from {:?}", path);
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {path:?}"))?;

                Self::from_toml(&content)
                    .with_context(|| format!("Failed to parse config file: {path:?}"))
            }
            Some(path) => {
                warn!("Config file not found at {:?}, using defaults", path);
                Ok(Self::default())
            }
            None => {
                info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Find the configuration file
    fn find_config_file() -> Option<PathBuf> {
        let candidates = [
            dirs::config_dir().map(|p| p.join("slatewm/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/slatewm/config.toml")),
            dirs::home_dir().map(|p| p.join(".slatewm/config.toml")),
            Some(PathBuf::from("/etc/slatewm/config.toml")),
        ];

        candidates.into_iter().flatten().find(|p| p.exists())
    }

    /// Generate default configuration as a string
    pub fn default_config_string() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Focus the window under the pointer when it is entered
    pub focus_follows_mouse: bool,
    /// Size of transient windows relative to their region, in (0.3, 1.0]
    pub dialog_ratio: f64,
    /// Seconds between status bar refreshes
    pub status_interval: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            focus_follows_mouse: true,
            dialog_ratio: DEFAULT_DIALOG_RATIO,
            status_interval: 60,
        }
    }
}

impl GeneralConfig {
    /// The dialog ratio, or the default if the configured one is out of range.
    pub fn dialog_ratio(&self) -> f64 {
        let ratio = sanitize_dialog_ratio(self.dialog_ratio);
        if (ratio - self.dialog_ratio).abs() > f64::EPSILON {
            warn!(
                "dialog_ratio {} out of range (0.3, 1.0], using {}",
                self.dialog_ratio, ratio
            );
        }
        ratio
    }
}

/// Color scheme. Values are X color names, `#rrggbb` or `rgb:rr/gg/bb`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub focus: String,
    pub unfocus: String,
    pub bar_border: String,
    pub bar_background: String,
    pub bar_foreground: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            focus: "red".to_string(),
            unfocus: "rgb:88/88/88".to_string(),
            bar_border: "rgb:00/80/80".to_string(),
            bar_background: "black".to_string(),
            bar_foreground: "rgb:a0/a0/a0".to_string(),
        }
    }
}

/// Status bar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Show the bar at startup
    pub enabled: bool,
    /// Core X font patterns, tried in order
    pub fonts: Vec<String>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fonts: vec![
                "-*-terminus-*-*-*-*-*-*-*-*-*-*-*-*".to_string(),
                "-*-times-medium-r-*-*-*-*-*-*-*-*-*-*".to_string(),
                "fixed".to_string(),
            ],
        }
    }
}

/// Programs for the `spawn` command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    pub terminal: Vec<String>,
    pub menu: Vec<String>,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            terminal: vec!["xterm".to_string()],
            menu: vec!["dmenu_run".to_string()],
        }
    }
}

/// Key binding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Key combination (e.g., "Mod1+Return")
    pub keys: String,
    /// Command to execute (e.g., "swap main")
    pub command: String,
}

impl BindingConfig {
    pub fn new(keys: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            keys: keys.into(),
            command: command.into(),
        }
    }
}

/// Generate default keybindings
fn default_bindings() -> Vec<BindingConfig> {
    let mut bindings = vec![
        // Layout
        BindingConfig::new("Mod1+space", "layout cycle"),
        BindingConfig::new("Mod1+Shift+space", "master reset"),
        BindingConfig::new("Mod1+h", "master shrink"),
        BindingConfig::new("Mod1+l", "master grow"),
        BindingConfig::new("Mod1+comma", "master add"),
        BindingConfig::new("Mod1+period", "master remove"),
        // Stack order
        BindingConfig::new("Mod1+Return", "swap main"),
        BindingConfig::new("Mod1+Shift+j", "swap next"),
        BindingConfig::new("Mod1+Shift+k", "swap prev"),
        // Focus
        BindingConfig::new("Mod1+j", "focus next"),
        BindingConfig::new("Mod1+k", "focus prev"),
        BindingConfig::new("Mod1+Tab", "focus next"),
        BindingConfig::new("Mod1+Shift+Tab", "focus prev"),
        BindingConfig::new("Mod1+m", "focus main"),
        // Programs
        BindingConfig::new("Mod1+Shift+Return", "spawn terminal"),
        BindingConfig::new("Mod1+p", "spawn menu"),
        // Bar, quit and restart
        BindingConfig::new("Mod1+b", "bar toggle"),
        BindingConfig::new("Mod1+Shift+q", "quit"),
        BindingConfig::new("Mod1+q", "restart"),
    ];

    // Workspaces: keys 1..9 then 0 for the tenth
    for n in 1..=10 {
        let key = n % 10;
        bindings.push(BindingConfig::new(
            format!("Mod1+{key}"),
            format!("workspace {n}"),
        ));
        bindings.push(BindingConfig::new(
            format!("Mod1+Shift+{key}"),
            format!("move to workspace {n}"),
        ));
    }

    bindings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Command, InputManager, Keysym, Modifiers};
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.general.focus_follows_mouse);
        assert_eq!(config.general.status_interval, 60);
        assert_eq!(config.bindings.len(), 39);
        assert_eq!(config.rules.len(), 1);
    }

    #[test]
    fn test_default_bindings_resolve() {
        let mut input = InputManager::new();
        input.load_bindings(&Config::default().bindings);
        assert_eq!(input.len(), 39);

        let zero = Keysym(u32::from(b'0'));
        assert_eq!(
            input.lookup(zero, Modifiers::ALT),
            Some(&Command::Workspace(9))
        );
        assert_eq!(
            input.lookup(zero, Modifiers::ALT | Modifiers::SHIFT),
            Some(&Command::MoveToWorkspace(9))
        );
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.bindings, config.bindings);
        assert_eq!(parsed.rules, config.rules);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let parsed = Config::from_toml(
            r#"
            [general]
            dialog_ratio = 0.8

            [programs]
            terminal = ["urxvt", "-e", "tmux"]
            "#,
        )
        .unwrap();
        assert!((parsed.general.dialog_ratio() - 0.8).abs() < f64::EPSILON);
        assert_eq!(parsed.programs.terminal, vec!["urxvt", "-e", "tmux"]);
        assert_eq!(parsed.programs.menu, vec!["dmenu_run"]);
        assert_eq!(parsed.colors.focus, "red");
        assert!(!parsed.bindings.is_empty());
    }

    #[test]
    fn test_bad_dialog_ratio_falls_back() {
        let parsed = Config::from_toml("[general]\ndialog_ratio = 2.5\n").unwrap();
        assert!((parsed.general.dialog_ratio() - DEFAULT_DIALOG_RATIO).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bar]\nenabled = false").unwrap();
        let config = Config::load(file.path().to_str()).unwrap();
        assert!(!config.bar.enabled);

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        writeln!(broken, "[bar\nenabled = ").unwrap();
        assert!(Config::load(broken.path().to_str()).is_err());
    }

    #[test]
    #[serial]
    fn test_discovers_xdg_config() {
        let dir = tempfile::tempdir().unwrap();
        let conf_dir = dir.path().join("slatewm");
        std::fs::create_dir_all(&conf_dir).unwrap();
        std::fs::write(conf_dir.join("config.toml"), "[general]\nstatus_interval = 5\n").unwrap();

        let old = std::env::var_os("XDG_CONFIG_HOME");
        std::env::set_var("XDG_CONFIG_HOME", dir.path());
        let config = Config::load(None);
        match old {
            Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }

        assert_eq!(config.unwrap().general.status_interval, 5);
    }
}
