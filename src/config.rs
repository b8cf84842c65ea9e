use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub commands: Commands,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct Settings {
    /// Empty means `$HOME`.
    #[serde(default)]
    pub home_dir: String,
    /// Empty means the process working directory.
    #[serde(default)]
    pub working_dir: String,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Commands {
    /// Names the registry refuses to register.
    #[serde(default)]
    pub disabled: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CompletionConfig {
    #[serde(default)]
    pub show_hidden: bool,
    /// 0 means unlimited.
    #[serde(default)]
    pub max_candidates: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            max_candidates: 200,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Empty disables file logging.
    #[serde(default)]
    pub file: String,
}

fn default_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: String::new(),
        }
    }
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    commands: CommandsOverlay,
    #[serde(default)]
    completion: CompletionOverlay,
    #[serde(default)]
    logging: LoggingOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    home_dir: Option<String>,
    working_dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CommandsOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    disabled: Vec<String>,
    #[serde(default)]
    remove_disabled: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CompletionOverlay {
    show_hidden: Option<bool>,
    max_candidates: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct LoggingOverlay {
    level: Option<String>,
    file: Option<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/shline/config.toml (if exists)
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Defaults merged with an overlay given as TOML text, e.g. from a host's
    /// own settings store.
    pub fn with_overlay_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        let overlay: ConfigOverlay = toml::from_str(toml_str)?;
        let mut config = Self::default_config();
        config.apply_overlay(overlay);
        Ok(config)
    }

    /// Try to load user overlay from ~/.config/shline/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/shline/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("shline: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        if let Some(v) = s.home_dir {
            self.settings.home_dir = v;
        }
        if let Some(v) = s.working_dir {
            self.settings.working_dir = v;
        }

        let c = overlay.commands;
        merge_list(
            &mut self.commands.disabled,
            c.disabled,
            &c.remove_disabled,
            c.replace,
        );

        let co = overlay.completion;
        if let Some(v) = co.show_hidden {
            self.completion.show_hidden = v;
        }
        if let Some(v) = co.max_candidates {
            self.completion.max_candidates = v;
        }

        let l = overlay.logging;
        if let Some(v) = l.level {
            self.logging.level = v;
        }
        if let Some(v) = l.file {
            self.logging.file = v;
        }
    }
}
