//! Configuration management for glogread.
//!
//! Settings are read from INI files with the following precedence (highest first):
//!
//! 1. Local configuration (`./glogread.cfg`)
//! 2. User configuration (`~/.config/glogread/glogread.cfg`)
//! 3. System configuration (`/etc/glogread/glogread.cfg`)
//! 4. Built-in defaults
//!
//! A key missing from a file keeps the value of the next lower level.
//!
//! # Configuration File Format
//!
//! ```ini
//! [logging]
//! level = info
//!
//! [output]
//! format = text
//! precision = 4
//!
//! [levels]
//! decimals = 1
//! gap = 0.01
//! x_min = 0.0
//! x_max = 1.0
//!
//! [input]
//! extensions = log,out
//! ```

use configparser::ini::Ini;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// File name searched for in each configuration directory.
pub const CONFIG_FILE_NAME: &str = "glogread.cfg";

/// Errors that can occur during configuration loading and processing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error when reading configuration files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// INI parsing error
    #[error("INI parsing error: {0}")]
    IniParse(String),
    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

type Section = HashMap<String, Option<String>>;

/// Main configuration structure containing all program settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Logging configuration
    pub logging: LoggingSettings,
    /// Output formatting
    pub output: OutputSettings,
    /// Energy-level diagram layout
    pub levels: LevelSettings,
    /// Accepted input files
    pub input: InputSettings,
}

/// Logging configuration settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log level: error, warn, info, debug, trace (default: "warn")
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// How scan results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::InvalidValue(format!(
                "Invalid output format: {} (expected text or json)",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Default output format (default: text)
    pub format: OutputFormat,
    /// Decimal places in text output (default: 4)
    pub precision: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            precision: 4,
        }
    }
}

/// Energy-level diagram settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSettings {
    /// Decimal places used to decide degeneracy (default: 1)
    pub decimals: u32,
    /// Gap between degenerate segments (default: 0.01)
    pub gap: f64,
    /// Left end of the diagram (default: 0.0)
    pub x_min: f64,
    /// Right end of the diagram (default: 1.0)
    pub x_max: f64,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            decimals: 1,
            gap: 0.01,
            x_min: 0.0,
            x_max: 1.0,
        }
    }
}

/// Input file settings.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSettings {
    /// Extensions recognized as Gaussian logs (default: log, out)
    pub extensions: Vec<String>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            extensions: vec!["log".to_string(), "out".to_string()],
        }
    }
}

/// Configuration manager that handles loading and accessing program settings.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings: Settings,
    config_source: String,
}

impl SettingsManager {
    /// Loads configuration from the system, user and local files, in that order.
    ///
    /// Unreadable or invalid files are logged and skipped.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Settings::default();
        let mut config_source = "built-in defaults".to_string();

        let candidates = [
            ("system", Self::get_system_config_path()),
            ("user", Self::get_user_config_path()),
            ("local", Some(PathBuf::from(CONFIG_FILE_NAME))),
        ];

        for (kind, path) in candidates {
            let Some(path) = path else { continue };
            if !path.exists() {
                continue;
            }
            match Self::load_config(&path, &settings) {
                Ok(loaded) => {
                    settings = loaded;
                    config_source = format!("{} config ({})", kind, path.display());
                    debug!("Loaded {} configuration from: {}", kind, path.display());
                }
                Err(e) => {
                    warn!("Failed to load {} config from {}: {}", kind, path.display(), e);
                }
            }
        }

        info!("Configuration loaded from: {}", config_source);
        Ok(Self {
            settings,
            config_source,
        })
    }

    /// Loads a single configuration file on top of the built-in defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Self::load_config(path, &Settings::default())?;
        Ok(Self {
            settings,
            config_source: format!("file ({})", path.display()),
        })
    }

    /// Returns the source of the loaded configuration.
    pub fn config_source(&self) -> &str {
        &self.config_source
    }

    /// Gets a reference to the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Gets the logging settings.
    pub fn logging(&self) -> &LoggingSettings {
        &self.settings.logging
    }

    /// Gets the output settings.
    pub fn output(&self) -> &OutputSettings {
        &self.settings.output
    }

    /// Gets the level diagram settings.
    pub fn levels(&self) -> &LevelSettings {
        &self.settings.levels
    }

    /// Gets the input settings.
    pub fn input(&self) -> &InputSettings {
        &self.settings.input
    }

    /// Parses one INI file, overriding values of `base`.
    fn load_config(path: &Path, base: &Settings) -> Result<Settings, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut ini = Ini::new();
        ini.read(content)
            .map_err(|e| ConfigError::IniParse(format!("Failed to parse INI: {}", e)))?;

        let mut settings = base.clone();
        let map = ini.get_map_ref();

        if let Some(section) = map.get("logging") {
            Self::parse_logging(section, &mut settings.logging);
        }
        if let Some(section) = map.get("output") {
            Self::parse_output(section, &mut settings.output)?;
        }
        if let Some(section) = map.get("levels") {
            Self::parse_levels(section, &mut settings.levels)?;
        }
        if let Some(section) = map.get("input") {
            Self::parse_input(section, &mut settings.input);
        }

        Ok(settings)
    }

    fn parse_value<T: FromStr>(section: &Section, key: &str) -> Result<Option<T>, ConfigError> {
        match section.get(key) {
            Some(Some(raw)) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue(format!("Invalid {}: {}", key, raw))),
            _ => Ok(None),
        }
    }

    fn parse_logging(section: &Section, logging: &mut LoggingSettings) {
        if let Some(Some(level)) = section.get("level") {
            logging.level = level.trim().to_string();
        }
    }

    fn parse_output(section: &Section, output: &mut OutputSettings) -> Result<(), ConfigError> {
        if let Some(Some(format)) = section.get("format") {
            output.format = format.parse()?;
        }
        if let Some(precision) = Self::parse_value(section, "precision")? {
            output.precision = precision;
        }
        Ok(())
    }

    fn parse_levels(section: &Section, levels: &mut LevelSettings) -> Result<(), ConfigError> {
        if let Some(decimals) = Self::parse_value(section, "decimals")? {
            levels.decimals = decimals;
        }
        if let Some(gap) = Self::parse_value(section, "gap")? {
            levels.gap = gap;
        }
        if let Some(x_min) = Self::parse_value(section, "x_min")? {
            levels.x_min = x_min;
        }
        if let Some(x_max) = Self::parse_value(section, "x_max")? {
            levels.x_max = x_max;
        }
        if levels.x_max <= levels.x_min {
            return Err(ConfigError::InvalidValue(format!(
                "x_max ({}) must be greater than x_min ({})",
                levels.x_max, levels.x_min
            )));
        }
        Ok(())
    }

    fn parse_input(section: &Section, input: &mut InputSettings) {
        if let Some(Some(extensions)) = section.get("extensions") {
            // Comma-separated, leading dots tolerated
            input.extensions = extensions
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    /// Gets the system configuration file path.
    fn get_system_config_path() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            Some(PathBuf::from("/etc/glogread").join(CONFIG_FILE_NAME))
        }
        #[cfg(windows)]
        {
            std::env::var("PROGRAMDATA")
                .ok()
                .map(|pd| PathBuf::from(pd).join("glogread").join(CONFIG_FILE_NAME))
        }
    }

    /// Gets the user configuration file path.
    fn get_user_config_path() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            std::env::var("HOME").ok().map(|home| {
                PathBuf::from(home)
                    .join(".config")
                    .join("glogread")
                    .join(CONFIG_FILE_NAME)
            })
        }
        #[cfg(windows)]
        {
            std::env::var("APPDATA")
                .ok()
                .map(|appdata| PathBuf::from(appdata).join("glogread").join(CONFIG_FILE_NAME))
        }
    }
}

impl SettingsManager {
    /// Writes a commented settings template holding the built-in defaults.
    pub fn create_template(path: &Path) -> Result<(), ConfigError> {
        fs::write(path, Self::generate_template_content())?;
        info!("Created settings template at: {}", path.display());
        Ok(())
    }

    fn generate_template_content() -> String {
        let defaults = Settings::default();
        format!(
            r#"# glogread configuration file
#
# Files are loaded in this order, later ones overriding earlier ones:
#
# 1. System config (/etc/glogread/glogread.cfg on Unix, %PROGRAMDATA%\glogread\glogread.cfg on Windows)
# 2. User config (~/.config/glogread/glogread.cfg on Unix, %APPDATA%\glogread\glogread.cfg on Windows)
# 3. Current working directory (./glogread.cfg)
#
# Missing keys keep their built-in defaults shown below.

[logging]
# Log level: error, warn, info, debug, trace (default: warn)
# RUST_LOG, when set, takes precedence
level = {}

[output]
# Output format: text or json (default: text)
format = {}

# Decimal places for energies and charges in text output (default: 4)
precision = {}

[levels]
# Orbital energies equal after rounding to this many decimals (eV)
# are drawn as one degenerate level (default: 1)
decimals = {}

# Horizontal gap between degenerate orbitals (default: 0.01)
gap = {}

# Horizontal extent of the level diagram (default: 0.0 to 1.0)
x_min = {}
x_max = {}

[input]
# Extensions accepted as Gaussian log files, comma-separated (default: log,out)
extensions = {}
"#,
            defaults.logging.level,
            defaults.output.format,
            defaults.output.precision,
            defaults.levels.decimals,
            defaults.levels.gap,
            defaults.levels.x_min,
            defaults.levels.x_max,
            defaults.input.extensions.join(","),
        )
    }
}
