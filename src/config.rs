//! Configuration loader/writer plus strongly typed settings structures.
//!
//! Settings live in a single `config.toml` under the data directory
//! (`~/.touchline` or `$TOUCHLINE_DIR`). The file is created with defaults
//! on first run and written back on exit, so the last host sticks.

use crate::core::menu_actions::{normalize_keybind, MonitorAction};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub mod keybind_validator;

/// Host used when none has been configured
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Field area (pitch plus margins, in meters) that `fit` maps onto the screen
const VIEW_WIDTH_M: f64 = 115.0;
const VIEW_HEIGHT_M: f64 = 78.0;

const ZOOM_FACTOR: f64 = 1.5;
const MIN_SCALE: f64 = 0.01;

/// Top-level configuration object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub field: FieldTransform,
    /// Key combo -> action name, e.g. `"ctrl+k" = "kick_off"`
    #[serde(default = "default_keybinds")]
    pub keybinds: HashMap<String, String>,
    #[serde(skip)] // Set at load time - where to save back to
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Last server host; empty means `DEFAULT_HOST`
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_client_version")]
    pub client_version: u32,
    /// Connect right after startup
    #[serde(default)]
    pub auto_connect: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Quit once the match reaches time over
    #[serde(default)]
    pub auto_quit: bool,
    /// Delay before quitting; non-positive means 100 ms
    #[serde(default)]
    pub auto_quit_wait_ms: i64,
    /// Drop the connection after this long without data; 0 disables
    #[serde(default)]
    pub timeout_ms: u64,
}

/// Screen cell <-> field meter transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTransform {
    /// Screen position of the field origin
    pub center_x: f64,
    pub center_y: f64,
    /// Screen cells per meter
    pub scale_x: f64,
    pub scale_y: f64,
    /// Refit on connect and on terminal resize
    pub auto_fit: bool,
}

fn default_port() -> u16 {
    6000
}

fn default_client_version() -> u32 {
    4
}

fn default_auto_fit() -> bool {
    true
}

fn default_keybinds() -> HashMap<String, String> {
    [
        ("ctrl+c", MonitorAction::Connect),
        ("ctrl+t", MonitorAction::ConnectTo),
        ("ctrl+d", MonitorAction::Disconnect),
        ("ctrl+q", MonitorAction::Quit),
        ("ctrl+k", MonitorAction::KickOff),
        ("ctrl+y", MonitorAction::YellowCard),
        ("ctrl+r", MonitorAction::RedCard),
        ("z", MonitorAction::ZoomIn),
        ("x", MonitorAction::ZoomOut),
        ("ctrl+z", MonitorAction::ZoomOut),
        ("i", MonitorAction::FitField),
        ("f1", MonitorAction::Help),
    ]
    .into_iter()
    .map(|(key, action)| (key.to_string(), action.name().to_string()))
    .collect()
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            client_version: default_client_version(),
            auto_connect: false,
        }
    }
}

impl Default for FieldTransform {
    fn default() -> Self {
        let mut transform = Self {
            center_x: 0.0,
            center_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            auto_fit: default_auto_fit(),
        };
        transform.fit(80, 24);
        transform
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            monitor: MonitorConfig::default(),
            field: FieldTransform::default(),
            keybinds: default_keybinds(),
            path: None,
        }
    }
}

impl FieldTransform {
    pub fn field_x(&self, screen_x: i32) -> f64 {
        (screen_x as f64 - self.center_x) / self.scale_x
    }

    pub fn field_y(&self, screen_y: i32) -> f64 {
        (screen_y as f64 - self.center_y) / self.scale_y
    }

    pub fn zoom_in(&mut self) {
        self.scale_x *= ZOOM_FACTOR;
        self.scale_y *= ZOOM_FACTOR;
    }

    pub fn zoom_out(&mut self) {
        self.scale_x = (self.scale_x / ZOOM_FACTOR).max(MIN_SCALE);
        self.scale_y = (self.scale_y / ZOOM_FACTOR).max(MIN_SCALE);
    }

    /// Clamp scales that are not finite or below `MIN_SCALE`.
    /// Returns true when something had to change.
    pub fn clamp_scales(&mut self) -> bool {
        let mut changed = false;
        for scale in [&mut self.scale_x, &mut self.scale_y] {
            if !scale.is_finite() || *scale < MIN_SCALE {
                *scale = MIN_SCALE;
                changed = true;
            }
        }
        changed
    }

    /// Map the whole field onto a `width` x `height` cell screen, centered
    pub fn fit(&mut self, width: u16, height: u16) {
        if width == 0 || height == 0 {
            return;
        }
        self.center_x = width as f64 / 2.0;
        self.center_y = height as f64 / 2.0;
        self.scale_x = width as f64 / VIEW_WIDTH_M;
        self.scale_y = height as f64 / VIEW_HEIGHT_M;
    }
}

impl Config {
    /// Load from the standard location, creating it with defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_path()?)
    }

    /// Load config from a custom file path; a missing file is created with defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut config = Config::default();
            config.path = Some(path.to_path_buf());
            config.save()?;
            tracing::info!("Created default config at {:?}", path);
            return Ok(config);
        }

        let mut config = Self::read(path)?;

        // Validate and auto-fix keybinds
        let validation = keybind_validator::validate_keybinds(&config.keybinds);
        if validation.has_errors() {
            for error in validation.errors() {
                tracing::warn!("Keybind error: {}", error.message());
            }

            let fixed =
                keybind_validator::auto_fix_keybinds(&mut config.keybinds, &validation.issues);
            if fixed > 0 {
                tracing::info!("Auto-fixed {} keybind issues", fixed);
            }
        }
        for warning in validation.warnings() {
            tracing::warn!("Keybind warning: {}", warning.message());
        }

        Ok(config)
    }

    /// Parse a config file as-is, without creating or fixing anything
    pub fn read(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
        let mut config: Config = toml::from_str(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;

        let field = &mut config.field;
        if !field.center_x.is_finite() || !field.center_y.is_finite() {
            anyhow::bail!(
                "Invalid [field] center ({}, {}) in {:?}",
                field.center_x,
                field.center_y,
                path
            );
        }
        if field.clamp_scales() {
            tracing::warn!(
                "Clamped [field] scales to ({}, {}) in {:?}",
                field.scale_x,
                field.scale_y,
                path
            );
        }

        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Write back to the file this config was loaded from
    pub fn save(&self) -> Result<()> {
        let config_path = match &self.path {
            Some(path) => path.clone(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Host to connect to when none is given
    pub fn server_host(&self) -> &str {
        if self.connection.host.is_empty() {
            DEFAULT_HOST
        } else {
            &self.connection.host
        }
    }

    pub fn set_server_host(&mut self, host: &str) {
        self.connection.host = host.to_string();
    }

    /// Parsed keybindings (normalized key string -> action). Invalid entries are skipped.
    pub fn keybind_map(&self) -> HashMap<String, MonitorAction> {
        self.keybinds
            .iter()
            .filter_map(|(key, action)| {
                Some((normalize_keybind(key)?, MonitorAction::from_name(action)?))
            })
            .collect()
    }

    /// First key bound to each action, for menu display
    pub fn shortcuts(&self) -> HashMap<MonitorAction, String> {
        let mut bound: Vec<(String, MonitorAction)> = self.keybind_map().into_iter().collect();
        bound.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));

        let mut shortcuts = HashMap::new();
        for (key, action) in bound {
            shortcuts.entry(action).or_insert(key);
        }
        shortcuts
    }

    /// Expose base directory path (~/.touchline)
    /// Can be overridden with TOUCHLINE_DIR environment variable
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var("TOUCHLINE_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".touchline"))
    }

    /// Returns: ~/.touchline/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    /// Returns: ~/.touchline/touchline.log
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("touchline.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server_host(), "127.0.0.1");
        assert_eq!(config.connection.port, 6000);
        assert_eq!(config.connection.client_version, 4);
        assert!(!config.monitor.auto_quit);
        assert_eq!(config.keybinds.get("ctrl+k").map(String::as_str), Some("kick_off"));
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from_path(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_save_remembers_host() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::load_from_path(&path).unwrap();
        config.set_server_host("sserver.local");
        config.monitor.auto_quit = true;
        config.save().unwrap();

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(reloaded.server_host(), "sserver.local");
        assert!(reloaded.monitor.auto_quit);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[monitor]\nauto_quit = true\nauto_quit_wait_ms = 5000\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert!(config.monitor.auto_quit);
        assert_eq!(config.monitor.auto_quit_wait_ms, 5000);
        assert_eq!(config.connection.port, 6000);
        assert_eq!(config.keybinds, default_keybinds());
    }

    #[test]
    fn test_load_fixes_keybinds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[keybinds]\n\"ctrl+k\" = \"kick_off\"\n\"p\" = \"pause\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.keybinds.len(), 2);
        assert_eq!(config.keybinds.get("ctrl+q").map(String::as_str), Some("quit"));
        assert!(!config.keybinds.contains_key("p"));
    }

    #[test]
    fn test_read_keeps_broken_keybinds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[keybinds]\n\"p\" = \"pause\"\n").unwrap();

        let config = Config::read(&path).unwrap();
        assert_eq!(config.keybinds.get("p").map(String::as_str), Some("pause"));
        assert!(Config::read(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[connection\nport = ").unwrap();

        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn test_field_transform() {
        let transform = FieldTransform {
            center_x: 40.0,
            center_y: 12.0,
            scale_x: 2.0,
            scale_y: 0.5,
            auto_fit: false,
        };
        assert_eq!(transform.field_x(50), 5.0);
        assert_eq!(transform.field_y(10), -4.0);
    }

    #[test]
    fn test_fit_and_zoom() {
        let mut transform = FieldTransform::default();
        transform.fit(230, 78);
        assert_eq!(transform.center_x, 115.0);
        assert_eq!(transform.center_y, 39.0);
        assert_eq!(transform.scale_x, 2.0);
        assert_eq!(transform.scale_y, 1.0);
        assert_eq!(transform.field_x(0), -57.5);

        transform.zoom_in();
        assert_eq!(transform.scale_x, 3.0);
        transform.zoom_out();
        assert_eq!(transform.scale_x, 2.0);

        // A zero-sized screen leaves the transform alone
        let before = transform;
        transform.fit(0, 10);
        assert_eq!(transform, before);
    }

    #[test]
    fn test_keybind_map_skips_invalid() {
        let mut config = Config::default();
        config.keybinds.clear();
        config.keybinds.insert("Ctrl+K".to_string(), "kick_off".to_string());
        config.keybinds.insert("ctrl+".to_string(), "quit".to_string());
        config.keybinds.insert("q".to_string(), "self_destruct".to_string());

        let map = config.keybind_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("ctrl+k"), Some(&MonitorAction::KickOff));
    }

    #[test]
    fn test_shortcuts_prefer_shortest_key() {
        let config = Config::default();
        let shortcuts = config.shortcuts();
        // zoom_out is bound to both "x" and "ctrl+z"
        assert_eq!(shortcuts.get(&MonitorAction::ZoomOut).map(String::as_str), Some("x"));
        assert_eq!(
            shortcuts.get(&MonitorAction::Connect).map(String::as_str),
            Some("ctrl+c")
        );
    }

    #[test]
    fn test_partial_field_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[field]\nauto_fit = false\n").unwrap();

        let config = Config::read(&path).unwrap();
        assert!(!config.field.auto_fit);
        assert_eq!(config.field.scale_x, FieldTransform::default().scale_x);
    }

    #[test]
    fn test_degenerate_field_scales_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[field]\ncenter_x = 40.0\ncenter_y = 12.0\nscale_x = 0.0\nscale_y = -2.0\nauto_fit = false\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.field.scale_x, MIN_SCALE);
        assert_eq!(config.field.scale_y, MIN_SCALE);
        assert!(config.field.field_x(50).is_finite());
        assert!(config.field.field_y(3).is_finite());

        fs::write(&path, "[field]\ncenter_x = nan\n").unwrap();
        assert!(Config::read(&path).is_err());
    }
}
