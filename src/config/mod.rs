use crate::tui::components::dialogs::{
    default_descriptors, DialogDescriptor, DialogSequence, StackGeometry,
};
use crate::tui::components::dialogs::layer::{
    DEFAULT_BASE_Z_INDEX, DEFAULT_CELL_HEIGHT, DEFAULT_FRAME_WIDTH, DEFAULT_STEP,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Narrowest frame that still fits both buttons side by side
const MIN_FRAME_WIDTH: u16 = 20;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Offset units between stacked frames
    pub step: u16,

    /// Offset units per terminal row
    pub cell_height: u16,

    /// Stacking value of the first frame
    pub base_z_index: i32,

    /// Maximum frame width in columns
    pub frame_width: u16,

    /// Whether clicks are handled
    pub mouse_enabled: bool,

    /// Input poll interval in milliseconds
    pub tick_rate_ms: u64,

    /// The dialogs to step through, in order
    pub dialogs: Vec<DialogDescriptor>,
}

/// Configuration file contents; every field is optional
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub step: Option<u16>,
    pub cell_height: Option<u16>,
    pub base_z_index: Option<i32>,
    pub frame_width: Option<u16>,
    pub mouse_enabled: Option<bool>,
    pub tick_rate_ms: Option<u64>,
    pub dialogs: Option<Vec<DialogDescriptor>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            cell_height: DEFAULT_CELL_HEIGHT,
            base_z_index: DEFAULT_BASE_Z_INDEX,
            frame_width: DEFAULT_FRAME_WIDTH,
            mouse_enabled: true,
            tick_rate_ms: 100,
            dialogs: default_descriptors(),
        }
    }
}

impl Config {
    /// Initialize configuration from various sources
    pub async fn init(explicit_path: Option<&Path>) -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = Self::default();

        // Load from environment variables
        config.load_from_env();

        // Configuration files take precedence over the environment
        match explicit_path {
            Some(path) => {
                let file = Self::load_from_path(path).await?;
                info!("Loaded configuration from {}", path.display());
                config.merge_with(file);
            }
            None => {
                if let Some((path, file)) = Self::load_from_file().await? {
                    info!("Loaded configuration from {}", path.display());
                    config.merge_with(file);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.load_from_vars(|name| std::env::var(name).ok());
    }

    /// Apply `DIALOG_STACK_*` variables found through `lookup`
    pub fn load_from_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(step) = parse_var(&lookup, "DIALOG_STACK_STEP") {
            self.step = step;
        }

        if let Some(cell_height) = parse_var(&lookup, "DIALOG_STACK_CELL_HEIGHT") {
            self.cell_height = cell_height;
        }

        if let Some(frame_width) = parse_var(&lookup, "DIALOG_STACK_FRAME_WIDTH") {
            self.frame_width = frame_width;
        }

        if let Some(tick_rate_ms) = parse_var(&lookup, "DIALOG_STACK_TICK_MS") {
            self.tick_rate_ms = tick_rate_ms;
        }

        if let Some(mouse) = lookup("DIALOG_STACK_MOUSE") {
            self.mouse_enabled = matches!(mouse.to_lowercase().as_str(), "true" | "1" | "yes" | "on");
        }
    }

    /// Search the default locations for a configuration file
    ///
    /// Priority:
    /// 1. ./.dialog-stack.json
    /// 2. ./dialog-stack.json
    /// 3. $CONFIG_DIR/dialog-stack/dialog-stack.json
    pub async fn load_from_file() -> Result<Option<(PathBuf, ConfigFile)>> {
        let mut config_paths = vec![
            PathBuf::from("./.dialog-stack.json"),
            PathBuf::from("./dialog-stack.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("dialog-stack").join("dialog-stack.json"));
        }

        for path in config_paths {
            if path.exists() {
                let file = Self::load_from_path(&path).await?;
                return Ok(Some((path, file)));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Parse one configuration file
    pub async fn load_from_path(path: &Path) -> Result<ConfigFile> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(file)
    }

    /// Merge a configuration file into this one
    pub fn merge_with(&mut self, other: ConfigFile) {
        if let Some(step) = other.step {
            self.step = step;
        }
        if let Some(cell_height) = other.cell_height {
            self.cell_height = cell_height;
        }
        if let Some(base_z_index) = other.base_z_index {
            self.base_z_index = base_z_index;
        }
        if let Some(frame_width) = other.frame_width {
            self.frame_width = frame_width;
        }
        if let Some(mouse_enabled) = other.mouse_enabled {
            self.mouse_enabled = mouse_enabled;
        }
        if let Some(tick_rate_ms) = other.tick_rate_ms {
            self.tick_rate_ms = tick_rate_ms;
        }
        if let Some(dialogs) = other.dialogs {
            self.dialogs = dialogs;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(anyhow::anyhow!("step must be greater than 0"));
        }

        if self.cell_height == 0 {
            return Err(anyhow::anyhow!("cell_height must be greater than 0"));
        }

        if self.frame_width < MIN_FRAME_WIDTH {
            return Err(anyhow::anyhow!(
                "frame_width must be at least {}",
                MIN_FRAME_WIDTH
            ));
        }

        if self.tick_rate_ms == 0 {
            return Err(anyhow::anyhow!("tick_rate_ms must be greater than 0"));
        }

        DialogSequence::new(self.dialogs.clone()).context("Invalid dialog sequence")?;

        Ok(())
    }

    pub fn geometry(&self) -> StackGeometry {
        StackGeometry {
            step: self.step,
            cell_height: self.cell_height,
            base_z_index: self.base_z_index,
            frame_width: self.frame_width,
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}: cannot parse '{}'", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.geometry(), StackGeometry::default());
        assert_eq!(config.dialogs.len(), 3);
    }

    #[test]
    fn test_env_overrides() {
        let env = vars(&[
            ("DIALOG_STACK_STEP", "16"),
            ("DIALOG_STACK_CELL_HEIGHT", "4"),
            ("DIALOG_STACK_MOUSE", "off"),
            ("DIALOG_STACK_TICK_MS", "not-a-number"),
        ]);
        let mut config = Config::default();
        config.load_from_vars(|name| env.get(name).cloned());

        assert_eq!(config.step, 16);
        assert_eq!(config.cell_height, 4);
        assert!(!config.mouse_enabled);
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[test]
    fn test_merge_only_touches_present_fields() {
        let mut config = Config::default();
        config.merge_with(ConfigFile {
            frame_width: Some(40),
            dialogs: Some(vec![DialogDescriptor::new("solo", "Solo", "Only one")]),
            ..ConfigFile::default()
        });

        assert_eq!(config.frame_width, 40);
        assert_eq!(config.step, DEFAULT_STEP);
        assert_eq!(config.dialogs.len(), 1);
        assert_eq!(config.dialogs[0].id.as_str(), "solo");
    }

    #[test]
    fn test_validation_failures() {
        let invalid = [
            Config { step: 0, ..Config::default() },
            Config { cell_height: 0, ..Config::default() },
            Config { frame_width: 10, ..Config::default() },
            Config { tick_rate_ms: 0, ..Config::default() },
            Config { dialogs: vec![], ..Config::default() },
        ];
        for config in invalid {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }

        let duplicated = Config {
            dialogs: vec![
                DialogDescriptor::new("a", "A", "a"),
                DialogDescriptor::new("a", "B", "b"),
            ],
            ..Config::default()
        };
        let err = duplicated.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("appears more than once"));
    }

    #[tokio::test]
    async fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "step": 4,
                "dialogs": [
                    {{"id": "welcome", "title": "Welcome", "description": "Start here"}},
                    {{"id": "done", "title": "Done", "description": "All set"}}
                ]
            }}"#
        )
        .unwrap();

        let config = Config::init(Some(file.path())).await.unwrap();
        assert_eq!(config.step, 4);
        assert_eq!(config.dialogs.len(), 2);
        assert_eq!(config.dialogs[1].title, "Done");
    }

    #[tokio::test]
    async fn test_unknown_fields_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"stepp": 4}}"#).unwrap();
        assert!(Config::load_from_path(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_file_sequence_fails_init() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"dialogs": []}}"#).unwrap();
        assert!(Config::init(Some(file.path())).await.is_err());
    }
}
