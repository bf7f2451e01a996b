use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub document_path: PathBuf,
    #[serde(default)]
    pub editor: EditorSettings,
    #[serde(default)]
    pub detection: DetectionSettings,
}

/// Defaults used when the editor creates blocks or meets unknown tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Language token for new blocks and for headers that fail to decode.
    pub default_language: String,
    /// Whether new blocks start with auto-detection switched on.
    pub default_auto_detect: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            default_language: "text".to_string(),
            default_auto_detect: true,
        }
    }
}

/// Tuning for the block language auto-detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    pub enabled: bool,
    /// Quiet period after the last edit before a detection pass runs.
    pub idle_delay_ms: u64,
    /// How long an in-flight request may take before it is abandoned.
    pub timeout_ms: u64,
    /// Blocks with this many characters or fewer are never sent off.
    pub min_content_len: usize,
    /// Minimum edit distance, as a fraction of content length, between the
    /// last analyzed sample and the current content.
    pub change_fraction: f64,
    pub confidence_threshold: f32,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            idle_delay_ms: 1000,
            timeout_ms: 5000,
            min_content_len: 8,
            change_fraction: 0.1,
            confidence_threshold: 0.5,
        }
    }
}

impl DetectionSettings {
    pub fn idle_delay(&self) -> Duration {
        Duration::from_millis(self.idle_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    pub fn new(document_path: PathBuf) -> Self {
        Self {
            document_path,
            editor: EditorSettings::default(),
            detection: DetectionSettings::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded document path
        config.document_path =
            Self::expand_path(&config.document_path).unwrap_or(config.document_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/blockpad");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Where the scratch document lives when nothing else is configured.
    pub fn default_document_path() -> PathBuf {
        let data_dir = shellexpand::tilde("~/.local/share/blockpad");
        PathBuf::from(data_dir.as_ref()).join("scratch.txt")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/blockpad/config.toml"));
    }

    #[test]
    fn test_default_document_path() {
        let path = Config::default_document_path();
        let path_str = path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with("blockpad/scratch.txt"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut original = Config::new(PathBuf::from("/tmp/scratch.txt"));
        original.editor.default_language = "markdown".to_string();
        original.detection.idle_delay_ms = 250;

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config_content = r#"
document_path = "/tmp/scratch.txt"

[detection]
min_content_len = 20
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(config.editor, EditorSettings::default());
        assert_eq!(config.detection.min_content_len, 20);
        assert_eq!(config.detection.idle_delay_ms, 1000);
        assert!(config.detection.enabled);
    }

    #[test]
    fn test_detection_durations() {
        let settings = DetectionSettings {
            idle_delay_ms: 1500,
            timeout_ms: 200,
            ..DetectionSettings::default()
        };

        assert_eq!(settings.idle_delay(), Duration::from_millis(1500));
        assert_eq!(settings.timeout(), Duration::from_millis(200));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("BLOCKPAD_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$BLOCKPAD_TEST_VAR/scratch.txt");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/scratch.txt")));

        unsafe {
            env::remove_var("BLOCKPAD_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_relative_path() {
        let path = PathBuf::from("relative/scratch.txt");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_config_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "document_path = [not toml").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut test_config = Config::new(PathBuf::from("/tmp/scratch.txt"));
        test_config.detection.confidence_threshold = 0.75;

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_config_with_env_var_in_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        unsafe {
            env::set_var("BLOCKPAD_DATA", "/custom/data");
        }
        std::fs::write(&config_file, "document_path = \"$BLOCKPAD_DATA/notes.txt\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.document_path, PathBuf::from("/custom/data/notes.txt"));

        unsafe {
            env::remove_var("BLOCKPAD_DATA");
        }
    }
}
