// filepath: src/config.rs
//! Configuration handling for simple-canvas
//!
//! This file defines the configuration structure and provides
//! functionality to load and save configuration from/to files.
//! Every field is optional; anything left out falls back to the
//! built-in defaults when resources are resolved.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Size and backdrop of the drawing window
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WindowConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Shown where nothing has been drawn yet
    pub backdrop: Option<[u8; 4]>,
}

/// Named colors, as `[r, g, b, a]`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PaletteConfig {
    pub background: Option<[u8; 4]>,
    pub rectangle: Option<[u8; 4]>,
    pub accent: Option<[u8; 4]>,
    pub text: Option<[u8; 4]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StringsConfig {
    pub keep_tapping: Option<String>,
    pub done: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TextConfig {
    pub size: Option<f32>,
    pub underline: Option<bool>,
    pub font_path: Option<PathBuf>,
    pub prompt_x: Option<i32>,
    pub prompt_y: Option<i32>,
}

/// Progression of the rectangle sequence
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SequenceConfig {
    pub offset: Option<u32>,
    pub multiplier: Option<u32>,
}

/// Configuration for the canvas appearance and behavior
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CanvasConfig {
    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub palette: PaletteConfig,

    #[serde(default)]
    pub strings: StringsConfig,

    #[serde(default)]
    pub text: TextConfig,

    #[serde(default)]
    pub sequence: SequenceConfig,
}

impl CanvasConfig {
    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        let config_dir = if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("simple-canvas")
        } else {
            PathBuf::from(".config/simple-canvas")
        };

        config_dir.join("config.toml")
    }

    /// Load configuration from file, writing the defaults if none exists
    pub fn load_from_file() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path();

        match Self::load_from_path(&config_path) {
            Ok(config) => Ok(config),
            Err(e)
                if e.downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == ErrorKind::NotFound) =>
            {
                // If the file doesn't exist, create it with default values
                let default_config = Self::default();
                default_config.save_to_path(&config_path)?;
                Ok(default_config)
            }
            Err(e) => Err(e),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Save configuration to file
    fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        // Create the directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            if !Path::exists(parent) {
                fs::create_dir_all(parent)?;
            }
        }

        // Serialize and write the configuration
        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = CanvasConfig::from_toml("").expect("empty config parses");
        assert_eq!(config, CanvasConfig::default());
    }

    #[test]
    fn partial_sections_parse() {
        let config = CanvasConfig::from_toml(
            r#"
            [palette]
            accent = [255, 64, 129, 255]

            [sequence]
            offset = 60

            [text]
            font_path = "/tmp/font.ttf"
            underline = false
            "#,
        )
        .expect("config parses");

        assert_eq!(config.palette.accent, Some([255, 64, 129, 255]));
        assert_eq!(config.palette.background, None);
        assert_eq!(config.sequence.offset, Some(60));
        assert_eq!(config.sequence.multiplier, None);
        assert_eq!(config.text.font_path, Some(PathBuf::from("/tmp/font.ttf")));
        assert_eq!(config.text.underline, Some(false));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(CanvasConfig::from_toml("[palette\naccent = 3").is_err());
        assert!(CanvasConfig::from_toml("[palette]\naccent = \"red\"").is_err());
    }

    #[test]
    fn missing_file_reports_not_found() {
        let err = CanvasConfig::load_from_path(Path::new("/nonexistent/simple-canvas.toml"))
            .expect_err("file does not exist");
        let io = err.downcast_ref::<std::io::Error>().expect("io error");
        assert_eq!(io.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn saved_config_reads_back() {
        let dir = std::env::temp_dir().join(format!("simple-canvas-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut config = CanvasConfig::default();
        config.strings.done = Some("Finished".to_string());
        config.window.width = Some(640);

        config.save_to_path(&path).expect("config saves");
        let loaded = CanvasConfig::load_from_path(&path).expect("config loads");
        assert_eq!(loaded, config);

        let _ = fs::remove_dir_all(&dir);
    }
}
