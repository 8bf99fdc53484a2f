//! Cleaner settings files
//!
//! A [`CleanerConfig`] can be stored as TOML or RON; the format is picked
//! from the file extension.

use std::path::{Path, PathBuf};

pub use serde::{Deserialize, Serialize};

/// On-disk formats a settings file may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Format matching the extension of `path`
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Settings that can be read from and written to a TOML or RON file
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load settings from `path`
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed: Result<Self, String> = match format {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| e.to_string()),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Save settings to `path`
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
            ConfigFormat::Ron => {
                ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                    .map_err(|e| e.to_string())
            }
        }
        .map_err(ConfigError::Serialize)?;

        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Errors reading or writing a settings file
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// Settings file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file contents are not valid for its format
    #[error("Invalid settings in {}: {message}", .path.display())]
    Parse {
        /// Settings file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The settings could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// The extension is neither `.toml` nor `.ron`
    #[error("Unsupported settings format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Settings for a cleaning run, usually supplied by a `.toml` or `.ron` file
///
/// Every field is optional so that a file can provide just the keyword and
/// leave the paths to the command line, or the other way around.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Source OBJ file
    pub input: Option<PathBuf>,
    /// Destination OBJ file
    pub output: Option<PathBuf>,
    /// Objects whose name contains this text are removed
    pub keyword: Option<String>,
}

impl Config for CleanerConfig {}

impl CleanerConfig {
    /// Overlay the values set in `other` on top of this config
    pub fn merged_with(self, other: Self) -> Self {
        Self {
            input: other.input.or(self.input),
            output: other.output.or(self.output),
            keyword: other.keyword.or(self.keyword),
        }
    }
}
