//! Shared configuration loader for the usfm toolchain.
//!
//! `defaults/usfm.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`UsfmConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use usfm_babel::{ParseOptions, SerializeOptions};

const DEFAULT_TOML: &str = include_str!("../defaults/usfm.default.toml");

/// Top-level configuration consumed by usfm applications.
#[derive(Debug, Clone, Deserialize)]
pub struct UsfmConfig {
    pub parse: ParseConfig,
    pub serialize: SerializeConfig,
    pub inspect: InspectConfig,
}

/// Mirrors [`ParseOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    pub chunk: bool,
    #[serde(default)]
    pub content_source: Option<String>,
    pub convert_to_int: Vec<String>,
    #[serde(default)]
    pub map: BTreeMap<String, String>,
}

impl From<ParseConfig> for ParseOptions {
    fn from(config: ParseConfig) -> Self {
        ParseOptions {
            chunk: config.chunk,
            content_source: config.content_source.filter(|s| !s.is_empty()),
            convert_to_int: config.convert_to_int,
            map: config.map,
        }
    }
}

impl From<&ParseConfig> for ParseOptions {
    fn from(config: &ParseConfig) -> Self {
        config.clone().into()
    }
}

/// Mirrors [`SerializeOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct SerializeConfig {
    pub chunk: bool,
    pub forced_new_lines: bool,
    pub ignore: Vec<String>,
    pub milestone_ignore: Vec<String>,
    #[serde(default)]
    pub map: BTreeMap<String, String>,
    #[serde(default)]
    pub milestone_map: BTreeMap<String, String>,
}

impl From<SerializeConfig> for SerializeOptions {
    fn from(config: SerializeConfig) -> Self {
        SerializeOptions {
            chunk: config.chunk,
            ignore: config.ignore,
            map: config.map,
            milestone_ignore: config.milestone_ignore,
            milestone_map: config.milestone_map,
            forced_new_lines: config.forced_new_lines,
        }
    }
}

impl From<&SerializeConfig> for SerializeOptions {
    fn from(config: &SerializeConfig) -> Self {
        config.clone().into()
    }
}

/// Controls inspect output.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub show_attributes: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `("serialize.chunk", true)`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<UsfmConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<UsfmConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(!config.parse.chunk);
        assert!(config.parse.content_source.is_none());
        assert!(config.parse.convert_to_int.is_empty());
        assert!(!config.serialize.forced_new_lines);
        assert!(!config.inspect.show_attributes);
    }

    #[test]
    fn defaults_convert_to_default_options() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(ParseOptions::from(&config.parse), ParseOptions::default());
        assert_eq!(
            SerializeOptions::from(config.serialize),
            SerializeOptions::default()
        );
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("serialize.forced_new_lines", true)
            .expect("override to apply")
            .set_override("parse.content_source", "ugnt")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(config.serialize.forced_new_lines);

        let options: ParseOptions = config.parse.into();
        assert_eq!(options.content_source.as_deref(), Some("ugnt"));
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "[serialize]\nignore = [\"morph\"]\n\n[serialize.map]\nstrong = \"strongs\"\n"
        )
        .expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        let options: SerializeOptions = config.serialize.into();
        assert_eq!(options.ignore, vec!["morph"]);
        assert_eq!(options.map["strong"], "strongs");
        assert!(!options.chunk);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new().with_file("/nonexistent/usfm.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/usfm.toml")
            .build()
            .expect("config to build");
        assert!(!config.parse.chunk);
    }
}
