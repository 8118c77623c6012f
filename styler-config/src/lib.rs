//! Shared configuration loader for the styler toolchain.
//!
//! `defaults/styler.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer a project file and
//! CLI overrides on top of those defaults via [`Loader`] before
//! deserializing into [`StylerConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use styler_core::{ignore::IgnoreMarkers, Options};

const DEFAULT_TOML: &str = include_str!("defaults/styler.default.toml");

/// Top-level configuration consumed by styler applications.
#[derive(Debug, Clone, Deserialize)]
pub struct StylerConfig {
    pub formatting: FormattingConfig,
}

/// Formatting-related configuration groups.
#[derive(Debug, Clone, Deserialize)]
pub struct FormattingConfig {
    pub options: Options,
    pub ignore_markers: IgnoreMarkerConfig,
    pub cache: CacheConfig,
}

/// The process-wide ignore-region markers, configurable per project.
/// Carried as plain strings because `regex::Regex` is not
/// itself `Deserialize`; [`IgnoreMarkerConfig::compile`] builds the runtime
/// value the ignore-marker scanner actually uses.
#[derive(Debug, Clone, Deserialize)]
pub struct IgnoreMarkerConfig {
    pub start: String,
    pub stop: String,
}

impl IgnoreMarkerConfig {
    /// Compile into the runtime [`IgnoreMarkers`] the scanner consumes.
    /// Returns `InvalidOption`-flavored [`ConfigError`] on a bad pattern.
    pub fn compile(&self) -> Result<IgnoreMarkers, ConfigError> {
        let start = Regex::new(&self.start)
            .map_err(|e| ConfigError::Message(format!("invalid ignore_start regex: {}", e)))?;
        let stop = Regex::new(&self.stop)
            .map_err(|e| ConfigError::Message(format!("invalid ignore_stop regex: {}", e)))?;
        Ok(IgnoreMarkers { start, stop })
    }
}

/// Cache store configuration: whether caching is enabled at all, and the
/// root directory (empty string = unset, resolved from environment by the
/// cache-store crate instead).
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub root: String,
}

impl CacheConfig {
    pub fn root_path(&self) -> Option<std::path::PathBuf> {
        if self.root.is_empty() {
            None
        } else {
            Some(std::path::PathBuf::from(&self.root))
        }
    }
}

/// Helper for layering user overrides over the built-in defaults, mirroring
/// the donor toolchain's `config`-crate-backed `Loader`.
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
        let source = File::from(path.as_ref()).format(FileFormat::Toml).required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent),
    /// e.g. a project-root `.styler.toml`.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref()).format(FileFormat::Toml).required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<StylerConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<StylerConfig, ConfigError> {
    Loader::new().build()
}

/// Layer the embedded defaults with an optional project file
/// (`<project_root>/.styler.toml`), the shape every `styler-cli` invocation
/// actually uses.
pub fn load_project(project_root: impl AsRef<Path>) -> Result<StylerConfig, ConfigError> {
    Loader::new()
        .with_optional_file(project_root.as_ref().join(".styler.toml"))
        .build()
}
