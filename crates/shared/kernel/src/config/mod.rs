//! Layered settings: an optional file, then `CANDOR__*` environment overrides.

use candor_domain::config::CoreConfig;
use config::{Case, Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of environment overrides, e.g. `CANDOR__CACHE__MAX_ENTRIES`.
pub const ENV_PREFIX: &str = "CANDOR";

/// File stem looked up in the working directory (`candor.toml`, `candor.json`, ...) when no
/// path is given. Its absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "candor";

#[candor_derive::candor_error]
pub enum ConfigError {
    #[error("Cannot load settings{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Where settings come from. [`load_config`] covers the usual case.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `path` instead of the optional default file. The file must then exist.
    #[must_use]
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Reads overrides from `vars` instead of the process environment.
    #[must_use]
    pub fn env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Merges the sources into `T`. Nested keys use `__` in variable names:
    /// `CANDOR__VAULT__ITERATIONS=200000` sets `vault.iterations`.
    ///
    /// # Errors
    /// [`ConfigError::Config`] when an explicit file is missing or unreadable, or when the
    /// merged values do not fit `T`.
    pub fn load<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
        let required = self.file.is_some();
        let file = self.file.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        debug!(path = %file.display(), required, "Reading settings");

        let overrides = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .convert_case(Case::Snake)
            .try_parsing(true)
            .source(self.env);

        let merged = Config::builder()
            .add_source(File::from(file.as_path()).required(required))
            .add_source(overrides)
            .build()
            .context(format!("reading {}", file.display()))?;

        let settings = merged.try_deserialize::<T>().context("checking setting values")?;
        info!(path = %file.display(), "Settings loaded");
        Ok(settings)
    }
}

/// Loads `T` from `path` (or the optional default file) plus the process environment.
///
/// ```rust
/// use candor_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct Settings {
///     retries: u32,
/// }
///
/// let settings: Settings = load_config(None::<&str>).unwrap_or_default();
/// ```
///
/// # Errors
/// See [`ConfigLoader::load`].
pub fn load_config<T: DeserializeOwned>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError> {
    load_config_with_env(path, None)
}

/// Like [`load_config`], with overrides taken from `env` when given.
///
/// # Errors
/// See [`ConfigLoader::load`].
pub fn load_config_with_env<T: DeserializeOwned>(
    path: Option<impl AsRef<Path>>,
    env: Option<HashMap<String, String>>,
) -> Result<T, ConfigError> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = path {
        loader = loader.file(path);
    }
    if let Some(env) = env {
        loader = loader.env(env);
    }
    loader.load()
}

/// Loads the workspace [`CoreConfig`].
///
/// # Errors
/// See [`ConfigLoader::load`].
pub fn load_core_config(path: Option<impl AsRef<Path>>) -> Result<CoreConfig, ConfigError> {
    load_config(path)
}
