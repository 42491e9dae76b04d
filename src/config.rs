//! User configuration
//!
//! Loaded from a TOML file, with `GITSTATE_*` environment variables layered on
//! top. The file location, in priority order:
//! 1. `--config` CLI flag (set via [`set_config_path`])
//! 2. `GITSTATE_CONFIG_PATH` environment variable
//! 3. `<config dir>/gitstate/config.toml` (XDG on Linux and macOS, `%APPDATA%` on Windows)
//!
//! ```toml
//! git-binary = "/usr/local/bin/git"
//! timeout-ms = 5000
//! no-optional-locks = true
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use config::{Case, Config, ConfigError, Environment, File, FileFormat};
use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};
use serde::{Deserialize, Serialize};

/// Override for the config path, set via --config CLI flag
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

pub fn set_config_path(path: PathBuf) {
    CONFIG_PATH.set(path).ok();
}

pub fn get_config_path() -> Option<PathBuf> {
    if let Some(path) = CONFIG_PATH.get() {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("GITSTATE_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }

    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("gitstate").join("config.toml"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GitstateConfig {
    /// Program used to run git
    pub git_binary: String,
    /// Kill git if a status query takes longer than this
    pub timeout_ms: Option<u64>,
    /// Pass `--no-optional-locks` so status never refreshes the index
    pub no_optional_locks: bool,
}

impl Default for GitstateConfig {
    fn default() -> Self {
        Self {
            git_binary: "git".to_string(),
            timeout_ms: None,
            no_optional_locks: true,
        }
    }
}

impl GitstateConfig {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(get_config_path().as_deref())
    }

    /// Load configuration from `path` (if it exists) plus the environment.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            log::debug!("Loading config from {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix("GITSTATE")
                    .convert_case(Case::Kebab)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
