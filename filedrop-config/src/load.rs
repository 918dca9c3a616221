//! Hierarchical configuration loading.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::environment::Environment;

/// Directory containing configuration files, relative to the working
/// directory the binary starts in.
const CONFIGURATION_DIR: &str = "configuration";

/// Supported extensions for configuration files, tried in order.
const CONFIG_FILE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Prefix for environment-variable configuration overrides.
const ENV_PREFIX: &str = "APP";

/// Separator between the prefix and the first key segment.
const ENV_PREFIX_SEPARATOR: &str = "_";

/// Separator for nested configuration keys in environment variables.
const ENV_SEPARATOR: &str = "__";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum LoadConfigError {
    /// Failed to determine the current working directory.
    #[error("failed to determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// The `configuration` directory does not exist.
    #[error("configuration directory `{0}` does not exist")]
    MissingConfigurationDirectory(PathBuf),

    /// Could not locate a required configuration file.
    #[error("no `{stem}.(yaml|yml|json)` configuration file in `{directory}`")]
    ConfigurationFileMissing { stem: String, directory: PathBuf },

    /// Failed to determine the runtime environment (`APP_ENVIRONMENT`).
    #[error("failed to determine runtime environment: {0}")]
    Environment(#[from] io::Error),

    /// A configuration source could not be read or merged.
    #[error("failed to assemble configuration: {0}")]
    Assemble(#[source] config::ConfigError),

    /// The assembled configuration did not deserialize into the target type.
    #[error("failed to deserialize configuration: {0}")]
    Deserialize(#[source] config::ConfigError),
}

/// Loads hierarchical configuration from the base file, the environment
/// overlay, and environment-variable overrides.
///
/// Files live in `configuration/`: `base.(yaml|yml|json)` always, plus
/// `{environment}.(yaml|yml|json)` for the environment named by
/// `APP_ENVIRONMENT` (dev when unset). `APP_`-prefixed variables override
/// individual keys, with nested keys separated by double underscores, e.g.
/// `APP_STORE__BUCKET`.
pub fn load_config<T>() -> Result<T, LoadConfigError>
where
    T: DeserializeOwned,
{
    let base_path = std::env::current_dir().map_err(LoadConfigError::CurrentDir)?;
    let configuration_directory = base_path.join(CONFIGURATION_DIR);

    if !configuration_directory.is_dir() {
        return Err(LoadConfigError::MissingConfigurationDirectory(
            configuration_directory,
        ));
    }

    let environment = Environment::load()?;

    let base_file = find_configuration_file(&configuration_directory, "base")?;
    let environment_file =
        find_configuration_file(&configuration_directory, &environment.to_string())?;

    let overrides = config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_SEPARATOR);

    let settings = config::Config::builder()
        .add_source(config::File::from(base_file))
        .add_source(config::File::from(environment_file))
        .add_source(overrides)
        .build()
        .map_err(LoadConfigError::Assemble)?;

    settings
        .try_deserialize::<T>()
        .map_err(LoadConfigError::Deserialize)
}

/// Finds the configuration file with the given stem and a supported
/// extension.
fn find_configuration_file(directory: &Path, stem: &str) -> Result<PathBuf, LoadConfigError> {
    for extension in CONFIG_FILE_EXTENSIONS {
        let path = directory.join(format!("{stem}.{extension}"));
        if path.is_file() {
            return Ok(path);
        }
    }

    Err(LoadConfigError::ConfigurationFileMissing {
        stem: stem.to_string(),
        directory: directory.to_path_buf(),
    })
}
