//! Runtime environment detection.

use std::fmt;
use std::io;
use std::str::FromStr;

/// Name of the environment variable that selects the runtime environment.
const APP_ENVIRONMENT_ENV_NAME: &str = "APP_ENVIRONMENT";

/// Runtime environment the service executes in.
///
/// Selects which configuration overlay is loaded on top of the base file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    /// Reads the environment from `APP_ENVIRONMENT`, defaulting to
    /// [`Environment::Dev`] when the variable is unset.
    pub fn load() -> io::Result<Self> {
        match std::env::var(APP_ENVIRONMENT_ENV_NAME) {
            Ok(value) => value
                .parse()
                .map_err(|err: String| io::Error::new(io::ErrorKind::InvalidInput, err)),
            Err(std::env::VarError::NotPresent) => Ok(Environment::Dev),
            Err(err) => Err(io::Error::new(io::ErrorKind::InvalidInput, err.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Dev => f.write_str("dev"),
            Environment::Staging => f.write_str("staging"),
            Environment::Prod => f.write_str("prod"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Prod),
            other => Err(format!(
                "`{other}` is not a known environment; use dev, staging, or prod"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!("DEV".parse::<Environment>(), Ok(Environment::Dev));
        assert_eq!("development".parse::<Environment>(), Ok(Environment::Dev));
        assert_eq!("Production".parse::<Environment>(), Ok(Environment::Prod));
    }

    #[test]
    fn rejects_unknown_environments() {
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for environment in [Environment::Dev, Environment::Staging, Environment::Prod] {
            assert_eq!(
                environment.to_string().parse::<Environment>(),
                Ok(environment)
            );
        }
    }
}
