//! Environment profiles for the admin console API.
//!
//! One profile is selected at construction time and never mutated afterwards.
//! The profile carries the base URL, display metadata, and the default
//! request timeout consumed by the HTTP client.

use std::str::FromStr;
use std::time::Duration;

/// Process variable consulted by [`Environment::from_process_env`].
pub const ENVIRONMENT_VARIABLE: &str = "CONSOLE_ENV";

/// Failure raised when an environment name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment name: {name}")]
pub struct UnknownEnvironment {
    /// The rejected name.
    pub name: String,
}

/// Deployment environment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development against a loopback server.
    #[default]
    Development,
    /// Shared test deployment.
    Test,
    /// Production deployment.
    Production,
}

impl Environment {
    /// Resolve the environment from the `CONSOLE_ENV` process variable.
    ///
    /// Missing or unrecognised values fall back to development, matching the
    /// original console's behaviour of defaulting unknown modes.
    #[must_use]
    pub fn from_process_env() -> Self {
        std::env::var(ENVIRONMENT_VARIABLE)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "development" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" => Ok(Self::Production),
            other => Err(UnknownEnvironment {
                name: other.to_owned(),
            }),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable configuration record for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    /// Base URL every endpoint path is joined onto.
    pub api_base_url: String,
    /// Human-readable application name.
    pub app_name: String,
    /// Application version string.
    pub version: String,
    /// Whether verbose diagnostics are expected.
    pub debug: bool,
    /// Default request timeout for the HTTP client.
    pub timeout: Duration,
}

impl EnvironmentConfig {
    /// Return the static profile for `environment`.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self {
                api_base_url: "http://127.0.0.1:8080".to_owned(),
                app_name: "Admin Console".to_owned(),
                version: "1.0.0".to_owned(),
                debug: true,
                timeout: Duration::from_secs(10),
            },
            Environment::Test => Self {
                api_base_url: "http://test-api.example.com".to_owned(),
                app_name: "Admin Console (test)".to_owned(),
                version: "1.0.0".to_owned(),
                debug: true,
                timeout: Duration::from_secs(15),
            },
            Environment::Production => Self {
                api_base_url: "https://api.example.com".to_owned(),
                app_name: "Admin Console".to_owned(),
                version: "1.0.0".to_owned(),
                debug: false,
                timeout: Duration::from_secs(30),
            },
        }
    }

    /// Profile selected by the `CONSOLE_ENV` process variable.
    #[must_use]
    pub fn from_process_env() -> Self {
        Self::for_environment(Environment::from_process_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::development(Environment::Development, "http://127.0.0.1:8080", 10, true)]
    #[case::test(Environment::Test, "http://test-api.example.com", 15, true)]
    #[case::production(Environment::Production, "https://api.example.com", 30, false)]
    fn profiles_carry_expected_settings(
        #[case] environment: Environment,
        #[case] base_url: &str,
        #[case] timeout_secs: u64,
        #[case] debug: bool,
    ) {
        let config = EnvironmentConfig::for_environment(environment);
        assert_eq!(config.api_base_url, base_url);
        assert_eq!(config.timeout, Duration::from_secs(timeout_secs));
        assert_eq!(config.debug, debug);
    }

    #[rstest]
    #[case("development", Environment::Development)]
    #[case("test", Environment::Test)]
    #[case("production", Environment::Production)]
    fn parses_known_environment_names(#[case] name: &str, #[case] expected: Environment) {
        assert_eq!(name.parse::<Environment>().ok(), Some(expected));
    }

    #[test]
    fn rejects_unknown_environment_names() {
        let error = "staging".parse::<Environment>().expect_err("must reject");
        assert_eq!(error.name, "staging");
    }
}
