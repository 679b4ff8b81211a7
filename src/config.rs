//! Application configuration sourced from environment variables.
//!
//! Configuration is read once at startup and handed to services explicitly;
//! nothing below this module touches the process environment, which keeps
//! tests free to run with whatever limits they need.

use std::env;
use thiserror::Error;

/// Environment variable holding the project ceiling.
const MAX_PROJECTS_VAR: &str = "MAX_NUMBER_OF_PROJECTS";

/// Environment variable holding a complete database URL.
const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value '{value}' for {name}: {reason}")]
pub struct ConfigError {
    /// The offending environment variable.
    pub name: &'static str,
    /// The raw value found in the environment.
    pub value: String,
    /// Why the value was rejected.
    pub reason: String,
}

/// Validation ceilings applied by the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of projects that may exist at once.
    pub max_projects: u64,
    /// Maximum project name length in characters.
    pub max_project_name_chars: usize,
    /// Maximum task title length in characters.
    pub max_task_title_chars: usize,
    /// Maximum description length in characters.
    pub max_description_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_projects: 10,
            max_project_name_chars: 100,
            max_task_title_chars: 255,
            max_description_chars: 1024,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Validation ceilings for the service layer.
    pub limits: Limits,
    /// Connection URL for the `PostgreSQL` adapter, when one is configured.
    pub database_url: Option<String>,
}

impl Config {
    /// Builds a configuration from the process environment.
    ///
    /// `MAX_NUMBER_OF_PROJECTS` overrides the project ceiling. The database
    /// URL is taken from `DATABASE_URL`, or assembled from `DB_USER`,
    /// `DB_PASSWORD`, `DB_HOST`, `DB_PORT`, and `DB_NAME` when all five are
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `MAX_NUMBER_OF_PROJECTS` is set but is
    /// not a non-negative integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut limits = Limits::default();
        if let Ok(raw) = env::var(MAX_PROJECTS_VAR) {
            limits.max_projects = raw.trim().parse().map_err(|_ignored| ConfigError {
                name: MAX_PROJECTS_VAR,
                value: raw.clone(),
                reason: "expected a non-negative integer".to_owned(),
            })?;
        }
        Ok(Self {
            limits,
            database_url: database_url_from_env(),
        })
    }
}

/// Resolves the database URL, preferring `DATABASE_URL` over the individual
/// `DB_*` variables.
fn database_url_from_env() -> Option<String> {
    if let Ok(url) = env::var(DATABASE_URL_VAR) {
        if !url.trim().is_empty() {
            return Some(url);
        }
    }
    let user = env::var("DB_USER").ok()?;
    let password = env::var("DB_PASSWORD").ok()?;
    let host = env::var("DB_HOST").ok()?;
    let port = env::var("DB_PORT").ok()?;
    let name = env::var("DB_NAME").ok()?;
    Some(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
}
