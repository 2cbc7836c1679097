use std::{
    fmt,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

/// Environment variable holding the WeatherAPI.com key.
pub const API_KEY_VAR: &str = "WEATHER_TOKEN";

/// Dotenv file looked up in the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load env file: {}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error(
        "WEATHER_TOKEN is not set.\n\
         Hint: export it or add `WEATHER_TOKEN=<your api key>` to a .env file."
    )]
    MissingApiKey,
}

/// Process configuration, resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    api_key: String,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into() }
    }

    /// Load `env_file` (if it exists) into the environment, then read the API key.
    ///
    /// A missing dotenv file is fine; an unreadable or malformed one is not.
    /// A missing or blank `WEATHER_TOKEN` is always an error.
    pub fn load(env_file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_env_file(env_file.as_ref())?;
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the API key through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self { api_key })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config").field("api_key", &"<redacted>").finish()
    }
}

/// Populate the process environment from a dotenv file.
///
/// Returns `Ok(false)` when the file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Loaded env file");
            Ok(true)
        }
        Err(err) if err.not_found() => {
            debug!(path = %path.display(), "No env file, using process environment only");
            Ok(false)
        }
        Err(source) => Err(ConfigError::EnvFile { path: path.to_path_buf(), source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, io::Write};

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn from_lookup_reads_weather_token() {
        let cfg = Config::from_lookup(lookup_from(&[("WEATHER_TOKEN", "abc123")])).unwrap();
        assert_eq!(cfg.api_key(), "abc123");
    }

    #[test]
    fn from_lookup_trims_surrounding_whitespace() {
        let cfg = Config::from_lookup(lookup_from(&[("WEATHER_TOKEN", "  abc123\n")])).unwrap();
        assert_eq!(cfg.api_key(), "abc123");
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("OTHER", "x")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.to_string().contains("WEATHER_TOKEN is not set"));
    }

    #[test]
    fn blank_token_is_treated_as_missing() {
        let err = Config::from_lookup(lookup_from(&[("WEATHER_TOKEN", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let cfg = Config::new("super-secret");
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("redacted"));
    }

    #[test]
    fn missing_env_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_env_file(&dir.path().join(".env")).unwrap();
        assert!(!loaded);
    }

    #[test]
    fn existing_env_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "FORECAST_CORE_CONFIG_TEST=1").unwrap();

        assert!(load_env_file(&path).unwrap());
    }

    #[test]
    fn malformed_env_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "NOT A VALID LINE\n").unwrap();

        let err = load_env_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
        assert!(err.to_string().contains("Failed to load env file"));
    }
}
