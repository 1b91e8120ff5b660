use crate::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use tracing::{debug, info};

pub const CONFIG_PATH_VAR: &str = "THREADMOOD_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "threadmood.toml";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Script-app credentials used for application-only OAuth.
#[derive(Clone, PartialEq, Eq)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub reddit: RedditCredentials,
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    reddit: RedditSection,
    #[serde(default)]
    server: ServerSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RedditSection {
    client_id: Option<String>,
    client_secret: Option<String>,
    user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerSection {
    bind_addr: Option<String>,
}

impl AppConfig {
    /// Loads the TOML file named by `THREADMOOD_CONFIG` (or `threadmood.toml`
    /// when unset) and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let contents = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => read_config_file(Path::new(&path), true)?,
            Err(_) => read_config_file(Path::new(DEFAULT_CONFIG_PATH), false)?,
        };

        Self::from_sources(contents.as_deref(), |name| std::env::var(name).ok())
    }

    /// Builds the config from optional file contents and an environment
    /// lookup. Non-empty environment values win over the file.
    pub fn from_sources<F>(file_contents: Option<&str>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: FileConfig = match file_contents {
            Some(contents) => toml::from_str(contents)?,
            None => FileConfig::default(),
        };

        let pick = |var: &str, from_file: Option<String>| {
            env(var)
                .filter(|value| !value.trim().is_empty())
                .or(from_file)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let client_id = pick("REDDIT_CLIENT_ID", file.reddit.client_id).ok_or_else(|| {
            ConfigError::MissingField {
                field: "reddit.client_id".to_string(),
            }
        })?;
        let client_secret = pick("REDDIT_CLIENT_SECRET", file.reddit.client_secret)
            .ok_or_else(|| ConfigError::MissingField {
                field: "reddit.client_secret".to_string(),
            })?;
        let user_agent = pick("REDDIT_USER_AGENT", file.reddit.user_agent).ok_or_else(|| {
            ConfigError::MissingField {
                field: "reddit.user_agent".to_string(),
            }
        })?;

        let bind_value = pick("THREADMOOD_BIND_ADDR", file.server.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "server.bind_addr".to_string(),
                value: bind_value.clone(),
            })?;

        Ok(Self {
            reddit: RedditCredentials {
                client_id,
                client_secret,
                user_agent,
            },
            bind_addr,
        })
    }
}

/// Reads the config file at `path`. A missing file is only an error when
/// the path was named explicitly.
pub fn read_config_file(path: &Path, explicit: bool) -> Result<Option<String>, ConfigError> {
    let not_found = || ConfigError::FileNotFound {
        path: path.display().to_string(),
    };

    if !path.exists() {
        if explicit {
            return Err(not_found());
        }
        debug!("No {} found, using environment only", path.display());
        return Ok(None);
    }

    info!("Loading configuration from {}", path.display());
    std::fs::read_to_string(path).map(Some).map_err(|_| not_found())
}
