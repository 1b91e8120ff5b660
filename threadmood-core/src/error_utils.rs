use crate::error::*;
use tracing::error;

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> &'static str;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!(code = self.error_code(), "CoreError: {}", self);
        match self {
            CoreError::RedditApi(e) => {
                error!("Reddit API error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Config(e) => config_message(e),
            CoreError::Io(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                "The server address is already in use. Set server.bind_addr to a free port."
                    .to_string()
            }
            CoreError::Io(_) => "The server could not be started.".to_string(),
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CoreError::RedditApi(e) => e.error_code(),
            CoreError::Config(e) => e.error_code(),
            CoreError::Io(_) => "IO",
            CoreError::Network(_) => "NETWORK",
            CoreError::Internal { .. } => "INTERNAL",
        }
    }
}

fn config_message(error: &ConfigError) -> String {
    match error {
        ConfigError::FileNotFound { path } => {
            format!("Configuration file '{}' does not exist.", path)
        }
        ConfigError::MissingField { field } => format!(
            "'{}' is not configured. Set it in the config file or the environment.",
            field
        ),
        ConfigError::InvalidValue { field, value } => {
            format!("'{}' is not a valid value for {}.", value, field)
        }
        ConfigError::Parse(_) => "The configuration file is not valid TOML.".to_string(),
    }
}
