use std::future::Future;
use std::time::Duration;
use threadmood_core::CoreError;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Fixed pause between attempts
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::reddit()
    }
}

impl RetryConfig {
    /// Three attempts, two seconds apart.
    pub fn reddit() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }

    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// Runs `operation` until it succeeds or `config.max_attempts` attempts
/// have failed, sleeping `config.delay` between attempts. The last error is
/// returned unchanged.
pub async fn retry_with_fixed_delay<F, Fut, T>(
    operation_name: &str,
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    info!("Operation {} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(error) if attempt < max_attempts => {
                info!(
                    "Attempt {}/{} of {} failed, retrying in {:?}: {}",
                    attempt, max_attempts, operation_name, config.delay, error
                );
                sleep(config.delay).await;
                attempt += 1;
            }
            Err(error) => {
                warn!(
                    "Operation {} failed after {} attempts: {}",
                    operation_name, max_attempts, error
                );
                return Err(error);
            }
        }
        debug!("Retry attempt {} for {}", attempt, operation_name);
    }
}
