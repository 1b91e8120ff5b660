pub mod config;
pub mod error;
pub mod error_utils;
pub mod post_url;
pub mod types;

pub use config::*;
pub use error::*;
pub use error_utils::*;
pub use post_url::*;
pub use types::*;
