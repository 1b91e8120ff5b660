use crate::{PostIdentifier, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static POST_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.)?reddit\.com/r/[\w-]+/comments/(\w+)/?.*$")
        .expect("post URL pattern is valid")
});

/// Extracts the submission id from a Reddit comment-thread URL.
///
/// Accepts `http(s)://[www.]reddit.com/r/<subreddit>/comments/<id>[/...]`.
/// The id is returned exactly as written.
pub fn parse_post_url(url: &str) -> Result<PostIdentifier, ValidationError> {
    match POST_URL_PATTERN
        .captures(url)
        .and_then(|captures| captures.get(2))
    {
        Some(id) => {
            debug!("Parsed post id {} from {}", id.as_str(), url);
            Ok(PostIdentifier::new(id.as_str()))
        }
        None => {
            warn!("Invalid URL format: {}", url);
            Err(ValidationError {
                url: url.to_string(),
            })
        }
    }
}
