use crate::retry::{retry_with_fixed_delay, RetryConfig};
use async_trait::async_trait;
use std::sync::Arc;
use threadmood_core::{
    CoreError, ErrorExt, FetchError, PostIdentifier, PostRecord, DELETED_AUTHOR, MAX_COMMENTS,
};
use tracing::{error, info};

/// Account name Reddit reports for removed accounts.
const REDDIT_DELETED_AUTHOR: &str = "[deleted]";

/// Submission as delivered by a Reddit backend, placeholders resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub title: String,
    pub selftext: String,
    pub author: Option<String>,
    pub created_utc: f64,
    /// Top-level comments in API order.
    pub comments: Vec<SubmissionComment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionComment {
    pub body: String,
    /// Written by the submission's author.
    pub is_submitter: bool,
}

#[async_trait]
pub trait SubmissionSource: Send + Sync {
    async fn load_submission(&self, post_id: &PostIdentifier) -> Result<Submission, CoreError>;
}

/// Takes the first five top-level comments, then drops the submitter's.
/// Dropped slots are not refilled from later comments.
pub fn select_comments(comments: Vec<SubmissionComment>) -> Vec<String> {
    comments
        .into_iter()
        .take(MAX_COMMENTS)
        .filter(|comment| !comment.is_submitter)
        .map(|comment| comment.body)
        .collect()
}

impl From<Submission> for PostRecord {
    fn from(submission: Submission) -> Self {
        let author = submission
            .author
            .filter(|name| !name.is_empty() && name != REDDIT_DELETED_AUTHOR)
            .unwrap_or_else(|| DELETED_AUTHOR.to_string());
        let text = if submission.selftext.is_empty() {
            submission.title.clone()
        } else {
            submission.selftext
        };

        Self {
            title: submission.title,
            text,
            author,
            created_at: submission.created_utc,
            comments: select_comments(submission.comments),
        }
    }
}

/// Loads posts through a [`SubmissionSource`] with bounded retry.
#[derive(Clone)]
pub struct PostFetcher {
    source: Arc<dyn SubmissionSource>,
    retry: RetryConfig,
}

impl PostFetcher {
    pub fn new(source: Arc<dyn SubmissionSource>, retry: RetryConfig) -> Self {
        Self { source, retry }
    }

    pub async fn fetch(&self, post_id: &PostIdentifier) -> Result<PostRecord, FetchError> {
        info!("Fetching post: {}", post_id);
        let result = retry_with_fixed_delay("fetch_post", &self.retry, || {
            self.source.load_submission(post_id)
        })
        .await;

        match result {
            Ok(submission) => {
                let post = PostRecord::from(submission);
                info!(
                    "Successfully fetched post {} with {} comments",
                    post_id,
                    post.comments.len()
                );
                Ok(post)
            }
            Err(error) => {
                error!("Giving up on post {}", post_id);
                error.log_error();
                Err(FetchError::from(error))
            }
        }
    }
}
