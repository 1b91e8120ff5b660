pub mod api;
pub mod fetcher;
pub mod retry;

#[cfg(test)]
mod tests;

use api::{http_client_builder, resolve_placeholders, RedditApiClient, SubmissionListing};
use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, ClientId, ClientSecret, HttpRequest, HttpResponse, RequestTokenError, Scope,
    TokenResponse, TokenUrl,
};
use std::time::{Duration, Instant};
use threadmood_core::{CoreError, PostIdentifier, RedditApiError, RedditCredentials};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

pub use fetcher::{select_comments, PostFetcher, Submission, SubmissionComment, SubmissionSource};
pub use retry::{retry_with_fixed_delay, RetryConfig};

const REDDIT_AUTH_URL: &str = "https://www.reddit.com/api/v1/authorize";
const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Tokens are refreshed this long before Reddit would reject them.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct AppToken {
    pub access_token: String,
    pub expires_at: Instant,
}

impl AppToken {
    pub fn is_fresh(&self, now: Instant) -> bool {
        now + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

/// Application-only Reddit client. Safe to share across requests; the
/// only mutable state is the cached bearer token.
pub struct RedditClient {
    oauth_client: BasicClient,
    /// Sends token requests with the configured user agent and timeout.
    token_http: reqwest::Client,
    api: RedditApiClient,
    token: RwLock<Option<AppToken>>,
}

impl RedditClient {
    pub fn new(credentials: &RedditCredentials) -> Result<Self, CoreError> {
        Self::with_token_url(credentials, REDDIT_TOKEN_URL)
    }

    pub(crate) fn with_token_url(
        credentials: &RedditCredentials,
        token_url: &str,
    ) -> Result<Self, CoreError> {
        let auth_url = AuthUrl::new(REDDIT_AUTH_URL.to_string()).map_err(|e| {
            CoreError::Internal {
                message: format!("Invalid auth URL: {}", e),
            }
        })?;
        let token_url = TokenUrl::new(token_url.to_string()).map_err(|e| {
            CoreError::Internal {
                message: format!("Invalid token URL: {}", e),
            }
        })?;

        let oauth_client = BasicClient::new(
            ClientId::new(credentials.client_id.clone()),
            Some(ClientSecret::new(credentials.client_secret.clone())),
            auth_url,
            Some(token_url),
        );
        let token_http = http_client_builder(&credentials.user_agent).build()?;
        let api = RedditApiClient::new(credentials.user_agent.clone())?;

        info!("Reddit client created for user agent {}", api.user_agent());
        Ok(Self {
            oauth_client,
            token_http,
            api,
            token: RwLock::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, CoreError> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.access_token.clone());
            }
        }

        let mut guard = self.token.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(token) = guard.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<AppToken, CoreError> {
        debug!("Requesting application-only access token");
        let response = self
            .oauth_client
            .exchange_client_credentials()
            .add_scope(Scope::new("read".to_string()))
            .request_async(|request| self.send_token_request(request))
            .await
            .map_err(|e| {
                error!("Token request failed: {}", e);
                match e {
                    RequestTokenError::ServerResponse(response) => {
                        CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                            reason: response.to_string(),
                        })
                    }
                    RequestTokenError::Request(e) if e.is_timeout() => {
                        CoreError::RedditApi(RedditApiError::RequestTimeout)
                    }
                    RequestTokenError::Request(e) => CoreError::Network(e),
                    other => CoreError::Internal {
                        message: format!("Token request failed: {}", other),
                    },
                }
            })?;

        let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
        info!("Obtained access token valid for {:?}", lifetime);
        Ok(AppToken {
            access_token: response.access_token().secret().clone(),
            expires_at: Instant::now() + lifetime,
        })
    }

    async fn send_token_request(&self, request: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
        let response = self
            .token_http
            .request(request.method, request.url.as_str())
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status_code = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse {
            status_code,
            headers,
            body,
        })
    }

    /// Loads a submission with every top-level placeholder resolved.
    pub async fn fetch_submission(&self, post_id: &PostIdentifier) -> Result<Submission, CoreError> {
        let access_token = self.access_token().await?;
        let (post_listing, comment_listing) =
            self.api.get_submission(&access_token, post_id).await?;

        let comments = resolve_placeholders(comment_listing.data.children, |children| {
            let access_token = access_token.clone();
            async move {
                self.api
                    .get_more_children(&access_token, post_id, &children)
                    .await
            }
        })
        .await?;

        build_submission(post_id, post_listing, comments)
    }
}

fn build_submission(
    post_id: &PostIdentifier,
    post_listing: SubmissionListing,
    comments: Vec<api::RedditCommentData>,
) -> Result<Submission, CoreError> {
    let post = post_listing
        .data
        .children
        .into_iter()
        .next()
        .map(|child| child.data)
        .ok_or_else(|| {
            CoreError::RedditApi(RedditApiError::PostNotFound {
                post_id: post_id.to_string(),
            })
        })?;

    Ok(Submission {
        title: post.title,
        selftext: post.selftext,
        author: post.author,
        created_utc: post.created_utc,
        comments: comments.into_iter().map(SubmissionComment::from).collect(),
    })
}

impl From<api::RedditCommentData> for SubmissionComment {
    fn from(comment: api::RedditCommentData) -> Self {
        Self {
            body: comment.body,
            is_submitter: comment.is_submitter,
        }
    }
}

#[async_trait]
impl SubmissionSource for RedditClient {
    async fn load_submission(&self, post_id: &PostIdentifier) -> Result<Submission, CoreError> {
        self.fetch_submission(post_id).await
    }
}
