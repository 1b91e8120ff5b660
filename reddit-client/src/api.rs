use reqwest::{redirect, Client, ClientBuilder, Response, StatusCode};
use serde::Deserialize;
use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;
use threadmood_core::{CoreError, PostIdentifier, RedditApiError};
use tracing::{debug, error, info, warn};

const REDDIT_API_BASE: &str = "https://oauth.reddit.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `/api/morechildren` accepts at most this many ids per call.
const MORE_CHILDREN_BATCH: usize = 100;

/// Bound on placeholder expansions while walking one comment listing.
pub const MAX_PLACEHOLDER_EXPANSIONS: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListing<T> {
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingChild<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditSubmissionData {
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    /// `None` or `"[deleted]"` once the account is gone.
    #[serde(default)]
    pub author: Option<String>,
    pub created_utc: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditCommentData {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_submitter: bool,
    #[serde(default)]
    pub parent_id: String,
}

/// "Load more comments" placeholder.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditMoreData {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CommentThing {
    #[serde(rename = "t1")]
    Comment(RedditCommentData),
    #[serde(rename = "more")]
    More(RedditMoreData),
}

impl CommentThing {
    fn parent_id(&self) -> &str {
        match self {
            CommentThing::Comment(comment) => &comment.parent_id,
            CommentThing::More(more) => &more.parent_id,
        }
    }
}

pub type SubmissionListing = RedditListing<RedditListingChild<RedditSubmissionData>>;
pub type CommentListing = RedditListing<CommentThing>;

#[derive(Debug, Deserialize)]
struct MoreChildrenResponse {
    json: MoreChildrenJson,
}

#[derive(Debug, Deserialize)]
struct MoreChildrenJson {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
    #[serde(default)]
    data: Option<MoreChildrenData>,
}

#[derive(Debug, Deserialize)]
struct MoreChildrenData {
    #[serde(default)]
    things: Vec<CommentThing>,
}

pub fn link_fullname(post_id: &PostIdentifier) -> String {
    format!("t3_{}", post_id)
}

/// Comma-joined id lists, each small enough for one `/api/morechildren` call.
pub fn more_children_batches(children: &[String]) -> Vec<String> {
    children
        .chunks(MORE_CHILDREN_BATCH)
        .map(|batch| batch.join(","))
        .collect()
}

/// Keeps only things replying directly to the submission. `/api/morechildren`
/// also returns nested replies, which are not top-level comments.
pub fn top_level_things(things: Vec<CommentThing>, link_id: &str) -> Vec<CommentThing> {
    things
        .into_iter()
        .filter(|thing| thing.parent_id() == link_id)
        .collect()
}

/// Client settings shared by API and token requests.
pub(crate) fn http_client_builder(user_agent: &str) -> ClientBuilder {
    Client::builder()
        .user_agent(user_agent)
        .timeout(REQUEST_TIMEOUT)
        .redirect(redirect::Policy::none())
}

#[derive(Debug)]
pub struct RedditApiClient {
    http_client: Client,
    user_agent: String,
}

impl RedditApiClient {
    pub fn new(user_agent: String) -> Result<Self, CoreError> {
        let http_client = http_client_builder(&user_agent).build()?;

        Ok(Self {
            http_client,
            user_agent,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub async fn make_request(
        &self,
        endpoint: &str,
        access_token: &str,
        query_params: &[(&str, &str)],
        post_id: &PostIdentifier,
    ) -> Result<Response, CoreError> {
        let url = format!("{}{}", REDDIT_API_BASE, endpoint);

        info!("Making Reddit API request: GET {}", endpoint);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .query(query_params)
            .send()
            .await
            .map_err(|e| {
                error!("Network error for GET {}: {}", endpoint, e);
                if e.is_timeout() {
                    CoreError::RedditApi(RedditApiError::RequestTimeout)
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            debug!("Request successful: {} {}", status, endpoint);
            return Ok(response);
        }

        error!("Request failed with status: {} for {}", status, endpoint);
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());
        Err(CoreError::RedditApi(status_error(
            status,
            endpoint,
            post_id,
            retry_after,
        )))
    }

    /// Loads a submission and its top-level comment listing.
    pub async fn get_submission(
        &self,
        access_token: &str,
        post_id: &PostIdentifier,
    ) -> Result<(SubmissionListing, CommentListing), CoreError> {
        let endpoint = format!("/comments/{}", post_id);
        let response = self
            .make_request(
                &endpoint,
                access_token,
                &[("raw_json", "1"), ("depth", "1")],
                post_id,
            )
            .await?;

        let listings: (SubmissionListing, CommentListing) = response.json().await.map_err(|e| {
            error!("Failed to parse submission {}: {}", post_id, e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse submission {}", post_id),
            })
        })?;

        debug!(
            "Retrieved submission {} with {} top-level entries",
            post_id,
            listings.1.data.children.len()
        );
        Ok(listings)
    }

    /// Expands placeholder ids into the top-level things they stand for.
    pub async fn get_more_children(
        &self,
        access_token: &str,
        post_id: &PostIdentifier,
        children: &[String],
    ) -> Result<Vec<CommentThing>, CoreError> {
        let link_id = link_fullname(post_id);
        let mut things = Vec::with_capacity(children.len());

        for ids in more_children_batches(children) {
            let response = self
                .make_request(
                    "/api/morechildren",
                    access_token,
                    &[
                        ("api_type", "json"),
                        ("link_id", link_id.as_str()),
                        ("children", ids.as_str()),
                        ("limit_children", "false"),
                        ("raw_json", "1"),
                    ],
                    post_id,
                )
                .await?;

            let body: MoreChildrenResponse = response.json().await.map_err(|e| {
                error!("Failed to parse more children for {}: {}", post_id, e);
                CoreError::RedditApi(RedditApiError::InvalidResponse {
                    details: format!("Failed to parse more comments for {}", post_id),
                })
            })?;

            if !body.json.errors.is_empty() {
                return Err(CoreError::RedditApi(RedditApiError::InvalidResponse {
                    details: format!("morechildren errors: {:?}", body.json.errors),
                }));
            }

            let batch = body.json.data.map(|data| data.things).unwrap_or_default();
            things.extend(top_level_things(batch, &link_id));
        }

        debug!("Expanded {} placeholder ids into {} things", children.len(), things.len());
        Ok(things)
    }
}

fn status_error(
    status: StatusCode,
    endpoint: &str,
    post_id: &PostIdentifier,
    retry_after: Option<u64>,
) -> RedditApiError {
    match status.as_u16() {
        401 => RedditApiError::InvalidToken,
        403 => RedditApiError::Forbidden {
            resource: endpoint.to_string(),
        },
        404 => RedditApiError::PostNotFound {
            post_id: post_id.to_string(),
        },
        429 => {
            let retry_after = retry_after.unwrap_or(60);
            warn!("Rate limited, retry after {} seconds", retry_after);
            RedditApiError::RateLimitExceeded { retry_after }
        }
        code if status.is_server_error() => RedditApiError::ServerError { status_code: code },
        code => RedditApiError::InvalidResponse {
            details: format!("Unexpected status {} for {}", code, endpoint),
        },
    }
}

/// Walks a top-level listing in order, splicing each placeholder's
/// expansion in its place. Empty placeholders are dropped.
pub async fn resolve_placeholders<F, Fut>(
    things: Vec<CommentThing>,
    mut expand: F,
) -> Result<Vec<RedditCommentData>, CoreError>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<CommentThing>, CoreError>>,
{
    let mut pending: VecDeque<CommentThing> = things.into();
    let mut resolved = Vec::with_capacity(pending.len());
    let mut expansions = 0;

    while let Some(thing) = pending.pop_front() {
        match thing {
            CommentThing::Comment(comment) => resolved.push(comment),
            CommentThing::More(more) if more.children.is_empty() => {
                debug!("Dropping empty placeholder under {}", more.parent_id);
            }
            CommentThing::More(more) => {
                if expansions >= MAX_PLACEHOLDER_EXPANSIONS {
                    warn!(
                        "Stopped expanding placeholders after {} requests, {} comments unresolved",
                        expansions, more.count
                    );
                    continue;
                }
                expansions += 1;

                let expanded = expand(more.children).await?;
                for thing in expanded.into_iter().rev() {
                    pending.push_front(thing);
                }
            }
        }
    }

    Ok(resolved)
}
