#[cfg(test)]
mod tests {
    use crate::api::{CommentListing, CommentThing, SubmissionListing};
    use crate::{
        build_submission, AppToken, PostFetcher, RedditClient, RetryConfig, Submission,
        SubmissionComment, SubmissionSource,
    };
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use threadmood_core::{CoreError, PostIdentifier, RedditApiError, RedditCredentials};

    fn create_test_credentials() -> RedditCredentials {
        RedditCredentials {
            client_id: "test_client_id".to_string(),
            client_secret: "test_client_secret".to_string(),
            user_agent: "threadmood/0.1 by test_user".to_string(),
        }
    }

    const THREAD_JSON: &str = r#"[
        {"kind": "Listing", "data": {"children": [
            {"kind": "t3", "data": {
                "id": "abc123", "title": "Rust 2024 is out", "selftext": "",
                "author": "op_user", "created_utc": 1640995200.0, "subreddit": "rust"
            }}
        ]}},
        {"kind": "Listing", "data": {"children": [
            {"kind": "t1", "data": {"id": "c1", "author": "a", "body": "Great news",
                "is_submitter": false, "parent_id": "t3_abc123"}},
            {"kind": "t1", "data": {"id": "c2", "author": "op_user", "body": "Thanks!",
                "is_submitter": true, "parent_id": "t3_abc123"}},
            {"kind": "t1", "data": {"id": "c3", "author": "b", "body": "Meh",
                "is_submitter": false, "parent_id": "t3_abc123"}}
        ]}}
    ]"#;

    #[test]
    fn test_client_creation() {
        let client = RedditClient::new(&create_test_credentials());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_client_starts_without_token() {
        let client = RedditClient::new(&create_test_credentials()).unwrap();
        assert!(client.token.read().await.is_none());
    }

    /// Answers one token request and hands back what the client sent.
    async fn serve_one_token(listener: TcpListener) -> String {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            received.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&received).to_lowercase();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if received.len() >= header_end + 4 + content_length || n == 0 {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        let body = r#"{"access_token":"local_token","token_type":"bearer","expires_in":3600,"scope":"read"}"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        String::from_utf8_lossy(&received).to_string()
    }

    #[tokio::test]
    async fn test_token_request_sends_user_agent_and_caches() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let token_url = format!("http://{}/api/v1/access_token", listener.local_addr().unwrap());
        let server = tokio::spawn(serve_one_token(listener));

        let client = RedditClient::with_token_url(&create_test_credentials(), &token_url).unwrap();
        let token = client.access_token().await.unwrap();
        assert_eq!(token, "local_token");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("post /api/v1/access_token"));
        assert!(request.contains("user-agent: threadmood/0.1 by test_user"));
        assert!(request.contains("grant_type=client_credentials"));

        // The listener is gone; a second network call would fail.
        assert_eq!(client.access_token().await.unwrap(), "local_token");
    }

    #[test]
    fn test_token_freshness() {
        let now = Instant::now();
        let fresh = AppToken {
            access_token: "valid_token".to_string(),
            expires_at: now + Duration::from_secs(3600),
        };
        let expiring = AppToken {
            access_token: "expiring_token".to_string(),
            expires_at: now + Duration::from_secs(30),
        };

        assert!(fresh.is_fresh(now));
        assert!(!expiring.is_fresh(now));
    }

    #[test]
    fn test_build_submission_from_thread() {
        let (post, comments): (SubmissionListing, CommentListing) =
            serde_json::from_str(THREAD_JSON).unwrap();
        let comments = comments
            .data
            .children
            .into_iter()
            .filter_map(|thing| match thing {
                CommentThing::Comment(comment) => Some(comment),
                CommentThing::More(_) => None,
            })
            .collect();

        let submission = build_submission(&PostIdentifier::new("abc123"), post, comments).unwrap();

        assert_eq!(submission.title, "Rust 2024 is out");
        assert_eq!(submission.author.as_deref(), Some("op_user"));
        assert_eq!(submission.comments.len(), 3);
        assert!(submission.comments[1].is_submitter);
    }

    #[test]
    fn test_build_submission_requires_post() {
        let empty: SubmissionListing =
            serde_json::from_str(r#"{"kind": "Listing", "data": {"children": []}}"#).unwrap();
        let result = build_submission(&PostIdentifier::new("gone"), empty, Vec::new());
        match result {
            Err(CoreError::RedditApi(RedditApiError::PostNotFound { post_id })) => {
                assert_eq!(post_id, "gone");
            }
            other => panic!("Expected PostNotFound, got {:?}", other),
        }
    }

    struct StaticSource(Submission);

    #[async_trait]
    impl SubmissionSource for StaticSource {
        async fn load_submission(&self, _post_id: &PostIdentifier) -> Result<Submission, CoreError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_fetcher_builds_post_record() {
        let (post, comments): (SubmissionListing, CommentListing) =
            serde_json::from_str(THREAD_JSON).unwrap();
        let comments = comments
            .data
            .children
            .into_iter()
            .filter_map(|thing| match thing {
                CommentThing::Comment(comment) => Some(comment),
                CommentThing::More(_) => None,
            })
            .collect();
        let submission = build_submission(&PostIdentifier::new("abc123"), post, comments).unwrap();

        let fetcher = PostFetcher::new(Arc::new(StaticSource(submission)), RetryConfig::reddit());
        let record = fetcher.fetch(&PostIdentifier::new("abc123")).await.unwrap();

        assert_eq!(record.text, "Rust 2024 is out");
        assert_eq!(record.author, "op_user");
        assert_eq!(record.comments, vec!["Great news", "Meh"]);
    }

    #[test]
    fn test_comment_conversion() {
        let json = r#"{"kind": "t1", "data": {"id": "c9", "body": "hello", "is_submitter": true}}"#;
        let thing: CommentThing = serde_json::from_str(json).unwrap();
        let CommentThing::Comment(data) = thing else {
            panic!("Expected comment");
        };
        assert_eq!(
            SubmissionComment::from(data),
            SubmissionComment {
                body: "hello".to_string(),
                is_submitter: true,
            }
        );
    }
}
