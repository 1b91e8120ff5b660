use reddit_client::PostFetcher;
use sentiment_engine::SentimentClassifier;

/// Process-wide collaborators, shared read-only by every request.
#[derive(Clone)]
pub struct AppState {
    fetcher: PostFetcher,
    classifier: SentimentClassifier,
}

impl AppState {
    pub fn new(fetcher: PostFetcher, classifier: SentimentClassifier) -> Self {
        Self {
            fetcher,
            classifier,
        }
    }

    pub fn fetcher(&self) -> &PostFetcher {
        &self.fetcher
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }
}
