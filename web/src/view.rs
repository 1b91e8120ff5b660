use threadmood_core::{ChartData, PostRecord, SentimentLabel};

/// Everything the page needs for one response.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    /// Initial load, nothing submitted.
    Empty,
    Error {
        post_url: String,
        message: String,
    },
    Analysis(Box<AnalysisView>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    pub post_url: String,
    pub post: PostRecord,
    pub sentiment: SentimentLabel,
    pub sentiment_score: f64,
    /// Aligned with `post.comments`.
    pub comment_sentiments: Vec<SentimentLabel>,
    pub chart_data: ChartData,
}

impl PageView {
    pub fn submitted_url(&self) -> &str {
        match self {
            PageView::Empty => "",
            PageView::Error { post_url, .. } => post_url,
            PageView::Analysis(analysis) => &analysis.post_url,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PageView::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}
