use crate::render::render_page;
use crate::state::AppState;
use crate::view::{AnalysisView, PageView};
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use threadmood_core::{parse_post_url, ChartData, SentimentLabel};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub post_url: String,
}

pub async fn index() -> Html<String> {
    Html(render_page(&PageView::Empty))
}

/// An unreadable form body is treated like an empty submission so the
/// error still renders on the page.
pub async fn analyze(
    State(state): State<AppState>,
    form: Result<Form<AnalyzeForm>, FormRejection>,
) -> Html<String> {
    let post_url = match form {
        Ok(Form(form)) => form.post_url,
        Err(rejection) => {
            warn!("Unreadable form submission: {}", rejection);
            String::new()
        }
    };
    info!("Processing POST request for: {}", post_url);
    let view = analyze_post(&state, &post_url).await;
    Html(render_page(&view))
}

/// Validates, fetches and scores one submitted post.
pub async fn analyze_post(state: &AppState, post_url: &str) -> PageView {
    let post_id = match parse_post_url(post_url) {
        Ok(post_id) => post_id,
        Err(e) => {
            return PageView::Error {
                post_url: post_url.to_string(),
                message: e.to_string(),
            }
        }
    };

    let post = match state.fetcher().fetch(&post_id).await {
        Ok(post) => post,
        Err(e) => {
            warn!("Error fetching post: {}", e);
            return PageView::Error {
                post_url: post_url.to_string(),
                message: e.to_string(),
            };
        }
    };

    let classifier = state.classifier();
    let post_sentiment = classifier.classify(&post.scoring_text());
    let comment_sentiments: Vec<SentimentLabel> = post
        .comments
        .iter()
        .map(|comment| classifier.classify(comment).label)
        .collect();
    let chart_data = ChartData::aggregate(post_sentiment.label, &comment_sentiments);

    info!(
        "Post sentiment: {}, Comment sentiments: {:?}",
        post_sentiment.label, comment_sentiments
    );

    PageView::Analysis(Box::new(AnalysisView {
        post_url: post_url.to_string(),
        post,
        sentiment: post_sentiment.label,
        sentiment_score: post_sentiment.score,
        comment_sentiments,
        chart_data,
    }))
}
