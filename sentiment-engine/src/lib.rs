use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use threadmood_core::{SentimentError, SentimentLabel, SentimentResult};
use tracing::{debug, error};
use vader_sentiment::SentimentIntensityAnalyzer;

/// Scores above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Scores below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Characters of scored text included in debug logs.
const LOG_PREVIEW_CHARS: usize = 50;

pub trait PolarityScorer: Send + Sync {
    /// Compound polarity of `text` in [-1, 1].
    fn compound(&self, text: &str) -> Result<f64, SentimentError>;
}

/// VADER lexicon and rule based scorer.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for VaderScorer {
    fn compound(&self, text: &str) -> Result<f64, SentimentError> {
        let scores = panic::catch_unwind(AssertUnwindSafe(|| self.analyzer.polarity_scores(text)))
            .map_err(|payload| SentimentError::ScorerFailed {
                reason: panic_reason(payload.as_ref()),
            })?;
        debug!("Sentiment scores: {:?}", scores);

        let compound = *scores
            .get("compound")
            .ok_or(SentimentError::MissingCompound)?;
        if !compound.is_finite() {
            return Err(SentimentError::NonFiniteScore { score: compound });
        }
        Ok(compound)
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "scorer panicked".to_string()
    }
}

/// Maps a compound score onto the three labels. Both thresholds are
/// exclusive, so ±0.05 is neutral.
pub fn label_for_score(score: f64) -> SentimentLabel {
    if score > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

#[derive(Clone)]
pub struct SentimentClassifier {
    scorer: Arc<dyn PolarityScorer>,
}

impl SentimentClassifier {
    pub fn new(scorer: Arc<dyn PolarityScorer>) -> Self {
        Self { scorer }
    }

    pub fn vader() -> Self {
        Self::new(Arc::new(VaderScorer::new()))
    }

    /// Never fails: scorer errors are logged and degrade to neutral.
    pub fn classify(&self, text: &str) -> SentimentResult {
        match self.scorer.compound(text) {
            Ok(score) => {
                debug!("Sentiment {:.4} for '{}...'", score, preview(text));
                SentimentResult {
                    label: label_for_score(score),
                    score,
                }
            }
            Err(e) => {
                error!("Sentiment analysis error: {}", e);
                SentimentResult::neutral()
            }
        }
    }
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
