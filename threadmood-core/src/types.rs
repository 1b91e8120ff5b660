use serde::Serialize;
use std::fmt;

/// Author shown when the submission's account no longer exists.
pub const DELETED_AUTHOR: &str = "Deleted";

/// Upper bound on the comments considered per post.
pub const MAX_COMMENTS: usize = 5;

/// Base-36 id of a Reddit submission, as captured from its URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostIdentifier(String);

impl PostIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub title: String,
    /// Self-text, or the title for link posts.
    pub text: String,
    pub author: String,
    pub created_at: f64,
    pub comments: Vec<String>,
}

impl PostRecord {
    /// Text the post itself is scored on.
    pub fn scoring_text(&self) -> String {
        format!("{} {}", self.title, self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Fixed presentation order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Compound polarity in [-1, 1].
    pub score: f64,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub labels: [SentimentLabel; 3],
    #[serde(rename = "data")]
    pub counts: [u32; 3],
}

impl ChartData {
    /// Counts the post label once plus every comment label, in
    /// `SentimentLabel::ALL` order.
    pub fn aggregate(post_label: SentimentLabel, comment_labels: &[SentimentLabel]) -> Self {
        let mut counts = [0u32; 3];
        for label in std::iter::once(&post_label).chain(comment_labels) {
            let slot = SentimentLabel::ALL
                .iter()
                .position(|candidate| candidate == label)
                .unwrap_or_default();
            counts[slot] += 1;
        }

        Self {
            labels: SentimentLabel::ALL,
            counts,
        }
    }

    pub fn count(&self, label: SentimentLabel) -> u32 {
        self.labels
            .iter()
            .zip(self.counts)
            .find(|(candidate, _)| **candidate == label)
            .map(|(_, count)| count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}
