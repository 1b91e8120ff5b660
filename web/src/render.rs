use crate::view::{AnalysisView, PageView};
use chrono::{DateTime, Utc};

const PAGE_TITLE: &str = "Reddit Sentiment Analyzer";
const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js";

pub fn render_page(view: &PageView) -> String {
    let mut body = render_form(view.submitted_url());

    if let Some(message) = view.error_message() {
        body.push_str(&format!(r#"<p class="error">{}</p>"#, html_escape(message)));
    }
    if let PageView::Analysis(analysis) = view {
        body.push_str(&render_analysis(analysis));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{chart_js}"></script>
</head>
<body>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = PAGE_TITLE,
        chart_js = CHART_JS_URL,
        body = body,
    )
}

fn render_form(post_url: &str) -> String {
    format!(
        r#"<form method="post" action="/">
<input type="url" name="post_url" placeholder="https://www.reddit.com/r/subreddit/comments/post_id/" value="{}" required>
<button type="submit">Analyze</button>
</form>
"#,
        html_attr_escape(post_url)
    )
}

fn render_analysis(analysis: &AnalysisView) -> String {
    let post = &analysis.post;
    let mut html = format!(
        r#"<section class="post">
<h2>{title}</h2>
<p class="meta">by {author} on {created}</p>
<p>{text}</p>
<p>Sentiment: <strong>{label}</strong> (score: {score:.2})</p>
</section>
"#,
        title = html_escape(&post.title),
        author = html_escape(&post.author),
        created = format_timestamp(post.created_at),
        text = html_escape(&post.text),
        label = analysis.sentiment,
        score = analysis.sentiment_score,
    );

    html.push_str("<section class=\"comments\">\n<h3>Top comments</h3>\n<ul>\n");
    let rows = post.comments.len().max(analysis.comment_sentiments.len());
    for index in 0..rows {
        let comment = post.comments.get(index).map(String::as_str).unwrap_or("");
        let label = analysis
            .comment_sentiments
            .get(index)
            .map(|label| label.as_str())
            .unwrap_or("");
        html.push_str(&format!(
            "<li>{} <em>({})</em></li>\n",
            html_escape(comment),
            label
        ));
    }
    html.push_str("</ul>\n</section>\n");

    let chart_json = serde_json::to_string(&analysis.chart_data)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");
    html.push_str(&format!(
        r#"<canvas id="sentimentChart" width="400" height="400"></canvas>
<script>
const chartData = {chart_json};
new Chart(document.getElementById("sentimentChart"), {{
  type: "doughnut",
  data: {{ labels: chartData.labels, datasets: [{{ data: chartData.data }}] }}
}});
</script>
"#
    ));

    html
}

/// UTC `YYYY-MM-DD HH:MM:SS`, empty for out-of-range timestamps.
pub fn format_timestamp(value: f64) -> String {
    DateTime::<Utc>::from_timestamp(value as i64, 0)
        .map(|datetime| datetime.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn html_attr_escape(s: &str) -> String {
    html_escape(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadmood_core::{ChartData, PostRecord, SentimentLabel};

    fn analysis() -> AnalysisView {
        let comment_sentiments = vec![SentimentLabel::Positive, SentimentLabel::Negative];
        AnalysisView {
            post_url: "https://www.reddit.com/r/rust/comments/abc/".to_string(),
            post: PostRecord {
                title: "Hello <world>".to_string(),
                text: "Body & soul".to_string(),
                author: "alice".to_string(),
                created_at: 1640995200.0,
                comments: vec!["nice".to_string(), "</script>bad".to_string()],
            },
            sentiment: SentimentLabel::Positive,
            sentiment_score: 0.6,
            chart_data: ChartData::aggregate(SentimentLabel::Positive, &comment_sentiments),
            comment_sentiments,
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1640995200.0), "2022-01-01 00:00:00");
        assert_eq!(format_timestamp(1640995200.9), "2022-01-01 00:00:00");
    }

    #[test]
    fn test_empty_page_has_form() {
        let html = render_page(&PageView::Empty);
        assert!(html.contains(r#"name="post_url""#));
        assert!(!html.contains("class=\"error\""));
        assert!(!html.contains("sentimentChart"));
    }

    #[test]
    fn test_error_page_shows_message_and_url() {
        let html = render_page(&PageView::Error {
            post_url: "not-a-url\"".to_string(),
            message: "Invalid Reddit URL format. Use: ...".to_string(),
        });
        assert!(html.contains("Invalid Reddit URL format."));
        assert!(html.contains(r#"value="not-a-url&quot;""#));
    }

    #[test]
    fn test_analysis_page_escapes_user_content() {
        let html = render_page(&PageView::Analysis(Box::new(analysis())));
        assert!(html.contains("Hello &lt;world&gt;"));
        assert!(html.contains("Body &amp; soul"));
        assert!(html.contains("&lt;/script&gt;bad <em>(Negative)</em>"));
        assert!(html.contains("score: 0.60"));
        assert!(html.contains("2022-01-01 00:00:00"));
        assert!(html.contains(r#""labels":["Positive","Negative","Neutral"],"data":[2,1,0]"#));
    }
}
