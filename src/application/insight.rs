// Insight service - AI summary of the visible rows

use crate::application::market_repository::{FilterSnapshot, MarketRepository};
use crate::domain::filters::FilterState;
use crate::domain::market::DataRow;
use std::sync::Arc;

pub const EMPTY_PLACEHOLDER: &str = "Select data to generate insights.";
pub const FAILURE_TEXT: &str = "Could not generate insight at this time.";

/// Rows quoted in the summary sent to the insight endpoint.
const SUMMARY_ROWS: usize = 5;

#[derive(Clone)]
pub struct InsightService {
    repository: Arc<dyn MarketRepository>,
}

impl InsightService {
    pub fn new(repository: Arc<dyn MarketRepository>) -> Self {
        Self { repository }
    }

    /// Produce the insight text for the current rows and metric. An empty
    /// row set short-circuits to the placeholder without touching the
    /// endpoint.
    pub async fn refresh(&self, rows: &[DataRow], metric: &str, filters: &FilterState) -> String {
        if rows.is_empty() {
            return EMPTY_PLACEHOLDER.to_string();
        }

        let summary = summarize(rows, metric);
        match self
            .repository
            .ai_insight(&FilterSnapshot::from_filters(filters), &summary)
            .await
        {
            Ok(insight) => insight,
            Err(e) => {
                tracing::warn!("insight generation failed: {}", e);
                FAILURE_TEXT.to_string()
            }
        }
    }
}

/// Fixed-format digest: the first few rows as "category: value" pairs plus
/// the total count.
fn summarize(rows: &[DataRow], metric: &str) -> String {
    let head = rows
        .iter()
        .take(SUMMARY_ROWS)
        .map(|row| format!("{}: {}", row.category(), row.display(metric)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Top 5 for {}: {}... (Total rows: {})", metric, head, rows.len())
}
