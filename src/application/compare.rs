// District comparison - two-entity normalized scorecard and radar series

use crate::domain::market::DataRow;

/// Fixed comparison axes with per-metric normalization ceilings.
pub struct CompareMetric {
    pub label: &'static str,
    pub key: &'static str,
    pub max: f64,
}

pub const COMPARE_METRICS: [CompareMetric; 3] = [
    CompareMetric { label: "Rent Price", key: "Avg_Rent_Sqm_EGP", max: 5000.0 },
    CompareMetric { label: "Foot Traffic", key: "Foot_Traffic_Score", max: 10.0 },
    CompareMetric { label: "Competitors", key: "Competitor_Density", max: 10.0 },
];

/// Ordinal mapping for the categorical density field.
fn density_ordinal(label: &str) -> f64 {
    match label {
        "Very High" => 10.0,
        "High" => 8.0,
        "Medium" => 5.0,
        _ => 2.0,
    }
}

/// Raw numeric value of a comparison metric for one row. Density maps
/// through its ordinal table; anything else that fails to coerce reads as
/// zero.
pub fn metric_value(row: &DataRow, key: &str) -> f64 {
    if let Some(value) = row.numeric(key) {
        return value;
    }
    if key == "Competitor_Density" {
        if let Some(serde_json::Value::String(label)) = row.field(key) {
            return density_ordinal(label);
        }
        return density_ordinal("");
    }
    0.0
}

/// Normalize a raw value to a 0-100 score against the metric ceiling.
fn normalize(raw: f64, max: f64) -> u32 {
    ((raw / max) * 100.0).round().min(100.0).max(0.0) as u32
}

/// One scorecard line: raw values side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorecardRow {
    pub label: &'static str,
    pub baseline: f64,
    pub target: f64,
}

/// Derived side-by-side view for two districts over the fixed metric axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub baseline: String,
    pub target: String,
    pub axes: Vec<&'static str>,
    /// Normalized 0-100 scores, one per axis.
    pub baseline_scores: Vec<u32>,
    pub target_scores: Vec<u32>,
    pub scorecard: Vec<ScorecardRow>,
}

/// Build the comparison for two selected categories. Absent districts
/// score from an empty record, matching the dashboard's behavior when a
/// selector points at a district not in the current row set.
pub fn compare(rows: &[DataRow], baseline: &str, target: &str) -> Comparison {
    let empty = DataRow::new(serde_json::Map::new());
    let row_a = rows.iter().find(|r| r.category() == baseline).unwrap_or(&empty);
    let row_b = rows.iter().find(|r| r.category() == target).unwrap_or(&empty);

    let mut baseline_scores = Vec::with_capacity(COMPARE_METRICS.len());
    let mut target_scores = Vec::with_capacity(COMPARE_METRICS.len());
    let mut scorecard = Vec::with_capacity(COMPARE_METRICS.len());

    for metric in &COMPARE_METRICS {
        let raw_a = metric_value(row_a, metric.key);
        let raw_b = metric_value(row_b, metric.key);
        baseline_scores.push(normalize(raw_a, metric.max));
        target_scores.push(normalize(raw_b, metric.max));
        scorecard.push(ScorecardRow { label: metric.label, baseline: raw_a, target: raw_b });
    }

    Comparison {
        baseline: baseline.to_string(),
        target: target.to_string(),
        axes: COMPARE_METRICS.iter().map(|m| m.label).collect(),
        baseline_scores,
        target_scores,
        scorecard,
    }
}

/// Default selection: the first two available categories.
pub fn default_pair(rows: &[DataRow]) -> (String, String) {
    let first = rows.first().map(DataRow::category).unwrap_or_default();
    let second = rows.get(1).map(DataRow::category).unwrap_or_default();
    (first, second)
}
