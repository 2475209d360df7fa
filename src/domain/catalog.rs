// Metric and industry catalog

use serde::Deserialize;

/// Aggregate economy-wide series keyed by year rather than district.
pub const MACRO_METRICS: [&str; 4] = [
    "manufacturing_gdp",
    "agriculture_gdp",
    "services_gdp",
    "exports_gdp",
];

pub fn is_macro_metric(metric: &str) -> bool {
    MACRO_METRICS.contains(&metric)
}

/// Human-readable label for a metric key: "Avg_Rent_Sqm_EGP" -> "Avg Rent Sqm EGP".
pub fn metric_label(metric: &str) -> String {
    metric.replace('_', " ")
}

/// Category column header for a metric: macro series are keyed by year.
pub fn category_label(metric: &str) -> &'static str {
    if metric.ends_with("_gdp") { "Year" } else { "District" }
}

/// The filter controls the context bar can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    TimePeriod,
    Districts,
    Density,
    Traffic,
    RentRange,
}

const ALL_CONTROLS: [ControlKind; 5] = [
    ControlKind::TimePeriod,
    ControlKind::Districts,
    ControlKind::Density,
    ControlKind::Traffic,
    ControlKind::RentRange,
];

// Foot traffic and competitor density are street-level retail signals;
// they carry little meaning for property or office-heavy industries.
const REAL_ESTATE_CONTROLS: [ControlKind; 3] = [
    ControlKind::TimePeriod,
    ControlKind::Districts,
    ControlKind::RentRange,
];

const GENERAL_CONTROLS: [ControlKind; 3] = [
    ControlKind::TimePeriod,
    ControlKind::Districts,
    ControlKind::Density,
];

/// Controls applicable to an industry. Unknown industries fall back to the
/// General entry.
pub fn controls_for_industry(industry: &str) -> &'static [ControlKind] {
    match industry {
        "Retail" | "F&B" => &ALL_CONTROLS,
        "Real Estate" => &REAL_ESTATE_CONTROLS,
        _ => &GENERAL_CONTROLS,
    }
}

pub fn industry_offers(industry: &str, control: ControlKind) -> bool {
    controls_for_industry(industry).contains(&control)
}

/// Onboarding choices; the backend accepts free text but these are the
/// advertised options.
pub const INDUSTRIES: [&str; 5] = ["Real Estate", "Retail", "F&B", "Technology", "General"];

/// A leaf metric in the hierarchy tree.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MetricNode {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    /// Industries this metric is relevant to; empty means universal.
    #[serde(default)]
    pub industries: Vec<String>,
}

/// A sector grouping in the hierarchy tree.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SectorNode {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub items: Vec<MetricNode>,
}

/// Filter the hierarchy by a case-insensitive search query. A sector whose
/// name matches keeps all its items; otherwise it survives only with the
/// items that match, and empty sectors drop out. An empty query returns the
/// tree unchanged.
pub fn filter_tree(nodes: &[SectorNode], query: &str) -> Vec<SectorNode> {
    if query.is_empty() {
        return nodes.to_vec();
    }
    let needle = query.to_lowercase();

    nodes
        .iter()
        .filter_map(|sector| {
            if sector.name.to_lowercase().contains(&needle) {
                return Some(sector.clone());
            }
            let items: Vec<MetricNode> = sector
                .items
                .iter()
                .filter(|item| {
                    item.name.to_lowercase().contains(&needle)
                        || item.label.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(SectorNode {
                    name: sector.name.clone(),
                    icon: sector.icon.clone(),
                    items,
                })
            }
        })
        .collect()
}
