// Chart and table view models

/// Closed set of supported chart kinds. Adding a kind forces every render
/// binding to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Area,
    Pie,
    Donut,
    Radar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Area,
        ChartKind::Pie,
        ChartKind::Donut,
        ChartKind::Radar,
    ];

    /// Pie and donut bind values as a flat magnitude list rather than an
    /// xy series.
    pub fn is_circular(&self) -> bool {
        matches!(self, ChartKind::Pie | ChartKind::Donut)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Pie => "pie",
            ChartKind::Donut => "donut",
            ChartKind::Radar => "radar",
        }
    }

    pub fn from_label(label: &str) -> Option<ChartKind> {
        Self::ALL.into_iter().find(|k| k.label().eq_ignore_ascii_case(label))
    }
}

/// One named value series over the shared category axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesModel {
    pub name: String,
    pub values: Vec<f64>,
}

/// Derived chart model, one variant per binding shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartModel {
    /// Bar, line, area and radar: categories on one axis, one or more
    /// named series on the other.
    Cartesian {
        kind: ChartKind,
        categories: Vec<String>,
        series: Vec<SeriesModel>,
    },
    /// Pie and donut: raw magnitudes with labels attached separately.
    Circular {
        kind: ChartKind,
        labels: Vec<String>,
        magnitudes: Vec<f64>,
    },
}

/// Tabular view of the visible rows: fixed two-column layout of category
/// against the selected metric, values verbatim from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub category_header: String,
    pub metric_header: String,
    pub rows: Vec<(String, String)>,
}
