// Chart and table derivation from the shared row set

use crate::domain::catalog::{category_label, metric_label};
use crate::domain::chart::{ChartKind, ChartModel, SeriesModel, TableModel};
use crate::domain::market::DataRow;

/// Derive a chart model for the selected metric. Switching kinds is pure
/// re-derivation over resident data; nothing is fetched.
pub fn build_chart(rows: &[DataRow], metric: &str, kind: ChartKind) -> ChartModel {
    if kind.is_circular() {
        // Rows whose value does not coerce are omitted, keeping labels and
        // magnitudes aligned.
        let mut labels = Vec::new();
        let mut magnitudes = Vec::new();
        for row in rows {
            if let Some(value) = row.numeric(metric) {
                labels.push(row.category());
                magnitudes.push(value);
            }
        }
        ChartModel::Circular { kind, labels, magnitudes }
    } else {
        // Cartesian kinds keep every category; a value that does not
        // coerce plots as zero.
        let categories = rows.iter().map(DataRow::category).collect();
        let values = rows.iter().map(|r| r.numeric(metric).unwrap_or(0.0)).collect();
        ChartModel::Cartesian {
            kind,
            categories,
            series: vec![SeriesModel { name: metric_label(metric), values }],
        }
    }
}

/// Derive the tabular view: category against the metric's raw value.
pub fn build_table(rows: &[DataRow], metric: &str) -> TableModel {
    TableModel {
        category_header: category_label(metric).to_string(),
        metric_header: metric_label(metric),
        rows: rows
            .iter()
            .map(|r| (r.category(), r.display(metric)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<DataRow> {
        ["Maadi", "Zamalek", "Nasr City"]
            .iter()
            .zip([json!(2000), json!("4500"), json!("n/a")])
            .map(|(district, rent)| {
                let mut fields = serde_json::Map::new();
                fields.insert("District".to_string(), json!(district));
                fields.insert("Avg_Rent_Sqm_EGP".to_string(), rent);
                DataRow::new(fields)
            })
            .collect()
    }

    #[test]
    fn test_cartesian_binds_single_named_series() {
        let model = build_chart(&rows(), "Avg_Rent_Sqm_EGP", ChartKind::Bar);
        match model {
            ChartModel::Cartesian { kind, categories, series } => {
                assert_eq!(kind, ChartKind::Bar);
                assert_eq!(categories, vec!["Maadi", "Zamalek", "Nasr City"]);
                assert_eq!(series.len(), 1);
                assert_eq!(series[0].name, "Avg Rent Sqm EGP");
                assert_eq!(series[0].values, vec![2000.0, 4500.0, 0.0]);
            }
            other => panic!("expected cartesian model, got {:?}", other),
        }
    }

    #[test]
    fn test_circular_binds_flat_magnitudes() {
        let model = build_chart(&rows(), "Avg_Rent_Sqm_EGP", ChartKind::Donut);
        match model {
            ChartModel::Circular { kind, labels, magnitudes } => {
                assert_eq!(kind, ChartKind::Donut);
                // Unparseable row omitted, labels stay aligned.
                assert_eq!(labels, vec!["Maadi", "Zamalek"]);
                assert_eq!(magnitudes, vec![2000.0, 4500.0]);
            }
            other => panic!("expected circular model, got {:?}", other),
        }
    }

    #[test]
    fn test_table_preserves_raw_values() {
        let table = build_table(&rows(), "Avg_Rent_Sqm_EGP");
        assert_eq!(table.category_header, "District");
        assert_eq!(table.metric_header, "Avg Rent Sqm EGP");
        assert_eq!(table.rows[1], ("Zamalek".to_string(), "4500".to_string()));
        assert_eq!(table.rows[2], ("Nasr City".to_string(), "n/a".to_string()));
    }

    #[test]
    fn test_macro_table_uses_year_header() {
        let table = build_table(&[], "services_gdp");
        assert_eq!(table.category_header, "Year");
    }
}
