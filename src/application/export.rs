// Table export - delimited text and paginated report files

use crate::domain::chart::TableModel;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Rows per page in the report layout.
const PAGE_ROWS: usize = 40;

/// Export file name for a metric: `market_data_<metric>.<ext>`.
pub fn export_file_name(metric: &str, extension: &str) -> String {
    format!("market_data_{}.{}", metric, extension)
}

/// Render the table as comma-delimited text: one header line, one line per
/// record, values verbatim.
pub fn to_csv(table: &TableModel) -> String {
    let mut out = String::new();
    out.push_str(&format!("{},{}\n", table.category_header, table.metric_header));
    for (category, value) in &table.rows {
        out.push_str(&format!("{},{}\n", category, value));
    }
    out
}

/// Render the table as a paginated plain-text report: a titled header and
/// column row on every page, a page n/m footer, same contents as the CSV.
pub fn to_report(table: &TableModel, metric: &str) -> String {
    let pages = table.rows.chunks(PAGE_ROWS).count().max(1);
    let generated = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC");
    let width = table
        .rows
        .iter()
        .map(|(c, _)| c.len())
        .chain([table.category_header.len()])
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let mut chunks = table.rows.chunks(PAGE_ROWS);
    for page in 1..=pages {
        out.push_str(&format!("Market Data Report: {}\n", table.metric_header));
        out.push_str(&format!("Generated: {}\n\n", generated));
        out.push_str(&format!("{:<width$}  {}\n", table.category_header, table.metric_header));
        out.push_str(&format!("{}\n", "-".repeat(width + 2 + table.metric_header.len())));
        for (category, value) in chunks.next().unwrap_or(&[]) {
            out.push_str(&format!("{:<width$}  {}\n", category, value));
        }
        out.push_str(&format!("\nPage {} of {} - {}\n", page, pages, export_file_name(metric, "txt")));
        if page < pages {
            out.push('\u{000C}');
        }
    }
    out
}

/// Write the CSV export next to the given directory and return its path.
pub fn write_csv(table: &TableModel, metric: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(export_file_name(metric, "csv"));
    std::fs::write(&path, to_csv(table))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Write the paginated report and return its path.
pub fn write_report(table: &TableModel, metric: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(export_file_name(metric, "txt"));
    std::fs::write(&path, to_report(table, metric))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<(&str, &str)>) -> TableModel {
        TableModel {
            category_header: "District".to_string(),
            metric_header: "Avg Rent Sqm EGP".to_string(),
            rows: rows
                .into_iter()
                .map(|(c, v)| (c.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_csv_exact_format() {
        let csv = to_csv(&table(vec![("Maadi", "2000"), ("Zamalek", "4500")]));
        assert_eq!(csv, "District,Avg Rent Sqm EGP\nMaadi,2000\nZamalek,4500\n");
    }

    #[test]
    fn test_csv_empty_table_is_header_only() {
        assert_eq!(to_csv(&table(vec![])), "District,Avg Rent Sqm EGP\n");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            export_file_name("Avg_Rent_Sqm_EGP", "csv"),
            "market_data_Avg_Rent_Sqm_EGP.csv"
        );
    }

    #[test]
    fn test_report_paginates() {
        let rows: Vec<(String, String)> = (0..85)
            .map(|i| (format!("District {}", i), format!("{}", 1000 + i)))
            .collect();
        let model = TableModel {
            category_header: "District".to_string(),
            metric_header: "Avg Rent Sqm EGP".to_string(),
            rows,
        };
        let report = to_report(&model, "Avg_Rent_Sqm_EGP");

        assert_eq!(report.matches("Page 1 of 3").count(), 1);
        assert_eq!(report.matches("Page 3 of 3").count(), 1);
        assert_eq!(report.matches("Market Data Report: Avg Rent Sqm EGP").count(), 3);
        assert!(report.contains("District 84"));
    }

    #[test]
    fn test_report_empty_table_still_has_one_page() {
        let report = to_report(&table(vec![]), "Avg_Rent_Sqm_EGP");
        assert!(report.contains("Page 1 of 1"));
    }
}
