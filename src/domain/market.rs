// Market data domain models

use serde::Deserialize;
use serde_json::Value;

/// One record from the backend: a district-level survey row or a reshaped
/// macro series point. Open-ended field set; produced whole by the fetcher
/// and read-only to renderers.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DataRow(pub serde_json::Map<String, Value>);

impl DataRow {
    pub fn new(fields: serde_json::Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Category label for the row: the District field, or the year for
    /// reshaped macro rows (the fetcher writes the year into District).
    pub fn category(&self) -> String {
        match self.0.get("District") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Numeric value of a field, coercing strings where possible. Returns
    /// None for missing fields and unparseable strings; callers decide
    /// between omission and zero.
    pub fn numeric(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Raw display text of a field, as the backend sent it.
    pub fn display(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// One point of an aggregate macro series (GDP components), keyed by year.
#[derive(Debug, Clone, Deserialize)]
pub struct MacroPoint {
    pub year: i32,
    pub value: f64,
}

/// A named macro series as returned by the sectors endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SectorSeries {
    pub name: String,
    pub data: Vec<MacroPoint>,
}

impl SectorSeries {
    /// Reshape the series into the row model: year substitutes for the
    /// district key and the value lands under the metric's own name.
    pub fn to_rows(&self) -> Vec<DataRow> {
        self.data
            .iter()
            .map(|p| {
                let mut fields = serde_json::Map::new();
                fields.insert("District".to_string(), Value::from(p.year));
                fields.insert("year".to_string(), Value::from(p.year));
                fields.insert(self.name.clone(), Value::from(p.value));
                DataRow::new(fields)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> DataRow {
        let mut fields = serde_json::Map::new();
        fields.insert("District".to_string(), json!("Maadi"));
        fields.insert("Avg_Rent_Sqm_EGP".to_string(), value);
        DataRow::new(fields)
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(row(json!(2000)).numeric("Avg_Rent_Sqm_EGP"), Some(2000.0));
        assert_eq!(row(json!("4500")).numeric("Avg_Rent_Sqm_EGP"), Some(4500.0));
        assert_eq!(row(json!("n/a")).numeric("Avg_Rent_Sqm_EGP"), None);
        assert_eq!(row(json!(null)).numeric("Avg_Rent_Sqm_EGP"), None);
        assert_eq!(row(json!(2000)).numeric("Missing"), None);
    }

    #[test]
    fn test_category_from_year() {
        let mut fields = serde_json::Map::new();
        fields.insert("District".to_string(), json!(2023));
        assert_eq!(DataRow::new(fields).category(), "2023");
    }

    #[test]
    fn test_sector_reshape() {
        let series = SectorSeries {
            name: "services_gdp".to_string(),
            data: vec![
                MacroPoint { year: 2022, value: 51.2 },
                MacroPoint { year: 2023, value: 52.9 },
            ],
        };
        let rows = series.to_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category(), "2022");
        assert_eq!(rows[1].numeric("services_gdp"), Some(52.9));
    }
}
