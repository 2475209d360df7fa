// Dashboard filter domain models

/// Predefined reporting periods offered by the context bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePeriod {
    Last30Days,
    Q4_2025,
    YearToDate,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 3] = [
        TimePeriod::Last30Days,
        TimePeriod::Q4_2025,
        TimePeriod::YearToDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimePeriod::Last30Days => "Last 30 Days",
            TimePeriod::Q4_2025 => "Q4 2025",
            TimePeriod::YearToDate => "Year to Date",
        }
    }

    pub fn from_label(label: &str) -> Option<TimePeriod> {
        Self::ALL.into_iter().find(|p| p.label().eq_ignore_ascii_case(label))
    }
}

/// Competitor density buckets used both as a filter and as a categorical
/// field value on rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityLevel {
    Low,
    Medium,
    High,
}

impl DensityLevel {
    pub const ALL: [DensityLevel; 3] = [DensityLevel::High, DensityLevel::Medium, DensityLevel::Low];

    pub fn label(&self) -> &'static str {
        match self {
            DensityLevel::Low => "Low",
            DensityLevel::Medium => "Medium",
            DensityLevel::High => "High",
        }
    }

    pub fn from_label(label: &str) -> Option<DensityLevel> {
        Self::ALL.into_iter().find(|d| d.label().eq_ignore_ascii_case(label))
    }
}

/// Explore = single-selection browsing with live filters.
/// Compare = two-district side-by-side, filters disabled, full dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Explore,
    Compare,
}

/// Current dashboard selection. Mutated only through the session store;
/// every setter replaces the whole value.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub districts: Vec<String>,
    pub time_period: TimePeriod,
    pub density: Vec<DensityLevel>,
    /// Minimum foot-traffic score, 0 meaning "no filter". Range 0..=10.
    pub traffic: u8,
    /// [min, max] rent in EGP/sqm. Not validated; readers clamp via
    /// `rent_bounds`.
    pub rent_range: (i64, i64),
    pub metric: String,
    pub industry: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            districts: Vec::new(),
            time_period: TimePeriod::Last30Days,
            density: Vec::new(),
            traffic: 0,
            rent_range: (0, 1000),
            metric: "Avg_Rent_Sqm_EGP".to_string(),
            industry: "Retail".to_string(),
        }
    }
}

impl FilterState {
    /// Rent range with min/max ordered. The store accepts min > max; every
    /// read goes through here so a backwards range never panics a renderer.
    pub fn rent_bounds(&self) -> (i64, i64) {
        let (min, max) = self.rent_range;
        if min <= max { (min, max) } else { (max, min) }
    }

    pub fn toggle_district(&mut self, district: &str) {
        if let Some(pos) = self.districts.iter().position(|d| d == district) {
            self.districts.remove(pos);
        } else {
            self.districts.push(district.to_string());
        }
    }

    pub fn toggle_density(&mut self, level: DensityLevel) {
        if let Some(pos) = self.density.iter().position(|d| *d == level) {
            self.density.remove(pos);
        } else {
            self.density.push(level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let filters = FilterState::default();
        assert!(filters.districts.is_empty());
        assert_eq!(filters.time_period, TimePeriod::Last30Days);
        assert_eq!(filters.traffic, 0);
        assert_eq!(filters.rent_range, (0, 1000));
        assert_eq!(filters.metric, "Avg_Rent_Sqm_EGP");
        assert_eq!(filters.industry, "Retail");
    }

    #[test]
    fn test_rent_bounds_tolerates_inverted_range() {
        let mut filters = FilterState::default();
        filters.rent_range = (900, 100);
        assert_eq!(filters.rent_bounds(), (100, 900));

        filters.rent_range = (100, 900);
        assert_eq!(filters.rent_bounds(), (100, 900));
    }

    #[test]
    fn test_toggle_district() {
        let mut filters = FilterState::default();
        filters.toggle_district("Maadi");
        assert_eq!(filters.districts, vec!["Maadi"]);
        filters.toggle_district("Maadi");
        assert!(filters.districts.is_empty());
    }

    #[test]
    fn test_period_labels_round_trip() {
        for period in TimePeriod::ALL {
            assert_eq!(TimePeriod::from_label(period.label()), Some(period));
        }
        assert_eq!(TimePeriod::from_label("Q1 1999"), None);
    }
}
