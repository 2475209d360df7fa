// Explorer service - Use case for fetching dashboard data

use crate::application::market_repository::{DataQuery, MarketRepository};
use crate::application::session::DashboardSession;
use crate::domain::catalog::is_macro_metric;
use crate::domain::filters::ViewMode;
use crate::domain::market::DataRow;
use std::sync::Arc;

#[derive(Clone)]
pub struct ExplorerService {
    repository: Arc<dyn MarketRepository>,
    session: Arc<DashboardSession>,
}

impl ExplorerService {
    pub fn new(repository: Arc<dyn MarketRepository>, session: Arc<DashboardSession>) -> Self {
        Self { repository, session }
    }

    /// Re-fetch the shared data slot for the current filter state. Macro
    /// metrics come from the sectors endpoint reshaped to year-keyed rows;
    /// everything else goes through the filtered-data endpoint. Failures
    /// are logged and leave the previous data in place.
    pub async fn refresh(&self) -> bool {
        let filters = self.session.filters();
        let view_mode = self.session.view_mode();
        let seq = self.session.begin_fetch();

        let fetched = if is_macro_metric(&filters.metric) {
            self.fetch_macro(&filters.metric).await
        } else {
            // Compare mode needs the full candidate set, so filters only
            // apply while exploring.
            let query = match view_mode {
                ViewMode::Explore => DataQuery::from_filters(&filters),
                ViewMode::Compare => DataQuery::default(),
            };
            self.fetch_micro(&query).await
        };

        self.session.complete_fetch(seq, fetched)
    }

    async fn fetch_macro(&self, metric: &str) -> Option<Vec<DataRow>> {
        match self.repository.macro_sectors().await {
            Ok(sectors) => match sectors.iter().find(|s| s.name == metric) {
                Some(series) => Some(series.to_rows()),
                None => {
                    tracing::warn!("macro series {} not present in sectors response", metric);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("failed to fetch macro sectors: {}", e);
                None
            }
        }
    }

    async fn fetch_micro(&self, query: &DataQuery) -> Option<Vec<DataRow>> {
        match self.repository.filtered_rows(query).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                tracing::warn!("failed to fetch market data: {}", e);
                None
            }
        }
    }

    /// District names for the context bar and compare selectors. An empty
    /// list on failure; the console just shows no choices.
    pub async fn districts(&self) -> Vec<String> {
        match self.repository.list_districts().await {
            Ok(districts) => districts,
            Err(e) => {
                tracing::warn!("failed to fetch districts: {}", e);
                Vec::new()
            }
        }
    }
}
