// Repository trait for the external market intelligence backend

use crate::domain::catalog::SectorNode;
use crate::domain::filters::{DensityLevel, FilterState};
use crate::domain::market::{DataRow, SectorSeries};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Failures crossing the backend boundary. Call sites catch these and
/// present user-safe fallbacks; only the authorization case gets a
/// distinguished message.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("authorization failed")]
    Unauthorized,
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Request(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Unauthorized)
    }
}

/// Query parameters for the filtered-data endpoint. Only filters active in
/// the current view are serialized.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DataQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub districts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitor_density: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_traffic: Option<f64>,
}

impl DataQuery {
    /// Translate active filters into query parameters. Zero traffic and
    /// empty selections mean "no filter".
    pub fn from_filters(filters: &FilterState) -> Self {
        Self {
            districts: if filters.districts.is_empty() {
                None
            } else {
                Some(filters.districts.clone())
            },
            competitor_density: if filters.density.is_empty() {
                None
            } else {
                Some(filters.density.iter().map(|d| d.label().to_string()).collect())
            },
            min_traffic: if filters.traffic > 0 {
                Some(filters.traffic as f64)
            } else {
                None
            },
        }
    }
}

/// Context snapshot attached to AI queries so the model sees what the
/// dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardContext {
    pub filters: FilterSnapshot,
    pub visible_data: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Wire form of the filter state.
#[derive(Debug, Clone, Serialize)]
pub struct FilterSnapshot {
    pub districts: Vec<String>,
    pub time_period: String,
    pub density: Vec<String>,
    pub traffic: u8,
    pub rent_range: (i64, i64),
    pub metric: String,
    pub industry: String,
}

impl FilterSnapshot {
    pub fn from_filters(filters: &FilterState) -> Self {
        Self {
            districts: filters.districts.clone(),
            time_period: filters.time_period.label().to_string(),
            density: filters.density.iter().map(DensityLevel::label).map(String::from).collect(),
            traffic: filters.traffic,
            rent_range: filters.rent_range,
            metric: filters.metric.clone(),
            industry: filters.industry.clone(),
        }
    }
}

/// Response from the AI query endpoint. `data_context`, when present,
/// replaces the shared dashboard data.
#[derive(Debug, Clone)]
pub struct AiReply {
    pub response: String,
    pub data_context: Option<serde_json::Value>,
}

#[async_trait]
pub trait MarketRepository: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError>;

    /// Save the onboarding industry choice for the current user.
    async fn save_profile(&self, industry: &str) -> Result<(), BackendError>;

    /// List all district names.
    async fn list_districts(&self) -> Result<Vec<String>, BackendError>;

    /// Fetch the metric hierarchy tree.
    async fn hierarchy(&self) -> Result<Vec<SectorNode>, BackendError>;

    /// Fetch every macroeconomic sector series.
    async fn macro_sectors(&self) -> Result<Vec<SectorSeries>, BackendError>;

    /// Fetch district rows matching the query.
    async fn filtered_rows(&self, query: &DataQuery) -> Result<Vec<DataRow>, BackendError>;

    /// Send a free-text question plus dashboard context to the AI endpoint.
    async fn ai_query(
        &self,
        text: &str,
        context: &DashboardContext,
        simulation_mode: bool,
    ) -> Result<AiReply, BackendError>;

    /// Generate a natural-language insight for a data summary.
    async fn ai_insight(
        &self,
        filters: &FilterSnapshot,
        data_summary: &str,
    ) -> Result<String, BackendError>;
}

/// In-memory repository double shared by the service tests.
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct MockRepository {
        rows: Mutex<Vec<DataRow>>,
        sectors: Mutex<Vec<SectorSeries>>,
        districts: Mutex<Vec<String>>,
        reply: Mutex<Option<AiReply>>,
        insight: Mutex<String>,
        last_query: Mutex<Option<DataQuery>>,
        last_summary: Mutex<Option<String>>,
        data_calls: AtomicUsize,
        insight_calls: AtomicUsize,
        fail_next: AtomicBool,
        unauthorized: AtomicBool,
    }

    impl MockRepository {
        pub fn set_rows(&self, rows: Vec<DataRow>) {
            *self.rows.lock().unwrap() = rows;
        }

        pub fn set_sectors(&self, sectors: Vec<SectorSeries>) {
            *self.sectors.lock().unwrap() = sectors;
        }

        pub fn set_districts(&self, districts: Vec<String>) {
            *self.districts.lock().unwrap() = districts;
        }

        pub fn set_reply(&self, reply: AiReply) {
            *self.reply.lock().unwrap() = Some(reply);
        }

        pub fn set_insight(&self, insight: &str) {
            *self.insight.lock().unwrap() = insight.to_string();
        }

        pub fn last_query(&self) -> Option<DataQuery> {
            self.last_query.lock().unwrap().clone()
        }

        pub fn last_summary(&self) -> Option<String> {
            self.last_summary.lock().unwrap().clone()
        }

        pub fn data_calls(&self) -> usize {
            self.data_calls.load(Ordering::SeqCst)
        }

        pub fn insight_calls(&self) -> usize {
            self.insight_calls.load(Ordering::SeqCst)
        }

        pub fn fail_next(&self) {
            self.fail_next.store(true, Ordering::SeqCst);
        }

        pub fn fail_unauthorized(&self) {
            self.fail_next.store(true, Ordering::SeqCst);
            self.unauthorized.store(true, Ordering::SeqCst);
        }

        fn take_failure(&self) -> Option<BackendError> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                if self.unauthorized.swap(false, Ordering::SeqCst) {
                    Some(BackendError::Unauthorized)
                } else {
                    Some(BackendError::Status(500))
                }
            } else {
                None
            }
        }
    }

    #[async_trait]
    impl MarketRepository for MockRepository {
        async fn login(&self, _username: &str, _password: &str) -> Result<String, BackendError> {
            if let Some(e) = self.take_failure() {
                return Err(e);
            }
            Ok("test-token".to_string())
        }

        async fn save_profile(&self, _industry: &str) -> Result<(), BackendError> {
            if let Some(e) = self.take_failure() {
                return Err(e);
            }
            Ok(())
        }

        async fn list_districts(&self) -> Result<Vec<String>, BackendError> {
            if let Some(e) = self.take_failure() {
                return Err(e);
            }
            Ok(self.districts.lock().unwrap().clone())
        }

        async fn hierarchy(&self) -> Result<Vec<SectorNode>, BackendError> {
            if let Some(e) = self.take_failure() {
                return Err(e);
            }
            Ok(Vec::new())
        }

        async fn macro_sectors(&self) -> Result<Vec<SectorSeries>, BackendError> {
            if let Some(e) = self.take_failure() {
                return Err(e);
            }
            Ok(self.sectors.lock().unwrap().clone())
        }

        async fn filtered_rows(&self, query: &DataQuery) -> Result<Vec<DataRow>, BackendError> {
            self.data_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.clone());
            if let Some(e) = self.take_failure() {
                return Err(e);
            }
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn ai_query(
            &self,
            _text: &str,
            _context: &DashboardContext,
            _simulation_mode: bool,
        ) -> Result<AiReply, BackendError> {
            if let Some(e) = self.take_failure() {
                return Err(e);
            }
            Ok(self.reply.lock().unwrap().clone().unwrap_or(AiReply {
                response: "ok".to_string(),
                data_context: None,
            }))
        }

        async fn ai_insight(
            &self,
            _filters: &FilterSnapshot,
            data_summary: &str,
        ) -> Result<String, BackendError> {
            self.insight_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_summary.lock().unwrap() = Some(data_summary.to_string());
            if let Some(e) = self.take_failure() {
                return Err(e);
            }
            Ok(self.insight.lock().unwrap().clone())
        }
    }
}
