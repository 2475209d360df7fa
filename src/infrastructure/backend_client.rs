// HTTP client for the market intelligence backend

use crate::application::market_repository::{
    AiReply, BackendError, DashboardContext, DataQuery, FilterSnapshot, MarketRepository,
};
use crate::domain::catalog::SectorNode;
use crate::domain::market::{DataRow, SectorSeries};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// `MarketRepository` implementation over the external HTTP/JSON service.
/// Holds the bearer token for authenticated calls; the AI orchestrator can
/// live on a separate base URL.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    ai_base_url: String,
    token: RwLock<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct DistrictsResponse {
    districts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct HierarchyResponse {
    tree: Vec<SectorNode>,
}

#[derive(Debug, Deserialize)]
struct SectorsResponse {
    sectors: Vec<SectorSeries>,
}

#[derive(Debug, Deserialize)]
struct DataResponse {
    data: Vec<DataRow>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    response: String,
    #[serde(default)]
    data_context: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct InsightResponse {
    insight: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ProfileRequest<'a> {
    industry: &'a str,
}

#[derive(Serialize)]
struct DataRequest<'a> {
    filters: &'a DataQuery,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    text: &'a str,
    dashboard_context: &'a DashboardContext,
    simulation_mode: bool,
}

#[derive(Serialize)]
struct InsightRequest<'a> {
    filters: &'a FilterSnapshot,
    data_summary: &'a str,
}

impl BackendClient {
    pub fn new(base_url: &str, ai_base_url: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            ai_base_url: ai_base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(token),
        }
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap() = token;
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().unwrap().as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn ai_url(&self, path: &str) -> String {
        format!("{}{}", self.ai_base_url, path)
    }
}

#[async_trait]
impl MarketRepository for BackendClient {
    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError> {
        let body = LoginRequest { username, password };
        let response: LoginResponse = self
            .execute(self.client.post(self.url("/api/login")).json(&body))
            .await?;
        self.set_token(Some(response.access_token.clone()));
        Ok(response.access_token)
    }

    async fn save_profile(&self, industry: &str) -> Result<(), BackendError> {
        let body = ProfileRequest { industry };
        let request = self.authorize(self.client.post(self.url("/api/profile")).json(&body));

        // The endpoint returns no payload worth decoding.
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        match response.status().as_u16() {
            401 => Err(BackendError::Unauthorized),
            code if !response.status().is_success() => Err(BackendError::Status(code)),
            _ => Ok(()),
        }
    }

    async fn list_districts(&self) -> Result<Vec<String>, BackendError> {
        let response: DistrictsResponse = self
            .execute(self.authorize(self.client.get(self.url("/api/districts"))))
            .await?;
        Ok(response.districts)
    }

    async fn hierarchy(&self) -> Result<Vec<SectorNode>, BackendError> {
        let response: HierarchyResponse = self
            .execute(self.authorize(self.client.get(self.url("/api/hierarchy"))))
            .await?;
        Ok(response.tree)
    }

    async fn macro_sectors(&self) -> Result<Vec<SectorSeries>, BackendError> {
        let response: SectorsResponse = self
            .execute(self.authorize(self.client.get(self.url("/api/macro/sectors"))))
            .await?;
        Ok(response.sectors)
    }

    async fn filtered_rows(&self, query: &DataQuery) -> Result<Vec<DataRow>, BackendError> {
        tracing::debug!("fetching filtered data: {:?}", query);
        let body = DataRequest { filters: query };
        let response: DataResponse = self
            .execute(self.authorize(self.client.post(self.url("/api/data")).json(&body)))
            .await?;
        Ok(response.data)
    }

    async fn ai_query(
        &self,
        text: &str,
        context: &DashboardContext,
        simulation_mode: bool,
    ) -> Result<AiReply, BackendError> {
        let body = QueryRequest { text, dashboard_context: context, simulation_mode };
        let response: QueryResponse = self
            .execute(self.authorize(self.client.post(self.ai_url("/api/query")).json(&body)))
            .await?;
        Ok(AiReply { response: response.response, data_context: response.data_context })
    }

    async fn ai_insight(
        &self,
        filters: &FilterSnapshot,
        data_summary: &str,
    ) -> Result<String, BackendError> {
        let body = InsightRequest { filters, data_summary };
        let response: InsightResponse = self
            .execute(self.client.post(self.ai_url("/api/ai/insight")).json(&body))
            .await?;
        Ok(response.insight)
    }
}
