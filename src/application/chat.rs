// Chat console service - transcript management and AI query round-trips

use crate::application::market_repository::{DashboardContext, FilterSnapshot, MarketRepository};
use crate::application::session::DashboardSession;
use crate::domain::chat::ChatMessage;
use crate::domain::market::DataRow;
use std::sync::Arc;
use std::sync::Mutex;

pub const GREETING: &str =
    "Hello! I'm your Egypt Market AI. Ask me about inflation, rent prices, or feasibility.";
pub const GENERIC_FALLBACK: &str = "Sorry, I encountered an error connecting to the brain.";
pub const AUTH_FALLBACK: &str = "Authentication failed. Please log in again.";

/// At most this many visible rows travel with each query as context.
const CONTEXT_ROW_LIMIT: usize = 50;

pub struct ChatService {
    repository: Arc<dyn MarketRepository>,
    session: Arc<DashboardSession>,
    transcript: Mutex<Vec<ChatMessage>>,
    simulation_mode: Mutex<bool>,
}

impl ChatService {
    pub fn new(repository: Arc<dyn MarketRepository>, session: Arc<DashboardSession>) -> Self {
        Self {
            repository,
            session,
            transcript: Mutex::new(vec![ChatMessage::assistant(GREETING)]),
            simulation_mode: Mutex::new(false),
        }
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.lock().unwrap().clone()
    }

    pub fn simulation_mode(&self) -> bool {
        *self.simulation_mode.lock().unwrap()
    }

    pub fn toggle_simulation_mode(&self) -> bool {
        let mut mode = self.simulation_mode.lock().unwrap();
        *mode = !*mode;
        *mode
    }

    /// Submit one user message: append it verbatim, send it with a
    /// snapshot of the current dashboard state, and append the reply (or a
    /// fallback on failure). Returns the assistant text shown.
    pub async fn send(&self, text: &str) -> String {
        self.append(ChatMessage::user(text));

        let filters = self.session.filters();
        let context = DashboardContext {
            filters: FilterSnapshot::from_filters(&filters),
            visible_data: self
                .session
                .data()
                .unwrap_or_default()
                .into_iter()
                .take(CONTEXT_ROW_LIMIT)
                .map(|row| row.0)
                .collect(),
        };

        let reply = self
            .repository
            .ai_query(text, &context, self.simulation_mode())
            .await;

        let shown = match reply {
            Ok(reply) => {
                if let Some(rows) = reply.data_context.as_ref().and_then(extract_rows) {
                    self.session.replace_data(rows);
                }
                reply.response
            }
            Err(e) => {
                tracing::warn!("AI query failed: {}", e);
                if e.is_unauthorized() {
                    AUTH_FALLBACK.to_string()
                } else {
                    GENERIC_FALLBACK.to_string()
                }
            }
        };

        self.append(ChatMessage::assistant(shown.clone()));
        shown
    }

    fn append(&self, message: ChatMessage) {
        self.transcript.lock().unwrap().push(message);
    }
}

/// Pull a row set out of a structured data_context payload: either a bare
/// array of records or an object with a `micro` array.
fn extract_rows(context: &serde_json::Value) -> Option<Vec<DataRow>> {
    let records = match context {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => map.get("micro")?.as_array()?,
        _ => return None,
    };
    let rows: Vec<DataRow> = records
        .iter()
        .filter_map(|item| item.as_object().cloned().map(DataRow::new))
        .collect();
    if rows.is_empty() { None } else { Some(rows) }
}
