// Main entry point - Dependency injection and console startup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::chat::ChatService;
use crate::application::explorer::ExplorerService;
use crate::application::insight::InsightService;
use crate::application::market_repository::MarketRepository;
use crate::application::session::DashboardSession;
use crate::infrastructure::backend_client::BackendClient;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::token_store::TokenStore;
use crate::presentation::app_state::AppState;
use crate::presentation::console;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let app_config = load_app_config()?;

    // Create backend client (infrastructure layer)
    let tokens = TokenStore::new(&app_config.session.token_path);
    let client = Arc::new(BackendClient::new(
        &app_config.backend.base_url,
        app_config.backend.ai_base_url(),
        tokens.load(),
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // No stored token: run the login flow before anything authenticated.
    let needs_onboarding = tokens.load().is_none();
    if needs_onboarding {
        console::login_flow(&client, &tokens, &mut lines).await?;
    }

    // Create services (application layer)
    let repository: Arc<dyn MarketRepository> = client.clone();
    let session = Arc::new(DashboardSession::new());
    let state = AppState {
        repository: repository.clone(),
        session: session.clone(),
        explorer: ExplorerService::new(repository.clone(), session.clone()),
        chat: ChatService::new(repository.clone(), session.clone()),
        insight: InsightService::new(repository.clone()),
    };

    if needs_onboarding {
        console::onboarding_flow(&state, &mut lines).await;
    }

    println!("Egypt Market Intelligence console");
    console::run(state, &mut lines).await
}
