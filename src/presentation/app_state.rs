// Application state for the console session
use crate::application::chat::ChatService;
use crate::application::explorer::ExplorerService;
use crate::application::insight::InsightService;
use crate::application::market_repository::MarketRepository;
use crate::application::session::DashboardSession;
use std::sync::Arc;

pub struct AppState {
    pub repository: Arc<dyn MarketRepository>,
    pub session: Arc<DashboardSession>,
    pub explorer: ExplorerService,
    pub chat: ChatService,
    pub insight: InsightService,
}
