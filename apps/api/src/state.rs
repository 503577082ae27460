use std::sync::Arc;

use crate::config::Config;
use crate::insights::service::InsightService;
use crate::users::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Resolves and refreshes insights. Built once at startup with the
    /// production store and completion client.
    pub insights: Arc<InsightService>,
    pub users: Arc<dyn UserStore>,
    pub config: Config,
}
