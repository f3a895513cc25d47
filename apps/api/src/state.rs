use std::sync::Arc;

use crate::config::Config;
use crate::middleware::RateLimiter;
use crate::store::{ApplicationStore, UserStore};

/// Shared application state injected into all route handlers via Axum
/// extractors. Handlers see the stores only through their traits, so the
/// Postgres and in-memory implementations are interchangeable here.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub applications: Arc<dyn ApplicationStore>,
    pub auth_limiter: Arc<RateLimiter>,
    pub config: Config,
}
