use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;
use crate::state::AppState;

/// Window policy for the unauthenticated auth routes: 50 requests per 15
/// minutes per caller address.
pub const AUTH_RATE_LIMIT_MAX: u32 = 50;
pub const AUTH_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Fixed-window request counter keyed by caller IP.
pub struct RateLimiter {
    max: u32,
    window: Duration,
    hits: Mutex<HashMap<IpAddr, Window>>,
}

struct Window {
    started: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Records a hit and reports whether the caller is still inside its
    /// window allowance.
    pub fn try_acquire(&self, ip: IpAddr) -> bool {
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let window = hits.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }
        window.count += 1;
        window.count <= self.max
    }
}

/// Layered onto register/login only; every other route is token-gated
/// instead.
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.auth_limiter.try_acquire(addr.ip()) {
        return Err(AppError::TooManyRequests);
    }
    Ok(next.run(req).await)
}
