pub mod api;
pub mod compat;
pub mod daily;
pub mod error;
pub mod ganzhi;
pub mod meishiki;
pub mod personality;
pub mod scoring;
pub mod store;
pub mod tables;
pub mod timefortune;

use std::sync::Arc;

use store::{StatsStore, UserStore, VisitorStore};

/// Run a blocking store operation on tokio's blocking thread pool.
///
/// The file stores are synchronous; calls from async handlers MUST go
/// through this to avoid starving tokio worker threads.
pub async fn store_call<T, F>(f: F) -> Result<T, error::UnseiError>
where
    F: FnOnce() -> Result<T, error::UnseiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| error::UnseiError::Internal(e.to_string()))?
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub visitors: Arc<VisitorStore>,
    pub stats: Arc<StatsStore>,
    pub admin_key: Option<String>,
    pub started_at: std::time::Instant,
}
