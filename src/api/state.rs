use std::sync::Arc;

use tokio::sync::RwLock;

use crate::storage::LeagueStore;

/// Shared handler state. Writers take the store's write lock for the whole
/// read-modify-write of a request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<LeagueStore>>,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(store: LeagueStore, cors_origin: &str) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            cors_origin: cors_origin.to_string(),
        }
    }
}
