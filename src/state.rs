use crate::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub struct AppState {
    pub registry: Arc<Mutex<Registry>>,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
        }
    }
}
