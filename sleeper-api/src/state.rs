use std::sync::Arc;

use sleeper_engine::ReservationEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ReservationEngine>,
}

impl AppState {
    pub fn new(engine: ReservationEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
