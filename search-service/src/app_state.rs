use std::sync::Arc;

use crate::domain::ports::inbound::TermSearch;

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<dyn TermSearch>,
}

impl AppState {
    pub fn new(search: impl TermSearch) -> Self {
        Self {
            search: Arc::new(search),
        }
    }
}
