pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

use crate::services::application_service::ApplicationService;
use crate::store::ApplicationStore;

#[derive(Clone)]
pub struct AppState {
    pub application_service: ApplicationService,
}

impl AppState {
    pub fn new(store: Arc<dyn ApplicationStore>) -> Self {
        Self {
            application_service: ApplicationService::new(store),
        }
    }
}
