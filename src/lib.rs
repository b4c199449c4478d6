pub mod config;
pub mod conversation;
pub mod db;
pub mod lexicon;
pub mod logging;
pub mod memory;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{Config, ConfigError};
use crate::state::AppState;

pub fn app(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn create_app(config: &Config) -> Result<axum::Router, ConfigError> {
    let state = AppState::from_config(config).await?;
    Ok(app(state))
}
