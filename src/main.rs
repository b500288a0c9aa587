// src/main.rs
mod api;
mod config;
mod error;
mod hitlog;
mod models;
mod monitor;
mod quotes;
mod sheet;
mod ui;

use env_logger::Builder;
use log::{info, LevelFilter};

use crate::config::Config;
use crate::models::AppState;

#[tokio::main]
async fn main() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    info!("Starting the stock monitor application...");
    let config = Config::from_env();
    let port = config.port;
    let state = AppState::new(config);

    let watchlists = sheet::load_watchlists(&state.client, &state.config).await;
    let stocks: usize = watchlists.values().map(|rows| rows.len()).sum();
    info!("Loaded {} sheets with {} stocks", watchlists.len(), stocks);
    *state.watchlists.write().await = watchlists;

    monitor::start(state.clone());

    let routes = api::routes(state);
    info!("Server running on http://0.0.0.0:{}", port);
    warp::serve(routes).run(([0, 0, 0, 0], port)).await;
}
