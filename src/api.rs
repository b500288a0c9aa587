// src/api.rs
use crate::error::ApiError;
use crate::hitlog;
use crate::models::AppState;
use crate::monitor;
use crate::sheet;
use crate::ui;
use log::{error, info};
use serde::Deserialize;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

#[derive(Deserialize)]
struct RefreshParams {
    sheet: Option<String>,
}

pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::html(ui::INDEX_HTML));

    let data = warp::path("data")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(data_handler);

    let refresh = warp::path("refresh")
        .and(warp::get())
        .and(warp::query::<RefreshParams>())
        .and(with_state(state.clone()))
        .and_then(refresh_handler);

    let reload = warp::path("reload")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(reload_handler);

    let log = warp::path("log")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(log_handler);

    index.or(data).or(refresh).or(reload).or(log)
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn data_handler(state: Arc<AppState>) -> Result<impl Reply, Rejection> {
    let watchlists = state.watchlists.read().await;
    Ok(warp::reply::json(&*watchlists))
}

async fn refresh_handler(
    params: RefreshParams,
    state: Arc<AppState>,
) -> Result<impl Reply, Rejection> {
    match params.sheet.as_deref() {
        Some(sheet) => info!("Manual refresh requested for sheet {}", sheet),
        None => info!("Manual refresh requested for all sheets"),
    }
    monitor::refresh_prices(&state, params.sheet.as_deref()).await;
    Ok(warp::http::StatusCode::NO_CONTENT)
}

async fn reload_handler(state: Arc<AppState>) -> Result<impl Reply, Rejection> {
    let fresh = sheet::load_watchlists(&state.client, &state.config).await;
    let sheets = fresh.len();
    let stocks: usize = fresh.values().map(|rows| rows.len()).sum();
    *state.watchlists.write().await = fresh;
    state.hits.write().await.clear();
    info!("Reloaded {} sheets with {} stocks", sheets, stocks);
    Ok(warp::http::StatusCode::NO_CONTENT)
}

async fn log_handler(state: Arc<AppState>) -> Result<impl Reply, Rejection> {
    match hitlog::read_hits(&state.config.hit_log_file) {
        Ok(Some(records)) => Ok(warp::reply::html(ui::log_page(&records))),
        Ok(None) => Ok(warp::reply::html("No log file yet.".to_string())),
        Err(e) => {
            error!("Failed to read hit log: {}", e);
            Err(warp::reject::custom(ApiError {
                message: e.to_string(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::hitlog::HitRecord;
    use crate::models::{Status, StockRow, Watchlists};

    fn test_state(hit_log: std::path::PathBuf) -> Arc<AppState> {
        AppState::new(Config {
            port: 0,
            sheet_id: String::new(),
            sheet_tabs: Vec::new(),
            hit_log_file: hit_log,
        })
    }

    #[tokio::test]
    async fn index_serves_polling_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let routes = routes(test_state(dir.path().join("hits.csv")));

        let res = warp::test::request().path("/").reply(&routes).await;
        assert_eq!(res.status(), 200);
        let body = String::from_utf8_lossy(res.body());
        assert!(body.contains("fetch('/data')"));
        assert!(body.contains("setInterval(loadData, 60000)"));
    }

    #[tokio::test]
    async fn data_returns_watchlists_json() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path().join("hits.csv"));
        let mut watchlists = Watchlists::new();
        watchlists.insert(
            "Intraday".to_string(),
            vec![StockRow::new("RELIANCE".to_string(), 2500.0)],
        );
        *state.watchlists.write().await = watchlists;

        let routes = routes(state);
        let res = warp::test::request().path("/data").reply(&routes).await;
        assert_eq!(res.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["Intraday"][0]["Scrip Name"], "RELIANCE");
        assert_eq!(body["Intraday"][0]["Target Price"], 2500.0);
        assert_eq!(body["Intraday"][0]["Current Price"], 0.0);
        assert_eq!(body["Intraday"][0]["Status"], "Not Fetched");
        assert_eq!(body["Intraday"][0]["yf_symbol"], "RELIANCE.NS");
    }

    #[tokio::test]
    async fn refresh_returns_no_content() {
        let dir = tempfile::tempdir().unwrap();
        let routes = routes(test_state(dir.path().join("hits.csv")));

        let res = warp::test::request().path("/refresh").reply(&routes).await;
        assert_eq!(res.status(), 204);
    }

    #[tokio::test]
    async fn refresh_of_unknown_sheet_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path().join("hits.csv"));
        let mut watchlists = Watchlists::new();
        watchlists.insert(
            "Intraday".to_string(),
            vec![StockRow::new("TCS".to_string(), 4000.0)],
        );
        *state.watchlists.write().await = watchlists;

        let routes = routes(state.clone());
        let res = warp::test::request()
            .path("/refresh?sheet=Nonexistent")
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 204);
        let watchlists = state.watchlists.read().await;
        assert_eq!(watchlists["Intraday"][0].status, Status::NotFetched);
        assert_eq!(watchlists["Intraday"][0].current_price, 0.0);
    }

    #[tokio::test]
    async fn reload_replaces_watchlists_and_clears_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path().join("hits.csv"));
        let mut watchlists = Watchlists::new();
        watchlists.insert(
            "Intraday".to_string(),
            vec![StockRow::new("TCS".to_string(), 4000.0)],
        );
        *state.watchlists.write().await = watchlists;
        assert!(state.hits.write().await.first_hit("Intraday", "TCS"));

        let routes = routes(state.clone());
        let res = warp::test::request().path("/reload").reply(&routes).await;
        assert_eq!(res.status(), 204);
        // No tabs configured, so the reload comes back empty.
        assert!(state.watchlists.read().await.is_empty());
        // Ledger was cleared, so the same hit counts as new again.
        assert!(state.hits.write().await.first_hit("Intraday", "TCS"));
    }

    #[tokio::test]
    async fn log_page_renders_records_or_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("hits.csv");
        let routes = routes(test_state(log.clone()));

        let res = warp::test::request().path("/log").reply(&routes).await;
        assert_eq!(res.status(), 200);
        assert!(String::from_utf8_lossy(res.body()).contains("No log file yet."));

        let record = HitRecord::now("Intraday".to_string(), "INFY".to_string(), 1800.0, 1805.0);
        hitlog::append_hit(&log, &record).unwrap();

        let res = warp::test::request().path("/log").reply(&routes).await;
        assert_eq!(res.status(), 200);
        let body = String::from_utf8_lossy(res.body());
        assert!(body.contains("INFY"));
        assert!(body.contains("₹1800.00"));
    }
}
