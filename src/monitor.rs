// src/monitor.rs
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};
use futures::future::join_all;
use log::{error, info, warn};
use tokio::time;

use crate::error::BoxError;
use crate::hitlog::{self, HitRecord};
use crate::models::{AppState, Status};
use crate::quotes;

const BATCH_SIZE: usize = 25;
const BATCH_DELAY: Duration = Duration::from_secs(2);
// Minutes past the hour at which the background loop fetches.
const FETCH_MINUTES: [u32; 4] = [1, 16, 31, 46];
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Fetches fresh quotes for every tracked stock, or for a single sheet when
/// `sheet` is given. Quotes go out in batches so a large watchlist does not
/// hammer the upstream API.
pub async fn refresh_prices(state: &Arc<AppState>, sheet: Option<&str>) {
    let targets: Vec<(String, usize, String, String)> = {
        let watchlists = state.watchlists.read().await;
        watchlists
            .iter()
            .filter(|(name, _)| sheet.map_or(true, |s| s == name.as_str()))
            .flat_map(|(name, rows)| {
                rows.iter().enumerate().map(move |(i, row)| {
                    (name.clone(), i, row.scrip_name.clone(), row.yf_symbol.clone())
                })
            })
            .collect()
    };
    if targets.is_empty() {
        return;
    }
    info!("Fetching quotes for {} stocks", targets.len());

    for (i, batch) in targets.chunks(BATCH_SIZE).enumerate() {
        if i > 0 {
            time::sleep(BATCH_DELAY).await;
        }
        let fetches = batch
            .iter()
            .map(|(_, _, _, symbol)| quotes::fetch_price(&state.client, symbol));
        let results = join_all(fetches).await;
        for ((sheet_name, index, scrip, symbol), outcome) in batch.iter().zip(results) {
            apply_quote(state, sheet_name, *index, scrip, symbol, outcome).await;
        }
    }
}

/// Writes one fetch outcome back into the watchlist row at `index`. The row
/// is revalidated by position and scrip under the write lock: a reload may
/// have replaced the watchlists since the snapshot was taken, in which case
/// the result is dropped.
async fn apply_quote(
    state: &Arc<AppState>,
    sheet_name: &str,
    index: usize,
    scrip: &str,
    symbol: &str,
    outcome: Result<Option<f64>, BoxError>,
) {
    let mut watchlists = state.watchlists.write().await;
    let row = match watchlists
        .get_mut(sheet_name)
        .and_then(|rows| rows.get_mut(index))
        .filter(|row| row.scrip_name == scrip)
    {
        Some(row) => row,
        None => return,
    };
    let (price, status) = match outcome {
        Ok(Some(price)) => (price, status_for(price, row.target_price)),
        Ok(None) => {
            warn!("No price data for {}", symbol);
            (0.0, Status::NoData)
        }
        Err(e) => {
            warn!("Error fetching {}: {}", symbol, e);
            (0.0, Status::Error)
        }
    };
    row.current_price = price;
    row.status = status;
    if status != Status::TargetHit {
        return;
    }
    let target_price = row.target_price;
    drop(watchlists);

    if !state.hits.write().await.first_hit(sheet_name, scrip) {
        return;
    }
    let record = HitRecord::now(sheet_name.to_string(), scrip.to_string(), target_price, price);
    match hitlog::append_hit(&state.config.hit_log_file, &record) {
        Ok(()) => info!("Target hit: {} / {} at {}", sheet_name, scrip, price),
        Err(e) => error!("Failed to log hit for {}: {}", scrip, e),
    }
}

pub fn status_for(current: f64, target: f64) -> Status {
    if current >= target {
        Status::TargetHit
    } else {
        Status::BelowTarget
    }
}

/// Spawns the background loop: once a minute, refresh everything if the
/// Indian market is open and the minute lines up with a fetch slot.
pub fn start(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut ticker = time::interval(Duration::from_secs(60));
        loop {
            ticker.tick().await;
            let now = Utc::now().with_timezone(&ist());
            if should_fetch(now) {
                info!("Scheduled refresh at {}", now.format("%H:%M"));
                refresh_prices(&state, None).await;
            }
        }
    });
}

fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).unwrap()
}

/// True on weekdays between 09:15 and 15:30 IST, at the quarter-hour
/// offsets the loop fetches on.
pub fn should_fetch(now: DateTime<FixedOffset>) -> bool {
    if now.weekday().number_from_monday() > 5 {
        return false;
    }
    let slot = (now.hour(), now.minute());
    if slot < (9, 15) || slot > (15, 30) {
        return false;
    }
    FETCH_MINUTES.contains(&now.minute())
}
