// src/config.rs
use log::warn;
use std::env;
use std::path::PathBuf;

const DEFAULT_SHEET_ID: &str = "1qPeDQOzgiCrfp1h32KUyn5CHD509yR8E_ggxfjFtJOc";
const DEFAULT_SHEET_TABS: &str = "Intraday:0,SwingRiskyBuy:1087261693,FIBOST:1298523822,\
                                  FIBOMT:1261523394,FIBOLT:774037465";
const DEFAULT_HIT_LOG: &str = "logs/target_hits.csv";

/// Runtime configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub sheet_id: String,
    /// Sheet tabs to load, as `(name, gid)` pairs.
    pub sheet_tabs: Vec<(String, String)>,
    pub hit_log_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);
        let sheet_id =
            env::var("GOOGLE_SHEET_ID").unwrap_or_else(|_| DEFAULT_SHEET_ID.to_string());
        let tabs = env::var("SHEET_TABS").unwrap_or_else(|_| DEFAULT_SHEET_TABS.to_string());
        let hit_log_file = env::var("HIT_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_HIT_LOG));
        Self {
            port,
            sheet_id,
            sheet_tabs: tabs_or_default(&tabs),
            hit_log_file,
        }
    }
}

/// Tab list from the configured value, falling back to the default tab map
/// when nothing usable parses.
fn tabs_or_default(raw: &str) -> Vec<(String, String)> {
    let tabs = parse_tabs(raw);
    if tabs.is_empty() {
        warn!("No usable sheet tabs configured, using the default tab map");
        return parse_tabs(DEFAULT_SHEET_TABS);
    }
    tabs
}

/// Parses a `Name:gid,Name:gid,...` tab list. Malformed entries are dropped.
fn parse_tabs(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|entry| {
            let (name, gid) = entry.split_once(':')?;
            let (name, gid) = (name.trim(), gid.trim());
            if name.is_empty() || gid.is_empty() {
                None
            } else {
                Some((name.to_string(), gid.to_string()))
            }
        })
        .collect()
}
