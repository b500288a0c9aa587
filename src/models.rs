// src/models.rs
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::Config;

/// Watchlists keyed by sheet name. The whole map is replaced on reload;
/// refresh updates rows in place.
pub type Watchlists = BTreeMap<String, Vec<StockRow>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Not Fetched")]
    NotFetched,
    #[serde(rename = "Target Hit!")]
    TargetHit,
    #[serde(rename = "Below Target")]
    BelowTarget,
    #[serde(rename = "No Data")]
    NoData,
    #[serde(rename = "Error")]
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRow {
    #[serde(rename = "Scrip Name")]
    pub scrip_name: String,
    #[serde(rename = "Target Price")]
    pub target_price: f64,
    #[serde(rename = "Current Price")]
    pub current_price: f64,
    #[serde(rename = "Status")]
    pub status: Status,
    pub yf_symbol: String,
}

impl StockRow {
    pub fn new(scrip_name: String, target_price: f64) -> Self {
        let yf_symbol = normalize_symbol(&scrip_name);
        Self {
            scrip_name,
            target_price,
            current_price: 0.0,
            status: Status::NotFetched,
            yf_symbol,
        }
    }
}

/// Scrips carrying an explicit exchange suffix are used verbatim; bare NSE
/// scrips get ".NS" appended.
pub fn normalize_symbol(scrip_name: &str) -> String {
    let s = scrip_name.trim();
    if s.contains('.') {
        s.to_string()
    } else {
        format!("{}.NS", s)
    }
}

/// Which sheet+scrip pairs already have a logged target hit. Cleared on
/// reload so a fresh load generation can log again.
#[derive(Debug, Default)]
pub struct HitLedger {
    logged: BTreeMap<String, BTreeSet<String>>,
}

impl HitLedger {
    /// Marks the pair as logged; true only the first time it is seen.
    pub fn first_hit(&mut self, sheet: &str, scrip: &str) -> bool {
        self.logged
            .entry(sheet.to_string())
            .or_default()
            .insert(scrip.to_string())
    }

    pub fn clear(&mut self) {
        self.logged.clear();
    }
}

pub struct AppState {
    pub watchlists: RwLock<Watchlists>,
    pub hits: RwLock<HitLedger>,
    pub client: Client,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            watchlists: RwLock::new(Watchlists::new()),
            hits: RwLock::new(HitLedger::default()),
            client: Client::new(),
            config,
        })
    }
}
