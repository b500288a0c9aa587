// src/sheet.rs
use csv::ReaderBuilder;
use log::{info, warn};
use reqwest::Client;

use crate::config::Config;
use crate::error::BoxError;
use crate::models::{StockRow, Watchlists};

fn export_url(sheet_id: &str, gid: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
        sheet_id, gid
    )
}

/// Downloads and parses every configured tab. A tab that fails to download
/// or parse becomes an empty sheet so one bad tab cannot take out the rest.
pub async fn load_watchlists(client: &Client, config: &Config) -> Watchlists {
    let mut watchlists = Watchlists::new();
    for (tab, gid) in &config.sheet_tabs {
        match fetch_tab(client, &config.sheet_id, gid).await {
            Ok(rows) => {
                info!("Loaded {} stocks for sheet {}", rows.len(), tab);
                watchlists.insert(tab.clone(), rows);
            }
            Err(e) => {
                warn!("Error reading sheet {}: {}", tab, e);
                watchlists.insert(tab.clone(), Vec::new());
            }
        }
    }
    watchlists
}

async fn fetch_tab(client: &Client, sheet_id: &str, gid: &str) -> Result<Vec<StockRow>, BoxError> {
    let body = client
        .get(export_url(sheet_id, gid))
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_tab(&body)
}

/// Parses one tab's CSV export. Header names are matched case-insensitively
/// after trimming; rows without a scrip name or without a positive target
/// price are skipped.
pub fn parse_tab(body: &str) -> Result<Vec<StockRow>, BoxError> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());
    let headers = reader.headers()?.clone();
    let scrip_col = find_column(&headers, "scrip name").ok_or("missing Scrip Name column")?;
    let target_col = find_column(&headers, "target price").ok_or("missing Target Price column")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let scrip = record.get(scrip_col).unwrap_or("").trim();
        if scrip.is_empty() {
            continue;
        }
        let target: f64 = match record.get(target_col).unwrap_or("").trim().parse() {
            Ok(t) if t > 0.0 => t,
            _ => continue,
        };
        rows.push(StockRow::new(scrip.to_string(), target));
    }
    Ok(rows)
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}
