// src/quotes.rs
use reqwest::Client;
use serde::Deserialize;

use crate::error::BoxError;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    close: Option<Vec<Option<f64>>>,
}

/// Fetches the latest intraday close for one symbol. `Ok(None)` means the
/// response parsed but carried no usable price bars.
pub async fn fetch_price(client: &Client, symbol: &str) -> Result<Option<f64>, BoxError> {
    let url = format!(
        "{}/{}?range=1d&interval=5m",
        CHART_URL,
        urlencoding::encode(symbol)
    );
    let response: ChartResponse = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(latest_close(&response))
}

/// Picks the second-to-last non-null close when at least two bars exist.
/// The final bar is still forming during market hours, so the one before
/// it is the last settled price.
fn latest_close(response: &ChartResponse) -> Option<f64> {
    let closes: Vec<f64> = response
        .chart
        .result
        .as_ref()?
        .first()?
        .indicators
        .quote
        .first()?
        .close
        .as_ref()?
        .iter()
        .filter_map(|c| *c)
        .collect();
    let price = match closes.len() {
        0 => return None,
        1 => closes[0],
        n => closes[n - 2],
    };
    Some((price * 100.0).round() / 100.0)
}
