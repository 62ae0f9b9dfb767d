use crate::utils::error::{AlertError, Result};
use crate::Bar;
use serde_json::Value;

const META_DATA: &str = "Meta Data";
const LAST_REFRESHED: &str = "3. Last Refreshed";
const TIME_SERIES: &str = "Time Series (60min)";
const OPEN: &str = "1. open";
const CLOSE: &str = "4. close";

/// Extract the most recently refreshed bar from a raw intraday payload.
///
/// Alpha Vantage keys the series by timestamp and names the freshest one in
/// the metadata, so this is two lookups plus two string-to-decimal parses.
/// An error payload (rate-limit note, bad symbol) lacks these keys and is
/// reported as malformed data rather than a quote of zero.
pub fn latest_bar(raw: &Value) -> Result<Bar> {
    let timestamp = raw
        .get(META_DATA)
        .and_then(|meta| meta.get(LAST_REFRESHED))
        .and_then(Value::as_str)
        .ok_or_else(|| AlertError::Data(format!("{META_DATA} -> {LAST_REFRESHED}")))?;

    let entry = raw
        .get(TIME_SERIES)
        .and_then(|series| series.get(timestamp))
        .ok_or_else(|| AlertError::Data(format!("{TIME_SERIES} -> {timestamp}")))?;

    let open = price_field(entry, OPEN)?;
    let close = price_field(entry, CLOSE)?;

    // A zero open would make the growth rate non-finite. The provider never
    // sends one for a live symbol, so treat it as a malformed payload
    // instead of letting a NaN comparison silently suppress the alert.
    if open == 0.0 {
        return Err(AlertError::Data(format!("{OPEN} is zero")));
    }

    Ok(Bar {
        timestamp: timestamp.to_string(),
        open,
        close,
    })
}

fn price_field(entry: &Value, key: &str) -> Result<f64> {
    let text = entry
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| AlertError::Data(key.to_string()))?;
    text.parse()
        .map_err(|_| AlertError::Data(format!("{key}: not a decimal: {text}")))
}
