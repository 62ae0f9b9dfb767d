use serde::{Deserialize, Serialize};

/// One monitored stock: a display name for news queries and the ticker
/// symbol for quote requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub name: String,
    pub symbol: String,
}

/// The most recently refreshed intraday bar of a quote response.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Provider-formatted timestamp of the bar, kept verbatim.
    pub timestamp: String,
    pub open: f64,
    pub close: f64,
}

impl Bar {
    /// Open-to-close percentage change. No rounding; two-decimal rounding
    /// happens only when the alert subject is rendered.
    pub fn growth_rate(&self) -> f64 {
        (self.close - self.open) / self.open * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
}

/// A rendered alert, sent as-is to every configured recipient.
#[derive(Debug, Clone)]
pub struct Alert {
    pub subject: String,
    pub body: String,
}
