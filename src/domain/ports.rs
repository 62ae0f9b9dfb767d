use crate::domain::model::{Alert, Article};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Intraday quote source. Returns the provider's JSON payload unmodified;
/// field extraction is the growth calculator's job.
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn fetch_raw(&self, symbol: &str) -> Result<serde_json::Value>;
}

/// Relevance-sorted news lookup by company display name.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn top_articles(&self, company: &str) -> Result<Vec<Article>>;
}

/// Delivers one alert to one recipient. The driver loops over recipients so
/// it can decide what a single failed delivery means for the rest.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipient: &str, alert: &Alert) -> Result<()>;
}
