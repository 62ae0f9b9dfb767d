use crate::utils::error::{AlertError, Result};
use crate::MarketData;
use async_trait::async_trait;
use reqwest::Client;

const FUNCTION: &str = "TIME_SERIES_INTRADAY";
const INTERVAL: &str = "60min";

/// Alpha Vantage intraday quote client. Returns the raw JSON payload; the
/// growth calculator owns field extraction.
pub struct AlphaVantageClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl MarketData for AlphaVantageClient {
    async fn fetch_raw(&self, symbol: &str) -> Result<serde_json::Value> {
        tracing::debug!("Requesting intraday series for {}", symbol);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("function", FUNCTION),
                ("symbol", symbol),
                ("interval", INTERVAL),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Quote response status: {}", status);
        if !status.is_success() {
            return Err(AlertError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let raw = response.json().await?;
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_raw_returns_payload_unmodified() {
        let server = MockServer::start();
        let payload = serde_json::json!({
            "Meta Data": { "3. Last Refreshed": "2024-05-17 16:00:00" },
            "Time Series (60min)": {}
        });

        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/query")
                .query_param("function", "TIME_SERIES_INTRADAY")
                .query_param("symbol", "TSLA")
                .query_param("interval", "60min")
                .query_param("apikey", "demo-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(payload.clone());
        });

        let client = AlphaVantageClient::new(server.url("/query"), "demo-key");
        let raw = client.fetch_raw("TSLA").await.unwrap();

        api_mock.assert();
        assert_eq!(raw, payload);
    }

    #[tokio::test]
    async fn test_fetch_raw_error_status_carries_code() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/query");
            then.status(503);
        });

        let client = AlphaVantageClient::new(server.url("/query"), "demo-key");
        let err = client.fetch_raw("TSLA").await.unwrap_err();

        api_mock.assert();
        match err {
            AlertError::Status { status, .. } => assert_eq!(status, 503),
            other => panic!("expected Status error, got {:?}", other),
        }
    }
}
