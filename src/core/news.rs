use crate::utils::error::{AlertError, Result};
use crate::{Article, NewsSource};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(rename = "totalResults")]
    total_results: usize,
    articles: Vec<Article>,
}

/// NewsAPI `/v2/everything` client, querying by company name in the title
/// and keeping the provider's relevance order.
pub struct NewsApiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    max_articles: usize,
}

impl NewsApiClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        max_articles: usize,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            max_articles,
        }
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn top_articles(&self, company: &str) -> Result<Vec<Article>> {
        tracing::debug!("Requesting news with '{}' in the title", company);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("qInTitle", company),
                ("language", "en"),
                ("sortBy", "relevancy"),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("News response status: {}", status);
        if !status.is_success() {
            return Err(AlertError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body: NewsResponse = response.json().await?;
        tracing::debug!(
            "News query for '{}' matched {} articles",
            company,
            body.total_results
        );

        let mut articles = body.articles;
        articles.truncate(body.total_results.min(self.max_articles));
        Ok(articles)
    }
}
