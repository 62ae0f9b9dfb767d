use crate::config::Settings;
use crate::core::{digest, growth};
use crate::utils::error::Result;
use crate::{Alert, Mailer, MarketData, NewsSource, WatchlistEntry};
use std::time::Duration;
use tokio::sync::watch;

/// The poll driver. Generic over the three ports so tests can substitute
/// recording doubles for the providers and the relay.
pub struct AlertEngine<M, N, S> {
    market: M,
    news: N,
    mailer: S,
    settings: Settings,
}

impl<M: MarketData, N: NewsSource, S: Mailer> AlertEngine<M, N, S> {
    pub fn new(market: M, news: N, mailer: S, settings: Settings) -> Self {
        Self {
            market,
            news,
            mailer,
            settings,
        }
    }

    /// One sweep over the watchlist, in fixed order. A failure for one
    /// symbol is logged and the sweep continues with the next; this is a
    /// deliberate departure from fail-fast. Returns the number of alerts
    /// that fired.
    pub async fn run_once(&self) -> usize {
        let mut alerts_fired = 0;
        for entry in &self.settings.watchlist {
            match self.check_entry(entry).await {
                Ok(fired) => alerts_fired += usize::from(fired),
                Err(e) => {
                    tracing::error!("{}: check failed: {}", entry.symbol, e);
                    tracing::debug!("Recovery suggestion: {}", e.recovery_suggestion());
                }
            }
        }
        alerts_fired
    }

    /// Poll until the shutdown channel flips. The signal is checked at the
    /// top of each iteration and raced against the inter-sweep sleep, so
    /// shutdown never waits out a full poll interval.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let interval = Duration::from_secs(self.settings.alerts.poll_interval_secs);
        loop {
            if *shutdown.borrow() {
                break;
            }

            let fired = self.run_once().await;
            tracing::info!(
                "Sweep complete: {} of {} symbols alerted, next in {}s",
                fired,
                self.settings.watchlist.len(),
                interval.as_secs()
            );

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = shutdown.changed() => {
                    // A dropped sender counts as shutdown.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!("Shutdown requested, poll loop stopped");
    }

    async fn check_entry(&self, entry: &WatchlistEntry) -> Result<bool> {
        let raw = self.market.fetch_raw(&entry.symbol).await?;
        let bar = growth::latest_bar(&raw)?;
        let rate = bar.growth_rate();

        let alerts = &self.settings.alerts;
        if rate >= alerts.increase_threshold || rate < alerts.decrease_threshold {
            tracing::info!("{}: moved {:.2}% since open, alerting", entry.symbol, rate);
            self.alert(entry, rate).await?;
            Ok(true)
        } else {
            tracing::info!("{}: no major fluctuation ({:.2}%)", entry.symbol, rate);
            Ok(false)
        }
    }

    /// News, digest, then one delivery attempt per recipient. A failed
    /// delivery is logged and the remaining recipients are still tried.
    async fn alert(&self, entry: &WatchlistEntry, rate: f64) -> Result<()> {
        let articles = self.news.top_articles(&entry.name).await?;
        let alert = Alert {
            subject: digest::format_subject(entry, rate),
            body: digest::format_digest(&articles),
        };

        for recipient in &self.settings.mail.recipients {
            if let Err(e) = self.mailer.send(recipient, &alert).await {
                tracing::error!("Delivery to {} failed: {}", recipient, e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AlertError;
    use crate::Article;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct MockMarket {
        // growth percent per symbol; a missing symbol simulates a provider outage
        moves: HashMap<String, f64>,
    }

    impl MockMarket {
        fn new(moves: &[(&str, f64)]) -> Self {
            Self {
                moves: moves
                    .iter()
                    .map(|(s, m)| (s.to_string(), *m))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl MarketData for MockMarket {
        async fn fetch_raw(&self, symbol: &str) -> crate::Result<serde_json::Value> {
            let rate = self.moves.get(symbol).ok_or(AlertError::Status {
                status: 500,
                url: format!("https://quotes.test/{}", symbol),
            })?;
            let close = 100.0 + rate;
            Ok(serde_json::json!({
                "Meta Data": { "3. Last Refreshed": "2024-05-17 16:00:00" },
                "Time Series (60min)": {
                    "2024-05-17 16:00:00": {
                        "1. open": "100.0000",
                        "4. close": format!("{:.4}", close)
                    }
                }
            }))
        }
    }

    #[derive(Clone, Default)]
    struct MockNews {
        queries: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl NewsSource for MockNews {
        async fn top_articles(&self, company: &str) -> crate::Result<Vec<Article>> {
            self.queries.lock().await.push(company.to_string());
            Ok(vec![Article {
                title: format!("{} in the news", company),
                description: None,
                url: "https://news.test/1".to_string(),
            }])
        }
    }

    #[derive(Clone, Default)]
    struct MockMailer {
        sent: Arc<Mutex<Vec<(String, Alert)>>>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl Mailer for MockMailer {
        async fn send(&self, recipient: &str, alert: &Alert) -> crate::Result<()> {
            if self.fail_for.as_deref() == Some(recipient) {
                return Err(AlertError::Data("relay rejected".to_string()));
            }
            self.sent
                .lock()
                .await
                .push((recipient.to_string(), alert.clone()));
            Ok(())
        }
    }

    fn settings(watchlist: &[(&str, &str)], recipients: &[&str]) -> Settings {
        let mut settings = Settings::default();
        settings.watchlist = watchlist
            .iter()
            .map(|(name, symbol)| WatchlistEntry {
                name: name.to_string(),
                symbol: symbol.to_string(),
            })
            .collect();
        settings.mail.sender = "alerts@example.com".to_string();
        settings.mail.recipients = recipients.iter().map(|r| r.to_string()).collect();
        settings
    }

    #[tokio::test]
    async fn test_increase_alert_reaches_every_recipient() {
        let market = MockMarket::new(&[("TSLA", 6.0)]);
        let news = MockNews::default();
        let mailer = MockMailer::default();
        let engine = AlertEngine::new(
            market,
            news.clone(),
            mailer.clone(),
            settings(&[("Tesla", "TSLA")], &["a@example.com", "b@example.com"]),
        );

        let fired = engine.run_once().await;

        assert_eq!(fired, 1);
        assert_eq!(news.queries.lock().await.as_slice(), ["Tesla"]);

        let sent = mailer.sent.lock().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "a@example.com");
        assert!(sent[0].1.subject.contains("🔺"));
        assert!(sent[0].1.subject.contains("6.00"));
        assert!(sent[0].1.body.contains("Tesla in the news"));
    }

    #[tokio::test]
    async fn test_decrease_alert_uses_down_glyph() {
        let market = MockMarket::new(&[("AAPL", -5.01)]);
        let mailer = MockMailer::default();
        let engine = AlertEngine::new(
            market,
            MockNews::default(),
            mailer.clone(),
            settings(&[("Apple", "AAPL")], &["a@example.com"]),
        );

        assert_eq!(engine.run_once().await, 1);
        let sent = mailer.sent.lock().await;
        assert!(sent[0].1.subject.contains("🔻"));
        assert!(sent[0].1.subject.contains("-5.01"));
    }

    #[tokio::test]
    async fn test_quiet_market_sends_nothing() {
        let market = MockMarket::new(&[("TSLA", 0.0), ("AAPL", 4.99), ("GOOG", -5.0)]);
        let news = MockNews::default();
        let mailer = MockMailer::default();
        let engine = AlertEngine::new(
            market,
            news.clone(),
            mailer.clone(),
            settings(
                &[("Tesla", "TSLA"), ("Apple", "AAPL"), ("Alphabet", "GOOG")],
                &["a@example.com"],
            ),
        );

        // -5.0 sits exactly on the decrease threshold; the alert requires
        // strictly below, so none of the three fires.
        assert_eq!(engine.run_once().await, 0);
        assert!(news.queries.lock().await.is_empty());
        assert!(mailer.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_boundary_increase_fires() {
        let market = MockMarket::new(&[("TSLA", 5.0)]);
        let mailer = MockMailer::default();
        let engine = AlertEngine::new(
            market,
            MockNews::default(),
            mailer.clone(),
            settings(&[("Tesla", "TSLA")], &["a@example.com"]),
        );

        // >= on the increase side: exactly +5.00 alerts.
        assert_eq!(engine.run_once().await, 1);
        assert_eq!(mailer.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_symbol_does_not_stop_the_sweep() {
        // GOOG is absent from the mock, so its fetch returns a 500.
        let market = MockMarket::new(&[("TSLA", 6.0)]);
        let mailer = MockMailer::default();
        let engine = AlertEngine::new(
            market,
            MockNews::default(),
            mailer.clone(),
            settings(
                &[("Alphabet", "GOOG"), ("Tesla", "TSLA")],
                &["a@example.com"],
            ),
        );

        assert_eq!(engine.run_once().await, 1);
        let sent = mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.subject.contains("TSLA"));
    }

    #[tokio::test]
    async fn test_failed_recipient_does_not_stop_the_rest() {
        let market = MockMarket::new(&[("TSLA", 6.0)]);
        let mailer = MockMailer {
            fail_for: Some("a@example.com".to_string()),
            ..MockMailer::default()
        };
        let engine = AlertEngine::new(
            market,
            MockNews::default(),
            mailer.clone(),
            settings(&[("Tesla", "TSLA")], &["a@example.com", "b@example.com"]),
        );

        assert_eq!(engine.run_once().await, 1);
        let sent = mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "b@example.com");
    }

    #[tokio::test]
    async fn test_run_stops_when_shutdown_flips() {
        let market = MockMarket::new(&[("TSLA", 0.0)]);
        let engine = AlertEngine::new(
            market,
            MockNews::default(),
            MockMailer::default(),
            settings(&[("Tesla", "TSLA")], &["a@example.com"]),
        );

        let (tx, rx) = watch::channel(false);
        let run = engine.run(rx);
        tokio::pin!(run);

        // First sweep runs, then the engine parks in its sleep; the signal
        // must wake it instead of waiting out the interval.
        tokio::select! {
            _ = &mut run => panic!("engine stopped before shutdown"),
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
        }
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), run)
            .await
            .expect("engine did not stop after shutdown signal");
    }
}
