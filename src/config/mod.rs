use crate::utils::error::{AlertError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use crate::WatchlistEntry;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ALPHA_VANTAGE_ENDPOINT: &str = "https://www.alphavantage.co/query";
pub const NEWS_API_ENDPOINT: &str = "https://newsapi.org/v2/everything";

#[derive(Debug, Clone, Parser)]
#[command(name = "stock-news-alert")]
#[command(about = "Email a news digest when a watched stock swings past a threshold")]
pub struct CliConfig {
    /// TOML settings file; built-in defaults are used when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the poll interval from the settings file
    #[arg(long)]
    pub poll_interval_secs: Option<u64>,

    /// Run a single watchlist sweep and exit
    #[arg(long)]
    pub once: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub providers: ProvidersConfig,
    pub alerts: AlertsConfig,
    pub mail: MailConfig,
    pub watchlist: Vec<WatchlistEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub quote_endpoint: String,
    pub news_endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Growth rate (percent) at or above which an increase alert fires.
    pub increase_threshold: f64,
    /// Growth rate (percent) below which a decrease alert fires.
    pub decrease_threshold: f64,
    pub poll_interval_secs: u64,
    pub max_articles: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub relay_host: String,
    pub sender: String,
    pub recipients: Vec<String>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            quote_endpoint: ALPHA_VANTAGE_ENDPOINT.to_string(),
            news_endpoint: NEWS_API_ENDPOINT.to_string(),
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            increase_threshold: 5.0,
            decrease_threshold: -5.0,
            // The upstream data is hourly bars, so anything much shorter
            // than this only burns API quota.
            poll_interval_secs: 900,
            max_articles: 5,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_host: "smtp.gmail.com".to_string(),
            sender: String::new(),
            recipients: Vec::new(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let watchlist = [
            ("Tesla", "TSLA"),
            ("Apple", "AAPL"),
            ("Alphabet", "GOOG"),
            ("Facebook", "FB"),
        ]
        .into_iter()
        .map(|(name, symbol)| WatchlistEntry {
            name: name.to_string(),
            symbol: symbol.to_string(),
        })
        .collect();

        Self {
            providers: ProvidersConfig::default(),
            alerts: AlertsConfig::default(),
            mail: MailConfig::default(),
            watchlist,
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Resolve settings from the CLI: load the named file when given,
    /// otherwise start from built-in defaults, then apply flag overrides.
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(secs) = cli.poll_interval_secs {
            settings.alerts.poll_interval_secs = secs;
        }
        Ok(settings)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("providers.quote_endpoint", &self.providers.quote_endpoint)?;
        validate_url("providers.news_endpoint", &self.providers.news_endpoint)?;
        validate_positive_number(
            "alerts.poll_interval_secs",
            self.alerts.poll_interval_secs,
            1,
        )?;
        validate_positive_number("alerts.max_articles", self.alerts.max_articles as u64, 1)?;

        if self.alerts.increase_threshold <= self.alerts.decrease_threshold {
            return Err(AlertError::InvalidConfigValue {
                field: "alerts.increase_threshold".to_string(),
                value: self.alerts.increase_threshold.to_string(),
                reason: "increase threshold must be above the decrease threshold".to_string(),
            });
        }

        validate_non_empty_string("mail.relay_host", &self.mail.relay_host)?;
        validate_non_empty_string("mail.sender", &self.mail.sender)?;
        if self.mail.recipients.is_empty() {
            return Err(AlertError::MissingConfig {
                field: "mail.recipients".to_string(),
            });
        }
        for recipient in &self.mail.recipients {
            validate_non_empty_string("mail.recipients", recipient)?;
        }

        if self.watchlist.is_empty() {
            return Err(AlertError::MissingConfig {
                field: "watchlist".to_string(),
            });
        }
        for entry in &self.watchlist {
            validate_non_empty_string("watchlist.name", &entry.name)?;
            validate_non_empty_string("watchlist.symbol", &entry.symbol)?;
        }

        Ok(())
    }
}

/// Secrets, supplied through the process environment only and never read
/// from the settings file.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub alpha_vantage_key: String,
    pub news_api_key: String,
    pub smtp_user: String,
    pub smtp_password: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            alpha_vantage_key: require_env("ALPHAVANTAGE_API_KEY")?,
            news_api_key: require_env("NEWS_API_KEY")?,
            smtp_user: require_env("SMTP_USER")?,
            smtp_password: require_env("SMTP_PASSWORD")?,
        })
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("ALPHAVANTAGE_API_KEY", &self.alpha_vantage_key)?;
        validate_non_empty_string("NEWS_API_KEY", &self.news_api_key)?;
        validate_non_empty_string("SMTP_USER", &self.smtp_user)?;
        validate_non_empty_string("SMTP_PASSWORD", &self.smtp_password)?;
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| AlertError::MissingConfig {
        field: name.to_string(),
    })
}
