pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{CliConfig, Credentials, Settings};
pub use core::engine::AlertEngine;
pub use core::mailer::SmtpMailer;
pub use core::news::NewsApiClient;
pub use core::quotes::AlphaVantageClient;
pub use domain::model::{Alert, Article, Bar, WatchlistEntry};
pub use domain::ports::{Mailer, MarketData, NewsSource};
pub use utils::error::{AlertError, Result};
