pub mod digest;
pub mod engine;
pub mod growth;
pub mod mailer;
pub mod news;
pub mod quotes;

pub use crate::domain::model::{Alert, Article, Bar, WatchlistEntry};
pub use crate::domain::ports::{Mailer, MarketData, NewsSource};
pub use crate::utils::error::Result;
