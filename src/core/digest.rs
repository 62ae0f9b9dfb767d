//! Pure rendering of alert subjects and digest bodies. No I/O here, so the
//! exact mail text is testable byte for byte.

use crate::{Article, WatchlistEntry};
use std::fmt::Write;

const DIVIDER: &str = "_______________________________________";
const SIGNATURE: &str = " Message sent by Stock Trading Alert Program";

/// Render an ordered article list into the mail body. An absent description
/// renders as a literal `None` placeholder.
pub fn format_digest(articles: &[Article]) -> String {
    let mut body = String::new();
    for article in articles {
        let description = article.description.as_deref().unwrap_or("None");
        body.push('\n');
        let _ = write!(
            body,
            "\nTitle: {}\n\nBrief Description: \n{}\n\nFor more details visit the following url: {}\n\n{}",
            article.title, description, article.url, DIVIDER
        );
    }
    body.push('\n');
    body.push_str(SIGNATURE);
    body
}

/// Subject line for a threshold crossing, e.g.
/// `Tesla's Stock 'TSLA': 🔺 %6.00`. The glyph follows the sign of the
/// rate; the percentage is rounded to two decimals here and nowhere else.
pub fn format_subject(entry: &WatchlistEntry, growth_rate: f64) -> String {
    let glyph = if growth_rate >= 0.0 { "🔺" } else { "🔻" };
    format!(
        "{}'s Stock '{}': {} %{:.2}",
        entry.name, entry.symbol, glyph, growth_rate
    )
}
