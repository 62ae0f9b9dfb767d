use clap::Parser;
use stock_news_alert::utils::error::ErrorSeverity;
use stock_news_alert::utils::{logger, validation::Validate};
use stock_news_alert::{
    AlertEngine, AlertError, AlphaVantageClient, CliConfig, Credentials, NewsApiClient, Settings,
    SmtpMailer,
};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting stock-news-alert");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = Settings::resolve(&cli).unwrap_or_else(|e| config_failure(&e));
    if let Err(e) = settings.validate() {
        config_failure(&e);
    }

    let credentials = Credentials::from_env().unwrap_or_else(|e| config_failure(&e));
    if let Err(e) = credentials.validate() {
        config_failure(&e);
    }

    tracing::info!(
        "Watching {} symbols, alert thresholds {:+.1}% / {:+.1}%",
        settings.watchlist.len(),
        settings.alerts.increase_threshold,
        settings.alerts.decrease_threshold
    );

    let market = AlphaVantageClient::new(
        settings.providers.quote_endpoint.clone(),
        credentials.alpha_vantage_key.clone(),
    );
    let news = NewsApiClient::new(
        settings.providers.news_endpoint.clone(),
        credentials.news_api_key.clone(),
        settings.alerts.max_articles,
    );
    let mailer = SmtpMailer::new(
        settings.mail.relay_host.clone(),
        settings.mail.sender.clone(),
        credentials.smtp_user,
        credentials.smtp_password,
    );

    let engine = AlertEngine::new(market, news, mailer, settings);

    if cli.once {
        let fired = engine.run_once().await;
        tracing::info!("Single sweep complete, {} alerts fired", fired);
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, finishing current sweep");
            let _ = shutdown_tx.send(true);
        }
    });

    engine.run(shutdown_rx).await;
    Ok(())
}

fn config_failure(e: &AlertError) -> ! {
    tracing::error!("❌ Configuration validation failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
