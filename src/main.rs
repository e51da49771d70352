use anyhow::{Context, Result};
use rest_i18n::config::Config;
use rest_i18n::i18n::I18n;
use rest_i18n::server;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rest_i18n=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    info!("Loading message catalog from {}", config.messages_file);
    let i18n = I18n::new(config.i18n_options()?).context("Invalid i18n configuration")?;
    info!(
        "Loaded {} locales, default locale \"{}\"",
        i18n.snapshot().messages().len(),
        i18n.locale()
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);
    axum::serve(listener, server::app(i18n)).await?;

    Ok(())
}
