use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maksudi_demo::DemoConfig;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maksudi=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = DemoConfig::from_env()?;
    tracing::info!(
        schema = ?config.schema_path,
        data = ?config.data_path,
        "Loaded demo configuration"
    );

    let report = maksudi_demo::run(&config)?;
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{json}");

    if !report.validation.valid {
        tracing::info!(errors = report.validation.errors.len(), "Answers did not validate");
    }
    Ok(())
}
