use anyhow::Result;
use reqwest::Client;
use tigerscraper::collect::{mortality, occurrence, reserves};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    let client = Client::new();

    // ─── 2) reserve listing ──────────────────────────────────────────
    let reserves = reserves::fetch_reserves(&client).await?;
    info!(count = reserves.len(), "tiger reserves");

    // ─── 3) mortality records ────────────────────────────────────────
    let report = mortality::fetch_mortality(&client).await?;
    info!(
        rows = report.records.len(),
        columns = report.columns.len(),
        "tiger mortality records"
    );

    // ─── 4) occurrence records ───────────────────────────────────────
    let occurrences = occurrence::fetch_occurrences(&client).await?;
    info!(count = occurrences.len(), "tiger occurrences");

    info!("all done");
    Ok(())
}
