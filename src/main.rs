use anyhow::{Context, Result};
use autofill_answers::{PredictionRequest, PredictionResponse, PredictionService, ServiceConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// JSON-lines driver: one `PredictionRequest` per stdin line,
/// one `PredictionResponse` per stdout line.
#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging (stderr, stdout carries responses)
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    // 2. Config + service
    let config = ServiceConfig::from_env().context("invalid configuration")?;
    if config.inference.api_key.is_none() {
        tracing::warn!("no inference credentials configured; only pattern memory can answer");
    }
    let service = PredictionService::from_config(&config)
        .await
        .context("failed to open pattern store")?;
    tracing::info!(model = %config.inference.model_id, "answer service ready");

    // 3. Request loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<PredictionRequest>(&line) {
            Ok(request) => service.predict(&request).await,
            Err(e) => {
                tracing::warn!("rejected malformed request: {}", e);
                PredictionResponse::empty(format!("invalid request: {}", e))
            }
        };

        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    let snap = service.telemetry_snapshot();
    tracing::info!(
        predictions = snap.prediction_stats.total,
        pattern_hits = snap.prediction_stats.pattern_hits,
        learned = snap.memory_stats.learned,
        "input closed, shutting down"
    );
    Ok(())
}
