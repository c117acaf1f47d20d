//! Booking demo entry point.

use std::process::ExitCode;

use app::{BookingSystem, Config, LogFormat};
use saga::NotificationService;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::FAILURE;
        }
    };

    // 2. Initialize tracing
    init_tracing(&config);
    tracing::info!(?config, "starting booking demo");

    // 3. Wire the in-memory system and run one booking
    let system = BookingSystem::in_memory();
    let report = match app::run_demo(&system, &config).await {
        Ok(report) => report,
        Err(error) => {
            tracing::error!(%error, "invalid demo configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(topics = ?report.topics, "published events");

    if !report.succeeded() {
        if let Some(reservation) = &report.reservation {
            tracing::info!(
                reservation_id = %reservation.id(),
                status = %reservation.status(),
                reason = ?reservation.cancellation_reason(),
                "booking not confirmed"
            );
        }
        return ExitCode::FAILURE;
    }

    // 4. Receipt delivery is best-effort
    if let Some(payment) = &report.payment {
        if let Err(error) = system.notifications.send_payment_receipt(payment).await {
            tracing::warn!(%error, "payment receipt not sent");
        }
    }

    tracing::info!("booking demo finished");
    ExitCode::SUCCESS
}
