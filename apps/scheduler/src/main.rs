use std::sync::Arc;

use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod demo;

use appointment_cell::services::{InMemoryDirectory, Notifier, SchedulingService, TracingNotifier};
use shared_config::AppConfig;
use shared_utils::{Clock, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic scheduler");

    // Load configuration
    let config = AppConfig::from_env();
    info!(
        "Clinic open {} - {}, availability linkage {}",
        config.opening_time, config.closing_time, config.require_availability_window
    );

    // Wire the scheduling core over in-process adapters
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let directory = Arc::new(InMemoryDirectory::new());
    demo::seed_directory(&directory).await;

    let service = SchedulingService::in_memory(&config, directory, Arc::clone(&clock));
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);

    let deliveries = demo::run(&service, notifier, clock.now().date()).await?;

    // Notifications are fire-and-forget; only wait so the process does not exit first.
    for delivery in deliveries {
        if let Err(e) = delivery.await {
            warn!("Notification task aborted: {}", e);
        }
    }

    info!("Clinic scheduler finished");
    Ok(())
}
