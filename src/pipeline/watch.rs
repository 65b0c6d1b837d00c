// src/pipeline/watch.rs

//! Periodic expiry checks.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::models::Config;
use crate::services::{ExpiryWindow, InventorySource, Notifier};
use crate::utils::log as console;

use super::check::{NotifyPolicy, log_report, run_check};

/// Run checks on the configured interval until SIGINT or SIGTERM.
pub async fn run_watch(
    config: &Config,
    source: &InventorySource,
    notifier: &dyn Notifier,
) -> Result<usize> {
    run_watch_until(config, source, notifier, wait_for_shutdown_signal()).await
}

/// Run checks on the configured interval until `shutdown` resolves.
///
/// The first check runs immediately. A failed check is logged and the
/// schedule carries on. Returns the number of checks performed.
pub async fn run_watch_until<F>(
    config: &Config,
    source: &InventorySource,
    notifier: &dyn Notifier,
    shutdown: F,
) -> Result<usize>
where
    F: Future<Output = ()>,
{
    let tz = config.schedule.tz()?;
    let days = config.alert.days;
    let period = Duration::from_secs(config.schedule.interval_minutes.max(1) * 60);

    console::header("Expiry watcher");
    console::sub_item(&format!(
        "Check interval: every {} minute(s)",
        config.schedule.interval_minutes
    ));
    console::sub_item(&format!("Expiry threshold: {} days", days));
    console::sub_item(&format!("Timezone: {}", tz));
    console::sub_item(&format!(
        "Email configured: {}",
        if notifier.is_configured() { "yes" } else { "no" }
    ));
    console::sub_item(&format!("Recipient: {}", notifier.destination()));

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut checks = 0usize;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let now = Utc::now().with_timezone(&tz);
                let window = ExpiryWindow::at(&now, days);
                console::separator();
                log::info!(
                    "[{}] Checking for items expiring within {} days...",
                    now.format("%Y-%m-%d %H:%M:%S %Z"),
                    days
                );

                match run_check(source, notifier, days, window.today, NotifyPolicy::IfConfigured).await {
                    Ok(report) => log_report(&report, &notifier.destination()),
                    Err(e) => log::error!("Error during expiry check: {}", e),
                }
                checks += 1;
            }
        }
    }

    log::info!("Watcher stopped after {} check(s)", checks);
    Ok(checks)
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                log::warn!("Could not register signal handlers; falling back to Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    log::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmailConfig;
    use crate::services::EmailNotifier;
    use tempfile::TempDir;

    #[tokio::test(start_paused = true)]
    async fn test_failed_checks_do_not_stop_watcher() {
        let dir = TempDir::new().unwrap();
        let source = InventorySource::search("absent.xlsx", vec![dir.path().to_path_buf()]);
        let notifier = EmailNotifier::new(EmailConfig::default());
        let config = Config::default();

        // Every check fails to find the workbook; ticks at 0s, 60s and 120s still run.
        let shutdown = tokio::time::sleep(Duration::from_secs(150));
        let checks = run_watch_until(&config, &source, &notifier, shutdown)
            .await
            .unwrap();
        assert!(checks >= 2, "only {checks} check(s) ran");
    }

    #[tokio::test]
    async fn test_invalid_timezone_is_rejected() {
        let source = InventorySource::search("absent.xlsx", Vec::new());
        let notifier = EmailNotifier::new(EmailConfig::default());
        let mut config = Config::default();
        config.schedule.timezone = "Nowhere/Special".into();

        let result = run_watch_until(&config, &source, &notifier, async {}).await;
        assert!(result.is_err());
    }
}
