//! Shelfwatch CLI
//!
//! Local execution entry point for one-off checks and the periodic watcher.

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use shelfwatch::{
    error::{AppError, Result},
    models::Config,
    pipeline::{self, CheckReport, NotifyPolicy},
    services::{EmailNotifier, ExpiryWindow, InventorySource, Notifier},
    utils::{self, date, log as console},
};

/// Shelfwatch - Inventory Expiry Alerts
#[derive(Parser, Debug)]
#[command(name = "shelfwatch", version, about = "Inventory expiry scanner and alerter")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List items expiring within the window without sending anything
    List {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Scan the inventory and email an alert for expiring items
    Check {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Check on a schedule until interrupted
    Watch,

    /// Validate configuration and locate the inventory file
    Validate,

    /// Show the effective configuration
    Info,
}

#[derive(clap::Args, Debug)]
struct ScanArgs {
    /// Look-ahead window in days (default: from config)
    #[arg(short, long)]
    days: Option<u32>,

    /// Reference date as YYYY-MM-DD (default: today in the configured timezone)
    #[arg(long, value_parser = parse_day)]
    today: Option<NaiveDate>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn parse_day(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, date::CANONICAL_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("Loaded environment from {}", path.display());
    }

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();
    log::debug!("Loaded configuration from {}", cli.config.display());

    let source = InventorySource::from_config(&config.inventory);
    let notifier = EmailNotifier::new(config.email.clone());

    match cli.command {
        Command::List { scan } => {
            let report = scan_once(&config, &source, &notifier, &scan, NotifyPolicy::Never).await?;
            print_report(&report, &notifier, scan.json)?;
        }

        Command::Check { scan } => {
            let report = scan_once(&config, &source, &notifier, &scan, NotifyPolicy::Always).await?;
            print_report(&report, &notifier, scan.json)?;

            if let pipeline::NotificationStatus::Failed { error } = report.notification {
                return Err(AppError::notification(error));
            }
        }

        Command::Watch => {
            config.validate()?;
            pipeline::run_watch(&config, &source, &notifier).await?;
        }

        Command::Validate => {
            console::step(1, 3, "Validating configuration");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            console::success("Config OK");

            console::step(2, 3, "Locating inventory file");
            match source.resolve() {
                Ok(path) => console::success(&format!("Inventory file: {}", path.display())),
                Err(e) => {
                    log::error!("{}", e);
                    return Err(e);
                }
            }

            console::step(3, 3, "Checking email delivery");
            if notifier.is_configured() {
                console::success("Email delivery configured");
            } else if let Err(e) = config.email.credentials() {
                log::warn!("{}", e);
            }

            log::info!("All validations passed!");
        }

        Command::Info => {
            console::summary(
                "Configuration",
                &[
                    ("Config file", cli.config.display().to_string()),
                    ("Inventory file", config.inventory.file_name.clone()),
                    (
                        "Search paths",
                        source
                            .candidates()
                            .iter()
                            .map(|p| p.display().to_string())
                            .collect::<Vec<_>>()
                            .join(", "),
                    ),
                    ("Look-ahead window", format!("{} days", config.alert.days)),
                    (
                        "SMTP",
                        format!(
                            "{}:{} ({})",
                            config.email.smtp_host,
                            config.email.smtp_port,
                            if config.email.smtp_secure { "TLS" } else { "STARTTLS" }
                        ),
                    ),
                    ("Email user", config.email.user.clone().unwrap_or_else(|| "(not set)".into())),
                    ("Email password", utils::mask(config.email.password.as_deref())),
                    ("Recipient", notifier.destination()),
                    (
                        "Schedule",
                        format!(
                            "every {} minute(s), {}",
                            config.schedule.interval_minutes, config.schedule.timezone
                        ),
                    ),
                ],
            );
        }
    }

    Ok(())
}

/// Run one check with CLI overrides applied.
async fn scan_once(
    config: &Config,
    source: &InventorySource,
    notifier: &dyn Notifier,
    scan: &ScanArgs,
    policy: NotifyPolicy,
) -> Result<CheckReport> {
    let days = scan.days.unwrap_or(config.alert.days);
    let window = match scan.today {
        Some(day) => ExpiryWindow::new(day, days),
        None => ExpiryWindow::at(&Utc::now().with_timezone(&config.schedule.tz()?), days),
    };

    log::info!(
        "Checking {} for items expiring {} through {}",
        config.inventory.file_name,
        date::canonical(window.today),
        date::canonical(window.last_day)
    );

    pipeline::run_check(source, notifier, days, window.today, policy).await
}

fn print_report(report: &CheckReport, notifier: &dyn Notifier, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        pipeline::log_report(report, &notifier.destination());
    }
    Ok(())
}
