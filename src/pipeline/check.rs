// src/pipeline/check.rs

//! One expiry check: load, filter, and optionally notify.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::models::{ExpiringRecord, InventoryRecord};
use crate::services::{InventorySource, Notifier, NotifyOutcome, filter_expiring, load_records};
use crate::utils::log as console;

/// When a check should hand its results to the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyPolicy {
    /// Report only
    Never,
    /// Always attempt, surfacing missing configuration as a failure
    Always,
    /// Attempt only when the notifier is fully configured
    IfConfigured,
}

/// What happened to the notification step of a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationStatus {
    NotRequested,
    NothingToReport,
    Skipped { reason: String },
    Sent(NotifyOutcome),
    Failed { error: String },
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub days: u32,
    pub reference_date: NaiveDate,
    /// Rows read from the sheet
    pub scanned: usize,
    pub records: Vec<ExpiringRecord>,
    pub notification: NotificationStatus,
}

impl CheckReport {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Whether delivery was attempted and failed.
    pub fn notification_failed(&self) -> bool {
        matches!(self.notification, NotificationStatus::Failed { .. })
    }
}

/// Load the inventory and run a check against it.
///
/// Loader failures abort the check. Notification failures are recorded in
/// the report and never discard the expiring records.
pub async fn run_check(
    source: &InventorySource,
    notifier: &dyn Notifier,
    days: u32,
    today: NaiveDate,
    policy: NotifyPolicy,
) -> Result<CheckReport> {
    let records = load_records(source)?;
    Ok(check_records(&records, notifier, days, today, policy).await)
}

/// Run a check against records that are already loaded.
pub async fn check_records(
    records: &[InventoryRecord],
    notifier: &dyn Notifier,
    days: u32,
    today: NaiveDate,
    policy: NotifyPolicy,
) -> CheckReport {
    let expiring = filter_expiring(records, days, today);

    let notification = if expiring.is_empty() {
        NotificationStatus::NothingToReport
    } else {
        match policy {
            NotifyPolicy::Never => NotificationStatus::NotRequested,
            NotifyPolicy::IfConfigured if !notifier.is_configured() => {
                NotificationStatus::Skipped {
                    reason: "email not configured".to_string(),
                }
            }
            NotifyPolicy::Always | NotifyPolicy::IfConfigured => {
                match notifier.notify(&expiring, days).await {
                    Ok(outcome) => NotificationStatus::Sent(outcome),
                    Err(e) => NotificationStatus::Failed {
                        error: e.to_string(),
                    },
                }
            }
        }
    };

    CheckReport {
        days,
        reference_date: today,
        scanned: records.len(),
        records: expiring,
        notification,
    }
}

/// Log a check report in the console style of the CLI.
pub fn log_report(report: &CheckReport, destination: &str) {
    if report.records.is_empty() {
        console::success(&format!("No items expiring within {} days", report.days));
    } else {
        log::warn!(
            "Found {} item(s) expiring within {} days:",
            report.count(),
            report.days
        );
        for (index, record) in report.records.iter().enumerate() {
            let name = if record.product_name.is_empty() {
                "N/A"
            } else {
                record.product_name.as_str()
            };
            console::sub_item(&format!(
                "{}. {} (Expires: {})",
                index + 1,
                name,
                record.expiry_date
            ));
        }
    }

    match &report.notification {
        NotificationStatus::NotRequested | NotificationStatus::NothingToReport => {}
        NotificationStatus::Skipped { reason } => {
            log::warn!("Alert skipped: {}", reason);
        }
        NotificationStatus::Sent(outcome) if outcome.success => {
            console::success(&format!("Alert sent to {}", destination));
            if let Some(id) = &outcome.message_id {
                console::sub_item(&format!("Message ID: {}", id));
            }
        }
        NotificationStatus::Sent(outcome) => {
            log::warn!("Alert result: {}", outcome.message);
        }
        NotificationStatus::Failed { error } => {
            log::error!(
                "Found {} expiring item(s) but the alert failed: {}",
                report.count(),
                error
            );
        }
    }
}
