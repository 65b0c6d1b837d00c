// src/services/filter.rs

//! Expiry window filter.
//!
//! A record is expiring when its expiry date falls in `[today, today + days]`,
//! both ends inclusive. Records whose expiry cannot be resolved to a date are
//! dropped without error so one dirty row never aborts a scan.

use chrono::{DateTime, Days, NaiveDate, TimeZone};

use crate::models::{ExpiringRecord, InventoryRecord};

/// Inclusive calendar window starting at a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryWindow {
    pub today: NaiveDate,
    pub last_day: NaiveDate,
}

impl ExpiryWindow {
    /// Window of `days` days after `today`. Saturates at the calendar's end.
    pub fn new(today: NaiveDate, days: u32) -> Self {
        let last_day = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { today, last_day }
    }

    /// Window anchored on the local calendar day of `reference`.
    pub fn at<Tz: TimeZone>(reference: &DateTime<Tz>, days: u32) -> Self {
        Self::new(reference.date_naive(), days)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.today <= date && date <= self.last_day
    }
}

/// Records expiring within `days` of `today`, in input order.
pub fn filter_expiring(
    records: &[InventoryRecord],
    days: u32,
    today: NaiveDate,
) -> Vec<ExpiringRecord> {
    let window = ExpiryWindow::new(today, days);
    let mut skipped = 0usize;

    let expiring = records
        .iter()
        .filter_map(|record| {
            let Some(expiry) = record.expiry_date.resolve() else {
                if !record.expiry_date.is_empty() {
                    log::debug!(
                        "Skipping '{}': unreadable expiry date {:?}",
                        record.product_name,
                        record.expiry_date
                    );
                }
                skipped += 1;
                return None;
            };
            window
                .contains(expiry)
                .then(|| ExpiringRecord::from_record(record, expiry))
        })
        .collect::<Vec<_>>();

    if skipped > 0 {
        log::debug!("{} of {} records had no usable expiry date", skipped, records.len());
    }

    expiring
}
