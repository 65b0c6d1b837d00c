//! Pipeline entry points for expiry scanning.
//!
//! - `run_check`: Load the inventory, filter the window, optionally notify
//! - `run_watch`: Repeat `run_check` on a schedule

pub mod check;
pub mod watch;

pub use check::{CheckReport, NotificationStatus, NotifyPolicy, check_records, log_report, run_check};
pub use watch::{run_watch, run_watch_until};
