//! Service layer for the expiry scanner.
//!
//! This module contains the business logic for:
//! - Reading inventory workbooks (`load_records`)
//! - Selecting records inside the look-ahead window (`filter_expiring`)
//! - Rendering alert emails (`report`)
//! - Delivering alerts (`Notifier`, `EmailNotifier`)

mod filter;
mod loader;
mod notifier;
pub mod report;

pub use filter::{ExpiryWindow, filter_expiring};
pub use loader::{InventorySource, load_records, read_workbook, records_from_rows};
pub use notifier::{EmailNotifier, Notifier, NotifyOutcome};
