// src/models/mod.rs

//! Domain models for the expiry scanner.
//!
//! Records as read from the spreadsheet, their presentation form, and the
//! application configuration.

mod config;
mod record;

// Re-export all public types
pub use config::{
    AlertConfig, Config, EmailConfig, InventoryConfig, ScheduleConfig, SmtpCredentials, env,
};
pub use record::{DateValue, ExpiringRecord, Field, InventoryRecord};
