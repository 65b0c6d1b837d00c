//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the inventory spreadsheet lives
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// Look-ahead window
    #[serde(default)]
    pub alert: AlertConfig,

    /// SMTP delivery settings
    #[serde(default)]
    pub email: EmailConfig,

    /// Periodic check settings
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Empty values count as unset. Values that fail to parse are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env::EXPIRY_DAYS) {
            set_parsed(&mut self.alert.days, env::EXPIRY_DAYS, &v);
        }
        if let Some(v) = get(env::INVENTORY_FILE) {
            self.inventory.file_name = v;
        }
        if let Some(v) = get(env::SMTP_HOST) {
            self.email.smtp_host = v;
        }
        if let Some(v) = get(env::SMTP_PORT) {
            set_parsed(&mut self.email.smtp_port, env::SMTP_PORT, &v);
        }
        if let Some(v) = get(env::SMTP_SECURE) {
            self.email.smtp_secure = v.trim().eq_ignore_ascii_case("true");
        }
        if let Some(v) = get(env::EMAIL_USER) {
            self.email.user = Some(v);
        }
        if let Some(v) = get(env::EMAIL_PASS) {
            self.email.password = Some(v);
        }
        if let Some(v) = get(env::BAR_MANAGER_EMAIL) {
            self.email.recipient = Some(v);
        }
        if let Some(v) = get(env::SCHEDULE_TIMEZONE) {
            self.schedule.timezone = v;
        }
        if let Some(v) = get(env::CHECK_INTERVAL_MINUTES) {
            set_parsed(&mut self.schedule.interval_minutes, env::CHECK_INTERVAL_MINUTES, &v);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.inventory.file_name.trim().is_empty() {
            return Err(AppError::validation("inventory.file_name is empty"));
        }
        if self.email.smtp_host.trim().is_empty() {
            return Err(AppError::validation("email.smtp_host is empty"));
        }
        if self.email.smtp_port == 0 {
            return Err(AppError::validation("email.smtp_port must be > 0"));
        }
        if self.schedule.interval_minutes == 0 {
            return Err(AppError::validation(
                "schedule.interval_minutes must be > 0",
            ));
        }
        self.schedule.tz()?;
        Ok(())
    }
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, key: &str, raw: &str) {
    match raw.trim().parse() {
        Ok(value) => *slot = value,
        Err(_) => log::warn!("Ignoring {}={:?}: not a valid value", key, raw),
    }
}

/// Environment variable names understood by [`Config::apply_env_with`].
pub mod env {
    pub const EXPIRY_DAYS: &str = "EXPIRY_DAYS";
    pub const INVENTORY_FILE: &str = "INVENTORY_FILE";
    pub const SMTP_HOST: &str = "SMTP_HOST";
    pub const SMTP_PORT: &str = "SMTP_PORT";
    pub const SMTP_SECURE: &str = "SMTP_SECURE";
    pub const EMAIL_USER: &str = "EMAIL_USER";
    pub const EMAIL_PASS: &str = "EMAIL_PASS";
    pub const BAR_MANAGER_EMAIL: &str = "BAR_MANAGER_EMAIL";
    pub const SCHEDULE_TIMEZONE: &str = "SCHEDULE_TIMEZONE";
    pub const CHECK_INTERVAL_MINUTES: &str = "CHECK_INTERVAL_MINUTES";
}

/// Inventory spreadsheet location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// File name or path of the workbook
    #[serde(default = "defaults::file_name")]
    pub file_name: String,

    /// Extra directories searched after the package directory
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            file_name: defaults::file_name(),
            search_dirs: Vec::new(),
        }
    }
}

/// Look-ahead window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Days from today (inclusive) considered "expiring soon"
    #[serde(default = "defaults::days")]
    pub days: u32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            days: defaults::days(),
        }
    }
}

/// SMTP delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Implicit TLS when true, STARTTLS otherwise
    #[serde(default)]
    pub smtp_secure: bool,

    /// SMTP login, also used as the sender address
    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Alert recipient
    #[serde(default)]
    pub recipient: Option<String>,

    #[serde(default = "defaults::sender_name")]
    pub sender_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            smtp_secure: false,
            user: None,
            password: None,
            recipient: None,
            sender_name: defaults::sender_name(),
        }
    }
}

/// Login and destination needed to send an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpCredentials<'a> {
    pub user: &'a str,
    pub password: &'a str,
    pub recipient: &'a str,
}

impl EmailConfig {
    /// Whether every value needed to send is present.
    pub fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }

    /// Borrow login and recipient, failing when any is missing.
    pub fn credentials(&self) -> Result<SmtpCredentials<'_>> {
        let user = non_empty(&self.user);
        let password = non_empty(&self.password);
        let (Some(user), Some(password)) = (user, password) else {
            return Err(AppError::config(format!(
                "Email credentials not configured. Set {} and {}.",
                env::EMAIL_USER,
                env::EMAIL_PASS
            )));
        };
        let Some(recipient) = non_empty(&self.recipient) else {
            return Err(AppError::config(format!(
                "Alert recipient not configured. Set {}.",
                env::BAR_MANAGER_EMAIL
            )));
        };
        Ok(SmtpCredentials {
            user,
            password,
            recipient,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Periodic check settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes between checks
    #[serde(default = "defaults::interval_minutes")]
    pub interval_minutes: u64,

    /// IANA timezone that defines "today"
    #[serde(default = "defaults::timezone")]
    pub timezone: String,
}

impl ScheduleConfig {
    /// Parsed timezone.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|e| AppError::config(format!("Invalid timezone '{}': {}", self.timezone, e)))
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: defaults::interval_minutes(),
            timezone: defaults::timezone(),
        }
    }
}

mod defaults {
    // Inventory defaults
    pub fn file_name() -> String {
        "Bar_Inventory_Sample_125.xlsx".into()
    }

    // Alert defaults
    pub fn days() -> u32 {
        5
    }

    // Email defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }
    pub fn sender_name() -> String {
        "Inventory Monitoring System".into()
    }

    // Schedule defaults
    pub fn interval_minutes() -> u64 {
        1
    }
    pub fn timezone() -> String {
        "Asia/Kolkata".into()
    }
}
