//! Application configuration management.

use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger policy and locale settings.
    pub ledger: LedgerSettings,
    /// Outbound notification configuration.
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger policy and locale settings.
///
/// These are deployment constants: one currency, one organizational time
/// zone (all effective dates are interpreted in it — never host-local
/// time), and the two booking conventions the factory honors.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSettings {
    /// The organization's time zone (IANA name, e.g. "Africa/Cairo").
    #[serde(default = "default_timezone")]
    pub timezone: chrono_tz::Tz,
    /// The deployment currency.
    #[serde(default = "default_currency")]
    pub currency: Currency,
    /// Book the POS commission as a separate outflow entry.
    #[serde(default)]
    pub book_pos_commission: bool,
    /// Which direction a check settlement is booked in.
    #[serde(default)]
    pub settlement_direction: SettlementDirection,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            currency: default_currency(),
            book_pos_commission: false,
            settlement_direction: SettlementDirection::default(),
        }
    }
}

fn default_timezone() -> chrono_tz::Tz {
    chrono_tz::Africa::Cairo
}

fn default_currency() -> Currency {
    Currency::Egp
}

/// Deployment convention for the direction of check-settlement entries.
///
/// The default is `Inflow`: the register's primary flow is customer checks
/// deposited into a bank account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementDirection {
    /// Settlements are booked as money in.
    #[default]
    Inflow,
    /// Settlements are booked as money out.
    Outflow,
}

/// Outbound notification (SMTP) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// SMTP server host.
    pub smtp_host: String,
    /// SMTP server port.
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_username: String,
    /// SMTP password.
    pub smtp_password: String,
    /// From address for notification mail.
    pub from_email: String,
    /// From display name.
    pub from_name: String,
    /// Addresses that receive back-dated / hard-delete notifications.
    #[serde(default)]
    pub recipients: Vec<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "ledger@tesoro.local".to_string(),
            from_name: "Tesoro Ledger".to_string(),
            recipients: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TESORO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_settings_defaults() {
        let settings = LedgerSettings::default();
        assert_eq!(settings.timezone, chrono_tz::Africa::Cairo);
        assert_eq!(settings.currency, Currency::Egp);
        assert!(!settings.book_pos_commission);
        assert_eq!(settings.settlement_direction, SettlementDirection::Inflow);
    }

    #[test]
    fn test_notify_config_default() {
        let config = NotifyConfig::default();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
        assert!(config.recipients.is_empty());
    }
}
