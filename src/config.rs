//! Runtime configuration
//!
//! All settings are read from the environment (optionally seeded from a
//! `.env` file) exactly once at startup, validated before any I/O happens,
//! and passed by reference into each component. Nothing in this crate reads
//! the environment after startup.

use crate::error::{Error, Result};
use std::path::Path;
use std::time::Duration;

/// Upper bound the source API accepts for the page-size query parameter
pub const MAX_PAGE_SIZE: u32 = 250;

/// Complete settings for one sync run
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Source API settings
    pub shop: ShopSettings,
    /// Fetch-loop tuning
    pub fetch: FetchSettings,
    /// SSH tunnel endpoint
    pub tunnel: TunnelSettings,
    /// Warehouse sink settings
    pub warehouse: WarehouseSettings,
}

/// Source API identity and credentials
#[derive(Debug, Clone)]
pub struct ShopSettings {
    /// Shop domain (`my-shop.example.com`); a full `http(s)://` base is
    /// accepted as-is, which is what mock-server tests rely on
    pub domain: String,
    /// Static access token sent on every request
    pub access_token: String,
    /// API version segment of the products URL
    pub api_version: String,
}

/// Fetch-loop tuning knobs
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Items requested per page (capped at [`MAX_PAGE_SIZE`])
    pub page_size: u32,
    /// Pause between successful page fetches
    pub page_delay: Duration,
    /// Pause before re-requesting a rate-limited page
    pub rate_limit_cooldown: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
}

/// SSH endpoint the warehouse is reached through
#[derive(Debug, Clone)]
pub struct TunnelSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

/// Warehouse host and table, as seen from the far end of the tunnel
#[derive(Debug, Clone)]
pub struct WarehouseSettings {
    /// Database host resolved on the SSH server's network
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Snapshot table name
    pub table: String,
    /// Rows per bulk-insert statement
    pub batch_size: usize,
}

impl SyncSettings {
    /// Load settings from the process environment, seeding it from `./.env`
    /// when present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from the process environment after seeding it from a
    /// specific env file
    pub fn from_env_file(path: &Path) -> Result<Self> {
        dotenvy::from_path(path)
            .map_err(|e| Error::config(format!("failed to load {}: {e}", path.display())))?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    ///
    /// This is the seam unit tests use to exercise validation without
    /// touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| lookup(key).ok_or_else(|| Error::missing_field(key));

        let ssh_user = require("SSH_USER")?;
        let settings = Self {
            shop: ShopSettings {
                domain: require("SHOP_DOMAIN")?,
                access_token: require("ACCESS_TOKEN")?,
                api_version: lookup("API_VERSION").unwrap_or_else(|| "2024-01".to_string()),
            },
            fetch: FetchSettings {
                page_size: parse_or(&lookup, "PAGE_SIZE", MAX_PAGE_SIZE)?.min(MAX_PAGE_SIZE),
                page_delay: Duration::from_millis(parse_or(&lookup, "PAGE_DELAY_MS", 500)?),
                rate_limit_cooldown: Duration::from_secs(parse_or(
                    &lookup,
                    "RATE_LIMIT_COOLDOWN_SECS",
                    5,
                )?),
                request_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30)?),
            },
            tunnel: TunnelSettings {
                host: require("SSH_HOST")?,
                port: parse_or(&lookup, "SSH_PORT", 22)?,
                user: ssh_user.clone(),
                password: require("SSH_PASS")?,
            },
            warehouse: WarehouseSettings {
                host: require("DB_HOST")?,
                port: parse_or(&lookup, "DB_PORT", 3306)?,
                database: require("DB_NAME")?,
                // Shared-hosting setups commonly reuse the SSH login for the
                // database account, so DB_USER falls back to SSH_USER.
                user: lookup("DB_USER").unwrap_or(ssh_user),
                password: require("DB_PASS")?,
                table: lookup("DB_TABLE").unwrap_or_else(|| "products_snapshot".to_string()),
                batch_size: parse_or(&lookup, "BATCH_SIZE", 500)?,
            },
        };

        // Surface a bad domain before any I/O is attempted
        url::Url::parse(&settings.products_url())?;

        Ok(settings)
    }

    /// First-page URL of the products collection
    pub fn products_url(&self) -> String {
        let domain = self.shop.domain.trim_end_matches('/');
        let base = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        };
        format!(
            "{base}/admin/api/{}/products.json?limit={}",
            self.shop.api_version, self.fetch.page_size
        )
    }
}

/// Parse an optional numeric setting, falling back to a default
fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::invalid_value(key, format!("{e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SHOP_DOMAIN", "my-shop.example.com"),
            ("ACCESS_TOKEN", "shpat_test"),
            ("SSH_HOST", "ssh.example.com"),
            ("SSH_USER", "deploy"),
            ("SSH_PASS", "hunter2"),
            ("DB_HOST", "db.internal"),
            ("DB_NAME", "warehouse"),
            ("DB_PASS", "dbpass"),
        ])
    }

    fn settings_from(vars: &HashMap<&str, &str>) -> Result<SyncSettings> {
        SyncSettings::from_lookup(|key| vars.get(key).map(ToString::to_string))
    }

    #[test]
    fn test_defaults_applied() {
        let settings = settings_from(&base_vars()).unwrap();
        assert_eq!(settings.shop.api_version, "2024-01");
        assert_eq!(settings.fetch.page_size, 250);
        assert_eq!(settings.fetch.page_delay, Duration::from_millis(500));
        assert_eq!(settings.fetch.rate_limit_cooldown, Duration::from_secs(5));
        assert_eq!(settings.tunnel.port, 22);
        assert_eq!(settings.warehouse.port, 3306);
        assert_eq!(settings.warehouse.table, "products_snapshot");
        assert_eq!(settings.warehouse.batch_size, 500);
    }

    #[test]
    fn test_db_user_falls_back_to_ssh_user() {
        let settings = settings_from(&base_vars()).unwrap();
        assert_eq!(settings.warehouse.user, "deploy");

        let mut vars = base_vars();
        vars.insert("DB_USER", "analytics");
        let settings = settings_from(&vars).unwrap();
        assert_eq!(settings.warehouse.user, "analytics");
    }

    #[test]
    fn test_missing_required_field() {
        let mut vars = base_vars();
        vars.remove("ACCESS_TOKEN");
        let err = settings_from(&vars).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingConfigField { ref field } if field == "ACCESS_TOKEN"
        ));
    }

    #[test]
    fn test_invalid_numeric_value() {
        let mut vars = base_vars();
        vars.insert("PAGE_SIZE", "lots");
        let err = settings_from(&vars).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfigValue { ref field, .. } if field == "PAGE_SIZE"
        ));
    }

    #[test]
    fn test_page_size_is_capped() {
        let mut vars = base_vars();
        vars.insert("PAGE_SIZE", "1000");
        let settings = settings_from(&vars).unwrap();
        assert_eq!(settings.fetch.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_products_url_from_bare_domain() {
        let settings = settings_from(&base_vars()).unwrap();
        assert_eq!(
            settings.products_url(),
            "https://my-shop.example.com/admin/api/2024-01/products.json?limit=250"
        );
    }

    #[test]
    fn test_products_url_keeps_explicit_scheme() {
        let mut vars = base_vars();
        vars.insert("SHOP_DOMAIN", "http://127.0.0.1:8080/");
        let settings = settings_from(&vars).unwrap();
        assert_eq!(
            settings.products_url(),
            "http://127.0.0.1:8080/admin/api/2024-01/products.json?limit=250"
        );
    }
}
