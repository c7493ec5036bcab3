//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides.
//! The configuration file path defaults to `config.yaml` but can be specified via
//! the `-f` flag or the `TUTORLINK_CONFIG` environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `TUTORLINK_` override YAML values
//! 3. **DATABASE_URL** - Special case: overrides `database.url` if set
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `TUTORLINK_DATABASE__URL=postgres://...` sets the `database.url` field.
//!
//! ## Configuration Structure
//!
//! - **Server**: `host`, `port`, `frontend_url`
//! - **Database**: `database.url`, `database.pool` - PostgreSQL connection settings
//! - **Admin user**: `admin_email`, `admin_name` - bootstrap admin created on startup
//! - **Auth**: `auth.proxy_header` - trusted identity header from the upstream proxy
//! - **Payment**: `payment` - payment gateway (PayPal or the dummy test gateway)
//! - **Email**: `email` - SMTP or file transport for notifications
//! - **Storage**: `storage` - S3 blob store for PDFs and images
//! - **Coins**: `coins` - every pricing constant in one place

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Simple CLI args - just for specifying the config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "TUTORLINK_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment
/// variables. All fields have sensible defaults defined in the `Default`
/// implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Base URL of the frontend, used in payment redirect URLs and email links
    pub frontend_url: String,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Email address for the initial admin user (created on first startup)
    pub admin_email: String,
    /// Display name for the initial admin user
    pub admin_name: String,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Payment gateway configuration (PayPal, or the dummy gateway for tests)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentConfig>,
    /// Email transport configuration for notifications
    pub email: EmailConfig,
    /// Blob storage configuration for PDFs and images
    pub storage: StorageConfig,
    /// Coin economy constants (starting balance, action costs, purchase rate)
    pub coins: CoinsConfig,
    /// Payment maintenance windows
    pub payments: PaymentsConfig,
    /// CORS configuration for browser clients
    pub cors: CorsConfig,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/tutorlink".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

/// Authentication configuration.
///
/// Identity is resolved by an upstream proxy and forwarded as a trusted
/// header carrying the caller's email address. The service looks the email up
/// and attaches the account (id + role) to the request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Proxy header-based authentication
    pub proxy_header: ProxyHeaderAuthConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            proxy_header: ProxyHeaderAuthConfig::default(),
        }
    }
}

/// Proxy header-based authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyHeaderAuthConfig {
    /// The name of the HTTP header containing the caller's email.
    /// Make sure the upstream proxy strips this header from inbound traffic.
    pub header_name: String,
    /// Automatically create a student account when the header carries an
    /// email with no matching user row.
    pub auto_create_users: bool,
}

impl Default for ProxyHeaderAuthConfig {
    fn default() -> Self {
        Self {
            header_name: "x-tutorlink-user".to_string(),
            auto_create_users: true,
        }
    }
}

/// Payment gateway configuration.
///
/// Supports different gateways via an enum. Credentials should be set via
/// environment variables rather than checked-in YAML.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentConfig {
    /// PayPal Orders v2 REST integration
    /// Set credentials via:
    /// - `TUTORLINK_PAYMENT__PAYPAL__CLIENT_ID`
    /// - `TUTORLINK_PAYMENT__PAYPAL__CLIENT_SECRET`
    Paypal(PaypalConfig),
    /// Dummy gateway for tests and local development
    Dummy(DummyConfig),
}

/// PayPal gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaypalConfig {
    /// REST API client id
    pub client_id: String,
    /// REST API client secret
    pub client_secret: String,
    /// API base URL (sandbox: https://api-m.sandbox.paypal.com)
    #[serde(default = "PaypalConfig::default_base_url")]
    pub base_url: Url,
    /// Per-request timeout for gateway calls
    #[serde(default = "PaypalConfig::default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    /// Brand name shown on the PayPal checkout page
    #[serde(default)]
    pub brand_name: Option<String>,
}

impl PaypalConfig {
    fn default_base_url() -> Url {
        Url::parse("https://api-m.sandbox.paypal.com").expect("valid default PayPal URL")
    }

    fn default_timeout() -> Duration {
        Duration::from_secs(30)
    }
}

/// Dummy gateway configuration for testing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DummyConfig {
    /// Whether captures report success
    pub capture_succeeds: bool,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self { capture_succeeds: true }
    }
}

/// Email configuration for workflow notifications.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
// Note: Cannot use deny_unknown_fields here due to #[serde(flatten)] on transport
pub struct EmailConfig {
    /// Email transport method
    #[serde(flatten)]
    pub transport: EmailTransportConfig,
    /// Sender email address
    pub from_email: String,
    /// Sender display name
    pub from_name: String,
}

/// Email transport configuration - either SMTP or file-based for testing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EmailTransportConfig {
    /// Send emails via SMTP server
    Smtp {
        /// SMTP server hostname
        host: String,
        /// SMTP server port
        port: u16,
        /// SMTP authentication username
        username: String,
        /// SMTP authentication password
        password: String,
        /// Use TLS encryption
        use_tls: bool,
    },
    /// Write emails to files (for development/testing)
    File {
        /// Directory path where email files will be written
        path: String,
    },
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            transport: EmailTransportConfig::default(),
            from_email: "noreply@example.com".to_string(),
            from_name: "TutorLink".to_string(),
        }
    }
}

impl Default for EmailTransportConfig {
    fn default() -> Self {
        Self::File {
            path: "./emails".to_string(),
        }
    }
}

/// Blob storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Amazon S3 (or S3-compatible) object storage
    S3 {
        /// Bucket name; also used to recognize our own object URLs when
        /// re-signing stored links
        bucket: String,
        /// AWS region
        region: String,
        /// How long generated signed URLs stay valid
        #[serde(default = "default_signed_url_ttl", with = "humantime_serde")]
        signed_url_ttl: Duration,
    },
    /// No-op storage; uploads fail and nothing is signed. Useful in tests
    /// that never touch blobs.
    Noop,
}

fn default_signed_url_ttl() -> Duration {
    Duration::from_secs(3600)
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Noop
    }
}

impl StorageConfig {
    pub fn signed_url_ttl(&self) -> Duration {
        match self {
            StorageConfig::S3 { signed_url_ttl, .. } => *signed_url_ttl,
            StorageConfig::Noop => default_signed_url_ttl(),
        }
    }
}

/// Coin economy constants.
///
/// Every pricing decision lives here so a policy change touches exactly one
/// place.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoinsConfig {
    /// Coins a freshly created wallet starts with
    pub initial_balance: i64,
    /// Fixed cost for a student to unlock a tutor's contact details
    pub contact_cost: i64,
    /// Base cost for a tutor applying to a post
    pub application_base_cost: i64,
    /// Additional cost per subject on the post
    pub application_per_subject_cost: i64,
    /// Subjects beyond this count don't increase the application cost
    pub application_max_billable_subjects: usize,
    /// Upper bound on the application cost
    pub application_cost_cap: i64,
    /// Coins issued per currency unit on top-up
    pub coins_per_currency_unit: i64,
    /// Minimum purchase amount in currency units (buys the minimum coin batch)
    pub minimum_purchase_amount: Decimal,
}

impl Default for CoinsConfig {
    fn default() -> Self {
        Self {
            initial_balance: 150,
            contact_cost: 50,
            application_base_cost: 40,
            application_per_subject_cost: 10,
            application_max_billable_subjects: 3,
            application_cost_cap: 70,
            coins_per_currency_unit: 1000,
            minimum_purchase_amount: Decimal::new(1, 1), // 0.1
        }
    }
}

impl CoinsConfig {
    /// Minimum coins a purchase can yield (derived from the minimum amount)
    pub fn minimum_purchase_coins(&self) -> i64 {
        crate::api::models::payments::coins_for_amount(self.minimum_purchase_amount, self.coins_per_currency_unit)
    }
}

/// Payment maintenance windows.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaymentsConfig {
    /// Pending payments older than this are deleted by the user-triggered sweep
    #[serde(with = "humantime_serde")]
    pub pending_delete_after: Duration,
    /// Pending payments older than this are marked expired by the admin sweep
    #[serde(with = "humantime_serde")]
    pub pending_expire_after: Duration,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            pending_delete_after: Duration::from_secs(60 * 60),
            pending_expire_after: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests ("*" for any)
    pub allowed_origins: Vec<String>,
    /// Allow credentials (cookies) in CORS requests
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
            allow_credentials: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            frontend_url: "http://localhost:5173".to_string(),
            database: DatabaseConfig::default(),
            admin_email: "admin@tutorlink.app".to_string(),
            admin_name: "Administrator".to_string(),
            auth: AuthConfig::default(),
            payment: None,
            email: EmailConfig::default(),
            storage: StorageConfig::default(),
            coins: CoinsConfig::default(),
            payments: PaymentsConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // DATABASE_URL is the conventional escape hatch and wins over YAML
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("TUTORLINK_").split("__"))
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.coins.initial_balance < 0 {
            anyhow::bail!("coins.initial_balance must be non-negative");
        }
        if self.coins.contact_cost <= 0 {
            anyhow::bail!("coins.contact_cost must be positive");
        }
        if self.coins.application_cost_cap < self.coins.application_base_cost {
            anyhow::bail!("coins.application_cost_cap must be at least the base cost");
        }
        if self.coins.coins_per_currency_unit <= 0 {
            anyhow::bail!("coins.coins_per_currency_unit must be positive");
        }
        Ok(())
    }

    /// Address to bind the HTTP listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_coin_economy() {
        let config = Config::default();
        assert_eq!(config.coins.initial_balance, 150);
        assert_eq!(config.coins.contact_cost, 50);
        assert_eq!(config.coins.application_base_cost, 40);
        assert_eq!(config.coins.application_cost_cap, 70);
        assert_eq!(config.coins.coins_per_currency_unit, 1000);
        assert_eq!(config.coins.minimum_purchase_amount, Decimal::new(1, 1));
    }

    #[test]
    fn validate_rejects_inverted_cost_cap() {
        let mut config = Config::default();
        config.coins.application_cost_cap = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bind_address_combines_host_and_port() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
    }
}
