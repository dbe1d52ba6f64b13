use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::info;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEV_DEFAULT_JWT_SECRET: &str =
    "this_is_a_development_secret_key_that_is_at_least_64_characters_long_for_testing";

/// Company identity printed on every rendered document.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct CompanyConfig {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub slogan: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub phone2: String,
    #[serde(default)]
    pub email: String,
    /// Fiscal identification number (NINEA)
    #[serde(default)]
    pub tax_id: String,
    /// Trade register number (RCCM)
    #[serde(default)]
    pub registration_number: String,
    /// Currency label printed on documents
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "FCFA".to_string()
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: "Unnamed Company".to_string(),
            slogan: String::new(),
            address: String::new(),
            phone: String::new(),
            phone2: String::new(),
            email: String::new(),
            tax_id: String::new(),
            registration_number: String::new(),
            currency: default_currency(),
        }
    }
}

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// JWT secret key
    #[validate(length(min = 32))]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: u64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_expiration")]
    pub refresh_token_expiration: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// CORS: comma-separated list of allowed origins
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// DB pool sizing
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,

    /// Tax rates (percent) accepted on products and document items.
    #[serde(default = "default_allowed_tax_rates")]
    pub allowed_tax_rates: Vec<Decimal>,

    /// Path to the wkhtmltopdf binary used for PDF rendering.
    #[serde(default = "default_pdf_binary")]
    pub pdf_binary: String,

    /// Optional bootstrap admin credentials, applied when the user table
    /// is empty (first deployment).
    #[serde(default)]
    pub bootstrap_admin_username: Option<String>,
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,

    /// Company identity block for rendered documents
    #[serde(default)]
    pub company: CompanyConfig,
}

fn default_jwt_expiration() -> u64 {
    12 * 60 * 60
}
fn default_refresh_expiration() -> u64 {
    7 * 24 * 60 * 60
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_allowed_tax_rates() -> Vec<Decimal> {
    vec![Decimal::ZERO, Decimal::from(18)]
}
fn default_pdf_binary() -> String {
    "wkhtmltopdf".to_string()
}

impl AppConfig {
    /// Construct a configuration programmatically (used by tests).
    pub fn new(database_url: String, jwt_secret: String, environment: String) -> Self {
        Self {
            database_url,
            jwt_secret,
            jwt_expiration: default_jwt_expiration(),
            refresh_token_expiration: default_refresh_expiration(),
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            environment,
            log_level: default_log_level(),
            auto_migrate: false,
            cors_allowed_origins: None,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            allowed_tax_rates: default_allowed_tax_rates(),
            pdf_binary: default_pdf_binary(),
            bootstrap_admin_username: None,
            bootstrap_admin_password: None,
            company: CompanyConfig::default(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development" || self.environment == "test"
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// True when the given tax rate is on the configured allow-list.
    pub fn tax_rate_allowed(&self, rate: Decimal) -> bool {
        self.allowed_tax_rates.iter().any(|r| *r == rate)
    }
}

/// Load configuration from `config/{default,<env>}.toml` and `APP__`
/// prefixed environment variables (env wins).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let mut builder = Config::builder()
        .set_default("environment", run_env.clone())?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?;

    let default_path = format!("{CONFIG_DIR}/default");
    if Path::new(&format!("{default_path}.toml")).exists() {
        builder = builder.add_source(File::with_name(&default_path));
    }
    let env_path = format!("{CONFIG_DIR}/{run_env}");
    if Path::new(&format!("{env_path}.toml")).exists() {
        builder = builder.add_source(File::with_name(&env_path).required(false));
    }

    builder = builder.add_source(Environment::with_prefix("APP").separator("__"));

    // Development gets a usable JWT secret out of the box; any other
    // environment must provide its own.
    if run_env == "development" || run_env == "test" {
        builder = builder.set_default("jwt_secret", DEV_DEFAULT_JWT_SECRET)?;
    }

    let cfg: AppConfig = builder.build()?.try_deserialize()?;

    cfg.validate()
        .map_err(|e| ConfigError::Message(format!("invalid configuration: {e}")))?;

    if !cfg.is_development() && cfg.jwt_secret == DEV_DEFAULT_JWT_SECRET {
        return Err(ConfigError::Message(
            "the development JWT secret cannot be used outside development".to_string(),
        ));
    }

    info!(environment = %cfg.environment, "configuration loaded");
    Ok(cfg)
}

/// Initialise the tracing subscriber with an env-filter.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gescom_api={log_level},tower_http=info")));

    let _ = fmt().with_env_filter(filter).try_init();
}
