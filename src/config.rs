/*!
 * Application Configuration
 * Environment-driven settings, loaded once at startup
 */
use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("failed to hash ADMIN_PASSWORD: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("ADMIN_HASH_PASSWORD or ADMIN_PASSWORD must be set in production")]
    MissingAdminPassword,
}

/// Which persistence layer serves content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Relational,
    Document,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "postgres" | "relational" | "sql" => Ok(BackendKind::Relational),
            "document" | "documents" => Ok(BackendKind::Document),
            other => Err(other.to_string()),
        }
    }
}

/// Transactional email settings for the contact relay.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Relay is skipped when unset.
    pub api_key: Option<String>,
    pub api_base: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub backend: BackendKind,
    pub site_url: String,
    pub site_title: String,
    pub site_description: String,
    pub admin_password_hash: Option<String>,
    pub allowed_origins: Vec<String>,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let environment = get_or("ENVIRONMENT", "development");

        let port = match get("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => 3001,
        };

        let backend = match get("CONTENT_BACKEND") {
            Some(value) => value
                .parse()
                .map_err(|value| ConfigError::Invalid {
                    key: "CONTENT_BACKEND",
                    value,
                })?,
            None if get("DATABASE_URL").is_some() => BackendKind::Relational,
            None => BackendKind::Memory,
        };

        // A ready-made bcrypt hash wins over a plain password.
        let admin_password_hash = match (get("ADMIN_HASH_PASSWORD"), get("ADMIN_PASSWORD")) {
            (Some(hash), _) => Some(hash),
            (None, Some(plain)) => Some(bcrypt::hash(plain, bcrypt::DEFAULT_COST)?),
            (None, None) => None,
        };

        if environment == "production" && admin_password_hash.is_none() {
            return Err(ConfigError::MissingAdminPassword);
        }

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .or_else(|| get("FRONTEND_ORIGIN").map(|o| vec![o]))
            .unwrap_or_default();

        Ok(Self {
            host: get_or("HOST", "127.0.0.1"),
            port,
            backend,
            site_url: get_or("SITE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            site_title: get_or("SITE_TITLE", "Agency"),
            site_description: get_or("SITE_DESCRIPTION", "Latest articles and insights"),
            admin_password_hash,
            allowed_origins,
            mail: MailConfig {
                api_key: get("RESEND_API_KEY"),
                api_base: get_or("MAIL_API_BASE", "https://api.resend.com")
                    .trim_end_matches('/')
                    .to_string(),
                from: get_or("CONTACT_FROM_EMAIL", "Website <onboarding@resend.dev>"),
                to: get_or("CONTACT_TO_EMAIL", "hello@example.com"),
            },
            environment,
        })
    }

    /// Defaults with nothing read from the environment.
    pub fn defaults() -> Self {
        Self::from_lookup(|_| None).expect("defaults are valid outside production")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = format!("{}:{}", self.host, self.port);
        value
            .parse()
            .map_err(|_| ConfigError::Invalid { key: "HOST", value })
    }
}

/// Lookup over a fixed map, for tests and tooling.
pub fn map_lookup(vars: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
    move |key| vars.get(key).map(|v| v.to_string())
}
