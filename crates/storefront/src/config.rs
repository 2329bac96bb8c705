//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the service runs fully in memory without any.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL, used for share links (default: `http://localhost:3000`)
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; without either the catalog lives in memory)
//! - `STOREFRONT_ORDER_RECIPIENT` - Address order mails are composed to
//!   (default: ordershopyz@gmail.com)
//! - `STOREFRONT_ADMIN_PASSWORD` - Password for the admin catalog screens
//!   (default: 12346). This is a convenience gate, not a security control.
//! - `GEMINI_API_KEY` - Google Generative Language API key (assistant disabled without it)
//! - `GEMINI_MODEL` - Model name (default: gemini-2.0-flash)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default recipient for composed order mails.
pub const DEFAULT_ORDER_RECIPIENT: &str = "ordershopyz@gmail.com";

/// Admin password used when none is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "12346";

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
    "add-your",
    "...",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Address order mails are composed to
    pub order_recipient: String,
    /// Admin screen password
    pub admin_password: SecretString,
    /// Whether `admin_password` is the built-in default
    pub admin_password_is_default: bool,
    /// Generative text configuration, if enabled
    pub gemini: Option<GeminiConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key
    pub api_key: SecretString,
    /// Model name (e.g., gemini-2.0-flash)
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// Gemini API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let host = vars
            .or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = vars
            .or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = vars
            .or_default("STOREFRONT_BASE_URL", "http://localhost:3000")
            .trim_end_matches('/')
            .to_string();

        let database_url = vars
            .optional("STOREFRONT_DATABASE_URL")
            .or_else(|| vars.optional("DATABASE_URL"))
            .map(SecretString::from);

        let order_recipient = vars.or_default("STOREFRONT_ORDER_RECIPIENT", DEFAULT_ORDER_RECIPIENT);
        validate_recipient(&order_recipient)?;

        let (admin_password, admin_password_is_default) =
            match vars.optional("STOREFRONT_ADMIN_PASSWORD") {
                Some(password) => (SecretString::from(password), false),
                None => (SecretString::from(DEFAULT_ADMIN_PASSWORD), true),
            };

        let gemini = GeminiConfig::from_vars(&vars)?;

        Ok(Self {
            host,
            port,
            base_url,
            database_url,
            order_recipient,
            admin_password,
            admin_password_is_default,
            gemini,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Configuration for tests and local tooling: in-memory store, no
    /// assistant, default password.
    #[must_use]
    pub fn local() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            database_url: None,
            order_recipient: DEFAULT_ORDER_RECIPIENT.to_string(),
            admin_password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
            admin_password_is_default: true,
            gemini: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl GeminiConfig {
    fn from_vars<F>(vars: &Vars<F>) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(api_key) = vars.optional("GEMINI_API_KEY") else {
            return Ok(None);
        };
        validate_secret_strength(&api_key, "GEMINI_API_KEY")?;

        Ok(Some(Self {
            api_key: SecretString::from(api_key),
            model: vars.or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source. Empty values count as unset.
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Minimal shape check for the order recipient.
fn validate_recipient(recipient: &str) -> Result<(), ConfigError> {
    match recipient.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_ORDER_RECIPIENT".to_string(),
            format!("not an email address: {recipient}"),
        )),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_any_variables() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(config.database_url.is_none());
        assert_eq!(config.order_recipient, DEFAULT_ORDER_RECIPIENT);
        assert_eq!(config.admin_password.expose_secret(), DEFAULT_ADMIN_PASSWORD);
        assert!(config.admin_password_is_default);
        assert!(config.gemini.is_none());
    }

    #[test]
    fn test_database_url_falls_back_to_generic_variable() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/shop")]).unwrap();
        assert_eq!(
            config.database_url.unwrap().expose_secret(),
            "postgres://localhost/shop"
        );
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("STOREFRONT_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref var, _) if var == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        assert!(config_from(&[("STOREFRONT_ORDER_RECIPIENT", "orders")]).is_err());
        assert!(config_from(&[("STOREFRONT_ORDER_RECIPIENT", "@shop.dz")]).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = config_from(&[("STOREFRONT_BASE_URL", "https://shopyz.dz/")]).unwrap();
        assert_eq!(config.base_url, "https://shopyz.dz");
    }

    #[test]
    fn test_gemini_placeholder_key_rejected() {
        let err = config_from(&[("GEMINI_API_KEY", "AIzaSy...")]).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_gemini_enabled_with_real_looking_key() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "AIzaSyB3$xY9mK2nL5pQ7rT0uW4zC6dE8fG1hJ"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
        ])
        .unwrap();
        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.model, "gemini-1.5-pro");
    }

    #[test]
    fn test_configured_admin_password_is_not_default() {
        let config = config_from(&[("STOREFRONT_ADMIN_PASSWORD", "open-sesame")]).unwrap();
        assert!(!config.admin_password_is_default);
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_gemini_config_debug_redacts_key() {
        let config = GeminiConfig {
            api_key: SecretString::from("super_secret_gemini_key"),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains(DEFAULT_GEMINI_MODEL));
        assert!(!debug_output.contains("super_secret_gemini_key"));
    }
}
