use std::env;
use url::Url;

const ENV_PREFIX: &str = "MOCKPAY_";

const DEFAULT_SIMULATE_DELAY_MS: u64 = 2000;
const DEFAULT_CURRENCY: &str = "INR";
const DEFAULT_FRONTEND_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_DATABASE_URL: &str = "sqlite:///./mock_payments.db";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_RATE_LIMIT_RPM: u32 = 600;

#[derive(Clone)]
pub struct GatewayConfig {
    /// Artificial processing latency applied to every payment submission
    pub simulate_delay_ms: u64,
    /// Whether the `force` request field is honored
    pub allow_force_param: bool,
    /// Currency code stamped on new sessions
    pub currency: String,
    /// Base URL of the checkout frontend, used to build checkout links
    pub frontend_base_url: String,
    /// CORS allowed origins (`*` permits any)
    pub cors_allow_origins: Vec<String>,
    /// SQLite database path (`:memory:` for an ephemeral store)
    pub db_path: String,
    /// Server port
    pub port: u16,
    /// Rate limit requests per minute
    pub rate_limit_rpm: u32,
    /// Bearer token required for /metrics endpoint (None = public)
    pub metrics_token: Option<String>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("simulate_delay_ms", &self.simulate_delay_ms)
            .field("allow_force_param", &self.allow_force_param)
            .field("currency", &self.currency)
            .field("frontend_base_url", &self.frontend_base_url)
            .field("cors_allow_origins", &self.cors_allow_origins)
            .field("db_path", &self.db_path)
            .field("port", &self.port)
            .field("rate_limit_rpm", &self.rate_limit_rpm)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            simulate_delay_ms: DEFAULT_SIMULATE_DELAY_MS,
            allow_force_param: true,
            currency: DEFAULT_CURRENCY.to_string(),
            frontend_base_url: DEFAULT_FRONTEND_BASE_URL.to_string(),
            cors_allow_origins: vec!["*".to_string()],
            db_path: "./mock_payments.db".to_string(),
            port: DEFAULT_PORT,
            rate_limit_rpm: DEFAULT_RATE_LIMIT_RPM,
            metrics_token: None,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        // Optional: simulated processing delay
        let simulate_delay_ms = match var("SIMULATE_DELAY_MS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "MOCKPAY_SIMULATE_DELAY_MS",
                value: raw,
            })?,
            None => DEFAULT_SIMULATE_DELAY_MS,
        };

        // Optional: honor the `force` field
        let allow_force_param = match var("ALLOW_FORCE_PARAM") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                name: "MOCKPAY_ALLOW_FORCE_PARAM",
                value: raw,
            })?,
            None => true,
        };

        let currency = var("CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        // Optional: frontend base URL. Validate, but keep the caller's spelling.
        let frontend_base_url =
            var("FRONTEND_BASE_URL").unwrap_or_else(|| DEFAULT_FRONTEND_BASE_URL.to_string());
        Url::parse(&frontend_base_url)
            .map_err(|_| ConfigError::InvalidUrl(frontend_base_url.clone()))?;
        let frontend_base_url = frontend_base_url.trim_end_matches('/').to_string();

        let cors_allow_origins: Vec<String> = var("CORS_ALLOW_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let db_path = sqlite_path(&database_url)?;

        // Optional: port, falling back to the platform-wide PORT
        let port = var("PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let rate_limit_rpm = var("RATE_LIMIT_RPM")
            .and_then(|s| s.parse().ok())
            .filter(|rpm| *rpm > 0)
            .unwrap_or(DEFAULT_RATE_LIMIT_RPM);

        let metrics_token = var("METRICS_TOKEN");

        if allow_force_param {
            tracing::warn!(
                "MOCKPAY_ALLOW_FORCE_PARAM is enabled — clients can force payment outcomes"
            );
        }
        if metrics_token.is_none() {
            tracing::warn!("MOCKPAY_METRICS_TOKEN not set — /metrics endpoint is publicly accessible");
        }

        Ok(Self {
            simulate_delay_ms,
            allow_force_param,
            currency,
            frontend_base_url,
            cors_allow_origins,
            db_path,
            port,
            rate_limit_rpm,
            metrics_token,
        })
    }

    /// Checkout page link for a session.
    pub fn checkout_url(&self, session_id: &str) -> String {
        format!(
            "{}/mock-checkout?sessionId={}",
            self.frontend_base_url,
            urlencoding::encode(session_id)
        )
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Resolve a database URL to a SQLite path.
///
/// Accepts `sqlite:///relative.db`, `sqlite:////abs/path.db`, `sqlite://:memory:`
/// and bare paths. Other schemes are rejected since the store is SQLite only.
pub fn sqlite_path(database_url: &str) -> Result<String, ConfigError> {
    if let Some(rest) = database_url.strip_prefix("sqlite://") {
        let path = rest.strip_prefix('/').unwrap_or(rest);
        if path.is_empty() {
            return Err(ConfigError::UnsupportedDatabase(database_url.to_string()));
        }
        return Ok(path.to_string());
    }
    if database_url.contains("://") {
        return Err(ConfigError::UnsupportedDatabase(database_url.to_string()));
    }
    Ok(database_url.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported database URL (SQLite only): {0}")]
    UnsupportedDatabase(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.simulate_delay_ms, 2000);
        assert!(config.allow_force_param);
        assert_eq!(config.currency, "INR");
        assert_eq!(config.frontend_base_url, "http://localhost:3000");
        assert_eq!(config.cors_allow_origins, vec!["*"]);
        assert_eq!(config.db_path, "./mock_payments.db");
        assert_eq!(config.port, 8000);
        assert!(config.metrics_token.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("MOCKPAY_SIMULATE_DELAY_MS", "0"),
            ("MOCKPAY_ALLOW_FORCE_PARAM", "false"),
            ("MOCKPAY_CURRENCY", "USD"),
            ("MOCKPAY_FRONTEND_BASE_URL", "https://shop.example.com/"),
            (
                "MOCKPAY_CORS_ALLOW_ORIGINS",
                "https://shop.example.com, http://localhost:5173",
            ),
            ("MOCKPAY_DATABASE_URL", "sqlite://:memory:"),
            ("PORT", "9001"),
        ])
        .unwrap();
        assert_eq!(config.simulate_delay_ms, 0);
        assert!(!config.allow_force_param);
        assert_eq!(config.currency, "USD");
        assert_eq!(config.frontend_base_url, "https://shop.example.com");
        assert_eq!(
            config.cors_allow_origins,
            vec!["https://shop.example.com", "http://localhost:5173"]
        );
        assert_eq!(config.db_path, ":memory:");
        assert_eq!(config.port, 9001);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            from_pairs(&[("MOCKPAY_SIMULATE_DELAY_MS", "soon")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            from_pairs(&[("MOCKPAY_ALLOW_FORCE_PARAM", "maybe")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            from_pairs(&[("MOCKPAY_FRONTEND_BASE_URL", "not a url")]),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_sqlite_path() {
        assert_eq!(
            sqlite_path("sqlite:///./mock_payments.db").unwrap(),
            "./mock_payments.db"
        );
        assert_eq!(sqlite_path("sqlite:////var/lib/mp.db").unwrap(), "/var/lib/mp.db");
        assert_eq!(sqlite_path("sqlite://:memory:").unwrap(), ":memory:");
        assert_eq!(sqlite_path("payments.db").unwrap(), "payments.db");
        assert!(sqlite_path("postgres://localhost/db").is_err());
    }

    #[test]
    fn test_checkout_url() {
        let config = GatewayConfig::default();
        assert_eq!(
            config.checkout_url("MOCK_S_123456789"),
            "http://localhost:3000/mock-checkout?sessionId=MOCK_S_123456789"
        );
    }

    #[test]
    fn test_debug_redacts_metrics_token() {
        let config = GatewayConfig {
            metrics_token: Some("scrape-secret".to_string()),
            ..GatewayConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("scrape-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
