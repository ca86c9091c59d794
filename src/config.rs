use serde::Deserialize;

/// Base URL used when neither an argument nor the environment provides one.
pub const DEFAULT_TWENTY_API_URL: &str = "http://localhost:3000";
/// Placeholder credential used when none is configured.
pub const DEFAULT_TWENTY_API_KEY: &str = "demo-key";

/// Huly API root used when nothing else is configured.
pub const DEFAULT_HULY_API_URL: &str = "https://api.huly.app";
/// Placeholder Huly credential used when none is configured.
pub const DEFAULT_HULY_API_KEY: &str = "your-tiny-sumo-huly-api-key-here";

const URL_VARS: [&str; 2] = ["TWENTY_API_URL", "VITE_TWENTY_API_URL"];
const KEY_VARS: [&str; 2] = ["TWENTY_API_KEY", "VITE_TWENTY_API_KEY"];
const HULY_URL_VARS: [&str; 1] = ["HULY_API_URL"];
const HULY_KEY_VARS: [&str; 1] = ["TINY_SUMO_HULY_API_KEY"];

/// Connection settings for the Twenty CRM backend.
///
/// Resolved once, then never changed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TwentyConfig {
    pub base_url: String,
    pub api_key: String,
}

impl TwentyConfig {
    /// Resolves settings from explicit arguments, then the process
    /// environment, then the built-in defaults.
    pub fn from_env(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self::resolve_with(base_url, api_key, |name| std::env::var(name).ok())
    }

    /// Same precedence as [`TwentyConfig::from_env`], with the environment
    /// supplied by `lookup`.
    pub fn resolve_with<F>(base_url: Option<String>, api_key: Option<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: resolve(base_url, &URL_VARS, &lookup, DEFAULT_TWENTY_API_URL),
            api_key: resolve(api_key, &KEY_VARS, &lookup, DEFAULT_TWENTY_API_KEY),
        }
    }

    /// Joins `path` onto the base URL, ignoring a trailing slash on the base.
    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

impl Default for TwentyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TWENTY_API_URL.to_string(),
            api_key: DEFAULT_TWENTY_API_KEY.to_string(),
        }
    }
}

/// Connection settings for the Huly project-management API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HulyConfig {
    pub base_url: String,
    pub api_key: String,
}

impl HulyConfig {
    /// Explicit arguments, then `HULY_API_URL` / `TINY_SUMO_HULY_API_KEY`,
    /// then the defaults.
    pub fn from_env(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self::resolve_with(base_url, api_key, |name| std::env::var(name).ok())
    }

    pub fn resolve_with<F>(base_url: Option<String>, api_key: Option<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: resolve(base_url, &HULY_URL_VARS, &lookup, DEFAULT_HULY_API_URL),
            api_key: resolve(api_key, &HULY_KEY_VARS, &lookup, DEFAULT_HULY_API_KEY),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

impl Default for HulyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HULY_API_URL.to_string(),
            api_key: DEFAULT_HULY_API_KEY.to_string(),
        }
    }
}

fn resolve<F>(explicit: Option<String>, names: &[&str], lookup: &F, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(explicit)
        .or_else(|| first_var(names, lookup))
        .unwrap_or_else(|| default.to_string())
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn first_var<F>(names: &[&str], lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().find_map(|name| non_empty(lookup(name)))
}

/// Dashboard server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub twenty: TwentyConfig,
    pub huly: HulyConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            twenty: TwentyConfig::from_env(None, None),
            huly: HulyConfig::from_env(None, None),
        };

        // Never log the credential itself
        tracing::debug!("Twenty API URL: {}", config.twenty.base_url);
        if config.twenty.api_key == DEFAULT_TWENTY_API_KEY {
            tracing::warn!("TWENTY_API_KEY not set, using placeholder credential");
        }
        tracing::debug!("Huly API URL: {}", config.huly.base_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
