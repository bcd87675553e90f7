use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::ProviderKind;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub gemini: GeminiSettings,
    pub openai: OpenAiSettings,
    pub vision: VisionSettings,
    pub upstream: UpstreamSettings,
    pub pairing: PairingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Restrict CORS to a single front-end origin; permissive when unset
    pub cors_origin: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            workers: None,
            cors_origin: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base_url: String,
    pub api_version: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            api_base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_version: "v1beta".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base_url: String,
    pub chat_path: String,
    pub models_path: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            api_base_url: "https://api.openai.com".to_string(),
            chat_path: "/v1/chat/completions".to_string(),
            models_path: "/v1/models".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub api_version: String,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://vision.googleapis.com".to_string(),
            api_version: "v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    pub timeout_secs: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PairingSettings {
    /// Provider that serves the pairing endpoints
    pub provider: ProviderKind,
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the structs
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with CELLAR__)
    /// 4. Deployment variables such as GEMINI_API_KEY or PORT
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CELLAR__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CELLAR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_deployment_env(settings, |name| std::env::var(name).ok())?.try_deserialize()
    }

    /// Key used for label scanning; shares the Gemini key unless one is set
    pub fn vision_api_key(&self) -> Option<String> {
        self.vision
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.gemini.api_key.clone())
    }
}

/// Flat variable names used by existing deployments, mapped onto settings keys
const DEPLOYMENT_ENV: &[(&str, &str)] = &[
    ("GEMINI_API_KEY", "gemini.api_key"),
    ("GEMINI_MODEL", "gemini.model"),
    ("GEMINI_API_BASE_URL", "gemini.api_base_url"),
    ("GEMINI_API_VERSION", "gemini.api_version"),
    ("OPENAI_API_KEY", "openai.api_key"),
    ("OPENAI_MODEL", "openai.model"),
    ("OPENAI_API_BASE_URL", "openai.api_base_url"),
    ("OPENAI_CHAT_COMPLETIONS_PATH", "openai.chat_path"),
    ("VISION_API_KEY", "vision.api_key"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

/// Override settings from deployment variables
///
/// `lookup` resolves a variable name; blank values are ignored.
fn apply_deployment_env<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    for (var, key) in DEPLOYMENT_ENV {
        if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
            builder = builder.set_override(*key, value)?;
        }
    }

    if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
        builder = builder.set_override("server.port", i64::from(port))?;
    }

    builder.build()
}
