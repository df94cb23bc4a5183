//! Service settings loaded once at startup.
//!
//! Every recognised key has a default. An optional `.env` file overlays the
//! defaults and the process environment overlays the file. The resulting
//! [`Settings`] value is immutable and handed to the components that need
//! it; nothing reads configuration after startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mockable::Env;
use tracing::{Level, warn};
use url::Url;


/// Application version reported by the service. Not configurable.
pub const APP_VERSION: &str = "v6.1.2";

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const PORT_EXPECTED: &str = "a TCP port between 1 and 65535";
const POSITIVE_EXPECTED: &str = "a positive integer";
const UNSIGNED_EXPECTED: &str = "an unsigned integer";
const URL_EXPECTED: &str = "an absolute http(s) URL";
const LOG_LEVEL_EXPECTED: &str = "trace|debug|info|warn|warning|error";

/// Errors raised while loading settings.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A key is present but its value cannot be used.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// `APP_*` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub port: u16,
    pub debug: bool,
    pub os: String,
    pub platform: u32,
    /// `user:password` pairs accepted by the basic-auth guard.
    pub basic_auth_credentials: Vec<String>,
    pub chat_flush_interval_days: u32,
}

/// `MCP_*` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpSettings {
    pub port: u16,
    pub host: String,
}

/// `PATH_*` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSettings {
    pub qr_code: PathBuf,
    pub send_items: PathBuf,
    pub media: PathBuf,
    pub storages: PathBuf,
    pub chat_storage: PathBuf,
}

/// `DB_*` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub uri: String,
}

/// `WHATSAPP_*` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsappSettings {
    pub auto_reply_message: String,
    pub webhooks: Vec<String>,
    pub webhook_secret: String,
    pub log_level: Level,
    pub max_image_size: u64,
    pub max_file_size: u64,
    pub max_video_size: u64,
    pub max_download_size: u64,
    /// Suffix for user JIDs, including the leading `@`.
    pub type_user: String,
    /// Suffix for group JIDs, including the leading `@`.
    pub type_group: String,
    pub account_validation: bool,
    pub chat_storage: bool,
}

/// Upstream WhatsApp REST gateway (`GO_WA_API_*`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub base_url: Url,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

/// Complete, immutable service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub app: AppSettings,
    pub mcp: McpSettings,
    pub paths: PathSettings,
    pub database: DatabaseSettings,
    pub whatsapp: WhatsappSettings,
    /// Absent when `GO_WA_API_URL` is not set.
    pub gateway: Option<GatewaySettings>,
}

impl Settings {
    /// Filter directive used when `RUST_LOG` is not set.
    ///
    /// # Examples
    /// ```
    /// use mockable::DefaultEnv;
    /// use wa_gateway::settings::load_settings;
    ///
    /// let settings = load_settings(&DefaultEnv::new(), "does-not-exist.env")
    ///     .expect("defaults load");
    /// assert!(!settings.log_filter().is_empty());
    /// ```
    pub fn log_filter(&self) -> String {
        let level = if self.app.debug {
            Level::DEBUG
        } else {
            self.whatsapp.log_level
        };
        level.as_str().to_ascii_lowercase()
    }
}

/// Lookup chain of process environment, then `.env` file entries.
struct Source<'a, E: Env> {
    env: &'a E,
    file: HashMap<String, String>,
}

impl<E: Env> Source<'_, E> {
    /// Empty values count as unset so they never shadow a lower layer.
    fn get(&self, name: &str) -> Option<String> {
        self.env
            .string(name)
            .filter(|value| !value.trim().is_empty())
            .or_else(|| {
                self.file
                    .get(name)
                    .filter(|value| !value.trim().is_empty())
                    .cloned()
            })
    }

    fn string(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_owned())
    }

    fn path(&self, name: &str, default: &str) -> PathBuf {
        PathBuf::from(self.string(name, default))
    }

    fn list(&self, name: &str) -> Vec<String> {
        self.get(name)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn bool(&self, name: &'static str, default: bool) -> Result<bool, SettingsError> {
        match self.get(name) {
            Some(value) => parse_bool(&value).ok_or(SettingsError::InvalidValue {
                name,
                value,
                expected: BOOL_EXPECTED,
            }),
            None => Ok(default),
        }
    }

    fn level(&self, name: &'static str, default: Level) -> Result<Level, SettingsError> {
        match self.get(name) {
            Some(value) => parse_level(&value).ok_or(SettingsError::InvalidValue {
                name,
                value,
                expected: LOG_LEVEL_EXPECTED,
            }),
            None => Ok(default),
        }
    }

    fn port(&self, name: &'static str, default: u16) -> Result<u16, SettingsError> {
        match self.get(name) {
            Some(value) => match value.trim().parse::<u16>() {
                Ok(port) if port > 0 => Ok(port),
                _ => Err(SettingsError::InvalidValue {
                    name,
                    value,
                    expected: PORT_EXPECTED,
                }),
            },
            None => Ok(default),
        }
    }

    fn unsigned<T>(&self, name: &'static str, default: T) -> Result<T, SettingsError>
    where
        T: std::str::FromStr,
    {
        match self.get(name) {
            Some(value) => value
                .trim()
                .parse::<T>()
                .map_err(|_| SettingsError::InvalidValue {
                    name,
                    value,
                    expected: UNSIGNED_EXPECTED,
                }),
            None => Ok(default),
        }
    }

    fn positive<T>(&self, name: &'static str, default: T) -> Result<T, SettingsError>
    where
        T: std::str::FromStr + PartialEq + Default,
    {
        match self.get(name) {
            Some(value) => match value.trim().parse::<T>() {
                Ok(parsed) if parsed != T::default() => Ok(parsed),
                _ => Err(SettingsError::InvalidValue {
                    name,
                    value,
                    expected: POSITIVE_EXPECTED,
                }),
            },
            None => Ok(default),
        }
    }
}

/// Load settings from defaults, an optional `.env` file and `env`.
///
/// A missing or unreadable file is logged and ignored. Malformed values for
/// typed keys fail the load.
///
/// # Examples
/// ```
/// use mockable::MockEnv;
/// use wa_gateway::settings::load_settings;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "APP_PORT" => Some("8000".to_string()),
///     _ => None,
/// });
///
/// let settings = load_settings(&env, "does-not-exist.env").expect("settings load");
/// assert_eq!(settings.app.port, 8000);
/// assert_eq!(settings.mcp.port, 8080);
/// ```
pub fn load_settings<E: Env>(
    env: &E,
    env_file: impl AsRef<Path>,
) -> Result<Settings, SettingsError> {
    let source = Source {
        env,
        file: read_env_file(env_file.as_ref()),
    };

    let app = AppSettings {
        port: source.port("APP_PORT", 3000)?,
        debug: source.bool("APP_DEBUG", false)?,
        os: source.string("APP_OS", "AldinoKemal"),
        platform: source.unsigned("APP_PLATFORM", 1)?,
        basic_auth_credentials: source.list("APP_BASIC_AUTH_CREDENTIAL"),
        chat_flush_interval_days: source.positive("APP_CHAT_FLUSH_INTERVAL_DAYS", 7)?,
    };

    let mcp = McpSettings {
        port: source.port("MCP_PORT", 8080)?,
        host: source.string("MCP_HOST", "localhost"),
    };

    let paths = PathSettings {
        qr_code: source.path("PATH_QR_CODE", "statics/qrcode"),
        send_items: source.path("PATH_SEND_ITEMS", "statics/senditems"),
        media: source.path("PATH_MEDIA", "statics/media"),
        storages: source.path("PATH_STORAGES", "storages"),
        chat_storage: source.path("PATH_CHAT_STORAGE", "storages/chat.csv"),
    };

    let database = DatabaseSettings {
        uri: source.string("DB_URI", "file:storages/whatsapp.db?_foreign_keys=on"),
    };

    let whatsapp = WhatsappSettings {
        auto_reply_message: source.string("WHATSAPP_AUTO_REPLY_MESSAGE", ""),
        webhooks: source.list("WHATSAPP_WEBHOOK"),
        webhook_secret: source.string("WHATSAPP_WEBHOOK_SECRET", "secret"),
        log_level: source.level("WHATSAPP_LOG_LEVEL", Level::ERROR)?,
        max_image_size: source.positive("WHATSAPP_SETTING_MAX_IMAGE_SIZE", 20_000_000)?,
        max_file_size: source.positive("WHATSAPP_SETTING_MAX_FILE_SIZE", 50_000_000)?,
        max_video_size: source.positive("WHATSAPP_SETTING_MAX_VIDEO_SIZE", 100_000_000)?,
        max_download_size: source.positive("WHATSAPP_SETTING_MAX_DOWNLOAD_SIZE", 500_000_000)?,
        type_user: source.string("WHATSAPP_TYPE_USER", "@s.whatsapp.net"),
        type_group: source.string("WHATSAPP_TYPE_GROUP", "@g.us"),
        account_validation: source.bool("WHATSAPP_ACCOUNT_VALIDATION", true)?,
        chat_storage: source.bool("WHATSAPP_CHAT_STORAGE", true)?,
    };

    let gateway = gateway_settings(&source)?;

    Ok(Settings {
        app,
        mcp,
        paths,
        database,
        whatsapp,
        gateway,
    })
}

fn gateway_settings<E: Env>(
    source: &Source<'_, E>,
) -> Result<Option<GatewaySettings>, SettingsError> {
    let Some(raw_url) = source.get("GO_WA_API_URL") else {
        return Ok(None);
    };
    let base_url = match Url::parse(raw_url.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        _ => {
            return Err(SettingsError::InvalidValue {
                name: "GO_WA_API_URL",
                value: raw_url,
                expected: URL_EXPECTED,
            });
        }
    };
    let timeout_secs: u64 = source.positive("GO_WA_API_TIMEOUT_SECS", 30)?;

    Ok(Some(GatewaySettings {
        base_url,
        username: source.get("GO_WA_API_USERNAME"),
        password: source.get("GO_WA_API_PASSWORD"),
        timeout: Duration::from_secs(timeout_secs),
    }))
}

fn read_env_file(path: &Path) -> HashMap<String, String> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(
                path = %path.display(),
                not_found = error.not_found(),
                error = %error,
                "failed to read settings file; using defaults"
            );
            return HashMap::new();
        }
    };

    match entries.collect::<Result<HashMap<_, _>, _>>() {
        Ok(values) => values,
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error,
                "failed to parse settings file; using defaults"
            );
            HashMap::new()
        }
    }
}

fn parse_level(value: &str) -> Option<Level> {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
