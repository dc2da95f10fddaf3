use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use tripview_itinerary::AxisOrder;
use tripview_map::LatLng;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub pages: PagesConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public origin of this server, used for post-login return targets
    pub base_url: String,
}

/// Short-trip recommendation backend
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapConfig {
    #[serde(default)]
    pub app_key: String,
    #[serde(default = "default_sdk_url")]
    pub sdk_url: String,
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub place_axis_order: AxisOrder,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            app_key: String::new(),
            sdk_url: default_sdk_url(),
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
            level: default_level(),
            place_axis_order: AxisOrder::default(),
        }
    }
}

impl MapConfig {
    pub fn default_center(&self) -> LatLng {
        LatLng::new(self.default_latitude, self.default_longitude)
    }

    pub fn script_url(&self) -> String {
        format!(
            "{}?appkey={}&autoload=false&libraries=services",
            self.sdk_url,
            urlencoding::encode(&self.app_key)
        )
    }
}

fn default_sdk_url() -> String {
    "https://dapi.kakao.com/v2/maps/sdk.js".to_string()
}

fn default_latitude() -> f64 {
    37.566826
}

fn default_longitude() -> f64 {
    126.9786567
}

fn default_level() -> u8 {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct NavigationConfig {
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_saved_trips_path")]
    pub saved_trips_path: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            saved_trips_path: default_saved_trips_path(),
        }
    }
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_saved_trips_path() -> String {
    "/myTravel".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
        }
    }
}

fn default_cookie_name() -> String {
    "accessToken".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PagesConfig {
    #[serde(default = "default_idle_minutes")]
    pub idle_minutes: u64,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            idle_minutes: default_idle_minutes(),
        }
    }
}

fn default_idle_minutes() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (TRIPVIEW__API__BASE_URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.base_url", "http://localhost:3000")?
            .set_default("api.base_url", "http://localhost:8080")?
            .set_default("api.timeout_secs", 15)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored when missing
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("TRIPVIEW")
                .separator("__")
                .try_parsing(true),
        );

        // Names used by the former front-end build
        if let Ok(api_url) = env::var("SHORTTRIP_API_URL") {
            builder = builder.set_override("api.base_url", api_url)?;
        }
        if let Ok(app_key) = env::var("KAKAO_APP_KEY") {
            builder = builder.set_override("map.app_key", app_key)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err("API base_url must be an http(s) URL".to_string());
        }
        if self.api.timeout_secs == 0 {
            return Err("API timeout_secs must be at least 1".to_string());
        }
        if !self.map.default_center().is_valid() {
            return Err("Map default center is not a valid coordinate".to_string());
        }
        if !(1..=14).contains(&self.map.level) {
            return Err("Map level must be between 1 and 14".to_string());
        }
        if self.pages.idle_minutes == 0 {
            return Err("Pages idle_minutes must be at least 1".to_string());
        }
        Ok(())
    }
}
