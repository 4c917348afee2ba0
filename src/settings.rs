use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::{env, fmt, str::FromStr};
use zeroize::Zeroizing;

const BASE_LAYER: &str = include_str!("../config/base.toml");
const DEVELOPMENT_LAYER: &str = include_str!("../config/development.toml");
const TESTING_LAYER: &str = include_str!("../config/testing.toml");
const PRODUCTION_LAYER: &str = include_str!("../config/production.toml");

/// Environment variables that override a single key of the layered profile.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("DEBUG", "security.debug"),
    ("SECRET_KEY", "security.secret_key"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.url"),
    ("EMAIL_HOST", "email.host"),
    ("EMAIL_PORT", "email.port"),
    ("EMAIL_HOST_USER", "email.username"),
    ("EMAIL_HOST_PASSWORD", "email.password"),
    ("DEFAULT_FROM_EMAIL", "email.from_address"),
    ("AWS_ACCESS_KEY_ID", "media.access_key_id"),
    ("AWS_SECRET_ACCESS_KEY", "media.secret_access_key"),
    ("AWS_STORAGE_BUCKET_NAME", "media.bucket"),
    ("AWS_S3_REGION_NAME", "media.region"),
];

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

impl AppEnvironment {
    /// Picks the profile from `DJANGO_ENV`, then from the last segment of
    /// `DJANGO_SETTINGS_MODULE`. Anything unrecognised means development.
    pub fn select(indicator: Option<&str>, settings_module: Option<&str>) -> Self {
        let raw = indicator
            .filter(|value| !value.trim().is_empty())
            .or_else(|| settings_module.and_then(|module| module.rsplit('.').next()));

        match raw {
            None => AppEnvironment::Development,
            Some(value) => value.parse().unwrap_or_else(|_| {
                tracing::warn!("Unknown environment '{}', falling back to development", value);
                AppEnvironment::Development
            }),
        }
    }

    fn layer(&self) -> &'static str {
        match self {
            AppEnvironment::Development => DEVELOPMENT_LAYER,
            AppEnvironment::Production => PRODUCTION_LAYER,
            AppEnvironment::Testing => TESTING_LAYER,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Zero means one worker per CPU.
    pub workers: usize,
}

impl ServerSettings {
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 { num_cpus::get() } else { self.workers }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

#[derive(Deserialize, Clone)]
pub struct SecuritySettings {
    pub debug: bool,
    pub allowed_hosts: Vec<String>,
    pub ssl_redirect: bool,
    pub secure_cookies: bool,
    pub secret_key: String,
    pub token_expiration_minutes: i64,
    pub fast_password_hashing: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Dummy,
    Locmem,
    Redis,
}

#[derive(Deserialize, Clone)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    pub url: String,
    pub timeout_seconds: u64,
    pub key_prefix: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
    #[serde(default)]
    pub directives: Vec<String>,
}

impl LoggingSettings {
    pub fn filter(&self) -> String {
        std::iter::once(self.level.clone())
            .chain(self.directives.iter().cloned())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaticStrategy {
    /// Serve straight from the source directory.
    Direct,
    /// Serve from the `collectstatic` output with long-lived cache headers.
    Collected,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StaticSettings {
    pub url: String,
    pub source_dir: String,
    pub root: String,
    pub strategy: StaticStrategy,
    pub max_age_seconds: u64,
}

impl StaticSettings {
    pub fn serving_dir(&self) -> &str {
        match self.strategy {
            StaticStrategy::Direct => &self.source_dir,
            StaticStrategy::Collected => &self.root,
        }
    }

    pub fn url_prefix(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailBackend {
    Console,
    Locmem,
    Smtp,
}

#[derive(Deserialize, Clone)]
pub struct EmailSettings {
    pub backend: EmailBackend,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaStorage {
    Local,
    S3,
}

#[derive(Deserialize, Clone)]
pub struct MediaSettings {
    pub storage: MediaStorage,
    pub url: String,
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl MediaSettings {
    /// Base URL that relative media references are resolved against.
    pub fn base_url(&self) -> String {
        match self.storage {
            MediaStorage::Local => self.url.clone(),
            MediaStorage::S3 => format!("https://{}.s3.{}.amazonaws.com/", self.bucket, self.region),
        }
    }

    /// Absolute references pass through untouched.
    pub fn resolve(&self, reference: &str) -> String {
        if reference.is_empty() || reference.contains("://") || reference.starts_with('/') {
            return reference.to_string();
        }
        format!("{}{}", self.base_url(), reference)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteSettings {
    pub name: String,
    pub time_zone: String,
    pub language_code: String,
}

#[derive(Deserialize, Clone)]
pub struct AppConfig {
    #[serde(skip, default = "default_env")]
    pub env: AppEnvironment,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub security: SecuritySettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
    pub static_files: StaticSettings,
    pub email: EmailSettings,
    pub media: MediaSettings,
    pub site: SiteSettings,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}

impl AppConfig {
    /// Loads `.env`, selects the profile and applies environment overrides.
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::new`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_name = AppEnvironment::select(
            lookup("DJANGO_ENV").as_deref(),
            lookup("DJANGO_SETTINGS_MODULE").as_deref(),
        );
        Self::build(env_name, lookup)
    }

    /// Deployment builds always run the production profile with debug off.
    pub fn for_deployment() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::deployment_from_lookup(|key| env::var(key).ok())
    }

    fn deployment_from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|key| match key {
            "DJANGO_ENV" => Some("production".to_string()),
            "DEBUG" => Some("False".to_string()),
            _ => lookup(key),
        })
    }

    /// The bare profile with no environment overrides.
    pub fn for_environment(env_name: AppEnvironment) -> Result<Self, ConfigError> {
        Self::build(env_name, |_| None)
    }

    fn build<F>(env_name: AppEnvironment, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder()
            .add_source(File::from_str(BASE_LAYER, FileFormat::Toml))
            .add_source(File::from_str(env_name.layer(), FileFormat::Toml));

        for (var, key) in ENV_OVERRIDES {
            let value = lookup(var).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.env = env_name;

        if config.cache.backend == CacheBackend::Locmem && !config.cache.url.trim().is_empty() {
            config.cache.backend = CacheBackend::Redis;
        }
        if !config.media.bucket.trim().is_empty() {
            config.media.storage = MediaStorage::S3;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database.url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.security.allowed_hosts.is_empty() {
            errors.push("ALLOWED_HOSTS cannot be empty");
        }
        if self.is_production() && self.security.secret_key.len() < 32 {
            errors.push("SECRET_KEY must be set to at least 32 characters in production");
        }
        if self.cache.backend == CacheBackend::Redis && self.cache.url.trim().is_empty() {
            errors.push("REDIS_URL is required for the redis cache backend");
        }
        if self.media.storage == MediaStorage::S3
            && (self.media.access_key_id.is_empty() || self.media.secret_access_key.is_empty())
        {
            errors.push("AWS credentials are required for S3 media storage");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn is_debug(&self) -> bool {
        self.security.debug
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("server", &self.server)
            .field("database", &self.database)
            .field("security", &self.security)
            .field("cache", &self.cache)
            .field("logging", &self.logging)
            .field("static_files", &self.static_files)
            .field("email", &self.email)
            .field("media", &self.media)
            .field("site", &self.site)
            .finish()
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Connection strings may carry credentials.
        let url = if self.url.starts_with("sqlite:") { self.url.as_str() } else { self.url.redact() };
        f.debug_struct("DatabaseSettings")
            .field("url", &url)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl fmt::Debug for SecuritySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecuritySettings")
            .field("debug", &self.debug)
            .field("allowed_hosts", &self.allowed_hosts)
            .field("ssl_redirect", &self.ssl_redirect)
            .field("secure_cookies", &self.secure_cookies)
            .field("secret_key", &self.secret_key.redact())
            .field("token_expiration_minutes", &self.token_expiration_minutes)
            .finish()
    }
}

impl fmt::Debug for CacheSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSettings")
            .field("backend", &self.backend)
            .field("url", &self.url.redact())
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettings")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.redact())
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl fmt::Debug for MediaSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSettings")
            .field("storage", &self.storage)
            .field("url", &self.url)
            .field("bucket", &self.bucket)
            .field("access_key_id", &self.access_key_id.redact())
            .field("secret_access_key", &self.secret_access_key.redact())
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl From<&AppConfig> for JwtKeys {
    fn from(config: &AppConfig) -> Self {
        let secret = Zeroizing::new(config.security.secret_key.clone());

        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_indicator_selects_development() {
        assert_eq!(AppEnvironment::select(None, None), AppEnvironment::Development);
    }

    #[test]
    fn unknown_indicators_fall_back_to_development() {
        for value in ["staging", "PROD", "", "dev", "test", "production2"] {
            assert_eq!(
                AppEnvironment::select(Some(value), None),
                AppEnvironment::Development,
                "value {value:?}"
            );
        }
    }

    #[test]
    fn known_indicators_are_case_insensitive() {
        assert_eq!(AppEnvironment::select(Some("Production"), None), AppEnvironment::Production);
        assert_eq!(AppEnvironment::select(Some("testing"), None), AppEnvironment::Testing);
    }

    #[test]
    fn settings_module_is_used_when_indicator_is_absent() {
        assert_eq!(
            AppEnvironment::select(None, Some("portfolio.settings.production")),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::select(None, Some("portfolio.settings")),
            AppEnvironment::Development
        );
        assert_eq!(
            AppEnvironment::select(Some("testing"), Some("portfolio.settings.production")),
            AppEnvironment::Testing
        );
    }

    #[test]
    fn development_profile_overrides_base() {
        let config = AppConfig::for_environment(AppEnvironment::Development).unwrap();

        assert!(config.security.debug);
        assert_eq!(config.cache.backend, CacheBackend::Dummy);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.static_files.strategy, StaticStrategy::Direct);
        assert!(config.security.allowed_hosts.contains(&"*".to_string()));
        // inherited from base
        assert_eq!(config.site.time_zone, "Asia/Bangkok");
    }

    #[test]
    fn testing_profile_uses_in_memory_database() {
        let config = AppConfig::for_environment(AppEnvironment::Testing).unwrap();

        assert!(config.database.is_in_memory());
        assert_eq!(config.email.backend, EmailBackend::Locmem);
        assert_eq!(config.logging.level, "error");
        assert!(!config.security.allowed_hosts.contains(&"*".to_string()));
    }

    #[test]
    fn production_requires_secret_key() {
        let err = AppConfig::from_lookup(lookup_from(&[("DJANGO_ENV", "production")])).unwrap_err();
        assert!(err.to_string().contains("SECRET_KEY"));
    }

    #[test]
    fn production_profile_with_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DJANGO_ENV", "production"),
            ("SECRET_KEY", "a-production-secret-key-that-is-long-enough"),
            ("REDIS_URL", "redis://cache:6379"),
            ("DEBUG", "False"),
            ("DATABASE_URL", "sqlite:/tmp/portfolio.sqlite3"),
        ]))
        .unwrap();

        assert_eq!(config.env, AppEnvironment::Production);
        assert!(!config.security.debug);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.static_files.serving_dir(), "staticfiles");
        assert_eq!(config.database.url, "sqlite:/tmp/portfolio.sqlite3");
    }

    #[test]
    fn deployment_forces_production_without_debug() {
        let config = AppConfig::deployment_from_lookup(lookup_from(&[
            ("DJANGO_ENV", "development"),
            ("DEBUG", "True"),
            ("SECRET_KEY", "a-production-secret-key-that-is-long-enough"),
        ]))
        .unwrap();

        assert_eq!(config.env, AppEnvironment::Production);
        assert!(!config.security.debug);
    }

    #[test]
    fn debug_variable_overrides_profile_default() {
        let config = AppConfig::from_lookup(lookup_from(&[("DEBUG", "false")])).unwrap();
        assert_eq!(config.env, AppEnvironment::Development);
        assert!(!config.security.debug);
    }

    #[test]
    fn bucket_switches_media_to_s3() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("AWS_STORAGE_BUCKET_NAME", "portfolio-media"),
            ("AWS_ACCESS_KEY_ID", "key"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("AWS_S3_REGION_NAME", "ap-southeast-1"),
        ]))
        .unwrap();

        assert_eq!(config.media.storage, MediaStorage::S3);
        assert_eq!(
            config.media.resolve("projects/cover.png"),
            "https://portfolio-media.s3.ap-southeast-1.amazonaws.com/projects/cover.png"
        );
        assert_eq!(config.media.resolve("https://cdn.example.com/a.png"), "https://cdn.example.com/a.png");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = AppConfig::for_environment(AppEnvironment::Testing).unwrap();
        let rendered = format!("{config:?}");

        assert!(!rendered.contains(&config.security.secret_key));
        assert!(rendered.contains("[REDACTED]"));
    }
}
