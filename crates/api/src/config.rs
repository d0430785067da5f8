use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub token: TokenConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub admin: AdminBootstrapConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// `dev` or `prod`.
    #[serde(default = "default_env")]
    pub env: String,

    /// Prefix every route is mounted under, e.g. `/helper-admin`.
    #[serde(default)]
    pub base_url: String,

    /// Snowflake worker id of this instance (0..=63).
    #[serde(default)]
    pub worker_id: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Largest accepted request body, multipart uploads included.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn pool_settings(&self) -> persistence::db::PoolSettings {
        persistence::db::PoolSettings {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            acquire_timeout: Duration::from_secs(self.connect_timeout_secs),
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    /// Write to a daily rolling file in this directory instead of stdout.
    #[serde(default)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// HS256 signing secret for admin tokens.
    pub secret: String,

    #[serde(default = "default_token_timeout")]
    pub timeout_secs: i64,

    /// Login attempts allowed per username and minute; 0 turns throttling off.
    #[serde(default = "default_login_attempts")]
    pub login_attempts_per_minute: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: StorageBackend,

    /// S3-compatible endpoint, e.g. `https://oss-cn-hangzhou.aliyuncs.com`.
    #[serde(default)]
    pub endpoint: String,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub bucket: String,

    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub access_key_secret: String,

    /// Domain public URLs are built on.
    #[serde(default)]
    pub bucket_bind_domain: String,

    /// Root directory of the `local` backend.
    #[serde(default)]
    pub local_root: String,

    /// Where uploads are staged before they are pushed to storage.
    #[serde(default = "default_upload_tmp_path")]
    pub upload_tmp_path: String,

    #[serde(default = "default_pic_base_path")]
    pub pic_base_path: String,

    #[serde(default = "default_version_base_path")]
    pub version_base_path: String,

    /// Stable key that always points at the latest published release file.
    #[serde(default = "default_release_file_key")]
    pub release_file_key: String,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Seeds the first super admin on an empty `admin_user` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminBootstrapConfig {
    #[serde(default)]
    pub bootstrap_username: String,

    #[serde(default)]
    pub bootstrap_password: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_env() -> String {
    "dev".to_string()
}
fn default_request_timeout() -> u64 {
    60
}
fn default_max_body_size() -> usize {
    110 * 1024 * 1024
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    2
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_token_timeout() -> i64 {
    86_400
}
fn default_login_attempts() -> u32 {
    10
}
fn default_storage_backend() -> StorageBackend {
    StorageBackend::Local
}
fn default_region() -> String {
    "us-east-1".to_string()
}
fn default_upload_tmp_path() -> String {
    "./tmp/uploads".to_string()
}
fn default_pic_base_path() -> String {
    "helper/pic".to_string()
}
fn default_version_base_path() -> String {
    "helper/version".to_string()
}
fn default_release_file_key() -> String {
    "helper/release/latest.apk".to_string()
}
fn default_max_upload_bytes() -> usize {
    100 * 1024 * 1024
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with HA__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("HA").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests do not depend on the config directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            env = "dev"
            base_url = ""
            worker_id = 1
            request_timeout_secs = 60
            max_body_size = 115343360

            [database]
            url = ""
            max_connections = 20
            min_connections = 2
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [token]
            secret = "test-secret"
            timeout_secs = 86400

            [storage]
            backend = "local"
            local_root = "./tmp/storage"
            bucket_bind_domain = "cdn.example.com"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "HA__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.token.secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "HA__TOKEN__SECRET environment variable must be set".to_string(),
            ));
        }

        if self.token.timeout_secs <= 0 {
            return Err(ConfigValidationError::InvalidValue(
                "token.timeout_secs must be positive".to_string(),
            ));
        }

        if self.server.worker_id > shared::snowflake::MAX_WORKER_ID {
            return Err(ConfigValidationError::InvalidValue(format!(
                "server.worker_id must be at most {}",
                shared::snowflake::MAX_WORKER_ID
            )));
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                for (name, value) in [
                    ("storage.bucket", &self.storage.bucket),
                    ("storage.endpoint", &self.storage.endpoint),
                    ("storage.bucket_bind_domain", &self.storage.bucket_bind_domain),
                ] {
                    if value.is_empty() {
                        return Err(ConfigValidationError::MissingRequired(format!(
                            "{} is required for the s3 storage backend",
                            name
                        )));
                    }
                }
            }
            StorageBackend::Local => {
                if self.storage.local_root.is_empty() {
                    return Err(ConfigValidationError::MissingRequired(
                        "storage.local_root is required for the local storage backend"
                            .to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    /// Route prefix without a trailing slash; empty when routes are mounted at the root.
    pub fn base_path(&self) -> String {
        let trimmed = self.server.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}
