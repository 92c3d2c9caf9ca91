use serde::{Deserialize, Serialize};

use crate::errors::{Result, SluglinkError};
use crate::services::{CleanupRetry, DEFAULT_MIN_TTL, ExpirationPolicy, LinkServiceConfig};
use crate::utils::SlugPolicy;
use crate::utils::slug::DEFAULT_SLUG_MAX_LENGTH;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 服务器地址、端口、CPU 数量
/// - store: KV 存储后端
/// - links: slug 规则、过期策略、预览模式
/// - api: 路由前缀与访问 token
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML > 默认值
    /// ENV 前缀：SL，分隔符：__
    /// 示例：SL__SERVER__PORT=9999
    pub fn load(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.prefix.is_empty() || !self.api.prefix.starts_with('/') {
            return Err(SluglinkError::config(format!(
                "api.prefix must start with '/', got '{}'",
                self.api.prefix
            )));
        }
        if let Some(max_ttl) = self.links.max_ttl
            && max_ttl < self.links.min_ttl
        {
            return Err(SluglinkError::config(format!(
                "links.max_ttl ({}) must not be below links.min_ttl ({})",
                max_ttl, self.links.min_ttl
            )));
        }
        if self.links.preview_mode && self.links.preview_ttl == 0 {
            return Err(SluglinkError::config(
                "links.preview_ttl must be positive when preview_mode is on",
            ));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// KV 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// memory | redis
    #[serde(default = "default_store_backend")]
    pub backend: String,
    #[serde(default)]
    pub redis: RedisConfig,
}

/// Redis 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
}

/// 链接生命周期配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub slug_suffix: Option<String>,
    #[serde(default = "default_slug_max_length")]
    pub slug_max_length: usize,
    /// 显式过期时间距现在的最小秒数
    #[serde(default = "default_min_ttl")]
    pub min_ttl: u64,
    /// 显式过期时间距现在的最大秒数；为空时只受存储上限约束
    #[serde(default)]
    pub max_ttl: Option<u64>,
    /// 预览模式：禁止编辑，且所有链接在 preview_ttl 秒内过期
    #[serde(default)]
    pub preview_mode: bool,
    #[serde(default = "default_preview_ttl")]
    pub preview_ttl: u64,
    #[serde(default = "default_retry_count")]
    pub cleanup_retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub cleanup_retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub cleanup_retry_max_delay_ms: u64,
}

impl LinksConfig {
    pub fn service_config(&self) -> LinkServiceConfig {
        LinkServiceConfig {
            slug: SlugPolicy {
                case_sensitive: self.case_sensitive,
                suffix: self.slug_suffix.clone(),
                max_length: self.slug_max_length,
            },
            expiration: ExpirationPolicy {
                preview_ttl: self.preview_mode.then_some(self.preview_ttl),
                min_ttl: self.min_ttl,
                max_ttl: self.max_ttl,
            },
            cleanup_retry: CleanupRetry {
                retries: self.cleanup_retry_count,
                base_delay_ms: self.cleanup_retry_base_delay_ms,
                max_delay_ms: self.cleanup_retry_max_delay_ms,
            },
        }
    }
}

/// HTTP API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_prefix")]
    pub prefix: String,
    /// Bearer token；为空时不校验
    #[serde(default)]
    pub token: Option<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// text | json
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_store_backend() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/".to_string()
}

fn default_slug_max_length() -> usize {
    DEFAULT_SLUG_MAX_LENGTH
}

fn default_min_ttl() -> u64 {
    DEFAULT_MIN_TTL
}

fn default_preview_ttl() -> u64 {
    24 * 60 * 60
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            redis: RedisConfig::default(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            slug_suffix: None,
            slug_max_length: default_slug_max_length(),
            min_ttl: default_min_ttl(),
            max_ttl: None,
            preview_mode: false,
            preview_ttl: default_preview_ttl(),
            cleanup_retry_count: default_retry_count(),
            cleanup_retry_base_delay_ms: default_retry_base_delay_ms(),
            cleanup_retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: default_api_prefix(),
            token: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
