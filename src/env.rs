//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量管理

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "TRANSCACHE_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }
}

/// 翻译服务商相关环境变量
pub mod provider {
    use super::*;

    /// 服务商接口地址
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "TRANSCACHE_PROVIDER_API_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("http://api.fanyi.baidu.com/api/trans/vip/translate".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Translation provider endpoint URL";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 应用 ID
    pub struct AppId;
    impl EnvVar<String> for AppId {
        const NAME: &'static str = "TRANSCACHE_PROVIDER_APP_ID";
        const DEFAULT: Option<String> = None; // 无默认值，必须设置
        const DESCRIPTION: &'static str = "Application id issued by the translation provider";

        fn parse(value: &str) -> EnvResult<String> {
            non_empty(value, Self::NAME)
        }
    }

    /// 应用密钥
    pub struct Secret;
    impl EnvVar<String> for Secret {
        const NAME: &'static str = "TRANSCACHE_PROVIDER_SECRET";
        const DEFAULT: Option<String> = None; // 无默认值，必须设置
        const DESCRIPTION: &'static str = "Shared secret used to sign provider requests";

        fn parse(value: &str) -> EnvResult<String> {
            non_empty(value, Self::NAME)
        }
    }

    /// 源语言
    pub struct FromLang;
    impl EnvVar<String> for FromLang {
        const NAME: &'static str = "TRANSCACHE_PROVIDER_FROM";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("jp".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Source language code as the provider spells it";

        fn parse(value: &str) -> EnvResult<String> {
            parse_lang(value, Self::NAME)
        }
    }

    /// 目标语言
    pub struct ToLang;
    impl EnvVar<String> for ToLang {
        const NAME: &'static str = "TRANSCACHE_PROVIDER_TO";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("zh".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Target language code as the provider spells it";

        fn parse(value: &str) -> EnvResult<String> {
            parse_lang(value, Self::NAME)
        }
    }

    /// 调用超时
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "TRANSCACHE_PROVIDER_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(10));
        const DESCRIPTION: &'static str = "Provider call timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_seconds(value, Self::NAME, 1, 120)
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// Redis 地址
    pub struct RedisUrl;
    impl EnvVar<String> for RedisUrl {
        const NAME: &'static str = "TRANSCACHE_REDIS_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("redis://127.0.0.1:6300".to_string()),
            }
        }
        const DESCRIPTION: &'static str =
            "Redis connection URL, or 'memory' for an in-process store";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url == "memory" || url.starts_with("redis://") || url.starts_with("rediss://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Redis URL must start with redis:// or rediss://, or be 'memory'"
                        .to_string(),
                })
            }
        }
    }

    /// 键前缀
    pub struct KeyPrefix;
    impl EnvVar<String> for KeyPrefix {
        const NAME: &'static str = "TRANSCACHE_CACHE_KEY_PREFIX";
        const DEFAULT: Option<String> = Some(String::new());
        const DESCRIPTION: &'static str = "Prefix prepended to every fingerprint key";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_string())
        }
    }

    /// 单次命令的最大键数
    pub struct ChunkSize;
    impl EnvVar<usize> for ChunkSize {
        const NAME: &'static str = "TRANSCACHE_CACHE_CHUNK_SIZE";
        const DEFAULT: Option<usize> = Some(300);
        const DESCRIPTION: &'static str = "Maximum keys per MGET/MSET command";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 10000)
        }
    }

    /// 单次命令超时
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "TRANSCACHE_CACHE_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(5));
        const DESCRIPTION: &'static str = "Per-command cache timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_seconds(value, Self::NAME, 1, 60)
        }
    }
}

/// 异步回写相关环境变量
pub mod writeback {
    use super::*;

    /// 队列容量
    pub struct Capacity;
    impl EnvVar<usize> for Capacity {
        const NAME: &'static str = "TRANSCACHE_WRITEBACK_CAPACITY";
        const DEFAULT: Option<usize> = Some(2000);
        const DESCRIPTION: &'static str = "Pending batches the write-back queue holds";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 1_000_000)
        }
    }

    /// 并发写入数
    pub struct Concurrency;
    impl EnvVar<usize> for Concurrency {
        const NAME: &'static str = "TRANSCACHE_WRITEBACK_CONCURRENCY";
        const DEFAULT: Option<usize> = Some(16);
        const DESCRIPTION: &'static str = "Maximum concurrent cache write tasks";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 1024)
        }
    }
}

/// 结果组装相关环境变量
pub mod reconcile {
    use super::*;

    /// 保持请求顺序
    pub struct PreserveRequestOrder;
    impl EnvVar<bool> for PreserveRequestOrder {
        const NAME: &'static str = "TRANSCACHE_PRESERVE_REQUEST_ORDER";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str =
            "Return phrases in request order instead of cached-then-translated";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "TRANSCACHE_WEB_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("0.0.0.0".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "TRANSCACHE_WEB_PORT";
        const DEFAULT: Option<u16> = Some(8080);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;

            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port cannot be 0".to_string(),
                });
            }

            Ok(port)
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn parse_seconds(value: &str, var_name: &str, min: u64, max: u64) -> EnvResult<Duration> {
    let seconds: u64 = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid number of seconds".to_string(),
    })?;

    if seconds < min || seconds > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Timeout must be between {} and {} seconds", min, max),
        });
    }

    Ok(Duration::from_secs(seconds))
}

fn parse_lang(value: &str, var_name: &str) -> EnvResult<String> {
    let lang = value.trim().to_lowercase();
    if lang.is_empty() || lang.len() > 8 || !lang.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid language code '{}'", value),
        });
    }
    Ok(lang)
}

fn non_empty(value: &str, var_name: &str) -> EnvResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Value cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// .env 文件加载结果
///
/// 加载通常发生在日志订阅器安装之前，因此结果先记录下来，由调用方稍后输出。
#[derive(Debug, Default)]
pub struct DotenvReport {
    /// 成功加载的文件
    pub loaded: Option<PathBuf>,
    /// 存在但无法加载的文件及错误
    pub failures: Vec<(PathBuf, String)>,
}

impl DotenvReport {
    /// 输出加载结果
    pub fn log(&self) {
        for (file, error) in &self.failures {
            tracing::warn!("无法加载环境变量文件 {}: {}", file.display(), error);
        }
        match &self.loaded {
            Some(file) => tracing::info!("已加载环境变量文件: {}", file.display()),
            None => tracing::debug!("未找到 .env 文件"),
        }
    }
}

/// 加载 .env 文件
///
/// 按优先级查找 `.env.local`、`.env`，找到第一个能加载的文件就停止。
/// 已存在的进程环境变量不会被覆盖。
pub fn load_dotenv() -> DotenvReport {
    load_dotenv_from(&[".env.local", ".env"])
}

/// 按给定顺序加载第一个可用的 .env 文件
pub fn load_dotenv_from<P: AsRef<Path>>(env_files: &[P]) -> DotenvReport {
    let mut report = DotenvReport::default();

    for env_file in env_files {
        let path = env_file.as_ref();
        if !path.exists() {
            continue;
        }
        match dotenv::from_path(path) {
            Ok(()) => {
                report.loaded = Some(path.to_path_buf());
                break;
            }
            Err(e) => report.failures.push((path.to_path_buf(), e.to_string())),
        }
    }

    report
}

/// 环境变量配置汇总
#[derive(Clone)]
pub struct EnvConfig {
    // 核心配置
    pub log_level: String,

    // 服务商配置
    pub provider_api_url: String,
    pub provider_app_id: String,
    pub provider_secret: String,
    pub provider_from: String,
    pub provider_to: String,
    pub provider_timeout: Duration,

    // 缓存配置
    pub redis_url: String,
    pub cache_key_prefix: String,
    pub cache_chunk_size: usize,
    pub cache_timeout: Duration,

    // 回写配置
    pub writeback_capacity: usize,
    pub writeback_concurrency: usize,

    // 结果组装
    pub preserve_request_order: bool,

    // Web配置
    pub web_bind_address: String,
    pub web_port: u16,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: core::LogLevel::get()?,

            provider_api_url: provider::ApiUrl::get()?,
            provider_app_id: provider::AppId::get()?,
            provider_secret: provider::Secret::get()?,
            provider_from: provider::FromLang::get()?,
            provider_to: provider::ToLang::get()?,
            provider_timeout: provider::Timeout::get()?,

            redis_url: cache::RedisUrl::get()?,
            cache_key_prefix: cache::KeyPrefix::get()?,
            cache_chunk_size: cache::ChunkSize::get()?,
            cache_timeout: cache::Timeout::get()?,

            writeback_capacity: writeback::Capacity::get()?,
            writeback_concurrency: writeback::Concurrency::get()?,

            preserve_request_order: reconcile::PreserveRequestOrder::get()?,

            web_bind_address: web::BindAddress::get()?,
            web_port: web::Port::get()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.provider_from == self.provider_to {
            return Err(EnvError {
                variable: provider::ToLang::NAME.to_string(),
                message: "Source and target language must differ".to_string(),
            });
        }
        Ok(())
    }

    /// 记录配置摘要（隐藏敏感信息）
    pub fn log_summary(&self) {
        tracing::info!(
            provider = %self.provider_api_url,
            from = %self.provider_from,
            to = %self.provider_to,
            redis = %self.redis_url,
            chunk_size = self.cache_chunk_size,
            writeback_capacity = self.writeback_capacity,
            preserve_request_order = self.preserve_request_order,
            "配置已加载"
        );
    }
}

impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfig")
            .field("log_level", &self.log_level)
            .field("provider_api_url", &self.provider_api_url)
            .field("provider_app_id", &self.provider_app_id)
            .field("provider_secret", &"[configured]")
            .field("provider_from", &self.provider_from)
            .field("provider_to", &self.provider_to)
            .field("provider_timeout", &self.provider_timeout)
            .field("redis_url", &self.redis_url)
            .field("cache_key_prefix", &self.cache_key_prefix)
            .field("cache_chunk_size", &self.cache_chunk_size)
            .field("cache_timeout", &self.cache_timeout)
            .field("writeback_capacity", &self.writeback_capacity)
            .field("writeback_concurrency", &self.writeback_concurrency)
            .field("preserve_request_order", &self.preserve_request_order)
            .field("web_bind_address", &self.web_bind_address)
            .field("web_port", &self.web_port)
            .finish()
    }
}
