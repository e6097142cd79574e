//! 翻译配置
//!
//! 把环境变量汇总 [`EnvConfig`] 拆分成各组件自己的配置结构。

use std::time::Duration;

use crate::env::EnvConfig;
use crate::translation::pipeline::writeback::WriteBackConfig;
use crate::translation::provider::baidu::BaiduConfig;
use crate::translation::storage::cache::CacheConfig;

/// 翻译配置常量
pub mod constants {
    /// 批量查询/写入的单段键数
    pub const DEFAULT_CHUNK_SIZE: usize = 300;
    /// 回写队列容量（批次数）
    pub const DEFAULT_WRITEBACK_CAPACITY: usize = 2000;
    /// 回写并发任务数
    pub const DEFAULT_WRITEBACK_CONCURRENCY: usize = 16;
    pub const DEFAULT_CACHE_TIMEOUT_SECS: u64 = 5;
    pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;
    pub const DEFAULT_API_URL: &str = "http://api.fanyi.baidu.com/api/trans/vip/translate";
    pub const DEFAULT_FROM_LANG: &str = "jp";
    pub const DEFAULT_TO_LANG: &str = "zh";
    /// 服务商的批量约定：一行一条
    pub const QUERY_DELIMITER: &str = "\n";
    pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6300";
    /// 使用进程内存储的 Redis 地址占位值
    pub const MEMORY_STORE_URL: &str = "memory";
}

/// 对账引擎配置
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// 源语言
    pub from_lang: String,
    /// 目标语言
    pub to_lang: String,
    /// 为 true 时按请求顺序返回；默认先返回命中缓存的部分，再返回新翻译的部分
    pub preserve_request_order: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            from_lang: constants::DEFAULT_FROM_LANG.to_string(),
            to_lang: constants::DEFAULT_TO_LANG.to_string(),
            preserve_request_order: false,
        }
    }
}

/// 服务整体配置
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    pub engine: EngineConfig,
    pub cache: CacheConfig,
    pub writeback: WriteBackConfig,
    pub provider: BaiduConfig,
    pub redis_url: String,
}

impl TranslationConfig {
    /// 从环境变量汇总构建
    pub fn from_env_config(env: &EnvConfig) -> Self {
        Self {
            engine: EngineConfig {
                from_lang: env.provider_from.clone(),
                to_lang: env.provider_to.clone(),
                preserve_request_order: env.preserve_request_order,
            },
            cache: CacheConfig {
                chunk_size: env.cache_chunk_size,
                timeout: env.cache_timeout,
                key_prefix: env.cache_key_prefix.clone(),
            },
            writeback: WriteBackConfig {
                capacity: env.writeback_capacity,
                max_concurrent_writes: env.writeback_concurrency,
            },
            provider: BaiduConfig {
                api_url: env.provider_api_url.clone(),
                app_id: env.provider_app_id.clone(),
                secret: env.provider_secret.clone(),
                timeout: env.provider_timeout,
            },
            redis_url: env.redis_url.clone(),
        }
    }

    /// 是否使用进程内存储
    pub fn uses_memory_store(&self) -> bool {
        self.redis_url == constants::MEMORY_STORE_URL
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            cache: CacheConfig::default(),
            writeback: WriteBackConfig::default(),
            provider: BaiduConfig {
                api_url: constants::DEFAULT_API_URL.to_string(),
                app_id: String::new(),
                secret: String::new(),
                timeout: Duration::from_secs(constants::DEFAULT_PROVIDER_TIMEOUT_SECS),
            },
            redis_url: constants::MEMORY_STORE_URL.to_string(),
        }
    }
}
