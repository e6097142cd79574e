//! Redis 缓存模块
//!
//! 以 Redis 作为短语缓存的键值存储，批量读写分别使用 MGET / MSET。
//! 键不设过期时间。

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, RedisResult};

use crate::translation::error::TranslationResult;
use crate::translation::storage::store::KvStore;

/// Redis 缓存配置
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    pub url: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: crate::translation::config::constants::DEFAULT_REDIS_URL.to_string(),
        }
    }
}

/// Redis 缓存客户端
///
/// 内部使用 `ConnectionManager`，断线后自动重连，克隆后共享同一条多路复用连接。
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
    config: RedisCacheConfig,
}

impl RedisCache {
    /// 连接 Redis
    pub async fn connect(config: RedisCacheConfig) -> RedisResult<Self> {
        let client = Client::open(config.url.as_str())?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self { manager, config })
    }

    /// 测试 Redis 连接
    pub async fn test_connection(&self) -> RedisResult<()> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    pub fn config(&self) -> &RedisCacheConfig {
        &self.config
    }
}

#[async_trait]
impl KvStore for RedisCache {
    async fn mget(&self, keys: &[String]) -> TranslationResult<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.manager.clone();
        let values: Vec<Option<String>> = redis::cmd("MGET").arg(keys).query_async(&mut conn).await?;
        Ok(values)
    }

    async fn mset(&self, pairs: &[(String, String)]) -> TranslationResult<()> {
        if pairs.is_empty() {
            return Ok(());
        }

        let mut cmd = redis::cmd("MSET");
        for (key, value) in pairs {
            cmd.arg(key).arg(value);
        }

        let mut conn = self.manager.clone();
        let _: () = cmd.query_async(&mut conn).await?;
        Ok(())
    }
}
