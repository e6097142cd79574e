//! 键值存储抽象
//!
//! 远端缓存只需要两条多键命令：批量读取与批量写入。生产环境使用
//! [`crate::redis_cache::RedisCache`]，测试和未配置 Redis 时使用 [`MemoryStore`]。

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::translation::error::{helpers, TranslationResult};

/// 键值存储
///
/// 调用方负责把输入切分成合适的大小，实现只需保证单次调用内结果与输入一一对应。
#[async_trait]
pub trait KvStore: Send + Sync {
    /// 批量读取，返回值与 `keys` 等长同序，缺失为 `None`
    async fn mget(&self, keys: &[String]) -> TranslationResult<Vec<Option<String>>>;

    /// 批量写入
    async fn mset(&self, pairs: &[(String, String)]) -> TranslationResult<()>;
}

/// 进程内存储
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前条目数
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 直接读取单个键
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn mget(&self, keys: &[String]) -> TranslationResult<Vec<Option<String>>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| helpers::cache_error(format!("读取锁失败: {}", e)))?;

        Ok(keys.iter().map(|key| entries.get(key).cloned()).collect())
    }

    async fn mset(&self, pairs: &[(String, String)]) -> TranslationResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| helpers::cache_error(format!("写入锁失败: {}", e)))?;

        for (key, value) in pairs {
            entries.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store
            .mset(&[
                ("k1".to_string(), "v1".to_string()),
                ("k2".to_string(), "v2".to_string()),
            ])
            .await
            .unwrap();

        let values = store
            .mget(&["k2".to_string(), "missing".to_string(), "k1".to_string()])
            .await
            .unwrap();

        assert_eq!(
            values,
            vec![Some("v2".to_string()), None, Some("v1".to_string())]
        );
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = MemoryStore::new();
        store
            .mset(&[("k".to_string(), "old".to_string())])
            .await
            .unwrap();
        store
            .mset(&[("k".to_string(), "new".to_string())])
            .await
            .unwrap();

        assert_eq!(store.get("k").as_deref(), Some("new"));
    }
}
