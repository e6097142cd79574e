//! 短语缓存客户端
//!
//! 在 [`KvStore`] 之上提供按指纹的批量读写。远端可能拒绝或截断过长的多键命令，
//! 因此读写都按固定大小分段，每段一次远端调用，读取结果按原顺序拼回。
//!
//! 单段失败只记录日志：读取时该段全部视为未命中，写入时该段被丢弃，
//! 不影响其它段，也不影响请求本身。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::translation::config::constants;
use crate::translation::error::{helpers, TranslationResult};
use crate::translation::storage::store::KvStore;

/// 缓存配置
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// 每段最多包含的键数
    pub chunk_size: usize,
    /// 单段远端调用超时
    pub timeout: Duration,
    /// 键前缀
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            chunk_size: constants::DEFAULT_CHUNK_SIZE,
            timeout: Duration::from_secs(constants::DEFAULT_CACHE_TIMEOUT_SECS),
            key_prefix: String::new(),
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub failed_chunks: u64,
}

impl CacheStats {
    /// 计算缓存命中率
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}

#[derive(Debug, Default)]
struct AtomicCacheStats {
    lookups: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    failed_chunks: AtomicU64,
}

/// 短语缓存
#[derive(Clone)]
pub struct PhraseCache {
    store: Arc<dyn KvStore>,
    config: CacheConfig,
    stats: Arc<AtomicCacheStats>,
}

impl PhraseCache {
    /// 创建新的短语缓存
    pub fn new(store: Arc<dyn KvStore>, config: CacheConfig) -> Self {
        let config = CacheConfig {
            chunk_size: config.chunk_size.max(1),
            ..config
        };

        Self {
            store,
            config,
            stats: Arc::new(AtomicCacheStats::default()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// 批量查询译文
    ///
    /// 返回值与 `fingerprints` 等长同序；空值按未命中处理。
    pub async fn bulk_get(&self, fingerprints: &[String]) -> Vec<Option<String>> {
        if fingerprints.is_empty() {
            return Vec::new();
        }

        let keys: Vec<String> = fingerprints.iter().map(|f| self.key_for(f)).collect();
        let chunks: Vec<&[String]> = keys.chunks(self.config.chunk_size).collect();
        let chunk_count = chunks.len();

        let results = join_all(
            chunks
                .into_iter()
                .enumerate()
                .map(|(index, chunk)| self.get_chunk(index, chunk)),
        )
        .await;

        let mut values = Vec::with_capacity(fingerprints.len());
        for chunk_values in results {
            values.extend(chunk_values);
        }

        let hits = values.iter().filter(|v| v.is_some()).count() as u64;
        let lookups = values.len() as u64;
        self.stats.lookups.fetch_add(lookups, Ordering::Relaxed);
        self.stats.hits.fetch_add(hits, Ordering::Relaxed);
        self.stats.misses.fetch_add(lookups - hits, Ordering::Relaxed);

        tracing::debug!(
            "缓存查询: {} 个键, {} 段, 命中 {}",
            lookups,
            chunk_count,
            hits
        );

        values
    }

    /// 批量写入译文
    ///
    /// 按段顺序写入，失败的段记录日志后跳过。返回成功写入的条目数。
    pub async fn bulk_set(&self, pairs: &[(String, String)]) -> usize {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(fingerprint, target)| (self.key_for(fingerprint), target.clone()))
            .collect();

        let mut written = 0;
        for (index, chunk) in pairs.chunks(self.config.chunk_size).enumerate() {
            match self.set_chunk(chunk).await {
                Ok(()) => written += chunk.len(),
                Err(e) => {
                    self.stats.failed_chunks.fetch_add(1, Ordering::Relaxed);
                    helpers::log(&e.with_context(format!("MSET 第 {} 段, {} 个键", index, chunk.len())));
                }
            }
        }

        self.stats.writes.fetch_add(written as u64, Ordering::Relaxed);
        written
    }

    /// 获取统计信息
    pub fn get_stats(&self) -> CacheStats {
        CacheStats {
            lookups: self.stats.lookups.load(Ordering::Relaxed),
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            writes: self.stats.writes.load(Ordering::Relaxed),
            failed_chunks: self.stats.failed_chunks.load(Ordering::Relaxed),
        }
    }

    fn key_for(&self, fingerprint: &str) -> String {
        format!("{}{}", self.config.key_prefix, fingerprint)
    }

    async fn get_chunk(&self, index: usize, keys: &[String]) -> Vec<Option<String>> {
        let result: TranslationResult<Vec<Option<String>>> =
            match tokio::time::timeout(self.config.timeout, self.store.mget(keys)).await {
                Ok(inner) => inner,
                Err(elapsed) => Err(elapsed.into()),
            };

        match result {
            Ok(values) if values.len() == keys.len() => values
                .into_iter()
                .map(|v| v.filter(|s| !s.is_empty()))
                .collect(),
            Ok(values) => {
                self.stats.failed_chunks.fetch_add(1, Ordering::Relaxed);
                helpers::log(&helpers::cache_error(format!(
                    "MGET 第 {} 段返回 {} 个值, 期望 {}",
                    index,
                    values.len(),
                    keys.len()
                )));
                vec![None; keys.len()]
            }
            Err(e) => {
                self.stats.failed_chunks.fetch_add(1, Ordering::Relaxed);
                helpers::log(&e.with_context(format!("MGET 第 {} 段, {} 个键", index, keys.len())));
                vec![None; keys.len()]
            }
        }
    }

    async fn set_chunk(&self, pairs: &[(String, String)]) -> TranslationResult<()> {
        tokio::time::timeout(self.config.timeout, self.store.mset(pairs)).await?
    }
}
