//! 对账引擎
//!
//! 处理一个批量翻译请求的完整流程：
//!
//! 1. 为缺少指纹的记录计算指纹
//! 2. 按请求顺序批量查询缓存，命中的写入译文
//! 3. 划分为已翻译 / 未翻译两个子集（各自保持相对顺序）
//! 4. 未翻译子集的原文以换行连接，调用翻译服务商；条数一致时按位置合并，
//!    否则按回显原文的指纹合并，对不上的记录保持未翻译
//! 5. 新译文非阻塞地交给回写队列
//! 6. 组装结果：默认已翻译子集在前、新翻译子集在后
//!
//! 服务商失败时整个请求失败，不写缓存。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::translation::config::EngineConfig;
use crate::translation::error::{helpers, TranslationResult};
use crate::translation::model::PhraseRecord;
use crate::translation::pipeline::batch::{MergeStrategy, Partition};
use crate::translation::pipeline::writeback::WriteBackQueue;
use crate::translation::provider::Translator;
use crate::translation::storage::cache::PhraseCache;

/// 对账引擎
///
/// 所有依赖在构造时注入；引擎本身无可变状态（统计除外），可在多个请求间共享。
#[derive(Clone)]
pub struct TranslationEngine {
    cache: PhraseCache,
    translator: Arc<dyn Translator>,
    writeback: WriteBackQueue,
    config: EngineConfig,
    stats: Arc<EngineStats>,
}

impl TranslationEngine {
    /// 创建新的对账引擎
    pub fn new(
        cache: PhraseCache,
        translator: Arc<dyn Translator>,
        writeback: WriteBackQueue,
        config: EngineConfig,
    ) -> Self {
        Self {
            cache,
            translator,
            writeback,
            config,
            stats: Arc::new(EngineStats::default()),
        }
    }

    /// 翻译一个批次
    ///
    /// # 错误
    /// - `TranslationError::ProviderError`: 存在未命中缓存的记录且服务商调用失败
    pub async fn translate_batch(
        &self,
        mut records: Vec<PhraseRecord>,
    ) -> TranslationResult<Vec<PhraseRecord>> {
        let start_time = Instant::now();
        self.stats.requests.fetch_add(1, Ordering::Relaxed);

        if records.is_empty() {
            return Ok(records);
        }
        self.stats
            .phrases
            .fetch_add(records.len() as u64, Ordering::Relaxed);

        // 1. 指纹
        for record in records.iter_mut() {
            record.ensure_fingerprint();
        }

        // 2. 查询缓存
        let hits = self.apply_cached(&mut records).await;
        self.stats
            .cache_hits
            .fetch_add(hits as u64, Ordering::Relaxed);

        // 3. 划分
        let mut partition = Partition::split(records);

        tracing::info!(
            "已翻译: {} (缓存命中 {}), 未翻译: {}",
            partition.translated.len(),
            hits,
            partition.untranslated.len()
        );

        // 4. 调用服务商
        if !partition.untranslated.is_empty() {
            self.translate_untranslated(&mut partition).await?;

            // 5. 回写
            self.writeback.enqueue(partition.fresh_translations());
        }

        // 6. 组装
        let result = partition.assemble(self.config.preserve_request_order);

        tracing::debug!(
            "批次处理完成: {} 条, 耗时 {:?}",
            result.len(),
            start_time.elapsed()
        );

        Ok(result)
    }

    /// 获取统计信息
    pub fn get_stats(&self) -> EngineStatsSnapshot {
        self.stats.snapshot()
    }

    /// 回写队列句柄
    pub fn writeback(&self) -> &WriteBackQueue {
        &self.writeback
    }

    /// 缓存客户端
    pub fn cache(&self) -> &PhraseCache {
        &self.cache
    }

    /// 把缓存命中写入记录，返回由缓存提供译文的条数
    async fn apply_cached(&self, records: &mut [PhraseRecord]) -> usize {
        let fingerprints: Vec<String> = records.iter().map(|r| r.fingerprint.clone()).collect();
        let cached = self.cache.bulk_get(&fingerprints).await;

        let mut hits = 0;
        for (record, value) in records.iter_mut().zip(cached) {
            if let Some(target) = value {
                if record.fill(&target) {
                    hits += 1;
                }
            }
        }
        hits
    }

    async fn translate_untranslated(&self, partition: &mut Partition) -> TranslationResult<()> {
        let query = partition.query();
        let expected = partition.untranslated.len();

        tracing::info!(
            "调用 {} 翻译，词数: {}",
            self.translator.name(),
            expected
        );
        self.stats.provider_calls.fetch_add(1, Ordering::Relaxed);

        let results = match self
            .translator
            .translate(&query, &self.config.from_lang, &self.config.to_lang)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                self.stats.provider_failures.fetch_add(1, Ordering::Relaxed);
                return helpers::log_error(e.into());
            }
        };

        let (strategy, filled) = partition.merge(&results);
        if strategy == MergeStrategy::Fingerprint {
            self.stats.fallback_merges.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                "服务商返回 {} 条结果，期望 {} 条，改用指纹合并，填充 {} 条",
                results.len(),
                expected,
                filled
            );
        }

        self.stats
            .provider_translated
            .fetch_add(filled as u64, Ordering::Relaxed);

        Ok(())
    }
}

/// 引擎统计信息，原子计数
#[derive(Debug, Default)]
pub struct EngineStats {
    /// 处理的请求数（含空批次与失败请求）
    pub requests: AtomicU64,
    /// 收到的短语总数
    pub phrases: AtomicU64,
    /// 由缓存提供译文的短语数
    pub cache_hits: AtomicU64,
    /// 服务商调用次数
    pub provider_calls: AtomicU64,
    /// 服务商调用失败次数
    pub provider_failures: AtomicU64,
    /// 由服务商提供译文的短语数
    pub provider_translated: AtomicU64,
    /// 改用指纹合并的次数
    pub fallback_merges: AtomicU64,
}

impl EngineStats {
    pub fn snapshot(&self) -> EngineStatsSnapshot {
        EngineStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            phrases: self.phrases.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            provider_failures: self.provider_failures.load(Ordering::Relaxed),
            provider_translated: self.provider_translated.load(Ordering::Relaxed),
            fallback_merges: self.fallback_merges.load(Ordering::Relaxed),
        }
    }
}

/// 统计快照
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct EngineStatsSnapshot {
    pub requests: u64,
    pub phrases: u64,
    pub cache_hits: u64,
    pub provider_calls: u64,
    pub provider_failures: u64,
    pub provider_translated: u64,
    pub fallback_merges: u64,
}
