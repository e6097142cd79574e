// 集成测试公共模块
//
// 提供测试辅助工具和共享功能

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use transcache::translation::config::EngineConfig;
use transcache::translation::error::{ProviderError, ProviderResult, TranslationError, TranslationResult};
use transcache::translation::model::PhraseRecord;
use transcache::translation::pipeline::writeback::{WriteBackConfig, WriteBackQueue};
use transcache::translation::provider::{TranslatedPair, Translator};
use transcache::translation::storage::cache::{CacheConfig, PhraseCache};
use transcache::translation::storage::store::{KvStore, MemoryStore};

/// 模拟服务商的应答方式
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 每行译文为 `原文 + 后缀`
    Suffix(String),
    /// 固定返回给定结果
    Fixed(Vec<TranslatedPair>),
    /// 总是失败
    Fail,
}

/// 模拟翻译服务商，记录每次收到的查询串
pub struct MockTranslator {
    reply: MockReply,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockTranslator {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn suffix(suffix: &str) -> Self {
        Self::new(MockReply::Suffix(suffix.to_string()))
    }

    pub fn failing() -> Self {
        Self::new(MockReply::Fail)
    }

    pub fn fixed(pairs: Vec<TranslatedPair>) -> Self {
        Self::new(MockReply::Fixed(pairs))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, query: &str, _from: &str, _to: &str) -> ProviderResult<Vec<TranslatedPair>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());

        match &self.reply {
            MockReply::Suffix(suffix) => Ok(query
                .split('\n')
                .map(|line| TranslatedPair::new(line, format!("{}{}", line, suffix)))
                .collect()),
            MockReply::Fixed(pairs) => Ok(pairs.clone()),
            MockReply::Fail => Err(ProviderError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// 记录调用并可按键注入失败的存储
///
/// 任何一次调用只要包含 `poisoned` 中的键就整体失败。
/// 可为 `mset` 设置延迟，并记录同时进行的 `mset` 调用数的峰值。
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    poisoned: Arc<Mutex<HashSet<String>>>,
    fail_all: Arc<Mutex<bool>>,
    mget_sizes: Arc<Mutex<Vec<usize>>>,
    mset_sizes: Arc<Mutex<Vec<usize>>>,
    mset_delay: Arc<Mutex<Option<Duration>>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poison(&self, key: &str) {
        self.poisoned.lock().unwrap().insert(key.to_string());
    }

    pub fn fail_all(&self, fail: bool) {
        *self.fail_all.lock().unwrap() = fail;
    }

    pub fn mget_sizes(&self) -> Vec<usize> {
        self.mget_sizes.lock().unwrap().clone()
    }

    pub fn mset_sizes(&self) -> Vec<usize> {
        self.mset_sizes.lock().unwrap().clone()
    }

    pub fn set_mset_delay(&self, delay: Duration) {
        *self.mset_delay.lock().unwrap() = Some(delay);
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn check<'a>(&self, mut keys: impl Iterator<Item = &'a String>) -> TranslationResult<()> {
        if *self.fail_all.lock().unwrap() {
            return Err(TranslationError::CacheError("store unavailable".to_string()));
        }
        let poisoned = self.poisoned.lock().unwrap();
        if keys.any(|key| poisoned.contains(key)) {
            return Err(TranslationError::CacheError("poisoned key".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KvStore for FlakyStore {
    async fn mget(&self, keys: &[String]) -> TranslationResult<Vec<Option<String>>> {
        self.mget_sizes.lock().unwrap().push(keys.len());
        self.check(keys.iter())?;
        self.inner.mget(keys).await
    }

    async fn mset(&self, pairs: &[(String, String)]) -> TranslationResult<()> {
        self.mset_sizes.lock().unwrap().push(pairs.len());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        let delay = *self.mset_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.check(pairs.iter().map(|(key, _)| key))?;
        self.inner.mset(pairs).await
    }
}

/// 测试配置构建器
pub struct TestConfigBuilder {
    cache_config: CacheConfig,
    writeback_config: WriteBackConfig,
    engine_config: EngineConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            cache_config: CacheConfig {
                timeout: Duration::from_secs(1),
                ..CacheConfig::default()
            },
            writeback_config: WriteBackConfig::default(),
            engine_config: EngineConfig::default(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.cache_config.chunk_size = chunk_size;
        self
    }

    pub fn with_key_prefix(mut self, prefix: &str) -> Self {
        self.cache_config.key_prefix = prefix.to_string();
        self
    }

    pub fn with_request_order(mut self) -> Self {
        self.engine_config.preserve_request_order = true;
        self
    }

    pub fn with_writeback(mut self, capacity: usize, concurrency: usize) -> Self {
        self.writeback_config = WriteBackConfig {
            capacity,
            max_concurrent_writes: concurrency,
        };
        self
    }

    pub fn build(self) -> TestConfiguration {
        TestConfiguration {
            cache_config: self.cache_config,
            writeback_config: self.writeback_config,
            engine_config: self.engine_config,
        }
    }
}

/// 测试配置
pub struct TestConfiguration {
    pub cache_config: CacheConfig,
    pub writeback_config: WriteBackConfig,
    pub engine_config: EngineConfig,
}

/// 测试环境：内存存储 + 模拟服务商 + 完整引擎
pub struct TestEnvironment {
    pub store: FlakyStore,
    pub cache: PhraseCache,
    pub translator: Arc<MockTranslator>,
    pub engine: transcache::TranslationEngine,
}

impl TestEnvironment {
    pub fn new(config: TestConfiguration, translator: MockTranslator) -> Self {
        let store = FlakyStore::new();
        let cache = PhraseCache::new(Arc::new(store.clone()), config.cache_config);
        let writeback = WriteBackQueue::spawn(cache.clone(), config.writeback_config);
        let translator = Arc::new(translator);
        let engine = transcache::TranslationEngine::new(
            cache.clone(),
            translator.clone(),
            writeback,
            config.engine_config,
        );

        Self {
            store,
            cache,
            translator,
            engine,
        }
    }

    pub fn with_translator(translator: MockTranslator) -> Self {
        Self::new(TestConfigBuilder::new().build(), translator)
    }

    /// 预先写入缓存
    pub async fn seed(&self, entries: &[(&str, &str)]) {
        let pairs: Vec<(String, String)> = entries
            .iter()
            .map(|(source, target)| (transcache::translation::fingerprint(source), target.to_string()))
            .collect();
        let written = self.cache.bulk_set(&pairs).await;
        assert_eq!(written, pairs.len(), "seeding should write every entry");
    }

    /// 轮询等待某条原文的译文出现在缓存里
    pub async fn wait_for_cached(&self, source: &str) -> Option<String> {
        let fingerprint = transcache::translation::fingerprint(source);
        for _ in 0..200 {
            let values = self.cache.bulk_get(std::slice::from_ref(&fingerprint)).await;
            if let Some(Some(value)) = values.into_iter().next() {
                return Some(value);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }
}

/// 测试数据生成器
pub struct TestDataGenerator;

impl TestDataGenerator {
    /// 生成 `count` 条互不相同的短语
    pub fn phrases(count: usize) -> Vec<PhraseRecord> {
        (0..count)
            .map(|i| PhraseRecord::new(format!("テスト文 {}", i)))
            .collect()
    }

    pub fn records(sources: &[&str]) -> Vec<PhraseRecord> {
        sources.iter().map(|s| PhraseRecord::new(*s)).collect()
    }
}

/// 断言辅助工具
pub struct AssertionHelper;

impl AssertionHelper {
    pub fn sources(records: &[PhraseRecord]) -> Vec<String> {
        records.iter().map(|r| r.source.clone()).collect()
    }

    pub fn assert_sources(records: &[PhraseRecord], expected: &[&str], description: &str) {
        let actual = Self::sources(records);
        assert_eq!(actual, expected, "{}: unexpected order", description);
    }

    pub fn assert_all_translated(records: &[PhraseRecord], description: &str) {
        for record in records {
            assert!(
                record.is_translated(),
                "{}: {:?} should be translated",
                description,
                record.source
            );
        }
    }
}
