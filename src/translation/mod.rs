//! 翻译模块
//!
//! 带指纹缓存的批量短语翻译：
//! - **core**: 指纹与对账引擎
//! - **pipeline**: 批次划分、结果合并、缓存回写队列
//! - **provider**: 外部翻译服务商
//! - **storage**: 键值存储与分块缓存客户端
//! - **config**: 配置与常量
//! - **model**: 线上数据结构
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use transcache::translation::{
//!     CacheConfig, EngineConfig, MemoryStore, PhraseCache, PhraseRecord, TranslationEngine,
//!     WriteBackConfig, WriteBackQueue,
//! };
//! use transcache::translation::provider::{BaiduConfig, BaiduTranslator};
//!
//! # async fn example(baidu: BaiduConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let cache = PhraseCache::new(Arc::new(MemoryStore::new()), CacheConfig::default());
//! let writeback = WriteBackQueue::spawn(cache.clone(), WriteBackConfig::default());
//! let translator = Arc::new(BaiduTranslator::new(baidu)?);
//! let engine = TranslationEngine::new(cache, translator, writeback, EngineConfig::default());
//!
//! let translated = engine.translate_batch(vec![PhraseRecord::new("猫")]).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod storage;

pub use config::{constants, EngineConfig, TranslationConfig};
pub use core::{fingerprint, EngineStatsSnapshot, TranslationEngine};
pub use error::{ErrorCategory, ErrorSeverity, ProviderError, TranslationError, TranslationResult};
pub use model::{PhraseRecord, ResultMessage};
pub use pipeline::{EnqueueOutcome, MergeStrategy, Partition, WriteBackConfig, WriteBackQueue};
pub use provider::{TranslatedPair, Translator};
pub use storage::{CacheConfig, CacheStats, KvStore, MemoryStore, PhraseCache};
