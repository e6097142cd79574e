//! 翻译核心模块
//!
//! - **指纹** (`fingerprint.rs`): 原文到缓存键的确定性映射
//! - **引擎** (`engine.rs`): 批次对账，协调缓存、服务商与回写队列
//!
//! ```text
//! TranslationEngine (engine.rs)
//!     ├── PhraseCache (storage/cache.rs)
//!     ├── Translator (provider/mod.rs)
//!     ├── Partition (pipeline/batch.rs)
//!     └── WriteBackQueue (pipeline/writeback.rs)
//! ```

pub mod engine;
pub mod fingerprint;

pub use engine::{EngineStats, EngineStatsSnapshot, TranslationEngine};
pub use fingerprint::fingerprint;
