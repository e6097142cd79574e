//! 存储模块
//!
//! 键值存储接口与分块批量缓存客户端。

pub mod cache;
pub mod store;

pub use cache::{CacheConfig, CacheStats, PhraseCache};
pub use store::{KvStore, MemoryStore};
