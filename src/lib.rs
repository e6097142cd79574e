//! # Transcache
//!
//! 带指纹缓存的批量短语翻译服务。
//!
//! ## 模块组织
//!
//! - `env` - 环境变量配置
//! - `translation` - 缓存、对账引擎、翻译服务商
//! - `redis_cache` - Redis 键值存储
//! - `web` - HTTP 服务（可选）

pub mod env;
pub mod redis_cache;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;

pub use translation::{PhraseRecord, ResultMessage, TranslationEngine, TranslationError};
