//! 翻译管道模块
//!
//! 批次划分、结果合并与异步缓存回写

pub mod batch;
pub mod writeback;

pub use batch::{MergeStrategy, Partition};
pub use writeback::{EnqueueOutcome, WriteBackConfig, WriteBackQueue, WriteBackStats};
