//! Web 模块的数据类型定义

use serde::Serialize;

use crate::translation::core::EngineStatsSnapshot;
use crate::translation::pipeline::WriteBackStats;
use crate::translation::storage::CacheStats;
use crate::translation::TranslationEngine;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub engine: TranslationEngine,
}

impl AppState {
    pub fn new(engine: TranslationEngine) -> Self {
        Self { engine }
    }
}

/// 统计响应
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub engine: EngineStatsSnapshot,
    pub cache: CacheStats,
    pub writeback: WriteBackStats,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
