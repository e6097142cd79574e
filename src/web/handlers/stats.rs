//! 统计与健康检查处理器

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::web::types::{AppState, HealthResponse, StatsResponse};

/// 引擎、缓存与回写队列的统计快照
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        engine: state.engine.get_stats(),
        cache: state.engine.cache().get_stats(),
        writeback: state.engine.writeback().get_stats(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
