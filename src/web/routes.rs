//! Web 路由定义

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::{handlers::*, types::AppState};

/// 创建路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/translate_api/jp_cn", post(translate_phrases))
        .route("/translate_api/stats", get(get_stats))
        .route("/health", get(health))
}
