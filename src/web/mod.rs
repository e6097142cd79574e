//! Web 服务器模块
//!
//! 以 HTTP 暴露批量翻译接口

pub mod config;
pub mod handlers;
pub mod routes;
pub mod types;

pub use config::*;
pub use handlers::*;
pub use routes::*;
pub use types::*;

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::translation::TranslationEngine;

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    engine: TranslationEngine,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, engine: TranslationEngine) -> Self {
        Self { config, engine }
    }

    /// 启动 Web 服务器，`shutdown` 完成后停止接受新连接并等待进行中的请求结束
    pub async fn start<F>(&self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = create_router(Arc::new(AppState::new(self.engine.clone())));

        let listener = tokio::net::TcpListener::bind(self.config.listen_address()).await?;

        tracing::info!(
            "Web server starting at http://{}",
            self.config.listen_address()
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }
}

/// 创建路由器
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_routes()
        .with_state(app_state)
        .layer(CorsLayer::permissive())
}
