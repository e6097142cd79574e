//! Web 服务器主程序入口

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use transcache::env::{self, EnvConfig, EnvVar};
use transcache::redis_cache::{RedisCache, RedisCacheConfig};
use transcache::translation::provider::BaiduTranslator;
use transcache::translation::{
    KvStore, MemoryStore, PhraseCache, TranslationConfig, TranslationEngine, WriteBackQueue,
};
use transcache::web::{WebConfig, WebServer};

/// 带缓存的批量短语翻译服务
#[derive(Parser, Debug)]
#[command(name = "transcache", version, about)]
struct Args {
    /// 绑定地址，覆盖 TRANSCACHE_WEB_BIND_ADDRESS
    #[arg(short, long)]
    bind: Option<String>,

    /// 端口，覆盖 TRANSCACHE_WEB_PORT
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let dotenv = env::load_dotenv();
    init_tracing();
    dotenv.log();

    let env_config = EnvConfig::from_env()?;
    env_config.validate()?;
    env_config.log_summary();

    let mut web_config = WebConfig::from_env_config(&env_config);
    if let Some(bind) = args.bind {
        web_config.bind_addr = bind;
    }
    if let Some(port) = args.port {
        web_config.port = port;
    }
    web_config.validate()?;

    let config = TranslationConfig::from_env_config(&env_config);

    let store = build_store(&config).await?;
    let cache = PhraseCache::new(store, config.cache.clone());
    let writeback = WriteBackQueue::spawn(cache.clone(), config.writeback.clone());
    let translator = Arc::new(BaiduTranslator::new(config.provider.clone())?);
    let engine = TranslationEngine::new(cache, translator, writeback.clone(), config.engine.clone());

    let server = WebServer::new(web_config, engine);
    let result = server.start(shutdown_signal()).await;

    writeback.shutdown().await;
    result?;

    Ok(())
}

fn init_tracing() {
    let level = env::core::LogLevel::get().unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn build_store(
    config: &TranslationConfig,
) -> Result<Arc<dyn KvStore>, Box<dyn std::error::Error>> {
    if config.uses_memory_store() {
        tracing::warn!("使用进程内存储，缓存不会跨进程共享");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let redis = RedisCache::connect(RedisCacheConfig {
        url: config.redis_url.clone(),
    })
    .await?;
    redis.test_connection().await?;
    tracing::info!("Redis 缓存连接成功: {}", config.redis_url);

    Ok(Arc::new(redis))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("收到退出信号，正在关闭");
}
