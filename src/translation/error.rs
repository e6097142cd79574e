//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制

use std::fmt;

use thiserror::Error;

use crate::env::EnvError;

/// 翻译服务商调用错误
///
/// 每种失败对调用方都等价（本批次无法翻译），区分它们只为了日志。
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// 传输层错误（连接失败、TLS、读取响应体失败等）
    #[error("传输错误: {0}")]
    Transport(String),

    /// 非 2xx 状态码
    #[error("HTTP 状态异常: {status}")]
    Status { status: u16, body: String },

    /// 响应体无法解析
    #[error("响应解析失败: {message}")]
    Decode { message: String, body: String },

    /// 服务商在响应体里报告的业务错误
    #[error("服务商返回错误 {code}: {message}")]
    Api { code: String, message: String },

    /// 调用超时
    #[error("调用超时")]
    Timeout,
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Transport(error.to_string())
        }
    }
}

/// 服务商调用结果类型别名
pub type ProviderResult<T> = Result<T, ProviderError>;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 输入验证错误
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 缓存错误
    #[error("缓存错误: {0}")]
    CacheError(String),

    /// 翻译服务商错误
    #[error("翻译服务错误: {0}")]
    ProviderError(#[from] ProviderError),

    /// 超时错误
    #[error("操作超时: {0}")]
    TimeoutError(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::CacheError(_) => ErrorSeverity::Warning,
            TranslationError::ProviderError(ProviderError::Timeout) => ErrorSeverity::Warning,
            TranslationError::ProviderError(_) => ErrorSeverity::Error,
            TranslationError::TimeoutError(_) => ErrorSeverity::Warning,
            TranslationError::InternalError(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
            TranslationError::CacheError(_) => ErrorCategory::Cache,
            TranslationError::ProviderError(ProviderError::Transport(_)) => ErrorCategory::Network,
            TranslationError::ProviderError(ProviderError::Timeout) => ErrorCategory::Timeout,
            TranslationError::ProviderError(ProviderError::Decode { .. }) => ErrorCategory::Parsing,
            TranslationError::ProviderError(_) => ErrorCategory::Service,
            TranslationError::TimeoutError(_) => ErrorCategory::Timeout,
            TranslationError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(self, context: T) -> Self {
        let new_msg = format!("{} (上下文: {})", self, context);

        match self {
            TranslationError::ConfigError(_) => TranslationError::ConfigError(new_msg),
            TranslationError::InvalidInput(_) => TranslationError::InvalidInput(new_msg),
            TranslationError::CacheError(_) => TranslationError::CacheError(new_msg),
            TranslationError::TimeoutError(_) => TranslationError::TimeoutError(new_msg),
            TranslationError::InternalError(_) => TranslationError::InternalError(new_msg),
            // 服务商错误保留原始结构，日志里已经足够区分
            provider @ TranslationError::ProviderError(_) => provider,
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Input,
    Cache,
    Service,
    Timeout,
    Parsing,
    Internal,
}

impl From<EnvError> for TranslationError {
    fn from(error: EnvError) -> Self {
        TranslationError::ConfigError(error.to_string())
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::InvalidInput(format!("JSON解析错误: {}", error))
    }
}

impl From<redis::RedisError> for TranslationError {
    fn from(error: redis::RedisError) -> Self {
        TranslationError::CacheError(format!("Redis错误: {}", error))
    }
}

impl From<tokio::time::error::Elapsed> for TranslationError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        TranslationError::TimeoutError(format!("异步操作超时: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log(error: &TranslationError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!(category = ?error.category(), "翻译信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!(category = ?error.category(), "翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!(category = ?error.category(), "翻译错误: {}", error),
            ErrorSeverity::Critical => {
                tracing::error!(category = ?error.category(), "翻译严重错误: {}", error)
            }
        }
    }

    /// 记录并返回错误
    pub fn log_error<T>(error: TranslationError) -> TranslationResult<T> {
        log(&error);
        Err(error)
    }

    /// 创建缓存错误
    pub fn cache_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::CacheError(msg.to_string())
    }

    /// 创建输入验证错误
    pub fn validation_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InvalidInput(msg.to_string())
    }
}
