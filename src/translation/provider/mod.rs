//! 外部翻译服务商
//!
//! 服务商以“一行一条”的约定批量翻译：查询串是多条原文用换行连接，
//! 结果是按行对应的 `(原文回显, 译文)` 序列。对齐通常成立，但调用方不能依赖它。

pub mod baidu;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::translation::error::ProviderResult;

pub use baidu::{BaiduConfig, BaiduTranslator};

/// 服务商返回的一条结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedPair {
    /// 服务商回显的原文
    pub src: String,
    /// 译文
    pub dst: String,
}

impl TranslatedPair {
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
        }
    }
}

/// 翻译服务商接口
#[async_trait]
pub trait Translator: Send + Sync {
    /// 翻译一个换行分隔的查询串
    async fn translate(&self, query: &str, from: &str, to: &str)
        -> ProviderResult<Vec<TranslatedPair>>;

    /// 服务商名称，用于日志
    fn name(&self) -> &str;
}
