//! 接口数据结构
//!
//! 短语记录与统一的结果信封。字段名沿用既有客户端使用的 `SrcMd5` / `Src` / `Dst`。

use serde::{Deserialize, Serialize};

use crate::translation::core::fingerprint::fingerprint;

/// 结果码：成功
pub const CODE_OK: i32 = 1;
/// 结果码：通用错误
pub const CODE_ERROR: i32 = 999;

/// 结果码对应的默认提示信息
pub fn default_message(code: i32) -> Option<&'static str> {
    match code {
        CODE_OK => Some("ok"),
        CODE_ERROR => Some("错误"),
        _ => None,
    }
}

/// 一条待翻译（或已翻译）的短语
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRecord {
    /// 原文指纹，缺省时由服务端计算
    #[serde(
        rename = "SrcMd5",
        alias = "srcMd5",
        alias = "src_md5",
        alias = "fingerprint",
        default
    )]
    pub fingerprint: String,

    /// 原文
    #[serde(rename = "Src", alias = "src", alias = "source")]
    pub source: String,

    /// 译文，空串表示尚未翻译
    #[serde(rename = "Dst", alias = "dst", alias = "target", default)]
    pub target: String,
}

impl PhraseRecord {
    /// 以原文创建记录，同时计算指纹
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            fingerprint: fingerprint(&source),
            source,
            target: String::new(),
        }
    }

    /// 是否已有译文
    pub fn is_translated(&self) -> bool {
        !self.target.is_empty()
    }

    /// 指纹为空时补齐
    pub fn ensure_fingerprint(&mut self) {
        if self.fingerprint.trim().is_empty() {
            self.fingerprint = fingerprint(&self.source);
        }
    }

    /// 仅在尚无译文时写入；返回是否写入
    pub fn fill(&mut self, target: &str) -> bool {
        if self.is_translated() {
            return false;
        }
        self.target = target.to_string();
        true
    }
}

/// 统一的结果信封
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMessage<T> {
    #[serde(rename = "Code")]
    pub code: i32,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Data")]
    pub data: Option<T>,
}

impl<T> ResultMessage<T> {
    /// 创建结果；`message` 为空时按结果码取默认提示
    pub fn new(code: i32, message: &str, data: Option<T>) -> Self {
        let message = if message.is_empty() {
            default_message(code).unwrap_or_default().to_string()
        } else {
            message.to_string()
        };

        Self {
            code,
            message,
            data,
        }
    }

    pub fn ok(data: T) -> Self {
        Self::new(CODE_OK, "", Some(data))
    }

    pub fn error(message: &str) -> Self {
        Self::new(CODE_ERROR, message, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_decoding_accepts_aliases() {
        let records: Vec<PhraseRecord> = serde_json::from_str(
            r#"[{"SrcMd5":"abc","Src":"こんにちは"},{"src":"さようなら"},{"source":"はい","target":"是"}]"#,
        )
        .unwrap();

        assert_eq!(records[0].fingerprint, "abc");
        assert_eq!(records[0].target, "");
        assert_eq!(records[1].fingerprint, "");
        assert_eq!(records[1].source, "さようなら");
        assert_eq!(records[2].target, "是");
    }

    #[test]
    fn test_record_requires_source() {
        let result: Result<Vec<PhraseRecord>, _> = serde_json::from_str(r#"[{"Dst":"x"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_fill_never_overwrites() {
        let mut record = PhraseRecord::new("猫");
        assert!(record.fill("猫咪"));
        assert!(!record.fill("狗"));
        assert_eq!(record.target, "猫咪");
    }

    #[test]
    fn test_ensure_fingerprint_keeps_caller_value() {
        let mut record = PhraseRecord {
            fingerprint: "caller-key".to_string(),
            source: "犬".to_string(),
            target: String::new(),
        };
        record.ensure_fingerprint();
        assert_eq!(record.fingerprint, "caller-key");

        record.fingerprint = " ".to_string();
        record.ensure_fingerprint();
        assert_eq!(record.fingerprint, fingerprint("犬"));
    }

    #[test]
    fn test_result_message_defaults() {
        let ok = ResultMessage::ok(vec![1, 2]);
        assert_eq!(ok.code, CODE_OK);
        assert_eq!(ok.message, "ok");

        let err: ResultMessage<()> = ResultMessage::error("");
        assert_eq!(err.message, "错误");

        let json = serde_json::to_value(ResultMessage::<()>::error("参数错误")).unwrap();
        assert_eq!(json["Code"], 999);
        assert_eq!(json["Message"], "参数错误");
        assert!(json["Data"].is_null());
    }
}
