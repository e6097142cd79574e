//! 短语指纹
//!
//! 指纹是原文 UTF-8 字节的 MD5 十六进制小写摘要，既用作缓存键，
//! 也用于把服务商回显的原文重新对应到请求中的记录。

use md5::{Digest, Md5};

/// 计算原文指纹
pub fn fingerprint(text: &str) -> String {
    md5_hex(text.as_bytes())
}

/// 计算任意字节的 MD5 十六进制摘要
pub(crate) fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
