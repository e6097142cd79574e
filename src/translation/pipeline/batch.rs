//! 批次划分与结果合并
//!
//! 对账引擎的纯函数部分：按是否已有译文划分批次、构建查询串、
//! 把服务商结果合并回未翻译子集，以及组装最终结果。

use std::collections::HashMap;

use crate::translation::config::constants::QUERY_DELIMITER;
use crate::translation::core::fingerprint::fingerprint;
use crate::translation::model::PhraseRecord;
use crate::translation::provider::TranslatedPair;

/// 合并方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// 结果条数与未翻译条数一致，按位置合并
    Positional,
    /// 条数不一致，按回显原文的指纹合并
    Fingerprint,
}

/// 划分后的批次
///
/// 两个子集都保持各自在请求中的相对顺序，并记录原始下标以便恢复请求顺序。
#[derive(Debug, Default, Clone)]
pub struct Partition {
    pub translated: Vec<(usize, PhraseRecord)>,
    pub untranslated: Vec<(usize, PhraseRecord)>,
}

impl Partition {
    /// 按是否已有译文划分
    pub fn split(records: Vec<PhraseRecord>) -> Self {
        let mut partition = Partition::default();
        for (index, record) in records.into_iter().enumerate() {
            if record.is_translated() {
                partition.translated.push((index, record));
            } else {
                partition.untranslated.push((index, record));
            }
        }
        partition
    }

    /// 未翻译子集的查询串：原文以换行连接，末尾无分隔符
    pub fn query(&self) -> String {
        self.untranslated
            .iter()
            .map(|(_, record)| record.source.as_str())
            .collect::<Vec<_>>()
            .join(QUERY_DELIMITER)
    }

    /// 把服务商结果合并进未翻译子集，返回所用的合并方式与填充条数
    pub fn merge(&mut self, results: &[TranslatedPair]) -> (MergeStrategy, usize) {
        if results.len() == self.untranslated.len() {
            (MergeStrategy::Positional, merge_positional(&mut self.untranslated, results))
        } else {
            (MergeStrategy::Fingerprint, merge_by_fingerprint(&mut self.untranslated, results))
        }
    }

    /// 本次新得到译文、需要写回缓存的记录
    pub fn fresh_translations(&self) -> Vec<PhraseRecord> {
        self.untranslated
            .iter()
            .filter(|(_, record)| record.is_translated())
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// 组装最终结果
    ///
    /// 默认先放命中缓存的子集、再放新翻译的子集，不保留两者在请求中的交错；
    /// `preserve_request_order` 为 true 时恢复请求顺序。
    pub fn assemble(self, preserve_request_order: bool) -> Vec<PhraseRecord> {
        let mut combined = self.translated;
        combined.extend(self.untranslated);

        if preserve_request_order {
            combined.sort_by_key(|(index, _)| *index);
        }

        combined.into_iter().map(|(_, record)| record).collect()
    }
}

/// 按位置合并：第 i 条结果的译文写入第 i 条未翻译记录
pub fn merge_positional(untranslated: &mut [(usize, PhraseRecord)], results: &[TranslatedPair]) -> usize {
    let mut filled = 0;
    for ((_, record), pair) in untranslated.iter_mut().zip(results) {
        if pair.dst.is_empty() {
            tracing::debug!("服务商返回空译文: {:?}", pair);
        }
        if record.fill(&pair.dst) && record.is_translated() {
            filled += 1;
        }
    }
    filled
}

/// 按指纹合并：对回显原文重新计算指纹，再按记录自身的指纹查找
///
/// 找不到的记录保持未翻译。
pub fn merge_by_fingerprint(
    untranslated: &mut [(usize, PhraseRecord)],
    results: &[TranslatedPair],
) -> usize {
    let lookup: HashMap<String, &TranslatedPair> = results
        .iter()
        .map(|pair| (fingerprint(&pair.src), pair))
        .collect();

    let mut filled = 0;
    for (_, record) in untranslated.iter_mut() {
        if let Some(pair) = lookup.get(&record.fingerprint) {
            if record.fill(&pair.dst) && record.is_translated() {
                filled += 1;
            }
        }
    }
    filled
}
