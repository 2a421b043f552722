//! 順位付け後の件数制限
//!
//! いずれも順位順に並んだ列に対する切り詰めで、並べ替えはしない。

use serde::{Deserialize, Serialize};

use crate::record::MergedRecord;

/// 制限の設定。全て任意。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitConfig {
    /// 順位がこの値以下のレコードだけを残す（同順位は切らない）
    pub max_rank: Option<u32>,
    /// 先頭から固定件数だけ残す（同順位も切る）
    pub max_entries: Option<usize>,
    /// 順位がこの値以下のレコードを捨てる
    pub discard_top: Option<u32>,
}

/// `rank <= max_rank` の間だけ残す。列は順位順なので最初に超えた位置で打ち切る。
pub fn limit_by_rank(mut records: Vec<MergedRecord>, max_rank: u32) -> Vec<MergedRecord> {
    let cut = records.iter().position(|r| r.rank > max_rank).unwrap_or(records.len());
    records.truncate(cut);
    records
}

/// 先頭 `count` 件に切り詰める
pub fn limit_by_count(mut records: Vec<MergedRecord>, count: usize) -> Vec<MergedRecord> {
    records.truncate(count);
    records
}

/// `rank <= threshold` のレコードを全て捨てる
pub fn discard_top(records: Vec<MergedRecord>, threshold: u32) -> Vec<MergedRecord> {
    records.into_iter().filter(|r| r.rank > threshold).collect()
}
