//! フィルタ → ソート → 順位付け → 件数制限 → 差分 → 上位除外 の一連の処理

use serde::{Deserialize, Serialize};

use crate::diff::{Snapshot, apply_deltas};
use crate::error::Result;
use crate::field::SortKey;
use crate::filter::{FilterConfig, FilterPipeline};
use crate::limit::{LimitConfig, discard_top, limit_by_count, limit_by_rank};
use crate::objsort::sort_records;
use crate::rank::assign_ranks;
use crate::record::MergedRecord;

/// パイプライン全体の設定。各段へは明示的に渡す。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// ソートキー列（上位キーが先）。空なら平均の降順。
    pub sort_by: Vec<SortKey>,
    pub filter: FilterConfig,
    pub limit: LimitConfig,
}

impl PipelineConfig {
    /// 実際に使うソートキー列
    pub fn effective_sort_keys(&self) -> Vec<SortKey> {
        if self.sort_by.is_empty() {
            vec![SortKey::DEFAULT_RANK]
        } else {
            self.sort_by.clone()
        }
    }

    /// 順位付けに使うキー（先頭のソートキー）
    pub fn rank_key(&self) -> SortKey {
        self.sort_by.first().copied().unwrap_or(SortKey::DEFAULT_RANK)
    }
}

/// 各段の件数（ログ用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub merged: usize,
    pub filtered: usize,
    pub limited: usize,
    pub diffed: usize,
    pub written: usize,
}

/// 統合済みレコードを最終的な出力順の列に変換する
///
/// 設定エラー（不正な境界値・未知の作品種別/ジャンル）は処理を始める前に返す。
pub fn run_pipeline(
    records: Vec<MergedRecord>,
    config: &PipelineConfig,
    snapshot: Option<&Snapshot>,
) -> Result<(Vec<MergedRecord>, PipelineReport)> {
    let filters = FilterPipeline::from_config(&config.filter)?;
    let mut report = PipelineReport {
        merged: records.len(),
        ..Default::default()
    };

    let mut records = filters.apply(records);
    report.filtered = records.len();

    sort_records(&mut records, &config.effective_sort_keys());
    assign_ranks(&mut records, config.rank_key());

    if let Some(max_rank) = config.limit.max_rank {
        records = limit_by_rank(records, max_rank);
    }
    if let Some(count) = config.limit.max_entries {
        records = limit_by_count(records, count);
    }
    report.limited = records.len();

    if let Some(snapshot) = snapshot {
        report.diffed = apply_deltas(&mut records, snapshot);
    }

    if let Some(threshold) = config.limit.discard_top {
        records = discard_top(records, threshold);
    }
    report.written = records.len();

    log::info!(
        "pipeline: merged={} filtered={} limited={} diffed={} written={}",
        report.merged,
        report.filtered,
        report.limited,
        report.diffed,
        report.written
    );
    Ok((records, report))
}
