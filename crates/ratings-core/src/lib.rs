//! ratings-core: 複数ユーザーの映画評価エクスポートを統合して順位表を作る
//!
//! ```text
//! Merger → Summary(統計) → FilterPipeline → objsort → assign_ranks → limit → apply_deltas → 出力
//! ```
//!
//! 入力ファイルの探索・CLI・ロギング初期化は `ratings-tools` 側の責務。

pub mod csv_io;
pub mod diff;
pub mod error;
pub mod field;
pub mod filter;
pub mod limit;
pub mod merge;
pub mod objsort;
pub mod pipeline;
pub mod rank;
pub mod record;
pub mod stats;

#[cfg(test)]
mod testutil;

pub use diff::{Snapshot, apply_deltas, load_snapshot};
pub use error::{RatingsError, Result};
pub use field::{Direction, FieldValue, SortField, SortKey};
pub use filter::{BoundValue, Bounds, FilterConfig, FilterPipeline, FilterStage};
pub use limit::LimitConfig;
pub use merge::Merger;
pub use pipeline::{PipelineConfig, PipelineReport, run_pipeline};
pub use record::{MergedRecord, PriorSnapshotRecord, RawRating, TitleType};
