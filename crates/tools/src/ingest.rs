//! 入力ディレクトリの全エクスポートを読み込み、識別子ごとに統合する

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use ratings_core::csv_io::read_export;
use ratings_core::{MergedRecord, Merger};

use crate::common::discovery::{discover_inputs, username_for};
use crate::common::io::open_reader;

/// 取り込みの集計（ログ用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub files: usize,
    pub skipped_files: usize,
    pub rows: usize,
    pub rejected_rows: usize,
    pub titles: usize,
}

/// 与えられた順にファイルを読み、`merger` に流し込む。
///
/// 開けない・読めないファイルはエラーを記録して次のファイルへ進む。
pub fn ingest_files(paths: &[PathBuf], merger: &mut Merger) -> IngestSummary {
    let mut summary = IngestSummary::default();
    for path in paths {
        let source = path.display().to_string();
        let user = username_for(path);
        let reader = match open_reader(path) {
            Ok(r) => r,
            Err(e) => {
                log::error!("{e}: while parsing {source}");
                summary.skipped_files += 1;
                continue;
            }
        };
        match read_export(reader, &source, &user, |raw| merger.push(raw)) {
            Ok(stats) => {
                log::debug!(
                    "{source}: user={user} accepted={} rejected={}",
                    stats.accepted,
                    stats.rejected
                );
                summary.files += 1;
                summary.rows += stats.accepted;
                summary.rejected_rows += stats.rejected;
            }
            Err(e) => {
                log::error!("{e}: while parsing {source}");
                summary.skipped_files += 1;
            }
        }
    }
    summary.titles = merger.len();
    summary
}

/// ディレクトリ以下を探索して統合済みレコードを返す。統計値はここで確定する。
pub fn ingest_dir(dir: &Path) -> Result<(Vec<MergedRecord>, IngestSummary)> {
    if !dir.is_dir() {
        bail!("input directory not found: {}", dir.display());
    }
    let paths = discover_inputs(dir);
    let mut merger = Merger::new();
    let summary = ingest_files(&paths, &mut merger);
    log::info!(
        "ingested {} files ({} skipped): {} rows, {} rejected, {} unique titles",
        summary.files,
        summary.skipped_files,
        summary.rows,
        summary.rejected_rows,
        summary.titles
    );
    Ok((merger.finish(), summary))
}
