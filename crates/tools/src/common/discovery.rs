//! 入力ディレクトリの探索
//!
//! ファイル名に `partial` を含むファイル（記述系の列が欠けたエクスポート）は末尾に回す。
//! 統合は初出行の記述フィールドを採用するため、完全なファイルを先に読む必要がある。

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

const PARTIAL_MARKER: &str = "partial";

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or_default()
}

pub fn is_partial(path: &Path) -> bool {
    file_name(path).contains(PARTIAL_MARKER)
}

/// ディレクトリ以下の全ファイルをパス順に列挙し、partial ファイルを末尾へ安定移動する。
///
/// 読めないエントリは警告を出して飛ばす。
pub fn discover_inputs<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
        match entry {
            Ok(e) if e.file_type().is_file() => files.push(e.into_path()),
            Ok(_) => {}
            Err(e) => log::error!("Skipping unreadable entry: {e}"),
        }
    }
    let (complete, partial): (Vec<_>, Vec<_>) = files.into_iter().partition(|p| !is_partial(p));
    complete.into_iter().chain(partial).collect()
}

/// ファイル名からユーザー名を得る（`alice.partial.csv.gz` → `alice`）
pub fn username_for(path: &Path) -> String {
    let mut name = file_name(path);
    if let Some(stripped) = name.strip_suffix(".gz") {
        name = stripped;
    }
    let stem = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    };
    stem.replace(".partial", "")
}
