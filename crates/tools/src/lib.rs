//! 映画評価エクスポートから順位表を作るツール群
//!
//! 集計ロジック本体は `ratings-core`。このクレートはファイル探索、gzip 対応の入出力、
//! 設定ファイルの読み込みを担当する。

pub mod common;
pub mod config_file;
pub mod ingest;
