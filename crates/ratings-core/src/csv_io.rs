//! 評価エクスポート CSV と出力 CSV の行変換
//!
//! エクスポートの列配置（ヘッダー行の次から、最低 14 列）:
//!
//! | 列 | 内容 |
//! |---|---|
//! | 0 | エクスポート内の位置 |
//! | 1 | IMDb id |
//! | 5 | タイトル |
//! | 6 | 作品種別 |
//! | 7 | 監督 |
//! | 8 | ユーザー評価 |
//! | 9 | IMDb 評価 |
//! | 10 | 上映時間（分） |
//! | 11 | 公開年（`????` は欠損） |
//! | 12 | ジャンル（`", "` 区切り） |
//! | 13 | IMDb 投票数 |

use std::io::{Read, Write};
use std::str::FromStr;

use crate::error::{RatingsError, Result};
use crate::record::{MergedRecord, PriorSnapshotRecord, RawRating, TitleType};

/// エクスポート行の最低列数
pub const EXPORT_MIN_COLUMNS: usize = 14;

/// 出力ファイルのヘッダー。差分ファイルとして読み戻すときも同じ列配置を前提にする。
pub const OUTPUT_HEADER: [&str; 16] = [
    "Ranking",
    "Diff",
    "Title",
    "Year",
    "Directors",
    "Mean",
    "Median",
    "Std deviation",
    "Num voters",
    "Runtime (mins)",
    "IMDb rating",
    "IMDb votes",
    "Title type",
    "Genres",
    "IMDb id",
    "Users",
];

const COL_RANK: usize = 0;
const COL_DIFF: usize = 1;
const COL_ID: usize = 14;
const COL_USERS: usize = 15;

/// 1 ファイル分の取り込み結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// 受理した行数
    pub accepted: usize,
    /// 弾いた行数（評価 0、列不足、型変換失敗）
    pub rejected: usize,
}

fn cell<'a>(row: &'a csv::StringRecord, idx: usize) -> &'a str {
    row.get(idx).map(str::trim).unwrap_or("")
}

/// 空セルは `None`、変換できなければ `MalformedRow`
fn optional<T: FromStr>(row: &csv::StringRecord, idx: usize, name: &str) -> Result<Option<T>> {
    let text = cell(row, idx);
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<T>()
        .map(Some)
        .map_err(|_| RatingsError::MalformedRow(format!("invalid {name} '{text}'")))
}

fn required<T: FromStr>(row: &csv::StringRecord, idx: usize, name: &str) -> Result<T> {
    optional(row, idx, name)?
        .ok_or_else(|| RatingsError::MalformedRow(format!("missing {name}")))
}

fn split_list(text: &str, sep: char) -> Vec<String> {
    text.split(sep).map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// エクスポートの 1 行を [`RawRating`] に変換する
pub fn parse_export_row(row: &csv::StringRecord, user: &str) -> Result<RawRating> {
    if row.len() < EXPORT_MIN_COLUMNS {
        return Err(RatingsError::MalformedRow(format!(
            "expected at least {EXPORT_MIN_COLUMNS} columns, got {}",
            row.len()
        )));
    }
    let rating = match cell(row, 8) {
        "" | "0" => return Err(RatingsError::ZeroRating),
        text => text
            .parse::<u8>()
            .map_err(|_| RatingsError::MalformedRow(format!("invalid rating '{text}'")))?,
    };
    if rating == 0 {
        return Err(RatingsError::ZeroRating);
    }
    let id = cell(row, 1);
    if id.is_empty() {
        return Err(RatingsError::MalformedRow("missing id".to_string()));
    }
    let year = match cell(row, 11) {
        "????" => None,
        _ => optional::<i32>(row, 11, "year")?,
    };
    Ok(RawRating {
        id: id.to_string(),
        title: cell(row, 5).to_string(),
        title_type: TitleType::from_label(cell(row, 6)),
        directors: cell(row, 7).to_string(),
        year,
        genres: split_list(cell(row, 12), ','),
        imdb_rating: optional(row, 9, "imdb rating")?,
        imdb_votes: optional(row, 13, "imdb votes")?,
        runtime: optional(row, 10, "runtime")?,
        rating,
        position: required(row, 0, "position")?,
        user: user.to_string(),
    })
}

/// エクスポート CSV を読み、受理した行を `sink` に渡す。
///
/// 行単位のエラーはログに残して読み飛ばす。`source` はログ用のファイル名。
pub fn read_export<R: Read>(
    reader: R,
    source: &str,
    user: &str,
    mut sink: impl FnMut(RawRating),
) -> Result<IngestStats> {
    let mut csv_reader =
        csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);
    let mut stats = IngestStats::default();
    for (idx, row) in csv_reader.records().enumerate() {
        // ヘッダーの次が 2 行目
        let line_no = idx + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                log::warn!("Error reading CSV file ({source} line {line_no}): {e}");
                stats.rejected += 1;
                continue;
            }
        };
        match parse_export_row(&row, user) {
            Ok(raw) => {
                stats.accepted += 1;
                sink(raw);
            }
            Err(e) => {
                log::warn!(
                    "Error reading CSV file ({source} line {}): {e}  {}",
                    cell(&row, 0),
                    row.iter().collect::<Vec<_>>().join(",")
                );
                stats.rejected += 1;
            }
        }
    }
    Ok(stats)
}

/// 前回出力の 1 行を [`PriorSnapshotRecord`] に変換する
pub fn parse_snapshot_row(row: &csv::StringRecord) -> Result<PriorSnapshotRecord> {
    if row.len() < OUTPUT_HEADER.len() {
        return Err(RatingsError::MalformedRow(format!(
            "expected {} columns, got {}",
            OUTPUT_HEADER.len(),
            row.len()
        )));
    }
    let id = cell(row, COL_ID);
    if id.is_empty() {
        return Err(RatingsError::MalformedRow("missing id".to_string()));
    }
    Ok(PriorSnapshotRecord {
        id: id.to_string(),
        rank: required(row, COL_RANK, "ranking")?,
        rank_delta: optional(row, COL_DIFF, "diff")?,
        title: cell(row, 2).to_string(),
        year: optional(row, 3, "year")?,
        directors: cell(row, 4).to_string(),
        mean: optional(row, 5, "mean")?,
        median: optional(row, 6, "median")?,
        std: optional(row, 7, "std")?,
        voters: optional(row, 8, "num voters")?,
        runtime: optional(row, 9, "runtime")?,
        imdb_rating: optional(row, 10, "imdb rating")?,
        imdb_votes: optional(row, 11, "imdb votes")?,
        title_type: TitleType::from_label(cell(row, 12)),
        genres: split_list(cell(row, 13), ','),
        users: split_list(cell(row, COL_USERS), ','),
    })
}

/// 浮動小数の表記。整数値でも `8.0` のように小数点を残す。
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn opt_to_string<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// 出力の 1 行分
pub fn output_row(r: &MergedRecord) -> [String; 16] {
    [
        r.rank.to_string(),
        opt_to_string(r.rank_delta),
        r.title.clone(),
        opt_to_string(r.year),
        r.directors.clone(),
        format_float(r.mean),
        format_float(r.median),
        format_float(r.std),
        r.voters.to_string(),
        opt_to_string(r.runtime),
        r.imdb_rating.map(format_float).unwrap_or_default(),
        opt_to_string(r.imdb_votes),
        r.title_type.to_string(),
        r.genres.join(","),
        r.id.clone(),
        r.users.join(","),
    ]
}

/// ヘッダー + 全レコードを書き出す
pub fn write_ranking<W: Write>(writer: W, records: &[MergedRecord]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(OUTPUT_HEADER)?;
    for r in records {
        out.write_record(output_row(r))?;
    }
    out.flush()?;
    Ok(())
}
