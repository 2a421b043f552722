//! レコードモデル
//!
//! - [`RawRating`]: エクスポート CSV の 1 行（1 ユーザーの 1 評価）
//! - [`MergedRecord`]: 識別子ごとに統合された 1 作品
//! - [`PriorSnapshotRecord`]: 前回出力ファイルの 1 行（順位差分の計算専用）

use std::fmt;

use crate::error::{RatingsError, Result};

/// 作品種別
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TitleType {
    FeatureFilm,
    Documentary,
    ShortFilm,
    Video,
    TvMovie,
    TvSeries,
    TvEpisode,
    MiniSeries,
    /// 表にないラベルはそのまま保持する
    Other(String),
}

/// (CLI 用の短縮名, 種別) の対応表
static TITLE_TYPE_MNEMONICS: [(&str, TitleType); 8] = [
    ("feature", TitleType::FeatureFilm),
    ("docu", TitleType::Documentary),
    ("short", TitleType::ShortFilm),
    ("video", TitleType::Video),
    ("tvmovie", TitleType::TvMovie),
    ("tvseries", TitleType::TvSeries),
    ("tvepisode", TitleType::TvEpisode),
    ("miniseries", TitleType::MiniSeries),
];

impl TitleType {
    /// エクスポートに現れるラベル文字列から変換する。未知のラベルは `Other`。
    pub fn from_label(label: &str) -> Self {
        TITLE_TYPE_MNEMONICS
            .iter()
            .map(|(_, t)| t)
            .find(|t| t.label() == label)
            .cloned()
            .unwrap_or_else(|| TitleType::Other(label.to_string()))
    }

    /// `feature` → `Feature Film` のように短縮名から変換する
    pub fn from_mnemonic(token: &str) -> Result<Self> {
        TITLE_TYPE_MNEMONICS
            .iter()
            .find(|(m, _)| m.eq_ignore_ascii_case(token))
            .map(|(_, t)| t.clone())
            .ok_or_else(|| RatingsError::UnknownTitleType(token.to_string()))
    }

    /// 使用可能な短縮名の一覧
    pub fn mnemonics() -> impl Iterator<Item = &'static str> {
        TITLE_TYPE_MNEMONICS.iter().map(|(m, _)| *m)
    }

    pub fn label(&self) -> &str {
        match self {
            TitleType::FeatureFilm => "Feature Film",
            TitleType::Documentary => "Documentary",
            TitleType::ShortFilm => "Short Film",
            TitleType::Video => "Video",
            TitleType::TvMovie => "TV Movie",
            TitleType::TvSeries => "TV Series",
            TitleType::TvEpisode => "TV Episode",
            TitleType::MiniSeries => "Mini-Series",
            TitleType::Other(label) => label,
        }
    }
}

impl fmt::Display for TitleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// エクスポート 1 行分の評価
#[derive(Debug, Clone, PartialEq)]
pub struct RawRating {
    pub id: String,
    pub title: String,
    pub title_type: TitleType,
    pub directors: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub imdb_rating: Option<f64>,
    pub imdb_votes: Option<u64>,
    pub runtime: Option<u32>,
    /// ユーザー評価（1〜10、0 はパース時点で弾かれる）
    pub rating: u8,
    /// エクスポート内の行番号（ログ用）
    pub position: u32,
    pub user: String,
}

/// 識別子ごとに統合された作品レコード
///
/// `ratings` と `users` は常に同じ長さで、1 要素以上を持つ。
/// 統計値は [`crate::merge::Merger::finish`] で一度だけ設定される。
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub id: String,
    pub title: String,
    pub title_type: TitleType,
    pub directors: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub imdb_rating: Option<f64>,
    pub imdb_votes: Option<u64>,
    pub runtime: Option<u32>,
    pub ratings: Vec<u8>,
    pub users: Vec<String>,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub voters: usize,
    /// 0 = 未設定
    pub rank: u32,
    pub rank_delta: Option<i64>,
}

impl MergedRecord {
    pub fn has_genre(&self, token: &str) -> bool {
        let wanted = normalize_genre(token);
        self.genres.iter().any(|g| normalize_genre(g) == wanted)
    }
}

/// 前回出力の 1 行
#[derive(Debug, Clone, PartialEq)]
pub struct PriorSnapshotRecord {
    pub id: String,
    pub rank: u32,
    pub rank_delta: Option<i64>,
    pub title: String,
    pub year: Option<i32>,
    pub directors: String,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub voters: Option<usize>,
    pub runtime: Option<u32>,
    pub imdb_rating: Option<f64>,
    pub imdb_votes: Option<u64>,
    pub title_type: TitleType,
    pub genres: Vec<String>,
    pub users: Vec<String>,
}

/// ジャンル名の比較キー。`Film-Noir` / `film_noir` / `film-noir` を同一視する。
pub fn normalize_genre(token: &str) -> String {
    token.trim().to_ascii_lowercase().replace('_', "-")
}

/// CLI / 設定ファイルで指定できるジャンル
pub const KNOWN_GENRES: [&str; 25] = [
    "action",
    "adventure",
    "animation",
    "biography",
    "comedy",
    "crime",
    "documentary",
    "drama",
    "family",
    "fantasy",
    "film_noir",
    "game_show",
    "history",
    "horror",
    "music",
    "musical",
    "mystery",
    "news",
    "reality_tv",
    "romance",
    "sci-fi",
    "sport",
    "talk-show",
    "thriller",
    "western",
];
