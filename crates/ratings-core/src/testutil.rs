//! テスト用のレコード生成ヘルパー

use crate::record::{MergedRecord, TitleType};
use crate::stats::Summary;

/// 評価リストから統計込みのレコードを作る
pub(crate) fn record(id: &str, ratings: &[u8]) -> MergedRecord {
    let summary = Summary::of(ratings).unwrap_or(Summary {
        mean: 0.0,
        median: 0.0,
        std: 0.0,
        voters: 0,
    });
    MergedRecord {
        id: id.to_string(),
        title: format!("Title {id}"),
        title_type: TitleType::FeatureFilm,
        directors: "Director".to_string(),
        year: Some(2000),
        genres: vec!["Drama".to_string()],
        imdb_rating: Some(7.0),
        imdb_votes: Some(10_000),
        runtime: Some(100),
        ratings: ratings.to_vec(),
        users: (0..ratings.len()).map(|i| format!("user{i}")).collect(),
        mean: summary.mean,
        median: summary.median,
        std: summary.std,
        voters: summary.voters,
        rank: 0,
        rank_delta: None,
    }
}

/// 平均値だけを指定したレコード（評価 1 件）
pub(crate) fn with_mean(id: &str, mean: u8) -> MergedRecord {
    record(id, &[mean])
}

pub(crate) fn ids(records: &[MergedRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

pub(crate) fn ranks(records: &[MergedRecord]) -> Vec<u32> {
    records.iter().map(|r| r.rank).collect()
}
