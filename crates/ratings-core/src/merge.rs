//! 識別子をキーにした評価レコードの統合

use std::collections::HashMap;

use crate::record::{MergedRecord, RawRating, TitleType};
use crate::stats::Summary;

/// 1 識別子分の蓄積途中のレコード
///
/// 記述系フィールドは最初に見えた行から取り、以降は評価とユーザー名を追記するだけ。
#[derive(Debug, Clone)]
struct RecordBuilder {
    id: String,
    title: String,
    title_type: TitleType,
    directors: String,
    year: Option<i32>,
    genres: Vec<String>,
    imdb_rating: Option<f64>,
    imdb_votes: Option<u64>,
    runtime: Option<u32>,
    ratings: Vec<u8>,
    users: Vec<String>,
}

impl RecordBuilder {
    fn new(raw: RawRating) -> Self {
        let mut genres: Vec<String> = Vec::with_capacity(raw.genres.len());
        for g in raw.genres {
            if !genres.contains(&g) {
                genres.push(g);
            }
        }
        Self {
            id: raw.id,
            title: raw.title,
            title_type: raw.title_type,
            directors: raw.directors,
            year: raw.year,
            genres,
            imdb_rating: raw.imdb_rating,
            imdb_votes: raw.imdb_votes,
            runtime: raw.runtime,
            ratings: vec![raw.rating],
            users: vec![raw.user],
        }
    }

    fn absorb(&mut self, raw: RawRating) {
        self.ratings.push(raw.rating);
        self.users.push(raw.user);
    }

    fn finalize(self) -> Option<MergedRecord> {
        let summary = Summary::of(&self.ratings)?;
        Some(MergedRecord {
            id: self.id,
            title: self.title,
            title_type: self.title_type,
            directors: self.directors,
            year: self.year,
            genres: self.genres,
            imdb_rating: self.imdb_rating,
            imdb_votes: self.imdb_votes,
            runtime: self.runtime,
            ratings: self.ratings,
            users: self.users,
            mean: summary.mean,
            median: summary.median,
            std: summary.std,
            voters: summary.voters,
            rank: 0,
            rank_delta: None,
        })
    }
}

/// 識別子 → 統合レコードの集約器
#[derive(Debug, Default)]
pub struct Merger {
    index: HashMap<String, usize>,
    builders: Vec<RecordBuilder>,
    rows: usize,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1 行を取り込む。既存の識別子なら評価とユーザー名だけを追記する。
    pub fn push(&mut self, raw: RawRating) {
        self.rows += 1;
        if let Some(&idx) = self.index.get(&raw.id) {
            self.builders[idx].absorb(raw);
        } else {
            self.index.insert(raw.id.clone(), self.builders.len());
            self.builders.push(RecordBuilder::new(raw));
        }
    }

    /// 取り込んだ行数
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// ユニークな識別子の数
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// 全入力の取り込み後に呼ぶ。統計値を確定させ、初出順に返す。
    pub fn finish(self) -> Vec<MergedRecord> {
        self.builders.into_iter().filter_map(RecordBuilder::finalize).collect()
    }
}
