//! 述語フィルタの列
//!
//! 各段は独立した純粋な述語で、有効な段だけを固定順（年 → 平均/中央値/標準偏差 → 投票者数
//! → 上映時間 → IMDb 投票数 → IMDb 評価 → 作品種別 → ジャンル）に適用する。
//! 段同士は互いに依存しないので、適用順を入れ替えても結果は変わらない。

use std::collections::HashSet;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{RatingsError, Result};
use crate::record::{KNOWN_GENRES, MergedRecord, TitleType, normalize_genre};

/// 両端を含む min/max 範囲
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

/// 範囲の端点に使える値。浮動小数点は有限値のみ受け付ける。
pub trait BoundValue: PartialOrd + Copy + Display {
    fn is_valid_bound(&self) -> bool {
        true
    }
}

impl BoundValue for i32 {}
impl BoundValue for u32 {}
impl BoundValue for u64 {}
impl BoundValue for usize {}

impl BoundValue for f64 {
    fn is_valid_bound(&self) -> bool {
        self.is_finite()
    }
}

impl<T: BoundValue> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// 値が欠損していれば、設定済みの境界がある限り不合格
    pub fn contains(&self, value: Option<T>) -> bool {
        let Some(v) = value else {
            return !self.is_set();
        };
        self.min.is_none_or(|min| v >= min) && self.max.is_none_or(|max| v <= max)
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        for value in [self.min, self.max].into_iter().flatten() {
            if !value.is_valid_bound() {
                return Err(RatingsError::InvalidBoundValue { field, value: value.to_string() });
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(RatingsError::InvalidBound {
                    field,
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// フィルタ設定。未設定の項目は無効。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub year: Bounds<i32>,
    pub mean: Bounds<f64>,
    pub median: Bounds<f64>,
    pub std: Bounds<f64>,
    pub voters: Bounds<usize>,
    pub runtime: Bounds<u32>,
    pub imdb_votes: Bounds<u64>,
    pub imdb_rating: Bounds<f64>,
    /// 作品種別の短縮名（`feature`, `tvseries` など）
    pub title_types: Vec<String>,
    /// ジャンル（どれか 1 つが一致すれば通す）
    pub genres: Vec<String>,
}

/// 1 段分のフィルタ
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStage {
    Year(Bounds<i32>),
    Mean(Bounds<f64>),
    Median(Bounds<f64>),
    Std(Bounds<f64>),
    Voters(Bounds<usize>),
    Runtime(Bounds<u32>),
    ImdbVotes(Bounds<u64>),
    ImdbRating(Bounds<f64>),
    TitleType(Vec<TitleType>),
    /// 正規化済みのジャンル名
    Genre(HashSet<String>),
}

impl FilterStage {
    pub fn name(&self) -> &'static str {
        match self {
            FilterStage::Year(_) => "year",
            FilterStage::Mean(_) => "mean",
            FilterStage::Median(_) => "median",
            FilterStage::Std(_) => "std",
            FilterStage::Voters(_) => "voters",
            FilterStage::Runtime(_) => "runtime",
            FilterStage::ImdbVotes(_) => "imdb_votes",
            FilterStage::ImdbRating(_) => "imdb_rating",
            FilterStage::TitleType(_) => "title_type",
            FilterStage::Genre(_) => "genre",
        }
    }

    pub fn keeps(&self, r: &MergedRecord) -> bool {
        match self {
            FilterStage::Year(b) => b.contains(r.year),
            FilterStage::Mean(b) => b.contains(Some(r.mean)),
            FilterStage::Median(b) => b.contains(Some(r.median)),
            FilterStage::Std(b) => b.contains(Some(r.std)),
            FilterStage::Voters(b) => b.contains(Some(r.voters)),
            FilterStage::Runtime(b) => b.contains(r.runtime),
            FilterStage::ImdbVotes(b) => b.contains(r.imdb_votes),
            FilterStage::ImdbRating(b) => b.contains(r.imdb_rating),
            FilterStage::TitleType(types) => types.contains(&r.title_type),
            FilterStage::Genre(wanted) => r.genres.iter().any(|g| wanted.contains(&normalize_genre(g))),
        }
    }
}

/// 有効な段だけを固定順に並べたフィルタ列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPipeline {
    stages: Vec<FilterStage>,
}

impl FilterPipeline {
    /// 設定を検証して段を組み立てる。不正な設定はここでエラーにする。
    pub fn from_config(cfg: &FilterConfig) -> Result<Self> {
        cfg.year.validate("year")?;
        cfg.mean.validate("mean")?;
        cfg.median.validate("median")?;
        cfg.std.validate("std")?;
        cfg.voters.validate("voters")?;
        cfg.runtime.validate("runtime")?;
        cfg.imdb_votes.validate("imdb_votes")?;
        cfg.imdb_rating.validate("imdb_rating")?;

        let mut stages = Vec::new();
        if cfg.year.is_set() {
            stages.push(FilterStage::Year(cfg.year));
        }
        if cfg.mean.is_set() {
            stages.push(FilterStage::Mean(cfg.mean));
        }
        if cfg.median.is_set() {
            stages.push(FilterStage::Median(cfg.median));
        }
        if cfg.std.is_set() {
            stages.push(FilterStage::Std(cfg.std));
        }
        if cfg.voters.is_set() {
            stages.push(FilterStage::Voters(cfg.voters));
        }
        if cfg.runtime.is_set() {
            stages.push(FilterStage::Runtime(cfg.runtime));
        }
        if cfg.imdb_votes.is_set() {
            stages.push(FilterStage::ImdbVotes(cfg.imdb_votes));
        }
        if cfg.imdb_rating.is_set() {
            stages.push(FilterStage::ImdbRating(cfg.imdb_rating));
        }
        if !cfg.title_types.is_empty() {
            let types = cfg
                .title_types
                .iter()
                .map(|t| TitleType::from_mnemonic(t))
                .collect::<Result<Vec<_>>>()?;
            stages.push(FilterStage::TitleType(types));
        }
        if !cfg.genres.is_empty() {
            let known: HashSet<String> = KNOWN_GENRES.iter().map(|g| normalize_genre(g)).collect();
            let mut wanted = HashSet::new();
            for g in &cfg.genres {
                let key = normalize_genre(g);
                if !known.contains(&key) {
                    return Err(RatingsError::UnknownGenre(g.clone()));
                }
                wanted.insert(key);
            }
            stages.push(FilterStage::Genre(wanted));
        }
        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// 各段で作業集合を置き換えていく
    pub fn apply(&self, mut records: Vec<MergedRecord>) -> Vec<MergedRecord> {
        for stage in &self.stages {
            let before = records.len();
            records.retain(|r| stage.keeps(r));
            log::debug!("filter {}: {} -> {}", stage.name(), before, records.len());
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ids, record};

    fn sample() -> Vec<MergedRecord> {
        let mut a = record("a", &[9, 8]);
        a.year = Some(1994);
        a.genres = vec!["Crime".into(), "Drama".into()];
        let mut b = record("b", &[6]);
        b.year = Some(2010);
        b.runtime = None;
        b.title_type = TitleType::TvSeries;
        b.genres = vec!["Sci-Fi".into()];
        let mut c = record("c", &[10, 4, 7]);
        c.year = None;
        c.imdb_rating = Some(8.8);
        c.genres = vec!["Film-Noir".into()];
        let mut d = record("d", &[3]);
        d.year = Some(1950);
        d.imdb_votes = None;
        d.title_type = TitleType::Documentary;
        d.genres = vec!["Documentary".into()];
        vec![a, b, c, d]
    }

    fn run(cfg: FilterConfig) -> Vec<String> {
        let pipeline = FilterPipeline::from_config(&cfg).unwrap();
        ids(&pipeline.apply(sample())).into_iter().map(String::from).collect()
    }

    #[test]
    fn disabled_pipeline_is_noop() {
        let pipeline = FilterPipeline::from_config(&FilterConfig::default()).unwrap();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.apply(sample()).len(), 4);
    }

    #[test]
    fn bound_excludes_absent_values() {
        let cfg = FilterConfig { year: Bounds::new(Some(1900), None), ..Default::default() };
        assert_eq!(run(cfg), ["a", "b", "d"]);
        let cfg = FilterConfig { runtime: Bounds::new(None, Some(500)), ..Default::default() };
        assert_eq!(run(cfg), ["a", "c", "d"]);
    }

    #[test]
    fn bounds_are_inclusive() {
        let cfg = FilterConfig { year: Bounds::new(Some(1994), Some(2010)), ..Default::default() };
        assert_eq!(run(cfg), ["a", "b"]);
        let cfg = FilterConfig { mean: Bounds::new(Some(7.0), None), ..Default::default() };
        assert_eq!(run(cfg), ["a", "c"]);
        let cfg = FilterConfig { voters: Bounds::new(Some(2), Some(2)), ..Default::default() };
        assert_eq!(run(cfg), ["a"]);
    }

    #[test]
    fn title_type_mnemonics() {
        let cfg = FilterConfig {
            title_types: vec!["tvseries".into(), "docu".into()],
            ..Default::default()
        };
        assert_eq!(run(cfg), ["b", "d"]);
    }

    #[test]
    fn genre_intersection_is_sufficient() {
        let cfg = FilterConfig {
            genres: vec!["drama".into(), "film_noir".into()],
            ..Default::default()
        };
        assert_eq!(run(cfg), ["a", "c"]);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let cfg = FilterConfig { year: Bounds::new(Some(2000), Some(1990)), ..Default::default() };
        assert!(matches!(
            FilterPipeline::from_config(&cfg),
            Err(RatingsError::InvalidBound { field: "year", .. })
        ));
        let cfg = FilterConfig { genres: vec!["cooking".into()], ..Default::default() };
        assert!(matches!(FilterPipeline::from_config(&cfg), Err(RatingsError::UnknownGenre(_))));
        let cfg = FilterConfig { title_types: vec!["opera".into()], ..Default::default() };
        assert!(matches!(
            FilterPipeline::from_config(&cfg),
            Err(RatingsError::UnknownTitleType(_))
        ));
    }

    #[test]
    fn non_finite_float_bounds_are_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let cfg = FilterConfig { mean: Bounds::new(Some(bad), None), ..Default::default() };
            assert!(matches!(
                FilterPipeline::from_config(&cfg),
                Err(RatingsError::InvalidBoundValue { field: "mean", .. })
            ));
            let cfg = FilterConfig { std: Bounds::new(None, Some(bad)), ..Default::default() };
            assert!(matches!(
                FilterPipeline::from_config(&cfg),
                Err(RatingsError::InvalidBoundValue { field: "std", .. })
            ));
        }
    }

    #[test]
    fn stage_order_does_not_change_result() {
        let cfg = FilterConfig {
            year: Bounds::new(Some(1900), None),
            mean: Bounds::new(Some(5.0), None),
            imdb_rating: Bounds::new(None, Some(9.0)),
            genres: vec!["drama".into(), "sci-fi".into(), "documentary".into()],
            ..Default::default()
        };
        let pipeline = FilterPipeline::from_config(&cfg).unwrap();
        let forward = pipeline.apply(sample());

        let mut reversed = pipeline.clone();
        reversed.stages.reverse();
        let backward = reversed.apply(sample());

        let mut rotated = pipeline.clone();
        rotated.stages.rotate_left(1);
        let rotated = rotated.apply(sample());

        assert_eq!(ids(&forward), ids(&backward));
        assert_eq!(ids(&forward), ids(&rotated));
        assert_eq!(ids(&forward), ["a", "b"]);
    }
}
