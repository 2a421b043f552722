//! ソート・順位付けに使うフィールド定義

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RatingsError, Result};
use crate::record::MergedRecord;

/// ソート可能なフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Mean,
    Median,
    Std,
    NumVoters,
    ImdbVotes,
    ImdbRating,
    Runtime,
    Year,
    Title,
    Directors,
}

impl SortField {
    pub const ALL: [SortField; 10] = [
        SortField::Mean,
        SortField::Median,
        SortField::Std,
        SortField::NumVoters,
        SortField::ImdbVotes,
        SortField::ImdbRating,
        SortField::Runtime,
        SortField::Year,
        SortField::Title,
        SortField::Directors,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SortField::Mean => "mean",
            SortField::Median => "median",
            SortField::Std => "std",
            SortField::NumVoters => "numvoters",
            SortField::ImdbVotes => "imdbvotes",
            SortField::ImdbRating => "imdbrating",
            SortField::Runtime => "runtime",
            SortField::Year => "year",
            SortField::Title => "title",
            SortField::Directors => "directors",
        }
    }

    /// レコードから比較用の値を取り出す
    pub fn value(self, record: &MergedRecord) -> FieldValue<'_> {
        match self {
            SortField::Mean => FieldValue::Float(record.mean),
            SortField::Median => FieldValue::Float(record.median),
            SortField::Std => FieldValue::Float(record.std),
            SortField::NumVoters => FieldValue::Int(record.voters as i64),
            SortField::ImdbVotes => record.imdb_votes.map_or(FieldValue::Absent, |v| {
                FieldValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
            }),
            SortField::ImdbRating => record.imdb_rating.map_or(FieldValue::Absent, FieldValue::Float),
            SortField::Runtime => {
                record.runtime.map_or(FieldValue::Absent, |v| FieldValue::Int(i64::from(v)))
            }
            SortField::Year => record.year.map_or(FieldValue::Absent, |v| FieldValue::Int(i64::from(v))),
            SortField::Title => FieldValue::Text(&record.title),
            SortField::Directors => FieldValue::Text(&record.directors),
        }
    }
}

impl FromStr for SortField {
    type Err = RatingsError;

    fn from_str(s: &str) -> Result<Self> {
        SortField::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| RatingsError::UnknownSortField(s.to_string()))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ソート方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// 方向を考慮した比較。降順は引数を入れ替えて比較する。
    pub fn compare(self, lhs: &FieldValue<'_>, rhs: &FieldValue<'_>) -> Ordering {
        match self {
            Direction::Ascending => lhs.compare(rhs),
            Direction::Descending => rhs.compare(lhs),
        }
    }

    fn prefix(self) -> char {
        match self {
            Direction::Ascending => 'a',
            Direction::Descending => 'd',
        }
    }
}

/// (フィールド, 方向) の組。文字列表現は `dmean` / `ayear` のように方向の頭文字 + フィールド名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: SortField,
    pub direction: Direction,
}

impl SortKey {
    pub const fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }

    /// ソート指定がないときの順位付けキー（平均の降順）
    pub const DEFAULT_RANK: SortKey = SortKey::new(SortField::Mean, Direction::Descending);

    /// このキーで 2 レコードを比較する
    pub fn compare(&self, lhs: &MergedRecord, rhs: &MergedRecord) -> Ordering {
        self.direction.compare(&self.field.value(lhs), &self.field.value(rhs))
    }
}

impl FromStr for SortKey {
    type Err = RatingsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut chars = s.chars();
        let direction = match chars.next() {
            Some('a') => Direction::Ascending,
            Some('d') => Direction::Descending,
            _ => return Err(RatingsError::InvalidSortKey(s.to_string())),
        };
        let field = chars.as_str().parse::<SortField>()?;
        Ok(SortKey { field, direction })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.direction.prefix(), self.field)
    }
}

impl Serialize for SortKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 比較用に取り出したフィールド値
///
/// 欠損 < 数値 < 文字列 の順で並ぶ。整数と浮動小数は数値として比較し、
/// 浮動小数は `total_cmp` で全順序にする。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Absent,
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl FieldValue<'_> {
    fn class(&self) -> u8 {
        match self {
            FieldValue::Absent => 0,
            FieldValue::Int(_) | FieldValue::Float(_) => 1,
            FieldValue::Text(_) => 2,
        }
    }

    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Float(b)) => (*a as f64).total_cmp(b),
            (FieldValue::Float(a), FieldValue::Int(b)) => a.total_cmp(&(*b as f64)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => self.class().cmp(&other.class()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sort_key() {
        let key: SortKey = "dmean".parse().unwrap();
        assert_eq!(key, SortKey::new(SortField::Mean, Direction::Descending));
        let key: SortKey = "aimdbvotes".parse().unwrap();
        assert_eq!(key, SortKey::new(SortField::ImdbVotes, Direction::Ascending));
        assert_eq!(key.to_string(), "aimdbvotes");
    }

    #[test]
    fn parse_sort_key_rejects_unknown_field_and_prefix() {
        assert!(matches!("dfoo".parse::<SortKey>(), Err(RatingsError::UnknownSortField(f)) if f == "foo"));
        assert!(matches!("xmean".parse::<SortKey>(), Err(RatingsError::InvalidSortKey(_))));
        assert!(matches!("".parse::<SortKey>(), Err(RatingsError::InvalidSortKey(_))));
    }

    #[test]
    fn absent_sorts_before_present_values() {
        assert_eq!(FieldValue::Absent.compare(&FieldValue::Int(-5)), Ordering::Less);
        assert_eq!(FieldValue::Absent.compare(&FieldValue::Text("")), Ordering::Less);
        assert_eq!(FieldValue::Absent.compare(&FieldValue::Absent), Ordering::Equal);
        assert_eq!(FieldValue::Float(9.5).compare(&FieldValue::Text("a")), Ordering::Less);
    }

    #[test]
    fn mixed_numeric_compare() {
        assert_eq!(FieldValue::Int(7).compare(&FieldValue::Float(7.0)), Ordering::Equal);
        assert_eq!(FieldValue::Float(6.5).compare(&FieldValue::Int(7)), Ordering::Less);
        assert_eq!(
            Direction::Descending.compare(&FieldValue::Int(1), &FieldValue::Int(2)),
            Ordering::Greater
        );
    }
}
