//! 前回出力との順位差分

use std::collections::HashMap;
use std::io::Read;

use crate::csv_io::parse_snapshot_row;
use crate::error::Result;
use crate::record::{MergedRecord, PriorSnapshotRecord};

/// 識別子 → 前回レコード
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: HashMap<String, PriorSnapshotRecord>,
}

impl Snapshot {
    pub fn get(&self, id: &str) -> Option<&PriorSnapshotRecord> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 前回の出力ファイルを読み込む。壊れた行は警告を出して読み飛ばす。
pub fn load_snapshot<R: Read>(reader: R) -> Result<Snapshot> {
    let mut csv_reader =
        csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);
    let mut entries = HashMap::new();
    for (idx, row) in csv_reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                log::warn!("Skipping diff row {}: {e}", idx + 2);
                continue;
            }
        };
        match parse_snapshot_row(&row) {
            Ok(rec) => {
                entries.insert(rec.id.clone(), rec);
            }
            Err(e) => log::warn!("Skipping diff row {}: {e}", idx + 2),
        }
    }
    Ok(Snapshot { entries })
}

/// 前回にも存在したレコードへ `前回順位 - 今回順位` を設定する（正 = 順位が上がった）。
/// 戻り値は差分を設定した件数。
pub fn apply_deltas(records: &mut [MergedRecord], snapshot: &Snapshot) -> usize {
    let mut joined = 0;
    for r in records.iter_mut() {
        if let Some(prev) = snapshot.get(&r.id) {
            r.rank_delta = Some(i64::from(prev.rank) - i64::from(r.rank));
            joined += 1;
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_io::write_ranking;
    use crate::testutil::record;

    #[test]
    fn delta_is_previous_minus_current() {
        let mut records = vec![record("a", &[9]), record("b", &[8]), record("c", &[7])];
        for (i, r) in records.iter_mut().enumerate() {
            r.rank = i as u32 + 1;
        }
        let mut prev_a = record("a", &[9]);
        prev_a.rank = 3;
        let mut prev_b = record("b", &[8]);
        prev_b.rank = 1;
        let mut buf = Vec::new();
        write_ranking(&mut buf, &[prev_a, prev_b]).unwrap();

        let snapshot = load_snapshot(buf.as_slice()).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(apply_deltas(&mut records, &snapshot), 2);
        assert_eq!(records[0].rank_delta, Some(2));
        assert_eq!(records[1].rank_delta, Some(-1));
        assert_eq!(records[2].rank_delta, None);
    }

    #[test]
    fn identical_runs_have_zero_deltas() {
        let mut records: Vec<_> = (0..5).map(|i| record(&format!("t{i}"), &[9 - i])).collect();
        for (i, r) in records.iter_mut().enumerate() {
            r.rank = i as u32 + 1;
        }
        let mut buf = Vec::new();
        write_ranking(&mut buf, &records).unwrap();
        let snapshot = load_snapshot(buf.as_slice()).unwrap();
        apply_deltas(&mut records, &snapshot);
        assert!(records.iter().all(|r| r.rank_delta == Some(0)));
    }

    #[test]
    fn malformed_snapshot_rows_are_skipped() {
        let text = "Ranking,Diff,Title,Year,Directors,Mean,Median,Std deviation,Num voters,Runtime (mins),IMDb rating,IMDb votes,Title type,Genres,IMDb id,Users\n\
                    x,,T,,,,,,,,,,,,tt1,\n\
                    2,,T,,,,,,,,,,,,tt2,\n\
                    3,,T\n";
        let snapshot = load_snapshot(text.as_bytes()).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("tt2").map(|r| r.rank), Some(2));
    }

    #[test]
    fn undecodable_snapshot_row_is_skipped() {
        let mut text = b"Ranking,Diff,Title,Year,Directors,Mean,Median,Std deviation,Num voters,Runtime (mins),IMDb rating,IMDb votes,Title type,Genres,IMDb id,Users\n\
                         1,,T,,,,,,,,,,,,tt1,\n"
            .to_vec();
        // Latin-1 の "Café"（UTF-8 として不正）
        text.extend_from_slice(b"2,,Caf\xe9,,,,,,,,,,,,tt2,\n");
        text.extend_from_slice(b"3,,T,,,,,,,,,,,,tt3,\n");
        let snapshot = load_snapshot(text.as_slice()).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("tt1").map(|r| r.rank), Some(1));
        assert!(snapshot.get("tt2").is_none());
        assert_eq!(snapshot.get("tt3").map(|r| r.rank), Some(3));
    }
}
