//! 複数キーによる安定ソート
//!
//! キー列 `[(f1, d1), .., (fn, dn)]` に対し、最初に値が異なるキーが 2 要素の順序を決める。
//! 全キーで等しい要素は入力順を保つ。先頭キーから順に「それまでのキーが全て等しい
//! 組だけを並べ替える」段階的ソートと同じ全順序を、辞書式比較 1 回の安定ソートで得る。

use std::cmp::Ordering;

use crate::field::SortKey;
use crate::record::MergedRecord;

/// キー列全体での辞書式比較
pub fn compare_by_keys(lhs: &MergedRecord, rhs: &MergedRecord, keys: &[SortKey]) -> Ordering {
    keys.iter()
        .map(|key| key.compare(lhs, rhs))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// レコード列をキー列で安定ソートする。キー列が空なら何もしない。
pub fn sort_records(records: &mut [MergedRecord], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    records.sort_by(|a, b| compare_by_keys(a, b, keys));
}
