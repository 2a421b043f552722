//! 競技方式の順位付け
//!
//! ソート済みの列を先頭から走査し、指定フィールドの値が変わった位置で新しい順位を振る。
//! 同値は組の先頭位置の順位を共有し、次の組は自分の位置を順位にする（1, 1, 3, 4）。

use std::cmp::Ordering;

use crate::field::{Direction, FieldValue, SortKey};
use crate::record::MergedRecord;

/// `records` はすでに最終順序に並んでいること
pub fn assign_ranks(records: &mut [MergedRecord], key: SortKey) {
    // 組の先頭レコードの位置。先頭要素の判定は Option で明示する（値 0 を「前の値なし」と扱わない）
    let mut last: Option<usize> = None;
    let mut group_rank = 0u32;

    for idx in 0..records.len() {
        let starts_group = match last {
            None => true,
            Some(prev) => changed(
                key.direction,
                &key.field.value(&records[idx]),
                &key.field.value(&records[prev]),
            ),
        };
        if starts_group {
            group_rank = idx as u32 + 1;
            last = Some(idx);
        }
        records[idx].rank = group_rank;
    }
}

/// 降順なら `value < last`、昇順なら `value > last` で新しい組とみなす
fn changed(direction: Direction, value: &FieldValue<'_>, last: &FieldValue<'_>) -> bool {
    match direction {
        Direction::Descending => value.compare(last) == Ordering::Less,
        Direction::Ascending => value.compare(last) == Ordering::Greater,
    }
}
