//! 評価値の要約統計（平均・中央値・母標準偏差）

/// 算術平均。空なら `None`。
pub fn mean(values: &[u8]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
    Some(sum / values.len() as f64)
}

/// 中央値。要素数が偶数なら中央 2 値の平均。
pub fn median(values: &[u8]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0)
    } else {
        Some(f64::from(sorted[mid]))
    }
}

/// 母標準偏差（N で割る）
pub fn population_std(values: &[u8]) -> Option<f64> {
    let m = mean(values)?;
    let var = values
        .iter()
        .map(|&v| {
            let d = f64::from(v) - m;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    Some(var.sqrt())
}

/// 1 作品分の要約
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub voters: usize,
}

impl Summary {
    pub fn of(values: &[u8]) -> Option<Self> {
        Some(Self {
            mean: mean(values)?,
            median: median(values)?,
            std: population_std(values)?,
            voters: values.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[7, 1, 9]), Some(7.0));
        assert_eq!(median(&[8, 7, 10, 9]), Some(8.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn std_divides_by_n() {
        // 母分散: ((2-5)^2 + (4-5)^2 + (4-5)^2 + (4-5)^2 + (5-5)^2 + (5-5)^2 + (7-5)^2 + (9-5)^2) / 8 = 4
        let values = [2, 4, 4, 4, 5, 5, 7, 9];
        assert_eq!(mean(&values), Some(5.0));
        assert!((population_std(&values).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(population_std(&[6]), Some(0.0));
    }

    #[test]
    fn summary_counts_voters() {
        let s = Summary::of(&[10, 8]).unwrap();
        assert_eq!(s.voters, 2);
        assert_eq!(s.mean, 9.0);
        assert_eq!(s.median, 9.0);
        assert!((s.std - 1.0).abs() < 1e-12);
        assert!(Summary::of(&[]).is_none());
    }
}
