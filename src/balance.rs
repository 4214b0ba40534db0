// src/balance.rs
//! Оценка баланса доски.
//!
//! Чистое чтение: суммы очков по группам ресурсов уже ведёт `Board`,
//! здесь только сводка отклонения. Решение "оставить или перегенерировать"
//! модуль не принимает — это политика внешнего цикла, а не инвариант ядра.

use std::collections::BTreeMap;

use crate::tile::Resource;

/// Суммарное абсолютное отклонение очков групп от среднего.
///
/// Чем меньше значение, тем ровнее ресурсы по весу вероятности.
/// Пустая сводка (доска без номеров) даёт 0.
#[must_use]
pub fn total_deviation(totals: &BTreeMap<Resource, u32>) -> f32 {
    if totals.is_empty() {
        return 0.0;
    }
    let average = totals.values().sum::<u32>() as f32 / totals.len() as f32;
    totals
        .values()
        .map(|&points| (average - points as f32).abs())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_even_totals_have_zero_deviation() {
        let totals = BTreeMap::from([
            (Resource::Brick, 10),
            (Resource::Wood, 10),
            (Resource::Ore, 10),
        ]);
        assert!(total_deviation(&totals).abs() < f32::EPSILON);
    }

    #[test]
    fn deviation_sums_distances_from_average() {
        // Среднее 10: |10-8| + |10-10| + |10-12| = 4
        let totals = BTreeMap::from([
            (Resource::Brick, 8),
            (Resource::Wood, 10),
            (Resource::Ore, 12),
        ]);
        assert!((total_deviation(&totals) - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_totals_are_neutral() {
        assert_eq!(total_deviation(&BTreeMap::new()), 0.0);
    }
}
