// src/island/clusters.rs
//! Рост малых островов и морские заливки.
//!
//! Остров растёт ограниченным обходом в ширину из семени; семена выбираются
//! по краям свободного пространства и не ближе минимального координатного
//! расстояния к уже посаженным. Каждую готовую группу суши окружает море,
//! поэтому живые тайлы разных островов никогда не соприкасаются.

use std::collections::VecDeque;

use log::debug;

use crate::board::Board;
use crate::config::{EngineSettings, ResourceCounts};
use crate::placement::resources::take_one;
use crate::tile::Resource;

/// Сумма ресурсов пула, подлежащих розыгрышу: всё, кроме моря.
/// Пустыня считается: она занимает тайл кластера, хоть и без номера.
pub(crate) fn drawable_total(pool: &ResourceCounts) -> u32 {
    pool.iter()
        .filter(|&(&r, _)| r != Resource::Sea)
        .map(|(_, &c)| c)
        .sum()
}

/// Превращает в море каждый пустой тайл, соседствующий с живой сушей.
/// Именно эта волна делает остров островом.
pub(crate) fn surround_with_sea(board: &mut Board, pool: &mut ResourceCounts) {
    let mut to_sea = Vec::new();
    for (i, tile) in board.tiles().iter().enumerate() {
        if tile.resource.is_some() {
            continue;
        }
        let touches_land = tile
            .neighbors
            .iter()
            .flatten()
            .any(|&n| board.tiles()[n].resource.is_some_and(|r| !r.is_dead()));
        if touches_land {
            to_sea.push(i);
        }
    }
    for i in to_sea {
        board.assign_resource(i, Resource::Sea);
        take_one(pool, Resource::Sea);
    }
}

/// Заливает морем всё оставшееся пустое пространство (финальный шаг).
pub(crate) fn flood_remaining_sea(board: &mut Board, pool: &mut ResourceCounts) {
    for i in 0..board.tiles().len() {
        if board.tiles()[i].resource.is_none() {
            board.assign_resource(i, Resource::Sea);
            take_one(pool, Resource::Sea);
        }
    }
}

/// Выбирает семя следующего острова: пустой тайл у кромки (периметр решётки
/// или морской сосед), не ближе `min_distance` к прежним семенам. Порядок
/// обзора — с конца порядка создания, чтобы новые острова расходились от
/// главного, занимающего начало доски. При нехватке кандидатов правило
/// расстояния ослабляется, затем и правило кромки.
pub(crate) fn pick_seed(
    board: &Board,
    seeds: &[(usize, usize)],
    min_distance: usize,
) -> Option<usize> {
    let empties: Vec<usize> = (0..board.tiles().len())
        .rev()
        .filter(|&i| board.tiles()[i].resource.is_none())
        .collect();

    let far_enough = |i: usize| {
        let tile = &board.tiles()[i];
        seeds
            .iter()
            .all(|&(r, c)| tile.row.abs_diff(r) + tile.col.abs_diff(c) >= min_distance)
    };
    let on_fringe = |i: usize| {
        let tile = &board.tiles()[i];
        tile.neighbor_count() < 6
            || tile
                .neighbors
                .iter()
                .flatten()
                .any(|&n| board.tiles()[n].resource == Some(Resource::Sea))
    };

    empties
        .iter()
        .copied()
        .find(|&i| on_fringe(i) && far_enough(i))
        .or_else(|| empties.iter().copied().find(|&i| far_enough(i)))
        .or_else(|| empties.first().copied())
}

/// Растит кластер пустых тайлов из семени до целевого размера.
///
/// Рост ограничен трижды: целевым размером, бюджетом шагов и числом
/// встреченных морских соседей — сильно зажатое морем семя даёт
/// маленький остров, и это нормально.
pub(crate) fn grow_cluster(
    board: &Board,
    seed_idx: usize,
    target: usize,
    settings: &EngineSettings,
) -> Vec<usize> {
    let mut in_cluster = vec![false; board.tiles().len()];
    in_cluster[seed_idx] = true;
    let mut collected = vec![seed_idx];
    let mut frontier = VecDeque::from([seed_idx]);
    let mut sea_seen = 0usize;
    let mut steps = 0usize;

    'grow: while collected.len() < target {
        steps += 1;
        if steps > settings.cluster_growth_attempts {
            break;
        }
        let Some(i) = frontier.pop_front() else {
            break;
        };
        for n in board.tiles()[i].neighbors.iter().flatten().copied() {
            match board.tiles()[n].resource {
                Some(Resource::Sea) => {
                    sea_seen += 1;
                    if sea_seen > settings.cluster_sea_limit {
                        break 'grow;
                    }
                }
                None if !in_cluster[n] => {
                    in_cluster[n] = true;
                    collected.push(n);
                    frontier.push_back(n);
                    if collected.len() == target {
                        break 'grow;
                    }
                }
                _ => {}
            }
        }
    }

    debug!(
        "кластер из {} вырос до {} тайлов (цель {target})",
        board.tiles()[seed_idx].position,
        collected.len()
    );
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridShape;

    #[test]
    fn surround_marks_only_coastline() {
        let mut board = Board::from_shape(GridShape::new(5, 3).unwrap());
        let center = board.tile_index("C4").unwrap();
        board.assign_resource(center, Resource::Wood);
        let mut pool = ResourceCounts::from([(Resource::Sea, 18)]);
        surround_with_sea(&mut board, &mut pool);

        let seas = board
            .tiles()
            .iter()
            .filter(|t| t.resource == Some(Resource::Sea))
            .count();
        // Море — ровно шесть соседей центра
        assert_eq!(seas, 6);
        assert_eq!(pool.get(&Resource::Sea), Some(&12));
        // Дальние углы остались пустыми
        assert_eq!(board.tile_at("A2").unwrap().resource, None);
    }

    #[test]
    fn flood_fills_everything_left() {
        let mut board = Board::from_shape(GridShape::new(3, 2).unwrap());
        let mut pool = ResourceCounts::from([(Resource::Sea, 7)]);
        flood_remaining_sea(&mut board, &mut pool);
        assert!(
            board
                .tiles()
                .iter()
                .all(|t| t.resource == Some(Resource::Sea))
        );
        assert!(pool.is_empty());
    }

    #[test]
    fn seeds_keep_their_distance() {
        let board = Board::from_shape(GridShape::new(9, 5).unwrap());
        // Первое семя в дальнем конце доски
        let first = pick_seed(&board, &[], 4).unwrap();
        let t = &board.tiles()[first];
        let second = pick_seed(&board, &[(t.row, t.col)], 4).unwrap();
        let u = &board.tiles()[second];
        assert!(t.row.abs_diff(u.row) + t.col.abs_diff(u.col) >= 4);
    }

    #[test]
    fn grow_cluster_stays_connected_and_bounded() {
        let board = Board::from_shape(GridShape::new(9, 5).unwrap());
        let seed = board.tile_index("E8").unwrap();
        let cluster = grow_cluster(&board, seed, 5, &EngineSettings::default());
        assert!(!cluster.is_empty() && cluster.len() <= 5);
        // Каждый тайл кластера (кроме семени) смежен с другим тайлом кластера
        for &i in &cluster[1..] {
            assert!(
                board.tiles()[i]
                    .neighbors
                    .iter()
                    .flatten()
                    .any(|n| cluster.contains(n))
            );
        }
    }
}
