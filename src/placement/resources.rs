// src/placement/resources.rs
//! Расстановка ресурсов под лимит соседства.
//!
//! Очередь тайлов обрабатывается по принципу FIFO. Для головного тайла
//! вытягивается случайный ресурс из пула; заливка по уже расставленным
//! одинаковым соседям считает размер связной группы, которую создало бы
//! назначение, и принимает его, только пока группа остаётся в лимите.
//! Единственный выход из локального тупика — выселение ресурса
//! соседа-нарушителя обратно в пул.

use std::collections::VecDeque;

use log::debug;
use rand::Rng;

use crate::board::Board;
use crate::config::{EngineSettings, ResourceCounts};
use crate::error::GenerationError;
use crate::grid::GridShape;
use crate::tile::Resource;

/// Ставит пустыни из пула в центр доски; переполнение уходит на
/// соседей центра в кольцевом порядке. Размещённые пустыни исключаются
/// из пула и дальше не участвуют ни в каких проверках соседства.
pub(crate) fn place_desert_center(board: &mut Board, pool: &mut ResourceCounts) {
    let Some(&count) = pool.get(&Resource::Desert) else {
        return;
    };
    let (row, col) = board.shape.center_position();
    let Some(center) = board.tile_index(&GridShape::position_key(row, col)) else {
        return;
    };

    let mut slots = vec![center];
    slots.extend(board.tiles()[center].neighbors.iter().flatten().copied());

    let mut placed = 0u32;
    for idx in slots {
        if placed == count {
            break;
        }
        if board.tiles()[idx].resource.is_none() {
            board.assign_resource(idx, Resource::Desert);
            placed += 1;
        }
    }
    // Больше пустынь, чем слотов вокруг центра, — остаток разыграется случайно
    if placed > 0 {
        take_one_n(pool, Resource::Desert, placed);
    }
}

/// Заполняет ресурсами все тайлы очереди, вычерпывая пул.
///
/// Очередь произвольная: одиночный конвейер подаёт сюда всю сушу,
/// мореходный композитор — тайлы одного кластера. Глобальный бюджет
/// итераций превращает незатухающий перебор в типизированную ошибку.
pub(crate) fn fill_resources<R: Rng>(
    board: &mut Board,
    mut queue: VecDeque<usize>,
    pool: &mut ResourceCounts,
    adjacency_limit: usize,
    settings: &EngineSettings,
    rng: &mut R,
) -> Result<(), GenerationError> {
    // Домен прохода: выселение не смеет трогать тайлы чужих проходов
    // (например, уже встроенный главный остров)
    let mut domain = vec![false; board.tiles().len()];
    for &i in &queue {
        domain[i] = true;
    }
    let mut iterations = 0usize;

    'tiles: while let Some(idx) = queue.pop_front() {
        // Выселенный сосед мог попасть в очередь дважды
        if board.tiles()[idx].resource.is_some() {
            continue;
        }

        let mut draws = 0usize;
        let mut rejects = 0usize;
        loop {
            iterations += 1;
            if iterations > settings.resource_max_iterations {
                debug!(
                    "бюджет итераций ресурсов исчерпан на тайле {}",
                    board.tiles()[idx].position
                );
                return Err(GenerationError::PlacementRetryBudgetExceeded {
                    stage: "resources",
                    budget: settings.resource_max_iterations,
                });
            }
            if draws >= settings.resource_draws_per_tile {
                // Лимит попыток для одного тайла — в хвост очереди
                queue.push_back(idx);
                continue 'tiles;
            }

            let kinds = drawable_kinds(pool);
            if kinds.is_empty() {
                // Пул пуст, а тайлы остались: пул не сходится с очередью
                return Err(GenerationError::PlacementRetryBudgetExceeded {
                    stage: "resources",
                    budget: settings.resource_max_iterations,
                });
            }
            draws += 1;
            let resource = kinds[rng.gen_range(0..kinds.len())];

            // Нейтральные тайлы не ограничены соседством
            if resource.is_dead() || connected_same_resource(board, idx, resource) < adjacency_limit
            {
                board.assign_resource(idx, resource);
                take_one(pool, resource);
                continue 'tiles;
            }

            if rejects >= settings.resource_rejects_before_evict {
                // Локальный тупик: освобождаем одного соседа-нарушителя
                let violator = board.tiles()[idx]
                    .neighbors
                    .iter()
                    .flatten()
                    .copied()
                    .find(|&n| domain[n] && board.tiles()[n].resource == Some(resource));
                if let Some(n) = violator {
                    if let Some(returned) = board.clear_resource(n) {
                        debug!(
                            "выселение: {:?} снят с {} ради {}",
                            returned,
                            board.tiles()[n].position,
                            board.tiles()[idx].position
                        );
                        give_back(pool, returned);
                        queue.push_back(n);
                    }
                }
                queue.push_back(idx);
                continue 'tiles;
            }
            rejects += 1;
        }
    }
    Ok(())
}

/// Размер связной группы одинакового ресурса, которую создало бы
/// назначение `resource` тайлу `start` (сам тайл не считается).
/// Заливка транзитивная: учитываются и соседи соседей.
pub(crate) fn connected_same_resource(board: &Board, start: usize, resource: Resource) -> usize {
    let mut seen = vec![false; board.tiles().len()];
    seen[start] = true;

    let mut queue = VecDeque::new();
    for n in board.tiles()[start].neighbors.iter().flatten().copied() {
        if !seen[n] && board.tiles()[n].resource == Some(resource) {
            seen[n] = true;
            queue.push_back(n);
        }
    }

    let mut count = queue.len();
    while let Some(i) = queue.pop_front() {
        for n in board.tiles()[i].neighbors.iter().flatten().copied() {
            if !seen[n] && board.tiles()[n].resource == Some(resource) {
                seen[n] = true;
                count += 1;
                queue.push_back(n);
            }
        }
    }
    count
}

/// Типы, доступные случайному розыгрышу: остаток в пуле больше нуля,
/// море никогда не разыгрывается (его ставят волны заливки композитора).
fn drawable_kinds(pool: &ResourceCounts) -> Vec<Resource> {
    pool.iter()
        .filter(|&(&r, &c)| c > 0 && r != Resource::Sea)
        .map(|(&r, _)| r)
        .collect()
}

pub(crate) fn take_one(pool: &mut ResourceCounts, resource: Resource) {
    take_one_n(pool, resource, 1);
}

fn take_one_n(pool: &mut ResourceCounts, resource: Resource, n: u32) {
    if let Some(count) = pool.get_mut(&resource) {
        *count = count.saturating_sub(n);
        if *count == 0 {
            pool.remove(&resource);
        }
    }
}

pub(crate) fn give_back(pool: &mut ResourceCounts, resource: Resource) {
    *pool.entry(resource).or_insert(0) += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pool(entries: &[(Resource, u32)]) -> ResourceCounts {
        entries.iter().copied().collect()
    }

    #[test]
    fn desert_goes_to_board_center() {
        let mut board = Board::from_shape(GridShape::new(5, 3).unwrap());
        let mut counts = pool(&[(Resource::Desert, 1), (Resource::Wood, 18)]);
        place_desert_center(&mut board, &mut counts);
        assert_eq!(board.tile_at("C4").unwrap().resource, Some(Resource::Desert));
        assert!(!counts.contains_key(&Resource::Desert));
    }

    #[test]
    fn extra_deserts_spill_to_center_neighbors() {
        let mut board = Board::from_shape(GridShape::new(5, 3).unwrap());
        let mut counts = pool(&[(Resource::Desert, 3)]);
        place_desert_center(&mut board, &mut counts);
        let deserts = board
            .tiles()
            .iter()
            .filter(|t| t.resource == Some(Resource::Desert))
            .count();
        assert_eq!(deserts, 3);
        // Все рядом с центром
        let center = board.tile_index("C4").unwrap();
        for (i, tile) in board.tiles().iter().enumerate() {
            if tile.resource == Some(Resource::Desert) && i != center {
                assert!(board.tiles()[center].neighbors.contains(&Some(i)));
            }
        }
    }

    #[test]
    fn no_desert_in_pool_means_no_desert_on_board() {
        // Идемпотентность флага desert_center при нулевом пуле пустынь
        let mut board = Board::from_shape(GridShape::new(3, 2).unwrap());
        let mut counts = pool(&[(Resource::Wood, 7)]);
        place_desert_center(&mut board, &mut counts);
        assert!(
            board
                .tiles()
                .iter()
                .all(|t| t.resource != Some(Resource::Desert))
        );
    }

    #[test]
    fn fill_respects_adjacency_limit() {
        for seed in 0..8 {
            let mut board = Board::from_shape(GridShape::new(5, 3).unwrap());
            let mut counts = pool(&[
                (Resource::Brick, 4),
                (Resource::Wood, 4),
                (Resource::Ore, 4),
                (Resource::Grain, 4),
                (Resource::Sheep, 3),
            ]);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let queue: VecDeque<usize> = (0..board.tiles().len()).collect();
            fill_resources(
                &mut board,
                queue,
                &mut counts,
                2,
                &EngineSettings::default(),
                &mut rng,
            )
            .unwrap();

            assert!(counts.is_empty(), "пул должен быть вычерпан");
            for (i, tile) in board.tiles().iter().enumerate() {
                let resource = tile.resource.expect("каждый тайл получает ресурс");
                // Связная группа вместе с самим тайлом не превышает лимит
                assert!(connected_same_resource(&board, i, resource) < 2);
            }
        }
    }

    #[test]
    fn pool_counts_are_conserved() {
        let supplied = pool(&[
            (Resource::Brick, 2),
            (Resource::Wood, 2),
            (Resource::Ore, 2),
            (Resource::Grain, 1),
        ]);
        let mut board = Board::from_shape(GridShape::new(3, 2).unwrap());
        let mut counts = supplied.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let queue: VecDeque<usize> = (0..board.tiles().len()).collect();
        fill_resources(
            &mut board,
            queue,
            &mut counts,
            2,
            &EngineSettings::default(),
            &mut rng,
        )
        .unwrap();

        for (&resource, &count) in &supplied {
            let placed = board
                .tiles()
                .iter()
                .filter(|t| t.resource == Some(resource))
                .count();
            assert_eq!(placed as u32, count);
        }
    }

    #[test]
    fn impossible_pool_hits_retry_budget() {
        // Один ресурс на всю доску при лимите 1 не расставить
        let mut board = Board::from_shape(GridShape::new(3, 2).unwrap());
        let mut counts = pool(&[(Resource::Wood, 7)]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let settings = EngineSettings {
            resource_max_iterations: 500,
            ..EngineSettings::default()
        };
        let queue: VecDeque<usize> = (0..board.tiles().len()).collect();
        let result = fill_resources(&mut board, queue, &mut counts, 1, &settings, &mut rng);
        assert!(matches!(
            result,
            Err(GenerationError::PlacementRetryBudgetExceeded {
                stage: "resources",
                ..
            })
        ));
    }
}
