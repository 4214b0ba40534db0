// src/placement/numbers.rs
//! Расстановка фишек номеров по группам ресурсов.
//!
//! Пары (номер, группа ресурса) обрабатываются по кругу: очередь номеров
//! упорядочена по приоритету (по умолчанию тяжёлые очки первыми), очередь
//! ресурсов вращается, чтобы очки расходились по группам равномерно.
//! Проверки при размещении: одинаковый номинал не соседствует сам с собой,
//! два "крайних" номинала не соседствуют друг с другом. После вычерпывания
//! пула — контрольный проход по суммам очков троек смежных тайлов; нарушение
//! полностью сбрасывает номера прохода и запускает его заново, в пределах
//! лимита перезапусков.

use std::collections::VecDeque;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::board::Board;
use crate::config::{EngineSettings, NumberCounts};
use crate::error::GenerationError;
use crate::tile::Resource;

/// Режим прохода номеров.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberMode {
    /// Главный остров: равномерный разброс очков по группам ресурсов.
    Balanced,
    /// Малые острова: крайние номиналы уводятся с тайлов,
    /// сильно открытых морю.
    CoastalAverse,
}

/// Расставляет номера на тайлы `tile_ids`, вычерпывая пул.
///
/// Пул меньше числа тайлов допустим — лишние тайлы остаются без номера.
/// Пул больше числа тайлов отвергается жадно, до первого размещения.
pub(crate) fn place_numbers<R: Rng>(
    board: &mut Board,
    tile_ids: &[usize],
    pool: &NumberCounts,
    settings: &EngineSettings,
    mode: NumberMode,
    rng: &mut R,
) -> Result<(), GenerationError> {
    let supplied: u32 = pool.values().sum();
    if supplied as usize > tile_ids.len() {
        return Err(GenerationError::ResourcePoolMismatch {
            expected: tile_ids.len(),
            supplied: supplied as usize,
        });
    }
    if supplied == 0 {
        return Ok(());
    }

    for restart in 0..=settings.number_max_restarts {
        if restart > 0 {
            debug!("перезапуск прохода номеров #{restart}");
        }
        // Локальный сброс: никакое частичное состояние не переживает попытку
        for &i in tile_ids {
            board.clear_number(i);
        }

        if try_place_all(board, tile_ids, pool, settings, mode, rng)
            && validate_triple_sums(board, tile_ids, settings)
        {
            return Ok(());
        }
    }

    for &i in tile_ids {
        board.clear_number(i);
    }
    Err(GenerationError::PlacementRetryBudgetExceeded {
        stage: "numbers",
        budget: settings.number_max_restarts,
    })
}

/// Одна попытка вычерпать пул. `false` — бюджет итераций исчерпан.
fn try_place_all<R: Rng>(
    board: &mut Board,
    tile_ids: &[usize],
    pool: &NumberCounts,
    settings: &EngineSettings,
    mode: NumberMode,
    rng: &mut R,
) -> bool {
    let mut remaining = pool.clone();
    let mut number_queue = build_number_queue(pool, &settings.placement_order);
    let mut rotation = build_rotation(board, tile_ids);
    let mut iterations = 0usize;

    while let Some(face) = number_queue.pop_front() {
        iterations += 1;
        if iterations > settings.number_max_iterations {
            debug!("бюджет итераций номеров исчерпан (номинал {face})");
            return false;
        }
        let Some(resource) = rotation.pop_front() else {
            return false;
        };

        let mut candidates: Vec<usize> = tile_ids
            .iter()
            .copied()
            .filter(|&i| {
                board.tiles()[i].resource == Some(resource) && board.tiles()[i].number.is_none()
            })
            .collect();
        candidates.shuffle(rng);
        if mode == NumberMode::CoastalAverse && settings.extreme_faces.contains(&face) {
            // Стабильная сортировка сохраняет случайный порядок внутри равных
            candidates.sort_by_key(|&i| sea_exposure(board, i));
        }

        let slot = candidates
            .into_iter()
            .find(|&i| number_allowed(board, i, face, settings));
        match slot {
            Some(i) => {
                board.assign_number(i, face);
                if let Some(count) = remaining.get_mut(&face) {
                    *count -= 1;
                    if *count == 0 {
                        remaining.remove(&face);
                    } else {
                        number_queue.push_back(face);
                    }
                }
            }
            // Кандидаты группы кончились — ещё круг вращения
            None => number_queue.push_back(face),
        }
        rotation.push_back(resource);
    }
    true
}

/// Очередь номиналов: сначала в порядке приоритета, затем номиналы пула,
/// не упомянутые в порядке, — по возрастанию (пулы малых островов бывают
/// короче стандартного набора).
fn build_number_queue(pool: &NumberCounts, order: &[u8]) -> VecDeque<u8> {
    let mut queue = VecDeque::new();
    for &face in order {
        if pool.get(&face).is_some_and(|&c| c > 0) {
            queue.push_back(face);
        }
    }
    for (&face, &count) in pool {
        if count > 0 && !order.contains(&face) {
            queue.push_back(face);
        }
    }
    queue
}

/// Очередь вращения ресурсов: различные живые ресурсы тайлов прохода,
/// в стабильном порядке создания.
fn build_rotation(board: &Board, tile_ids: &[usize]) -> VecDeque<Resource> {
    let mut rotation = VecDeque::new();
    for &i in tile_ids {
        if let Some(resource) = board.tiles()[i].resource {
            if !resource.is_dead() && !rotation.contains(&resource) {
                rotation.push_back(resource);
            }
        }
    }
    rotation
}

/// Проверки соседства: одинаковый номинал и пара крайних номиналов
/// рядом не живут.
fn number_allowed(board: &Board, idx: usize, face: u8, settings: &EngineSettings) -> bool {
    for n in board.tiles()[idx].neighbors.iter().flatten().copied() {
        if let Some(neighbor_face) = board.tiles()[n].number {
            if neighbor_face == face {
                return false;
            }
            if settings.extreme_faces.contains(&face)
                && settings.extreme_faces.contains(&neighbor_face)
            {
                return false;
            }
        }
    }
    true
}

/// Открытость тайла морю: морские соседи плюс края доски
/// (за периметром моря не меньше).
fn sea_exposure(board: &Board, idx: usize) -> usize {
    let tile = &board.tiles()[idx];
    let sea = tile
        .neighbors
        .iter()
        .flatten()
        .filter(|&&n| board.tiles()[n].resource == Some(Resource::Sea))
        .count();
    sea + (6 - tile.neighbor_count())
}

/// Контрольный проход: для каждого тайла с номером каждая пара его
/// соседей, последовательных в кольцевом порядке, даёт тройку взаимно
/// смежных тайлов; сумма их очков обязана попасть в настроенную полосу.
fn validate_triple_sums(board: &Board, tile_ids: &[usize], settings: &EngineSettings) -> bool {
    for &i in tile_ids {
        let tile = &board.tiles()[i];
        if tile.number.is_none() {
            continue;
        }
        for d in 0..6 {
            let (Some(a), Some(b)) = (tile.neighbors[d], tile.neighbors[(d + 1) % 6]) else {
                continue;
            };
            if board.tiles()[a].number.is_none() || board.tiles()[b].number.is_none() {
                continue;
            }
            let sum = u32::from(tile.pips)
                + u32::from(board.tiles()[a].pips)
                + u32::from(board.tiles()[b].pips);
            if sum < settings.triple_sum_min || sum > settings.triple_sum_max {
                debug!(
                    "тройка {} / {} / {} вне полосы: сумма {sum}",
                    tile.position,
                    board.tiles()[a].position,
                    board.tiles()[b].position
                );
                return false;
            }
        }
    }
    true
}
