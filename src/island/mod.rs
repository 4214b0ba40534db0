// src/island/mod.rs
//! Композитор многоостровной ("мореходной") доски.
//!
//! Порядок сборки фиксирован:
//! 1. Морская кромка по краям среднего ряда внешней решётки
//! 2. Главный остров: генерация отдельной маленькой доской и встраивание
//! 3. Волна моря вокруг главного острова
//! 4. Малые острова: семя → ограниченный рост → заливка ресурсами → море
//! 5. Финальная заливка морем всего оставшегося пространства
//! 6. Два прохода номеров: главный остров и малые острова отдельно
//!
//! Каждый остров замкнут морем сразу после заливки, поэтому проверки
//! соседства ресурсов никогда не пересекают границы островов.

mod clusters;
mod embed;

use std::collections::VecDeque;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, build_resourced_island};
use crate::config::{EngineSettings, IslandParams, NumberCounts, ResourceCounts, SeafarerParams};
use crate::error::GenerationError;
use crate::grid::GridShape;
use crate::placement::numbers::{NumberMode, place_numbers};
use crate::placement::resources::{fill_resources, take_one};
use crate::tile::Resource;

use clusters::{drawable_total, flood_remaining_sea, grow_cluster, pick_seed, surround_with_sea};

/// Генерирует многоостровную доску. Детерминированно при фиксированном `seed`.
///
/// Пул `outer_resources` обязан сходиться с внешней решёткой тайл-в-тайл,
/// а пул главного острова — быть его подмножеством: ресурсы главного
/// острова списываются из внешнего пула при встраивании.
pub fn create_seafarer_islands(
    params: &SeafarerParams,
    settings: &EngineSettings,
    seed: u64,
) -> Result<Board, GenerationError> {
    let shape = GridShape::new(params.outer_max_width, params.outer_min_width)?;

    let supplied: u32 = params.outer_resources.values().sum();
    if supplied as usize != shape.tile_count() {
        return Err(GenerationError::ResourcePoolMismatch {
            expected: shape.tile_count(),
            supplied: supplied as usize,
        });
    }
    for (&resource, &count) in &params.main_island.resources {
        let available = params.outer_resources.get(&resource).copied().unwrap_or(0);
        if available < count {
            // Главный остров требует больше, чем есть во внешнем пуле
            return Err(GenerationError::ResourcePoolMismatch {
                expected: count as usize,
                supplied: available as usize,
            });
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut board = Board::from_shape(shape);
    let mut pool = params.outer_resources.clone();

    seed_waist_sea(&mut board, &mut pool);

    // Главный остров живёт на собственной маленькой решётке: только ресурсы,
    // номера придут отдельным проходом уже на внешней доске
    let main_params = IslandParams {
        max_width: params.main_island.max_width,
        min_width: params.main_island.min_width,
        resources: params.main_island.resources.clone(),
        numbers: NumberCounts::new(),
        desert_center: params.main_island.desert_center,
        adjacency_limit: params.main_island.adjacency_limit,
    };
    let main = build_resourced_island(&main_params, settings, &mut rng)?;
    let embedded =
        embed::embed_main_island(&mut board, &main, params.main_island.center, &mut pool)?;
    info!("главный остров встроен: {} тайлов", embedded.len());
    board.push_island_group(embedded);
    surround_with_sea(&mut board, &mut pool);

    grow_small_islands(&mut board, params, settings, &mut pool, &mut rng)?;
    flood_remaining_sea(&mut board, &mut pool);

    assign_island_numbers(&mut board, params, settings, &mut rng)?;
    Ok(board)
}

/// Морская кромка по краям среднего ряда: не даёт главному острову
/// прилипнуть к периметру и задаёт точку отсчёта волнам моря.
fn seed_waist_sea(board: &mut Board, pool: &mut ResourceCounts) {
    let waist = board.shape.diff;
    for col in [0, board.shape.cols - 1] {
        if let Some(idx) = board.tile_index(&GridShape::position_key(waist, col)) {
            if board.tiles()[idx].resource.is_none() {
                board.assign_resource(idx, Resource::Sea);
                take_one(pool, Resource::Sea);
            }
        }
    }
}

/// Сажает малые острова, пока в пуле есть суша и на доске есть место.
///
/// Размер каждого острова тянется случайно до верхней границы,
/// выведенной из целевого числа островов; реальный размер может быть
/// меньше из-за бюджетов роста и морского окружения.
fn grow_small_islands(
    board: &mut Board,
    params: &SeafarerParams,
    settings: &EngineSettings,
    pool: &mut ResourceCounts,
    rng: &mut ChaCha8Rng,
) -> Result<(), GenerationError> {
    let mut seeds: Vec<(usize, usize)> = Vec::new();

    loop {
        let land_left = drawable_total(pool) as usize;
        if land_left == 0 {
            break;
        }
        let empties = board
            .tiles()
            .iter()
            .filter(|t| t.resource.is_none())
            .count();
        if empties == 0 {
            debug!("суша в пуле осталась, но решётка заполнена");
            break;
        }
        let sea_left = pool.get(&Resource::Sea).copied().unwrap_or(0) as usize;

        // Верхняя граница размера: свободное место за вычетом причитающегося
        // морю, поделённое на целевое число островов
        let cap = (empties.saturating_sub(sea_left) / params.island_count.max(1))
            .max(1)
            .min(land_left)
            .min(empties);

        let Some(seed_idx) = pick_seed(board, &seeds, settings.min_seed_distance) else {
            break;
        };
        let seed_tile = &board.tiles()[seed_idx];
        seeds.push((seed_tile.row, seed_tile.col));

        let target = if cap >= 2 { rng.gen_range(2..=cap) } else { 1 };
        let cluster = grow_cluster(board, seed_idx, target, settings);

        let queue: VecDeque<usize> = cluster.iter().copied().collect();
        fill_resources(board, queue, pool, params.adjacency_limit, settings, rng)?;
        board.push_island_group(cluster);
        surround_with_sea(board, pool);
    }
    Ok(())
}

/// Два прохода номеров: главный остров получает сбалансированную
/// расстановку, малые — прибрежно-осторожную, уводящую тяжёлые фишки
/// от открытой воды.
fn assign_island_numbers(
    board: &mut Board,
    params: &SeafarerParams,
    settings: &EngineSettings,
    rng: &mut ChaCha8Rng,
) -> Result<(), GenerationError> {
    let live = |board: &Board, ids: &[usize]| -> Vec<usize> {
        ids.iter()
            .copied()
            .filter(|&i| board.tiles()[i].resource.is_some_and(|r| !r.is_dead()))
            .collect()
    };

    if !params.main_island_numbers.is_empty() {
        let main_land = live(board, &board.islands()[0].clone());
        place_numbers(
            board,
            &main_land,
            &params.main_island_numbers,
            settings,
            NumberMode::Balanced,
            rng,
        )?;
    }

    if !params.small_island_numbers.is_empty() {
        let small_groups: Vec<usize> = board.islands()[1..].iter().flatten().copied().collect();
        let mut small_land = live(board, &small_groups);
        small_land.sort_unstable();
        if !small_land.is_empty() {
            place_numbers(
                board,
                &small_land,
                &params.small_island_numbers,
                settings,
                NumberMode::CoastalAverse,
                rng,
            )?;
        }
    }
    Ok(())
}
