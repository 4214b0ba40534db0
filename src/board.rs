// src/board.rs
//! Арена тайлов и конвейер генерации одиночного острова.
//!
//! `Board` владеет всеми тайлами и держит три согласованных индекса:
//! поиск по ключу позиции, группировку тайлов по ресурсу и текущие суммы
//! очков по ресурсам. Вся мутация ресурсов и номеров идёт через
//! транзакционные методы, чтобы индексы не расходились с тайлами.

use std::collections::{BTreeMap, HashMap, VecDeque};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::{EngineSettings, IslandParams};
use crate::error::GenerationError;
use crate::grid::{GridShape, neighbor_coords};
use crate::placement::numbers::{NumberMode, place_numbers};
use crate::placement::resources::{fill_resources, place_desert_center};
use crate::tile::{Resource, Tile, pip_weight};

/// Гексагональная доска: арена тайлов плюс индексы.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub shape: GridShape,
    tiles: Vec<Tile>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    by_resource: BTreeMap<Resource, Vec<usize>>,
    #[serde(skip)]
    pip_totals: BTreeMap<Resource, u32>,
    /// Группы островов мореходного варианта: элемент 0 — главный остров.
    islands: Vec<Vec<usize>>,
}

impl Board {
    /// Материализует решётку: создаёт тайлы валидных ячеек в порядке
    /// "ряд за рядом" и подключает соседей. Соседство симметрично по
    /// построению: кандидаты обеих сторон проходят одну и ту же проверку
    /// принадлежности решётке.
    #[must_use]
    pub fn from_shape(shape: GridShape) -> Self {
        let mut tiles = Vec::with_capacity(shape.tile_count());
        let mut index = HashMap::with_capacity(shape.tile_count());

        for row in 0..shape.rows {
            let offset = shape.row_offset(row);
            let mut col = offset;
            while col <= shape.cols - 1 - offset {
                let key = GridShape::position_key(row, col);
                index.insert(key.clone(), tiles.len());
                tiles.push(Tile::new(key, row, col));
                col += 2;
            }
        }

        for i in 0..tiles.len() {
            let (row, col) = (tiles[i].row as i64, tiles[i].col as i64);
            for (direction, (nr, nc)) in neighbor_coords(row, col) {
                if shape.is_valid_cell(nr, nc) {
                    let key = GridShape::position_key(nr as usize, nc as usize);
                    tiles[i].neighbors[direction.index()] = Some(index[&key]);
                }
            }
        }

        Self {
            shape,
            tiles,
            index,
            by_resource: BTreeMap::new(),
            pip_totals: BTreeMap::new(),
            islands: Vec::new(),
        }
    }

    /// Тайлы в стабильном порядке создания.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Тайл по ключу позиции.
    #[must_use]
    pub fn tile_at(&self, position: &str) -> Option<&Tile> {
        self.index.get(position).map(|&i| &self.tiles[i])
    }

    /// Индекс арены по ключу позиции.
    #[must_use]
    pub fn tile_index(&self, position: &str) -> Option<usize> {
        self.index.get(position).copied()
    }

    /// Сумма очков по каждому живому ресурсу.
    #[must_use]
    pub fn resource_totals(&self) -> BTreeMap<Resource, u32> {
        self.pip_totals.clone()
    }

    /// Тайлы, несущие данный ресурс (мёртвые типы не индексируются).
    #[must_use]
    pub fn tiles_with_resource(&self, resource: Resource) -> &[usize] {
        self.by_resource.get(&resource).map_or(&[], Vec::as_slice)
    }

    /// Группы островов; пусто для одиночного острова.
    #[must_use]
    pub fn islands(&self) -> &[Vec<usize>] {
        &self.islands
    }

    pub(crate) fn push_island_group(&mut self, tile_ids: Vec<usize>) {
        self.islands.push(tile_ids);
    }

    pub(crate) fn assign_resource(&mut self, idx: usize, resource: Resource) {
        debug_assert!(self.tiles[idx].resource.is_none());
        self.tiles[idx].resource = Some(resource);
        if !resource.is_dead() {
            self.by_resource.entry(resource).or_default().push(idx);
        }
    }

    /// Снимает ресурс с тайла (выселение при локальном тупике) и возвращает его.
    pub(crate) fn clear_resource(&mut self, idx: usize) -> Option<Resource> {
        let resource = self.tiles[idx].resource.take()?;
        if !resource.is_dead() {
            if let Some(ids) = self.by_resource.get_mut(&resource) {
                ids.retain(|&i| i != idx);
            }
        }
        Some(resource)
    }

    pub(crate) fn assign_number(&mut self, idx: usize, face: u8) {
        debug_assert!(self.tiles[idx].number.is_none());
        let pips = pip_weight(face);
        self.tiles[idx].number = Some(face);
        self.tiles[idx].pips = pips;
        if let Some(resource) = self.tiles[idx].resource {
            if !resource.is_dead() {
                *self.pip_totals.entry(resource).or_insert(0) += u32::from(pips);
            }
        }
    }

    /// Полный локальный сброс номеров перед перезапуском прохода:
    /// никакое частичное состояние не должно пережить попытку.
    pub(crate) fn clear_number(&mut self, idx: usize) {
        let Some(face) = self.tiles[idx].number.take() else {
            return;
        };
        let pips = u32::from(pip_weight(face));
        self.tiles[idx].pips = 0;
        if let Some(resource) = self.tiles[idx].resource {
            if !resource.is_dead() {
                if let Some(total) = self.pip_totals.get_mut(&resource) {
                    *total = total.saturating_sub(pips);
                }
            }
        }
    }

    /// Индексы тайлов с живым ресурсом, в порядке создания.
    pub(crate) fn live_tile_ids(&self) -> Vec<usize> {
        (0..self.tiles.len())
            .filter(|&i| self.tiles[i].resource.is_some_and(|r| !r.is_dead()))
            .collect()
    }
}

/// Строит решётку и расставляет ресурсы; номера не трогает.
///
/// Общая часть одиночного конвейера и мореходного композитора
/// (главный остров генерируется именно так).
pub(crate) fn build_resourced_island(
    params: &IslandParams,
    settings: &EngineSettings,
    rng: &mut ChaCha8Rng,
) -> Result<Board, GenerationError> {
    let shape = GridShape::new(params.max_width, params.min_width)?;

    // Жадная проверка пула: до единого размещения
    let supplied: u32 = params.resources.values().sum();
    if supplied as usize != shape.tile_count() {
        return Err(GenerationError::ResourcePoolMismatch {
            expected: shape.tile_count(),
            supplied: supplied as usize,
        });
    }

    let mut board = Board::from_shape(shape);
    let mut pool = params.resources.clone();

    if params.desert_center {
        place_desert_center(&mut board, &mut pool);
    }

    let queue: VecDeque<usize> = (0..board.tiles().len())
        .filter(|&i| board.tiles()[i].resource.is_none())
        .collect();
    fill_resources(
        &mut board,
        queue,
        &mut pool,
        params.adjacency_limit,
        settings,
        rng,
    )?;
    Ok(board)
}

/// Генерирует одиночный остров: решётка → ресурсы → номера.
///
/// Детерминированно при фиксированном `seed`. Оценка баланса и решение
/// "оставить или перегенерировать" — ответственность вызывающего кода
/// (см. `balance`).
pub fn create_island(
    params: &IslandParams,
    settings: &EngineSettings,
    seed: u64,
) -> Result<Board, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut board = build_resourced_island(params, settings, &mut rng)?;

    if !params.numbers.is_empty() {
        let land = board.live_tile_ids();
        place_numbers(
            &mut board,
            &land,
            &params.numbers,
            settings,
            NumberMode::Balanced,
            &mut rng,
        )?;
    }
    Ok(board)
}
