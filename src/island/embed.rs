// src/island/embed.rs
//! Встраивание главного острова во внешнюю решётку.
//!
//! Главный остров генерируется как самостоятельная маленькая доска
//! (только ресурсы) и копируется тайл-в-тайл: либо прижатым к верхнему
//! левому краю, либо по центру внешней решётки с выравниванием "талий".

use crate::board::Board;
use crate::config::ResourceCounts;
use crate::error::GenerationError;
use crate::grid::GridShape;
use crate::placement::resources::take_one;

/// Копирует ресурсы главного острова в большую доску и возвращает
/// индексы занятых внешних тайлов в порядке создания главного острова.
/// Каждый скопированный ресурс списывается из внешнего пула.
pub(crate) fn embed_main_island(
    board: &mut Board,
    main: &Board,
    centered: bool,
    pool: &mut ResourceCounts,
) -> Result<Vec<usize>, GenerationError> {
    let targets = if centered {
        centered_targets(board, main)?
    } else {
        edge_targets(board, main)?
    };

    let mut embedded = Vec::with_capacity(targets.len());
    for (main_idx, outer_idx) in targets {
        let Some(resource) = main.tiles()[main_idx].resource else {
            continue;
        };
        board.assign_resource(outer_idx, resource);
        take_one(pool, resource);
        embedded.push(outer_idx);
    }
    Ok(embedded)
}

/// Прижатое к краю встраивание: тайлы ряда `r` главного острова занимают
/// первые свободные ячейки ряда `r` внешней решётки, слева направо.
fn edge_targets(board: &Board, main: &Board) -> Result<Vec<(usize, usize)>, GenerationError> {
    let mut pairs = Vec::with_capacity(main.tiles().len());
    for row in 0..main.shape.rows {
        let main_row: Vec<usize> = (0..main.tiles().len())
            .filter(|&i| main.tiles()[i].row == row)
            .collect();
        let outer_row: Vec<usize> = (0..board.tiles().len())
            .filter(|&i| board.tiles()[i].row == row && board.tiles()[i].resource.is_none())
            .collect();
        if outer_row.len() < main_row.len() {
            return Err(dims_error(main));
        }
        pairs.extend(main_row.into_iter().zip(outer_row));
    }
    Ok(pairs)
}

/// Центрированное встраивание: ряды сдвигаются так, чтобы "талии" совпали,
/// колонки — на чётную поправку, сохраняющую шаг решётки.
fn centered_targets(board: &Board, main: &Board) -> Result<Vec<(usize, usize)>, GenerationError> {
    if board.shape.diff < main.shape.diff || board.shape.max_width < main.shape.max_width {
        return Err(dims_error(main));
    }
    let row_shift = board.shape.diff - main.shape.diff;
    let mut col_shift = board.shape.max_width - main.shape.max_width;
    col_shift -= col_shift % 2;

    let mut pairs = Vec::with_capacity(main.tiles().len());
    for (main_idx, tile) in main.tiles().iter().enumerate() {
        let key = GridShape::position_key(tile.row + row_shift, tile.col + col_shift);
        let Some(outer_idx) = board.tile_index(&key) else {
            return Err(dims_error(main));
        };
        if board.tiles()[outer_idx].resource.is_some() {
            // Целевая ячейка уже занята (например, морской кромкой)
            return Err(dims_error(main));
        }
        pairs.push((main_idx, outer_idx));
    }
    Ok(pairs)
}

fn dims_error(main: &Board) -> GenerationError {
    GenerationError::GridConfig {
        max_width: main.shape.max_width,
        min_width: main.shape.min_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Resource;

    fn resourced_main() -> Board {
        let mut main = Board::from_shape(GridShape::new(3, 2).unwrap());
        for i in 0..main.tiles().len() {
            main.assign_resource(i, Resource::Wood);
        }
        main
    }

    #[test]
    fn edge_embedding_fills_row_prefixes() {
        let mut board = Board::from_shape(GridShape::new(5, 3).unwrap());
        let main = resourced_main();
        let mut pool = ResourceCounts::from([(Resource::Wood, 7), (Resource::Sea, 12)]);
        let ids = embed_main_island(&mut board, &main, false, &mut pool).unwrap();
        assert_eq!(ids.len(), 7);
        // Ряд A: первые две ячейки, ряд B: три, ряд C: две
        for key in ["A2", "A4", "B1", "B3", "B5", "C0", "C2"] {
            assert_eq!(
                board.tile_at(key).unwrap().resource,
                Some(Resource::Wood),
                "ожидался лес в {key}"
            );
        }
        assert!(!pool.contains_key(&Resource::Wood));
    }

    #[test]
    fn centered_embedding_aligns_waists() {
        let mut board = Board::from_shape(GridShape::new(5, 3).unwrap());
        let main = resourced_main();
        let mut pool = ResourceCounts::from([(Resource::Wood, 7), (Resource::Sea, 12)]);
        let ids = embed_main_island(&mut board, &main, true, &mut pool).unwrap();
        assert_eq!(ids.len(), 7);
        // Сдвиг рядов 1, сдвиг колонок 2: талия острова на талии доски
        for key in ["B3", "B5", "C2", "C4", "C6", "D3", "D5"] {
            assert_eq!(board.tile_at(key).unwrap().resource, Some(Resource::Wood));
        }
    }

    #[test]
    fn oversized_main_island_is_rejected() {
        let mut board = Board::from_shape(GridShape::new(3, 2).unwrap());
        let mut main = Board::from_shape(GridShape::new(5, 3).unwrap());
        for i in 0..main.tiles().len() {
            main.assign_resource(i, Resource::Ore);
        }
        let mut pool = ResourceCounts::from([(Resource::Ore, 19)]);
        assert!(matches!(
            embed_main_island(&mut board, &main, true, &mut pool),
            Err(GenerationError::GridConfig { .. })
        ));
    }
}
