// src/grid.rs
//! Построение гексагональной решётки.
//!
//! Доска хранится как прямоугольный массив рядов и колонок, но тайлы
//! материализуются только в "валидных" ячейках: через одну колонку,
//! со смещением, повторяющим ромбовидную форму физической доски.
//! Смещение уменьшается на единицу с каждым рядом до средней "талии"
//! и растёт на единицу после неё.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::tile::Direction;

/// Форма решётки, выведенная из ширины крайнего и среднего ряда.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    /// Число тайлов в среднем ("талия") ряду.
    pub max_width: usize,
    /// Число тайлов в крайних рядах.
    pub min_width: usize,
    /// Разница ширин; одновременно индекс среднего ряда.
    pub diff: usize,
    /// Число рядов хранения.
    pub rows: usize,
    /// Число колонок хранения.
    pub cols: usize,
}

impl GridShape {
    /// Проверяет размеры и выводит параметры решётки.
    ///
    /// Ключи позиций используют буквы `A..=Z`, поэтому решётка выше
    /// 26 рядов тоже отклоняется как ошибка конфигурации.
    pub fn new(max_width: usize, min_width: usize) -> Result<Self, GenerationError> {
        if min_width == 0 || max_width < min_width {
            return Err(GenerationError::GridConfig {
                max_width,
                min_width,
            });
        }
        let diff = max_width - min_width;
        let rows = diff * 2 + 1;
        let cols = max_width * 2 - 1;
        if rows > 26 {
            return Err(GenerationError::GridConfig {
                max_width,
                min_width,
            });
        }
        Ok(Self {
            max_width,
            min_width,
            diff,
            rows,
            cols,
        })
    }

    /// Горизонтальное смещение ряда внутри массива хранения.
    #[must_use]
    pub fn row_offset(&self, row: usize) -> usize {
        self.diff.abs_diff(row)
    }

    /// Число тайлов в ряду.
    #[must_use]
    pub fn row_width(&self, row: usize) -> usize {
        self.max_width - self.row_offset(row)
    }

    /// Полное число тайлов решётки.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        (0..self.rows).map(|r| self.row_width(r)).sum()
    }

    /// Материализуется ли ячейка `(row, col)`: ряд в пределах решётки,
    /// колонка на валидном шаге относительно смещения ряда.
    #[must_use]
    pub fn is_valid_cell(&self, row: i64, col: i64) -> bool {
        if row < 0 || row >= self.rows as i64 {
            return false;
        }
        let offset = self.row_offset(row as usize) as i64;
        col >= offset && col <= self.cols as i64 - 1 - offset && (col - offset) % 2 == 0
    }

    /// Координаты центра доски (ряд "талии", средняя колонка).
    ///
    /// При чётной `max_width` точный центр попадает между ячейками;
    /// тогда берётся ближайшая валидная колонка слева.
    #[must_use]
    pub fn center_position(&self) -> (usize, usize) {
        let row = self.diff;
        let mut col = self.max_width - 1;
        // Шаг талии начинается с нулевой колонки, валидны чётные
        if col % 2 != 0 {
            col -= 1;
        }
        (row, col)
    }

    /// Ключ позиции: буква ряда плюс номер колонки, например `"C4"`.
    #[must_use]
    pub fn position_key(row: usize, col: usize) -> String {
        let letter = (b'A' + row as u8) as char;
        format!("{letter}{col}")
    }
}

/// Кандидаты в соседи ячейки `(row, col)`, по кольцевому порядку `Direction::ALL`.
///
/// Чистая функция: она не знает о форме доски, поэтому возвращает и
/// координаты за пределами решётки. Подключение соседей оставляет только
/// те, что проходят `GridShape::is_valid_cell`, — этого достаточно, чтобы
/// тайлы периметра автоматически получили меньше шести соседей, а само
/// соседство было симметричным.
#[must_use]
pub fn neighbor_coords(row: i64, col: i64) -> [(Direction, (i64, i64)); 6] {
    [
        (Direction::Right, (row, col + 2)),
        (Direction::TopRight, (row - 1, col + 1)),
        (Direction::TopLeft, (row - 1, col - 1)),
        (Direction::Left, (row, col - 2)),
        (Direction::BottomLeft, (row + 1, col - 1)),
        (Direction::BottomRight, (row + 1, col + 1)),
    ]
}
