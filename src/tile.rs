// src/tile.rs
//! Базовые типы доски: ресурсы, направления соседства и сам тайл.

use serde::{Deserialize, Serialize};

/// Тип ресурса гекса.
///
/// `Desert` и `Sea` — "мёртвые" (нейтральные) типы: они исключены из учёта
/// соседства одинаковых ресурсов, из расстановки номеров и из подсчёта баланса.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    Brick,
    Wood,
    Ore,
    Grain,
    Sheep,
    Gold,
    Desert,
    Sea,
}

impl Resource {
    /// Нейтральный тайл: не участвует в ограничениях соседства и не получает номер.
    #[must_use]
    pub fn is_dead(self) -> bool {
        matches!(self, Resource::Desert | Resource::Sea)
    }

    /// Двухбуквенное сокращение для текстового вывода доски.
    #[must_use]
    pub fn abbrev(self) -> &'static str {
        match self {
            Resource::Brick => "Br",
            Resource::Wood => "Wo",
            Resource::Ore => "Or",
            Resource::Grain => "Gr",
            Resource::Sheep => "Sh",
            Resource::Gold => "Go",
            Resource::Desert => "De",
            Resource::Sea => "Se",
        }
    }
}

/// Шесть направлений соседства гекса, в порядке обхода по кольцу.
///
/// Порядок важен: проверка сумм троек (см. `placement::numbers`) берёт пары
/// соседей, последовательных в этом кольце, — такие соседи смежны и между собой.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Right,
    TopRight,
    TopLeft,
    Left,
    BottomLeft,
    BottomRight,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Right,
        Direction::TopRight,
        Direction::TopLeft,
        Direction::Left,
        Direction::BottomLeft,
        Direction::BottomRight,
    ];

    /// Противоположное направление: если B — сосед A по `d`,
    /// то A — сосед B по `d.opposite()`.
    #[must_use]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::TopRight => Direction::BottomLeft,
            Direction::TopLeft => Direction::BottomRight,
            Direction::Left => Direction::Right,
            Direction::BottomLeft => Direction::TopRight,
            Direction::BottomRight => Direction::TopLeft,
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Вес вероятности (очки) фишки номера: стандартное распределение,
/// центральное значение 7 намеренно отсутствует.
#[must_use]
pub fn pip_weight(face: u8) -> u8 {
    match face {
        2 | 12 => 1,
        3 | 11 => 2,
        4 | 10 => 3,
        5 | 9 => 4,
        6 | 8 => 5,
        _ => 0,
    }
}

/// Один гекс доски.
///
/// Тайлы живут в арене `Board`; соседи хранятся как индексы арены,
/// а не как владеющие ссылки, поэтому циклов владения нет.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    /// Стабильный ключ позиции: буква ряда + номер колонки, например `"C4"`.
    pub position: String,
    pub resource: Option<Resource>,
    /// Номинал фишки номера (2..=12 без 7).
    pub number: Option<u8>,
    /// Производный вес вероятности; 0, пока номер не назначен.
    pub pips: u8,
    #[serde(skip)]
    pub row: usize,
    #[serde(skip)]
    pub col: usize,
    /// Индексы соседей в арене доски, по порядку `Direction::ALL`.
    #[serde(skip)]
    pub neighbors: [Option<usize>; 6],
}

impl Tile {
    #[must_use]
    pub fn new(position: String, row: usize, col: usize) -> Self {
        Self {
            position,
            resource: None,
            number: None,
            pips: 0,
            row,
            col,
            neighbors: [None; 6],
        }
    }

    /// Сосед по направлению, если он существует (у тайлов периметра их меньше шести).
    #[must_use]
    pub fn neighbor(&self, direction: Direction) -> Option<usize> {
        self.neighbors[direction.index()]
    }

    /// Число фактических соседей.
    #[must_use]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.iter().flatten().count()
    }
}
