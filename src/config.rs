// src/config.rs
//! Конфигурация генерации доски.
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Размеры решётки и пулы ресурсов/номеров
//! - Настройки движка: бюджеты итераций всех ограниченных циклов повторов
//! - Правила номеров: порядок расстановки, "крайние" номиналы, допустимая
//!   полоса суммы очков трёх смежных тайлов
//! - Параметры многоостровного ("мореходного") варианта
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для настройки через
//! конфигурационные файлы. Бюджеты повторов — явная конфигурация, а не
//! константы: поведение движка должно быть воспроизводимым и настраиваемым.

use std::collections::BTreeMap;
use std::fs;

use serde::{Deserialize, Serialize};

use crate::tile::Resource;

/// Пул ресурсов: тип → оставшееся количество.
///
/// `BTreeMap` вместо `HashMap` намеренно: порядок обхода пула влияет на
/// случайный выбор, а генерация обязана быть детерминированной при
/// фиксированном сиде.
pub type ResourceCounts = BTreeMap<Resource, u32>;

/// Пул номеров: номинал фишки → оставшееся количество.
pub type NumberCounts = BTreeMap<u8, u32>;

/// (Де)сериализация пула номеров через строковые ключи.
///
/// TOML и JSON не допускают числовых ключей таблиц, поэтому в файле
/// пул записывается как `{ "6" = 2, "8" = 2 }`.
pub mod number_counts {
    use std::collections::BTreeMap;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<u8, u32>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(map.iter().map(|(face, count)| (face.to_string(), count)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<u8, u32>, D::Error> {
        let raw = BTreeMap::<String, u32>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(face, count)| {
                face.parse::<u8>()
                    .map(|f| (f, count))
                    .map_err(|_| D::Error::custom(format!("invalid number face: {face}")))
            })
            .collect()
    }
}

/// Параметры одиночного острова.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IslandParams {
    /// Ширина среднего ряда в тайлах.
    pub max_width: usize,

    /// Ширина крайних рядов в тайлах.
    pub min_width: usize,

    /// Пул ресурсов; сумма должна точно совпадать с числом тайлов решётки.
    pub resources: ResourceCounts,

    /// Пул фишек номеров. Пустой пул допустим: остров без номеров
    /// (так генерируется главный остров мореходного варианта).
    #[serde(with = "number_counts", default)]
    pub numbers: NumberCounts,

    /// Ставить ли пустыню в центр доски. При отсутствии пустынь в пуле
    /// флаг ни на что не влияет.
    #[serde(default = "default_desert_center")]
    pub desert_center: bool,

    /// Максимальный размер связной группы одинаковых ресурсов.
    #[serde(default = "default_adjacency_limit")]
    pub adjacency_limit: usize,
}

fn default_desert_center() -> bool {
    true
}
fn default_adjacency_limit() -> usize {
    2
}

/// Параметры главного острова мореходного варианта.
///
/// Главный остров генерируется как независимый маленький остров
/// (только ресурсы) и затем встраивается во внешнюю решётку.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainIslandParams {
    pub max_width: usize,
    pub min_width: usize,

    /// Пул ресурсов главного острова; должен быть подмножеством внешнего пула.
    pub resources: ResourceCounts,

    #[serde(default = "default_desert_center")]
    pub desert_center: bool,

    /// `true` — встроить остров по центру внешней решётки,
    /// `false` — прижать к верхнему левому краю.
    #[serde(default)]
    pub center: bool,

    #[serde(default = "default_adjacency_limit")]
    pub adjacency_limit: usize,
}

/// Параметры многоостровной ("мореходной") доски.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeafarerParams {
    /// Ширина среднего ряда внешней решётки.
    pub outer_max_width: usize,

    /// Ширина крайних рядов внешней решётки.
    pub outer_min_width: usize,

    /// Полный пул внешней доски, включая море и ресурсы главного острова.
    pub outer_resources: ResourceCounts,

    pub main_island: MainIslandParams,

    /// Пул номеров главного острова (расставляется отдельным проходом).
    #[serde(with = "number_counts", default)]
    pub main_island_numbers: NumberCounts,

    /// Пул номеров малых островов. Может быть меньше числа их тайлов:
    /// лишние тайлы остаются без номера.
    #[serde(with = "number_counts", default)]
    pub small_island_numbers: NumberCounts,

    /// Лимит соседства одинаковых ресурсов для малых островов.
    #[serde(default = "default_adjacency_limit")]
    pub adjacency_limit: usize,

    /// Целевое число малых островов; определяет верхнюю границу их размера.
    #[serde(default = "default_island_count")]
    pub island_count: usize,
}

fn default_island_count() -> usize {
    4
}

/// Настройки движка: бюджеты всех ограниченных циклов и правила номеров.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Сколько случайных попыток вытянуть ресурс для одного тайла,
    /// прежде чем вернуть тайл в хвост очереди.
    #[serde(default = "default_resource_draws_per_tile")]
    pub resource_draws_per_tile: usize,

    /// Сколько отказов подряд допускается для тайла, прежде чем движок
    /// выселит ресурс соседа-нарушителя обратно в пул.
    #[serde(default = "default_resource_rejects_before_evict")]
    pub resource_rejects_before_evict: usize,

    /// Глобальный бюджет итераций расстановки ресурсов.
    #[serde(default = "default_resource_max_iterations")]
    pub resource_max_iterations: usize,

    /// Глобальный бюджет итераций одного прохода расстановки номеров.
    #[serde(default = "default_number_max_iterations")]
    pub number_max_iterations: usize,

    /// Сколько полных перезапусков прохода номеров допускается,
    /// прежде чем вернуть `PlacementRetryBudgetExceeded`.
    #[serde(default = "default_number_max_restarts")]
    pub number_max_restarts: usize,

    /// Максимум шагов роста одного кластера малого острова.
    #[serde(default = "default_cluster_growth_attempts")]
    pub cluster_growth_attempts: usize,

    /// Сколько морских соседей останавливает рост кластера.
    #[serde(default = "default_cluster_sea_limit")]
    pub cluster_sea_limit: usize,

    /// Минимальное координатное расстояние между семенами малых островов.
    #[serde(default = "default_min_seed_distance")]
    pub min_seed_distance: usize,

    /// Порядок расстановки номеров. По умолчанию — от тяжёлых очков к лёгким;
    /// номиналы пула, которых нет в списке, добавляются по возрастанию.
    #[serde(default = "default_placement_order")]
    pub placement_order: Vec<u8>,

    /// "Крайние" номиналы: фишки с максимальным весом, которым запрещено
    /// соседствовать друг с другом.
    #[serde(default = "default_extreme_faces")]
    pub extreme_faces: Vec<u8>,

    /// Нижняя граница суммы очков трёх смежных тайлов.
    #[serde(default = "default_triple_sum_min")]
    pub triple_sum_min: u32,

    /// Верхняя граница суммы очков трёх смежных тайлов.
    #[serde(default = "default_triple_sum_max")]
    pub triple_sum_max: u32,
}

fn default_resource_draws_per_tile() -> usize {
    4
}
fn default_resource_rejects_before_evict() -> usize {
    3
}
fn default_resource_max_iterations() -> usize {
    10_000
}
fn default_number_max_iterations() -> usize {
    2_000
}
fn default_number_max_restarts() -> usize {
    40
}
fn default_cluster_growth_attempts() -> usize {
    10
}
fn default_cluster_sea_limit() -> usize {
    4
}
fn default_min_seed_distance() -> usize {
    4
}
fn default_placement_order() -> Vec<u8> {
    vec![8, 6, 9, 12, 2, 5, 4, 10, 11, 3]
}
fn default_extreme_faces() -> Vec<u8> {
    vec![6, 8]
}
fn default_triple_sum_min() -> u32 {
    4
}
fn default_triple_sum_max() -> u32 {
    12
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            resource_draws_per_tile: 4,
            resource_rejects_before_evict: 3,
            resource_max_iterations: 10_000,
            number_max_iterations: 2_000,
            number_max_restarts: 40,
            cluster_growth_attempts: 10,
            cluster_sea_limit: 4,
            min_seed_distance: 4,
            placement_order: default_placement_order(),
            extreme_faces: default_extreme_faces(),
            triple_sum_min: 4,
            triple_sum_max: 12,
        }
    }
}

/// Полная конфигурация одного запуска генератора.
///
/// Ровно одна из секций `island` / `seafarers` должна присутствовать.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Сид генератора случайных чисел (детерминированная генерация).
    #[serde(default)]
    pub seed: u64,

    /// Порог баланса: доска принимается, когда суммарное отклонение очков
    /// по ресурсам от среднего меньше порога. Чем меньше порог, тем
    /// сбалансированнее доска, но тем меньше подходящих досок.
    #[serde(default = "default_balance_threshold")]
    pub balance_threshold: f32,

    /// Максимум полных попыток генерации во внешнем цикле.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    #[serde(default)]
    pub settings: EngineSettings,

    #[serde(default)]
    pub island: Option<IslandParams>,

    #[serde(default)]
    pub seafarers: Option<SeafarerParams>,
}

fn default_balance_threshold() -> f32 {
    4.0
}
fn default_max_attempts() -> usize {
    100
}

impl GenerationConfig {
    /// Загружает конфигурацию из TOML-файла.
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    ///
    /// # Пример
    /// ```toml
    /// # board.toml
    /// seed = 42
    /// balance_threshold = 3.0
    ///
    /// [island]
    /// max_width = 5
    /// min_width = 3
    /// adjacency_limit = 1
    ///
    /// [island.resources]
    /// Brick = 3
    /// Wood = 4
    /// Ore = 3
    /// Grain = 4
    /// Sheep = 4
    /// Desert = 1
    ///
    /// [island.numbers]
    /// "2" = 1
    /// "3" = 2
    /// ```
    pub fn from_toml_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
