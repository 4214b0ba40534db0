// src/error.rs
//! Ошибки генерации доски.
//!
//! Таксономия намеренно маленькая:
//! - `GridConfig` — недопустимые размеры сетки, возвращается до создания тайлов;
//! - `ResourcePoolMismatch` — пул ресурсов не сходится с числом тайлов, проверяется до расстановки;
//! - `PlacementRetryBudgetExceeded` — внутренний цикл повторов не сошёлся в отведённый бюджет.
//!
//! Отбраковка доски по балансу ошибкой не является: это штатное решение
//! внешнего цикла генерации (см. `balance`).

use thiserror::Error;

/// Ошибка генерации доски.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Недопустимые размеры сетки (`max_width < min_width`, нулевая ширина
    /// или больше рядов, чем букв A..=Z для ключей позиций).
    #[error("invalid grid dimensions: max_width = {max_width}, min_width = {min_width}")]
    GridConfig { max_width: usize, min_width: usize },

    /// Сумма счётчиков пула не совпадает с числом тайлов, которое требует сетка.
    #[error("resource pool mismatch: grid requires {expected} tiles, pool supplies {supplied}")]
    ResourcePoolMismatch { expected: usize, supplied: usize },

    /// Ограниченный цикл повторов не смог сойтись. Восстановление — только
    /// перегенерация всей доски на стороне вызывающего кода.
    #[error("placement retry budget exceeded in {stage} stage (budget {budget})")]
    PlacementRetryBudgetExceeded { stage: &'static str, budget: usize },
}
