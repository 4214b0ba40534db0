// src/placement/mod.rs
//! Движки расстановки: ресурсы и фишки номеров.
//!
//! Оба движка — ограниченный случайный перебор: вытягиваем случайный
//! вариант, проверяем ограничения, при отказе повторяем в пределах явных
//! бюджетов итераций. Настоящего бэктрекинга здесь нет намеренно — это
//! и есть алгоритм; корректность обеспечивают инварианты проверок, а
//! завершаемость — бюджеты из `EngineSettings`.

pub mod numbers;
pub mod resources;
