use clap::Parser;
use hexgen::{Board, GenerationConfig, create_island, create_seafarer_islands, total_deviation};
use std::path::PathBuf;

/// Генератор гексагональных досок
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: PathBuf,

    /// Сид генератора (перекрывает значение из конфигурации)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Максимум попыток генерации (перекрывает значение из конфигурации)
    #[arg(short, long)]
    attempts: Option<usize>,

    /// Вывести доску в JSON вместо текстовой схемы
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    println!("🔍 Загрузка конфигурации...");
    let config = GenerationConfig::from_toml_file(cli.config.to_str().unwrap())?;
    let base_seed = cli.seed.unwrap_or(config.seed);
    let max_attempts = cli.attempts.unwrap_or(config.max_attempts);

    let board = generate_with_retries(&config, base_seed, max_attempts)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    println!("\nРесурсы:");
    print_grid(&board, |t| {
        t.resource.map_or("  ".into(), |r| r.abbrev().to_string())
    });
    println!("\nНомера:");
    print_grid(&board, |t| {
        t.number.map_or("  ".into(), |n| format!("{n:>2}"))
    });

    println!("\nОчки по ресурсам:");
    for (resource, points) in board.resource_totals() {
        println!("  {resource:?}: {points}");
    }
    println!(
        "Суммарное отклонение: {:.1}",
        total_deviation(&board.resource_totals())
    );

    println!("\nГотово! Доска сгенерирована.");
    Ok(())
}

/// Внешний цикл генерации: попытки с сидами `base_seed + n`, пока
/// отклонение баланса не опустится ниже порога. Неудачная расстановка
/// (исчерпанный бюджет повторов) тоже считается потраченной попыткой.
fn generate_with_retries(
    config: &GenerationConfig,
    base_seed: u64,
    max_attempts: usize,
) -> Result<Board, Box<dyn std::error::Error>> {
    let mut last_error: Option<Box<dyn std::error::Error>> = None;

    for attempt in 0..max_attempts {
        let seed = base_seed.wrapping_add(attempt as u64);
        let result = if let Some(island) = &config.island {
            create_island(island, &config.settings, seed)
        } else if let Some(seafarers) = &config.seafarers {
            create_seafarer_islands(seafarers, &config.settings, seed)
        } else {
            return Err("конфигурация не содержит ни [island], ни [seafarers]".into());
        };

        match result {
            Ok(board) => {
                let deviation = total_deviation(&board.resource_totals());
                if deviation < config.balance_threshold {
                    println!(
                        "Попытка {}: отклонение {deviation:.1} — доска принята (сид {seed})",
                        attempt + 1
                    );
                    return Ok(board);
                }
                println!(
                    "Попытка {}: отклонение {deviation:.1} выше порога {:.1}",
                    attempt + 1,
                    config.balance_threshold
                );
            }
            Err(e) => {
                println!("Попытка {}: {e}", attempt + 1);
                last_error = Some(Box::new(e));
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| format!("ни одна из {max_attempts} попыток не прошла порог баланса").into()))
}

/// Текстовая схема доски: ряды решётки со сдвигом, ячейка `| XX |`.
fn print_grid(board: &Board, cell: impl Fn(&hexgen::Tile) -> String) {
    for row in 0..board.shape.rows {
        let offset = board.shape.row_offset(row);
        let mut line = "  ".repeat(offset);
        for col in 0..board.shape.cols {
            let key = hexgen::GridShape::position_key(row, col);
            if let Some(tile) = board.tile_at(&key) {
                line.push_str("| ");
                line.push_str(&cell(tile));
                line.push(' ');
            }
        }
        if !line.trim().is_empty() {
            line.push('|');
        }
        println!("{line}");
    }
}
