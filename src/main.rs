//! Flickgen entry point
//!
//! Batch level generator: reads a glyph database, generates a range of
//! levels, and prints the batch (levels, ghost replays, failures) as JSON
//! on stdout.

use std::process::ExitCode;

use flickgen::{GlyphDatabase, LevelGenerator};

fn usage() -> ExitCode {
    eprintln!("usage: flickgen <glyph-db.json> <start-level> <end-level> [seed]");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (db_path, start, end) = match args.as_slice() {
        [db, start, end] | [db, start, end, _] => {
            let (Ok(start), Ok(end)) = (start.parse::<u32>(), end.parse::<u32>()) else {
                return usage();
            };
            (db, start, end)
        }
        _ => return usage(),
    };
    let seed = args.get(3).map_or("flickgen", String::as_str);

    if start == 0 || end < start {
        eprintln!("level range must be 1-based and non-empty");
        return ExitCode::FAILURE;
    }

    let json = match std::fs::read_to_string(db_path) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("failed to read {db_path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    let database = match GlyphDatabase::from_json(&json) {
        Ok(db) => db,
        Err(err) => {
            eprintln!("failed to load glyph database: {err}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("loaded {} glyphs from {db_path}", database.len());

    let generator = LevelGenerator::new(database);
    let batch = generator.generate_batch(start, end, seed, |current, total, result| {
        log::info!(
            "[{current}/{total}] level {}: {}",
            start + current - 1,
            if result.success { "ok" } else { "failed" }
        );
    });

    match serde_json::to_string_pretty(&batch) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to serialize batch: {err}");
            ExitCode::FAILURE
        }
    }
}
