//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `wordgraph_core` linkage.
//! - Optionally open a store and print its schema version and row counts.
//!
//! Usage: `wordgraph_cli [DB_PATH]`; `WORDGRAPH_DB_PATH` is used when no
//! argument is given, `WORDGRAPH_LOG_DIR` enables file logging.

use log::error;
use std::process::ExitCode;
use wordgraph_core::{default_log_level, init_logging, Engine, EngineConfig};

fn main() -> ExitCode {
    println!("wordgraph_core ping={}", wordgraph_core::ping());
    println!("wordgraph_core version={}", wordgraph_core::core_version());

    if let Ok(log_dir) = std::env::var("WORDGRAPH_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WORDGRAPH_DB_PATH").ok());
    let Some(db_path) = db_path else {
        return ExitCode::SUCCESS;
    };

    let stats = Engine::open(&db_path, EngineConfig::default()).and_then(|engine| engine.stats());
    match stats {
        Ok(stats) => {
            println!("store schema_version={}", stats.schema_version);
            println!("store words={} links={}", stats.words, stats.links);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_probe module=cli status=error error={err}");
            eprintln!("failed to open store `{db_path}`: {err}");
            ExitCode::FAILURE
        }
    }
}
