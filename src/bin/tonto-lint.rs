//! Reference CLI front-end (spec.md §6.3): read a `.tonto` file, run
//! `analyze`, print the summary table and diagnostic report, exit with a
//! status code reflecting whether any error-severity diagnostic fired.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use tonto_lint::{analyze, error::CliError, report};

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tonto-lint", about = "Static analyzer for Tonto ontology sources")]
struct Cli {
    /// Path to a .tonto source file.
    file: PathBuf,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    verbosity: LogLevel,
}

fn read_source(path: &PathBuf) -> Result<String, CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| CliError::NotUtf8 { path: path.clone() })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    simple_logger::init_with_level(cli.verbosity.into()).expect("logger already initialized");

    let source = match read_source(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    let result = analyze(&source);
    println!("{}", report::render_summary(&result.ast, &result.symbols));

    print!("{}", report::render_diagnostics(&result.diagnostics, true));

    if result.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
