use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use instant::Duration;
use crossword_csp::{Crossword, CrosswordSolver, Dictionary, SolveFailure, SolverConfig, DEFAULT_BLOCKED_GLYPH};

/// Fill a crossword structure with words from a word list.
#[derive(Parser, Debug)]
#[command(name = "crossword", version, about)]
struct Cli {
    /// Structure file: one line per row, with blocked cells marked by the blocking glyph.
    structure: PathBuf,

    /// Word list with one word per line.
    words: PathBuf,

    /// Also write the filled grid to this file.
    output: Option<PathBuf>,

    /// Character that marks a blocked cell in the structure file.
    #[arg(long, default_value_t = DEFAULT_BLOCKED_GLYPH)]
    blocked: char,

    /// Give up searching after this many milliseconds.
    #[arg(long)]
    time_limit_ms: Option<u64>,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let crossword = Crossword::load(&cli.structure, cli.blocked)
        .with_context(|| format!("loading structure {}", cli.structure.display()))?;
    let dictionary = Dictionary::load(&cli.words)
        .with_context(|| format!("loading word list {}", cli.words.display()))?;

    let config = SolverConfig { time_limit: cli.time_limit_ms.map(Duration::from_millis) };

    match CrosswordSolver::with_config(&crossword, &dictionary, config).solve() {
        Ok(solution) => {
            let display_grid = crossword.render(&solution.assignment, &dictionary);
            println!("{}", display_grid);

            if let Some(output) = &cli.output {
                fs::write(output, display_grid + "\n")
                    .with_context(|| format!("writing {}", output.display()))?;
                log::info!("Wrote fill to {}", output.display());
            }

            log::info!("{:?}", solution.statistics);
            Ok(ExitCode::SUCCESS)
        }
        Err(SolveFailure::NoSolution) => {
            println!("No solution.");
            Ok(ExitCode::SUCCESS)
        }
        Err(SolveFailure::TimedOut) => {
            println!("No solution found within the time limit.");
            Ok(ExitCode::FAILURE)
        }
    }
}
