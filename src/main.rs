use std::fs;
use std::process::ExitCode;

use clap::Parser;
use instant::Duration;

use crossfill::{find_fill, render_grid, Crossword, SearchBudget, SolverConfig, Template};

/// Fill a crossword grid from a word list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grid template: '#' for blocks, '.' for empty cells, letters for fixed cells
    grid: String,

    /// Word list, one word per line (a trailing ";score" or ",score" column is ignored)
    #[arg(short, long)]
    words: String,

    /// Never use the same word twice
    #[arg(long)]
    distinct: bool,

    /// Also restrict partially filled slots to words matching their letters
    #[arg(long)]
    partial: bool,

    /// Give up after this many seconds
    #[arg(long)]
    max_seconds: Option<u64>,

    /// Give up after this many search states
    #[arg(long)]
    max_states: Option<u64>,

    /// Log search progress
    #[arg(long)]
    debug: bool,
}

fn load_dictionary(path: &str) -> Result<Vec<String>, std::io::Error> {
    Ok(fs::read_to_string(path)?
        .lines()
        .filter_map(|line| line.split(|c: char| c == ';' || c == ',').next())
        .map(|word| word.trim().to_string())
        .filter(|word| !word.is_empty())
        .collect())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    crossfill::log::init_logger(cli.debug);

    match try_main(&cli) {
        Ok(code) => code,
        Err(e) => {
            if let Some(crossword_err) = e.downcast_ref::<crossfill::CrosswordError>() {
                eprintln!("Error: {}", crossword_err.display_detailed());
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let template = Template::parse(&fs::read_to_string(&cli.grid)?)?;
    let dictionary = load_dictionary(&cli.words)?;
    log::info!("Loaded {} words from {}", dictionary.len(), cli.words);

    let crossword = Crossword::from_template(&template, &dictionary)?;
    log::info!("Grid has {} slots", crossword.variables().len());

    let config = SolverConfig {
        distinct_words: cli.distinct,
        constrain_partial_entries: cli.partial,
        budget: SearchBudget {
            max_duration: cli.max_seconds.map(Duration::from_secs),
            max_states: cli.max_states,
        },
    };

    match find_fill(&crossword, config) {
        Ok(result) => {
            println!("{}", render_grid(&crossword, &result.assignment));
            println!("{:?}", result.statistics);
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            eprintln!("{failure}");
            Ok(ExitCode::FAILURE)
        }
    }
}
