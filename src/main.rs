use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use jive::app::App;
use jive::resources::SAMPLE_JSON;
use jive::{diff, logging, ui};

/// A modal JSON/JSONL editor for the terminal
#[derive(Parser, Debug)]
#[command(name = "jive")]
#[command(about = "A modal JSON/JSONL editor with structure-aware diff", long_about = None)]
#[command(version)]
struct Args {
    /// JSON or JSONL file to open (.jsonl switches to record mode)
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Open in read-only mode
    #[arg(short = 'R', long)]
    read_only: bool,

    /// Compare FILE against this file and print the diff instead of editing
    #[arg(long, value_name = "OTHER")]
    diff: Option<String>,

    /// Keep object key order when diffing (default sorts keys first)
    #[arg(long)]
    no_normalize: bool,

    /// Path to log file for diagnostics
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn is_jsonl(path: &str) -> bool {
    path.to_lowercase().ends_with(".jsonl")
}

fn run_diff(args: &Args, other: &str) -> Result<()> {
    let left_path = args
        .file
        .as_deref()
        .context("--diff needs a FILE to compare against")?;
    let left = fs::read_to_string(left_path)
        .with_context(|| format!("cannot read {left_path}"))?;
    let right =
        fs::read_to_string(other).with_context(|| format!("cannot read {other}"))?;
    let result = diff::compute(&left, &right, !args.no_normalize, is_jsonl(left_path));
    ui::print_diff(&result);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(log_file) = &args.log_file {
        logging::init(log_file)?;
    }

    if let Some(other) = &args.diff {
        return run_diff(&args, other);
    }

    let jsonl = args.file.as_deref().is_some_and(is_jsonl);
    let (initial_content, file_path) = match &args.file {
        Some(file) => {
            let path = Path::new(file);
            let content = if path.exists() {
                fs::read_to_string(path).with_context(|| format!("cannot read {file}"))?
            } else if jsonl {
                // New file: an empty record list, or an empty object.
                String::new()
            } else {
                "{}".to_string()
            };
            (content, Some(PathBuf::from(file)))
        }
        None => (SAMPLE_JSON.to_string(), None),
    };

    let mut app = App::new(&initial_content, file_path, args.read_only, jsonl);
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
