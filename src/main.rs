//! localsql CLI entry point.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use localsql::cli::{
    history_path, render_outcome, Args, OutputFormat, OutputFormatter, Repl, ReplInput,
};
use localsql::completion::completion_words;
use localsql::io::discover_files;
use localsql::load::LoadOptions;
use localsql::session::{Outcome, Session};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse_from_legacy(std::env::args());

    // Set up logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| args.log_level().into()),
        )
        .init();

    let files = collect_files(&args);
    tracing::info!("{} candidate files", files.len());

    let mut session = Session::new();
    let options = LoadOptions {
        json_normalize: args.json_normalize,
    };
    load_files(&mut session, &files, &options, &args);

    if session.registry().is_empty() && !args.silent {
        eprintln!("Warning: Supported files not found. Try -r, -d or --help");
    }

    // Execute query from -q flag
    if !args.is_interactive() {
        let query = args.query.as_deref().unwrap_or_default();
        let outcome = session.execute(query).await;
        let formatter = OutputFormatter::new(args.format);
        render_outcome(&outcome, &formatter, &mut io::stdout(), &mut io::stderr())?;
        return Ok(());
    }

    // Interactive REPL
    run_repl(&mut session).await
}

/// Explicit files, or the contents of the scan directory.
fn collect_files(args: &Args) -> Vec<PathBuf> {
    match args.scan_directory() {
        Some(dir) => discover_files(&dir, args.recursive),
        None => args.files.clone(),
    }
}

fn load_files(session: &mut Session, files: &[PathBuf], options: &LoadOptions, args: &Args) {
    for path in files {
        let progress = args.progress.then(|| spinner(&path.display().to_string()));

        let result = session.load_path(path, options);

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        match result {
            Ok(Some(report)) => {
                if !args.silent {
                    eprintln!(
                        "{}: table={}, columns={}, rows={}",
                        path.display(),
                        report.table,
                        report.columns,
                        report.rows
                    );
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("{} error: {}", path.display(), e),
        }
    }
}

fn spinner(file: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    }
    pb.set_message(format!("Loading {file}..."));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn run_repl(session: &mut Session) -> Result<()> {
    let mut repl = Repl::new(completion_words(session.registry()))
        .context("Failed to initialise terminal")?;
    if let Some(path) = history_path() {
        repl = repl.with_history(&path);
    }

    println!("localsql {}", env!("CARGO_PKG_VERSION"));
    println!("Type \\h for help, \\q to quit");
    println!();

    loop {
        match repl.read_input(session.mode().prompt())? {
            ReplInput::Exit => break,
            ReplInput::Interrupted => continue,
            ReplInput::Line(line) => {
                let outcome = session.execute(&line).await;
                if matches!(outcome, Outcome::Quit) {
                    break;
                }

                let formatter =
                    OutputFormatter::new(OutputFormat::Table).with_pretty(session.pretty_print());
                if let Err(e) =
                    render_outcome(&outcome, &formatter, &mut io::stdout(), &mut io::stderr())
                {
                    eprintln!("Error writing output: {e}");
                }
            }
        }
    }

    Ok(())
}
