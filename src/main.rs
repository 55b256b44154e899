//! Command-line front end.
//!
//! Loads configuration, wires a [`JsonStorage`]-backed worker into the
//! deterministic [`Runtime`], then reads one command per line from stdin and
//! prints the rendered window after each.
//!
//! ```text
//! $ ngo-discovery --catalog catalog.json --page-size 2
//! > category healthcare
//! > radius 5
//! > more
//! ```
//!
//! Unless `--step` is given the runtime settles after every command, so
//! debounce timers, page loads and storage round trips complete immediately.
//! With `--step` they only run on `wait <ms>` or `settle`.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use ngo_discovery::app::Action;
use ngo_discovery::runtime::{Command, Runtime};
use ngo_discovery::storage::JsonStorage;
use ngo_discovery::ui::render_text;
use ngo_discovery::worker::DiscoveryWorker;
use ngo_discovery::{initialize, observability, Config, Event, Result};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "ngo-discovery", version, about = "Browse and filter NGOs from a JSON catalog")]
struct Cli {
    /// Catalog JSON file (overrides `catalog_path`)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Favorites JSON file (overrides `favorites_path`)
    #[arg(long)]
    favorites: Option<PathBuf>,

    /// Records revealed per page (overrides `page_size`)
    #[arg(long)]
    page_size: Option<usize>,

    /// Tracing level (overrides `trace_level`)
    #[arg(long)]
    trace_level: Option<String>,

    /// Do not settle after each command; advance time with `wait`/`settle`
    #[arg(long)]
    step: bool,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(catalog) = &self.catalog {
            config.catalog_path = Some(catalog.clone());
        }
        if let Some(favorites) = &self.favorites {
            config.favorites_path = Some(favorites.clone());
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(level) = &self.trace_level {
            config.trace_level = Some(level.clone());
        }
        Ok(config.normalized())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config()?;
    observability::init_tracing(&config);

    let catalog_path = config.catalog_path();
    let favorites_path = config.favorites_path();
    tracing::info!(
        catalog = %catalog_path.display(),
        favorites = %favorites_path.display(),
        step = cli.step,
        "starting ngo-discovery"
    );

    let storage = JsonStorage::new(catalog_path, favorites_path)?;
    let mut runtime = Runtime::new(initialize(&config), DiscoveryWorker::new(storage))
        .with_worker_latency(config.worker_latency_ms);

    runtime.dispatch(Event::Refresh)?;
    if !cli.step {
        runtime.settle()?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_frame(&mut out, &mut runtime)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if matches!(trimmed, "quit" | "exit" | "q") {
            break;
        }

        let command = match trimmed.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        if let Err(e) = runtime.run_command(command) {
            tracing::warn!(error = %e, "command rejected");
            writeln!(out, "{e}")?;
            continue;
        }
        if !cli.step {
            runtime.settle()?;
        }
        print_frame(&mut out, &mut runtime)?;
    }

    Ok(())
}

fn print_frame(out: &mut impl Write, runtime: &mut Runtime) -> Result<()> {
    for effect in runtime.take_effects() {
        match effect {
            Action::NavigateToDonation { organization_id, need } => match need {
                Some(need) => writeln!(out, "-> donate to {organization_id}: {}", need.item)?,
                None => writeln!(out, "-> donate to {organization_id}")?,
            },
            Action::OpenContact { email, subject, .. } => {
                let to = email.as_deref().unwrap_or("(no email on file)");
                writeln!(out, "-> mailto {to} \"{subject}\"")?;
            }
            Action::Surface(signal) => writeln!(out, "!! {}", signal.message())?,
            _ => {}
        }
    }

    if runtime.pending_jobs() > 0 {
        writeln!(out, "(t={}ms, {} pending)", runtime.now_ms(), runtime.pending_jobs())?;
    }
    write!(out, "{}", render_text(&runtime.state().compute_viewmodel()))?;
    out.flush()?;
    Ok(())
}
