use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use pubtools_core::config_file::{self, ConfigFile, PathsConfig};
use pubtools_core::{
    HeuristicsBuilder, Idf, MemoryPageStore, Pages, Pass1, Pass1Output, Pass2, Pass2Output, PreProcessor,
    ProgressEvent, Publication, RegistryEntry, Result1,
};
use pubtools_reporting::{Pass2Report, export_link_lists};

mod output;

use output::ColorMode;

/// Find bioinformatics tools in publications and match them against bio.tools
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file to use instead of the platform and ./.pubtools.toml cascade
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Args, Debug)]
struct Inputs {
    /// Publications JSON
    #[arg(long)]
    publications: Option<PathBuf>,

    /// IDF table (term, count, idf), tab-separated
    #[arg(long)]
    idf: Option<PathBuf>,

    /// bio.tools JSON export
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Page store JSON snapshot
    #[arg(long)]
    pages: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract tool name suggestions from publications
    Pass1 {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Refine Pass 1 results and compare them with bio.tools
    Pass2 {
        #[command(flatten)]
        inputs: Inputs,

        /// Pass 1 results (default: pass1.json in the output directory)
        #[arg(long)]
        pass1: Option<PathBuf>,
    },

    /// Run Pass 1 and Pass 2 back to back
    Run {
        #[command(flatten)]
        inputs: Inputs,
    },
}

/// Input paths with config file values filled in where no flag was given.
struct Resolved {
    publications: Option<PathBuf>,
    idf: Option<PathBuf>,
    registry: Option<PathBuf>,
    pages: Option<PathBuf>,
    output_dir: PathBuf,
}

impl Resolved {
    fn new(inputs: Inputs, paths: &PathsConfig) -> anyhow::Result<Self> {
        let or_config =
            |flag: Option<PathBuf>, configured: &Option<String>| flag.or_else(|| configured.as_ref().map(PathBuf::from));
        let output_dir = or_config(inputs.output, &paths.output_dir).unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self {
            publications: or_config(inputs.publications, &paths.publications),
            idf: or_config(inputs.idf, &paths.idf),
            registry: or_config(inputs.registry, &paths.registry),
            pages: or_config(inputs.pages, &paths.pages),
            output_dir,
        })
    }

    fn publications(&self) -> anyhow::Result<&Path> {
        required(&self.publications, "publications")
    }

    fn registry(&self) -> anyhow::Result<&Path> {
        required(&self.registry, "registry")
    }

    fn idf(&self) -> anyhow::Result<Idf> {
        match &self.idf {
            Some(path) => Idf::load(path).with_context(|| format!("Failed to load IDF table {}", path.display())),
            None => {
                tracing::warn!("no IDF table given, every term weighs the same");
                Ok(Idf::default())
            }
        }
    }

    fn pages(&self) -> anyhow::Result<MemoryPageStore> {
        match &self.pages {
            Some(path) => {
                MemoryPageStore::load(path).with_context(|| format!("Failed to load page store {}", path.display()))
            }
            None => {
                tracing::warn!("no page store given, every link will count as broken");
                Ok(MemoryPageStore::new())
            }
        }
    }
}

fn required<'a>(path: &'a Option<PathBuf>, what: &str) -> anyhow::Result<&'a Path> {
    let Some(path) = path.as_deref() else {
        anyhow::bail!("No {what} file given: pass --{what} or set paths.{what} in the config");
    };
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(path)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config: ConfigFile = match &cli.config {
        Some(path) => config_file::load_required(path)?,
        None => config_file::load_config(),
    };
    let level = cli
        .log_level
        .clone()
        .or_else(|| config.logging.as_ref().and_then(|l| l.level.clone()))
        .unwrap_or_else(|| "warn".to_string());
    init_logging(&level);

    let color = ColorMode(!cli.no_color);
    let paths = config.paths.clone().unwrap_or_default();
    let heuristics = HeuristicsBuilder::from_config(&config).build();
    let pp = PreProcessor::new();
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Pass1 { inputs } => {
            let resolved = Resolved::new(inputs, &paths)?;
            let idf = resolved.idf()?;
            let pass1 = run_pass1(&resolved, &Pass1::new(&pp, &idf, &heuristics))?;
            output::print_pass1_summary(&mut stdout, &pass1, heuristics.score2().score_min, color)?;
            output::print_written(&mut stdout, &resolved.output_dir, &["pass1.json", "web.txt", "doc.txt"], color)?;
        }
        Command::Pass2 { inputs, pass1 } => {
            let resolved = Resolved::new(inputs, &paths)?;
            let pass1_path = pass1.unwrap_or_else(|| resolved.output_dir.join("pass1.json"));
            let results = Result1::load_all(&pass1_path)
                .with_context(|| format!("Failed to load Pass 1 results {}", pass1_path.display()))?;
            tracing::info!(results = results.len(), path = %pass1_path.display(), "loaded pass1 results");
            let idf = resolved.idf()?;
            let entries = RegistryEntry::load_all(resolved.registry()?)?;
            let store = resolved.pages()?;
            let pass2 = run_pass2(&resolved, &Pass2::new(&pp, &idf, &heuristics, &entries), results, &entries, &store)?;
            output::print_pass2_summary(&mut stdout, &pass2, heuristics.score2(), color)?;
            output::print_written(&mut stdout, &resolved.output_dir, &["results.csv", "diff.csv", "new.json"], color)?;
        }
        Command::Run { inputs } => {
            let resolved = Resolved::new(inputs, &paths)?;
            let idf = resolved.idf()?;
            let entries = RegistryEntry::load_all(resolved.registry()?)?;
            let store = resolved.pages()?;

            let pass1 = run_pass1(&resolved, &Pass1::new(&pp, &idf, &heuristics))?;
            output::print_pass1_summary(&mut stdout, &pass1, heuristics.score2().score_min, color)?;
            writeln!(stdout)?;

            let pass2 = run_pass2(
                &resolved,
                &Pass2::new(&pp, &idf, &heuristics, &entries),
                pass1.results,
                &entries,
                &store,
            )?;
            output::print_pass2_summary(&mut stdout, &pass2, heuristics.score2(), color)?;
            output::print_written(
                &mut stdout,
                &resolved.output_dir,
                &["pass1.json", "web.txt", "doc.txt", "results.csv", "diff.csv", "new.json"],
                color,
            )?;
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn progress_bar(message: &'static str) -> anyhow::Result<ProgressBar> {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} [{bar:40.green/dim}] {pos}/{len} (eta {eta})")?
            .progress_chars("=> "),
    );
    bar.set_message(message);
    Ok(bar)
}

/// Feed pass progress events into `bar`.
fn track(bar: &ProgressBar) -> impl Fn(ProgressEvent) + '_ {
    move |event| {
        let (message, index, total) = match event {
            ProgressEvent::Publication { index, total } => ("Scoring publications", index, total),
            ProgressEvent::Result { index, total } => ("Refining results", index, total),
            ProgressEvent::Diffing { index, total } => ("Comparing with bio.tools", index, total),
        };
        if bar.length() != Some(total as u64) {
            bar.set_length(total as u64);
            bar.set_message(message);
        }
        bar.set_position(index as u64 + 1);
    }
}

fn run_pass1(resolved: &Resolved, pass1: &Pass1<'_, PreProcessor>) -> anyhow::Result<Pass1Output> {
    let publications = Publication::load_all(resolved.publications()?)?;
    tracing::info!(publications = publications.len(), "loaded publications");

    let bar = progress_bar("Scoring publications")?;
    let output = pass1.run(&publications, track(&bar));
    bar.finish_and_clear();

    output.save_results(&resolved.output_dir.join("pass1.json"))?;
    export_link_lists(&output, &resolved.output_dir)?;
    Ok(output)
}

fn run_pass2(
    resolved: &Resolved,
    pass2: &Pass2<'_, PreProcessor>,
    results: Vec<Result1>,
    entries: &[RegistryEntry],
    store: &MemoryPageStore,
) -> anyhow::Result<Pass2Output> {
    let pages = Pages::new(store);

    let bar = progress_bar("Refining results")?;
    let output = pass2.run(results, pages, track(&bar));
    bar.finish_and_clear();

    Pass2Report::new(&output, entries, pages).write(&resolved.output_dir)?;
    output.save_new_tools(&resolved.output_dir.join("new.json"))?;
    Ok(output)
}
