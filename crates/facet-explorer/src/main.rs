//! facet-explorer: interactive facet selection over a term taxonomy.
//!
//! ```text
//! facet-explorer --terms terms.xml --explorer explorer.xml explore
//! facet-explorer --terms terms.xml --explorer explorer.xml evaluate --devices devices.csv --shuffle
//! facet-explorer --terms terms.xml --explorer explorer.xml show --id 1003
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use facet_explorer::{
    export_records, load_devices, load_taxonomy, render_category, render_tree, shuffle_devices,
    write_json, ConsoleSource, EvaluationReport, Evaluator, ExplorerResult,
};
use facet_search::{CacheConfig, SearchConfig, SearchEngine, TraversalSession};
use facet_taxonomy::Taxonomy;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "facet-explorer")]
#[command(about = "Narrow down a term by walking a faceted taxonomy")]
#[command(version)]
struct Cli {
    /// Term database XML
    #[arg(long)]
    terms: PathBuf,

    /// Category explorer XML
    #[arg(long)]
    explorer: PathBuf,

    /// Number of results shown after a search
    #[arg(long, global = true, default_value_t = 5)]
    display_limit: usize,

    /// Entries in the aggregate cache (0 disables it)
    #[arg(long, global = true, default_value_t = 1024)]
    cache_capacity: usize,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one interactive session and print the top results
    Explore {
        /// Keep only active terms found under every selected category
        #[arg(long)]
        strict: bool,

        /// Print the selection and results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify each device of a CSV list and report where its term landed
    Evaluate {
        /// Device CSV (header, then id, description, expected term name)
        #[arg(long)]
        devices: PathBuf,

        /// Present devices in random order
        #[arg(long)]
        shuffle: bool,

        /// Seed for --shuffle
        #[arg(long, requires = "shuffle")]
        seed: Option<u64>,

        /// Write the per-device records to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Print the outcomes as JSON instead of the summary report
        #[arg(long)]
        json: bool,
    },

    /// Print the category tree, or one category with its terms
    Show {
        /// Category id
        #[arg(long)]
        id: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(io::stderr)
        .init();

    let taxonomy = load_taxonomy(&cli.terms, &cli.explorer).with_context(|| {
        format!(
            "loading taxonomy from {} and {}",
            cli.terms.display(),
            cli.explorer.display()
        )
    })?;

    match &cli.command {
        Commands::Explore { strict, json } => explore(&cli, &taxonomy, *strict, *json),
        Commands::Evaluate {
            devices,
            shuffle,
            seed,
            export,
            json,
        } => evaluate(
            &cli,
            &taxonomy,
            devices,
            EvaluateOptions {
                shuffle: *shuffle,
                seed: *seed,
                export: export.as_deref(),
                json: *json,
            },
        ),
        Commands::Show { id } => show(&taxonomy, id.as_deref()),
    }
}

fn search_config(cli: &Cli, strict: bool) -> SearchConfig {
    let mut builder = SearchConfig::builder()
        .with_strict(strict)
        .with_display_limit(cli.display_limit);
    if cli.cache_capacity > 0 {
        builder = builder.with_cache(CacheConfig {
            max_entries: cli.cache_capacity,
        });
    }
    builder.build()
}

fn explore(cli: &Cli, taxonomy: &Taxonomy, strict: bool, json: bool) -> Result<()> {
    let engine = SearchEngine::with_config(taxonomy, search_config(cli, strict));
    let mut console = ConsoleSource::new(io::stdin().lock(), io::stdout());

    let mut session = TraversalSession::new(taxonomy);
    session.run(&mut console)?;
    let result = engine.run(session.selection());

    if json {
        let terms: Vec<serde_json::Value> = result
            .top(cli.display_limit)
            .iter()
            .map(|ranked| {
                serde_json::json!({
                    "code": ranked.term.code,
                    "name": ranked.term.name,
                    "status": ranked.term.status,
                    "hits": ranked.hits,
                })
            })
            .collect();
        let output = serde_json::json!({
            "selection": session.record("console"),
            "mode": result.mode,
            "total": result.len(),
            "terms": terms,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", engine.summary(&result));
    }
    Ok(())
}

struct EvaluateOptions<'p> {
    shuffle: bool,
    seed: Option<u64>,
    export: Option<&'p Path>,
    json: bool,
}

fn evaluate(
    cli: &Cli,
    taxonomy: &Taxonomy,
    devices_path: &Path,
    options: EvaluateOptions<'_>,
) -> Result<()> {
    let mut devices = load_devices(devices_path)?;
    if devices.is_empty() {
        bail!("no devices in {}", devices_path.display());
    }
    if options.shuffle {
        shuffle_devices(&mut devices, options.seed);
    }

    let engine = SearchEngine::with_config(taxonomy, search_config(cli, false));
    let evaluator = Evaluator::new(&engine);
    let mut console = ConsoleSource::new(io::stdin().lock(), io::stdout());

    let outcomes = evaluator.evaluate_all(
        &devices,
        &mut console,
        |console, device| -> ExplorerResult<()> {
            console.announce(&format!("\nDevice: {}", device.description))?;
            Ok(())
        },
        |console, outcome| -> ExplorerResult<()> {
            console.announce(outcome.describe().trim_end())?;
            Ok(())
        },
    )?;

    let mut stdout = io::stdout();
    writeln!(stdout)?;
    if options.json {
        write_json(&mut stdout, &outcomes)?;
        writeln!(stdout)?;
    } else {
        let report = EvaluationReport::from_outcomes(&outcomes, cli.display_limit);
        write!(stdout, "{report}")?;
    }

    if let Some(path) = options.export {
        export_records(path, &outcomes)?;
        writeln!(stdout, "Records written to {}", path.display())?;
    }
    if let Some(cache) = engine.cache() {
        tracing::info!(hit_rate = cache.stats().hit_rate(), "aggregate cache");
    }
    Ok(())
}

fn show(taxonomy: &Taxonomy, id: Option<&str>) -> Result<()> {
    match id {
        Some(id) => {
            let Some(category) = taxonomy.category(id) else {
                bail!("no category with id {id}");
            };
            print!("{}", render_category(taxonomy, category));
        }
        None => {
            print!("{}", render_tree(taxonomy));
            for anomaly in taxonomy.anomalies() {
                println!("warning: {anomaly}");
            }
        }
    }
    Ok(())
}

