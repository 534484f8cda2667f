//! dedupq CLI — graph walks and line dedup from the shell.

use clap::{Parser, Subcommand};
use dedupq::config::Config;
use dedupq::graph::{Graph, walk};
use dedupq::lines::{self, KeySpec};
use dedupq::telemetry::{TelemetryConfig, init_telemetry};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dedupq", about = "Deduplicating work-list tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Visit every node reachable from the roots of a TOML graph
    Walk {
        /// Graph document with a [nodes] table
        graph: PathBuf,
        /// Node to start from (repeatable)
        #[arg(long = "root", required = true)]
        roots: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the first line seen for each key
    Unique {
        /// Input file; stdin when omitted
        file: Option<PathBuf>,
        /// 1-based field to key on; whole line when omitted
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        field: Option<u64>,
        /// Field delimiter
        #[arg(long, default_value_t = '\t')]
        delimiter: char,
        /// Print the result as a JSON array
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let _guard = init_telemetry(TelemetryConfig::from(&config))?;

    match cli.command {
        Command::Walk { graph, roots, json } => cmd_walk(graph, roots, json),
        Command::Unique {
            file,
            field,
            delimiter,
            json,
        } => cmd_unique(file, field, delimiter, json),
    }
}

fn cmd_walk(path: PathBuf, roots: Vec<String>, json: bool) -> anyhow::Result<()> {
    let graph = Graph::load(&path)?;
    tracing::info!(path = %path.display(), nodes = graph.len(), "graph loaded");

    let walk = walk(&graph, roots);

    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &walk)?;
        writeln!(out)?;
        return Ok(());
    }

    for node in &walk.visited {
        writeln!(out, "{node}")?;
    }
    if !walk.missing.is_empty() {
        eprintln!("missing: {}", walk.missing.join(", "));
    }
    Ok(())
}

fn cmd_unique(
    file: Option<PathBuf>,
    field: Option<u64>,
    delimiter: char,
    json: bool,
) -> anyhow::Result<()> {
    let reader: Box<dyn BufRead> = match file {
        Some(path) => Box::new(BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(std::io::stdin().lock()),
    };
    let input = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
    let total = input.len();

    let spec = KeySpec {
        field: field.map(usize::try_from).transpose()?,
        delimiter,
    };
    let unique = lines::unique_lines(input, spec);
    tracing::info!(total, kept = unique.len(), "lines deduplicated");

    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &unique)?;
        writeln!(out)?;
        return Ok(());
    }

    for line in &unique {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
