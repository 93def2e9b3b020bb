//! CLI for the plog priority log buffer.
//!
//! Provides commands for draining prioritised log lines through a bounded
//! store and for benchmarking the concurrent write path.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use plog::{Logger, Priority, PriorityRingStore, StoreConfig};
use tracing_subscriber::EnvFilter;

/// plog — Priority-aware, memory-bounded log buffer CLI.
#[derive(Parser)]
#[command(name = "plog", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Buffer log lines from stdin, then print them in drain order.
    ///
    /// Lines of the form `<priority>: <text>` are written at that priority;
    /// any other line is written at the default priority.
    Drain {
        /// Entries retained per priority.
        #[arg(long, default_value = "64")]
        capacity: usize,

        /// Priority for lines without a recognised prefix.
        #[arg(long = "default", default_value = "minor")]
        default_priority: Priority,

        /// JSON store configuration; overrides --capacity and --default.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format.
        #[arg(long, default_value = "csv")]
        format: OutputFormat,
    },

    /// Run a concurrent write-path benchmark.
    Bench {
        /// Number of writer threads.
        #[arg(long, default_value = "4")]
        writers: usize,

        /// Entries written by each thread.
        #[arg(long, default_value = "1000000")]
        entries: usize,

        /// Entries retained per priority.
        #[arg(long, default_value = "1024")]
        capacity: usize,

        /// Build each entry from this many session fragments (0 = direct writes).
        #[arg(long, default_value = "0")]
        fragments: usize,
    },
}

/// Output format for drained entries.
#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array of objects.
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Drain {
            capacity,
            default_priority,
            config,
            format,
        } => cmd_drain(capacity, default_priority, config.as_deref(), &format),
        Commands::Bench {
            writers,
            entries,
            capacity,
            fragments,
        } => cmd_bench(writers, entries, capacity, fragments),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Loads a store configuration from a JSON file.
fn load_config(path: &Path) -> Result<StoreConfig, Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read config '{}': {e}", path.display()))?;
    let config: StoreConfig = serde_json::from_str(&data)?;
    config.validate()?;
    Ok(config)
}

/// Splits a `<priority>: <text>` line.
///
/// Lines without a known priority prefix are returned whole at `default`.
fn parse_line(line: &str, default: Priority) -> (Priority, &str) {
    if let Some((prefix, rest)) = line.split_once(':')
        && let Ok(priority) = prefix.parse::<Priority>()
    {
        return (priority, rest.strip_prefix(' ').unwrap_or(rest));
    }
    (default, line)
}

/// Implements `plog drain`.
fn cmd_drain(
    capacity: usize,
    default_priority: Priority,
    config_path: Option<&Path>,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => StoreConfig::new(default_priority, capacity)?,
    };
    let logger = Logger::with_config(config)?;

    let mut lines = 0usize;
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let (priority, text) = parse_line(&line, config.default_priority);
        logger.print(priority, text)?;
        lines += 1;
    }

    let entries = logger.buffer().drain();
    tracing::info!(
        read = lines,
        retained = entries.len(),
        dropped = lines - entries.len(),
        "drained buffer"
    );

    match format {
        OutputFormat::Csv => {
            println!("priority,text");
            for entry in &entries {
                println!("{},{}", entry.priority, entry.text());
            }
        }
        OutputFormat::Json => {
            let json_entries: Vec<serde_json::Value> = entries
                .iter()
                .map(|entry| {
                    serde_json::json!({
                        "priority": entry.priority,
                        "text": entry.text(),
                    })
                })
                .collect();

            let output = serde_json::json!({
                "capacity": config.capacity,
                "read": lines,
                "count": entries.len(),
                "entries": json_entries,
            });

            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Implements `plog bench`.
#[allow(clippy::cast_precision_loss)] // Benchmark stats are fine with f64 precision
fn cmd_bench(
    writers: usize,
    entries: usize,
    capacity: usize,
    fragments: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    if writers == 0 {
        return Err("--writers must be at least 1".into());
    }

    println!("plog write-path benchmark");
    println!("  Writers: {writers}");
    println!("  Entries per writer: {entries}");
    println!("  Capacity: {capacity}");
    println!("  Fragments: {fragments}");
    println!();

    let logger = Logger::new(PriorityRingStore::new(Priority::Minor, capacity)?);

    let start = Instant::now();

    std::thread::scope(|scope| -> Result<(), Box<dyn std::error::Error>> {
        let handles: Vec<_> = (0..writers)
            .map(|w| {
                let logger = &logger;
                scope.spawn(move || -> plog::Result<()> {
                    let priority = Priority::ALL[w % Priority::COUNT];
                    for _ in 0..entries {
                        if fragments == 0 {
                            logger.print(priority, "worker finished job in 18ms")?;
                        } else {
                            let mut session = logger.session();
                            for _ in 0..fragments {
                                session.append("fragment ");
                            }
                            session.append_done(priority)?;
                        }
                    }
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            handle.join().map_err(|_| "writer thread panicked")??;
        }
        Ok(())
    })?;

    let elapsed = start.elapsed();
    let total_writes = writers * entries;
    let ns_per_write = elapsed.as_nanos() as f64 / total_writes.max(1) as f64;
    let writes_per_sec = total_writes as f64 / elapsed.as_secs_f64();
    let retained = logger.buffer().len();

    println!("Results:");
    println!("  Total writes: {total_writes}");
    println!("  Retained: {retained}");
    println!("  Elapsed: {elapsed:.3?}");
    println!("  Avg latency: {ns_per_write:.1} ns/write");
    println!("  Throughput: {writes_per_sec:.0} writes/sec");
    println!();

    Ok(())
}
