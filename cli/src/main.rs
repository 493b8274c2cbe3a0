//! Ideograph CLI: runs the ideology pipeline steps over a data directory

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use ideograph::identity::Namespace;
use ideograph::sources::convert_yaml_to_json;
use ideograph::{Pipeline, PipelineConfig, ProjectionMethod, ResolutionReport};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ideograph", version, about = "Legislator ideology from donation networks")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "IDEOGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Legislative session (overrides the config file)
    #[arg(long, global = true)]
    congress: Option<u32>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Link roll-call members to registry and LittleSis ids
    MapIds,
    /// Sum donations per politician from the relationship graph
    Donations,
    /// Write the dense index lookups, edge list and feature matrix
    BuildMatrix {
        /// Divide each donor row by its sum
        #[arg(long)]
        normalize_rows: bool,

        /// First dense index (0 or 1)
        #[arg(long)]
        index_base: Option<usize>,
    },
    /// Assemble per-politician NVD files into one distance matrix
    Distances {
        /// Directory of `<politician>.csv` NVD files
        #[arg(long)]
        nvd_dir: Option<PathBuf>,
    },
    /// Project the distance matrix and store embeddings on the entity list
    Project {
        /// Methods to run, e.g. PCA-2 (repeatable)
        #[arg(long = "method")]
        methods: Vec<ProjectionMethod>,
    },
    /// Run every step in order
    Run,
    /// Convert a YAML file to JSON
    YamlToJson { input: PathBuf, output: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(congress) = cli.congress {
        config.congress = congress;
    }
    debug!("Using data directory {} for congress {}", config.data_dir.display(), config.congress);
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::YamlToJson { input, output } => {
            convert_yaml_to_json(&input, &output)?;
        }
        Commands::MapIds => {
            let resolution = Pipeline::new(config)?.map_ids()?;
            print_report(&resolution.report, &cli.format)?;
        }
        Commands::Donations => {
            let table = Pipeline::new(config)?.donations()?;
            let donors: usize = table.iter().map(|(_, d)| d.len()).sum();
            println!("{} politicians, {} donor links", table.len(), donors);
        }
        Commands::BuildMatrix { normalize_rows, index_base } => {
            config.normalize_rows |= normalize_rows;
            if let Some(base) = index_base {
                config.index_base = base;
            }
            let matrix = Pipeline::new(config)?.build_matrix()?;
            println!(
                "{} dense indices, {} edges, {} x {} feature matrix",
                matrix.mapping.len(),
                matrix.edges.len(),
                matrix.features.donors().len(),
                matrix.features.politicians().len()
            );
        }
        Commands::Distances { nvd_dir } => {
            if nvd_dir.is_some() {
                config.nvd_dir = nvd_dir;
            }
            let distances = Pipeline::new(config)?.distances()?;
            println!("{0} x {0} distance matrix", distances.len());
        }
        Commands::Project { methods } => {
            if !methods.is_empty() {
                config.projections = methods;
            }
            let names: Vec<String> = config.projections.iter().map(|m| m.to_string()).collect();
            let entities = Pipeline::new(config)?.project()?;
            let embedded = entities.iter().filter(|e| !e.embeddings.is_empty()).count();
            println!("{} entities embedded with {}", embedded, names.join(", "));
        }
        Commands::Run => {
            let summary = Pipeline::new(config)?.run()?;
            print_report(&summary.resolution.report, &cli.format)?;
            match summary.projected {
                Some(entities) => println!("Projected {} entities", entities.len()),
                None => println!("Feature matrix written; run NVD, then `ideograph distances` and `ideograph project`"),
            }
        }
    }
    Ok(())
}

fn print_report(report: &ResolutionReport, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["namespace", "before mapping", "after icpsr", "after all"]);
            for namespace in Namespace::ALL {
                table.add_row(vec![
                    namespace.to_string(),
                    report.before_mapping.get(namespace).to_string(),
                    report.after_icpsr.get(namespace).to_string(),
                    report.after_all.get(namespace).to_string(),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}
