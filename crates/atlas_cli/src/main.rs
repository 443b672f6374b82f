//! `atlas` command-line entry point.
//!
//! # Responsibility
//! - Map subcommands onto `atlas_core` APIs.
//! - Keep stdout machine-readable (JSON) and send diagnostics to stderr.

use std::path::{Path, PathBuf};

use atlas_core::{
    build_atlas_graph, ingest_org, init_logging, load_snapshot, parse_ownership, write_snapshot,
    AtlasConfig, DirectoryContentSource, OwnershipCatalog, OwnershipInput, OwnershipStatus,
    SqliteOwnershipCatalog,
};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "atlas")]
#[command(version)]
#[command(about = "Resolve repository ownership and project it into an atlas graph")]
struct Cli {
    /// JSON config file; missing keys fall back to defaults
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve ownership for one README / CODEOWNERS pair and print the decision
    Resolve(ResolveArgs),
    /// Ingest every checkout under <root>/<org> and write a snapshot
    Ingest(IngestArgs),
    /// Project a snapshot into the atlas graph
    Graph(GraphArgs),
    /// Summarize the latest run recorded in a catalog
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct ResolveArgs {
    #[arg(long, value_name = "FILE")]
    readme: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    codeowners: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct IngestArgs {
    /// Directory holding <org>/<repo> checkouts
    #[arg(long, value_name = "DIR")]
    root: PathBuf,
    #[arg(long)]
    org: String,
    /// Snapshot output path
    #[arg(long, value_name = "FILE")]
    out: PathBuf,
    /// SQLite catalog to record this run in
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,
    /// Overrides `max_repos` from the config file
    #[arg(long)]
    max_repos: Option<usize>,
}

#[derive(Args, Debug)]
struct GraphArgs {
    #[arg(long, value_name = "FILE")]
    snapshot: PathBuf,
    /// Write the graph here instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[arg(long, value_name = "FILE")]
    catalog: PathBuf,
    /// Only list resolutions with this status
    #[arg(long, value_parser = parse_status)]
    status: Option<OwnershipStatus>,
}

fn main() {
    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Resolve(args) => run_resolve(args, &config),
        Commands::Ingest(args) => run_ingest(args, config),
        Commands::Graph(args) => run_graph(args),
        Commands::Report(args) => run_report(args),
    });

    if let Err(err) = result {
        eprintln!("atlas: {err}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<AtlasConfig, String> {
    let mut config = AtlasConfig::load(cli.config.as_deref()).map_err(|err| err.to_string())?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.validate().map_err(|err| err.to_string())?;

    if let Some(log_dir) = &cli.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }
    Ok(config)
}

fn run_resolve(args: ResolveArgs, config: &AtlasConfig) -> Result<(), String> {
    let readme_text = read_optional(args.readme.as_deref())?;
    let codeowners_text = read_optional(args.codeowners.as_deref())?;
    let readme_path = args
        .readme
        .as_deref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| config.readme_path.clone());
    let codeowners_path = args
        .codeowners
        .as_deref()
        .map(|path| path.display().to_string());

    let result = parse_ownership(&OwnershipInput {
        readme_text: readme_text.as_deref(),
        readme_path: Some(readme_path.as_str()),
        codeowners_text: codeowners_text.as_deref(),
        codeowners_path: codeowners_path.as_deref(),
    });
    print_json(&result)
}

fn run_ingest(args: IngestArgs, mut config: AtlasConfig) -> Result<(), String> {
    if args.max_repos.is_some() {
        config.max_repos = args.max_repos;
        config.validate().map_err(|err| err.to_string())?;
    }

    let source = DirectoryContentSource::new(&args.root);
    let ingested = ingest_org(&source, &args.org, &config).map_err(|err| err.to_string())?;
    let profiles: Vec<_> = ingested.iter().map(|repo| repo.profile.clone()).collect();
    write_snapshot(&args.out, &profiles).map_err(|err| err.to_string())?;

    let run_id = match &args.catalog {
        Some(path) => {
            let mut conn = atlas_core::db::open_db(path).map_err(|err| err.to_string())?;
            let mut catalog = SqliteOwnershipCatalog::new(&mut conn);
            let run_id = catalog
                .record_run(&args.org, &ingested)
                .map_err(|err| err.to_string())?;
            Some(run_id.to_string())
        }
        None => None,
    };

    info!(
        "event=cli_ingest module=cli status=ok org={} repos={}",
        args.org,
        profiles.len()
    );
    print_json(&json!({
        "org": args.org,
        "repos": profiles.len(),
        "snapshot": args.out.display().to_string(),
        "runId": run_id,
    }))
}

fn run_graph(args: GraphArgs) -> Result<(), String> {
    let profiles = load_snapshot(&args.snapshot).map_err(|err| err.to_string())?;
    let graph = build_atlas_graph(&profiles);

    match args.out {
        Some(path) => {
            let body = serde_json::to_string_pretty(&graph).map_err(|err| err.to_string())?;
            std::fs::write(&path, body + "\n")
                .map_err(|err| format!("failed to write `{}`: {err}", path.display()))
        }
        None => print_json(&graph),
    }
}

fn run_report(args: ReportArgs) -> Result<(), String> {
    let mut conn = atlas_core::db::open_db(&args.catalog).map_err(|err| err.to_string())?;
    let catalog = SqliteOwnershipCatalog::new(&mut conn);
    let Some(run) = catalog.latest_run().map_err(|err| err.to_string())? else {
        return Err(format!("no runs recorded in `{}`", args.catalog.display()));
    };

    let counts = catalog
        .status_counts(run.id)
        .map_err(|err| err.to_string())?;
    let records = catalog
        .list_resolutions(run.id, args.status)
        .map_err(|err| err.to_string())?;

    let repos: Vec<_> = records
        .iter()
        .map(|record| {
            json!({
                "repo": record.full_name,
                "status": record.status,
                "ownerKind": record.owner_kind,
                "owner": record.owner_display,
                "notes": record.ownership.resolved.notes,
            })
        })
        .collect();
    let counts: serde_json::Map<String, serde_json::Value> = counts
        .into_iter()
        .map(|(status, total)| (status.to_string(), json!(total)))
        .collect();

    print_json(&json!({
        "runId": run.id.to_string(),
        "org": run.org,
        "startedAt": run.started_at,
        "repoCount": run.repo_count,
        "statusCounts": counts,
        "repos": repos,
    }))
}

fn parse_status(value: &str) -> Result<OwnershipStatus, String> {
    value.parse()
}

fn read_optional(path: Option<&Path>) -> Result<Option<String>, String> {
    path.map(|path| {
        std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read `{}`: {err}", path.display()))
    })
    .transpose()
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    println!("{text}");
    Ok(())
}
