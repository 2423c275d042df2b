use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_points::api::{build_router, state::AppState};
use league_points::calculate::derive_ranked;
use league_points::config::AppConfig;
use league_points::models::{Group, TeamRecord};
use league_points::results::{apply_match_result, MatchEntry};
use league_points::storage::{
    export_file_name, read_teams_file, write_group_export, write_teams_file, StorageConfig,
};
use league_points::store::{CounterUpdate, Store};

#[derive(Parser)]
#[command(name = "league-points")]
#[command(about = "Esports league group standings with match entry and CSV import/export")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error; overrides config)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the ranked table of a CSV file
    Rank {
        /// Team table CSV
        file: PathBuf,
    },

    /// Apply one match to a CSV file's teams
    Apply {
        /// Team table CSV
        file: PathBuf,

        /// Match entry as TEAM=PLACEMENT:ROUNDS (repeatable)
        #[arg(long = "entry", required = true)]
        entries: Vec<String>,

        /// Output path (defaults to rewriting the input)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Overwrite one team's counters in a CSV file
    Edit {
        /// Team table CSV
        file: PathBuf,

        #[arg(long)]
        team: String,

        #[arg(long)]
        matches: u32,

        #[arg(long)]
        wins: u32,

        #[arg(long)]
        losses: u32,

        #[arg(long)]
        rounds: u32,

        /// Output path (defaults to rewriting the input)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write the default groups as CSV exports
    Seed {
        /// Output directory (defaults to <data-dir>/exports)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Loading config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::debug!("Starting league-points v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState::new(config);
            spawn_session_pruner(state.clone());

            let app = build_router(state);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Rank { file } => {
            let teams = read_teams_file(&file)?;
            print_table(&teams);
        }
        Commands::Apply { file, entries, out } => {
            let entries = entries
                .iter()
                .map(String::as_str)
                .map(parse_entry)
                .collect::<Result<Vec<_>>>()?;

            let mut store = load_single_group(&file)?;
            let group = group_label(&file);
            let summary = apply_match_result(&mut store, &group, entries)?;

            for team in &summary.skipped {
                eprintln!("Skipped unknown team: {}", team);
            }
            let teams = &store.require_group(&group)?.teams;
            write_teams_file(out.as_deref().unwrap_or(&file), teams)?;
            print_table(teams);
        }
        Commands::Edit {
            file,
            team,
            matches,
            wins,
            losses,
            rounds,
            out,
        } => {
            let mut store = load_single_group(&file)?;
            let group = group_label(&file);
            store.update_team_counters(
                &group,
                &team,
                CounterUpdate {
                    matches,
                    wins,
                    losses,
                    rounds_won: rounds,
                },
            )?;

            let teams = &store.require_group(&group)?.teams;
            write_teams_file(out.as_deref().unwrap_or(&file), teams)?;
            print_table(teams);
        }
        Commands::Seed { out_dir } => {
            let store = Store::new();
            let storage = StorageConfig::new(config.data_dir.clone());
            for group in store.groups() {
                let path = match &out_dir {
                    Some(dir) => {
                        let path = dir.join(export_file_name(&group.name));
                        write_teams_file(&path, &group.teams)?;
                        path
                    }
                    None => write_group_export(&storage, &store, &group.name)?,
                };
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// Periodically drop sessions idle past their TTL.
fn spawn_session_pruner(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let pruned = state.sessions.prune(chrono::Utc::now()).await;
            if pruned > 0 {
                tracing::info!("Pruned {} idle sessions", pruned);
            }
        }
    });
}

/// Group label used when a single CSV file is loaded as a store.
fn group_label(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "Group".to_string())
}

fn load_single_group(file: &Path) -> Result<Store> {
    let teams = read_teams_file(file)?;
    Ok(Store::from_groups(vec![Group::new(group_label(file), teams)]))
}

/// Parse `TEAM=PLACEMENT:ROUNDS`. Team names may contain `=`.
fn parse_entry(raw: &str) -> Result<MatchEntry> {
    let (team, scores) = raw
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("Invalid entry {:?}, expected TEAM=PLACEMENT:ROUNDS", raw))?;
    let (placement, rounds) = scores.split_once(':').unwrap_or((scores, "0"));

    let team = team.trim();
    if team.is_empty() {
        return Err(anyhow!("Invalid entry {:?}, team name is empty", raw));
    }
    let placement: u32 = placement
        .trim()
        .parse()
        .with_context(|| format!("Invalid placement in {:?}", raw))?;
    let rounds: u32 = rounds
        .trim()
        .parse()
        .with_context(|| format!("Invalid rounds in {:?}", raw))?;

    Ok(MatchEntry::new(team, placement, rounds))
}

fn print_table(teams: &[TeamRecord]) {
    println!(
        "{:>4}  {:<24} {:>7} {:>4} {:>6} {:>6} {:>5} {:>5} {:>5}",
        "Rank", "Team", "Matches", "Wins", "Losses", "Rounds", "PD", "PDT", "Total"
    );
    for row in derive_ranked(teams) {
        let badge = row.badge().map(|b| format!(" ({})", b)).unwrap_or_default();
        println!(
            "{:>4}  {:<24} {:>7} {:>4} {:>6} {:>6} {:>5} {:>5} {:>5}{}",
            row.rank,
            row.team,
            row.matches_played,
            row.wins,
            row.losses,
            row.rounds_won,
            row.pd,
            row.pdt,
            row.total,
            badge
        );
    }
}
