// allyscope entry point.
//
// Startup sequence:
// 1. Parse command line
// 2. Initialize tracing (log to file, stdout is for reports)
// 3. Load config (copying defaults on first run)
// 4. Load team statistics
// 5. Build the pick session
// 6. Run the requested command

use allyscope_app::config::{self, Config};
use allyscope_app::loader::{self, LoadOptions};
use allyscope_app::report;
use allyscope_core::event::TOP_TEAMS_SHOWN;
use allyscope_core::picklist::export::{export_file_name, write_pick_list};
use allyscope_core::picklist::rank::{check_min_opr, RankParams, SortKey, StrengthFilter};
use allyscope_core::session::PickSession;
use allyscope_core::sim::histogram::{build_histogram, BIN_COUNT};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Alliance simulation and pick-list ranking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding config/ and defaults/.
    #[arg(global = true, long, default_value = ".")]
    base_dir: PathBuf,

    /// Team statistics CSV (overrides data.team_stats).
    #[arg(global = true, long)]
    stats: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the ranked pick list.
    Rank(RankArgs),
    /// Simulate an alliance of two teams.
    Simulate(SimulateArgs),
    /// Write the ranked pick list as CSV.
    Export(ExportArgs),
    /// Print event summary and top-ranked teams.
    Summary,
}

#[derive(Args, Debug, Clone)]
struct ViewArgs {
    /// pick_score | opr | consistency | auto | teleop | win_rate | rank
    #[arg(long)]
    sort: Option<SortKey>,

    /// auto | teleop | consistent
    #[arg(long)]
    strength: Option<StrengthFilter>,

    /// Minimum total OPR (inclusive, >= 0).
    #[arg(long, value_parser = parse_min_opr)]
    min_opr: Option<f64>,

    /// Your own team number.
    #[arg(long)]
    reference_team: Option<u32>,
}

#[derive(Args, Debug)]
struct RankArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Emit JSON instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    team1: u32,
    team2: u32,

    #[arg(long)]
    trials: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Output path; defaults to export.dir/pick_list_{EVENT}_{DATE}.csv.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse command line
    let cli = Cli::parse();

    // 2. Initialize tracing
    init_tracing(&cli.base_dir)?;
    info!("allyscope starting up");

    // 3. Load config
    let config = config::load_config(&cli.base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: event={}, {} trials per simulation",
        config.event.code, config.simulation.trials
    );

    // 4. Load team statistics
    let stats_path = match &cli.stats {
        Some(path) => path.clone(),
        None => resolve(&cli.base_dir, &config.data_paths.team_stats),
    };
    let teams = loader::load_team_stats(&stats_path, &LoadOptions::from(&config.estimation))
        .context("failed to load team statistics")?;
    info!("Loaded {} teams from {}", teams.len(), stats_path.display());

    // 5. Build the pick session
    let session = PickSession::new(teams);

    // 6. Run the requested command
    match cli.command {
        Commands::Rank(args) => {
            let session = configure_view(session, &config, &args.view)?;
            let view = session.view();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("{}", report::pick_list_table(&view));
            }
        }
        Commands::Simulate(args) => {
            let trials = args.trials.unwrap_or(config.simulation.trials);
            anyhow::ensure!(trials > 0, "--trials must be greater than 0");
            let mut rng = match args.seed.or(config.simulation.seed) {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };
            let projection = session
                .simulate_cooperative(args.team1, args.team2, trials, &mut rng)
                .await
                .context("cannot simulate alliance")?;
            let bins = build_histogram(&projection.simulation.samples, BIN_COUNT);
            if args.json {
                let out = serde_json::json!({ "projection": projection, "histogram": bins });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", report::simulation_report(&projection, &bins));
            }
        }
        Commands::Export(args) => {
            let session = configure_view(session, &config, &args.view)?;
            let out = match args.out {
                Some(path) => path,
                None => {
                    let dir = resolve(&cli.base_dir, &config.export.dir);
                    std::fs::create_dir_all(&dir)
                        .with_context(|| format!("failed to create {}", dir.display()))?;
                    dir.join(export_file_name(
                        &config.event.code,
                        chrono::Utc::now().date_naive(),
                    ))
                }
            };
            let view = session.view();
            let file = std::fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            write_pick_list(file, &view).context("failed to write pick list")?;
            info!("Exported {} teams to {}", view.len(), out.display());
            println!("Wrote {} teams to {}", view.len(), out.display());
        }
        Commands::Summary => {
            let summary = session.summary();
            let top = session.top_teams(TOP_TEAMS_SHOWN);
            println!("{}", report::summary_report(&config.event.code, &summary, &top));
        }
    }

    info!("allyscope finished");
    Ok(())
}

/// Merge config-file pick-list settings with command-line overrides.
fn configure_view(
    session: PickSession,
    config: &Config,
    args: &ViewArgs,
) -> anyhow::Result<PickSession> {
    let file = config.pick_list.rank_params();
    let params = RankParams {
        sort: args.sort.unwrap_or(file.sort),
        strength: args.strength.or(file.strength),
        min_opr: args.min_opr.or(file.min_opr),
    };
    let reference = args.reference_team.or(config.pick_list.reference_team);
    if reference.is_none() {
        warn!("no reference team set; complementary bonuses disabled");
    }
    let session = session
        .with_reference_team(reference)
        .context("reference team is not in the loaded statistics")?
        .with_params(params);
    let active = session.params();
    info!(
        "View: sort={}, strength={}, min_opr={:?}",
        active.sort,
        active.strength.map_or("none", |s| s.name()),
        active.min_opr
    );
    Ok(session)
}

fn parse_min_opr(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("invalid number `{s}`: {e}"))?;
    check_min_opr(value).map_err(|e| e.to_string())
}

/// Resolve a config-relative path against the base directory.
fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Initialize tracing to log to a file (stdout carries the reports).
fn init_tracing(base_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("allyscope.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("allyscope=info,allyscope_core=info,allyscope_app=info,warn")
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
