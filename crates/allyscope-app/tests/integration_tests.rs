// Integration tests for allyscope.
//
// These exercise the full path a command takes: config loading, team-stat
// import from fixture CSVs, session views, export and alliance simulation.

use std::fs;
use std::path::{Path, PathBuf};

use allyscope_app::config::{self, ConfigError, CONFIG_FILE};
use allyscope_app::loader::{load_team_stats, LoadOptions};
use allyscope_app::report;
use allyscope_core::event::TOP_TEAMS_SHOWN;
use allyscope_core::picklist::export::{pick_list_csv, EXPORT_HEADER};
use allyscope_core::picklist::rank::{RankParams, SortKey, StrengthFilter, Tier};
use allyscope_core::session::PickSession;
use allyscope_core::sim::histogram::{build_histogram, BIN_COUNT};
use allyscope_core::stats::StatsError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn fixture_session() -> PickSession {
    let path = Path::new(FIXTURES).join("team_stats.csv");
    let teams = load_team_stats(&path, &LoadOptions::default()).expect("fixture CSV should load");
    PickSession::new(teams)
}

fn numbers(session: &PickSession) -> Vec<u32> {
    session.view().iter().map(|t| t.stat.team_number).collect()
}

/// Fresh base directory holding a copy of the shipped defaults.
fn temp_base_dir(name: &str) -> PathBuf {
    let tmp = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&tmp);
    fs::create_dir_all(tmp.join("defaults")).unwrap();
    fs::copy(
        Path::new("defaults").join(CONFIG_FILE),
        tmp.join("defaults").join(CONFIG_FILE),
    )
    .unwrap();
    tmp
}

// ===========================================================================
// Loading
// ===========================================================================

#[test]
fn fixture_skips_team_without_total_opr() {
    let session = fixture_session();
    assert_eq!(session.teams().len(), 6);
    assert!(matches!(
        session.find_team(1006),
        Err(StatsError::TeamNotFound { team_number: 1006 })
    ));
}

#[test]
fn fixture_blank_phases_estimated() {
    let session = fixture_session();
    let team = session.find_team(1004).unwrap();
    assert!((team.opr_auto - 12.0).abs() < 1e-9);
    assert!((team.opr_teleop - 26.4).abs() < 1e-9);
    assert!((team.consistency - 15.0).abs() < 1e-9);
}

#[test]
fn shipped_sample_data_loads() {
    let teams = load_team_stats(Path::new("data/team_stats.csv"), &LoadOptions::default())
        .expect("sample data should load");
    assert_eq!(teams.len(), 12);
}

// ===========================================================================
// Pick list views
// ===========================================================================

#[test]
fn default_view_orders_by_pick_score() {
    let session = fixture_session();
    assert_eq!(numbers(&session), vec![1001, 1002, 1003, 1004, 1005, 1007]);

    let view = session.view();
    let orders: Vec<usize> = view.iter().map(|t| t.pick_order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5, 6]);
    assert!((view[0].pick_score - 73.0).abs() < 1e-9);
    assert_eq!(view[5].win_rate, 12.5);
}

#[test]
fn reference_team_reshapes_the_list() {
    let session = fixture_session().with_reference_team(Some(1005)).unwrap();
    let view = session.view();

    assert_eq!(numbers(&session), vec![1001, 1002, 1003, 1004, 1007]);
    let bonuses: Vec<f64> = view.iter().map(|t| t.complementary_score).collect();
    assert_eq!(bonuses, vec![30.0, 15.0, 15.0, 0.0, 0.0]);
    let tiers: Vec<Tier> = view.iter().map(|t| t.tier).collect();
    assert_eq!(tiers, vec![Tier::A, Tier::A, Tier::B, Tier::B, Tier::C]);
}

#[test]
fn unknown_reference_team_is_rejected() {
    let err = fixture_session().with_reference_team(Some(4242)).unwrap_err();
    assert_eq!(err, StatsError::TeamNotFound { team_number: 4242 });
}

#[test]
fn min_opr_filter_excludes_low_totals() {
    let session = fixture_session().with_params(RankParams {
        min_opr: Some(50.0),
        ..RankParams::default()
    });
    assert_eq!(numbers(&session), vec![1001, 1002, 1003]);
}

#[test]
fn sort_and_strength_combine() {
    let session = fixture_session().with_params(RankParams {
        sort: SortKey::Rank,
        strength: Some(StrengthFilter::Teleop),
        min_opr: None,
    });
    assert_eq!(numbers(&session), vec![1001, 1002]);

    let by_rank = fixture_session().with_params(RankParams {
        sort: SortKey::Rank,
        ..RankParams::default()
    });
    assert_eq!(numbers(&by_rank), vec![1001, 1002, 1004, 1003, 1007, 1005]);
}

// ===========================================================================
// Export
// ===========================================================================

#[test]
fn export_serializes_the_current_view() {
    let session = fixture_session().with_params(RankParams {
        min_opr: Some(25.0),
        ..RankParams::default()
    });
    let csv = session.export_csv().unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], EXPORT_HEADER.join(","));
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1], "1,1001,1,73.0,90.0,30.0,52.0,8,0,10.0");
    assert_eq!(lines[5], "5,1005,-,25.0,30.0,5.0,20.0,0,0,50.0");
    assert_eq!(csv, pick_list_csv(&session.view()).unwrap());
}

// ===========================================================================
// Simulation
// ===========================================================================

#[test]
fn simulate_fixture_alliance() {
    let session = fixture_session();
    let mut rng = ChaCha8Rng::seed_from_u64(2025);
    let projection = session.simulate(1001, 1002, 10_000, &mut rng).unwrap();

    assert_eq!(projection.alliance_opr, 162.0);
    assert_eq!(projection.projected_position, Some(1));
    let expected_mean = 30.0 + 52.0 + 10.0 + 55.0;
    assert!((projection.simulation.mean - expected_mean).abs() < 1.5);

    let bins = build_histogram(&projection.simulation.samples, BIN_COUNT);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 10_000);

    let rendered = report::simulation_report(&projection, &bins);
    assert!(rendered.contains("1001 + 1002"));
}

#[test]
fn simulate_skipped_team_reports_not_found() {
    let session = fixture_session();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let err = session.simulate(1001, 1006, 100, &mut rng).unwrap_err();
    assert_eq!(err, StatsError::TeamNotFound { team_number: 1006 });
}

#[tokio::test]
async fn cooperative_simulation_matches_blocking_run() {
    let session = fixture_session();
    let blocking = session
        .simulate(1003, 1004, 3_333, &mut ChaCha8Rng::seed_from_u64(77))
        .unwrap();
    let cooperative = session
        .simulate_cooperative(1003, 1004, 3_333, &mut ChaCha8Rng::seed_from_u64(77))
        .await
        .unwrap();
    assert_eq!(blocking, cooperative);
}

// ===========================================================================
// Event summary
// ===========================================================================

#[test]
fn event_summary_and_top_teams() {
    let session = fixture_session();
    let summary = session.summary();
    assert_eq!(summary.team_count, 6);
    assert!((summary.average_opr.unwrap() - 53.0).abs() < 1e-9);
    assert_eq!(summary.top_opr, Some(90.0));

    let top: Vec<u32> = session
        .top_teams(TOP_TEAMS_SHOWN)
        .iter()
        .map(|t| t.team_number)
        .collect();
    assert_eq!(top, vec![1001, 1002, 1004, 1003, 1007, 1005]);
}

// ===========================================================================
// Config
// ===========================================================================

#[test]
fn first_run_copies_defaults_and_loads() {
    let base = temp_base_dir("allyscope_it_first_run");
    let config = config::load_config(&base).expect("defaults should load");
    assert!(base.join("config").join(CONFIG_FILE).exists());
    assert_eq!(config.simulation.trials, 10_000);
    assert_eq!(config.pick_list.rank_params(), RankParams::default());
    let _ = fs::remove_dir_all(&base);
}

#[test]
fn invalid_config_is_rejected() {
    let base = temp_base_dir("allyscope_it_invalid");
    fs::create_dir_all(base.join("config")).unwrap();
    let text = fs::read_to_string(base.join("defaults").join(CONFIG_FILE))
        .unwrap()
        .replace("trials = 10000", "trials = 0");
    fs::write(base.join("config").join(CONFIG_FILE), text).unwrap();

    match config::load_config(&base).unwrap_err() {
        ConfigError::ValidationError { field, .. } => assert_eq!(field, "simulation.trials"),
        other => panic!("expected ValidationError, got {other:?}"),
    }
    let _ = fs::remove_dir_all(&base);
}
