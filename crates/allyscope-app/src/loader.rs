// Team statistics import from CSV.
//
// One row per team. Phase OPRs, consistency and record columns may be blank;
// blanks are filled by the configured estimation policies. Rows without a
// usable total OPR are skipped, matching teams the stats source has no
// figures for yet.

use allyscope_core::stats::{PhaseDefaults, TeamStat, PLACEHOLDER_CONSISTENCY};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::config::EstimationConfig;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How blank fields are filled during import.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    pub phases: PhaseDefaults,
    pub placeholder_consistency: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            phases: PhaseDefaults::default(),
            placeholder_consistency: PLACEHOLDER_CONSISTENCY,
        }
    }
}

impl From<&EstimationConfig> for LoadOptions {
    fn from(est: &EstimationConfig) -> Self {
        LoadOptions {
            phases: est.phase_defaults(),
            placeholder_consistency: est.placeholder_consistency,
        }
    }
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

/// Accepts both snake_case headers and the camelCase / short names used by
/// common scouting exports (`teamNumber`, `tot`, `auto`, `dc`, `rp`).
#[derive(Debug, Deserialize)]
struct RawTeamRow {
    #[serde(alias = "teamNumber", alias = "team")]
    team_number: u32,
    #[serde(default, alias = "oprTotal", alias = "tot", alias = "total")]
    opr_total: Option<f64>,
    #[serde(default, alias = "oprAuto", alias = "auto")]
    opr_auto: Option<f64>,
    #[serde(default, alias = "oprTeleop", alias = "dc", alias = "teleop")]
    opr_teleop: Option<f64>,
    #[serde(default)]
    consistency: Option<f64>,
    #[serde(default)]
    rank: Option<u32>,
    #[serde(default)]
    wins: Option<u32>,
    #[serde(default)]
    losses: Option<u32>,
    #[serde(default)]
    ties: Option<u32>,
    #[serde(default, alias = "rankingPoints", alias = "rp")]
    ranking_points: Option<f64>,
}

fn all_finite(values: &[Option<f64>]) -> bool {
    values.iter().flatten().all(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Reader-based loader
// ---------------------------------------------------------------------------

/// Parse team rows from any reader. Malformed rows are logged and skipped;
/// a later row for the same team number replaces the earlier one.
pub fn load_team_stats_from_reader<R: Read>(
    rdr: R,
    options: &LoadOptions,
) -> Result<Vec<TeamStat>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);
    let mut teams: Vec<TeamStat> = Vec::new();
    let mut placeholder_count = 0usize;

    for result in reader.deserialize::<RawTeamRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed team row: {}", e);
                continue;
            }
        };

        if raw.team_number == 0 {
            warn!("skipping row with team number 0");
            continue;
        }
        if !all_finite(&[
            raw.opr_total,
            raw.opr_auto,
            raw.opr_teleop,
            raw.consistency,
            raw.ranking_points,
        ]) {
            warn!("skipping team {}: non-finite value", raw.team_number);
            continue;
        }
        let total = match raw.opr_total {
            Some(total) if total != 0.0 => total,
            _ => {
                warn!("skipping team {}: no total OPR", raw.team_number);
                continue;
            }
        };
        let consistency = match raw.consistency {
            Some(c) if c < 0.0 => {
                warn!("skipping team {}: negative consistency {}", raw.team_number, c);
                continue;
            }
            Some(c) => c,
            None => {
                placeholder_count += 1;
                options.placeholder_consistency
            }
        };

        let (opr_auto, opr_teleop) = options.phases.resolve(total, raw.opr_auto, raw.opr_teleop);
        if raw.opr_auto.is_none() || raw.opr_teleop.is_none() {
            info!(
                team = raw.team_number,
                "estimated missing phase OPR from total ({:.1})", total
            );
        }

        let stat = TeamStat {
            team_number: raw.team_number,
            opr_total: total,
            opr_auto,
            opr_teleop,
            consistency,
            rank: raw.rank.filter(|&r| r > 0),
            wins: raw.wins.unwrap_or(0),
            losses: raw.losses.unwrap_or(0),
            ties: raw.ties.unwrap_or(0),
            ranking_points: raw.ranking_points.unwrap_or(0.0),
        };

        if let Some(existing) = teams.iter_mut().find(|t| t.team_number == stat.team_number) {
            warn!("duplicate row for team {}, using latest values", stat.team_number);
            *existing = stat;
        } else {
            teams.push(stat);
        }
    }

    if placeholder_count > 0 {
        warn!(
            "{} team(s) have no consistency figure; using placeholder value {:.1}, \
             which does not reflect real variability",
            placeholder_count, options.placeholder_consistency
        );
    }

    Ok(teams)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load team statistics from a CSV file. An empty result is an error.
pub fn load_team_stats(path: &Path, options: &LoadOptions) -> Result<Vec<TeamStat>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let teams = load_team_stats_from_reader(file, options).map_err(|e| LoadError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;

    if teams.is_empty() {
        return Err(LoadError::Validation(format!(
            "no team stats available in {}",
            path.display()
        )));
    }
    Ok(teams)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
