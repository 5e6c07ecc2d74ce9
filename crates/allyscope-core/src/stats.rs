// Per-team statistics as supplied by the data-acquisition side, plus the
// estimation policies applied when a source leaves fields blank.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("team {team_number} not found")]
    TeamNotFound { team_number: u32 },
}

// ---------------------------------------------------------------------------
// TeamStat
// ---------------------------------------------------------------------------

/// Resolved statistics for one team at one event.
///
/// `opr_auto + opr_teleop` approximates `opr_total` but is not required to
/// match it exactly (endgame points and regression noise live in the gap).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStat {
    pub team_number: u32,
    pub opr_total: f64,
    pub opr_auto: f64,
    pub opr_teleop: f64,
    /// Match-to-match variability; lower is better.
    pub consistency: f64,
    pub rank: Option<u32>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub ranking_points: f64,
}

impl TeamStat {
    /// Total matches played (wins + losses + ties).
    pub fn matches_played(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses) + u64::from(self.ties)
    }

    /// Win percentage on a 0-100 scale. Zero when no matches have been played.
    pub fn win_rate(&self) -> f64 {
        let played = self.matches_played();
        if played == 0 {
            return 0.0;
        }
        self.wins as f64 / played as f64 * 100.0
    }
}

/// Find a team by number in a snapshot.
pub fn find_team(teams: &[TeamStat], team_number: u32) -> Result<&TeamStat, StatsError> {
    teams
        .iter()
        .find(|t| t.team_number == team_number)
        .ok_or(StatsError::TeamNotFound { team_number })
}

// ---------------------------------------------------------------------------
// Estimation policies
// ---------------------------------------------------------------------------

/// Consistency value assigned when no per-team variability figure exists.
///
/// This is a fixed stand-in, not a measurement: every team that receives it
/// looks equally consistent. Replace with a real estimate computed from
/// per-team match-score variance once the data source provides scores.
pub const PLACEHOLDER_CONSISTENCY: f64 = 15.0;

/// Default-estimation policy for phase contributions missing from a source.
///
/// When a source reports a total OPR but omits the autonomous or teleop
/// component, the missing phase is estimated as a fixed share of the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseDefaults {
    pub auto_share: f64,
    pub teleop_share: f64,
}

impl Default for PhaseDefaults {
    fn default() -> Self {
        PhaseDefaults {
            auto_share: 0.25,
            teleop_share: 0.55,
        }
    }
}

impl PhaseDefaults {
    /// Resolve `(auto, teleop)` for a team, estimating whichever is absent.
    pub fn resolve(&self, total: f64, auto: Option<f64>, teleop: Option<f64>) -> (f64, f64) {
        (
            auto.unwrap_or(total * self.auto_share),
            teleop.unwrap_or(total * self.teleop_share),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
