// Ranking, filtering and tiering of a scored pick list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::picklist::score::{ScoredTeam, AUTO_STRENGTH_THRESHOLD, TELEOP_STRENGTH_THRESHOLD};
use crate::stats::TeamStat;

/// Rank substituted for teams without an event rank when sorting by rank.
pub const MISSING_RANK_SENTINEL: u32 = 999;

/// Consistency at or below which a team passes the "consistent" filter.
pub const CONSISTENT_THRESHOLD: f64 = 30.0;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseParamError {
    #[error("unknown sort key `{0}` (expected one of: pick_score, opr, consistency, auto, teleop, win_rate, rank)")]
    UnknownSortKey(String),

    #[error("unknown strength filter `{0}` (expected one of: auto, teleop, consistent)")]
    UnknownStrength(String),

    #[error("minimum OPR must be a finite number >= 0, got {0}")]
    InvalidMinOpr(f64),
}

// ---------------------------------------------------------------------------
// Sort keys
// ---------------------------------------------------------------------------

/// The single active sort order of a pick-list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Pick score, highest first.
    #[default]
    PickScore,
    /// Total OPR, highest first.
    #[serde(rename = "opr", alias = "opr_total")]
    OprTotal,
    /// Consistency, lowest first.
    Consistency,
    /// Autonomous OPR, highest first.
    #[serde(rename = "auto", alias = "opr_auto")]
    OprAuto,
    /// Teleop OPR, highest first.
    #[serde(rename = "teleop", alias = "opr_teleop")]
    OprTeleop,
    /// Win rate, highest first.
    WinRate,
    /// Event rank, best first; unranked teams last.
    Rank,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::PickScore,
        SortKey::OprTotal,
        SortKey::Consistency,
        SortKey::OprAuto,
        SortKey::OprTeleop,
        SortKey::WinRate,
        SortKey::Rank,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SortKey::PickScore => "pick_score",
            SortKey::OprTotal => "opr",
            SortKey::Consistency => "consistency",
            SortKey::OprAuto => "auto",
            SortKey::OprTeleop => "teleop",
            SortKey::WinRate => "win_rate",
            SortKey::Rank => "rank",
        }
    }

    /// Order two scored teams by this key (primary comparison only).
    pub fn compare(&self, a: &ScoredTeam, b: &ScoredTeam) -> Ordering {
        match self {
            SortKey::PickScore => desc(a.pick_score, b.pick_score),
            SortKey::OprTotal => desc(a.stat.opr_total, b.stat.opr_total),
            SortKey::Consistency => asc(a.stat.consistency, b.stat.consistency),
            SortKey::OprAuto => desc(a.stat.opr_auto, b.stat.opr_auto),
            SortKey::OprTeleop => desc(a.stat.opr_teleop, b.stat.opr_teleop),
            SortKey::WinRate => desc(a.win_rate, b.win_rate),
            SortKey::Rank => sort_rank(&a.stat).cmp(&sort_rank(&b.stat)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortKey {
    type Err = ParseParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pick_score" | "pickscore" | "score" => Ok(SortKey::PickScore),
            "opr" | "opr_total" | "total" => Ok(SortKey::OprTotal),
            "consistency" => Ok(SortKey::Consistency),
            "auto" | "opr_auto" | "auto_opr" | "autoopr" => Ok(SortKey::OprAuto),
            "teleop" | "opr_teleop" | "teleop_opr" | "teleopopr" | "dc" | "dcopr" => Ok(SortKey::OprTeleop),
            "win_rate" | "winrate" => Ok(SortKey::WinRate),
            "rank" => Ok(SortKey::Rank),
            other => Err(ParseParamError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Event rank used for sorting.
pub fn sort_rank(stat: &TeamStat) -> u32 {
    stat.rank.unwrap_or(MISSING_RANK_SENTINEL)
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn asc(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Optional "strength" filter selecting a scoring profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthFilter {
    /// Autonomous OPR above 20.
    Auto,
    /// Teleop OPR above 40.
    Teleop,
    /// Consistency at or below 30.
    Consistent,
}

impl StrengthFilter {
    pub fn matches(&self, stat: &TeamStat) -> bool {
        match self {
            StrengthFilter::Auto => stat.opr_auto > AUTO_STRENGTH_THRESHOLD,
            StrengthFilter::Teleop => stat.opr_teleop > TELEOP_STRENGTH_THRESHOLD,
            StrengthFilter::Consistent => stat.consistency <= CONSISTENT_THRESHOLD,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrengthFilter::Auto => "auto",
            StrengthFilter::Teleop => "teleop",
            StrengthFilter::Consistent => "consistent",
        }
    }
}

impl fmt::Display for StrengthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrengthFilter {
    type Err = ParseParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(StrengthFilter::Auto),
            "teleop" | "dc" => Ok(StrengthFilter::Teleop),
            "consistent" => Ok(StrengthFilter::Consistent),
            other => Err(ParseParamError::UnknownStrength(other.to_string())),
        }
    }
}

/// Sort and filter parameters of one pick-list view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RankParams {
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub strength: Option<StrengthFilter>,
    /// Minimum total OPR (inclusive).
    #[serde(default)]
    pub min_opr: Option<f64>,
}

/// Accept a minimum-OPR threshold only when it is finite and non-negative.
pub fn check_min_opr(min: f64) -> Result<f64, ParseParamError> {
    if min.is_finite() && min >= 0.0 {
        Ok(min)
    } else {
        Err(ParseParamError::InvalidMinOpr(min))
    }
}

impl RankParams {
    /// Whether a team passes every active filter.
    pub fn admits(&self, stat: &TeamStat) -> bool {
        if let Some(min) = self.min_opr {
            if stat.opr_total < min {
                return false;
            }
        }
        self.strength.map_or(true, |s| s.matches(stat))
    }
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Coarse pick-score bucket for quick triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Pick score 80 and above.
    S,
    /// 60 to under 80.
    A,
    /// 40 to under 60.
    B,
    /// Below 40.
    C,
}

impl Tier {
    pub fn from_score(pick_score: f64) -> Self {
        if pick_score >= 80.0 {
            Tier::S
        } else if pick_score >= 60.0 {
            Tier::A
        } else if pick_score >= 40.0 {
            Tier::B
        } else {
            Tier::C
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Produce a fresh view: filter, sort, and number `pick_order` from 1.
///
/// Ties on the active key fall back to pick score (highest first) and then to
/// input order. The input slice is left untouched.
pub fn rank(scored: &[ScoredTeam], params: &RankParams) -> Vec<ScoredTeam> {
    let mut view: Vec<ScoredTeam> = scored
        .iter()
        .filter(|t| params.admits(&t.stat))
        .cloned()
        .collect();

    view.sort_by(|a, b| {
        params
            .sort
            .compare(a, b)
            .then_with(|| desc(a.pick_score, b.pick_score))
    });

    for (i, team) in view.iter_mut().enumerate() {
        team.pick_order = i + 1;
    }
    view
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
