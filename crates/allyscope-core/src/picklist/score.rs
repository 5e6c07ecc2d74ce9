// Composite pick score.
//
// pick_score = 0.5 * total OPR
//            + 0.2 * complementary bonus (0, 15 or 30)
//            + 0.2 * consistency score   (100 - consistency, floored at 0)
//            + 0.1 * win rate            (0-100)

use serde::Serialize;

use crate::picklist::rank::Tier;
use crate::stats::TeamStat;

/// Autonomous OPR above which a team counts as a strong auto scorer.
pub const AUTO_STRENGTH_THRESHOLD: f64 = 20.0;

/// Teleop OPR above which a team counts as a strong teleop scorer.
pub const TELEOP_STRENGTH_THRESHOLD: f64 = 40.0;

/// Bonus awarded per phase where a candidate covers the reference team's gap.
pub const COMPLEMENTARY_BONUS: f64 = 15.0;

const OPR_WEIGHT: f64 = 0.5;
const COMPLEMENTARY_WEIGHT: f64 = 0.2;
const CONSISTENCY_WEIGHT: f64 = 0.2;
const WIN_RATE_WEIGHT: f64 = 0.1;

// ---------------------------------------------------------------------------
// ScoredTeam
// ---------------------------------------------------------------------------

/// A candidate annotated with its pick score and position in a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTeam {
    #[serde(flatten)]
    pub stat: TeamStat,
    pub pick_score: f64,
    /// Bucket of `pick_score`, fixed when the team is scored.
    pub tier: Tier,
    pub complementary_score: f64,
    pub win_rate: f64,
    /// 1-based position within the view that produced this value.
    pub pick_order: usize,
}

// ---------------------------------------------------------------------------
// Score components
// ---------------------------------------------------------------------------

/// Bonus for covering the reference team's weak phases.
///
/// +15 when the reference is weak in auto and the candidate strong, and
/// independently +15 for teleop. Always zero without a reference team.
pub fn complementary_bonus(reference: Option<&TeamStat>, candidate: &TeamStat) -> f64 {
    let Some(reference) = reference else {
        return 0.0;
    };
    let mut bonus = 0.0;
    if reference.opr_auto < AUTO_STRENGTH_THRESHOLD && candidate.opr_auto > AUTO_STRENGTH_THRESHOLD {
        bonus += COMPLEMENTARY_BONUS;
    }
    if reference.opr_teleop < TELEOP_STRENGTH_THRESHOLD
        && candidate.opr_teleop > TELEOP_STRENGTH_THRESHOLD
    {
        bonus += COMPLEMENTARY_BONUS;
    }
    bonus
}

/// Map "lower is better" consistency onto a 0-100 "higher is better" scale.
pub fn consistency_score(consistency: f64) -> f64 {
    (100.0 - consistency).max(0.0)
}

/// Weighted sum of the four score components.
pub fn composite_score(opr_total: f64, bonus: f64, consistency_score: f64, win_rate: f64) -> f64 {
    OPR_WEIGHT * opr_total
        + COMPLEMENTARY_WEIGHT * bonus
        + CONSISTENCY_WEIGHT * consistency_score
        + WIN_RATE_WEIGHT * win_rate
}

/// Score every candidate against an optional reference team.
///
/// The reference team is dropped from the output. Input order is preserved
/// and `pick_order` is numbered in that order; ranking renumbers it.
pub fn score_candidates(teams: &[TeamStat], reference: Option<&TeamStat>) -> Vec<ScoredTeam> {
    teams
        .iter()
        .filter(|t| reference.map_or(true, |r| r.team_number != t.team_number))
        .enumerate()
        .map(|(i, team)| {
            let bonus = complementary_bonus(reference, team);
            let win_rate = team.win_rate();
            let pick_score =
                composite_score(team.opr_total, bonus, consistency_score(team.consistency), win_rate);
            ScoredTeam {
                stat: team.clone(),
                pick_score,
                tier: Tier::from_score(pick_score),
                complementary_score: bonus,
                win_rate,
                pick_order: i + 1,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
