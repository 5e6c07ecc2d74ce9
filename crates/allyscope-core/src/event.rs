// Event-level views: field summary, top-ranked teams and where a simulated
// alliance would stand against the field.

use serde::Serialize;

use crate::picklist::rank::sort_rank;
use crate::sim::alliance::SimulationResult;
use crate::stats::TeamStat;

/// Number of teams shown in the event rankings table.
pub const TOP_TEAMS_SHOWN: usize = 10;

// ---------------------------------------------------------------------------
// Field summary
// ---------------------------------------------------------------------------

/// Headline numbers for the loaded field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub team_count: usize,
    /// Mean total OPR over teams with a positive OPR.
    pub average_opr: Option<f64>,
    /// Highest total OPR over teams with a positive OPR.
    pub top_opr: Option<f64>,
}

pub fn summarize_event(teams: &[TeamStat]) -> EventSummary {
    let valid: Vec<f64> = teams
        .iter()
        .map(|t| t.opr_total)
        .filter(|&opr| opr > 0.0)
        .collect();

    let (average_opr, top_opr) = if valid.is_empty() {
        (None, None)
    } else {
        (
            Some(valid.iter().sum::<f64>() / valid.len() as f64),
            Some(valid.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        )
    };

    EventSummary {
        team_count: teams.len(),
        average_opr,
        top_opr,
    }
}

/// The best `limit` teams by event rank; unranked teams trail in input order.
pub fn top_ranked(teams: &[TeamStat], limit: usize) -> Vec<&TeamStat> {
    let mut sorted: Vec<&TeamStat> = teams.iter().collect();
    sorted.sort_by_key(|t| sort_rank(t));
    sorted.truncate(limit);
    sorted
}

// ---------------------------------------------------------------------------
// Alliance standing
// ---------------------------------------------------------------------------

/// Position the alliance's combined OPR would take in the field's OPR
/// ordering: one plus the index of the first team (highest OPR first) the
/// alliance strictly out-scores. `None` when it out-scores nobody.
pub fn projected_position(alliance_opr: f64, teams: &[TeamStat]) -> Option<usize> {
    let mut oprs: Vec<f64> = teams.iter().map(|t| t.opr_total).collect();
    oprs.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    oprs.iter().position(|&opr| alliance_opr > opr).map(|i| i + 1)
}

/// A simulated two-team alliance with its standing against the field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllianceProjection {
    pub team1: u32,
    pub team2: u32,
    /// Sum of both teams' total OPR.
    pub alliance_opr: f64,
    pub projected_position: Option<usize>,
    pub simulation: SimulationResult,
}

impl AllianceProjection {
    pub fn new(
        team1: &TeamStat,
        team2: &TeamStat,
        field: &[TeamStat],
        simulation: SimulationResult,
    ) -> Self {
        let alliance_opr = team1.opr_total + team2.opr_total;
        AllianceProjection {
            team1: team1.team_number,
            team2: team2.team_number,
            alliance_opr,
            projected_position: projected_position(alliance_opr, field),
            simulation,
        }
    }

    pub fn standing_label(&self) -> String {
        match self.projected_position {
            Some(position) => format!("Top {position}"),
            None => "Below field".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::team;

    #[test]
    fn summary_ignores_non_positive_oprs() {
        let teams = vec![
            team(1, 60.0, 15.0, 35.0),
            team(2, 40.0, 10.0, 25.0),
            team(3, 0.0, 0.0, 0.0),
        ];
        let summary = summarize_event(&teams);
        assert_eq!(summary.team_count, 3);
        assert_eq!(summary.average_opr, Some(50.0));
        assert_eq!(summary.top_opr, Some(60.0));
    }

    #[test]
    fn summary_without_valid_oprs() {
        let summary = summarize_event(&[team(1, 0.0, 0.0, 0.0)]);
        assert_eq!(summary.team_count, 1);
        assert_eq!(summary.average_opr, None);
        assert_eq!(summary.top_opr, None);
    }

    #[test]
    fn top_ranked_orders_by_rank_with_unranked_last() {
        let mut a = team(1, 60.0, 15.0, 35.0);
        a.rank = Some(4);
        let b = team(2, 70.0, 15.0, 35.0);
        let mut c = team(3, 50.0, 15.0, 35.0);
        c.rank = Some(1);
        let teams = vec![a, b, c];

        let top: Vec<u32> = top_ranked(&teams, 10).iter().map(|t| t.team_number).collect();
        assert_eq!(top, vec![3, 1, 2]);
        assert_eq!(top_ranked(&teams, 2).len(), 2);
    }

    #[test]
    fn projected_position_against_field() {
        let teams = vec![
            team(1, 90.0, 20.0, 60.0),
            team(2, 70.0, 20.0, 40.0),
            team(3, 50.0, 10.0, 30.0),
        ];
        assert_eq!(projected_position(120.0, &teams), Some(1));
        assert_eq!(projected_position(80.0, &teams), Some(2));
        assert_eq!(projected_position(70.0, &teams), Some(3));
        assert_eq!(projected_position(10.0, &teams), None);
    }

    #[test]
    fn standing_labels() {
        let a = team(1, 30.0, 10.0, 15.0);
        let b = team(2, 20.0, 5.0, 10.0);
        let field = vec![team(9, 100.0, 30.0, 60.0)];
        let sim = SimulationResult::from_samples(vec![25.0]);

        let below = AllianceProjection::new(&a, &b, &field, sim.clone());
        assert_eq!(below.alliance_opr, 50.0);
        assert_eq!(below.standing_label(), "Below field");

        let top = AllianceProjection::new(&a, &b, &[team(8, 40.0, 10.0, 20.0)], sim);
        assert_eq!(top.standing_label(), "Top 1");
    }
}
