// Pick-list session: the loaded field plus the current view parameters.
//
// A session never patches a previous view. Every call to `view` scores and
// ranks the snapshot from scratch, so any two calls with the same session
// produce the same list.

use rand::Rng;
use tracing::{debug, info};

use crate::event::{summarize_event, top_ranked, AllianceProjection, EventSummary};
use crate::picklist::export::{pick_list_csv, ExportError};
use crate::picklist::rank::{rank, RankParams};
use crate::picklist::score::{score_candidates, ScoredTeam};
use crate::sim::alliance::{simulate_alliance, simulate_alliance_cooperative};
use crate::stats::{find_team, StatsError, TeamStat};

#[derive(Debug, Clone)]
pub struct PickSession {
    teams: Vec<TeamStat>,
    reference_team: Option<u32>,
    params: RankParams,
}

impl PickSession {
    /// Start a session over a resolved snapshot with default parameters and
    /// no reference team.
    pub fn new(teams: Vec<TeamStat>) -> Self {
        info!(teams = teams.len(), "pick session created");
        PickSession {
            teams,
            reference_team: None,
            params: RankParams::default(),
        }
    }

    /// Set (or clear) "your own team". The number must exist in the snapshot.
    pub fn with_reference_team(mut self, team_number: Option<u32>) -> Result<Self, StatsError> {
        if let Some(number) = team_number {
            find_team(&self.teams, number)?;
        }
        self.reference_team = team_number;
        Ok(self)
    }

    pub fn with_params(mut self, params: RankParams) -> Self {
        self.params = params;
        self
    }

    pub fn teams(&self) -> &[TeamStat] {
        &self.teams
    }

    pub fn params(&self) -> &RankParams {
        &self.params
    }

    pub fn reference_team(&self) -> Option<&TeamStat> {
        self.reference_team
            .and_then(|n| self.teams.iter().find(|t| t.team_number == n))
    }

    pub fn find_team(&self, team_number: u32) -> Result<&TeamStat, StatsError> {
        find_team(&self.teams, team_number)
    }

    /// The ranked, filtered pick list for the current parameters.
    pub fn view(&self) -> Vec<ScoredTeam> {
        let scored = score_candidates(&self.teams, self.reference_team());
        let view = rank(&scored, &self.params);
        debug!(
            candidates = scored.len(),
            shown = view.len(),
            sort = %self.params.sort,
            "pick list view computed"
        );
        view
    }

    /// CSV export of the current view.
    pub fn export_csv(&self) -> Result<String, ExportError> {
        pick_list_csv(&self.view())
    }

    pub fn summary(&self) -> EventSummary {
        summarize_event(&self.teams)
    }

    pub fn top_teams(&self, limit: usize) -> Vec<&TeamStat> {
        top_ranked(&self.teams, limit)
    }

    /// Simulate the alliance of two teams from the snapshot.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        team1: u32,
        team2: u32,
        trials: usize,
        rng: &mut R,
    ) -> Result<AllianceProjection, StatsError> {
        let t1 = self.find_team(team1)?;
        let t2 = self.find_team(team2)?;
        let simulation = simulate_alliance(t1, t2, trials, rng);
        Ok(AllianceProjection::new(t1, t2, &self.teams, simulation))
    }

    /// Cooperative counterpart of [`PickSession::simulate`].
    pub async fn simulate_cooperative<R: Rng + ?Sized>(
        &self,
        team1: u32,
        team2: u32,
        trials: usize,
        rng: &mut R,
    ) -> Result<AllianceProjection, StatsError> {
        let t1 = self.find_team(team1)?;
        let t2 = self.find_team(team2)?;
        let simulation = simulate_alliance_cooperative(t1, t2, trials, rng).await;
        Ok(AllianceProjection::new(t1, t2, &self.teams, simulation))
    }
}
