// Alliance score simulation.
//
// Each trial perturbs both teams' autonomous and teleop contributions with
// independent multiplicative Gaussian noise, floors each team's score at zero
// and sums the two. The floor skews the distribution for low-scoring teams,
// so it must be applied per team before summing.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::sim::variate::standard_normal;
use crate::stats::TeamStat;

/// Trials per simulation when the caller does not choose.
pub const DEFAULT_TRIALS: usize = 10_000;

/// Standard deviation of the multiplicative phase noise.
pub const NOISE_COEFFICIENT: f64 = 0.2;

/// Trials run between scheduler yields in the cooperative variant.
const COOPERATIVE_BATCH: usize = 1_000;

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// Distribution summary of one simulation run, plus the raw samples the
/// histogram stage needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub mean: f64,
    /// Population standard deviation (N denominator).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub samples: Vec<f64>,
}

impl SimulationResult {
    /// Summarize a finished sample sequence.
    ///
    /// An empty sequence summarizes to all zeros.
    pub fn from_samples(samples: Vec<f64>) -> Self {
        if samples.is_empty() {
            return SimulationResult {
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                samples,
            };
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        SimulationResult {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            samples,
        }
    }

    pub fn trials(&self) -> usize {
        self.samples.len()
    }
}

// ---------------------------------------------------------------------------
// Trial computation
// ---------------------------------------------------------------------------

/// One team's score for a single trial, floored at zero.
pub fn team_trial_score(auto: f64, teleop: f64, noise_auto: f64, noise_teleop: f64) -> f64 {
    (auto * (1.0 + noise_auto) + teleop * (1.0 + noise_teleop)).max(0.0)
}

/// Run one trial. Draw order is fixed: team1 auto, team1 teleop, team2 auto,
/// team2 teleop.
fn alliance_trial<R: Rng + ?Sized>(team1: &TeamStat, team2: &TeamStat, rng: &mut R) -> f64 {
    let t1_auto = standard_normal(rng) * NOISE_COEFFICIENT;
    let t1_teleop = standard_normal(rng) * NOISE_COEFFICIENT;
    let t2_auto = standard_normal(rng) * NOISE_COEFFICIENT;
    let t2_teleop = standard_normal(rng) * NOISE_COEFFICIENT;

    team_trial_score(team1.opr_auto, team1.opr_teleop, t1_auto, t1_teleop)
        + team_trial_score(team2.opr_auto, team2.opr_teleop, t2_auto, t2_teleop)
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Simulate `trials` alliance scores for two teams, drawing noise from `rng`.
pub fn simulate_alliance<R: Rng + ?Sized>(
    team1: &TeamStat,
    team2: &TeamStat,
    trials: usize,
    rng: &mut R,
) -> SimulationResult {
    let samples: Vec<f64> = (0..trials)
        .map(|_| alliance_trial(team1, team2, rng))
        .collect();
    let result = SimulationResult::from_samples(samples);
    debug!(
        team1 = team1.team_number,
        team2 = team2.team_number,
        trials,
        mean = result.mean,
        std_dev = result.std_dev,
        "alliance simulation finished"
    );
    result
}

/// Same as [`simulate_alliance`], but yields to the tokio scheduler after
/// every batch of trials.
///
/// Trials are drawn in the same order from the same source, so the result is
/// identical to an uninterrupted run with an identically seeded `rng`.
pub async fn simulate_alliance_cooperative<R: Rng + ?Sized>(
    team1: &TeamStat,
    team2: &TeamStat,
    trials: usize,
    rng: &mut R,
) -> SimulationResult {
    let mut samples = Vec::with_capacity(trials);
    while samples.len() < trials {
        let batch = COOPERATIVE_BATCH.min(trials - samples.len());
        for _ in 0..batch {
            samples.push(alliance_trial(team1, team2, rng));
        }
        tokio::task::yield_now().await;
    }
    let result = SimulationResult::from_samples(samples);
    debug!(
        team1 = team1.team_number,
        team2 = team2.team_number,
        trials,
        mean = result.mean,
        "cooperative alliance simulation finished"
    );
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
