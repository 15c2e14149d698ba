#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::{PrecinctError, booths::VotingBooths, voter::Voter};
use crate::{constants::MINUTES_PER_HOUR, util::read_json};

/// A precinct and the statistics of its election day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct Precinct {
    /// Name of the precinct.
    pub name:                 String,
    /// Hours the polls stay open.
    pub hours_open:           u32,
    /// Number of registered voters.
    pub num_voters:           usize,
    /// Rate (per minute) at which voters arrive.
    pub arrival_rate:         f64,
    /// Rate parameter of the voting duration distribution.
    pub voting_duration_rate: f64,
    /// Probability that a voter is impatient.
    #[builder(default)]
    pub impatience_prob:      f64,
}

/// Contents of a precinct file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecinctFile {
    /// The precinct to simulate.
    pub precinct: Precinct,
    /// Seed for the random number generator.
    pub seed:     u64,
}

/// Loads a precinct and its seed from a JSON file.
pub fn load_precinct(path: &Path) -> Result<PrecinctFile> {
    let file: PrecinctFile = read_json(path)?;
    file.precinct
        .validate()
        .with_context(|| format!("Invalid precinct in {}", path.display()))?;
    Ok(file)
}

/// Whether `value` is a positive number (false for NaN).
fn is_positive(value: f64) -> bool {
    value > 0.0
}

/// Draws from an exponential distribution with the given rate.
fn exponential(rng: &mut StdRng, rate: f64) -> f64 {
    -(1.0 - rng.random::<f64>()).ln() / rate
}

impl Precinct {
    /// Checks that the rates are positive and the probability is in `[0, 1]`.
    pub fn validate(&self) -> Result<(), PrecinctError> {
        if !is_positive(self.arrival_rate) {
            return Err(PrecinctError::InvalidParameter(format!(
                "arrival_rate must be positive, got {}",
                self.arrival_rate
            )));
        }
        if !is_positive(self.voting_duration_rate) {
            return Err(PrecinctError::InvalidParameter(format!(
                "voting_duration_rate must be positive, got {}",
                self.voting_duration_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.impatience_prob) {
            return Err(PrecinctError::InvalidParameter(format!(
                "impatience_prob must be within [0, 1], got {}",
                self.impatience_prob
            )));
        }
        Ok(())
    }

    /// Minutes the polls stay open.
    pub fn minutes_open(&self) -> f64 {
        f64::from(self.hours_open) * MINUTES_PER_HOUR
    }

    /// Generates the day's voters in arrival order. Generation stops at the
    /// first voter who would arrive after the polls close.
    pub fn generate_voters(&self, seed: u64) -> Result<Vec<Voter>, PrecinctError> {
        self.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let closing = self.minutes_open();
        let mut voters = Vec::with_capacity(self.num_voters);
        let mut now = 0.0;

        for _ in 0..self.num_voters {
            let gap = exponential(&mut rng, self.arrival_rate);
            let duration = exponential(&mut rng, self.voting_duration_rate);
            let is_impatient = rng.random_bool(self.impatience_prob);

            now += gap;
            if now > closing {
                break;
            }
            voters.push(Voter::new(now, duration, is_impatient));
        }

        Ok(voters)
    }

    /// Simulates election day.
    ///
    /// * `seed`: seed for voter generation
    /// * `booths`: the booths assigned to the precinct; emptied afterwards
    /// * `impatience_threshold`: minutes an impatient voter will wait
    ///   (inclusive)
    pub fn simulate(
        &self,
        seed: u64,
        booths: &mut VotingBooths,
        impatience_threshold: f64,
    ) -> Result<Vec<Voter>, PrecinctError> {
        if booths.num_booths() == 0 {
            return Err(PrecinctError::NoBooths);
        }

        let mut voters = self.generate_voters(seed)?;
        let mut clock: f64 = 0.0;

        for index in 0..voters.len() {
            clock = clock.max(voters[index].arrival_time);
            booths.release_until(clock);

            if !booths.is_booth_available() {
                let next_free = booths.time_next_free()?;
                if !voters[index].will_wait(next_free, impatience_threshold) {
                    continue;
                }
                clock = clock.max(next_free);
                booths.release_until(clock);
            }

            voters[index].start_voting(clock);
            booths.enter_booth(index, &voters[index])?;
        }

        booths.clear();
        tracing::debug!(
            "Precinct {}: {} voters, {} voted",
            self.name,
            voters.len(),
            voters.iter().filter(|v| v.has_voted).count()
        );
        Ok(voters)
    }

    /// Simulates the day and reports whether every voter voted.
    pub fn everyone_votes(
        &self,
        seed: u64,
        num_booths: usize,
        impatience_threshold: f64,
    ) -> Result<bool, PrecinctError> {
        let mut booths = VotingBooths::new(num_booths);
        let voters = self.simulate(seed, &mut booths, impatience_threshold)?;
        Ok(voters.iter().all(|voter| voter.has_voted))
    }
}

/// Summary of a simulated day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    /// Voters who showed up.
    pub arrived:        usize,
    /// Voters who left without voting.
    pub left:           usize,
    /// When the polls closed, in minutes.
    pub closing_time:   f64,
    /// Departure time of the last voter who voted.
    pub last_departure: Option<f64>,
    /// Whether the last voter to arrive left without voting.
    pub last_left:      bool,
}

impl DaySummary {
    /// Summarizes the voters of a simulated day at `precinct`.
    pub fn new(precinct: &Precinct, voters: &[Voter]) -> Self {
        Self {
            arrived:        voters.len(),
            left:           voters.iter().filter(|v| !v.has_voted).count(),
            closing_time:   precinct.minutes_open(),
            last_departure: voters.iter().rev().find_map(|v| v.departure_time),
            last_left:      voters.last().is_some_and(|v| !v.has_voted),
        }
    }
}
