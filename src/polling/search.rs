#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::{Context, Result};
use bon::Builder;
use futures::future::try_join_all;

use super::{PrecinctError, precinct::Precinct};
use crate::{
    constants::{DEFAULT_MAX_BOOTHS, DEFAULT_THRESHOLD_STEP, FIRST_IMPATIENCE_THRESHOLD},
    util::median,
};

/// Tuning knobs for the threshold and booth-count searches.
#[derive(Debug, Clone, Copy, Builder)]
pub struct SearchOptions {
    /// Increment between impatience thresholds tried.
    #[builder(default = DEFAULT_THRESHOLD_STEP)]
    pub threshold_step: u32,
    /// Largest number of booths the booth search will try.
    #[builder(default = DEFAULT_MAX_BOOTHS)]
    pub max_booths:     usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Smallest impatience threshold (1, 1 + step, ...) at which every voter
/// votes in a single trial.
pub fn threshold_for_trial(
    seed: u64,
    precinct: &Precinct,
    num_booths: usize,
    options: SearchOptions,
) -> Result<u32, PrecinctError> {
    if options.threshold_step == 0 {
        return Err(PrecinctError::InvalidParameter(
            "threshold step must be at least 1".to_string(),
        ));
    }

    let mut threshold = FIRST_IMPATIENCE_THRESHOLD;
    while !precinct.everyone_votes(seed, num_booths, f64::from(threshold))? {
        threshold = threshold
            .checked_add(options.threshold_step)
            .ok_or_else(|| {
                PrecinctError::InvalidParameter(format!(
                    "impatience threshold overflowed after {threshold} with step {}",
                    options.threshold_step
                ))
            })?;
    }
    Ok(threshold)
}

/// Smallest number of booths at which every voter votes in a single trial.
pub fn booths_for_trial(
    seed: u64,
    precinct: &Precinct,
    impatience_threshold: f64,
    options: SearchOptions,
) -> Result<usize, PrecinctError> {
    for num_booths in 1..=options.max_booths {
        if precinct.everyone_votes(seed, num_booths, impatience_threshold)? {
            return Ok(num_booths);
        }
    }
    Err(PrecinctError::BoothLimitExceeded(options.max_booths))
}

/// Runs `trial` for seeds `seed .. seed + num_trials` on the blocking pool
/// and returns the median result.
async fn median_of_trials<T, F>(seed: u64, num_trials: usize, trial: F) -> Result<T>
where
    T: Ord + Copy + Send + 'static,
    F: Fn(u64) -> Result<T, PrecinctError> + Clone + Send + 'static,
{
    if num_trials == 0 {
        return Err(PrecinctError::NoTrials.into());
    }

    let handles = (0..num_trials as u64).map(|offset| {
        let trial = trial.clone();
        tokio::task::spawn_blocking(move || trial(seed.wrapping_add(offset)))
    });

    let results = try_join_all(handles)
        .await
        .context("A simulation trial panicked")?
        .into_iter()
        .collect::<Result<Vec<T>, PrecinctError>>()?;

    median(results).context("No trial results to take a median of")
}

/// Finds the impatience threshold at which every voter is likely to vote:
/// the median over `num_trials` trials of the per-trial threshold.
pub async fn find_impatience_threshold(
    seed: u64,
    precinct: &Precinct,
    num_booths: usize,
    num_trials: usize,
    options: SearchOptions,
) -> Result<u32> {
    let precinct = precinct.clone();
    let threshold = median_of_trials(seed, num_trials, move |trial_seed| {
        threshold_for_trial(trial_seed, &precinct, num_booths, options)
    })
    .await?;

    tracing::info!("Median impatience threshold over {num_trials} trials: {threshold}");
    Ok(threshold)
}

/// Finds the number of booths needed to make it likely that every voter
/// votes: the median over `num_trials` trials of the per-trial count.
pub async fn find_voting_booths_needed(
    seed: u64,
    precinct: &Precinct,
    impatience_threshold: f64,
    num_trials: usize,
    options: SearchOptions,
) -> Result<usize> {
    let precinct = precinct.clone();
    let booths = median_of_trials(seed, num_trials, move |trial_seed| {
        booths_for_trial(trial_seed, &precinct, impatience_threshold, options)
    })
    .await?;

    tracing::info!("Median booths needed over {num_trials} trials: {booths}");
    Ok(booths)
}
