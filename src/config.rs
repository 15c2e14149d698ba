#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    str::FromStr,
    sync::{Arc, Mutex, OnceLock},
};

use anyhow::Result;
use tracing::Level;

use crate::{
    constants::{
        DEFAULT_GRID_PRINT_LIMIT, DEFAULT_MAX_BOOTHS, DEFAULT_NUM_TRIALS, DEFAULT_THRESHOLD_STEP,
    },
    polling::SearchOptions,
};

/// Runtime configuration shared across the crate.
#[derive(Debug)]
pub struct ConfigState {
    /// Verbosity of the log output.
    log_level:        Level,
    /// Default number of trials for the polling searches.
    num_trials:       usize,
    /// Increment used by the impatience threshold search.
    threshold_step:   u32,
    /// Largest booth count tried by the booth search.
    max_booths:       usize,
    /// Grids with fewer rows than this are printed.
    grid_print_limit: usize,
}

impl ConfigState {
    /// Construct a new configuration instance from the environment.
    fn new() -> Result<Self> {
        let log_level = std::env::var("DATALABS_LOG_LEVEL")
            .ok()
            .and_then(|value| Level::from_str(value.trim()).ok())
            .unwrap_or(Level::INFO);

        Ok(Self {
            log_level,
            num_trials: read_env("DATALABS_NUM_TRIALS", DEFAULT_NUM_TRIALS),
            threshold_step: read_env("DATALABS_THRESHOLD_STEP", DEFAULT_THRESHOLD_STEP),
            max_booths: read_env("DATALABS_MAX_BOOTHS", DEFAULT_MAX_BOOTHS),
            grid_print_limit: read_env("DATALABS_GRID_PRINT_LIMIT", DEFAULT_GRID_PRINT_LIMIT),
        })
    }

    /// Returns the configured log level.
    pub fn log_level(&self) -> Level {
        self.log_level
    }

    /// Returns the default number of polling trials.
    pub fn num_trials(&self) -> usize {
        self.num_trials
    }

    /// Returns the impatience threshold search increment.
    pub fn threshold_step(&self) -> u32 {
        self.threshold_step
    }

    /// Returns the upper bound of the booth search.
    pub fn max_booths(&self) -> usize {
        self.max_booths
    }

    /// Returns the size below which grids are printed.
    pub fn grid_print_limit(&self) -> usize {
        self.grid_print_limit
    }

    /// Search options derived from this configuration.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions::builder()
            .threshold_step(self.threshold_step)
            .max_booths(self.max_booths)
            .build()
    }
}

/// Shared configuration handle used throughout the crate.
#[derive(Clone)]
pub struct ConfigHandle(Arc<ConfigState>);

impl std::ops::Deref for ConfigHandle {
    type Target = ConfigState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Global storage for the lazily constructed configuration state.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<ConfigState>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<ConfigState>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Ensure the global configuration has been initialized and return a handle.
pub fn ensure_initialized() -> Result<ConfigHandle> {
    let slot = slot();
    let mut guard = slot
        .lock()
        .map_err(|_| anyhow::anyhow!("config slot poisoned"))?;
    if let Some(cfg) = guard.as_ref() {
        return Ok(ConfigHandle(Arc::clone(cfg)));
    }

    let cfg = Arc::new(ConfigState::new()?);
    *guard = Some(Arc::clone(&cfg));
    Ok(ConfigHandle(cfg))
}

/// Returns the active configuration, initializing it on demand.
pub fn get() -> ConfigHandle {
    ensure_initialized().expect("configuration initialization failed")
}

/// Returns the configured log level.
pub fn log_level() -> Level {
    get().log_level()
}

/// Returns the default number of polling trials.
pub fn num_trials() -> usize {
    get().num_trials()
}

/// Returns the configured polling search options.
pub fn search_options() -> SearchOptions {
    get().search_options()
}

/// Returns the size below which grids are printed.
pub fn grid_print_limit() -> usize {
    get().grid_print_limit()
}

/// Parses an environment variable, falling back to `default` when parsing
/// fails or the variable is missing.
fn read_env<T: FromStr>(env: &str, default: T) -> T {
    std::env::var(env)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}
