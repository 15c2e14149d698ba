#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::grid::{CommunityCenter, Grid, Home, LanguageState};

/// Language state transition thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Threshold A.
    pub a: f64,
    /// Threshold B.
    pub b: f64,
    /// Threshold C.
    pub c: f64,
}

impl Thresholds {
    /// Creates a new set of thresholds.
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }
}

/// Number of homes in each language state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequencies {
    /// Homes speaking only the dominant language.
    pub dominant:  usize,
    /// Bilingual homes.
    pub bilingual: usize,
    /// Homes speaking the heritage language.
    pub heritage:  usize,
}

impl Frequencies {
    /// Tallies the states of every home in `grid`.
    pub fn of(grid: &Grid) -> Self {
        let mut freqs = Self::default();
        for home in grid.homes() {
            match grid.get(home) {
                LanguageState::Dominant => freqs.dominant += 1,
                LanguageState::Bilingual => freqs.bilingual += 1,
                LanguageState::Heritage => freqs.heritage += 1,
            }
        }
        freqs
    }

    /// The counts as a `(0, 1, 2)` tuple.
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.dominant, self.bilingual, self.heritage)
    }
}

impl Display for Frequencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.dominant, self.bilingual, self.heritage)
    }
}

/// Parameters of a single simulation run.
#[derive(Debug, Clone, TypedBuilder)]
pub struct Simulation {
    /// Neighborhood radius.
    radius:     usize,
    /// Transition thresholds.
    thresholds: Thresholds,
    /// Community centers in the region.
    #[builder(default)]
    centers:    Vec<CommunityCenter>,
    /// Maximum number of steps.
    max_steps:  usize,
}

impl Simulation {
    /// Whether any community center serves `home`.
    pub fn in_service_area(&self, home: Home) -> bool {
        self.centers.iter().any(|center| center.serves(home))
    }

    /// Next state of the home at `home` given the current grid.
    pub fn next_state(&self, grid: &Grid, home: Home) -> LanguageState {
        let Thresholds { a, b, c } = self.thresholds;
        let level = engagement(grid, home, self.radius);

        match grid.get(home) {
            LanguageState::Dominant => {
                if level <= b {
                    LanguageState::Dominant
                } else {
                    LanguageState::Bilingual
                }
            }
            LanguageState::Bilingual => {
                if level < b {
                    if self.in_service_area(home) {
                        LanguageState::Bilingual
                    } else {
                        LanguageState::Dominant
                    }
                } else if level <= c {
                    LanguageState::Bilingual
                } else {
                    LanguageState::Heritage
                }
            }
            LanguageState::Heritage => {
                if self.in_service_area(home) || level >= b {
                    LanguageState::Heritage
                } else if level > a {
                    LanguageState::Bilingual
                } else {
                    LanguageState::Dominant
                }
            }
        }
    }

    /// Performs one pass over the grid in row-major order, updating homes in
    /// place. Returns whether any home changed.
    pub fn step(&self, grid: &mut Grid) -> bool {
        let mut changed = false;
        for home in grid.homes() {
            let next = self.next_state(grid, home);
            if next != grid.get(home) {
                grid.set(home, next);
                changed = true;
            }
        }
        changed
    }

    /// Runs the simulation on `grid` until `max_steps` have been taken or a
    /// step leaves every home unchanged.
    pub fn run(&self, grid: &mut Grid) -> Frequencies {
        for step in 0..self.max_steps {
            if !self.step(grid) {
                tracing::debug!("Region stable after {} step(s)", step + 1);
                break;
            }
        }
        Frequencies::of(grid)
    }
}

/// Average state of the homes within `radius` rows and columns of `home`,
/// clipped to the grid.
pub fn engagement(grid: &Grid, (row, col): Home, radius: usize) -> f64 {
    let last = grid.size().saturating_sub(1);
    let rows = row.saturating_sub(radius)..=(row + radius).min(last);
    let cols = col.saturating_sub(radius)..=(col + radius).min(last);

    let homes = rows.clone().count() * cols.clone().count();
    let total: usize = rows
        .flat_map(|r| cols.clone().map(move |c| (r, c)))
        .map(|home| grid.get(home).value() as usize)
        .sum();

    total as f64 / homes as f64
}

/// Runs the simulation on `grid` in place.
pub fn run_simulation(
    grid: &mut Grid,
    radius: usize,
    thresholds: Thresholds,
    centers: &[CommunityCenter],
    max_steps: usize,
) -> Frequencies {
    Simulation::builder()
        .radius(radius)
        .thresholds(thresholds)
        .centers(centers.to_vec())
        .max_steps(max_steps)
        .build()
        .run(grid)
}

/// Runs the simulation once for every threshold B in `bs`, each time on a
/// fresh copy of `grid`.
pub fn simulation_sweep(
    grid: &Grid,
    radius: usize,
    a: f64,
    bs: &[f64],
    c: f64,
    centers: &[CommunityCenter],
    max_steps: usize,
) -> Vec<Frequencies> {
    bs.iter()
        .map(|&b| {
            let mut copy = grid.clone();
            run_simulation(&mut copy, radius, Thresholds::new(a, b, c), centers, max_steps)
        })
        .collect()
}
