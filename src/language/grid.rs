#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fmt::Display, path::Path, str::FromStr};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::GridError;

/// Language spoken in a home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguageState {
    /// Speaks only the dominant language.
    Dominant = 0,
    /// Bilingual.
    Bilingual = 1,
    /// Speaks the heritage language.
    Heritage = 2,
}

impl LanguageState {
    /// Numeric value used when averaging a neighborhood.
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for LanguageState {
    type Error = GridError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Dominant),
            1 => Ok(Self::Bilingual),
            2 => Ok(Self::Heritage),
            other => Err(GridError::InvalidState(other.to_string())),
        }
    }
}

impl Display for LanguageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Location of a home as `(row, col)`.
pub type Home = (usize, usize);

/// A community center and the distance it serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityCenter {
    /// Row of the center.
    pub row:      usize,
    /// Column of the center.
    pub col:      usize,
    /// Homes within this many rows and columns are served.
    pub distance: usize,
}

impl CommunityCenter {
    /// Creates a new community center.
    pub fn new(row: usize, col: usize, distance: usize) -> Self {
        Self { row, col, distance }
    }

    /// Whether `home` lies inside this center's service area.
    pub fn serves(&self, (row, col): Home) -> bool {
        row.abs_diff(self.row) <= self.distance && col.abs_diff(self.col) <= self.distance
    }
}

/// A square region of homes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Row-major home states.
    cells: Vec<Vec<LanguageState>>,
}

impl Grid {
    /// Builds a grid from raw states, checking that it is square and every
    /// state is 0, 1 or 2.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, GridError> {
        let size = rows.len();
        let cells = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                if row.len() != size {
                    return Err(GridError::NotSquare {
                        row:      i,
                        expected: size,
                        found:    row.len(),
                    });
                }
                row.into_iter().map(LanguageState::try_from).collect()
            })
            .collect::<Result<Vec<Vec<_>>, _>>()?;

        Ok(Self { cells })
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// State of the home at `(row, col)`.
    pub fn get(&self, (row, col): Home) -> LanguageState {
        self.cells[row][col]
    }

    /// Replaces the state of the home at `(row, col)`.
    pub fn set(&mut self, (row, col): Home, state: LanguageState) {
        self.cells[row][col] = state;
    }

    /// Iterates over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[LanguageState]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Iterates over every home location in row-major order.
    pub fn homes(&self) -> impl Iterator<Item = Home> + use<> {
        let size = self.size();
        (0..size).flat_map(move |row| (0..size).map(move |col| (row, col)))
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line = row
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Parses the next whitespace-separated token as `T`.
fn parse_token<T: FromStr>(token: Option<&str>, line: usize) -> Result<T, GridError> {
    let token = token.ok_or(GridError::UnexpectedEnd(line))?;
    token.parse().map_err(|_| GridError::Malformed {
        line,
        token: token.to_string(),
    })
}

/// Parses a region description.
///
/// The first line holds the grid size `N`, followed by `N` rows of `N`
/// states. An optional line with a count `K` follows, then `K` lines of
/// `row col distance` describing community centers.
pub fn parse_grid(contents: &str) -> Result<(Grid, Vec<CommunityCenter>), GridError> {
    let mut lines = contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (mut last_line, header) = lines.next().ok_or(GridError::UnexpectedEnd(1))?;
    let size: usize = parse_token(header.split_whitespace().next(), last_line)?;

    let mut rows = Vec::with_capacity(size);
    for _ in 0..size {
        let (line_no, line) = lines.next().ok_or(GridError::UnexpectedEnd(last_line + 1))?;
        let row = line
            .split_whitespace()
            .map(|token| parse_token::<u8>(Some(token), line_no))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
        last_line = line_no;
    }
    let grid = Grid::from_rows(rows)?;

    let mut centers = Vec::new();
    if let Some((line_no, line)) = lines.next() {
        let count: usize = parse_token(line.split_whitespace().next(), line_no)?;
        last_line = line_no;
        for _ in 0..count {
            let (line_no, line) = lines.next().ok_or(GridError::UnexpectedEnd(last_line + 1))?;
            let mut tokens = line.split_whitespace();
            let center = CommunityCenter::new(
                parse_token(tokens.next(), line_no)?,
                parse_token(tokens.next(), line_no)?,
                parse_token(tokens.next(), line_no)?,
            );
            if center.row >= grid.size() || center.col >= grid.size() {
                return Err(GridError::CenterOutOfBounds {
                    row:  center.row,
                    col:  center.col,
                    size: grid.size(),
                });
            }
            centers.push(center);
            last_line = line_no;
        }
    }

    Ok((grid, centers))
}

/// Reads a region description from `path`.
pub fn read_grid(path: &Path) -> Result<(Grid, Vec<CommunityCenter>)> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read grid file {}", path.display()))?;
    parse_grid(&contents).with_context(|| format!("Invalid grid file {}", path.display()))
}
