use std::path::PathBuf;

use datalabs::language::{
    CommunityCenter, Frequencies, Grid, GridError, LanguageState, Simulation, Thresholds,
    engagement, parse_grid, read_grid, run_simulation, simulation_sweep,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("language")
        .join(name)
}

fn thresholds(b: f64) -> Thresholds {
    Thresholds::new(0.6, b, 1.6)
}

#[test]
fn reads_grid_without_centers() {
    let (grid, centers) = read_grid(&fixture("small.txt")).expect("read grid");
    assert_eq!(grid.size(), 2);
    assert_eq!(grid.get((1, 1)), LanguageState::Dominant);
    assert_eq!(grid.get((0, 1)), LanguageState::Heritage);
    assert!(centers.is_empty());
    assert_eq!(grid.to_string(), "2 2\n2 0\n");
}

#[test]
fn reads_grid_with_centers() {
    let (grid, centers) = read_grid(&fixture("centered.txt")).expect("read grid");
    assert_eq!(grid.size(), 3);
    assert_eq!(centers, vec![CommunityCenter::new(1, 1, 0)]);
}

#[test]
fn truncated_grid_reports_the_missing_line() {
    let contents = std::fs::read_to_string(fixture("truncated.txt")).expect("read fixture");
    assert_eq!(parse_grid(&contents).unwrap_err(), GridError::UnexpectedEnd(4));
}

#[test]
fn rejects_unknown_states_and_far_centers() {
    assert!(matches!(
        parse_grid("1\n3\n").unwrap_err(),
        GridError::InvalidState(_)
    ));
    assert_eq!(
        parse_grid("2\n0 0\n0 0\n1\n2 0 1\n").unwrap_err(),
        GridError::CenterOutOfBounds {
            row:  2,
            col:  0,
            size: 2,
        }
    );
    assert!(matches!(
        parse_grid("2\n0 x\n0 0\n").unwrap_err(),
        GridError::Malformed { line: 2, .. }
    ));
}

#[test]
fn engagement_is_clipped_to_the_region() {
    let grid = Grid::from_rows(vec![vec![0, 0, 0], vec![0, 2, 0], vec![0, 0, 0]]).unwrap();
    assert!((engagement(&grid, (0, 0), 1) - 0.5).abs() < 1e-12);
    assert!((engagement(&grid, (1, 1), 1) - 2.0 / 9.0).abs() < 1e-12);
    assert!((engagement(&grid, (1, 1), 0) - 2.0).abs() < 1e-12);
}

#[test]
fn one_step_updates_in_place() {
    let (mut grid, centers) = read_grid(&fixture("small.txt")).unwrap();
    let freqs = run_simulation(&mut grid, 1, thresholds(0.8), &centers, 1);
    assert_eq!(freqs.as_tuple(), (0, 1, 3));
    assert_eq!(grid.get((1, 1)), LanguageState::Bilingual);
}

#[test]
fn later_homes_see_earlier_updates() {
    let (mut grid, centers) = read_grid(&fixture("small.txt")).unwrap();
    let freqs = run_simulation(&mut grid, 1, thresholds(1.6), &centers, 1);
    assert_eq!(freqs.as_tuple(), (1, 3, 0));
}

#[test]
fn runs_until_max_steps() {
    let (mut grid, centers) = read_grid(&fixture("small.txt")).unwrap();
    let freqs = run_simulation(&mut grid, 1, thresholds(0.8), &centers, 2);
    assert_eq!(freqs.as_tuple(), (0, 0, 4));
}

#[test]
fn stops_once_stable() {
    let mut grid = Grid::from_rows(vec![vec![0; 4]; 4]).unwrap();
    let sim = Simulation::builder()
        .radius(2)
        .thresholds(thresholds(0.8))
        .max_steps(1_000)
        .build();
    assert!(!sim.step(&mut grid));
    assert_eq!(sim.run(&mut grid), Frequencies {
        dominant:  16,
        bilingual: 0,
        heritage:  0,
    });
}

#[test]
fn community_centers_preserve_heritage_homes() {
    let (grid, centers) = read_grid(&fixture("centered.txt")).unwrap();

    let mut without = grid.clone();
    assert_eq!(run_simulation(&mut without, 1, thresholds(0.8), &[], 1).as_tuple(), (9, 0, 0));

    let mut with = grid;
    assert_eq!(run_simulation(&mut with, 1, thresholds(0.8), &centers, 1).as_tuple(), (8, 0, 1));
    assert_eq!(with.get((1, 1)), LanguageState::Heritage);
}

#[test]
fn sweep_runs_each_b_on_a_fresh_copy() {
    let (grid, centers) = read_grid(&fixture("small.txt")).unwrap();
    let freqs = simulation_sweep(&grid, 1, 0.6, &[0.8, 1.6], 1.6, &centers, 1);

    let tuples: Vec<_> = freqs.iter().map(Frequencies::as_tuple).collect();
    assert_eq!(tuples, vec![(0, 1, 3), (1, 3, 0)]);
    assert_eq!(grid.to_string(), "2 2\n2 0\n");
}

#[test]
fn frequencies_display_as_a_tuple() {
    let grid = Grid::from_rows(vec![vec![0, 1], vec![2, 2]]).unwrap();
    assert_eq!(Frequencies::of(&grid).to_string(), "(1, 1, 2)");
}
