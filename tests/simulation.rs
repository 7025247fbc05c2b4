use approx::assert_abs_diff_eq;
use glucosim::prelude::*;

const GRID_POINTS: usize = 1000;

fn params() -> BergmanParameters {
    BergmanParameters::default()
}

fn baseline_dataset() -> Dataset {
    Dataset::new(
        vec![0.0, 10.0, 20.0],
        vec![4.70, 4.70, 4.70],
        vec![18.02, 18.02, 18.02],
    )
    .unwrap()
}

fn step_dataset() -> Dataset {
    let gb = params().gb;
    Dataset::new(
        vec![0.0, 10.0, 10.01, 20.0],
        vec![gb, gb, gb, gb],
        vec![18.02, 18.02, 40.0, 40.0],
    )
    .unwrap()
}

#[test]
fn trajectory_has_one_state_per_grid_point() {
    let output = Simulation::new(baseline_dataset()).run().expect("run");
    let trajectory = &output.trajectory;

    assert_eq!(trajectory.len(), GRID_POINTS);
    assert_eq!(trajectory.times().len(), trajectory.glucose().len());
    assert_eq!(trajectory.times().len(), trajectory.action().len());
    assert_eq!(trajectory.times()[0], 0.0);
    assert_eq!(trajectory.times()[GRID_POINTS - 1], 20.0);
}

#[test]
fn baseline_start_is_a_numerical_fixed_point() {
    // At constant insulin = Ib the dynamics vanish at (Gb, 0); integrating
    // from there must not drift.
    let p = params();
    let insulin = InsulinInput::new(&[0.0, 10.0, 20.0], &[p.ib, p.ib, p.ib]).expect("insulin");
    let model = MinimalModel::new(p, insulin);
    let grid = time_grid(0.0, 20.0, GRID_POINTS);

    let trajectory = solve_grid(&model, (p.gb, 0.0), &grid).expect("solve");

    assert_eq!(trajectory.len(), grid.len());
    for (&g, &x) in trajectory.glucose().iter().zip(trajectory.action()) {
        assert_abs_diff_eq!(g, p.gb, epsilon = 1e-9);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-9);
    }
}

#[test]
fn constant_baseline_insulin_holds_glucose_near_basal() {
    // End-to-end run starting slightly below Gb: glucose relaxes toward the
    // basal level and remote insulin action stays at zero.
    let output = Simulation::new(baseline_dataset()).run().expect("run");
    let p = params();

    for (&g, &x) in output
        .trajectory
        .glucose()
        .iter()
        .zip(output.trajectory.action())
    {
        assert_abs_diff_eq!(g, p.gb, epsilon = 4e-3);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-6);
    }
    // monotone relaxation: the end of the run is closer to Gb than the start
    let first = output.trajectory.glucose()[0];
    let last = output.trajectory.glucose()[GRID_POINTS - 1];
    assert!((last - p.gb).abs() < (first - p.gb).abs());
}

#[test]
fn repeated_runs_are_identical() {
    let simulation = Simulation::new(baseline_dataset());
    let a = simulation.run().expect("first run");
    let b = simulation.run().expect("second run");

    assert_eq!(a.trajectory.times(), b.trajectory.times());
    assert_eq!(a.trajectory.glucose(), b.trajectory.glucose());
    assert_eq!(a.trajectory.action(), b.trajectory.action());
}

#[test]
fn insulin_step_raises_action_and_lowers_glucose() {
    let output = Simulation::new(step_dataset()).run().expect("run");
    let trajectory = &output.trajectory;
    let p = params();

    // before the step the system sits at its fixed point
    for i in 0..trajectory.len() {
        if trajectory.times()[i] <= 10.0 {
            assert_abs_diff_eq!(trajectory.glucose()[i], p.gb, epsilon = 1e-9);
            assert_abs_diff_eq!(trajectory.action()[i], 0.0, epsilon = 1e-9);
        }
    }

    // insulin above baseline drives X up monotonically
    for pair in trajectory.action().windows(2) {
        assert!(pair[1] >= pair[0] - 1e-9, "X not monotone: {:?}", pair);
    }
    let final_action = trajectory.action()[trajectory.len() - 1];
    assert!(final_action > 1e-4, "X barely moved: {final_action}");

    // and rising X pulls glucose below basal
    for i in 1..trajectory.len() {
        if trajectory.times()[i - 1] >= 11.0 {
            assert!(
                trajectory.glucose()[i] <= trajectory.glucose()[i - 1] + 1e-9,
                "G not decreasing at t = {}",
                trajectory.times()[i]
            );
        }
    }
    assert!(trajectory.glucose()[trajectory.len() - 1] < p.gb);
}

#[test]
fn custom_grid_reports_duplicates_consistently() {
    let grid = vec![0.0, 5.0, 5.0, 12.5, 20.0];
    let output = Simulation::new(baseline_dataset())
        .run_on_grid(&grid)
        .expect("run");
    let trajectory = &output.trajectory;

    assert_eq!(trajectory.len(), grid.len());
    assert_eq!(trajectory.times(), grid.as_slice());
    assert_eq!(trajectory.glucose()[1], trajectory.glucose()[2]);
    assert_eq!(trajectory.action()[1], trajectory.action()[2]);
}

#[test]
fn grid_may_extend_past_the_sampled_range() {
    // Outside the measured span the insulin input is clamped flat, so the
    // run remains well-defined past the last sample.
    let grid = time_grid(0.0, 30.0, 500);
    let output = Simulation::new(baseline_dataset())
        .run_on_grid(&grid)
        .expect("run");

    assert_eq!(output.trajectory.len(), 500);
    let p = params();
    let last = output.trajectory.glucose()[499];
    assert_abs_diff_eq!(last, p.gb, epsilon = 4e-3);
}

#[test]
fn empty_grid_is_rejected_before_integration() {
    let result = Simulation::new(baseline_dataset()).run_on_grid(&[]);
    assert!(matches!(
        result,
        Err(GlucosimError::DataShape(DataShapeError::EmptyGrid))
    ));
}

#[test]
fn decreasing_grid_is_rejected_before_integration() {
    let result = Simulation::new(baseline_dataset()).run_on_grid(&[0.0, 2.0, 1.0]);
    assert!(matches!(
        result,
        Err(GlucosimError::DataShape(DataShapeError::DecreasingGrid {
            index: 2,
            ..
        }))
    ));
}
