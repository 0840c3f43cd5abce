use approx::assert_relative_eq;
use integration_tests::{LakeParams, STRIP_COL, init_logger, line_load_dem};
use lakeflex_models::flexure::{ElasticPlate, LocalIsostasy};
use lakeflex_solvers::equilibrium::{Event, LakeFlexer, Status};
use ndarray::Array2;

fn elastic_flexer(params: &LakeParams) -> LakeFlexer<ElasticPlate> {
    let (grid, elevation) = line_load_dem();
    let mut flexer = LakeFlexer::new(ElasticPlate::new());
    flexer
        .initialize(params.config().unwrap(), grid, &elevation)
        .unwrap();
    flexer
}

#[test]
fn line_load_converges() {
    init_logger();
    let params = LakeParams::default();
    let mut flexer = elastic_flexer(&params);

    let state = flexer.update().unwrap();

    assert_eq!(state.status, Status::Converged);
    assert!(state.warning.is_none());
    assert!(state.evaluations > 1);
    assert!(state.residual.unwrap() < params.lake_elev_tolerance);

    // The lake surface sits at the target level over the trough.
    let depth = flexer.water_depth().unwrap();
    let flexed = flexer.flexed_surface().unwrap();
    for row in 0..9 {
        let level = flexed[[row, STRIP_COL]] + depth[[row, STRIP_COL]];
        assert_relative_eq!(level, 0.0, epsilon = 1e-6);
    }
}

#[test]
fn deflection_peaks_at_the_strip_and_decays_symmetrically() {
    let mut flexer = elastic_flexer(&LakeParams::default());
    flexer.update().unwrap();
    let w = flexer.deflection().unwrap();

    let (peak, _) = argmax(w);
    assert_eq!(peak, [4, STRIP_COL]);

    for row in 0..9 {
        let (col, _) = w
            .row(row)
            .indexed_iter()
            .fold((0, f64::NEG_INFINITY), |best, (col, &v)| {
                if v > best.1 { (col, v) } else { best }
            });
        assert_eq!(col, STRIP_COL, "row {row}");

        for k in 1..=4 {
            assert_relative_eq!(
                w[[row, STRIP_COL - k]],
                w[[row, STRIP_COL + k]],
                max_relative = 1e-9
            );
            assert!(w[[row, STRIP_COL + k]] < w[[row, STRIP_COL + k - 1]]);
        }
        assert_relative_eq!(w[[row, 0]], w[[8 - row, 0]], max_relative = 1e-9);
    }

    // The plate spreads the load, so even dry nodes subside.
    assert!(w.iter().all(|&v| v > 0.0));
}

#[test]
fn elastic_plate_sinks_less_than_local_isostasy() {
    let params = LakeParams::default();
    let (grid, elevation) = line_load_dem();
    let mut airy = LakeFlexer::new(LocalIsostasy);
    airy.initialize(params.config().unwrap(), grid, &elevation)
        .unwrap();
    airy.update().unwrap();

    let mut elastic = elastic_flexer(&params);
    elastic.update().unwrap();

    // Without strength the trough deepens to d0 / (1 − ρw / ρm).
    let airy_depth = 10.0 / (1.0 - 1000.0 / 3300.0);
    assert_relative_eq!(
        airy.water_depth().unwrap()[[4, STRIP_COL]],
        airy_depth,
        epsilon = 1e-5
    );
    assert_relative_eq!(airy.deflection().unwrap()[[4, 0]], 0.0);

    let elastic_depth = elastic.water_depth().unwrap()[[4, STRIP_COL]];
    assert!(elastic_depth > 10.0);
    assert!(elastic_depth < airy_depth);
}

#[test]
fn fields_stay_physical_on_every_evaluation() {
    let params = LakeParams::default();
    let mut flexer = elastic_flexer(&params);
    let gradient = params.lake_water_density * params.gravitational_acceleration;

    let mut residuals = Vec::new();
    flexer
        .update_observed(|event: &Event<'_>| {
            residuals.push(event.residual);
            assert!(event.water_depth.iter().all(|&d| d >= 0.0));
            for (&d, &p) in event.water_depth.iter().zip(event.load) {
                if d == 0.0 {
                    assert_eq!(p, 0.0);
                } else {
                    assert_relative_eq!(p, gradient * d, max_relative = 1e-12);
                }
            }
            assert_eq!(event.wet_nodes, 9);
        })
        .unwrap();

    assert!(residuals.windows(2).all(|pair| pair[1] < pair[0]));
}

#[test]
fn dry_terrain_converges_after_one_evaluation() {
    let params = LakeParams {
        water_surface_elevation: -50.0,
        ..LakeParams::default()
    };
    let mut flexer = elastic_flexer(&params);

    let state = flexer.update().unwrap();

    assert_eq!(state.status, Status::Converged);
    assert_eq!(state.evaluations, 1);
    assert_eq!(state.residual, Some(0.0));
    assert!(flexer.water_depth().unwrap().iter().all(|&d| d == 0.0));
    assert!(flexer.deflection().unwrap().iter().all(|&w| w == 0.0));
    assert_eq!(
        flexer.flexed_surface().unwrap(),
        flexer.base_surface().unwrap()
    );
}

#[test]
fn unreachable_tolerance_stops_at_the_cap() {
    init_logger();
    let params = LakeParams {
        lake_elev_tolerance: 1e-12,
        max_iterations: Some(3),
        ..LakeParams::default()
    };
    let mut flexer = elastic_flexer(&params);

    let state = flexer.update().unwrap();

    assert_eq!(state.status, Status::MaxItersExceeded);
    assert_eq!(state.evaluations, 4);
    let warning = state.warning.unwrap();
    assert_eq!(warning.evaluations, 4);
    assert!(warning.residual > 1e-12);

    let results = flexer.finalize().unwrap();
    assert!(results.warning().is_some());
    assert!(results.deflection[[4, STRIP_COL]] > 0.0);
}

#[test]
fn rerunning_a_converged_solution_barely_moves_it() {
    let params = LakeParams::default();
    let mut flexer = elastic_flexer(&params);
    flexer.update().unwrap();
    let before = flexer.flexed_surface().unwrap().clone();

    let state = flexer.update().unwrap();

    assert_eq!(state.status, Status::Converged);
    let after = flexer.flexed_surface().unwrap();
    let shift = (after - &before).mapv(f64::abs);
    assert!(shift.iter().all(|&s| s < params.lake_elev_tolerance));
}

fn argmax(values: &Array2<f64>) -> ([usize; 2], f64) {
    values
        .indexed_iter()
        .fold(([0, 0], f64::NEG_INFINITY), |best, ((r, c), &v)| {
            if v > best.1 { ([r, c], v) } else { best }
        })
}
