use antennasearch::config::BandObjective;
use antennasearch::engines::evaluation::bands::gain_metric;
use antennasearch::{extract_bands, AppConfig, Curve, FitnessEvaluator, FitnessScore, SimulationResult};

/// 16 samples from 2.0 GHz in 0.1 GHz steps with flat 2 dBi gain.
fn response_with_dips(s11: Vec<f64>) -> SimulationResult {
    let frequencies: Vec<f64> = (0..s11.len()).map(|i| 2.0 + i as f64 * 0.1).collect();
    let gain = vec![2.0; frequencies.len()];
    SimulationResult::new(
        Curve::new(frequencies.clone(), s11),
        Curve::new(frequencies, gain),
    )
}

fn two_dip_curve() -> Vec<f64> {
    let mut s11 = vec![-3.0; 16];
    s11[2] = -11.0;
    s11[3] = -15.0;
    s11[4] = -12.0;
    s11[10] = -10.5;
    s11[11] = -12.0;
    s11[12] = -11.0;
    s11[13] = -10.2;
    s11
}

#[test]
fn test_two_dips_give_two_ordered_bands() {
    let bands = extract_bands(&response_with_dips(two_dip_curve()));

    assert_eq!(bands.len(), 2);
    assert!((bands[0].f_min - 2.2).abs() < 1e-9);
    assert!((bands[0].f_max - 2.4).abs() < 1e-9);
    assert!((bands[1].f_min - 3.0).abs() < 1e-9);
    assert!((bands[1].f_max - 3.3).abs() < 1e-9);
    assert!(bands[0].f_max < bands[1].f_min);

    assert!((bands[0].s11_min_linear - 10f64.powf(-15.0 / 20.0)).abs() < 1e-12);
    assert!((bands[1].s11_min_linear - 10f64.powf(-12.0 / 20.0)).abs() < 1e-12);
    assert!((bands[0].gain_metric - gain_metric(2.0)).abs() < 1e-12);
}

#[test]
fn test_dual_band_design_scores_better_than_single_band() {
    let evaluator = FitnessEvaluator::new(vec![
        BandObjective::new(2.2, 2.4, 0.05),
        BandObjective::new(3.0, 3.3, 0.05),
    ])
    .unwrap();

    let dual = evaluator.evaluate(&response_with_dips(two_dip_curve()));

    let mut single_curve = two_dip_curve();
    for value in single_curve.iter_mut().skip(10) {
        *value = -3.0;
    }
    let single = evaluator.evaluate(&response_with_dips(single_curve));

    assert!(dual.s11 < single.s11);
    assert!(dual.gain < single.gain);
    // both bands matched exactly: only bandwidth rewards and gain remain
    let expected_s11 = 10f64.powf(-0.5) / 200.0 + 10f64.powf(-0.5) / 300.0;
    assert!((dual.s11 - expected_s11).abs() < 1e-6);
    assert!((dual.gain - 2.0 * gain_metric(2.0)).abs() < 1e-9);
}

#[test]
fn test_no_band_score_is_worse_than_any_band() {
    let evaluator = FitnessEvaluator::new(vec![BandObjective::new(2.36, 2.44, 0.023)]).unwrap();

    let flat = evaluator.evaluate(&response_with_dips(vec![-3.0; 16]));
    let off_target = evaluator.evaluate(&response_with_dips(two_dip_curve()));

    assert!(off_target.s11 < flat.s11);
    assert!(flat.within(&FitnessScore::new(f64::MAX, f64::MAX)));
}

#[test]
fn test_objectives_from_toml() {
    let config = AppConfig::load_from_str(
        r#"
        [objectives]
        bands = [
            { low = 2.2, high = 2.4, tolerance = 0.05 },
            { low = 3.0, high = 3.3, tolerance = 0.05 },
        ]
        "#,
    )
    .unwrap();

    let evaluator = FitnessEvaluator::new(config.objectives.bands.clone()).unwrap();
    assert_eq!(evaluator.objectives().len(), 2);
    assert_eq!(evaluator.objectives()[1], BandObjective::new(3.0, 3.3, 0.05));
}
