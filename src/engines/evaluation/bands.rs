use crate::types::{Band, SimulationResult};

/// Return loss at or below this level (dB) counts as a usable band.
pub const RETURN_LOSS_THRESHOLD_DB: f64 = -10.0;

/// Gain assumed for a band with no gain samples inside it (dB).
pub const WORST_GAIN_DB: f64 = -80.0;

/// `1 / 10^(gain_dB / 10)`: lower is better, matching the minimised objectives.
pub fn gain_metric(gain_db: f64) -> f64 {
    1.0 / 10f64.powf(gain_db / 10.0)
}

pub fn worst_gain_metric() -> f64 {
    gain_metric(WORST_GAIN_DB)
}

/// Finds every band in the return-loss curve, in ascending frequency order.
///
/// A band opens at a sample `<= -10 dB` and extends while the following
/// sample stays `< -10 dB`. Gain samples are attributed to a band when their
/// frequency lies in `[f_min, f_max]`.
pub fn extract_bands(result: &SimulationResult) -> Vec<Band> {
    let freq = &result.return_loss.frequencies;
    let s11 = &result.return_loss.values;
    let n = freq.len().min(s11.len());

    let mut bands = Vec::new();
    let mut index = 0;
    while index < n {
        if s11[index] <= RETURN_LOSS_THRESHOLD_DB {
            let start = index;
            let mut minimum = s11[index];
            while index + 1 < n && s11[index + 1] < RETURN_LOSS_THRESHOLD_DB {
                index += 1;
                minimum = minimum.min(s11[index]);
            }

            let f_min = freq[start];
            let f_max = freq[index];
            bands.push(Band {
                f_min,
                f_max,
                s11_min_linear: 10f64.powf(minimum / 20.0),
                gain_metric: band_gain_metric(result, f_min, f_max),
            });
        }
        index += 1;
    }
    bands
}

fn band_gain_metric(result: &SimulationResult, f_min: f64, f_max: f64) -> f64 {
    let (sum, count) = result
        .gain
        .frequencies
        .iter()
        .zip(&result.gain.values)
        .filter(|(f, _)| f_min <= **f && **f <= f_max)
        .fold((0.0, 0usize), |(sum, count), (_, g)| (sum + g, count + 1));

    if count > 0 {
        gain_metric(sum / count as f64)
    } else {
        worst_gain_metric()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Curve;

    fn response(s11: Vec<f64>, gain: Vec<(f64, f64)>) -> SimulationResult {
        let freq = (0..s11.len()).map(|i| 1.0 + i as f64 * 0.1).collect();
        let (gf, gv) = gain.into_iter().unzip();
        SimulationResult::new(Curve::new(freq, s11), Curve::new(gf, gv))
    }

    #[test]
    fn test_two_disjoint_dips() {
        let mut s11 = vec![-3.0; 16];
        s11[2] = -11.0;
        s11[3] = -15.0;
        s11[4] = -10.5;
        s11[10] = -10.0;
        s11[11] = -11.0;
        s11[12] = -12.0;
        s11[13] = -10.2;
        let bands = extract_bands(&response(s11, vec![]));

        assert_eq!(bands.len(), 2);
        assert!((bands[0].f_min - 1.2).abs() < 1e-12);
        assert!((bands[0].f_max - 1.4).abs() < 1e-12);
        assert!((bands[0].s11_min_linear - 10f64.powf(-15.0 / 20.0)).abs() < 1e-12);
        assert!((bands[1].f_min - 2.0).abs() < 1e-12);
        assert!((bands[1].f_max - 2.3).abs() < 1e-12);
        assert!((bands[1].s11_min_linear - 10f64.powf(-12.0 / 20.0)).abs() < 1e-12);
        assert!(bands[0].f_max < bands[1].f_min);
    }

    #[test]
    fn test_exact_threshold_does_not_extend_band() {
        // -10 opens a band but only strictly-below samples extend it
        let s11 = vec![-3.0, -12.0, -10.0, -14.0, -3.0];
        let bands = extract_bands(&response(s11, vec![]));
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].bandwidth(), 0.0);
    }

    #[test]
    fn test_minimum_includes_last_sample() {
        let s11 = vec![-3.0, -11.0, -12.0, -20.0, -3.0];
        let bands = extract_bands(&response(s11, vec![]));
        assert_eq!(bands.len(), 1);
        assert!((bands[0].s11_min_linear - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_gain_averaged_inside_band() {
        let s11 = vec![-3.0, -11.0, -12.0, -3.0];
        let gain = vec![(1.0, 100.0), (1.1, 2.0), (1.2, 4.0), (1.3, 100.0)];
        let bands = extract_bands(&response(s11, gain));
        assert_eq!(bands.len(), 1);
        assert!((bands[0].gain_metric - gain_metric(3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_missing_gain_uses_sentinel() {
        let s11 = vec![-3.0, -11.0, -3.0];
        let bands = extract_bands(&response(s11, vec![(5.0, 3.0)]));
        assert!((bands[0].gain_metric - 1e8).abs() < 1e-3);
    }
}
