//! Scoring of a single candidate Q.
//!
//! Given:
//! - times `t_i`
//! - temperatures `T_i`
//! - observed responses `y_i` (shrinkage / relative density)
//! - one candidate `Q`
//!
//! we compute `x_i = ln(t_i · T_i^Q)`, fit `y ≈ slope · x + intercept` by
//! ordinary least squares, and score the fit by its mean residual square.
//!
//! A candidate whose log θ values are all identical cannot be regressed on.
//! It is reported as [`Evaluation::Degenerate`] rather than an error, so one
//! bad Q never aborts a sweep.

use nalgebra::DVector;

use crate::domain::{Evaluation, LinearFit, MeasurementSeries};
use crate::error::MscError;
use crate::math::{fit_line, is_numerically_constant, log_theta_series};

/// Score one candidate Q against a validated series.
pub fn evaluate(q: f64, series: &MeasurementSeries) -> Result<Evaluation, MscError> {
    check_q(q)?;

    let theta = log_theta_series(series.time(), series.temperature(), q);
    if let Some(bad) = theta.iter().find(|v| !v.is_finite()) {
        return Err(MscError::NumericalFailure {
            q,
            detail: format!("log theta overflowed to {bad}"),
        });
    }
    if is_numerically_constant(&theta) {
        log::warn!(
            "All log theta values are identical for Q = {q} (n={}); skipping this Q value.",
            theta.len()
        );
        return Ok(Evaluation::Degenerate);
    }

    let x = DVector::from_vec(theta);
    let y = DVector::from_column_slice(series.response());

    // Distinct values can still centre to zero variance through rounding.
    let Some(line) = fit_line(&x, &y) else {
        log::warn!("log theta has zero variance for Q = {q}; skipping this Q value.");
        return Ok(Evaluation::Degenerate);
    };

    let mrs = line.mean_residual_square();
    if !(line.slope.is_finite() && line.intercept.is_finite() && mrs.is_finite()) {
        return Err(MscError::NumericalFailure {
            q,
            detail: format!(
                "non-finite regression (slope={}, intercept={}, mrs={mrs})",
                line.slope, line.intercept
            ),
        });
    }

    log::debug!(
        "Q = {q}: slope={:.6e} intercept={:.6e} mrs={mrs:.6e}",
        line.slope,
        line.intercept
    );

    Ok(Evaluation::Fit(LinearFit {
        slope: line.slope,
        intercept: line.intercept,
        mrs,
    }))
}

/// Validate raw slices, then score one candidate Q.
pub fn evaluate_slices(
    q: f64,
    time: &[f64],
    temperature: &[f64],
    response: &[f64],
) -> Result<Evaluation, MscError> {
    let series = MeasurementSeries::from_slices(time, temperature, response)?;
    evaluate(q, &series)
}

fn check_q(q: f64) -> Result<(), MscError> {
    if q.is_finite() && q > 0.0 {
        Ok(())
    } else {
        Err(MscError::invalid(format!("Q = {q} (must be finite and > 0)")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::log_theta;

    fn series(time: &[f64], temperature: &[f64], response: &[f64]) -> MeasurementSeries {
        MeasurementSeries::from_slices(time, temperature, response).unwrap()
    }

    /// Heating schedule with both time and temperature varying.
    fn schedule() -> (Vec<f64>, Vec<f64>) {
        let time = vec![5.0, 10.0, 20.0, 40.0, 60.0, 90.0, 120.0];
        let temperature = vec![1100.0, 1150.0, 1200.0, 1250.0, 1300.0, 1350.0, 1400.0];
        (time, temperature)
    }

    fn residuals(s: &MeasurementSeries, q: f64, fit: &LinearFit) -> Vec<(f64, f64)> {
        s.time()
            .iter()
            .zip(s.temperature())
            .zip(s.response())
            .map(|((&t, &temp), &y)| {
                let x = log_theta(t, temp, q);
                (x, y - (fit.slope * x + fit.intercept))
            })
            .collect()
    }

    #[test]
    fn exact_affine_response_scores_zero() {
        let (time, temperature) = schedule();
        let q0 = 20.0;
        let response: Vec<f64> = time
            .iter()
            .zip(&temperature)
            .map(|(&t, &temp)| 0.01 * log_theta(t, temp, q0) - 1.2)
            .collect();

        let s = series(&time, &temperature, &response);
        let eval = evaluate(q0, &s).unwrap();
        let fit = eval.fit().copied().unwrap();
        assert!(fit.mrs < 1e-20, "mrs={}", fit.mrs);
        assert!((fit.slope - 0.01).abs() < 1e-9);
    }

    #[test]
    fn mrs_is_positive_when_response_is_not_affine() {
        let (time, temperature) = schedule();
        let response = vec![0.10, 0.30, 0.25, 0.60, 0.55, 0.80, 0.78];
        let s = series(&time, &temperature, &response);

        for q in [1.0, 10.0, 100.0, 450.0] {
            let mrs = evaluate(q, &s).unwrap().mrs();
            assert!(mrs.is_finite());
            assert!(mrs > 0.0, "q={q} mrs={mrs}");
        }
    }

    #[test]
    fn residuals_sum_to_zero_and_are_orthogonal_to_theta() {
        let (time, temperature) = schedule();
        let response = vec![0.10, 0.30, 0.25, 0.60, 0.55, 0.80, 0.78];
        let s = series(&time, &temperature, &response);
        let q = 3.0;

        let fit = evaluate(q, &s).unwrap().fit().copied().unwrap();
        let r = residuals(&s, q, &fit);
        let sum: f64 = r.iter().map(|(_, e)| e).sum();
        let x_mean = r.iter().map(|(x, _)| x).sum::<f64>() / r.len() as f64;
        // Orthogonality is checked on centred theta to keep the tolerance meaningful.
        let dot: f64 = r.iter().map(|(x, e)| (x - x_mean) * e).sum();
        let raw_dot: f64 = r.iter().map(|(x, e)| x * e).sum();
        assert!(sum.abs() < 1e-10, "sum={sum}");
        assert!(dot.abs() < 1e-10, "dot={dot}");
        assert!(raw_dot.abs() < 1e-7, "raw_dot={raw_dot}");

        let direct_mrs = r.iter().map(|(_, e)| e * e).sum::<f64>() / r.len() as f64;
        assert!((direct_mrs - fit.mrs).abs() < 1e-12);
    }

    #[test]
    fn constant_time_and_temperature_is_degenerate() {
        let s = series(&[10.0, 10.0, 10.0], &[1000.0, 1000.0, 1000.0], &[0.5, 0.6, 0.7]);
        for q in [100.0, 200.0] {
            let eval = evaluate(q, &s).unwrap();
            assert_eq!(eval, Evaluation::Degenerate);
            assert!(eval.mrs().is_infinite() && eval.mrs() > 0.0);
            assert!(!eval.mrs().is_nan());
        }
    }

    #[test]
    fn single_sample_is_degenerate() {
        let s = series(&[10.0], &[1000.0], &[0.5]);
        assert_eq!(evaluate(100.0, &s).unwrap(), Evaluation::Degenerate);
    }

    #[test]
    fn constant_temperature_with_varying_time_still_fits() {
        let s = series(
            &[10.0, 20.0, 30.0, 40.0],
            &[1000.0, 1000.0, 1000.0, 1000.0],
            &[0.5, 0.6, 0.7, 0.8],
        );
        let eval = evaluate(100.0, &s).unwrap();
        assert!(eval.fit().is_some());
        assert!(eval.mrs().is_finite());
    }

    #[test]
    fn overflowing_log_theta_is_numerical_failure() {
        let err = evaluate_slices(1e308, &[10.0, 20.0], &[1000.0, 1100.0], &[0.1, 0.2]).unwrap_err();
        assert!(matches!(err, MscError::NumericalFailure { q, .. } if q == 1e308), "{err}");
        assert!(err.to_string().contains("overflowed"), "{err}");

        let err = crate::fit::optimize(&[1e308], &series(&[10.0, 20.0], &[1000.0, 1100.0], &[0.1, 0.2]))
            .unwrap_err();
        assert!(matches!(err, MscError::NumericalFailure { .. }));
    }

    #[test]
    fn unrepresentable_mrs_is_numerical_failure() {
        // Residuals near 1e160 give a mean square near 1e320, beyond f64.
        let s = series(
            &[10.0, 20.0, 30.0, 40.0],
            &[1000.0, 1100.0, 1200.0, 1300.0],
            &[1e160, -1e160, 1e160, -1e160],
        );
        let err = evaluate(100.0, &s).unwrap_err();
        assert!(matches!(err, MscError::NumericalFailure { .. }), "{err}");
        assert!(err.to_string().contains("mrs=inf"), "{err}");
    }

    mod capture {
        use std::cell::RefCell;

        use log::{Level, LevelFilter, Log, Metadata, Record};

        thread_local! {
            static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
        }

        struct Capture;

        impl Log for Capture {
            fn enabled(&self, _: &Metadata) -> bool {
                true
            }

            fn log(&self, record: &Record) {
                RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
            }

            fn flush(&self) {}
        }

        static LOGGER: Capture = Capture;

        /// Records logged on this thread while `f` runs.
        pub fn records(f: impl FnOnce()) -> Vec<(Level, String)> {
            // Another test may have installed it already.
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(LevelFilter::Trace);
            RECORDS.with(|r| r.borrow_mut().clear());
            f();
            RECORDS.with(|r| r.borrow_mut().drain(..).collect())
        }
    }

    #[test]
    fn degenerate_q_logs_a_warning() {
        let s = series(&[10.0, 10.0, 10.0], &[1000.0, 1000.0, 1000.0], &[0.5, 0.6, 0.7]);
        let logged = capture::records(|| {
            assert_eq!(evaluate(125.0, &s).unwrap(), Evaluation::Degenerate);
        });
        let warnings: Vec<&String> = logged
            .iter()
            .filter(|(level, _)| *level == log::Level::Warn)
            .map(|(_, msg)| msg)
            .collect();
        assert_eq!(warnings.len(), 1, "{logged:?}");
        assert!(warnings[0].contains("Q = 125"), "{}", warnings[0]);
        assert!(warnings[0].contains("skipping"), "{}", warnings[0]);
    }

    #[test]
    fn regular_fit_logs_no_warning() {
        let s = series(&[10.0, 20.0, 30.0], &[1000.0, 1100.0, 1200.0], &[0.5, 0.6, 0.7]);
        let logged = capture::records(|| {
            assert!(evaluate(125.0, &s).unwrap().fit().is_some());
        });
        assert!(logged.iter().all(|(level, _)| *level != log::Level::Warn), "{logged:?}");
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let err = evaluate_slices(100.0, &[1.0, 2.0, 3.0, 4.0], &[1000.0, 1000.0, 1000.0], &[0.1; 4])
            .unwrap_err();
        assert!(matches!(err, MscError::InvalidInput(_)));

        assert!(evaluate_slices(100.0, &[], &[], &[]).is_err());
        assert!(evaluate_slices(100.0, &[1.0, 0.0], &[1000.0, 1000.0], &[0.1, 0.2]).is_err());
        assert!(evaluate_slices(100.0, &[1.0, 2.0], &[1000.0, -1.0], &[0.1, 0.2]).is_err());

        let s = series(&[1.0, 2.0], &[1000.0, 1100.0], &[0.1, 0.2]);
        assert!(matches!(evaluate(0.0, &s), Err(MscError::InvalidInput(_))));
        assert!(matches!(evaluate(f64::NAN, &s), Err(MscError::InvalidInput(_))));
    }
}
