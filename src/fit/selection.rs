//! Optimal-Q selection.
//!
//! The sweep is a map-reduce:
//!
//! 1. map: score every candidate Q independently (parallel, via rayon)
//! 2. reduce: pick the minimum MRS among non-degenerate candidates; ties
//!    (bit-identical MRS) go to the earliest candidate in input order
//!
//! The reduce step runs sequentially over the order-preserving map output, so
//! the result does not depend on how rayon scheduled the evaluations.

use rayon::prelude::*;

use crate::domain::{Evaluation, MeasurementSeries, OptimizationResult, QScore};
use crate::error::MscError;
use crate::fit::fitter::evaluate;
use crate::fit::q_grid::validate_candidates;
use crate::math::log_theta_series;

/// Score every candidate, preserving input order.
pub fn sweep(candidates: &[f64], series: &MeasurementSeries) -> Result<Vec<QScore>, MscError> {
    validate_candidates(candidates)?;

    candidates
        .par_iter()
        .map(|&q| evaluate(q, series).map(|outcome| QScore { q, outcome }))
        .collect()
}

/// Index of the winning candidate, or `None` when every candidate is degenerate.
pub fn select_best(scores: &[QScore]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, score) in scores.iter().enumerate() {
        let Evaluation::Fit(fit) = score.outcome else {
            continue;
        };
        match best {
            // Strict comparison keeps the earliest index on ties.
            Some((_, best_mrs)) if fit.mrs >= best_mrs => {}
            _ => best = Some((idx, fit.mrs)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Sweep `candidates` and return the Q that best collapses the data.
pub fn optimize(candidates: &[f64], series: &MeasurementSeries) -> Result<OptimizationResult, MscError> {
    let scores = sweep(candidates, series)?;

    let Some(best_idx) = select_best(&scores) else {
        return Err(MscError::FitFailure {
            candidates: scores.len(),
        });
    };

    let best = scores[best_idx];
    let Evaluation::Fit(fit) = best.outcome else {
        return Err(MscError::FitFailure {
            candidates: scores.len(),
        });
    };

    let degenerate = scores.iter().filter(|s| s.outcome.is_degenerate()).count();
    log::info!(
        "Optimal Q = {} (MRS = {:.6e}) out of {} candidates ({} degenerate)",
        best.q,
        fit.mrs,
        scores.len(),
        degenerate
    );

    Ok(OptimizationResult {
        optimal_q: best.q,
        minimum_mrs: fit.mrs,
        slope: fit.slope,
        intercept: fit.intercept,
        theta_at_optimal: log_theta_series(series.time(), series.temperature(), best.q),
        response: series.response().to_vec(),
        sweep: scores,
    })
}

/// Validate raw slices, then run [`optimize`].
pub fn optimize_slices(
    candidates: &[f64],
    time: &[f64],
    temperature: &[f64],
    response: &[f64],
) -> Result<OptimizationResult, MscError> {
    let series = MeasurementSeries::from_slices(time, temperature, response)?;
    optimize(candidates, &series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LinearFit;
    use crate::math::log_theta;

    fn fit(mrs: f64) -> Evaluation {
        Evaluation::Fit(LinearFit {
            slope: 1.0,
            intercept: 0.0,
            mrs,
        })
    }

    fn synthetic(q0: f64) -> MeasurementSeries {
        let time = vec![2.0, 5.0, 10.0, 20.0, 40.0, 80.0];
        let temperature = vec![1050.0, 1100.0, 1180.0, 1230.0, 1320.0, 1400.0];
        let response = time
            .iter()
            .zip(&temperature)
            .map(|(&t, &temp)| 0.002 * log_theta(t, temp, q0) - 0.5)
            .collect();
        MeasurementSeries::new(time, temperature, response).unwrap()
    }

    #[test]
    fn select_best_prefers_lowest_mrs_then_lowest_index() {
        let scores = vec![
            QScore { q: 100.0, outcome: fit(0.5) },
            QScore { q: 200.0, outcome: fit(0.1) },
            QScore { q: 300.0, outcome: Evaluation::Degenerate },
            QScore { q: 400.0, outcome: fit(0.1) },
        ];
        assert_eq!(select_best(&scores), Some(1));
    }

    #[test]
    fn select_best_skips_degenerate_and_reports_none() {
        let all_bad = vec![
            QScore { q: 100.0, outcome: Evaluation::Degenerate },
            QScore { q: 200.0, outcome: Evaluation::Degenerate },
        ];
        assert_eq!(select_best(&all_bad), None);

        let first_bad = vec![
            QScore { q: 100.0, outcome: Evaluation::Degenerate },
            QScore { q: 200.0, outcome: fit(3.0) },
        ];
        assert_eq!(select_best(&first_bad), Some(1));
    }

    #[test]
    fn optimize_recovers_known_q() {
        let s = synthetic(250.0);
        let result = optimize(&crate::fit::default_candidates(), &s).unwrap();
        assert_eq!(result.optimal_q, 250.0);
        assert!(result.minimum_mrs < 1e-18, "mrs={}", result.minimum_mrs);
        assert_eq!(result.sweep.len(), 8);
        assert_eq!(result.theta_at_optimal.len(), s.len());
        assert!((result.theta_at_optimal[0] - log_theta(2.0, 1050.0, 250.0)).abs() < 1e-12);
        assert_eq!(result.response, s.response());
    }

    #[test]
    fn optimize_picks_nearest_candidate_when_q0_is_absent() {
        let s = synthetic(262.0);
        let result = optimize(&[100.0, 200.0, 250.0, 300.0, 400.0], &s).unwrap();
        assert_eq!(result.optimal_q, 250.0);
        assert!(result.minimum_mrs > 0.0);
    }

    #[test]
    fn optimize_is_independent_of_candidate_order() {
        let s = synthetic(300.0);
        let forward = optimize(&[100.0, 200.0, 300.0, 400.0], &s).unwrap();
        let reverse = optimize(&[400.0, 300.0, 200.0, 100.0], &s).unwrap();
        assert_eq!(forward.optimal_q, reverse.optimal_q);
        assert_eq!(forward.minimum_mrs, reverse.minimum_mrs);
    }

    #[test]
    fn optimize_is_deterministic_across_runs() {
        // Constant temperature makes every Q shift log theta by a constant, so
        // all MRS values coincide up to rounding.
        let s = MeasurementSeries::new(
            vec![10.0, 20.0, 30.0, 40.0],
            vec![1000.0; 4],
            vec![0.5, 0.6, 0.7, 0.8],
        )
        .unwrap();
        let candidates = [100.0, 200.0, 300.0, 400.0];
        let first = optimize(&candidates, &s).unwrap();
        for _ in 0..10 {
            let again = optimize(&candidates, &s).unwrap();
            assert_eq!(again.optimal_q, first.optimal_q);
            assert_eq!(again.minimum_mrs.to_bits(), first.minimum_mrs.to_bits());
        }
    }

    #[test]
    fn duplicate_candidates_tie_to_first_occurrence() {
        let s = synthetic(200.0);
        let result = optimize(&[200.0, 100.0, 200.0], &s).unwrap();
        assert_eq!(select_best(&result.sweep), Some(0));
        assert_eq!(result.sweep[0].outcome, result.sweep[2].outcome);
    }

    #[test]
    fn all_degenerate_is_fit_failure() {
        let err = optimize_slices(&[100.0, 200.0], &[10.0, 10.0, 10.0], &[1000.0; 3], &[0.5, 0.6, 0.7])
            .unwrap_err();
        assert_eq!(err, MscError::FitFailure { candidates: 2 });
    }

    #[test]
    fn length_mismatch_is_invalid_input() {
        let err = optimize_slices(&[100.0], &[1.0, 2.0, 3.0, 4.0], &[1000.0; 3], &[0.1; 4]).unwrap_err();
        assert!(matches!(err, MscError::InvalidInput(_)));
    }

    #[test]
    fn bad_candidates_are_invalid_input() {
        let s = synthetic(200.0);
        assert!(matches!(optimize(&[], &s), Err(MscError::InvalidInput(_))));
        assert!(matches!(optimize(&[100.0, 0.0], &s), Err(MscError::InvalidInput(_))));
    }
}
