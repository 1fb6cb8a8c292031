//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{DatasetStats, Evaluation, OptimizationResult};
use crate::fit::select_best;

/// Format the full run summary (dataset stats + per-Q table + chosen Q).
pub fn format_run_summary(stats: &DatasetStats, result: &OptimizationResult) -> String {
    let mut out = String::new();

    out.push_str("=== msc - Master Sintering Curve fit ===\n");
    out.push_str(&format!(
        "Samples: n={} | time=[{:.3}, {:.3}] | temperature=[{:.2}, {:.2}] | response=[{:.4}, {:.4}]\n",
        stats.n_points,
        stats.time_min,
        stats.time_max,
        stats.temperature_min,
        stats.temperature_max,
        stats.response_min,
        stats.response_max,
    ));

    out.push('\n');
    out.push_str(&format_sweep_table(result));

    let degenerate = result.degenerate_count();
    if degenerate > 0 {
        out.push_str(&format!(
            "  ({degenerate} candidate(s) skipped: log theta constant across samples)\n"
        ));
    }

    out.push_str("\nMaster curve:\n");
    out.push_str(&format!(
        "- response = {:.6e} * ln(theta) + {:.6e}\n",
        result.slope, result.intercept
    ));
    out.push('\n');
    out.push_str(&format_optimum(result));

    out
}

/// The two result lines.
pub fn format_optimum(result: &OptimizationResult) -> String {
    format!(
        "Optimal Q value: {}\nMinimum MRS: {}\n",
        result.optimal_q, result.minimum_mrs
    )
}

/// Per-candidate table; the chosen row is starred.
pub fn format_sweep_table(result: &OptimizationResult) -> String {
    let mut out = String::new();
    out.push_str(format!("  {:>12} {:>16} {:>14} {:>14}\n", "Q", "MRS", "slope", "intercept").trim_end());
    out.push('\n');
    out.push_str(format!("  {:-<12} {:-<16} {:-<14} {:-<14}\n", "", "", "", "").trim_end());
    out.push('\n');

    let winner = select_best(&result.sweep);
    for (idx, score) in result.sweep.iter().enumerate() {
        let chosen = if winner == Some(idx) { "*" } else { " " };
        let line = match score.outcome {
            Evaluation::Fit(fit) => format!(
                "{chosen} {:>12} {:>16.6e} {:>14.6e} {:>14.6e}\n",
                fmt_q(score.q),
                fit.mrs,
                fit.slope,
                fit.intercept
            ),
            Evaluation::Degenerate => format!("{chosen} {:>12} {:>16}\n", fmt_q(score.q), "degenerate"),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn fmt_q(q: f64) -> String {
    if q.fract() == 0.0 && q.abs() < 1e15 {
        format!("{q:.0}")
    } else {
        format!("{q:.4}")
    }
}
