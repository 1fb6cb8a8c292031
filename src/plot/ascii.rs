//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - data points: `o`
//! - connecting / fitted line: `-`
//! - optimum marker: `*`

use crate::domain::OptimizationResult;

/// Render-only description of one chart.
struct Chart<'a> {
    title: String,
    x_label: &'a str,
    y_label: &'a str,
    points: &'a [(f64, f64)],
    line: &'a [(f64, f64)],
    highlight: Option<(f64, f64)>,
    fmt_y: fn(f64) -> String,
}

/// MRS against Q, optimum starred. Degenerate candidates are not plotted.
pub fn render_mrs_chart(result: &OptimizationResult, width: usize, height: usize) -> String {
    let points = result.mrs_points();
    render_plot(
        &Chart {
            title: "MRS vs Q".to_string(),
            x_label: "Q",
            y_label: "MRS",
            points: &points,
            line: &points,
            highlight: Some((result.optimal_q, result.minimum_mrs)),
            fmt_y: |v| format!("{v:.4e}"),
        },
        width,
        height,
    )
}

/// Response against `ln θ` at the optimal Q, with the fitted line.
pub fn render_master_curve_chart(result: &OptimizationResult, width: usize, height: usize) -> String {
    let points = result.master_curve_points();
    let line = match x_range(&points) {
        Some((x0, x1)) => vec![
            (x0, result.slope * x0 + result.intercept),
            (x1, result.slope * x1 + result.intercept),
        ],
        None => Vec::new(),
    };
    render_plot(
        &Chart {
            title: format!("Master curve (optimal Q = {})", result.optimal_q),
            x_label: "ln(theta)",
            y_label: "response",
            points: &points,
            line: &line,
            highlight: None,
            fmt_y: |v| format!("{v:.4}"),
        },
        width,
        height,
    )
}

fn render_plot(chart: &Chart<'_>, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let all: Vec<(f64, f64)> = chart.points.iter().chain(chart.line.iter()).copied().collect();
    let (x_min, x_max) = x_range(&all).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(&all).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw line first (so points can overlay).
    draw_polyline(&mut grid, chart.line, x_min, x_max, y_min, y_max);

    for &(x, y) in chart.points {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        grid[map_y(y, y_min, y_max, height)][map_x(x, x_min, x_max, width)] = 'o';
    }
    if let Some((x, y)) = chart.highlight {
        if x.is_finite() && y.is_finite() {
            grid[map_y(y, y_min, y_max, height)][map_x(x, x_min, x_max, width)] = '*';
        }
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "{}: {}=[{x_min:.3}, {x_max:.3}] | {}=[{}, {}]\n",
        chart.title,
        chart.x_label,
        chart.y_label,
        (chart.fmt_y)(y_min),
        (chart.fmt_y)(y_max),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// Finite x extent; a single x value is widened so it maps to the centre.
fn x_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let (min_x, max_x) = extent(points.iter().map(|p| p.0))?;
    if max_x > min_x {
        Some((min_x, max_x))
    } else {
        Some(pad_range(min_x, max_x, 0.0))
    }
}

fn y_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let (min_y, max_y) = extent(points.iter().map(|p| p.1))?;
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        Some(pad_range(min_y, max_y, 0.0))
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if min_v.is_finite() && max_v.is_finite() {
        Some((min_v, max_v))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 {
        (span * frac).max(1e-300)
    } else {
        (min.abs() * 0.01).max(1e-12)
    };
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], line: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in line {
        if !(x.is_finite() && y.is_finite()) {
            prev = None;
            continue;
        }
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, cx, cy, '-'),
            None => grid[cy][cx] = '-',
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Evaluation, LinearFit, QScore};

    fn result() -> OptimizationResult {
        let fit = |mrs| Evaluation::Fit(LinearFit { slope: 1.0, intercept: 0.0, mrs });
        OptimizationResult {
            optimal_q: 200.0,
            minimum_mrs: 0.0,
            slope: 1.0,
            intercept: 0.0,
            theta_at_optimal: vec![1.0, 2.0, 3.0],
            response: vec![1.0, 2.0, 3.0],
            sweep: vec![
                QScore { q: 100.0, outcome: fit(1.0) },
                QScore { q: 200.0, outcome: fit(0.0) },
                QScore { q: 300.0, outcome: Evaluation::Degenerate },
                QScore { q: 400.0, outcome: fit(2.0) },
            ],
        }
    }

    #[test]
    fn master_curve_golden_snapshot_small() {
        let txt = render_master_curve_chart(&result(), 10, 5);
        let expected = concat!(
            "Master curve (optimal Q = 200): ln(theta)=[1.000, 3.000] | response=[0.9000, 3.1000]\n",
            "        -o\n",
            "      --  \n",
            "    -o    \n",
            "  --      \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn mrs_chart_stars_optimum_and_skips_degenerate() {
        let txt = render_mrs_chart(&result(), 31, 7);
        let lines: Vec<&str> = txt.lines().collect();
        assert!(lines[0].starts_with("MRS vs Q: Q=[100.000, 400.000] | MRS="));
        assert_eq!(lines.len(), 8);
        assert_eq!(txt.matches('*').count(), 1);
        // The optimum sits on the bottom row at Q=200 (column 10 of 31).
        assert_eq!(lines[7].chars().nth(10), Some('*'));
        let grid: String = lines[1..].concat();
        assert_eq!(grid.matches('o').count(), 2);
    }

    #[test]
    fn single_point_does_not_panic() {
        let mut r = result();
        r.theta_at_optimal = vec![5.0];
        r.response = vec![0.5];
        let txt = render_master_curve_chart(&r, 10, 5);
        let grid: String = txt.lines().skip(1).collect();
        assert_eq!(grid.matches('o').count(), 1);
    }
}
