//! SVG chart export.
//!
//! Two panels side by side:
//! - left: MRS against Q, optimum highlighted
//! - right: response against `ln θ` at the optimal Q, with the fitted line
//!
//! All series and bounds are computed before drawing so the Plotters code
//! stays focused on layout.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::domain::OptimizationResult;
use crate::error::AppError;

const PANEL_WIDTH: u32 = 800;
const PANEL_HEIGHT: u32 = 800;

/// Write both charts to an SVG file.
pub fn write_svg_charts(path: &Path, result: &OptimizationResult) -> Result<(), AppError> {
    draw_charts(path, result)
        .map_err(|e| AppError::new(2, format!("Failed to render SVG '{}': {e}", path.display())))
}

fn draw_charts(path: &Path, result: &OptimizationResult) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, (PANEL_WIDTH * 2, PANEL_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(PANEL_WIDTH as i32);

    // MRS vs Q.
    let mrs_points = result.mrs_points();
    let (x0, x1) = padded_bounds(mrs_points.iter().map(|p| p.0));
    let (y0, y1) = padded_bounds(mrs_points.iter().map(|p| p.1));
    let mut chart = ChartBuilder::on(&left)
        .caption("MRS vs Q Value", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x0..x1, y0..y1)?;
    chart
        .configure_mesh()
        .x_desc("Q Value")
        .y_desc("Mean Residual Square")
        .y_label_formatter(&|v| format!("{v:.2e}"))
        .draw()?;
    chart
        .draw_series(LineSeries::new(mrs_points.iter().copied(), &BLUE))?
        .label("MRS vs Q")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart.draw_series(mrs_points.iter().map(|&p| Circle::new(p, 4, BLUE.filled())))?;
    chart
        .draw_series(std::iter::once(Circle::new(
            (result.optimal_q, result.minimum_mrs),
            6,
            RED.filled(),
        )))?
        .label(format!("Optimal Q = {}", result.optimal_q))
        .legend(|(x, y)| Circle::new((x + 10, y), 4, RED.filled()));
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    // Master curve.
    let curve_points = result.master_curve_points();
    let (cx0, cx1) = padded_bounds(curve_points.iter().map(|p| p.0));
    let fitted = [
        (cx0, result.slope * cx0 + result.intercept),
        (cx1, result.slope * cx1 + result.intercept),
    ];
    let (cy0, cy1) = padded_bounds(curve_points.iter().chain(fitted.iter()).map(|p| p.1));
    let mut chart = ChartBuilder::on(&right)
        .caption("Relative Density vs Log(θ(t,T(t)))", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(cx0..cx1, cy0..cy1)?;
    chart
        .configure_mesh()
        .x_desc("Log(θ(t,T(t)))")
        .y_desc("Relative Density")
        .draw()?;
    chart
        .draw_series(LineSeries::new(curve_points.iter().copied(), &BLUE))?
        .label(format!("Optimal Q = {}", result.optimal_q))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart.draw_series(curve_points.iter().map(|&p| Circle::new(p, 4, BLUE.filled())))?;
    chart
        .draw_series(LineSeries::new(fitted, &RED))?
        .label("Least-squares fit")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Finite extent padded by 5%; degenerate extents are widened around the value.
fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { (lo.abs() * 0.01).max(1e-12) };
    (lo - pad, hi + pad)
}
