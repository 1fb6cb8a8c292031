//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads measurements (CSV, console, or synthetic)
//! - runs the Q sweep
//! - prints the report and charts
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, DemoArgs, FitArgs, OutputArgs, PlotArgs, SweepArgs};
use crate::data::SyntheticSpec;
use crate::domain::{InputSource, RunConfig};
use crate::error::{AppError, MscError};

pub mod pipeline;

/// Entry point for the `msc` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Fit(args) => handle_fit(run_config_from_fit_args(&args)?),
        Command::Demo(args) => handle_fit(run_config_from_demo_args(&args)?),
        Command::Plot(args) => handle_plot(args),
    }
}

/// Default filter `warn`; `-v` raises it to info, `-vv` to debug. `RUST_LOG` wins.
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

fn handle_fit(config: RunConfig) -> Result<(), AppError> {
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.series.stats(), &run.result)
    );

    if config.plot {
        println!(
            "{}",
            crate::plot::render_mrs_chart(&run.result, config.plot_width, config.plot_height)
        );
        println!(
            "{}",
            crate::plot::render_master_curve_chart(&run.result, config.plot_width, config.plot_height)
        );
    }

    // Optional exports.
    if let Some(path) = &config.svg {
        crate::plot::write_svg_charts(path, &run.result)?;
        log::info!("Wrote charts to {}", path.display());
    }
    if let Some(path) = &config.export_sweep {
        crate::io::write_sweep_csv(path, &run.result)?;
        log::info!("Wrote sweep table to {}", path.display());
    }
    if let Some(path) = &config.export_curve {
        crate::io::write_curve_csv(path, &run.result)?;
        log::info!("Wrote master curve to {}", path.display());
    }
    if let Some(path) = &config.export_json {
        crate::io::write_result_json(path, &run.series, &run.result)?;
        log::info!("Wrote result JSON to {}", path.display());
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let saved = crate::io::read_result_json(&args.result)?;

    print!("{}", crate::report::format_optimum(&saved.result));
    println!();
    println!(
        "{}",
        crate::plot::render_mrs_chart(&saved.result, args.width, args.height)
    );
    println!(
        "{}",
        crate::plot::render_master_curve_chart(&saved.result, args.width, args.height)
    );

    if let Some(path) = &args.svg {
        crate::plot::write_svg_charts(path, &saved.result)?;
    }
    Ok(())
}

pub fn run_config_from_fit_args(args: &FitArgs) -> Result<RunConfig, AppError> {
    let input = match &args.input {
        Some(path) => InputSource::Csv(path.clone()),
        None => InputSource::Console,
    };
    run_config(input, &args.sweep, &args.output)
}

pub fn run_config_from_demo_args(args: &DemoArgs) -> Result<RunConfig, AppError> {
    let spec = SyntheticSpec {
        q0: args.q0,
        n_points: args.points,
        noise: args.noise,
        seed: args.seed,
        ..SyntheticSpec::default()
    };
    run_config(InputSource::Synthetic(spec), &args.sweep, &args.output)
}

fn run_config(input: InputSource, sweep: &SweepArgs, output: &OutputArgs) -> Result<RunConfig, AppError> {
    Ok(RunConfig {
        input,
        candidates: candidates_from_args(sweep)?,
        plot: !output.no_plot,
        plot_width: output.width,
        plot_height: output.height,
        svg: output.svg.clone(),
        export_sweep: output.export_sweep.clone(),
        export_curve: output.export_curve.clone(),
        export_json: output.export_json.clone(),
    })
}

/// Resolve the candidate Q set: explicit list, generated grid, or the default set.
pub fn candidates_from_args(args: &SweepArgs) -> Result<Vec<f64>, MscError> {
    let candidates = if !args.q.is_empty() {
        args.q.clone()
    } else if let (Some(min), Some(max)) = (args.q_min, args.q_max) {
        crate::fit::q_grid(min, max, args.q_steps, args.q_spacing)?
    } else {
        crate::fit::default_candidates()
    };
    crate::fit::validate_candidates(&candidates)?;
    Ok(candidates)
}
