use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use itertools::izip;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use polynomial_regression_fuw::plots::{
    plot_scatter_with_curve, save_series_svg, GradientDescentTrace,
};
use polynomial_regression_fuw::{logging, Dataset, GradientDescentConfig, PolynomialRegression};

const ETAS: [f64; 4] = [1e-4, 1e-3, 1e-2, 0.0407];

const SYNTHETIC_COEFFICIENTS: [f64; 4] = [2., -12., 25., -14.];
const SYNTHETIC_NOISE: f64 = 0.3;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "data/regression_train.csv")]
    train: PathBuf,

    #[arg(long, default_value = "data/regression_test.csv")]
    test: PathBuf,

    /// Generate this many noisy points per set instead of reading the csv files.
    #[arg(long)]
    synthetic: Option<usize>,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 10)]
    max_degree: usize,

    #[arg(long, default_value = "plots/poly_fit")]
    plots_dir: PathBuf,

    /// Render gradient descent progress for eta = 0.01.
    #[arg(long)]
    trace: bool,

    /// With --trace, also write a frame every this many iterations.
    #[arg(long)]
    trace_every: Option<usize>,
}

fn load_datasets(args: &Args) -> Result<(Dataset, Dataset), Box<dyn std::error::Error>> {
    match args.synthetic {
        Some(n) => {
            let mut rng = StdRng::seed_from_u64(args.seed);
            let mut generate = || {
                Dataset::synthetic(&SYNTHETIC_COEFFICIENTS, n, (0., 1.), SYNTHETIC_NOISE, &mut rng)
            };
            let train = generate()?;
            let test = generate()?;
            Ok((train, test))
        }
        None => Ok((Dataset::load(&args.train)?, Dataset::load(&args.test)?)),
    }
}

fn coefficients(model: &PolynomialRegression) -> Vec<f64> {
    model
        .coefficients()
        .map(|c| c.iter().copied().collect())
        .unwrap_or_default()
}

fn investigate_linear_regression(
    train: &Dataset,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("investigating linear regression...");

    let mut model = PolynomialRegression::default();

    model.set_coefficients(vec![0.; 2])?;
    info!(cost = model.cost(train.x(), train.y())?, "zero model");

    for eta in ETAS {
        let start = Instant::now();
        let report = model.fit_gd(train.x(), train.y(), &GradientDescentConfig::fixed(eta))?;
        let elapsed = start.elapsed();

        info!(
            eta,
            iterations = report.iterations,
            ?elapsed,
            cost = model.cost(train.x(), train.y())?,
            coefficients = ?coefficients(&model),
            "gradient descent"
        );
    }

    let start = Instant::now();
    model.fit(train.x(), train.y())?;
    let elapsed = start.elapsed();
    info!(
        ?elapsed,
        cost = model.cost(train.x(), train.y())?,
        coefficients = ?coefficients(&model),
        "closed form"
    );

    let plot_path = args.plots_dir.join("linear_fit.svg");
    let drawing_area = SVGBackend::new(&plot_path, (1024, 768)).into_drawing_area();
    plot_scatter_with_curve(
        train.points(),
        &model.regression_curve(0., 1., 50)?,
        "Closed form linear fit",
        &drawing_area,
    )?;
    drawing_area.present()?;

    let report = model.fit_gd(train.x(), train.y(), &GradientDescentConfig::default())?;
    info!(
        iterations = report.iterations,
        cost = model.cost(train.x(), train.y())?,
        coefficients = ?coefficients(&model),
        "gradient descent with decaying step size"
    );

    if args.trace {
        let mut trace = GradientDescentTrace::new(train);
        if let Some(every) = args.trace_every {
            let frames_dir = args.plots_dir.join("trace");
            std::fs::create_dir_all(&frames_dir)?;
            trace = trace.with_frames(frames_dir, every);
        }

        model.fit_gd_observed(
            train.x(),
            train.y(),
            &GradientDescentConfig::fixed(1e-2),
            &mut trace,
        )?;
        trace.save_svg(args.plots_dir.join("gradient_descent_trace.svg"))?;
    }

    Ok(())
}

/// Degree with the lowest error; `errors` holds one entry per degree starting at 0.
fn best_degree(errors: &[(f64, f64)]) -> Option<(usize, f64)> {
    errors
        .iter()
        .map(|&(_, rmse)| rmse)
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

fn investigate_polynomial_regression(
    train: &Dataset,
    test: &Dataset,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("investigating polynomial regression...");

    let mut train_errors = Vec::new();
    let mut test_errors = Vec::new();

    for degree in 0..=args.max_degree {
        let mut model = PolynomialRegression::with_degree(degree);
        model.fit(train.x(), train.y())?;

        train_errors.push((degree as f64, model.rms_error(train.x(), train.y())?));
        test_errors.push((degree as f64, model.rms_error(test.x(), test.y())?));
    }

    for (degree, (_, train_rmse), (_, test_rmse)) in
        izip!(0..=args.max_degree, &train_errors, &test_errors)
    {
        info!(degree, train_rmse = *train_rmse, test_rmse = *test_rmse, "rms error");
    }

    if let Some((degree, rmse)) = best_degree(&test_errors) {
        info!(degree, rmse, "best degree on test data");
    }

    save_series_svg(
        args.plots_dir.join("rmse_vs_degree.svg"),
        &[("Test Error", test_errors), ("Training Error", train_errors)],
        "Error vs. Degrees",
        "Polynomial Degree",
        "Errors",
    )?;

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init()?;

    let args = Args::parse();

    std::fs::create_dir_all(&args.plots_dir)?;

    let (train, test) = load_datasets(&args)?;
    info!(train = train.len(), test = test.len(), "loaded data");

    investigate_linear_regression(&train, &args)?;
    investigate_polynomial_regression(&train, &test, &args)?;

    info!("done!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_degree_is_an_index() {
        let errors = [(0., 0.9), (1., 0.4), (2., 0.1), (3., 0.3)];

        assert_eq!(best_degree(&errors), Some((2, 0.1)));
        assert_eq!(best_degree(&[]), None);
    }
}
