use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use polynomial_regression_fuw::likelihood::{
    fill_observations, likelihood_curve, maximum_likelihood_estimate,
};
use polynomial_regression_fuw::logging;
use polynomial_regression_fuw::plots::save_series_svg;

const EXPERIMENTS: [(usize, usize); 3] = [(3, 2), (6, 4), (60, 40)];

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of samples of an extra experiment.
    count: Option<usize>,

    /// Number of ones in the extra experiment.
    ones: Option<usize>,

    #[arg(long, default_value_t = 100)]
    points: usize,

    #[arg(long, default_value = "plots/likelihood.svg")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init()?;

    let args = Args::parse();

    let mut experiments = EXPERIMENTS.to_vec();
    if let (Some(count), Some(ones)) = (args.count, args.ones) {
        if ones > count {
            return Err(format!("cannot observe {ones} ones in {count} samples").into());
        }
        experiments.push((ones, count - ones));
    }

    let labels: Vec<String> = experiments
        .iter()
        .map(|(ones, zeros)| format!("n={}", ones + zeros))
        .collect();

    let series: Vec<(&str, Vec<(f64, f64)>)> = experiments
        .iter()
        .zip(&labels)
        .map(|(&(ones, zeros), label)| {
            let observed = fill_observations(ones, zeros);
            info!(
                n = observed.len(),
                ones,
                estimate = ?maximum_likelihood_estimate(&observed),
                "maximum likelihood"
            );

            (label.as_str(), likelihood_curve(&observed, args.points))
        })
        .collect();

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    save_series_svg(
        &args.output,
        &series,
        "Likelihood vs. Parameter",
        "Parameter",
        "Likelihood",
    )?;

    Ok(())
}
