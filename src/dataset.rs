use std::io::Read;
use std::path::Path;

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use tracing::debug;

use crate::error::{check_aligned, RegressionError, RegressionResult};
use crate::features::evaluate;

#[derive(Debug, serde::Deserialize)]
struct Record {
    x: f64,
    y: f64,
}

/// Feature values paired with their targets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Dataset {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> RegressionResult<Self> {
        check_aligned(x.len(), y.len())?;
        Ok(Self { x, y })
    }

    /// Reads headerless `feature,target` rows.
    pub fn from_reader<R: Read>(reader: R) -> RegressionResult<Self> {
        let records: Vec<Record> = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader)
            .deserialize()
            .collect::<Result<_, _>>()?;

        let (x, y) = records.into_iter().map(|Record { x, y }| (x, y)).unzip();

        Ok(Self { x, y })
    }

    pub fn load(path: impl AsRef<Path>) -> RegressionResult<Self> {
        let path = path.as_ref();
        let dataset = Self::from_reader(std::fs::File::open(path)?)?;
        debug!(path = %path.display(), examples = dataset.len(), "loaded dataset");

        Ok(dataset)
    }

    /// Samples `n` points uniformly from `x_range` with targets from the
    /// polynomial `coefficients` plus gaussian noise.
    pub fn synthetic<R: Rng + ?Sized>(
        coefficients: &[f64],
        n: usize,
        x_range: (f64, f64),
        noise: f64,
        rng: &mut R,
    ) -> RegressionResult<Self> {
        if !noise.is_finite() || noise < 0. {
            return Err(RegressionError::invalid(format!(
                "noise must be a non-negative number, got {noise}"
            )));
        }
        let noise = Normal::new(0., noise).map_err(|e| RegressionError::invalid(e.to_string()))?;
        if !(x_range.0 < x_range.1) {
            return Err(RegressionError::invalid(format!(
                "empty feature range {:?}",
                x_range
            )));
        }
        let uniform = Uniform::new(x_range.0, x_range.1);

        let x: Vec<f64> = uniform.sample_iter(&mut *rng).take(n).collect();
        let y = x
            .iter()
            .map(|&x| evaluate(coefficients, x) + noise.sample(rng))
            .collect();

        Ok(Self { x, y })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + Clone + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn reads_headerless_rows() {
        let data = "0.05,-0.66\n 0.10 , 0.52\n0.15,0.44\n";

        let dataset = Dataset::from_reader(data.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.x(), &[0.05, 0.10, 0.15]);
        assert_eq!(dataset.y(), &[-0.66, 0.52, 0.44]);
    }

    #[test]
    fn malformed_rows_are_errors() {
        let data = "0.05,-0.66\nabc,1\n";

        assert!(matches!(
            Dataset::from_reader(data.as_bytes()),
            Err(RegressionError::Csv(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Dataset::load("definitely/not/here.csv"),
            Err(RegressionError::Io(_))
        ));
    }

    #[test]
    fn unaligned_columns_are_rejected() {
        assert!(matches!(
            Dataset::new(vec![1., 2.], vec![1.]),
            Err(RegressionError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn noiseless_synthetic_data_lies_on_the_polynomial() {
        let mut rng = StdRng::seed_from_u64(0);

        let dataset = Dataset::synthetic(&[1., 2.], 20, (0., 1.), 0., &mut rng).unwrap();

        assert_eq!(dataset.len(), 20);
        for (x, y) in dataset.points() {
            assert!((0. ..1.).contains(&x));
            assert!((y - (1. + 2. * x)).abs() < 1e-12);
        }
    }

    #[test]
    fn synthetic_data_rejects_bad_parameters() {
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            Dataset::synthetic(&[1.], 5, (0., 1.), -1., &mut rng),
            Err(RegressionError::InvalidArgument(_))
        ));
        assert!(matches!(
            Dataset::synthetic(&[1.], 5, (0., 1.), f64::NAN, &mut rng),
            Err(RegressionError::InvalidArgument(_))
        ));
        assert!(matches!(
            Dataset::synthetic(&[1.], 5, (1., 1.), 0.1, &mut rng),
            Err(RegressionError::InvalidArgument(_))
        ));
    }
}
