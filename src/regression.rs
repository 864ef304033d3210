use nalgebra::{DMatrix, DVector};
use ndarray::Array;
use tracing::{debug, info};

use crate::error::{check_aligned, RegressionError, RegressionResult};
use crate::features::polynomial_features;

/// Singular values below `PINV_RCOND * max(singular values)` are treated as zero.
const PINV_RCOND: f64 = 1e-15;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum LearningRate {
    Fixed(f64),
    /// `1 / (1 + t)` at iteration `t`.
    #[default]
    Decaying,
}

impl LearningRate {
    pub fn at(&self, iteration: usize) -> f64 {
        match *self {
            LearningRate::Fixed(eta) => eta,
            LearningRate::Decaying => 1. / (1. + iteration as f64),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientDescentConfig {
    pub learning_rate: LearningRate,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for GradientDescentConfig {
    fn default() -> Self {
        Self {
            learning_rate: LearningRate::Decaying,
            tolerance: 0.,
            max_iterations: 10_000,
        }
    }
}

impl GradientDescentConfig {
    pub fn fixed(eta: f64) -> Self {
        Self {
            learning_rate: LearningRate::Fixed(eta),
            ..Default::default()
        }
    }

    fn validate(&self) -> RegressionResult<()> {
        if let LearningRate::Fixed(eta) = self.learning_rate {
            if !eta.is_finite() || eta <= 0. {
                return Err(RegressionError::invalid(format!(
                    "learning rate must be positive, got {eta}"
                )));
            }
        }
        if !(self.tolerance >= 0.) {
            return Err(RegressionError::invalid(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// State handed to an observer after every gradient descent update.
#[derive(Debug)]
pub struct GradientDescentStep<'a> {
    pub iteration: usize,
    pub coefficients: &'a DVector<f64>,
    pub learning_rate: f64,
    /// Mean squared residual, the quantity the stopping rule compares.
    pub error: f64,
    /// Sum of squared residuals.
    pub cost: f64,
    pub degree: usize,
}

pub trait GradientDescentObserver {
    fn on_iteration(&mut self, step: &GradientDescentStep<'_>);
}

impl<F> GradientDescentObserver for F
where
    F: FnMut(&GradientDescentStep<'_>),
{
    fn on_iteration(&mut self, step: &GradientDescentStep<'_>) {
        self(step)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GradientDescentReport {
    pub iterations: usize,
    pub errors: Vec<f64>,
    pub converged: bool,
}

/// Least squares fit of a polynomial in a single feature.
#[derive(Clone, Debug)]
pub struct PolynomialRegression {
    degree: usize,
    reg_param: f64,
    coefficients: Option<DVector<f64>>,
}

impl Default for PolynomialRegression {
    fn default() -> Self {
        Self {
            degree: 1,
            reg_param: 0.,
            coefficients: None,
        }
    }
}

impl PolynomialRegression {
    pub fn new(degree: usize, reg_param: f64) -> RegressionResult<Self> {
        if !reg_param.is_finite() || reg_param < 0. {
            return Err(RegressionError::invalid(format!(
                "regularization strength must be a non-negative number, got {reg_param}"
            )));
        }

        Ok(Self {
            degree,
            reg_param,
            coefficients: None,
        })
    }

    pub fn with_degree(degree: usize) -> Self {
        Self {
            degree,
            ..Default::default()
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn reg_param(&self) -> f64 {
        self.reg_param
    }

    pub fn coefficients(&self) -> Option<&DVector<f64>> {
        self.coefficients.as_ref()
    }

    pub fn is_fit(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Installs explicit coefficients, lowest power first.
    pub fn set_coefficients(&mut self, coefficients: Vec<f64>) -> RegressionResult<()> {
        if coefficients.len() != self.degree + 1 {
            return Err(RegressionError::invalid(format!(
                "expected {} coefficients for degree {}, got {}",
                self.degree + 1,
                self.degree,
                coefficients.len()
            )));
        }
        self.coefficients = Some(DVector::from_vec(coefficients));
        Ok(())
    }

    pub fn generate_polynomial_features(&self, x: &[f64]) -> DMatrix<f64> {
        polynomial_features(x, self.degree)
    }

    /// Closed form solution `(Phi^T Phi + lambda D)^+ Phi^T y`, where `D` is the
    /// identity without the intercept entry.
    pub fn fit(&mut self, x: &[f64], y: &[f64]) -> RegressionResult<&mut Self> {
        check_aligned(x.len(), y.len())?;

        let phi = self.generate_polynomial_features(x);
        let targets = DVector::from_column_slice(y);
        let d = phi.ncols();

        let mut gram = phi.tr_mul(&phi);
        if self.reg_param > 0. {
            let mut penalty = DMatrix::<f64>::identity(d, d) * self.reg_param;
            penalty[(0, 0)] = 0.;
            gram += penalty;
        }

        let svd = gram.svd(true, true);
        let cutoff = svd.singular_values.max() * PINV_RCOND;
        let gram_pinv = svd
            .pseudo_inverse(cutoff)
            .map_err(|e| RegressionError::LinearAlgebra(e.to_string()))?;

        let coefficients = gram_pinv * phi.tr_mul(&targets);
        debug!(
            degree = self.degree,
            lambda = self.reg_param,
            coefficients = ?coefficients.as_slice(),
            "closed form fit"
        );
        self.coefficients = Some(coefficients);

        Ok(self)
    }

    /// Batch gradient descent on the sum of squared errors, starting from zero.
    pub fn fit_gd(
        &mut self,
        x: &[f64],
        y: &[f64],
        config: &GradientDescentConfig,
    ) -> RegressionResult<GradientDescentReport> {
        self.gradient_descent(x, y, config, None)
    }

    pub fn fit_gd_observed(
        &mut self,
        x: &[f64],
        y: &[f64],
        config: &GradientDescentConfig,
        observer: &mut dyn GradientDescentObserver,
    ) -> RegressionResult<GradientDescentReport> {
        self.gradient_descent(x, y, config, Some(observer))
    }

    fn gradient_descent(
        &mut self,
        x: &[f64],
        y: &[f64],
        config: &GradientDescentConfig,
        mut observer: Option<&mut dyn GradientDescentObserver>,
    ) -> RegressionResult<GradientDescentReport> {
        if self.reg_param != 0. {
            return Err(RegressionError::unsupported(
                "gradient descent with regularization is not implemented",
            ));
        }
        config.validate()?;
        check_aligned(x.len(), y.len())?;
        if x.is_empty() {
            return Err(RegressionError::EmptyDataset);
        }

        let phi = self.generate_polynomial_features(x);
        let targets = DVector::from_column_slice(y);
        let n = x.len() as f64;

        let mut coefficients = DVector::<f64>::zeros(phi.ncols());
        let mut errors = Vec::new();
        let mut converged = false;

        for t in 0..config.max_iterations {
            let eta = config.learning_rate.at(t);

            let residuals = &phi * &coefficients - &targets;
            let gradient = phi.tr_mul(&residuals) * 2.;
            coefficients -= gradient * eta;

            let cost = (&phi * &coefficients - &targets).norm_squared();
            let error = cost / n;
            errors.push(error);

            if let Some(observer) = observer.as_mut() {
                observer.on_iteration(&GradientDescentStep {
                    iteration: t,
                    coefficients: &coefficients,
                    learning_rate: eta,
                    error,
                    cost,
                    degree: self.degree,
                });
            }

            if t > 0 && (error - errors[t - 1]).abs() <= config.tolerance {
                converged = true;
                break;
            }
        }

        info!(
            iterations = errors.len(),
            converged,
            "number of iterations: {}",
            errors.len()
        );
        self.coefficients = Some(coefficients);

        Ok(GradientDescentReport {
            iterations: errors.len(),
            errors,
            converged,
        })
    }

    pub fn predict(&self, x: &[f64]) -> RegressionResult<Vec<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(RegressionError::Uninitialized)?;

        let predictions = self.generate_polynomial_features(x) * coefficients;

        Ok(predictions.iter().copied().collect())
    }

    /// Sum of squared residuals.
    pub fn cost(&self, x: &[f64], y: &[f64]) -> RegressionResult<f64> {
        check_aligned(x.len(), y.len())?;

        let cost = self
            .predict(x)?
            .into_iter()
            .zip(y)
            .map(|(prediction, &target)| (prediction - target).powi(2))
            .sum();

        Ok(cost)
    }

    pub fn rms_error(&self, x: &[f64], y: &[f64]) -> RegressionResult<f64> {
        let cost = self.cost(x, y)?;
        if x.is_empty() {
            return Err(RegressionError::EmptyDataset);
        }

        Ok((cost / x.len() as f64).sqrt())
    }

    /// `points` evenly spaced samples of the fitted curve on `[xmin, xmax]`.
    pub fn regression_curve(
        &self,
        xmin: f64,
        xmax: f64,
        points: usize,
    ) -> RegressionResult<Vec<(f64, f64)>> {
        let x = Array::linspace(xmin, xmax, points).to_vec();
        let y = self.predict(&x)?;

        Ok(x.into_iter().zip(y).collect())
    }
}
