pub mod dataset;
pub mod error;
pub mod features;
pub mod likelihood;
pub mod logging;
pub mod plots;
pub mod regression;

pub use dataset::Dataset;
pub use error::{RegressionError, RegressionResult};
pub use regression::{
    GradientDescentConfig, GradientDescentObserver, GradientDescentReport, GradientDescentStep,
    LearningRate, PolynomialRegression,
};
