use rand::rngs::StdRng;
use rand::SeedableRng;

use polynomial_regression_fuw::{
    Dataset, GradientDescentConfig, LearningRate, PolynomialRegression, RegressionError,
};

const TRAIN: &str = "0,1\n1,3\n2,5\n";

#[test]
fn csv_line_fits_exactly() {
    let dataset = Dataset::from_reader(TRAIN.as_bytes()).unwrap();
    let mut model = PolynomialRegression::new(1, 0.).unwrap();

    assert!(matches!(
        model.predict(dataset.x()),
        Err(RegressionError::Uninitialized)
    ));

    model.fit(dataset.x(), dataset.y()).unwrap();

    let coefficients = model.coefficients().unwrap();
    assert!((coefficients[0] - 1.).abs() < 1e-9);
    assert!((coefficients[1] - 2.).abs() < 1e-9);
    assert!(model.cost(dataset.x(), dataset.y()).unwrap() < 1e-18);
    assert!(model.rms_error(dataset.x(), dataset.y()).unwrap() < 1e-9);
}

#[test]
fn gradient_descent_matches_closed_form_on_noisy_data() {
    let mut rng = StdRng::seed_from_u64(7);
    let dataset = Dataset::synthetic(&[0.5, -1.5], 40, (0., 1.), 0.1, &mut rng).unwrap();

    let mut closed = PolynomialRegression::default();
    closed.fit(dataset.x(), dataset.y()).unwrap();

    let mut iterative = PolynomialRegression::default();
    let report = iterative
        .fit_gd(
            dataset.x(),
            dataset.y(),
            &GradientDescentConfig {
                learning_rate: LearningRate::Fixed(1e-3),
                tolerance: 1e-16,
                max_iterations: 100_000,
            },
        )
        .unwrap();

    assert!(report.iterations > 1);
    let closed_cost = closed.cost(dataset.x(), dataset.y()).unwrap();
    let iterative_cost = iterative.cost(dataset.x(), dataset.y()).unwrap();
    assert!(iterative_cost >= closed_cost - 1e-9);
    assert!(iterative_cost - closed_cost < 1e-4);
}

#[test]
fn training_error_does_not_grow_with_degree() {
    let mut rng = StdRng::seed_from_u64(3);
    let dataset = Dataset::synthetic(&[2., -12., 25., -14.], 30, (0., 1.), 0.3, &mut rng).unwrap();

    let errors: Vec<f64> = (0..=4)
        .map(|degree| {
            let mut model = PolynomialRegression::with_degree(degree);
            model.fit(dataset.x(), dataset.y()).unwrap();
            model.rms_error(dataset.x(), dataset.y()).unwrap()
        })
        .collect();

    for pair in errors.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-6, "{errors:?}");
    }
}

#[test]
fn regularized_model_refuses_gradient_descent() {
    let dataset = Dataset::from_reader(TRAIN.as_bytes()).unwrap();
    let mut model = PolynomialRegression::new(2, 0.5).unwrap();

    let result = model.fit_gd(dataset.x(), dataset.y(), &GradientDescentConfig::default());

    assert!(matches!(
        result,
        Err(RegressionError::UnsupportedConfiguration(_))
    ));
    assert!(!model.is_fit());

    model.fit(dataset.x(), dataset.y()).unwrap();
    assert!(model.is_fit());
}
