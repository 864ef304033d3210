use nalgebra::DMatrix;

/// Maps every scalar feature to `[1, x, x^2, ..., x^m]`.
///
/// The result has one row per input and `degree + 1` columns; column 0 is the
/// constant term, so degree 0 keeps only that column.
pub fn polynomial_features(x: &[f64], degree: usize) -> DMatrix<f64> {
    DMatrix::from_fn(x.len(), degree + 1, |row, power| x[row].powi(power as i32))
}

/// Evaluates the polynomial given by `coefficients` (lowest power first) at `x`.
pub fn evaluate(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, &coefficient| acc * x + coefficient)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_features_are_bias_and_value() {
        let phi = polynomial_features(&[0.5, -2.0, 3.0], 1);

        assert_eq!(phi.shape(), (3, 2));
        for (row, &x) in [0.5, -2.0, 3.0].iter().enumerate() {
            assert_eq!(phi[(row, 0)], 1.0);
            assert_eq!(phi[(row, 1)], x);
        }
    }

    #[test]
    fn degree_zero_keeps_only_the_constant_column() {
        let phi = polynomial_features(&[7.0, 0.0, -1.5], 0);

        assert_eq!(phi.shape(), (3, 1));
        assert!(phi.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn higher_degrees_hold_powers() {
        let phi = polynomial_features(&[2.0], 4);

        assert_eq!(
            phi.row(0).iter().cloned().collect::<Vec<_>>(),
            vec![1.0, 2.0, 4.0, 8.0, 16.0]
        );
    }

    #[test]
    fn empty_input_has_no_rows() {
        let phi = polynomial_features(&[], 3);

        assert_eq!(phi.shape(), (0, 4));
    }

    #[test]
    fn zero_to_the_zeroth_power_is_one() {
        let phi = polynomial_features(&[0.0], 2);

        assert_eq!(phi[(0, 0)], 1.0);
        assert_eq!(phi[(0, 1)], 0.0);
    }

    #[test]
    fn evaluate_uses_lowest_power_first() {
        assert_eq!(evaluate(&[1.0, 2.0], 3.0), 7.0);
        assert_eq!(evaluate(&[1.0, 0.0, 1.0], 2.0), 5.0);
        assert_eq!(evaluate(&[], 2.0), 0.0);
    }
}
