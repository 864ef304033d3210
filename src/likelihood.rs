use ndarray::Array;

/// `ones` heads followed by `zeros` tails.
pub fn fill_observations(ones: usize, zeros: usize) -> Vec<bool> {
    std::iter::repeat(true)
        .take(ones)
        .chain(std::iter::repeat(false).take(zeros))
        .collect()
}

/// Probability of observing `observations` when heads come up with probability `p`.
pub fn likelihood(p: f64, observations: &[bool]) -> f64 {
    observations
        .iter()
        .map(|&head| if head { p } else { 1. - p })
        .product()
}

/// Likelihood evaluated at `points` evenly spaced values of `p` in `[0, 1]`.
pub fn likelihood_curve(observations: &[bool], points: usize) -> Vec<(f64, f64)> {
    Array::linspace(0., 1., points)
        .into_iter()
        .map(|p| (p, likelihood(p, observations)))
        .collect()
}

pub fn maximum_likelihood_estimate(observations: &[bool]) -> Option<f64> {
    if observations.is_empty() {
        return None;
    }

    let ones = observations.iter().filter(|&&head| head).count();
    Some(ones as f64 / observations.len() as f64)
}
