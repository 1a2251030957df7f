//! Small numeric helpers shared by the calculus engines.

/// `num_values` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    match num_values {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num_values as f64 - 1.0);
            (0..num_values).map(|i| start + i as f64 * step).collect()
        }
    }
}

/// Centres of `n` equal cells covering `[lower, upper]`.
pub fn midpoints(lower: f64, upper: f64, n: usize) -> Vec<f64> {
    let h = (upper - lower) / n as f64;
    (0..n).map(|i| lower + (i as f64 + 0.5) * h).collect()
}

/// central difference of `f` at every point of `x_values`
pub fn numerical_derivative<F>(f: F, x_values: &[f64], h: f64) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    x_values
        .iter()
        .map(|&x| (f(x + h) - f(x - h)) / (2.0 * h))
        .collect()
}

// root mean square distance scaled by 1/len, zero for empty input
pub fn norm(x: &[f64], y: &[f64]) -> f64 {
    let len = x.len().min(y.len());
    if len == 0 {
        return 0.0;
    }
    (1.0 / len as f64)
        * x.iter()
            .zip(y.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
}

pub fn factorial(n: usize) -> f64 {
    (1..=n).map(|k| k as f64).product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let grid = linspace(0.0, 1.0, 5);
        assert_eq!(grid.len(), 5);
        assert_relative_eq!(grid[0], 0.0);
        assert_relative_eq!(grid[4], 1.0);
        assert_relative_eq!(grid[1], 0.25);
    }

    #[test]
    fn test_midpoints() {
        let mids = midpoints(0.0, 2.0, 4);
        assert_eq!(mids, vec![0.25, 0.75, 1.25, 1.75]);
    }

    #[test]
    fn test_numerical_derivative_of_square() {
        let d = numerical_derivative(|x| x * x, &[1.0, 2.0], 1e-5);
        assert_relative_eq!(d[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(d[1], 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0), 1.0);
        assert_eq!(factorial(5), 120.0);
    }
}
