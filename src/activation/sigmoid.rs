use std::f64::consts::E;

/// Logistic function, `1 / (1 + e^-x)`.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// Derivative of the logistic function, evaluated on the pre-activation `x`
/// (not on an already-activated value).
pub fn sigmoid_derivative(x: f64) -> f64 {
    let fx = sigmoid(x);
    fx * (1.0 - fx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sigmoid_known_values() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert_relative_eq!(sigmoid(2.0) + sigmoid(-2.0), 1.0, epsilon = 1e-12);
        assert!(sigmoid(30.0) < 1.0);
        assert!(sigmoid(-30.0) > 0.0);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let h = 1e-6;
        for &x in &[-3.0, -0.5, 0.0, 0.7, 4.0] {
            let numeric = (sigmoid(x + h) - sigmoid(x - h)) / (2.0 * h);
            assert_relative_eq!(sigmoid_derivative(x), numeric, epsilon = 1e-8);
        }
        assert_relative_eq!(sigmoid_derivative(0.0), 0.25);
    }
}
