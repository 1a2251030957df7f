//! Implicit differentiation of an equation F(x, y) = 0.
//!
//! Both partial derivatives come from the traced differentiation engine and are
//! simplified before they are combined into dy/dx = -(∂F/∂x) / (∂F/∂y).
//! The result is only meaningful where ∂F/∂y ≠ 0; no check is made, evaluating at a
//! point where it vanishes gives IEEE infinities or NaN.

use log::{debug, info};

use crate::symbolic::symbolic_engine::{Expr, VarSelector};
use crate::symbolic::symbolic_engine_derivatives::differentiate;
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_steps::{Step, StepLog, steps_table};

/// Slope dy/dx of the curve F(x, y) = 0 together with its derivation.
#[derive(Clone, Debug, PartialEq)]
pub struct ImplicitDerivative {
    /// "dy/dx = <simplified ratio>"
    pub text: String,
    /// simplified ratio -(∂F/∂x) / (∂F/∂y)
    pub derivative: Expr,
    pub steps: Vec<Step>,
}

impl ImplicitDerivative {
    /// dy/dx at the point (x, y)
    pub fn evaluate_at(&self, x: f64, y: f64) -> Result<f64, SymbolicError> {
        self.derivative.eval_xy(x, y)
    }
}

/// Differentiates `equation` (the left side of F(x, y) = 0) implicitly.
pub fn compute_implicit_derivative(equation: &Expr) -> ImplicitDerivative {
    let mut log = StepLog::new();
    log.record("=== Given Implicit Equation ===", format!("F(x,y) = {equation} = 0"));

    log.record(
        "--- Step 1: Compute ∂F/∂x (partial derivative with respect to x) ---",
        "",
    );
    let dfdx = partial(equation, VarSelector::X);
    log.record("Partial derivative:", format!("∂F/∂x = {dfdx}"));

    log.record(
        "--- Step 2: Compute ∂F/∂y (partial derivative with respect to y) ---",
        "",
    );
    let dfdy = partial(equation, VarSelector::Y);
    log.record("Partial derivative:", format!("∂F/∂y = {dfdy}"));

    log.record(
        "--- Step 3: Apply Implicit Differentiation Formula ---",
        "Formula: dy/dx = -(∂F/∂x) / (∂F/∂y)",
    );
    log.record("Substitute values:", format!("dy/dx = -({dfdx}) / ({dfdy})"));

    let ratio = Expr::Div(
        Box::new(Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(dfdx.clone()))),
        Box::new(dfdy.clone()),
    );
    let derivative = ratio.simplify();
    let text = format!("dy/dx = {derivative}");
    log.record("=== Final Result (Simplified) ===", text.clone());
    info!("implicit derivative of {} = 0: {}", equation, text);

    ImplicitDerivative {
        text,
        derivative,
        steps: log.into_steps(),
    }
}

// simplified partial derivative, rule trace goes to the debug log only
fn partial(equation: &Expr, var: VarSelector) -> Expr {
    let (raw, steps) = differentiate(equation, var);
    debug!("∂F/∂{} rule trace:\n{}", var, steps_table(&steps));
    raw.simplify()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    fn y() -> Expr {
        Expr::Var("y".to_string())
    }

    fn circle() -> Expr {
        x().pow(Expr::Const(2.0)) + y().pow(Expr::Const(2.0)) - Expr::Const(1.0)
    }

    #[test]
    fn test_circle_slope() {
        let result = compute_implicit_derivative(&circle());
        assert!(result.text.starts_with("dy/dx = "));
        let slope = result.evaluate_at(0.6, 0.8).unwrap();
        assert_relative_eq!(slope, -0.75, epsilon = 1e-9);
        // -x/y everywhere on the curve
        for t in [0.3_f64, 1.1, 2.0] {
            let (px, py) = (t.cos(), t.sin());
            assert_relative_eq!(result.evaluate_at(px, py).unwrap(), -px / py, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_circle_simplified_form() {
        let result = compute_implicit_derivative(&circle());
        assert_eq!(result.derivative, Expr::Const(-1.0) * (x() / y()));
        assert_eq!(result.text, "dy/dx = (-1 * (x / y))");
    }

    #[test]
    fn test_step_headlines() {
        let result = compute_implicit_derivative(&circle());
        let descriptions: Vec<&str> = result.steps.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(descriptions[0], "=== Given Implicit Equation ===");
        assert_eq!(result.steps[0].expression, format!("F(x,y) = {} = 0", circle()));
        assert!(descriptions.iter().any(|d| d.starts_with("--- Step 3")));
        assert_eq!(result.steps.last().unwrap().expression, result.text);
        assert_eq!(result.steps[2].expression, "∂F/∂x = (2 * x)");
        assert_eq!(result.steps[4].expression, "∂F/∂y = (2 * y)");
    }

    #[test]
    fn test_product_curve() {
        // x*y - 1 = 0  =>  dy/dx = -y/x
        let f = x() * y() - Expr::Const(1.0);
        let result = compute_implicit_derivative(&f);
        assert_relative_eq!(result.evaluate_at(2.0, 0.5).unwrap(), -0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_transcendental_curve() {
        // sin(x) + y^3 = 0  =>  dy/dx = -cos(x) / (3 y^2)
        let f = Expr::sin(x().boxed()) + y().pow(Expr::Const(3.0));
        let result = compute_implicit_derivative(&f);
        let (px, py) = (0.4_f64, -0.7_f64);
        let expected = -px.cos() / (3.0 * py * py);
        assert_relative_eq!(result.evaluate_at(px, py).unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_vanishing_denominator_is_not_guarded() {
        let result = compute_implicit_derivative(&circle());
        let slope = result.evaluate_at(1.0, 0.0).unwrap();
        assert!(!slope.is_finite());
    }

    #[test]
    fn test_absolute_value_curve() {
        // (x^2)^0.5 + y - 1 = 0 is y = 1 - |x|, slope +1 left of the origin and -1 right of it
        let f = x().pow(Expr::Const(2.0)).pow(Expr::Const(0.5)) + y() - Expr::Const(1.0);
        let result = compute_implicit_derivative(&f);
        assert_relative_eq!(result.evaluate_at(-0.5, 0.5).unwrap(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(result.evaluate_at(-2.0, -1.0).unwrap(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(result.evaluate_at(0.25, 0.75).unwrap(), -1.0, epsilon = 1e-9);
    }
}
