//! Taylor polynomials of a function of x about a point `a`.
//!
//! Every coefficient is f⁽ⁿ⁾(a)/n!, where the n-th derivative comes from
//! repeated differentiation with simplification after each pass.

use itertools::Itertools;
use log::info;

use crate::symbolic::symbolic_engine::{Expr, VarSelector};
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_steps::{Step, StepLog};
use crate::symbolic::utils::factorial;

/// coefficients smaller than this are treated as zero and left out of the polynomial
const ZERO_COEFFICIENT: f64 = 1e-10;

#[derive(Clone, Debug, PartialEq)]
pub struct TaylorExpansion {
    /// sum of the non-zero terms c_n * (x - a)^n
    pub polynomial: Expr,
    /// "P<order>(x) = ..." with 4 decimals per coefficient
    pub text: String,
    pub steps: Vec<Step>,
}

impl TaylorExpansion {
    pub fn evaluate(&self, x: f64) -> Result<f64, SymbolicError> {
        self.polynomial.eval_expression(&["x"], &[x])
    }
}

fn derivative_label(n: usize) -> String {
    match n {
        0 => "f".to_string(),
        1 => "f'".to_string(),
        2 => "f''".to_string(),
        _ => format!("f⁽{n}⁾"),
    }
}

// (coefficient, f⁽ⁿ⁾(a)) for n = 0..=order
fn coefficients(root: &Expr, a: f64, order: usize) -> Result<Vec<(f64, f64)>, SymbolicError> {
    (0..=order)
        .map(|n| -> Result<(f64, f64), SymbolicError> {
            let value = root
                .n_th_derivative1D(VarSelector::X, n)
                .eval_expression(&["x"], &[a])?;
            Ok((value / factorial(n), value))
        })
        .collect()
}

fn term_text(coefficient: f64, n: usize, a: f64) -> String {
    if n == 0 {
        return format!("{coefficient:.4}");
    }
    let prefix = if (coefficient - 1.0).abs() < ZERO_COEFFICIENT {
        String::new()
    } else if (coefficient + 1.0).abs() < ZERO_COEFFICIENT {
        "-".to_string()
    } else {
        format!("{coefficient:.4}")
    };
    let power = match (a.abs() < ZERO_COEFFICIENT, n) {
        (true, 1) => "x".to_string(),
        (true, _) => format!("x^{n}"),
        (false, 1) => format!("(x-{a:.4})"),
        (false, _) => format!("(x-{a:.4})^{n}"),
    };
    format!("{prefix}{power}")
}

fn term_expr(coefficient: f64, n: usize, a: f64) -> Expr {
    let x = VarSelector::X.as_expr();
    let shifted = if a.abs() < ZERO_COEFFICIENT {
        x
    } else {
        x - Expr::Const(a)
    };
    match n {
        0 => Expr::Const(coefficient),
        1 => Expr::Const(coefficient) * shifted,
        _ => Expr::Const(coefficient) * shifted.pow(Expr::Const(n as f64)),
    }
}

/// Builds the Taylor polynomial of `root` (a function of x) of degree `order` about `a`.
///
/// # Errors
/// `UnboundVariable` if `root` or one of its derivatives depends on a variable other than x.
pub fn compute_taylor_series(
    root: &Expr,
    a: f64,
    order: usize,
) -> Result<TaylorExpansion, SymbolicError> {
    let mut log = StepLog::new();
    log.record("=== Taylor Series Expansion ===", format!("Function: f(x) = {root}"));
    log.record("Expansion center", format!("a = {a:.2}, Order = {order}"));
    log.record("Taylor series formula", "f(x) = Σ[n=0 to ∞] (f⁽ⁿ⁾(a)/n!) × (x-a)ⁿ");

    let mut texts = Vec::new();
    let mut terms = Vec::new();
    for (n, (coefficient, value)) in coefficients(root, a, order)?.into_iter().enumerate() {
        log.record(
            format!("Term {n} (n={n})"),
            format!("{}({a:.4}) = {value:.4}", derivative_label(n)),
        );
        log.record(
            "",
            format!("Coefficient: {value:.4} / {}! = {coefficient:.4}", n),
        );
        if coefficient.abs() < ZERO_COEFFICIENT {
            continue;
        }
        texts.push(term_text(coefficient, n, a));
        terms.push(term_expr(coefficient, n, a));
    }

    let body = texts
        .iter()
        .enumerate()
        .map(|(i, t)| match (i, t.starts_with('-')) {
            (0, _) => t.clone(),
            (_, true) => format!(" {t}"),
            (_, false) => format!(" + {t}"),
        })
        .join("");
    let text = format!("P{order}(x) = {body}");
    log.record("--- Taylor Polynomial ---", text.clone());
    info!("Taylor expansion of {} about {}: {}", root, a, text);

    let polynomial = terms
        .into_iter()
        .reduce(|acc, t| acc + t)
        .unwrap_or(Expr::Const(0.0));
    Ok(TaylorExpansion {
        polynomial,
        text,
        steps: log.into_steps(),
    })
}

/// Value of the degree-`order` Taylor polynomial about `a` at `x`, zero terms included.
pub fn evaluate_taylor_polynomial(
    root: &Expr,
    a: f64,
    order: usize,
    x: f64,
) -> Result<f64, SymbolicError> {
    Ok(coefficients(root, a, order)?
        .iter()
        .enumerate()
        .map(|(n, (coefficient, _))| coefficient * (x - a).powi(n as i32))
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_exp_maclaurin() {
        let f = x().exp();
        let expansion = compute_taylor_series(&f, 0.0, 3).unwrap();
        assert_eq!(expansion.text, "P3(x) = 1.0000 + x + 0.5000x^2 + 0.1667x^3");
        assert_relative_eq!(expansion.evaluate(0.1).unwrap(), 1.105166666, epsilon = 1e-6);
        assert_eq!(expansion.steps[0].description, "=== Taylor Series Expansion ===");
        assert_eq!(expansion.steps.last().unwrap().expression, expansion.text);
    }

    #[test]
    fn test_sin_skips_even_terms() {
        let f = Expr::sin(x().boxed());
        let expansion = compute_taylor_series(&f, 0.0, 5).unwrap();
        assert_eq!(expansion.text, "P5(x) = x -0.1667x^3 + 0.0083x^5");
        // three header steps plus two per order, plus the closing polynomial
        assert_eq!(expansion.steps.len(), 3 + 2 * 6 + 1);
    }

    #[test]
    fn test_shifted_center() {
        let f = x().pow(Expr::Const(2.0));
        let expansion = compute_taylor_series(&f, 1.0, 2).unwrap();
        assert_eq!(expansion.text, "P2(x) = 1.0000 + 2.0000(x-1.0000) + (x-1.0000)^2");
        for p in [-1.0, 0.5, 3.0] {
            assert_relative_eq!(expansion.evaluate(p).unwrap(), p * p, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_evaluate_matches_polynomial() {
        let f = Expr::cos(x().boxed());
        let direct = evaluate_taylor_polynomial(&f, 0.5, 4, 0.7).unwrap();
        let expansion = compute_taylor_series(&f, 0.5, 4).unwrap();
        assert_relative_eq!(direct, expansion.evaluate(0.7).unwrap(), epsilon = 1e-9);
        assert_relative_eq!(direct, 0.7_f64.cos(), epsilon = 1e-4);
    }

    #[test]
    fn test_zero_function() {
        let expansion = compute_taylor_series(&Expr::Const(0.0), 0.0, 2).unwrap();
        assert_eq!(expansion.text, "P2(x) = ");
        assert_eq!(expansion.polynomial, Expr::Const(0.0));
    }

    #[test]
    fn test_foreign_variable_is_an_error() {
        let f = x() * Expr::Var("y".to_string());
        assert!(matches!(
            compute_taylor_series(&f, 0.0, 1),
            Err(SymbolicError::UnboundVariable(v)) if v == "y"
        ));
    }
}
