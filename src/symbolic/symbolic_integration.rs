//! # Symbolic Integration Module
//!
//! Structural antiderivatives of `Expr` trees with respect to a selected variable,
//! with a step trace, plus two numeric companions:
//! - `double_integrate` - midpoint Riemann sum of f(x, y) over a rectangle
//! - `definite_integrate` - fundamental theorem of calculus on the symbolic result,
//!   Gauss-Legendre quadrature when the symbolic pass fell back
//!
//! Integration never fails on algebraic structure. A node no rule covers comes back
//! unchanged (identity fallback) and the trace carries a step saying it was not
//! integrated, so callers that need a trustworthy result check `Step::is_fallback`.
//! No constant of integration is added to the tree.

use gauss_quad::GaussLegendre;
use log::{info, warn};
use rayon::prelude::*;
use strum_macros::Display;

use crate::symbolic::symbolic_engine::{Expr, VarSelector};
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_steps::{Step, StepLog};
use crate::symbolic::utils::midpoints;

/// Cells per axis of the midpoint grid used by `double_integrate`.
pub const DEFAULT_RIEMANN_STEPS: usize = 100;

/// Integrates `root` with respect to `var`.
///
/// The trace holds the rule steps in the order they fire and a closing
/// "Final integral (+ C for indefinite)" step.
///
/// # Examples
/// ```rust, ignore
/// let f = Expr::Var("x".to_string()).pow(Expr::Const(2.0));
/// let (big_f, steps) = integrate(&f, VarSelector::X); // (x ^ 3) / 3
/// ```
pub fn integrate(root: &Expr, var: VarSelector) -> (Expr, Vec<Step>) {
    let mut log = StepLog::new();
    let result = root.integrate_traced(var, &mut log);
    log.record(
        "Final integral (+ C for indefinite)",
        format!("∫ f d{} = {} + C", var, result),
    );
    if log.has_fallback() {
        warn!("integral of {} w.r.t. {} is symbolically incomplete", root, var);
    }
    info!("integrated {} w.r.t. {} in {} steps", root, var, log.len());
    (result, log.into_steps())
}

impl Expr {
    /// SYMBOLIC INTEGRATION

    /// Recursive integration pass. Steps go to `log`, a rule is recorded before
    /// its operands are integrated.
    pub fn integrate_traced(&self, var: VarSelector, log: &mut StepLog) -> Expr {
        let v = var.name();
        match self {
            // ∫ c dx = c*x
            Expr::Const(c) => {
                log.record(
                    format!("Constant Rule: ∫ c d{v} = c·{v}"),
                    format!("∫ {c} d{v} = {c}·{v}"),
                );
                Expr::Mul(Box::new(Expr::Const(*c)), Box::new(var.as_expr()))
            }
            // ∫ x dx = x^2/2
            Expr::Var(name) if var.matches(name) => {
                log.record(
                    format!("Power Rule: ∫ {v} d{v} = {v}^2/2"),
                    format!("∫ {v} d{v} = {v}^2/2"),
                );
                Expr::Div(
                    Box::new(Expr::Pow(Box::new(var.as_expr()), Box::new(Expr::Const(2.0)))),
                    Box::new(Expr::Const(2.0)),
                )
            }
            // ∫ y dx = y*x
            Expr::Var(name) => {
                log.record(
                    format!("Constant Rule: ∫ {name} d{v} = {name}·{v}"),
                    format!("∫ {name} d{v} = {name}·{v}"),
                );
                Expr::Mul(Box::new(Expr::Var(name.clone())), Box::new(var.as_expr()))
            }
            Expr::Add(lhs, rhs) => {
                log.record(
                    format!("Sum Rule: ∫ (f + g) d{v} = ∫ f d{v} + ∫ g d{v}"),
                    format!("∫ ({lhs} + {rhs}) d{v}"),
                );
                let il = lhs.integrate_traced(var, log);
                let ir = rhs.integrate_traced(var, log);
                Expr::Add(il.boxed(), ir.boxed())
            }
            Expr::Sub(lhs, rhs) => {
                log.record(
                    format!("Difference Rule: ∫ (f - g) d{v} = ∫ f d{v} - ∫ g d{v}"),
                    format!("∫ ({lhs} - {rhs}) d{v}"),
                );
                let il = lhs.integrate_traced(var, log);
                let ir = rhs.integrate_traced(var, log);
                Expr::Sub(il.boxed(), ir.boxed())
            }
            Expr::Mul(lhs, rhs) => self.integrate_multiplication(lhs, rhs, var, log),
            Expr::Pow(base, exp) => self.integrate_power(base, exp, var, log),
            Expr::Exp(arg)
            | Expr::Ln(arg)
            | Expr::sin(arg)
            | Expr::cos(arg)
            | Expr::tg(arg)
            | Expr::sqrt(arg) => self.integrate_function(arg, var, log),
            Expr::Div(_, _) if !self.contains_variable(v) => self.integrate_as_constant(var, log),
            Expr::Div(_, _) => self.identity_fallback(
                "Quotient integration (not integrated, identity fallback)",
                var,
                log,
            ),
        }
    }

    /// Integral with respect to `var`, trace discarded.
    pub fn integrate(&self, var: VarSelector) -> Expr {
        let mut log = StepLog::new();
        self.integrate_traced(var, &mut log)
    }

    // ∫ c·f dx = c·∫ f dx; a literal factor wins over a foreign variable, left before right
    fn integrate_multiplication(
        &self,
        lhs: &Expr,
        rhs: &Expr,
        var: VarSelector,
        log: &mut StepLog,
    ) -> Expr {
        let v = var.name();
        let (constant, other, description) = match (lhs, rhs) {
            (Expr::Const(_), _) => (lhs, rhs, format!("Constant Multiple Rule: ∫ c·f d{v} = c·∫ f d{v}")),
            (_, Expr::Const(_)) => (rhs, lhs, format!("Constant Multiple Rule: ∫ f·c d{v} = c·∫ f d{v}")),
            (Expr::Var(name), _) if !var.matches(name) => (
                lhs,
                rhs,
                format!("Constant Multiple Rule: ∫ {name}·f d{v} = {name}·∫ f d{v}"),
            ),
            (_, Expr::Var(name)) if !var.matches(name) => (
                rhs,
                lhs,
                format!("Constant Multiple Rule: ∫ f·{name} d{v} = {name}·∫ f d{v}"),
            ),
            _ => {
                return self.identity_fallback(
                    "Product integration (advanced, not integrated, identity fallback)",
                    var,
                    log,
                );
            }
        };
        log.record(description, format!("∫ {constant}·{other} d{v}"));
        let integral = other.integrate_traced(var, log);
        Expr::Mul(Box::new(constant.clone()), integral.boxed())
    }

    // ∫ x^n dx = x^(n+1)/(n+1), ∫ x^(-1) dx = ln|x|
    fn integrate_power(&self, base: &Expr, exp: &Expr, var: VarSelector, log: &mut StepLog) -> Expr {
        let v = var.name();
        match (base, exp) {
            (Expr::Var(name), Expr::Const(n)) if var.matches(name) => {
                if *n == -1.0 {
                    log.record(
                        format!("Special case: ∫ {v}^(-1) d{v} = ln|{v}|"),
                        format!("∫ {v}^(-1) d{v} = ln|{v}|"),
                    );
                    Expr::Ln(Box::new(var.as_expr()))
                } else {
                    let n1 = n + 1.0;
                    log.record(
                        format!("Power Rule: ∫ {v}^n d{v} = {v}^(n+1)/(n+1)"),
                        format!("∫ {v}^{n} d{v} = {v}^{n1}/{n1}"),
                    );
                    Expr::Div(
                        Box::new(Expr::Pow(Box::new(var.as_expr()), Box::new(Expr::Const(n1)))),
                        Box::new(Expr::Const(n1)),
                    )
                }
            }
            (Expr::Var(name), _) if var.matches(name) => self.identity_fallback(
                "Power with a symbolic exponent (not integrated, identity fallback)",
                var,
                log,
            ),
            _ if !self.contains_variable(v) => self.integrate_as_constant(var, log),
            // 2^x and the like: the base is free of v, the exponent is not
            _ if !base.contains_variable(v) => self.identity_fallback(
                &format!("Power with an exponent depending on {v} (not integrated, identity fallback)"),
                var,
                log,
            ),
            _ => self.identity_fallback(
                "Power of a composite base (not integrated, identity fallback)",
                var,
                log,
            ),
        }
    }

    // elementary functions of the bare variable, or of an argument free of it
    fn integrate_function(&self, arg: &Expr, var: VarSelector, log: &mut StepLog) -> Expr {
        let v = var.name();
        match arg {
            Expr::Var(name) if var.matches(name) => match self {
                // ∫ sin(x) dx = -cos(x)
                Expr::sin(_) => {
                    log.record(
                        format!("Trig Rule: ∫ sin({v}) d{v} = -cos({v})"),
                        format!("∫ sin({v}) d{v} = -cos({v})"),
                    );
                    Expr::Mul(
                        Box::new(Expr::Const(-1.0)),
                        Box::new(Expr::cos(Box::new(var.as_expr()))),
                    )
                }
                // ∫ cos(x) dx = sin(x)
                Expr::cos(_) => {
                    log.record(
                        format!("Trig Rule: ∫ cos({v}) d{v} = sin({v})"),
                        format!("∫ cos({v}) d{v} = sin({v})"),
                    );
                    Expr::sin(Box::new(var.as_expr()))
                }
                // ∫ exp(x) dx = exp(x)
                Expr::Exp(_) => {
                    log.record(
                        format!("Exponential Rule: ∫ exp({v}) d{v} = exp({v})"),
                        format!("∫ exp({v}) d{v} = exp({v})"),
                    );
                    Expr::Exp(Box::new(var.as_expr()))
                }
                _ => self.identity_fallback("Advanced integration (not implemented)", var, log),
            },
            _ if !arg.contains_variable(v) => self.integrate_as_constant(var, log),
            _ => self.identity_fallback(
                "Function of a composite argument (not integrated, identity fallback)",
                var,
                log,
            ),
        }
    }

    // ∫ g dx = g·x for any g free of x
    fn integrate_as_constant(&self, var: VarSelector, log: &mut StepLog) -> Expr {
        let v = var.name();
        let names = self.all_arguments_are_variables();
        let description = if names.is_empty() {
            "Constant Rule: constant expression".to_string()
        } else {
            format!("Constant Rule: function of {} treated as constant", names.join(", "))
        };
        log.record(description, format!("∫ {self} d{v} = {self}·{v}"));
        Expr::Mul(Box::new(self.clone()), Box::new(var.as_expr()))
    }

    fn identity_fallback(&self, description: &str, var: VarSelector, log: &mut StepLog) -> Expr {
        warn!("no integration rule for {}, returned unchanged", self);
        log.record(description, format!("∫ {} d{} ≈ {} (unchanged)", self, var, self));
        self.clone()
    }
}

/// Midpoint Riemann sum of `root` over `[x0, x1] × [y0, y1]` on the default 100 × 100 grid.
pub fn double_integrate(
    root: &Expr,
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Result<(f64, Vec<Step>), SymbolicError> {
    double_integrate_with(root, x_range, y_range, DEFAULT_RIEMANN_STEPS)
}

/// Midpoint Riemann sum on an `n_steps` × `n_steps` grid.
///
/// # Errors
/// `InvalidGrid` for `n_steps == 0`, `UnboundVariable` if `root` depends on a
/// variable other than `x` and `y`.
pub fn double_integrate_with(
    root: &Expr,
    x_range: (f64, f64),
    y_range: (f64, f64),
    n_steps: usize,
) -> Result<(f64, Vec<Step>), SymbolicError> {
    if n_steps == 0 {
        return Err(SymbolicError::InvalidGrid(n_steps));
    }
    let (x0, x1) = x_range;
    let (y0, y1) = y_range;
    let mut log = StepLog::new();
    log.record(
        "Double integration setup",
        format!("∫[{x0},{x1}] ∫[{y0},{y1}] {root} dy dx"),
    );
    let dx = (x1 - x0) / n_steps as f64;
    let dy = (y1 - y0) / n_steps as f64;
    log.record(
        "Midpoint grid",
        format!("{n_steps} × {n_steps} cells, Δx = {dx}, Δy = {dy}"),
    );

    let xs = midpoints(x0, x1, n_steps);
    let ys = midpoints(y0, y1, n_steps);
    let rows: Vec<f64> = xs
        .par_iter()
        .map(|&x| -> Result<f64, SymbolicError> {
            let mut row = 0.0;
            for &y in &ys {
                row += root.eval_xy(x, y)?;
            }
            Ok(row)
        })
        .collect::<Result<Vec<f64>, SymbolicError>>()?;
    let sum = rows.iter().sum::<f64>() * dx * dy;

    log.record("Numerical evaluation using Riemann sum", format!("Result ≈ {sum}"));
    info!("double integral of {} over {}x{} grid = {}", root, n_steps, n_steps, sum);
    Ok((sum, log.into_steps()))
}

/// How a definite integral was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum IntegrationMethod {
    #[strum(serialize = "symbolic antiderivative")]
    Symbolic,
    #[strum(serialize = "Gauss-Legendre quadrature")]
    GaussLegendre,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DefiniteIntegral {
    pub value: f64,
    pub method: IntegrationMethod,
    pub steps: Vec<Step>,
}

/// ∫[lower, upper] root d(var).
///
/// Uses F(upper) - F(lower) when the symbolic pass succeeded and gives a finite value,
/// otherwise Gauss-Legendre quadrature with `quad_degree` nodes.
pub fn definite_integrate(
    root: &Expr,
    var: VarSelector,
    lower: f64,
    upper: f64,
    quad_degree: usize,
) -> Result<DefiniteIntegral, SymbolicError> {
    let v = var.name();
    let mut log = StepLog::new();
    let antiderivative = root.integrate_traced(var, &mut log);

    if !log.has_fallback() {
        let big_f = antiderivative.lambdify1D(v)?;
        let value = big_f(upper) - big_f(lower);
        if value.is_finite() {
            log.record(
                "Fundamental theorem of calculus",
                format!("F({upper}) - F({lower}) = {value}, F = {antiderivative}"),
            );
            return Ok(DefiniteIntegral {
                value,
                method: IntegrationMethod::Symbolic,
                steps: log.into_steps(),
            });
        }
        warn!("antiderivative {} is not finite on [{}, {}]", antiderivative, lower, upper);
    }

    let f = root.lambdify1D(v)?;
    let quad = GaussLegendre::new(quad_degree)
        .map_err(|e| SymbolicError::Quadrature(format!("{:?}", e)))?;
    let value = quad.integrate(lower, upper, &f);
    log.record(
        format!("Gauss-Legendre quadrature, {quad_degree} nodes"),
        format!("∫[{lower},{upper}] {root} d{v} ≈ {value}"),
    );
    Ok(DefiniteIntegral {
        value,
        method: IntegrationMethod::GaussLegendre,
        steps: log.into_steps(),
    })
}
