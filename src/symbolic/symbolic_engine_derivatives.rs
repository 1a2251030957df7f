//! # Symbolic Engine Derivatives Module
//!
//! Rule-based, step-annotated differentiation of `Expr` trees with respect to a
//! selected variable (`x` or `y`). Every other variable is a symbolic constant.
//!
//! ## Key Methods
//!
//! - `differentiate(root, var)` - entry point returning the derivative and its trace
//! - `diff_traced(var, &mut StepLog)` - the recursive pass, records steps in pre-order
//! - `diff(var)` - derivative only
//! - `n_th_derivative1D()` - higher-order derivatives, simplified after every pass
//! - `compare_num1D()` - validate a derivative against a central finite difference
//!
//! ## Rules
//!
//! Constant, identity, sum, difference, product, quotient, power with a literal
//! exponent, and the chain rule for sin, cos, tg, ln, exp and sqrt. A power with a
//! symbolic exponent is not differentiated: the pass returns `Const(0)` and records
//! the limitation in the trace instead of failing.

use log::{info, warn};

use crate::symbolic::symbolic_engine::{Expr, VarSelector};
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_steps::{Step, StepLog};
use crate::symbolic::utils::{linspace, norm, numerical_derivative};

/// Differentiates `root` with respect to `var`.
///
/// The trace holds one step per rule application, in the order the rules fire
/// (a rule is recorded before its operands are differentiated), followed by a
/// closing "Final partial derivative" step.
///
/// # Examples
/// ```rust, ignore
/// let f = Expr::Var("x".to_string()).pow(Expr::Const(3.0));
/// let (df, steps) = differentiate(&f, VarSelector::X);
/// assert_eq!(df.eval_xy(2.0, 0.0).unwrap(), 12.0);
/// ```
pub fn differentiate(root: &Expr, var: VarSelector) -> (Expr, Vec<Step>) {
    let mut log = StepLog::new();
    let result = root.diff_traced(var, &mut log);
    log.record(
        "Final partial derivative",
        format!("∂f/∂{} = {}", var, result),
    );
    info!(
        "differentiated {} w.r.t. {} in {} steps",
        root,
        var,
        log.len()
    );
    (result, log.into_steps())
}

impl Expr {
    /// DIFFERENTIATION

    /// Recursive differentiation pass. Steps go to `log`; the input is never modified,
    /// operands reused in the result are cloned.
    pub fn diff_traced(&self, var: VarSelector, log: &mut StepLog) -> Expr {
        let v = var.name();
        match self {
            Expr::Const(_) => {
                log.record(
                    format!("Constant Rule: ∂/∂{v}(c) = 0"),
                    format!("∂/∂{v}({self}) = 0"),
                );
                Expr::Const(0.0)
            }
            Expr::Var(name) if var.matches(name) => {
                log.record(
                    format!("Power Rule: ∂/∂{v}({v}) = 1"),
                    format!("∂/∂{v}({v}) = 1"),
                );
                Expr::Const(1.0)
            }
            Expr::Var(name) => {
                log.record(
                    format!("Variable treated as constant: ∂/∂{v}({name}) = 0"),
                    format!("∂/∂{v}({name}) = 0"),
                );
                Expr::Const(0.0)
            }
            Expr::Add(lhs, rhs) => {
                log.record(
                    format!("Sum Rule: ∂/∂{v}(f + g) = ∂f/∂{v} + ∂g/∂{v}"),
                    format!("∂/∂{v}({lhs} + {rhs})"),
                );
                let dl = lhs.diff_traced(var, log);
                let dr = rhs.diff_traced(var, log);
                Expr::Add(dl.boxed(), dr.boxed())
            }
            Expr::Sub(lhs, rhs) => {
                log.record(
                    format!("Difference Rule: ∂/∂{v}(f - g) = ∂f/∂{v} - ∂g/∂{v}"),
                    format!("∂/∂{v}({lhs} - {rhs})"),
                );
                let dl = lhs.diff_traced(var, log);
                let dr = rhs.diff_traced(var, log);
                Expr::Sub(dl.boxed(), dr.boxed())
            }
            Expr::Mul(lhs, rhs) => {
                log.record(
                    format!("Product Rule: ∂/∂{v}(f * g) = ∂f/∂{v} * g + f * ∂g/∂{v}"),
                    format!("∂/∂{v}({lhs} * {rhs})"),
                );
                let dl = lhs.diff_traced(var, log);
                let dr = rhs.diff_traced(var, log);
                Expr::Add(
                    Box::new(Expr::Mul(dl.boxed(), rhs.clone())),
                    Box::new(Expr::Mul(lhs.clone(), dr.boxed())),
                )
            }
            Expr::Div(lhs, rhs) => {
                log.record(
                    format!("Quotient Rule: ∂/∂{v}(f/g) = (∂f/∂{v} * g - f * ∂g/∂{v}) / g^2"),
                    format!("∂/∂{v}({lhs} / {rhs})"),
                );
                let dl = lhs.diff_traced(var, log);
                let dr = rhs.diff_traced(var, log);
                Expr::Div(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Mul(dl.boxed(), rhs.clone())),
                        Box::new(Expr::Mul(lhs.clone(), dr.boxed())),
                    )),
                    Box::new(Expr::Pow(rhs.clone(), Box::new(Expr::Const(2.0)))),
                )
            }
            Expr::Pow(base, exp) => match exp.as_ref() {
                Expr::Const(n) => {
                    log.record(
                        format!("Power Rule: ∂/∂{v}(u^n) = n * u^(n-1) * ∂u/∂{v}"),
                        format!("∂/∂{v}({base}^{n})"),
                    );
                    let du = base.diff_traced(var, log);
                    Expr::Mul(
                        Box::new(Expr::Mul(
                            Box::new(Expr::Const(*n)),
                            Box::new(Expr::Pow(base.clone(), Box::new(Expr::Const(n - 1.0)))),
                        )),
                        du.boxed(),
                    )
                }
                _ => {
                    warn!("symbolic exponent in {} is not differentiated, using 0", self);
                    log.record(
                        "Unsupported: power with a symbolic exponent (not differentiated, treated as 0)",
                        format!("∂/∂{v}({self}) = 0"),
                    );
                    Expr::Const(0.0)
                }
            },
            Expr::sin(arg) => {
                log.record(
                    format!("Chain Rule: ∂/∂{v}(sin(u)) = cos(u) * ∂u/∂{v}"),
                    format!("∂/∂{v}({self})"),
                );
                let du = arg.diff_traced(var, log);
                Expr::Mul(Box::new(Expr::cos(arg.clone())), du.boxed())
            }
            Expr::cos(arg) => {
                log.record(
                    format!("Chain Rule: ∂/∂{v}(cos(u)) = -sin(u) * ∂u/∂{v}"),
                    format!("∂/∂{v}({self})"),
                );
                let du = arg.diff_traced(var, log);
                Expr::Mul(
                    Box::new(Expr::Mul(
                        Box::new(Expr::Const(-1.0)),
                        Box::new(Expr::sin(arg.clone())),
                    )),
                    du.boxed(),
                )
            }
            Expr::tg(arg) => {
                log.record(
                    format!("Chain Rule: ∂/∂{v}(tg(u)) = 1/cos²(u) * ∂u/∂{v}"),
                    format!("∂/∂{v}({self})"),
                );
                let du = arg.diff_traced(var, log);
                Expr::Mul(
                    Box::new(Expr::Div(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(
                            Box::new(Expr::cos(arg.clone())),
                            Box::new(Expr::Const(2.0)),
                        )),
                    )),
                    du.boxed(),
                )
            }
            Expr::Ln(arg) => {
                log.record(
                    format!("Chain Rule: ∂/∂{v}(ln(u)) = 1/u * ∂u/∂{v}"),
                    format!("∂/∂{v}({self})"),
                );
                let du = arg.diff_traced(var, log);
                Expr::Mul(
                    Box::new(Expr::Div(Box::new(Expr::Const(1.0)), arg.clone())),
                    du.boxed(),
                )
            }
            Expr::Exp(arg) => {
                log.record(
                    format!("Chain Rule: ∂/∂{v}(exp(u)) = exp(u) * ∂u/∂{v}"),
                    format!("∂/∂{v}({self})"),
                );
                let du = arg.diff_traced(var, log);
                Expr::Mul(Box::new(Expr::Exp(arg.clone())), du.boxed())
            }
            Expr::sqrt(arg) => {
                log.record(
                    format!("Chain Rule: ∂/∂{v}(sqrt(u)) = 1/(2*sqrt(u)) * ∂u/∂{v}"),
                    format!("∂/∂{v}({self})"),
                );
                let du = arg.diff_traced(var, log);
                Expr::Mul(
                    Box::new(Expr::Div(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Mul(
                            Box::new(Expr::Const(2.0)),
                            Box::new(Expr::sqrt(arg.clone())),
                        )),
                    )),
                    du.boxed(),
                )
            }
        }
    } // end of diff_traced

    /// Derivative with respect to `var`, trace discarded.
    pub fn diff(&self, var: VarSelector) -> Expr {
        let mut log = StepLog::new();
        self.diff_traced(var, &mut log)
    }

    /// Computes the n-th derivative, simplifying after every pass to keep the tree small.
    ///
    /// # Arguments
    /// * `var` - Variable to differentiate with respect to
    /// * `n` - Order of derivative (0 = original function)
    pub fn n_th_derivative1D(&self, var: VarSelector, n: usize) -> Expr {
        let mut expr = self.clone();
        for _ in 0..n {
            expr = expr.diff(var).simplify();
        }
        expr.simplify()
    }

    /// Compares the analytical derivative with a central finite difference on a linspace.
    ///
    /// # Returns
    /// Tuple of (norm of the difference, norm below `max_norm`)
    ///
    /// # Errors
    /// Fails if the expression depends on a variable other than `var`.
    pub fn compare_num1D(
        &self,
        var: VarSelector,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> Result<(f64, bool), SymbolicError> {
        let diff = self.diff(var);
        let analytical_fn = diff.lambdify1D(var.name())?;
        let function = self.lambdify1D(var.name())?;
        let domain = linspace(start, end, num_values);
        let analytical: Vec<f64> = domain.iter().map(|&x| analytical_fn(x)).collect();
        let step = (1.0 / 1e4) * (end - start) / (num_values.max(2) as f64 - 1.0);
        let numerical = numerical_derivative(function, &domain, step);
        let norm_val = norm(&analytical, &numerical);
        Ok((norm_val, norm_val < max_norm))
    }
}
