#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) builds symbolic expressions from variables, constants and elementary functions
/// 2) evaluates a symbolic expression with bound variables or turns it into a Rust closure
/// 3) renders a symbolic expression as a fully parenthesised string
///# Example#
/// ```
/// use RustedStepCalc::symbolic::symbolic_engine::Expr;
/// use RustedStepCalc::symbols;
/// let (x, y) = symbols!(x, y);
/// let f = x.clone().pow(Expr::Const(2.0)) + Expr::sin(y.boxed());
/// println!("f = {}", f);
/// let value = f.eval_xy(2.0, 0.0).unwrap();
/// assert_eq!(value, 4.0);
/// let g = x.exp();
/// let g_fn = g.lambdify1D("x").unwrap();
/// assert_eq!(g_fn(0.0), 1.0);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
///________________________________________________________________________________________________________________________________________________
/// # Differentiation with a rule trace
/// every rule application is recorded as a step before its operands are differentiated
/// Example#
/// ```
/// use RustedStepCalc::symbolic::symbolic_engine::{Expr, VarSelector};
/// use RustedStepCalc::symbolic::symbolic_engine_derivatives::differentiate;
/// let x = Expr::Var("x".to_string());
/// let f = x.clone() * Expr::sin(x.boxed());
/// let (df_dx, steps) = differentiate(&f, VarSelector::X);
/// println!("df/dx = {}", df_dx.simplify());
/// for step in &steps {
///     println!("{}: {}", step.description, step.expression);
/// }
/// assert!(steps[0].description.starts_with("Product Rule"));
/// // compare numerical and analytical derivatives on a linspace
/// let (norm, ok) = f.compare_num1D(VarSelector::X, 0.0, 3.0, 100, 1e-6).unwrap();
/// println!("norm = {}, ok = {}", norm, ok);
/// ```
pub mod symbolic_engine_derivatives;
/// steps and step logs shared by all engines, with table rendering
pub mod symbolic_steps;
pub mod symbolic_errors;
///________________________________________________________________________________________________________________________________________________
/// # Implicit differentiation
/// dy/dx = -(∂F/∂x) / (∂F/∂y) for a curve F(x, y) = 0
/// Example#
/// ```
/// use RustedStepCalc::symbolic::symbolic_engine::Expr;
/// use RustedStepCalc::symbolic::implicit_differentiation::compute_implicit_derivative;
/// let x = Expr::Var("x".to_string());
/// let y = Expr::Var("y".to_string());
/// let circle = x.pow(Expr::Const(2.0)) + y.pow(Expr::Const(2.0)) - Expr::Const(1.0);
/// let result = compute_implicit_derivative(&circle);
/// println!("{}", result.text);
/// let slope = result.evaluate_at(0.6, 0.8).unwrap();
/// assert!((slope + 0.75).abs() < 1e-12);
/// ```
pub mod implicit_differentiation;
///________________________________________________________________________________________________________________________________________________
/// # Integration
/// symbolic antiderivatives for a table of elementary forms, with an identity fallback
/// for everything else, plus numeric double and definite integrals
/// Example#
/// ```
/// use RustedStepCalc::symbolic::symbolic_engine::{Expr, VarSelector};
/// use RustedStepCalc::symbolic::symbolic_integration::{double_integrate, integrate};
/// let x = Expr::Var("x".to_string());
/// let y = Expr::Var("y".to_string());
/// let (antiderivative, steps) = integrate(&x.clone().pow(Expr::Const(2.0)), VarSelector::X);
/// println!("∫ x^2 dx = {} + C, {} steps", antiderivative, steps.len());
/// let (volume, _) = double_integrate(&(x * y), (0.0, 1.0), (0.0, 2.0)).unwrap();
/// assert!((volume - 1.0).abs() < 1e-9);
/// ```
pub mod symbolic_integration;
/// algebraic simplification of expression trees
pub mod symbolic_simplify;
///________________________________________________________________________________________________________________________________________________
/// # Taylor series
/// Example#
/// ```
/// use RustedStepCalc::symbolic::symbolic_engine::Expr;
/// use RustedStepCalc::symbolic::taylor_series::compute_taylor_series;
/// let f = Expr::Var("x".to_string()).exp();
/// let expansion = compute_taylor_series(&f, 0.0, 3).unwrap();
/// println!("{}", expansion.text);
/// ```
pub mod taylor_series;
///______________________________________________________________________________________________________________________________________________
/// grids, finite differences and other numeric helpers
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;

#[cfg(test)]
mod symbolic_engine_tests;
