//! # Symbolic Engine Module
//!
//! Expression trees consumed and produced by the calculus engines of this crate.
//!
//! ## Purpose
//!
//! The symbolic engine allows users to:
//! - Build symbolic expressions from variables, constants and elementary functions
//! - Render them as fully parenthesised infix text
//! - Evaluate them with explicit variable bindings
//! - Select the variable of a differentiation or integration pass
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - single-letter names like "x", "y"
//! - **Constants**: `Const(f64)`
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow`
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `sqrt`
//!
//! ### `VarSelector` Enum
//! Chooses `x` or `y` as the active variable of a pass. Every other variable name
//! is a symbolic constant for that pass.
//!
//! ## Interesting Code Features
//!
//! 1. **Exclusive ownership**: children are `Box<Expr>`, so a subtree reused in two
//!    places of a result must be cloned explicitly
//!
//! 2. **Operator Overloading**: std::ops traits (Add, Sub, Mul, Div, Neg) for
//!    natural mathematical syntax: `x.clone() * x.exp()`
//!
//! 3. **Checked evaluation**: `eval_expression` reports an unbound variable as a
//!    `SymbolicError` instead of panicking

#![allow(non_camel_case_types)]

use std::collections::BTreeSet;
use std::fmt;

use strum_macros::{Display, EnumIter};

use crate::symbolic::symbolic_errors::SymbolicError;

/// Core symbolic expression enum.
///
/// # Examples
/// ```rust, ignore
/// use RustedStepCalc::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "y")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function
    sin(Box<Expr>),
    /// Cosine function
    cos(Box<Expr>),
    /// Tangent function, mathematical notation 'tg'
    tg(Box<Expr>),
    /// Square root
    sqrt(Box<Expr>),
}

/// Variable chosen as the active variable of a differentiation or integration pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum VarSelector {
    #[strum(serialize = "x")]
    X,
    #[strum(serialize = "y")]
    Y,
}

impl VarSelector {
    /// name of the variable as it appears in `Expr::Var`
    pub fn name(&self) -> &'static str {
        match self {
            VarSelector::X => "x",
            VarSelector::Y => "y",
        }
    }

    pub fn matches(&self, var_name: &str) -> bool {
        self.name() == var_name
    }

    /// the selected variable as an expression node
    pub fn as_expr(&self) -> Expr {
        Expr::Var(self.name().to_string())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::sqrt(expr) => write!(f, "sqrt({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let vars = Expr::Symbols("x, y");
    /// assert_eq!(vars.len(), 2);
    /// ```
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Expr::Var(s.to_string()))
            .collect()
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Checks if expression is exactly the constant 0.0
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::sqrt(expr) => expr.contains_variable(var_name),
        }
    }

    /// Sorted, deduplicated names of all variables in the expression.
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        fn collect(expr: &Expr, acc: &mut BTreeSet<String>) {
            match expr {
                Expr::Var(name) => {
                    acc.insert(name.clone());
                }
                Expr::Const(_) => {}
                Expr::Add(lhs, rhs)
                | Expr::Sub(lhs, rhs)
                | Expr::Mul(lhs, rhs)
                | Expr::Div(lhs, rhs)
                | Expr::Pow(lhs, rhs) => {
                    collect(lhs, acc);
                    collect(rhs, acc);
                }
                Expr::Exp(arg)
                | Expr::Ln(arg)
                | Expr::sin(arg)
                | Expr::cos(arg)
                | Expr::tg(arg)
                | Expr::sqrt(arg) => collect(arg, acc),
            }
        }
        let mut acc = BTreeSet::new();
        collect(self, &mut acc);
        acc.into_iter().collect()
    }

    /// substitute a variable with an expression
    pub fn substitute_variable(&self, var: &str, replacement: &Expr) -> Expr {
        let sub = |e: &Expr| Box::new(e.substitute_variable(var, replacement));
        match self {
            Expr::Var(name) if name == var => replacement.clone(),
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(sub(lhs), sub(rhs)),
            Expr::Sub(lhs, rhs) => Expr::Sub(sub(lhs), sub(rhs)),
            Expr::Mul(lhs, rhs) => Expr::Mul(sub(lhs), sub(rhs)),
            Expr::Div(lhs, rhs) => Expr::Div(sub(lhs), sub(rhs)),
            Expr::Pow(base, exp) => Expr::Pow(sub(base), sub(exp)),
            Expr::Exp(arg) => Expr::Exp(sub(arg)),
            Expr::Ln(arg) => Expr::Ln(sub(arg)),
            Expr::sin(arg) => Expr::sin(sub(arg)),
            Expr::cos(arg) => Expr::cos(sub(arg)),
            Expr::tg(arg) => Expr::tg(sub(arg)),
            Expr::sqrt(arg) => Expr::sqrt(sub(arg)),
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        self.substitute_variable(var, &Expr::Const(value))
    }

    /// DIRECT EXPRESSION EVALUATION

    /// Evaluates the expression with explicit variable bindings.
    ///
    /// # Arguments
    /// * `vars` - Variable names in order matching values array
    /// * `values` - Numerical values for each variable
    ///
    /// # Errors
    /// `SymbolicError::UnboundVariable` when the tree holds a variable missing from `vars`.
    /// Division by zero and domain errors follow IEEE semantics (inf/NaN).
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> Result<f64, SymbolicError> {
        let value = match self {
            Expr::Var(name) => {
                let index = vars
                    .iter()
                    .position(|&v| v == name)
                    .filter(|&i| i < values.len())
                    .ok_or_else(|| SymbolicError::UnboundVariable(name.clone()))?;
                values[index]
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => {
                lhs.eval_expression(vars, values)? + rhs.eval_expression(vars, values)?
            }
            Expr::Sub(lhs, rhs) => {
                lhs.eval_expression(vars, values)? - rhs.eval_expression(vars, values)?
            }
            Expr::Mul(lhs, rhs) => {
                lhs.eval_expression(vars, values)? * rhs.eval_expression(vars, values)?
            }
            Expr::Div(lhs, rhs) => {
                lhs.eval_expression(vars, values)? / rhs.eval_expression(vars, values)?
            }
            Expr::Pow(base, exp) => {
                let base = base.eval_expression(vars, values)?;
                let exp = exp.eval_expression(vars, values)?;
                base.powf(exp)
            }
            Expr::Exp(expr) => expr.eval_expression(vars, values)?.exp(),
            Expr::Ln(expr) => expr.eval_expression(vars, values)?.ln(),
            Expr::sin(expr) => expr.eval_expression(vars, values)?.sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values)?.cos(),
            Expr::tg(expr) => expr.eval_expression(vars, values)?.tan(),
            Expr::sqrt(expr) => expr.eval_expression(vars, values)?.sqrt(),
        };
        Ok(value)
    }

    /// Evaluates with both selector variables bound: `x` and `y`.
    pub fn eval_xy(&self, x: f64, y: f64) -> Result<f64, SymbolicError> {
        self.eval_expression(&["x", "y"], &[x, y])
    }

    /// Turns a function of one variable into a closure.
    ///
    /// Fails up front if any other variable is present, so the closure itself never fails.
    pub fn lambdify1D(&self, var: &str) -> Result<impl Fn(f64) -> f64 + '_, SymbolicError> {
        if let Some(other) = self
            .all_arguments_are_variables()
            .into_iter()
            .find(|name| name != var)
        {
            return Err(SymbolicError::UnboundVariable(other));
        }
        let var = var.to_string();
        Ok(move |x: f64| {
            self.eval_expression(&[var.as_str()], &[x])
                .unwrap_or(f64::NAN)
        })
    }
}

/// Macro to create symbolic variables from a comma-separated list
/// Usage: symbols!(x, y) -> creates variables x, y
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        ($($crate::symbolic::symbolic_engine::Expr::Var(stringify!($var).to_string())),+)
    };
}
