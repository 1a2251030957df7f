// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use log::info;
use std::path::Path;

use crate::Utils::engine_settings::EngineSettings;
use crate::Utils::logger::save_steps_to_csv;
use crate::symbolic::implicit_differentiation::compute_implicit_derivative;
use crate::symbolic::symbolic_engine::{Expr, VarSelector};
use crate::symbolic::symbolic_engine_derivatives::differentiate;
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_integration::{definite_integrate, double_integrate_with, integrate};
use crate::symbolic::symbolic_steps::{Step, steps_table};
use crate::symbolic::taylor_series::{compute_taylor_series, evaluate_taylor_polynomial};
use crate::symbols;

// print a trace as a table or as plain lines, and export it if a csv directory is configured
fn show_steps(name: &str, steps: &[Step], settings: &EngineSettings) -> Result<(), SymbolicError> {
    if settings.trace.tables {
        println!("{}", steps_table(steps));
    } else {
        for (i, step) in steps.iter().enumerate() {
            println!("{:>3}. {} | {}", i + 1, step.description, step.expression);
        }
    }
    if let Some(dir) = &settings.trace.csv_dir {
        save_steps_to_csv(steps, Path::new(dir).join(format!("{name}.csv")))?;
    }
    Ok(())
}

pub fn sym_examples(example: usize, settings: &EngineSettings) -> Result<(), SymbolicError> {
    let (x, y) = symbols!(x, y);
    match example {
        0 => {
            // PARTIAL DERIVATIVES WITH A RULE TRACE
            // f(x, y) = x^2 * sin(y) + exp(x*y)
            let f = x.clone().pow(Expr::Const(2.0)) * Expr::sin(y.clone().boxed())
                + (x.clone() * y.clone()).exp();
            for var in [VarSelector::X, VarSelector::Y] {
                let (df, steps) = differentiate(&f, var);
                println!("∂f/∂{} = {}", var, df.simplify());
                show_steps(&format!("partial_{var}"), &steps, settings)?;
            }
        }
        1 => {
            // IMPLICIT DIFFERENTIATION of the circle x^2 + y^2 - 1 = 0
            let circle = x.pow(Expr::Const(2.0)) + y.pow(Expr::Const(2.0)) - Expr::Const(1.0);
            let result = compute_implicit_derivative(&circle);
            println!("{}", result.text);
            println!("slope at (0.6, 0.8) = {}", result.evaluate_at(0.6, 0.8)?);
            show_steps("implicit", &result.steps, settings)?;
        }
        2 => {
            // INDEFINITE INTEGRALS, the last one has no rule and comes back unchanged
            let functions = vec![
                Expr::Const(3.0) * x.clone().pow(Expr::Const(2.0)),
                Expr::cos(x.clone().boxed()) + y.clone(),
                x.clone().pow(Expr::Const(-1.0)),
                x.clone() * Expr::sin(x.clone().boxed()),
            ];
            for (i, f) in functions.iter().enumerate() {
                let (big_f, steps) = integrate(f, VarSelector::X);
                let incomplete = steps.iter().any(|s| s.is_fallback());
                println!("∫ {} dx = {} + C {}", f, big_f, if incomplete { "(not integrated)" } else { "" });
                show_steps(&format!("integral_{i}"), &steps, settings)?;
            }
        }
        3 => {
            // DOUBLE INTEGRAL by a midpoint Riemann sum
            let f = x.clone() * y.clone() + Expr::sin(x.boxed());
            let (value, steps) =
                double_integrate_with(&f, (0.0, 1.0), (0.0, 2.0), settings.engine.riemann_steps)?;
            println!("∫∫ {} dy dx ≈ {}", f, value);
            show_steps("double_integral", &steps, settings)?;
        }
        4 => {
            // DEFINITE INTEGRALS: symbolic where possible, Gauss-Legendre otherwise
            for f in [x.clone().pow(Expr::Const(3.0)), x.clone() * x.clone().exp()] {
                let integral = definite_integrate(&f, VarSelector::X, 0.0, 1.0, settings.engine.quad_degree)?;
                println!("∫[0,1] {} dx = {} ({})", f, integral.value, integral.method);
                show_steps("definite_integral", &integral.steps, settings)?;
            }
        }
        5 => {
            // TAYLOR POLYNOMIALS
            let order = settings.engine.taylor_order;
            let f = Expr::sin(x.clone().boxed());
            let expansion = compute_taylor_series(&f, 0.0, order)?;
            println!("{}", expansion.text);
            show_steps("taylor", &expansion.steps, settings)?;
            let g = x.clone().ln();
            let value = evaluate_taylor_polynomial(&g, 1.0, order, 1.2)?;
            println!("ln(1.2) ≈ {} (exact {})", value, 1.2_f64.ln());
        }
        6 => {
            // HIGHER DERIVATIVES and a numerical check of the first one
            let f = x.clone().pow(Expr::Const(4.0)) + Expr::tg(x.clone().boxed());
            for n in 1..=3 {
                println!("d^{n}f/dx^{n} = {}", f.n_th_derivative1D(VarSelector::X, n));
            }
            let (norm, ok) = f.compare_num1D(VarSelector::X, 0.0, 1.0, 100, 1e-6)?;
            println!("norm = {}, below tolerance = {}", norm, ok);
        }
        _ => {
            println!("no symbolic example with number {}", example);
        }
    }
    info!("symbolic example {} finished", example);
    Ok(())
}
