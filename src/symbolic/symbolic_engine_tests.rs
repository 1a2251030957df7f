use crate::symbolic::implicit_differentiation::compute_implicit_derivative;
use crate::symbolic::symbolic_engine::{Expr, VarSelector};
use crate::symbolic::symbolic_engine_derivatives::differentiate;
use crate::symbolic::symbolic_integration::{double_integrate, integrate};
use crate::symbols;
use std::f64;
//___________________________________TESTS____________________________________

mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_operator_overloads_build_trees() {
        let (x, y) = symbols!(x, y);
        assert_eq!(
            x.clone() + y.clone(),
            Expr::Add(Box::new(x.clone()), Box::new(y.clone()))
        );
        assert_eq!(
            x.clone() / Expr::Const(2.0),
            Expr::Div(Box::new(x.clone()), Box::new(Expr::Const(2.0)))
        );
        assert_eq!(
            -x.clone(),
            Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(x))
        );
    }

    #[test]
    fn test_display_is_fully_parenthesised() {
        let (x, y) = symbols!(x, y);
        let e = x.clone().pow(Expr::Const(2.0)) * Expr::sin(y.boxed());
        assert_eq!(e.to_string(), "((x ^ 2) * sin(y))");
    }

    // differentiate(Number(n), v) = Number(0)
    #[test]
    fn test_constant_derivative_is_zero() {
        for var in VarSelector::iter() {
            for n in [-7.25, 0.0, 1.0, 1e6] {
                let (d, _) = differentiate(&Expr::Const(n), var);
                assert_eq!(d, Expr::Const(0.0));
            }
        }
    }

    #[test]
    fn test_variable_derivative() {
        let x = Expr::Var("x".to_string());
        assert_eq!(differentiate(&x, VarSelector::X).0, Expr::Const(1.0));
        assert_eq!(differentiate(&x, VarSelector::Y).0, Expr::Const(0.0));
    }

    #[test]
    fn test_product_rule_value() {
        let x = Expr::Var("x".to_string());
        let f = x.clone() * Expr::sin(x.boxed());
        let (d, _) = differentiate(&f, VarSelector::X);
        let value = d.eval_xy(1.0, 0.0).unwrap();
        assert_relative_eq!(value, 1.0_f64.sin() + 1.0_f64.cos(), epsilon = 1e-9);
    }

    #[test]
    fn test_power_rule_value() {
        let f = Expr::Var("x".to_string()).pow(Expr::Const(3.0));
        let (d, _) = differentiate(&f, VarSelector::X);
        assert_relative_eq!(d.eval_xy(2.0, 0.0).unwrap(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_circle_implicit_slope() {
        let (x, y) = symbols!(x, y);
        let circle = x.pow(Expr::Const(2.0)) + y.pow(Expr::Const(2.0)) - Expr::Const(1.0);
        let result = compute_implicit_derivative(&circle);
        assert!(result.text.starts_with("dy/dx = "));
        assert_relative_eq!(result.evaluate_at(0.6, 0.8).unwrap(), -0.75, epsilon = 1e-9);
    }

    // d/dx ∫ f dx = f on the rules that integrate symbolically
    #[test]
    fn test_integrate_then_differentiate() {
        let x = Expr::Var("x".to_string());
        let functions = vec![
            x.clone().pow(Expr::Const(2.0)),
            Expr::sin(x.clone().boxed()),
            x.clone().exp(),
            Expr::Const(3.0) * x.clone(),
        ];
        for f in functions {
            let (big_f, steps) = integrate(&f, VarSelector::X);
            assert!(steps.iter().all(|s| !s.is_fallback()), "fallback for {}", f);
            let (back, _) = differentiate(&big_f, VarSelector::X);
            for p in [-1.5, -0.3, 0.4, 1.0, 2.7] {
                assert_relative_eq!(
                    back.eval_xy(p, 0.0).unwrap(),
                    f.eval_xy(p, 0.0).unwrap(),
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_unsupported_product_returns_input() {
        let x = Expr::Var("x".to_string());
        let f = x.clone() * Expr::sin(x.boxed());
        let (result, steps) = integrate(&f, VarSelector::X);
        assert_eq!(result, f);
        assert!(steps.iter().any(|s| s.is_fallback()));
        assert!(
            steps
                .iter()
                .any(|s| s.description.contains("not integrated"))
        );
    }

    #[test]
    fn test_sum_rule_precedes_chain_rule() {
        let x = Expr::Var("x".to_string());
        let f = x.clone() + Expr::sin(x.boxed());
        let (_, steps) = differentiate(&f, VarSelector::X);
        let sum = steps
            .iter()
            .position(|s| s.description.starts_with("Sum Rule"))
            .unwrap();
        let chain = steps
            .iter()
            .position(|s| s.description.contains("sin(u)"))
            .unwrap();
        assert_eq!(sum, 0);
        assert!(sum < chain);
    }

    #[test]
    fn test_traces_do_not_accumulate_between_calls() {
        let x = Expr::Var("x".to_string());
        let f = x.clone() * x;
        let (_, first) = differentiate(&f, VarSelector::X);
        let (_, second) = differentiate(&f, VarSelector::X);
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_calls_on_independent_inputs() {
        let handles: Vec<_> = (1..=4)
            .map(|k| {
                std::thread::spawn(move || {
                    let x = Expr::Var("x".to_string());
                    let f = x.pow(Expr::Const(k as f64));
                    let (d, steps) = differentiate(&f, VarSelector::X);
                    (k, d.eval_xy(2.0, 0.0).unwrap(), steps.len())
                })
            })
            .collect();
        for handle in handles {
            let (k, value, n_steps) = handle.join().unwrap();
            let expected = k as f64 * 2.0_f64.powi(k - 1);
            assert_relative_eq!(value, expected, epsilon = 1e-9);
            // power rule, identity rule, closing step
            assert_eq!(n_steps, 3);
        }
    }

    #[test]
    fn test_double_integral_of_constant_is_area() {
        let (value, steps) = double_integrate(&Expr::Const(2.0), (0.0, 3.0), (-1.0, 1.0)).unwrap();
        assert_relative_eq!(value, 12.0, epsilon = 1e-9);
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn test_double_integral_of_gaussian_like_surface() {
        let (x, y) = symbols!(x, y);
        let f = (Expr::Const(-1.0) * (x.clone() * x + y.clone() * y)).exp();
        let (value, _) = double_integrate(&f, (-3.0, 3.0), (-3.0, 3.0)).unwrap();
        assert_relative_eq!(value, f64::consts::PI, epsilon = 1e-3);
    }

    #[test]
    fn test_symbols_from_list() {
        let (x, y) = symbols!(x, y);
        assert_eq!(Expr::Symbols("x, y"), vec![x.clone(), y.clone()]);
        // blank entries are skipped
        assert_eq!(Expr::Symbols("x, ,y,"), vec![x, y]);
        assert!(Expr::Symbols("").is_empty());
    }

    #[test]
    fn test_substitute_variable() {
        let (x, y) = symbols!(x, y);
        let f = Expr::sin(x.clone().boxed()) * x.clone().pow(Expr::Const(2.0)) + y.clone();
        let g = f.substitute_variable("x", &y);
        assert_eq!(
            g,
            Expr::sin(y.clone().boxed()) * y.clone().pow(Expr::Const(2.0)) + y.clone()
        );
        assert_eq!(g.all_arguments_are_variables(), vec!["y".to_string()]);
        // a name that does not occur leaves the tree as it was
        assert_eq!(f.substitute_variable("z", &y), f);
    }

    #[test]
    fn test_set_variable_then_evaluate() {
        let (x, y) = symbols!(x, y);
        let f = x.clone() * y.clone() + x.exp();
        let g = f.set_variable("x", 2.0);
        assert!(!g.contains_variable("x"));
        assert_relative_eq!(
            g.eval_expression(&["y"], &[3.0]).unwrap(),
            6.0 + 2.0_f64.exp(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            g.eval_expression(&["y"], &[3.0]).unwrap(),
            f.eval_xy(2.0, 3.0).unwrap(),
            epsilon = 1e-12
        );
    }
}
