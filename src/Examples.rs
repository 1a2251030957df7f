//! examples of usage of RustedStepCalc
/// Symbolic calculus examples: derivatives, implicit derivatives, integrals and Taylor polynomials
pub mod symbolic_examples;
