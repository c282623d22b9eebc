use tracing::debug;

use crate::functions::polynomial::{Polynomial, compile, exponent_overflow};
use crate::steps::Steps;
use crate::syntax::{BinaryOperator, Expression, IntegralExpr, Node};
use crate::{MathError, format_real};

#[derive(Debug, Clone, PartialEq)]
pub struct IntegralSolution {
  pub antiderivative: Polynomial,
  pub steps: Steps,
  /// Present only when both bounds were given.
  pub value: Option<f64>,
}

/// Term-wise power rule: `c·x^e` becomes `c/(e+1)·x^(e+1)`.
pub fn antiderivative(poly: &Polynomial) -> Result<Polynomial, MathError> {
  let terms = poly
    .terms()
    .map(|(exponent, coefficient)| {
      let raised = exponent
        .checked_add(1)
        .ok_or_else(|| exponent_overflow(exponent, 1))?;
      Ok((raised, coefficient / f64::from(raised)))
    })
    .collect::<Result<Vec<_>, MathError>>()?;
  Ok(Polynomial::from_terms(terms))
}

/// Reduce a variable-free tree to a number; `None` as soon as an
/// identifier is met.
pub fn fold_constant(node: &Node) -> Option<f64> {
  match node {
    Node::Constant(value) => Some(*value),
    Node::Variable(_) => None,
    Node::UnaryMinus(operand) => fold_constant(operand).map(|v| -v),
    Node::BinOp { op, left, right } => {
      let (left, right) = (fold_constant(left)?, fold_constant(right)?);
      Some(match op {
        BinaryOperator::Plus => left + right,
        BinaryOperator::Minus => left - right,
        BinaryOperator::Times => left * right,
        BinaryOperator::Divide => left / right,
        BinaryOperator::Power => left.powf(right),
      })
    }
  }
}

/// A bound must fold to a finite number; `1/0` does not count.
fn bound_value(bound: &Expression) -> Result<f64, MathError> {
  fold_constant(bound.tree())
    .filter(|value| value.is_finite())
    .ok_or_else(|| MathError::NonConstantBound(bound.text().to_string()))
}

/// Integrate a polynomial integrand; evaluate it when both bounds exist.
pub fn integrate(
  integral: &IntegralExpr,
) -> Result<IntegralSolution, MathError> {
  debug!(integral = %integral, "integrating");
  let variable = integral.variable.as_str();
  let mut steps = Steps::new();
  steps.record(format!(
    "Parsed integral of {} with respect to {}",
    integral.integrand, variable
  ));

  let poly = compile(integral.integrand.tree(), variable)?;
  let antiderivative = antiderivative(&poly)?;
  steps.record(format!(
    "Integrated polynomial term-wise with the power rule: {}",
    antiderivative.render(variable)
  ));

  let value = match (&integral.lower, &integral.upper) {
    (Some(lower), Some(upper)) => {
      let (a, b) = (bound_value(lower)?, bound_value(upper)?);
      let value = antiderivative.evaluate(b) - antiderivative.evaluate(a);
      steps.record(format!(
        "Evaluated definite integral F({}) - F({}) = {}",
        format_real(b),
        format_real(a),
        format_real(value)
      ));
      Some(value)
    }
    _ => None,
  };

  Ok(IntegralSolution {
    antiderivative,
    steps,
    value,
  })
}
