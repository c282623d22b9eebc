use std::collections::BTreeMap;

use crate::syntax::{BinaryOperator, Node};
use crate::{MathError, format_real};

/// Sparse single-variable polynomial: exponent → coefficient.
///
/// Entries whose coefficient cancelled to zero are kept until the caller
/// drops them; they still count towards [`Polynomial::degree`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polynomial {
  terms: BTreeMap<u32, f64>,
}

impl Polynomial {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn constant(value: f64) -> Self {
    Self::from_terms([(0, value)])
  }

  /// The bare variable, `{1: 1.0}`.
  pub fn variable() -> Self {
    Self::from_terms([(1, 1.0)])
  }

  /// Build from `(exponent, coefficient)` pairs, summing repeated exponents.
  pub fn from_terms(terms: impl IntoIterator<Item = (u32, f64)>) -> Self {
    let mut poly = Self::new();
    for (exponent, coefficient) in terms {
      *poly.terms.entry(exponent).or_insert(0.0) += coefficient;
    }
    poly
  }

  pub fn coefficient(&self, exponent: u32) -> f64 {
    self.terms.get(&exponent).copied().unwrap_or(0.0)
  }

  /// Terms in ascending exponent order.
  pub fn terms(&self) -> impl DoubleEndedIterator<Item = (u32, f64)> + '_ {
    self.terms.iter().map(|(&e, &c)| (e, c))
  }

  pub fn len(&self) -> usize {
    self.terms.len()
  }

  pub fn is_empty(&self) -> bool {
    self.terms.is_empty()
  }

  /// Highest exponent present, zero coefficients included.
  pub fn degree(&self) -> Option<u32> {
    self.terms.keys().next_back().copied()
  }

  pub fn is_bare_variable(&self) -> bool {
    self.terms.len() == 1 && self.terms.get(&1) == Some(&1.0)
  }

  /// Coefficient-wise sum over the union of exponents.
  pub fn combine(&self, other: &Polynomial) -> Polynomial {
    let mut result = self.clone();
    for (&exponent, &coefficient) in &other.terms {
      *result.terms.entry(exponent).or_insert(0.0) += coefficient;
    }
    result
  }

  /// Convolution: every exponent pair `(i, j)` contributes to `i + j`.
  ///
  /// Fails when an exponent sum leaves the `u32` range.
  pub fn multiply(
    &self,
    other: &Polynomial,
  ) -> Result<Polynomial, MathError> {
    let mut result = Polynomial::new();
    for (&p1, &c1) in &self.terms {
      for (&p2, &c2) in &other.terms {
        let exponent = p1
          .checked_add(p2)
          .ok_or_else(|| exponent_overflow(p1, p2))?;
        *result.terms.entry(exponent).or_insert(0.0) += c1 * c2;
      }
    }
    Ok(result)
  }

  pub fn negate(&self) -> Polynomial {
    Polynomial {
      terms: self.terms.iter().map(|(&e, &c)| (e, -c)).collect(),
    }
  }

  /// Dense coefficients indexed `0..=degree`, missing exponents as zero.
  pub fn dense_coefficients(&self) -> Vec<f64> {
    let Some(degree) = self.degree() else {
      return Vec::new();
    };
    let mut coeffs = vec![0.0; degree as usize + 1];
    for (&exponent, &coefficient) in &self.terms {
      coeffs[exponent as usize] = coefficient;
    }
    coeffs
  }

  /// Sum of `coefficient * x^exponent` over all terms.
  pub fn evaluate(&self, x: f64) -> f64 {
    self
      .terms
      .iter()
      .map(|(&exponent, &coefficient)| {
        let power = match i32::try_from(exponent) {
          Ok(exponent) => x.powi(exponent),
          Err(_) => x.powf(f64::from(exponent)),
        };
        coefficient * power
      })
      .sum()
  }

  /// Plain-text rendering in `variable`, highest power first, zero terms
  /// omitted: `2*x**2 - x + 0.5`.
  pub fn render(&self, variable: &str) -> String {
    self.join_terms(|exponent, magnitude| {
      let power = match exponent {
        0 => String::new(),
        1 => variable.to_string(),
        e => format!("{}**{}", variable, e),
      };
      match (exponent, magnitude == 1.0) {
        (0, _) => format_real(magnitude),
        (_, true) => power,
        (_, false) => format!("{}*{}", format_real(magnitude), power),
      }
    })
  }

  /// LaTeX rendering in `variable`: `2x^{2} - x + 0.5`.
  pub fn to_latex(&self, variable: &str) -> String {
    self.join_terms(|exponent, magnitude| {
      let power = match exponent {
        0 => String::new(),
        1 => variable.to_string(),
        e => format!("{}^{{{}}}", variable, e),
      };
      match (exponent, magnitude == 1.0) {
        (0, _) => format_real(magnitude),
        (_, true) => power,
        (_, false) => format!("{}{}", format_real(magnitude), power),
      }
    })
  }

  fn join_terms(&self, term: impl Fn(u32, f64) -> String) -> String {
    let mut out = String::new();
    for (exponent, coefficient) in self.terms().rev() {
      if coefficient == 0.0 {
        continue;
      }
      let body = term(exponent, coefficient.abs());
      match (out.is_empty(), coefficient < 0.0) {
        (true, false) => out.push_str(&body),
        (true, true) => {
          out.push('-');
          out.push_str(&body);
        }
        (false, false) => {
          out.push_str(" + ");
          out.push_str(&body);
        }
        (false, true) => {
          out.push_str(" - ");
          out.push_str(&body);
        }
      }
    }
    if out.is_empty() {
      out.push('0');
    }
    out
  }
}

pub(crate) fn exponent_overflow(left: u32, right: u32) -> MathError {
  MathError::UnsupportedExpression(format!(
    "exponent {} + {} is out of range",
    left, right
  ))
}

/// `base^exponent` by repeated squaring.
fn power(
  base: &Polynomial,
  mut exponent: u32,
) -> Result<Polynomial, MathError> {
  let mut result = Polynomial::constant(1.0);
  let mut square = base.clone();
  while exponent > 0 {
    if exponent & 1 == 1 {
      result = result.multiply(&square)?;
    }
    exponent >>= 1;
    if exponent > 0 {
      square = square.multiply(&square)?;
    }
  }
  Ok(result)
}

fn integer_exponent(node: &Node) -> Option<u32> {
  match node {
    Node::Constant(value)
      if *value >= 0.0 && value.fract() == 0.0 && *value <= u32::MAX as f64 =>
    {
      Some(*value as u32)
    }
    _ => None,
  }
}

/// Compile an expression tree into a polynomial in `variable`.
pub fn compile(node: &Node, variable: &str) -> Result<Polynomial, MathError> {
  match node {
    Node::Constant(value) => Ok(Polynomial::constant(*value)),
    Node::Variable(name) => {
      if name == variable {
        Ok(Polynomial::variable())
      } else {
        Err(MathError::UnboundVariable(name.clone()))
      }
    }
    Node::UnaryMinus(operand) => Ok(compile(operand, variable)?.negate()),
    Node::BinOp { op, left, right } => match op {
      BinaryOperator::Plus => {
        Ok(compile(left, variable)?.combine(&compile(right, variable)?))
      }
      BinaryOperator::Minus => Ok(
        compile(left, variable)?.combine(&compile(right, variable)?.negate()),
      ),
      BinaryOperator::Times => {
        compile(left, variable)?.multiply(&compile(right, variable)?)
      }
      BinaryOperator::Divide => Err(MathError::UnsupportedExpression(format!(
        "division is not polynomial: {}",
        node
      ))),
      BinaryOperator::Power => {
        let base = compile(left, variable)?;
        if !base.is_bare_variable() {
          return Err(MathError::UnsupportedExpression(format!(
            "power only supported on pure variable: {}",
            node
          )));
        }
        let exponent = integer_exponent(right).ok_or_else(|| {
          MathError::UnsupportedExpression(format!(
            "exponent must be a non-negative integer constant: {}",
            node
          ))
        })?;
        power(&base, exponent)
      }
    },
  }
}
