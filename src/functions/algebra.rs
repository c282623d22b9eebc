use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use crate::functions::polynomial::compile;
use crate::steps::Steps;
use crate::syntax::{BinaryOperator, Equation, Node};
use crate::{MathError, format_real};

/// One root of a polynomial equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Root {
  Real(f64),
  Complex { re: f64, im: f64 },
}

impl Root {
  pub fn as_real(&self) -> Option<f64> {
    match self {
      Root::Real(value) => Some(*value),
      Root::Complex { .. } => None,
    }
  }

  pub fn is_real(&self) -> bool {
    matches!(self, Root::Real(_))
  }
}

impl fmt::Display for Root {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Root::Real(value) => write!(f, "{}", format_real(*value)),
      Root::Complex { re, im } => {
        let sign = if *im < 0.0 { '-' } else { '+' };
        write!(f, "{} {} {}i", format_real(*re), sign, format_real(im.abs()))
      }
    }
  }
}

/// Result of an algebra solve, shaped like the input that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum SolutionSet {
  /// Roots of a single equation in `variable`.
  Roots { variable: String, roots: Vec<Root> },
  /// Values of a linear system, keyed by variable name.
  Assignment(BTreeMap<String, f64>),
}

// ─── Single equation ────────────────────────────────────────────────

fn solve_polynomial(
  coeffs: &[f64],
  equation: &Equation,
  steps: &mut Steps,
) -> Result<Vec<Root>, MathError> {
  match coeffs.len().saturating_sub(1) {
    1 => {
      let (b, a) = (coeffs[0], coeffs[1]);
      if a == 0.0 {
        return Err(MathError::DegenerateEquation(equation.to_string()));
      }
      steps.record(format!(
        "Solved linear equation {}·x + {} = 0 as x = -b/a",
        format_real(a),
        format_real(b)
      ));
      Ok(vec![Root::Real(-b / a)])
    }
    2 => {
      let (c, b, a) = (coeffs[0], coeffs[1], coeffs[2]);
      if a == 0.0 {
        steps.record("Quadratic coefficient is zero, solving as linear");
        return solve_polynomial(&coeffs[..2], equation, steps);
      }
      let discriminant = b * b - 4.0 * a * c;
      steps.record(format!(
        "Computed discriminant b² - 4ac = {}",
        format_real(discriminant)
      ));
      let roots = if discriminant < 0.0 {
        let re = -b / (2.0 * a);
        let im = (-discriminant).sqrt() / (2.0 * a);
        vec![Root::Complex { re, im }, Root::Complex { re, im: -im }]
      } else {
        let sqrt_disc = discriminant.sqrt();
        vec![
          Root::Real((-b + sqrt_disc) / (2.0 * a)),
          Root::Real((-b - sqrt_disc) / (2.0 * a)),
        ]
      };
      steps.record("Solved using the quadratic formula");
      Ok(roots)
    }
    degree => Err(MathError::UnsupportedDegree {
      degree,
      equation: equation.to_string(),
    }),
  }
}

/// Solve one equation for its lexicographically smallest free variable.
///
/// Only degree 1 and 2 polynomials are handled; a negative discriminant
/// yields a complex-conjugate pair.
pub fn solve(equation: &Equation) -> Result<(Vec<Root>, Steps), MathError> {
  debug!(equation = %equation, "solving equation");
  let variables = equation.variables();
  let variable = variables
    .first()
    .ok_or_else(|| MathError::EmptyVariableSet(equation.to_string()))?;

  let mut steps = Steps::new();
  steps.record(format!("Selected variable {}", variable));

  let difference = equation.as_difference();
  let poly = compile(difference.tree(), variable)?;
  let degree = poly.degree().unwrap_or(0) as usize;
  if degree > 2 {
    return Err(MathError::UnsupportedDegree {
      degree,
      equation: equation.to_string(),
    });
  }
  let coeffs = poly.dense_coefficients();
  steps.record(format!(
    "Converted {} = 0 to polynomial {} of degree {}",
    difference,
    poly.render(variable),
    degree
  ));

  let roots = solve_polynomial(&coeffs, equation, &mut steps)?;
  Ok((roots, steps))
}

// ─── Linear systems ─────────────────────────────────────────────────

/// `Σ coefficients[v]·v + constant`.
#[derive(Debug, Clone, Default, PartialEq)]
struct LinearTerms {
  coefficients: BTreeMap<String, f64>,
  constant: f64,
}

impl LinearTerms {
  fn constant(value: f64) -> Self {
    LinearTerms {
      coefficients: BTreeMap::new(),
      constant: value,
    }
  }

  fn variable(name: &str) -> Self {
    LinearTerms {
      coefficients: BTreeMap::from([(name.to_string(), 1.0)]),
      constant: 0.0,
    }
  }

  fn is_constant(&self) -> bool {
    self.coefficients.is_empty()
  }

  fn coefficient(&self, name: &str) -> f64 {
    self.coefficients.get(name).copied().unwrap_or(0.0)
  }

  fn scale(mut self, factor: f64) -> Self {
    for value in self.coefficients.values_mut() {
      *value *= factor;
    }
    self.constant *= factor;
    self
  }

  fn add(mut self, other: LinearTerms, sign: f64) -> Self {
    for (name, value) in other.coefficients {
      *self.coefficients.entry(name).or_insert(0.0) += sign * value;
    }
    self.constant += sign * other.constant;
    self
  }
}

fn linear_terms(node: &Node) -> Result<LinearTerms, MathError> {
  match node {
    Node::Constant(value) => Ok(LinearTerms::constant(*value)),
    Node::Variable(name) => Ok(LinearTerms::variable(name)),
    Node::UnaryMinus(operand) => Ok(linear_terms(operand)?.scale(-1.0)),
    Node::BinOp { op, left, right } => match op {
      BinaryOperator::Plus => {
        Ok(linear_terms(left)?.add(linear_terms(right)?, 1.0))
      }
      BinaryOperator::Minus => {
        Ok(linear_terms(left)?.add(linear_terms(right)?, -1.0))
      }
      BinaryOperator::Times => {
        let (left, right) = (linear_terms(left)?, linear_terms(right)?);
        if left.is_constant() {
          Ok(right.scale(left.constant))
        } else if right.is_constant() {
          Ok(left.scale(right.constant))
        } else {
          Err(MathError::NonLinearEquation(node.to_string()))
        }
      }
      BinaryOperator::Divide | BinaryOperator::Power => {
        Err(MathError::NonLinearEquation(node.to_string()))
      }
    },
  }
}

fn describe_system(equations: &[Equation]) -> String {
  equations
    .iter()
    .map(|eq| eq.to_string())
    .collect::<Vec<_>>()
    .join("; ")
}

fn solve_two_by_two(
  equations: &[Equation],
  variables: &[String],
) -> Result<(SolutionSet, Steps), MathError> {
  let mut steps = Steps::new();
  let mut rows = Vec::with_capacity(2);
  let mut consts = Vec::with_capacity(2);
  for equation in equations {
    let terms = linear_terms(equation.as_difference().tree())?;
    rows.push([
      terms.coefficient(&variables[0]),
      terms.coefficient(&variables[1]),
    ]);
    consts.push(-terms.constant);
  }
  let [a11, a12] = rows[0];
  let [a21, a22] = rows[1];
  let (b1, b2) = (consts[0], consts[1]);
  steps.record(format!(
    "Constructed linear system [[{}, {}], [{}, {}]]·({}, {}) = ({}, {})",
    format_real(a11),
    format_real(a12),
    format_real(a21),
    format_real(a22),
    variables[0],
    variables[1],
    format_real(b1),
    format_real(b2)
  ));

  let det = a11 * a22 - a12 * a21;
  if det == 0.0 {
    return Err(MathError::SingularSystem(describe_system(equations)));
  }
  let x = (b1 * a22 - a12 * b2) / det;
  let y = (a11 * b2 - b1 * a21) / det;
  steps.record(format!(
    "Solved using Cramer's rule with determinant {}",
    format_real(det)
  ));

  let solution = BTreeMap::from([
    (variables[0].clone(), x),
    (variables[1].clone(), y),
  ]);
  Ok((SolutionSet::Assignment(solution), steps))
}

/// Solve a square system: one equation in one unknown, or two linear
/// equations in two unknowns (Cramer's rule).
pub fn solve_system(
  equations: &[Equation],
) -> Result<(SolutionSet, Steps), MathError> {
  debug!(system = %describe_system(equations), "solving system");
  let variables: BTreeSet<String> =
    equations.iter().flat_map(|eq| eq.variables()).collect();
  if variables.is_empty() {
    return Err(MathError::EmptyVariableSet(describe_system(equations)));
  }
  if variables.len() != equations.len() {
    return Err(MathError::UnsupportedSystemShape {
      equations: equations.len(),
      variables: variables.len(),
    });
  }

  let variables: Vec<String> = variables.into_iter().collect();
  match variables.len() {
    1 => {
      let (roots, steps) = solve(&equations[0])?;
      let variable = variables[0].clone();
      Ok((SolutionSet::Roots { variable, roots }, steps))
    }
    2 => solve_two_by_two(equations, &variables),
    n => Err(MathError::UnsupportedSystemShape {
      equations: n,
      variables: n,
    }),
  }
}
