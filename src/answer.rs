//! Display-ready answers for the rendering side: a LaTeX result string, the
//! derivation steps and, where one exists, a single numeric value.

use std::fmt;

use crate::functions::algebra::{Root, SolutionSet, solve, solve_system};
use crate::functions::calculus::{fold_constant, integrate};
use crate::functions::polynomial::compile;
use crate::functions::triangle::{TriangleMeasurement, Vertex, solve_triangle};
use crate::latex::{ParsedInput, normalize};
use crate::steps::Steps;
use crate::syntax::{Equation, Expression};
use crate::{MathError, format_real};

const SEPARATOR: &str = ", \\quad ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerKind {
  Expression,
  Equation,
  System,
  Integral,
  Triangle,
}

impl AnswerKind {
  pub fn as_str(self) -> &'static str {
    match self {
      AnswerKind::Expression => "expr",
      AnswerKind::Equation => "equation",
      AnswerKind::System => "system",
      AnswerKind::Integral => "integral",
      AnswerKind::Triangle => "triangle",
    }
  }
}

impl fmt::Display for AnswerKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
  pub prompt: String,
  pub kind: AnswerKind,
  pub latex: String,
  pub steps: Steps,
  pub numeric: Option<f64>,
}

fn roots_latex(variable: &str, roots: &[Root]) -> String {
  roots
    .iter()
    .map(|root| format!("{} = {}", variable, root))
    .collect::<Vec<_>>()
    .join(SEPARATOR)
}

fn solution_latex(solution: &SolutionSet) -> (String, Option<f64>) {
  match solution {
    SolutionSet::Roots { variable, roots } => {
      let numeric = match roots.as_slice() {
        [root] => root.as_real(),
        _ => None,
      };
      (roots_latex(variable, roots), numeric)
    }
    SolutionSet::Assignment(values) => {
      let latex = values
        .iter()
        .map(|(name, value)| format!("{} = {}", name, format_real(*value)))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
      (latex, None)
    }
  }
}

fn answer_equation(
  prompt: &str,
  equation: &Equation,
) -> Result<Answer, MathError> {
  let (roots, steps) = solve(equation)?;
  let variable = equation
    .variables()
    .into_iter()
    .next()
    .ok_or_else(|| MathError::EmptyVariableSet(equation.to_string()))?;
  let (latex, numeric) =
    solution_latex(&SolutionSet::Roots { variable, roots });
  Ok(Answer {
    prompt: prompt.to_string(),
    kind: AnswerKind::Equation,
    latex,
    steps,
    numeric,
  })
}

fn answer_expression(
  prompt: &str,
  expr: &Expression,
) -> Result<Answer, MathError> {
  let mut steps = Steps::new();
  if let Some(value) = fold_constant(expr.tree()) {
    steps.record(format!("Evaluated {} = {}", expr, format_real(value)));
    return Ok(Answer {
      prompt: prompt.to_string(),
      kind: AnswerKind::Expression,
      latex: format_real(value),
      steps,
      numeric: Some(value),
    });
  }

  let variables = expr.variables();
  let variable = variables
    .first()
    .ok_or_else(|| MathError::EmptyVariableSet(expr.to_string()))?;
  let poly = compile(expr.tree(), variable)?;
  steps.record(format!(
    "Expanded {} as a polynomial in {}: {}",
    expr,
    variable,
    poly.render(variable)
  ));
  Ok(Answer {
    prompt: prompt.to_string(),
    kind: AnswerKind::Expression,
    latex: poly.to_latex(variable),
    steps,
    numeric: None,
  })
}

/// Classify `latex` and solve, integrate or evaluate it.
pub fn answer(latex: &str) -> Result<Answer, MathError> {
  let prompt = latex.trim();
  match normalize(latex)? {
    ParsedInput::Equation(equation) => answer_equation(prompt, &equation),
    ParsedInput::Expression(expr) => answer_expression(prompt, &expr),
    ParsedInput::Integral(integral) => {
      let solution = integrate(&integral)?;
      let latex = match solution.value {
        Some(value) => format_real(value),
        None => format!(
          "{} + C",
          solution.antiderivative.to_latex(&integral.variable)
        ),
      };
      Ok(Answer {
        prompt: prompt.to_string(),
        kind: AnswerKind::Integral,
        latex,
        steps: solution.steps,
        numeric: solution.value,
      })
    }
  }
}

/// Solve a system given as one LaTeX equation per entry.
pub fn answer_system<S: AsRef<str>>(
  equations: &[S],
) -> Result<Answer, MathError> {
  let parsed = equations
    .iter()
    .map(|text| match normalize(text.as_ref())? {
      ParsedInput::Equation(equation) => Ok(equation),
      _ => Err(MathError::UnsupportedExpression(format!(
        "expected an equation: {}",
        text.as_ref().trim()
      ))),
    })
    .collect::<Result<Vec<_>, _>>()?;
  let (solution, steps) = solve_system(&parsed)?;
  let (latex, numeric) = solution_latex(&solution);
  let prompt = equations
    .iter()
    .map(|text| text.as_ref().trim())
    .collect::<Vec<_>>()
    .join(", ");
  Ok(Answer {
    prompt,
    kind: AnswerKind::System,
    latex,
    steps,
    numeric,
  })
}

fn describe_measurement(m: &TriangleMeasurement) -> String {
  let mut parts = Vec::new();
  for vertex in Vertex::ALL {
    if let Some(side) = m.side(vertex) {
      parts.push(format!("{} = {}", vertex.side_name(), format_real(side)));
    }
  }
  for vertex in Vertex::ALL {
    if let Some(angle) = m.angle(vertex) {
      parts.push(format!("{} = {}°", vertex, format_real(angle)));
    }
  }
  if let Some(vertex) = m.right_at {
    parts.push(format!("right angle at {}", vertex));
  }
  parts.join(", ")
}

/// Solve a triangle; the numeric value is its area.
pub fn answer_triangle(
  measurement: TriangleMeasurement,
) -> Result<Answer, MathError> {
  let prompt = describe_measurement(&measurement);
  let (solved, steps) = solve_triangle(measurement)?;
  let latex = [
    format!("a = {}", format_real(solved.a)),
    format!("b = {}", format_real(solved.b)),
    format!("c = {}", format_real(solved.c)),
    format!("A = {}^\\circ", format_real(solved.angle_a)),
    format!("B = {}^\\circ", format_real(solved.angle_b)),
    format!("C = {}^\\circ", format_real(solved.angle_c)),
    format!("P = {}", format_real(solved.perimeter)),
    format!("S = {}", format_real(solved.area)),
  ]
  .join(SEPARATOR);
  Ok(Answer {
    prompt,
    kind: AnswerKind::Triangle,
    latex,
    steps,
    numeric: Some(solved.area),
  })
}
