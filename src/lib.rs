//! Symbolic math engine for OCR'd handwritten LaTeX.
//!
//! Raw LaTeX goes through [`latex::normalize`] and comes out as an
//! [`Expression`], [`Equation`] or [`IntegralExpr`], which the solvers under
//! [`functions`] turn into results plus a human-readable [`Steps`] trace.

use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

pub mod answer;
pub mod functions;
pub mod latex;
pub mod ocr_text;
pub mod steps;
pub mod syntax;

pub use answer::{Answer, AnswerKind, answer, answer_system, answer_triangle};
pub use functions::algebra::{Root, SolutionSet, solve, solve_system};
pub use functions::calculus::{IntegralSolution, fold_constant, integrate};
pub use functions::polynomial::{Polynomial, compile};
pub use functions::triangle::{
  SolvedTriangle, TriangleMeasurement, Vertex, solve_triangle,
};
pub use latex::{InputKind, ParsedInput, canonicalize, normalize};
pub use ocr_text::clean_ocr_text;
pub use steps::Steps;
pub use syntax::{BinaryOperator, Equation, Expression, IntegralExpr, Node};

#[derive(Parser)]
#[grammar = "expression.pest"]
pub struct ExpressionParser;

#[derive(Error, Debug)]
pub enum MathError {
  #[error("Parse error: {0}")]
  ParseError(#[from] Box<pest::error::Error<Rule>>),
  #[error("Empty input")]
  EmptyInput,
  #[error("Unsupported syntax in expression: {0}")]
  UnsupportedSyntax(String),
  #[error("Unexpected variable {0}")]
  UnboundVariable(String),
  #[error("Unsupported expression: {0}")]
  UnsupportedExpression(String),
  #[error("Equation has no variables: {0}")]
  EmptyVariableSet(String),
  #[error("Degenerate linear equation: {0}")]
  DegenerateEquation(String),
  #[error("Polynomial degree {degree} not supported: {equation}")]
  UnsupportedDegree { degree: usize, equation: String },
  #[error("Equation is not linear: {0}")]
  NonLinearEquation(String),
  #[error("System determinant is zero: {0}")]
  SingularSystem(String),
  #[error(
    "Unsupported system shape: {equations} equation(s) in {variables} \
     variable(s)"
  )]
  UnsupportedSystemShape { equations: usize, variables: usize },
  #[error("Integral bounds must be numeric constants: {0}")]
  NonConstantBound(String),
  #[error("Unbalanced delimiters in integral bounds: {0}")]
  BoundsUnbalanced(String),
  #[error("Integral missing differential: {0}")]
  MissingDifferential(String),
  #[error("Could not determine integration variable: {0}")]
  MissingVariable(String),
  #[error("Inconsistent measurements for law of sines (ratio {ratio})")]
  InconsistentMeasurement { ratio: f64 },
  #[error("Invalid triangle measurement: {0}")]
  InvalidMeasurement(String),
  #[error(
    "Insufficient information to solve triangle (missing {})",
    .missing.join(", ")
  )]
  InsufficientData { missing: Vec<&'static str> },
}

impl ExpressionParser {
  pub fn parse_program(
    input: &str,
  ) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    Self::parse(Rule::Program, input).map_err(Box::new)
  }
}

/// Run the surface grammar over `input` without building or validating a tree.
pub fn parse(
  input: &str,
) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>> {
  ExpressionParser::parse_program(input)
}

/// Format a float for display: whole numbers without a fractional part,
/// everything else rounded to at most six decimals.
pub fn format_real(value: f64) -> String {
  if value.fract() == 0.0 && value.abs() < 1e15 {
    return format!("{}", value as i64);
  }
  let rounded = format!("{:.6}", value);
  let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
  if trimmed == "-0" {
    "0".to_string()
  } else {
    trimmed.to_string()
  }
}
