use super::*;
use inkmath::{AnswerKind, answer, answer_system, answer_triangle};

#[test]
fn quadratic_equation() {
  let result = answer("x^2 - 5 x + 6 = 0").unwrap();
  assert_eq!(result.kind, AnswerKind::Equation);
  assert_eq!(result.latex, "x = 3, \\quad x = 2");
  assert_eq!(result.numeric, None);
  assert_eq!(result.prompt, "x^2 - 5 x + 6 = 0");
}

#[test]
fn linear_equation_has_numeric_value() {
  let result = answer("2x + 4 = 0").unwrap();
  assert_eq!(result.latex, "x = -2");
  assert_eq!(result.numeric, Some(-2.0));
}

#[test]
fn complex_roots() {
  let result = answer("x^2 + 1 = 0").unwrap();
  assert_eq!(result.latex, "x = 0 + 1i, \\quad x = 0 - 1i");
}

#[test]
fn definite_integral() {
  let result = answer("\\int_0^1 x^2 dx").unwrap();
  assert_eq!(result.kind, AnswerKind::Integral);
  assert_eq!(result.latex, "0.333333");
  assert_relative_eq!(result.numeric.unwrap(), 1.0 / 3.0);
}

#[test]
fn indefinite_integral() {
  let result = answer("\\int 2x dx").unwrap();
  assert_eq!(result.latex, "x^{2} + C");
  assert_eq!(result.numeric, None);
}

#[test]
fn constant_expression() {
  let result = answer("2^3 + 1").unwrap();
  assert_eq!(result.kind, AnswerKind::Expression);
  assert_eq!(result.latex, "9");
  assert_eq!(result.numeric, Some(9.0));
}

#[test]
fn polynomial_expression() {
  let result = answer("(x+1)(x-1)").unwrap();
  assert_eq!(result.latex, "x^{2} - 1");
  assert!(result.steps.mentions("expanded"));
}

#[test]
fn system() {
  let result = answer_system(&["x + y = 5", "x - y = -1"]).unwrap();
  assert_eq!(result.kind, AnswerKind::System);
  assert_eq!(result.latex, "x = 2, \\quad y = 3");
  assert_eq!(result.prompt, "x + y = 5, x - y = -1");
}

#[test]
fn system_entries_must_be_equations() {
  assert!(matches!(
    answer_system(&["x + 1"]),
    Err(MathError::UnsupportedExpression(_))
  ));
}

#[test]
fn triangle() {
  let measurement = TriangleMeasurement {
    a: Some(3.0),
    b: Some(4.0),
    right_at: Some(Vertex::C),
    ..Default::default()
  };
  let result = answer_triangle(measurement).unwrap();
  assert_eq!(result.kind, AnswerKind::Triangle);
  assert!(result.latex.contains("c = 5"));
  assert!(result.latex.contains("C = 90^\\circ"));
  assert_relative_eq!(result.numeric.unwrap(), 6.0, epsilon = 1e-9);
  assert_eq!(result.prompt, "a = 3, b = 4, right angle at C");
}

#[test]
fn empty_prompt() {
  assert!(matches!(answer("  "), Err(MathError::EmptyInput)));
}
