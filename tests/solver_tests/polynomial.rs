use super::*;
use inkmath::{Polynomial, compile};

fn compiled(text: &str) -> Result<Polynomial, MathError> {
  compile(Expression::parse(text).unwrap().tree(), "x")
}

#[test]
fn expands_products() {
  let poly = compiled("(x+1)*(x-1)").unwrap();
  assert_eq!(poly.degree(), Some(2));
  assert_eq!(poly.dense_coefficients(), vec![-1.0, 0.0, 1.0]);
  assert_eq!(poly.render("x"), "x**2 - 1");
}

#[test]
fn scalar_multiples_and_negation() {
  let poly = compiled("-(3*x**2) + 2*x*4 - 5").unwrap();
  assert_eq!(poly.coefficient(2), -3.0);
  assert_eq!(poly.coefficient(1), 8.0);
  assert_eq!(poly.coefficient(0), -5.0);
}

#[test]
fn zeroth_power_is_one() {
  assert_eq!(compiled("x**0").unwrap(), Polynomial::constant(1.0));
}

#[test]
fn power_needs_bare_variable() {
  assert!(matches!(
    compiled("(x+1)**2"),
    Err(MathError::UnsupportedExpression(_))
  ));
  assert!(matches!(
    compiled("2**x"),
    Err(MathError::UnsupportedExpression(_))
  ));
}

#[test]
fn power_needs_natural_exponent() {
  for text in ["x**2.5", "x**-1", "x**y"] {
    assert!(
      matches!(compiled(text), Err(MathError::UnsupportedExpression(_))),
      "{text} should be rejected"
    );
  }
}

#[test]
fn division_is_rejected() {
  assert!(matches!(
    compiled("x/2"),
    Err(MathError::UnsupportedExpression(_))
  ));
}

#[test]
fn foreign_identifier() {
  assert!(matches!(
    compiled("x + t"),
    Err(MathError::UnboundVariable(name)) if name == "t"
  ));
}

#[test]
fn evaluation() {
  let poly = Polynomial::from_terms([(2, 2.0), (1, -1.0), (0, 0.5)]);
  assert_relative_eq!(poly.evaluate(2.0), 6.5);
  assert_relative_eq!(poly.evaluate(0.0), 0.5);
}

#[test]
fn repeated_exponents_are_summed() {
  let poly = Polynomial::from_terms([(1, 2.0), (1, 3.0)]);
  assert_eq!(poly.len(), 1);
  assert_eq!(poly.coefficient(1), 5.0);
}

#[test]
fn latex_rendering() {
  let poly = compiled("x**2 - 5*x + 6").unwrap();
  assert_eq!(poly.render("x"), "x**2 - 5*x + 6");
  assert_eq!(poly.to_latex("x"), "x^{2} - 5x + 6");
}

#[test]
fn exponent_sum_out_of_range() {
  assert!(matches!(
    compiled("x**4294967295*x"),
    Err(MathError::UnsupportedExpression(_))
  ));
  assert_eq!(compiled("x**4294967295").unwrap().degree(), Some(u32::MAX));
}

#[test]
fn huge_exponents_evaluate_with_the_right_sign() {
  let poly = Polynomial::from_terms([(3_000_000_000, 1.0)]);
  assert_eq!(poly.evaluate(-1.0), 1.0);
  assert_eq!(poly.evaluate(2.0), f64::INFINITY);
}
