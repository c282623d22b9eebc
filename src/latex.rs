use std::fmt;

use tracing::debug;

use crate::MathError;
use crate::syntax::{Equation, Expression, IntegralExpr};

const INTEGRAL_MARKER: &str = "\\int";

/// What a LaTeX string turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedInput {
  Expression(Expression),
  Equation(Equation),
  Integral(IntegralExpr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
  Expression,
  Equation,
  Integral,
}

impl InputKind {
  pub fn as_str(self) -> &'static str {
    match self {
      InputKind::Expression => "expr",
      InputKind::Equation => "equation",
      InputKind::Integral => "integral",
    }
  }
}

impl fmt::Display for InputKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl ParsedInput {
  pub fn kind(&self) -> InputKind {
    match self {
      ParsedInput::Expression(_) => InputKind::Expression,
      ParsedInput::Equation(_) => InputKind::Equation,
      ParsedInput::Integral(_) => InputKind::Integral,
    }
  }
}

// ─── Rewrite pipeline ───────────────────────────────────────────────

fn strip_latex_spacing(expr: &str) -> String {
  expr
    .replace("\\,", " ")
    .replace("\\!", " ")
    .replace("\\left", "")
    .replace("\\right", "")
    .replace('{', "(")
    .replace('}', ")")
    .replace("\\cdot", "*")
    .replace("\\times", "*")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Token {
  Number,
  Word,
  Close,
  Other,
}

fn token_of(c: char) -> Token {
  if c.is_ascii_digit() || c == '.' {
    Token::Number
  } else if c.is_ascii_alphabetic() || c == '_' {
    Token::Word
  } else if c == ')' {
    Token::Close
  } else {
    Token::Other
  }
}

/// Make juxtaposed operands explicit products, drop whitespace and spell
/// the power operator as `**`.
///
/// A number, name or closing parenthesis followed by a name or an opening
/// parenthesis becomes a product, whether or not whitespace separates them.
/// Letters and digits directly following a name extend the name.
fn normalize_products(expr: &str) -> String {
  let mut out = String::with_capacity(expr.len() + 8);
  let mut prev: Option<Token> = None;
  let mut gap = false;

  for c in expr.chars() {
    if c.is_whitespace() {
      gap = true;
      continue;
    }
    let continues = !gap
      && match prev {
        Some(Token::Word) => c.is_ascii_alphanumeric() || c == '_',
        Some(Token::Number) => c.is_ascii_digit() || c == '.',
        _ => false,
      };
    let opens_operand = c.is_ascii_alphabetic() || c == '(';
    if !continues
      && opens_operand
      && matches!(prev, Some(Token::Number | Token::Word | Token::Close))
    {
      out.push('*');
    }
    if c == '^' {
      out.push_str("**");
    } else {
      out.push(c);
    }
    if !continues {
      prev = Some(token_of(c));
    }
    gap = false;
  }
  out
}

/// Rewrite a LaTeX fragment into the canonical text the expression parser
/// accepts, e.g. `x^2 - 5 x + 6` becomes `x**2-5*x+6`.
pub fn canonicalize(fragment: &str) -> String {
  normalize_products(&strip_latex_spacing(fragment))
}

fn parse_canonical(fragment: &str) -> Result<Expression, MathError> {
  Expression::parse(&canonicalize(fragment))
}

// ─── Classification ─────────────────────────────────────────────────

/// Position of the first `=` outside any bracket pair.
fn top_level_equals(text: &str) -> Option<usize> {
  let mut depth = 0i32;
  for (index, c) in text.char_indices() {
    match c {
      '(' | '{' | '[' => depth += 1,
      ')' | '}' | ']' => depth -= 1,
      '=' if depth == 0 => return Some(index),
      _ => {}
    }
  }
  None
}

/// Classify raw LaTeX and turn it into a validated value object.
pub fn normalize(latex: &str) -> Result<ParsedInput, MathError> {
  let cleaned = latex.trim();
  if cleaned.is_empty() {
    return Err(MathError::EmptyInput);
  }
  debug!(input = cleaned, "normalizing latex");

  if let Some(rest) = cleaned.strip_prefix(INTEGRAL_MARKER) {
    return parse_integral(rest).map(ParsedInput::Integral);
  }
  if let Some(index) = top_level_equals(cleaned) {
    let (left, right) = (&cleaned[..index], &cleaned[index + 1..]);
    let equation =
      Equation::new(parse_canonical(left)?, parse_canonical(right)?);
    return Ok(ParsedInput::Equation(equation));
  }
  parse_canonical(cleaned).map(ParsedInput::Expression)
}

// ─── Integral scanner ───────────────────────────────────────────────

/// Split a bound off the front of `text`.
///
/// A bracketed bound runs to its matching bracket (only the opening kind is
/// counted); anything else is a single character.
fn extract_bound(text: &str) -> Result<(&str, &str), MathError> {
  let Some(opening) = text.chars().next() else {
    return Ok(("", ""));
  };
  let closing = match opening {
    '(' => ')',
    '{' => '}',
    '[' => ']',
    _ => {
      let width = opening.len_utf8();
      return Ok((&text[..width], &text[width..]));
    }
  };
  let mut depth = 0usize;
  for (index, c) in text.char_indices() {
    if c == opening {
      depth += 1;
    } else if c == closing {
      depth -= 1;
      if depth == 0 {
        return Ok((&text[1..index], &text[index + 1..]));
      }
    }
  }
  Err(MathError::BoundsUnbalanced(text.to_string()))
}

fn parse_bound(bound: Option<&str>) -> Result<Option<Expression>, MathError> {
  match bound {
    Some(text) if !text.is_empty() => parse_canonical(text).map(Some),
    _ => Ok(None),
  }
}

/// Scan everything after the `\int` marker: optional `_lower` then optional
/// `^upper` (in that order), then `<integrand> d<variable>`.
fn parse_integral(body: &str) -> Result<IntegralExpr, MathError> {
  let mut rest = body.trim_start();
  let mut lower = None;
  let mut upper = None;

  if let Some(after) = rest.strip_prefix('_') {
    let (bound, remainder) = extract_bound(after)?;
    lower = Some(bound);
    rest = remainder;
    if let Some(after) = rest.strip_prefix('^') {
      let (bound, remainder) = extract_bound(after)?;
      upper = Some(bound);
      rest = remainder;
    }
  }
  rest = rest.trim_start();
  if upper.is_none()
    && let Some(after) = rest.strip_prefix('^')
  {
    let (bound, remainder) = extract_bound(after)?;
    upper = Some(bound);
    rest = remainder;
  }
  rest = rest.trim_start();

  let (integrand, variable) = rest
    .split_once('d')
    .ok_or_else(|| MathError::MissingDifferential(body.to_string()))?;
  let variable = variable.trim();
  let variable = variable.strip_prefix('\\').unwrap_or(variable).trim();
  if variable.is_empty() {
    return Err(MathError::MissingVariable(body.to_string()));
  }

  Ok(IntegralExpr {
    integrand: parse_canonical(integrand)?,
    variable: variable.to_string(),
    lower: parse_bound(lower)?,
    upper: parse_bound(upper)?,
  })
}
