use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};

use crate::{MathError, Rule};

// ─── Tree ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
  Plus,
  Minus,
  Times,
  Divide,
  Power,
}

impl BinaryOperator {
  pub fn symbol(self) -> &'static str {
    match self {
      BinaryOperator::Plus => "+",
      BinaryOperator::Minus => "-",
      BinaryOperator::Times => "*",
      BinaryOperator::Divide => "/",
      BinaryOperator::Power => "**",
    }
  }

  fn precedence(self) -> u8 {
    match self {
      BinaryOperator::Plus | BinaryOperator::Minus => 1,
      BinaryOperator::Times | BinaryOperator::Divide => 2,
      BinaryOperator::Power => 4,
    }
  }
}

/// One node of a validated arithmetic tree.
///
/// These four kinds are the complete set of nodes the engine works with;
/// the parser has no way of producing anything else.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
  Constant(f64),
  Variable(String),
  UnaryMinus(Box<Node>),
  BinOp {
    op: BinaryOperator,
    left: Box<Node>,
    right: Box<Node>,
  },
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 5;

impl Node {
  pub fn binary(op: BinaryOperator, left: Node, right: Node) -> Node {
    Node::BinOp {
      op,
      left: Box::new(left),
      right: Box::new(right),
    }
  }

  pub fn negate(operand: Node) -> Node {
    Node::UnaryMinus(Box::new(operand))
  }

  /// Every distinct identifier referenced below this node.
  pub fn variables(&self) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    self.collect_variables(&mut names);
    names
  }

  fn collect_variables(&self, names: &mut BTreeSet<String>) {
    match self {
      Node::Constant(_) => {}
      Node::Variable(name) => {
        names.insert(name.clone());
      }
      Node::UnaryMinus(operand) => operand.collect_variables(names),
      Node::BinOp { left, right, .. } => {
        left.collect_variables(names);
        right.collect_variables(names);
      }
    }
  }

  fn precedence(&self) -> u8 {
    match self {
      Node::Constant(value) if *value < 0.0 => UNARY_PRECEDENCE,
      Node::Constant(_) | Node::Variable(_) => ATOM_PRECEDENCE,
      Node::UnaryMinus(_) => UNARY_PRECEDENCE,
      Node::BinOp { op, .. } => op.precedence(),
    }
  }
}

fn write_operand(
  f: &mut fmt::Formatter<'_>,
  node: &Node,
  parenthesize: bool,
) -> fmt::Result {
  if parenthesize {
    write!(f, "({})", node)
  } else {
    write!(f, "{}", node)
  }
}

impl fmt::Display for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Node::Constant(value) => write!(f, "{}", value),
      Node::Variable(name) => write!(f, "{}", name),
      Node::UnaryMinus(operand) => {
        write!(f, "-")?;
        write_operand(f, operand, operand.precedence() < UNARY_PRECEDENCE)
      }
      Node::BinOp { op, left, right } => {
        let prec = op.precedence();
        // `**` groups to the right, everything else to the left
        let (left_parens, right_parens) = if *op == BinaryOperator::Power {
          (left.precedence() <= prec, right.precedence() < prec)
        } else {
          (left.precedence() < prec, right.precedence() <= prec)
        };
        write_operand(f, left, left_parens)?;
        write!(f, "{}", op.symbol())?;
        write_operand(f, right, right_parens)
      }
    }
  }
}

// ─── Whitelist ──────────────────────────────────────────────────────

/// Grammar rules an accepted expression may contain. Anything else the
/// surface grammar recognises is rejected before a tree is built.
const ALLOWED_RULES: &[Rule] = &[
  Rule::Program,
  Rule::EOI,
  Rule::Expr,
  Rule::Group,
  Rule::Number,
  Rule::Identifier,
  Rule::Negate,
  Rule::Positive,
  Rule::Add,
  Rule::Subtract,
  Rule::Multiply,
  Rule::Divide,
  Rule::Power,
];

fn describe(rule: Rule) -> &'static str {
  match rule {
    Rule::Call => "function call",
    Rule::Subscript => "subscript",
    Rule::Attribute => "attribute access",
    Rule::Assignment | Rule::Assign => "assignment",
    Rule::Equal
    | Rule::NotEqual
    | Rule::Less
    | Rule::LessEqual
    | Rule::Greater
    | Rule::GreaterEqual => "comparison",
    Rule::And | Rule::Or | Rule::Not => "boolean operator",
    Rule::BitAnd
    | Rule::BitOr
    | Rule::Invert
    | Rule::ShiftLeft
    | Rule::ShiftRight => "bitwise operator",
    Rule::Modulo | Rule::FloorDivide | Rule::MatMul => "arithmetic operator",
    Rule::Text => "string literal",
    Rule::List => "list literal",
    _ => "construct",
  }
}

fn unsupported(pair: &Pair<Rule>) -> MathError {
  MathError::UnsupportedSyntax(format!(
    "{} `{}`",
    describe(pair.as_rule()),
    pair.as_str()
  ))
}

fn assert_safe(program: &Pair<Rule>) -> Result<(), MathError> {
  match program
    .clone()
    .into_inner()
    .flatten()
    .find(|pair| !ALLOWED_RULES.contains(&pair.as_rule()))
  {
    Some(pair) => Err(unsupported(&pair)),
    None => Ok(()),
  }
}

// ─── Tree building ──────────────────────────────────────────────────

static PRATT: LazyLock<PrattParser<Rule>> = LazyLock::new(|| {
  PrattParser::new()
    .op(
      Op::infix(Rule::Add, Assoc::Left)
        | Op::infix(Rule::Subtract, Assoc::Left),
    )
    .op(
      Op::infix(Rule::Multiply, Assoc::Left)
        | Op::infix(Rule::Divide, Assoc::Left),
    )
    .op(Op::prefix(Rule::Negate) | Op::prefix(Rule::Positive))
    .op(Op::infix(Rule::Power, Assoc::Right))
});

fn build_expr(pairs: Pairs<Rule>) -> Result<Node, MathError> {
  PRATT
    .map_primary(build_primary)
    .map_prefix(|op, operand| match op.as_rule() {
      Rule::Negate => Ok(Node::negate(operand?)),
      // unary plus leaves no trace in the tree
      Rule::Positive => operand,
      _ => Err(unsupported(&op)),
    })
    .map_infix(|left, op, right| {
      let op = match op.as_rule() {
        Rule::Add => BinaryOperator::Plus,
        Rule::Subtract => BinaryOperator::Minus,
        Rule::Multiply => BinaryOperator::Times,
        Rule::Divide => BinaryOperator::Divide,
        Rule::Power => BinaryOperator::Power,
        _ => return Err(unsupported(&op)),
      };
      Ok(Node::binary(op, left?, right?))
    })
    .parse(pairs)
}

fn build_primary(pair: Pair<Rule>) -> Result<Node, MathError> {
  match pair.as_rule() {
    Rule::Number => {
      let value = pair.as_str().parse::<f64>().map_err(|e| {
        Box::new(pest::error::Error::new_from_span(
          pest::error::ErrorVariant::CustomError {
            message: format!("invalid number: {}", e),
          },
          pair.as_span(),
        ))
      })?;
      Ok(Node::Constant(value))
    }
    Rule::Identifier => Ok(Node::Variable(pair.as_str().to_string())),
    Rule::Group => {
      let inner = pair
        .clone()
        .into_inner()
        .next()
        .ok_or_else(|| unsupported(&pair))?;
      build_expr(inner.into_inner())
    }
    _ => Err(unsupported(&pair)),
  }
}

// ─── Value objects ──────────────────────────────────────────────────

/// A validated arithmetic tree together with the text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
  text: String,
  tree: Node,
}

impl Expression {
  /// Parse `text` in the post-normalization grammar.
  ///
  /// Malformed text fails with [`MathError::ParseError`]; well-formed text
  /// using anything beyond numbers, identifiers, grouping, unary `+`/`-` and
  /// binary `+ - * / **` fails with [`MathError::UnsupportedSyntax`].
  pub fn parse(text: &str) -> Result<Self, MathError> {
    let program = crate::parse(text)?
      .next()
      .ok_or(MathError::EmptyInput)?;
    assert_safe(&program)?;
    let expr = program
      .clone()
      .into_inner()
      .find(|pair| pair.as_rule() == Rule::Expr)
      .ok_or_else(|| unsupported(&program))?;
    let tree = build_expr(expr.into_inner())?;
    Ok(Expression {
      text: text.to_string(),
      tree,
    })
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn tree(&self) -> &Node {
    &self.tree
  }

  pub fn variables(&self) -> BTreeSet<String> {
    self.tree.variables()
  }
}

impl FromStr for Expression {
  type Err = MathError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Expression::parse(s)
  }
}

impl fmt::Display for Expression {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.text)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
  pub left: Expression,
  pub right: Expression,
}

impl Equation {
  pub fn new(left: Expression, right: Expression) -> Self {
    Equation { left, right }
  }

  /// Parse both sides from already-normalized text.
  pub fn parse(left: &str, right: &str) -> Result<Self, MathError> {
    Ok(Equation::new(Expression::parse(left)?, Expression::parse(right)?))
  }

  pub fn variables(&self) -> BTreeSet<String> {
    let mut names = self.left.variables();
    names.extend(self.right.variables());
    names
  }

  /// `(left)-(right)`, the expression whose zeros solve the equation.
  pub fn as_difference(&self) -> Expression {
    Expression {
      text: format!("({})-({})", self.left.text, self.right.text),
      tree: Node::binary(
        BinaryOperator::Minus,
        self.left.tree.clone(),
        self.right.tree.clone(),
      ),
    }
  }
}

impl fmt::Display for Equation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} = {}", self.left, self.right)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegralExpr {
  pub integrand: Expression,
  pub variable: String,
  pub lower: Option<Expression>,
  pub upper: Option<Expression>,
}

impl IntegralExpr {
  pub fn indefinite(
    integrand: Expression,
    variable: impl Into<String>,
  ) -> Self {
    IntegralExpr {
      integrand,
      variable: variable.into(),
      lower: None,
      upper: None,
    }
  }

  pub fn definite(
    integrand: Expression,
    variable: impl Into<String>,
    lower: Expression,
    upper: Expression,
  ) -> Self {
    IntegralExpr {
      integrand,
      variable: variable.into(),
      lower: Some(lower),
      upper: Some(upper),
    }
  }
}

impl fmt::Display for IntegralExpr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "∫")?;
    if let Some(lower) = &self.lower {
      write!(f, "_({})", lower)?;
    }
    if let Some(upper) = &self.upper {
      write!(f, "^({})", upper)?;
    }
    write!(f, " {} d{}", self.integrand, self.variable)
  }
}
