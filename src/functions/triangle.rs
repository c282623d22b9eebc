use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::MathError;
use crate::steps::Steps;

/// Ratios this close outside `[-1, 1]` are treated as rounding noise.
const RATIO_TOLERANCE: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertex {
  A,
  B,
  C,
}

impl Vertex {
  pub const ALL: [Vertex; 3] = [Vertex::A, Vertex::B, Vertex::C];

  /// The two other vertices, in order.
  pub fn others(self) -> (Vertex, Vertex) {
    match self {
      Vertex::A => (Vertex::B, Vertex::C),
      Vertex::B => (Vertex::A, Vertex::C),
      Vertex::C => (Vertex::A, Vertex::B),
    }
  }

  pub fn angle_name(self) -> &'static str {
    match self {
      Vertex::A => "A",
      Vertex::B => "B",
      Vertex::C => "C",
    }
  }

  /// Name of the side opposite this vertex.
  pub fn side_name(self) -> &'static str {
    match self {
      Vertex::A => "a",
      Vertex::B => "b",
      Vertex::C => "c",
    }
  }
}

impl fmt::Display for Vertex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.angle_name())
  }
}

impl FromStr for Vertex {
  type Err = MathError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "A" | "a" => Ok(Vertex::A),
      "B" | "b" => Ok(Vertex::B),
      "C" | "c" => Ok(Vertex::C),
      other => Err(MathError::InvalidMeasurement(format!(
        "unknown vertex {:?}",
        other
      ))),
    }
  }
}

/// Partial knowledge of a triangle. Sides `a, b, c` lie opposite the
/// vertices `A, B, C`; angles are in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriangleMeasurement {
  pub a: Option<f64>,
  pub b: Option<f64>,
  pub c: Option<f64>,
  pub angle_a: Option<f64>,
  pub angle_b: Option<f64>,
  pub angle_c: Option<f64>,
  pub right_at: Option<Vertex>,
}

impl TriangleMeasurement {
  pub fn side(&self, vertex: Vertex) -> Option<f64> {
    match vertex {
      Vertex::A => self.a,
      Vertex::B => self.b,
      Vertex::C => self.c,
    }
  }

  pub fn angle(&self, vertex: Vertex) -> Option<f64> {
    match vertex {
      Vertex::A => self.angle_a,
      Vertex::B => self.angle_b,
      Vertex::C => self.angle_c,
    }
  }

  fn side_mut(&mut self, vertex: Vertex) -> &mut Option<f64> {
    match vertex {
      Vertex::A => &mut self.a,
      Vertex::B => &mut self.b,
      Vertex::C => &mut self.c,
    }
  }

  fn angle_mut(&mut self, vertex: Vertex) -> &mut Option<f64> {
    match vertex {
      Vertex::A => &mut self.angle_a,
      Vertex::B => &mut self.angle_b,
      Vertex::C => &mut self.angle_c,
    }
  }

  fn known_sides(&self) -> usize {
    Vertex::ALL.iter().filter(|&&v| self.side(v).is_some()).count()
  }

  fn known_angles(&self) -> usize {
    Vertex::ALL.iter().filter(|&&v| self.angle(v).is_some()).count()
  }

  /// Names of the six measurements still unknown.
  pub fn missing(&self) -> Vec<&'static str> {
    let sides = Vertex::ALL
      .iter()
      .filter(|&&v| self.side(v).is_none())
      .map(|v| v.side_name());
    let angles = Vertex::ALL
      .iter()
      .filter(|&&v| self.angle(v).is_none())
      .map(|v| v.angle_name());
    sides.chain(angles).collect()
  }
}

/// A fully determined triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolvedTriangle {
  pub a: f64,
  pub b: f64,
  pub c: f64,
  pub angle_a: f64,
  pub angle_b: f64,
  pub angle_c: f64,
  pub perimeter: f64,
  pub area: f64,
}

// ─── Identities ─────────────────────────────────────────────────────

fn checked_unit_ratio(ratio: f64) -> Result<f64, MathError> {
  if !ratio.is_finite() {
    return Err(MathError::InvalidMeasurement(format!(
      "non-finite ratio {}",
      ratio
    )));
  }
  if !(-1.0 - RATIO_TOLERANCE..=1.0 + RATIO_TOLERANCE).contains(&ratio) {
    return Err(MathError::InconsistentMeasurement { ratio });
  }
  Ok(ratio.clamp(-1.0, 1.0))
}

/// Side opposite `included` (degrees) between sides `x` and `y`.
fn law_of_cosines_side(x: f64, y: f64, included: f64) -> f64 {
  (x * x + y * y - 2.0 * x * y * included.to_radians().cos()).sqrt()
}

/// Angle opposite `z` in degrees.
fn law_of_cosines_angle(x: f64, y: f64, z: f64) -> Result<f64, MathError> {
  let ratio = checked_unit_ratio((x * x + y * y - z * z) / (2.0 * x * y))?;
  Ok(ratio.acos().to_degrees())
}

/// Angle opposite `side` given a known angle/opposite-side pair.
fn law_of_sines_angle(
  known_angle: f64,
  known_side: f64,
  side: f64,
) -> Result<f64, MathError> {
  let ratio =
    checked_unit_ratio(known_angle.to_radians().sin() * side / known_side)?;
  Ok(ratio.asin().to_degrees())
}

fn heron(a: f64, b: f64, c: f64) -> f64 {
  let s = (a + b + c) / 2.0;
  (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt()
}

// ─── Rules, applied once each in this order ─────────────────────────

fn complete_right_angle(m: &mut TriangleMeasurement, steps: &mut Steps) {
  let Some(vertex) = m.right_at else {
    return;
  };
  steps.record(format!("Detected right angle at {}", vertex));
  let (p, q) = vertex.others();
  if let (Some(x), Some(y)) = (m.side(p), m.side(q)) {
    *m.side_mut(vertex) = Some(x.hypot(y));
    *m.angle_mut(vertex) = Some(90.0);
    steps.record(format!(
      "Used Pythagoras to compute {}",
      vertex.side_name()
    ));
  }
}

fn sides_by_cosines(m: &mut TriangleMeasurement, steps: &mut Steps) {
  if m.known_sides() != 2 || m.known_angles() == 0 {
    return;
  }
  for vertex in Vertex::ALL {
    let (p, q) = vertex.others();
    if let (None, Some(included), Some(x), Some(y)) =
      (m.side(vertex), m.angle(vertex), m.side(p), m.side(q))
    {
      *m.side_mut(vertex) = Some(law_of_cosines_side(x, y, included));
      steps.record(format!(
        "Law of Cosines to compute side {}",
        vertex.side_name()
      ));
    }
  }
}

fn angles_by_cosines(
  m: &mut TriangleMeasurement,
  steps: &mut Steps,
) -> Result<(), MathError> {
  let (Some(a), Some(b), Some(c)) = (m.a, m.b, m.c) else {
    return Ok(());
  };
  let sides = [a, b, c];
  for (index, vertex) in Vertex::ALL.into_iter().enumerate() {
    if m.angle(vertex).is_some() {
      continue;
    }
    let (p, q) = vertex.others();
    if let (Some(first), Some(second)) = (m.angle(p), m.angle(q)) {
      *m.angle_mut(vertex) = Some(180.0 - first - second);
      steps.record(format!("Used angle sum to compute {}", vertex));
    } else {
      let z = sides[index];
      let (x, y) = match vertex {
        Vertex::A => (b, c),
        Vertex::B => (a, c),
        Vertex::C => (a, b),
      };
      *m.angle_mut(vertex) = Some(law_of_cosines_angle(x, y, z)?);
      steps.record(format!("Law of Cosines to compute angle {}", vertex));
    }
  }
  Ok(())
}

fn angles_by_sines(
  m: &mut TriangleMeasurement,
  steps: &mut Steps,
) -> Result<(), MathError> {
  for known in Vertex::ALL {
    let (Some(known_angle), Some(known_side)) = (m.angle(known), m.side(known))
    else {
      continue;
    };
    let (p, q) = known.others();
    for target in [p, q] {
      if let (None, Some(side)) = (m.angle(target), m.side(target)) {
        *m.angle_mut(target) =
          Some(law_of_sines_angle(known_angle, known_side, side)?);
        steps.record(format!("Law of Sines to compute {}", target));
      }
    }
  }
  Ok(())
}

fn third_angle_by_sum(m: &mut TriangleMeasurement, steps: &mut Steps) {
  if m.known_angles() != 2 {
    return;
  }
  let known: f64 = Vertex::ALL.iter().filter_map(|&v| m.angle(v)).sum();
  if let Some(vertex) = Vertex::ALL.into_iter().find(|&v| m.angle(v).is_none())
  {
    *m.angle_mut(vertex) = Some(180.0 - known);
    steps.record(format!("Angle sum to compute {}", vertex));
  }
}

fn validate(m: &TriangleMeasurement) -> Result<(), MathError> {
  for vertex in Vertex::ALL {
    if let Some(side) = m.side(vertex)
      && !(side.is_finite() && side > 0.0)
    {
      return Err(MathError::InvalidMeasurement(format!(
        "side {} must be a positive length, got {}",
        vertex.side_name(),
        side
      )));
    }
    if let Some(angle) = m.angle(vertex)
      && !angle.is_finite()
    {
      return Err(MathError::InvalidMeasurement(format!(
        "angle {} must be finite, got {}",
        vertex, angle
      )));
    }
  }
  Ok(())
}

/// Fill in the unknown sides and angles with one ordered pass of rules:
/// right-angle completion, Law of Cosines for a side, Law of Cosines for
/// the angles, Law of Sines, angle sum.
///
/// The pass is not repeated, so a value only derivable from one computed
/// later in the same pass is left unknown and the call fails with
/// [`MathError::InsufficientData`].
pub fn solve_triangle(
  measurement: TriangleMeasurement,
) -> Result<(SolvedTriangle, Steps), MathError> {
  debug!(?measurement, "solving triangle");
  validate(&measurement)?;
  let mut m = measurement;
  let mut steps = Steps::new();

  complete_right_angle(&mut m, &mut steps);
  sides_by_cosines(&mut m, &mut steps);
  angles_by_cosines(&mut m, &mut steps)?;
  angles_by_sines(&mut m, &mut steps)?;
  third_angle_by_sum(&mut m, &mut steps);

  let (
    Some(a),
    Some(b),
    Some(c),
    Some(angle_a),
    Some(angle_b),
    Some(angle_c),
  ) = (m.a, m.b, m.c, m.angle_a, m.angle_b, m.angle_c)
  else {
    return Err(MathError::InsufficientData {
      missing: m.missing(),
    });
  };

  let perimeter = a + b + c;
  let area = heron(a, b, c);
  steps.record("Computed perimeter and area via Heron's formula");

  Ok((
    SolvedTriangle {
      a,
      b,
      c,
      angle_a,
      angle_b,
      angle_c,
      perimeter,
      area,
    },
    steps,
  ))
}
