use super::*;

fn angle_sum(a: f64, b: f64, c: f64) -> f64 {
  a + b + c
}

#[test]
fn right_triangle_from_legs() {
  let measurement = TriangleMeasurement {
    a: Some(3.0),
    b: Some(4.0),
    right_at: Some(Vertex::C),
    ..Default::default()
  };
  let (solved, steps) = solve_triangle(measurement).unwrap();
  assert_relative_eq!(solved.c, 5.0);
  assert_relative_eq!(solved.angle_c, 90.0);
  assert_relative_eq!(solved.perimeter, 12.0);
  assert_relative_eq!(solved.area, 6.0, epsilon = 1e-9);
  assert!(steps.mentions("Pythagoras"));
  assert!(steps.mentions("right angle at C"));
}

#[test]
fn side_angle_side() {
  let measurement = TriangleMeasurement {
    a: Some(5.0),
    b: Some(7.0),
    angle_c: Some(60.0),
    ..Default::default()
  };
  let (solved, steps) = solve_triangle(measurement).unwrap();
  assert_relative_eq!(solved.c, 39.0_f64.sqrt(), epsilon = 1e-9);
  assert_relative_eq!(
    angle_sum(solved.angle_a, solved.angle_b, solved.angle_c),
    180.0,
    epsilon = 1e-9
  );
  assert!(steps.mentions("Law of Cosines to compute side c"));
}

#[test]
fn side_angle_side_thirty_degrees() {
  let measurement = TriangleMeasurement {
    a: Some(7.0),
    b: Some(8.0),
    angle_c: Some(30.0),
    ..Default::default()
  };
  let (solved, _) = solve_triangle(measurement).unwrap();
  assert!(solved.c > 0.0);
  assert_relative_eq!(
    solved.angle_a + solved.angle_b + 30.0,
    180.0,
    epsilon = 1e-9
  );
}

#[test]
fn two_sides_without_angle() {
  let measurement = TriangleMeasurement {
    a: Some(5.0),
    b: Some(6.0),
    ..Default::default()
  };
  assert!(matches!(
    solve_triangle(measurement),
    Err(MathError::InsufficientData { .. })
  ));
}

#[test]
fn three_sides() {
  let measurement = TriangleMeasurement {
    a: Some(3.0),
    b: Some(4.0),
    c: Some(5.0),
    ..Default::default()
  };
  let (solved, _) = solve_triangle(measurement).unwrap();
  assert_relative_eq!(solved.angle_c, 90.0, epsilon = 1e-9);
  assert_relative_eq!(
    angle_sum(solved.angle_a, solved.angle_b, solved.angle_c),
    180.0,
    epsilon = 1e-9
  );
  assert_relative_eq!(solved.area, 6.0, epsilon = 1e-9);
}

#[test]
fn equilateral() {
  let measurement = TriangleMeasurement {
    a: Some(2.0),
    b: Some(2.0),
    c: Some(2.0),
    ..Default::default()
  };
  let (solved, _) = solve_triangle(measurement).unwrap();
  assert_relative_eq!(solved.angle_a, 60.0, epsilon = 1e-9);
  assert_relative_eq!(solved.area, 3.0_f64.sqrt(), epsilon = 1e-9);
}

#[test]
fn law_of_sines_leaves_side_unknown() {
  let measurement = TriangleMeasurement {
    a: Some(2.0),
    b: Some(1.0),
    angle_a: Some(90.0),
    ..Default::default()
  };
  // one pass leaves side c unknown
  match solve_triangle(measurement) {
    Err(MathError::InsufficientData { missing }) => {
      assert_eq!(missing, vec!["c"]);
    }
    other => panic!("expected InsufficientData, got {other:?}"),
  }
}

#[test]
fn two_angles_and_a_side_stop_after_one_pass() {
  let measurement = TriangleMeasurement {
    a: Some(1.0),
    angle_a: Some(30.0),
    angle_b: Some(60.0),
    ..Default::default()
  };
  match solve_triangle(measurement) {
    Err(MathError::InsufficientData { missing }) => {
      assert_eq!(missing, vec!["b", "c"]);
    }
    other => panic!("expected InsufficientData, got {other:?}"),
  }
}

#[test]
fn single_side_is_insufficient() {
  let measurement = TriangleMeasurement {
    a: Some(3.0),
    ..Default::default()
  };
  match solve_triangle(measurement) {
    Err(MathError::InsufficientData { missing }) => {
      assert_eq!(missing, vec!["b", "c", "A", "B", "C"]);
    }
    other => panic!("expected InsufficientData, got {other:?}"),
  }
}

#[test]
fn impossible_sine_ratio() {
  let measurement = TriangleMeasurement {
    a: Some(10.0),
    b: Some(13.0),
    angle_a: Some(90.0),
    ..Default::default()
  };
  match solve_triangle(measurement) {
    Err(MathError::InconsistentMeasurement { ratio }) => {
      assert_relative_eq!(ratio, 1.3, epsilon = 1e-9);
    }
    other => panic!("expected InconsistentMeasurement, got {other:?}"),
  }
}

#[test]
fn impossible_side_lengths() {
  let measurement = TriangleMeasurement {
    a: Some(1.0),
    b: Some(1.0),
    c: Some(5.0),
    ..Default::default()
  };
  assert!(matches!(
    solve_triangle(measurement),
    Err(MathError::InconsistentMeasurement { .. })
  ));
}

#[test]
fn non_positive_side() {
  let measurement = TriangleMeasurement {
    a: Some(-1.0),
    b: Some(2.0),
    c: Some(2.0),
    ..Default::default()
  };
  assert!(matches!(
    solve_triangle(measurement),
    Err(MathError::InvalidMeasurement(_))
  ));
}

#[test]
fn vertex_names() {
  assert_eq!("b".parse::<Vertex>().unwrap(), Vertex::B);
  assert_eq!(" C ".parse::<Vertex>().unwrap(), Vertex::C);
  assert!("D".parse::<Vertex>().is_err());
  assert_eq!(Vertex::A.side_name(), "a");
}
