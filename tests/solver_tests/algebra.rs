use super::*;

mod single_equation {
  use super::*;

  #[test]
  fn quadratic_roots() {
    let (roots, steps) = solve(&equation("x**2-5*x+6", "0")).unwrap();
    assert_eq!(real_roots(&roots), vec![2.0, 3.0]);
    assert!(steps.mentions("polynomial"));
    assert!(steps.mentions("quadratic formula"));
  }

  #[test]
  fn quadratic_root_order() {
    let (roots, _) = solve(&equation("x**2-5*x+6", "0")).unwrap();
    assert_eq!(roots, vec![Root::Real(3.0), Root::Real(2.0)]);
  }

  #[test]
  fn linear_root() {
    let (roots, steps) = solve(&equation("2*x+4", "0")).unwrap();
    assert_eq!(roots, vec![Root::Real(-2.0)]);
    assert!(steps.mentions("linear"));
    assert_eq!(steps.as_slice()[0], "Selected variable x");
  }

  #[test]
  fn variables_on_both_sides() {
    let (roots, _) = solve(&equation("3*x", "x+4")).unwrap();
    assert_eq!(roots, vec![Root::Real(2.0)]);
  }

  #[test]
  fn vanishing_quadratic_term_solves_as_linear() {
    let (roots, steps) = solve(&equation("x**2-x**2+2*x", "4")).unwrap();
    assert_eq!(roots, vec![Root::Real(2.0)]);
    assert!(steps.mentions("solving as linear"));
  }

  #[test]
  fn negative_discriminant_gives_conjugate_pair() {
    let (roots, steps) = solve(&equation("x**2+1", "0")).unwrap();
    assert_eq!(roots.len(), 2);
    assert!(roots.iter().all(|root| !root.is_real()));
    let ims: Vec<f64> = roots
      .iter()
      .map(|root| match root {
        Root::Complex { im, .. } => *im,
        Root::Real(_) => unreachable!(),
      })
      .collect();
    assert_relative_eq!(ims[0], 1.0);
    assert_relative_eq!(ims[1], -1.0);
    assert!(steps.mentions("discriminant"));
  }

  #[test]
  fn smallest_name_is_solved_for() {
    let (roots, steps) = solve(&equation("b", "7")).unwrap();
    assert_eq!(roots, vec![Root::Real(7.0)]);
    assert!(steps.mentions("variable b"));
  }

  #[test]
  fn degenerate_equation() {
    assert!(matches!(
      solve(&equation("x", "x")),
      Err(MathError::DegenerateEquation(_))
    ));
  }

  #[test]
  fn cubic_is_unsupported() {
    assert!(matches!(
      solve(&equation("x**3", "1")),
      Err(MathError::UnsupportedDegree { degree: 3, .. })
    ));
  }

  #[test]
  fn huge_degree_is_rejected_before_expansion() {
    assert!(matches!(
      solve(&equation("x**4000000000", "0")),
      Err(MathError::UnsupportedDegree {
        degree: 4_000_000_000,
        ..
      })
    ));
  }

  #[test]
  fn constant_equation_has_no_variable() {
    assert!(matches!(
      solve(&equation("1", "2")),
      Err(MathError::EmptyVariableSet(_))
    ));
  }

  #[test]
  fn division_is_not_polynomial() {
    assert!(matches!(
      solve(&equation("1/x", "2")),
      Err(MathError::UnsupportedExpression(_))
    ));
  }

  #[test]
  fn second_unknown_is_unbound() {
    match solve(&equation("x+y", "1")) {
      Err(MathError::UnboundVariable(name)) => assert_eq!(name, "y"),
      other => panic!("expected UnboundVariable, got {other:?}"),
    }
  }
}

mod systems {
  use super::*;

  #[test]
  fn two_by_two() {
    let system = [equation("x+y", "5"), equation("x-y", "-1")];
    let (solution, steps) = solve_system(&system).unwrap();
    match solution {
      SolutionSet::Assignment(values) => {
        assert_relative_eq!(values["x"], 2.0);
        assert_relative_eq!(values["y"], 3.0);
      }
      other => panic!("expected an assignment, got {other:?}"),
    }
    assert!(steps.mentions("cramer"));
  }

  #[test]
  fn doubled_coefficient() {
    let system = [equation("x+y", "5"), equation("2*x-y", "1")];
    let (solution, steps) = solve_system(&system).unwrap();
    let SolutionSet::Assignment(values) = solution else {
      panic!("expected an assignment");
    };
    assert_relative_eq!(values["x"], 2.0);
    assert_relative_eq!(values["y"], 3.0);
    assert!(steps.mentions("Cramer"));
  }

  #[test]
  fn scaled_coefficients() {
    let system = [equation("2*x+3*y", "8"), equation("x", "2*y-3")];
    let (solution, _) = solve_system(&system).unwrap();
    let SolutionSet::Assignment(values) = solution else {
      panic!("expected an assignment");
    };
    assert_relative_eq!(values["x"], 1.0, epsilon = 1e-12);
    assert_relative_eq!(values["y"], 2.0, epsilon = 1e-12);
  }

  #[test]
  fn single_equation_system() {
    let (solution, _) = solve_system(&[equation("x**2", "4")]).unwrap();
    match solution {
      SolutionSet::Roots { variable, roots } => {
        assert_eq!(variable, "x");
        assert_eq!(real_roots(&roots), vec![-2.0, 2.0]);
      }
      other => panic!("expected roots, got {other:?}"),
    }
  }

  #[test]
  fn singular_system() {
    let system = [equation("x+y", "1"), equation("2*x+2*y", "2")];
    assert!(matches!(
      solve_system(&system),
      Err(MathError::SingularSystem(_))
    ));
  }

  #[test]
  fn shape_mismatch() {
    assert!(matches!(
      solve_system(&[equation("x+y", "1")]),
      Err(MathError::UnsupportedSystemShape {
        equations: 1,
        variables: 2
      })
    ));
  }

  #[test]
  fn three_unknowns_are_unsupported() {
    let system = [
      equation("x+y+z", "1"),
      equation("x-y", "0"),
      equation("z", "2"),
    ];
    assert!(matches!(
      solve_system(&system),
      Err(MathError::UnsupportedSystemShape {
        equations: 3,
        variables: 3
      })
    ));
  }

  #[test]
  fn product_of_unknowns() {
    let system = [equation("x*y", "1"), equation("x+y", "2")];
    assert!(matches!(
      solve_system(&system),
      Err(MathError::NonLinearEquation(_))
    ));
  }

  #[test]
  fn no_unknowns() {
    assert!(matches!(
      solve_system(&[equation("1", "1")]),
      Err(MathError::EmptyVariableSet(_))
    ));
  }
}
