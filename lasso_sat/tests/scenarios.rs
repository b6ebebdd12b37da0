use lasso_sat::config::Config;
use lasso_sat::logic::Alphabet;
use lasso_sat::parser::parse_formula;
use lasso_sat::reports::Report;
use lasso_sat::sat::BackendRegistry;
use lasso_sat::solver::Solver;
use lasso_sat::types::err::{ErrorKind, FragmentError};

fn verdict(input: &str, bound: usize) -> Report {
    let sigma = Alphabet::new();
    let registry = BackendRegistry::with_defaults();

    let parsed = parse_formula(&sigma, input, |msg| panic!("syntax error: {msg}"))
        .unwrap_or_else(|| panic!("'{input}' failed to parse"));

    let mut solver = Solver::from_config(&sigma, Config::default(), &registry)
        .expect("the default backend is registered");
    solver.assert_formula(parsed.formula);

    solver.solve(Some(bound)).unwrap_or_else(|e| panic!("'{input}' errored: {e}"))
}

mod future {
    use super::*;

    #[test]
    fn contradiction_at_the_first_step() {
        assert_eq!(verdict("p & !p", 10), Report::Unsatisfiable);
    }

    #[test]
    fn invariance_closes_a_unit_lasso() {
        assert_eq!(verdict("G p", 5), Report::Satisfiable);
    }

    #[test]
    fn eventualities_are_discharged() {
        assert_eq!(verdict("F p", 5), Report::Satisfiable);
    }

    #[test]
    fn alternating_eventualities() {
        assert_eq!(verdict("G F p & G F !p", 20), Report::Satisfiable);
    }

    #[test]
    fn an_until_against_its_own_eventuality() {
        assert_eq!(verdict("p U q & G !q", 10), Report::Unsatisfiable);
    }

    #[test]
    fn an_invariant_once_established() {
        assert_eq!(verdict("(G (p -> X p)) & p & F !p", 15), Report::Unsatisfiable);
    }

    #[test]
    fn negated_temporal_operators_are_normalised() {
        // !(F p) & !(G !p) is G !p & F p in disguise.
        assert_eq!(verdict("!(F p) & !(G !p)", 10), Report::Unsatisfiable);
        assert_eq!(verdict("!(G p)", 5), Report::Satisfiable);
        // !(p U q) under G p pins q down forever.
        assert_eq!(verdict("!(p U q) & G p & F q", 10), Report::Unsatisfiable);
    }

    #[test]
    fn weak_operators() {
        assert_eq!(verdict("p W q", 5), Report::Satisfiable);
        assert_eq!(verdict("p M q & G !p", 10), Report::Unsatisfiable);
        assert_eq!(verdict("wX p & !p", 5), Report::Satisfiable);
    }

    #[test]
    fn release_against_until() {
        assert_eq!(verdict("(!q) R (!p) & q U p", 10), Report::Unsatisfiable);
    }
}

mod past {
    use super::*;

    #[test]
    fn yesterday_has_no_first_step() {
        assert_eq!(verdict("Y True", 5), Report::Unsatisfiable);
        assert_eq!(verdict("Z True", 5), Report::Satisfiable);
    }

    #[test]
    fn once_needs_a_witness() {
        assert_eq!(verdict("O p & G !p", 10), Report::Unsatisfiable);
        assert_eq!(verdict("O p", 5), Report::Satisfiable);
    }

    #[test]
    fn since_and_historically() {
        assert_eq!(verdict("p S q", 5), Report::Satisfiable);
        assert_eq!(verdict("p S q & !q", 5), Report::Unsatisfiable);
        assert_eq!(verdict("H p & !p", 5), Report::Unsatisfiable);
        assert_eq!(verdict("G (p T q)", 5), Report::Satisfiable);
    }
}

mod bounds {
    use super::*;

    #[test]
    fn the_bound_caps_the_search() {
        // G F p needs a loop; at bound 0 no loop exists yet.
        assert_eq!(verdict("G F p", 0), Report::Unknown);
        assert_eq!(verdict("G F p", 5), Report::Satisfiable);
    }

    #[test]
    fn unsatisfiability_is_monotone_in_the_bound() {
        for bound in [3, 5, 10] {
            assert_eq!(verdict("p U q & G !q", bound), Report::Unsatisfiable);
        }
    }
}

mod models {
    use super::*;

    fn solved<'a>(sigma: &'a Alphabet, input: &str, bound: usize) -> Solver<'a> {
        let registry = BackendRegistry::with_defaults();
        let parsed = parse_formula(sigma, input, |msg| panic!("syntax error: {msg}"))
            .unwrap_or_else(|| panic!("'{input}' failed to parse"));

        let mut solver =
            Solver::from_config(sigma, Config::default(), &registry).expect("backend");
        solver.assert_formula(parsed.formula);
        assert_eq!(solver.solve(Some(bound)), Ok(Report::Satisfiable));
        solver
    }

    #[test]
    fn an_invariant_model_holds_its_atom_everywhere() {
        let sigma = Alphabet::new();
        let solver = solved(&sigma, "G p", 5);

        let model = solver.model().expect("a model");
        assert_eq!(model.size(), 2);
        assert_eq!(model.loop_index(), 0);

        let p = sigma.proposition("p");
        for step in 0..model.size() {
            assert_eq!(model.value(p, step), Some(true));
        }
    }

    #[test]
    fn loop_indices_stay_in_range() {
        let sigma = Alphabet::new();
        for input in ["G p", "F p", "G F p & G F !p", "F (p & X p)"] {
            let solver = solved(&sigma, input, 20);
            let model = solver.model().expect("a model");
            assert!(model.loop_index() < model.size(), "{input}");
        }
    }

    #[test]
    fn eventuality_models_witness_their_atom() {
        let sigma = Alphabet::new();
        let solver = solved(&sigma, "F p", 5);

        let model = solver.model().expect("a model");
        let p = sigma.proposition("p");
        let witnessed = (0..model.size()).any(|step| model.value(p, step) == Some(true));
        assert!(witnessed);
    }
}

mod lifecycle {
    use super::*;

    #[test]
    fn clear_resets_the_solver() {
        let sigma = Alphabet::new();
        let registry = BackendRegistry::with_defaults();
        let mut solver =
            Solver::from_config(&sigma, Config::default(), &registry).expect("backend");

        let p = sigma.proposition("p");
        solver.assert_formula(p & !p);
        assert_eq!(solver.solve(Some(5)), Ok(Report::Unsatisfiable));

        solver.clear();
        assert_eq!(solver.solve(Some(5)), Err(ErrorKind::NothingAsserted));

        solver.assert_formula(p);
        assert_eq!(solver.solve(Some(5)), Ok(Report::Satisfiable));
    }

    #[test]
    fn assertions_conjoin() {
        let sigma = Alphabet::new();
        let registry = BackendRegistry::with_defaults();
        let mut solver =
            Solver::from_config(&sigma, Config::default(), &registry).expect("backend");

        let p = sigma.proposition("p");
        solver.assert_formula(p);
        solver.assert_formula(!p);
        assert_eq!(solver.solve(Some(5)), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn unknown_backends_are_refused() {
        let sigma = Alphabet::new();
        let registry = BackendRegistry::with_defaults();
        let config = Config { backend: "mathsat".to_owned(), ..Config::default() };

        match Solver::from_config(&sigma, config, &registry) {
            Err(ErrorKind::UnknownBackend(name)) => assert_eq!(name, "mathsat"),
            _ => panic!("an unknown backend must be refused"),
        }
    }
}

mod fragments {
    use super::*;

    fn fragment_error(input: &str) -> ErrorKind {
        let sigma = Alphabet::new();
        let registry = BackendRegistry::with_defaults();

        let parsed = parse_formula(&sigma, input, |msg| panic!("syntax error: {msg}"))
            .unwrap_or_else(|| panic!("'{input}' failed to parse"));

        let mut solver =
            Solver::from_config(&sigma, Config::default(), &registry).expect("backend");
        solver.assert_formula(parsed.formula);

        solver.solve(Some(5)).expect_err("the fragment must be refused")
    }

    #[test]
    fn first_order_input_needs_an_smt_backend() {
        assert_eq!(
            fragment_error("x < 2 & G p"),
            ErrorKind::Fragment(FragmentError::FirstOrder)
        );
        assert_eq!(
            fragment_error("next(x) = x + 1"),
            ErrorKind::Fragment(FragmentError::FirstOrder)
        );
    }

    #[test]
    fn quantifiers_need_a_quantified_backend() {
        assert_eq!(
            fragment_error("exists x . x = 2"),
            ErrorKind::Fragment(FragmentError::Quantifiers)
        );
    }
}
