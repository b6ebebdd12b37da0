use std::cell::RefCell;
use std::rc::Rc;

use lasso_sat::config::Config;
use lasso_sat::logic::{Alphabet, Formula};
use lasso_sat::parser::parse_formula;
use lasso_sat::reports::Report;
use lasso_sat::sat::{dpll::Dpll, BackendFeatures, SatBackend};
use lasso_sat::solver::Solver;

// A backend which records everything the solver loop does to it, forwarding
// the work to the bundled engine.
struct Recording {
    inner: Dpll,
    transcript: Rc<RefCell<Vec<String>>>,
}

impl Recording {
    fn new(transcript: Rc<RefCell<Vec<String>>>) -> Self {
        Recording { inner: Dpll::new(), transcript }
    }

    fn note(&self, line: String) {
        self.transcript.borrow_mut().push(line);
    }
}

impl SatBackend for Recording {
    fn features(&self) -> BackendFeatures {
        self.inner.features()
    }

    fn assert_formula(&mut self, f: Formula<'_>) {
        self.note(format!("assert {f}"));
        self.inner.assert_formula(f);
    }

    fn push(&mut self) {
        self.note("push".to_owned());
        self.inner.push();
    }

    fn pop(&mut self) {
        self.note("pop".to_owned());
        self.inner.pop();
    }

    fn solve(&mut self) -> bool {
        let verdict = self.inner.solve();
        self.note(format!("solve -> {verdict}"));
        verdict
    }

    fn value(&self, p: Formula<'_>) -> Option<bool> {
        self.inner.value(p)
    }

    fn clear(&mut self) {
        self.note("clear".to_owned());
        self.inner.clear();
    }
}

// A backend without backtrack points, to exercise the replay path.
struct Monolithic {
    inner: Dpll,
}

impl SatBackend for Monolithic {
    fn features(&self) -> BackendFeatures {
        BackendFeatures { push_pop: false, ..self.inner.features() }
    }

    fn assert_formula(&mut self, f: Formula<'_>) {
        self.inner.assert_formula(f);
    }

    fn push(&mut self) {
        panic!("a non-incremental backend must not see push");
    }

    fn pop(&mut self) {
        panic!("a non-incremental backend must not see pop");
    }

    fn solve(&mut self) -> bool {
        self.inner.solve()
    }

    fn value(&self, p: Formula<'_>) -> Option<bool> {
        self.inner.value(p)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }
}

fn transcript_of(input: &str, bound: usize) -> (Report, Vec<String>) {
    let sigma = Alphabet::new();
    let parsed = parse_formula(&sigma, input, |msg| panic!("syntax error: {msg}"))
        .unwrap_or_else(|| panic!("'{input}' failed to parse"));

    let transcript = Rc::new(RefCell::new(Vec::new()));
    let backend = Recording::new(Rc::clone(&transcript));

    let mut solver = Solver::with_backend(&sigma, Config::default(), Box::new(backend));
    solver.assert_formula(parsed.formula);
    let report = solver.solve(Some(bound)).expect("no backend errors");

    let lines = transcript.borrow().clone();
    (report, lines)
}

mod determinism {
    use super::*;

    #[test]
    fn identical_runs_produce_identical_encodings() {
        for input in ["G p", "G F p & G F !p", "p U q & G !q", "F (p & X p)"] {
            let (first_report, first) = transcript_of(input, 12);
            let (second_report, second) = transcript_of(input, 12);

            assert_eq!(first_report, second_report, "{input}");
            assert_eq!(first, second, "{input}");
        }
    }

    #[test]
    fn the_monotonic_prefix_is_interleaved_with_windows() {
        let (report, transcript) = transcript_of("G p", 5);
        assert_eq!(report, Report::Satisfiable);

        // One clear at the start of the solve, then for each k an asserted
        // unraveling, and a push/pop window around the EMPTY ∨ LOOP check.
        assert_eq!(transcript[0], "clear");
        let pushes = transcript.iter().filter(|line| *line == "push").count();
        let pops = transcript.iter().filter(|line| *line == "pop").count();
        assert_eq!(pushes, pops);
        assert!(pushes > 0);
    }
}

mod fallback {
    use super::*;

    fn verdicts(input: &str, bound: usize) -> (Report, Report) {
        let sigma = Alphabet::new();
        let parsed = parse_formula(&sigma, input, |msg| panic!("syntax error: {msg}"))
            .unwrap_or_else(|| panic!("'{input}' failed to parse"));

        let mut incremental =
            Solver::with_backend(&sigma, Config::default(), Box::new(Dpll::new()));
        incremental.assert_formula(parsed.formula);
        let a = incremental.solve(Some(bound)).expect("no backend errors");

        let mut monolithic = Solver::with_backend(
            &sigma,
            Config::default(),
            Box::new(Monolithic { inner: Dpll::new() }),
        );
        monolithic.assert_formula(parsed.formula);
        let b = monolithic.solve(Some(bound)).expect("no backend errors");

        (a, b)
    }

    #[test]
    fn replay_is_a_drop_in_for_backtrack_points() {
        for input in ["p & !p", "G p", "F p", "p U q & G !q", "G F p & G F !p"] {
            let (incremental, monolithic) = verdicts(input, 15);
            assert_eq!(incremental, monolithic, "{input}");
        }
    }

    #[test]
    fn models_survive_the_replay_path() {
        let sigma = Alphabet::new();
        let parsed = parse_formula(&sigma, "G p", |msg| panic!("{msg}")).expect("parse");

        let mut solver = Solver::with_backend(
            &sigma,
            Config::default(),
            Box::new(Monolithic { inner: Dpll::new() }),
        );
        solver.assert_formula(parsed.formula);
        assert_eq!(solver.solve(Some(5)), Ok(Report::Satisfiable));

        let model = solver.model().expect("a model");
        assert_eq!(model.value(sigma.proposition("p"), 0), Some(true));
    }
}
