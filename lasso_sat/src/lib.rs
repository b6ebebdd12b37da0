/*!
A library for deciding the satisfiability of linear temporal logic formulas,
with or without past operators, by bounded search for ultimately-periodic
models.

The decision procedure reduces the temporal question to a growing sequence
of propositional questions: for each bound `k` the formula is unraveled one
step further, a SAT backend is asked whether the unraveling can close into a
lasso (or stop with no pending obligation), and a pruning rule cuts lassos
that merely repeat the work of shorter ones --- which is what makes the
procedure complete rather than merely sound.

# Orientation

- An [Alphabet](logic::Alphabet) interns formulas and terms, so equal
  structure is the same node and a formula handle is two machine words.
- The [parser] turns concrete syntax into formulas, recording which
  fragment (temporal, past, first-order, quantified) the input used.
- A [Solver](solver::Solver) owns a [SatBackend](sat::SatBackend), selected
  by name from a [BackendRegistry](sat::BackendRegistry), and runs the
  bounded search. The bundled [dpll](sat::dpll) backend covers the
  propositional fragment.
- The encodings themselves live in [procedures], one module per topic.

# Example

```rust
use lasso_sat::config::Config;
use lasso_sat::logic::Alphabet;
use lasso_sat::parser::parse_formula;
use lasso_sat::reports::Report;
use lasso_sat::sat::BackendRegistry;
use lasso_sat::solver::Solver;

let sigma = Alphabet::new();
let registry = BackendRegistry::with_defaults();

let parsed = parse_formula(&sigma, "G F p & G F !p", |msg| eprintln!("{msg}"))
    .expect("a well-formed formula");

let mut solver = Solver::from_config(&sigma, Config::default(), &registry)
    .expect("the default backend is registered");
solver.assert_formula(parsed.formula);

assert_eq!(solver.solve(Some(20)), Ok(Report::Satisfiable));

let model = solver.model().expect("a model witnesses SAT");
assert!(model.loop_index() < model.size());
```
*/

pub mod config;
pub mod logic;
pub mod parser;
pub mod procedures;
pub mod reports;
pub mod sat;
pub mod solver;
pub mod types;

pub mod generic;

pub mod misc;
