//! DIMACS pass-through: the input is a propositional CNF handed to the
//! backend directly, with no temporal encoding.

use lasso_sat::logic::{big_or, Alphabet, Formula};
use lasso_sat::sat::BackendRegistry;

use crate::Status;

pub fn run(input: &str, registry: &BackendRegistry, backend_name: &str) -> Status {
    let Some(mut backend) = registry.backend(backend_name) else {
        eprintln!("unknown backend '{backend_name}'");
        return Status::CommandLine;
    };

    let sigma = Alphabet::new();
    let mut max_var: i64 = 0;
    let mut clause_count = 0;

    for (number, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') || line.starts_with('p') {
            continue;
        }

        let mut literals: Vec<Formula> = Vec::new();
        for word in line.split_whitespace() {
            let Ok(literal) = word.parse::<i64>() else {
                eprintln!("syntax error: line {}: bad literal '{word}'", number + 1);
                return Status::Syntax;
            };

            if literal == 0 {
                break;
            }

            max_var = max_var.max(literal.abs());
            let prop = sigma.proposition(literal.abs().to_string());
            literals.push(if literal < 0 { !prop } else { prop });
        }

        if !literals.is_empty() {
            backend.assert_formula(big_or(&sigma, literals));
            clause_count += 1;
        }
    }

    if clause_count == 0 {
        eprintln!("syntax error: no clauses in input");
        return Status::Syntax;
    }

    if backend.solve() {
        println!("s SATISFIABLE");
        let mut valuation = String::from("v");
        for var in 1..=max_var {
            let prop = sigma.proposition(var.to_string());
            let sign = match backend.value(prop) {
                Some(true) => "",
                _ => "-",
            };
            valuation.push_str(&format!(" {sign}{var}"));
        }
        valuation.push_str(" 0");
        println!("{valuation}");
    } else {
        println!("s UNSATISFIABLE");
    }

    Status::Success
}
