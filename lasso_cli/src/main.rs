/*!
The command line front end.

# Use

```sh
lasso_cli [options] [file]
```

The formula is read from `file`, from standard input when `file` is `-`, or
from the `--formula` option. The verdict is printed as `SAT`, `UNSAT`, or
`UNKNOWN (stopped at k = N)` when the bound ran out; `--print-model` adds
the witnessing lasso after a `SAT`.

With `--dimacs` the input is a propositional CNF handed to the backend
directly, with no temporal encoding.
*/

use std::io::Read;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

use lasso_sat::config::Config;
use lasso_sat::logic::{collect_atoms, Alphabet, Formula};
use lasso_sat::parser::parse_formula;
use lasso_sat::reports::Report;
use lasso_sat::sat::BackendRegistry;
use lasso_sat::solver::Solver;

mod dimacs;

#[derive(Clone, Copy)]
enum Status {
    Success = 0,
    CommandLine = 1,
    Syntax = 2,
    Filesystem = 3,
}

fn cli() -> Command {
    Command::new("lasso_cli")
        .about("Decides the satisfiability of linear temporal logic formulas, with or without past operators.")

        .arg(Arg::new("filename")
            .required(false)
            .value_parser(value_parser!(PathBuf))
            .help("The file to read the formula from, or '-' for standard input."))

        .arg(Arg::new("formula")
            .long("formula")
            .short('f')
            .value_name("FORMULA")
            .num_args(1)
            .help("The formula to decide, given directly on the command line."))

        .arg(Arg::new("bound")
            .long("bound")
            .short('k')
            .value_name("K")
            .value_parser(value_parser!(usize))
            .num_args(1)
            .help("Maximum bound of the search. Without one the search may not terminate."))

        .arg(Arg::new("sat-backend")
            .long("sat-backend")
            .short('B')
            .value_name("NAME")
            .num_args(1)
            .help("The SAT backend to solve with.
Default: dpll"))

        .arg(Arg::new("remove-past")
            .long("remove-past")
            .action(ArgAction::SetTrue)
            .help("Translate past operators away before solving.
Formulas with past operators are translated in any case; this forces the translation through."))

        .arg(Arg::new("print-model")
            .long("print-model")
            .short('m')
            .action(ArgAction::SetTrue)
            .help("Print the model found on a SAT verdict."))

        .arg(Arg::new("dimacs")
            .long("dimacs")
            .action(ArgAction::SetTrue)
            .help("Treat the input as a DIMACS CNF and hand it to the backend as it is."))
}

fn main() {
    std::process::exit(run() as i32);
}

fn run() -> Status {
    env_logger::init();

    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    Status::Success
                }
                _ => Status::CommandLine,
            };
        }
    };

    let formula_arg = matches.get_one::<String>("formula").cloned();
    let filename = matches.get_one::<PathBuf>("filename").cloned();

    if formula_arg.is_none() && filename.is_none() {
        eprintln!("please specify a filename or the --formula option");
        return Status::CommandLine;
    }

    // Where the input comes from, for error messages.
    let source = match &filename {
        Some(path) if formula_arg.is_none() && path != &PathBuf::from("-") => {
            path.display().to_string()
        }
        _ => "<stdin>".to_owned(),
    };

    let input = match formula_arg {
        Some(formula) => formula,
        None => match read_input(filename.as_deref().and_then(|p| p.to_str())) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("Unable to read `{source}`: {e}");
                return Status::Filesystem;
            }
        },
    };

    let registry = BackendRegistry::with_defaults();
    let backend = matches
        .get_one::<String>("sat-backend")
        .cloned()
        .unwrap_or_else(|| "dpll".to_owned());

    if matches.get_flag("dimacs") {
        return dimacs::run(&input, &registry, &backend);
    }

    let sigma = Alphabet::new();

    let parsed = parse_formula(&sigma, &input, |message| {
        eprintln!("syntax error: {source}: {message}");
    });
    let Some(parsed) = parsed else {
        return Status::Syntax;
    };

    let config = Config { backend, remove_past: matches.get_flag("remove-past") };

    let mut solver = match Solver::from_config(&sigma, config, &registry) {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("{e}");
            return Status::CommandLine;
        }
    };

    solver.assert_formula(parsed.formula);

    let bound = matches.get_one::<usize>("bound").copied();

    match solver.solve(bound) {
        Ok(Report::Satisfiable) => {
            println!("SAT");
            if matches.get_flag("print-model") {
                print_model(&solver, parsed.formula);
            }
            Status::Success
        }

        Ok(Report::Unsatisfiable) => {
            println!("UNSAT");
            Status::Success
        }

        Ok(Report::Unknown) => {
            println!("UNKNOWN (stopped at k = {})", solver.counters.iterations);
            Status::Success
        }

        Err(e) => {
            eprintln!("{e}");
            Status::CommandLine
        }
    }
}

fn read_input(filename: Option<&str>) -> std::io::Result<String> {
    match filename {
        None | Some("-") => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
        Some(path) => std::fs::read_to_string(path),
    }
}

fn print_model(solver: &Solver<'_>, f: Formula<'_>) {
    let Some(model) = solver.model() else {
        return;
    };

    println!("Model size: {}", model.size());
    println!("Loop at: {}", model.loop_index());

    let atoms = collect_atoms(f);
    for step in 0..model.size() {
        println!("- Time step: {step}");
        for atom in &atoms {
            match model.value(*atom, step) {
                Some(true) => println!("  -  {atom} = true"),
                Some(false) => println!("  -  {atom} = false"),
                None => println!("  -  {atom} = undef"),
            }
        }
    }
}
