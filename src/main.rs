use std::{env::args, path::Path};

use clausal::{
    formula::{Cnf, FormulaError},
    generator::{self, random_k_cnf},
    parser::{self, parse_file},
    prelude::*,
    report::Report,
    solver::{self, DpSolver, DpllSolver, Limits, ResolutionSolver, Solver},
};
use pretty_env_logger::formatted_builder;
use rand::{rngs::StdRng, SeedableRng};

fn usage_string() -> String {
    format!(
        "Usage: {} <solver_name> <command>

solver_name: dpll, dp, resolution

command:
    check <file_name> [max_steps] - solve the given DIMACS CNF file
    random <vars> <clauses> <k> <seed> [max_steps] - solve a random k-CNF instance
    demo - solve the built-in example formulas",
        args().next().unwrap_or_else(|| "clausal".to_owned())
    )
}

/// (a ∨ b) ∧ (¬a ∨ c) ∧ (¬b ∨ ¬c), then a ∧ ¬a
const DEMO_FORMULAS: [&[&[i32]]; 2] = [&[&[1, 2], &[-1, 3], &[-2, -3]], &[&[1], &[-1]]];

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Unknown solver '{}'\n\n{}", name, usage_string()))]
    UnknownSolver { name: String },
    #[snafu(display("Unknown command '{}'\n\n{}", name, usage_string()))]
    UnknownCommand { name: String },
    #[snafu(display("Failed to parse CNF"))]
    ParserError { source: parser::Error },
    #[snafu(display("Invalid demo formula"))]
    DemoFormula { source: FormulaError },
    #[snafu(display("Solver failed"))]
    SolverError { source: solver::Error },
    #[snafu(display("Argument '{}' is not a valid number\n\n{}", value, usage_string()))]
    InvalidNumber {
        value: String,
        source: std::num::ParseIntError,
    },
    #[snafu(display("Cannot generate a random formula"))]
    GeneratorError { source: generator::Error },
    #[snafu(display("Required argument does not exist\n\n{}", usage_string()))]
    MissingArgument,
}

trait Outcome {
    fn describe(&self) -> String;
}

impl Outcome for bool {
    fn describe(&self) -> String {
        let verdict = if *self { "SAT" } else { "UNSAT" };
        verdict.to_owned()
    }
}

impl Outcome for Option<clausal::formula::Model> {
    fn describe(&self) -> String {
        match self {
            Some(model) => format!("SAT {}", model),
            None => "UNSAT".to_owned(),
        }
    }
}

fn parse_number<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    value: Option<&String>,
) -> Result<T, Error> {
    let value = value.context(MissingArgument)?;
    value.parse().context(InvalidNumber { value })
}

fn parse_limits(value: Option<&String>) -> Result<Limits, Error> {
    match value {
        Some(_) => Ok(Limits::steps(parse_number(value)?)),
        None => Ok(Limits::unlimited()),
    }
}

fn solve_formula<T>(formula: Cnf, limits: Limits) -> Result<String, Error>
where
    T: Solver,
    T::Answer: Outcome,
{
    let answer = T::with_limits(formula, limits).solve().context(SolverError)?;
    Ok(answer.describe())
}

fn solve_path<T>(path: &Path, limits: Limits) -> Result<String, Error>
where
    T: Solver,
    T::Answer: Outcome,
{
    let formula = parse_file(path).context(ParserError)?;
    solve_formula::<T>(formula, limits)
}

fn dispatch_command<T>(args: Vec<String>) -> Result<(), Error>
where
    T: Solver,
    T::Answer: Outcome,
{
    match args.get(0).map(|s| s.as_str()) {
        Some("check") => {
            let path = args.get(1).context(MissingArgument)?;
            let limits = parse_limits(args.get(2))?;
            println!("{}", solve_path::<T>(path.as_ref(), limits)?);
        }
        Some("random") => {
            let num_variables: usize = parse_number(args.get(1))?;
            let num_clauses: usize = parse_number(args.get(2))?;
            let k: usize = parse_number(args.get(3))?;
            let seed: u64 = parse_number(args.get(4))?;
            let limits = parse_limits(args.get(5))?;

            let mut rng = StdRng::seed_from_u64(seed);
            let formula = random_k_cnf(&mut rng, num_variables, num_clauses, k)
                .context(GeneratorError)?;
            log::info!("Generated {}", formula);
            println!("{}", solve_formula::<T>(formula, limits)?);
        }
        Some("demo") => {
            for &clauses in DEMO_FORMULAS.iter() {
                let formula = Cnf::from_dimacs(clauses).context(DemoFormula)?;
                println!("{}", formula);
                println!("=> {}", solve_formula::<T>(formula, Limits::unlimited())?);
            }
        }
        Some(name) => UnknownCommand {
            name: name.to_owned(),
        }
        .fail()?,
        None => MissingArgument.fail()?,
    }

    Ok(())
}

fn init_logger() {
    let mut builder = formatted_builder();

    if let Ok(s) = ::std::env::var("RUST_LOG") {
        builder.parse_filters(&s);
    } else if cfg!(debug_assertions) {
        builder.parse_filters("clausal=debug");
    } else {
        builder.parse_filters("clausal=warn");
    }

    builder.try_init().expect("Failed to initialize the logger");
}

fn main() -> Result<(), Report> {
    init_logger();

    let mut args = args();

    // drop arg[0]
    args.next();

    // solver name
    let solver_name = args.next();
    let remaining: Vec<_> = args.collect();

    match solver_name.as_deref() {
        Some("dpll") => dispatch_command::<DpllSolver>(remaining)?,
        Some("dp") => dispatch_command::<DpSolver>(remaining)?,
        Some("resolution") => dispatch_command::<ResolutionSolver>(remaining)?,
        Some(name) => UnknownSolver {
            name: name.to_owned(),
        }
        .fail()?,
        None => {
            println!("{}", usage_string());
        }
    }

    Ok(())
}
