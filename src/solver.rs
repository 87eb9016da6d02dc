use crate::formula::{Cnf, FormulaError, Model};
use crate::prelude::*;

mod dp;
mod dpll;
mod resolution;

pub use dp::{eliminate, elimination_variable, DpSolver};
pub use dpll::{split_variable, DpllSolver};
pub use resolution::{ResolutionSolver, Saturation};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Formula is malformed"))]
    InvalidFormula { source: FormulaError },
    #[snafu(display("Solver gave up after exceeding the limit of {} steps", limit))]
    StepLimitExceeded { limit: usize },
}

/// Resource limits for a single `solve` call.
///
/// A step is one formula transformation: a simplification or a variable
/// elimination for DPLL and DP, one computed resolvent for resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_steps: Option<usize>,
}

impl Limits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn steps(max_steps: usize) -> Self {
        Limits {
            max_steps: Some(max_steps),
        }
    }
}

/// Counts steps against `Limits::max_steps`.
#[derive(Debug)]
struct StepCounter {
    taken: usize,
    limit: Option<usize>,
}

impl StepCounter {
    fn new(limits: Limits) -> Self {
        StepCounter {
            taken: 0,
            limit: limits.max_steps,
        }
    }

    fn tick(&mut self) -> Result<(), Error> {
        self.taken += 1;
        if let Some(limit) = self.limit {
            ensure!(self.taken <= limit, StepLimitExceeded { limit });
        }
        Ok(())
    }

    fn taken(&self) -> usize {
        self.taken
    }
}

pub trait Solver: Sized {
    /// What a successful run reports: a model or a bare verdict.
    type Answer: Verdict;

    /// Creates a new solver instance without resource limits.
    fn new(formula: Cnf) -> Self {
        Self::with_limits(formula, Limits::unlimited())
    }

    fn with_limits(formula: Cnf, limits: Limits) -> Self;

    /// Solves a CNF SAT problem with the solver.
    /// Unsatisfiability is a regular answer, not an error.
    fn solve(self) -> Result<Self::Answer, Error>;
}

/// Collapses any solver answer to satisfiable or not.
pub trait Verdict {
    fn is_satisfiable(&self) -> bool;
}

impl Verdict for bool {
    fn is_satisfiable(&self) -> bool {
        *self
    }
}

impl Verdict for Option<Model> {
    fn is_satisfiable(&self) -> bool {
        self.is_some()
    }
}

fn formula_from<C: AsRef<[i32]>>(clauses: &[C]) -> Result<Cnf, Error> {
    Cnf::from_dimacs(clauses).context(InvalidFormula)
}

/// Runs DPLL on signed integer clauses and returns a model if one exists.
pub fn solve_dpll<C: AsRef<[i32]>>(clauses: &[C]) -> Result<Option<Model>, Error> {
    DpllSolver::new(formula_from(clauses)?).solve()
}

pub fn is_satisfiable_dpll<C: AsRef<[i32]>>(clauses: &[C]) -> Result<bool, Error> {
    Ok(solve_dpll(clauses)?.is_some())
}

/// Runs Davis-Putnam variable elimination on signed integer clauses.
pub fn solve_dp<C: AsRef<[i32]>>(clauses: &[C]) -> Result<bool, Error> {
    DpSolver::new(formula_from(clauses)?).solve()
}

/// Runs resolution saturation on signed integer clauses.
pub fn solve_resolution<C: AsRef<[i32]>>(clauses: &[C]) -> Result<bool, Error> {
    ResolutionSolver::new(formula_from(clauses)?).solve()
}
