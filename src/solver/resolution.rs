use std::collections::HashSet;

use typed_index_collections::TiVec;

use crate::formula::{Clause, Cnf};
use crate::simplify::resolve;

use super::{Error, Limits, Solver, StepCounter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct ClauseIdx(usize);

impl From<usize> for ClauseIdx {
    fn from(index: usize) -> Self {
        ClauseIdx(index)
    }
}

impl From<ClauseIdx> for usize {
    fn from(index: ClauseIdx) -> Self {
        index.0
    }
}

/// Every clause derived so far, normalized and free of tautologies and duplicates.
struct ClauseDatabase {
    clauses: TiVec<ClauseIdx, Clause>,
    known: HashSet<Clause>,
}

enum Round {
    Contradiction,
    Derived(Vec<Clause>),
}

impl ClauseDatabase {
    fn from_cnf(formula: &Cnf) -> Self {
        let mut database = ClauseDatabase {
            clauses: TiVec::new(),
            known: HashSet::new(),
        };
        for clause in formula.clauses() {
            if !clause.is_tautology() {
                database.insert(clause.normalized());
            }
        }
        database
    }

    /// Inserts a normalized clause. Returns `false` if it was already known.
    fn insert(&mut self, clause: Clause) -> bool {
        if !self.known.insert(clause.clone()) {
            return false;
        }
        let idx = self.clauses.push_and_get_key(clause);
        trace!("Clause {}: {}", usize::from(idx), self.clauses[idx]);
        true
    }

    /// Resolves every pair of clauses on every complementary literal and
    /// returns the resolvents not yet in the database.
    fn resolve_all(&self, steps: &mut StepCounter) -> Result<Round, Error> {
        let mut derived = Vec::new();
        let mut fresh = HashSet::new();

        for (left_idx, left) in self.clauses.iter_enumerated() {
            let skip = usize::from(left_idx) + 1;
            for (_, right) in self.clauses.iter_enumerated().skip(skip) {
                for pivot in left.iter().filter(|&literal| right.contains(!literal)) {
                    steps.tick()?;
                    let resolvent = resolve(left, right, pivot).normalized();
                    if resolvent.is_empty() {
                        return Ok(Round::Contradiction);
                    }
                    if resolvent.is_tautology() || self.known.contains(&resolvent) {
                        continue;
                    }
                    if fresh.insert(resolvent.clone()) {
                        derived.push(resolvent);
                    }
                }
            }
        }

        Ok(Round::Derived(derived))
    }
}

/// Outcome of saturating a formula under resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Saturation {
    pub satisfiable: bool,
    /// Resolution rounds run, including the final one.
    pub iterations: usize,
    /// Clauses in the database when saturation stopped.
    pub num_clauses: usize,
}

/// Saturating resolution. Only answers whether the formula is satisfiable.
#[derive(Debug)]
pub struct ResolutionSolver {
    formula: Cnf,
    limits: Limits,
}

impl ResolutionSolver {
    /// Derives resolvents until the empty clause shows up or nothing new can
    /// be derived. Over `n` variables there are at most `3^n` distinct
    /// non-tautological clauses, so this always terminates.
    pub fn saturate(self) -> Result<Saturation, Error> {
        debug!(
            "Resolution on {} clauses over {} variables",
            self.formula.num_clauses(),
            self.formula.num_variables()
        );

        if self.formula.has_empty_clause() {
            return Ok(Saturation {
                satisfiable: false,
                iterations: 0,
                num_clauses: self.formula.num_clauses(),
            });
        }

        let mut steps = StepCounter::new(self.limits);
        let mut database = ClauseDatabase::from_cnf(&self.formula);
        let mut iterations = 0;

        let satisfiable = loop {
            iterations += 1;
            let derived = match database.resolve_all(&mut steps)? {
                Round::Contradiction => break false,
                Round::Derived(derived) => derived,
            };

            trace!(
                "Round {}: {} new clauses on top of {}",
                iterations,
                derived.len(),
                database.clauses.len()
            );

            if derived.is_empty() {
                break true;
            }
            for clause in derived {
                database.insert(clause);
            }
        };

        debug!(
            "Resolution decided {} after {} rounds and {} steps",
            if satisfiable { "SAT" } else { "UNSAT" },
            iterations,
            steps.taken()
        );

        Ok(Saturation {
            satisfiable,
            iterations,
            num_clauses: database.clauses.len(),
        })
    }
}

impl Solver for ResolutionSolver {
    type Answer = bool;

    fn with_limits(formula: Cnf, limits: Limits) -> Self {
        ResolutionSolver { formula, limits }
    }

    fn solve(self) -> Result<bool, Error> {
        Ok(self.saturate()?.satisfiable)
    }
}
