use std::collections::HashSet;

use crate::formula::{Cnf, Literal, Variable};
use crate::simplify::{find_pure_literal, find_unit_clause, resolve, simplify_clauses};

use super::{Error, Limits, Solver, StepCounter};

/// Picks the variable to eliminate: the variable of the first literal of the
/// first clause.
///
/// Note: DPLL splits on the smallest variable ID instead. The two policies are
/// kept apart on purpose since they change the order of work.
pub fn elimination_variable(formula: &Cnf) -> Option<Variable> {
    let literal = formula.clauses().first()?.first()?;
    Some(literal.variable())
}

/// Eliminates `variable` from `formula` by resolution.
///
/// Every clause mentioning `variable` is replaced by the non-tautological
/// resolvents of its positive and negative occurrences, deduplicated. Clauses
/// not mentioning it are kept after the resolvents, in their original order.
pub fn eliminate(formula: &Cnf, variable: Variable) -> Cnf {
    let pivot = Literal::new(variable, true);

    let mut positive = Vec::new();
    let mut negative = Vec::new();
    let mut untouched = Vec::new();
    for clause in formula.clauses() {
        let (has_pos, has_neg) = (clause.contains(pivot), clause.contains(!pivot));
        match (has_pos, has_neg) {
            (false, false) => untouched.push(clause.clone()),
            // Always true, and would let `variable` leak into the resolvents.
            (true, true) => {}
            (true, false) => positive.push(clause),
            (false, true) => negative.push(clause),
        }
    }

    let mut seen = HashSet::new();
    let mut clauses = Vec::with_capacity(positive.len() * negative.len() + untouched.len());
    for pos_clause in &positive {
        for neg_clause in &negative {
            let resolvent = resolve(pos_clause, neg_clause, pivot);
            if !resolvent.is_tautology() && seen.insert(resolvent.normalized()) {
                clauses.push(resolvent);
            }
        }
    }

    trace!(
        "Eliminating {}: {} x {} clauses gave {} resolvents",
        variable,
        positive.len(),
        negative.len(),
        clauses.len()
    );

    clauses.extend(untouched);
    Cnf::from_clauses(clauses)
}

/// Davis-Putnam procedure. Only answers whether the formula is satisfiable.
#[derive(Debug)]
pub struct DpSolver {
    formula: Cnf,
    limits: Limits,
}

impl Solver for DpSolver {
    type Answer = bool;

    fn with_limits(formula: Cnf, limits: Limits) -> Self {
        DpSolver { formula, limits }
    }

    fn solve(self) -> Result<bool, Error> {
        debug!(
            "DP on {} clauses over {} variables",
            self.formula.num_clauses(),
            self.formula.num_variables()
        );

        let mut steps = StepCounter::new(self.limits);
        let mut formula = self.formula;

        let satisfiable = loop {
            if formula.is_empty() {
                break true;
            } else if formula.has_empty_clause() {
                break false;
            }

            let forced = find_unit_clause(&formula).or_else(|| find_pure_literal(&formula));
            if let Some(literal) = forced {
                trace!("Propagating {}", literal);
                steps.tick()?;
                match simplify_clauses(&formula, literal) {
                    Some(simplified) => formula = simplified,
                    None => break false,
                }
                continue;
            }

            match elimination_variable(&formula) {
                Some(variable) => {
                    steps.tick()?;
                    formula = eliminate(&formula, variable);
                }
                None => break true,
            }
        };

        debug!(
            "DP decided {} after {} steps",
            if satisfiable { "SAT" } else { "UNSAT" },
            steps.taken()
        );
        Ok(satisfiable)
    }
}
