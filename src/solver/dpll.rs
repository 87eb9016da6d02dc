use crate::formula::{Assignment, Cnf, Literal, Model, Variable};
use crate::simplify::{find_pure_literal, find_unit_clause, simplify_clauses};

use super::{Error, Limits, Solver, StepCounter};

/// Picks the branching variable: the smallest variable ID in the formula.
pub fn split_variable(formula: &Cnf) -> Option<Variable> {
    formula
        .clauses()
        .iter()
        .flat_map(|clause| clause.iter())
        .map(|literal| literal.variable())
        .min()
}

/// An open node of the search tree. Each branch owns its own formula and
/// assignment, so backtracking is just dropping the node.
struct Branch {
    formula: Cnf,
    assignment: Assignment,
    /// Split literal not yet applied to `formula`.
    decision: Option<Literal>,
}

enum Exploration {
    Satisfied(Assignment),
    Conflict,
    Split(Branch, Variable),
}

#[derive(Debug)]
pub struct DpllSolver {
    formula: Cnf,
    limits: Limits,
}

impl DpllSolver {
    /// Runs unit propagation and pure literal elimination on a branch until
    /// it is decided or a split is needed.
    fn explore(mut branch: Branch, steps: &mut StepCounter) -> Result<Exploration, Error> {
        if let Some(literal) = branch.decision.take() {
            trace!("Deciding {}", literal);
            steps.tick()?;
            branch.assignment.assign(literal);
            branch.formula = match simplify_clauses(&branch.formula, literal) {
                Some(formula) => formula,
                None => return Ok(Exploration::Conflict),
            };
        }

        loop {
            if branch.formula.is_empty() {
                return Ok(Exploration::Satisfied(branch.assignment));
            } else if branch.formula.has_empty_clause() {
                return Ok(Exploration::Conflict);
            }

            let forced = if let Some(literal) = find_unit_clause(&branch.formula) {
                trace!("Unit clause forces {}", literal);
                literal
            } else if let Some(literal) = find_pure_literal(&branch.formula) {
                trace!("Pure literal {}", literal);
                literal
            } else {
                return Ok(match split_variable(&branch.formula) {
                    Some(variable) => Exploration::Split(branch, variable),
                    // Only reachable with clauses but no literals, ruled out above.
                    None => Exploration::Satisfied(branch.assignment),
                });
            };

            steps.tick()?;
            branch.assignment.assign(forced);
            branch.formula = match simplify_clauses(&branch.formula, forced) {
                Some(formula) => formula,
                None => return Ok(Exploration::Conflict),
            };
        }
    }
}

impl Solver for DpllSolver {
    type Answer = Option<Model>;

    fn with_limits(formula: Cnf, limits: Limits) -> Self {
        DpllSolver { formula, limits }
    }

    fn solve(self) -> Result<Option<Model>, Error> {
        debug!(
            "DPLL on {} clauses over {} variables",
            self.formula.num_clauses(),
            self.formula.num_variables()
        );

        let mut steps = StepCounter::new(self.limits);
        let mut pending = vec![Branch {
            formula: self.formula.clone(),
            assignment: Assignment::new(),
            decision: None,
        }];

        while let Some(branch) = pending.pop() {
            match DpllSolver::explore(branch, &mut steps)? {
                Exploration::Satisfied(assignment) => {
                    debug!("DPLL found a model after {} steps", steps.taken());
                    return Ok(Some(Model::new(self.formula, assignment)));
                }
                Exploration::Conflict => {
                    trace!("Conflict, backtracking ({} open branches)", pending.len());
                }
                Exploration::Split(branch, variable) => {
                    trace!("Splitting on {}", variable);

                    // The stack is LIFO: push `false` first so `true` is tried first.
                    // Children are simplified only once popped.
                    pending.push(Branch {
                        formula: branch.formula.clone(),
                        assignment: branch.assignment.clone(),
                        decision: Some(Literal::new(variable, false)),
                    });
                    pending.push(Branch {
                        decision: Some(Literal::new(variable, true)),
                        ..branch
                    });
                }
            }
        }

        debug!("DPLL exhausted the search after {} steps", steps.taken());
        Ok(None)
    }
}
