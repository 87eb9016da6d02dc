/*!
Clause simplification shared by every solver.

All operations here take a formula by reference and build a new one;
nothing is modified in place.
*/

use std::collections::BTreeMap;

use crate::formula::{Clause, Cnf, Literal, Variable};

/// Returns the literal of the first unit clause in formula order.
pub fn find_unit_clause(formula: &Cnf) -> Option<Literal> {
    formula.clauses().iter().find_map(Clause::unit)
}

/// Returns a pure literal, i.e. one whose complement never occurs.
///
/// When several variables are pure, the one with the smallest ID wins.
pub fn find_pure_literal(formula: &Cnf) -> Option<Literal> {
    // variable -> (occurs positively, occurs negatively)
    let mut polarities: BTreeMap<Variable, (bool, bool)> = BTreeMap::new();
    for literal in formula.clauses().iter().flat_map(|clause| clause.iter()) {
        let entry = polarities.entry(literal.variable()).or_default();
        if literal.positive() {
            entry.0 = true;
        } else {
            entry.1 = true;
        }
    }

    polarities
        .into_iter()
        .find_map(|(variable, polarity)| match polarity {
            (true, false) => Some(Literal::new(variable, true)),
            (false, true) => Some(Literal::new(variable, false)),
            _ => None,
        })
}

/// Simplifies `formula` under the assumption that `literal` is true.
///
/// Clauses containing `literal` are dropped and `¬literal` is removed from the
/// rest. Returns `None` when that removal leaves an empty clause.
pub fn simplify_clauses(formula: &Cnf, literal: Literal) -> Option<Cnf> {
    let mut clauses = Vec::with_capacity(formula.num_clauses());

    for clause in formula.clauses() {
        if clause.contains(literal) {
            continue;
        }

        if clause.contains(!literal) {
            let shortened = clause.without(!literal);
            if shortened.is_empty() {
                return None;
            }
            clauses.push(shortened);
        } else {
            clauses.push(clause.clone());
        }
    }

    Some(Cnf::from_clauses(clauses))
}

/// Resolves `positive` (which contains `pivot`) with `negative` (which
/// contains `¬pivot`). The result may be a tautology; callers filter those.
pub fn resolve(positive: &Clause, negative: &Clause, pivot: Literal) -> Clause {
    positive
        .iter()
        .filter(|&literal| literal != pivot)
        .chain(negative.iter().filter(|&literal| literal != !pivot))
        .collect()
}
