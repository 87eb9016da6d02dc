/*!
Random k-CNF instances.
*/

use rand::{seq::index, Rng};

use crate::formula::{Clause, Cnf, Literal, Variable};
use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display(
        "Cannot generate {} variables (must be at most {})",
        num_variables,
        Variable::MAX_VARIABLE_ID
    ))]
    TooManyVariables { num_variables: usize },
    #[snafu(display(
        "k ({}) must not exceed the number of variables ({})",
        k,
        num_variables
    ))]
    ClauseWidth { k: usize, num_variables: usize },
}

/// Generates `num_clauses` clauses, each over `k` distinct variables drawn
/// uniformly from `1..=num_variables` with random polarity.
pub fn random_k_cnf<R: Rng + ?Sized>(
    rng: &mut R,
    num_variables: usize,
    num_clauses: usize,
    k: usize,
) -> Result<Cnf, Error> {
    ensure!(
        num_variables as u64 <= Variable::MAX_VARIABLE_ID,
        TooManyVariables { num_variables }
    );
    ensure!(k <= num_variables, ClauseWidth { k, num_variables });

    let mut cnf = Cnf::new(num_variables);
    for _ in 0..num_clauses {
        let literals = index::sample(rng, num_variables, k)
            .into_iter()
            .filter_map(Variable::from_index)
            .map(|variable| Literal::new(variable, rng.gen()))
            .collect();
        cnf.add_clause(Clause::new(literals));
    }
    Ok(cnf)
}
