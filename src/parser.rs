/*!
DIMACS CNF reader.
*/

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::formula::{Clause, Cnf, FormulaError, Literal, Variable};
use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("I/O error occurred while reading CNF file '{}'", path.display()))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse line '{}' as clause", clause))]
    MalformedClause { clause: String },
    #[snafu(display("Invalid literal found in clause '{}'", clause))]
    MalformedLiteral {
        clause: String,
        source: FormulaError,
    },
    #[snafu(display("Problem line 'p cnf <num_variables> <num_clauses>' is not found"))]
    MalformedProblemDefinition,
    #[snafu(display(
        "The number of clauses ({}) does not match the clauses number in the problem definition ({})",
        found,
        expected,
    ))]
    ClauseCountMismatch { expected: usize, found: usize },
}

/// Parse a line to a clause
fn parse_line(line: &str) -> Result<Clause, Error> {
    let splitted = line.split_whitespace().collect::<Vec<_>>();

    let (terminator, literals) = splitted.split_last().context(MalformedClause {
        clause: line.to_owned(),
    })?;
    ensure!(
        *terminator == "0",
        MalformedClause {
            clause: line.to_owned(),
        }
    );

    let literals = literals
        .iter()
        .map(|s| {
            s.parse::<Literal>().with_context(|| MalformedLiteral {
                clause: line.to_owned(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Clause::new(literals))
}

/// Parses a CNF formula from DIMACS text
pub fn parse_str(text: &str) -> Result<Cnf, Error> {
    // skip until we find the problem definition
    let mut lines = text.lines().skip_while(|line| !line.starts_with('p'));

    let prob_line = lines.next().context(MalformedProblemDefinition)?;

    let splitted = prob_line.split_whitespace().collect::<Vec<_>>();

    // We only support CNF DIMACS format
    ensure!(
        splitted.len() == 4 && splitted[0] == "p" && splitted[1] == "cnf",
        MalformedProblemDefinition
    );

    let (num_variables, num_clauses) =
        match (splitted[2].parse::<usize>(), splitted[3].parse::<usize>()) {
            (Ok(num_variables), Ok(num_clauses)) => (num_variables, num_clauses),
            _ => return MalformedProblemDefinition.fail(),
        };
    ensure!(
        num_variables as u64 <= Variable::MAX_VARIABLE_ID,
        MalformedProblemDefinition
    );

    let mut cnf = Cnf::new(num_variables);

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('c') {
            // empty line, comment
            continue;
        }
        cnf.add_clause(parse_line(trimmed)?);
    }

    ensure!(
        cnf.num_clauses() == num_clauses,
        ClauseCountMismatch {
            found: cnf.num_clauses(),
            expected: num_clauses,
        }
    );

    Ok(cnf)
}

/// Parses a CNF formula from a file
pub fn parse_file(path: impl AsRef<Path>) -> Result<Cnf, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).context(IoError {
        path: path.to_owned(),
    })?;

    parse_str(&text)
}
