/*!
A module to represent conjunctive normal form formula.
*/

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    convert::TryFrom,
    fmt::Display,
    iter::FromIterator,
    num::NonZeroU32,
    str::FromStr,
};

use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum FormulaError {
    #[snafu(display("Literal 0 is reserved and cannot appear in a clause"))]
    ZeroLiteral,
    #[snafu(display("Failed to parse literal '{}'", text))]
    ParseLiteral {
        text: String,
        source: std::num::ParseIntError,
    },
    #[snafu(display(
        "Variable ID {} is out of range (must be within 1 to {})",
        num,
        Variable::MAX_VARIABLE_ID
    ))]
    VariableRange { num: u64 },
}

/// Newtype wrapper for variable ID.
/// Invariant: 0 < ID <= MAX_VARIABLE_ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(NonZeroU32);

impl Variable {
    pub const MAX_VARIABLE_ID: u64 = std::u32::MAX as u64;
}

impl Variable {
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Variable)
    }

    pub fn id(&self) -> u32 {
        self.0.get()
    }

    /// Creates a variable from a zero-based index.
    /// Returns `None` if the index is out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        let id = index.checked_add(1)?;
        Variable::new(u32::try_from(id).ok()?)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A variable together with its polarity.
///
/// Ordering is by variable first, with the negative literal before the positive one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    id: Variable,
    positive: bool,
}

impl Literal {
    pub fn new(id: Variable, positive: bool) -> Self {
        Literal { id, positive }
    }

    /// Decodes a signed DIMACS-style integer, rejecting 0.
    pub fn from_dimacs(value: i64) -> Result<Self, FormulaError> {
        ensure!(value != 0, ZeroLiteral);

        let num = value.unsigned_abs();
        let id = u32::try_from(num)
            .ok()
            .and_then(Variable::new)
            .context(VariableRange { num })?;

        Ok(Literal {
            id,
            positive: value > 0,
        })
    }

    pub fn to_dimacs(&self) -> i64 {
        let id = i64::from(self.id.id());
        if self.positive {
            id
        } else {
            -id
        }
    }

    pub fn variable(&self) -> Variable {
        self.id
    }

    pub fn positive(&self) -> bool {
        self.positive
    }
}

impl FromStr for Literal {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.parse::<i64>().context(ParseLiteral { text: s })?;
        Literal::from_dimacs(value)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", if self.positive { "" } else { "¬" }, self.id)
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            id: self.id,
            positive: !self.positive,
        }
    }
}

/// Disjunction of literals.
///
/// A clause never holds the same literal twice, but keeps the order in which
/// literals were first given. `PartialEq` and `Hash` are order-sensitive;
/// compare [`Clause::normalized`] forms when order should not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(mut literals: Vec<Literal>) -> Self {
        let mut seen = HashSet::with_capacity(literals.len());
        literals.retain(|&literal| seen.insert(literal));
        Self { literals }
    }

    /// The empty clause, which no assignment satisfies.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn num_literals(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Returns the sole literal if this is a unit clause.
    pub fn unit(&self) -> Option<Literal> {
        match self.literals.as_slice() {
            [literal] => Some(*literal),
            _ => None,
        }
    }

    pub fn first(&self) -> Option<Literal> {
        self.literals.first().copied()
    }

    pub fn contains(&self, literal: Literal) -> bool {
        self.literals.contains(&literal)
    }

    /// A clause with both `l` and `¬l` is always true.
    pub fn is_tautology(&self) -> bool {
        let literals: HashSet<_> = self.literals.iter().copied().collect();
        self.literals
            .iter()
            .any(|&literal| literals.contains(&!literal))
    }

    /// Returns a copy with `literal` removed.
    pub fn without(&self, literal: Literal) -> Clause {
        Clause {
            literals: self.iter().filter(|&l| l != literal).collect(),
        }
    }

    /// Sorted copy, the canonical key for order-insensitive comparison.
    pub fn normalized(&self) -> Clause {
        let mut literals = self.literals.clone();
        literals.sort_unstable();
        Clause { literals }
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.is_tautology()
            || self
                .iter()
                .any(|literal| assignment.value(literal) == Some(true))
    }

    pub fn iter(&self) -> impl Iterator<Item = Literal> + '_ {
        self.literals.iter().copied()
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Clause::new(iter.into_iter().collect())
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;

        let mut iter = self.literals.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for literal in iter {
            write!(f, " ∨ {}", literal)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Formula representation in Conjunctive Normal Form
#[derive(Debug, Clone, Default)]
pub struct Cnf {
    num_variables: usize,
    clauses: Vec<Clause>,
}

impl Cnf {
    pub fn new(num_variables: usize) -> Self {
        assert!(num_variables as u64 <= Variable::MAX_VARIABLE_ID);

        Cnf {
            num_variables,
            clauses: Vec::new(),
        }
    }

    /// Builds a formula from signed integer clauses, e.g. `[[1, -2], [2]]`.
    pub fn from_dimacs<C: AsRef<[i32]>>(clauses: &[C]) -> Result<Self, FormulaError> {
        let mut cnf = Cnf::new(0);
        for clause in clauses {
            let literals = clause
                .as_ref()
                .iter()
                .map(|&value| Literal::from_dimacs(i64::from(value)))
                .collect::<Result<Vec<_>, _>>()?;
            cnf.add_clause(Clause::new(literals));
        }
        Ok(cnf)
    }

    /// Builds a formula from clauses, sizing the variable count to the
    /// largest variable ID that occurs.
    pub fn from_clauses(clauses: Vec<Clause>) -> Self {
        let mut cnf = Cnf::new(0);
        for clause in clauses {
            cnf.add_clause(clause);
        }
        cnf
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn clauses(&self) -> &Vec<Clause> {
        &self.clauses
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// A formula without clauses is vacuously true.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    pub fn add_clause(&mut self, clause: Clause) {
        if let Some(max) = clause.iter().map(|l| l.variable().id() as usize).max() {
            self.num_variables = self.num_variables.max(max);
        }
        self.clauses.push(clause);
    }

    /// Variables occurring in some clause, in ascending order.
    pub fn variables(&self) -> BTreeSet<Variable> {
        self.clauses
            .iter()
            .flat_map(|clause| clause.iter())
            .map(|literal| literal.variable())
            .collect()
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.is_satisfied_by(assignment))
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CNF with {} variables (", self.num_variables)?;

        let mut iter = self.clauses.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for clause in iter {
            write!(f, " ∧ {}", clause)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Partial mapping from variables to truth values.
/// Variables that are absent may take either value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment(BTreeMap<Variable, bool>);

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `literal` true.
    pub fn assign(&mut self, literal: Literal) {
        self.0.insert(literal.variable(), literal.positive());
    }

    pub fn get(&self, variable: Variable) -> Option<bool> {
        self.0.get(&variable).copied()
    }

    /// Truth value of `literal`, if its variable is assigned.
    pub fn value(&self, literal: Literal) -> Option<bool> {
        self.get(literal.variable())
            .map(|val| val == literal.positive())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, bool)> + '_ {
        self.0.iter().map(|(&variable, &val)| (variable, val))
    }
}

impl FromIterator<(Variable, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Variable, bool)>>(iter: I) -> Self {
        Assignment(iter.into_iter().collect())
    }
}

/// Represents a satisfying assignment for a formula.
#[derive(Debug)]
pub struct Model {
    formula: Cnf,
    assignment: Assignment,
}

impl Model {
    /// Creates a new model from a formula and an assignment.
    ///
    /// # Panics
    ///
    /// Panics in debug builds when `assignment` does not satisfy `formula`.
    pub fn new(formula: Cnf, assignment: Assignment) -> Self {
        debug_assert!(formula.is_satisfied_by(&assignment));

        Model {
            formula,
            assignment,
        }
    }

    pub fn formula(&self) -> &Cnf {
        &self.formula
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn into_assignment(self) -> Assignment {
        self.assignment
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Model for {}\nAssignment:", self.formula)?;
        if self.assignment.is_empty() {
            write!(f, " (unconstrained)")?;
        }
        for (variable, val) in self.assignment.iter() {
            write!(f, "\n  {}: {}", variable, val)?;
        }

        Ok(())
    }
}
