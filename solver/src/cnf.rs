use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::fmt;
use std::io::Read;
use std::iter::FromIterator;

use crate::error::ParseError;
use crate::parser::parse_formula;

/// Type used for referencing logical variables (1-based)
pub type VarId = usize;

/// Signed DIMACS literal. The absolute value is the variable,
/// the sign is its polarity.
pub type Lit = i32;

/// Number of literals in every clause
pub const CLAUSE_ARITY: usize = 3;

/// The `p` record of a formula: number of variables and clauses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub num_variables: usize,
    pub num_clauses: usize,
}

/// Representation of a 3-CNF formula (conjunction of clauses)
#[derive(Clone, Debug)]
pub struct CNF {
    /// Number of variables declared by the header
    pub num_variables: usize,
    /// Vector of inner clauses
    pub clauses: Vec<CNFClause>,
}

/// Representation of a clause (disjunction of exactly three literals)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CNFClause {
    pub vars: [CNFVar; CLAUSE_ARITY],
}

/// Logical variable
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Ord, Eq, Hash)]
pub struct CNFVar {
    /// Identifier of a variable
    pub id: VarId,
    /// Variable is negated iff `sign == false`
    pub sign: bool,
}

impl CNF {
    /// Creates an empty formula over `num_variables` variables
    pub fn empty(num_variables: usize) -> CNF {
        CNF { num_variables, clauses: Vec::new() }
    }

    /// Creates a formula, widening `num_variables` if a clause mentions
    /// a bigger variable
    pub fn new(num_variables: usize, clauses: Vec<CNFClause>) -> CNF {
        let used = clauses.iter()
            .flat_map(|clause| clause.vars.iter().map(CNFVar::id))
            .max()
            .unwrap_or(0);
        CNF { num_variables: num_variables.max(used), clauses }
    }

    /// Inserts a new clause into the formula
    pub fn push(&mut self, clause: CNFClause) {
        self.num_variables = clause.vars.iter()
            .map(CNFVar::id)
            .fold(self.num_variables, usize::max);
        self.clauses.push(clause)
    }

    /// Returns number of clauses in the formula
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The header this formula would be written with
    pub fn header(&self) -> Header {
        Header { num_variables: self.num_variables, num_clauses: self.clauses.len() }
    }

    /// Collects all variable identifiers that appear in the formula
    pub fn vars(&self) -> BTreeSet<VarId> {
        self.clauses.iter()
            .flat_map(|clause| clause.vars.iter().map(CNFVar::id))
            .collect()
    }

    /// Prints formula in DIMACS compatible form
    pub fn to_dimacs(&self) -> String {
        let mut out = format!("p cnf {} {}\n", self.num_variables, self.clauses.len());
        for clause in &self.clauses {
            for var in &clause.vars {
                out.push_str(&var.to_i32().to_string());
                out.push(' ');
            }
            out.push_str("0\n");
        }
        out
    }

    /// Parse DIMACS string into CNF structure
    pub fn from_dimacs(input: &str) -> Result<CNF, ParseError> {
        parse_formula(input.as_bytes())
    }

    /// Parse DIMACS input from any reader
    pub fn read(reader: impl Read) -> Result<CNF, ParseError> {
        parse_formula(std::io::BufReader::new(reader))
    }
}

impl FromIterator<CNFClause> for CNF {
    fn from_iter<I: IntoIterator<Item = CNFClause>>(iter: I) -> Self {
        CNF::new(0, iter.into_iter().collect())
    }
}

impl IntoIterator for CNF {
    type Item = CNFClause;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl CNFClause {
    pub fn new(a: CNFVar, b: CNFVar, c: CNFVar) -> CNFClause {
        CNFClause { vars: [a, b, c] }
    }

    /// Builds a clause from three non-zero DIMACS literals.
    ///
    /// # Panics
    ///
    /// Panics on a zero literal. Use `TryFrom` for untrusted input.
    pub fn from_lits(lits: [Lit; CLAUSE_ARITY]) -> CNFClause {
        CNFClause {
            vars: [CNFVar::from_i32(lits[0]), CNFVar::from_i32(lits[1]), CNFVar::from_i32(lits[2])],
        }
    }

    pub fn lits(&self) -> [Lit; CLAUSE_ARITY] {
        [self.vars[0].to_i32(), self.vars[1].to_i32(), self.vars[2].to_i32()]
    }

    /// Checks whether the clause holds under `valuation`
    /// (index `id - 1` holds the value of variable `id`)
    pub fn is_satisfied_by(&self, valuation: &[bool]) -> bool {
        self.vars.iter()
            .any(|var| valuation.get(var.id - 1).map_or(false, |&value| value == var.sign))
    }
}

impl TryFrom<Vec<Lit>> for CNFClause {
    type Error = ParseError;

    fn try_from(lits: Vec<Lit>) -> Result<Self, Self::Error> {
        if lits.len() != CLAUSE_ARITY {
            return Err(ParseError::Arity { line: 0, found: lits.len() });
        }
        if lits.contains(&0) {
            return Err(ParseError::Malformed {
                line: 0,
                token: "0".to_string(),
                reason: "literal 0 inside a clause",
            });
        }
        Ok(CNFClause::from_lits([lits[0], lits[1], lits[2]]))
    }
}

impl CNFVar {
    /// Creates variable with given identifier and positivity
    pub fn new(id: VarId, sign: bool) -> CNFVar {
        CNFVar { id, sign }
    }

    /// Creates a positive variable with given identifier
    pub fn pos(id: VarId) -> CNFVar {
        CNFVar { id, sign: true }
    }

    /// Creates a negative variable with given identifier
    pub fn neg(id: VarId) -> CNFVar {
        CNFVar { id, sign: false }
    }

    /// Converts a non-zero DIMACS literal
    ///
    /// # Panics
    ///
    /// Panics if `lit` is 0. Use `CNFClause::try_from` for untrusted input.
    pub fn from_i32(lit: Lit) -> CNFVar {
        assert_ne!(lit, 0, "0 is not a literal");
        CNFVar { id: lit.unsigned_abs() as VarId, sign: lit > 0 }
    }

    /// Gets the identifier of a variable
    pub fn id(&self) -> VarId {
        self.id
    }

    /// Checks if the variable is positive
    pub fn sign(&self) -> bool {
        self.sign
    }

    pub fn negated(&self) -> CNFVar {
        CNFVar { id: self.id, sign: !self.sign }
    }

    /// Converts to signed integer. The absolute value indicates
    /// the identifier and sign states for positivity.
    pub fn to_i32(&self) -> Lit {
        if self.sign {
            self.id as Lit
        } else {
            -(self.id as Lit)
        }
    }
}

impl fmt::Display for CNF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.clauses {
            writeln!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Display for CNFClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} ∨ {} ∨ {})", self.vars[0], self.vars[1], self.vars[2])
    }
}

impl fmt::Display for CNFVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_i32())
    }
}
