use thiserror::Error;

use crate::cnf::Lit;

/// Coarse error family, as reported to users
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    Arity,
    MissingHeader,
    Io,
}

/// Everything that can go wrong while turning DIMACS text into a [`CNF`](crate::CNF).
///
/// Line numbers are 1-based; `0` means the error was not tied to a line.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: malformed input at token `{token}`: {reason}")]
    Malformed {
        line: usize,
        token: String,
        reason: &'static str,
    },

    #[error("line {line}: expected a clause of exactly 3 literals followed by `0`, found {found} literal(s)")]
    Arity { line: usize, found: usize },

    #[error("line {line}: clause found before the `p cnf <variables> <clauses>` header")]
    MissingHeader { line: usize },

    #[error("header declares {expected} clause(s) but the input contains {found}")]
    ClauseCount { expected: usize, found: usize },

    #[error("line {line}: literal {literal} is outside of the declared {num_variables} variable(s)")]
    VariableOutOfRange {
        line: usize,
        literal: Lit,
        num_variables: usize,
    },

    #[error("failed to read input")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Malformed { .. }
            | ParseError::ClauseCount { .. }
            | ParseError::VariableOutOfRange { .. } => ErrorKind::MalformedInput,
            ParseError::Arity { .. } => ErrorKind::Arity,
            ParseError::MissingHeader { .. } => ErrorKind::MissingHeader,
            ParseError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn malformed(line: usize, token: &str, reason: &'static str) -> ParseError {
        ParseError::Malformed { line, token: token.to_string(), reason }
    }
}
