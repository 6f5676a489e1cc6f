use std::io::{BufRead, Lines};
use std::mem;

use log::debug;

use crate::cnf::{CNFClause, Header, Lit, CLAUSE_ARITY, CNF};
use crate::error::ParseError;

/// One record of a DIMACS stream
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    /// The `p` line
    Header { line: usize, header: Header },
    /// Literals collected up to a `0` terminator
    Clause { line: usize, lits: Vec<Lit> },
}

/// The record currently being collected
#[derive(Debug)]
enum Open {
    Nothing,
    Header { line: usize, format_seen: bool, payload: Vec<usize> },
    Clause { line: usize, lits: Vec<Lit> },
}

/// Lazy, single pass tokenizer over DIMACS input.
///
/// Records are token based: a clause may span lines and `0` always closes it.
/// The header closes on `0` or at the end of its line once both of its
/// integers have been read.
pub struct Records<R> {
    lines: Lines<R>,
    line_no: usize,
    tokens: std::vec::IntoIter<String>,
    open: Open,
    emitted: usize,
    finished: bool,
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R) -> Records<R> {
        Records {
            lines: reader.lines(),
            line_no: 0,
            tokens: Vec::new().into_iter(),
            open: Open::Nothing,
            emitted: 0,
            finished: false,
        }
    }

    fn emit(&mut self, record: Record) -> Option<Record> {
        self.emitted += 1;
        Some(record)
    }

    /// A complete header closes with its line
    fn close_header_at_eol(&mut self) -> Option<Record> {
        match &self.open {
            Open::Header { line, payload, .. } if payload.len() == 2 => {
                let record = Record::Header {
                    line: *line,
                    header: Header { num_variables: payload[0], num_clauses: payload[1] },
                };
                self.open = Open::Nothing;
                self.emit(record)
            }
            _ => None,
        }
    }

    fn accept(&mut self, token: &str) -> Result<Option<Record>, ParseError> {
        let line = self.line_no;

        if let Open::Header { format_seen, payload, .. } = &mut self.open {
            if !*format_seen && payload.is_empty() && token.parse::<Lit>().is_err() {
                if token != "cnf" {
                    return Err(ParseError::malformed(line, token, "only `cnf` formulas are supported"));
                }
                *format_seen = true;
                return Ok(None);
            }
        }

        if token.starts_with('c') {
            // comment until end of line
            self.tokens = Vec::new().into_iter();
            return Ok(None);
        }

        if token == "p" {
            if self.emitted > 0 {
                return Err(ParseError::malformed(line, token, "header must appear exactly once, before every clause"));
            }
            if !matches!(self.open, Open::Nothing) {
                return Err(ParseError::malformed(line, token, "header inside an unterminated record"));
            }
            self.open = Open::Header { line, format_seen: false, payload: Vec::with_capacity(2) };
            return Ok(None);
        }

        let value = token.parse::<Lit>()
            .map_err(|_| ParseError::malformed(line, token, "expected a signed integer"))?;

        match &mut self.open {
            Open::Header { line: header_line, payload, .. } => {
                if value == 0 && payload.len() == 2 {
                    let record = Record::Header {
                        line: *header_line,
                        header: Header { num_variables: payload[0], num_clauses: payload[1] },
                    };
                    self.open = Open::Nothing;
                    return Ok(self.emit(record));
                }
                if value < 0 {
                    return Err(ParseError::malformed(line, token, "header values must not be negative"));
                }
                if payload.len() == 2 {
                    return Err(ParseError::malformed(line, token, "header takes exactly two integers"));
                }
                payload.push(value as usize);
                Ok(None)
            }
            Open::Nothing if value == 0 => Ok(self.emit(Record::Clause { line, lits: Vec::new() })),
            Open::Nothing => {
                self.open = Open::Clause { line, lits: vec![value] };
                Ok(None)
            }
            Open::Clause { line: clause_line, lits } => {
                if value != 0 {
                    lits.push(value);
                    return Ok(None);
                }
                let record = Record::Clause { line: *clause_line, lits: mem::take(lits) };
                self.open = Open::Nothing;
                Ok(self.emit(record))
            }
        }
    }

    /// Called once the input is exhausted
    fn finish(&mut self) -> Option<Result<Record, ParseError>> {
        self.finished = true;
        match mem::replace(&mut self.open, Open::Nothing) {
            Open::Nothing => None,
            Open::Header { line, payload, .. } if payload.len() == 2 => {
                self.emitted += 1;
                Some(Ok(Record::Header {
                    line,
                    header: Header { num_variables: payload[0], num_clauses: payload[1] },
                }))
            }
            Open::Header { line, .. } => {
                Some(Err(ParseError::malformed(line, "p", "header needs a variable and a clause count")))
            }
            Open::Clause { line, lits } => {
                let last = lits.last().map(Lit::to_string).unwrap_or_default();
                Some(Err(ParseError::malformed(line, &last, "clause is not terminated by `0`")))
            }
        }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Record, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            let token = match self.tokens.next() {
                Some(token) => token,
                None => {
                    if let Some(record) = self.close_header_at_eol() {
                        return Some(Ok(record));
                    }
                    match self.lines.next() {
                        Some(Ok(line)) => {
                            self.line_no += 1;
                            self.tokens = line.split_whitespace()
                                .map(String::from)
                                .collect::<Vec<_>>()
                                .into_iter();
                            continue;
                        }
                        Some(Err(err)) => {
                            self.finished = true;
                            return Some(Err(err.into()));
                        }
                        None => return self.finish(),
                    }
                }
            };

            // SATLIB benchmark files end with `%`
            if token == "%" {
                return self.finish();
            }

            match self.accept(&token) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Reads a whole formula, requiring the header first and then exactly
/// as many 3-literal clauses as it declares.
pub fn parse_formula(reader: impl BufRead) -> Result<CNF, ParseError> {
    let mut records = Records::new(reader);

    let header = match records.next() {
        None => return Err(ParseError::MissingHeader { line: 0 }),
        Some(record) => match record? {
            Record::Header { header, .. } => header,
            Record::Clause { line, .. } => return Err(ParseError::MissingHeader { line }),
        },
    };

    // the header's clause count is only checked once all clauses are read
    let mut clauses = Vec::new();
    for record in records {
        let (line, lits) = match record? {
            Record::Clause { line, lits } => (line, lits),
            Record::Header { line, .. } => {
                return Err(ParseError::malformed(line, "p", "header must appear exactly once"))
            }
        };

        if lits.len() != CLAUSE_ARITY {
            return Err(ParseError::Arity { line, found: lits.len() });
        }
        if let Some(&literal) = lits.iter().find(|lit| lit.unsigned_abs() as usize > header.num_variables) {
            return Err(ParseError::VariableOutOfRange {
                line,
                literal,
                num_variables: header.num_variables,
            });
        }
        clauses.push(CNFClause::from_lits([lits[0], lits[1], lits[2]]));
    }

    if clauses.len() != header.num_clauses {
        return Err(ParseError::ClauseCount { expected: header.num_clauses, found: clauses.len() });
    }

    debug!("parsed formula with {} variables and {} clauses", header.num_variables, clauses.len());
    Ok(CNF { num_variables: header.num_variables, clauses })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn records(input: &str) -> Vec<Result<Record, ParseError>> {
        Records::new(input.as_bytes()).collect()
    }

    #[test]
    fn basic() {
        let formula = parse_formula(&b"c whatever\np cnf 3 2\n1 2 3 0\n-1 -2 -3 0\n"[..]).unwrap();
        assert_eq!(formula.num_variables, 3);
        assert_eq!(formula.clauses.len(), 2);
        assert_eq!(formula.clauses[0].lits(), [1, 2, 3]);
        assert_eq!(formula.clauses[1].lits(), [-1, -2, -3]);
    }

    #[test]
    fn huge_declared_clause_count() {
        let err = parse_formula(&b"p cnf 3 2147483647\n1 2 3 0\n"[..]).unwrap_err();
        assert!(matches!(err, ParseError::ClauseCount { expected: 2147483647, found: 1 }));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn split() {
        let formula = parse_formula(&b"p cnf 3 1\n1 -2\n3 0"[..]).unwrap();
        assert_eq!(formula.clauses[0].lits(), [1, -2, 3]);
    }

    #[test]
    fn header_closed_by_zero() {
        let parsed = records("p cnf 3 1 0 1 2 3 0");
        assert_eq!(parsed.len(), 2);
        assert_eq!(
            *parsed[0].as_ref().unwrap(),
            Record::Header { line: 1, header: Header { num_variables: 3, num_clauses: 1 } }
        );
        assert_eq!(*parsed[1].as_ref().unwrap(), Record::Clause { line: 1, lits: vec![1, 2, 3] });
    }

    #[test]
    fn header_without_format_name() {
        let formula = parse_formula(&b"p 3 1\n1 2 3 0\n"[..]).unwrap();
        assert_eq!(formula.num_variables, 3);
    }

    #[test]
    fn comment_swallows_rest_of_line() {
        let formula = parse_formula(&b"p cnf 3 1\n1 2 c 9 9 9\n3 0\n"[..]).unwrap();
        assert_eq!(formula.clauses[0].lits(), [1, 2, 3]);
    }

    #[test]
    fn satlib_trailer() {
        let formula = parse_formula(&b"p cnf 3 1\n1 2 3 0\n%\n0\n"[..]).unwrap();
        assert_eq!(formula.len(), 1);
    }

    #[test]
    fn no_clauses() {
        let formula = parse_formula(&b"p cnf 4 0\n"[..]).unwrap();
        assert_eq!(formula.num_variables, 4);
        assert!(formula.is_empty());
    }

    #[test]
    fn second_header() {
        let err = parse_formula(&b"p cnf 3 1\np cnf 3 1\n1 2 3 0\n"[..]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn header_after_clause() {
        let parsed = records("p cnf 3 2\n1 2 3 0\np cnf 3 2\n");
        assert!(matches!(parsed.last(), Some(Err(ParseError::Malformed { line: 3, .. }))));
    }

    #[test]
    fn missing_header() {
        let err = parse_formula(&b"1 2 3 0\n"[..]).unwrap_err();
        assert!(matches!(err, ParseError::MissingHeader { line: 1 }));
        assert!(matches!(parse_formula(&b""[..]), Err(ParseError::MissingHeader { .. })));
    }

    #[test]
    fn wrong_arity() {
        let err = parse_formula(&b"p cnf 3 1\n1 2 0\n"[..]).unwrap_err();
        assert!(matches!(err, ParseError::Arity { line: 2, found: 2 }));
    }

    #[test]
    fn garbage_token() {
        let err = parse_formula(&b"p cnf 3 1\n1 x 3 0\n"[..]).unwrap_err();
        match err {
            ParseError::Malformed { line, token, .. } => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn out_of_range_variable() {
        let err = parse_formula(&b"p cnf 2 1\n1 2 -3 0\n"[..]).unwrap_err();
        assert!(matches!(err, ParseError::VariableOutOfRange { literal: -3, .. }));
    }

    #[test]
    fn clause_count_mismatch() {
        let err = parse_formula(&b"p cnf 3 2\n1 2 3 0\n"[..]).unwrap_err();
        assert!(matches!(err, ParseError::ClauseCount { expected: 2, found: 1 }));
    }

    #[test]
    fn unterminated_clause() {
        let err = parse_formula(&b"p cnf 3 1\n1 2 3\n"[..]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }
}
