/// Value of every variable, index `id - 1` holds variable `id`
pub type Valuation = Vec<bool>;

const MAX_LITERALS_PER_LINE: usize = 8;

#[derive(Clone, PartialEq, Eq)]
pub enum SATSolution {
    Satisfiable(Valuation),
    Unsatisfiable,
}

impl std::iter::FromIterator<bool> for SATSolution {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        SATSolution::Satisfiable(iter.into_iter().collect())
    }
}

impl SATSolution {
    pub fn is_sat(&self) -> bool {
        matches!(self, SATSolution::Satisfiable(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, SATSolution::Unsatisfiable)
    }

    /// The witness, if there is one
    pub fn valuation(&self) -> Option<&Valuation> {
        match self {
            SATSolution::Satisfiable(valuation) => Some(valuation),
            SATSolution::Unsatisfiable => None,
        }
    }

    /// Signed literals of the witness, wrapped into lines
    fn literal_lines(valuation: &[bool], prefix: &str, terminate: bool) -> String {
        let mut out = String::new();
        for chunk in valuation.iter().enumerate().collect::<Vec<_>>().chunks(MAX_LITERALS_PER_LINE) {
            out.push_str(prefix);
            for (id, sign) in chunk {
                out.push_str(&format!("{}{} ", if **sign { "" } else { "-" }, id + 1));
            }
            out.push('\n');
        }
        if terminate {
            out.push_str(prefix);
            out.push_str("0\n");
        }
        out
    }

    pub fn to_dimacs(&self) -> String {
        match self {
            SATSolution::Unsatisfiable => "s UNSATISFIABLE\n".to_string(),
            SATSolution::Satisfiable(variables) => {
                format!("s SATISFIABLE\n{}", Self::literal_lines(variables, "v ", true))
            }
        }
    }
}

impl std::fmt::Debug for SATSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

impl std::fmt::Display for SATSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SATSolution::Unsatisfiable => write!(f, "Unsatisfiable"),
            SATSolution::Satisfiable(variables) => {
                write!(f, "Satisfiable:\n{}", Self::literal_lines(variables, "", false))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SATSolution;

    #[test]
    fn dimacs_output() {
        let solution = SATSolution::Satisfiable(vec![true, false, true]);
        assert_eq!(solution.to_dimacs(), "s SATISFIABLE\nv 1 -2 3 \nv 0\n");
        assert_eq!(SATSolution::Unsatisfiable.to_dimacs(), "s UNSATISFIABLE\n");

        let wide = SATSolution::Satisfiable(vec![false; 9]);
        assert_eq!(wide.to_dimacs(), "s SATISFIABLE\nv -1 -2 -3 -4 -5 -6 -7 -8 \nv -9 \nv 0\n");
    }

    #[test]
    fn wraps_long_models() {
        let solution: SATSolution = (0..10).map(|i| i % 2 == 0).collect();
        let out = solution.to_dimacs();
        assert_eq!(out.lines().count(), 4);
        assert!(out.lines().nth(2).unwrap().starts_with("v 9 -10"));
    }
}
