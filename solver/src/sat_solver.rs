use crate::{CNF, SATSolution};
use rayon::prelude::*;

pub trait Solver {
    fn solve(&self, formula: &CNF) -> SATSolution;
}

/// Checks whether every clause holds under `val`
pub fn check_valuation(formula: &CNF, val: &[bool]) -> bool {
    formula.clauses.par_iter()
        .all(|clause| clause.is_satisfied_by(val))
}

impl<T: Solver + ?Sized> Solver for &T {
    fn solve(&self, formula: &CNF) -> SATSolution {
        (**self).solve(formula)
    }
}

impl<T: Solver + ?Sized> Solver for Box<T> {
    fn solve(&self, formula: &CNF) -> SATSolution {
        (**self).solve(formula)
    }
}
