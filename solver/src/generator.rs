use rand::seq::index::sample;
use rand::Rng;

use crate::{CNFClause, CNFVar, CNF};

/// Clause to variable ratio around which random 3-SAT turns hard
pub const THRESHOLD_RATIO: f64 = 4.26;

/// Uniform random 3-CNF: every clause picks three distinct variables and
/// independent signs.
///
/// # Panics
///
/// Panics if `num_variables` is smaller than 3.
pub fn random_formula(num_variables: usize, num_clauses: usize, rng: &mut impl Rng) -> CNF {
    assert!(num_variables >= 3, "a 3-CNF clause needs three distinct variables");

    let clauses = (0..num_clauses)
        .map(|_| {
            let vars: Vec<CNFVar> = sample(&mut *rng, num_variables, 3)
                .into_iter()
                .map(|id| CNFVar::new(id + 1, rng.gen_bool(0.5)))
                .collect();
            CNFClause::new(vars[0], vars[1], vars[2])
        })
        .collect();

    CNF::new(num_variables, clauses)
}

/// Random formula with about [`THRESHOLD_RATIO`] clauses per variable
pub fn threshold_formula(num_variables: usize, rng: &mut impl Rng) -> CNF {
    let num_clauses = (num_variables as f64 * THRESHOLD_RATIO).round() as usize;
    random_formula(num_variables, num_clauses, rng)
}
