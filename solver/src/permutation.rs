use itertools::Itertools;

use crate::cnf::{CNFClause, Lit, VarId, CLAUSE_ARITY};

/// Flip mask negating every literal of a clause. This is the only
/// combination under which a clause evaluates to false.
const FALSIFYING_MASK: u8 = (1 << CLAUSE_ARITY) - 1;

/// Values required for the variables of one clause, kept as signed literals
/// sorted by variable. A literal `l` requires variable `|l|` to be `l > 0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SignAssignment {
    lits: Vec<Lit>,
}

impl SignAssignment {
    /// Returns `None` if `lits` requires both polarities of one variable.
    pub fn from_lits(lits: impl IntoIterator<Item = Lit>) -> Option<SignAssignment> {
        let lits: Vec<Lit> = lits.into_iter()
            .sorted_by_key(|lit| (lit.unsigned_abs(), *lit))
            .dedup()
            .collect();

        let contradictory = lits.iter()
            .tuple_windows()
            .any(|(a, b)| a.unsigned_abs() == b.unsigned_abs());

        if contradictory {
            None
        } else {
            Some(SignAssignment { lits })
        }
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Value this assignment requires for `var`, if any
    pub fn value(&self, var: VarId) -> Option<bool> {
        self.lits.iter()
            .find(|lit| lit.unsigned_abs() as VarId == var)
            .map(|lit| *lit > 0)
    }

    /// Substitutes the assignment into `clause`
    pub fn satisfies(&self, clause: &CNFClause) -> bool {
        clause.vars.iter()
            .any(|var| self.value(var.id) == Some(var.sign))
    }
}

/// Expands `clause` into every sign assignment that satisfies it.
///
/// Combinations are enumerated in binary counting order, bit `j` of the
/// counter negating literal `j`; the all-negated combination is skipped.
/// For clauses over three distinct variables this yields exactly seven
/// assignments. Repeated variables make some combinations contradictory;
/// those are dropped, as are duplicates, so such clauses expand to fewer.
pub fn valid_permutations(clause: &CNFClause) -> Vec<SignAssignment> {
    let lits = clause.lits();

    (0..FALSIFYING_MASK)
        .filter_map(|mask| {
            SignAssignment::from_lits(lits.iter().enumerate().map(|(j, &lit)| {
                if mask & (1 << j) != 0 { -lit } else { lit }
            }))
        })
        .unique()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(assignments: &[SignAssignment]) -> Vec<Vec<Lit>> {
        assignments.iter().map(|a| a.lits().to_vec()).collect()
    }

    #[test]
    fn seven_in_counting_order() {
        let perms = valid_permutations(&CNFClause::from_lits([1, 2, 3]));
        assert_eq!(lits(&perms), vec![
            vec![1, 2, 3],
            vec![-1, 2, 3],
            vec![1, -2, 3],
            vec![-1, -2, 3],
            vec![1, 2, -3],
            vec![-1, 2, -3],
            vec![1, -2, -3],
        ]);
    }

    #[test]
    fn excludes_the_falsifying_assignment() {
        let clause = CNFClause::from_lits([-4, 2, -7]);
        let perms = valid_permutations(&clause);
        assert_eq!(perms.len(), 7);
        assert!(perms.iter().all(|perm| perm.satisfies(&clause)));
        assert!(!perms.iter().any(|perm| perm.lits() == [-2, 4, 7]));
    }

    #[test]
    fn sorted_by_variable() {
        let perms = valid_permutations(&CNFClause::from_lits([5, -1, 3]));
        assert_eq!(perms[0].lits(), &[-1, 3, 5]);
        assert_eq!(perms[0].value(1), Some(false));
        assert_eq!(perms[0].value(2), None);
    }

    #[test]
    fn repeated_literal() {
        let perms = valid_permutations(&CNFClause::from_lits([1, 1, 2]));
        assert_eq!(lits(&perms), vec![vec![1, 2], vec![-1, 2], vec![1, -2]]);
    }

    #[test]
    fn tautology_keeps_all_consistent_assignments() {
        let perms = valid_permutations(&CNFClause::from_lits([1, -1, 2]));
        assert_eq!(lits(&perms), vec![vec![-1, 2], vec![1, 2], vec![-1, -2], vec![1, -2]]);
    }

    #[test]
    fn single_variable_clause() {
        let perms = valid_permutations(&CNFClause::from_lits([3, 3, 3]));
        assert_eq!(lits(&perms), vec![vec![3]]);
    }

    #[test]
    fn contradiction_rejected() {
        assert!(SignAssignment::from_lits(vec![2, -2, 1]).is_none());
    }
}
