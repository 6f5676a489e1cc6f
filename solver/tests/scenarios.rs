use layersat::{
    check_valuation, Bruteforce, CNFClause, ErrorKind, LayeredGraph, LayeredSolver, NodeRef,
    Propagation, SignAssignment, Solver, CNF,
};

fn solve(dimacs: &str) -> (CNF, layersat::SATSolution) {
    let formula = CNF::from_dimacs(dimacs).unwrap();
    let solution = LayeredSolver::new().solve(&formula);
    (formula, solution)
}

/// Every sign pattern over variables 1, 2 and 3
fn all_patterns() -> CNF {
    (0..8)
        .map(|mask: i32| {
            let lit = |bit: i32| if mask & (1 << bit) != 0 { -(bit + 1) } else { bit + 1 };
            CNFClause::from_lits([lit(0), lit(1), lit(2)])
        })
        .collect()
}

#[test]
fn single_clause() {
    let (formula, solution) = solve("p cnf 3 1\n1 2 3 0\n");
    assert!(solution.is_sat());
    assert!(check_valuation(&formula, solution.valuation().unwrap()));
}

#[test]
fn clause_and_its_negation() {
    let (formula, solution) = solve("p cnf 3 2\n1 2 3 0\n-1 -2 -3 0\n");
    let valuation = solution.valuation().unwrap();
    assert!(check_valuation(&formula, valuation));
    assert!(valuation.iter().any(|value| *value));
    assert!(valuation.iter().any(|value| !*value));
}

#[test]
fn repeated_clause_then_negation() {
    let (formula, solution) = solve("p cnf 3 3\n1 2 3 0\n1 2 3 0\n-1 -2 -3 0\n");
    assert!(check_valuation(&formula, solution.valuation().unwrap()));
}

#[test]
fn every_pattern_is_unsatisfiable() {
    let formula = all_patterns();
    assert!(LayeredSolver::new().solve(&formula).is_unsat());
    assert!(Bruteforce.solve(&formula).is_unsat());

    // dropping any one clause makes it satisfiable again
    for skip in 0..8 {
        let mut formula = all_patterns();
        formula.clauses.remove(skip);
        assert!(LayeredSolver::new().solve(&formula).is_sat());
    }
}

#[test]
fn forced_chain_is_unsatisfiable() {
    // (1 ∨ 1 ∨ 1), (2 ∨ 2 ∨ 2), (3 ∨ 3 ∨ 3) pin every variable to true,
    // the last clause then wants all of them false
    let (_, solution) = solve("p cnf 3 4\n1 1 1 0\n2 2 2 0\n3 3 3 0\n-1 -2 -3 0\n");
    assert!(solution.is_unsat());
}

#[test]
fn duplicate_header_is_malformed() {
    let err = CNF::from_dimacs("p cnf 3 1\np cnf 3 1\n1 2 3 0\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn layer_cardinality() {
    let formula = CNF::from_dimacs("p cnf 5 4\n1 2 3 0\n-2 4 5 0\n1 -3 -5 0\n-1 -4 2 0\n").unwrap();
    let graph = LayeredGraph::build(&formula);
    assert_eq!(graph.layers().len(), 4);
    for (index, layer) in graph.layers().iter().enumerate() {
        assert_eq!(layer.index, index);
        assert_eq!(layer.len(), 7);
    }
}

#[test]
fn no_clauses_is_satisfiable() {
    let (_, solution) = solve("p cnf 3 0\n");
    assert_eq!(solution.valuation(), Some(&vec![true, true, true]));
}

#[test]
fn empty_layer_is_unsatisfiable() {
    let layer = |lits: &[i32]| vec![SignAssignment::from_lits(lits.iter().copied()).unwrap()];
    let graph = LayeredGraph::from_layers(3, vec![layer(&[1, 2, 3]), Vec::new(), layer(&[-1, 2, 3])]);
    let propagation = Propagation::run(graph, true);

    assert!(!propagation.is_satisfiable());
    assert!(propagation.graph().is_valid(NodeRef { layer: 0, index: 0 }));
    assert!(!propagation.graph().is_valid(NodeRef { layer: 2, index: 0 }));
}

#[test]
fn non_adjacent_aliasing() {
    // variable 1 is pinned by the first clause, skipped by the second and
    // contradicted by the third
    let (formula, solution) = solve("p cnf 5 5\n1 1 1 0\n2 3 4 0\n-1 5 5 0\n-5 -5 -5 0\n2 4 5 0\n");
    assert!(solution.is_unsat());
    assert!(Bruteforce.solve(&formula).is_unsat());
}
