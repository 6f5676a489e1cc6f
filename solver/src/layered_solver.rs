use log::info;

use crate::graph::LayeredGraph;
use crate::propagation::Propagation;
use crate::sat_solver::Solver;
use crate::{SATSolution, CNF};

/// Decides 3-CNF formulas by expanding every clause into its satisfying
/// sign assignments and propagating reachability through the layers.
#[derive(Clone, Copy, Debug)]
pub struct LayeredSolver {
    default_polarity: bool,
    parallel: bool,
}

impl Default for LayeredSolver {
    fn default() -> Self {
        LayeredSolver { default_polarity: true, parallel: false }
    }
}

impl LayeredSolver {
    pub fn new() -> LayeredSolver {
        LayeredSolver::default()
    }

    /// Value given to variables the witness chain leaves unconstrained
    pub fn default_polarity(mut self, polarity: bool) -> LayeredSolver {
        self.default_polarity = polarity;
        self
    }

    /// Evaluate the nodes of a layer on the rayon thread pool
    pub fn parallel(mut self, parallel: bool) -> LayeredSolver {
        self.parallel = parallel;
        self
    }

    /// Builds the layered graph of `formula` and propagates it
    pub fn propagate(&self, formula: &CNF) -> Propagation {
        let graph = LayeredGraph::build(formula);
        info!("built {} layer(s) with {} node(s)", graph.layers().len(), graph.num_nodes());
        Propagation::run(graph, self.parallel)
    }
}

impl Solver for LayeredSolver {
    fn solve(&self, formula: &CNF) -> SATSolution {
        let propagation = self.propagate(formula);
        info!("propagation visited {} chain state(s)", propagation.num_states());

        match propagation.witness(self.default_polarity) {
            Some(valuation) => SATSolution::Satisfiable(valuation),
            None => SATSolution::Unsatisfiable,
        }
    }
}
