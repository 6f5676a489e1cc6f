use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, info, trace};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHasher};

use crate::cnf::{Lit, VarId};
use crate::graph::{agrees_with, LayeredGraph, Node, NodeRef};
use crate::sat_solution::Valuation;

/// Predecessor node and the index of its chain state a state was derived from
type StateOrigin = (NodeRef, usize);

/// Distinct chain states reaching one node, in discovery order. A chain state
/// is the union of the requirement views along one chain of node choices,
/// restricted to variables that still occur in later layers.
type Frontier = IndexMap<Vec<Lit>, Option<StateOrigin>, BuildHasherDefault<FxHasher>>;

/// Result of advancing one node over the previous layer
struct Advance {
    frontier: Frontier,
    back_pointer: Option<NodeRef>,
}

/// A layered graph after propagation
pub struct Propagation {
    graph: LayeredGraph,
    /// Per layer, per node, per chain state: where the state came from
    origins: Vec<Vec<Vec<Option<StateOrigin>>>>,
    states: usize,
}

impl Propagation {
    /// Resolves reachability of every node, layer by layer.
    ///
    /// Chain states are never merged across different assignments of live
    /// variables, so a node is reachable exactly when some chain of pairwise
    /// compatible nodes leads to it from the first layer.
    pub fn run(mut graph: LayeredGraph, parallel: bool) -> Propagation {
        let last_occurrence = last_occurrences(&graph);
        let num_layers = graph.layers().len();
        let mut origins: Vec<Vec<Vec<Option<StateOrigin>>>> = Vec::with_capacity(num_layers);
        let mut states = 0;
        let mut previous: Vec<Frontier> = Vec::new();

        for k in 0..num_layers {
            let is_live = |var: VarId| last_occurrence.get(&var).map_or(false, |&last| last > k);

            let advances: Vec<Advance> = {
                let nodes = &graph.layers()[k].nodes;
                let advance = |node: &Node| advance(node, &previous, k, &is_live);
                if parallel {
                    nodes.par_iter().map(advance).collect()
                } else {
                    nodes.iter().map(advance).collect()
                }
            };

            let layer = graph.layer_mut(k);
            let mut reachable = 0;
            for (node, advance) in layer.nodes.iter_mut().zip(&advances) {
                let is_reachable = !advance.frontier.is_empty();
                node.resolve(is_reachable, advance.back_pointer);
                reachable += is_reachable as usize;
                trace!("node {:?} {:?}: {} chain state(s)", node.node_ref(), node.requirement().lits(), advance.frontier.len());
            }

            let layer_states: usize = advances.iter().map(|advance| advance.frontier.len()).sum();
            states += layer_states;
            debug!("layer {}: {} of {} node(s) reachable, {} chain state(s)", k, reachable, layer.len(), layer_states);

            origins.push(advances.iter()
                .map(|advance| advance.frontier.values().copied().collect())
                .collect());
            previous = advances.into_iter().map(|advance| advance.frontier).collect();

            if reachable == 0 {
                for rest in k + 1..num_layers {
                    for node in &mut graph.layer_mut(rest).nodes {
                        node.resolve(false, None);
                    }
                }
                info!("no reachable node in layer {}, propagation stops", k);
                break;
            }
        }

        Propagation { graph, origins, states }
    }

    pub fn graph(&self) -> &LayeredGraph {
        &self.graph
    }

    pub fn into_graph(self) -> LayeredGraph {
        self.graph
    }

    /// Total number of chain states visited
    pub fn num_states(&self) -> usize {
        self.states
    }

    /// A formula without clauses is satisfiable; otherwise some node of
    /// the last layer has to be reachable.
    pub fn is_satisfiable(&self) -> bool {
        match self.graph.layers().last() {
            None => true,
            Some(layer) => layer.nodes.iter().any(Node::is_reachable),
        }
    }

    /// One node per layer forming a consistent chain, first layer first
    pub fn chain(&self) -> Option<Vec<NodeRef>> {
        let last = match self.graph.layers().last() {
            None => return Some(Vec::new()),
            Some(layer) => layer.nodes.iter().find(|node| node.is_reachable())?,
        };

        let mut chain = vec![last.node_ref()];
        let mut cursor = (last.node_ref(), 0);
        while let Some(origin) = self.origins[cursor.0.layer][cursor.0.index][cursor.1] {
            chain.push(origin.0);
            cursor = origin;
        }
        chain.reverse();
        Some(chain)
    }

    /// Satisfying valuation built from [`chain`](Self::chain). Variables no
    /// node of the chain constrains get `default_polarity`.
    pub fn witness(&self, default_polarity: bool) -> Option<Valuation> {
        let chain = self.chain()?;
        let mut valuation = vec![default_polarity; self.graph.num_variables()];

        for node in chain.iter().filter_map(|node| self.graph.node(*node)) {
            for &lit in node.requirement().lits() {
                if let Some(value) = valuation.get_mut(lit.unsigned_abs() as usize - 1) {
                    *value = lit > 0;
                }
            }
        }
        Some(valuation)
    }
}

/// Index of the last layer mentioning each variable. Only variables that
/// occur in some node are keys.
fn last_occurrences(graph: &LayeredGraph) -> FxHashMap<VarId, usize> {
    let mut last = FxHashMap::default();
    for node in graph.nodes() {
        for lit in node.requirement().lits() {
            last.insert(lit.unsigned_abs() as VarId, node.layer);
        }
    }
    last
}

fn advance(node: &Node, previous: &[Frontier], layer: usize, is_live: &impl Fn(VarId) -> bool) -> Advance {
    let own = node.requirement().lits();
    let mut frontier = Frontier::default();

    if layer == 0 {
        let state = own.iter()
            .copied()
            .filter(|lit| is_live(lit.unsigned_abs() as VarId))
            .collect();
        frontier.insert(state, None);
        return Advance { frontier, back_pointer: None };
    }

    let mut back_pointer = None;
    for (index, states) in previous.iter().enumerate() {
        let predecessor = NodeRef { layer: layer - 1, index };
        for (position, state) in states.keys().enumerate() {
            if !agrees_with(own, state) {
                continue;
            }
            back_pointer.get_or_insert(predecessor);

            let merged = state.iter()
                .merge_by(own.iter(), |a, b| a.unsigned_abs() <= b.unsigned_abs())
                .dedup()
                .copied()
                .filter(|lit| is_live(lit.unsigned_abs() as VarId))
                .collect();
            frontier.entry(merged).or_insert(Some((predecessor, position)));
        }
    }

    Advance { frontier, back_pointer }
}
