use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::io::Write;

use crate::cnf::{CNFClause, Lit, VarId, CNF};
use crate::permutation::{valid_permutations, SignAssignment};

/// Position of a node: clause (layer) and sign assignment within it
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeRef {
    pub layer: usize,
    pub index: usize,
}

/// Per variable requirement of one node: `Some(value)` for the variables of
/// its clause, `None` (unconstrained) everywhere else.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RequirementView {
    assignment: SignAssignment,
}

impl RequirementView {
    pub fn new(assignment: SignAssignment) -> RequirementView {
        RequirementView { assignment }
    }

    pub fn get(&self, var: VarId) -> Option<bool> {
        self.assignment.value(var)
    }

    /// Constrained variables as literals, sorted by variable
    pub fn lits(&self) -> &[Lit] {
        self.assignment.lits()
    }

    /// The view over variables `1..=num_variables`, index `var - 1`
    pub fn to_dense(&self, num_variables: usize) -> Vec<Option<bool>> {
        (1..=num_variables).map(|var| self.get(var)).collect()
    }

    /// No variable is required true by one view and false by the other
    pub fn is_compatible(&self, other: &RequirementView) -> bool {
        agrees_with(self.lits(), other.lits())
    }
}

/// `lits` and `sorted` never require opposite values of one variable.
/// `sorted` must be ordered by variable.
pub(crate) fn agrees_with(lits: &[Lit], sorted: &[Lit]) -> bool {
    lits.iter().all(|lit| {
        match sorted.binary_search_by_key(&lit.unsigned_abs(), |other| other.unsigned_abs()) {
            Ok(i) => sorted[i] == *lit,
            Err(_) => true,
        }
    })
}

/// One candidate sign assignment of one clause
#[derive(Clone, Debug)]
pub struct Node {
    pub layer: usize,
    pub index: usize,
    /// Position in the flattened node list
    pub idx: usize,
    requirement: RequirementView,
    reachable: bool,
    back_pointer: Option<NodeRef>,
    resolved: bool,
}

impl Node {
    pub fn new(layer: usize, index: usize, idx: usize, assignment: SignAssignment) -> Node {
        Node {
            layer,
            index,
            idx,
            requirement: RequirementView::new(assignment),
            reachable: false,
            back_pointer: None,
            resolved: false,
        }
    }

    pub fn node_ref(&self) -> NodeRef {
        NodeRef { layer: self.layer, index: self.index }
    }

    pub fn requirement(&self) -> &RequirementView {
        &self.requirement
    }

    pub fn is_compatible(&self, other: &Node) -> bool {
        self.requirement.is_compatible(&other.requirement)
    }

    /// Set by propagation; `false` before it ran
    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    /// First compatible reachable predecessor, in index order
    pub fn back_pointer(&self) -> Option<NodeRef> {
        self.back_pointer
    }

    pub(crate) fn resolve(&mut self, reachable: bool, back_pointer: Option<NodeRef>) {
        debug_assert!(!self.resolved, "node {:?} resolved twice", self.node_ref());
        self.reachable = reachable;
        self.back_pointer = back_pointer;
        self.resolved = true;
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.idx == other.idx
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.idx.cmp(&other.idx)
    }
}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.idx.hash(state)
    }
}

/// All nodes of one clause
#[derive(Clone, Debug)]
pub struct Layer {
    pub index: usize,
    /// Missing for layers built directly from sign assignments
    pub clause: Option<CNFClause>,
    pub nodes: Vec<Node>,
}

impl Layer {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Layer `i` holds the satisfying sign assignments of clause `i`
#[derive(Clone, Debug)]
pub struct LayeredGraph {
    num_variables: usize,
    layers: Vec<Layer>,
}

impl LayeredGraph {
    pub fn build(formula: &CNF) -> LayeredGraph {
        let mut idx = 0;
        let layers = formula.clauses.iter()
            .enumerate()
            .map(|(layer, clause)| {
                let nodes = valid_permutations(clause).into_iter()
                    .enumerate()
                    .map(|(index, assignment)| {
                        idx += 1;
                        Node::new(layer, index, idx - 1, assignment)
                    })
                    .collect();
                Layer { index: layer, clause: Some(*clause), nodes }
            })
            .collect();

        LayeredGraph { num_variables: formula.num_variables, layers }
    }

    /// Builds layers straight from sign assignments. Layers may be empty.
    pub fn from_layers(num_variables: usize, layers: Vec<Vec<SignAssignment>>) -> LayeredGraph {
        let mut idx = 0;
        let mut used = 0;
        let layers = layers.into_iter()
            .enumerate()
            .map(|(layer, assignments)| {
                let nodes = assignments.into_iter()
                    .enumerate()
                    .map(|(index, assignment)| {
                        used = assignment.lits().iter()
                            .map(|lit| lit.unsigned_abs() as usize)
                            .fold(used, usize::max);
                        idx += 1;
                        Node::new(layer, index, idx - 1, assignment)
                    })
                    .collect();
                Layer { index: layer, clause: None, nodes }
            })
            .collect();

        LayeredGraph { num_variables: num_variables.max(used), layers }
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub(crate) fn layer_mut(&mut self, index: usize) -> &mut Layer {
        &mut self.layers[index]
    }

    pub fn node(&self, node: NodeRef) -> Option<&Node> {
        self.layers.get(node.layer)?.nodes.get(node.index)
    }

    /// Every node in flattened index order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.layers.iter().flat_map(|layer| layer.nodes.iter())
    }

    pub fn num_nodes(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    /// Nodes of the preceding layer; empty for the first one
    pub fn predecessors(&self, node: NodeRef) -> &[Node] {
        match node.layer.checked_sub(1).and_then(|layer| self.layers.get(layer)) {
            Some(layer) => &layer.nodes,
            None => &[],
        }
    }

    /// Whether `node` can be reached by a consistent chain from the first
    /// layer. Meaningful once the graph went through propagation.
    pub fn is_valid(&self, node: NodeRef) -> bool {
        self.node(node).map_or(false, Node::is_reachable)
    }

    /// Flattened node index to the flattened indices of the compatible
    /// nodes in the next layer
    pub fn adjacencies(&self) -> BTreeMap<usize, Vec<usize>> {
        let mut adjacencies: BTreeMap<usize, Vec<usize>> = self.nodes()
            .map(|node| (node.idx, Vec::new()))
            .collect();

        for (layer, next) in self.layers.iter().zip(self.layers.iter().skip(1)) {
            for node in &layer.nodes {
                let successors = next.nodes.iter()
                    .filter(|successor| node.is_compatible(successor))
                    .map(|successor| successor.idx)
                    .collect();
                adjacencies.insert(node.idx, successors);
            }
        }
        adjacencies
    }

    /// Writes [`adjacencies`](Self::adjacencies) as a JSON object
    pub fn write_adjacencies(&self, writer: impl Write) -> serde_json::Result<()> {
        serde_json::to_writer(writer, &self.adjacencies())
    }
}
