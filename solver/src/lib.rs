/// The CNF representation of a formula
pub mod cnf;
/// Errors reported while reading DIMACS input
pub mod error;
/// Lazy DIMACS tokenizer and formula assembly
pub mod parser;
/// Expansion of a clause into its satisfying sign assignments
pub mod permutation;
/// Satisfaction nodes grouped into one layer per clause
pub mod graph;
/// Layer by layer reachability over the node graph
pub mod propagation;
/// The Solver trait which has to be implemented by each solver
pub mod sat_solver;
/// The output of a solver
mod sat_solution;
mod layered_solver;
pub mod bruteforce;
/// Random 3-CNF instances
pub mod generator;

pub use cnf::{CNFClause, CNFVar, Header, Lit, VarId, CNF};
pub use error::{ErrorKind, ParseError};
pub use graph::{Layer, LayeredGraph, Node, NodeRef, RequirementView};
pub use permutation::{valid_permutations, SignAssignment};
pub use propagation::Propagation;
pub use sat_solver::{check_valuation, Solver};
pub use bruteforce::Bruteforce;
pub use layered_solver::LayeredSolver;
pub use sat_solution::{SATSolution, Valuation};
