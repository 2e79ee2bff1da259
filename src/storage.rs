//! Implementations of graph storages.
//!
//! A _storage_ is a concrete graph representation. It implements the traits
//! from the [`core`](crate::core) module to provide the needed functionality.
//!
//! The **adjacency list** provides fast vertex and edge insertion, supports
//! parallel edges and is well suited for traversal-heavy algorithms on sparse
//! graphs. The **adjacency matrix** provides constant-time edge insertion,
//! removal and lookup at the cost of quadratic space and no parallel edges.
//!
//! |                | **[AdjList]** | **[AdjMatrix]** |
//! |----------------|---------------|-----------------|
//! | add vertex     | _O*(1)_       | _O*(V)_         |
//! | add edge       | _O*(1)_       | _O(1)_          |
//! | get neighbors  | _O(d)_        | _O(V)_          |
//! | remove vertex  | _O(V + E)_    | _O(V)_          |
//! | remove edge    | _O(d)_        | _O(1)_          |
//! | space          | _O(V + E)_    | _O(V²)_         |
//! | multi edge     | YES           | NO              |
//! | stable ids     | NO            | NO              |
//!
//! * _V_ – vertex count
//! * _E_ – edge count
//! * _d_ – vertex degree
//! * _O*(..)_ – amortized complexity

pub mod adj_list;
pub mod adj_matrix;

#[doc(inline)]
pub use self::{adj_list::AdjList, adj_matrix::AdjMatrix};
