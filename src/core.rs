//! Building blocks of the graph data model: identifiers, direction markers,
//! capability traits and structural error types.
//!
//! A graph representation implements a subset of the capability traits
//! ([`Neighbors`], [`VertexSet`], [`EdgeSet`], [`GraphRef`], [`GraphMut`],
//! [`GraphAdd`], [`GraphFull`]) depending on what it supports. Algorithms
//! state their requirements as bounds on these traits, not on concrete
//! storages.

pub mod error;
pub mod id;
pub mod marker;

mod base;
mod graph;

pub use base::{EdgeRef, NeighborRef, VertexRef};
pub use graph::{
    EdgeSet, GraphAdd, GraphBase, GraphFull, GraphMut, GraphRef, MultiEdge, Neighbors, VertexSet,
};
