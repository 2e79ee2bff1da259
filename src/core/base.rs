use super::{id::IdType, marker::Direction};

/// A vertex id together with a borrow of its attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexRef<'a, VI: IdType, V> {
    pub id: VI,
    pub attr: &'a V,
}

/// An edge id together with a borrow of its attribute and its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRef<'a, VI: IdType, EI: IdType, E> {
    pub id: EI,
    pub attr: &'a E,
    pub from: VI,
    pub to: VI,
}

/// One incidence of a vertex: the neighbor, the connecting edge and the
/// direction in which the edge was reached from `pred`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborRef<VI: IdType, EI: IdType> {
    /// The vertex on the other side of the edge.
    pub id: VI,
    pub edge: EI,
    /// The vertex whose incidence list produced this entry.
    pub pred: VI,
    pub dir: Direction,
}
