use std::mem;

use super::{
    base::{EdgeRef, NeighborRef, VertexRef},
    error::{AddEdgeError, AddVertexError, ReplaceEdgeError, ReplaceVertexError},
    id::{IdType, IntegerIdType},
    marker::{Direction, EdgeType},
};

pub trait GraphBase {
    type VertexId: IdType;
    type EdgeId: IdType;
    type EdgeType: EdgeType;

    fn is_directed(&self) -> bool {
        Self::EdgeType::is_directed()
    }
}

pub trait Neighbors: GraphBase {
    type NeighborsIter<'a>: Iterator<Item = NeighborRef<Self::VertexId, Self::EdgeId>>
    where
        Self: 'a;

    /// Iterates over all incidences of `from`, regardless of edge direction.
    ///
    /// # Panics
    ///
    /// Panics if `from` is not present in the graph.
    fn neighbors_undirected(&self, from: &Self::VertexId) -> Self::NeighborsIter<'_>;

    /// Iterates over the incidences of `from` in the given direction.
    ///
    /// # Panics
    ///
    /// Panics if `from` is not present in the graph.
    fn neighbors_directed(&self, from: &Self::VertexId, dir: Direction)
        -> Self::NeighborsIter<'_>;

    fn degree_undirected(&self, id: &Self::VertexId) -> usize {
        if Self::EdgeType::is_directed() {
            self.degree_directed(id, Direction::Outgoing)
                + self.degree_directed(id, Direction::Incoming)
        } else {
            self.degree_directed(id, Direction::Outgoing)
        }
    }

    fn degree_directed(&self, id: &Self::VertexId, dir: Direction) -> usize {
        if Self::EdgeType::is_directed() {
            self.neighbors_directed(id, dir).count()
        } else {
            // In undirected graphs, we need to handle self-loops. Storages are
            // required to yield a self-loop just once, while it contributes 2
            // to the degree.
            self.neighbors_directed(id, dir)
                .map(|neighbor| if &neighbor.id == id { 2 } else { 1 })
                .sum()
        }
    }
}

pub trait VertexSet: GraphBase {
    type VerticesByIdIter<'a>: Iterator<Item = Self::VertexId>
    where
        Self: 'a;

    fn vertices_by_id(&self) -> Self::VerticesByIdIter<'_>;

    fn vertex_count(&self) -> usize {
        self.vertices_by_id().count()
    }

    /// An exclusive upper bound on `id.as_usize()` over all vertices.
    fn vertex_bound(&self) -> usize
    where
        Self::VertexId: IntegerIdType,
    {
        self.vertices_by_id()
            .map(|v| v.as_usize() + 1)
            .max()
            .unwrap_or_default()
    }

    fn contains_vertex(&self, id: &Self::VertexId) -> bool {
        self.vertices_by_id().any(|v| &v == id)
    }
}

pub trait EdgeSet: GraphBase {
    type EdgesByIdIter<'a>: Iterator<Item = Self::EdgeId>
    where
        Self: 'a;

    type EdgeIdIter<'a>: Iterator<Item = Self::EdgeId>
    where
        Self: 'a;

    fn edges_by_id(&self) -> Self::EdgesByIdIter<'_>;

    /// Iterates over the ids of all edges between `from` and `to` (parallel
    /// edges included), in insertion order.
    fn edge_id(&self, from: &Self::VertexId, to: &Self::VertexId) -> Self::EdgeIdIter<'_>;

    fn endpoints(&self, id: &Self::EdgeId) -> Option<(Self::VertexId, Self::VertexId)>;

    fn edge_count(&self) -> usize {
        self.edges_by_id().count()
    }

    /// An exclusive upper bound on `id.as_usize()` over all edges.
    fn edge_bound(&self) -> usize
    where
        Self::EdgeId: IntegerIdType,
    {
        self.edges_by_id()
            .map(|e| e.as_usize() + 1)
            .max()
            .unwrap_or_default()
    }

    fn contains_edge(&self, id: &Self::EdgeId) -> bool {
        self.endpoints(id).is_some()
    }

    fn contains_edge_between(&self, from: &Self::VertexId, to: &Self::VertexId) -> bool {
        self.edge_id_any(from, to).is_some()
    }

    fn edge_id_any(&self, from: &Self::VertexId, to: &Self::VertexId) -> Option<Self::EdgeId> {
        self.edge_id(from, to).next()
    }
}

pub trait GraphRef<V, E>: VertexSet + EdgeSet {
    type VerticesIter<'a>: Iterator<Item = VertexRef<'a, Self::VertexId, V>>
    where
        Self: 'a,
        V: 'a;

    type EdgesIter<'a>: Iterator<Item = EdgeRef<'a, Self::VertexId, Self::EdgeId, E>>
    where
        Self: 'a,
        E: 'a;

    fn vertices(&self) -> Self::VerticesIter<'_>;
    fn edges(&self) -> Self::EdgesIter<'_>;

    fn vertex(&self, id: &Self::VertexId) -> Option<&V>;
    fn edge(&self, id: &Self::EdgeId) -> Option<&E>;

    fn find_vertex(&self, vertex: &V) -> Option<Self::VertexId>
    where
        V: Eq,
    {
        self.vertices().find_map(|v| {
            if v.attr == vertex {
                Some(v.id.clone())
            } else {
                None
            }
        })
    }
}

pub trait GraphMut<V, E>: GraphRef<V, E> {
    fn vertex_mut(&mut self, id: &Self::VertexId) -> Option<&mut V>;
    fn edge_mut(&mut self, id: &Self::EdgeId) -> Option<&mut E>;

    fn try_replace_vertex(
        &mut self,
        id: &Self::VertexId,
        vertex: V,
    ) -> Result<V, ReplaceVertexError<V>> {
        match self.vertex_mut(id) {
            Some(slot) => Ok(mem::replace(slot, vertex)),
            None => Err(ReplaceVertexError(vertex)),
        }
    }

    fn replace_vertex(&mut self, id: &Self::VertexId, vertex: V) -> V {
        match self.try_replace_vertex(id, vertex) {
            Ok(original) => original,
            Err(error) => panic!("{error}"),
        }
    }

    fn try_replace_edge(&mut self, id: &Self::EdgeId, edge: E) -> Result<E, ReplaceEdgeError<E>> {
        match self.edge_mut(id) {
            Some(slot) => Ok(mem::replace(slot, edge)),
            None => Err(ReplaceEdgeError(edge)),
        }
    }

    fn replace_edge(&mut self, id: &Self::EdgeId, edge: E) -> E {
        match self.try_replace_edge(id, edge) {
            Ok(original) => original,
            Err(error) => panic!("{error}"),
        }
    }
}

pub trait GraphAdd<V, E>: GraphMut<V, E> {
    fn try_add_vertex(&mut self, vertex: V) -> Result<Self::VertexId, AddVertexError<V>>;

    /// Inserts an edge between existing vertices.
    ///
    /// Fails when either endpoint is absent from the graph, or with
    /// [`MultiEdge`](crate::core::error::AddEdgeErrorKind::MultiEdge) when the
    /// storage forbids parallel edges and an edge between the endpoints
    /// already exists. A failed insertion does not change the graph.
    fn try_add_edge(
        &mut self,
        from: &Self::VertexId,
        to: &Self::VertexId,
        edge: E,
    ) -> Result<Self::EdgeId, AddEdgeError<E>>;

    fn add_vertex(&mut self, vertex: V) -> Self::VertexId {
        match self.try_add_vertex(vertex) {
            Ok(id) => id,
            Err(error) => panic!("{error}"),
        }
    }

    fn add_edge(&mut self, from: &Self::VertexId, to: &Self::VertexId, edge: E) -> Self::EdgeId {
        match self.try_add_edge(from, to, edge) {
            Ok(id) => id,
            Err(error) => panic!("{error}"),
        }
    }

    fn try_get_or_add_vertex(&mut self, vertex: V) -> Result<Self::VertexId, AddVertexError<V>>
    where
        V: Eq,
    {
        match self.find_vertex(&vertex) {
            Some(v) => Ok(v),
            None => self.try_add_vertex(vertex),
        }
    }

    fn get_or_add_vertex(&mut self, vertex: V) -> Self::VertexId
    where
        V: Eq,
    {
        match self.try_get_or_add_vertex(vertex) {
            Ok(id) => id,
            Err(error) => panic!("{error}"),
        }
    }
}

pub trait GraphFull<V, E>: GraphAdd<V, E> {
    /// Removes a vertex together with all its incident edges. Returns `None`
    /// without touching the graph when the vertex is not present.
    fn remove_vertex(&mut self, id: &Self::VertexId) -> Option<V>;

    fn remove_edge(&mut self, id: &Self::EdgeId) -> Option<E>;

    fn remove_edge_any_between(&mut self, from: &Self::VertexId, to: &Self::VertexId) -> Option<E> {
        let id = self.edge_id_any(from, to)?;
        self.remove_edge(&id)
    }

    fn clear(&mut self) {
        let mut vertices = self.vertices_by_id().collect::<Vec<_>>();
        vertices.reverse();

        for v in vertices {
            self.remove_vertex(&v);
        }
    }

    fn clear_edges(&mut self) {
        let mut edges = self.edges_by_id().collect::<Vec<_>>();
        edges.reverse();

        for e in edges {
            self.remove_edge(&e);
        }
    }
}

/// Marker for storages that allow parallel edges between the same endpoints.
pub trait MultiEdge: GraphBase {}
