//! An adjacency list storage.
//!
//! Vertices and edges are kept in arenas indexed directly by their ids. Every
//! vertex holds the lists of its incident edges, one list per direction.
//! Removal uses `swap_remove`, so the id of the last vertex or edge changes
//! when another one is removed.

use std::marker::PhantomData;

use crate::core::{
    error::{AddEdgeError, AddEdgeErrorKind, AddVertexError},
    id::{EdgeId, IdType, VertexId},
    marker::{Direction, EdgeType},
    EdgeRef, EdgeSet, GraphAdd, GraphBase, GraphFull, GraphMut, GraphRef, MultiEdge, NeighborRef,
    Neighbors, VertexRef, VertexSet,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Vertex<V> {
    attr: V,
    edges: [Vec<EdgeId>; 2],
}

impl<V> Vertex<V> {
    fn new(attr: V) -> Self {
        Self {
            attr,
            edges: [Vec::new(), Vec::new()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjList<V, E, Ty> {
    vertices: Vec<Vertex<V>>,
    edges: Vec<E>,
    endpoints: Vec<[VertexId; 2]>,
    ty: PhantomData<fn() -> Ty>,
}

impl<V, E, Ty: EdgeType> AdjList<V, E, Ty> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            endpoints: Vec::new(),
            ty: PhantomData,
        }
    }

    pub fn with_capacity(vertex_count: usize, edge_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            edges: Vec::with_capacity(edge_count),
            endpoints: Vec::with_capacity(edge_count),
            ty: PhantomData,
        }
    }

    fn remove_edge_inner(&mut self, id: EdgeId, cause: Option<VertexId>) -> Option<E> {
        let endpoints = self.endpoints.get(id.as_usize())?;

        for (i, dir) in Self::directions().iter().enumerate() {
            let endpoint = endpoints[i];

            // If this endpoint is not the vertex causing this removal, we need
            // to remove the edge from it. If it is the cause, it is not
            // necessary to remove it.
            if Some(endpoint) != cause {
                Self::disconnect(
                    &mut self.vertices[endpoint.as_usize()].edges[dir.index()],
                    id,
                );
            }
        }

        // Remove the edge from the graph.
        let edge = self.edges.swap_remove(id.as_usize());
        self.endpoints.swap_remove(id.as_usize());

        // If `swap_remove` actually moved an existing edge somewhere, we need
        // to fix its id in the entire graph.
        if id.as_usize() < self.edges.len() {
            self.relocate_edge(EdgeId::from_usize(self.edges.len()), id);
        }

        Some(edge)
    }

    fn relocate_vertex(&mut self, old_id: VertexId, new_id: VertexId) {
        let vertex = &mut self.vertices[new_id.as_usize()];

        // Fix the id of the vertex in all edges it has.
        for dir in Ty::directions() {
            for edge_id in vertex.edges[dir.index()].iter() {
                let endpoints = &mut self.endpoints[edge_id.as_usize()];
                for endpoint in endpoints.iter_mut() {
                    if *endpoint == old_id {
                        *endpoint = new_id;
                    }
                }
            }
        }
    }

    fn relocate_edge(&mut self, old_id: EdgeId, new_id: EdgeId) {
        let endpoints = self.endpoints[new_id.as_usize()];

        // Fix the id of the edge in all vertices it is incident with.
        for i in 0..=1 {
            let vertex = &mut self.vertices[endpoints[i].as_usize()];

            for dir in Ty::directions() {
                for edge_id in &mut vertex.edges[dir.index()] {
                    if *edge_id == old_id {
                        *edge_id = new_id;
                    }
                }
            }

            // If this is a self-loop, then all ids are fixed in the first
            // iteration.
            if endpoints[0] == endpoints[1] {
                break;
            }
        }
    }

    fn disconnect(edges: &mut Vec<EdgeId>, id: EdgeId) {
        for i in 0..edges.len() {
            if edges[i] == id {
                edges.swap_remove(i);
                break;
            }
        }
    }

    fn directions() -> [Direction; 2] {
        if Ty::is_directed() {
            [Direction::Outgoing, Direction::Incoming]
        } else {
            [Direction::Outgoing, Direction::Outgoing]
        }
    }
}

impl<V, E, Ty: EdgeType> Default for AdjList<V, E, Ty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E, Ty: EdgeType> GraphBase for AdjList<V, E, Ty> {
    type VertexId = VertexId;
    type EdgeId = EdgeId;
    type EdgeType = Ty;
}

impl<V, E, Ty: EdgeType> VertexSet for AdjList<V, E, Ty> {
    type VerticesByIdIter<'a>
        = RangeIds<VertexId>
    where
        Self: 'a;

    fn vertices_by_id(&self) -> Self::VerticesByIdIter<'_> {
        (0..self.vertices.len()).into()
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex_bound(&self) -> usize {
        self.vertex_count()
    }

    fn contains_vertex(&self, id: &Self::VertexId) -> bool {
        id.as_usize() < self.vertices.len()
    }
}

impl<V, E, Ty: EdgeType> EdgeSet for AdjList<V, E, Ty> {
    type EdgesByIdIter<'a>
        = RangeIds<EdgeId>
    where
        Self: 'a;

    type EdgeIdIter<'a>
        = EdgeIdIter<'a>
    where
        Self: 'a;

    fn edges_by_id(&self) -> Self::EdgesByIdIter<'_> {
        (0..self.edges.len()).into()
    }

    fn edge_id(&self, from: &Self::VertexId, to: &Self::VertexId) -> Self::EdgeIdIter<'_> {
        match self.vertices.get(from.as_usize()) {
            Some(vertex) => EdgeIdIter {
                from: *from,
                to: *to,
                undirected: !Ty::is_directed(),
                edges: &vertex.edges[Direction::Outgoing.index()],
                endpoints: self.endpoints.as_slice(),
                skip: Vec::new(),
            },
            None => EdgeIdIter {
                from: *from,
                to: *to,
                undirected: !Ty::is_directed(),
                edges: &[],
                endpoints: &[],
                skip: Vec::new(),
            },
        }
    }

    fn endpoints(&self, id: &Self::EdgeId) -> Option<(Self::VertexId, Self::VertexId)> {
        self.endpoints
            .get(id.as_usize())
            .map(|endpoints| (endpoints[0], endpoints[1]))
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn edge_bound(&self) -> usize {
        self.edge_count()
    }

    fn contains_edge(&self, id: &Self::EdgeId) -> bool {
        id.as_usize() < self.edges.len()
    }
}

impl<V, E, Ty: EdgeType> GraphRef<V, E> for AdjList<V, E, Ty> {
    type VerticesIter<'a>
        = VerticesIter<'a, V>
    where
        Self: 'a,
        V: 'a;

    type EdgesIter<'a>
        = EdgesIter<'a, E>
    where
        Self: 'a,
        E: 'a;

    fn vertices(&self) -> Self::VerticesIter<'_> {
        VerticesIter {
            inner: self.vertices.iter().enumerate(),
        }
    }

    fn edges(&self) -> Self::EdgesIter<'_> {
        EdgesIter {
            inner: self.edges.iter().zip(self.endpoints.iter()).enumerate(),
        }
    }

    fn vertex(&self, id: &Self::VertexId) -> Option<&V> {
        self.vertices.get(id.as_usize()).map(|vertex| &vertex.attr)
    }

    fn edge(&self, id: &Self::EdgeId) -> Option<&E> {
        self.edges.get(id.as_usize())
    }
}

impl<V, E, Ty: EdgeType> GraphMut<V, E> for AdjList<V, E, Ty> {
    fn vertex_mut(&mut self, id: &Self::VertexId) -> Option<&mut V> {
        self.vertices
            .get_mut(id.as_usize())
            .map(|vertex| &mut vertex.attr)
    }

    fn edge_mut(&mut self, id: &Self::EdgeId) -> Option<&mut E> {
        self.edges.get_mut(id.as_usize())
    }
}

impl<V, E, Ty: EdgeType> GraphAdd<V, E> for AdjList<V, E, Ty> {
    fn try_add_vertex(&mut self, vertex: V) -> Result<Self::VertexId, AddVertexError<V>> {
        let id = VertexId::from_usize(self.vertices.len());
        self.vertices.push(Vertex::new(vertex));
        Ok(id)
    }

    fn try_add_edge(
        &mut self,
        from: &Self::VertexId,
        to: &Self::VertexId,
        edge: E,
    ) -> Result<Self::EdgeId, AddEdgeError<E>> {
        if from.as_usize() >= self.vertices.len() {
            return Err(AddEdgeError::new(edge, AddEdgeErrorKind::SourceAbsent));
        }

        if to.as_usize() >= self.vertices.len() {
            return Err(AddEdgeError::new(edge, AddEdgeErrorKind::DestinationAbsent));
        }

        let id = EdgeId::from_usize(self.edges.len());
        self.edges.push(edge);
        self.endpoints.push([*from, *to]);

        let directions = Self::directions();
        self.vertices[from.as_usize()].edges[directions[0].index()].push(id);
        self.vertices[to.as_usize()].edges[directions[1].index()].push(id);

        Ok(id)
    }
}

impl<V, E, Ty: EdgeType> GraphFull<V, E> for AdjList<V, E, Ty> {
    fn remove_vertex(&mut self, id: &Self::VertexId) -> Option<V> {
        for dir in Ty::directions() {
            // Remove all edges connected to this vertex in this direction.
            loop {
                let vertex = self.vertices.get_mut(id.as_usize())?;
                if vertex.edges[dir.index()].is_empty() {
                    break;
                }

                // Remove the edge from the list of this vertex.
                let edge_id = vertex.edges[dir.index()].swap_remove(0);
                // Remove the edge from the whole graph.
                self.remove_edge_inner(edge_id, Some(*id));
            }
        }

        // Remove the vertex from the graph.
        let vertex = self.vertices.swap_remove(id.as_usize());

        // If `swap_remove` actually moved an existing vertex somewhere, we need
        // to fix its id in the entire graph.
        if id.as_usize() < self.vertices.len() {
            self.relocate_vertex(VertexId::from_usize(self.vertices.len()), *id);
        }

        Some(vertex.attr)
    }

    fn remove_edge(&mut self, id: &Self::EdgeId) -> Option<E> {
        self.remove_edge_inner(*id, None)
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.endpoints.clear();
    }

    fn clear_edges(&mut self) {
        self.edges.clear();
        self.endpoints.clear();

        for vertex in self.vertices.iter_mut() {
            vertex.edges[0].clear();
            vertex.edges[1].clear();
        }
    }
}

impl<V, E, Ty: EdgeType> MultiEdge for AdjList<V, E, Ty> {}

impl<V, E, Ty: EdgeType> Neighbors for AdjList<V, E, Ty> {
    type NeighborsIter<'a>
        = NeighborsIter<'a, Ty>
    where
        Self: 'a;

    fn neighbors_undirected(&self, from: &Self::VertexId) -> Self::NeighborsIter<'_> {
        let vertex = self
            .vertices
            .get(from.as_usize())
            .expect("vertex does not exist");

        NeighborsIter {
            from: *from,
            edges: [&vertex.edges[0], &vertex.edges[1]],
            endpoints: self.endpoints.as_slice(),
            dir: 0,
            skip: Vec::new(),
            ty: PhantomData,
        }
    }

    fn neighbors_directed(
        &self,
        from: &Self::VertexId,
        dir: Direction,
    ) -> Self::NeighborsIter<'_> {
        let vertex = self
            .vertices
            .get(from.as_usize())
            .expect("vertex does not exist");

        let list_dir = if !Ty::is_directed() {
            // If the graph is undirected, then the direction does not matter.
            // However, we need to index the "outgoing" edge list in the vertex,
            // because the "incoming" list is empty.
            Direction::Outgoing
        } else {
            dir
        };

        let mut edges: [&[EdgeId]; 2] = [&[], &[]];
        edges[dir.index()] = &vertex.edges[list_dir.index()];

        NeighborsIter {
            from: *from,
            edges,
            endpoints: self.endpoints.as_slice(),
            dir: dir.index(),
            skip: Vec::new(),
            ty: PhantomData,
        }
    }

    fn degree_directed(&self, id: &Self::VertexId, dir: Direction) -> usize {
        let vertex = self
            .vertices
            .get(id.as_usize())
            .expect("vertex does not exist");

        if Ty::is_directed() {
            vertex.edges[dir.index()].len()
        } else {
            // A self-loop occupies two entries in the list, so the length is
            // already the degree with self-loops counted twice.
            vertex.edges[Direction::Outgoing.index()].len()
        }
    }
}

#[derive(Debug)]
pub struct RangeIds<I> {
    range: std::ops::Range<usize>,
    ty: PhantomData<I>,
}

impl<I> From<std::ops::Range<usize>> for RangeIds<I> {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self {
            range,
            ty: PhantomData,
        }
    }
}

impl<I: IdType> Iterator for RangeIds<I> {
    type Item = I;

    fn next(&mut self) -> Option<Self::Item> {
        self.range.next().map(I::from_usize)
    }
}

pub struct VerticesIter<'a, V> {
    inner: std::iter::Enumerate<std::slice::Iter<'a, Vertex<V>>>,
}

impl<'a, V> Iterator for VerticesIter<'a, V> {
    type Item = VertexRef<'a, VertexId, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(index, vertex)| VertexRef {
            id: VertexId::from_usize(index),
            attr: &vertex.attr,
        })
    }
}

pub struct EdgesIter<'a, E> {
    inner: std::iter::Enumerate<std::iter::Zip<std::slice::Iter<'a, E>, std::slice::Iter<'a, [VertexId; 2]>>>,
}

impl<'a, E> Iterator for EdgesIter<'a, E> {
    type Item = EdgeRef<'a, VertexId, EdgeId, E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(index, (attr, endpoints))| EdgeRef {
            id: EdgeId::from_usize(index),
            attr,
            from: endpoints[0],
            to: endpoints[1],
        })
    }
}

pub struct EdgeIdIter<'a> {
    from: VertexId,
    to: VertexId,
    undirected: bool,
    edges: &'a [EdgeId],
    endpoints: &'a [[VertexId; 2]],
    // Second entries of already yielded self-loops. Removals reorder the list
    // with `swap_remove`, so the two entries of a self-loop are not
    // necessarily adjacent.
    skip: Vec<EdgeId>,
}

impl Iterator for EdgeIdIter<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (edge, tail) = self.edges.split_first()?;
            self.edges = tail;

            if let Some(i) = self.skip.iter().position(|e| e == edge) {
                self.skip.swap_remove(i);
                continue;
            }

            let endpoints = self.endpoints[edge.as_usize()];

            let matches = if self.undirected {
                (endpoints[0] == self.from && endpoints[1] == self.to)
                    || (endpoints[0] == self.to && endpoints[1] == self.from)
            } else {
                endpoints[0] == self.from && endpoints[1] == self.to
            };

            if matches {
                if self.undirected && endpoints[0] == endpoints[1] {
                    // A self-loop occupies two entries in the list, yield it
                    // only once.
                    self.skip.push(*edge);
                }

                return Some(*edge);
            }
        }
    }
}

pub struct NeighborsIter<'a, Ty> {
    from: VertexId,
    edges: [&'a [EdgeId]; 2],
    endpoints: &'a [[VertexId; 2]],
    dir: usize,
    // Second entries of already yielded self-loops. Removals reorder the list
    // with `swap_remove`, so the two entries of a self-loop are not
    // necessarily adjacent.
    skip: Vec<EdgeId>,
    ty: PhantomData<Ty>,
}

impl<Ty: EdgeType> Iterator for NeighborsIter<'_, Ty> {
    type Item = NeighborRef<VertexId, EdgeId>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            loop {
                if self.dir == self.edges.len() {
                    return None;
                }

                if self.edges[self.dir].is_empty() {
                    self.dir += 1;
                } else {
                    break;
                }
            }

            let (head, tail) = self.edges[self.dir].split_at(1);
            self.edges[self.dir] = tail;
            let edge = head[0];

            if let Some(i) = self.skip.iter().position(|e| *e == edge) {
                self.skip.swap_remove(i);
                continue;
            }

            let endpoints = self.endpoints[edge.as_usize()];

            let neighbor = if endpoints[0] != self.from {
                endpoints[0]
            } else {
                endpoints[1]
            };

            if !Ty::is_directed() && neighbor == self.from {
                // A self-loop occupies two entries in the list, yield it only
                // once.
                self.skip.push(edge);
            }

            let dir = Direction::from_index(self.dir);

            return Some(NeighborRef {
                id: neighbor,
                edge,
                pred: self.from,
                dir,
            });
        }
    }
}
