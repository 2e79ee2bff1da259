//! An adjacency matrix storage.
//!
//! The matrix is stored as a flat vector of entries, row-major for directed
//! graphs and as the lower triangle for undirected graphs. An edge id is the
//! position of the entry in the vector. Parallel edges are not supported.

use std::marker::PhantomData;

use crate::core::{
    error::{AddEdgeError, AddEdgeErrorKind, AddVertexError},
    id::{EdgeId, IdType, VertexId},
    marker::{Direction, EdgeType},
    EdgeRef, EdgeSet, GraphAdd, GraphBase, GraphFull, GraphMut, GraphRef, NeighborRef, Neighbors,
    VertexRef, VertexSet,
};

use super::adj_list::RangeIds;

#[derive(Debug)]
pub struct AdjMatrix<V, E, Ty> {
    matrix: Matrix<E, Ty>,
    vertices: Vec<V>,
    n_edges: usize,
}

impl<V, E, Ty: EdgeType> AdjMatrix<V, E, Ty> {
    pub fn new() -> Self {
        Self {
            matrix: Matrix::with_capacity(8),
            vertices: Vec::new(),
            n_edges: 0,
        }
    }

    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            matrix: Matrix::with_capacity(vertex_count),
            vertices: Vec::with_capacity(vertex_count),
            n_edges: 0,
        }
    }
}

impl<V, E, Ty: EdgeType> Default for AdjMatrix<V, E, Ty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E, Ty: EdgeType> GraphBase for AdjMatrix<V, E, Ty> {
    type VertexId = VertexId;
    type EdgeId = EdgeId;
    type EdgeType = Ty;
}

impl<V, E, Ty: EdgeType> VertexSet for AdjMatrix<V, E, Ty> {
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

impl<V, E, Ty: EdgeType> EdgeSet for AdjMatrix<V, E, Ty> {
    type EdgesByIdIter<'a>
        = EdgesByIdIter<'a, E, Ty>
    where
        Self: 'a;

    type EdgeIdIter<'a>
        = std::option::IntoIter<EdgeId>
    where
        Self: 'a;

    fn edges_by_id(&self) -> Self::EdgesByIdIter<'_> {
        EdgesByIdIter {
            matrix: &self.matrix,
            index: 0,
            edge_bound: self.edge_bound(),
        }
    }

    fn edge_id(&self, from: &Self::VertexId, to: &Self::VertexId) -> Self::EdgeIdIter<'_> {
        if from.as_usize() >= self.vertices.len() || to.as_usize() >= self.vertices.len() {
            return None.into_iter();
        }

        let index = self.matrix.index(from.as_usize(), to.as_usize());
        self.matrix.get(index).map(|_| index).into_iter()
    }

    fn endpoints(&self, id: &Self::EdgeId) -> Option<(Self::VertexId, Self::VertexId)> {
        self.matrix.get(*id)?;

        let (row, col) = self.matrix.coords(*id);
        if row < self.vertex_count() {
            Some((VertexId::from_usize(row), VertexId::from_usize(col)))
        } else {
            None
        }
    }

    fn edge_count(&self) -> usize {
        self.n_edges
    }

    fn edge_bound(&self) -> usize {
        self.matrix.index(self.vertex_count(), 0).as_usize()
    }
}

impl<V, E, Ty: EdgeType> GraphRef<V, E> for AdjMatrix<V, E, Ty> {
    type VerticesIter<'a>
        = VerticesIter<'a, V>
    where
        Self: 'a,
        V: 'a;

    type EdgesIter<'a>
        = EdgesIter<'a, E, Ty>
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
            matrix: &self.matrix,
            index: 0,
            edge_bound: self.edge_bound(),
        }
    }

    fn vertex(&self, id: &Self::VertexId) -> Option<&V> {
        self.vertices.get(id.as_usize())
    }

    fn edge(&self, id: &Self::EdgeId) -> Option<&E> {
        self.matrix.get(*id)
    }
}

impl<V, E, Ty: EdgeType> GraphMut<V, E> for AdjMatrix<V, E, Ty> {
    fn vertex_mut(&mut self, id: &Self::VertexId) -> Option<&mut V> {
        self.vertices.get_mut(id.as_usize())
    }

    fn edge_mut(&mut self, id: &Self::EdgeId) -> Option<&mut E> {
        self.matrix.get_mut(*id)
    }
}

impl<V, E, Ty: EdgeType> GraphAdd<V, E> for AdjMatrix<V, E, Ty> {
    fn try_add_vertex(&mut self, vertex: V) -> Result<Self::VertexId, AddVertexError<V>> {
        self.matrix.ensure_capacity(self.vertex_count() + 1);

        let id = VertexId::from_usize(self.vertices.len());
        self.vertices.push(vertex);
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

        let index = self.matrix.index(from.as_usize(), to.as_usize());

        if self.matrix.get(index).is_some() {
            return Err(AddEdgeError::new(edge, AddEdgeErrorKind::MultiEdge));
        }

        self.matrix.insert(index, edge);
        self.n_edges += 1;

        Ok(index)
    }
}

impl<V, E, Ty: EdgeType> GraphFull<V, E> for AdjMatrix<V, E, Ty> {
    fn remove_vertex(&mut self, id: &Self::VertexId) -> Option<V> {
        self.vertex(id)?;

        let index = id.as_usize();

        // Remove incident edges.
        for i in 0..self.vertices.len() {
            let edge_index = self.matrix.index(index, i);
            if self.matrix.remove(edge_index).is_some() {
                self.n_edges -= 1;
            }

            if Ty::is_directed() {
                let edge_index = self.matrix.index(i, index);
                if self.matrix.remove(edge_index).is_some() {
                    self.n_edges -= 1;
                }
            }
        }

        let vertex = self.vertices.swap_remove(index);

        // Relocate the edges of the last vertex, if it is going to replace the
        // removed vertex.
        if index < self.vertices.len() {
            let last_index = self.vertices.len();

            for i in 0..self.vertices.len() {
                let edge_index = self.matrix.index(last_index, i);
                if let Some(edge) = self.matrix.remove(edge_index) {
                    let edge_index = self.matrix.index(index, i);
                    self.matrix.insert(edge_index, edge);
                }

                if Ty::is_directed() {
                    let edge_index = self.matrix.index(i, last_index);
                    if let Some(edge) = self.matrix.remove(edge_index) {
                        let edge_index = self.matrix.index(i, index);
                        self.matrix.insert(edge_index, edge);
                    }
                }
            }

            // Handle self-loops.
            let edge_index = self.matrix.index(last_index, last_index);
            if let Some(edge) = self.matrix.remove(edge_index) {
                let edge_index = self.matrix.index(index, index);
                self.matrix.insert(edge_index, edge);
            }
        }

        Some(vertex)
    }

    fn remove_edge(&mut self, id: &Self::EdgeId) -> Option<E> {
        match self.matrix.remove(*id) {
            Some(edge) => {
                self.n_edges -= 1;
                Some(edge)
            }
            None => None,
        }
    }

    fn clear(&mut self) {
        self.matrix.clear();
        self.vertices.clear();
        self.n_edges = 0;
    }

    fn clear_edges(&mut self) {
        self.matrix.clear();
        self.n_edges = 0;
    }
}

impl<V, E, Ty: EdgeType> Neighbors for AdjMatrix<V, E, Ty> {
    type NeighborsIter<'a>
        = NeighborsIter<'a, E, Ty>
    where
        Self: 'a;

    fn neighbors_undirected(&self, from: &Self::VertexId) -> Self::NeighborsIter<'_> {
        self.vertex(from).expect("vertex does not exist");

        let filter = if Ty::is_directed() {
            None
        } else {
            // Use only the outgoing direction for undirected graphs.
            Some(Direction::Outgoing)
        };

        NeighborsIter {
            matrix: &self.matrix,
            from: *from,
            other: 0,
            vertex_count: self.vertex_count(),
            filter,
            dir: Direction::Outgoing,
        }
    }

    fn neighbors_directed(
        &self,
        from: &Self::VertexId,
        dir: Direction,
    ) -> Self::NeighborsIter<'_> {
        self.vertex(from).expect("vertex does not exist");

        NeighborsIter {
            matrix: &self.matrix,
            from: *from,
            other: 0,
            vertex_count: self.vertex_count(),
            filter: Some(dir),
            dir,
        }
    }

    fn degree_directed(&self, id: &Self::VertexId, dir: Direction) -> usize {
        self.vertex(id).expect("vertex does not exist");

        self.matrix
            .degree_directed(id.as_usize(), dir, self.vertices.len())
    }
}

pub struct VerticesIter<'a, V> {
    inner: std::iter::Enumerate<std::slice::Iter<'a, V>>,
}

impl<'a, V> Iterator for VerticesIter<'a, V> {
    type Item = VertexRef<'a, VertexId, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(index, attr)| VertexRef {
            id: VertexId::from_usize(index),
            attr,
        })
    }
}

pub struct EdgesByIdIter<'a, E, Ty> {
    matrix: &'a Matrix<E, Ty>,
    index: usize,
    edge_bound: usize,
}

impl<E, Ty: EdgeType> Iterator for EdgesByIdIter<'_, E, Ty> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.index == self.edge_bound {
                return None;
            }

            let index = EdgeId::from_usize(self.index);
            self.index += 1;

            if self.matrix.get(index).is_some() {
                return Some(index);
            }
        }
    }
}

pub struct EdgesIter<'a, E, Ty> {
    matrix: &'a Matrix<E, Ty>,
    index: usize,
    edge_bound: usize,
}

impl<'a, E, Ty: EdgeType> Iterator for EdgesIter<'a, E, Ty> {
    type Item = EdgeRef<'a, VertexId, EdgeId, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.index == self.edge_bound {
                return None;
            }

            let index = EdgeId::from_usize(self.index);
            self.index += 1;

            if let Some(attr) = self.matrix.get(index) {
                let (row, col) = self.matrix.coords(index);
                return Some(EdgeRef {
                    id: index,
                    attr,
                    from: VertexId::from_usize(row),
                    to: VertexId::from_usize(col),
                });
            }
        }
    }
}

pub struct NeighborsIter<'a, E, Ty> {
    matrix: &'a Matrix<E, Ty>,
    from: VertexId,
    other: usize,
    vertex_count: usize,
    filter: Option<Direction>,
    dir: Direction,
}

impl<E, Ty: EdgeType> Iterator for NeighborsIter<'_, E, Ty> {
    type Item = NeighborRef<VertexId, EdgeId>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.other == self.vertex_count {
                match (self.filter, self.dir) {
                    // Exhausted the direction.
                    (Some(_), _) => return None,
                    // Exhausted both directions.
                    (None, Direction::Incoming) => return None,
                    // Switching to incoming.
                    (None, Direction::Outgoing) => {
                        self.other = 0;
                        self.dir = Direction::Incoming;
                    }
                }
            } else {
                let other = self.other;
                self.other += 1;

                let index = match self.dir {
                    Direction::Outgoing => self.matrix.index(self.from.as_usize(), other),
                    Direction::Incoming => self.matrix.index(other, self.from.as_usize()),
                };

                if self.matrix.get(index).is_some() {
                    return Some(NeighborRef {
                        id: VertexId::from_usize(other),
                        edge: index,
                        pred: self.from,
                        dir: self.dir,
                    });
                }
            }
        }
    }
}

#[derive(Debug)]
struct Matrix<E, Ty> {
    data: Vec<Option<E>>,
    capacity: usize,
    ty: PhantomData<Ty>,
}

impl<E, Ty: EdgeType> Matrix<E, Ty> {
    fn with_capacity(capacity: usize) -> Self {
        if capacity == 0 {
            return Self {
                data: Vec::new(),
                capacity,
                ty: PhantomData,
            };
        }

        let capacity = capacity.next_power_of_two();
        let len = linear_len::<Ty>(capacity);
        let mut data = Vec::with_capacity(len);
        data.resize_with(len, || None);

        Self {
            data,
            capacity,
            ty: PhantomData,
        }
    }

    fn ensure_capacity(&mut self, capacity: usize) {
        if self.capacity < capacity {
            let capacity = (self.capacity * 2).max(capacity.next_power_of_two());
            self.grow(capacity);
            self.capacity = capacity;
        }
    }

    fn grow(&mut self, vertex_capacity: usize) {
        let len = linear_len::<Ty>(vertex_capacity);

        if Ty::is_directed() {
            let mut next = Vec::with_capacity(len);
            let prev_capacity = self.capacity;

            // Copy the original rows, extending each to the new width.
            for (i, value) in std::mem::take(&mut self.data).into_iter().enumerate() {
                next.push(value);

                // Are we on the right edge of the original square?
                if (i + 1) % prev_capacity == 0 {
                    let additional = next.len() + vertex_capacity - prev_capacity;
                    next.resize_with(additional, || None);
                }
            }

            // Add the bottom rectangle.
            next.resize_with(len, || None);
            self.data = next;
        } else {
            // The triangular layout does not depend on the capacity, just
            // continue the lower triangle.
            self.data.resize_with(len, || None);
        }
    }

    fn get(&self, index: EdgeId) -> Option<&E> {
        self.data.get(index.as_usize())?.as_ref()
    }

    fn get_mut(&mut self, index: EdgeId) -> Option<&mut E> {
        self.data.get_mut(index.as_usize())?.as_mut()
    }

    fn insert(&mut self, index: EdgeId, edge: E) {
        self.data[index.as_usize()] = Some(edge);
    }

    fn remove(&mut self, index: EdgeId) -> Option<E> {
        self.data.get_mut(index.as_usize())?.take()
    }

    fn clear(&mut self) {
        for entry in self.data.iter_mut() {
            *entry = None;
        }
    }

    fn index(&self, row: usize, col: usize) -> EdgeId {
        EdgeId::from_usize(linear_index::<Ty>(row, col, self.capacity))
    }

    fn coords(&self, index: EdgeId) -> (usize, usize) {
        linear_coords::<Ty>(index.as_usize(), self.capacity)
    }

    fn degree_directed(&self, v: usize, dir: Direction, n_vertices: usize) -> usize {
        let mut degree = 0;

        if Ty::is_directed() {
            let (mut i, stride) = match dir {
                Direction::Outgoing => (linear_index::<Ty>(v, 0, self.capacity), 1),
                Direction::Incoming => (linear_index::<Ty>(0, v, self.capacity), self.capacity),
            };

            for _ in 0..n_vertices {
                if self.data[i].is_some() {
                    degree += 1;
                }

                i += stride;
            }
        } else {
            for col in 0..n_vertices {
                let i = linear_index::<Ty>(v, col, self.capacity);

                if self.data[i].is_some() {
                    degree += 1;

                    // Self-loop counts twice.
                    degree += (v == col) as usize;
                }
            }
        }

        degree
    }
}

fn linear_len<Ty: EdgeType>(vertex_capacity: usize) -> usize {
    if Ty::is_directed() {
        vertex_capacity * vertex_capacity
    } else {
        vertex_capacity * (vertex_capacity + 1) / 2
    }
}

fn linear_index<Ty: EdgeType>(row: usize, col: usize, vertex_capacity: usize) -> usize {
    if Ty::is_directed() {
        row * vertex_capacity + col
    } else {
        // Make sure that the coordinates are in the lower triangle.
        let (row, col) = if row >= col { (row, col) } else { (col, row) };
        // The rows are 1 + 2 + 3 + ... + n = n (n + 1) / 2.
        row * (row + 1) / 2 + col
    }
}

fn linear_coords<Ty: EdgeType>(index: usize, vertex_capacity: usize) -> (usize, usize) {
    if Ty::is_directed() {
        let col = index % vertex_capacity;
        let row = index / vertex_capacity;
        (row, col)
    } else {
        // index = row * (row + 1) / 2 + col => 2 * (index - col) = row^2 + row
        //
        // Quadratic equation for row. We don't know col so we use just
        // index => discriminant is generally not an integer, we need to
        // round down. The difference between index and start of the row is
        // the column.
        let d = (1. + 8. * index as f64).sqrt().floor() as usize;
        let row = (d - 1) / 2;
        let col = index - row * (row + 1) / 2;
        (row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{
            error::AddEdgeErrorKind,
            marker::{Directed, Undirected},
        },
        storage::tests::*,
    };

    #[test]
    fn basic_undirected() {
        test_basic::<AdjMatrix<_, _, Undirected>>();
    }

    #[test]
    fn basic_directed() {
        test_basic::<AdjMatrix<_, _, Directed>>();
    }

    #[test]
    fn neighbors_edge_cases_undirected() {
        test_neighbors_edge_cases::<AdjMatrix<_, _, Undirected>>();
    }

    #[test]
    fn neighbors_edge_cases_directed() {
        test_neighbors_edge_cases::<AdjMatrix<_, _, Directed>>();
    }

    #[test]
    fn multi_edge_is_rejected() {
        let mut graph = AdjMatrix::<_, _, Directed>::new();

        let v0 = graph.add_vertex(());
        let v1 = graph.add_vertex(());

        graph.add_edge(&v0, &v1, 1);
        let error = graph.try_add_edge(&v0, &v1, 2).unwrap_err();

        assert_eq!(error.kind, AddEdgeErrorKind::MultiEdge);
        assert_eq!(error.attr, 2);
        assert_eq!(graph.edge_count(), 1);

        // The opposite orientation is a different edge in directed graphs.
        graph.add_edge(&v1, &v0, 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn growth_preserves_edges() {
        let mut graph = AdjMatrix::<_, _, Directed>::new();

        let vertices = (0..10).map(|i| graph.add_vertex(i)).collect::<Vec<_>>();

        for window in vertices.windows(2) {
            graph.add_edge(&window[0], &window[1], ());
        }

        // Past the initial capacity of 8, the matrix has been rebuilt.
        assert_eq!(graph.edge_count(), 9);

        for window in vertices.windows(2) {
            assert!(graph.contains_edge_between(&window[0], &window[1]));
            assert!(!graph.contains_edge_between(&window[1], &window[0]));
        }
    }

    #[test]
    fn undirected_orientation_is_canonical() {
        let mut graph = AdjMatrix::<_, _, Undirected>::new();

        let v0 = graph.add_vertex(());
        let v1 = graph.add_vertex(());

        let e = graph.add_edge(&v0, &v1, ());

        assert_eq!(graph.edge_id_any(&v1, &v0), Some(e));
        assert_eq!(
            graph.try_add_edge(&v1, &v0, ()).unwrap_err().kind,
            AddEdgeErrorKind::MultiEdge
        );
    }

    #[test]
    fn vertex_removal_relocates_last_row() {
        let mut graph = AdjMatrix::<_, _, Directed>::new();

        let v0 = graph.add_vertex("a");
        let v1 = graph.add_vertex("b");
        let v2 = graph.add_vertex("c");

        graph.add_edge(&v2, &v1, 1);
        graph.add_edge(&v2, &v2, 2);

        graph.remove_vertex(&v0);

        assert_eq!(graph.vertex(&v0), Some(&"c"));
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains_edge_between(&v0, &v1));
        assert!(graph.contains_edge_between(&v0, &v0));
    }
}
