//! Change notifications for mutable graphs.
//!
//! [`Observed`] wraps any graph storage and reports every successful mutation
//! to an observer. The wrapper implements the same capability traits as the
//! underlying storage, so it can be used anywhere the storage itself can.
//!
//! An observer is anything implementing [`GraphObserver`]. Unit ignores all
//! events, `Vec` records them and [`std::sync::mpsc::Sender`] forwards them to
//! a channel, which allows watching mutations from another thread.
//!
//! # Examples
//!
//! ```
//! use eulr::core::{marker::Directed, GraphAdd, GraphFull};
//! use eulr::observe::{GraphEvent, Observed};
//! use eulr::storage::AdjList;
//!
//! let mut graph = Observed::new(AdjList::<_, _, Directed>::new(), Vec::new());
//!
//! let u = graph.add_vertex("u");
//! let v = graph.add_vertex("v");
//! let e = graph.add_edge(&u, &v, ());
//! graph.remove_vertex(&v);
//!
//! let (_, events) = graph.into_inner();
//! assert_eq!(
//!     events,
//!     vec![
//!         GraphEvent::VertexAdded(u),
//!         GraphEvent::VertexAdded(v),
//!         GraphEvent::EdgeAdded { id: e, from: u, to: v },
//!         GraphEvent::EdgeRemoved { id: e, from: u, to: v },
//!         GraphEvent::VertexRemoved(v),
//!     ]
//! );
//! ```

use std::sync::mpsc::Sender;

use crate::core::{
    error::{AddEdgeError, AddVertexError},
    marker::Direction,
    EdgeSet, GraphAdd, GraphBase, GraphFull, GraphMut, GraphRef, MultiEdge, Neighbors, VertexSet,
};

/// A single successful mutation of a graph.
///
/// The ids in an event are valid at the time the event is emitted. Storages
/// without stable ids may relocate ids by subsequent removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent<VI, EI> {
    VertexAdded(VI),
    VertexRemoved(VI),
    EdgeAdded { id: EI, from: VI, to: VI },
    EdgeRemoved { id: EI, from: VI, to: VI },
}

pub trait GraphObserver<VI, EI> {
    fn on_event(&mut self, event: GraphEvent<VI, EI>);
}

impl<VI, EI> GraphObserver<VI, EI> for () {
    fn on_event(&mut self, _event: GraphEvent<VI, EI>) {}
}

impl<VI, EI> GraphObserver<VI, EI> for Vec<GraphEvent<VI, EI>> {
    fn on_event(&mut self, event: GraphEvent<VI, EI>) {
        self.push(event);
    }
}

impl<VI, EI> GraphObserver<VI, EI> for Sender<GraphEvent<VI, EI>> {
    fn on_event(&mut self, event: GraphEvent<VI, EI>) {
        // The receiving side being gone is not a concern of the graph.
        let _ = self.send(event);
    }
}

#[derive(Debug)]
pub struct Observed<G, O> {
    graph: G,
    observer: O,
}

impl<G, O> Observed<G, O> {
    pub fn new(graph: G, observer: O) -> Self {
        Self { graph, observer }
    }

    pub fn inner(&self) -> &G {
        &self.graph
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_inner(self) -> (G, O) {
        (self.graph, self.observer)
    }
}

impl<G: GraphBase, O> GraphBase for Observed<G, O> {
    type VertexId = G::VertexId;
    type EdgeId = G::EdgeId;
    type EdgeType = G::EdgeType;
}

impl<G: Neighbors, O> Neighbors for Observed<G, O> {
    type NeighborsIter<'a>
        = G::NeighborsIter<'a>
    where
        Self: 'a;

    fn neighbors_undirected(&self, from: &Self::VertexId) -> Self::NeighborsIter<'_> {
        self.graph.neighbors_undirected(from)
    }

    fn neighbors_directed(
        &self,
        from: &Self::VertexId,
        dir: Direction,
    ) -> Self::NeighborsIter<'_> {
        self.graph.neighbors_directed(from, dir)
    }

    fn degree_undirected(&self, id: &Self::VertexId) -> usize {
        self.graph.degree_undirected(id)
    }

    fn degree_directed(&self, id: &Self::VertexId, dir: Direction) -> usize {
        self.graph.degree_directed(id, dir)
    }
}

impl<G: VertexSet, O> VertexSet for Observed<G, O> {
    type VerticesByIdIter<'a>
        = G::VerticesByIdIter<'a>
    where
        Self: 'a;

    fn vertices_by_id(&self) -> Self::VerticesByIdIter<'_> {
        self.graph.vertices_by_id()
    }

    fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    fn contains_vertex(&self, id: &Self::VertexId) -> bool {
        self.graph.contains_vertex(id)
    }
}

impl<G: EdgeSet, O> EdgeSet for Observed<G, O> {
    type EdgesByIdIter<'a>
        = G::EdgesByIdIter<'a>
    where
        Self: 'a;

    type EdgeIdIter<'a>
        = G::EdgeIdIter<'a>
    where
        Self: 'a;

    fn edges_by_id(&self) -> Self::EdgesByIdIter<'_> {
        self.graph.edges_by_id()
    }

    fn edge_id(&self, from: &Self::VertexId, to: &Self::VertexId) -> Self::EdgeIdIter<'_> {
        self.graph.edge_id(from, to)
    }

    fn endpoints(&self, id: &Self::EdgeId) -> Option<(Self::VertexId, Self::VertexId)> {
        self.graph.endpoints(id)
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn contains_edge(&self, id: &Self::EdgeId) -> bool {
        self.graph.contains_edge(id)
    }
}

impl<G: GraphRef<V, E>, O, V, E> GraphRef<V, E> for Observed<G, O> {
    type VerticesIter<'a>
        = G::VerticesIter<'a>
    where
        Self: 'a,
        V: 'a;

    type EdgesIter<'a>
        = G::EdgesIter<'a>
    where
        Self: 'a,
        E: 'a;

    fn vertices(&self) -> Self::VerticesIter<'_> {
        self.graph.vertices()
    }

    fn edges(&self) -> Self::EdgesIter<'_> {
        self.graph.edges()
    }

    fn vertex(&self, id: &Self::VertexId) -> Option<&V> {
        self.graph.vertex(id)
    }

    fn edge(&self, id: &Self::EdgeId) -> Option<&E> {
        self.graph.edge(id)
    }
}

impl<G: GraphMut<V, E>, O, V, E> GraphMut<V, E> for Observed<G, O> {
    fn vertex_mut(&mut self, id: &Self::VertexId) -> Option<&mut V> {
        self.graph.vertex_mut(id)
    }

    fn edge_mut(&mut self, id: &Self::EdgeId) -> Option<&mut E> {
        self.graph.edge_mut(id)
    }
}

impl<G, O, V, E> GraphAdd<V, E> for Observed<G, O>
where
    G: GraphAdd<V, E>,
    O: GraphObserver<G::VertexId, G::EdgeId>,
{
    fn try_add_vertex(&mut self, vertex: V) -> Result<Self::VertexId, AddVertexError<V>> {
        let id = self.graph.try_add_vertex(vertex)?;
        self.observer.on_event(GraphEvent::VertexAdded(id.clone()));
        Ok(id)
    }

    fn try_add_edge(
        &mut self,
        from: &Self::VertexId,
        to: &Self::VertexId,
        edge: E,
    ) -> Result<Self::EdgeId, AddEdgeError<E>> {
        let id = self.graph.try_add_edge(from, to, edge)?;
        self.observer.on_event(GraphEvent::EdgeAdded {
            id: id.clone(),
            from: from.clone(),
            to: to.clone(),
        });
        Ok(id)
    }
}

impl<G, O, V, E> GraphFull<V, E> for Observed<G, O>
where
    G: GraphFull<V, E> + Neighbors,
    O: GraphObserver<G::VertexId, G::EdgeId>,
{
    fn remove_vertex(&mut self, id: &Self::VertexId) -> Option<V> {
        if !self.graph.contains_vertex(id) {
            return None;
        }

        // Remove incident edges one by one so that every removal is reported.
        // The incidences are queried fresh in each iteration, because removing
        // an edge may relocate the ids of the remaining ones.
        loop {
            let edge = self
                .graph
                .neighbors_undirected(id)
                .next()
                .map(|neighbor| neighbor.edge);

            match edge {
                Some(edge) => {
                    self.remove_edge(&edge);
                }
                None => break,
            }
        }

        let vertex = self.graph.remove_vertex(id)?;
        self.observer.on_event(GraphEvent::VertexRemoved(id.clone()));
        Some(vertex)
    }

    fn remove_edge(&mut self, id: &Self::EdgeId) -> Option<E> {
        let (from, to) = self.graph.endpoints(id)?;
        let edge = self.graph.remove_edge(id)?;
        self.observer.on_event(GraphEvent::EdgeRemoved {
            id: id.clone(),
            from,
            to,
        });
        Some(edge)
    }
}

impl<G: MultiEdge, O> MultiEdge for Observed<G, O> {}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::{
        core::{
            id::{EdgeId, IdType, VertexId},
            marker::{Directed, Undirected},
        },
        storage::AdjList,
    };

    #[test]
    fn mutations_are_reported_in_order() {
        let mut graph = Observed::new(AdjList::<_, _, Directed>::new(), Vec::new());

        let v0 = graph.add_vertex(());
        let v1 = graph.add_vertex(());
        let e = graph.add_edge(&v0, &v1, ());
        graph.remove_edge(&e);

        let (_, events) = graph.into_inner();

        assert_eq!(
            events,
            vec![
                GraphEvent::VertexAdded(v0),
                GraphEvent::VertexAdded(v1),
                GraphEvent::EdgeAdded {
                    id: e,
                    from: v0,
                    to: v1
                },
                GraphEvent::EdgeRemoved {
                    id: e,
                    from: v0,
                    to: v1
                },
            ]
        );
    }

    #[test]
    fn failed_mutations_are_not_reported() {
        let mut graph = Observed::new(AdjList::<(), (), Directed>::new(), Vec::new());

        let v0 = graph.add_vertex(());
        assert!(graph
            .try_add_edge(&v0, &VertexId::from_usize(7), ())
            .is_err());

        let (_, events) = graph.into_inner();
        assert_eq!(events, vec![GraphEvent::VertexAdded(v0)]);
    }

    #[test]
    fn vertex_removal_reports_cascade_first() {
        let mut graph = Observed::new(AdjList::<_, _, Undirected>::new(), Vec::new());

        let v0 = graph.add_vertex(());
        let v1 = graph.add_vertex(());
        let v2 = graph.add_vertex(());

        graph.add_edge(&v0, &v1, ());
        graph.add_edge(&v1, &v2, ());
        graph.add_edge(&v1, &v1, ());

        graph.remove_vertex(&v1);

        let (storage, events) = graph.into_inner();
        assert_eq!(storage.edge_count(), 0);

        let removals = &events[6..];
        assert_eq!(removals.len(), 4);

        // All edge removals come before the vertex removal.
        assert!(removals[..3]
            .iter()
            .all(|event| matches!(event, GraphEvent::EdgeRemoved { .. })));
        assert_eq!(removals[3], GraphEvent::VertexRemoved(v1));
    }

    #[test]
    fn removing_absent_vertex_is_silent() {
        let mut graph = Observed::new(AdjList::<(), (), Directed>::new(), Vec::new());

        assert_eq!(graph.remove_vertex(&VertexId::from_usize(3)), None);
        assert_eq!(graph.remove_edge(&EdgeId::from_usize(0)), None);

        let (_, events) = graph.into_inner();
        assert!(events.is_empty());
    }

    #[test]
    fn channel_observer_forwards_events() {
        let (tx, rx) = mpsc::channel();
        let mut graph = Observed::new(AdjList::<_, (), Directed>::new(), tx);

        let v0 = graph.add_vertex(());
        drop(graph);

        assert_eq!(rx.recv().unwrap(), GraphEvent::VertexAdded(v0));
        assert!(rx.recv().is_err());
    }
}
