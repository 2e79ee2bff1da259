//! Eulerian trail decomposition.
//!
//! Decomposes the edges of a directed graph into the minimum number of
//! edge-disjoint trails such that every edge appears in exactly one trail,
//! optionally constrained to start each trail from a caller-chosen root.
//!
//! A graph admits a single closed trail only when every vertex has as many
//! outgoing as incoming edges. [`EulerianTrail::add_temporary_edges`] balances
//! the graph by inserting one synthetic edge per pair of odd-imbalance
//! vertices. [`EulerianTrail::compute`] then builds one closed walk over all
//! edges, temporary ones included, and [`EulerianTrail::trails`] cuts the walk
//! at the temporary edges, so that only original edges are reported. The
//! caller restores the graph with [`EulerianTrail::remove_temporary_edges`].
//!
//! # Examples
//!
//! ```
//! use eulr::algo::EulerianTrail;
//! use eulr::core::{marker::Directed, GraphAdd};
//! use eulr::storage::AdjList;
//!
//! let mut graph = AdjList::<_, _, Directed>::new();
//!
//! let a = graph.add_vertex("a");
//! let b = graph.add_vertex("b");
//! let c = graph.add_vertex("c");
//!
//! graph.add_edge(&a, &b, ());
//! graph.add_edge(&b, &c, ());
//! graph.add_edge(&c, &a, ());
//!
//! let mut eulerian = EulerianTrail::new(&mut graph);
//! eulerian.compute().unwrap();
//!
//! let trails = eulerian.trails();
//! assert_eq!(trails.len(), 1);
//! assert_eq!(trails[0].len(), 3);
//! ```

use std::fmt;

use fixedbitset::FixedBitSet;
use thiserror::Error;

use crate::{
    core::{
        error::AddEdgeError,
        id::{IdType, IntegerIdType},
        marker::{Directed, Direction},
        EdgeSet, GraphAdd, GraphBase, GraphFull, Neighbors, VertexSet,
    },
    run::{AbortHandle, Interruptible, Lifecycle, Phases, RunObserver, State},
};

use circuit::{closed_walk, WalkOutcome};

mod circuit;

#[derive(Error)]
pub enum Error<G: GraphBase> {
    /// The root vertex is not present in the graph.
    #[error("vertex does not exist")]
    VertexAbsent(G::VertexId),
    /// The root vertex has no outgoing edge, so no circuit can start there.
    #[error("root cannot head an Eulerian circuit")]
    RootNotOnCircuit(G::VertexId),
    /// The edges of the graph cannot be covered by a closed walk.
    #[error("graph does not admit an Eulerian cover")]
    NotEulerian,
}

// Manual impls instead of derived so that G is not required to implement the
// respective traits.
impl<G: GraphBase> fmt::Debug for Error<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::VertexAbsent(v) => f.debug_tuple("VertexAbsent").field(v).finish(),
            Error::RootNotOnCircuit(v) => f.debug_tuple("RootNotOnCircuit").field(v).finish(),
            Error::NotEulerian => f.write_str("NotEulerian"),
        }
    }
}

impl<G: GraphBase> Clone for Error<G> {
    fn clone(&self) -> Self {
        match self {
            Error::VertexAbsent(v) => Error::VertexAbsent(v.clone()),
            Error::RootNotOnCircuit(v) => Error::RootNotOnCircuit(v.clone()),
            Error::NotEulerian => Error::NotEulerian,
        }
    }
}

impl<G: GraphBase> PartialEq for Error<G> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::VertexAbsent(lhs), Error::VertexAbsent(rhs)) => lhs == rhs,
            (Error::RootNotOnCircuit(lhs), Error::RootNotOnCircuit(rhs)) => lhs == rhs,
            (Error::NotEulerian, Error::NotEulerian) => true,
            _ => false,
        }
    }
}

impl<G: GraphBase> Eq for Error<G> {}

/// Returns the number of edge-disjoint trails needed to cover every edge of
/// the graph exactly once, or 0 when no cover exists.
///
/// A graph with fewer edges than vertices cannot be balanced into a cover. An
/// empty graph needs 1 trivial trail. Otherwise the count is 1 for a graph
/// whose vertices all have even (out − in) imbalance, and half the number of
/// odd-imbalance vertices when there are any.
pub fn eulerian_path_count<G>(graph: &G) -> usize
where
    G: Neighbors + VertexSet + EdgeSet,
{
    if graph.edge_count() < graph.vertex_count() {
        return 0;
    }

    let odd = odd_imbalances(graph).len();

    if odd % 2 == 1 {
        // Inconsistent degree parity, no pairing can fix it.
        0
    } else if odd == 0 {
        1
    } else {
        odd / 2
    }
}

/// Vertices with odd (out − in) imbalance, in discovery order, together with
/// the imbalance itself.
fn odd_imbalances<G>(graph: &G) -> Vec<(G::VertexId, isize)>
where
    G: Neighbors + VertexSet,
{
    graph
        .vertices_by_id()
        .filter_map(|v| {
            let out = graph.degree_directed(&v, Direction::Outgoing) as isize;
            let incoming = graph.degree_directed(&v, Direction::Incoming) as isize;
            let imbalance = out - incoming;

            (imbalance % 2 != 0).then_some((v, imbalance))
        })
        .collect()
}

/// Pairs odd-imbalance vertices for augmentation, orienting each pair from
/// the vertex lacking outgoing edges to the vertex lacking incoming edges.
///
/// The handshake lemma guarantees an even number of odd vertices for any
/// consistent graph. An odd-sized input is nevertheless guarded: the leftover
/// vertex is paired back to the first one instead of failing.
fn pair_odd_vertices<VI: Clone>(odd: &[(VI, isize)]) -> Vec<(VI, VI)> {
    let mut sources = Vec::new();
    let mut targets = Vec::new();

    for (v, imbalance) in odd {
        if *imbalance < 0 {
            sources.push(v.clone());
        } else {
            targets.push(v.clone());
        }
    }

    let n = sources.len().min(targets.len());
    let mut leftovers = sources.split_off(n);
    leftovers.append(&mut targets.split_off(n));

    let mut pairs = sources.into_iter().zip(targets).collect::<Vec<_>>();

    // Same-sign leftovers cannot be balanced by one edge per pair, but pairing
    // them still flips every odd vertex to even parity.
    let mut chunks = leftovers.chunks_exact(2);
    for chunk in &mut chunks {
        pairs.push((chunk[0].clone(), chunk[1].clone()));
    }

    if let [last] = chunks.remainder() {
        if let Some((first, _)) = odd.first() {
            pairs.push((last.clone(), first.clone()));
        }
    }

    pairs
}

/// The Eulerian trail algorithm over a borrowed subject graph.
///
/// The instance is single-use: one call to [`compute`](Self::compute) (or
/// [`compute_from`](Self::compute_from)), then result extraction through
/// [`circuit`](Self::circuit), [`trails`](Self::trails) or
/// [`trails_from`](Self::trails_from), and finally
/// [`remove_temporary_edges`](Self::remove_temporary_edges) if the graph was
/// augmented.
pub struct EulerianTrail<'g, G, O = ()>
where
    G: GraphBase,
{
    graph: &'g mut G,
    lifecycle: Lifecycle<G::VertexId, O>,
    root: Option<G::VertexId>,
    temporary: Vec<G::EdgeId>,
    circuit: Vec<G::EdgeId>,
}

impl<'g, G> EulerianTrail<'g, G>
where
    G: GraphBase,
{
    pub fn new(graph: &'g mut G) -> Self {
        Self::with_observer(graph, ())
    }
}

impl<'g, G, O> EulerianTrail<'g, G, O>
where
    G: GraphBase,
    O: RunObserver<G::VertexId>,
{
    pub fn with_observer(graph: &'g mut G, observer: O) -> Self {
        Self {
            graph,
            lifecycle: Lifecycle::with_observer(observer),
            root: None,
            temporary: Vec::new(),
            circuit: Vec::new(),
        }
    }

    pub fn graph(&self) -> &G {
        self.graph
    }

    pub fn observer(&self) -> &O {
        self.lifecycle.observer()
    }

    pub fn root(&self) -> Option<&G::VertexId> {
        self.root.as_ref()
    }

    /// Sets the root vertex for the computation. A change of the root is
    /// reported to the run observer; setting the same root again is not.
    ///
    /// The root is validated against the graph by
    /// [`compute`](Self::compute), not here.
    pub fn set_root(&mut self, root: G::VertexId) {
        if self.root.as_ref() != Some(&root) {
            self.root = Some(root.clone());
            self.lifecycle.root_changed(Some(root));
        }
    }

    pub fn clear_root(&mut self) {
        if self.root.take().is_some() {
            self.lifecycle.root_changed(None);
        }
    }

    /// The closed walk covering every edge of the graph, temporary edges
    /// included. Empty before a successful computation.
    pub fn circuit(&self) -> &[G::EdgeId] {
        &self.circuit
    }

    /// The edges inserted by
    /// [`add_temporary_edges`](Self::add_temporary_edges) and not yet removed.
    pub fn temporary_edges(&self) -> &[G::EdgeId] {
        &self.temporary
    }
}

impl<'g, G, O> EulerianTrail<'g, G, O>
where
    G: Neighbors + VertexSet + EdgeSet + GraphBase<EdgeType = Directed>,
    G::VertexId: IntegerIdType,
    G::EdgeId: IntegerIdType,
    O: RunObserver<G::VertexId>,
{
    /// Balances the degree parity of the graph by inserting one synthetic
    /// edge per pair of odd-imbalance vertices, paired in discovery order.
    ///
    /// The edges are inserted through the graph's own insertion operation, so
    /// the mutation is observable like any other. The attribute of each edge
    /// comes from `factory`, called with the endpoints. Returns the ids of
    /// the newly inserted edges; they are also kept on the instance for
    /// [`remove_temporary_edges`](Self::remove_temporary_edges).
    ///
    /// A graph that cannot be covered at all (`eulerian_path_count == 0`) is
    /// left untouched and an empty slice is returned.
    pub fn add_temporary_edges<V, E, F>(
        &mut self,
        mut factory: F,
    ) -> Result<&[G::EdgeId], AddEdgeError<E>>
    where
        G: GraphAdd<V, E>,
        F: FnMut(&G::VertexId, &G::VertexId) -> E,
    {
        let start = self.temporary.len();

        if eulerian_path_count(&*self.graph) == 0 {
            return Ok(&self.temporary[start..]);
        }

        let odd = odd_imbalances(&*self.graph);

        for (from, to) in pair_odd_vertices(&odd) {
            let attr = factory(&from, &to);
            let id = self.graph.try_add_edge(&from, &to, attr)?;
            self.temporary.push(id);
        }

        Ok(&self.temporary[start..])
    }

    /// Removes the temporary edges inserted by
    /// [`add_temporary_edges`](Self::add_temporary_edges), restoring the
    /// pre-augmentation edge count. Idempotent and safe to call when no edge
    /// was inserted.
    pub fn remove_temporary_edges<V, E>(&mut self)
    where
        G: GraphFull<V, E>,
    {
        let mut temporary = std::mem::take(&mut self.temporary);

        // Highest ids first, so that the id relocation done by storages on
        // removal never touches a temporary edge that is still to be removed.
        temporary.sort_unstable_by(|a, b| b.cmp(a));

        for edge in temporary {
            self.graph.remove_edge(&edge);
        }
    }

    /// Runs the computation, building a closed walk that covers every edge of
    /// the graph exactly once.
    ///
    /// With a root set, the walk starts (and ends) at the root; without one,
    /// an arbitrary vertex with an outgoing edge is chosen. On success the
    /// run finishes and [`circuit`](Self::circuit) holds the walk. An aborted
    /// run ends in [`State::Aborted`] without an error and with an empty
    /// circuit.
    ///
    /// # Panics
    ///
    /// Panics when called on an instance whose run already started. The
    /// instance is single-use.
    pub fn compute(&mut self) -> Result<(), Error<G>> {
        let mut pass = ComputePass {
            graph: &*self.graph,
            root: self.root.as_ref(),
            circuit: &mut self.circuit,
        };

        self.lifecycle.drive(&mut pass)
    }

    /// Sets the root and runs the computation.
    pub fn compute_from(&mut self, root: G::VertexId) -> Result<(), Error<G>> {
        self.set_root(root);
        self.compute()
    }

    /// Splits the circuit into the minimum number of edge-disjoint trails
    /// over the original edges by cutting at every temporary edge. No
    /// temporary edge appears in any trail. Returns an empty collection for
    /// an empty circuit.
    pub fn trails(&self) -> Vec<Vec<G::EdgeId>> {
        if self.circuit.is_empty() {
            return Vec::new();
        }

        let temporary = self.temporary_set();

        // Start just past the first temporary edge, so that the two segments
        // adjacent to the circuit boundary merge into one trail.
        let offset = self
            .circuit
            .iter()
            .position(|edge| temporary.contains(edge.as_usize()))
            .map(|i| i + 1)
            .unwrap_or(0);

        let n = self.circuit.len();
        let mut trails = Vec::new();
        let mut current = Vec::new();

        for k in 0..n {
            let edge = self.circuit[(offset + k) % n];

            if temporary.contains(edge.as_usize()) {
                if !current.is_empty() {
                    trails.push(std::mem::take(&mut current));
                }
            } else {
                current.push(edge);
            }
        }

        if !current.is_empty() {
            trails.push(current);
        }

        trails
    }

    /// Splits the circuit into edge-disjoint trails that all start at `root`.
    ///
    /// The circuit is rotated to the first original edge leaving the root and
    /// cut at a temporary edge exactly when the edge after it leaves the root
    /// again. Temporary edges elsewhere are dropped in place: the trail
    /// continues across the gap and reconstructs into a contiguous path when
    /// concatenated with the intervening temporary edges.
    pub fn trails_from(&self, root: &G::VertexId) -> Result<Vec<Vec<G::EdgeId>>, Error<G>> {
        if !self.graph.contains_vertex(root) {
            return Err(Error::VertexAbsent(root.clone()));
        }

        if self.circuit.is_empty() {
            return Ok(Vec::new());
        }

        let temporary = self.temporary_set();
        let n = self.circuit.len();

        let source = |edge: &G::EdgeId| {
            self.graph
                .endpoints(edge)
                .expect("edge does not exist")
                .0
        };

        let offset = (0..n)
            .find(|&i| {
                let edge = &self.circuit[i];
                !temporary.contains(edge.as_usize()) && &source(edge) == root
            })
            .ok_or_else(|| Error::RootNotOnCircuit(root.clone()))?;

        let mut trails = Vec::new();
        let mut current = Vec::new();

        for k in 0..n {
            let edge = self.circuit[(offset + k) % n];

            if temporary.contains(edge.as_usize()) {
                // Cut only when the next original edge leaves the root again,
                // otherwise the trail continues across the gap.
                let next = (k + 1..n)
                    .map(|j| self.circuit[(offset + j) % n])
                    .find(|edge| !temporary.contains(edge.as_usize()));

                if let Some(next) = next {
                    if &source(&next) == root && !current.is_empty() {
                        trails.push(std::mem::take(&mut current));
                    }
                }
            } else {
                current.push(edge);
            }
        }

        if !current.is_empty() {
            trails.push(current);
        }

        Ok(trails)
    }

    fn temporary_set(&self) -> FixedBitSet {
        let mut set = FixedBitSet::with_capacity(self.graph.edge_bound());

        for edge in &self.temporary {
            set.insert(edge.as_usize());
        }

        set
    }
}

impl<G, O> Interruptible for EulerianTrail<'_, G, O>
where
    G: GraphBase,
    O: RunObserver<G::VertexId>,
{
    fn state(&self) -> State {
        self.lifecycle.state()
    }

    fn abort_handle(&self) -> AbortHandle {
        self.lifecycle.abort_handle()
    }
}

struct ComputePass<'a, G: GraphBase> {
    graph: &'a G,
    root: Option<&'a G::VertexId>,
    circuit: &'a mut Vec<G::EdgeId>,
}

impl<G> Phases for ComputePass<'_, G>
where
    G: Neighbors + VertexSet + EdgeSet,
    G::VertexId: IntegerIdType,
    G::EdgeId: IntegerIdType,
{
    type Error = Error<G>;

    fn initialize(&mut self) -> Result<(), Self::Error> {
        if let Some(root) = self.root {
            if !self.graph.contains_vertex(root) {
                return Err(Error::VertexAbsent(root.clone()));
            }
        }

        if self.graph.edge_count() > 0 && eulerian_path_count(self.graph) == 0 {
            return Err(Error::NotEulerian);
        }

        Ok(())
    }

    fn execute(&mut self, abort: &AbortHandle) -> Result<(), Self::Error> {
        self.circuit.clear();

        if self.graph.edge_count() == 0 {
            return Ok(());
        }

        let start = match self.root {
            Some(root) => {
                if self.graph.degree_directed(root, Direction::Outgoing) == 0 {
                    return Err(Error::RootNotOnCircuit(root.clone()));
                }

                root.clone()
            }
            None => {
                match self
                    .graph
                    .vertices_by_id()
                    .find(|v| self.graph.degree_directed(v, Direction::Outgoing) > 0)
                {
                    Some(v) => v,
                    // Positive edge count with no outgoing edge anywhere
                    // cannot happen, but there is nothing to do either way.
                    None => return Ok(()),
                }
            }
        };

        match closed_walk(self.graph, &start, abort) {
            WalkOutcome::Complete(walk) => {
                *self.circuit = walk;
                Ok(())
            }
            WalkOutcome::Incomplete => Err(Error::NotEulerian),
            WalkOutcome::Interrupted => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use rustc_hash::FxHashSet;

    use super::*;
    use crate::{
        core::id::{EdgeId, VertexId},
        observe::{GraphEvent, Observed},
        run::RunEvent,
        storage::AdjList,
    };

    fn graph_from_edges(edges: &[(usize, usize)]) -> AdjList<usize, (), Directed> {
        let mut graph = AdjList::new();

        let n = edges
            .iter()
            .map(|&(u, v)| u.max(v) + 1)
            .max()
            .unwrap_or(0);

        for i in 0..n {
            graph.add_vertex(i);
        }

        for &(u, v) in edges {
            graph.add_edge(&VertexId::from_usize(u), &VertexId::from_usize(v), ());
        }

        graph
    }

    fn assert_contiguous<G>(graph: &G, trail: &[G::EdgeId])
    where
        G: EdgeSet,
    {
        for pair in trail.windows(2) {
            let (_, to) = graph.endpoints(&pair[0]).unwrap();
            let (from, _) = graph.endpoints(&pair[1]).unwrap();
            assert_eq!(to, from);
        }
    }

    fn odd_vertex_count<G>(graph: &G) -> usize
    where
        G: Neighbors + VertexSet,
    {
        odd_imbalances(graph).len()
    }

    #[test]
    fn path_count_of_single_circuit() {
        // b -> c, f -> a, a -> b, c -> d, e -> c, d -> e, c -> f with the
        // letters a..f mapped onto 0..6.
        let graph = graph_from_edges(&[(1, 2), (5, 0), (0, 1), (2, 3), (4, 2), (3, 4), (2, 5)]);
        assert_eq!(eulerian_path_count(&graph), 1);
    }

    #[test]
    fn path_count_of_sparse_graph_is_zero() {
        // Two vertices, one edge: more vertices than edges cannot balance.
        let graph = graph_from_edges(&[(0, 1)]);
        assert_eq!(eulerian_path_count(&graph), 0);
    }

    #[test]
    fn path_count_of_empty_graph() {
        let graph = graph_from_edges(&[]);
        assert_eq!(eulerian_path_count(&graph), 1);
    }

    #[test]
    fn path_count_with_odd_vertices() {
        // A 4-cycle with two chords: four vertices of odd imbalance.
        let graph = graph_from_edges(&[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)]);
        assert_eq!(eulerian_path_count(&graph), 2);
    }

    #[test]
    fn single_circuit_is_one_trail() {
        let mut graph =
            graph_from_edges(&[(1, 2), (5, 0), (0, 1), (2, 3), (4, 2), (3, 4), (2, 5)]);
        let edge_count = graph.edge_count();

        let mut eulerian = EulerianTrail::new(&mut graph);
        eulerian.compute().unwrap();

        assert_eq!(eulerian.state(), State::Finished);
        assert_eq!(eulerian.circuit().len(), edge_count);

        let trails = eulerian.trails();
        assert_eq!(trails.len(), 1);
        assert_eq!(trails[0].len(), edge_count);
        assert_contiguous(eulerian.graph(), &trails[0]);

        // The circuit is closed.
        let (from, _) = eulerian.graph().endpoints(&trails[0][0]).unwrap();
        let (_, to) = eulerian
            .graph()
            .endpoints(trails[0].last().unwrap())
            .unwrap();
        assert_eq!(from, to);
    }

    #[test]
    fn augmentation_of_uncoverable_graph_is_empty() {
        let mut graph = graph_from_edges(&[(0, 1)]);

        let mut eulerian = EulerianTrail::new(&mut graph);
        let added = eulerian.add_temporary_edges(|_, _| ()).unwrap();

        assert!(added.is_empty());
        assert_eq!(eulerian.graph().edge_count(), 1);
    }

    #[test]
    fn empty_graph_computes_without_error() {
        let mut graph = graph_from_edges(&[]);

        let mut eulerian = EulerianTrail::new(&mut graph);
        eulerian.compute().unwrap();

        assert_eq!(eulerian.state(), State::Finished);
        assert!(eulerian.circuit().is_empty());
        assert!(eulerian.trails().is_empty());
    }

    #[test]
    fn open_trail_through_augmentation() {
        // A triangle plus one parallel edge: imbalance +1 at 0 and -1 at 1,
        // so one temporary edge (1, 0) completes the circuit.
        let mut graph = graph_from_edges(&[(0, 1), (1, 2), (2, 0), (0, 1)]);

        let mut eulerian = EulerianTrail::new(&mut graph);
        let added = eulerian.add_temporary_edges(|_, _| ()).unwrap().to_vec();
        assert_eq!(added.len(), 1);

        eulerian.compute().unwrap();

        let trails = eulerian.trails();
        assert_eq!(trails.len(), 1);
        assert_eq!(trails[0].len(), 4);
        assert!(!trails[0].contains(&added[0]));
        assert_contiguous(eulerian.graph(), &trails[0]);
    }

    #[test]
    fn four_odd_vertices_make_two_trails() {
        let mut graph = graph_from_edges(&[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)]);
        let original = graph.edges_by_id().collect::<FxHashSet<_>>();

        let mut eulerian = EulerianTrail::new(&mut graph);
        let added = eulerian.add_temporary_edges(|_, _| ()).unwrap().to_vec();
        assert_eq!(added.len(), 2);

        eulerian.compute().unwrap();

        let trails = eulerian.trails();
        assert_eq!(trails.len(), 2);

        let mut seen = FxHashSet::default();
        for trail in &trails {
            assert_contiguous(eulerian.graph(), trail);
            for edge in trail {
                assert!(original.contains(edge));
                assert!(seen.insert(*edge));
            }
        }
        assert_eq!(seen.len(), original.len());
    }

    #[test]
    fn rooted_trails_start_at_root() {
        let mut graph = graph_from_edges(&[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)]);
        let root = VertexId::from_usize(0);

        let mut eulerian = EulerianTrail::new(&mut graph);
        eulerian.add_temporary_edges(|_, _| ()).unwrap();
        eulerian.compute_from(root).unwrap();

        let trails = eulerian.trails_from(&root).unwrap();
        assert!(!trails.is_empty());

        let mut seen = FxHashSet::default();
        for trail in &trails {
            let (from, _) = eulerian.graph().endpoints(&trail[0]).unwrap();
            assert_eq!(from, root);

            for edge in trail {
                assert!(seen.insert(*edge));
            }
        }

        // Every original edge is reported exactly once.
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn rooted_compute_rejects_absent_root() {
        let mut graph = graph_from_edges(&[(0, 1), (1, 0)]);

        let mut eulerian = EulerianTrail::new(&mut graph);
        let error = eulerian.compute_from(VertexId::from_usize(9)).unwrap_err();

        assert_matches!(error, Error::VertexAbsent(v) if v == VertexId::from_usize(9));
    }

    #[test]
    fn rooted_compute_rejects_root_off_circuit() {
        // A triangle with a self-loop to keep the edge count up, plus an
        // isolated vertex as the root.
        let mut graph = graph_from_edges(&[(0, 1), (1, 2), (2, 0), (0, 0)]);
        let isolated = graph.add_vertex(3);

        let mut eulerian = EulerianTrail::new(&mut graph);
        let error = eulerian.compute_from(isolated).unwrap_err();

        assert_matches!(error, Error::RootNotOnCircuit(v) if v == isolated);
    }

    #[test]
    fn disconnected_balanced_graph_is_not_eulerian() {
        // Two disjoint triangles: balanced everywhere, but not coverable by
        // one closed walk.
        let mut graph = graph_from_edges(&[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);

        let mut eulerian = EulerianTrail::new(&mut graph);
        assert_matches!(eulerian.compute(), Err(Error::NotEulerian));
    }

    #[test]
    fn even_imbalance_graph_is_not_eulerian() {
        // Vertex 7 has (out - in) imbalance +2 and vertex 1 has -2. Even
        // imbalances are invisible to the parity count, so augmentation has
        // nothing to pair, yet no closed walk can cover every edge.
        let mut graph = graph_from_edges(&[
            (0, 3),
            (7, 2),
            (3, 0),
            (1, 0),
            (2, 1),
            (7, 1),
            (0, 7),
            (7, 1),
        ]);

        let mut eulerian = EulerianTrail::new(&mut graph);
        assert!(eulerian.add_temporary_edges(|_, _| ()).unwrap().is_empty());
        assert_matches!(eulerian.compute(), Err(Error::NotEulerian));
    }

    #[test]
    fn remove_temporary_edges_restores_edge_count() {
        let mut graph = graph_from_edges(&[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)]);
        let edge_count = graph.edge_count();

        let mut eulerian = EulerianTrail::new(&mut graph);
        eulerian.add_temporary_edges(|_, _| ()).unwrap();
        assert_eq!(eulerian.graph().edge_count(), edge_count + 2);

        eulerian.remove_temporary_edges();
        assert_eq!(eulerian.graph().edge_count(), edge_count);
        assert!(eulerian.temporary_edges().is_empty());

        // Idempotent.
        eulerian.remove_temporary_edges();
        assert_eq!(eulerian.graph().edge_count(), edge_count);
    }

    #[test]
    fn augmentation_is_observable() {
        let graph = graph_from_edges(&[(0, 1), (1, 2), (2, 0), (0, 1)]);
        let mut graph = Observed::new(graph, Vec::new());

        let mut eulerian = EulerianTrail::new(&mut graph);
        eulerian.add_temporary_edges(|_, _| ()).unwrap();
        eulerian.remove_temporary_edges();

        let (_, events) = graph.into_inner();
        assert_matches!(events[0], GraphEvent::EdgeAdded { .. });
        assert_matches!(events[1], GraphEvent::EdgeRemoved { .. });
    }

    #[test]
    fn normal_run_reports_running_then_finished() {
        let mut graph = graph_from_edges(&[(0, 1), (1, 0)]);

        let mut eulerian = EulerianTrail::with_observer(&mut graph, Vec::new());
        eulerian.compute().unwrap();

        assert_eq!(
            eulerian.observer(),
            &vec![
                RunEvent::StateChanged(State::Running),
                RunEvent::Started,
                RunEvent::StateChanged(State::Finished),
                RunEvent::Finished,
            ]
        );
    }

    #[test]
    fn aborted_run_reports_pending_abortion_then_aborted() {
        let mut graph = graph_from_edges(&[(0, 1), (1, 0)]);

        let mut eulerian = EulerianTrail::with_observer(&mut graph, Vec::new());
        eulerian.abort_handle().request();
        eulerian.compute().unwrap();

        assert_eq!(eulerian.state(), State::Aborted);
        assert!(eulerian.circuit().is_empty());

        assert_eq!(
            eulerian.observer(),
            &vec![
                RunEvent::StateChanged(State::Running),
                RunEvent::Started,
                RunEvent::StateChanged(State::PendingAbortion),
                RunEvent::StateChanged(State::Aborted),
                RunEvent::Aborted,
            ]
        );
    }

    #[test]
    fn interruption_during_walk_discards_partial_progress() {
        let graph = graph_from_edges(&[(0, 1), (1, 0)]);

        let abort = AbortHandle::new();
        abort.request();

        assert_matches!(
            closed_walk(&graph, &VertexId::from_usize(0), &abort),
            WalkOutcome::Interrupted
        );

        // The execute phase translates an interruption into success with an
        // empty circuit; the lifecycle then turns the pending request into
        // `Aborted`.
        let mut circuit = vec![EdgeId::from_usize(0)];
        let mut pass = ComputePass {
            graph: &graph,
            root: None,
            circuit: &mut circuit,
        };

        pass.execute(&abort).unwrap();
        assert!(circuit.is_empty());
    }

    #[test]
    fn abort_while_not_running_is_silent() {
        let mut graph = graph_from_edges(&[(0, 1), (1, 0)]);

        let eulerian = EulerianTrail::with_observer(&mut graph, Vec::new());
        eulerian.abort();

        assert_eq!(eulerian.state(), State::NotRunning);
        assert!(eulerian.observer().is_empty());
        assert!(!eulerian.abort_handle().is_requested());
    }

    #[test]
    fn root_change_is_reported_once() {
        let mut graph = graph_from_edges(&[(0, 1), (1, 0)]);
        let root = VertexId::from_usize(0);

        let mut eulerian = EulerianTrail::with_observer(&mut graph, Vec::new());

        eulerian.set_root(root);
        eulerian.set_root(root);
        eulerian.clear_root();
        eulerian.clear_root();

        assert_eq!(
            eulerian.observer(),
            &vec![
                RunEvent::RootChanged(Some(root)),
                RunEvent::RootChanged(None),
            ]
        );
    }

    #[test]
    fn trails_from_rejects_absent_root() {
        let mut graph = graph_from_edges(&[(0, 1), (1, 0)]);

        let mut eulerian = EulerianTrail::new(&mut graph);
        eulerian.compute().unwrap();

        assert_matches!(
            eulerian.trails_from(&VertexId::from_usize(9)),
            Err(Error::VertexAbsent(_))
        );
    }

    #[test]
    fn pairing_guards_odd_sized_input() {
        let odd = vec![("a", 1), ("b", -1), ("c", 1)];
        let pairs = pair_odd_vertices(&odd);

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("b", "a"));
        // The leftover is paired back to the first odd vertex.
        assert_eq!(pairs[1], ("c", "a"));
    }

    #[test]
    fn pairing_orients_by_imbalance() {
        let odd = vec![("a", 1), ("b", -1)];
        assert_eq!(pair_odd_vertices(&odd), vec![("b", "a")]);

        let odd = vec![("a", -1), ("b", 1)];
        assert_eq!(pair_odd_vertices(&odd), vec![("a", "b")]);
    }

    #[test]
    fn random_closed_walk_is_a_single_trail() {
        let mut rng = fastrand::Rng::with_seed(0x0e01);

        for _ in 0..20 {
            let n_vertices = rng.usize(1..8);
            let len = rng.usize(n_vertices..40);

            let mut graph = AdjList::<_, _, Directed>::new();
            for i in 0..n_vertices {
                graph.add_vertex(i);
            }

            // The edges of any closed walk form an Eulerian circuit.
            let mut at = 0;
            for _ in 0..len {
                let next = rng.usize(0..n_vertices);
                graph.add_edge(&VertexId::from_usize(at), &VertexId::from_usize(next), ());
                at = next;
            }
            graph.add_edge(&VertexId::from_usize(at), &VertexId::from_usize(0), ());

            let mut eulerian = EulerianTrail::new(&mut graph);
            eulerian.compute().unwrap();

            let trails = eulerian.trails();
            assert_eq!(trails.len(), 1);
            assert_eq!(trails[0].len(), len + 1);
            assert_contiguous(eulerian.graph(), &trails[0]);
        }
    }

    proptest! {
        #[test]
        fn augmentation_balances_parity(
            edges in proptest::collection::vec((0..12usize, 0..12usize), 0..40),
        ) {
            let mut graph = graph_from_edges(&edges);

            let mut eulerian = EulerianTrail::new(&mut graph);
            let coverable = eulerian_path_count(eulerian.graph()) > 0;
            eulerian.add_temporary_edges(|_, _| ()).unwrap();

            if coverable {
                prop_assert_eq!(odd_vertex_count(eulerian.graph()), 0);
            }
        }

        #[test]
        fn successful_compute_partitions_original_edges(
            edges in proptest::collection::vec((0..8usize, 0..8usize), 1..30),
        ) {
            let mut graph = graph_from_edges(&edges);
            let original = graph.edges_by_id().collect::<FxHashSet<EdgeId>>();

            let mut eulerian = EulerianTrail::new(&mut graph);
            eulerian.add_temporary_edges(|_, _| ()).unwrap();

            if eulerian.compute().is_ok() && eulerian.state() == State::Finished {
                let trails = eulerian.trails();

                let mut seen = FxHashSet::default();
                for trail in &trails {
                    assert_contiguous(eulerian.graph(), trail);

                    for edge in trail {
                        prop_assert!(original.contains(edge));
                        prop_assert!(seen.insert(*edge));
                    }
                }

                prop_assert_eq!(seen.len(), original.len());
            }
        }
    }
}
