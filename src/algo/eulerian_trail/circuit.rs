use crate::{
    core::{
        id::{IdType, IntegerIdType},
        marker::Direction,
        EdgeSet, Neighbors, VertexSet,
    },
    run::AbortHandle,
};

#[derive(Debug)]
pub(super) enum WalkOutcome<EI> {
    /// A closed walk from the start vertex covering every edge exactly once.
    Complete(Vec<EI>),
    /// The walk got stuck or ended elsewhere before consuming all edges.
    Incomplete,
    /// Abortion was requested before the walk was finished.
    Interrupted,
}

/// Builds an Eulerian circuit with the Hierholzer algorithm.
///
/// The traversal walks unused outgoing edges depth-first, consuming each edge
/// exactly once. Whenever the walk returns to a vertex that still has unused
/// outgoing edges, the continuation found there is spliced into the circuit
/// at that position, which is what the unwinding order of the explicit stack
/// produces.
pub(super) fn closed_walk<G>(
    graph: &G,
    start: &G::VertexId,
    abort: &AbortHandle,
) -> WalkOutcome<G::EdgeId>
where
    G: Neighbors + VertexSet + EdgeSet,
    G::VertexId: IntegerIdType,
    G::EdgeId: IntegerIdType,
{
    let vertex_bound = graph.vertex_bound();

    let mut out_edges = vec![Vec::new(); vertex_bound];
    for v in graph.vertices_by_id() {
        out_edges[v.as_usize()] = graph
            .neighbors_directed(&v, Direction::Outgoing)
            .map(|neighbor| neighbor.edge)
            .collect::<Vec<_>>();
    }

    // The cursor of a vertex separates its consumed outgoing edges from the
    // unused ones.
    let mut cursor = vec![0; vertex_bound];

    let mut stack = vec![(start.clone(), None)];
    let mut walk = Vec::with_capacity(graph.edge_count());

    while let Some((v, via)) = stack.last().cloned() {
        if abort.is_requested() {
            return WalkOutcome::Interrupted;
        }

        let i = v.as_usize();

        if cursor[i] < out_edges[i].len() {
            let edge = out_edges[i][cursor[i]];
            cursor[i] += 1;

            let (_, to) = graph.endpoints(&edge).expect("edge does not exist");
            stack.push((to, Some(edge)));
        } else {
            // No unused outgoing edge left here. The edge that brought us in
            // belongs to the circuit after everything reachable from this
            // vertex, which the unwinding order provides.
            stack.pop();

            if let Some(edge) = via {
                walk.push(edge);
            }
        }
    }

    walk.reverse();

    if walk.len() != graph.edge_count() {
        return WalkOutcome::Incomplete;
    }

    if let (Some(first), Some(last)) = (walk.first(), walk.last()) {
        let (from, _) = graph.endpoints(first).expect("edge does not exist");
        let (_, to) = graph.endpoints(last).expect("edge does not exist");

        if &from != start || &to != start {
            return WalkOutcome::Incomplete;
        }
    }

    // A stalled traversal on a graph with even but nonzero (out - in)
    // imbalance can still pass the length and endpoint checks; it shows up
    // only as a discontinuity between consecutive edges.
    for pair in walk.windows(2) {
        let (_, to) = graph.endpoints(&pair[0]).expect("edge does not exist");
        let (from, _) = graph.endpoints(&pair[1]).expect("edge does not exist");

        if to != from {
            return WalkOutcome::Incomplete;
        }
    }

    WalkOutcome::Complete(walk)
}
