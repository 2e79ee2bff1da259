pub mod algo;
pub mod core;
pub mod observe;
pub mod run;
pub mod storage;

pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        algo::EulerianTrail,
        core::{
            marker::{Directed, Undirected},
            EdgeSet, GraphAdd, GraphFull, GraphMut, GraphRef, Neighbors, VertexSet,
        },
        observe::Observed,
        run::{Interruptible, State},
        storage::{AdjList, AdjMatrix},
    };
}
