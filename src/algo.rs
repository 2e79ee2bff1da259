//! Graph algorithms.
//!
//! Algorithms that perform a long-running computation are built on the
//! [`run`](crate::run) framework: they own a lifecycle, report run milestones
//! to an observer and support cooperative cancellation through
//! [`Interruptible`](crate::run::Interruptible).

pub mod eulerian_trail;

pub use eulerian_trail::{eulerian_path_count, EulerianTrail};
