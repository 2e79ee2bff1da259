//! Types used for identifying vertices and edges in graphs.
//!
//! Storages hand out [`VertexId`] and [`EdgeId`] values. Algorithms that index
//! into contiguous arrays require [`IntegerIdType`], which all ids produced by
//! the storages in this crate satisfy.

use std::{fmt::Debug, hash::Hash};

/// A unique identification of a vertex or edge in a graph.
///
/// Any id must have a representation for a "sentinel" value, conceptually
/// `None` in `Option<Id>` but without the overhead of `Option`. For integer
/// ids the maximum value of the backing type is used so that 0 remains a
/// natural first index.
pub trait IdType: Clone + PartialEq + Eq + PartialOrd + Ord + Hash + Debug {
    /// The reserved "no id" value.
    fn sentinel() -> Self;

    /// Converts an id into the corresponding `u64`.
    fn as_bits(&self) -> u64;

    /// Converts an `u64` into the corresponding id.
    fn from_bits(bits: u64) -> Self;

    fn as_usize(&self) -> usize {
        self.as_bits() as usize
    }

    fn from_usize(index: usize) -> Self {
        Self::from_bits(index as u64)
    }

    fn is_sentinel(&self) -> bool {
        self == &Self::sentinel()
    }
}

/// Type-level specification that an id is a dense integer.
///
/// All integer values up to some upper bound are valid ids with no
/// discontinuity, so the id can be used directly as an index into a
/// contiguous array.
pub trait IntegerIdType: IdType + Copy + From<usize> + Into<usize> {}

/// The standard vertex id used by the storages in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub u64);

/// The standard edge id used by the storages in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u64);

macro_rules! impl_int_id {
    ($id_ty:ident) => {
        impl IdType for $id_ty {
            fn sentinel() -> Self {
                Self(u64::MAX)
            }

            fn as_bits(&self) -> u64 {
                self.0
            }

            fn from_bits(bits: u64) -> Self {
                Self(bits)
            }

            fn as_usize(&self) -> usize {
                self.0.try_into().expect("id type overflow")
            }

            fn from_usize(index: usize) -> Self {
                Self(index as u64)
            }
        }

        impl From<usize> for $id_ty {
            fn from(index: usize) -> Self {
                Self::from_usize(index)
            }
        }

        impl From<$id_ty> for usize {
            fn from(id: $id_ty) -> Self {
                id.as_usize()
            }
        }

        impl IntegerIdType for $id_ty {}
    };
}

impl_int_id!(VertexId);
impl_int_id!(EdgeId);
