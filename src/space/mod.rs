//! Distance spaces.
//!
//! A [`Space`] computes a distance between two object payloads. The
//! interface is deliberately weak: symmetry, the triangle inequality,
//! and non-negativity are NOT required. Index families that rely on a
//! subset of these properties document how their guarantees degrade
//! when the space lacks them (see [`crate::list_clusters`]).
//!
//! Distances are one of `i32`, `f32`, or `f64`, chosen per index
//! instance via the [`DistanceValue`] bound.

pub mod dense;
pub mod levenshtein;

pub use dense::{DenseMetric, DenseSpaceF32, DenseSpaceF64};
pub use levenshtein::LevenshteinSpace;

use std::cmp::Ordering;
use std::fmt::Debug;
use std::str::FromStr;

/// Numeric bound for distance values.
///
/// Replaces the three parallel int/float/double instantiations a C++
/// template would produce with a single generic bound: an ordered,
/// additive value with a zero. The arithmetic helpers saturate so that
/// pruning expressions like `d - bound` stay well-defined when the
/// bound sits at [`DistanceValue::MAX_VALUE`].
pub trait DistanceValue:
    Copy + PartialOrd + Debug + FromStr + Send + Sync + 'static
{
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity; the default cluster radius.
    const ONE: Self;
    /// Largest representable value; the admission bound of a k-NN queue
    /// that is not yet full.
    const MAX_VALUE: Self;

    /// Total ordering, usable as a heap comparator even for floats.
    fn total_order(&self, other: &Self) -> Ordering;

    /// `self + rhs`, saturating at the numeric bounds for integers.
    fn saturating_add(self, rhs: Self) -> Self;

    /// `self - rhs`, saturating at the numeric bounds for integers.
    fn saturating_sub(self, rhs: Self) -> Self;

    /// `self / (1 + eps)`: the k-NN admission bound under slack `eps`.
    /// Integer values truncate toward zero.
    fn shrink_by(self, eps: f32) -> Self;
}

impl DistanceValue for i32 {
    const ZERO: Self = 0;
    const ONE: Self = 1;
    const MAX_VALUE: Self = i32::MAX;

    fn total_order(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn saturating_add(self, rhs: Self) -> Self {
        i32::saturating_add(self, rhs)
    }

    fn saturating_sub(self, rhs: Self) -> Self {
        i32::saturating_sub(self, rhs)
    }

    fn shrink_by(self, eps: f32) -> Self {
        (f64::from(self) / (1.0 + f64::from(eps))) as i32
    }
}

impl DistanceValue for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const MAX_VALUE: Self = f32::MAX;

    fn total_order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn saturating_add(self, rhs: Self) -> Self {
        self + rhs
    }

    fn saturating_sub(self, rhs: Self) -> Self {
        self - rhs
    }

    fn shrink_by(self, eps: f32) -> Self {
        self / (1.0 + eps)
    }
}

impl DistanceValue for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const MAX_VALUE: Self = f64::MAX;

    fn total_order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn saturating_add(self, rhs: Self) -> Self {
        self + rhs
    }

    fn saturating_sub(self, rhs: Self) -> Self {
        self - rhs
    }

    fn shrink_by(self, eps: f32) -> Self {
        self / (1.0 + f64::from(eps))
    }
}

/// A capability computing a (possibly non-metric) distance between two
/// object payloads.
///
/// The distance must be total over the object population; ill-formed
/// payloads are the dataset layer's responsibility.
pub trait Space<D: DistanceValue>: Send + Sync {
    /// Query-time distance. Counted toward a query's distance
    /// evaluations when invoked through an accumulator.
    fn distance(&self, a: &[u8], b: &[u8]) -> D;

    /// Construction-time distance. May be a cheaper approximation, but
    /// must be consistent with what index pruning assumes. Defaults to
    /// the query-time distance.
    fn index_time_distance(&self, a: &[u8], b: &[u8]) -> D {
        self.distance(a, b)
    }

    /// Short name for logs and the space registry.
    fn name(&self) -> &'static str;
}
