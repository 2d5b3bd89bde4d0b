//! Query accumulators.
//!
//! A query is a stateful accumulator owned by the caller: it carries
//! the query object, the search tolerance, the running result set, and
//! a count of distance evaluations. Indices mutate it in place during
//! [`Index::search_range`](crate::Index::search_range) /
//! [`Index::search_knn`](crate::Index::search_knn); afterwards the
//! caller reads the results back out. Each thread owns its own
//! accumulator; sharing one across concurrent searches is a bug.

mod knn;
mod range;

pub use knn::{KnnQuery, KnnQueue};
pub use range::RangeQuery;

use crate::object::Object;
use crate::space::DistanceValue;

/// The surface shared by both query kinds, which is what lets an index
/// run one traversal routine for range and k-NN searches alike.
pub trait Query<'a, D: DistanceValue> {
    /// The query point.
    fn query_object(&self) -> &'a Object;

    /// Current admission bound: the fixed radius for a range query, the
    /// live `top / (1 + eps)` bound for a k-NN query (or
    /// [`DistanceValue::MAX_VALUE`] while its queue is not yet full).
    fn radius(&self) -> D;

    /// Distance from the query to a raw payload, counted toward the
    /// evaluation total.
    fn distance_to_payload(&mut self, payload: &[u8]) -> D;

    /// Distance from the query to `object`, counted toward the
    /// evaluation total.
    fn distance_to(&mut self, object: &Object) -> D {
        self.distance_to_payload(object.payload())
    }

    /// Admit `(distance, object)` into the result set if it satisfies
    /// the query's admission rule.
    fn check_and_add(&mut self, distance: D, object: &'a Object);

    /// Compute the distance, then admit. Equivalent to
    /// `check_and_add(distance_to(object), object)`.
    fn check_and_add_computing(&mut self, object: &'a Object) {
        let d = self.distance_to(object);
        self.check_and_add(d, object);
    }

    /// External bump of the evaluation counter, used when a child
    /// structure has already performed distance work on this query's
    /// behalf.
    fn add_distance_computations(&mut self, n: u64);

    /// Total distance evaluations charged to this query so far.
    fn distance_computations(&self) -> u64;
}
