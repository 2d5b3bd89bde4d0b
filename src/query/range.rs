//! Range queries: retrieve everything within a fixed radius.

use crate::object::Object;
use crate::query::Query;
use crate::space::{DistanceValue, Space};

/// Accumulator for a range query.
///
/// Every admitted pair `(object, d)` satisfies `d <= radius`, with `d`
/// the query-time distance from the query object. Results are kept in
/// admission order.
pub struct RangeQuery<'a, D: DistanceValue> {
    space: &'a dyn Space<D>,
    query_object: &'a Object,
    radius: D,
    results: Vec<(&'a Object, D)>,
    distance_computations: u64,
}

impl<'a, D: DistanceValue> RangeQuery<'a, D> {
    pub fn new(space: &'a dyn Space<D>, query_object: &'a Object, radius: D) -> Self {
        Self {
            space,
            query_object,
            radius,
            results: Vec::new(),
            distance_computations: 0,
        }
    }

    /// Admitted `(object, distance)` pairs, in admission order.
    pub fn results(&self) -> &[(&'a Object, D)] {
        &self.results
    }
}

impl<'a, D: DistanceValue> Query<'a, D> for RangeQuery<'a, D> {
    fn query_object(&self) -> &'a Object {
        self.query_object
    }

    fn radius(&self) -> D {
        self.radius
    }

    fn distance_to_payload(&mut self, payload: &[u8]) -> D {
        self.distance_computations += 1;
        self.space.distance(self.query_object.payload(), payload)
    }

    fn check_and_add(&mut self, distance: D, object: &'a Object) {
        if distance <= self.radius {
            self.results.push((object, distance));
        }
    }

    fn add_distance_computations(&mut self, n: u64) {
        self.distance_computations += n;
    }

    fn distance_computations(&self) -> u64 {
        self.distance_computations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::DenseSpaceF32;

    #[test]
    fn admits_on_the_boundary_and_counts_evaluations() {
        let space = DenseSpaceF32::l2();
        let q = space.create_object(100, None, &[0.0]);
        let near = space.create_object(0, None, &[2.0]);
        let far = space.create_object(1, None, &[2.5]);

        let mut query = RangeQuery::new(&space, &q, 2.0f32);
        query.check_and_add_computing(&near);
        query.check_and_add_computing(&far);

        assert_eq!(query.distance_computations(), 2);
        assert_eq!(query.results().len(), 1);
        assert_eq!(query.results()[0].0.id(), 0);
        assert_eq!(query.results()[0].1, 2.0);
    }
}
