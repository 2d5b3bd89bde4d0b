//! The polymorphic contract every index family implements.

use crate::error::Result;
use crate::object::Object;
use crate::params::Params;
use crate::query::{KnnQuery, RangeQuery};
use crate::space::{DistanceValue, Space};

/// A built search index.
///
/// Construction happens in each family's constructor and may perform
/// arbitrary work; a failed build yields an error, never a partially
/// usable index. After construction an index is read-only apart from
/// its query-time tunables, so `Search` is safe to call concurrently
/// from multiple threads as long as each thread owns its own query
/// accumulator and nobody is mutating tunables at the same time.
pub trait Index<'a, D: DistanceValue>: Send + Sync {
    /// Run a range query, mutating the accumulator in place.
    fn search_range(&self, query: &mut RangeQuery<'a, D>);

    /// Run a k-NN query, mutating the accumulator in place.
    fn search_knn(&self, query: &mut KnnQuery<'a, D>);

    /// Mutate tunables that are safe to change without rebuilding.
    /// Quiesce concurrent searches first; this takes `&mut self` for a
    /// reason. Keys absent from the bag keep their current values.
    fn set_query_time_params(&mut self, params: &Params) -> Result<()>;

    /// The parameter-bag keys that only affect query time. A driver
    /// uses this to decide that two successive build requests differ
    /// only in tunables and the already-built index can be reused after
    /// [`set_query_time_params`](Index::set_query_time_params).
    fn query_time_param_names(&self) -> &'static [&'static str];

    /// Short human-readable description for logs and reports.
    fn description(&self) -> String;
}

/// An owned, type-erased index borrowing a space and dataset.
pub type BoxedIndex<'a, D> = Box<dyn Index<'a, D> + 'a>;

/// Constructor signature registered with the method factory.
pub type IndexConstructor<D> = for<'a> fn(
    print_progress: bool,
    space: &'a dyn Space<D>,
    data: &'a [Object],
    params: &Params,
) -> Result<BoxedIndex<'a, D>>;
