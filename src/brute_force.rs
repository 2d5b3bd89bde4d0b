//! Exhaustive sequential scan.
//!
//! No index structure at all: every query compares against every
//! object. The slow, always-correct baseline other families are
//! measured against.

use crate::error::Result;
use crate::index::{BoxedIndex, Index};
use crate::object::Object;
use crate::params::Params;
use crate::query::{KnnQuery, Query, RangeQuery};
use crate::space::{DistanceValue, Space};

/// Brute-force search over a borrowed dataset.
pub struct BruteForceIndex<'a> {
    data: &'a [Object],
}

impl<'a> BruteForceIndex<'a> {
    pub fn new(data: &'a [Object]) -> Self {
        Self { data }
    }
}

impl<'a, D: DistanceValue> Index<'a, D> for BruteForceIndex<'a> {
    fn search_range(&self, query: &mut RangeQuery<'a, D>) {
        for object in self.data {
            query.check_and_add_computing(object);
        }
    }

    fn search_knn(&self, query: &mut KnnQuery<'a, D>) {
        for object in self.data {
            query.check_and_add_computing(object);
        }
    }

    fn set_query_time_params(&mut self, _params: &Params) -> Result<()> {
        Ok(())
    }

    fn query_time_param_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn description(&self) -> String {
        "brute force search".to_string()
    }
}

/// Type-erased constructor for the method factory.
pub fn boxed_constructor<'a, D: DistanceValue>(
    _print_progress: bool,
    _space: &'a dyn Space<D>,
    data: &'a [Object],
    _params: &Params,
) -> Result<BoxedIndex<'a, D>> {
    Ok(Box::new(BruteForceIndex::new(data)))
}
