//! A meta-index composing several independent child indices.
//!
//! Builds `indexQty` children of a registered family over the same
//! space and dataset, each with the same forwarded parameters, and
//! deduplicates the union of their results at query time. The point is
//! variance: stochastic children (e.g. list-of-clusters with the
//! `random` strategy) cover different regions well, and the union
//! recovers recall a single instance would miss.

use std::collections::HashSet;

use tracing::info;

use crate::error::{IndexError, Result};
use crate::factory;
use crate::index::{BoxedIndex, Index};
use crate::object::Object;
use crate::params::Params;
use crate::query::{KnnQuery, Query, RangeQuery};
use crate::space::{DistanceValue, Space};

/// Parameters consumed here rather than forwarded to children.
const OWN_PARAMS: &[&str] = &["indexQty", "methodName", "printProgress"];

/// N independent copies of a named index family.
pub struct MultiIndex<'a, D: DistanceValue> {
    space: &'a dyn Space<D>,
    method_name: String,
    indices: Vec<BoxedIndex<'a, D>>,
}

impl<'a, D: DistanceValue> MultiIndex<'a, D> {
    pub fn new(
        _print_progress: bool,
        space: &'a dyn Space<D>,
        data: &'a [Object],
        params: &Params,
    ) -> Result<Self> {
        let index_qty: usize = params.get_required("indexQty")?;
        if index_qty == 0 {
            return Err(IndexError::InvalidParameter {
                name: "indexQty".to_string(),
                value: "0".to_string(),
            });
        }
        let method_name: String = params.get_required("methodName")?;
        let child_progress = params.get_bool("printProgress", false)?;
        let child_params = params.extract_except(OWN_PARAMS);

        let mut indices = Vec::with_capacity(index_qty);
        for i in 0..index_qty {
            info!(
                method = %method_name,
                index = i + 1,
                total = index_qty,
                "building child index"
            );
            indices.push(factory::create_method(
                child_progress,
                &method_name,
                space,
                data,
                &child_params,
            )?);
        }

        Ok(Self {
            space,
            method_name,
            indices,
        })
    }

    /// Number of child indices.
    pub fn index_qty(&self) -> usize {
        self.indices.len()
    }
}

impl<'a, D: DistanceValue> Index<'a, D> for MultiIndex<'a, D> {
    /// The same object may come back from several children; duplicates
    /// are filtered by reference identity, which is stable for range
    /// results because they point straight into the dataset.
    fn search_range(&self, query: &mut RangeQuery<'a, D>) {
        let mut found: HashSet<*const Object> = HashSet::new();

        for index in &self.indices {
            let mut child = RangeQuery::new(self.space, query.query_object(), query.radius());
            index.search_range(&mut child);
            query.add_distance_computations(child.distance_computations());
            for &(object, d) in child.results() {
                if found.insert(object as *const Object) {
                    query.check_and_add(d, object);
                }
            }
        }
    }

    /// k-NN results are drained from a cloned queue, so duplicates are
    /// filtered by object id rather than reference.
    fn search_knn(&self, query: &mut KnnQuery<'a, D>) {
        let mut found: HashSet<u32> = HashSet::new();

        for index in &self.indices {
            let mut child = KnnQuery::new(self.space, query.query_object(), query.k(), query.eps());
            index.search_knn(&mut child);
            query.add_distance_computations(child.distance_computations());

            let mut snapshot = child.queue().clone();
            while let Some((object, d)) = snapshot.pop() {
                if found.insert(object.id()) {
                    query.check_and_add(d, object);
                }
            }
        }
    }

    fn set_query_time_params(&mut self, params: &Params) -> Result<()> {
        for index in &mut self.indices {
            index.set_query_time_params(params)?;
        }
        Ok(())
    }

    fn query_time_param_names(&self) -> &'static [&'static str] {
        // Children are all one family; the first speaks for the rest.
        self.indices
            .first()
            .map(|index| index.query_time_param_names())
            .unwrap_or(&[])
    }

    fn description(&self) -> String {
        format!("{} copies of {}", self.indices.len(), self.method_name)
    }
}

/// Type-erased constructor for the method factory.
pub fn boxed_constructor<'a, D: DistanceValue>(
    print_progress: bool,
    space: &'a dyn Space<D>,
    data: &'a [Object],
    params: &Params,
) -> Result<BoxedIndex<'a, D>> {
    Ok(Box::new(MultiIndex::new(
        print_progress,
        space,
        data,
        params,
    )?))
}
