//! proxima: exact and approximate nearest-neighbor search in arbitrary
//! (possibly non-metric) distance spaces.
//!
//! Given a dataset of opaque objects and a pluggable distance oracle,
//! proxima builds an index answering two query kinds: k-nearest-neighbor
//! and range queries. Both are driven through stateful query
//! accumulators that collect results and count distance evaluations.
//!
//! # Index families
//!
//! | Family | Registry name | Notes |
//! |--------|---------------|-------|
//! | [List of Clusters](list_clusters) | `list_clusters` | greedy spherical clusters, exact or leaf-capped approximate search |
//! | [MultiIndex](multi_index) | `multi_index` | N stochastic copies of another family, deduplicated |
//! | [Brute force](brute_force) | `seq_search` | exhaustive baseline |
//!
//! Distances are `i32`, `f32`, or `f64`, fixed per index instance via
//! the [`DistanceValue`] bound. The space interface does not assume
//! symmetry, the triangle inequality, or non-negativity; families
//! document which of these their pruning relies on.
//!
//! # Quick start
//!
//! ```
//! use proxima::space::DenseSpaceF32;
//! use proxima::{factory, Index, KnnQuery, Object, Params};
//!
//! # fn main() -> proxima::Result<()> {
//! let space = DenseSpaceF32::l2();
//! let data: Vec<Object> = (0..64)
//!     .map(|i| space.create_object(i, None, &[i as f32, 0.0]))
//!     .collect();
//!
//! let target = space.create_object(1000, None, &[7.3, 0.0]);
//! let index = factory::create_method(false, "list_clusters", &space, &data, &Params::new())?;
//!
//! let mut query = KnnQuery::new(&space, &target, 3, 0.0);
//! index.search_knn(&mut query);
//!
//! assert_eq!(query.sorted_results()[0].0.id(), 7);
//! # Ok(())
//! # }
//! ```
//!
//! # Ownership
//!
//! The caller's dataset owns the objects; indices and query
//! accumulators borrow. An index also borrows its space, so both must
//! outlive it. Nothing here parses datasets, renders reports, or
//! schedules threads; those belong to the experiment driver wrapping
//! this crate.

pub mod brute_force;
pub mod error;
pub mod factory;
pub mod index;
pub mod list_clusters;
pub mod multi_index;
pub mod object;
pub mod params;
pub mod query;
pub mod space;

pub use error::{IndexError, Result};
pub use index::{BoxedIndex, Index, IndexConstructor};
pub use object::{Object, ObjectVector};
pub use params::Params;
pub use query::{KnnQuery, KnnQueue, Query, RangeQuery};
pub use space::{DistanceValue, Space};
