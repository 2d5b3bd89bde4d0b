//! List-of-Clusters index.
//!
//! Covers the dataset with a greedy sequence of spherical clusters:
//! pick a center from the not-yet-clustered pool, gather either its
//! `bucketSize` nearest remaining objects or everything within a fixed
//! radius, then repeat on what is left. Search walks the cluster list
//! with triangle-style pruning; a query ball strictly contained in a
//! cluster's bounding sphere ends the search early.
//!
//! The containment pruning assumes a symmetric distance. On asymmetric
//! spaces the index still runs, but the exactness guarantee of
//! unlimited-leaf mode degrades.
//!
//! # Build parameters
//!
//! | key             | default  | meaning                                         |
//! |-----------------|----------|-------------------------------------------------|
//! | `strategy`      | `random` | how the next center is drawn (see [`CenterStrategy`]) |
//! | `useBucketSize` | `true`   | fixed-size buckets vs fixed-radius clusters     |
//! | `bucketSize`    | `50`     | members per cluster when `useBucketSize`        |
//! | `radius`        | `1`      | cluster radius when `!useBucketSize`            |
//! | `chunkBucket`   | `true`   | repack buckets into contiguous arenas           |
//! | `seed`          | entropy  | RNG seed for reproducible builds                |
//!
//! # Query-time parameters
//!
//! `maxLeavesToVisit`: a cap on the number of cluster buckets scanned.
//! A negative value (or leaving it unset) means unlimited, which is
//! exact mode; any non-negative cap switches to a best-first
//! approximate traversal.
//!
//! # References
//!
//! - Chávez & Navarro (2005): "A compact space decomposition for
//!   effective metric indexing"

mod cluster;

pub use cluster::Cluster;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::{IndexError, Result};
use crate::index::{BoxedIndex, Index};
use crate::object::Object;
use crate::params::Params;
use crate::query::{KnnQuery, Query, RangeQuery};
use crate::space::{DistanceValue, Space};

/// How the next cluster center is drawn from the remaining pool.
///
/// Each pool entry carries the running sum of distances to all previous
/// centers; the sum-based strategies scan for its extremes, while the
/// front/back strategies exploit the pool ordering left behind by the
/// previous iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CenterStrategy {
    /// Uniformly random pool element.
    #[default]
    Random,
    /// Front of the pool.
    ClosestPrevCenter,
    /// Back of the pool.
    FarthestPrevCenter,
    /// Smallest running distance sum; ties keep a randomly chosen start.
    MinSumDistPrevCenters,
    /// Largest running distance sum; ties keep a randomly chosen start.
    MaxSumDistPrevCenters,
}

impl FromStr for CenterStrategy {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(Self::Random),
            "closestPrevCenter" => Ok(Self::ClosestPrevCenter),
            "farthestPrevCenter" => Ok(Self::FarthestPrevCenter),
            "minSumDistPrevCenters" => Ok(Self::MinSumDistPrevCenters),
            "maxSumDistPrevCenters" => Ok(Self::MaxSumDistPrevCenters),
            other => Err(IndexError::InvalidParameter {
                name: "strategy".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// List-of-Clusters index over a borrowed dataset.
pub struct ListClustersIndex<'a, D: DistanceValue> {
    clusters: Vec<Cluster<'a, D>>,
    max_leaves_to_visit: Option<u32>,
}

impl<'a, D: DistanceValue> ListClustersIndex<'a, D> {
    pub fn new(
        print_progress: bool,
        space: &'a dyn Space<D>,
        data: &'a [Object],
        params: &Params,
    ) -> Result<Self> {
        let strategy = params.get_optional("strategy", CenterStrategy::default())?;
        let use_bucket_size = params.get_bool("useBucketSize", true)?;
        let bucket_size: usize = params.get_optional("bucketSize", 50)?;
        let radius: D = params.get_optional("radius", D::ONE)?;
        let chunk_bucket = params.get_bool("chunkBucket", true)?;
        let seed: Option<u64> = params.get("seed")?;
        let max_leaves_to_visit = parse_max_leaves(params)?.unwrap_or(None);

        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let mut clusters: Vec<Cluster<'a, D>> = Vec::new();

        // Pool of (running sum of distances to previous centers, object).
        let mut remaining: Vec<(D, &'a Object)> =
            data.iter().map(|object| (D::ZERO, object)).collect();

        while !remaining.is_empty() {
            let center = select_next_center(&remaining, strategy, &mut rng);
            let mut cluster = Cluster::new(center);

            if remaining.len() == 1 {
                clusters.push(cluster);
                break;
            }

            let mut outside: Vec<(D, &'a Object)> = Vec::new();

            if use_bucket_size {
                // (distance to center, running sum, object)
                let mut candidates: Vec<(D, D, &'a Object)> =
                    Vec::with_capacity(remaining.len() - 1);
                let mut center_seen = false;
                for &(sum, object) in &remaining {
                    if std::ptr::eq(object, center) {
                        assert!(!center_seen, "center drawn twice from the remaining pool");
                        center_seen = true;
                    } else {
                        let d = space.index_time_distance(object.payload(), center.payload());
                        candidates.push((d, sum, object));
                    }
                }
                candidates.sort_by(|a, b| a.0.total_order(&b.0));
                for (d, sum, object) in candidates {
                    if cluster.len() < bucket_size {
                        cluster.add_object(object, d);
                    } else {
                        outside.push((sum.saturating_add(d), object));
                    }
                }
            } else {
                let mut center_seen = false;
                for &(sum, object) in &remaining {
                    if std::ptr::eq(object, center) {
                        assert!(!center_seen, "center drawn twice from the remaining pool");
                        center_seen = true;
                    } else {
                        let d = space.index_time_distance(object.payload(), center.payload());
                        if d < radius {
                            cluster.add_object(object, d);
                        } else {
                            outside.push((sum.saturating_add(d), object));
                        }
                    }
                }
            }

            clusters.push(cluster);
            remaining = outside;
        }

        if chunk_bucket {
            for cluster in &mut clusters {
                cluster.optimize_bucket();
            }
        }

        if print_progress {
            info!(
                space = space.name(),
                objects = data.len(),
                clusters = clusters.len(),
                "list of clusters built"
            );
        }

        Ok(Self {
            clusters,
            max_leaves_to_visit,
        })
    }

    /// Number of clusters, equal to the number of build iterations.
    pub fn cluster_qty(&self) -> usize {
        self.clusters.len()
    }

    /// Built clusters in construction order.
    pub fn clusters(&self) -> &[Cluster<'a, D>] {
        &self.clusters
    }

    fn run_search<Q: Query<'a, D>>(&self, query: &mut Q) {
        match self.max_leaves_to_visit {
            None => self.search_exact(query),
            Some(max_leaves) => self.search_approximate(query, max_leaves),
        }
    }

    /// Walk clusters in construction order. A cluster is scanned when
    /// its bounding sphere intersects the query ball; when the ball is
    /// strictly contained, no later cluster can hold closer points and
    /// the walk stops.
    fn search_exact<Q: Query<'a, D>>(&self, query: &mut Q) {
        for cluster in &self.clusters {
            let dist_qc = query.distance_to(cluster.center());
            query.check_and_add(dist_qc, cluster.center());

            if dist_qc.saturating_sub(query.radius()) < cluster.covering_radius() {
                cluster.search(query);
                if dist_qc.saturating_add(query.radius()) < cluster.covering_radius() {
                    break;
                }
            }
        }
    }

    /// Best-first traversal over the intersecting clusters, capped at
    /// `max_leaves` bucket scans. Centers are still all submitted while
    /// collecting candidates, so even a cap of zero returns the best
    /// centers seen.
    fn search_approximate<Q: Query<'a, D>>(&self, query: &mut Q, max_leaves: u32) {
        struct Elem<'c, 'a, D: DistanceValue> {
            dist_qc: D,
            cluster: &'c Cluster<'a, D>,
        }

        impl<D: DistanceValue> PartialEq for Elem<'_, '_, D> {
            fn eq(&self, other: &Self) -> bool {
                self.cmp(other) == Ordering::Equal
            }
        }

        impl<D: DistanceValue> Eq for Elem<'_, '_, D> {}

        impl<D: DistanceValue> PartialOrd for Elem<'_, '_, D> {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl<D: DistanceValue> Ord for Elem<'_, '_, D> {
            // Reversed: BinaryHeap pops the closest cluster first.
            fn cmp(&self, other: &Self) -> Ordering {
                other.dist_qc.total_order(&self.dist_qc)
            }
        }

        let mut heap: BinaryHeap<Elem<'_, 'a, D>> = BinaryHeap::new();

        for cluster in &self.clusters {
            let dist_qc = query.distance_to(cluster.center());
            query.check_and_add(dist_qc, cluster.center());

            if dist_qc.saturating_sub(query.radius()) < cluster.covering_radius() {
                heap.push(Elem { dist_qc, cluster });
            }
        }

        let mut prev_dist = D::ZERO;
        let mut visited = 0u32;

        while visited < max_leaves {
            let Some(elem) = heap.pop() else { break };
            assert!(
                elem.dist_qc.total_order(&prev_dist) != Ordering::Less,
                "popped cluster distances must be non-decreasing"
            );
            prev_dist = elem.dist_qc;

            elem.cluster.search(query);
            visited += 1;

            if elem
                .dist_qc
                .saturating_add(query.radius())
                < elem.cluster.covering_radius()
            {
                return;
            }
        }
    }
}

impl<'a, D: DistanceValue> Index<'a, D> for ListClustersIndex<'a, D> {
    fn search_range(&self, query: &mut RangeQuery<'a, D>) {
        self.run_search(query);
    }

    fn search_knn(&self, query: &mut KnnQuery<'a, D>) {
        self.run_search(query);
    }

    fn set_query_time_params(&mut self, params: &Params) -> Result<()> {
        if let Some(value) = parse_max_leaves(params)? {
            self.max_leaves_to_visit = value;
        }
        Ok(())
    }

    fn query_time_param_names(&self) -> &'static [&'static str] {
        &["maxLeavesToVisit"]
    }

    fn description(&self) -> String {
        "list of clusters".to_string()
    }
}

/// Type-erased constructor for the method factory.
pub fn boxed_constructor<'a, D: DistanceValue>(
    print_progress: bool,
    space: &'a dyn Space<D>,
    data: &'a [Object],
    params: &Params,
) -> Result<BoxedIndex<'a, D>> {
    Ok(Box::new(ListClustersIndex::new(
        print_progress,
        space,
        data,
        params,
    )?))
}

/// Outer `None`: the key is absent. Inner `None`: present but negative,
/// meaning unlimited (exact mode). A non-negative cap too large for
/// `u32` saturates; it stays a finite leaf bound.
fn parse_max_leaves(params: &Params) -> Result<Option<Option<u32>>> {
    Ok(params.get::<i64>("maxLeavesToVisit")?.map(|v| {
        if v < 0 {
            None
        } else {
            Some(u32::try_from(v).unwrap_or(u32::MAX))
        }
    }))
}

fn select_next_center<'a, D: DistanceValue>(
    remaining: &[(D, &'a Object)],
    strategy: CenterStrategy,
    rng: &mut StdRng,
) -> &'a Object {
    assert!(!remaining.is_empty(), "center selection on an empty pool");
    match strategy {
        CenterStrategy::Random => remaining[rng.gen_range(0..remaining.len())].1,
        CenterStrategy::ClosestPrevCenter => remaining[0].1,
        CenterStrategy::FarthestPrevCenter => remaining[remaining.len() - 1].1,
        CenterStrategy::MinSumDistPrevCenters => {
            let mut idx = rng.gen_range(0..remaining.len());
            for i in 0..remaining.len() {
                if remaining[i].0 < remaining[idx].0 {
                    idx = i;
                }
            }
            remaining[idx].1
        }
        CenterStrategy::MaxSumDistPrevCenters => {
            let mut idx = rng.gen_range(0..remaining.len());
            for i in 0..remaining.len() {
                if remaining[i].0 > remaining[idx].0 {
                    idx = i;
                }
            }
            remaining[idx].1
        }
    }
}
