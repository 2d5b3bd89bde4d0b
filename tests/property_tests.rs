//! Property-based tests for the indexing core.
//!
//! These verify invariants that should hold for any valid build and
//! query: the cluster list partitions the dataset, covering radii are
//! tight, exact-mode range search equals a brute-force filter, and the
//! k-NN accumulator returns the k smallest distances seen.

use proptest::prelude::*;

use proxima::list_clusters::ListClustersIndex;
use proxima::space::DenseSpaceF32;
use proxima::{Index, KnnQuery, Object, Params, RangeQuery, Space};

const STRATEGIES: &[&str] = &[
    "random",
    "closestPrevCenter",
    "farthestPrevCenter",
    "minSumDistPrevCenters",
    "maxSumDistPrevCenters",
];

fn build_objects(space: &DenseSpaceF32, points: &[Vec<f32>]) -> Vec<Object> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| space.create_object(i as u32, None, p))
        .collect()
}

fn build_params(
    strategy: usize,
    use_bucket_size: bool,
    bucket_size: usize,
    radius: f32,
    chunk_bucket: bool,
    seed: u64,
) -> Params {
    Params::new()
        .set("strategy", STRATEGIES[strategy % STRATEGIES.len()])
        .set("useBucketSize", use_bucket_size)
        .set("bucketSize", bucket_size)
        .set("radius", radius)
        .set("chunkBucket", chunk_bucket)
        .set("seed", seed)
}

prop_compose! {
    fn arb_points()(points in prop::collection::vec(
        prop::collection::vec(-10.0f32..10.0, 2),
        1..40,
    )) -> Vec<Vec<f32>> {
        points
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cluster_list_partitions_the_dataset(
        points in arb_points(),
        strategy in 0usize..5,
        use_bucket_size in any::<bool>(),
        bucket_size in 1usize..8,
        radius in 0.5f32..5.0,
        chunk_bucket in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let space = DenseSpaceF32::l2();
        let data = build_objects(&space, &points);
        let params = build_params(strategy, use_bucket_size, bucket_size, radius, chunk_bucket, seed);
        let index = ListClustersIndex::new(false, &space, &data, &params).unwrap();

        let mut seen: Vec<u32> = Vec::new();
        for cluster in index.clusters() {
            seen.push(cluster.center().id());
            seen.extend(cluster.members().map(|o| o.id()));
        }
        seen.sort_unstable();
        let expected: Vec<u32> = (0..data.len() as u32).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn covering_radii_are_tight(
        points in arb_points(),
        strategy in 0usize..5,
        use_bucket_size in any::<bool>(),
        bucket_size in 1usize..8,
        radius in 0.5f32..5.0,
        seed in any::<u64>(),
    ) {
        let space = DenseSpaceF32::l2();
        let data = build_objects(&space, &points);
        let params = build_params(strategy, use_bucket_size, bucket_size, radius, false, seed);
        let index = ListClustersIndex::new(false, &space, &data, &params).unwrap();

        for cluster in index.clusters() {
            let observed = cluster
                .members()
                .map(|o| space.index_time_distance(o.payload(), cluster.center().payload()))
                .fold(0.0f32, f32::max);
            prop_assert_eq!(observed, cluster.covering_radius());
        }
    }

    #[test]
    fn exact_range_equals_brute_force_filter(
        points in arb_points(),
        strategy in 0usize..5,
        use_bucket_size in any::<bool>(),
        bucket_size in 1usize..8,
        query_radius in 0.5f32..10.0,
        seed in any::<u64>(),
    ) {
        let space = DenseSpaceF32::l2();
        let data = build_objects(&space, &points);
        let params = build_params(strategy, use_bucket_size, bucket_size, 2.0, true, seed);
        let index = ListClustersIndex::new(false, &space, &data, &params).unwrap();

        let q = space.create_object(10_000, None, &[0.5, -0.5]);
        let mut query = RangeQuery::new(&space, &q, query_radius);
        index.search_range(&mut query);

        // Soundness: every reported pair is a true in-range distance.
        for &(object, d) in query.results() {
            prop_assert!(d <= query_radius);
            prop_assert_eq!(d, space.distance(q.payload(), object.payload()));
        }

        // Exactness under a symmetric non-negative distance.
        let mut returned: Vec<u32> = query.results().iter().map(|&(o, _)| o.id()).collect();
        returned.sort_unstable();
        let mut expected: Vec<u32> = data
            .iter()
            .filter(|o| space.distance(q.payload(), o.payload()) <= query_radius)
            .map(|o| o.id())
            .collect();
        expected.sort_unstable();
        prop_assert_eq!(returned, expected);
    }

    #[test]
    fn exact_knn_matches_brute_force(
        points in arb_points(),
        strategy in 0usize..5,
        bucket_size in 1usize..8,
        k in 1usize..6,
        seed in any::<u64>(),
    ) {
        let space = DenseSpaceF32::l2();
        let data = build_objects(&space, &points);
        let params = build_params(strategy, true, bucket_size, 2.0, true, seed);
        let index = ListClustersIndex::new(false, &space, &data, &params).unwrap();

        let q = space.create_object(10_000, None, &[1.0, 1.0]);
        let mut query = KnnQuery::new(&space, &q, k, 0.0);
        index.search_knn(&mut query);
        let results = query.sorted_results();

        // Bounded size: exactly min(k, n) results.
        prop_assert_eq!(results.len(), k.min(data.len()));

        // The returned distances are the k smallest overall.
        let mut all: Vec<f32> = data
            .iter()
            .map(|o| space.distance(q.payload(), o.payload()))
            .collect();
        all.sort_by(f32::total_cmp);
        let expected: Vec<f32> = all.into_iter().take(k).collect();
        let returned: Vec<f32> = results.iter().map(|&(_, d)| d).collect();
        prop_assert_eq!(returned, expected);
    }

    #[test]
    fn capped_search_stays_sound_and_bounded(
        points in arb_points(),
        strategy in 0usize..5,
        bucket_size in 1usize..8,
        k in 1usize..6,
        max_leaves in 0i64..4,
        seed in any::<u64>(),
    ) {
        let space = DenseSpaceF32::l2();
        let data = build_objects(&space, &points);
        let params = build_params(strategy, true, bucket_size, 2.0, true, seed)
            .set("maxLeavesToVisit", max_leaves);
        let index = ListClustersIndex::new(false, &space, &data, &params).unwrap();

        // Exercises the best-first traversal, including its internal
        // non-decreasing pop assertion.
        let q = space.create_object(10_000, None, &[-1.0, 2.0]);
        let mut query = KnnQuery::new(&space, &q, k, 0.0);
        index.search_knn(&mut query);
        let results = query.sorted_results();

        prop_assert!(results.len() <= k);
        for &(object, d) in &results {
            prop_assert_eq!(d, space.distance(q.payload(), object.payload()));
        }
    }
}
