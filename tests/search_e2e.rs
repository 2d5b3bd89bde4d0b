//! End-to-end searches over the list-of-clusters index.
//!
//! Uses small 1-D line datasets where every expected result can be
//! worked out by hand, plus deterministic center strategies where the
//! traversal order itself is under test.

use proxima::list_clusters::ListClustersIndex;
use proxima::space::DenseSpaceF32;
use proxima::{Index, KnnQuery, Object, Params, Query, RangeQuery};

fn line_dataset(space: &DenseSpaceF32, values: &[f32]) -> Vec<Object> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| space.create_object(i as u32, None, &[v]))
        .collect()
}

fn result_ids(pairs: &[(&Object, f32)]) -> Vec<u32> {
    pairs.iter().map(|&(o, _)| o.id()).collect()
}

#[test]
fn trivial_exact_range() {
    let space = DenseSpaceF32::l2();
    let data = line_dataset(&space, &[0.0, 5.0, 10.0]);
    let params = Params::new()
        .set("useBucketSize", false)
        .set("radius", 100.0)
        .set("strategy", "random");
    let index = ListClustersIndex::new(false, &space, &data, &params).unwrap();

    let q = space.create_object(99, None, &[4.0]);
    let mut query = RangeQuery::new(&space, &q, 2.0f32);
    index.search_range(&mut query);

    // Only the point at 5 lies within distance 2 of 4.
    assert_eq!(result_ids(query.results()), vec![1]);
    assert_eq!(query.results()[0].1, 1.0);
}

#[test]
fn knn_two_nearest() {
    let space = DenseSpaceF32::l2();
    let data = line_dataset(&space, &[0.0, 5.0, 10.0]);
    let params = Params::new()
        .set("useBucketSize", false)
        .set("radius", 100.0);
    let index = ListClustersIndex::new(false, &space, &data, &params).unwrap();

    let q = space.create_object(99, None, &[4.0]);
    let mut query = KnnQuery::new(&space, &q, 2, 0.0);
    index.search_knn(&mut query);

    let results = query.sorted_results();
    assert_eq!(
        results.iter().map(|&(o, d)| (o.id(), d)).collect::<Vec<_>>(),
        vec![(1, 1.0), (0, 4.0)]
    );
}

#[test]
fn containment_prune_scans_one_cluster() {
    let space = DenseSpaceF32::l2();
    let data = line_dataset(&space, &[0.0, 1.0, 2.0, 3.0, 4.0]);
    let params = Params::new()
        .set("useBucketSize", true)
        .set("bucketSize", 4)
        .set("strategy", "farthestPrevCenter");
    let index = ListClustersIndex::new(false, &space, &data, &params).unwrap();

    // One cluster: center 4, the other four points in its bucket.
    assert_eq!(index.cluster_qty(), 1);
    assert_eq!(index.clusters()[0].covering_radius(), 4.0);

    let q = space.create_object(99, None, &[1.0]);
    let mut query = RangeQuery::new(&space, &q, 0.5f32);
    index.search_range(&mut query);

    assert_eq!(result_ids(query.results()), vec![1]);
    // One center evaluation plus four bucket members.
    assert_eq!(query.distance_computations(), 5);
}

#[test]
fn containment_prune_skips_later_clusters() {
    let space = DenseSpaceF32::l2();
    let values: Vec<f32> = (0..10).map(|v| v as f32).collect();
    let data = line_dataset(&space, &values);
    let params = Params::new()
        .set("bucketSize", 4)
        .set("strategy", "closestPrevCenter");
    let index = ListClustersIndex::new(false, &space, &data, &params).unwrap();

    // closestPrevCenter takes the pool front every round: a cluster at
    // 0 holding {1,2,3,4}, then one at 5 holding {6,7,8,9}.
    assert_eq!(index.cluster_qty(), 2);

    let q = space.create_object(99, None, &[1.0]);
    let mut query = RangeQuery::new(&space, &q, 0.5f32);
    index.search_range(&mut query);

    assert_eq!(result_ids(query.results()), vec![1]);
    // The ball around 1 sits strictly inside the first cluster's
    // sphere, so the second cluster is never touched: one center plus
    // four members.
    assert_eq!(query.distance_computations(), 5);
}

#[test]
fn closest_prev_center_build_covers_every_object() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let space = DenseSpaceF32::l2();
    let mut rng = StdRng::seed_from_u64(7);
    let data: Vec<Object> = (0..100)
        .map(|i| {
            let point = [rng.gen::<f32>() * 10.0, rng.gen::<f32>() * 10.0];
            space.create_object(i, None, &point)
        })
        .collect();

    let params = Params::new()
        .set("strategy", "closestPrevCenter")
        .set("bucketSize", 5);
    let index = ListClustersIndex::new(false, &space, &data, &params).unwrap();

    // Every object is a center or a member of exactly one cluster.
    let mut seen: Vec<u32> = Vec::new();
    for cluster in index.clusters() {
        seen.push(cluster.center().id());
        seen.extend(cluster.members().map(|o| o.id()));
    }
    seen.sort_unstable();
    let expected: Vec<u32> = (0..100).collect();
    assert_eq!(seen, expected);
    assert!(index.cluster_qty() >= 100 / 6);
}

#[test]
fn approximate_truncation_single_cluster() {
    let space = DenseSpaceF32::l2();
    let values: Vec<f32> = (0..20).map(|v| v as f32).collect();
    let data = line_dataset(&space, &values);
    let params = Params::new()
        .set("useBucketSize", false)
        .set("radius", 100.0)
        .set("maxLeavesToVisit", 1);
    let index = ListClustersIndex::new(false, &space, &data, &params).unwrap();

    // A single cluster covers everything, so one leaf visit already
    // sees the whole dataset and the capped search is exact.
    let q = space.create_object(99, None, &[7.2]);
    let mut query = KnnQuery::new(&space, &q, 3, 0.0);
    index.search_knn(&mut query);

    let ids = result_ids(&query.sorted_results());
    assert_eq!(ids, vec![7, 8, 6]);
}

#[test]
fn approximate_truncation_is_a_subset_of_exact() {
    let space = DenseSpaceF32::l2();
    let values: Vec<f32> = (0..20).map(|v| v as f32).collect();
    let data = line_dataset(&space, &values);
    let params = Params::new()
        .set("bucketSize", 4)
        .set("strategy", "closestPrevCenter")
        .set("maxLeavesToVisit", 1);
    let mut index = ListClustersIndex::new(false, &space, &data, &params).unwrap();

    let q = space.create_object(99, None, &[2.0]);
    let mut capped = KnnQuery::new(&space, &q, 3, 0.0);
    index.search_knn(&mut capped);
    let capped_ids = result_ids(&capped.sorted_results());

    // All centers are submitted while collecting candidate clusters,
    // and the closest cluster (center 0, bucket {1,2,3,4}) is the one
    // leaf scanned.
    assert_eq!(capped_ids, vec![2, 1, 3]);

    // Lifting the cap switches back to exact mode.
    index
        .set_query_time_params(&Params::new().set("maxLeavesToVisit", -1))
        .unwrap();
    let mut exact = KnnQuery::new(&space, &q, 3, 0.0);
    index.search_knn(&mut exact);
    let exact_ids = result_ids(&exact.sorted_results());

    assert_eq!(exact_ids.len(), 3);
    assert!(capped_ids.iter().all(|id| exact_ids.contains(id)));
}
