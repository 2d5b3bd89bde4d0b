//! k-nearest-neighbor queries.
//!
//! The accumulator is a bounded max-heap of size `k` keyed on distance:
//! its top is always the worst admitted candidate, so the heap holds
//! the k smallest distances seen. The admission bound is
//! `top / (1 + eps)`; a positive `eps` trades recall for fewer bucket
//! scans (approximate search). Equal-distance ties break by insertion
//! order, older wins.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::object::Object;
use crate::query::Query;
use crate::space::{DistanceValue, Space};

#[derive(Clone, Copy)]
struct QueueEntry<'a, D: DistanceValue> {
    distance: D,
    /// Insertion sequence; of two equal distances the newer entry is
    /// the greater, so it is evicted first.
    seq: u64,
    object: &'a Object,
}

impl<D: DistanceValue> PartialEq for QueueEntry<'_, D> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<D: DistanceValue> Eq for QueueEntry<'_, D> {}

impl<D: DistanceValue> PartialOrd for QueueEntry<'_, D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<D: DistanceValue> Ord for QueueEntry<'_, D> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_order(&other.distance)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Bounded max-heap of candidate neighbors.
///
/// Cloneable so that a composer can drain a snapshot without mutating
/// the live query. [`pop`](KnnQueue::pop) yields entries worst-first.
#[derive(Clone)]
pub struct KnnQueue<'a, D: DistanceValue> {
    capacity: usize,
    heap: BinaryHeap<QueueEntry<'a, D>>,
    next_seq: u64,
}

impl<'a, D: DistanceValue> KnnQueue<'a, D> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
            next_seq: 0,
        }
    }

    /// Insert, replacing the current worst when full and the candidate
    /// improves on it.
    fn admit(&mut self, distance: D, object: &'a Object) {
        let entry = QueueEntry {
            distance,
            seq: self.next_seq,
            object,
        };
        self.next_seq += 1;

        if self.heap.len() < self.capacity {
            self.heap.push(entry);
        } else if let Some(top) = self.heap.peek() {
            if entry.distance.total_order(&top.distance) == Ordering::Less {
                self.heap.pop();
                self.heap.push(entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Distance of the worst admitted candidate.
    pub fn top_distance(&self) -> Option<D> {
        self.heap.peek().map(|e| e.distance)
    }

    /// The worst admitted candidate.
    pub fn top_object(&self) -> Option<&'a Object> {
        self.heap.peek().map(|e| e.object)
    }

    /// Remove and return the worst admitted candidate.
    pub fn pop(&mut self) -> Option<(&'a Object, D)> {
        self.heap.pop().map(|e| (e.object, e.distance))
    }
}

/// Accumulator for a k-nearest-neighbor query.
pub struct KnnQuery<'a, D: DistanceValue> {
    space: &'a dyn Space<D>,
    query_object: &'a Object,
    k: usize,
    eps: f32,
    queue: KnnQueue<'a, D>,
    distance_computations: u64,
}

impl<'a, D: DistanceValue> KnnQuery<'a, D> {
    /// `k` must be positive and `eps` non-negative; `eps = 0` requests
    /// the exact k-nearest result.
    pub fn new(space: &'a dyn Space<D>, query_object: &'a Object, k: usize, eps: f32) -> Self {
        assert!(k >= 1, "k must be positive");
        assert!(eps >= 0.0, "eps must be non-negative");
        Self {
            space,
            query_object,
            k,
            eps,
            queue: KnnQueue::new(k),
            distance_computations: 0,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn eps(&self) -> f32 {
        self.eps
    }

    /// The live candidate queue. Clone it to drain a snapshot.
    pub fn queue(&self) -> &KnnQueue<'a, D> {
        &self.queue
    }

    /// Admitted `(object, distance)` pairs, best first; equal distances
    /// keep insertion order.
    pub fn sorted_results(&self) -> Vec<(&'a Object, D)> {
        let mut snapshot = self.queue.clone();
        let mut results = Vec::with_capacity(snapshot.len());
        while let Some(pair) = snapshot.pop() {
            results.push(pair);
        }
        results.reverse();
        results
    }
}

impl<'a, D: DistanceValue> Query<'a, D> for KnnQuery<'a, D> {
    fn query_object(&self) -> &'a Object {
        self.query_object
    }

    fn radius(&self) -> D {
        if self.queue.len() < self.k {
            return D::MAX_VALUE;
        }
        match self.queue.top_distance() {
            Some(top) => top.shrink_by(self.eps),
            None => D::MAX_VALUE,
        }
    }

    fn distance_to_payload(&mut self, payload: &[u8]) -> D {
        self.distance_computations += 1;
        self.space.distance(self.query_object.payload(), payload)
    }

    fn check_and_add(&mut self, distance: D, object: &'a Object) {
        if distance.total_order(&self.radius()) == Ordering::Less {
            self.queue.admit(distance, object);
        }
    }

    fn add_distance_computations(&mut self, n: u64) {
        self.distance_computations += n;
    }

    fn distance_computations(&self) -> u64 {
        self.distance_computations
    }
}
