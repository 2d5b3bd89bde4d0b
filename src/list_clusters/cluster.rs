//! A single spherical cluster.

use crate::object::Object;
use crate::query::Query;
use crate::space::DistanceValue;

/// Center, covering radius, and member bucket (center excluded).
///
/// Every member was observed at build time to lie within
/// `covering_radius` of the center; the radius is the maximum such
/// distance, zero for a singleton.
pub struct Cluster<'a, D: DistanceValue> {
    center: &'a Object,
    covering_radius: D,
    bucket: Bucket<'a>,
}

enum Bucket<'a> {
    Plain(Vec<&'a Object>),
    /// Members re-laid out for scan locality: a compact reference table
    /// plus every payload packed into a single arena. Distances are
    /// computed against the arena; results still submit the stable
    /// dataset references.
    Chunked {
        refs: Box<[&'a Object]>,
        arena: Box<[u8]>,
        spans: Box<[(u32, u32)]>,
    },
}

impl<'a, D: DistanceValue> Cluster<'a, D> {
    pub(crate) fn new(center: &'a Object) -> Self {
        Self {
            center,
            covering_radius: D::ZERO,
            bucket: Bucket::Plain(Vec::new()),
        }
    }

    pub(crate) fn add_object(&mut self, object: &'a Object, distance: D) {
        match &mut self.bucket {
            Bucket::Plain(members) => members.push(object),
            Bucket::Chunked { .. } => panic!("bucket modified after optimization"),
        }
        if self.covering_radius < distance {
            self.covering_radius = distance;
        }
    }

    pub fn center(&self) -> &'a Object {
        self.center
    }

    pub fn covering_radius(&self) -> D {
        self.covering_radius
    }

    /// Number of bucket members (the center is not counted).
    pub fn len(&self) -> usize {
        match &self.bucket {
            Bucket::Plain(members) => members.len(),
            Bucket::Chunked { refs, .. } => refs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bucket members in insertion order.
    pub fn members(&self) -> impl Iterator<Item = &'a Object> + '_ {
        match &self.bucket {
            Bucket::Plain(members) => members.iter().copied(),
            Bucket::Chunked { refs, .. } => refs.iter().copied(),
        }
    }

    /// Repack the bucket: an exact-size reference table plus all member
    /// payloads concatenated into one arena. Logical contents are
    /// unchanged.
    pub(crate) fn optimize_bucket(&mut self) {
        if let Bucket::Plain(members) = &mut self.bucket {
            let refs: Box<[&'a Object]> = std::mem::take(members).into_boxed_slice();
            let total: usize = refs.iter().map(|o| o.payload().len()).sum();
            let mut arena = Vec::with_capacity(total);
            let mut spans = Vec::with_capacity(refs.len());
            for object in refs.iter() {
                let offset = arena.len() as u32;
                arena.extend_from_slice(object.payload());
                spans.push((offset, object.payload().len() as u32));
            }
            self.bucket = Bucket::Chunked {
                refs,
                arena: arena.into_boxed_slice(),
                spans: spans.into_boxed_slice(),
            };
        }
    }

    /// Submit every bucket member to the accumulator.
    pub(crate) fn search<Q: Query<'a, D>>(&self, query: &mut Q) {
        match &self.bucket {
            Bucket::Plain(members) => {
                for &object in members {
                    query.check_and_add_computing(object);
                }
            }
            Bucket::Chunked { refs, arena, spans } => {
                for (&object, &(offset, len)) in refs.iter().zip(spans.iter()) {
                    let payload = &arena[offset as usize..(offset + len) as usize];
                    let d = query.distance_to_payload(payload);
                    query.check_and_add(d, object);
                }
            }
        }
    }
}
