//! Dense vector spaces.
//!
//! Payloads hold the little-endian encoding of the components. The
//! `f32` and `f64` variants are separate types so each can serve as the
//! distance value its index instance is compiled for.
//!
//! Mismatched payload lengths yield an infinite distance, so a
//! malformed pair is never selected as a neighbor.

use crate::object::Object;
use crate::space::Space;

/// Minkowski metric for dense spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenseMetric {
    /// Manhattan (L1) distance.
    L1,
    /// Euclidean (L2) distance.
    L2,
}

/// Dense vector space over `f32` components.
#[derive(Debug, Clone, Copy)]
pub struct DenseSpaceF32 {
    metric: DenseMetric,
}

impl DenseSpaceF32 {
    /// Manhattan-distance space.
    pub fn l1() -> Self {
        Self {
            metric: DenseMetric::L1,
        }
    }

    /// Euclidean-distance space.
    pub fn l2() -> Self {
        Self {
            metric: DenseMetric::L2,
        }
    }

    /// Encode components into an owned [`Object`].
    pub fn create_object(&self, id: u32, label: Option<i32>, components: &[f32]) -> Object {
        let mut payload = Vec::with_capacity(components.len() * 4);
        for c in components {
            payload.extend_from_slice(&c.to_le_bytes());
        }
        Object::new(id, label, payload)
    }
}

fn components_f32(payload: &[u8]) -> impl Iterator<Item = f32> + '_ {
    payload
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
}

impl Space<f32> for DenseSpaceF32 {
    fn distance(&self, a: &[u8], b: &[u8]) -> f32 {
        if a.len() != b.len() {
            return f32::INFINITY;
        }
        let pairs = components_f32(a).zip(components_f32(b));
        match self.metric {
            DenseMetric::L1 => pairs.map(|(x, y)| (x - y).abs()).sum(),
            DenseMetric::L2 => pairs
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
        }
    }

    fn name(&self) -> &'static str {
        match self.metric {
            DenseMetric::L1 => "l1",
            DenseMetric::L2 => "l2",
        }
    }
}

/// Dense vector space over `f64` components.
#[derive(Debug, Clone, Copy)]
pub struct DenseSpaceF64 {
    metric: DenseMetric,
}

impl DenseSpaceF64 {
    /// Manhattan-distance space.
    pub fn l1() -> Self {
        Self {
            metric: DenseMetric::L1,
        }
    }

    /// Euclidean-distance space.
    pub fn l2() -> Self {
        Self {
            metric: DenseMetric::L2,
        }
    }

    /// Encode components into an owned [`Object`].
    pub fn create_object(&self, id: u32, label: Option<i32>, components: &[f64]) -> Object {
        let mut payload = Vec::with_capacity(components.len() * 8);
        for c in components {
            payload.extend_from_slice(&c.to_le_bytes());
        }
        Object::new(id, label, payload)
    }
}

fn components_f64(payload: &[u8]) -> impl Iterator<Item = f64> + '_ {
    payload.chunks_exact(8).map(|c| {
        f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
    })
}

impl Space<f64> for DenseSpaceF64 {
    fn distance(&self, a: &[u8], b: &[u8]) -> f64 {
        if a.len() != b.len() {
            return f64::INFINITY;
        }
        let pairs = components_f64(a).zip(components_f64(b));
        match self.metric {
            DenseMetric::L1 => pairs.map(|(x, y)| (x - y).abs()).sum(),
            DenseMetric::L2 => pairs
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f64>()
                .sqrt(),
        }
    }

    fn name(&self) -> &'static str {
        match self.metric {
            DenseMetric::L1 => "l1",
            DenseMetric::L2 => "l2",
        }
    }
}
