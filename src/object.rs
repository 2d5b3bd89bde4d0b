//! Opaque indexed data.
//!
//! An [`Object`] is an immutable blob: a stable numeric identifier, an
//! optional class label (for classification experiments), and payload
//! bytes that only a distance space knows how to interpret. The dataset
//! container owns the objects; indices and query accumulators hold
//! borrowed references and must not outlive it.

/// A single indexed datum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    id: u32,
    label: Option<i32>,
    payload: Box<[u8]>,
}

impl Object {
    /// Create an object from raw payload bytes.
    ///
    /// Most callers go through a space's typed constructor instead (e.g.
    /// [`DenseSpaceF32::create_object`](crate::space::DenseSpaceF32::create_object)),
    /// which encodes components into the payload for you.
    pub fn new(id: u32, label: Option<i32>, payload: impl Into<Box<[u8]>>) -> Self {
        Self {
            id,
            label,
            payload: payload.into(),
        }
    }

    /// Identifier, unique within a dataset.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Optional class label.
    pub fn label(&self) -> Option<i32> {
        self.label
    }

    /// Raw payload bytes, interpreted by the distance space.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// The authoritative dataset representation: an owned, ordered sequence
/// of objects. Indices borrow slices of this.
pub type ObjectVector = Vec<Object>;
