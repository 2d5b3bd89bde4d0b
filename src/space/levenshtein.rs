//! Byte-level edit distance.
//!
//! The classic integer-valued space: the minimum number of single-byte
//! insertions, deletions, and substitutions turning one payload into
//! the other. Metric, but far from Euclidean; it exercises the `i32`
//! distance variant.

use crate::object::Object;
use crate::space::Space;

/// Levenshtein distance over raw payload bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinSpace;

impl LevenshteinSpace {
    /// Encode a string into an owned [`Object`].
    pub fn create_object(&self, id: u32, label: Option<i32>, text: &str) -> Object {
        Object::new(id, label, text.as_bytes())
    }
}

impl Space<i32> for LevenshteinSpace {
    fn distance(&self, a: &[u8], b: &[u8]) -> i32 {
        if a.is_empty() {
            return b.len() as i32;
        }
        if b.is_empty() {
            return a.len() as i32;
        }

        // Two-row dynamic program.
        let mut prev: Vec<i32> = (0..=b.len() as i32).collect();
        let mut curr = vec![0i32; b.len() + 1];

        for (i, &ca) in a.iter().enumerate() {
            curr[0] = i as i32 + 1;
            for (j, &cb) in b.iter().enumerate() {
                let substitution = prev[j] + i32::from(ca != cb);
                let deletion = prev[j + 1] + 1;
                let insertion = curr[j] + 1;
                curr[j + 1] = substitution.min(deletion).min(insertion);
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        prev[b.len()]
    }

    fn name(&self) -> &'static str {
        "leven"
    }
}
