//! Code for aligning the objects of a predicted document with those of a reference document.

use std::collections::HashMap;

use mungframe::{DetectedObject, ObjId};

/// The IoU which two objects have to **exceed** in order to be considered the same symbol
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.7;

/// A predicted object which was found to denote the same symbol as a reference object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchedPair {
    pub predicted: ObjId,
    pub reference: ObjId,
}

/// Decides whether a predicted object and a reference object denote the same physical symbol.
/// They do iff they have the same class name and the IoU of their boxes is strictly greater than
/// `threshold`.
pub fn objects_match(
    predicted: &DetectedObject,
    reference: &DetectedObject,
    threshold: f64,
) -> bool {
    if predicted.class_name() != reference.class_name() {
        return false;
    }
    match predicted.bbox().overlap_iou(reference.bbox()) {
        Some(iou) => iou > threshold,
        None => false, // Boxes don't share a single pixel
    }
}

/// Tests every predicted object against every reference object, returning every pair which
/// [match](objects_match).  Pairs are returned in predicted-major order.
///
/// This isn't a bijection: if a predicted object overlaps several reference objects of its class
/// above `threshold`, then it will appear in several pairs (and likewise for reference objects).
pub fn matching_pairs(
    predicted: &[DetectedObject],
    reference: &[DetectedObject],
    threshold: f64,
) -> Vec<MatchedPair> {
    let mut pairs = Vec::new();
    for p_obj in predicted {
        for r_obj in reference {
            if objects_match(p_obj, r_obj, threshold) {
                log::debug!("Match: {} ~ {}", p_obj.id(), r_obj.id());
                pairs.push(MatchedPair {
                    predicted: p_obj.id(),
                    reference: r_obj.id(),
                });
            }
        }
    }
    pairs
}

/// The matched pairs between a predicted and a reference document, along with lookups in both
/// directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    pairs: Vec<MatchedPair>,
    predicted_to_reference: HashMap<ObjId, ObjId>,
    reference_to_predicted: HashMap<ObjId, ObjId>,
}

impl Matching {
    /// Match every predicted object against every reference object
    pub fn new(predicted: &[DetectedObject], reference: &[DetectedObject], threshold: f64) -> Self {
        let matching = Self::from_pairs(matching_pairs(predicted, reference, threshold));
        log::debug!(
            "Matched {} pairs between {} predicted and {} reference objects",
            matching.len(),
            predicted.len(),
            reference.len()
        );
        matching
    }

    /// Builds the lookups for a given list of pairs.  If an id occurs in several pairs, then the
    /// pair which comes **last** determines what that id maps to.
    pub fn from_pairs(pairs: Vec<MatchedPair>) -> Self {
        let mut predicted_to_reference = HashMap::new();
        let mut reference_to_predicted = HashMap::new();
        for pair in &pairs {
            predicted_to_reference.insert(pair.predicted, pair.reference);
            reference_to_predicted.insert(pair.reference, pair.predicted);
        }
        Self {
            pairs,
            predicted_to_reference,
            reference_to_predicted,
        }
    }

    /// A `Matching` where every id is matched with itself
    pub fn identity(ids: impl IntoIterator<Item = ObjId>) -> Self {
        Self::from_pairs(
            ids.into_iter()
                .map(|id| MatchedPair {
                    predicted: id,
                    reference: id,
                })
                .collect(),
        )
    }

    pub fn pairs(&self) -> &[MatchedPair] {
        &self.pairs
    }

    pub fn reference_for(&self, predicted: ObjId) -> Option<ObjId> {
        self.predicted_to_reference.get(&predicted).copied()
    }

    pub fn predicted_for(&self, reference: ObjId) -> Option<ObjId> {
        self.reference_to_predicted.get(&reference).copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
