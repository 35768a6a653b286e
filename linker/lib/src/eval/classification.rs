//! Binary classification metrics for the pairwise decisions of an edge classifier.

use std::collections::BTreeMap;

use itertools::Itertools;
use mungframe::DetectedObject;

use crate::{Error, Result};

use super::{ClassPair, Counts, Metric};

/// Accuracy, and precision/recall/F-score of the positive class, for a set of binary decisions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub counts: Counts,
    pub true_negatives: usize,
    pub accuracy: Metric,
    pub precision: Metric,
    pub recall: Metric,
    pub f_score: Metric,
    /// Total number of examples, positive and negative
    pub support: usize,
    /// Number of examples whose true label is positive
    pub positive_support: usize,
}

impl ClassificationResult {
    fn new(counts: Counts, true_negatives: usize) -> Self {
        let support = counts.total() + true_negatives;
        Self {
            counts,
            true_negatives,
            accuracy: Metric::ratio(counts.true_positives + true_negatives, support),
            precision: counts.precision(),
            recall: counts.recall(),
            f_score: counts.f_score(),
            support,
            positive_support: counts.true_positives + counts.false_negatives,
        }
    }
}

/// Scores `predicted` labels against `truth`, where `true` is the positive class (i.e. 'has an
/// edge').  Both slices must have the same length.
pub fn evaluate_classification(predicted: &[bool], truth: &[bool]) -> Result<ClassificationResult> {
    check_lengths(predicted.len(), truth.len())?;
    let mut counts = Counts::default();
    let mut true_negatives = 0;
    for (&pred, &tru) in predicted.iter().zip_eq(truth) {
        match (pred, tru) {
            (true, true) => counts.true_positives += 1,
            (true, false) => counts.false_positives += 1,
            (false, true) => counts.false_negatives += 1,
            (false, false) => true_negatives += 1,
        }
    }
    Ok(ClassificationResult::new(counts, true_negatives))
}

/// Scores the decisions on each `(from, to)` object pair separately for each [`ClassPair`].
/// Class pairs with fewer than `min_support` examples (positive plus negative) are left out.
pub fn evaluate_classification_by_class_pairs(
    pairs: &[(&DetectedObject, &DetectedObject)],
    predicted: &[bool],
    truth: &[bool],
    min_support: usize,
) -> Result<BTreeMap<ClassPair, ClassificationResult>> {
    check_lengths(predicted.len(), truth.len())?;
    check_lengths(pairs.len(), truth.len())?;

    let class_pair_index = pairs
        .iter()
        .enumerate()
        .map(|(i, (from, to))| (ClassPair::new(from.class_name(), to.class_name()), i))
        .into_group_map();

    let mut results = BTreeMap::new();
    for (class_pair, indices) in class_pair_index {
        let cp_predicted = indices.iter().map(|&i| predicted[i]).collect_vec();
        let cp_truth = indices.iter().map(|&i| truth[i]).collect_vec();
        let result = evaluate_classification(&cp_predicted, &cp_truth)?;
        if result.support < min_support {
            continue;
        }
        results.insert(class_pair, result);
    }
    Ok(results)
}

/// Flattens per-class-pair results into a single-level map, with keys like
/// `notehead-full__stem__f-score`.
pub fn flatten_class_pair_results(
    results: &BTreeMap<ClassPair, ClassificationResult>,
) -> BTreeMap<String, Metric> {
    let mut flat = BTreeMap::new();
    for (class_pair, result) in results {
        let values = [
            ("recall", result.recall),
            ("precision", result.precision),
            ("f-score", result.f_score),
            ("support", Metric::Defined(result.support as f64)),
        ];
        for (name, value) in values {
            flat.insert(format!("{}__{}", class_pair, name), value);
        }
    }
    flat
}

fn check_lengths(predicted: usize, truth: usize) -> Result<()> {
    if predicted != truth {
        return Err(Error::LengthMismatch { predicted, truth });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use mungframe::{BoundingBox, ObjId};

    use super::*;

    fn obj(id: u32, class_name: &str) -> DetectedObject {
        DetectedObject::new(ObjId::new(id), class_name, BoundingBox::new(0, 0, 9, 9))
    }

    fn labels(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == '1').collect_vec()
    }

    #[test]
    fn binary_metrics() {
        let predicted = labels("1110000100");
        let truth = labels("1100110000");
        let result = evaluate_classification(&predicted, &truth).unwrap();
        assert_eq!(result.counts.true_positives, 2);
        assert_eq!(result.counts.false_positives, 2);
        assert_eq!(result.counts.false_negatives, 2);
        assert_eq!(result.true_negatives, 4);
        assert_eq!(result.accuracy, Metric::Defined(0.6));
        assert_eq!(result.precision, Metric::Defined(0.5));
        assert_eq!(result.recall, Metric::Defined(0.5));
        assert_eq!(result.f_score, Metric::Defined(0.5));
        assert_eq!(result.support, 10);
        assert_eq!(result.positive_support, 4);
    }

    #[test]
    fn no_positive_predictions() {
        let result = evaluate_classification(&labels("000"), &labels("010")).unwrap();
        assert_eq!(result.precision, Metric::Undefined);
        assert_eq!(result.recall, Metric::Defined(0.0));
        assert_eq!(result.accuracy, Metric::Defined(2.0 / 3.0));

        let empty = evaluate_classification(&[], &[]).unwrap();
        assert_eq!(empty.accuracy, Metric::Undefined);
        assert_eq!(empty.f_score, Metric::Undefined);
        assert_eq!(empty.support, 0);
    }

    #[test]
    fn length_mismatch() {
        assert_eq!(
            evaluate_classification(&labels("01"), &labels("011")),
            Err(Error::LengthMismatch {
                predicted: 2,
                truth: 3
            })
        );
    }

    #[test]
    fn by_class_pairs() {
        let notehead = obj(0, "notehead-full");
        let stem = obj(1, "stem");
        let beam = obj(2, "beam");
        let pairs = vec![
            (&notehead, &stem),
            (&notehead, &stem),
            (&notehead, &stem),
            (&stem, &beam),
            (&stem, &beam),
        ];
        let predicted = labels("10110");
        let truth = labels("11010");

        let results =
            evaluate_classification_by_class_pairs(&pairs, &predicted, &truth, 0).unwrap();
        let nh_stem = &results[&ClassPair::new("notehead-full", "stem")];
        assert_eq!(nh_stem.support, 3);
        assert_eq!(nh_stem.precision, Metric::Defined(0.5));
        assert_eq!(nh_stem.recall, Metric::Defined(0.5));
        let stem_beam = &results[&ClassPair::new("stem", "beam")];
        assert_eq!(stem_beam.support, 2);
        assert_eq!(stem_beam.f_score, Metric::Defined(1.0));

        // Class pairs need enough support to be kept
        let results =
            evaluate_classification_by_class_pairs(&pairs, &predicted, &truth, 3).unwrap();
        assert_eq!(
            results.keys().collect_vec(),
            vec![&ClassPair::new("notehead-full", "stem")]
        );

        let flat = flatten_class_pair_results(&results);
        assert_eq!(flat.len(), 4);
        assert_eq!(flat["notehead-full__stem__support"], Metric::Defined(3.0));
        assert_eq!(flat["notehead-full__stem__f-score"], Metric::Defined(0.5));
    }
}
