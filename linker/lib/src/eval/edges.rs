//! Edge-level scoring of a predicted graph against a reference graph.

use std::collections::BTreeMap;

use mungframe::{GraphError, NotationGraph, ObjId};

use crate::{Matching, Result};

use super::{ClassPair, Counts, Metric};

/// Precision, recall and F-score of one set of [`Counts`].  This is a plain value; it never
/// changes after being computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationResult {
    pub counts: Counts,
    pub precision: Metric,
    pub recall: Metric,
    pub f_score: Metric,
    /// How many edges contributed to this result (`TP + FP + FN`)
    pub support: usize,
}

impl From<Counts> for EvaluationResult {
    fn from(counts: Counts) -> Self {
        Self {
            counts,
            precision: counts.precision(),
            recall: counts.recall(),
            f_score: counts.f_score(),
            support: counts.total(),
        }
    }
}

/// The result of scoring every edge of a predicted graph against a reference graph
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeEvaluation {
    pub overall: EvaluationResult,
    /// Results for every [`ClassPair`] with enough support
    pub by_class_pair: BTreeMap<ClassPair, EvaluationResult>,
}

/// Counts the correct, spurious and missing edges of `predicted` with respect to `reference`,
/// overall and split by [`ClassPair`].  Only class pairs with `support >= min_support` are kept in
/// the breakdown; the overall result always counts every edge.
pub fn evaluate_edges(
    reference: &NotationGraph,
    predicted: &NotationGraph,
    matching: &Matching,
    min_support: usize,
) -> Result<EdgeEvaluation> {
    let by_class_pair = count_edges_by_class_pair(reference, predicted, matching)?;
    let overall: Counts = by_class_pair.values().copied().sum();
    log::debug!(
        "Edge counts: {} TP, {} FP, {} FN over {} class pairs",
        overall.true_positives,
        overall.false_positives,
        overall.false_negatives,
        by_class_pair.len()
    );
    Ok(EdgeEvaluation {
        overall: EvaluationResult::from(overall),
        by_class_pair: filter_by_support(by_class_pair, min_support),
    })
}

/// Counts the correct, spurious and missing edges of `predicted`, ignoring class pairs
pub fn count_edges(
    reference: &NotationGraph,
    predicted: &NotationGraph,
    matching: &Matching,
) -> Result<Counts> {
    Ok(count_edges_by_class_pair(reference, predicted, matching)?
        .into_values()
        .sum())
}

/// For every matched pair `(p, r)`:
/// - every edge `p -> p2` is a true positive if `p2` is matched to some `r2` where `r -> r2`, and
///   a false positive otherwise (including when `p2` has no match at all).
/// - every edge `r -> r2` is a false negative unless `r2` is matched to some `p2` where `p -> p2`.
///
/// Edges are bucketed by the class names of their endpoints, using the reference object's class
/// wherever one is matched.
fn count_edges_by_class_pair(
    reference: &NotationGraph,
    predicted: &NotationGraph,
    matching: &Matching,
) -> Result<BTreeMap<ClassPair, Counts>> {
    let mut buckets = BTreeMap::<ClassPair, Counts>::new();

    for pair in matching.pairs() {
        let p_obj = lookup(predicted, pair.predicted)?;
        let r_obj = lookup(reference, pair.reference)?;

        // Check TP and FP (from predicted to reference)
        for &p_to in p_obj.outlinks() {
            let r_to = matching.reference_for(p_to);
            let to_class = match r_to.and_then(|id| reference.get(id)) {
                Some(r_to_obj) => r_to_obj.class_name(),
                None => lookup(predicted, p_to)?.class_name(),
            };
            let bucket = buckets
                .entry(ClassPair::new(r_obj.class_name(), to_class))
                .or_default();
            if r_to.is_some_and(|id| r_obj.outlinks().contains(&id)) {
                log::trace!("TP: {} ~ {}, edge to {}", pair.predicted, pair.reference, p_to);
                bucket.true_positives += 1;
            } else {
                bucket.false_positives += 1;
            }
        }

        // Check FN (from reference to predicted)
        for &r_to in r_obj.outlinks() {
            let p_to = matching.predicted_for(r_to);
            if !p_to.is_some_and(|id| p_obj.outlinks().contains(&id)) {
                let to_class = lookup(reference, r_to)?.class_name();
                buckets
                    .entry(ClassPair::new(r_obj.class_name(), to_class))
                    .or_default()
                    .false_negatives += 1;
            }
        }
    }

    Ok(buckets)
}

fn filter_by_support(
    buckets: BTreeMap<ClassPair, Counts>,
    min_support: usize,
) -> BTreeMap<ClassPair, EvaluationResult> {
    buckets
        .into_iter()
        .map(|(class_pair, counts)| (class_pair, EvaluationResult::from(counts)))
        .filter(|(_, result)| result.support >= min_support)
        .collect()
}

fn lookup(graph: &NotationGraph, id: ObjId) -> Result<&mungframe::DetectedObject> {
    Ok(graph.get(id).ok_or(GraphError::UnknownNode(id))?)
}
