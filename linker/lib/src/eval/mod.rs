//! Scoring of predicted notation graphs and of edge classifiers.

mod classification;
mod edges;
mod metric;
mod report;

use std::fmt::{Display, Formatter};

pub use classification::{
    evaluate_classification, evaluate_classification_by_class_pairs, flatten_class_pair_results,
    ClassificationResult,
};
pub use edges::{count_edges, evaluate_edges, EdgeEvaluation, EvaluationResult};
pub use metric::{Counts, Metric};
pub use report::{format_class_pair_report, ClassPairScores};

/// The class names of the two endpoints of an edge, used to split results by the kind of
/// relationship (e.g. `notehead-full -> stem`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassPair {
    pub from: String,
    pub to: String,
}

impl ClassPair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Display for ClassPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}__{}", self.from, self.to)
    }
}
