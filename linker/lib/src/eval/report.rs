//! Plain-text reports of per-class-pair results.

use std::{collections::BTreeMap, fmt::Write};

use itertools::Itertools;

use super::{ClassPair, ClassificationResult, EvaluationResult, Metric};

/// Any result which can be shown in a class-pair report
pub trait ClassPairScores {
    fn f_score(&self) -> Metric;
    fn recall(&self) -> Metric;
    fn precision(&self) -> Metric;
    fn support(&self) -> usize;
}

impl ClassPairScores for EvaluationResult {
    fn f_score(&self) -> Metric {
        self.f_score
    }

    fn recall(&self) -> Metric {
        self.recall
    }

    fn precision(&self) -> Metric {
        self.precision
    }

    fn support(&self) -> usize {
        self.support
    }
}

impl ClassPairScores for ClassificationResult {
    fn f_score(&self) -> Metric {
        self.f_score
    }

    fn recall(&self) -> Metric {
        self.recall
    }

    fn precision(&self) -> Metric {
        self.precision
    }

    fn support(&self) -> usize {
        self.support
    }
}

/// Formats per-class-pair results, most supported first, leaving out class pairs with less than
/// `min_support`.  Each class pair is written like:
/// ```text
/// notehead-full__stem__f-score 0.98
/// notehead-full__stem__recall 0.97
/// notehead-full__stem__precision 0.99
/// notehead-full__stem__support 1203
/// ---------
/// ```
pub fn format_class_pair_report<R: ClassPairScores>(
    results: &BTreeMap<ClassPair, R>,
    min_support: usize,
) -> String {
    let ordered = results
        .iter()
        .filter(|(_, r)| r.support() >= min_support)
        // Sorting is stable, so equal supports stay in key order
        .sorted_by_key(|(_, r)| std::cmp::Reverse(r.support()));

    let mut s = String::new();
    for (class_pair, r) in ordered {
        // Writing to a `String` can't fail
        writeln!(s, "{}__f-score {}", class_pair, value_string(r.f_score())).unwrap();
        writeln!(s, "{}__recall {}", class_pair, value_string(r.recall())).unwrap();
        writeln!(s, "{}__precision {}", class_pair, value_string(r.precision())).unwrap();
        writeln!(s, "{}__support {}", class_pair, r.support()).unwrap();
        s.push_str("---------\n");
    }
    s
}

/// The shortest string which parses back to the same value, always with a decimal point (so `1.0`
/// rather than `1`)
fn value_string(metric: Metric) -> String {
    match metric.value() {
        Some(v) => format!("{:?}", v),
        None => Metric::Undefined.to_string(),
    }
}
