use std::{
    fmt::{Display, Formatter},
    ops::{Add, AddAssign},
};

/// A ratio such as precision or recall, which is undefined when its denominator is zero.
/// Undefined values are kept distinct from `0.0` all the way to the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Defined(f64),
    Undefined,
}

impl Metric {
    /// `numerator / denominator`, or [`Metric::Undefined`] if `denominator == 0`
    pub fn ratio(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            Metric::Undefined
        } else {
            Metric::Defined(numerator as f64 / denominator as f64)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Defined(v) => Some(v),
            Metric::Undefined => None,
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            // Pass the formatting options (e.g. `{:.3}`) through to the value
            Metric::Defined(v) => Display::fmt(v, f),
            Metric::Undefined => write!(f, "undefined"),
        }
    }
}

/// True positive, false positive and false negative counts of some set of binary decisions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Counts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl Counts {
    pub fn precision(&self) -> Metric {
        Metric::ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    pub fn recall(&self) -> Metric {
        Metric::ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    /// `2TP / (2TP + FP + FN)`, i.e. the harmonic mean of precision and recall
    pub fn f_score(&self) -> Metric {
        Metric::ratio(
            2 * self.true_positives,
            2 * self.true_positives + self.false_positives + self.false_negatives,
        )
    }

    /// The number of decisions which are counted (`TP + FP + FN`)
    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.false_negatives
    }
}

impl Add for Counts {
    type Output = Counts;

    fn add(self, rhs: Counts) -> Counts {
        Counts {
            true_positives: self.true_positives + rhs.true_positives,
            false_positives: self.false_positives + rhs.false_positives,
            false_negatives: self.false_negatives + rhs.false_negatives,
        }
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, rhs: Counts) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Counts {
    fn sum<I: Iterator<Item = Counts>>(iter: I) -> Counts {
        iter.fold(Counts::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(true_positives: usize, false_positives: usize, false_negatives: usize) -> Counts {
        Counts {
            true_positives,
            false_positives,
            false_negatives,
        }
    }

    #[test]
    fn ratio() {
        assert_eq!(Metric::ratio(1, 4), Metric::Defined(0.25));
        assert_eq!(Metric::ratio(0, 4), Metric::Defined(0.0));
        assert_eq!(Metric::ratio(0, 0), Metric::Undefined);
        assert_eq!(Metric::Undefined.value(), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{:.3}", Metric::Defined(2.0 / 3.0)), "0.667");
        assert_eq!(format!("{:.3}", Metric::Undefined), "undefined");
    }

    #[test]
    fn metrics() {
        let c = counts(6, 2, 4);
        assert_eq!(c.precision(), Metric::Defined(0.75));
        assert_eq!(c.recall(), Metric::Defined(0.6));
        assert_eq!(c.f_score(), Metric::Defined(12.0 / 18.0));
        assert_eq!(c.total(), 12);
    }

    #[test]
    fn undefined_metrics() {
        // Nothing predicted, one edge missed
        let c = counts(0, 0, 1);
        assert_eq!(c.precision(), Metric::Undefined);
        assert_eq!(c.recall(), Metric::Defined(0.0));
        assert_eq!(c.f_score(), Metric::Defined(0.0));
        // Nothing at all
        let c = Counts::default();
        assert_eq!(c.precision(), Metric::Undefined);
        assert_eq!(c.recall(), Metric::Undefined);
        assert_eq!(c.f_score(), Metric::Undefined);
    }

    #[test]
    fn sum() {
        let total: Counts = vec![counts(1, 2, 3), counts(10, 0, 1)].into_iter().sum();
        assert_eq!(total, counts(11, 2, 4));
    }
}
