//! Strategies for reducing per-file coverage to the single line-rate shown
//! at the document and package level.

use clap::ValueEnum;

use crate::model::{rate, CoverageRecord};

/// Reduces a sequence of records to one overall coverage figure.
pub trait Aggregator {
    fn aggregate(&self, records: &[CoverageRecord]) -> f64;
}

/// Multiplies every per-file coverage value together, seeded with 1.0.
///
/// This is what existing Chutzpah-to-Cobertura pipelines report, so it stays
/// the default even though it is not a line-weighted ratio. An empty report
/// yields exactly 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Product;

impl Aggregator for Product {
    fn aggregate(&self, records: &[CoverageRecord]) -> f64 {
        records.iter().fold(1.0, |acc, r| acc * r.coverage)
    }
}

/// Covered lines over coverable lines across all records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Weighted;

impl Aggregator for Weighted {
    fn aggregate(&self, records: &[CoverageRecord]) -> f64 {
        let (covered, total) = records.iter().fold((0, 0), |(c, t), r| {
            (c + r.covered_lines(), t + r.coverable_lines())
        });
        rate(covered, total)
    }
}

/// Selectable aggregation strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AggregateKind {
    #[default]
    Product,
    Weighted,
}

impl AggregateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Product => "product",
            AggregateKind::Weighted => "weighted",
        }
    }

    pub fn aggregator(&self) -> &'static dyn Aggregator {
        match self {
            AggregateKind::Product => &Product,
            AggregateKind::Weighted => &Weighted,
        }
    }
}

impl std::fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(coverage: f64, line_hits: Vec<Option<u64>>) -> CoverageRecord {
        CoverageRecord::new("/p/f.js".to_string(), coverage, line_hits)
    }

    #[test]
    fn test_product_empty_is_one() {
        assert_eq!(Product.aggregate(&[]), 1.0);
    }

    #[test]
    fn test_product_two_records() {
        let records = vec![record(0.5, vec![]), record(0.4, vec![])];
        assert_eq!(Product.aggregate(&records), 0.2);
        assert_eq!(Product.aggregate(&records).to_string(), "0.2");
    }

    #[test]
    fn test_product_zero_and_out_of_range() {
        let records = vec![record(0.9, vec![]), record(0.0, vec![])];
        assert_eq!(Product.aggregate(&records), 0.0);

        let records = vec![record(75.0, vec![]), record(2.0, vec![])];
        assert_eq!(Product.aggregate(&records), 150.0);
    }

    #[test]
    fn test_weighted() {
        let records = vec![
            record(0.5, vec![None, Some(1), Some(0)]),
            record(1.0, vec![Some(3), Some(2), None, Some(0)]),
        ];
        // 3 covered out of 5 coverable
        assert_eq!(Weighted.aggregate(&records), 0.6);
        assert_eq!(Weighted.aggregate(&[]), 0.0);
    }

    #[test]
    fn test_kind_selects_strategy() {
        let records = vec![record(0.5, vec![Some(1), Some(1)])];
        assert_eq!(AggregateKind::Product.aggregator().aggregate(&records), 0.5);
        assert_eq!(AggregateKind::Weighted.aggregator().aggregate(&records), 1.0);
        assert_eq!(AggregateKind::default(), AggregateKind::Product);
    }

    proptest! {
        #[test]
        fn prop_product_matches_fold(values in prop::collection::vec(0.0f64..=1.0, 1..20)) {
            let records: Vec<_> = values.iter().map(|&v| record(v, vec![])).collect();
            let expected = values.iter().fold(1.0, |acc, v| acc * v);
            prop_assert_eq!(Product.aggregate(&records), expected);
        }

        #[test]
        fn prop_product_stays_in_unit_range(values in prop::collection::vec(0.0f64..=1.0, 0..20)) {
            let records: Vec<_> = values.iter().map(|&v| record(v, vec![])).collect();
            let result = Product.aggregate(&records);
            prop_assert!((0.0..=1.0).contains(&result));
        }
    }
}
