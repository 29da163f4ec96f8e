use super::classifier::{CategoryTotals, ItemTotals};
use super::decomposer::{decompose, DecomposedPay};
use super::dictionary::ItemDictionary;
use super::domain::EmployeeRecord;
use super::PayrollError;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Iter;
use std::collections::BTreeMap;

/// Running min/max/total/average of one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    pub min: f64,
    pub max: f64,
    pub total: f64,
    pub average: f64,
    pub count: u64,
}

impl DataSummary {
    /// Folds one value in. The first observation seeds `min` and `max`;
    /// `average` is always the full mean `total / count`.
    #[must_use]
    pub fn observe(self, value: f64) -> Self {
        let count = self.count + 1;
        let (min, max) = if self.count == 0 {
            (value, value)
        } else {
            (self.min.min(value), self.max.max(value))
        };
        let total = self.total + value;

        Self {
            min,
            max,
            total,
            average: total / count as f64,
            count,
        }
    }
}

/// Net remuneration ranges reported by the histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IncomeBucket {
    UpTo10k,
    UpTo20k,
    UpTo30k,
    UpTo40k,
    UpTo50k,
    Above50k,
}

impl IncomeBucket {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::UpTo10k,
            Self::UpTo20k,
            Self::UpTo30k,
            Self::UpTo40k,
            Self::UpTo50k,
            Self::Above50k,
        ]
    }

    /// Smallest bucket whose upper bound (inclusive) holds the amount.
    pub fn for_remuneration(remuneration: f64) -> Self {
        Self::ordered()
            .into_iter()
            .find(|bucket| match bucket.upper_bound() {
                Some(bound) => remuneration <= bound,
                None => true,
            })
            .unwrap_or(Self::Above50k)
    }

    pub const fn upper_bound(self) -> Option<f64> {
        match self {
            Self::UpTo10k => Some(10_000.0),
            Self::UpTo20k => Some(20_000.0),
            Self::UpTo30k => Some(30_000.0),
            Self::UpTo40k => Some(40_000.0),
            Self::UpTo50k => Some(50_000.0),
            Self::Above50k => None,
        }
    }

    /// Key used in the published histogram; `-1` marks "above 50000".
    pub const fn key(self) -> i64 {
        match self {
            Self::UpTo10k => 10_000,
            Self::UpTo20k => 20_000,
            Self::UpTo30k => 30_000,
            Self::UpTo40k => 40_000,
            Self::UpTo50k => 50_000,
            Self::Above50k => -1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncomeHistogram(BTreeMap<i64, u64>);

impl IncomeHistogram {
    /// Every bucket present with a zero count.
    pub fn zeroed() -> Self {
        Self(
            IncomeBucket::ordered()
                .into_iter()
                .map(|bucket| (bucket.key(), 0))
                .collect(),
        )
    }

    pub fn record(&mut self, remuneration: f64) -> IncomeBucket {
        let bucket = IncomeBucket::for_remuneration(remuneration);
        *self.0.entry(bucket.key()).or_insert(0) += 1;
        bucket
    }

    pub fn count(&self, bucket: IncomeBucket) -> u64 {
        self.0.get(&bucket.key()).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, i64, u64> {
        self.0.iter()
    }
}

/// Agency-month aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: u64,
    pub base_remuneration: DataSummary,
    pub other_remunerations: DataSummary,
    pub discounts: DataSummary,
    pub remunerations: DataSummary,
    pub income_histogram: IncomeHistogram,
    pub item_summary: CategoryTotals,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Per-employee half of the aggregation. Category totals are attached in
/// [`SummaryAggregator::finish`].
#[derive(Debug, Clone)]
pub struct SummaryAggregator {
    summary: Summary,
}

impl Default for SummaryAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryAggregator {
    pub fn new() -> Self {
        Self {
            summary: Summary {
                income_histogram: IncomeHistogram::zeroed(),
                ..Summary::default()
            },
        }
    }

    pub fn observe(&mut self, pay: &DecomposedPay) {
        let summary = &mut self.summary;
        summary.count += 1;
        summary.income_histogram.record(pay.remuneration);
        summary.base_remuneration = summary.base_remuneration.observe(pay.base_salary);
        summary.other_remunerations = summary.other_remunerations.observe(pay.benefits);
        summary.discounts = summary.discounts.observe(pay.discounts);
        summary.remunerations = summary.remunerations.observe(pay.remuneration);
    }

    pub fn count(&self) -> u64 {
        self.summary.count
    }

    /// Returns the zero-value summary when nothing was observed, never one
    /// with a populated histogram and a zero count.
    pub fn finish(self, categories: CategoryTotals) -> Summary {
        if self.summary.count == 0 {
            return Summary::default();
        }

        Summary {
            item_summary: categories,
            ..self.summary
        }
    }
}

/// Folds a whole employee list into one [`Summary`], in input order.
///
/// Fails on the first employee without a remuneration block; no partial
/// summary is ever returned.
pub fn summarize<D>(employees: &[EmployeeRecord], dictionary: &D) -> Result<Summary, PayrollError>
where
    D: ItemDictionary + ?Sized,
{
    let mut aggregator = SummaryAggregator::new();
    let mut items = ItemTotals::default();

    for (index, employee) in employees.iter().enumerate() {
        let line_items = employee
            .line_items()
            .ok_or_else(|| PayrollError::missing_remunerations(index, employee))?;

        aggregator.observe(&decompose(line_items));
        items.observe_all(line_items);
    }

    if aggregator.count() == 0 {
        return Ok(Summary::default());
    }

    let categories = items.classify(dictionary);
    Ok(aggregator.finish(categories))
}
