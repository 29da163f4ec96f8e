use super::dictionary::ItemDictionary;
use super::domain::LineItem;
use super::sanitizer::{is_inconsistent, sanitize_item};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Iter;
use std::collections::BTreeMap;

/// Reserved bucket for rubrics the dictionary can't place.
pub const OTHER_CATEGORY: &str = "outras";

/// Macro category → accumulated absolute value for one agency-month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTotals(BTreeMap<String, f64>);

impl CategoryTotals {
    pub fn add(&mut self, category: &str, amount: f64) {
        *self.0.entry(category.to_string()).or_insert(0.0) += amount;
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, f64> {
        self.0.iter()
    }
}

/// Collects benefit rubrics across all paychecks of a run, keyed by their
/// sanitized label, until the dictionary is applied.
#[derive(Debug, Clone, Default)]
pub struct ItemTotals {
    by_item: BTreeMap<String, f64>,
    unclassifiable: f64,
}

impl ItemTotals {
    /// Only non-zero `Revenue/Other` rubrics are tracked. Base salary and
    /// discounts never reach the category breakdown.
    pub fn observe(&mut self, item: &LineItem) {
        if item.value == 0.0 || !item.is_benefit() {
            return;
        }

        let amount = item.value.abs();
        if is_inconsistent(&item.item) {
            self.unclassifiable += amount;
            return;
        }

        *self.by_item.entry(sanitize_item(&item.item)).or_insert(0.0) += amount;
    }

    pub fn observe_all<'a>(&mut self, items: impl IntoIterator<Item = &'a LineItem>) {
        for item in items {
            self.observe(item);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_item.is_empty() && self.unclassifiable == 0.0
    }

    /// Resolves every distinct rubric against the dictionary. Misses and
    /// inconsistent rubrics end up in [`OTHER_CATEGORY`].
    pub fn classify<D>(&self, dictionary: &D) -> CategoryTotals
    where
        D: ItemDictionary + ?Sized,
    {
        let mut totals = CategoryTotals::default();

        for (item, amount) in &self.by_item {
            let category = dictionary.lookup(item).unwrap_or(OTHER_CATEGORY);
            totals.add(category, *amount);
        }

        if self.unclassifiable > 0.0 {
            totals.add(OTHER_CATEGORY, self.unclassifiable);
        }

        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::dictionary::SynonymDictionary;

    fn dictionary() -> SynonymDictionary {
        SynonymDictionary::from_entries([
            ("auxilio alimentacao", "auxilio-alimentacao"),
            ("auxilio saude", "auxilio-saude"),
        ])
    }

    #[test]
    fn groups_benefits_by_dictionary_category() {
        let mut totals = ItemTotals::default();
        totals.observe_all(&[
            LineItem::benefit("Auxílio-Alimentação", 1_000.0),
            LineItem::benefit("AUXILIO ALIMENTACAO", 500.0),
            LineItem::benefit("Auxílio Saúde", -300.0),
            LineItem::benefit("Gratificação por Encargo de Curso", 200.0),
        ]);

        let categories = totals.classify(&dictionary());
        assert_eq!(categories.get("auxilio_alimentacao"), Some(1_500.0));
        assert_eq!(categories.get("auxilio_saude"), Some(300.0));
        assert_eq!(categories.get(OTHER_CATEGORY), Some(200.0));
        assert_eq!(categories.len(), 3);
    }

    #[test]
    fn ignores_base_salary_discounts_and_zero_values() {
        let mut totals = ItemTotals::default();
        totals.observe_all(&[
            LineItem::base_salary("Auxilio alimentacao", 10_000.0),
            LineItem::discount("Auxilio alimentacao", -250.0),
            LineItem::benefit("Auxilio alimentacao", 0.0),
            LineItem::benefit("0000", 0.0),
        ]);

        assert!(totals.is_empty());
        assert!(totals.classify(&dictionary()).is_empty());
    }

    #[test]
    fn inconsistent_benefits_go_to_the_other_bucket() {
        let dictionary = SynonymDictionary::from_entries([("0042", "auxilio-saude")]);
        let mut totals = ItemTotals::default();
        totals.observe_all(&[
            LineItem::benefit("0042", 120.0),
            LineItem::benefit("***", -80.0),
            LineItem::discount("9999", 50.0),
        ]);

        let categories = totals.classify(&dictionary);
        assert_eq!(categories.get(OTHER_CATEGORY), Some(200.0));
        assert_eq!(categories.get("auxilio_saude"), None);
        assert_eq!(categories.total(), 200.0);
    }
}
