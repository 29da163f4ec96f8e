use super::domain::LineItem;
use serde::{Deserialize, Serialize};

/// Base salary, benefits and discounts of one employee, plus the net amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DecomposedPay {
    pub base_salary: f64,
    pub benefits: f64,
    /// Always non-negative.
    pub discounts: f64,
    pub remuneration: f64,
}

/// Splits a paycheck into its components. Discounts are summed with their
/// sign and only the total is made absolute.
pub fn decompose(items: &[LineItem]) -> DecomposedPay {
    let mut base_salary = 0.0_f64;
    let mut benefits = 0.0_f64;
    let mut discounts = 0.0_f64;

    for item in items {
        if item.is_base_salary() {
            base_salary += item.value;
        } else if item.is_benefit() {
            benefits += item.value;
        } else if item.is_discount() {
            discounts += item.value;
        }
    }

    let discounts = discounts.abs();
    DecomposedPay {
        base_salary,
        benefits,
        discounts,
        remuneration: base_salary + benefits - discounts,
    }
}
