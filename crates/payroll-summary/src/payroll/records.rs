use super::decomposer::decompose;
use super::domain::{CollectionInfo, EmployeeRecord, LineItem, Nature, RevenueKind};
use super::sanitizer::{is_inconsistent, sanitize_item};
use super::PayrollError;
use serde::{Deserialize, Serialize};

/// Normalized paycheck row, one per employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paycheck {
    pub id: usize,
    pub agency: String,
    pub month: u32,
    pub year: i32,
    pub collect_key: String,
    pub name: String,
    pub register_id: String,
    pub role: String,
    pub workplace: String,
    pub salary: f64,
    pub benefits: f64,
    pub discounts: f64,
    pub remuneration: f64,
    pub situation: Option<String>,
    pub sanitized_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaycheckItemType {
    #[serde(rename = "R/B")]
    BaseSalary,
    #[serde(rename = "R/O")]
    Benefit,
    #[serde(rename = "R")]
    Revenue,
    #[serde(rename = "D")]
    Discount,
}

impl PaycheckItemType {
    pub fn of(item: &LineItem) -> Self {
        match (item.nature, item.revenue_kind) {
            (Nature::Discount, _) => Self::Discount,
            (Nature::Revenue, Some(RevenueKind::Base)) => Self::BaseSalary,
            (Nature::Revenue, Some(RevenueKind::Other)) => Self::Benefit,
            (Nature::Revenue, None) => Self::Revenue,
        }
    }
}

/// Normalized rubric row. Zero-valued rubrics are never emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaycheckItem {
    pub id: usize,
    pub paycheck_id: usize,
    pub agency: String,
    pub month: u32,
    pub year: i32,
    pub category: String,
    pub item: String,
    #[serde(rename = "type")]
    pub item_type: PaycheckItemType,
    pub value: f64,
    pub inconsistent: bool,
    pub sanitized_item: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedPayroll {
    pub paychecks: Vec<Paycheck>,
    pub items: Vec<PaycheckItem>,
}

/// Only prosecution offices (`mp*` agencies) publish a reliable active flag.
pub fn situation(active: bool, agency_id: &str) -> Option<String> {
    (active && agency_id.contains("mp")).then(|| "A".to_string())
}

/// Builds the per-employee rows. Ids are 1-based and follow input order;
/// item ids restart for each paycheck.
pub fn normalize(
    collection: &CollectionInfo,
    employees: &[EmployeeRecord],
) -> Result<NormalizedPayroll, PayrollError> {
    let mut normalized = NormalizedPayroll::default();

    for (index, employee) in employees.iter().enumerate() {
        let line_items = employee
            .line_items()
            .ok_or_else(|| PayrollError::missing_remunerations(index, employee))?;
        let paycheck_id = index + 1;
        let pay = decompose(line_items);

        normalized.paychecks.push(Paycheck {
            id: paycheck_id,
            agency: collection.agency_id.clone(),
            month: collection.month,
            year: collection.year,
            collect_key: collection.collection_key.clone(),
            name: employee.name.clone(),
            register_id: employee.registration_id.clone(),
            role: employee.role.clone(),
            workplace: employee.workplace.clone(),
            salary: pay.base_salary,
            benefits: pay.benefits,
            discounts: pay.discounts,
            remuneration: pay.remuneration,
            situation: situation(employee.active, &collection.agency_id),
            sanitized_name: sanitize_item(&employee.name),
        });

        let rows = line_items
            .iter()
            .filter(|item| item.value != 0.0)
            .enumerate()
            .map(|(position, item)| item_row(collection, paycheck_id, position + 1, item));
        normalized.items.extend(rows);
    }

    Ok(normalized)
}

fn item_row(
    collection: &CollectionInfo,
    paycheck_id: usize,
    id: usize,
    item: &LineItem,
) -> PaycheckItem {
    let item_type = PaycheckItemType::of(item);
    let value = match item_type {
        PaycheckItemType::Discount => item.value.abs(),
        _ => item.value,
    };
    let inconsistent = is_inconsistent(&item.item);
    let sanitized_item = (!inconsistent).then(|| sanitize_item(&item.item));

    PaycheckItem {
        id,
        paycheck_id,
        agency: collection.agency_id.clone(),
        month: collection.month,
        year: collection.year,
        category: item.category.clone(),
        item: item.item.clone(),
        item_type,
        value,
        inconsistent,
        sanitized_item,
    }
}
