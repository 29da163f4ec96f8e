use super::scoring::MetadataFlags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a payroll line adds to or subtracts from what the employee receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nature {
    Revenue,
    Discount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueKind {
    Base,
    Other,
}

/// One labeled amount of an employee's paycheck (a rubric).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub category: String,
    pub item: String,
    pub value: f64,
    pub nature: Nature,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_kind: Option<RevenueKind>,
}

impl LineItem {
    pub fn base_salary(item: impl Into<String>, value: f64) -> Self {
        Self::revenue(item, value, RevenueKind::Base)
    }

    pub fn benefit(item: impl Into<String>, value: f64) -> Self {
        Self::revenue(item, value, RevenueKind::Other)
    }

    pub fn discount(item: impl Into<String>, value: f64) -> Self {
        Self {
            category: String::new(),
            item: item.into(),
            value,
            nature: Nature::Discount,
            revenue_kind: None,
        }
    }

    fn revenue(item: impl Into<String>, value: f64, kind: RevenueKind) -> Self {
        Self {
            category: String::new(),
            item: item.into(),
            value,
            nature: Nature::Revenue,
            revenue_kind: Some(kind),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn is_base_salary(&self) -> bool {
        self.nature == Nature::Revenue && self.revenue_kind == Some(RevenueKind::Base)
    }

    pub fn is_benefit(&self) -> bool {
        self.nature == Nature::Revenue && self.revenue_kind == Some(RevenueKind::Other)
    }

    pub fn is_discount(&self) -> bool {
        self.nature == Nature::Discount
    }
}

/// The remuneration block of a paycheck. Records without one are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Remunerations {
    #[serde(default)]
    pub items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub name: String,
    #[serde(default)]
    pub registration_id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub workplace: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub remunerations: Option<Remunerations>,
}

impl EmployeeRecord {
    pub fn new(name: impl Into<String>, items: Vec<LineItem>) -> Self {
        Self {
            name: name.into(),
            registration_id: String::new(),
            role: String::new(),
            workplace: String::new(),
            active: false,
            remunerations: Some(Remunerations { items }),
        }
    }

    pub fn line_items(&self) -> Option<&[LineItem]> {
        self.remunerations
            .as_ref()
            .map(|block| block.items.as_slice())
    }
}

/// Provenance of one agency-month collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub agency_id: String,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub collection_key: String,
    #[serde(default)]
    pub crawler_repo: String,
    #[serde(default)]
    pub crawler_version: String,
    #[serde(default)]
    pub parser_repo: String,
    #[serde(default)]
    pub parser_version: String,
    #[serde(default)]
    pub crawling_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payroll {
    #[serde(default)]
    pub employees: Vec<EmployeeRecord>,
}

/// How the collection process ran. A non-zero `status` marks a failed or
/// partial collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcInfo {
    pub stdin: String,
    pub stdout: String,
    pub stderr: String,
    pub cmd: String,
    pub cmd_dir: String,
    pub status: i32,
    pub env: Vec<String>,
}

impl ProcInfo {
    pub fn failed(&self) -> bool {
        self.status != 0
    }
}

/// Output of a crawler/parser execution for one agency-month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub collection: CollectionInfo,
    pub metadata: MetadataFlags,
    #[serde(default)]
    pub payroll: Payroll,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc_info: Option<ProcInfo>,
}
