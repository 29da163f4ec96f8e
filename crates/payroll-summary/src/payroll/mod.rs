//! Payroll normalization, agency-month aggregation and disclosure scoring.
//!
//! A run takes one [`ExecutionResult`], a dictionary snapshot and produces an
//! [`AgencyMonthReport`]: normalized paycheck rows, the statistical
//! [`Summary`] and the [`DisclosureScore`].

mod classifier;
mod decomposer;
mod dictionary;
pub mod domain;
mod export;
mod records;
mod report;
mod sanitizer;
pub mod scoring;
mod summary;

pub use classifier::{CategoryTotals, ItemTotals, OTHER_CATEGORY};
pub use decomposer::{decompose, DecomposedPay};
pub use dictionary::{
    DictionaryError, DictionaryProvider, DictionarySource, ItemDictionary, SynonymDictionary,
    DEFAULT_DICTIONARY_URL,
};
pub use domain::{
    CollectionInfo, EmployeeRecord, ExecutionResult, LineItem, Nature, Payroll, ProcInfo,
    Remunerations, RevenueKind,
};
pub use export::{export_to_dir, write_paycheck_items, write_paychecks, ExportError, ExportedFiles};
pub use records::{
    normalize, situation, NormalizedPayroll, Paycheck, PaycheckItem, PaycheckItemType,
};
pub use report::{build_report, AgencyMonthReport, ReportOptions};
pub use sanitizer::{is_inconsistent, sanitize_item};
pub use scoring::{
    completeness_score, easiness_score, score, AccessMethod, DisclosureLevel, DisclosureScore,
    MetadataFlags,
};
pub use summary::{
    summarize, DataSummary, IncomeBucket, IncomeHistogram, Summary, SummaryAggregator,
};

/// Input that can't be turned into a summary. Always fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum PayrollError {
    #[error("employee #{index} ({name}) has no remuneration block")]
    MissingRemunerations { index: usize, name: String },
}

impl PayrollError {
    pub(crate) fn missing_remunerations(index: usize, employee: &EmployeeRecord) -> Self {
        Self::MissingRemunerations {
            index,
            name: employee.name.clone(),
        }
    }
}
