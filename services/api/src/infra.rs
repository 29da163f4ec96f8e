use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use payroll_summary::config::CollectionConfig;
use payroll_summary::error::AppError;
use payroll_summary::payroll::{
    build_report, AgencyMonthReport, DictionaryProvider, ExecutionResult,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Everything a run needs besides the execution result itself.
#[derive(Clone)]
pub(crate) struct SummaryContext {
    pub(crate) dictionary: Arc<dyn DictionaryProvider>,
    pub(crate) collection: CollectionConfig,
}

impl SummaryContext {
    /// Loads a fresh dictionary snapshot and builds the agency-month report.
    /// Blocking: the dictionary may be fetched over the network.
    pub(crate) fn build(&self, result: &ExecutionResult) -> Result<AgencyMonthReport, AppError> {
        let dictionary = self.dictionary.load()?;
        let report = build_report(
            result,
            &dictionary,
            &self.collection.report_options(),
            Utc::now().naive_utc(),
        )?;
        Ok(report)
    }
}
