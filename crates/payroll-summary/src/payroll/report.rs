use super::dictionary::ItemDictionary;
use super::domain::{ExecutionResult, ProcInfo};
use super::records::{normalize, Paycheck, PaycheckItem};
use super::scoring::{score, DisclosureScore, MetadataFlags};
use super::summary::{summarize, Summary};
use super::PayrollError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Run-level switches that come from the environment, not from the message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub manual_collection: bool,
    pub started_at: Option<NaiveDateTime>,
}

/// Everything derived from one execution result, ready to be persisted by
/// the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyMonthReport {
    pub agency_id: String,
    pub year: i32,
    pub month: u32,
    pub crawler_repo: String,
    pub crawler_version: String,
    pub parser_repo: String,
    pub parser_version: String,
    pub crawling_timestamp: Option<DateTime<Utc>>,
    pub backups: Vec<String>,
    pub meta: MetadataFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proc_info: Option<ProcInfo>,
    pub summary: Summary,
    pub score: DisclosureScore,
    pub manual_collection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    pub paychecks: Vec<Paycheck>,
    pub paycheck_items: Vec<PaycheckItem>,
}

/// Normalizes, aggregates and scores one agency-month.
///
/// `processed_at` is the instant the collection duration is measured against.
pub fn build_report<D>(
    result: &ExecutionResult,
    dictionary: &D,
    options: &ReportOptions,
    processed_at: NaiveDateTime,
) -> Result<AgencyMonthReport, PayrollError>
where
    D: ItemDictionary + ?Sized,
{
    let collection = &result.collection;
    let employees = &result.payroll.employees;

    let normalized = normalize(collection, employees)?;
    let summary = summarize(employees, dictionary)?;

    // Manual collections skip the automated portal checks the metadata describes.
    let score = if options.manual_collection {
        DisclosureScore::zero()
    } else {
        score(&result.metadata)
    };

    let duration_seconds = options
        .started_at
        .and_then(|started_at| (processed_at - started_at).num_microseconds())
        .map(|micros| micros as f64 / 1_000_000.0);

    if let Some(proc_info) = result.proc_info.as_ref().filter(|info| info.failed()) {
        warn!(
            agency = %collection.agency_id,
            status = proc_info.status,
            "collection process exited with a non-zero status"
        );
    }

    info!(
        agency = %collection.agency_id,
        year = collection.year,
        month = collection.month,
        employees = summary.count,
        items = normalized.items.len(),
        score = score.score,
        "agency-month report built"
    );

    Ok(AgencyMonthReport {
        agency_id: collection.agency_id.clone(),
        year: collection.year,
        month: collection.month,
        crawler_repo: collection.crawler_repo.clone(),
        crawler_version: collection.crawler_version.clone(),
        parser_repo: collection.parser_repo.clone(),
        parser_version: collection.parser_version.clone(),
        crawling_timestamp: collection.crawling_timestamp,
        backups: collection.files.clone(),
        meta: result.metadata.clone(),
        proc_info: result.proc_info.clone(),
        summary,
        score,
        manual_collection: options.manual_collection,
        duration_seconds,
        paychecks: normalized.paychecks,
        paycheck_items: normalized.items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::dictionary::SynonymDictionary;
    use crate::payroll::domain::{CollectionInfo, EmployeeRecord, LineItem, Payroll};
    use crate::payroll::scoring::{AccessMethod, DisclosureLevel};
    use chrono::NaiveDate;

    fn execution_result(employees: Vec<EmployeeRecord>) -> ExecutionResult {
        ExecutionResult {
            collection: CollectionInfo {
                agency_id: "tjpb".to_string(),
                year: 2024,
                month: 5,
                collection_key: "tjpb/05/2024".to_string(),
                crawler_repo: "https://github.com/dadosjusbr/coletor-tjpb".to_string(),
                crawler_version: "abc123".to_string(),
                parser_repo: String::new(),
                parser_version: String::new(),
                crawling_timestamp: None,
                files: vec!["backup.zip".to_string()],
            },
            metadata: MetadataFlags {
                no_login_required: true,
                no_captcha_required: true,
                access: AccessMethod::Direct,
                has_enrollment: true,
                has_workplace: true,
                has_role: true,
                base_revenue: DisclosureLevel::Detailed,
                other_revenue: DisclosureLevel::Partial,
                expenditure: DisclosureLevel::Detailed,
                ..MetadataFlags::default()
            },
            payroll: Payroll { employees },
            proc_info: None,
        }
    }

    fn processed_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 30))
            .expect("valid timestamp")
    }

    #[test]
    fn report_combines_rows_summary_and_score() {
        let result = execution_result(vec![EmployeeRecord::new(
            "Maria",
            vec![
                LineItem::base_salary("Subsidio", 12_000.0),
                LineItem::benefit("Auxilio alimentacao", 1_000.0),
            ],
        )]);
        let dictionary =
            SynonymDictionary::from_entries([("auxilio alimentacao", "auxilio-alimentacao")]);
        let options = ReportOptions {
            manual_collection: false,
            started_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .and_then(|date| date.and_hms_opt(12, 0, 0)),
        };

        let report =
            build_report(&result, &dictionary, &options, processed_at()).expect("report builds");

        assert_eq!(report.paychecks.len(), 1);
        assert_eq!(report.paycheck_items.len(), 2);
        assert_eq!(report.summary.count, 1);
        assert_eq!(
            report.summary.item_summary.get("auxilio_alimentacao"),
            Some(1_000.0)
        );
        assert_eq!(report.duration_seconds, Some(30.0));
        assert_eq!(report.backups, vec!["backup.zip".to_string()]);
        assert!(report.score.score > 0.0);
        assert!(!report.manual_collection);
    }

    #[test]
    fn manual_collections_report_zero_scores() {
        let result = execution_result(Vec::new());
        let options = ReportOptions {
            manual_collection: true,
            started_at: None,
        };

        let report = build_report(
            &result,
            &SynonymDictionary::default(),
            &options,
            processed_at(),
        )
        .expect("report builds");

        assert_eq!(report.score, DisclosureScore::zero());
        assert!(report.manual_collection);
        assert_eq!(report.summary, Summary::default());
        assert!(report.duration_seconds.is_none());
    }

    #[test]
    fn duration_keeps_sub_millisecond_precision() {
        let options = ReportOptions {
            manual_collection: false,
            started_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .and_then(|date| date.and_hms_micro_opt(12, 0, 29, 999_750)),
        };

        let report = build_report(
            &execution_result(Vec::new()),
            &SynonymDictionary::default(),
            &options,
            processed_at(),
        )
        .expect("report builds");

        let duration = report.duration_seconds.expect("duration measured");
        assert!((duration - 0.000_25).abs() < 1e-9);
    }

    #[test]
    fn process_info_is_echoed_in_the_report() {
        let mut result = execution_result(Vec::new());
        result.proc_info = Some(ProcInfo {
            stderr: "timeout fetching page 3".to_string(),
            cmd: "coletor-tjpb --mes 5".to_string(),
            status: 4,
            ..ProcInfo::default()
        });

        let report = build_report(
            &result,
            &SynonymDictionary::default(),
            &ReportOptions::default(),
            processed_at(),
        )
        .expect("report builds");

        let proc_info = report.proc_info.expect("process info echoed");
        assert!(proc_info.failed());
        assert_eq!(proc_info.stderr, "timeout fetching page 3");

        let clean = build_report(
            &execution_result(Vec::new()),
            &SynonymDictionary::default(),
            &ReportOptions::default(),
            processed_at(),
        )
        .expect("report builds");
        let json = serde_json::to_value(&clean).expect("report serializes");
        assert!(json.get("proc_info").is_none());
    }
}
