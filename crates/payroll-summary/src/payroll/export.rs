use super::records::{Paycheck, PaycheckItem};
use super::report::AgencyMonthReport;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to prepare export directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write CSV records: {0}")]
    Csv(#[from] csv::Error),
}

pub fn write_paychecks<W: Write>(writer: W, paychecks: &[Paycheck]) -> Result<(), ExportError> {
    write_rows(writer, paychecks)
}

pub fn write_paycheck_items<W: Write>(
    writer: W,
    items: &[PaycheckItem],
) -> Result<(), ExportError> {
    write_rows(writer, items)
}

fn write_rows<W: Write, T: serde::Serialize>(writer: W, rows: &[T]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Files written by [`export_to_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub paychecks: PathBuf,
    pub paycheck_items: PathBuf,
}

/// Writes `{agency}-{year}-{month}-paychecks.csv` and
/// `{agency}-{year}-{month}-paycheck-items.csv` under `dir`.
pub fn export_to_dir<P: AsRef<Path>>(
    dir: P,
    report: &AgencyMonthReport,
) -> Result<ExportedFiles, ExportError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let prefix = format!("{}-{}-{}", report.agency_id, report.year, report.month);
    let files = ExportedFiles {
        paychecks: dir.join(format!("{prefix}-paychecks.csv")),
        paycheck_items: dir.join(format!("{prefix}-paycheck-items.csv")),
    };

    write_paychecks(std::fs::File::create(&files.paychecks)?, &report.paychecks)?;
    write_paycheck_items(
        std::fs::File::create(&files.paycheck_items)?,
        &report.paycheck_items,
    )?;

    info!(
        paychecks = %files.paychecks.display(),
        items = %files.paycheck_items.display(),
        "normalized records exported"
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::records::PaycheckItemType;

    #[test]
    fn paycheck_items_serialize_with_published_type_codes() {
        let items = vec![PaycheckItem {
            id: 1,
            paycheck_id: 7,
            agency: "mppb".to_string(),
            month: 1,
            year: 2023,
            category: "descontos".to_string(),
            item: "IRRF".to_string(),
            item_type: PaycheckItemType::Discount,
            value: 812.5,
            inconsistent: false,
            sanitized_item: Some("irrf".to_string()),
        }];

        let mut buffer = Vec::new();
        write_paycheck_items(&mut buffer, &items).expect("csv written");
        let output = String::from_utf8(buffer).expect("utf8");

        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("id,paycheck_id,agency,month,year,category,item,type,value,inconsistent,sanitized_item")
        );
        assert_eq!(
            lines.next(),
            Some("1,7,mppb,1,2023,descontos,IRRF,D,812.5,false,irrf")
        );
    }
}
