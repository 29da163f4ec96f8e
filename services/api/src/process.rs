use crate::infra::SummaryContext;
use clap::{Args, ValueEnum};
use payroll_summary::config::AppConfig;
use payroll_summary::error::AppError;
use payroll_summary::payroll::{
    export_to_dir, AgencyMonthReport, DictionarySource, ExecutionResult,
};
use payroll_summary::telemetry;
use serde::Deserialize;
use serde_json::Value;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ProcessArgs {
    /// Execution result JSON to read; omit or pass `-` for stdin
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Write the normalized paycheck CSV files into this directory
    #[arg(long)]
    pub(crate) records_dir: Option<PathBuf>,
    /// Read the dictionary from a local file instead of the configured source
    #[arg(long)]
    pub(crate) dictionary: Option<PathBuf>,
    /// What to print on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Report)]
    pub(crate) output: OutputFormat,
    /// Pretty-print the output
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// The agency-month report
    #[default]
    Report,
    /// The input document as received, with the computed summary under `summary`
    ExecutionResult,
}

pub(crate) fn run_process(args: ProcessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let dictionary = match args.dictionary {
        Some(path) => DictionarySource::File(path),
        None => config.dictionary,
    };
    let context = SummaryContext {
        dictionary: Arc::new(dictionary),
        collection: config.collection,
    };

    let raw = read_input(args.input.as_deref())?;
    let processed = process(&raw, &context)?;

    if let Some(dir) = args.records_dir {
        export_to_dir(&dir, &processed.report)?;
    }

    println!("{}", processed.render(args.output, args.pretty)?);
    Ok(())
}

/// A built report together with the document it came from.
#[derive(Debug)]
struct Processed {
    document: Value,
    report: AgencyMonthReport,
}

impl Processed {
    fn render(&self, output: OutputFormat, pretty: bool) -> Result<String, AppError> {
        match output {
            OutputFormat::Report => to_json(&self.report, pretty),
            OutputFormat::ExecutionResult => {
                to_json(&with_summary(self.document.clone(), &self.report)?, pretty)
            }
        }
    }
}

fn process(raw: &str, context: &SummaryContext) -> Result<Processed, AppError> {
    let document: Value = serde_json::from_str(raw)?;
    let result = ExecutionResult::deserialize(&document)?;
    let report = context.build(&result)?;
    Ok(Processed { document, report })
}

/// Fields the payroll model doesn't know about pass through untouched.
fn with_summary(mut document: Value, report: &AgencyMonthReport) -> Result<Value, AppError> {
    let summary = serde_json::to_value(&report.summary)?;
    if let Value::Object(fields) = &mut document {
        fields.insert("summary".to_string(), summary);
    }
    Ok(document)
}

fn read_input(path: Option<&Path>) -> Result<String, AppError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}
