use crate::process::{run_process, ProcessArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use payroll_summary::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Payroll Summary",
    about = "Normalize, summarize and score agency-month payroll disclosures",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Build the agency-month report for one execution result and print it as JSON
    Process(ProcessArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Process(args) => run_process(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::OutputFormat;
    use std::path::PathBuf;

    #[test]
    fn parses_process_arguments() {
        let cli = Cli::try_parse_from([
            "payroll-summary-api",
            "process",
            "--input",
            "result.json",
            "--records-dir",
            "out",
            "--output",
            "execution-result",
            "--pretty",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Process(args)) => {
                assert_eq!(args.input, Some(PathBuf::from("result.json")));
                assert_eq!(args.records_dir, Some(PathBuf::from("out")));
                assert!(args.dictionary.is_none());
                assert_eq!(args.output, OutputFormat::ExecutionResult);
                assert!(args.pretty);
            }
            other => panic!("expected process command, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["payroll-summary-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
