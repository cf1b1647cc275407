mod cli;
mod ui;

use applch::ai::PerplexityClient;
use applch::config::AppConfig;
use applch::error::AppError;
use applch::progress::{ProgressEvent, ProgressSink};
use applch::roster::parse_names;
use applch::telemetry;
use applch::workflows::{
    arena, bootstrap, check, clear, print, ArenaError, CheckOptions, CheckRunError, PrintTarget,
};
use applch::workspace::Workspace;
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command};
use tracing::debug;
use ui::{JsonLinesReporter, TerminalReporter};

enum Output {
    Terminal(TerminalReporter<std::io::Stdout>),
    Json(JsonLinesReporter<std::io::Stdout>),
}

impl Output {
    fn sink(&self) -> &dyn ProgressSink {
        match self {
            Output::Terminal(reporter) => reporter,
            Output::Json(reporter) => reporter,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();

    let workspace = match cli.workspace {
        Some(dir) => Workspace::new(dir),
        None => Workspace::current()?,
    };
    let setup = workspace.ensure_setup()?;
    let config = AppConfig::load(&workspace)?;
    telemetry::init(&config.telemetry)?;
    debug!(root = %workspace.root().display(), created = setup.created.len(), "workspace ready");

    let output = if cli.json {
        Output::Json(JsonLinesReporter::stdout())
    } else {
        Output::Terminal(TerminalReporter::stdout())
    };
    let sink = output.sink();
    let today = Utc::now().date_naive();

    match cli.command {
        Command::Bootstrap(args) => {
            bootstrap::run(&workspace, parse_names(&args.names), sink)?;
        }
        Command::Check(args) => {
            let client = PerplexityClient::new(&config.api);
            let options = CheckOptions {
                date: today,
                concurrency: args.concurrency,
            };
            let result = check::run(
                &workspace,
                &config.models,
                &client,
                parse_names(&args.names.names),
                options,
                sink,
            )
            .await;
            match result {
                Ok(_) => {}
                Err(CheckRunError::Roster(err)) => return Err(err.into()),
                Err(err @ CheckRunError::NoApplicants) => report_error(sink, &err),
            }
        }
        Command::Arena(args) => {
            let client = PerplexityClient::new(&config.api);
            let result = arena::run(
                &workspace,
                &config.models,
                &client,
                parse_names(&args.names),
                today,
                sink,
            )
            .await;
            match result {
                Ok(_) => {}
                Err(ArenaError::Roster(err)) => return Err(err.into()),
                Err(err) => report_error(sink, &err),
            }
        }
        Command::Clear(args) => {
            let assume_yes = args.yes;
            clear::run(
                &workspace,
                || assume_yes || ui::confirm("Are you sure you want to continue?"),
                sink,
            );
        }
        Command::Print(args) => {
            let target = PrintTarget::parse(args.target.as_deref());
            let reports = match print::select(&workspace, &target) {
                Ok(reports) => reports,
                Err(err) => {
                    report_error(sink, &err);
                    return Ok(());
                }
            };
            match &output {
                Output::Json(reporter) => {
                    for report in &reports {
                        reporter.emit(report);
                    }
                }
                Output::Terminal(_) => {
                    for report in &reports {
                        println!("{}", ui::format_report(&report.title, &report.content));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Input problems (nothing to check, rank or print) are reported and the
/// command returns normally; only setup failures end the process.
fn report_error(sink: &dyn ProgressSink, err: &dyn std::error::Error) {
    sink.report(ProgressEvent::error(err.to_string()));
}
