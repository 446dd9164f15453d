use docdb_infrastructure::{services::MongoServiceProvider, settings::Settings};
use docdb_interface::errors::Result;
use docdb_runner::logger;
use docdb_runner::runner::{DemoRunner, RunReport};

const DONE: &str = "All done!";

async fn run(settings: Settings) -> Result<RunReport> {
    let provider = MongoServiceProvider::new(settings.app_settings.account_name.clone());

    DemoRunner::new(provider, settings.sample)
        .run(&settings.app_settings)
        .await
}

// Lines written to stdout: the diagnostic on failure, then the completion line.
fn outcome_lines(outcome: &Result<RunReport>) -> Vec<String> {
    let mut lines = Vec::with_capacity(2);
    if let Err(e) = outcome {
        lines.push(e.report_line());
    }
    lines.push(DONE.to_string());
    lines
}

#[tokio::main]
async fn main() {
    let outcome = match Settings::new() {
        Ok(settings) => {
            logger::setup(&settings.logger.level);
            run(settings).await
        }
        Err(e) => Err(e),
    };

    match &outcome {
        Ok(report) => tracing::info!("{} documents written", report.documents.len()),
        Err(e) => tracing::error!("{}", e),
    }

    // The exit status stays 0 on every path.
    for line in outcome_lines(&outcome) {
        println!("{line}");
    }
}
