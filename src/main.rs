use clap::Parser;

use rpc_tests::args::Args;
use rpc_tests::cases::rpc_suite;
use rpc_tests::config::Config;
use rpc_tests::context::{describe_with_network, suite_title};
use rpc_tests::logging::init_tracing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();
    // Rejected before any connection is attempted.
    let config = Config::from_args(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let title = suite_title(config.network);
    let report = runtime.block_on(describe_with_network(&config, &title, &rpc_suite()))?;

    tracing::info!(
        title = %report.title,
        passed = report.passed(),
        total = report.cases.len(),
        "Suite finished"
    );
    for case in report.failed() {
        if let Some(error) = &case.error {
            tracing::error!(case = case.name, "{}", error);
        }
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(format!("{} of {} cases failed", report.failed().count(), report.cases.len()).into())
    }
}
