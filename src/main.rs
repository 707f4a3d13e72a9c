//! NASA mock runner - replays API test collections against a local fixture
//! server standing in for the NASA open APIs.

use clap::Parser;
use nasa_mock_runner::commands::RunArgs;
use nasa_mock_runner::cli::{self, Action};
use nasa_mock_runner::common::logging;

#[derive(Parser)]
#[command(
    name = "nasa-mock-runner",
    about = "Run NASA API test collections against a local fixture server"
)]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    args: RunArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let action = match cli::prepare(cli.args) {
        Ok(action) => action,
        Err(e) => fail(e),
    };

    // Only a collection run writes the log file next to its reports
    let log_guard = match &action {
        Action::Run { plan, .. } => logging::init_run(&plan.layout.log_file()),
        Action::List | Action::Serve { .. } => {
            logging::init_cli();
            None
        }
    };

    let result = cli::run(action).await;

    // Flush the log file before a possible process::exit
    drop(log_guard);

    if let Err(e) = result {
        fail(e);
    }
}

fn fail(e: nasa_mock_runner::Error) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}
