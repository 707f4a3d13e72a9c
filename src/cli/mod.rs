//! Run orchestration
//!
//! Resolves the selected collections, owns the fixture server for the
//! duration of the run, and executes collections one at a time against it.

pub mod catalog;

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;

use crate::commands::RunArgs;
use crate::common::config::Config;
use crate::common::paths::Layout;
use crate::common::{Error, Result};
use crate::engine::{run_collection, ConsoleReporter, HtmlReporter, RunOptions};
use crate::fixture::{self, Clock, FixtureServer, SystemClock};

pub use catalog::{CollectionDescriptor, COLLECTIONS};

/// Everything a run needs once arguments and configuration are resolved
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub layout: Layout,
    pub port: u16,
    pub api_key: String,
    pub keep_going: bool,
    pub collections: Vec<CollectionDescriptor>,
}

/// What the command line asks for, fully resolved
#[derive(Debug, Clone)]
pub enum Action {
    List,
    Serve { port: u16 },
    Run {
        plan: RunPlan,
        /// Requested keys that match no collection
        ignored_keys: Vec<String>,
    },
}

/// Resolve arguments and configuration into an [`Action`]
///
/// Touches nothing on disk besides reading the config file, so usage errors
/// leave the project root untouched.
pub fn prepare(args: RunArgs) -> Result<Action> {
    if args.list {
        return Ok(Action::List);
    }

    let requested = args.collection.as_deref();
    let collections: Vec<CollectionDescriptor> = catalog::select(COLLECTIONS, requested)?
        .into_iter()
        .copied()
        .collect();
    let ignored_keys = catalog::unknown_keys(COLLECTIONS, requested);

    let config = Config::load(args.config.as_deref())?;
    let port = config.resolve_port(args.port)?;

    if args.serve {
        return Ok(Action::Serve { port });
    }

    Ok(Action::Run {
        plan: RunPlan {
            layout: Layout::new(args.root),
            port,
            api_key: config.runner.api_key,
            keep_going: args.keep_going || config.runner.keep_going,
            collections,
        },
        ignored_keys,
    })
}

/// Carry out a resolved action
pub async fn run(action: Action) -> Result<()> {
    match action {
        Action::List => {
            print_collections();
            Ok(())
        }
        Action::Serve { port } => serve(port).await,
        Action::Run { plan, ignored_keys } => {
            for key in &ignored_keys {
                tracing::warn!("Ignoring unknown collection key '{}'", key);
            }
            execute(&plan).await
        }
    }
}

fn print_collections() {
    println!("Available collections:");
    for descriptor in COLLECTIONS {
        println!(" - {}: {}", descriptor.key, descriptor.name);
    }
}

/// Run a plan: start the server, run each collection, always stop the server
///
/// The server is stopped before any error from the collection loop is
/// returned, so the port is free again once this resolves.
pub async fn execute(plan: &RunPlan) -> Result<()> {
    plan.layout.ensure_reports_dir()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let server = FixtureServer::start(fixture::loopback(plan.port), clock.clone()).await?;
    println!(
        "Mock NASA API server listening at {}",
        server.base_url()
    );

    let result = run_collections(plan, &server.base_url(), &clock).await;

    let stopped = server.stop().await;
    println!("Mock NASA API server stopped.");

    result?;
    stopped
}

async fn run_collections(plan: &RunPlan, base_url: &str, clock: &Arc<dyn Clock>) -> Result<()> {
    let mut failed = Vec::new();

    for descriptor in &plan.collections {
        println!(
            "\n{}",
            format!(
                "--- Running collection: {} ({}) ---",
                descriptor.name, descriptor.key
            )
            .blue()
            .bold()
        );

        match run_one(plan, descriptor, base_url, clock).await {
            Ok(()) => {}
            Err(e) if plan.keep_going => {
                tracing::error!(collection = descriptor.key, "{}", e);
                failed.push(descriptor.key.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(Error::CollectionsFailed(failed))
    }
}

async fn run_one(
    plan: &RunPlan,
    descriptor: &CollectionDescriptor,
    base_url: &str,
    clock: &Arc<dyn Clock>,
) -> Result<()> {
    let report: PathBuf = plan.layout.report_file(descriptor.report);
    let options = RunOptions {
        collection: plan.layout.collection_file(descriptor.file),
        environment: Some(plan.layout.environment_file()),
        variables: vec![
            ("baseUrl".to_string(), base_url.to_string()),
            ("api_key".to_string(), plan.api_key.clone()),
        ],
        reporters: vec![
            Box::new(ConsoleReporter::new()),
            Box::new(HtmlReporter::new(report)),
        ],
        clock: clock.clone(),
    };

    let summary = run_collection(options).await?;
    match summary.first_failure() {
        Some(failure) => Err(Error::collection_failed(
            descriptor.name,
            &failure.to_string(),
        )),
        None => Ok(()),
    }
}

/// Serve fixtures until Ctrl+C or SIGTERM
async fn serve(port: u16) -> Result<()> {
    let server = FixtureServer::start(fixture::loopback(port), Arc::new(SystemClock)).await?;
    println!(
        "Mock NASA API server listening at {} (Ctrl+C to stop)",
        server.base_url()
    );

    let waited = wait_for_shutdown().await;

    let stopped = server.stop().await;
    println!("Mock NASA API server stopped.");

    waited?;
    stopped
}

#[cfg(unix)]
async fn wait_for_shutdown() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, shutting down");
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Received Ctrl+C, shutting down");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("Received Ctrl+C, shutting down");
    Ok(())
}
