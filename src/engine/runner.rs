//! Collection runner implementation
//!
//! Executes a collection's requests in order against whatever server the
//! variables point at, evaluating expectations and feeding reporters.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::common::Result;
use crate::fixture::Clock;

use super::assertions::{self, AssertionOutcome, ObservedResponse};
use super::collection::{Collection, Environment, RequestItem};
use super::reporter::Reporter;
use super::variables::Variables;

/// Everything needed to run one collection
pub struct RunOptions {
    /// Collection definition file
    pub collection: PathBuf,
    /// Shared environment file, if any
    pub environment: Option<PathBuf>,
    /// Variables overriding the environment (e.g. `baseUrl`)
    pub variables: Vec<(String, String)>,
    /// Reporters notified as the run progresses
    pub reporters: Vec<Box<dyn Reporter>>,
    /// Source of dynamic date variables; must match the target server's clock
    pub clock: Arc<dyn Clock>,
}

/// Record of one executed request
#[derive(Debug, Clone)]
pub struct Execution {
    pub name: String,
    pub method: String,
    pub url: String,
    /// Response status, `None` when the request itself failed
    pub status: Option<u16>,
    pub elapsed: Duration,
    pub assertions: Vec<AssertionOutcome>,
}

impl Execution {
    pub fn passed(&self) -> bool {
        self.assertions.iter().all(AssertionOutcome::passed)
    }
}

/// A failed check, attributed to its request
#[derive(Debug, Clone)]
pub struct Failure {
    pub request: String,
    pub assertion: String,
    pub message: String,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} > {}: {}", self.request, self.assertion, self.message)
    }
}

/// Result of running a collection
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub collection: String,
    pub executions: Vec<Execution>,
    /// Every failed check, in execution order; empty on success
    pub failures: Vec<Failure>,
    pub duration: Duration,
}

impl RunSummary {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// The first failed check, which is what aborts a run
    pub fn first_failure(&self) -> Option<&Failure> {
        self.failures.first()
    }

    /// Total number of checks evaluated
    pub fn assertion_count(&self) -> usize {
        self.executions.iter().map(|e| e.assertions.len()).sum()
    }
}

/// Run a collection and return its summary
///
/// Assertion failures and per-request transport errors are recorded in the
/// summary rather than returned as errors. Errors are reserved for problems
/// that prevent the run from happening at all: unreadable definitions, an
/// unusable HTTP client, or a reporter that cannot write its output.
pub async fn run_collection(options: RunOptions) -> Result<RunSummary> {
    let RunOptions {
        collection,
        environment,
        variables,
        mut reporters,
        clock,
    } = options;

    let collection = Collection::load(&collection)?;
    let environment = environment
        .as_deref()
        .map(Environment::load)
        .transpose()?;
    let vars = Variables::new(clock, environment.as_ref(), &variables);

    let client = reqwest::Client::builder()
        .user_agent(concat!("nasa-mock-runner/", env!("CARGO_PKG_VERSION")))
        // Runs target the loopback fixture server; never route through a proxy
        .no_proxy()
        .build()?;

    tracing::debug!(
        collection = %collection.name,
        requests = collection.requests.len(),
        environment = environment.as_ref().map(|e| e.name.as_str()),
        "Starting collection run"
    );

    for reporter in reporters.iter_mut() {
        reporter.on_start(&collection);
    }

    let started = Instant::now();
    let mut executions = Vec::with_capacity(collection.requests.len());
    let mut failures = Vec::new();

    for item in &collection.requests {
        let execution = execute_request(&client, item, &vars).await;

        for outcome in &execution.assertions {
            if let Some(message) = &outcome.error {
                failures.push(Failure {
                    request: execution.name.clone(),
                    assertion: outcome.name.clone(),
                    message: message.clone(),
                });
            }
        }

        for reporter in reporters.iter_mut() {
            reporter.on_request(&execution);
        }
        executions.push(execution);
    }

    let summary = RunSummary {
        collection: collection.name,
        executions,
        failures,
        duration: started.elapsed(),
    };

    tracing::info!(
        collection = %summary.collection,
        requests = summary.executions.len(),
        failures = summary.failures.len(),
        elapsed_ms = summary.duration.as_millis() as u64,
        "Collection run finished"
    );

    for reporter in reporters.iter_mut() {
        reporter.on_finish(&summary)?;
    }

    Ok(summary)
}

/// Execute one request and evaluate its expectations
async fn execute_request(client: &reqwest::Client, item: &RequestItem, vars: &Variables) -> Execution {
    let url = vars.resolve(&item.url);
    let query: Vec<(String, String)> = item
        .query
        .iter()
        .map(|kv| (kv.key.clone(), vars.resolve(&kv.value)))
        .collect();

    let started = Instant::now();
    let response = client
        .request(item.method.into(), url.as_str())
        .query(&query)
        .send()
        .await;

    let display_url = if query.is_empty() {
        url.clone()
    } else {
        let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}?{}", url, pairs.join("&"))
    };

    let mut execution = Execution {
        name: item.name.clone(),
        method: item.method.as_str().to_string(),
        url: display_url,
        status: None,
        elapsed: Duration::ZERO,
        assertions: Vec::new(),
    };

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(request = %item.name, "Request failed: {}", e);
            execution.elapsed = started.elapsed();
            execution.assertions.push(AssertionOutcome {
                name: "request completes".to_string(),
                error: Some(format!("request error: {e}")),
            });
            return execution;
        }
    };

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            execution.status = Some(status);
            execution.elapsed = started.elapsed();
            execution.assertions.push(AssertionOutcome {
                name: "response body is readable".to_string(),
                error: Some(format!("failed to read body: {e}")),
            });
            return execution;
        }
    };
    execution.status = Some(status);
    execution.elapsed = started.elapsed();

    tracing::debug!(
        request = %item.name,
        method = item.method.as_str(),
        url = %execution.url,
        status,
        "Request completed"
    );

    let observed = ObservedResponse {
        status,
        content_type: content_type.as_deref(),
        body: &body,
    };
    execution.assertions = assertions::evaluate(&item.expect, &observed, vars);
    execution
}
