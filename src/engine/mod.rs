//! Collection engine
//!
//! Reads YAML collections of HTTP requests with declarative expectations,
//! executes them against a base URL and reports the outcome. Assertions are
//! made against parsed JSON rather than raw response text.

mod assertions;
mod collection;
mod reporter;
mod runner;
mod variables;

pub use assertions::{lookup, AssertionOutcome};
pub use collection::*;
pub use reporter::{render_html, ConsoleReporter, HtmlReporter, Reporter};
pub use runner::{run_collection, Execution, Failure, RunOptions, RunSummary};
pub use variables::{Variables, DEFAULT_DATE_VAR};
