//! Run reporters
//!
//! The console reporter prints progress as requests complete; the HTML
//! reporter exports a standalone page when the run finishes.

use std::fmt::Write as _;
use std::path::PathBuf;

use colored::Colorize;

use crate::common::{Error, Result};

use super::collection::Collection;
use super::runner::{Execution, RunSummary};

/// Receives events while a collection runs
pub trait Reporter: Send {
    fn on_start(&mut self, _collection: &Collection) {}

    fn on_request(&mut self, _execution: &Execution) {}

    /// Called once with the final summary; an error aborts the run
    fn on_finish(&mut self, _summary: &RunSummary) -> Result<()> {
        Ok(())
    }
}

/// Prints each request and its checks to stdout
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    step: usize,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for ConsoleReporter {
    fn on_start(&mut self, collection: &Collection) {
        self.step = 0;
        println!("\n{}", collection.name.white().bold());
        if let Some(desc) = &collection.description {
            println!("  {}", desc.dimmed());
        }
    }

    fn on_request(&mut self, execution: &Execution) {
        self.step += 1;
        let status = execution
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "---".to_string());

        println!(
            "\n{} {} {} {} [{}, {}ms]",
            format!("→ {}.", self.step).cyan(),
            execution.name,
            execution.method.dimmed(),
            execution.url.dimmed(),
            status,
            execution.elapsed.as_millis()
        );

        for outcome in &execution.assertions {
            match &outcome.error {
                None => println!("  {} {}", "✓".green(), outcome.name.dimmed()),
                Some(message) => println!("  {} {}: {}", "✗".red(), outcome.name, message.red()),
            }
        }
    }

    fn on_finish(&mut self, summary: &RunSummary) -> Result<()> {
        let requests = summary.executions.len();
        let checks = summary.assertion_count();
        if summary.passed() {
            println!(
                "\n{} {} requests, {} checks passed ({}ms)",
                "✓".green().bold(),
                requests,
                checks,
                summary.duration.as_millis()
            );
        } else {
            println!(
                "\n{} {} of {} checks failed across {} requests",
                "✗".red().bold(),
                summary.failures.len(),
                checks,
                requests
            );
            for (i, failure) in summary.failures.iter().enumerate() {
                println!("  {}. {}", i + 1, failure);
            }
        }
        Ok(())
    }
}

/// Exports the run summary as a standalone HTML page
#[derive(Debug)]
pub struct HtmlReporter {
    path: PathBuf,
}

impl HtmlReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Reporter for HtmlReporter {
    fn on_finish(&mut self, summary: &RunSummary) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::Report(format!("cannot create '{}': {}", dir.display(), e))
            })?;
        }

        std::fs::write(&self.path, render_html(summary))
            .map_err(|e| Error::Report(format!("cannot write '{}': {}", self.path.display(), e)))?;

        tracing::info!("HTML report written to {}", self.path.display());
        Ok(())
    }
}

/// Render the report page
pub fn render_html(summary: &RunSummary) -> String {
    let mut html = String::new();
    let title = escape(&summary.collection);
    let (verdict, verdict_class) = if summary.passed() {
        ("PASSED", "pass")
    } else {
        ("FAILED", "fail")
    };

    // Writing into a String cannot fail
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - run report</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; color: #222; }}
table {{ border-collapse: collapse; margin-bottom: 1.5rem; }}
td, th {{ border: 1px solid #ccc; padding: 0.3rem 0.6rem; text-align: left; }}
.pass {{ color: #1a7f37; }}
.fail {{ color: #cf222e; }}
code {{ background: #f4f4f4; padding: 0 0.2rem; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p class="{verdict_class}"><strong>{verdict}</strong></p>
<table>
<tr><th>Requests</th><td>{requests}</td></tr>
<tr><th>Checks</th><td>{checks}</td></tr>
<tr><th>Failed checks</th><td>{failed}</td></tr>
<tr><th>Duration</th><td>{duration} ms</td></tr>
</table>
"#,
        requests = summary.executions.len(),
        checks = summary.assertion_count(),
        failed = summary.failures.len(),
        duration = summary.duration.as_millis(),
    );

    if !summary.failures.is_empty() {
        let _ = writeln!(html, "<h2>Failures</h2>\n<ol>");
        for failure in &summary.failures {
            let _ = writeln!(html, r#"<li class="fail">{}</li>"#, escape(&failure.to_string()));
        }
        let _ = writeln!(html, "</ol>");
    }

    let _ = writeln!(html, "<h2>Requests</h2>");
    for execution in &summary.executions {
        let class = if execution.passed() { "pass" } else { "fail" };
        let status = execution
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "no response".to_string());
        let _ = writeln!(
            html,
            r#"<h3 class="{class}">{name}</h3>
<p><code>{method} {url}</code> &rarr; {status} ({elapsed} ms)</p>
<ul>"#,
            name = escape(&execution.name),
            method = escape(&execution.method),
            url = escape(&execution.url),
            elapsed = execution.elapsed.as_millis(),
        );
        for outcome in &execution.assertions {
            match &outcome.error {
                None => {
                    let _ = writeln!(html, r#"<li class="pass">{}</li>"#, escape(&outcome.name));
                }
                Some(message) => {
                    let _ = writeln!(
                        html,
                        r#"<li class="fail">{}: {}</li>"#,
                        escape(&outcome.name),
                        escape(message)
                    );
                }
            }
        }
        let _ = writeln!(html, "</ul>");
    }

    let _ = writeln!(html, "</body>\n</html>");
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
