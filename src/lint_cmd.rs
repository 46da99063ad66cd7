//! `corpus lint` command: run the lint rules and print the report.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::lint::{lint_store, LintReport, Severity};
use crate::progress::ProgressMode;
use crate::store::ContentStore;

pub fn run_lint(
    config: &Config,
    store: &dyn ContentStore,
    progress: ProgressMode,
    json: bool,
) -> Result<()> {
    let reporter = progress.reporter();
    let report = lint_store(store, &config.lint, reporter.as_ref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.failed(config.lint.deny_warnings) {
        bail!(
            "lint failed: {} error(s), {} warning(s)",
            report.errors,
            report.warnings
        );
    }
    Ok(())
}

fn print_report(report: &LintReport) {
    for v in &report.violations {
        let location = match v.line {
            Some(line) => format!("{}:{}", v.path, line),
            None => v.path.clone(),
        };
        let severity = match v.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{}: {} [{}] {}", location, severity, v.rule.code(), v.message);
        println!("  hint: {}", v.hint);
    }
    if !report.violations.is_empty() {
        println!();
    }
    println!(
        "checked {} documents: {} error(s), {} warning(s)",
        report.documents_checked, report.errors, report.warnings
    );
}
