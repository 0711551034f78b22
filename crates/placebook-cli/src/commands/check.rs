//! Membership consistency check

use placebook_core::errors::{ExError, Result};
use placebook_engine::Engine;
use serde_json::json;

use super::print_json;

pub fn execute(engine: &Engine) -> Result<()> {
    let issues = engine.membership_issues()?;
    let report: Vec<String> = issues.iter().map(ToString::to_string).collect();

    print_json(&json!({
        "consistent": report.is_empty(),
        "issues": report,
    }));

    if !issues.is_empty() {
        return Err(ExError::operation_failed(
            "check",
            format!("{} membership issue(s) found", issues.len()),
        ));
    }
    Ok(())
}
