use crate::cmd::fail;
use crate::output::{render, OutputMode};
use anyhow::Result;
use clap::Args;
use estima_core::matching;
use estima_core::session::Session;
use estima_core::ErrorCode;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct IssuesArgs {
    /// Only show issues the matcher could not anchor to a feature line.
    #[arg(long)]
    pub unmatched: bool,
}

/// One flagged requirement as the extractor reports it. Everything defaults
/// because the payload is LLM-assembled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RequirementIssue {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    field: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    item_text: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Serialize)]
struct IssueView {
    #[serde(flatten)]
    issue: RequirementIssue,
    /// Index of the matched feature line, when the fuzzy match found one.
    matched_line: Option<usize>,
}

#[derive(Debug, Serialize)]
struct IssuesReport {
    issues: Vec<IssueView>,
}

/// Execute `est issues`. Lists the extractor's flagged requirements and
/// anchors each one to a key-feature line via the same forgiving matcher the
/// review screen uses: exact case-folded compare first, then containment
/// either way for annotations longer than a handful of characters.
pub fn run_issues(args: &IssuesArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let session = Session::load(project_root)?;
    let Some(extracted) = &session.extracted else {
        return Err(fail(ErrorCode::NoActiveWorkflow));
    };

    // A malformed issues array degrades to "no issues" rather than blocking
    // the review; the raw payload still rides along in the session file.
    let issues: Vec<RequirementIssue> = extracted
        .extra
        .get("requirement_issues")
        .and_then(|value| serde_json::from_value(value.clone()).ok())
        .unwrap_or_default();

    let lines = extracted.feature_lines();
    let mut views: Vec<IssueView> = issues
        .into_iter()
        .map(|issue| {
            let matched_line = matching::match_annotation(&issue.item_text, &lines);
            IssueView {
                issue,
                matched_line,
            }
        })
        .collect();

    if args.unmatched {
        views.retain(|view| view.matched_line.is_none());
    }

    let report = IssuesReport { issues: views };
    render(output, &report, |report, w| {
        if report.issues.is_empty() {
            writeln!(w, "No requirement issues.")?;
            return Ok(());
        }
        for view in &report.issues {
            let anchor = view.matched_line.map_or_else(
                || "unmatched".to_string(),
                |index| format!("feature line {}", index + 1),
            );
            writeln!(
                w,
                "[{}] {} ({anchor})",
                view.issue.category, view.issue.item_text
            )?;
            if !view.issue.reason.is_empty() {
                writeln!(w, "    {}", view.issue.reason)?;
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::RequirementIssue;
    use serde_json::json;

    #[test]
    fn issue_decodes_sparse_payload() {
        let issue: RequirementIssue =
            serde_json::from_value(json!({"item_text": "SSO login", "reason": "no IdP named"}))
                .expect("decode");
        assert_eq!(issue.item_text, "SSO login");
        assert!(issue.kind.is_empty());
    }

    #[test]
    fn issue_maps_type_keyword() {
        let issue: RequirementIssue =
            serde_json::from_value(json!({"type": "ambiguity", "field": "key_features"}))
                .expect("decode");
        assert_eq!(issue.kind, "ambiguity");
        assert_eq!(issue.field, "key_features");
    }
}
