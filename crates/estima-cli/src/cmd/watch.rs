use crate::cmd::{api_client, fail, load_state, require_workflow};
use crate::output::{render, OutputMode};
use anyhow::Result;
use clap::Args;
use estima_client::{poll_until_settled, PollHandle, PollOutcome, StatusResponse};
use estima_core::config::ProjectConfig;
use estima_core::reconcile;
use estima_core::session::{ExtractedData, Session, WorkflowStatus};
use estima_core::ErrorCode;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Override the poll interval in seconds.
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,
}

#[derive(Debug, Serialize)]
struct WatchReport {
    workflow_id: String,
    status: String,
    awaiting_review: bool,
}

/// Fold one status snapshot into the session.
///
/// Extraction results and the suggestion snapshot are adopted only once per
/// workflow; after that the local copies are the operator's to edit and a
/// later poll must not clobber them. Reconciliation itself is a no-op on a
/// sheet that already has content, so calling it every gate pass is safe.
pub fn apply_snapshot(
    session: &mut Session,
    config: &ProjectConfig,
    snapshot: &StatusResponse,
) -> Result<()> {
    let status = snapshot.workflow_status();
    session.status = Some(status.clone());

    if session.extracted.is_none() {
        if let Some(value) = &snapshot.extracted_data {
            session.extracted = Some(ExtractedData::from_value(value)?);
        }
    }

    if status.is_awaiting_review() {
        if let Some(suggested) = snapshot.suggested() {
            reconcile::reconcile(&mut session.sheet, &suggested, &config.rates.override_map());
            if session.suggested.is_none() {
                session.suggested = Some(suggested);
            }
        }
    }

    if status == WorkflowStatus::Completed {
        if let Some(text) = &snapshot.final_proposal {
            session.final_proposal = Some(text.clone());
        }
    }

    Ok(())
}

/// Execute `est watch`. Polls the workflow every couple of seconds until it
/// pauses for review, finishes, or disappears, folding each snapshot into
/// the session as it arrives.
pub fn run_watch(args: &WatchArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let (config, mut session) = load_state(project_root)?;
    let workflow_id = require_workflow(&session)?;
    let client = api_client(&config, &session);

    let interval = Duration::from_secs(args.interval.unwrap_or(config.api.poll_interval_secs));
    let handle = PollHandle::new();

    if output.is_pretty() {
        println!("Watching workflow {workflow_id} (every {}s)...", interval.as_secs());
    }

    let mut last_seen: Option<WorkflowStatus> = None;
    let mut review_snapshot: Option<StatusResponse> = None;

    let outcome = poll_until_settled(&client, &workflow_id, interval, &handle, |snapshot| {
        let status = snapshot.workflow_status();
        if last_seen.as_ref() != Some(&status) {
            if output.is_pretty() {
                println!("  status: {status}");
            }
            last_seen = Some(status.clone());
        }
        if status.is_awaiting_review() {
            review_snapshot = Some(snapshot.clone());
            return false;
        }
        true
    })
    .map_err(|err| crate::cmd::api_fail(&err))?;

    let final_snapshot = match outcome {
        PollOutcome::Terminal(snapshot) => Some(snapshot),
        PollOutcome::Cancelled => review_snapshot,
        PollOutcome::Gone => {
            session.status = None;
            session.save(project_root)?;
            return Err(fail(ErrorCode::WorkflowGone));
        }
    };

    let Some(snapshot) = final_snapshot else {
        // Only reachable through an external cancel before the first fetch.
        return Ok(());
    };

    apply_snapshot(&mut session, &config, &snapshot)?;
    session.save(project_root)?;

    let status = snapshot.workflow_status();
    let report = WatchReport {
        workflow_id,
        status: status.as_wire(),
        awaiting_review: status.is_awaiting_review(),
    };
    render(output, &report, |report, w| {
        if report.awaiting_review {
            writeln!(w, "✓ Workflow paused for review.")?;
            writeln!(w)?;
            writeln!(w, "Inspect and adjust the estimate:")?;
            writeln!(w, "    est show")?;
            writeln!(w, "    est hours <stage> <role> <hours>")?;
            writeln!(w)?;
            writeln!(w, "Then send it back:")?;
            writeln!(w, "    est approve")
        } else {
            writeln!(w, "Workflow {} finished with status {}.", report.workflow_id, report.status)
        }
    })
}
