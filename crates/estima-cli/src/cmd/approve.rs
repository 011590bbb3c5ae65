use crate::cmd::{api_client, api_fail, fail, load_state, require_workflow};
use crate::output::{render_success, OutputMode};
use anyhow::Result;
use clap::Args;
use estima_client::ApprovalRequest;
use estima_core::session::WorkflowStatus;
use estima_core::ErrorCode;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ApproveArgs {
    /// Approve even when the locally cached status is not the review gate.
    #[arg(long)]
    pub force: bool,
}

/// Execute `est approve`. Sends the edited extraction data plus the final
/// hour matrix and rates back to the workflow, then optimistically records
/// the status as GENERATING so the next `est watch` picks up from there.
pub fn run_approve(args: &ApproveArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let (config, mut session) = load_state(project_root)?;
    let workflow_id = require_workflow(&session)?;

    let at_gate = session
        .status
        .as_ref()
        .is_some_and(WorkflowStatus::is_awaiting_review);
    if !at_gate && !args.force {
        return Err(fail(ErrorCode::NotAwaitingReview));
    }

    let payload = ApprovalRequest::new(session.updated_data()?, &session.sheet);
    let client = api_client(&config, &session);
    client
        .approve(&workflow_id, &payload)
        .map_err(|err| api_fail(&err))?;

    tracing::info!(workflow_id = %workflow_id, "estimate approved");

    session.status = Some(WorkflowStatus::Generating);
    session.save(project_root)?;

    render_success(
        output,
        "Approved. Run `est watch` to wait for the generated proposal.",
    )
}
