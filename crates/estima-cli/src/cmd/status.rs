use crate::cmd::{api_client, api_fail, load_state, require_workflow};
use crate::cmd::watch::apply_snapshot;
use crate::output::{pretty_kv, render_mode, OutputMode};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct StatusArgs {}

#[derive(Debug, Serialize)]
struct StatusReport {
    workflow_id: String,
    status: String,
    has_extraction: bool,
    has_suggestion: bool,
    has_proposal: bool,
}

/// Execute `est status`. One status fetch, folded into the session the same
/// way `est watch` does per tick.
pub fn run_status(_args: &StatusArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let (config, mut session) = load_state(project_root)?;
    let workflow_id = require_workflow(&session)?;
    let client = api_client(&config, &session);

    let snapshot = client.status(&workflow_id).map_err(|err| api_fail(&err))?;
    apply_snapshot(&mut session, &config, &snapshot)?;
    session.save(project_root)?;

    let report = StatusReport {
        workflow_id,
        status: snapshot.workflow_status().as_wire(),
        has_extraction: session.extracted.is_some(),
        has_suggestion: session.suggested.is_some(),
        has_proposal: session.final_proposal.is_some(),
    };
    render_mode(
        output,
        &report,
        |report, w| writeln!(w, "{}\t{}", report.workflow_id, report.status),
        |report, w| {
            pretty_kv(w, "workflow", &report.workflow_id)?;
            pretty_kv(w, "status", &report.status)?;
            pretty_kv(w, "extraction", if report.has_extraction { "yes" } else { "no" })?;
            pretty_kv(w, "suggestion", if report.has_suggestion { "yes" } else { "no" })?;
            pretty_kv(w, "proposal", if report.has_proposal { "yes" } else { "no" })
        },
    )
}
