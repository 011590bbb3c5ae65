use crate::cmd::{api_client, api_fail, load_state};
use crate::output::{render, OutputMode};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Requirements document to upload (.docx, .pdf, ...).
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct StartReport {
    workflow_id: String,
    file: String,
}

/// Execute `est start`. Uploads the document, replaces the tracked session
/// with a fresh one for the new workflow, and keeps only auth across the
/// reset so the next review gate reconciles from scratch.
pub fn run_start(args: &StartArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .context("Upload path has no usable file name")?;

    let (config, mut session) = load_state(project_root)?;
    let client = api_client(&config, &session);

    let response = client
        .start(file_name, &bytes)
        .map_err(|err| api_fail(&err))?;

    tracing::info!(workflow_id = %response.workflow_id, "workflow started");

    session.reset_for(response.workflow_id.clone());
    session.save(project_root)?;

    let report = StartReport {
        workflow_id: response.workflow_id,
        file: file_name.to_string(),
    };
    render(output, &report, |report, w| {
        writeln!(w, "✓ Started workflow {}", report.workflow_id)?;
        writeln!(w)?;
        writeln!(w, "Follow progress with:")?;
        writeln!(w, "    est watch")
    })
}
