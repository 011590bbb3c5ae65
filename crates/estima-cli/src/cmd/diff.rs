use crate::cmd::fail;
use crate::output::{render, OutputMode};
use anyhow::Result;
use clap::Args;
use estima_core::reconcile::{self, CellDelta};
use estima_core::session::Session;
use estima_core::ErrorCode;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct DiffArgs {}

#[derive(Debug, Serialize)]
struct DiffReport {
    deltas: Vec<CellDelta>,
}

/// Execute `est diff`. Shows every cell where the human estimate departs
/// from the server suggestion captured at the review gate, as signed hour
/// deltas.
pub fn run_diff(_args: &DiffArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let session = Session::load(project_root)?;
    let Some(suggested) = &session.suggested else {
        return Err(fail(ErrorCode::NotAwaitingReview));
    };

    let report = DiffReport {
        deltas: reconcile::deltas(&session.sheet, suggested),
    };
    render(output, &report, |report, w| {
        if report.deltas.is_empty() {
            writeln!(w, "No changes against the suggested estimate.")?;
            return Ok(());
        }
        for delta in &report.deltas {
            writeln!(
                w,
                "{:<20} {:<16} {:+}h",
                delta.stage, delta.role, delta.delta
            )?;
        }
        Ok(())
    })
}
