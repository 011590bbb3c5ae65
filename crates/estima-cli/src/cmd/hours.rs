use crate::cmd::fail_with;
use crate::output::{render_success, OutputMode};
use anyhow::Result;
use clap::Args;
use estima_core::session::Session;
use estima_core::sheet::EstimateSheet;
use estima_core::ErrorCode;
use std::path::Path;

#[derive(Args, Debug)]
pub struct HoursArgs {
    /// Stage name.
    pub stage: String,

    /// Role name.
    pub role: String,

    /// Hour count. Anything unparseable or negative coerces to 0, the same
    /// forgiving way a form input would.
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Execute `est hours`. Marks the cell as human-edited, which is what keeps
/// a later reconciliation pass from overwriting it.
pub fn run_hours(args: &HoursArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let mut session = Session::load(project_root)?;

    let hours = EstimateSheet::coerce_hours(&args.value);
    if !session.sheet.set_hours(&args.stage, &args.role, hours) {
        if !session.sheet.stages().contains(&args.stage) {
            return Err(fail_with(ErrorCode::UnknownStage, &args.stage));
        }
        return Err(fail_with(ErrorCode::UnknownRole, &args.role));
    }

    session.save(project_root)?;
    render_success(
        output,
        &format!("Set {} / {} to {hours}h", args.stage, args.role),
    )
}
