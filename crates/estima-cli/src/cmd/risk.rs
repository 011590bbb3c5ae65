use crate::cmd::fail;
use crate::output::{render_success, OutputMode};
use anyhow::Result;
use clap::Args;
use estima_core::session::Session;
use estima_core::Risk;
use estima_core::ErrorCode;
use std::path::Path;

#[derive(Args, Debug)]
pub struct RiskArgs {
    /// Stage name.
    pub stage: String,

    /// Risk coefficient between 1.0 and 2.0, in steps of 0.1.
    #[arg(allow_hyphen_values = true)]
    pub coefficient: f64,
}

/// Execute `est risk`. The coefficient is clamped to the valid range; 1.0
/// clears the stage back to baseline.
pub fn run_risk(args: &RiskArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let mut session = Session::load(project_root)?;

    let risk = Risk::from_coefficient(args.coefficient);
    if !session.sheet.set_risk(&args.stage, risk) {
        return Err(fail(ErrorCode::UnknownStage));
    }

    session.save(project_root)?;
    render_success(output, &format!("Set risk for '{}' to {risk}", args.stage))
}
