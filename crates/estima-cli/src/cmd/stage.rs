use crate::cmd::fail;
use crate::output::{render_success, OutputMode};
use anyhow::Result;
use clap::{Args, Subcommand};
use estima_core::session::Session;
use estima_core::ErrorCode;
use std::path::Path;

#[derive(Args, Debug)]
pub struct StageArgs {
    #[command(subcommand)]
    pub command: StageCommand,
}

#[derive(Subcommand, Debug)]
pub enum StageCommand {
    /// Append a stage to the end of the stage list.
    Add {
        /// Stage name (must be non-empty and unused).
        name: String,
    },
    /// Remove a stage and its row of hours.
    Rm {
        /// Stage name.
        name: String,
    },
}

/// Execute `est stage`. Stage mutations cascade: removing a stage drops its
/// hour row, its modification marks, and its risk coefficient together.
pub fn run_stage(args: &StageArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let mut session = Session::load(project_root)?;

    match &args.command {
        StageCommand::Add { name } => {
            if !session.sheet.add_stage(name) {
                return Err(fail(ErrorCode::DuplicateName));
            }
            session.save(project_root)?;
            render_success(output, &format!("Added stage '{}'", name.trim()))
        }
        StageCommand::Rm { name } => {
            if !session.sheet.remove_stage(name) {
                return Err(fail(ErrorCode::UnknownStage));
            }
            session.save(project_root)?;
            render_success(output, &format!("Removed stage '{name}'"))
        }
    }
}
