use crate::cmd::fail;
use crate::output::{render_success, OutputMode};
use anyhow::Result;
use clap::{Args, Subcommand};
use estima_core::money::Money;
use estima_core::session::Session;
use estima_core::ErrorCode;
use std::path::Path;

#[derive(Args, Debug)]
pub struct RoleArgs {
    #[command(subcommand)]
    pub command: RoleCommand,
}

#[derive(Subcommand, Debug)]
pub enum RoleCommand {
    /// Add a role with an hourly rate.
    Add {
        /// Role name (must be non-empty and unused).
        name: String,

        /// Hourly rate in whole currency units.
        #[arg(long)]
        rate: i64,
    },
    /// Remove a role and its column of hours.
    Rm {
        /// Role name.
        name: String,
    },
    /// Change an existing role's hourly rate.
    Rate {
        /// Role name.
        name: String,

        /// New hourly rate in whole currency units.
        rate: i64,
    },
}

/// Execute `est role`. Role mutations cascade the same way stages do:
/// removing a role drops its hours from every stage row.
pub fn run_role(args: &RoleArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let mut session = Session::load(project_root)?;

    match &args.command {
        RoleCommand::Add { name, rate } => {
            if !session.sheet.add_role(name, Money::from_units(*rate)) {
                return Err(fail(ErrorCode::DuplicateName));
            }
            session.save(project_root)?;
            render_success(
                output,
                &format!("Added role '{}' at {rate}/h", name.trim()),
            )
        }
        RoleCommand::Rm { name } => {
            if !session.sheet.remove_role(name) {
                return Err(fail(ErrorCode::UnknownRole));
            }
            session.save(project_root)?;
            render_success(output, &format!("Removed role '{name}'"))
        }
        RoleCommand::Rate { name, rate } => {
            if !session.sheet.set_rate(name, Money::from_units(*rate)) {
                return Err(fail(ErrorCode::UnknownRole));
            }
            session.save(project_root)?;
            render_success(output, &format!("Set rate for '{name}' to {rate}/h"))
        }
    }
}
