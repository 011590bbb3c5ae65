use crate::output::{pretty_kv, pretty_rule, pretty_section, render_mode, OutputMode};
use anyhow::Result;
use clap::Args;
use estima_core::session::Session;
use estima_core::sheet::EstimateSheet;
use estima_core::totals::{self, Totals};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ShowArgs {}

#[derive(Debug, Serialize)]
struct SheetReport {
    stages: Vec<StageRow>,
    totals: Totals,
}

#[derive(Debug, Serialize)]
struct StageRow {
    stage: String,
    risk: f64,
    cells: Vec<CellView>,
}

#[derive(Debug, Serialize)]
struct CellView {
    role: String,
    hours: u32,
    modified: bool,
}

fn build_report(sheet: &EstimateSheet) -> SheetReport {
    let stages = sheet
        .stages()
        .iter()
        .map(|stage| StageRow {
            stage: stage.to_string(),
            risk: sheet.risk(stage).coefficient(),
            cells: sheet
                .rates()
                .names()
                .map(|role| CellView {
                    role: role.to_string(),
                    hours: sheet.hours(stage, role),
                    modified: sheet.is_modified(stage, role),
                })
                .collect(),
        })
        .collect();

    SheetReport {
        stages,
        totals: totals::compute(sheet),
    }
}

/// Execute `est show`. Renders the full sheet with per-stage and per-role
/// subtotals, risk-adjusted stage costs, and grand totals. Everything is
/// recomputed on the spot; there is no cached figure to go stale.
pub fn run_show(_args: &ShowArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let session = Session::load(project_root)?;
    let report = build_report(&session.sheet);
    let rates = session.sheet.rates().clone();

    render_mode(
        output,
        &report,
        |report, w| {
            for row in &report.stages {
                for cell in &row.cells {
                    writeln!(w, "{}\t{}\t{}", row.stage, cell.role, cell.hours)?;
                }
            }
            writeln!(w, "total_hours\t{}", report.totals.total_hours)?;
            writeln!(w, "total_cost\t{}", report.totals.total_cost)?;
            writeln!(w, "total_with_risk\t{}", report.totals.total_cost_with_risk)
        },
        |report, w| {
            if report.stages.is_empty() && report.totals.role_hours.is_empty() {
                writeln!(w, "Empty sheet. Add stages and roles, or run `est watch`.")?;
                return Ok(());
            }

            for row in &report.stages {
                let heading = if (row.risk - 1.0).abs() < f64::EPSILON {
                    row.stage.clone()
                } else {
                    format!("{} (risk ×{:.1})", row.stage, row.risk)
                };
                pretty_section(w, &heading)?;
                for cell in &row.cells {
                    let marker = if cell.modified { " *" } else { "" };
                    writeln!(w, "  {:<16} {:>6}h{marker}", cell.role, cell.hours)?;
                }
                let stage_cost = report.totals.stage_cost.get(&row.stage);
                let with_risk = report.totals.stage_cost_with_risk.get(&row.stage);
                if let (Some(cost), Some(risked)) = (stage_cost, with_risk) {
                    if cost == risked {
                        writeln!(w, "  {:<16} {cost}", "subtotal")?;
                    } else {
                        writeln!(w, "  {:<16} {cost} ({risked} with risk)", "subtotal")?;
                    }
                }
                writeln!(w)?;
            }

            pretty_section(w, "Per role")?;
            for role in rates.iter() {
                let hours = report.totals.role_hours.get(&role.name).copied().unwrap_or(0);
                let cost = report
                    .totals
                    .role_cost
                    .get(&role.name)
                    .copied()
                    .unwrap_or_default();
                writeln!(
                    w,
                    "  {:<16} {:>6}h  {cost} ({}/h)",
                    role.name,
                    hours,
                    role.rate
                )?;
            }
            writeln!(w)?;

            pretty_rule(w)?;
            pretty_kv(w, "total hours", format!("{}h", report.totals.total_hours))?;
            pretty_kv(w, "total cost", report.totals.total_cost.to_string())?;
            pretty_kv(
                w,
                "with risk",
                report.totals.total_cost_with_risk.to_string(),
            )
        },
    )
}
