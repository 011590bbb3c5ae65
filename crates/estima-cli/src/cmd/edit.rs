use crate::cmd::fail;
use crate::output::{render_success, OutputMode};
use anyhow::Result;
use clap::{Args, ValueEnum};
use estima_core::session::Session;
use estima_core::ErrorCode;
use std::path::Path;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Which extracted field to overwrite.
    #[arg(value_enum)]
    pub field: ExtractedField,

    /// New value. List-style fields take newline-separated lines.
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtractedField {
    ClientName,
    ProjectEssence,
    BusinessGoals,
    KeyFeatures,
    TechStack,
}

impl ExtractedField {
    const fn label(self) -> &'static str {
        match self {
            Self::ClientName => "client_name",
            Self::ProjectEssence => "project_essence",
            Self::BusinessGoals => "business_goals",
            Self::KeyFeatures => "key_features",
            Self::TechStack => "tech_stack",
        }
    }
}

/// Execute `est edit`. Overwrites one editable field of the extraction
/// result; the edited copy is what `est approve` echoes back as
/// `updated_data`. Fields the CLI does not model ride along untouched.
pub fn run_edit(args: &EditArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let mut session = Session::load(project_root)?;
    let Some(extracted) = session.extracted.as_mut() else {
        return Err(fail(ErrorCode::NotAwaitingReview));
    };

    let slot = match args.field {
        ExtractedField::ClientName => &mut extracted.client_name,
        ExtractedField::ProjectEssence => &mut extracted.project_essence,
        ExtractedField::BusinessGoals => &mut extracted.business_goals,
        ExtractedField::KeyFeatures => &mut extracted.key_features,
        ExtractedField::TechStack => &mut extracted.tech_stack,
    };
    *slot = args.value.clone();

    session.save(project_root)?;
    render_success(output, &format!("Updated {}", args.field.label()))
}
