use crate::cmd::{api_client, api_fail, load_state};
use crate::output::{render_success, OutputMode};
use anyhow::{Context as _, Result};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Output path for the rendered document.
    #[arg(long, short, default_value = "proposal.docx")]
    pub output: PathBuf,
}

/// Execute `est download`. Sends the finished proposal text to the renderer
/// endpoint and writes the returned document bytes to disk.
pub fn run_download(args: &DownloadArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let (config, session) = load_state(project_root)?;
    let Some(text) = &session.final_proposal else {
        anyhow::bail!("No finished proposal in this session. Run `est watch` until COMPLETED.");
    };

    let client = api_client(&config, &session);
    let bytes = client.download_docx(text).map_err(|err| api_fail(&err))?;

    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    tracing::info!(path = %args.output.display(), bytes = bytes.len(), "document written");
    render_success(
        output,
        &format!("Wrote {} ({} bytes)", args.output.display(), bytes.len()),
    )
}
