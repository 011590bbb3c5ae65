use anyhow::{Context as _, Result};
use clap::Args;
use estima_core::config;
use estima_core::session::STATE_DIR;
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.estima/` already exists.
    #[arg(long)]
    pub force: bool,
}

const GITIGNORE: &str = "session.json\n*.docx\n";

/// Execute `est init`. Creates the project skeleton:
///
/// ```text
/// .estima/
///   config.toml     (API base URL, poll interval, rate overrides)
///   .gitignore      (session.json, downloaded documents)
/// ```
///
/// # Errors
///
/// Returns an error if `.estima/` already exists and `--force` is not set,
/// or if any filesystem operation fails.
pub fn run_init(args: &InitArgs, project_root: &Path) -> Result<()> {
    let state_dir = project_root.join(STATE_DIR);

    if state_dir.exists() && !args.force {
        anyhow::bail!(".estima/ already exists. Use `est init --force` to reinitialize.");
    }

    if args.force && state_dir.exists() {
        let config_path = state_dir.join("config.toml");
        if config_path.exists() {
            std::fs::remove_file(&config_path)
                .with_context(|| format!("Failed to remove {}", config_path.display()))?;
        }
    }

    config::write_default_config(project_root)?;

    let gitignore_path = state_dir.join(".gitignore");
    std::fs::write(&gitignore_path, GITIGNORE)
        .with_context(|| format!("Failed to write {}", gitignore_path.display()))?;

    println!("✓ Initialized .estima/ project structure.");
    println!();
    println!("  Config: .estima/config.toml");
    println!();
    println!("Next steps:");
    println!("  Log in to the portal:");
    println!("    est login <username>");
    println!();
    println!("  Upload a brief and start a workflow:");
    println!("    est start requirements.docx");

    Ok(())
}
