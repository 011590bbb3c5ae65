#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "est: effort-estimation sheet and proposal-workflow client",
    long_about = None
)]
struct Cli {
    /// Output format (pretty, text, json). Defaults to pretty on a TTY,
    /// text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Initialize an estima project",
        long_about = "Initialize an estima project in the current directory.",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    est init\n\n    # Re-create the default config\n    est init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Log in to the proposal portal",
        after_help = "EXAMPLES:\n    # Log in with a prompt-free password\n    est login pm --password s3cret\n\n    # Take the password from the environment\n    ESTIMA_PASSWORD=s3cret est login pm"
    )]
    Login(cmd::login::LoginArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Upload a brief and start a workflow",
        after_help = "EXAMPLES:\n    # Start from a requirements document\n    est start requirements.docx"
    )]
    Start(cmd::start::StartArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Fetch the workflow status once",
        after_help = "EXAMPLES:\n    # One-shot status check\n    est status\n\n    # Machine-readable output\n    est status --json"
    )]
    Status(cmd::status::StatusArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Poll until review, completion, or error",
        long_about = "Poll the workflow status every couple of seconds until it pauses for \
                      human review, completes, or fails.",
        after_help = "EXAMPLES:\n    # Watch with the configured interval\n    est watch\n\n    # Poll every 5 seconds instead\n    est watch --interval 5"
    )]
    Watch(cmd::watch::WatchArgs),

    #[command(
        next_help_heading = "Estimate",
        about = "Add or remove stages",
        after_help = "EXAMPLES:\n    # Append a stage\n    est stage add \"Testing\"\n\n    # Remove one, dropping its hours\n    est stage rm \"Testing\""
    )]
    Stage(cmd::stage::StageArgs),

    #[command(
        next_help_heading = "Estimate",
        about = "Add or remove roles, set rates",
        after_help = "EXAMPLES:\n    # Add a role with an hourly rate\n    est role add Backend --rate 3000\n\n    # Change a rate later\n    est role rate Backend 3200\n\n    # Remove a role, dropping its hours\n    est role rm Backend"
    )]
    Role(cmd::role::RoleArgs),

    #[command(
        next_help_heading = "Estimate",
        about = "Set hours for a stage/role cell",
        after_help = "EXAMPLES:\n    # Set one cell\n    est hours \"Testing\" Backend 16\n\n    # Junk input coerces to zero\n    est hours \"Testing\" Backend abc"
    )]
    Hours(cmd::hours::HoursArgs),

    #[command(
        next_help_heading = "Estimate",
        about = "Set a stage's risk coefficient",
        after_help = "EXAMPLES:\n    # Mark a stage as risky\n    est risk \"Testing\" 1.5\n\n    # Back to baseline\n    est risk \"Testing\" 1.0"
    )]
    Risk(cmd::risk::RiskArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show the sheet with totals",
        after_help = "EXAMPLES:\n    # Full sheet with subtotals and grand totals\n    est show\n\n    # Machine-readable output\n    est show --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Read",
        about = "Diff the sheet against the AI suggestion",
        after_help = "EXAMPLES:\n    # Signed hour deltas per edited cell\n    est diff"
    )]
    Diff(cmd::diff::DiffArgs),

    #[command(
        next_help_heading = "Read",
        about = "List flagged requirement issues",
        after_help = "EXAMPLES:\n    # All issues, anchored to feature lines\n    est issues\n\n    # Only the ones the matcher could not place\n    est issues --unmatched"
    )]
    Issues(cmd::issues::IssuesArgs),

    #[command(
        next_help_heading = "Review",
        about = "Edit an extracted field",
        after_help = "EXAMPLES:\n    # Fix the client name\n    est edit client-name \"Acme GmbH\"\n\n    # Replace the feature list (newline-separated)\n    est edit key-features \"Login\nDashboard\nReports\""
    )]
    Edit(cmd::edit::EditArgs),

    #[command(
        next_help_heading = "Review",
        about = "Approve the estimate and resume the workflow",
        after_help = "EXAMPLES:\n    # Send the reviewed estimate back\n    est approve"
    )]
    Approve(cmd::approve::ApproveArgs),

    #[command(
        next_help_heading = "Review",
        about = "Download the generated proposal document",
        after_help = "EXAMPLES:\n    # Write proposal.docx in the current directory\n    est download\n\n    # Pick a different path\n    est download -o offers/acme.docx"
    )]
    Download(cmd::download::DownloadArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ESTIMA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "estima=debug,info"
        } else {
            "estima=info,warn"
        })
    });

    let format = env::var("ESTIMA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();

    let result = match cli.command {
        Commands::Init(args) => cmd::init::run_init(&args, &project_root),
        Commands::Login(args) => cmd::login::run_login(&args, output, &project_root),
        Commands::Start(args) => cmd::start::run_start(&args, output, &project_root),
        Commands::Status(args) => cmd::status::run_status(&args, output, &project_root),
        Commands::Watch(args) => cmd::watch::run_watch(&args, output, &project_root),
        Commands::Stage(args) => cmd::stage::run_stage(&args, output, &project_root),
        Commands::Role(args) => cmd::role::run_role(&args, output, &project_root),
        Commands::Hours(args) => cmd::hours::run_hours(&args, output, &project_root),
        Commands::Risk(args) => cmd::risk::run_risk(&args, output, &project_root),
        Commands::Show(args) => cmd::show::run_show(&args, output, &project_root),
        Commands::Diff(args) => cmd::diff::run_diff(&args, output, &project_root),
        Commands::Issues(args) => cmd::issues::run_issues(&args, output, &project_root),
        Commands::Edit(args) => cmd::edit::run_edit(&args, output, &project_root),
        Commands::Approve(args) => cmd::approve::run_approve(&args, output, &project_root),
        Commands::Download(args) => cmd::download::run_download(&args, output, &project_root),
    };

    if let Err(err) = result {
        let rendered = match err.downcast_ref::<cmd::CodedError>() {
            Some(coded) => output::CliError {
                message: coded.to_string(),
                suggestion: coded.code.hint().map(str::to_string),
                error_code: Some(coded.code.code().to_string()),
            },
            None => output::CliError::new(format!("{err:#}")),
        };
        output::render_error(output, &rendered)?;
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["est", "--json", "show"]);
        assert!(cli.json);
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["est", "show", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["est", "--format", "json", "show"]);
        assert_eq!(cli.format, Some(OutputMode::Json));
    }

    #[test]
    fn quiet_flag_parsed() {
        let cli = Cli::parse_from(["est", "-q", "show"]);
        assert!(cli.quiet);
    }

    #[test]
    fn stage_subcommands_parse() {
        let cli = Cli::parse_from(["est", "stage", "add", "Testing"]);
        assert!(matches!(cli.command, Commands::Stage(_)));
        let cli = Cli::parse_from(["est", "stage", "rm", "Testing"]);
        assert!(matches!(cli.command, Commands::Stage(_)));
    }

    #[test]
    fn role_subcommands_parse() {
        let cli = Cli::parse_from(["est", "role", "add", "Backend", "--rate", "3000"]);
        assert!(matches!(cli.command, Commands::Role(_)));
        let cli = Cli::parse_from(["est", "role", "rate", "Backend", "3200"]);
        assert!(matches!(cli.command, Commands::Role(_)));
    }

    #[test]
    fn hours_takes_raw_value() {
        let cli = Cli::parse_from(["est", "hours", "Testing", "Backend", "abc"]);
        let Commands::Hours(args) = cli.command else {
            panic!("expected hours");
        };
        assert_eq!(args.value, "abc");
    }

    #[test]
    fn risk_parses_coefficient() {
        let cli = Cli::parse_from(["est", "risk", "Testing", "1.5"]);
        let Commands::Risk(args) = cli.command else {
            panic!("expected risk");
        };
        assert!((args.coefficient - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["est", "init"],
            vec!["est", "login", "pm", "--password", "x"],
            vec!["est", "start", "brief.docx"],
            vec!["est", "status"],
            vec!["est", "watch"],
            vec!["est", "stage", "add", "S"],
            vec!["est", "role", "add", "R", "--rate", "1"],
            vec!["est", "hours", "S", "R", "4"],
            vec!["est", "risk", "S", "1.2"],
            vec!["est", "show"],
            vec!["est", "diff"],
            vec!["est", "issues"],
            vec!["est", "edit", "client-name", "Acme"],
            vec!["est", "approve"],
            vec!["est", "download"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?} — error: {:?}",
                args,
                result.err()
            );
        }
    }
}
