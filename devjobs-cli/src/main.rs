//! devjobs CLI - terminal front-end for the DevJobs job board
//!
//! - Job listing (`jobs`, `landing`) and an interactive browser (`browse`)
//! - Employer dashboard counters and job posting (`dashboard`, `post-job`)
//! - Accounts (`signup`, `login`, `logout`) with the session kept on disk
//! - Job seeker registration wizard and profile (`register`, `profile`)

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use devjobs_core::DevJobsError;
use tracing::debug;

mod commands;
mod config;
mod tracing_setup;
mod tui;
mod ui;
mod wizard;

use commands::{Env, JobsPage};

#[derive(Parser, Debug)]
#[command(
    name = "devjobs",
    author,
    version,
    about = "Browse and post developer jobs on a DevJobs backend",
    long_about = "Terminal client for the DevJobs job board. Lists jobs, shows the employer \
                  dashboard, posts jobs and manages job seeker profiles over the backend's REST API."
)]
struct Cli {
    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Print machine-readable JSON on stdout; notifications are dropped
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging to stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (needs the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    /// Backend API root, e.g. http://localhost:8000/api/
    #[arg(long, env = "DEVJOBS_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List jobs (home page)
    Jobs(commands::jobs::JobsArgs),
    /// List jobs (landing page)
    Landing(commands::jobs::JobsArgs),
    /// Browse jobs interactively
    Browse,
    /// Show employer dashboard counters
    Dashboard,
    /// Post a new job as an employer
    PostJob(commands::post_job::PostJobArgs),
    /// Create an account
    Signup(commands::account::SignupArgs),
    /// Log in and store the session
    Login(commands::account::LoginArgs),
    /// Forget the stored session
    Logout,
    /// Job seeker registration wizard
    Register,
    /// Show or edit your profile
    Profile(commands::profile::ProfileArgs),
    /// Manage devjobs configuration (init, get, list, validate, path)
    Config(config::ConfigArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is the normal case
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();
    ui::init_quiet_mode(cli.quiet);
    ui::init_json_mode(cli.json);

    let result = run(cli).await;
    tracing_setup::shutdown_otel();

    match result {
        Err(err) if already_reported(&err) => {
            debug!(error = %err, "request failed after notifying");
            std::process::exit(1);
        }
        other => other,
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Config(args) => return config::run_config(args),
        Commands::Completions(args) => return run_completions(args),
        _ => {}
    }

    let env = Env::load(cli.api_url.as_deref())?;
    match cli.command {
        Commands::Jobs(args) => commands::run_jobs(&env, JobsPage::Home, args).await?,
        Commands::Landing(args) => commands::run_jobs(&env, JobsPage::Landing, args).await?,
        Commands::Browse => tui::run(&env).await?,
        Commands::Dashboard => commands::run_dashboard(&env).await?,
        Commands::PostJob(args) => commands::run_post_job(&env, args).await?,
        Commands::Signup(args) => commands::run_signup(&env, args).await?,
        Commands::Login(args) => commands::run_login(&env, args).await?,
        Commands::Logout => commands::run_logout(&env)?,
        Commands::Register => commands::run_register(&env).await?,
        Commands::Profile(args) => commands::run_profile(&env, args).await?,
        Commands::Config(_) | Commands::Completions(_) => {}
    }
    Ok(())
}

/// Failed requests were already shown through the page's notifier.
fn already_reported(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<DevJobsError>(), Some(DevJobsError::Fetch(_)))
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use devjobs_core::FetchError;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fetch_failures_are_not_printed_twice() {
        let err = anyhow::Error::from(DevJobsError::from(FetchError::response(500, None)));
        assert!(already_reported(&err));

        let err = anyhow::Error::from(DevJobsError::NotAuthenticated);
        assert!(!already_reported(&err));
    }
}
