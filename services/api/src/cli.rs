use crate::commands::{
    run_deadlines, run_profiles, run_transitions, DeadlinesArgs, ProfilesArgs, TransitionsArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use immigration_tracker::error::AppError;
use immigration_tracker::profiles::DeploymentProfile;

#[derive(Parser, Debug)]
#[command(
    name = "Immigration Tracker",
    about = "Run the Immigration Tracker backend or inspect its profiles and deadlines",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Show the active deployment profiles and the database they select
    Profiles(ProfilesArgs),
    /// Compute the immigration deadlines for a student profile
    Deadlines(DeadlinesArgs),
    /// List the statuses reachable from a status, or check one move
    Transitions(TransitionsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override APP_PROFILES with a comma separated list (e.g. dev,test)
    #[arg(long, value_parser = parse_profiles)]
    pub(crate) profiles: Option<ProfileList>,
}

/// Profiles passed on the command line as one comma separated value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ProfileList(pub(crate) Vec<DeploymentProfile>);

pub(crate) fn parse_profiles(raw: &str) -> Result<ProfileList, String> {
    Ok(ProfileList(DeploymentProfile::parse_list(raw)))
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Profiles(args) => run_profiles(args),
        Command::Deadlines(args) => run_deadlines(args),
        Command::Transitions(args) => run_transitions(args),
    }
}
