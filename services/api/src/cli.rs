use crate::applications::{run_list, run_show, ListArgs, ShowArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use registration_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Registration Intake",
    about = "Serve the registration form and inspect submitted applications",
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
    /// Inspect applications in the configured storage
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ApplicationsCommand {
    /// List the most recent submissions
    List(ListArgs),
    /// Print one submission as JSON
    Show(ShowArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Applications {
            command: ApplicationsCommand::List(args),
        } => run_list(args),
        Command::Applications {
            command: ApplicationsCommand::Show(args),
        } => run_show(args),
    }
}
