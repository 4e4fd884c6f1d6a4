use crate::demo::{run_demo, run_report, DemoArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use reviewdeck::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Review Deck",
    about = "Run the guest review dashboard service and reporting tools from the command line",
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
    /// Inspect the review collection without starting the server
    Reviews {
        #[command(subcommand)]
        command: ReviewsCommand,
    },
    /// Run an end-to-end CLI demo over the bundled fixture dataset
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ReviewsCommand {
    /// Render the analytics summary for a review collection
    Report(ReportArgs),
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
        Command::Reviews {
            command: ReviewsCommand::Report(args),
        } => run_report(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
