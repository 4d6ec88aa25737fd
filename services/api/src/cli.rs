use crate::server;
use crate::submit::{run_submit, CompanyArgs, EmployeeArgs};
use clap::{Args, Parser, Subcommand};
use job_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Job Portal",
    about = "Run the job portal submission proxy or send an application from the command line",
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
    /// Validate and submit one application to the configured webhook
    Submit {
        #[command(subcommand)]
        form: SubmitCommand,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum SubmitCommand {
    /// Post a job opening on behalf of a company
    Company(CompanyArgs),
    /// Apply as an individual, attaching a resume
    Employee(EmployeeArgs),
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
        Command::Submit { form } => run_submit(form).await,
    }
}
