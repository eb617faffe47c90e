use clap::CommandFactory;
use crate::commands;
use crate::CommandResult;

#[derive(clap::Parser, Debug)]
#[command(name = "graphql-ir", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: Option<commands::CommandEnum>,

    #[arg(
        help="Enable verbose output.",
        long,
        short='v',
    )]
    pub verbose: bool,
}
impl Cli {
    pub(crate) async fn run_default(self) -> CommandResult {
        match Self::command().print_help() {
            Ok(()) => CommandResult::success(None),
            Err(e) => CommandResult::stderr(format_args!("Failed to print help: {e}")),
        }
    }
}
