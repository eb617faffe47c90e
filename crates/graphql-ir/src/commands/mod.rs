mod inspect;

use crate::Cli;
use crate::CommandResult;
#[cfg(test)]
pub(crate) use inspect::find_graphql_files;
use inspect::InspectCmd;

#[derive(Debug, clap::Parser)]
#[command(name = "graphql-ir")]
pub(crate) enum CommandEnum {
    /// Print the direct and merged selections of every selection set.
    Inspect(Box<InspectCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Inspect(cmd) => cmd.run(cli).await
        }
    }
}
