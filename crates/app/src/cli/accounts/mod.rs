use clap::{Args, Subcommand};

mod set_role;
mod sweep;

#[derive(Debug, Args)]
pub(crate) struct AccountsCommand {
    #[command(subcommand)]
    command: AccountsSubcommand,
}

#[derive(Debug, Subcommand)]
enum AccountsSubcommand {
    /// Notify and delete accounts that have been inactive too long
    Sweep(sweep::SweepArgs),
    /// Switch an active account between the regular and premium roles
    SetRole(set_role::SetRoleArgs),
}

pub(crate) async fn run(command: AccountsCommand) -> Result<(), String> {
    match command.command {
        AccountsSubcommand::Sweep(args) => sweep::run(args).await,
        AccountsSubcommand::SetRole(args) => set_role::run(args).await,
    }
}
