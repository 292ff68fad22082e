use clap::{Parser, Subcommand};

mod accounts;
mod db;
mod mail;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Accounts(accounts::AccountsCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Accounts(command) => accounts::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
