use clap::{Parser, Subcommand};

mod db;
mod tenant;

#[derive(Debug, Parser)]
#[command(name = "tessera-app", about = "Tessera CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Tenant(tenant::TenantCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Tenant(command) => tenant::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
