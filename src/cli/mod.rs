use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod serve;
pub mod store;

use crate::core::{StoreConfig, init_tracing};
use store::StoreCommand;

#[derive(Subcommand)]
enum Command {
    /// Run the chat web server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "8080")]
        port: String,
    },
    /// Work with documents in the configured MongoDB collection
    Store {
        #[command(subcommand)]
        command: StoreCommand,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    init_tracing();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Store { command }) => {
            store::run(command, StoreConfig::default()).await?;
        }
        None => {}
    }

    Ok(())
}
