use clap::{Parser, Subcommand};
use willow_server::commands;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the chat server
    Agent {
        /// Address to bind, overriding WILLOW_SERVER__HOST
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overriding WILLOW_SERVER__PORT
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Agent { host, port }) => commands::agent::run(host.as_deref(), port).await,
        None => commands::agent::run(None, None).await,
    }
}
