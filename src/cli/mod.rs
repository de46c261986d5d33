pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vendor-desk")]
#[command(about = "Vendor Desk - vendor management back office API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Interface to bind (overrides HOST)")]
        host: Option<String>,
        #[arg(long, short, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Database schema management")]
    Schema {
        #[command(subcommand)]
        cmd: commands::schema::SchemaCommands,
    },

    #[command(about = "Check health of a running server")]
    Ping {
        #[arg(long, help = "Server base URL (defaults to the configured host and port)")]
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        None => commands::serve::handle(None, None).await,
        Some(Commands::Serve { host, port }) => commands::serve::handle(host, port).await,
        Some(Commands::Schema { cmd }) => commands::schema::handle(cmd, output_format).await,
        Some(Commands::Ping { url }) => commands::ping::handle(url, output_format).await,
    }
}
