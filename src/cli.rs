use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mongosnap", version, about = "On-demand mongodump backups to object storage")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server; `GET /` triggers a backup run.
    Serve {
        /// Host to bind (defaults to HOST, then 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to PORT, then 8080)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run a single backup now and print the results as JSON.
    Run,

    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration with secrets redacted.
    Show,
}
