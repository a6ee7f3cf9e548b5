use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "burrowd", about = "A sandboxed remote file browser written in Rust.")]
pub struct Cli {
    /// Base path to lock the sandbox to (defaults to ./public)
    #[arg(short, long)]
    pub path: Option<String>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to listen on, as host:port
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
