// types.rs
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // Cluster configuration file (JSON)
    #[arg(short, long, default_value = "cluster_config.json")]
    pub config: String,

    // Enable debug mode
    #[arg(short, long)]
    pub debug: bool,

    // Also append log lines to this file
    #[arg(short, long)]
    pub log_file: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    // Print certificate details instead of PEM content
    #[arg(short, long)]
    pub summary: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}
