use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "clearpath",
    version,
    about = "Check business-name availability across state registries and USPTO"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Backend base url (overrides the config file)")]
    pub base_url: Option<String>,
    #[arg(long, global = true, help = "RON config file")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Log at debug level")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a new search and watch its results.
    Search {
        name: String,
        #[arg(long, short = 't', default_value = "LLC")]
        entity_type: String,
        #[arg(long, value_delimiter = ',', help = "State codes, e.g. DE,CA")]
        states: Vec<String>,
        #[arg(long, help = "Expand every match and load entity details")]
        details: bool,
    },
    /// Watch the results of an existing job.
    Watch {
        job_id: String,
        #[arg(long, help = "Expand every match and load entity details")]
        details: bool,
    },
}

impl Command {
    pub fn details(&self) -> bool {
        match self {
            Command::Search { details, .. } | Command::Watch { details, .. } => *details,
        }
    }
}
