use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use uuid::Uuid;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "chef-collector",
    about = "Report simulated Chef client runs to a Data Collector",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/chef-collector/logs/chef-collector.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to chef-collector.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Log at debug level")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Identity of a single run given on the command line
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Node name
    #[arg(long)]
    pub node: String,

    /// Organization (defaults to chef.organization)
    #[arg(long)]
    pub org: Option<String>,

    /// Run UUID (random if omitted)
    #[arg(long)]
    pub run_id: Option<Uuid>,

    /// Node UUID (random if omitted)
    #[arg(long)]
    pub node_id: Option<Uuid>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a run_start message
    Start {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Send a run_converge message for a synthetic node
    Converge {
        #[command(flatten)]
        run: RunArgs,

        /// Run list items, e.g. recipe[ntp@1.0.0] or role[base]
        #[arg(long = "run-list", value_delimiter = ',')]
        run_list: Vec<String>,

        /// Seconds between start and end of the run
        #[arg(long, default_value_t = 30)]
        duration: u64,
    },

    /// Simulate many client runs, each reported as start then converge
    Simulate {
        /// Number of runs (defaults to simulation.runs)
        #[arg(long)]
        runs: Option<usize>,

        /// Worker threads (defaults to simulation.concurrency)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Print a message body without sending it
    Preview {
        #[arg(value_enum)]
        message: PreviewMessage,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PreviewMessage {
    Start,
    Converge,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_converge() {
        let cli = Cli::try_parse_from([
            "chef-collector",
            "converge",
            "--node",
            "node1",
            "--run-list",
            "role[base],recipe[ntp@1.0.0]",
        ])
        .unwrap();

        match cli.command {
            Commands::Converge { run, run_list, duration } => {
                assert_eq!(run.node, "node1");
                assert_eq!(run_list, vec!["role[base]", "recipe[ntp@1.0.0]"]);
                assert_eq!(duration, 30);
            }
            _ => panic!("expected converge"),
        }
    }

    #[test]
    fn test_parse_run_id() {
        let cli = Cli::try_parse_from([
            "chef-collector",
            "start",
            "--node",
            "node1",
            "--run-id",
            "11111111-1111-1111-1111-111111111111",
        ])
        .unwrap();

        match cli.command {
            Commands::Start { run } => assert_eq!(run.run_id.unwrap().to_string(), "11111111-1111-1111-1111-111111111111"),
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_uuid() {
        assert!(Cli::try_parse_from(["chef-collector", "start", "--node", "n", "--run-id", "nope"]).is_err());
    }
}
