//! CLI module for kikk.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{format_duration, Output};

use clap::{Parser, Subcommand};

/// kikk - Ask questions about YouTube videos
///
/// Fetches a video's transcript, retrieves the passages relevant to a question and
/// answers from them alone. The name "kikk" is Norwegian for "peek."
#[derive(Parser, Debug)]
#[command(name = "kikk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host in the config)
        #[arg(long, env = "KIKK_HOST")]
        host: Option<String>,

        /// Port to bind to (defaults to server.port in the config)
        #[arg(short, long, env = "KIKK_PORT")]
        port: Option<u16>,
    },

    /// Ask a question about a YouTube video
    Ask {
        /// YouTube video URL
        video_url: String,

        /// The question to ask (defaults to a summary request)
        question: Option<String>,

        /// User ID stored with the answer
        #[arg(short, long)]
        user_id: Option<String>,
    },

    /// List previously answered questions, newest first
    History {
        /// Maximum number of records to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only show questions asked by this user
        #[arg(short, long)]
        user_id: Option<String>,
    },

    /// Print the transcript of a YouTube video
    Transcript {
        /// YouTube video URL
        video_url: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_with_optional_question() {
        let cli = Cli::parse_from(["kikk", "ask", "https://youtu.be/dQw4w9WgXcQ"]);
        match cli.command {
            Commands::Ask { video_url, question, user_id } => {
                assert_eq!(video_url, "https://youtu.be/dQw4w9WgXcQ");
                assert_eq!(question, None);
                assert_eq!(user_id, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::parse_from(["kikk", "-vv", "ask", "u", "Who sings?", "--user-id", "me"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Ask { question: Some(ref q), user_id: Some(ref u), .. } if q == "Who sings?" && u == "me"
        ));
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::parse_from(["kikk", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Commands::Config { action: ConfigAction::Init { force: true } }
        ));
    }

    #[test]
    fn test_parse_history_for_one_user() {
        let cli = Cli::parse_from(["kikk", "history", "--user-id", "alice", "-l", "5"]);
        assert!(matches!(
            cli.command,
            Commands::History { limit: Some(5), user_id: Some(ref u) } if u == "alice"
        ));
    }
}
