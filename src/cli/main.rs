use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Study notes and focus timer"
)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Directory where notes are stored
    #[clap(long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the studynotes application
    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_global_flags() {
        let cli = Cli::parse_from([
            "studynotes",
            "--data-dir",
            "/tmp/notes",
            "add",
            "-T",
            "OS – Deadlocks",
            "-c",
            "Coffman conditions",
        ]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/notes")));
        assert_eq!(
            cli.command,
            Commands::Add {
                title: Some("OS – Deadlocks".to_string()),
                content: Some("Coffman conditions".to_string()),
                edit: false,
            }
        );
    }

    #[test]
    fn test_parse_focus_and_delete() {
        let cli = Cli::parse_from(["studynotes", "focus", "--minutes", "45"]);
        assert_eq!(
            cli.command,
            Commands::Focus {
                minutes: Some("45".to_string())
            }
        );

        let cli = Cli::parse_from(["studynotes", "-v", "delete", "1718000000000", "--force"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Delete {
                id: 1718000000000,
                force: true
            }
        );
    }
}
