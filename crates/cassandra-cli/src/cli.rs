//! CLI argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// CASSANDRA - autonomous OSINT claim verification.
#[derive(Debug, Parser)]
#[command(name = "cassandra")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verify a single claim and exit
    #[arg(long)]
    pub claim: Option<String>,

    /// Check model and graph connectivity, then exit
    #[arg(long, conflicts_with = "claim")]
    pub check: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "cassandra=debug"
        } else {
            "cassandra=info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_one_shot() {
        let cli = Cli::parse_from([
            "cassandra",
            "--claim",
            "The moon landing was staged",
            "--json",
        ]);
        assert_eq!(cli.claim.as_deref(), Some("The moon landing was staged"));
        assert!(cli.json);
        assert!(!cli.no_color);
        assert_eq!(cli.default_log_filter(), "cassandra=info");
    }

    #[test]
    fn test_parse_interactive_verbose() {
        let cli = Cli::parse_from(["cassandra", "-v", "--config", "cassandra.yaml", "--no-color"]);
        assert!(cli.claim.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("cassandra.yaml")));
        assert_eq!(cli.default_log_filter(), "cassandra=debug");
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::parse_from(["cassandra", "--check"]);
        assert!(cli.check);
        assert!(cli.claim.is_none());

        assert!(Cli::try_parse_from(["cassandra", "--check", "--claim", "x"]).is_err());
    }
}
