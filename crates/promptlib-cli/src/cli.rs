//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

/// Prompt Library - keep prompts and fragments in sync with a git remote
#[derive(Parser, Debug)]
#[command(name = "promptlib")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Library directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "PROMPTLIB_HOME")]
    pub library: Option<PathBuf>,

    /// Settings file (.toml, .json or .yaml)
    #[arg(long, global = true, env = "PROMPTLIB_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create the library from a remote repository or a local directory
    ///
    /// Examples:
    ///   promptlib setup --remote https://github.com/me/prompts.git
    ///   promptlib setup --local ~/old-prompts
    #[command(group(ArgGroup::new("source").required(true).args(["remote", "local"])))]
    Setup {
        /// Clone (or point origin at) this repository URL
        #[arg(long)]
        remote: Option<String>,

        /// Copy prompts and fragments from this directory
        #[arg(long)]
        local: Option<PathBuf>,
    },

    /// Show setup state, branch, remote and pending changes
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the diff of pending prompt and fragment changes
    Diff,

    /// Pull remote changes into the library
    Pull {
        /// Remote URL to pull from (defaults to the configured remote)
        #[arg(long)]
        url: Option<String>,

        /// Apply incoming changes without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Commit pending changes and push them
    Push {
        /// Target branch (defaults to the configured default branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Commit message
        #[arg(short, long)]
        message: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Discard pending changes
    Reset {
        /// Reset every pending change instead of choosing
        #[arg(long)]
        all: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Offer to push pending changes to origin
    Sync {
        /// Push without asking
        #[arg(short, long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn setup_requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["promptlib", "setup"]).is_err());
        assert!(
            Cli::try_parse_from(["promptlib", "setup", "--remote", "u", "--local", "d"]).is_err()
        );

        let cli = Cli::try_parse_from(["promptlib", "setup", "--remote", "u"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Setup {
                remote: Some("u".into()),
                local: None
            })
        );
    }

    #[test]
    fn push_flags_parse() {
        let cli =
            Cli::try_parse_from(["promptlib", "push", "-b", "review", "-m", "msg", "--yes"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Push {
                branch: Some("review".into()),
                message: Some("msg".into()),
                yes: true
            })
        );
    }

    #[test]
    fn library_is_global() {
        let cli = Cli::try_parse_from(["promptlib", "status", "--library", "/tmp/lib"]).unwrap();
        assert_eq!(cli.library, Some(PathBuf::from("/tmp/lib")));
    }
}
