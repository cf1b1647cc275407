use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "applch",
    about = "Organise applicant documents, run AI background checks, and rank candidates",
    version
)]
pub struct Cli {
    /// Workspace directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,
    /// Emit progress as JSON lines instead of the terminal view
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a folder for each applicant under data/
    Bootstrap(NamesArgs),
    /// Run a background check for each applicant's documents
    Check(CheckArgs),
    /// Rank applicants from their stored check results
    Arena(NamesArgs),
    /// Delete all applicant folders and results (keeps .env)
    Clear(ClearArgs),
    /// Print stored results: all, `arena`, or one applicant
    Print(PrintArgs),
}

#[derive(Args, Debug, Default)]
pub struct NamesArgs {
    /// Applicant names; commas also separate names. Defaults to data/names.json
    pub names: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub names: NamesArgs,
    /// Maximum number of checks in flight at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<NonZeroUsize>,
}

#[derive(Args, Debug, Default)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug, Default)]
pub struct PrintArgs {
    /// `arena` for the latest arena report, or an applicant name
    pub target: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "applch",
            "check",
            "Jane Doe",
            "John Smith",
            "--concurrency",
            "2",
            "--json",
            "--workspace",
            "/tmp/hiring",
        ])
        .expect("parses");

        assert!(cli.json);
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/hiring")));
        let Command::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.names.names, vec!["Jane Doe", "John Smith"]);
        assert_eq!(args.concurrency, NonZeroUsize::new(2));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        assert!(Cli::try_parse_from(["applch", "check", "--concurrency", "0"]).is_err());
    }

    #[test]
    fn print_target_is_optional() {
        let cli = Cli::try_parse_from(["applch", "print"]).expect("parses");
        let Command::Print(args) = cli.command else {
            panic!("expected print command");
        };
        assert!(args.target.is_none());
    }
}
