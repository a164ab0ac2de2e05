use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hostsync")]
#[command(about = "Keeps a JSON host inventory in sync with OCS inventory scans.")]
pub struct CommandLine {
    /// Directory holding the group files (overrides `data_dir`)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every group with its host count
    #[command(alias = "l")]
    List,
    /// Merge scan exports into a group and save the inventory
    #[command(alias = "i")]
    Import {
        /// Name of the group to update
        group: String,
        /// Directory searched for scan exports (overrides `scan_dir`)
        #[arg(long)]
        scan_dir: Option<PathBuf>,
        /// File name pattern of scan exports (overrides `scan_pattern`)
        #[arg(long)]
        pattern: Option<String>,
        /// Report changes without writing any file
        #[arg(long)]
        dry_run: bool,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_valid() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn test_parse_import() {
        let cli = CommandLine::try_parse_from([
            "hostsync",
            "--data-dir",
            "/srv/hosts",
            "import",
            "Web Farm",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/hosts")));
        match cli.command {
            Commands::Import {
                group,
                scan_dir,
                pattern,
                dry_run,
            } => {
                assert_eq!(group, "Web Farm");
                assert!(scan_dir.is_none());
                assert!(pattern.is_none());
                assert!(dry_run);
            }
            Commands::List => panic!("expected import"),
        }
    }
}
