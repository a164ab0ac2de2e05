//! hostsync command line entry point.

use anyhow::Context;
use log::{error, info, warn};

use hostsync::config::Config;
use hostsync::import::import_dir;
use hostsync::store::Store;
use hostsync::types::Update;

mod cli;

use cli::{CommandLine, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let commands = CommandLine::parse_args();

    // Load configuration
    let mut cfg = Config::load()?;
    if let Some(dir) = commands.data_dir {
        cfg.data_dir = dir;
    }
    info!("Starting hostsync with config: {:?}", cfg);

    let mut store = Store::new();
    let report = store
        .load_all(&cfg.data_dir)
        .with_context(|| format!("Cannot load groups from {:?}", cfg.data_dir))?;
    if !report.failed.is_empty() {
        warn!("{} group files could not be loaded", report.failed.len());
    }

    match commands.command {
        Commands::List => {
            for list in store.groups() {
                println!("{}\t{}\t{} hosts", list.name, list.domain, list.hosts.len());
            }
            Ok(())
        }
        Commands::Import {
            group,
            scan_dir,
            pattern,
            dry_run,
        } => {
            let scan_dir = scan_dir.unwrap_or(cfg.scan_dir);
            let pattern = pattern.unwrap_or(cfg.scan_pattern);

            info!("Running inventory import into {:?}", group);
            let list = store.group_mut(&group)?;
            let summary = import_dir(list, &scan_dir, &pattern)?;

            for update in summary.updates() {
                match update {
                    Update::Updated { name } => println!("updated\t{}", name),
                    Update::Added { name } => println!("added\t{}", name),
                }
            }
            for (path, e) in &summary.failed {
                error!("{:?} was not imported: {}", path, e);
            }

            if dry_run {
                info!("Dry run, nothing written");
                return Ok(());
            }
            let saved = store.save_all(&cfg.data_dir);
            if !saved.failed.is_empty() {
                anyhow::bail!("{} group files could not be written", saved.failed.len());
            }
            Ok(())
        }
    }
}
