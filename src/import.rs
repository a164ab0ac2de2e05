//! Reconciles a group of hosts against inventory scans.
//!
//! Scanned entries are matched to hosts by name. A match overwrites the
//! fields a scan knows about (comment, type, CPU, RAM, status) and keeps
//! everything else. Unknown names are appended as new hosts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::error::{EntryError, ImportError};
use crate::source::{OcsFile, ScanEntry, ScanSource};
use crate::store::list_matching;
use crate::types::{Cpu, Host, HostList, Update};

/// CPU type recorded for hosts described by a scan.
pub const VCPU_LABEL: &str = "VCPU";

/// Default file name pattern for scan exports.
pub const DEFAULT_PATTERN: &str = "*.ocs";

/// Outcome of importing one scan document.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub updates: Vec<Update>,
    pub rejected: Vec<EntryError>,
}

impl ImportReport {
    pub fn updated(&self) -> usize {
        self.updates
            .iter()
            .filter(|u| matches!(u, Update::Updated { .. }))
            .count()
    }

    pub fn added(&self) -> usize {
        self.updates
            .iter()
            .filter(|u| matches!(u, Update::Added { .. }))
            .count()
    }
}

/// Outcome of importing every scan file of a directory.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub files: Vec<(PathBuf, ImportReport)>,
    pub failed: Vec<(PathBuf, ImportError)>,
}

impl ImportSummary {
    /// All updates, in application order.
    pub fn updates(&self) -> impl Iterator<Item = &Update> {
        self.files.iter().flat_map(|(_, r)| r.updates.iter())
    }
}

/// Parses a scanned virtual CPU count. Anything that is not an unsigned
/// integer counts as zero.
pub fn parse_cpu_count(text: &str) -> u32 {
    match text.trim().parse() {
        Ok(count) => count,
        Err(_) => {
            warn!("Invalid VCPU value {:?}, using 0", text);
            0
        }
    }
}

fn apply_entry(host: &mut Host, entry: &ScanEntry) {
    host.comment = entry.comment.clone();
    host.kind = entry.vm_type.clone();
    host.cpu = Cpu {
        kind: VCPU_LABEL.to_string(),
        count: parse_cpu_count(&entry.vcpu),
    };
    host.ram = entry.memory.clone();
    host.status = entry.status.clone();
}

/// Applies scanned entries to `list`, returning one [`Update`] per entry.
///
/// Relies on host names being unique within the group. A name seen twice in
/// `entries` updates the host added for its first occurrence.
pub fn reconcile(list: &mut HostList, entries: &[ScanEntry]) -> Vec<Update> {
    let mut index: HashMap<String, usize> = list
        .hosts
        .iter()
        .enumerate()
        .map(|(i, h)| (h.name.clone(), i))
        .collect();

    let mut updates = Vec::with_capacity(entries.len());
    for entry in entries {
        match index.get(&entry.name).copied() {
            Some(pos) => {
                info!("Updating {}", entry.name);
                apply_entry(&mut list.hosts[pos], entry);
                updates.push(Update::Updated {
                    name: entry.name.clone(),
                });
            }
            None => {
                info!("Adding {}", entry.name);
                let mut host = Host {
                    name: entry.name.clone(),
                    ..Default::default()
                };
                apply_entry(&mut host, entry);
                index.insert(entry.name.clone(), list.hosts.len());
                list.hosts.push(host);
                updates.push(Update::Added {
                    name: entry.name.clone(),
                });
            }
        }
    }
    updates
}

/// Imports one scan document into `list`.
///
/// The group is left untouched when the document cannot be decoded.
pub fn import_source<S: ScanSource + ?Sized>(
    list: &mut HostList,
    source: &S,
) -> Result<ImportReport, ImportError> {
    let batch = source.entries()?;
    info!(
        "{} records in {} ({} rejected)",
        batch.entries.len(),
        source.describe(),
        batch.rejected.len()
    );
    let updates = reconcile(list, &batch.entries);
    Ok(ImportReport {
        updates,
        rejected: batch.rejected,
    })
}

/// Imports every file of `dir` whose name matches `pattern`, in path order.
///
/// A file that fails is logged and recorded; later files are still applied.
/// Hosts added by one file are matched by the files after it.
pub fn import_dir(
    list: &mut HostList,
    dir: impl AsRef<Path>,
    pattern: &str,
) -> Result<ImportSummary, ImportError> {
    let dir = dir.as_ref();
    let glob = glob::Pattern::new(pattern).map_err(|source| ImportError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;
    let files = list_matching(dir, &glob).map_err(|source| ImportError::ListDir {
        path: dir.to_path_buf(),
        source,
    })?;
    if files.is_empty() {
        warn!("No scan file matching {:?} in {:?}", pattern, dir);
    }

    let mut summary = ImportSummary::default();
    for path in files {
        let source = OcsFile::new(&path);
        match import_source(list, &source) {
            Ok(report) => summary.files.push((path, report)),
            Err(e) => {
                error!("Skipping {:?}: {}", path, e);
                summary.failed.push((path, e));
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScanBatch;
    use crate::types::{Connect, Credentials};

    fn entry(name: &str, vcpu: &str) -> ScanEntry {
        ScanEntry {
            name: name.into(),
            comment: "C".into(),
            vm_type: "T".into(),
            vcpu: vcpu.into(),
            memory: "8192".into(),
            status: "up".into(),
        }
    }

    fn web1() -> Host {
        Host {
            name: "web1".into(),
            connect: Connect {
                service: "ssh".into(),
                address: "10.0.0.1".into(),
                port: 22,
                credentials: Credentials {
                    login: Some("root".into()),
                    ..Default::default()
                },
            },
            ips: vec!["10.0.0.1".into()],
            ports: vec![22, 80],
            comment: "old".into(),
            kind: "baremetal".into(),
            ..Default::default()
        }
    }

    /// Serves a prepared batch, or a missing-element error when empty.
    struct Fixed(Option<ScanBatch>);

    impl ScanSource for Fixed {
        fn describe(&self) -> String {
            "fixed".into()
        }

        fn entries(&self) -> Result<ScanBatch, ImportError> {
            match &self.0 {
                Some(batch) => Ok(ScanBatch {
                    entries: batch.entries.clone(),
                    rejected: batch.rejected.clone(),
                }),
                None => Err(ImportError::MissingElement(
                    "REQUEST/CONTENT/VIRTUALMACHINES",
                )),
            }
        }
    }

    #[test]
    fn test_match_overwrites_scanned_fields_only() {
        let mut list = HostList::new("web", "example.org");
        list.hosts.push(web1());

        let updates = reconcile(&mut list, &[entry("web1", "4")]);
        assert_eq!(updates, vec![Update::Updated { name: "web1".into() }]);
        assert_eq!(list.hosts.len(), 1);

        let host = &list.hosts[0];
        assert_eq!(host.comment, "C");
        assert_eq!(host.kind, "T");
        assert_eq!(host.cpu.kind, "VCPU");
        assert_eq!(host.cpu.count, 4);
        assert_eq!(host.ram, "8192");
        assert_eq!(host.status, "up");

        let before = web1();
        assert_eq!(host.ips, before.ips);
        assert_eq!(host.ports, before.ports);
        assert_eq!(host.connect, before.connect);
    }

    #[test]
    fn test_unknown_name_is_appended() {
        let mut list = HostList::new("web", "example.org");
        list.hosts.push(web1());

        let updates = reconcile(&mut list, &[entry("db2", "2")]);
        assert_eq!(updates, vec![Update::Added { name: "db2".into() }]);
        assert_eq!(list.hosts.len(), 2);
        assert_eq!(list.hosts[0].name, "web1");

        let expected = Host {
            name: "db2".into(),
            comment: "C".into(),
            kind: "T".into(),
            cpu: Cpu {
                kind: "VCPU".into(),
                count: 2,
            },
            ram: "8192".into(),
            status: "up".into(),
            ..Default::default()
        };
        assert_eq!(list.hosts[1], expected);
    }

    #[test]
    fn test_invalid_vcpu_counts_as_zero() {
        let mut list = HostList::new("web", "example.org");
        list.hosts.push(Host {
            cpu: Cpu {
                kind: "xeon".into(),
                count: 8,
            },
            ..web1()
        });

        reconcile(&mut list, &[entry("web1", "n/a"), entry("new", "n/a")]);
        assert_eq!(list.hosts[0].cpu.count, 0);
        assert_eq!(list.hosts[1].cpu.count, 0);
        assert_eq!(list.hosts[1].cpu.kind, "VCPU");
    }

    #[test]
    fn test_parse_cpu_count() {
        assert_eq!(parse_cpu_count("4"), 4);
        assert_eq!(parse_cpu_count(" 16 "), 16);
        assert_eq!(parse_cpu_count("n/a"), 0);
        assert_eq!(parse_cpu_count("-2"), 0);
        assert_eq!(parse_cpu_count(""), 0);
    }

    #[test]
    fn test_repeated_new_name_is_added_once() {
        let mut list = HostList::new("web", "example.org");
        let mut second = entry("db2", "8");
        second.status = "down".into();

        let updates = reconcile(&mut list, &[entry("db2", "2"), second]);
        assert_eq!(
            updates,
            vec![
                Update::Added { name: "db2".into() },
                Update::Updated { name: "db2".into() },
            ]
        );
        assert_eq!(list.hosts.len(), 1);
        assert_eq!(list.hosts[0].status, "down");
        assert_eq!(list.hosts[0].cpu.count, 8);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut list = HostList::new("web", "example.org");
        list.hosts.push(web1());
        let entries = [entry("web1", "4"), entry("db2", "2")];

        reconcile(&mut list, &entries);
        let once = list.clone();
        let updates = reconcile(&mut list, &entries);
        assert_eq!(list, once);
        assert!(updates.iter().all(|u| matches!(u, Update::Updated { .. })));
    }

    #[test]
    fn test_failed_source_leaves_group_untouched() {
        let mut list = HostList::new("web", "example.org");
        list.hosts.push(web1());
        let before = list.clone();

        let source = Fixed(None);
        assert!(import_source(&mut list, &source).is_err());
        assert_eq!(list, before);
    }

    #[test]
    fn test_import_source_reports_rejected() {
        let mut list = HostList::new("web", "example.org");
        let rejected = EntryError::MissingField {
            index: 1,
            field: "STATUS",
        };
        let source = Fixed(Some(ScanBatch {
            entries: vec![entry("a", "1"), entry("b", "1")],
            rejected: vec![rejected.clone()],
        }));

        let report = import_source(&mut list, &source).unwrap();
        assert_eq!(report.added(), 2);
        assert_eq!(report.updated(), 0);
        assert_eq!(report.rejected, vec![rejected]);
    }
}
