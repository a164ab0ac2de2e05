//! In-memory collection of host groups and their JSON files.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::error::StoreError;
use crate::types::HostList;

/// Outcome of [`Store::load_all`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Group names, in load order.
    pub loaded: Vec<String>,
    pub failed: Vec<StoreError>,
}

/// Outcome of [`Store::save_all`].
#[derive(Debug, Default)]
pub struct SaveReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<StoreError>,
}

/// Every known group, keyed by the group's own name.
#[derive(Debug, Default)]
pub struct Store {
    groups: BTreeMap<String, HostList>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every group.
    pub fn init(&mut self) {
        self.groups.clear();
    }

    /// Loads every `*.json` file directly under `dir`.
    ///
    /// Files that cannot be read or decoded are logged and listed in the
    /// report; they contribute no group. A group whose name was already
    /// loaded replaces the earlier one.
    pub fn load_all(&mut self, dir: impl AsRef<Path>) -> Result<LoadReport, StoreError> {
        let dir = dir.as_ref();
        let pattern = glob::Pattern::new("*.json").expect("static pattern");
        let files = list_matching(dir, &pattern).map_err(|source| StoreError::ListDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut report = LoadReport::default();
        for path in files {
            match load_single_file(&path) {
                Ok(list) => {
                    debug!("Loaded group {:?} ({} hosts) from {:?}", list.name, list.hosts.len(), path);
                    if self.groups.contains_key(&list.name) {
                        warn!("Group {:?} defined more than once, {:?} wins", list.name, path);
                    }
                    report.loaded.push(list.name.clone());
                    self.groups.insert(list.name.clone(), list);
                }
                Err(e) => {
                    error!("{}", e);
                    report.failed.push(e);
                }
            }
        }
        info!("Loaded {} groups from {:?}", report.loaded.len(), dir);
        Ok(report)
    }

    /// Writes every group to `<dir>/<slug>.json`.
    ///
    /// A failed write is logged and does not stop the remaining groups;
    /// files already written are left as they are.
    pub fn save_all(&self, dir: impl AsRef<Path>) -> SaveReport {
        let dir = dir.as_ref();
        let mut report = SaveReport::default();
        for (name, list) in &self.groups {
            let path = dir.join(format!("{}.json", slug(name)));
            match save_list(list, &path) {
                Ok(()) => {
                    debug!("Saved group {:?} to {:?}", name, path);
                    report.written.push(path);
                }
                Err(e) => {
                    error!("{}", e);
                    report.failed.push(e);
                }
            }
        }
        info!("Saved {} groups to {:?}", report.written.len(), dir);
        report
    }

    pub fn get(&self, name: &str) -> Option<&HostList> {
        self.groups.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut HostList> {
        self.groups.get_mut(name)
    }

    /// Like [`Store::get_mut`], but an unknown name is an error.
    pub fn group_mut(&mut self, name: &str) -> Result<&mut HostList, StoreError> {
        self.groups
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownGroup(name.to_string()))
    }

    /// Inserts a group under its own name, returning the one it replaces.
    pub fn insert(&mut self, list: HostList) -> Option<HostList> {
        self.groups.insert(list.name.clone(), list)
    }

    pub fn remove(&mut self, name: &str) -> Option<HostList> {
        self.groups.remove(name)
    }

    /// Groups in name order.
    pub fn groups(&self) -> impl Iterator<Item = &HostList> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Decodes one group file.
pub fn load_single_file(path: impl AsRef<Path>) -> Result<HostList, StoreError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Decodes one group file, logging any failure and returning an empty group.
pub fn load_single_file_or_default(path: impl AsRef<Path>) -> HostList {
    load_single_file(path).unwrap_or_else(|e| {
        error!("{}", e);
        HostList::default()
    })
}

/// Writes one group to `path`, replacing any existing file.
pub fn save_list(list: &HostList, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    let json = to_pretty_json(list).map_err(|source| StoreError::Encode {
        name: list.name.clone(),
        source,
    })?;
    fs::write(path, json).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-prints with one space per indentation level, matching the
/// existing inventory files.
pub fn to_pretty_json(list: &HostList) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    list.serialize(&mut ser)?;
    Ok(buf)
}

/// File name stem for a group: lower-cased, spaces replaced by underscores.
pub fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Regular files directly under `dir` whose file name matches `pattern`,
/// sorted by path.
pub fn list_matching(dir: &Path, pattern: &glob::Pattern) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| pattern.matches(n));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
