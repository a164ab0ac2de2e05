use crate::error::{EntryError, ImportError};

pub mod ocs;
pub use ocs::OcsFile;

/// One virtual machine as reported by an inventory scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub name: String,
    pub comment: String,
    pub vm_type: String,
    /// Virtual CPU count exactly as scanned; see [`crate::import::parse_cpu_count`].
    pub vcpu: String,
    pub memory: String,
    pub status: String,
}

/// Entries decoded from one scan document.
#[derive(Debug, Default)]
pub struct ScanBatch {
    pub entries: Vec<ScanEntry>,
    /// Entries that lacked a required field and were left out.
    pub rejected: Vec<EntryError>,
}

pub trait ScanSource {
    /// Human readable origin, used in logs.
    fn describe(&self) -> String;

    /// Reads and decodes the whole document.
    ///
    /// A document-level problem is an error; a malformed entry only ends up
    /// in [`ScanBatch::rejected`].
    fn entries(&self) -> Result<ScanBatch, ImportError>;
}
