//! Fusion-inventory OCS exports.
//!
//! Only the virtual machine section is read:
//!
//! ```xml
//! <REQUEST>
//!   <CONTENT>
//!     <VIRTUALMACHINES>
//!       <NAME>web1</NAME>
//!       <COMMENT>frontend</COMMENT>
//!       <VMTYPE>VMware</VMTYPE>
//!       <VCPU>4</VCPU>
//!       <MEMORY>8192</MEMORY>
//!       <STATUS>running</STATUS>
//!     </VIRTUALMACHINES>
//!     <VIRTUALMACHINES>...</VIRTUALMACHINES>
//!   </CONTENT>
//! </REQUEST>
//! ```
//!
//! Every other element is ignored.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

use super::{ScanBatch, ScanEntry, ScanSource};
use crate::error::{EntryError, ImportError};

const ROOT: &str = "REQUEST";

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(rename = "CONTENT")]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(rename = "VIRTUALMACHINES", default)]
    virtual_machines: Vec<RawVm>,
}

#[derive(Debug, Deserialize)]
struct RawVm {
    #[serde(rename = "NAME")]
    name: Option<String>,
    #[serde(rename = "COMMENT")]
    comment: Option<String>,
    #[serde(rename = "VMTYPE")]
    vm_type: Option<String>,
    #[serde(rename = "VCPU")]
    vcpu: Option<String>,
    #[serde(rename = "MEMORY")]
    memory: Option<String>,
    #[serde(rename = "STATUS")]
    status: Option<String>,
}

impl RawVm {
    fn validate(self, index: usize) -> Result<ScanEntry, EntryError> {
        let required = |value: Option<String>, field| {
            value.ok_or(EntryError::MissingField { index, field })
        };
        Ok(ScanEntry {
            name: required(self.name.filter(|n| !n.is_empty()), "NAME")?,
            comment: required(self.comment, "COMMENT")?,
            vm_type: required(self.vm_type, "VMTYPE")?,
            vcpu: required(self.vcpu, "VCPU")?,
            memory: required(self.memory, "MEMORY")?,
            status: required(self.status, "STATUS")?,
        })
    }
}

/// An OCS export on disk.
#[derive(Debug, Clone)]
pub struct OcsFile {
    path: PathBuf,
}

impl OcsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScanSource for OcsFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn entries(&self) -> Result<ScanBatch, ImportError> {
        let bytes = fs::read(&self.path).map_err(|source| ImportError::Read {
            path: self.path.clone(),
            source,
        })?;
        parse_ocs(&String::from_utf8_lossy(&bytes))
    }
}

/// Name of the first element in the document.
fn root_element(xml: &str) -> Result<String, ImportError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::Eof => return Err(ImportError::Xml("document has no root element".into())),
            _ => {}
        }
    }
}

/// Decodes the virtual machine entries of an OCS document.
pub fn parse_ocs(xml: &str) -> Result<ScanBatch, ImportError> {
    let root = root_element(xml)?;
    if root != ROOT {
        return Err(ImportError::UnexpectedRoot { found: root });
    }

    let request: Request = quick_xml::de::from_str(xml)?;
    let content = request
        .content
        .ok_or(ImportError::MissingElement("REQUEST/CONTENT"))?;
    if content.virtual_machines.is_empty() {
        return Err(ImportError::MissingElement("REQUEST/CONTENT/VIRTUALMACHINES"));
    }

    let mut batch = ScanBatch::default();
    for (index, vm) in content.virtual_machines.into_iter().enumerate() {
        match vm.validate(index) {
            Ok(entry) => {
                debug!("Scanned {:?}", entry);
                batch.entries.push(entry);
            }
            Err(e) => {
                warn!("Skipping scan entry: {}", e);
                batch.rejected.push(e);
            }
        }
    }
    Ok(batch)
}
