//! Data structures used throughout hostsync.
//!
//! A [`HostList`] is one group of hosts persisted as a single JSON file.
//! The field names and their order follow the files already kept in the
//! inventory, so loading and saving an untouched group reproduces it.
//! Decoding is tolerant: missing fields take their default value and a
//! `null` list decodes as an empty one.

use serde::{Deserialize, Deserializer, Serialize};

/// Treats a JSON `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One managed machine, virtual machine or container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Host {
    /// Unique key within a group.
    pub name: String,
    pub connect: Connect,
    #[serde(rename = "type")]
    pub kind: String,
    /// Name of the parent host, if any.
    pub parent: String,
    pub os: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ips: Vec<String>,
    pub comment: String,
    pub project: String,
    pub domain: String,
    pub status: String,
    pub ignore: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub activeusers: Vec<String>,
    pub cpu: Cpu,
    /// Free-text capacity, e.g. `"8192"` or `"16 GB"`.
    pub ram: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disks: Vec<Disk>,
    #[serde(deserialize_with = "null_as_default")]
    pub ports: Vec<u16>,
    #[serde(deserialize_with = "null_as_default")]
    pub containers: Vec<Container>,
    #[serde(deserialize_with = "null_as_default")]
    pub crontabs: Vec<Crontab>,
    pub firewall: String,
    pub lastconnect: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connect {
    pub service: String,
    pub address: String,
    pub port: u16,
    pub credentials: Credentials,
}

/// Credential fields are omitted from the file when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cpu {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Disk {
    #[serde(rename = "type")]
    pub kind: String,
    pub capacity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub services: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub ports: Vec<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crontab {
    pub user: String,
    pub frequency: String,
    pub script: String,
}

/// A named, domain-tagged group of hosts. Host order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostList {
    pub name: String,
    pub domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hosts: Vec<Host>,
}

impl HostList {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            hosts: Vec::new(),
        }
    }

    pub fn find(&self, name: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.name == name)
    }
}

/// A change applied to a group while reconciling it against a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Update {
    /// An existing host was overwritten with scanned values.
    Updated { name: String },
    /// A host unknown to the group was appended.
    Added { name: String },
}

impl Update {
    pub fn name(&self) -> &str {
        match self {
            Update::Updated { name } | Update::Added { name } => name,
        }
    }
}
