//! Host inventory kept as one JSON file per group, reconciled against
//! fusion-inventory OCS scan exports.
//!
//! Load the inventory into a [`store::Store`], merge scans into one group with
//! [`import::import_dir`], then write everything back with
//! [`store::Store::save_all`].

pub mod config;
pub mod error;
pub mod import;
pub mod source;
pub mod store;
pub mod types;

pub use error::{EntryError, ImportError, StoreError};
pub use store::Store;
pub use types::{Host, HostList, Update};
