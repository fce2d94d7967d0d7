// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    fmt, fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    str::FromStr,
};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Categories accepted at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressCategory {
    Wallet,
    Token,
}

impl AddressCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressCategory::Wallet => "wallet",
            AddressCategory::Token => "token",
        }
    }
}

impl fmt::Display for AddressCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "wallet" => Ok(AddressCategory::Wallet),
            "token" => Ok(AddressCategory::Token),
            other => Err(Error::InvalidArgument(format!(
                "unknown address category: {:?}",
                other
            ))),
        }
    }
}

type Entries = BTreeMap<String, Vec<String>>;

/// Favorite addresses grouped by category, persisted as a single JSON file.
///
/// The map and the file are only touched while holding `entries`, so an
/// [`AddressBook::add_and_save`] never interleaves with another writer.
pub struct AddressBook {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl AddressBook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(Entries::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory map with the file contents. A missing file
    /// yields an empty book.
    pub fn load(&self) -> Result<()> {
        let mut entries = self.entries.lock();

        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "Address book {} does not exist yet, starting empty",
                    self.path.display()
                );
                entries.clear();
                return Ok(());
            }
            Err(e) => {
                return Err(Error::Persistence(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        *entries = serde_json::from_slice(&data).map_err(|e| {
            Error::Persistence(format!("failed to parse {}: {}", self.path.display(), e))
        })?;
        info!(
            "Loaded address book {} with {} categories",
            self.path.display(),
            entries.len()
        );
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let entries = self.entries.lock();
        self.write(&entries)
    }

    pub fn add(&self, category: &str, address: &str) {
        self.entries
            .lock()
            .entry(category.to_string())
            .or_default()
            .push(address.to_string());
    }

    pub fn get(&self, category: &str) -> Vec<String> {
        self.entries
            .lock()
            .get(category)
            .cloned()
            .unwrap_or_default()
    }

    /// Appends `address` and persists the book in one critical section.
    pub fn add_and_save(&self, category: &str, address: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        entries
            .entry(category.to_string())
            .or_default()
            .push(address.to_string());
        self.write(&entries)
    }

    /// Writes to a sibling temp file, then renames it over the target.
    fn write(&self, entries: &Entries) -> Result<()> {
        let data = serde_json::to_vec(entries).map_err(|e| self.write_error(e))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        file.write_all(&data).map_err(|e| self.write_error(e))?;
        file.as_file().sync_all().map_err(|e| self.write_error(e))?;
        file.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        debug!("Saved address book {}", self.path.display());
        Ok(())
    }

    fn write_error(&self, e: impl fmt::Display) -> Error {
        Error::Persistence(format!("failed to write {}: {}", self.path.display(), e))
    }
}
