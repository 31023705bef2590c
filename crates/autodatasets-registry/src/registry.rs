use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim, WriterBuilder};

use crate::entry::{COLUMNS, Entry, EntryUpdate};
use crate::error::{RegistryError, Result};
use crate::filter::{Column, ListFilter, Listing};

/// The dataset table, loaded from and persisted to a CSV file.
///
/// Names are unique for the lifetime of a `Registry`; a table that
/// violates this refuses to load. Rows keep their stored order until
/// [`persist`](Self::persist) sorts them by `(type, task, name)`.
#[derive(Debug, Clone)]
pub struct Registry {
    path: PathBuf,
    entries: Vec<Entry>,
}

impl Registry {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(&path)
            .map_err(RegistryError::csv(&path))?;

        let entries = reader
            .deserialize::<Entry>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(RegistryError::csv(&path))?;

        Self::from_entries(path, entries)
    }

    /// Builds a registry bound to `path` without touching the disk.
    pub fn from_entries(path: impl Into<PathBuf>, entries: Vec<Entry>) -> Result<Self> {
        let path = path.into();
        let names = duplicate_names(&entries);
        if !names.is_empty() {
            return Err(RegistryError::DuplicateNames { names, path });
        }
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn lookup(&self, name: &str) -> Result<&Entry> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| self.not_found(Column::Name, name))
    }

    /// Merges derived fields into the row named `name`. Nothing is written
    /// until [`persist`](Self::persist).
    pub fn update(&mut self, name: &str, update: EntryUpdate) -> Result<()> {
        let Some(index) = self.entries.iter().position(|entry| entry.name == name) else {
            return Err(self.not_found(Column::Name, name));
        };
        self.entries[index].apply(update);
        Ok(())
    }

    /// Whether the rows are already in `(type, task, name)` order.
    pub fn is_canonical(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].sort_key() <= pair[1].sort_key())
    }

    /// Sorts the rows and rewrites the whole table.
    ///
    /// The table is written next to the current file and renamed over it, so a
    /// failed write leaves the previous table in place.
    pub fn persist(&mut self) -> Result<()> {
        self.entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let tmp_path = self.path.with_extension("tmp");
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(&tmp_path)
            .map_err(RegistryError::csv(&tmp_path))?;

        // explicit header row: an empty table still gets one
        writer
            .write_record(COLUMNS)
            .map_err(RegistryError::csv(&tmp_path))?;
        for entry in &self.entries {
            writer
                .serialize(entry)
                .map_err(RegistryError::csv(&tmp_path))?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| RegistryError::io(&tmp_path)(e.into_error()))?;
        file.sync_all().map_err(RegistryError::io(&tmp_path))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(RegistryError::io(&self.path))
    }

    /// Rows matching every non-empty filter value, in stored order.
    ///
    /// A value that appears nowhere in its column is an error rather than
    /// an empty listing.
    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Listing<'_>>> {
        let mut rows: Vec<&Entry> = self.entries.iter().collect();
        for (column, value) in filter.constraints() {
            if !self.entries.iter().any(|entry| column.value(entry) == value) {
                return Err(self.not_found(column, value));
            }
            rows.retain(|entry| column.value(entry) == value);
        }
        Ok(rows.into_iter().map(Listing::from).collect())
    }

    fn not_found(&self, column: Column, value: &str) -> RegistryError {
        RegistryError::NotFound {
            column,
            value: value.to_string(),
            path: self.path.clone(),
        }
    }
}

/// Every name occurring more than once, each reported once, in table order.
fn duplicate_names(entries: &[Entry]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.name.as_str()).or_default() += 1;
    }

    let mut names = Vec::new();
    for entry in entries {
        if let Some(count) = counts.get_mut(entry.name.as_str())
            && *count > 1
        {
            names.push(entry.name.clone());
            // mark as reported
            *count = 0;
        }
    }
    names
}
