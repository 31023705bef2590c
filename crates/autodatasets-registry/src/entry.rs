use serde::{Deserialize, Serialize};

/// Column headers in storage order.
pub const COLUMNS: [&str; 7] = [
    "name",
    "type",
    "task",
    "resource",
    "sha1sum",
    "size(MB)",
    "num_files",
];

/// One row of the registry table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub task: String,

    /// Remote addresses, paired positionally with `checksums`.
    #[serde(rename = "resource", with = "joined")]
    pub resources: Vec<String>,

    #[serde(rename = "sha1sum", with = "joined_opt", default)]
    pub checksums: Option<Vec<String>>,

    #[serde(rename = "size(MB)", with = "whole_number", default)]
    pub size_mb: Option<u64>,

    #[serde(rename = "num_files", with = "whole_number", default)]
    pub file_count: Option<u64>,
}

/// Whether an entry's digests can be trusted for cache validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumState<'a> {
    /// No digests yet, or a list that does not pair up with the resources.
    Unknown,
    Known(&'a [String]),
}

/// Derived fields written back after a first download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub checksums: Option<Vec<String>>,
    pub size_mb: Option<u64>,
    pub file_count: Option<u64>,
}

impl Entry {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        task: impl Into<String>,
        resources: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            task: task.into(),
            resources,
            checksums: None,
            size_mb: None,
            file_count: None,
        }
    }

    pub fn checksum_state(&self) -> ChecksumState<'_> {
        match &self.checksums {
            Some(checksums) if checksums.len() == self.resources.len() => {
                ChecksumState::Known(checksums)
            }
            _ => ChecksumState::Unknown,
        }
    }

    pub fn apply(&mut self, update: EntryUpdate) {
        if let Some(checksums) = update.checksums {
            self.checksums = Some(checksums);
        }
        if let Some(size_mb) = update.size_mb {
            self.size_mb = Some(size_mb);
        }
        if let Some(file_count) = update.file_count {
            self.file_count = Some(file_count);
        }
    }

    pub(crate) fn sort_key(&self) -> (&str, &str, &str) {
        (&self.kind, &self.task, &self.name)
    }
}

fn split_list(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

mod joined {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(list: &[String], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&list.join(";"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        let cell = Option::<String>::deserialize(d)?;
        Ok(cell.as_deref().map(super::split_list).unwrap_or_default())
    }
}

mod joined_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(list: &Option<Vec<String>>, s: S) -> Result<S::Ok, S::Error> {
        match list {
            Some(list) if !list.is_empty() => s.serialize_some(&list.join(";")),
            _ => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
        let cell = Option::<String>::deserialize(d)?;
        Ok(cell
            .as_deref()
            .map(super::split_list)
            .filter(|list| !list.is_empty()))
    }
}

/// Integer cells, tolerating the `12.0` rendering float-typed tools emit
/// for columns with missing values.
mod whole_number {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(n) => s.serialize_some(n),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        let Some(cell) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        let cell = cell.trim();
        if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
            return Ok(None);
        }
        if let Ok(n) = cell.parse::<u64>() {
            return Ok(Some(n));
        }
        match cell.parse::<f64>() {
            Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
            _ => Err(D::Error::custom(format!("expected a whole number, got {cell:?}"))),
        }
    }
}
