use std::fmt;

use crate::entry::Entry;

/// Columns that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Type,
    Task,
}

impl Column {
    pub(crate) fn value(self, entry: &Entry) -> &str {
        match self {
            Column::Name => &entry.name,
            Column::Type => &entry.kind,
            Column::Task => &entry.task,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Name => write!(f, "name"),
            Column::Type => write!(f, "type"),
            Column::Task => write!(f, "task"),
        }
    }
}

/// Equality filters for [`Registry::list`](crate::Registry::list).
/// Unset or empty values match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub task: Option<String>,
}

impl ListFilter {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// The non-empty constraints, in column order.
    pub fn constraints(&self) -> impl Iterator<Item = (Column, &str)> {
        [
            (Column::Name, self.name.as_deref()),
            (Column::Type, self.kind.as_deref()),
            (Column::Task, self.task.as_deref()),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.filter(|v| !v.is_empty()).map(|v| (column, v)))
    }
}

/// A registry row without the bulky `resource` and `sha1sum` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listing<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub task: &'a str,
    pub size_mb: Option<u64>,
    pub file_count: Option<u64>,
}

impl<'a> From<&'a Entry> for Listing<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            name: &entry.name,
            kind: &entry.kind,
            task: &entry.task,
            size_mb: entry.size_mb,
            file_count: entry.file_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_ignored() {
        let filter = ListFilter::default().name("").task("kaggle");
        let constraints: Vec<_> = filter.constraints().collect();
        assert_eq!(constraints, vec![(Column::Task, "kaggle")]);
    }

    #[test]
    fn column_names_match_headers() {
        assert_eq!(Column::Type.to_string(), "type");
    }
}
