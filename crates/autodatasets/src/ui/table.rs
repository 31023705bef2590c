use autodatasets_registry::Listing;
use tabled::{
    Table, Tabled,
    settings::{Panel, Style},
};

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pub footer: Option<String>,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let mut table = Table::new(data);
        if let Some(footer) = self.footer {
            table.with(Panel::footer(footer));
        }

        table.with(Style::blank());
        table
    }
}

/// A registry listing as printed by `autodatasets list`.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct DatasetRow {
    pub name: String,
    #[tabled(rename = "type")]
    pub kind: String,
    pub task: String,
    #[tabled(rename = "size(MB)")]
    pub size_mb: String,
    pub num_files: String,
}

impl From<&Listing<'_>> for DatasetRow {
    fn from(listing: &Listing<'_>) -> Self {
        let unknown = |value: Option<u64>| value.map_or_else(|| "-".to_string(), |n| n.to_string());
        Self {
            name: listing.name.to_string(),
            kind: listing.kind.to_string(),
            task: listing.task.to_string(),
            size_mb: unknown(listing.size_mb),
            num_files: unknown(listing.file_count),
        }
    }
}

pub fn dataset_table(listings: &[Listing<'_>]) -> Table {
    let footer = match listings.len() {
        1 => "1 dataset".to_string(),
        n => format!("{n} datasets"),
    };
    Formatter {
        footer: Some(footer),
    }
    .build(listings.iter().map(DatasetRow::from))
}
