use std::fs;
use std::path::{Path, PathBuf};

use autodatasets_registry::{
    COLUMNS, ChecksumState, Column, Entry, EntryUpdate, ListFilter, Registry, RegistryError,
};
use proptest::prelude::*;
use tempfile::TempDir;

const TABLE: &str = "\
name,type,task,resource,sha1sum,size(MB),num_files
wheat,object_detection,kaggle,https://host/wheat/train.zip;https://host/wheat/test.zip,,,
mnist,image_classification,vision,https://host/mnist.gz,0a1b,12.0,4.0
cifar,image_classification,vision,https://host/cifar.tar.gz,ffee,163,6
";

fn write_table(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datasets.csv");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn loads_rows_and_float_cells() {
    let (_dir, path) = write_table(TABLE);
    let registry = Registry::load(&path).unwrap();

    assert_eq!(registry.entries().len(), 3);

    let wheat = registry.lookup("wheat").unwrap();
    assert_eq!(wheat.resources.len(), 2);
    assert_eq!(wheat.checksum_state(), ChecksumState::Unknown);
    assert_eq!(wheat.size_mb, None);

    let mnist = registry.lookup("mnist").unwrap();
    assert_eq!(mnist.size_mb, Some(12));
    assert_eq!(mnist.file_count, Some(4));
    assert!(matches!(mnist.checksum_state(), ChecksumState::Known(c) if c == ["0a1b"]));
}

#[test]
fn duplicate_names_refuse_to_load() {
    let table = format!("{TABLE}wheat,x,y,https://host/other.zip,,,\n");
    let (_dir, path) = write_table(&table);

    let err = Registry::load(&path).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateNames { names, .. } if names == ["wheat"]));
}

#[test]
fn lookup_unknown_name() {
    let (_dir, path) = write_table(TABLE);
    let registry = Registry::load(&path).unwrap();

    assert!(matches!(
        registry.lookup("imagenet"),
        Err(RegistryError::NotFound { column: Column::Name, .. })
    ));
}

#[test]
fn list_by_type_omits_internal_columns() {
    let (_dir, path) = write_table(TABLE);
    let registry = Registry::load(&path).unwrap();

    let rows = registry
        .list(&ListFilter::default().kind("image_classification"))
        .unwrap();

    let names: Vec<_> = rows.iter().map(|row| row.name).collect();
    assert_eq!(names, ["mnist", "cifar"]);
    assert_eq!(rows[1].size_mb, Some(163));
    assert_eq!(rows[1].file_count, Some(6));
}

#[test]
fn list_combines_filters() {
    let (_dir, path) = write_table(TABLE);
    let registry = Registry::load(&path).unwrap();

    let rows = registry
        .list(&ListFilter::default().task("vision").name("cifar"))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "cifar");

    // both values exist in their columns, just not on the same row
    let rows = registry
        .list(&ListFilter::default().task("kaggle").name("cifar"))
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn list_value_absent_from_column() {
    let (_dir, path) = write_table(TABLE);
    let registry = Registry::load(&path).unwrap();

    let err = registry
        .list(&ListFilter::default().task("audio"))
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::NotFound { column: Column::Task, value, .. } if value == "audio"
    ));
}

#[test]
fn persist_writes_sorted_canonical_table() {
    let (_dir, path) = write_table(TABLE);
    let mut registry = Registry::load(&path).unwrap();
    assert!(!registry.is_canonical());

    registry
        .update(
            "wheat",
            EntryUpdate {
                checksums: Some(vec!["aa".into(), "bb".into()]),
                size_mb: Some(3),
                file_count: Some(17),
            },
        )
        .unwrap();
    registry.persist().unwrap();
    assert!(registry.is_canonical());

    let lines = read_lines(&path);
    assert_eq!(lines[0], COLUMNS.join(","));
    assert!(lines[1].starts_with("cifar,"));
    assert!(lines[2].starts_with("mnist,"));
    assert_eq!(
        lines[3],
        "wheat,object_detection,kaggle,\
         https://host/wheat/train.zip;https://host/wheat/test.zip,aa;bb,3,17"
    );
    assert!(!path.with_extension("tmp").exists());

    let reloaded = Registry::load(&path).unwrap();
    assert_eq!(reloaded.entries(), registry.entries());
}

#[test]
fn empty_table_keeps_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datasets.csv");

    let mut registry = Registry::from_entries(&path, Vec::new()).unwrap();
    registry.persist().unwrap();

    assert_eq!(read_lines(&path), [COLUMNS.join(",")]);
    assert!(Registry::load(&path).unwrap().entries().is_empty());
}

fn arb_entry() -> impl Strategy<Value = Entry> {
    ("[a-c]", "[a-c]", "[a-z]{1,6}").prop_map(|(kind, task, name)| {
        Entry::new(name.clone(), kind, task, vec![format!("https://host/{name}")])
    })
}

proptest! {
    #[test]
    fn persisted_table_is_sorted(entries in prop::collection::vec(arb_entry(), 0..24)) {
        let mut seen = std::collections::HashSet::new();
        let entries: Vec<Entry> = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.name.clone()))
            .collect();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datasets.csv");
        let mut registry = Registry::from_entries(&path, entries).unwrap();
        registry.persist().unwrap();

        let reloaded = Registry::load(&path).unwrap();
        prop_assert!(reloaded.is_canonical());
        prop_assert_eq!(reloaded.entries().len(), registry.entries().len());
    }
}
