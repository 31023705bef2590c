use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use autodatasets_archive::{ContainerKind, Error, Reader, TarCompress};
use flate2::Compression;
use flate2::write::GzEncoder;

const TRAIN_CSV: &[u8] = b"image_id,bbox\n1,\"[0, 0, 10, 10]\"\n";
const IMAGE: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg";

fn write_zip(path: &Path) {
    let file = File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    writer.add_directory("train/", options).unwrap();
    writer.start_file("train.csv", options).unwrap();
    writer.write_all(TRAIN_CSV).unwrap();
    writer.start_file("train/0001.jpg", options).unwrap();
    writer.write_all(IMAGE).unwrap();
    writer.finish().unwrap();
}

fn append_tar_entries<W: Write>(builder: &mut tar::Builder<W>, gnu: bool) {
    for (name, data) in [("train.csv", TRAIN_CSV), ("train/0001.jpg", IMAGE)] {
        let mut header = if gnu {
            tar::Header::new_gnu()
        } else {
            tar::Header::new_ustar()
        };
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, data).unwrap();
    }
}

fn write_tar(path: &Path, gnu: bool) {
    let mut builder = tar::Builder::new(File::create(path).unwrap());
    append_tar_entries(&mut builder, gnu);
    builder.into_inner().unwrap();
}

fn write_tar_gz(path: &Path) {
    let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    append_tar_entries(&mut builder, false);
    builder.into_inner().unwrap().finish().unwrap();
}

fn read_member(reader: &mut Reader, name: &str) -> Vec<u8> {
    let mut data = Vec::new();
    reader.open(name).unwrap().read_to_end(&mut data).unwrap();
    data
}

fn expected_size() -> u64 {
    (TRAIN_CSV.len() + IMAGE.len()) as u64
}

#[test]
fn zip_members_skip_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wheat.zip");
    write_zip(&path);

    let mut reader = Reader::from_path(&path).unwrap();

    assert_eq!(reader.kind(), ContainerKind::Zip);
    assert_eq!(reader.list_files(), vec!["train.csv", "train/0001.jpg"]);
    assert_eq!(reader.size(), expected_size());
    assert_eq!(read_member(&mut reader, "train.csv"), TRAIN_CSV);
    assert_eq!(read_member(&mut reader, "train/0001.jpg"), IMAGE);
}

#[test]
fn plain_tar_members_are_read_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wheat.tar");
    write_tar(&path, false);

    let mut reader = Reader::from_path(&path).unwrap();

    assert_eq!(reader.kind(), ContainerKind::Tar(TarCompress::None));
    assert_eq!(reader.list_files(), vec!["train.csv", "train/0001.jpg"]);
    assert_eq!(reader.size(), expected_size());
    assert_eq!(read_member(&mut reader, "train/0001.jpg"), IMAGE);
}

#[test]
fn gnu_tar_is_detected_without_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wheat.bin");
    write_tar(&path, true);

    let mut reader = Reader::from_path(&path).unwrap();

    assert_eq!(reader.kind(), ContainerKind::Tar(TarCompress::None));
    assert_eq!(read_member(&mut reader, "train.csv"), TRAIN_CSV);
}

#[test]
fn gzipped_tar_is_detected_by_content() {
    let dir = tempfile::tempdir().unwrap();
    // no .tar.gz suffix: only the decompressed header identifies it
    let path = dir.path().join("download");
    write_tar_gz(&path);

    let mut reader = Reader::from_path(&path).unwrap();

    assert_eq!(reader.kind(), ContainerKind::Tar(TarCompress::Gzip));
    assert_eq!(reader.list_files(), vec!["train.csv", "train/0001.jpg"]);
    assert_eq!(reader.size(), expected_size());
    assert_eq!(read_member(&mut reader, "train.csv"), TRAIN_CSV);
}

#[test]
fn gzipped_single_file_is_plain() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train-labels-idx1-ubyte.gz");
    let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    encoder.write_all(b"not a tarball").unwrap();
    encoder.finish().unwrap();
    let on_disk = std::fs::metadata(&path).unwrap().len();

    let reader = Reader::from_path(&path).unwrap();

    assert_eq!(reader.kind(), ContainerKind::Plain);
    assert_eq!(reader.list_files(), vec!["train-labels-idx1-ubyte.gz"]);
    assert_eq!(reader.size(), on_disk);
}

#[test]
fn missing_member_in_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wheat.tar.gz");
    write_tar_gz(&path);

    let mut reader = Reader::from_path(&path).unwrap();

    assert!(matches!(
        reader.open("test.csv"),
        Err(Error::MemberNotFound { member, .. }) if member == "test.csv"
    ));
}

#[test]
fn compressed_single_files_are_plain() {
    let dir = tempfile::tempdir().unwrap();
    let cases: [(&str, &[u8]); 2] = [
        ("train.json.xz", &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00]),
        ("train.csv.zst", &[0x28, 0xB5, 0x2F, 0xFD]),
    ];

    for (name, magic) in cases {
        let path = dir.path().join(name);
        let mut data = magic.to_vec();
        data.extend_from_slice(b"not really compressed");
        std::fs::write(&path, &data).unwrap();

        let mut reader = Reader::from_path(&path).unwrap();

        assert_eq!(reader.kind(), ContainerKind::Plain, "{name}");
        assert_eq!(reader.list_files(), vec![name]);
        assert_eq!(reader.size(), data.len() as u64);
        assert_eq!(read_member(&mut reader, name), data);
    }
}

#[cfg(not(feature = "xz"))]
#[test]
fn tar_xz_without_codec_is_plain() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wheat.tar.xz");
    std::fs::write(&path, [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, 0x00]).unwrap();

    let reader = Reader::from_path(&path).unwrap();

    assert_eq!(reader.kind(), ContainerKind::Plain);
    assert_eq!(reader.list_files(), vec!["wheat.tar.xz"]);
}
