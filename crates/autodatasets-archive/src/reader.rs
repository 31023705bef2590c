use std::fs::{self, File};
use std::io::Read;
#[cfg(feature = "tar")]
use std::io::{Cursor, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::detect::{detect_format, is_tar_header, read_prefix};
use crate::error::{Error, Result};
use crate::format::{ArchiveFormat, TarCompress};

/// The container kind a [`Reader`] resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    /// A single file that is not a recognised container.
    Plain,
    Directory,
    Zip,
    Tar(TarCompress),
}

/// A file stored inside a container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    /// `/`-separated path relative to the container root.
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Byte offset of the data in an uncompressed tar.
    offset: Option<u64>,
}

impl Member {
    fn new(name: String, size: u64) -> Self {
        Self {
            name,
            size,
            offset: None,
        }
    }
}

enum Source {
    Plain,
    Directory,
    #[cfg(feature = "zip")]
    Zip(zip::ZipArchive<File>),
    #[cfg(feature = "tar")]
    Tar(TarCompress),
}

/// Uniform view over a downloaded resource: a zip, a tar (optionally
/// compressed), a directory tree, or a single plain file.
///
/// The format is resolved once, from the file's content with the name as a
/// tie-breaker, and the member list is read eagerly.
pub struct Reader {
    path: PathBuf,
    source: Source,
    members: Vec<Member>,
}

impl Reader {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = fs::metadata(&path).map_err(Error::io(&path))?;

        if metadata.is_dir() {
            let mut members = Vec::new();
            walk_dir(&path, "", &mut members)?;
            members.sort_by(|a, b| a.name.cmp(&b.name));
            return Ok(Self {
                path,
                source: Source::Directory,
                members,
            });
        }

        let header = read_prefix(File::open(&path).map_err(Error::io(&path))?)
            .map_err(Error::io(&path))?;

        match detect_format(&header) {
            Some(ArchiveFormat::Zip) => Self::zip(path),
            Some(ArchiveFormat::Tar(compress)) if looks_like_tar(&path, compress)? => {
                Self::tar(path, compress)
            }
            _ => Ok(Self::plain(path, metadata.len())),
        }
    }

    fn plain(path: PathBuf, len: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            source: Source::Plain,
            members: vec![Member::new(name, len)],
        }
    }

    #[cfg(feature = "zip")]
    fn zip(path: PathBuf) -> Result<Self> {
        let file = File::open(&path).map_err(Error::io(&path))?;
        let mut archive = zip::ZipArchive::new(file).map_err(|source| Error::Zip {
            path: path.clone(),
            source,
        })?;

        let mut members = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive.by_index(index).map_err(|source| Error::Zip {
                path: path.clone(),
                source,
            })?;
            if !entry.is_dir() {
                members.push(Member::new(entry.name().to_string(), entry.size()));
            }
        }

        Ok(Self {
            path,
            source: Source::Zip(archive),
            members,
        })
    }

    #[cfg(not(feature = "zip"))]
    fn zip(path: PathBuf) -> Result<Self> {
        Err(Error::UnsupportedFormat { path })
    }

    #[cfg(feature = "tar")]
    fn tar(path: PathBuf, compress: TarCompress) -> Result<Self> {
        let mut archive = open_tar(&path, compress)?;
        let mut members = Vec::new();
        for entry in archive.entries().map_err(Error::io(&path))? {
            let entry = entry.map_err(Error::io(&path))?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let name = entry
                .path()
                .map_err(Error::io(&path))?
                .to_str()
                .ok_or_else(|| Error::InvalidPath { path: path.clone() })?
                .to_string();
            let offset = (compress == TarCompress::None).then(|| entry.raw_file_position());
            members.push(Member {
                name,
                size: entry.size(),
                offset,
            });
        }

        Ok(Self {
            path,
            source: Source::Tar(compress),
            members,
        })
    }

    #[cfg(not(feature = "tar"))]
    fn tar(path: PathBuf, _compress: TarCompress) -> Result<Self> {
        Err(Error::UnsupportedFormat { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ContainerKind {
        match &self.source {
            Source::Plain => ContainerKind::Plain,
            Source::Directory => ContainerKind::Directory,
            #[cfg(feature = "zip")]
            Source::Zip(_) => ContainerKind::Zip,
            #[cfg(feature = "tar")]
            Source::Tar(compress) => ContainerKind::Tar(*compress),
        }
    }

    /// Total uncompressed bytes across all member files.
    pub fn size(&self) -> u64 {
        self.members.iter().map(|m| m.size).sum()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn list_files(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }

    /// Open a member for reading.
    ///
    /// Members of compressed tars are decompressed into memory, since the
    /// stream cannot be positioned without re-reading it.
    pub fn open(&mut self, member: &str) -> Result<Box<dyn Read + '_>> {
        let Some(found) = self.members.iter().find(|m| m.name == member) else {
            return Err(Error::MemberNotFound {
                path: self.path.clone(),
                member: member.to_string(),
            });
        };

        match &mut self.source {
            Source::Plain => Ok(Box::new(File::open(&self.path).map_err(Error::io(&self.path))?)),
            Source::Directory => {
                let path = self.path.join(member);
                Ok(Box::new(File::open(&path).map_err(Error::io(&path))?))
            }
            #[cfg(feature = "zip")]
            Source::Zip(archive) => {
                let entry = archive.by_name(member).map_err(|source| Error::Zip {
                    path: self.path.clone(),
                    source,
                })?;
                Ok(Box::new(entry))
            }
            #[cfg(feature = "tar")]
            Source::Tar(compress) => match found.offset {
                Some(offset) => {
                    let mut file = File::open(&self.path).map_err(Error::io(&self.path))?;
                    file.seek(SeekFrom::Start(offset))
                        .map_err(Error::io(&self.path))?;
                    Ok(Box::new(file.take(found.size)))
                }
                None => {
                    let data = read_tar_member(&self.path, *compress, member)?;
                    Ok(Box::new(Cursor::new(data)))
                }
            },
        }
    }
}

/// A gzip/xz/zstd stream is only a tar when its name says so or its first
/// decompressed block carries the tar magic. Codecs that were not compiled
/// in never make a tar, whatever the name.
fn looks_like_tar(path: &Path, compress: TarCompress) -> Result<bool> {
    if !compress.is_supported() {
        return Ok(false);
    }
    if compress == TarCompress::None {
        return Ok(true);
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if compress.tar_suffixes().iter().any(|s| name.ends_with(s)) {
        return Ok(true);
    }
    decompressed_prefix_is_tar(path, compress)
}

#[cfg(feature = "tar")]
fn decompressed_prefix_is_tar(path: &Path, compress: TarCompress) -> Result<bool> {
    let file = File::open(path).map_err(Error::io(path))?;
    let Ok(Some(decoder)) = compress.decoder(file) else {
        return Ok(false);
    };
    // a stream that fails to decode is not a readable tar
    Ok(read_prefix(decoder).is_ok_and(|prefix| is_tar_header(&prefix)))
}

#[cfg(not(feature = "tar"))]
fn decompressed_prefix_is_tar(_path: &Path, _compress: TarCompress) -> Result<bool> {
    Ok(false)
}

#[cfg(feature = "tar")]
fn open_tar(
    path: &Path,
    compress: TarCompress,
) -> Result<tar::Archive<crate::format::Decoder<File>>> {
    let file = File::open(path).map_err(Error::io(path))?;
    match compress.decoder(file).map_err(Error::io(path))? {
        Some(decoder) => Ok(tar::Archive::new(decoder)),
        None => Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(feature = "tar")]
fn read_tar_member(path: &Path, compress: TarCompress, member: &str) -> Result<Vec<u8>> {
    let mut archive = open_tar(path, compress)?;
    for entry in archive.entries().map_err(Error::io(path))? {
        let mut entry = entry.map_err(Error::io(path))?;
        let matches = entry
            .path()
            .map_err(Error::io(path))?
            .to_str()
            .is_some_and(|name| name == member);
        if matches {
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data).map_err(Error::io(path))?;
            return Ok(data);
        }
    }
    Err(Error::MemberNotFound {
        path: path.to_path_buf(),
        member: member.to_string(),
    })
}

fn walk_dir(dir: &Path, prefix: &str, members: &mut Vec<Member>) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(Error::io(dir))? {
        let entry = entry.map_err(Error::io(dir))?;
        let file_name = entry
            .file_name()
            .into_string()
            .map_err(|_| Error::InvalidPath {
                path: entry.path(),
            })?;
        let name = if prefix.is_empty() {
            file_name
        } else {
            format!("{prefix}/{file_name}")
        };

        let metadata = entry.metadata().map_err(Error::io(entry.path()))?;
        if metadata.is_dir() {
            walk_dir(&entry.path(), &name, members)?;
        } else if metadata.is_file() {
            members.push(Member::new(name, metadata.len()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn plain_file_is_its_own_member() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labels.csv");
        fs::write(&path, b"a,b\n1,2\n").unwrap();

        let mut reader = Reader::from_path(&path).unwrap();

        assert_eq!(reader.kind(), ContainerKind::Plain);
        assert_eq!(reader.list_files(), vec!["labels.csv"]);
        assert_eq!(reader.size(), 8);
        let mut content = String::new();
        reader
            .open("labels.csv")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "a,b\n1,2\n");
    }

    #[test]
    fn directory_members_are_relative_and_sorted() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("train/images")).unwrap();
        fs::write(dir.path().join("train/images/b.jpg"), b"bb").unwrap();
        fs::write(dir.path().join("train/a.txt"), b"a").unwrap();
        fs::write(dir.path().join("README"), b"readme").unwrap();

        let mut reader = Reader::from_path(dir.path()).unwrap();

        assert_eq!(reader.kind(), ContainerKind::Directory);
        assert_eq!(
            reader.list_files(),
            vec!["README", "train/a.txt", "train/images/b.jpg"]
        );
        assert_eq!(reader.size(), 9);
        let mut content = Vec::new();
        reader
            .open("train/images/b.jpg")
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, b"bb");
    }

    #[test]
    fn unknown_member_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labels.csv");
        fs::write(&path, b"x").unwrap();

        let mut reader = Reader::from_path(&path).unwrap();
        assert!(matches!(
            reader.open("other.csv"),
            Err(Error::MemberNotFound { .. })
        ));
    }

    #[test]
    fn missing_path_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Reader::from_path(dir.path().join("nope.zip")),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn empty_file_is_plain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        fs::write(&path, b"").unwrap();

        let reader = Reader::from_path(&path).unwrap();
        assert_eq!(reader.kind(), ContainerKind::Plain);
        assert_eq!(reader.size(), 0);
        assert_eq!(reader.list_files().len(), 1);
    }
}
