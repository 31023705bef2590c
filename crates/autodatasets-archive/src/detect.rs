use std::io::{self, Read, Seek};

use crate::format::{ArchiveFormat, TarCompress};

/// Bytes inspected when sniffing; one tar header block.
pub const SNIFF_LEN: usize = 512;

pub fn detect_format(data: &[u8]) -> Option<ArchiveFormat> {
    match data {
        [0x50, 0x4B, 0x03, 0x04, ..] | [0x50, 0x4B, 0x05, 0x06, ..] => Some(ArchiveFormat::Zip),
        [0x1F, 0x8B, ..] => Some(ArchiveFormat::Tar(TarCompress::Gzip)),
        [0x28, 0xB5, 0x2F, 0xFD, ..] => Some(ArchiveFormat::Tar(TarCompress::Zstd)),
        [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, ..] => Some(ArchiveFormat::Tar(TarCompress::Xz)),
        _ if is_tar_header(data) => Some(ArchiveFormat::Tar(TarCompress::None)),
        _ => None,
    }
}

/// POSIX (`ustar\0`) and GNU (`ustar  \0`) headers both start with `ustar`.
pub fn is_tar_header(data: &[u8]) -> bool {
    data.len() >= 262 && data[257..262] == *b"ustar"
}

/// Sniff the format from the start of `reader`, rewinding afterwards.
pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> io::Result<Option<ArchiveFormat>> {
    let header = read_prefix(&mut *reader)?;
    reader.rewind()?;
    Ok(detect_format(&header))
}

/// Up to [`SNIFF_LEN`] leading bytes; shorter inputs yield fewer.
pub fn read_prefix<R: Read>(reader: R) -> io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(SNIFF_LEN);
    reader.take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    Ok(header)
}
