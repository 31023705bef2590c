use std::fmt;
#[cfg(feature = "tar")]
use std::io::{self, Read};

/// Container formats recognised by magic bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar(TarCompress),
}

/// Compression codec wrapped around a tar stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TarCompress {
    None,
    Gzip,
    Xz,
    Zstd,
}

impl TarCompress {
    /// File name suffixes that mark a compressed tar regardless of content.
    pub(crate) fn tar_suffixes(self) -> &'static [&'static str] {
        match self {
            Self::None => &[".tar"],
            Self::Gzip => &[".tar.gz", ".tgz"],
            Self::Xz => &[".tar.xz", ".txz"],
            Self::Zstd => &[".tar.zst", ".tzst"],
        }
    }

    /// Whether this codec was compiled in. Unsupported codecs make the
    /// file read as a plain file rather than a tar.
    pub fn is_supported(self) -> bool {
        match self {
            Self::None | Self::Gzip => cfg!(feature = "tar"),
            Self::Xz => cfg!(feature = "xz"),
            Self::Zstd => cfg!(feature = "zstd"),
        }
    }

    /// Wrap `reader` in a decoder for this codec.
    ///
    /// Returns `None` when support for the codec was not compiled in.
    #[cfg(feature = "tar")]
    pub fn decoder<R: Read>(self, reader: R) -> io::Result<Option<Decoder<R>>> {
        let decoder = match self {
            Self::None => Decoder::Passthrough(reader),
            Self::Gzip => Decoder::Gzip(Box::new(flate2::read::GzDecoder::new(reader))),
            #[cfg(feature = "xz")]
            Self::Xz => Decoder::Xz(Box::new(xz2::read::XzDecoder::new(reader))),
            #[cfg(feature = "zstd")]
            Self::Zstd => Decoder::Zstd(Box::new(zstd::stream::read::Decoder::new(reader)?)),
            #[allow(unreachable_patterns)]
            _ => return Ok(None),
        };
        Ok(Some(decoder))
    }
}

impl fmt::Display for TarCompress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "tar"),
            Self::Gzip => write!(f, "tar.gz"),
            Self::Xz => write!(f, "tar.xz"),
            Self::Zstd => write!(f, "tar.zst"),
        }
    }
}

/// Decoder wrapper for tar decompression.
#[cfg(feature = "tar")]
pub enum Decoder<R: Read> {
    Passthrough(R),
    Gzip(Box<flate2::read::GzDecoder<R>>),
    #[cfg(feature = "xz")]
    Xz(Box<xz2::read::XzDecoder<R>>),
    #[cfg(feature = "zstd")]
    Zstd(Box<zstd::stream::read::Decoder<'static, io::BufReader<R>>>),
}

#[cfg(feature = "tar")]
impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
            #[cfg(feature = "xz")]
            Self::Xz(d) => d.read(buf),
            #[cfg(feature = "zstd")]
            Self::Zstd(d) => d.read(buf),
        }
    }
}
