//! The seam through which the detector obtains file contents.

use super::MediaFile;
use crate::error::ReadError;
use memmap2::Mmap;

/// Something that can hand over the full contents of one file.
///
/// The buffer is acquired once per detection/segmentation call and
/// released when the returned [`SourceBytes`] is dropped.
pub trait MediaSource: Send + Sync {
    /// File name as declared by the uploader
    fn name(&self) -> &str;

    /// Declared mime type (may be empty)
    fn mime(&self) -> &str;

    /// Read the full contents
    fn load(&self) -> Result<SourceBytes<'_>, ReadError>;
}

/// File bytes that may be borrowed, owned or memory-mapped.
pub enum SourceBytes<'a> {
    /// Bytes already held in memory by the source
    Borrowed(&'a [u8]),
    /// Heap-allocated bytes read for this call
    Owned(Vec<u8>),
    /// Memory-mapped bytes
    Mapped(Mmap),
}

impl AsRef<[u8]> for SourceBytes<'_> {
    fn as_ref(&self) -> &[u8] {
        match self {
            SourceBytes::Borrowed(b) => b,
            SourceBytes::Owned(v) => v,
            SourceBytes::Mapped(m) => m,
        }
    }
}

impl std::ops::Deref for SourceBytes<'_> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_ref()
    }
}

impl MediaSource for MediaFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime(&self) -> &str {
        &self.mime
    }

    fn load(&self) -> Result<SourceBytes<'_>, ReadError> {
        Ok(SourceBytes::Borrowed(&self.bytes))
    }
}
