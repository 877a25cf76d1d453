//! File-backed media sources.
//!
//! Large files are memory-mapped instead of copied onto the heap; motion
//! photos are several megabytes and only a slice of them is searched.

use crate::core::detector::MIN_EMBEDDED_SIZE;
use crate::core::media::{extension_of, mime_from_extension, MediaFile, MediaSource, SourceBytes};
use crate::error::ReadError;
use chrono::{DateTime, Utc};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Files at least this large are memory-mapped
const MMAP_THRESHOLD: u64 = MIN_EMBEDDED_SIZE as u64;

/// A media file on disk, read lazily
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
    name: String,
    mime: String,
}

impl PathSource {
    /// Wrap a path, inferring the mime type from its extension
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = extension_of(&name)
            .map(mime_from_extension)
            .unwrap_or("")
            .to_string();
        Self { path, name, mime }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file into a [`MediaFile`], keeping its mtime
    pub fn read(&self) -> Result<MediaFile, ReadError> {
        let bytes = std::fs::read(&self.path).map_err(|e| self.io_error(e))?;
        let modified = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(MediaFile::new(self.name.clone(), self.mime.clone(), bytes).with_modified(modified))
    }

    fn io_error(&self, source: std::io::Error) -> ReadError {
        ReadError::Io {
            name: self.path.display().to_string(),
            source,
        }
    }
}

impl MediaSource for PathSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime(&self) -> &str {
        &self.mime
    }

    fn load(&self) -> Result<SourceBytes<'_>, ReadError> {
        let metadata = std::fs::metadata(&self.path).map_err(|e| self.io_error(e))?;

        if metadata.len() == 0 {
            return Err(ReadError::Empty {
                name: self.path.display().to_string(),
            });
        }

        if metadata.len() >= MMAP_THRESHOLD {
            let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
            // SAFETY: the map is read-only and dropped with the returned
            // bytes; the file is not written through this process.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| self.io_error(e))?;
            Ok(SourceBytes::Mapped(mmap))
        } else {
            let bytes = std::fs::read(&self.path).map_err(|e| self.io_error(e))?;
            Ok(SourceBytes::Owned(bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::detector::{BoundaryDetector, NotEmbeddedReason, FTYP_SIGNATURE};
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn infers_name_and_mime() {
        let source = PathSource::new("/uploads/MVIMG_01.JPG");
        assert_eq!(source.name(), "MVIMG_01.JPG");
        assert_eq!(source.mime(), "image/jpeg");
    }

    #[test]
    fn small_files_are_read_onto_the_heap() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.jpg");
        std::fs::write(&path, b"not much").unwrap();

        let source = PathSource::new(&path);
        let bytes = source.load().unwrap();
        assert!(matches!(bytes, SourceBytes::Owned(_)));
        assert_eq!(&*bytes, b"not much");
    }

    #[test]
    fn large_files_are_mapped_and_detected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("MVIMG_02.jpg");
        let len = 2 * MIN_EMBEDDED_SIZE;
        let mut bytes = vec![0u8; len];
        bytes[len / 2..len / 2 + 4].copy_from_slice(&FTYP_SIGNATURE);
        File::create(&path).unwrap().write_all(&bytes).unwrap();

        let source = PathSource::new(&path);
        assert!(matches!(source.load().unwrap(), SourceBytes::Mapped(_)));
        assert_eq!(
            BoundaryDetector::default().detect_source(&source).position,
            Some(len / 2)
        );
    }

    #[test]
    fn missing_file_degrades_to_not_embedded() {
        let source = PathSource::new("/definitely/not/here.jpg");
        assert!(matches!(source.load(), Err(ReadError::Io { .. })));
        assert_eq!(
            BoundaryDetector::default().detect_source(&source).reason,
            Some(NotEmbeddedReason::ReadFailed)
        );
    }

    #[test]
    fn empty_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.jpg");
        File::create(&path).unwrap();
        assert!(matches!(
            PathSource::new(&path).load(),
            Err(ReadError::Empty { .. })
        ));
    }

    #[test]
    fn read_keeps_modified_time() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mov");
        std::fs::write(&path, b"moov").unwrap();
        let on_disk: DateTime<Utc> = std::fs::metadata(&path).unwrap().modified().unwrap().into();

        let file = PathSource::new(&path).read().unwrap();
        assert_eq!(file.mime, "video/quicktime");
        assert_eq!(file.modified, on_disk);
    }
}
