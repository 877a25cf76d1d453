//! Writing prepared files to disk.

use crate::core::media::MediaFile;
use crate::error::OutputError;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Write each file into `dir` under its own name, restoring its mtime.
///
/// Directory components in names are ignored so that every output lands
/// directly inside `dir`. Existing files are never overwritten: two inputs
/// mapping to the same name, or a name already present in `dir`, fail with
/// [`OutputError::Collision`]. Clashes inside the batch are caught before
/// anything is written. Returns the written paths in input order.
pub fn write_files<F: Borrow<MediaFile>>(
    dir: &Path,
    files: &[F],
) -> Result<Vec<PathBuf>, OutputError> {
    let targets: Vec<PathBuf> = files
        .iter()
        .map(|file| target_path(dir, file.borrow()))
        .collect();

    let mut seen = HashSet::new();
    for path in &targets {
        if !seen.insert(path) {
            return Err(OutputError::Collision { path: path.clone() });
        }
    }

    fs::create_dir_all(dir).map_err(|e| OutputError::Directory {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for (path, file) in targets.iter().zip(files) {
        write_one(path, file.borrow())?;
    }
    Ok(targets)
}

fn target_path(dir: &Path, file: &MediaFile) -> PathBuf {
    let file_name = Path::new(&file.name)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "unnamed".into());
    dir.join(file_name)
}

fn write_one(path: &Path, file: &MediaFile) -> Result<(), OutputError> {
    let to_error = |e: std::io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source: e,
    };

    let mut out = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => OutputError::Collision {
                path: path.to_path_buf(),
            },
            _ => to_error(e),
        })?;
    out.write_all(&file.bytes).map_err(to_error)?;
    out.set_modified(SystemTime::from(file.modified))
        .map_err(to_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn writes_files_with_original_mtime() {
        let dir = TempDir::new().unwrap();
        let modified = Utc.with_ymd_and_hms(2023, 8, 9, 10, 11, 12).unwrap();
        let files = vec![
            MediaFile::new("a.jpg", "image/jpeg", vec![1, 2]).with_modified(modified),
            MediaFile::new("a.mp4", "video/mp4", vec![3]).with_modified(modified),
        ];

        let written = write_files(dir.path(), &files).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(fs::read(&written[0]).unwrap(), vec![1, 2]);
        let on_disk: DateTime<Utc> = fs::metadata(&written[1]).unwrap().modified().unwrap().into();
        assert_eq!(on_disk, modified);
    }

    #[test]
    fn names_cannot_escape_output_dir() {
        let dir = TempDir::new().unwrap();
        let files = vec![MediaFile::new("../../etc/x.jpg", "image/jpeg", vec![0])];
        let written = write_files(dir.path(), &files).unwrap();
        assert_eq!(written[0], dir.path().join("x.jpg"));
    }

    #[test]
    fn same_named_inputs_are_rejected_before_writing() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            MediaFile::new("a/IMG_1.jpg", "image/jpeg", vec![1]),
            MediaFile::new("a/IMG_1.mp4", "video/mp4", vec![2]),
            MediaFile::new("b/IMG_1.jpg", "image/jpeg", vec![3]),
        ];

        let error = write_files(dir.path(), &files).unwrap_err();

        assert!(matches!(
            error,
            OutputError::Collision { ref path } if path == &dir.path().join("IMG_1.jpg")
        ));
        assert!(!dir.path().join("IMG_1.jpg").exists());
        assert!(!dir.path().join("IMG_1.mp4").exists());
    }

    #[test]
    fn existing_files_are_not_overwritten() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("IMG_1.mp4"), b"earlier").unwrap();

        let file = MediaFile::new("IMG_1.mp4", "video/mp4", vec![9; 4]);
        let error = write_files(dir.path(), &[&file]).unwrap_err();

        assert!(matches!(error, OutputError::Collision { .. }));
        assert_eq!(fs::read(dir.path().join("IMG_1.mp4")).unwrap(), b"earlier");
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("split").join("today");
        write_files(&out, &[MediaFile::new("a.jpg", "", vec![0])]).unwrap();
        assert!(out.join("a.jpg").exists());
    }
}
