//! Turn paths on disk into a file selection.
//!
//! Mirrors what a browser file picker hands over: a name, a size, a MIME
//! type guessed from the extension, and the raw bytes.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Result;
use crate::types::{is_image_mime, SelectedFile};

/// MIME type reported for extensions we do not recognize.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Guess a MIME type from a file extension.
pub fn guess_mime(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return UNKNOWN_MIME;
    };
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" | "jpe" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "ico" => "image/x-icon",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => UNKNOWN_MIME,
    }
}

/// Builds a selection from files and directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSelector {
    recursive: bool,
}

impl FileSelector {
    pub fn new(recursive: bool) -> Self {
        Self { recursive }
    }

    /// List the files a path contributes to the selection.
    ///
    /// A file is always included, whatever its type. A directory contributes
    /// the image-typed files directly inside it (or anywhere below it when
    /// recursive), sorted by path.
    pub fn discover(&self, path: &Path) -> Vec<PathBuf> {
        if path.is_file() {
            return vec![path.to_path_buf()];
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .max_depth(max_depth)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| is_image_mime(guess_mime(p)))
            .collect();

        files.sort();
        files
    }

    /// Read every discovered file into a [`SelectedFile`], in argument order.
    pub fn select(&self, paths: &[PathBuf]) -> Result<Vec<SelectedFile>> {
        let mut selection = Vec::new();
        for path in paths {
            if !path.exists() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} does not exist", path.display()),
                )
                .into());
            }
            for file in self.discover(path) {
                selection.push(load(&file)?);
            }
        }
        tracing::debug!("Selected {} file(s)", selection.len());
        Ok(selection)
    }
}

/// Read one file into a [`SelectedFile`].
pub fn load(path: &Path) -> Result<SelectedFile> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SelectedFile::new(name, guess_mime(path), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path, bytes: &[u8]) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("a.png")), "image/png");
        assert_eq!(guess_mime(Path::new("a.tif")), "image/tiff");
        assert_eq!(guess_mime(Path::new("notes.txt")), "text/plain");
        assert_eq!(guess_mime(Path::new("README")), UNKNOWN_MIME);
    }

    #[test]
    fn test_directory_lists_images_only() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("b.png"), b"png");
        touch(&dir.path().join("a.jpg"), b"jpg");
        touch(&dir.path().join("notes.txt"), b"txt");
        touch(&dir.path().join("nested/c.gif"), b"gif");

        let flat = FileSelector::new(false).discover(dir.path());
        assert_eq!(
            flat,
            vec![dir.path().join("a.jpg"), dir.path().join("b.png")]
        );

        let deep = FileSelector::new(true).discover(dir.path());
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&dir.path().join("nested/c.gif")));
    }

    #[test]
    fn test_explicit_file_always_included() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        touch(&path, b"hello");

        let selection = FileSelector::default().select(&[path]).unwrap();
        assert_eq!(selection.len(), 1);
        assert_eq!(selection[0].name, "notes.txt");
        assert_eq!(selection[0].mime_type, "text/plain");
        assert!(!selection[0].is_image());
    }

    #[test]
    fn test_select_reads_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.png");
        touch(&path, b"12345");

        let selection = FileSelector::default().select(&[path]).unwrap();
        assert_eq!(selection[0].size, 5);
        assert_eq!(&selection[0].bytes[..], b"12345");
        assert_eq!(selection[0].mime_type, "image/png");
    }

    #[test]
    fn test_missing_path_is_error() {
        let dir = tempdir().unwrap();
        let result = FileSelector::default().select(&[dir.path().join("nope.png")]);
        assert!(result.is_err());
    }
}
