//! Bulk export: bundle compressed outputs into a single zip archive.
//!
//! Entries are stored without further compression; the payloads are already
//! compressed images.

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::config::{CollisionPolicy, ExportConfig};
use crate::error::ExportError;
use crate::types::{basename, CompressionOutcome};

/// Single-file download name for an outcome: `<basename>.<extension>`.
pub fn download_name(outcome: &CompressionOutcome) -> String {
    outcome.download_name()
}

/// Builds the bulk archive and writes outputs to disk.
#[derive(Debug, Clone)]
pub struct ExportPackager {
    archive_name: String,
    collision: CollisionPolicy,
}

impl ExportPackager {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            archive_name: config.archive_name.clone(),
            collision: config.collision,
        }
    }

    /// File name of the bulk archive.
    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    pub fn collision(&self) -> CollisionPolicy {
        self.collision
    }

    /// Resolve the output name of every outcome under the collision policy.
    ///
    /// With [`CollisionPolicy::Suffix`] every outcome keeps an entry and
    /// repeated names become `photo-1.jpeg`, `photo-2.jpeg`, ... With
    /// [`CollisionPolicy::Overwrite`] a later outcome replaces the earlier
    /// entry of the same name.
    pub fn resolve_names<'a, I>(&self, outcomes: I) -> Vec<(String, &'a CompressionOutcome)>
    where
        I: IntoIterator<Item = &'a CompressionOutcome>,
    {
        let mut entries: Vec<(String, &'a CompressionOutcome)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for outcome in outcomes {
            let name = outcome.download_name();
            match (positions.get(&name).copied(), self.collision) {
                (None, _) => {
                    positions.insert(name.clone(), entries.len());
                    entries.push((name, outcome));
                }
                (Some(position), CollisionPolicy::Overwrite) => {
                    tracing::warn!(
                        "{} from {:?} replaces the entry from {:?}",
                        name,
                        outcome.original_name,
                        entries[position].1.original_name
                    );
                    entries[position].1 = outcome;
                }
                (Some(_), CollisionPolicy::Suffix) => {
                    let stem = basename(&name).to_string();
                    let extension = outcome.encode_result.format.extension();
                    let unique = (1..)
                        .map(|n| format!("{stem}-{n}.{extension}"))
                        .find(|candidate| !positions.contains_key(candidate))
                        .unwrap_or(name);
                    tracing::debug!("Renamed duplicate entry to {}", unique);
                    positions.insert(unique.clone(), entries.len());
                    entries.push((unique, outcome));
                }
            }
        }

        entries
    }

    /// Build the zip archive in memory.
    pub fn package<'a, I>(&self, outcomes: I) -> Result<Vec<u8>, ExportError>
    where
        I: IntoIterator<Item = &'a CompressionOutcome>,
    {
        let entries = self.resolve_names(outcomes);
        if entries.is_empty() {
            return Err(ExportError::Empty);
        }

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, outcome) in &entries {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&outcome.encode_result.bytes)?;
        }
        let archive = zip.finish()?.into_inner();

        tracing::debug!(
            "Packaged {} entries into {} ({} bytes)",
            entries.len(),
            self.archive_name,
            archive.len()
        );
        Ok(archive)
    }

    /// Build the archive and write it into `dir` as [`Self::archive_name`].
    pub fn write_to_dir<'a, I>(&self, dir: &Path, outcomes: I) -> Result<PathBuf, ExportError>
    where
        I: IntoIterator<Item = &'a CompressionOutcome>,
    {
        let archive = self.package(outcomes)?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.archive_name);
        std::fs::write(&path, archive)?;
        tracing::info!("Wrote {:?}", path);
        Ok(path)
    }

    /// Write every outcome into `dir` under its download name.
    ///
    /// Names are resolved the same way as archive entries.
    pub fn write_files<'a, I>(&self, dir: &Path, outcomes: I) -> Result<Vec<PathBuf>, ExportError>
    where
        I: IntoIterator<Item = &'a CompressionOutcome>,
    {
        let entries = self.resolve_names(outcomes);
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(entries.len());
        for (name, outcome) in entries {
            let path = dir.join(name);
            std::fs::write(&path, &outcome.encode_result.bytes)?;
            tracing::debug!("Wrote {:?}", path);
            written.push(path);
        }
        Ok(written)
    }
}

impl Default for ExportPackager {
    fn default() -> Self {
        Self::new(&ExportConfig::default())
    }
}
