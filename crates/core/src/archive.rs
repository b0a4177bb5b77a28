// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order archive layout and assembly.
//!
//! An order archive holds one `order_details.txt` entry with the recap and
//! one entry per distinct photo placement at
//! `{format}/{finish}/{quantity}/{fileName}`.

use crate::error::CoreError;
use fotoexpres_domain::PhotoSpec;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

/// Name of the recap entry at the archive root.
pub const ORDER_DETAILS_FILE_NAME: &str = "order_details.txt";

/// Where the bytes of a manifest entry come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// The rendered order recap.
    Summary(String),
    /// A staged upload, by its declared file name.
    StagedFile(String),
}

/// One entry of the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path of the entry inside the archive.
    pub archive_path: String,
    /// Where the entry's content is read from.
    pub source: EntrySource,
}

/// The ordered list of entries written into an order archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveManifest {
    entries: Vec<ManifestEntry>,
}

impl ArchiveManifest {
    /// Returns the entries in write order.
    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Returns the archive paths in write order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.archive_path.as_str())
    }

    /// Returns the distinct staged file names the archive needs, in
    /// order of first use.
    #[must_use]
    pub fn staged_files(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.entries
            .iter()
            .filter_map(|entry| match &entry.source {
                EntrySource::StagedFile(name) => Some(name.as_str()),
                EntrySource::Summary(_) => None,
            })
            .filter(|name| seen.insert(name))
            .collect()
    }
}

/// Returns the archive path of a photo specification.
///
/// Format and finish are sanitized; the file name is used as declared and
/// must already have been validated.
#[must_use]
pub fn photo_archive_path(spec: &PhotoSpec) -> String {
    format!(
        "{}/{}/{}/{}",
        spec.format_segment(),
        spec.finish_segment(),
        spec.quantity,
        spec.file_name
    )
}

/// Builds the archive manifest for an order.
///
/// The recap comes first. Photo entries follow in specification order;
/// specifications that resolve to an already-used path are the same
/// logical file and are written once.
///
/// # Arguments
///
/// * `specs` - The order's photo specifications
/// * `summary` - The rendered order recap
#[must_use]
pub fn build_manifest(specs: &[PhotoSpec], summary: String) -> ArchiveManifest {
    let mut entries: Vec<ManifestEntry> = Vec::with_capacity(specs.len() + 1);
    entries.push(ManifestEntry {
        archive_path: String::from(ORDER_DETAILS_FILE_NAME),
        source: EntrySource::Summary(summary),
    });

    let mut used_paths: HashSet<String> = HashSet::new();
    for spec in specs {
        let archive_path: String = photo_archive_path(spec);
        if used_paths.insert(archive_path.clone()) {
            entries.push(ManifestEntry {
                archive_path,
                source: EntrySource::StagedFile(spec.file_name.clone()),
            });
        }
    }

    ArchiveManifest { entries }
}

/// Read access to the files uploaded for one order.
pub trait StagedUploads {
    /// Returns whether a file with this declared name was uploaded.
    fn contains(&self, file_name: &str) -> bool;

    /// Opens an uploaded file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    fn open(&self, file_name: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// Uploads staged as files in one directory, named by their declared name.
#[derive(Debug, Clone)]
pub struct StagingDir {
    root: PathBuf,
}

impl StagingDir {
    /// Creates a view over an existing staging directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StagedUploads for StagingDir {
    fn contains(&self, file_name: &str) -> bool {
        self.root.join(file_name).is_file()
    }

    fn open(&self, file_name: &str) -> io::Result<Box<dyn Read + '_>> {
        let file: File = File::open(self.root.join(file_name))?;
        Ok(Box::new(file))
    }
}

impl StagedUploads for BTreeMap<String, Vec<u8>> {
    fn contains(&self, file_name: &str) -> bool {
        self.contains_key(file_name)
    }

    fn open(&self, file_name: &str) -> io::Result<Box<dyn Read + '_>> {
        self.get(file_name)
            .map(|bytes| Box::new(Cursor::new(bytes.as_slice())) as Box<dyn Read + '_>)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, file_name.to_string()))
    }
}

/// Checks that every staged file the manifest needs was uploaded.
///
/// # Errors
///
/// Returns `CoreError::MissingUpload` naming the first missing file.
pub fn verify_staged_uploads<S>(manifest: &ArchiveManifest, staged: &S) -> Result<(), CoreError>
where
    S: StagedUploads + ?Sized,
{
    match manifest
        .staged_files()
        .into_iter()
        .find(|name| !staged.contains(name))
    {
        Some(missing) => Err(CoreError::MissingUpload {
            file_name: missing.to_string(),
        }),
        None => Ok(()),
    }
}

/// Writes an order archive.
///
/// Every staged file is checked before anything is written, so a missing
/// upload leaves the writer untouched. Entries are deflated and carry a
/// fixed modification time; uploads are streamed rather than buffered.
///
/// # Arguments
///
/// * `writer` - The archive destination
/// * `staged` - The order's uploaded files
/// * `manifest` - The entries to write
///
/// # Returns
///
/// The writer, positioned after the archive's central directory.
///
/// # Errors
///
/// Returns an error if:
/// - A staged file the manifest needs was not uploaded
/// - A staged file cannot be read
/// - The archive cannot be written
pub fn build_order_archive<W, S>(
    writer: W,
    staged: &S,
    manifest: &ArchiveManifest,
) -> Result<W, CoreError>
where
    W: Write + Seek,
    S: StagedUploads + ?Sized,
{
    verify_staged_uploads(manifest, staged)?;

    let options: FileOptions<()> = FileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    let mut zip: ZipWriter<W> = ZipWriter::new(writer);
    for entry in &manifest.entries {
        zip.start_file(entry.archive_path.as_str(), options)?;
        match &entry.source {
            EntrySource::Summary(text) => {
                zip.write_all(text.as_bytes())
                    .map_err(|e| io_error(&entry.archive_path, &e))?;
            }
            EntrySource::StagedFile(file_name) => {
                let mut reader: Box<dyn Read + '_> = staged.open(file_name).map_err(|e| {
                    CoreError::Io {
                        context: format!("opening staged file '{file_name}'"),
                        message: e.to_string(),
                    }
                })?;
                io::copy(&mut reader, &mut zip).map_err(|e| io_error(&entry.archive_path, &e))?;
            }
        }
    }

    Ok(zip.finish()?)
}

fn io_error(archive_path: &str, err: &io::Error) -> CoreError {
    CoreError::Io {
        context: format!("writing archive entry '{archive_path}'"),
        message: err.to_string(),
    }
}
