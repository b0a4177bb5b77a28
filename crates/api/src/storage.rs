// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! On-disk layout of staged uploads and published archives.
//!
//! ```text
//! {data_dir}/orders/{orderNumber}/{fileName}     staged uploads
//! {data_dir}/orders_zips/order-{orderNumber}.zip published archives
//! ```
//!
//! Archives are written to a temporary file inside `orders_zips/` and only
//! renamed into place once the caller has decided to publish them, so a
//! failed or abandoned build never touches the public path.

use fotoexpres::{ArchiveManifest, StagingDir, build_order_archive};
use fotoexpres_domain::{OrderNumber, validate_file_name};
use std::fs::{self, File, Metadata};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::error::{ApiError, translate_core_error, translate_domain_error};

/// Directory holding one staging directory per order.
pub const ORDERS_DIR_NAME: &str = "orders";
/// Directory holding the published archives.
pub const ZIPS_DIR_NAME: &str = "orders_zips";

/// File system storage for order uploads and archives.
#[derive(Debug, Clone)]
pub struct OrderStorage {
    orders_dir: PathBuf,
    zips_dir: PathBuf,
    #[cfg(test)]
    archives_built: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl OrderStorage {
    /// Opens the storage under `data_dir`, creating its directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self, ApiError> {
        let orders_dir: PathBuf = data_dir.join(ORDERS_DIR_NAME);
        let zips_dir: PathBuf = data_dir.join(ZIPS_DIR_NAME);
        for dir in [&orders_dir, &zips_dir] {
            fs::create_dir_all(dir).map_err(|e| {
                ApiError::storage(format!("Failed to create {}: {e}", dir.display()))
            })?;
        }

        info!(data_dir = %data_dir.display(), "Order storage ready");
        Ok(Self {
            orders_dir,
            zips_dir,
            #[cfg(test)]
            archives_built: std::sync::Arc::default(),
        })
    }

    /// Returns the staging view of an order.
    #[must_use]
    pub fn staging(&self, order_number: &OrderNumber) -> StagingDir {
        StagingDir::new(self.orders_dir.join(order_number.as_str()))
    }

    /// Claims an order number by creating its staging directory.
    ///
    /// # Returns
    ///
    /// `false` if the directory already existed, meaning the number is in use.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn reserve(&self, order_number: &OrderNumber) -> Result<bool, ApiError> {
        match fs::create_dir(self.staging(order_number).root()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(ApiError::storage(format!(
                "Failed to reserve {order_number}: {e}"
            ))),
        }
    }

    /// Stores one uploaded file in the order's staging directory.
    ///
    /// A file uploaded twice under the same name replaces the first copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the file name is unsafe or the write fails.
    pub fn stage_file(
        &self,
        order_number: &OrderNumber,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(), ApiError> {
        validate_file_name(file_name).map_err(translate_domain_error)?;

        let staging: StagingDir = self.staging(order_number);
        fs::create_dir_all(staging.root())
            .and_then(|()| fs::write(staging.root().join(file_name), bytes))
            .map_err(|e| {
                ApiError::storage(format!(
                    "Failed to stage '{file_name}' for {order_number}: {e}"
                ))
            })?;

        debug!(order_number = %order_number, file_name, size = bytes.len(), "Staged upload");
        Ok(())
    }

    /// Returns the file name of an order's archive.
    #[must_use]
    pub fn archive_file_name(order_number: &OrderNumber) -> String {
        format!("order-{order_number}.zip")
    }

    /// Returns the full path of an order's archive.
    #[must_use]
    pub fn archive_path(&self, order_number: &OrderNumber) -> PathBuf {
        self.zips_dir.join(Self::archive_file_name(order_number))
    }

    /// Builds an order archive into a temporary file next to its public path.
    ///
    /// Blocking; run it off the async executor. Nothing is visible at the
    /// public path until [`PendingArchive::publish`] is called, and dropping
    /// the pending archive deletes the temporary file.
    ///
    /// # Errors
    ///
    /// Returns a client error if a staged upload is missing, or a retryable
    /// storage failure if the archive cannot be written.
    pub fn build_archive(
        &self,
        order_number: &OrderNumber,
        manifest: &ArchiveManifest,
    ) -> Result<PendingArchive, ApiError> {
        let staging: StagingDir = self.staging(order_number);
        let temp_file: NamedTempFile = NamedTempFile::new_in(&self.zips_dir)
            .map_err(|e| ApiError::storage(format!("Failed to create archive file: {e}")))?;

        let writer: BufWriter<File> = BufWriter::new(
            temp_file
                .reopen()
                .map_err(|e| ApiError::storage(format!("Failed to open archive file: {e}")))?,
        );
        let writer: BufWriter<File> =
            build_order_archive(writer, &staging, manifest).map_err(translate_core_error)?;
        let file: File = writer
            .into_inner()
            .map_err(|e| ApiError::storage(format!("Failed to flush archive: {e}")))?;
        file.sync_all()
            .map_err(|e| ApiError::storage(format!("Failed to sync archive: {e}")))?;
        drop(file);

        #[cfg(test)]
        self.archives_built
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let file_name: String = Self::archive_file_name(order_number);
        debug!(order_number = %order_number, archive = %file_name, "Archive built");
        Ok(PendingArchive {
            temp_file,
            target: self.zips_dir.join(&file_name),
            file_name,
        })
    }

    /// Returns how many archives this storage has built.
    #[cfg(test)]
    pub(crate) fn archives_built(&self) -> usize {
        self.archives_built.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Reads an order's published archive.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` if the archive does not exist.
    pub fn read_archive(&self, order_number: &OrderNumber) -> Result<Vec<u8>, ApiError> {
        fs::read(self.archive_path(order_number)).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ApiError::ResourceNotFound {
                    resource_type: String::from("Archive"),
                    message: format!("No archive for order {order_number}"),
                }
            } else {
                ApiError::storage(format!("Failed to read archive for {order_number}: {e}"))
            }
        })
    }

    /// Removes an order's staging directory, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be removed.
    pub fn remove_staging(&self, order_number: &OrderNumber) -> Result<(), ApiError> {
        remove_if_exists(self.staging(order_number).root(), true)
            .map_err(|e| ApiError::storage(format!("Failed to remove staged files: {e}")))
    }

    /// Removes an order's published archive, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive exists but cannot be removed.
    pub fn remove_archive(&self, order_number: &OrderNumber) -> Result<(), ApiError> {
        remove_if_exists(&self.archive_path(order_number), false)
            .map_err(|e| ApiError::storage(format!("Failed to remove archive: {e}")))
    }

    /// Removes everything stored for an order, logging instead of failing.
    pub fn discard(&self, order_number: &OrderNumber) {
        if let Err(e) = self.remove_archive(order_number) {
            warn!(order_number = %order_number, error = %e, "Cleanup of archive failed");
        }
        if let Err(e) = self.remove_staging(order_number) {
            warn!(order_number = %order_number, error = %e, "Cleanup of staged files failed");
        }
    }

    /// Lists the orders whose staging directory has been idle since `cutoff`.
    ///
    /// Entries that are not named like an order number are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the staging root cannot be read.
    pub fn idle_staging(&self, cutoff: OffsetDateTime) -> Result<Vec<OrderNumber>, ApiError> {
        let entries: fs::ReadDir = fs::read_dir(&self.orders_dir)
            .map_err(|e| ApiError::storage(format!("Failed to list staged orders: {e}")))?;

        let mut idle: Vec<OrderNumber> = Vec::new();
        for entry in entries {
            let entry: fs::DirEntry = entry
                .map_err(|e| ApiError::storage(format!("Failed to list staged orders: {e}")))?;
            let Some(order_number) = entry
                .file_name()
                .to_str()
                .and_then(|name| OrderNumber::parse(name).ok())
            else {
                continue;
            };
            if self.is_staging_idle(&order_number, cutoff) {
                idle.push(order_number);
            }
        }
        Ok(idle)
    }

    /// Returns whether an order's staging directory exists and neither it
    /// nor any staged file changed after `cutoff`.
    #[must_use]
    pub fn is_staging_idle(&self, order_number: &OrderNumber, cutoff: OffsetDateTime) -> bool {
        let root: PathBuf = self.staging(order_number).root().to_path_buf();
        let Ok(metadata) = fs::metadata(&root) else {
            return false;
        };
        if !metadata.is_dir() {
            return false;
        }

        let staged: Vec<Metadata> = fs::read_dir(&root)
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|entry| entry.metadata().ok())
            .collect();
        std::iter::once(metadata)
            .chain(staged)
            .filter_map(|metadata| metadata.modified().ok())
            .all(|modified| OffsetDateTime::from(modified) <= cutoff)
    }
}

/// An archive written to a temporary file and not yet published.
#[derive(Debug)]
pub struct PendingArchive {
    temp_file: NamedTempFile,
    target: PathBuf,
    file_name: String,
}

impl PendingArchive {
    /// Returns the file name the archive is published under.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Renames the archive into its public path.
    ///
    /// # Returns
    ///
    /// The archive file name, as stored on the order.
    ///
    /// # Errors
    ///
    /// Returns a retryable storage failure if the rename fails; the temporary
    /// file is removed in that case.
    pub fn publish(self) -> Result<String, ApiError> {
        let Self {
            temp_file,
            target,
            file_name,
        } = self;
        temp_file
            .persist(&target)
            .map_err(|e| ApiError::storage(format!("Failed to publish archive: {e}")))?;

        info!(archive = %file_name, "Archive published");
        Ok(file_name)
    }
}

fn remove_if_exists(path: &Path, directory: bool) -> io::Result<()> {
    let result: io::Result<()> = if directory {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
