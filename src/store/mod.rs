use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::StoreConfig;

mod classify;

pub use classify::{base_name, classify, ArtifactKind};

/// Sentinel kept in each directory so the directory itself survives in
/// version control; never listed and never a valid upload or delete target.
pub const PLACEHOLDER: &str = ".placeholder";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("artifact directory unreadable: {0}")]
    StorageUnavailable(#[source] std::io::Error),
    #[error("unsupported artifact type: {name}")]
    UnsupportedArtifactType { name: String },
    #[error("failed to write artifact {name}: {source}")]
    StorageWriteFailure {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact not found: {name}")]
    ArtifactNotFound { name: String },
}

/// One member of an upload batch: a filename as supplied by the client and
/// the full payload bytes.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub data: Bytes,
}

/// An ordered set of files submitted in a single add-files request.
#[derive(Debug, Clone, Default)]
pub struct UploadBatch {
    pub files: Vec<UploadFile>,
}

/// Directory-backed artifact store. Firmware and bootrom binaries live in
/// two disjoint directories; a file's directory is determined purely by its
/// name suffix. No locking is performed — concurrent operations on the same
/// name race at the filesystem with last-writer-wins semantics.
pub struct FirmwareStore {
    firmware_dir: PathBuf,
    bootrom_dir: PathBuf,
}

impl FirmwareStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            firmware_dir: config.firmware_dir.clone(),
            bootrom_dir: config.bootrom_dir.clone(),
        }
    }

    /// Create both store directories and their placeholder sentinels if
    /// they do not exist yet.
    pub async fn init(&self) -> std::io::Result<()> {
        for dir in [&self.firmware_dir, &self.bootrom_dir] {
            tokio::fs::create_dir_all(dir).await?;
            let sentinel = dir.join(PLACEHOLDER);
            if !tokio::fs::try_exists(&sentinel).await? {
                tokio::fs::write(&sentinel, b"").await?;
            }
        }
        info!(
            "Artifact store initialized ({} / {})",
            self.firmware_dir.display(),
            self.bootrom_dir.display()
        );
        Ok(())
    }

    fn dir_for(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Firmware => &self.firmware_dir,
            ArtifactKind::Bootrom => &self.bootrom_dir,
        }
    }

    /// List every artifact name across both directories, excluding the
    /// placeholder sentinel. Fails outright if either directory is
    /// unreadable; there is no partial listing.
    pub async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names = read_names(&self.firmware_dir)
            .await
            .map_err(StoreError::StorageUnavailable)?;
        names.extend(
            read_names(&self.bootrom_dir)
                .await
                .map_err(StoreError::StorageUnavailable)?,
        );
        names.retain(|n| n != PLACEHOLDER);
        Ok(names)
    }

    /// Write an upload batch into the store.
    ///
    /// Every member name is reduced to its base component and classified
    /// before anything touches disk; one invalid member rejects the whole
    /// batch with no files written. The write phase itself is best-effort:
    /// a mid-batch I/O failure is reported but does not roll back members
    /// already written.
    pub async fn write_batch(&self, batch: UploadBatch) -> Result<(), StoreError> {
        let mut routed = Vec::with_capacity(batch.files.len());
        for file in batch.files {
            // The placeholder sentinel carries no recognized suffix, so it
            // can never validate as an upload.
            let valid = base_name(&file.name)
                .and_then(|base| classify(base).map(|kind| (kind, base.to_string())));
            match valid {
                Some((kind, base)) => routed.push((kind, base, file.data)),
                None => {
                    return Err(StoreError::UnsupportedArtifactType { name: file.name });
                }
            }
        }

        for (kind, name, data) in routed {
            let dest = self.dir_for(kind).join(&name);
            tokio::fs::write(&dest, &data)
                .await
                .map_err(|source| StoreError::StorageWriteFailure {
                    name: name.clone(),
                    source,
                })?;
            debug!("Wrote {} artifact {} ({} bytes)", kind, name, data.len());
        }
        Ok(())
    }

    /// Delete an artifact by name.
    ///
    /// The input is reduced to its base name before resolution, so
    /// traversal segments can never escape the store directories. The
    /// firmware directory is checked first, then bootrom; the first match
    /// is deleted. A delete that loses a race with another delete simply
    /// falls through to not-found.
    pub async fn remove(&self, raw_name: &str) -> Result<(), StoreError> {
        let name = match base_name(raw_name).filter(|base| *base != PLACEHOLDER) {
            Some(base) => base,
            None => {
                return Err(StoreError::ArtifactNotFound {
                    name: raw_name.to_string(),
                });
            }
        };

        for dir in [&self.firmware_dir, &self.bootrom_dir] {
            match tokio::fs::remove_file(dir.join(name)).await {
                Ok(()) => {
                    debug!("Removed artifact {} from {}", name, dir.display());
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::StorageUnavailable(e)),
            }
        }

        Err(StoreError::ArtifactNotFound {
            name: name.to_string(),
        })
    }
}

/// Entry names that are not valid UTF-8 are converted lossily (replacement
/// character) rather than failing the listing.
async fn read_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}
